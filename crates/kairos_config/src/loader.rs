//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::KairosConfig;
use std::path::Path;

/// Conventional file name looked up next to a netlist.
pub const CONFIG_FILE_NAME: &str = "kairos.toml";

/// Loads and validates a `kairos.toml` configuration file.
pub fn load_config(path: &Path) -> Result<KairosConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<KairosConfig, ConfigError> {
    let config: KairosConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks that every value is usable by the analyzers.
///
/// Called by the loaders, and again by callers that override values after
/// loading (for example from command-line flags).
pub fn validate_config(config: &KairosConfig) -> Result<(), ConfigError> {
    let t = &config.timing;
    let timing = [
        ("timing.clock_period", t.clock_period),
        ("timing.setup_time", t.setup_time),
        ("timing.hold_time", t.hold_time),
        ("timing.clk2q_min", t.clk2q_min),
        ("timing.clk2q_max", t.clk2q_max),
        ("timing.clock_skew_max", t.clock_skew_max),
    ];
    for (key, value) in timing {
        if !value.is_finite() {
            return Err(invalid(format!("{key} must be a finite number")));
        }
    }
    if t.clock_period <= 0.0 {
        return Err(invalid("timing.clock_period must be positive"));
    }
    if t.clk2q_min < 0.0 || t.clk2q_max < 0.0 {
        return Err(invalid("clock-to-Q delays must not be negative"));
    }
    if t.clk2q_min > t.clk2q_max {
        return Err(invalid(format!(
            "timing.clk2q_min ({}) exceeds timing.clk2q_max ({})",
            t.clk2q_min, t.clk2q_max
        )));
    }

    for (key, delay) in config.delays.entries() {
        if !delay.is_finite() || delay < 0.0 {
            return Err(invalid(format!(
                "delays.{key} must be a non-negative finite number"
            )));
        }
    }

    if config.report.paths == 0 {
        return Err(invalid("report.paths must be at least 1"));
    }
    Ok(())
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError(message.into())
}
