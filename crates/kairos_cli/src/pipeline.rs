//! Shared pipeline helpers for CLI commands.
//!
//! Configuration resolution, netlist loading and diagnostic rendering used
//! by `analyze`, `paths` and `info`.

use std::path::{Path, PathBuf};

use kairos_config::{KairosConfig, CONFIG_FILE_NAME};
use kairos_diagnostics::{DiagnosticRenderer, DiagnosticSink, TerminalRenderer};
use kairos_netlist::Circuit;

use crate::GlobalArgs;

/// Finds the configuration file to use for `netlist`.
///
/// An explicit `--config` path wins; otherwise a `kairos.toml` next to the
/// netlist is used if present. `None` means built-in defaults.
pub fn resolve_config_path(global: &GlobalArgs, netlist: &Path) -> Option<PathBuf> {
    if let Some(ref config_path) = global.config {
        return Some(PathBuf::from(config_path));
    }
    let dir = match netlist.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let candidate = dir.join(CONFIG_FILE_NAME);
    candidate.is_file().then_some(candidate)
}

/// Loads the configuration for `netlist`, then lets `overrides` adjust it.
///
/// The result is validated again after the overrides are applied.
pub fn load_config(
    global: &GlobalArgs,
    netlist: &Path,
    overrides: impl FnOnce(&mut KairosConfig),
) -> Result<KairosConfig, Box<dyn std::error::Error>> {
    let mut config = match resolve_config_path(global, netlist) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading configuration");
            kairos_config::load_config(&path)
                .map_err(|e| format!("failed to load {}: {e}", path.display()))?
        }
        None => {
            tracing::debug!("no configuration file, using defaults");
            KairosConfig::default()
        }
    };
    overrides(&mut config);
    kairos_config::validate_config(&config)?;
    Ok(config)
}

/// Reads a Yosys JSON netlist with the configured cell delays.
pub fn read_netlist(
    netlist: &Path,
    config: &KairosConfig,
) -> Result<Circuit, Box<dyn std::error::Error>> {
    let circuit = kairos_netlist::read_yosys_json(netlist, &config.delays)
        .map_err(|e| format!("failed to read {}: {e}", netlist.display()))?;
    tracing::info!(
        cells = circuit.cells().len(),
        inputs = circuit.primary_inputs().len(),
        outputs = circuit.primary_outputs().len(),
        "netlist loaded"
    );
    Ok(circuit)
}

/// Renders every collected diagnostic to stderr.
///
/// Warnings are hidden with `--quiet`; errors are always shown.
pub fn render_diagnostics(sink: &DiagnosticSink, global: &GlobalArgs) {
    let renderer = TerminalRenderer::new(global.color);
    for diag in sink.diagnostics() {
        if global.quiet && !diag.severity.is_error() {
            continue;
        }
        eprint!("{}", renderer.render(&diag));
    }
}
