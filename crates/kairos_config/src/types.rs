//! Configuration types deserialized from `kairos.toml`.

use serde::{Deserialize, Serialize};

/// The complete analysis configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KairosConfig {
    /// Clock and flip-flop characteristic delays.
    #[serde(default)]
    pub timing: TimingConstants,
    /// Scalar propagation delay per combinational cell type.
    #[serde(default)]
    pub delays: DelayTable,
    /// Path enumeration options.
    #[serde(default)]
    pub enumeration: EnumerationConfig,
    /// Report options.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Timing characteristics of the clock and the flip-flops.
///
/// All values share one time unit; the defaults are nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConstants {
    /// The clock period.
    pub clock_period: f64,
    /// Time a flip-flop input must be stable before the capturing edge.
    pub setup_time: f64,
    /// Time a flip-flop input must stay stable after the capturing edge.
    pub hold_time: f64,
    /// Fastest delay from a clock edge to a flip-flop output changing.
    pub clk2q_min: f64,
    /// Slowest delay from a clock edge to a flip-flop output changing.
    pub clk2q_max: f64,
    /// Worst-case skew between clock edges at different flip-flops.
    pub clock_skew_max: f64,
}

impl Default for TimingConstants {
    fn default() -> Self {
        Self {
            clock_period: 50.0,
            setup_time: 8.0,
            hold_time: 4.0,
            clk2q_min: 1.0,
            clk2q_max: 5.0,
            clock_skew_max: 3.0,
        }
    }
}

/// Propagation delay of every combinational cell type.
///
/// The flip-flop has no entry: it is a timing boundary, not a timed element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayTable {
    /// Delay of `$_NOT_`.
    pub not: f64,
    /// Delay of `$_AND_`.
    pub and: f64,
    /// Delay of `$_OR_`.
    pub or: f64,
    /// Delay of `$_XOR_`.
    pub xor: f64,
    /// Delay of `$_NAND_`.
    pub nand: f64,
    /// Delay of `$_NOR_`.
    pub nor: f64,
    /// Delay of `$_XNOR_`.
    pub xnor: f64,
}

impl Default for DelayTable {
    fn default() -> Self {
        Self {
            not: 5.0,
            and: 9.0,
            or: 9.0,
            xor: 12.0,
            nand: 13.0,
            nor: 12.0,
            xnor: 12.0,
        }
    }
}

impl DelayTable {
    /// Returns every entry as `(key, delay)` pairs, in declaration order.
    pub fn entries(&self) -> [(&'static str, f64); 7] {
        [
            ("not", self.not),
            ("and", self.and),
            ("or", self.or),
            ("xor", self.xor),
            ("nand", self.nand),
            ("nor", self.nor),
            ("xnor", self.xnor),
        ]
    }
}

/// Which nets are treated as capture points when enumerating paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Endpoints {
    /// Only primary outputs.
    #[default]
    PrimaryOutputs,
    /// Primary outputs followed by the data input of every flip-flop.
    OutputsAndRegisters,
}

/// Path enumeration options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumerationConfig {
    /// Capture points seeded into the search.
    pub endpoints: Endpoints,
    /// Search each endpoint on the rayon thread pool.
    pub parallel: bool,
}

/// Report options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// How many longest (setup) and shortest (hold) paths are analyzed.
    pub paths: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { paths: 1 }
    }
}
