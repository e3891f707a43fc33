//! Hold checks on the shortest paths.
//!
//! Data launched by a clock edge must not reach the capturing flip-flop
//! before that same edge's hold window has closed:
//!
//! ```text
//! arrival  = clk2q_min + path_delay
//! required = hold_time + clock_skew_max
//! slack    = arrival - required
//! ```

use crate::error::{CheckKind, TimingError};
use crate::path::Path;
use kairos_config::TimingConstants;
use serde::Serialize;

/// The outcome of a hold check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HoldVerdict {
    /// The data changes after the hold window.
    Pass,
    /// The data races through inside the hold window.
    Fail,
}

/// Hold timing of one path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HoldCheck {
    /// Cumulative delay of the checked path.
    pub path_delay: f64,
    /// The earliest the data can change at the capture flip-flop.
    pub arrival_time: f64,
    /// The end of the hold window.
    pub required_time: f64,
    /// `arrival_time - required_time`; negative on failure.
    pub slack: f64,
    /// Pass or fail.
    pub verdict: HoldVerdict,
}

impl HoldCheck {
    /// Returns `true` when the check passed.
    pub fn passed(&self) -> bool {
        self.verdict == HoldVerdict::Pass
    }
}

/// Runs the hold check for a single path delay.
pub fn check_hold(path_delay: f64, constants: &TimingConstants) -> HoldCheck {
    let arrival_time = constants.clk2q_min + path_delay;
    let required_time = constants.hold_time + constants.clock_skew_max;
    let slack = arrival_time - required_time;
    HoldCheck {
        path_delay,
        arrival_time,
        required_time,
        slack,
        verdict: if slack >= 0.0 {
            HoldVerdict::Pass
        } else {
            HoldVerdict::Fail
        },
    }
}

/// Runs the hold check on every path, in order.
///
/// Fails with [`TimingError::AnalysisInputEmpty`] when `paths` is empty.
pub fn analyze_hold(
    paths: &[&Path<'_>],
    constants: &TimingConstants,
) -> Result<Vec<HoldCheck>, TimingError> {
    if paths.is_empty() {
        return Err(TimingError::AnalysisInputEmpty(CheckKind::Hold));
    }
    Ok(paths
        .iter()
        .map(|path| check_hold(path.delay(), constants))
        .collect())
}
