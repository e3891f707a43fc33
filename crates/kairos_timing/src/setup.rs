//! Setup checks on the longest paths.
//!
//! Data launched by one clock edge must reach the capturing flip-flop a setup
//! time before the next edge, allowing for the worst clock skew:
//!
//! ```text
//! arrival  = path_delay + clk2q_max + setup_time
//! required = clock_period + clock_skew_max
//! slack    = required - arrival
//! ```

use crate::error::{CheckKind, TimingError};
use crate::path::Path;
use kairos_config::TimingConstants;
use serde::Serialize;

/// The outcome of a setup check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum SetupVerdict {
    /// The path meets setup at the configured clock period.
    Pass,
    /// The path misses setup.
    Fail {
        /// The shortest clock period at which this path would pass.
        min_clock_period: f64,
    },
}

/// Setup timing of one path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SetupCheck {
    /// Cumulative delay of the checked path.
    pub path_delay: f64,
    /// When the data settles at the capture flip-flop, setup time included.
    pub arrival_time: f64,
    /// The latest the data may settle.
    pub required_time: f64,
    /// `required_time - arrival_time`; negative on failure.
    pub slack: f64,
    /// Pass, or fail with the remedy.
    pub verdict: SetupVerdict,
}

impl SetupCheck {
    /// Returns `true` when the check passed.
    pub fn passed(&self) -> bool {
        matches!(self.verdict, SetupVerdict::Pass)
    }
}

/// Runs the setup check for a single path delay.
pub fn check_setup(path_delay: f64, constants: &TimingConstants) -> SetupCheck {
    let arrival_time = path_delay + constants.clk2q_max + constants.setup_time;
    let required_time = constants.clock_period + constants.clock_skew_max;
    let slack = required_time - arrival_time;
    let verdict = if slack >= 0.0 {
        SetupVerdict::Pass
    } else {
        SetupVerdict::Fail {
            min_clock_period: constants.clk2q_max + path_delay + constants.setup_time
                - constants.clock_skew_max,
        }
    };
    SetupCheck {
        path_delay,
        arrival_time,
        required_time,
        slack,
        verdict,
    }
}

/// Runs the setup check on every path, in order.
///
/// Fails with [`TimingError::AnalysisInputEmpty`] when `paths` is empty.
pub fn analyze_setup(
    paths: &[&Path<'_>],
    constants: &TimingConstants,
) -> Result<Vec<SetupCheck>, TimingError> {
    if paths.is_empty() {
        return Err(TimingError::AnalysisInputEmpty(CheckKind::Setup));
    }
    Ok(paths
        .iter()
        .map(|path| check_setup(path.delay(), constants))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passing_path() {
        let check = check_setup(5.0, &TimingConstants::default());
        assert_eq!(check.arrival_time, 18.0);
        assert_eq!(check.required_time, 53.0);
        assert_eq!(check.slack, 35.0);
        assert!(check.passed());
    }

    #[test]
    fn failing_path_reports_min_period() {
        let constants = TimingConstants {
            clock_period: 10.0,
            ..TimingConstants::default()
        };
        let check = check_setup(5.0, &constants);
        assert_eq!(check.required_time, 13.0);
        assert_eq!(check.slack, -5.0);
        assert_eq!(
            check.verdict,
            SetupVerdict::Fail {
                min_clock_period: 15.0
            }
        );
    }

    #[test]
    fn zero_slack_passes() {
        // 53 - (40 + 5 + 8) = 0
        let check = check_setup(40.0, &TimingConstants::default());
        assert_eq!(check.slack, 0.0);
        assert!(check.passed());
    }

    #[test]
    fn slack_shrinks_with_delay() {
        let constants = TimingConstants::default();
        let limit = constants.clock_period + constants.clock_skew_max
            - constants.clk2q_max
            - constants.setup_time;
        let mut previous = f64::INFINITY;
        for step in 0..100 {
            let delay = f64::from(step);
            let check = check_setup(delay, &constants);
            assert!(check.slack < previous);
            assert_eq!(check.passed(), delay <= limit);
            previous = check.slack;
        }
    }

    #[test]
    fn empty_input_is_an_error() {
        let err = analyze_setup(&[], &TimingConstants::default()).unwrap_err();
        assert!(matches!(err, TimingError::AnalysisInputEmpty(CheckKind::Setup)));
    }

    #[test]
    fn verdict_serializes_with_status_tag() {
        let json = serde_json::to_value(SetupVerdict::Fail {
            min_clock_period: 15.0,
        })
        .unwrap();
        assert_eq!(json["status"], "fail");
        assert_eq!(json["min_clock_period"], 15.0);
    }
}
