//! The full analysis pipeline.
//!
//! Enumerates and validates every path, cross-checks the extremes against
//! arrival propagation, then runs setup checks on the longest paths and hold
//! checks on the shortest. Violations and soft problems are reported to the
//! [`DiagnosticSink`]; only structural errors abort.

use crate::enumerate::{enumerate_paths, enumerate_paths_parallel};
use crate::error::{CheckKind, TimingError};
use crate::hold::analyze_hold;
use crate::path::{Boundary, Path};
use crate::propagate::{propagate_arrivals, ArrivalWindow};
use crate::report::{HoldEntry, ReportedPath, SetupEntry, TimingReport};
use crate::select::{select_paths, Direction};
use crate::setup::{analyze_setup, SetupVerdict};
use crate::validate::validate_paths;
use kairos_config::KairosConfig;
use kairos_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};
use kairos_netlist::Circuit;
use std::collections::HashSet;

/// Runs enumeration, validation and both timing checks on `circuit`.
///
/// An analysis with no paths to check is reported as warning `W001` and
/// leaves its section empty. Each failed check is reported as `T001` (setup)
/// or `T002` (hold).
pub fn analyze_circuit(
    circuit: &Circuit,
    config: &KairosConfig,
    sink: &DiagnosticSink,
) -> Result<TimingReport, TimingError> {
    let endpoints = config.enumeration.endpoints;
    let enumeration = if config.enumeration.parallel {
        enumerate_paths_parallel(circuit, endpoints)?
    } else {
        enumerate_paths(circuit, endpoints)?
    };
    let paths = &enumeration.paths;
    validate_paths(paths)?;
    tracing::info!(
        paths = paths.len(),
        seeds = enumeration.stats.seeds,
        "enumerated and validated paths"
    );

    if enumeration.stats.dropped > 0 {
        sink.emit(dangling_paths(enumeration.stats.dropped));
    }

    let arrivals = propagate_arrivals(circuit)?;
    let arrival_window = arrivals.extremes(&reached_captures(paths));
    cross_check(arrival_window, ArrivalWindow::spanning(paths));

    let n = config.report.paths;
    let constants = &config.timing;

    let longest = select_paths(paths, n, Direction::Longest);
    let setup: Vec<SetupEntry> = match analyze_setup(&longest, constants) {
        Ok(checks) => longest
            .iter()
            .zip(checks)
            .map(|(path, check)| SetupEntry {
                path: ReportedPath::new(circuit, path),
                check,
            })
            .collect(),
        Err(TimingError::AnalysisInputEmpty(kind)) => {
            sink.emit(no_paths(kind));
            Vec::new()
        }
        Err(e) => return Err(e),
    };

    let shortest = select_paths(paths, n, Direction::Shortest);
    let hold: Vec<HoldEntry> = match analyze_hold(&shortest, constants) {
        Ok(checks) => shortest
            .iter()
            .zip(checks)
            .map(|(path, check)| HoldEntry {
                path: ReportedPath::new(circuit, path),
                check,
            })
            .collect(),
        Err(TimingError::AnalysisInputEmpty(kind)) => {
            sink.emit(no_paths(kind));
            Vec::new()
        }
        Err(e) => return Err(e),
    };

    for (i, entry) in setup.iter().enumerate() {
        if let SetupVerdict::Fail { min_clock_period } = entry.check.verdict {
            sink.emit(
                Diagnostic::warning(
                    DiagnosticCode::SETUP_VIOLATION,
                    format!(
                        "setup check failed on path {i} from {} to {} (slack {})",
                        entry.path.launch, entry.path.capture, entry.check.slack
                    ),
                )
                .with_note(format!(
                    "arrival {}, required {}",
                    entry.check.arrival_time, entry.check.required_time
                ))
                .with_help(format!("use a clock period of at least {min_clock_period}")),
            );
        }
    }
    for (i, entry) in hold.iter().enumerate() {
        if !entry.check.passed() {
            sink.emit(
                Diagnostic::warning(
                    DiagnosticCode::HOLD_VIOLATION,
                    format!(
                        "hold check failed on path {i} from {} to {} (slack {})",
                        entry.path.launch, entry.path.capture, entry.check.slack
                    ),
                )
                .with_note(format!(
                    "arrival {}, required {}",
                    entry.check.arrival_time, entry.check.required_time
                ))
                .with_help("add delay on the path or reduce clock skew"),
            );
        }
    }

    let worst_setup_slack = setup.iter().map(|e| e.check.slack).reduce(f64::min);
    let worst_hold_slack = hold.iter().map(|e| e.check.slack).reduce(f64::min);
    let met = setup.iter().all(|e| e.check.passed()) && hold.iter().all(|e| e.check.passed());
    tracing::info!(
        setup = setup.len(),
        hold = hold.len(),
        met,
        "timing checks complete"
    );

    Ok(TimingReport {
        path_count: paths.len(),
        enumeration: enumeration.stats,
        setup,
        hold,
        worst_setup_slack,
        worst_hold_slack,
        arrival_window,
        met,
    })
}

/// Distinct capture boundaries of `paths`, in first-seen order.
fn reached_captures(paths: &[Path<'_>]) -> Vec<Boundary> {
    let mut seen = HashSet::new();
    paths
        .iter()
        .map(Path::capture)
        .filter(|capture| seen.insert(*capture))
        .collect()
}

/// Compares the propagated window with the enumerated one; returns `false`
/// and logs a warning when either bound differs.
fn cross_check(propagated: Option<ArrivalWindow>, enumerated: Option<ArrivalWindow>) -> bool {
    match (propagated, enumerated) {
        (Some(propagated), Some(enumerated)) if !propagated.agrees_with(enumerated) => {
            tracing::warn!(
                propagated_earliest = propagated.earliest,
                propagated_latest = propagated.latest,
                enumerated_earliest = enumerated.earliest,
                enumerated_latest = enumerated.latest,
                "propagated arrival window disagrees with the enumerated paths"
            );
            false
        }
        (Some(_), None) | (None, Some(_)) => {
            tracing::warn!("only one of propagation and enumeration reached a capture point");
            false
        }
        _ => true,
    }
}

/// Warning `W002` for `dropped` partial paths abandoned at undriven nets.
pub fn dangling_paths(dropped: usize) -> Diagnostic {
    Diagnostic::warning(
        DiagnosticCode::DANGLING_NET,
        format!("{dropped} partial paths ended at undriven nets and were dropped"),
    )
    .with_help("check for unconnected cell inputs or constant drivers")
}

fn no_paths(kind: CheckKind) -> Diagnostic {
    Diagnostic::warning(
        DiagnosticCode::NO_PATHS,
        format!("no paths to check for {kind} analysis"),
    )
    .with_note("the circuit has no combinational path ending at a capture point")
}
