//! Timing report types and text rendering.

use crate::enumerate::EnumerationStats;
use crate::hold::{HoldCheck, HoldVerdict};
use crate::path::Path;
use crate::propagate::ArrivalWindow;
use crate::setup::{SetupCheck, SetupVerdict};
use kairos_netlist::{CellType, Circuit};
use serde::Serialize;
use std::fmt::Write;

/// The result of a full analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct TimingReport {
    /// Number of enumerated paths.
    pub path_count: usize,
    /// Enumeration counters.
    pub enumeration: EnumerationStats,
    /// Setup checks on the longest paths, worst first.
    pub setup: Vec<SetupEntry>,
    /// Hold checks on the shortest paths, worst first.
    pub hold: Vec<HoldEntry>,
    /// Smallest setup slack, if any path was checked.
    pub worst_setup_slack: Option<f64>,
    /// Smallest hold slack, if any path was checked.
    pub worst_hold_slack: Option<f64>,
    /// Propagated arrival extremes over the reached capture points.
    pub arrival_window: Option<ArrivalWindow>,
    /// `true` when no check failed.
    pub met: bool,
}

impl TimingReport {
    /// Returns the number of failed setup and hold checks.
    pub fn violation_count(&self) -> usize {
        self.setup.iter().filter(|e| !e.check.passed()).count()
            + self.hold.iter().filter(|e| !e.check.passed()).count()
    }
}

/// A checked path with its setup result.
#[derive(Debug, Clone, Serialize)]
pub struct SetupEntry {
    /// The path.
    pub path: ReportedPath,
    /// Its setup timing.
    pub check: SetupCheck,
}

/// A checked path with its hold result.
#[derive(Debug, Clone, Serialize)]
pub struct HoldEntry {
    /// The path.
    pub path: ReportedPath,
    /// Its hold timing.
    pub check: HoldCheck,
}

/// A path resolved to names, detached from the circuit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportedPath {
    /// Where the path starts.
    pub launch: String,
    /// Where the path ends.
    pub capture: String,
    /// Cumulative delay.
    pub delay: f64,
    /// Each traversed cell, launch first.
    pub elements: Vec<PathElement>,
}

/// One cell along a reported path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathElement {
    /// Cell type.
    pub cell: CellType,
    /// Instance name, when the netlist has one.
    pub instance: Option<String>,
    /// Net the path enters on.
    pub input_net: String,
    /// Net the path leaves on.
    pub output_net: String,
    /// This cell's delay.
    pub delay: f64,
    /// Delay from launch up to and including this cell.
    pub cumulative: f64,
}

impl ReportedPath {
    /// Resolves `path` against `circuit`.
    pub fn new(circuit: &Circuit, path: &Path<'_>) -> Self {
        let mut cumulative = 0.0;
        let elements = path
            .hops()
            .iter()
            .map(|hop| {
                cumulative += hop.delay();
                PathElement {
                    cell: hop.cell().cell_type(),
                    instance: hop.cell().name().map(str::to_string),
                    input_net: circuit.net_label(hop.input_net()),
                    output_net: circuit.net_label(hop.output_net()),
                    delay: hop.delay(),
                    cumulative,
                }
            })
            .collect();
        Self {
            launch: path.launch().describe(circuit),
            capture: path.capture().describe(circuit),
            delay: path.delay(),
            elements,
        }
    }
}

/// Renders one path as a table of its cells.
pub fn render_path(circuit: &Circuit, path: &Path<'_>) -> String {
    let mut out = String::new();
    write_path(&mut out, &ReportedPath::new(circuit, path), "");
    out
}

fn write_path(out: &mut String, path: &ReportedPath, indent: &str) {
    let _ = writeln!(out, "{indent}{} -> {}", path.launch, path.capture);
    if path.elements.is_empty() {
        let _ = writeln!(out, "{indent}  (direct connection)");
    } else {
        let _ = writeln!(
            out,
            "{indent}  {:<8} {:<12} {:<12} {:<12} {:>8} {:>8}",
            "cell", "instance", "from", "to", "incr", "total"
        );
        for e in &path.elements {
            let _ = writeln!(
                out,
                "{indent}  {:<8} {:<12} {:<12} {:<12} {:>8.3} {:>8.3}",
                e.cell.yosys_name(),
                e.instance.as_deref().unwrap_or("-"),
                e.input_net,
                e.output_net,
                e.delay,
                e.cumulative
            );
        }
    }
    let _ = writeln!(out, "{indent}  path delay {:.3}", path.delay);
}

/// Renders every path on one line: index, delay and the net chain.
pub fn render_paths(circuit: &Circuit, paths: &[Path<'_>]) -> String {
    let mut out = String::new();
    for (index, path) in paths.iter().enumerate() {
        let mut chain = circuit.net_label(path.launch().net());
        for hop in path.hops() {
            let _ = write!(
                chain,
                " -[{}]-> {}",
                hop.cell().cell_type(),
                circuit.net_label(hop.output_net())
            );
        }
        let _ = writeln!(out, "{index:>4}  {:>8.3}  {chain}", path.delay());
    }
    let _ = writeln!(out, "{} paths", paths.len());
    out
}

/// Renders the setup and hold sections of a report.
pub fn render_report(circuit: &Circuit, report: &TimingReport) -> String {
    let mut out = String::new();
    let registers = circuit.registers().count();
    let _ = writeln!(out, "Timing report");
    let _ = writeln!(
        out,
        "  circuit: {} cells ({} registers), {} inputs, {} outputs",
        circuit.cells().len(),
        registers,
        circuit.primary_inputs().len(),
        circuit.primary_outputs().len()
    );
    let _ = write!(out, "  paths:   {} enumerated", report.path_count);
    if report.enumeration.dropped > 0 {
        let _ = write!(out, " ({} dropped at undriven nets)", report.enumeration.dropped);
    }
    out.push('\n');
    if let Some(window) = report.arrival_window {
        let _ = writeln!(
            out,
            "  arrival: earliest {:.3}, latest {:.3}",
            window.earliest, window.latest
        );
    }

    let _ = writeln!(out, "\nSetup (longest paths)");
    if report.setup.is_empty() {
        let _ = writeln!(out, "  no paths");
    }
    for (i, entry) in report.setup.iter().enumerate() {
        let _ = write!(out, "  [{i}] ");
        write_path(&mut out, &entry.path, "  ");
        let c = &entry.check;
        write_timing(&mut out, c.arrival_time, c.required_time, c.slack);
        match c.verdict {
            SetupVerdict::Pass => {
                let _ = writeln!(out, "      PASS");
            }
            SetupVerdict::Fail { min_clock_period } => {
                let _ = writeln!(out, "      FAIL (minimum clock period {min_clock_period:.3})");
            }
        }
    }

    let _ = writeln!(out, "\nHold (shortest paths)");
    if report.hold.is_empty() {
        let _ = writeln!(out, "  no paths");
    }
    for (i, entry) in report.hold.iter().enumerate() {
        let _ = write!(out, "  [{i}] ");
        write_path(&mut out, &entry.path, "  ");
        let c = &entry.check;
        write_timing(&mut out, c.arrival_time, c.required_time, c.slack);
        let verdict = match c.verdict {
            HoldVerdict::Pass => "PASS",
            HoldVerdict::Fail => "FAIL",
        };
        let _ = writeln!(out, "      {verdict}");
    }

    let _ = writeln!(
        out,
        "\n{}",
        if report.met {
            "timing met".to_string()
        } else {
            format!("timing NOT met: {} violations", report.violation_count())
        }
    );
    out
}

fn write_timing(out: &mut String, arrival: f64, required: f64, slack: f64) {
    let _ = writeln!(out, "      arrival  {arrival:>10.3}");
    let _ = writeln!(out, "      required {required:>10.3}");
    let _ = writeln!(out, "      slack    {slack:>10.3}");
}

/// Lists a circuit's I/O, registers and cells.
pub fn render_circuit(circuit: &Circuit) -> String {
    let mut out = String::new();
    let labels = |nets: &[kairos_netlist::NetId]| {
        nets.iter()
            .map(|&n| circuit.net_label(n))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let _ = writeln!(out, "inputs:  {}", labels(circuit.primary_inputs()));
    let _ = writeln!(out, "outputs: {}", labels(circuit.primary_outputs()));
    if !circuit.clock_nets().is_empty() {
        let _ = writeln!(out, "clocks:  {}", labels(circuit.clock_nets()));
    }
    let _ = writeln!(
        out,
        "cells:   {} ({} registers)",
        circuit.cells().len(),
        circuit.registers().count()
    );
    for cell in circuit.cells() {
        let _ = writeln!(out, "  {:>4}  {cell}", cell.id().as_raw());
    }
    let _ = writeln!(out, "nets:    {} named", circuit.net_names().len());
    for (net, name) in circuit.net_names() {
        let _ = writeln!(out, "  {:>4}  {name}", net.as_raw());
    }
    out
}
