//! `kairos analyze`: the full timing pipeline.
//!
//! 1. Resolve and load configuration, apply flag overrides
//! 2. Read the netlist
//! 3. Enumerate, validate and check paths
//! 4. Render the report and diagnostics

use std::path::Path;

use kairos_diagnostics::DiagnosticSink;
use kairos_timing::{analyze_circuit, render_report};

use crate::pipeline::{load_config, read_netlist, render_diagnostics};
use crate::{AnalyzeArgs, GlobalArgs, ReportFormat};

/// Runs the `kairos analyze` command.
///
/// Returns exit code 0 when every check passes, 1 on any violation.
pub fn run(args: &AnalyzeArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let netlist = Path::new(&args.netlist);
    let config = load_config(global, netlist, |config| {
        if let Some(n) = args.paths {
            config.report.paths = n;
        }
        if let Some(period) = args.clock_period {
            config.timing.clock_period = period;
        }
        if let Some(endpoints) = args.endpoints {
            config.enumeration.endpoints = endpoints.into();
        }
        if args.parallel {
            config.enumeration.parallel = true;
        }
    })?;

    let circuit = read_netlist(netlist, &config)?;

    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!(
            "   Analyzing {} ({} cells)",
            args.netlist,
            circuit.cells().len()
        );
    }

    let sink = DiagnosticSink::new();
    let report = analyze_circuit(&circuit, &config, &sink)?;

    match args.format {
        ReportFormat::Text => {
            if !global.quiet {
                print!("{}", render_report(&circuit, &report));
            }
        }
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    render_diagnostics(&sink, global);

    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!(
            "   Result: {} violation(s), {} warning(s)",
            report.violation_count(),
            sink.warning_count()
        );
    }

    if report.met && !sink.has_errors() {
        Ok(0)
    } else {
        Ok(1)
    }
}
