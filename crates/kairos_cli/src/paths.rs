//! `kairos paths`: list every enumerated path.

use std::path::Path;

use kairos_diagnostics::DiagnosticSink;
use kairos_timing::{dangling_paths, enumerate_paths, render_path, render_paths, validate_paths};

use crate::pipeline::{load_config, read_netlist, render_diagnostics};
use crate::{GlobalArgs, PathsArgs};

/// Runs the `kairos paths` command.
///
/// Prints one line per path; with `--verbose` each path is followed by its
/// cell table.
pub fn run(args: &PathsArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let netlist = Path::new(&args.netlist);
    let config = load_config(global, netlist, |config| {
        if let Some(endpoints) = args.endpoints {
            config.enumeration.endpoints = endpoints.into();
        }
    })?;
    let circuit = read_netlist(netlist, &config)?;

    let enumeration = enumerate_paths(&circuit, config.enumeration.endpoints)?;
    validate_paths(&enumeration.paths)?;

    print!("{}", render_paths(&circuit, &enumeration.paths));
    if global.verbose {
        for (i, path) in enumeration.paths.iter().enumerate() {
            println!("\n[{i}] {}", render_path(&circuit, path));
        }
    }
    let sink = DiagnosticSink::new();
    if enumeration.stats.dropped > 0 {
        sink.emit(dangling_paths(enumeration.stats.dropped));
    }
    render_diagnostics(&sink, global);
    Ok(0)
}
