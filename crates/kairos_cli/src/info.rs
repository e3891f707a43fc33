//! `kairos info`: show what a netlist contains.

use std::path::Path;

use kairos_timing::render_circuit;

use crate::pipeline::{load_config, read_netlist};
use crate::{GlobalArgs, InfoArgs};

/// Runs the `kairos info` command.
pub fn run(args: &InfoArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let netlist = Path::new(&args.netlist);
    let config = load_config(global, netlist, |_| {})?;
    let circuit = read_netlist(netlist, &config)?;
    print!("{}", render_circuit(&circuit));
    Ok(0)
}
