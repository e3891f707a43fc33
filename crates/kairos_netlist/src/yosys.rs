//! Reader for Yosys `write_json` netlists.
//!
//! Only the top module is read. Cells must already be mapped to the internal
//! single-bit gate library (`techmap; abc -g ...` or `synth -noabc` followed
//! by `dfflegalize`), and the flip-flop clock port `C` is stripped from the
//! cell inputs and from the primary inputs.

use crate::cell::{Cell, CellType};
use crate::circuit::Circuit;
use crate::error::NetlistError;
use crate::ids::{CellId, NetId};
use indexmap::IndexMap;
use kairos_config::DelayTable;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Name of the flip-flop clock port.
const CLOCK_PORT: &str = "C";

#[derive(Debug, Deserialize)]
struct YosysDesign {
    #[serde(default)]
    modules: IndexMap<String, YosysModule>,
}

#[derive(Debug, Deserialize)]
struct YosysModule {
    #[serde(default)]
    attributes: IndexMap<String, serde_json::Value>,
    #[serde(default)]
    ports: IndexMap<String, YosysPort>,
    #[serde(default)]
    cells: IndexMap<String, YosysCell>,
    #[serde(default)]
    netnames: IndexMap<String, YosysNetname>,
}

#[derive(Debug, Deserialize)]
struct YosysPort {
    direction: String,
    #[serde(default)]
    bits: Vec<Bit>,
}

#[derive(Debug, Deserialize)]
struct YosysCell {
    #[serde(rename = "type")]
    cell_type: String,
    #[serde(default)]
    port_directions: IndexMap<String, String>,
    #[serde(default)]
    connections: IndexMap<String, Vec<Bit>>,
}

#[derive(Debug, Deserialize)]
struct YosysNetname {
    #[serde(default)]
    hide_name: u8,
    #[serde(default)]
    bits: Vec<Bit>,
}

/// A netlist bit: a net number, or a constant such as `"0"` or `"x"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Bit {
    Net(u32),
    #[allow(dead_code)]
    Const(String),
}

impl Bit {
    fn net(&self) -> Option<NetId> {
        match self {
            Bit::Net(n) => Some(NetId::from_raw(*n)),
            Bit::Const(_) => None,
        }
    }
}

fn nets(bits: &[Bit]) -> impl Iterator<Item = NetId> + '_ {
    bits.iter().filter_map(Bit::net)
}

/// Reads a Yosys JSON netlist from a file.
pub fn read_yosys_json(path: &Path, delays: &DelayTable) -> Result<Circuit, NetlistError> {
    let source = std::fs::read_to_string(path)?;
    parse_yosys_json(&source, delays)
}

/// Parses a Yosys JSON netlist held in memory.
pub fn parse_yosys_json(source: &str, delays: &DelayTable) -> Result<Circuit, NetlistError> {
    let design: YosysDesign = serde_json::from_str(source)?;
    let (top_name, module) = select_top(design)?;

    let mut cells = Vec::with_capacity(module.cells.len());
    let mut clock_nets: Vec<NetId> = Vec::new();

    for (instance, raw) in &module.cells {
        let cell_type = raw.cell_type.parse::<CellType>()?;
        let mut inputs = Vec::new();
        let mut outputs = Vec::new();

        for (port, bits) in &raw.connections {
            if !is_input_port(raw, cell_type, port) {
                outputs.extend(nets(bits));
            } else if cell_type.is_sequential() && port == CLOCK_PORT {
                for clock in nets(bits) {
                    if !clock_nets.contains(&clock) {
                        clock_nets.push(clock);
                    }
                }
            } else {
                inputs.extend(nets(bits));
            }
        }

        let id = CellId::from_raw(cells.len() as u32);
        cells.push(Cell::with_type(id, cell_type, inputs, outputs, delays).named(instance.clone()));
    }

    let mut primary_inputs = Vec::new();
    let mut primary_outputs = Vec::new();
    for port in module.ports.values() {
        if port.direction == "input" {
            primary_inputs.extend(nets(&port.bits).filter(|n| !clock_nets.contains(n)));
        } else {
            primary_outputs.extend(nets(&port.bits));
        }
    }

    let net_names = collect_net_names(&module.netnames);

    tracing::debug!(
        module = %top_name,
        cells = cells.len(),
        inputs = primary_inputs.len(),
        outputs = primary_outputs.len(),
        clocks = clock_nets.len(),
        "read yosys netlist"
    );
    if clock_nets.len() > 1 {
        tracing::warn!(
            clocks = clock_nets.len(),
            "netlist has several clock nets; they are analyzed as one domain"
        );
    }

    Ok(Circuit::new(cells, primary_inputs, primary_outputs, net_names)?.with_clock_nets(clock_nets))
}

/// Picks the module marked `top`, or the only module.
fn select_top(design: YosysDesign) -> Result<(String, YosysModule), NetlistError> {
    let count = design.modules.len();
    if count == 0 {
        return Err(NetlistError::MalformedNetlist(
            "netlist contains no modules".to_string(),
        ));
    }
    if count == 1 {
        return design
            .modules
            .into_iter()
            .next()
            .ok_or_else(|| NetlistError::MalformedNetlist("netlist contains no modules".into()));
    }

    let mut tops: Vec<_> = design
        .modules
        .into_iter()
        .filter(|(_, m)| m.attributes.get("top").is_some_and(is_truthy))
        .collect();
    match tops.len() {
        1 => Ok(tops.remove(0)),
        0 => Err(NetlistError::MalformedNetlist(format!(
            "{count} modules and none is marked as top"
        ))),
        n => Err(NetlistError::MalformedNetlist(format!(
            "{n} modules are marked as top"
        ))),
    }
}

/// Yosys writes attribute values as binary strings (`"00000000000000000000000000000001"`).
fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::String(s) => s.chars().any(|c| c == '1'),
        serde_json::Value::Number(n) => n.as_u64().is_some_and(|n| n != 0),
        serde_json::Value::Bool(b) => *b,
        _ => false,
    }
}

fn is_input_port(cell: &YosysCell, cell_type: CellType, port: &str) -> bool {
    match cell.port_directions.get(port) {
        Some(direction) => direction == "input",
        // Older netlists omit port_directions; gate library outputs are Y and Q.
        None => match cell_type {
            CellType::DffP => port != "Q",
            _ => port != "Y",
        },
    }
}

/// Maps every named bit to `name` (1-bit nets) or `name[i]` (buses).
///
/// Names Yosys marks as hidden, and generated `$` names, only fill bits
/// that have no visible name.
fn collect_net_names(netnames: &IndexMap<String, YosysNetname>) -> BTreeMap<NetId, String> {
    let mut names = BTreeMap::new();
    for hidden in [false, true] {
        for (name, netname) in netnames {
            let generated = netname.hide_name != 0 || name.starts_with('$');
            if generated != hidden {
                continue;
            }
            let single = netname.bits.len() == 1;
            for (index, bit) in netname.bits.iter().enumerate() {
                let Some(net) = bit.net() else { continue };
                names.entry(net).or_insert_with(|| {
                    if single {
                        name.clone()
                    } else {
                        format!("{name}[{index}]")
                    }
                });
            }
        }
    }
    names
}
