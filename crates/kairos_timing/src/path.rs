//! Timing paths: chains of combinational hops between two boundaries.

use crate::error::{PortSide, TimingError};
use kairos_netlist::{Cell, CellId, Circuit, NetId};
use serde::Serialize;
use std::fmt;

/// One traversed cell: the input the path enters through and the output it
/// leaves on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathHop<'c> {
    cell: &'c Cell,
    input_net: NetId,
    output_net: NetId,
}

impl<'c> PathHop<'c> {
    /// Creates a hop, checking that both nets are ports of `cell`.
    pub fn new(cell: &'c Cell, input_net: NetId, output_net: NetId) -> Result<Self, TimingError> {
        if !cell.inputs().contains(&input_net) {
            return Err(invalid_hop(cell, input_net, PortSide::Input));
        }
        if !cell.outputs().contains(&output_net) {
            return Err(invalid_hop(cell, output_net, PortSide::Output));
        }
        Ok(Self {
            cell,
            input_net,
            output_net,
        })
    }

    /// Returns the traversed cell.
    pub fn cell(&self) -> &'c Cell {
        self.cell
    }

    /// Returns the net the path enters the cell through.
    pub fn input_net(&self) -> NetId {
        self.input_net
    }

    /// Returns the net the path leaves the cell on.
    pub fn output_net(&self) -> NetId {
        self.output_net
    }

    /// Returns the cell's delay; zero for a cell without one.
    pub fn delay(&self) -> f64 {
        self.cell.delay().unwrap_or(0.0)
    }
}

fn invalid_hop(cell: &Cell, net: NetId, side: PortSide) -> TimingError {
    TimingError::InvalidPathHop {
        cell: cell.id(),
        cell_type: cell.cell_type(),
        net,
        side,
    }
}

/// Where a path starts or ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Boundary {
    /// A primary input net (launch).
    PrimaryInput {
        /// The input net.
        net: NetId,
    },
    /// The output of a flip-flop (launch).
    RegisterOutput {
        /// The flip-flop.
        cell: CellId,
        /// Its output net.
        net: NetId,
    },
    /// A primary output net (capture).
    PrimaryOutput {
        /// The output net.
        net: NetId,
    },
    /// The data input of a flip-flop (capture).
    RegisterInput {
        /// The flip-flop.
        cell: CellId,
        /// Its data net.
        net: NetId,
    },
}

impl Boundary {
    /// Returns the boundary net.
    pub fn net(&self) -> NetId {
        match *self {
            Boundary::PrimaryInput { net }
            | Boundary::RegisterOutput { net, .. }
            | Boundary::PrimaryOutput { net }
            | Boundary::RegisterInput { net, .. } => net,
        }
    }

    /// Describes the boundary with names from `circuit`.
    pub fn describe(&self, circuit: &Circuit) -> String {
        match *self {
            Boundary::PrimaryInput { net } => {
                format!("primary input {}", circuit.net_label(net))
            }
            Boundary::PrimaryOutput { net } => {
                format!("primary output {}", circuit.net_label(net))
            }
            Boundary::RegisterOutput { cell, .. } => {
                format!("register {} output", register_label(circuit, cell))
            }
            Boundary::RegisterInput { cell, .. } => {
                format!("register {} input", register_label(circuit, cell))
            }
        }
    }
}

fn register_label(circuit: &Circuit, cell: CellId) -> String {
    match circuit.cell(cell).name() {
        Some(name) => name.to_string(),
        None => format!("#{cell}"),
    }
}

/// A combinational path, read from launch to capture.
///
/// Produced by the enumerator and read-only afterwards. An empty path is a
/// direct wire between the two boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct Path<'c> {
    launch: Boundary,
    capture: Boundary,
    hops: Vec<PathHop<'c>>,
}

impl<'c> Path<'c> {
    /// Creates a path from hops in launch-to-capture order.
    ///
    /// The structural rules are checked by [`validate_paths`](crate::validate_paths),
    /// not here.
    pub fn new(launch: Boundary, capture: Boundary, hops: Vec<PathHop<'c>>) -> Self {
        Self {
            launch,
            capture,
            hops,
        }
    }

    /// Returns the launch boundary.
    pub fn launch(&self) -> Boundary {
        self.launch
    }

    /// Returns the capture boundary.
    pub fn capture(&self) -> Boundary {
        self.capture
    }

    /// Returns the hops in launch-to-capture order.
    pub fn hops(&self) -> &[PathHop<'c>] {
        &self.hops
    }

    /// Returns the number of hops.
    pub fn len(&self) -> usize {
        self.hops.len()
    }

    /// Returns `true` for a direct wire with no logic.
    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    /// Returns the cumulative delay of every hop; zero for an empty path.
    pub fn delay(&self) -> f64 {
        // Folding from +0.0: `Sum for f64` starts at -0.0.
        self.hops.iter().map(PathHop::delay).fold(0.0, |acc, d| acc + d)
    }
}

impl fmt::Display for Path<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.launch.net())?;
        for hop in &self.hops {
            write!(f, " -[{}]-> {}", hop.cell.cell_type(), hop.output_net)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kairos_config::DelayTable;
    use kairos_netlist::CellType;

    fn chain() -> Circuit {
        let mut b = Circuit::builder(DelayTable::default());
        let a = b.input("a");
        let n = b.net("n");
        let y = b.net("y");
        b.gate(CellType::Not, &[a], &[n]);
        b.gate(CellType::Xor, &[n, a], &[y]);
        b.output(y);
        b.build().unwrap()
    }

    #[test]
    fn hop_accepts_own_ports() {
        let circuit = chain();
        let xor = &circuit.cells()[1];
        let hop = PathHop::new(xor, xor.inputs()[1], xor.outputs()[0]).unwrap();
        assert_eq!(hop.delay(), 12.0);
        assert_eq!(hop.cell().id(), CellId::from_raw(1));
    }

    #[test]
    fn hop_rejects_foreign_input() {
        let circuit = chain();
        let not = &circuit.cells()[0];
        let err = PathHop::new(not, not.outputs()[0], not.outputs()[0]).unwrap_err();
        assert!(matches!(
            err,
            TimingError::InvalidPathHop {
                side: PortSide::Input,
                ..
            }
        ));
    }

    #[test]
    fn hop_rejects_foreign_output() {
        let circuit = chain();
        let not = &circuit.cells()[0];
        let err = PathHop::new(not, not.inputs()[0], not.inputs()[0]).unwrap_err();
        assert!(matches!(
            err,
            TimingError::InvalidPathHop {
                side: PortSide::Output,
                ..
            }
        ));
    }

    #[test]
    fn delay_is_additive() {
        let circuit = chain();
        let (not, xor) = (&circuit.cells()[0], &circuit.cells()[1]);
        let hops = vec![
            PathHop::new(not, not.inputs()[0], not.outputs()[0]).unwrap(),
            PathHop::new(xor, xor.inputs()[0], xor.outputs()[0]).unwrap(),
        ];
        let path = Path::new(
            Boundary::PrimaryInput { net: not.inputs()[0] },
            Boundary::PrimaryOutput { net: xor.outputs()[0] },
            hops,
        );
        assert_eq!(path.len(), 2);
        assert_eq!(path.delay(), 17.0);
        assert_eq!(path.to_string(), "2 -[$_NOT_]-> 3 -[$_XOR_]-> 4");
    }

    #[test]
    fn empty_path_has_zero_delay() {
        let net = NetId::from_raw(2);
        let path = Path::new(
            Boundary::PrimaryInput { net },
            Boundary::PrimaryOutput { net },
            Vec::new(),
        );
        assert!(path.is_empty());
        assert_eq!(path.delay(), 0.0);
        assert!(path.delay().is_sign_positive());
    }

    #[test]
    fn boundary_descriptions() {
        let circuit = chain();
        let a = circuit.primary_inputs()[0];
        assert_eq!(
            Boundary::PrimaryInput { net: a }.describe(&circuit),
            "primary input a"
        );
        let reg = Boundary::RegisterOutput {
            cell: CellId::from_raw(0),
            net: a,
        };
        assert_eq!(reg.describe(&circuit), "register #0 output");
        assert_eq!(reg.net(), a);
    }
}
