//! Error types for path enumeration and timing analysis.

use crate::validate::PathRule;
use kairos_netlist::{CellId, CellType, NetId};
use serde::Serialize;
use std::fmt;

/// Which side of a cell a net was expected on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortSide {
    /// One of the cell's inputs.
    Input,
    /// One of the cell's outputs.
    Output,
}

impl fmt::Display for PortSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortSide::Input => f.write_str("input"),
            PortSide::Output => f.write_str("output"),
        }
    }
}

/// The two timing checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckKind {
    /// Longest paths against the clock period.
    Setup,
    /// Shortest paths against the hold window.
    Hold,
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckKind::Setup => f.write_str("setup"),
            CheckKind::Hold => f.write_str("hold"),
        }
    }
}

/// Errors raised by path enumeration and analysis.
///
/// Everything except [`AnalysisInputEmpty`](Self::AnalysisInputEmpty) means
/// the circuit or the enumerator is broken and the run must stop.
#[derive(Debug, thiserror::Error)]
pub enum TimingError {
    /// A hop was built from a net that is not a port of its cell.
    #[error("net {net} is not an {side} of cell {cell} ({cell_type})")]
    InvalidPathHop {
        /// The hop's cell.
        cell: CellId,
        /// The type of that cell.
        cell_type: CellType,
        /// The offending net.
        net: NetId,
        /// The side the net should have been on.
        side: PortSide,
    },

    /// A completed path breaks a structural rule.
    #[error("path {index} violates the {rule} rule: {detail}")]
    InvalidPath {
        /// Position of the path in the enumerated set.
        index: usize,
        /// The broken rule.
        rule: PathRule,
        /// What exactly was wrong.
        detail: String,
    },

    /// An analyzer was handed no paths.
    #[error("no paths to check for {0} analysis")]
    AnalysisInputEmpty(CheckKind),

    /// The combinational logic contains a cycle.
    #[error("combinational loop through net {net} driven by cell {cell}")]
    CombinationalLoop {
        /// A net on the cycle.
        net: NetId,
        /// A cell on the cycle.
        cell: CellId,
    },
}
