//! Gate-level circuit model and Yosys JSON netlist reader.
//!
//! A [`Circuit`] is an immutable collection of [`Cell`]s (Yosys internal gate
//! cells plus the positive-edge flip-flop) wired together by integer
//! [`NetId`]s, along with the primary input and output nets and a side table
//! of human-readable net names. Circuits come either from
//! [`read_yosys_json`] or from a [`CircuitBuilder`].

#![warn(missing_docs)]

pub mod cell;
pub mod circuit;
pub mod error;
pub mod ids;
pub mod yosys;

pub use cell::{Cell, CellType};
pub use circuit::{Circuit, CircuitBuilder};
pub use error::NetlistError;
pub use ids::{CellId, NetId};
pub use yosys::{parse_yosys_json, read_yosys_json};
