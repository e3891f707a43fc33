//! Cell types and cell instances.

use crate::error::NetlistError;
use crate::ids::{CellId, NetId};
use kairos_config::DelayTable;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of cell types the analysis understands.
///
/// Names follow the Yosys internal single-bit gate library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellType {
    /// `$_NOT_`
    #[serde(rename = "$_NOT_")]
    Not,
    /// `$_AND_`
    #[serde(rename = "$_AND_")]
    And,
    /// `$_OR_`
    #[serde(rename = "$_OR_")]
    Or,
    /// `$_XOR_`
    #[serde(rename = "$_XOR_")]
    Xor,
    /// `$_NAND_`
    #[serde(rename = "$_NAND_")]
    Nand,
    /// `$_NOR_`
    #[serde(rename = "$_NOR_")]
    Nor,
    /// `$_XNOR_`
    #[serde(rename = "$_XNOR_")]
    Xnor,
    /// `$_DFF_P_`, a positive-edge flip-flop. The only sequential type.
    #[serde(rename = "$_DFF_P_")]
    DffP,
}

impl CellType {
    /// Every recognized type.
    pub const ALL: [CellType; 8] = [
        CellType::Not,
        CellType::And,
        CellType::Or,
        CellType::Xor,
        CellType::Nand,
        CellType::Nor,
        CellType::Xnor,
        CellType::DffP,
    ];

    /// Returns the Yosys cell type name.
    pub fn yosys_name(self) -> &'static str {
        match self {
            CellType::Not => "$_NOT_",
            CellType::And => "$_AND_",
            CellType::Or => "$_OR_",
            CellType::Xor => "$_XOR_",
            CellType::Nand => "$_NAND_",
            CellType::Nor => "$_NOR_",
            CellType::Xnor => "$_XNOR_",
            CellType::DffP => "$_DFF_P_",
        }
    }

    /// Returns `true` for the flip-flop.
    pub fn is_sequential(self) -> bool {
        self == CellType::DffP
    }

    /// Looks up the propagation delay of this type.
    ///
    /// Returns `None` for the flip-flop, which bounds paths instead of
    /// adding to them.
    pub fn delay(self, table: &DelayTable) -> Option<f64> {
        match self {
            CellType::Not => Some(table.not),
            CellType::And => Some(table.and),
            CellType::Or => Some(table.or),
            CellType::Xor => Some(table.xor),
            CellType::Nand => Some(table.nand),
            CellType::Nor => Some(table.nor),
            CellType::Xnor => Some(table.xnor),
            CellType::DffP => None,
        }
    }
}

impl FromStr for CellType {
    type Err = NetlistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CellType::ALL
            .into_iter()
            .find(|t| t.yosys_name() == s)
            .ok_or_else(|| NetlistError::UnknownCellType(s.to_string()))
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.yosys_name())
    }
}

/// One gate or flip-flop instance.
///
/// For the flip-flop, `inputs` holds only the data net; the clock is stripped
/// when the netlist is read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    id: CellId,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    cell_type: CellType,
    inputs: Vec<NetId>,
    outputs: Vec<NetId>,
    delay: Option<f64>,
}

impl Cell {
    /// Builds a cell from a Yosys type name, failing with
    /// [`NetlistError::UnknownCellType`] for anything outside [`CellType`].
    pub fn new(
        id: CellId,
        cell_type: &str,
        inputs: Vec<NetId>,
        outputs: Vec<NetId>,
        delays: &DelayTable,
    ) -> Result<Self, NetlistError> {
        let cell_type = cell_type.parse::<CellType>()?;
        Ok(Self::with_type(id, cell_type, inputs, outputs, delays))
    }

    /// Builds a cell of an already-resolved type.
    pub fn with_type(
        id: CellId,
        cell_type: CellType,
        inputs: Vec<NetId>,
        outputs: Vec<NetId>,
        delays: &DelayTable,
    ) -> Self {
        Self {
            id,
            name: None,
            cell_type,
            inputs,
            outputs,
            delay: cell_type.delay(delays),
        }
    }

    /// Attaches the instance name used in reports.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns the cell's position in its circuit.
    pub fn id(&self) -> CellId {
        self.id
    }

    /// Returns the instance name, if the netlist provided one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the cell type.
    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }

    /// Returns the nets feeding the cell, in port order.
    pub fn inputs(&self) -> &[NetId] {
        &self.inputs
    }

    /// Returns the nets driven by the cell, in port order.
    pub fn outputs(&self) -> &[NetId] {
        &self.outputs
    }

    /// Returns the propagation delay, `None` for the flip-flop.
    pub fn delay(&self) -> Option<f64> {
        self.delay
    }

    /// Returns `true` if this cell is a flip-flop.
    pub fn is_sequential(&self) -> bool {
        self.cell_type.is_sequential()
    }

    /// Returns `true` if `net` is one of this cell's outputs.
    pub fn drives(&self, net: NetId) -> bool {
        self.outputs.contains(&net)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Cell '{}'", self.cell_type)?;
        if let Some(name) = &self.name {
            write!(f, " {name}")?;
        }
        write!(f, " in={:?} out={:?}", raw(&self.inputs), raw(&self.outputs))?;
        match self.delay {
            Some(delay) => write!(f, " delay={delay}>"),
            None => write!(f, " delay=none>"),
        }
    }
}

fn raw(nets: &[NetId]) -> Vec<u32> {
    nets.iter().map(|n| n.as_raw()).collect()
}
