//! The immutable circuit model and its builder.

use crate::cell::{Cell, CellType};
use crate::error::NetlistError;
use crate::ids::{CellId, NetId};
use kairos_config::DelayTable;
use std::collections::BTreeMap;

/// A complete gate-level netlist.
///
/// Immutable after construction. Every net is assumed to have at most one
/// driving cell; [`driver_of`](Self::driver_of) relies on that.
#[derive(Debug, Clone)]
pub struct Circuit {
    cells: Vec<Cell>,
    primary_inputs: Vec<NetId>,
    primary_outputs: Vec<NetId>,
    net_names: BTreeMap<NetId, String>,
    clock_nets: Vec<NetId>,
}

impl Circuit {
    /// Assembles a circuit from its parts.
    ///
    /// Fails with [`NetlistError::MalformedNetlist`] if a cell's ID does not
    /// match its position or a cell drives no net.
    pub fn new(
        cells: Vec<Cell>,
        primary_inputs: Vec<NetId>,
        primary_outputs: Vec<NetId>,
        net_names: BTreeMap<NetId, String>,
    ) -> Result<Self, NetlistError> {
        for (index, cell) in cells.iter().enumerate() {
            if cell.id().index() != index {
                return Err(NetlistError::MalformedNetlist(format!(
                    "cell {} is stored at position {index}",
                    cell.id()
                )));
            }
            if cell.outputs().is_empty() {
                return Err(NetlistError::MalformedNetlist(format!(
                    "cell {} ({}) drives no net",
                    cell.id(),
                    cell.cell_type()
                )));
            }
        }
        Ok(Self {
            cells,
            primary_inputs,
            primary_outputs,
            net_names,
            clock_nets: Vec::new(),
        })
    }

    /// Records the clock nets that were stripped from flip-flop inputs.
    pub fn with_clock_nets(mut self, clock_nets: Vec<NetId>) -> Self {
        self.clock_nets = clock_nets;
        self
    }

    /// Starts building a circuit programmatically.
    pub fn builder(delays: DelayTable) -> CircuitBuilder {
        CircuitBuilder::new(delays)
    }

    /// Returns all cells, indexed by [`CellId`].
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Returns the cell with the given ID.
    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.index()]
    }

    /// Returns the flip-flops.
    pub fn registers(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|c| c.is_sequential())
    }

    /// Returns the primary input nets, clock excluded.
    pub fn primary_inputs(&self) -> &[NetId] {
        &self.primary_inputs
    }

    /// Returns the primary output nets.
    pub fn primary_outputs(&self) -> &[NetId] {
        &self.primary_outputs
    }

    /// Returns the clock nets.
    pub fn clock_nets(&self) -> &[NetId] {
        &self.clock_nets
    }

    /// Returns `true` if `net` is a primary input.
    pub fn is_primary_input(&self, net: NetId) -> bool {
        self.primary_inputs.contains(&net)
    }

    /// Returns `true` if `net` is a primary output.
    pub fn is_primary_output(&self, net: NetId) -> bool {
        self.primary_outputs.contains(&net)
    }

    /// Returns the net-name side table.
    pub fn net_names(&self) -> &BTreeMap<NetId, String> {
        &self.net_names
    }

    /// Returns the name of `net`, if it has one.
    pub fn net_name(&self, net: NetId) -> Option<&str> {
        self.net_names.get(&net).map(String::as_str)
    }

    /// Returns a printable label for `net`: its name, or `net <id>`.
    pub fn net_label(&self, net: NetId) -> String {
        match self.net_name(net) {
            Some(name) => name.to_string(),
            None => format!("net {net}"),
        }
    }

    /// Finds the cell driving `net` by scanning every cell.
    pub fn driver_of(&self, net: NetId) -> Option<&Cell> {
        self.cells.iter().find(|c| c.drives(net))
    }
}

/// Incremental construction of a [`Circuit`].
///
/// Nets are numbered from 2 upward, leaving 0 and 1 free the way Yosys
/// reserves them for constants.
#[derive(Debug)]
pub struct CircuitBuilder {
    delays: DelayTable,
    next_net: u32,
    cells: Vec<Cell>,
    primary_inputs: Vec<NetId>,
    primary_outputs: Vec<NetId>,
    net_names: BTreeMap<NetId, String>,
    clock_nets: Vec<NetId>,
}

impl CircuitBuilder {
    /// Creates an empty builder that prices cells with `delays`.
    pub fn new(delays: DelayTable) -> Self {
        Self {
            delays,
            next_net: 2,
            cells: Vec::new(),
            primary_inputs: Vec::new(),
            primary_outputs: Vec::new(),
            net_names: BTreeMap::new(),
            clock_nets: Vec::new(),
        }
    }

    /// Allocates a named internal net.
    pub fn net(&mut self, name: &str) -> NetId {
        let id = NetId::from_raw(self.next_net);
        self.next_net += 1;
        self.net_names.insert(id, name.to_string());
        id
    }

    /// Allocates a named primary input net.
    pub fn input(&mut self, name: &str) -> NetId {
        let id = self.net(name);
        self.primary_inputs.push(id);
        id
    }

    /// Allocates a named clock net. It is not a primary input.
    pub fn clock(&mut self, name: &str) -> NetId {
        let id = self.net(name);
        self.clock_nets.push(id);
        id
    }

    /// Marks an existing net as a primary output.
    pub fn output(&mut self, net: NetId) -> &mut Self {
        self.primary_outputs.push(net);
        self
    }

    /// Adds a cell by Yosys type name.
    pub fn cell(
        &mut self,
        cell_type: &str,
        inputs: &[NetId],
        outputs: &[NetId],
    ) -> Result<CellId, NetlistError> {
        let cell_type = cell_type.parse::<CellType>()?;
        Ok(self.gate(cell_type, inputs, outputs))
    }

    /// Adds a cell of a known type.
    pub fn gate(&mut self, cell_type: CellType, inputs: &[NetId], outputs: &[NetId]) -> CellId {
        let id = CellId::from_raw(self.cells.len() as u32);
        self.cells.push(Cell::with_type(
            id,
            cell_type,
            inputs.to_vec(),
            outputs.to_vec(),
            &self.delays,
        ));
        id
    }

    /// Adds a flip-flop from `d` to `q`.
    pub fn dff(&mut self, d: NetId, q: NetId) -> CellId {
        self.gate(CellType::DffP, &[d], &[q])
    }

    /// Names the most recently added cell.
    pub fn name_last(&mut self, name: &str) -> &mut Self {
        if let Some(cell) = self.cells.pop() {
            self.cells.push(cell.named(name));
        }
        self
    }

    /// Finishes the circuit.
    pub fn build(self) -> Result<Circuit, NetlistError> {
        Ok(Circuit::new(
            self.cells,
            self.primary_inputs,
            self.primary_outputs,
            self.net_names,
        )?
        .with_clock_nets(self.clock_nets))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn and_circuit() -> (Circuit, NetId, NetId, NetId) {
        let mut b = Circuit::builder(DelayTable::default());
        let a = b.input("a");
        let c = b.input("b");
        let y = b.net("y");
        b.gate(CellType::And, &[a, c], &[y]);
        b.output(y);
        (b.build().unwrap(), a, c, y)
    }

    #[test]
    fn builder_allocates_from_two() {
        let (circuit, a, _, _) = and_circuit();
        assert_eq!(a.as_raw(), 2);
        assert_eq!(circuit.cells().len(), 1);
        assert_eq!(circuit.primary_inputs().len(), 2);
    }

    #[test]
    fn driver_lookup() {
        let (circuit, a, _, y) = and_circuit();
        let driver = circuit.driver_of(y).unwrap();
        assert_eq!(driver.cell_type(), CellType::And);
        assert!(circuit.driver_of(a).is_none());
        assert!(circuit.is_primary_input(a));
        assert!(circuit.is_primary_output(y));
    }

    #[test]
    fn net_labels() {
        let (circuit, a, _, _) = and_circuit();
        assert_eq!(circuit.net_label(a), "a");
        assert_eq!(circuit.net_label(NetId::from_raw(99)), "net 99");
    }

    #[test]
    fn clock_is_not_a_primary_input() {
        let mut b = Circuit::builder(DelayTable::default());
        let clk = b.clock("clk");
        let d = b.input("d");
        let q = b.net("q");
        b.dff(d, q);
        b.output(q);
        let circuit = b.build().unwrap();
        assert_eq!(circuit.clock_nets(), &[clk]);
        assert!(!circuit.is_primary_input(clk));
        assert_eq!(circuit.registers().count(), 1);
    }

    #[test]
    fn builder_rejects_unknown_type() {
        let mut b = Circuit::builder(DelayTable::default());
        let a = b.input("a");
        let y = b.net("y");
        assert!(matches!(
            b.cell("$_BUFFER_", &[a], &[y]),
            Err(NetlistError::UnknownCellType(_))
        ));
    }

    #[test]
    fn misplaced_cell_id_rejected() {
        let cell = Cell::with_type(
            CellId::from_raw(3),
            CellType::Not,
            vec![NetId::from_raw(2)],
            vec![NetId::from_raw(3)],
            &DelayTable::default(),
        );
        let err = Circuit::new(vec![cell], vec![], vec![], BTreeMap::new()).unwrap_err();
        assert!(matches!(err, NetlistError::MalformedNetlist(_)));
    }

    #[test]
    fn outputless_cell_rejected() {
        let cell = Cell::with_type(
            CellId::from_raw(0),
            CellType::Not,
            vec![NetId::from_raw(2)],
            vec![],
            &DelayTable::default(),
        );
        assert!(Circuit::new(vec![cell], vec![], vec![], BTreeMap::new()).is_err());
    }

    #[test]
    fn name_last_names_cell() {
        let mut b = Circuit::builder(DelayTable::default());
        let a = b.input("a");
        let y = b.net("y");
        b.gate(CellType::Not, &[a], &[y]);
        b.name_last("inv");
        let circuit = b.build().unwrap();
        assert_eq!(circuit.cells()[0].name(), Some("inv"));
    }
}
