//! Linear-time arrival propagation.
//!
//! Cells are visited in topological order (Kahn's algorithm) and each net
//! gets the earliest and latest time a transition launched at time zero can
//! reach it. Primary inputs and flip-flop outputs are the sources. Nets with
//! no driver get no window, mirroring the enumerator dropping paths there,
//! so the extremes at an endpoint equal the shortest and longest enumerated
//! path delays.

use crate::error::TimingError;
use crate::path::{Boundary, Path};
use kairos_netlist::{Circuit, NetId};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};

/// Earliest and latest arrival at a net.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArrivalWindow {
    /// Delay of the fastest path reaching the net.
    pub earliest: f64,
    /// Delay of the slowest path reaching the net.
    pub latest: f64,
}

impl ArrivalWindow {
    /// The window of a source net.
    pub const ZERO: Self = Self {
        earliest: 0.0,
        latest: 0.0,
    };

    /// The shortest and longest delay among `paths`, or `None` if there are
    /// no paths.
    pub fn spanning(paths: &[Path<'_>]) -> Option<Self> {
        paths
            .iter()
            .map(|path| {
                let delay = path.delay();
                Self {
                    earliest: delay,
                    latest: delay,
                }
            })
            .reduce(Self::merge)
    }

    /// Returns `true` if both bounds match `other` within rounding error.
    pub fn agrees_with(self, other: Self) -> bool {
        const TOLERANCE: f64 = 1e-9;
        (self.earliest - other.earliest).abs() <= TOLERANCE
            && (self.latest - other.latest).abs() <= TOLERANCE
    }

    fn merge(self, other: Self) -> Self {
        Self {
            earliest: self.earliest.min(other.earliest),
            latest: self.latest.max(other.latest),
        }
    }

    fn delayed(self, delay: f64) -> Self {
        Self {
            earliest: self.earliest + delay,
            latest: self.latest + delay,
        }
    }
}

/// Arrival windows for every reachable net.
#[derive(Debug, Clone, Default)]
pub struct Arrivals {
    windows: HashMap<NetId, ArrivalWindow>,
}

impl Arrivals {
    /// Returns the window at `net`, or `None` if no source reaches it.
    pub fn at(&self, net: NetId) -> Option<ArrivalWindow> {
        self.windows.get(&net).copied()
    }

    /// Returns the number of nets with a window.
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Returns `true` if no net has a window.
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Merges the windows at the given capture points, skipping unreached
    /// ones.
    pub fn extremes(&self, endpoints: &[Boundary]) -> Option<ArrivalWindow> {
        endpoints
            .iter()
            .filter_map(|endpoint| self.at(endpoint.net()))
            .reduce(ArrivalWindow::merge)
    }
}

/// Propagates arrival windows through the combinational logic.
///
/// Fails with [`TimingError::CombinationalLoop`] if the combinational cells
/// cannot be ordered.
pub fn propagate_arrivals(circuit: &Circuit) -> Result<Arrivals, TimingError> {
    let cells = circuit.cells();
    let mut windows: HashMap<NetId, ArrivalWindow> = HashMap::new();
    for &net in circuit.primary_inputs() {
        windows.insert(net, ArrivalWindow::ZERO);
    }
    for register in circuit.registers() {
        for &net in register.outputs() {
            if !circuit.is_primary_input(net) {
                windows.insert(net, ArrivalWindow::ZERO);
            }
        }
    }

    let mut driver: HashMap<NetId, usize> = HashMap::new();
    for cell in cells.iter().filter(|c| !c.is_sequential()) {
        for &net in cell.outputs() {
            driver.entry(net).or_insert(cell.id().index());
        }
    }

    let mut pending = vec![0usize; cells.len()];
    let mut fanout: Vec<Vec<usize>> = vec![Vec::new(); cells.len()];
    for cell in cells.iter().filter(|c| !c.is_sequential()) {
        for &net in cell.inputs() {
            if circuit.is_primary_input(net) {
                continue;
            }
            if let Some(&source) = driver.get(&net) {
                fanout[source].push(cell.id().index());
                pending[cell.id().index()] += 1;
            }
        }
    }

    let mut ready: VecDeque<usize> = cells
        .iter()
        .filter(|c| !c.is_sequential() && pending[c.id().index()] == 0)
        .map(|c| c.id().index())
        .collect();
    let mut visited = 0usize;

    while let Some(index) = ready.pop_front() {
        visited += 1;
        let cell = &cells[index];
        let window = cell
            .inputs()
            .iter()
            .filter_map(|net| windows.get(net).copied())
            .reduce(ArrivalWindow::merge)
            .map(|w| w.delayed(cell.delay().unwrap_or(0.0)));
        if let Some(window) = window {
            for &net in cell.outputs() {
                if !circuit.is_primary_input(net) {
                    windows.insert(net, window);
                }
            }
        }
        for &next in &fanout[index] {
            pending[next] -= 1;
            if pending[next] == 0 {
                ready.push_back(next);
            }
        }
    }

    let combinational = cells.iter().filter(|c| !c.is_sequential()).count();
    if visited < combinational {
        if let Some(cell) = cells
            .iter()
            .find(|c| !c.is_sequential() && pending[c.id().index()] > 0)
        {
            return Err(TimingError::CombinationalLoop {
                net: cell.outputs()[0],
                cell: cell.id(),
            });
        }
    }

    tracing::debug!(cells = visited, nets = windows.len(), "propagated arrivals");
    Ok(Arrivals { windows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kairos_config::DelayTable;
    use kairos_netlist::CellType;

    #[test]
    fn reconvergent_fanout() {
        // a -> NOT -> n; (n, a) -> XOR -> y
        let mut b = Circuit::builder(DelayTable::default());
        let a = b.input("a");
        let n = b.net("n");
        let y = b.net("y");
        b.gate(CellType::Not, &[a], &[n]);
        b.gate(CellType::Xor, &[n, a], &[y]);
        b.output(y);
        let circuit = b.build().unwrap();

        let arrivals = propagate_arrivals(&circuit).unwrap();
        assert_eq!(arrivals.at(a), Some(ArrivalWindow::ZERO));
        assert_eq!(
            arrivals.at(n),
            Some(ArrivalWindow {
                earliest: 5.0,
                latest: 5.0
            })
        );
        assert_eq!(
            arrivals.at(y),
            Some(ArrivalWindow {
                earliest: 12.0,
                latest: 17.0
            })
        );
    }

    #[test]
    fn registers_restart_timing() {
        let mut b = Circuit::builder(DelayTable::default());
        let a = b.input("a");
        let d = b.net("d");
        let q = b.net("q");
        let y = b.net("y");
        b.gate(CellType::Nand, &[a, a], &[d]);
        b.dff(d, q);
        b.gate(CellType::Not, &[q], &[y]);
        b.output(y);
        let circuit = b.build().unwrap();

        let arrivals = propagate_arrivals(&circuit).unwrap();
        assert_eq!(arrivals.at(d).map(|w| w.latest), Some(13.0));
        assert_eq!(arrivals.at(y).map(|w| w.latest), Some(5.0));
        let endpoints = [Boundary::PrimaryOutput { net: y }];
        assert_eq!(
            arrivals.extremes(&endpoints),
            Some(ArrivalWindow {
                earliest: 5.0,
                latest: 5.0
            })
        );
    }

    #[test]
    fn window_spans_enumerated_paths() {
        let mut b = Circuit::builder(DelayTable::default());
        let a = b.input("a");
        let n = b.net("n");
        let y = b.net("y");
        b.gate(CellType::Not, &[a], &[n]);
        b.gate(CellType::Xor, &[n, a], &[y]);
        b.output(y);
        let circuit = b.build().unwrap();

        let paths = crate::enumerate_paths(&circuit, kairos_config::Endpoints::PrimaryOutputs)
            .unwrap()
            .paths;
        let spanned = ArrivalWindow::spanning(&paths).unwrap();
        assert_eq!((spanned.earliest, spanned.latest), (12.0, 17.0));
        assert!(spanned.agrees_with(arrivals_at_y(&circuit, y)));
        assert_eq!(ArrivalWindow::spanning(&[]), None);
    }

    fn arrivals_at_y(circuit: &Circuit, y: NetId) -> ArrivalWindow {
        propagate_arrivals(circuit).unwrap().at(y).unwrap()
    }

    #[test]
    fn disagreement_on_either_bound_is_detected() {
        let window = ArrivalWindow {
            earliest: 3.0,
            latest: 9.0,
        };
        assert!(window.agrees_with(window));
        assert!(!window.agrees_with(ArrivalWindow {
            earliest: 2.0,
            latest: 9.0
        }));
        assert!(!window.agrees_with(ArrivalWindow {
            earliest: 3.0,
            latest: 10.0
        }));
    }

    #[test]
    fn undriven_nets_have_no_window() {
        let mut b = Circuit::builder(DelayTable::default());
        let floating = b.net("floating");
        let y = b.net("y");
        b.gate(CellType::Not, &[floating], &[y]);
        b.output(y);
        let circuit = b.build().unwrap();

        let arrivals = propagate_arrivals(&circuit).unwrap();
        assert!(arrivals.is_empty());
        assert_eq!(arrivals.extremes(&[Boundary::PrimaryOutput { net: y }]), None);
    }

    #[test]
    fn loop_is_rejected() {
        let mut b = Circuit::builder(DelayTable::default());
        let a = b.input("a");
        let x = b.net("x");
        let y = b.net("y");
        b.gate(CellType::Nor, &[a, y], &[x]);
        b.gate(CellType::Not, &[x], &[y]);
        b.output(y);
        let circuit = b.build().unwrap();

        assert!(matches!(
            propagate_arrivals(&circuit),
            Err(TimingError::CombinationalLoop { .. })
        ));
    }
}
