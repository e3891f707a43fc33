//! Exhaustive backward enumeration of combinational paths.
//!
//! The search starts at each capture boundary and walks towards drivers with
//! an explicit LIFO work stack. A partial path stops growing when its open
//! end reaches a primary input or the output of a flip-flop.
//!
//! A primary output driven directly by a flip-flop carries no logic of its
//! own. With [`Endpoints::PrimaryOutputs`] the search crosses that register
//! and continues from its data input, so the logic feeding the register is
//! what gets timed. With [`Endpoints::OutputsAndRegisters`] register inputs
//! are seeded anyway and the register-to-output wire is kept as an empty
//! path.
//!
//! The number of paths is exponential in logic depth when fan-in reconverges.
//! [`propagate_arrivals`](crate::propagate_arrivals) gives the same extremes
//! in linear time.

use crate::error::TimingError;
use crate::path::{Boundary, Path, PathHop};
use kairos_config::Endpoints;
use kairos_netlist::{Circuit, NetId};
use rayon::prelude::*;
use serde::Serialize;

/// Counters collected during enumeration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EnumerationStats {
    /// Capture boundaries seeded into the search.
    pub seeds: usize,
    /// Completed paths.
    pub paths: usize,
    /// Partial paths abandoned at a net with no driver.
    pub dropped: usize,
    /// Largest work-stack size observed.
    pub peak_stack: usize,
}

impl EnumerationStats {
    fn merge(&mut self, other: EnumerationStats) {
        self.seeds += other.seeds;
        self.paths += other.paths;
        self.dropped += other.dropped;
        self.peak_stack = self.peak_stack.max(other.peak_stack);
    }
}

/// The result of enumerating a circuit.
#[derive(Debug, Clone)]
pub struct Enumeration<'c> {
    /// Every completed path, in discovery order.
    pub paths: Vec<Path<'c>>,
    /// Search counters.
    pub stats: EnumerationStats,
}

/// Lists the capture boundaries the search is seeded with, in seed order.
pub fn capture_points(circuit: &Circuit, endpoints: Endpoints) -> Vec<Boundary> {
    let mut seeds: Vec<Boundary> = circuit
        .primary_outputs()
        .iter()
        .map(|&net| Boundary::PrimaryOutput { net })
        .collect();
    if endpoints == Endpoints::OutputsAndRegisters {
        for register in circuit.registers() {
            for &net in register.inputs() {
                seeds.push(Boundary::RegisterInput {
                    cell: register.id(),
                    net,
                });
            }
        }
    }
    seeds
}

/// A partial path on the work stack.
///
/// `hops` is kept in capture-to-launch order so that prepending a hop is a
/// push; the open end is the last element.
#[derive(Debug, Clone)]
struct Frontier<'c> {
    capture: Boundary,
    open_net: NetId,
    hops: Vec<PathHop<'c>>,
    /// Whether a flip-flop driving the still-empty path may be crossed.
    crossable: bool,
}

impl<'c> Frontier<'c> {
    fn seed(capture: Boundary, endpoints: Endpoints) -> Self {
        Self {
            capture,
            open_net: capture.net(),
            hops: Vec::new(),
            crossable: endpoints == Endpoints::PrimaryOutputs
                && matches!(capture, Boundary::PrimaryOutput { .. }),
        }
    }

    fn complete(self, launch: Boundary) -> Path<'c> {
        let mut hops = self.hops;
        hops.reverse();
        Path::new(launch, self.capture, hops)
    }
}

/// Resolves the open end of one partial path: either completes it, drops it,
/// or pushes one extension per input of the driving cell.
fn expand<'c>(
    circuit: &'c Circuit,
    item: Frontier<'c>,
    stack: &mut Vec<Frontier<'c>>,
    paths: &mut Vec<Path<'c>>,
    stats: &mut EnumerationStats,
) -> Result<(), TimingError> {
    let net = item.open_net;

    if circuit.is_primary_input(net) {
        paths.push(item.complete(Boundary::PrimaryInput { net }));
        stats.paths += 1;
        return Ok(());
    }

    let Some(driver) = circuit.driver_of(net) else {
        tracing::trace!(net = %net, "partial path dropped at undriven net");
        stats.dropped += 1;
        return Ok(());
    };

    if driver.is_sequential() {
        if item.hops.is_empty() && item.crossable {
            // Register straight into the output: time the logic feeding the
            // register instead, captured at its data input.
            for &input in driver.inputs().iter().rev() {
                stack.push(Frontier {
                    capture: Boundary::RegisterInput {
                        cell: driver.id(),
                        net: input,
                    },
                    open_net: input,
                    hops: Vec::new(),
                    crossable: false,
                });
            }
            return Ok(());
        }
        // The launching flip-flop bounds the path and never becomes a hop.
        paths.push(item.complete(Boundary::RegisterOutput {
            cell: driver.id(),
            net,
        }));
        stats.paths += 1;
        return Ok(());
    }

    if item.hops.iter().any(|hop| hop.cell().id() == driver.id()) {
        return Err(TimingError::CombinationalLoop {
            net,
            cell: driver.id(),
        });
    }

    let output = driver.outputs()[0];
    // Reverse push order so the first input is explored first.
    for &input in driver.inputs().iter().rev() {
        let mut hops = item.hops.clone();
        hops.push(PathHop::new(driver, input, output)?);
        stack.push(Frontier {
            capture: item.capture,
            open_net: input,
            hops,
            crossable: false,
        });
    }
    Ok(())
}

fn drain<'c>(
    circuit: &'c Circuit,
    mut stack: Vec<Frontier<'c>>,
    paths: &mut Vec<Path<'c>>,
    stats: &mut EnumerationStats,
) -> Result<(), TimingError> {
    stats.peak_stack = stats.peak_stack.max(stack.len());
    while let Some(item) = stack.pop() {
        expand(circuit, item, &mut stack, paths, stats)?;
        stats.peak_stack = stats.peak_stack.max(stack.len());
    }
    Ok(())
}

/// Enumerates every path ending at the selected capture points.
///
/// All seeds share one work stack. Seeds are pushed in reverse so the first
/// capture point is searched first, and each seed's subtree is exhausted
/// before the next seed is popped.
pub fn enumerate_paths(
    circuit: &Circuit,
    endpoints: Endpoints,
) -> Result<Enumeration<'_>, TimingError> {
    let seeds = capture_points(circuit, endpoints);
    let mut stats = EnumerationStats {
        seeds: seeds.len(),
        ..EnumerationStats::default()
    };
    let stack: Vec<Frontier<'_>> = seeds
        .iter()
        .rev()
        .map(|&seed| Frontier::seed(seed, endpoints))
        .collect();
    let mut paths = Vec::new();
    drain(circuit, stack, &mut paths, &mut stats)?;

    tracing::debug!(
        seeds = stats.seeds,
        paths = stats.paths,
        dropped = stats.dropped,
        peak_stack = stats.peak_stack,
        "enumerated paths"
    );
    Ok(Enumeration { paths, stats })
}

/// Enumerates paths with one search per capture point on the rayon pool.
///
/// Per-seed results are concatenated in seed order, which reproduces
/// [`enumerate_paths`] exactly: same paths, same order. `peak_stack` is the
/// largest per-seed stack.
pub fn enumerate_paths_parallel<'c>(
    circuit: &'c Circuit,
    endpoints: Endpoints,
) -> Result<Enumeration<'c>, TimingError> {
    let seeds = capture_points(circuit, endpoints);
    let per_seed: Vec<(Vec<Path<'c>>, EnumerationStats)> = seeds
        .par_iter()
        .map(|&seed| -> Result<(Vec<Path<'c>>, EnumerationStats), TimingError> {
            let mut stats = EnumerationStats {
                seeds: 1,
                ..EnumerationStats::default()
            };
            let mut paths = Vec::new();
            let frontier = Frontier::seed(seed, endpoints);
            drain(circuit, vec![frontier], &mut paths, &mut stats)?;
            tracing::debug!(net = %seed.net(), paths = paths.len(), "searched capture point");
            Ok((paths, stats))
        })
        .collect::<Result<_, _>>()?;

    let mut stats = EnumerationStats::default();
    let mut paths = Vec::with_capacity(per_seed.iter().map(|(p, _)| p.len()).sum());
    for (seed_paths, seed_stats) in per_seed {
        paths.extend(seed_paths);
        stats.merge(seed_stats);
    }

    tracing::debug!(
        seeds = stats.seeds,
        paths = stats.paths,
        dropped = stats.dropped,
        threads = rayon::current_num_threads(),
        "enumerated paths in parallel"
    );
    Ok(Enumeration { paths, stats })
}
