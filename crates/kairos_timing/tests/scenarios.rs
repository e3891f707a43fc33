//! End-to-end timing scenarios on small hand-built and Yosys circuits.

use kairos_config::{DelayTable, Endpoints, KairosConfig, TimingConstants};
use kairos_diagnostics::DiagnosticSink;
use kairos_netlist::{parse_yosys_json, Cell, CellId, CellType, Circuit, NetId, NetlistError};
use kairos_timing::{
    analyze_circuit, analyze_hold, analyze_setup, capture_points, check_path, enumerate_paths,
    enumerate_paths_parallel, propagate_arrivals, select_paths, validate_paths, Boundary,
    Direction, Path, SetupVerdict,
};
use std::collections::HashSet;

/// A single AND gate fed by two primary inputs.
fn scenario_a() -> Circuit {
    let mut b = Circuit::builder(DelayTable::default());
    let a = b.input("a");
    let c = b.input("b");
    let y = b.net("y");
    b.gate(CellType::And, &[a, c], &[y]);
    b.output(y);
    b.build().unwrap()
}

/// Flip-flop output through an inverter to a primary output.
fn scenario_b() -> Circuit {
    let mut b = Circuit::builder(DelayTable::default());
    b.clock("clk");
    let d = b.input("d");
    let q = b.net("q");
    let y = b.net("y");
    b.dff(d, q);
    b.gate(CellType::Not, &[q], &[y]);
    b.output(y);
    b.build().unwrap()
}

/// A deterministic tangle of gates and registers with reconvergent fanout.
fn tangle(seed: u64, gates: usize) -> Circuit {
    let mut state = seed;
    let mut next = move |bound: usize| {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((state >> 33) as usize) % bound
    };
    let kinds = [
        CellType::Not,
        CellType::And,
        CellType::Or,
        CellType::Xor,
        CellType::Nand,
        CellType::Nor,
        CellType::Xnor,
        CellType::DffP,
    ];

    let mut b = Circuit::builder(DelayTable::default());
    let mut nets: Vec<NetId> = (0..3).map(|i| b.input(&format!("in{i}"))).collect();
    for g in 0..gates {
        let kind = kinds[next(kinds.len())];
        let out = b.net(&format!("w{g}"));
        let arity = match kind {
            CellType::Not | CellType::DffP => 1,
            _ => 2,
        };
        let inputs: Vec<NetId> = (0..arity).map(|_| nets[next(nets.len())]).collect();
        b.gate(kind, &inputs, &[out]);
        nets.push(out);
    }
    for &net in nets.iter().rev().take(3) {
        b.output(net);
    }
    b.build().unwrap()
}

#[test]
fn scenario_a_two_single_hop_paths() {
    let circuit = scenario_a();
    let result = enumerate_paths(&circuit, Endpoints::PrimaryOutputs).unwrap();
    assert_eq!(result.paths.len(), 2);
    for path in &result.paths {
        assert_eq!(path.len(), 1);
        assert_eq!(path.delay(), 9.0);
        assert_eq!(path.hops()[0].cell().cell_type(), CellType::And);
    }
    let inputs: HashSet<NetId> = result.paths.iter().map(|p| p.launch().net()).collect();
    assert_eq!(inputs.len(), 2);
}

#[test]
fn scenario_b_passes_setup() {
    let circuit = scenario_b();
    let result = enumerate_paths(&circuit, Endpoints::PrimaryOutputs).unwrap();
    assert_eq!(result.paths.len(), 1);
    let path = &result.paths[0];
    assert_eq!(path.len(), 1);
    assert_eq!(path.delay(), 5.0);
    assert!(matches!(path.launch(), Boundary::RegisterOutput { .. }));

    let checks = analyze_setup(&[path], &TimingConstants::default()).unwrap();
    assert_eq!(checks[0].arrival_time, 18.0);
    assert_eq!(checks[0].required_time, 53.0);
    assert_eq!(checks[0].slack, 35.0);
    assert_eq!(checks[0].verdict, SetupVerdict::Pass);
}

#[test]
fn scenario_c_fails_setup() {
    let circuit = scenario_b();
    let result = enumerate_paths(&circuit, Endpoints::PrimaryOutputs).unwrap();
    let constants = TimingConstants {
        clock_period: 10.0,
        ..TimingConstants::default()
    };
    let checks = analyze_setup(&[&result.paths[0]], &constants).unwrap();
    assert_eq!(checks[0].required_time, 13.0);
    assert_eq!(checks[0].slack, -5.0);
    assert_eq!(
        checks[0].verdict,
        SetupVerdict::Fail {
            min_clock_period: 15.0
        }
    );
}

#[test]
fn unknown_cell_type_is_rejected() {
    let err = Cell::new(
        CellId::from_raw(0),
        "$_BUFFER_",
        vec![NetId::from_raw(2)],
        vec![NetId::from_raw(3)],
        &DelayTable::default(),
    )
    .unwrap_err();
    assert!(matches!(err, NetlistError::UnknownCellType(ref t) if t == "$_BUFFER_"));
}

#[test]
fn enumerated_paths_are_contiguous_and_combinational() {
    for seed in 1..20 {
        let circuit = tangle(seed, 24);
        let result = enumerate_paths(&circuit, Endpoints::OutputsAndRegisters).unwrap();
        validate_paths(&result.paths).unwrap();
        for path in &result.paths {
            assert!(check_path(path).is_ok());
            assert!(path.hops().iter().all(|h| !h.cell().is_sequential()));
            for pair in path.hops().windows(2) {
                assert_eq!(pair[0].output_net(), pair[1].input_net());
            }
            let sum: f64 = path.hops().iter().map(|h| h.delay()).sum();
            assert_eq!(path.delay(), sum);
        }
    }
}

#[test]
fn parallel_enumeration_matches_sequential() {
    for seed in 1..20 {
        let circuit = tangle(seed, 30);
        for endpoints in [Endpoints::PrimaryOutputs, Endpoints::OutputsAndRegisters] {
            let sequential = enumerate_paths(&circuit, endpoints).unwrap();
            let parallel = enumerate_paths_parallel(&circuit, endpoints).unwrap();
            assert_eq!(sequential.paths, parallel.paths, "seed {seed}");
            assert_eq!(sequential.stats.paths, parallel.stats.paths);
            assert_eq!(sequential.stats.dropped, parallel.stats.dropped);
        }
    }
}

#[test]
fn propagation_matches_enumerated_extremes() {
    for seed in 1..20 {
        let circuit = tangle(seed, 30);
        let endpoints = Endpoints::OutputsAndRegisters;
        let result = enumerate_paths(&circuit, endpoints).unwrap();
        let arrivals = propagate_arrivals(&circuit).unwrap();

        for capture in capture_points(&circuit, endpoints) {
            let delays: Vec<f64> = result
                .paths
                .iter()
                .filter(|p| p.capture() == capture)
                .map(Path::delay)
                .collect();
            let window = arrivals.at(capture.net());
            if delays.is_empty() {
                assert_eq!(window, None, "seed {seed}");
                continue;
            }
            let window = window.unwrap();
            let longest = delays.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let shortest = delays.iter().copied().fold(f64::INFINITY, f64::min);
            assert_eq!(window.latest, longest, "seed {seed}");
            assert_eq!(window.earliest, shortest, "seed {seed}");
        }
    }
}

#[test]
fn propagation_matches_extremes_behind_registered_outputs() {
    for seed in 1..20 {
        let circuit = tangle(seed, 30);
        let result = enumerate_paths(&circuit, Endpoints::PrimaryOutputs).unwrap();
        let arrivals = propagate_arrivals(&circuit).unwrap();

        let mut seen = HashSet::new();
        for capture in result.paths.iter().map(Path::capture) {
            if !seen.insert(capture) {
                continue;
            }
            let delays: Vec<f64> = result
                .paths
                .iter()
                .filter(|p| p.capture() == capture)
                .map(Path::delay)
                .collect();
            let window = arrivals.at(capture.net()).unwrap();
            let longest = delays.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let shortest = delays.iter().copied().fold(f64::INFINITY, f64::min);
            assert_eq!(window.latest, longest, "seed {seed}");
            assert_eq!(window.earliest, shortest, "seed {seed}");
        }
    }
}

#[test]
fn selection_is_stable_and_bounded() {
    let circuit = tangle(7, 30);
    let result = enumerate_paths(&circuit, Endpoints::PrimaryOutputs).unwrap();
    let all = select_paths(&result.paths, usize::MAX, Direction::Longest);
    assert_eq!(all.len(), result.paths.len());
    for pair in all.windows(2) {
        assert!(pair[0].delay() >= pair[1].delay());
    }
    let shortest = select_paths(&result.paths, 3, Direction::Shortest);
    assert!(shortest.len() <= 3);
    for pair in shortest.windows(2) {
        assert!(pair[0].delay() <= pair[1].delay());
    }
}

#[test]
fn analyzers_reject_empty_input() {
    let constants = TimingConstants::default();
    assert!(analyze_setup(&[], &constants).is_err());
    assert!(analyze_hold(&[], &constants).is_err());
}

const COUNTER_BIT: &str = r#"{
  "modules": {
    "toggle": {
      "attributes": { "top": "00000000000000000000000000000001" },
      "ports": {
        "clk": { "direction": "input", "bits": [ 2 ] },
        "en":  { "direction": "input", "bits": [ 3 ] },
        "q":   { "direction": "output", "bits": [ 4 ] }
      },
      "cells": {
        "$ff": {
          "type": "$_DFF_P_",
          "port_directions": { "C": "input", "D": "input", "Q": "output" },
          "connections": { "C": [ 2 ], "D": [ 5 ], "Q": [ 4 ] }
        },
        "$xor": {
          "type": "$_XOR_",
          "port_directions": { "A": "input", "B": "input", "Y": "output" },
          "connections": { "A": [ 4 ], "B": [ 3 ], "Y": [ 5 ] }
        }
      },
      "netnames": {
        "clk": { "bits": [ 2 ] },
        "en": { "bits": [ 3 ] },
        "q": { "bits": [ 4 ] },
        "next": { "bits": [ 5 ] }
      }
    }
  }
}"#;

#[test]
fn yosys_netlist_end_to_end() {
    let circuit = parse_yosys_json(COUNTER_BIT, &DelayTable::default()).unwrap();
    assert_eq!(circuit.clock_nets(), &[NetId::from_raw(2)]);
    assert!(!circuit.is_primary_input(NetId::from_raw(2)));

    let mut config = KairosConfig::default();
    config.enumeration.endpoints = Endpoints::OutputsAndRegisters;
    let sink = DiagnosticSink::new();
    let report = analyze_circuit(&circuit, &config, &sink).unwrap();

    // q -> output (empty) plus q/en -> XOR -> register input
    assert_eq!(report.path_count, 3);
    assert_eq!(report.setup[0].check.path_delay, 12.0);
    assert_eq!(report.setup[0].path.capture, "register $ff input");
    assert_eq!(report.hold[0].check.path_delay, 0.0);
    assert!(!report.hold[0].check.passed());
    assert!(!report.met);
    assert_eq!(sink.warning_count(), 1);
}

#[test]
fn yosys_registered_output_times_the_feedback_logic() {
    let circuit = parse_yosys_json(COUNTER_BIT, &DelayTable::default()).unwrap();
    let sink = DiagnosticSink::new();
    let report = analyze_circuit(&circuit, &KairosConfig::default(), &sink).unwrap();

    // q is driven by $ff, so both XOR inputs are timed into $ff's D pin
    assert_eq!(report.path_count, 2);
    assert_eq!(report.setup[0].check.path_delay, 12.0);
    assert_eq!(report.setup[0].path.launch, "register $ff output");
    assert_eq!(report.setup[0].path.capture, "register $ff input");
    assert_eq!(report.hold[0].check.path_delay, 12.0);
    assert!(report.met);
    assert_eq!(sink.warning_count(), 0);
}
