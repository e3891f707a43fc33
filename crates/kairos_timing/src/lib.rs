//! Path-based static timing analysis for gate-level circuits.
//!
//! Every combinational path between a launch point (primary input or
//! flip-flop output) and a capture point (primary output, optionally also
//! flip-flop data inputs) is enumerated exhaustively, validated, ranked by
//! delay, and checked against the setup and hold constraints in
//! [`TimingConstants`](kairos_config::TimingConstants).
//!
//! # Usage
//!
//! ```ignore
//! use kairos_timing::{analyze_circuit, render_report};
//!
//! let circuit = kairos_netlist::read_yosys_json(path, &config.delays)?;
//! let sink = DiagnosticSink::new();
//! let report = analyze_circuit(&circuit, &config, &sink)?;
//! println!("{}", render_report(&circuit, &report));
//! ```
//!
//! # Architecture
//!
//! - [`path`]: paths, hops and their boundaries
//! - [`enumerate`]: backward path enumeration (sequential and rayon-parallel)
//! - [`validate`]: structural checks on enumerated paths
//! - [`select`]: longest/shortest path ranking
//! - [`setup`] and [`hold`]: the two timing checks
//! - [`propagate`]: linear-time arrival propagation used as a cross-check
//! - [`sta`]: the full pipeline
//! - [`report`]: report types and text rendering

#![warn(missing_docs)]

pub mod enumerate;
pub mod error;
pub mod hold;
pub mod path;
pub mod propagate;
pub mod report;
pub mod select;
pub mod setup;
pub mod sta;
pub mod validate;

pub use enumerate::{
    capture_points, enumerate_paths, enumerate_paths_parallel, Enumeration, EnumerationStats,
};
pub use error::{CheckKind, PortSide, TimingError};
pub use hold::{analyze_hold, check_hold, HoldCheck, HoldVerdict};
pub use path::{Boundary, Path, PathHop};
pub use propagate::{propagate_arrivals, ArrivalWindow, Arrivals};
pub use report::{
    render_circuit, render_path, render_paths, render_report, HoldEntry, PathElement,
    ReportedPath, SetupEntry, TimingReport,
};
pub use select::{select_paths, Direction};
pub use setup::{analyze_setup, check_setup, SetupCheck, SetupVerdict};
pub use sta::{analyze_circuit, dangling_paths};
pub use validate::{check_path, validate_paths, PathRule};
