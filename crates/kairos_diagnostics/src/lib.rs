//! Diagnostic creation, severity management, and terminal rendering.
//!
//! Analysis stages report user-facing conditions such as timing violations
//! as structured [`Diagnostic`]s rather than errors. The thread-safe [`DiagnosticSink`] accumulates them while the
//! pipeline runs, and [`TerminalRenderer`] formats them for the command line.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
