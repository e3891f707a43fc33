//! Error types for circuit construction and netlist reading.

/// Errors raised while building a [`Circuit`](crate::Circuit).
///
/// All of them are fatal: a circuit is never handed to analysis in a
/// partially valid state.
#[derive(Debug, thiserror::Error)]
pub enum NetlistError {
    /// A cell's type is not one of the recognized gate or flip-flop types.
    #[error("cell type '{0}' is unknown; this may be caused by a synthesis issue")]
    UnknownCellType(String),

    /// The netlist is structurally unusable.
    #[error("malformed netlist: {0}")]
    MalformedNetlist(String),

    /// The netlist file could not be read.
    #[error("failed to read netlist: {0}")]
    Io(#[from] std::io::Error),

    /// The netlist is not valid Yosys JSON.
    #[error("failed to parse netlist JSON: {0}")]
    Json(#[from] serde_json::Error),
}
