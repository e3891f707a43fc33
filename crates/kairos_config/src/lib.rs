//! Parsing and validation of `kairos.toml` analysis configuration.
//!
//! The configuration carries the timing constants consumed by the setup and
//! hold analyzers, the per-cell-type delay table consumed when cells are
//! built, and options for path enumeration and reporting. Every section is
//! optional; omitted values fall back to [`KairosConfig::default`].

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, validate_config, CONFIG_FILE_NAME};
pub use types::*;
