//! Diagnostic codes with category prefixes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a diagnostic code, determining its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Error diagnostics, prefixed with `E`.
    Error,
    /// Warning diagnostics, prefixed with `W`.
    Warning,
    /// Timing check results, prefixed with `T`.
    Timing,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Error => 'E',
            Category::Warning => 'W',
            Category::Timing => 'T',
        }
    }
}

/// A category prefix plus a numeric identifier, displayed as e.g. `T001`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// A command could not run to completion.
    pub const COMMAND_FAILED: Self = Self::new(Category::Error, 1);
    /// A path failed its setup check.
    pub const SETUP_VIOLATION: Self = Self::new(Category::Timing, 1);
    /// A path failed its hold check.
    pub const HOLD_VIOLATION: Self = Self::new(Category::Timing, 2);
    /// An analysis had no paths to check.
    pub const NO_PATHS: Self = Self::new(Category::Warning, 1);
    /// Partial paths were dropped at undriven nets.
    pub const DANGLING_NET: Self = Self::new(Category::Warning, 2);

    /// Creates a new diagnostic code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}
