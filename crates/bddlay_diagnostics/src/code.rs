//! Diagnostic codes with category prefixes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a diagnostic code, determining its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Errors, prefixed with `E`.
    Error,
    /// Warnings, prefixed with `W`.
    Warning,
    /// Informational notes, prefixed with `N`.
    Note,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Error => 'E',
            Category::Warning => 'W',
            Category::Note => 'N',
        }
    }
}

/// A category prefix plus a number, displayed as e.g. `W201`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
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

/// Every code emitted by the workspace.
pub mod codes {
    use super::{Category, DiagnosticCode};

    /// A layer or control-sequence line is not a valid literal.
    pub const MALFORMED_LITERAL: DiagnosticCode = DiagnosticCode::new(Category::Error, 101);
    /// The document has no control-sequence line.
    pub const MISSING_CONTROL_SEQUENCE: DiagnosticCode = DiagnosticCode::new(Category::Error, 102);
    /// A node literal matches none of the three node shapes.
    pub const UNRECOGNIZED_NODE_SHAPE: DiagnosticCode = DiagnosticCode::new(Category::Warning, 201);
    /// A branch target indexes past the end of the next layer.
    pub const TARGET_OUT_OF_RANGE: DiagnosticCode = DiagnosticCode::new(Category::Warning, 202);
    /// A non-terminal target leaves the last layer.
    pub const DANGLING_TARGET_LAYER: DiagnosticCode = DiagnosticCode::new(Category::Warning, 203);
    /// A control-sequence entry is not an integer or identifier.
    pub const INVALID_CONTROL_ENTRY: DiagnosticCode = DiagnosticCode::new(Category::Warning, 204);
    /// There are more layers than control-sequence entries.
    pub const SHORT_CONTROL_SEQUENCE: DiagnosticCode = DiagnosticCode::new(Category::Note, 205);
    /// A standard-cell position is off the row/site grid or out of bounds.
    pub const ILLEGAL_POSITION: DiagnosticCode = DiagnosticCode::new(Category::Warning, 301);
}
