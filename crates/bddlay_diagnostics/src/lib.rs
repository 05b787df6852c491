//! Structured diagnostics for structural input and placement checks.
//!
//! Recoverable problems (an unrecognized node shape, a target pointing past
//! the next layer, an off-grid standard-cell position) are reported as
//! [`Diagnostic`]s into a [`DiagnosticSink`] while processing continues. The
//! [`TerminalRenderer`] prints them against the input document.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{codes, Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
