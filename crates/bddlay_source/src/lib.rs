//! Input document text and source locations.
//!
//! A structural description is a single text document. [`SourceText`] owns
//! it, [`Span`] addresses byte ranges inside it, and [`Location`] is the
//! 1-indexed line/column form used when a diagnostic is printed.

#![warn(missing_docs)]

pub mod source_text;
pub mod span;

pub use source_text::{Location, SourceLine, SourceText};
pub use span::Span;
