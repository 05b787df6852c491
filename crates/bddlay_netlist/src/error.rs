//! Fatal structural parse errors.

use bddlay_diagnostics::{codes, Diagnostic};
use bddlay_source::Span;

/// A structural description that cannot be read at all.
///
/// Unlike an unrecognized node shape, which only skips one node, these abort
/// construction of the netlist.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// A line is not a well-formed literal.
    #[error("malformed literal on line {line}: {message}")]
    MalformedLiteral {
        /// What was wrong.
        message: String,
        /// 1-indexed line number.
        line: u32,
        /// Location of the offending token.
        span: Span,
    },

    /// The document contains no non-blank line to read the control sequence from.
    #[error("document has no control-sequence line")]
    MissingControlSequence,
}

impl ParseError {
    /// Converts the error into a diagnostic for rendering.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ParseError::MalformedLiteral { message, span, .. } => {
                Diagnostic::error(codes::MALFORMED_LITERAL, message.clone(), *span)
            }
            ParseError::MissingControlSequence => Diagnostic::error(
                codes::MISSING_CONTROL_SEQUENCE,
                "document has no control-sequence line",
                Span::DUMMY,
            )
            .with_help("the last non-blank line must list the control variable of each layer"),
        }
    }
}
