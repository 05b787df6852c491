//! Document-level parsing: one layer per line, control sequence last.

use crate::error::ParseError;
use crate::literal::{parse_literal, Literal, LiteralKind};
use crate::structure::{ControlSequence, ControlVar, Layer, Node, NodeDescriptor, Structure};
use bddlay_diagnostics::{codes, Diagnostic, DiagnosticSink};
use bddlay_source::{SourceLine, SourceText};

/// Parses a structural description.
///
/// Blank lines are ignored. The last non-blank line is the control sequence
/// and every earlier one is a layer. Control-sequence entries that are
/// neither integers nor names are reported and left empty.
pub fn parse_document(source: &SourceText, sink: &DiagnosticSink) -> Result<Structure, ParseError> {
    let mut lines: Vec<SourceLine<'_>> = source
        .lines()
        .filter(|line| !line.text.trim().is_empty())
        .collect();
    let control_line = lines.pop().ok_or(ParseError::MissingControlSequence)?;

    let mut layers = Vec::with_capacity(lines.len());
    for (index, line) in lines.iter().enumerate() {
        let lit = parse_line(line)?;
        let span = lit.span;
        layers.push(Layer {
            index,
            nodes: layer_nodes(lit),
            span,
        });
    }

    let control_lit = parse_line(&control_line)?;
    let control = control_sequence(control_lit, sink);

    Ok(Structure { layers, control })
}

fn parse_line(line: &SourceLine<'_>) -> Result<Literal, ParseError> {
    parse_literal(line.text, line.span.start).map_err(|err| ParseError::MalformedLiteral {
        message: err.message,
        line: line.number,
        span: err.span,
    })
}

fn layer_nodes(lit: Literal) -> Vec<Node> {
    let items = match lit.kind {
        LiteralKind::Tuple(items) | LiteralKind::List(items) => items,
        _ => vec![lit],
    };
    items
        .iter()
        .map(|item| Node {
            descriptor: NodeDescriptor::classify(item),
            span: item.span,
        })
        .collect()
}

fn control_sequence(lit: Literal, sink: &DiagnosticSink) -> ControlSequence {
    let span = lit.span;
    let items = match lit.kind {
        LiteralKind::Tuple(items) | LiteralKind::List(items) => items,
        _ => vec![lit],
    };
    let entries = items
        .into_iter()
        .enumerate()
        .map(|(layer, item)| match &item.kind {
            LiteralKind::Int(i) => Some(ControlVar::Index(*i)),
            LiteralKind::Ident(name) if name == "None" => None,
            LiteralKind::Str(name) | LiteralKind::Ident(name) => {
                Some(ControlVar::Name(name.clone()))
            }
            _ => {
                sink.emit(
                    Diagnostic::warning(
                        codes::INVALID_CONTROL_ENTRY,
                        format!("control entry for layer {layer} is not a variable: `{item}`"),
                        item.span,
                    )
                    .with_note("the layer's transistors get no control variable"),
                );
                None
            }
        })
        .collect();
    ControlSequence { entries, span }
}
