//! Structural parsing and netlist construction for layered BDD descriptions.
//!
//! A description is a text document with one literal per line: each line but
//! the last describes one layer of nodes, and the last line lists the control
//! variable of each layer. [`parse_document`] reads it into a [`Structure`],
//! [`build_netlist`] turns that into a [`Netlist`] of switch transistors and
//! the nets they share, and [`validate_structure`] reports inconsistencies.

#![warn(missing_docs)]

pub mod builder;
pub mod error;
pub mod ids;
pub mod literal;
pub mod netlist;
pub mod parser;
pub mod stats;
pub mod structure;
pub mod transistor;
pub mod validate;

pub use builder::build_netlist;
pub use error::ParseError;
pub use ids::{NetId, TransistorId};
pub use netlist::{Net, Netlist};
pub use parser::parse_document;
pub use stats::{LayerStats, NetlistStats};
pub use structure::{ControlSequence, ControlVar, Layer, Node, NodeDescriptor, Structure};
pub use transistor::{Activation, Branch, Coord, OutputSink, Target, Transistor, TransistorKind};
pub use validate::validate_structure;

use bddlay_diagnostics::DiagnosticSink;
use bddlay_source::SourceText;

/// Parses, builds and validates in one step.
///
/// Non-fatal problems go to `sink`; only malformed input is an error.
pub fn load_netlist(
    source: &SourceText,
    sink: &DiagnosticSink,
) -> Result<(Structure, Netlist), ParseError> {
    let structure = parse_document(source, sink)?;
    let netlist = build_netlist(&structure.layers, &structure.control, sink);
    validate_structure(&structure, &netlist, sink);
    Ok((structure, netlist))
}
