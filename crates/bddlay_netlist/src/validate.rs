//! Consistency checks between the parsed layers and the built network.

use crate::netlist::Netlist;
use crate::structure::Structure;
use bddlay_diagnostics::{codes, Diagnostic, DiagnosticSink};

/// Checks every non-terminal target against the layer it points into and
/// compares the layer count with the control sequence.
///
/// Emits [`codes::TARGET_OUT_OF_RANGE`] for a node index past the end of the
/// next layer, [`codes::DANGLING_TARGET_LAYER`] for a target below the last
/// layer, and [`codes::SHORT_CONTROL_SEQUENCE`] when layers outnumber control
/// entries. Returns the number of diagnostics emitted.
pub fn validate_structure(structure: &Structure, netlist: &Netlist, sink: &DiagnosticSink) -> usize {
    let mut emitted = 0;
    let layers = &structure.layers;

    let control_len = structure.control.len();
    if layers.len() > control_len {
        sink.emit(
            Diagnostic::note(
                codes::SHORT_CONTROL_SEQUENCE,
                format!(
                    "{} layers but only {} control entries",
                    layers.len(),
                    control_len
                ),
                structure.control.span,
            )
            .with_note("layers without an entry switch on no variable; the last layers may be leaves"),
        );
        emitted += 1;
    }

    for t in netlist.transistors() {
        let Some(coord) = t.target.coord() else {
            continue;
        };
        match layers.get(coord.layer) {
            Some(layer) if coord.node >= layer.len() => {
                sink.emit(Diagnostic::warning(
                    codes::TARGET_OUT_OF_RANGE,
                    format!(
                        "{} targets node {} but layer {} has {} nodes",
                        t.id,
                        coord.node,
                        coord.layer,
                        layer.len()
                    ),
                    t.span,
                ));
                emitted += 1;
            }
            Some(_) => {}
            None => {
                sink.emit(
                    Diagnostic::warning(
                        codes::DANGLING_TARGET_LAYER,
                        format!("{} targets layer {}, which does not exist", t.id, coord.layer),
                        t.span,
                    )
                    .with_help("use a negative value for a terminal output"),
                );
                emitted += 1;
            }
        }
    }

    emitted
}
