//! Turns classified layers into transistors and nets.

use crate::ids::TransistorId;
use crate::netlist::Netlist;
use crate::structure::{ControlSequence, Layer, NodeDescriptor};
use crate::transistor::{Activation, Branch, Coord, Target, Transistor, TransistorKind};
use bddlay_diagnostics::{codes, Diagnostic, DiagnosticSink};
use bddlay_source::Span;
use log::debug;

/// Builds the network for `layers` switched by `control`.
///
/// Branching and leaf-switch nodes produce a low and a high transistor,
/// unconditional leaves produce one. Unrecognized nodes are reported and
/// skipped, keeping their node index. Ids are dense and ordered by layer,
/// node, then branch.
pub fn build_netlist(layers: &[Layer], control: &ControlSequence, sink: &DiagnosticSink) -> Netlist {
    let mut transistors: Vec<Transistor> = Vec::new();
    let mut skipped = 0usize;

    for layer in layers {
        let var = control.get(layer.index).cloned();
        for (node_idx, node) in layer.nodes.iter().enumerate() {
            let source = Coord::new(layer.index, node_idx);
            let mut push = |branch: Option<Branch>, kind: TransistorKind, raw: i64| {
                let activation = match branch {
                    Some(b) => Activation::When {
                        var: var.clone(),
                        level: b.index(),
                    },
                    None => Activation::Always,
                };
                let id = TransistorId::from(transistors.len());
                transistors.push(Transistor {
                    id,
                    layer: layer.index,
                    node: node_idx,
                    branch,
                    kind,
                    source,
                    target: Target::resolve(raw, layer.index),
                    control: branch.and(var.clone()),
                    activation,
                    span: node.span,
                });
            };

            match &node.descriptor {
                NodeDescriptor::Branch { left, right } => {
                    push(Some(Branch::Low), TransistorKind::Switch, *left);
                    push(Some(Branch::High), TransistorKind::Switch, *right);
                }
                NodeDescriptor::LeafSwitch { low, high } => {
                    push(Some(Branch::Low), TransistorKind::LeafSwitch, *low);
                    push(Some(Branch::High), TransistorKind::LeafSwitch, *high);
                }
                NodeDescriptor::Leaf { target } => {
                    push(None, TransistorKind::Leaf, *target);
                }
                NodeDescriptor::Unrecognized { text } => {
                    skipped += 1;
                    sink.emit(unrecognized(text, source, node.span));
                }
            }
        }
    }

    let netlist = Netlist::from_transistors(transistors);
    debug!(
        "built netlist: {} layers, {} transistors, {} nets, {} nodes skipped",
        layers.len(),
        netlist.len(),
        netlist.net_count(),
        skipped
    );
    netlist
}

fn unrecognized(text: &str, at: Coord, span: Span) -> Diagnostic {
    Diagnostic::warning(
        codes::UNRECOGNIZED_NODE_SHAPE,
        format!("unrecognized node `{text}` at layer {}, node {}", at.layer, at.node),
        span,
    )
    .with_note("the node is skipped; transistor and net counts are a lower bound")
    .with_help("write `(left, right)`, `[(low, high)]` or `[target]`")
}
