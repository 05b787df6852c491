//! The parsed layered description: layers of classified nodes plus the
//! control sequence.

use crate::literal::{Literal, LiteralKind};
use bddlay_source::Span;
use serde::Serialize;
use std::fmt;

/// The shape of one node, decided from its literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum NodeDescriptor {
    /// `(left, right)`: one switch per branch into the next layer.
    Branch {
        /// Target taken when the control variable is 0.
        left: i64,
        /// Target taken when the control variable is 1.
        right: i64,
    },
    /// `[(low, high)]`: a terminal node that still switches on its variable.
    LeafSwitch {
        /// Output taken when the control variable is 0.
        low: i64,
        /// Output taken when the control variable is 1.
        high: i64,
    },
    /// `[target]`: an unconditional terminal.
    Leaf {
        /// The only target.
        target: i64,
    },
    /// Anything else. Kept so that node indices stay aligned with the input.
    Unrecognized {
        /// The literal as written back.
        text: String,
    },
}

impl NodeDescriptor {
    /// Classifies a node literal.
    ///
    /// A one-element wrapper may be a list or a one-tuple. Targets must be
    /// integers; a pair containing anything else is unrecognized.
    pub fn classify(lit: &Literal) -> Self {
        match &lit.kind {
            LiteralKind::Tuple(items) if items.len() == 2 => match int_pair(items) {
                Some((left, right)) => NodeDescriptor::Branch { left, right },
                None => Self::unrecognized(lit),
            },
            LiteralKind::List(items) | LiteralKind::Tuple(items) if items.len() == 1 => {
                let inner = &items[0];
                match &inner.kind {
                    LiteralKind::Tuple(pair) if pair.len() == 2 => match int_pair(pair) {
                        Some((low, high)) => NodeDescriptor::LeafSwitch { low, high },
                        None => Self::unrecognized(lit),
                    },
                    LiteralKind::Int(target) => NodeDescriptor::Leaf { target: *target },
                    _ => Self::unrecognized(lit),
                }
            }
            _ => Self::unrecognized(lit),
        }
    }

    fn unrecognized(lit: &Literal) -> Self {
        NodeDescriptor::Unrecognized {
            text: lit.to_string(),
        }
    }

    /// Number of transistors this node produces.
    pub fn transistor_count(&self) -> usize {
        match self {
            NodeDescriptor::Branch { .. } | NodeDescriptor::LeafSwitch { .. } => 2,
            NodeDescriptor::Leaf { .. } => 1,
            NodeDescriptor::Unrecognized { .. } => 0,
        }
    }

    /// Every raw target value, in branch order.
    pub fn targets(&self) -> Vec<i64> {
        match *self {
            NodeDescriptor::Branch { left, right } => vec![left, right],
            NodeDescriptor::LeafSwitch { low, high } => vec![low, high],
            NodeDescriptor::Leaf { target } => vec![target],
            NodeDescriptor::Unrecognized { .. } => Vec::new(),
        }
    }
}

fn int_pair(items: &[Literal]) -> Option<(i64, i64)> {
    Some((items[0].as_int()?, items[1].as_int()?))
}

/// A classified node and where it was written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    /// The node's shape.
    pub descriptor: NodeDescriptor,
    /// Span of the node literal.
    pub span: Span,
}

/// One depth of the diagram. Layer 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layer {
    /// 0-based depth.
    pub index: usize,
    /// Nodes in input order; the position is the node index.
    pub nodes: Vec<Node>,
    /// Span of the whole layer line.
    pub span: Span,
}

impl Layer {
    /// Number of nodes, counting unrecognized ones.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the layer has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Identifier of the variable a layer switches on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ControlVar {
    /// A numeric variable index.
    Index(i64),
    /// A named variable.
    Name(String),
}

impl fmt::Display for ControlVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlVar::Index(i) => write!(f, "{i}"),
            ControlVar::Name(name) => write!(f, "{name}"),
        }
    }
}

/// Layer index → control variable. May be shorter than the layer count;
/// entries that could not be read are `None`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ControlSequence {
    /// One entry per layer, in order.
    pub entries: Vec<Option<ControlVar>>,
    /// Span of the control-sequence line.
    pub span: Span,
}

impl ControlSequence {
    /// Creates a sequence of numeric variables, for tests and callers that
    /// build structures directly.
    pub fn from_indices(indices: &[i64]) -> Self {
        Self {
            entries: indices.iter().map(|&i| Some(ControlVar::Index(i))).collect(),
            span: Span::DUMMY,
        }
    }

    /// The variable controlling `layer`, if any.
    pub fn get(&self, layer: usize) -> Option<&ControlVar> {
        self.entries.get(layer).and_then(Option::as_ref)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the sequence has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A fully parsed document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Structure {
    /// Layers in depth order.
    pub layers: Vec<Layer>,
    /// The control sequence from the last line.
    pub control: ControlSequence,
}

impl Structure {
    /// Total number of nodes over all layers.
    pub fn node_count(&self) -> usize {
        self.layers.iter().map(Layer::len).sum()
    }

    /// Number of transistors the structure will produce.
    pub fn expected_transistors(&self) -> usize {
        self.layers
            .iter()
            .flat_map(|l| &l.nodes)
            .map(|n| n.descriptor.transistor_count())
            .sum()
    }
}
