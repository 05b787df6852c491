//! Transistors: one directed switch edge of the derived network.

use crate::ids::TransistorId;
use crate::structure::ControlVar;
use bddlay_source::Span;
use serde::Serialize;
use std::fmt;

/// A `(layer, node)` endpoint coordinate.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize)]
pub struct Coord {
    /// Layer index.
    pub layer: usize,
    /// Node index within the layer.
    pub node: usize,
}

impl Coord {
    /// Creates a coordinate.
    pub fn new(layer: usize, node: usize) -> Self {
        Self { layer, node }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.layer, self.node)
    }
}

/// A terminal output, identified by the raw negative target value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(transparent)]
pub struct OutputSink(pub i64);

impl OutputSink {
    /// `-1` is `OUTPUT_0`, `-2` is `OUTPUT_1`; any other value keeps its
    /// number.
    pub fn label(&self) -> String {
        match self.0 {
            -1 => "OUTPUT_0".to_string(),
            -2 => "OUTPUT_1".to_string(),
            v => format!("OUTPUT_{v}"),
        }
    }
}

impl fmt::Display for OutputSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Where a transistor leads.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// A node in the next layer.
    Node(Coord),
    /// A terminal output.
    Output(OutputSink),
}

impl Target {
    /// Resolves a raw target value written on layer `layer`.
    pub fn resolve(value: i64, layer: usize) -> Self {
        if value >= 0 {
            Target::Node(Coord::new(layer + 1, value as usize))
        } else {
            Target::Output(OutputSink(value))
        }
    }

    /// The coordinate, if this target is not terminal.
    pub fn coord(&self) -> Option<Coord> {
        match self {
            Target::Node(c) => Some(*c),
            Target::Output(_) => None,
        }
    }

    /// Returns `true` for terminal outputs.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Target::Output(_))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Node(c) => write!(f, "{c}"),
            Target::Output(o) => write!(f, "{o}"),
        }
    }
}

/// Which side of a two-way node a transistor implements.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Branch {
    /// Conducts when the control variable is 0.
    Low,
    /// Conducts when the control variable is 1.
    High,
}

impl Branch {
    /// 0 for [`Branch::Low`], 1 for [`Branch::High`].
    pub fn index(self) -> u8 {
        match self {
            Branch::Low => 0,
            Branch::High => 1,
        }
    }
}

/// The node shape a transistor came from.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransistorKind {
    /// From a branching node.
    Switch,
    /// From a terminal node that still switches.
    LeafSwitch,
    /// From an unconditional terminal.
    Leaf,
}

impl TransistorKind {
    /// Returns `true` for both terminal kinds.
    pub fn is_leaf(self) -> bool {
        !matches!(self, TransistorKind::Switch)
    }

    /// The name used in descriptions and reports.
    pub fn name(self) -> &'static str {
        match self {
            TransistorKind::Switch => "switch",
            TransistorKind::LeafSwitch => "leaf_switch",
            TransistorKind::Leaf => "leaf",
        }
    }
}

/// When a transistor conducts.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    /// Conducts when the variable equals `level`. The variable is `None` for
    /// layers past the end of the control sequence.
    When {
        /// Controlling variable.
        var: Option<ControlVar>,
        /// 0 or 1.
        level: u8,
    },
    /// Always conducts.
    Always,
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Activation::When { var: Some(v), level } => write!(f, "var_{v} == {level}"),
            Activation::When { var: None, level } => write!(f, "var_? == {level}"),
            Activation::Always => f.write_str("always"),
        }
    }
}

/// One switch edge of the network.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct Transistor {
    /// Dense id, in layer-major, node-minor, branch-minor order.
    pub id: TransistorId,
    /// Layer of the source node.
    pub layer: usize,
    /// Index of the source node in its layer.
    pub node: usize,
    /// Branch side; `None` for unconditional leaves.
    pub branch: Option<Branch>,
    /// Node shape this transistor came from.
    pub kind: TransistorKind,
    /// The source node.
    pub source: Coord,
    /// Where the transistor leads.
    pub target: Target,
    /// The gate variable, if any.
    pub control: Option<ControlVar>,
    /// When the transistor conducts.
    pub activation: Activation,
    /// Span of the node literal this transistor came from.
    #[serde(skip)]
    pub span: Span,
}

impl Transistor {
    /// A one-line human-readable description.
    pub fn description(&self) -> String {
        let label = match self.kind {
            TransistorKind::Switch => "Switch",
            TransistorKind::LeafSwitch => "LeafSwitch",
            TransistorKind::Leaf => "Leaf",
        };
        match &self.activation {
            Activation::Always => {
                format!("{label} {}: {} → {}", self.id, self.source, self.target)
            }
            cond => format!(
                "{label} {}: {} → {} when {cond}",
                self.id, self.source, self.target
            ),
        }
    }
}
