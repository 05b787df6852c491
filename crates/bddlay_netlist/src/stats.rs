//! Summary counts over a built netlist.

use crate::netlist::Netlist;
use crate::transistor::TransistorKind;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Transistor kind counts for one layer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LayerStats {
    /// Layer index.
    pub layer: usize,
    /// Transistors from branching nodes.
    pub switch: usize,
    /// Transistors from leaf-switch nodes.
    pub leaf_switch: usize,
    /// Transistors from unconditional leaves.
    pub leaf: usize,
}

impl LayerStats {
    /// Total transistors on the layer.
    pub fn total(&self) -> usize {
        self.switch + self.leaf_switch + self.leaf
    }
}

/// Totals, per-layer counts and the net-size distribution.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NetlistStats {
    /// Number of transistors.
    pub transistors: usize,
    /// Number of nets.
    pub nets: usize,
    /// Transistors from leaf and leaf-switch nodes.
    pub leaf_transistors: usize,
    /// Size of the largest net, 0 without nets.
    pub largest_net: usize,
    /// Net size → number of nets of that size.
    pub net_sizes: BTreeMap<usize, usize>,
    /// Layers that produced at least one transistor, ascending.
    pub layers: Vec<LayerStats>,
}

impl NetlistStats {
    /// Computes statistics for `netlist`.
    pub fn compute(netlist: &Netlist) -> Self {
        let mut per_layer: BTreeMap<usize, LayerStats> = BTreeMap::new();
        for t in netlist.transistors() {
            let entry = per_layer.entry(t.layer).or_insert_with(|| LayerStats {
                layer: t.layer,
                ..LayerStats::default()
            });
            match t.kind {
                TransistorKind::Switch => entry.switch += 1,
                TransistorKind::LeafSwitch => entry.leaf_switch += 1,
                TransistorKind::Leaf => entry.leaf += 1,
            }
        }

        let mut net_sizes = BTreeMap::new();
        for net in netlist.nets() {
            *net_sizes.entry(net.len()).or_insert(0) += 1;
        }

        Self {
            transistors: netlist.len(),
            nets: netlist.net_count(),
            leaf_transistors: netlist.leaf_transistors().count(),
            largest_net: net_sizes.keys().next_back().copied().unwrap_or(0),
            net_sizes,
            layers: per_layer.into_values().collect(),
        }
    }
}

impl fmt::Display for NetlistStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "transistors: {}", self.transistors)?;
        writeln!(f, "leaf transistors: {}", self.leaf_transistors)?;
        writeln!(f, "nets: {} (largest {})", self.nets, self.largest_net)?;
        if !self.net_sizes.is_empty() {
            let sizes: Vec<String> = self
                .net_sizes
                .iter()
                .map(|(size, count)| format!("{size}:{count}"))
                .collect();
            writeln!(f, "net sizes: {}", sizes.join(" "))?;
        }
        for layer in &self.layers {
            writeln!(
                f,
                "  layer {}: {} transistors ({} switch, {} leaf_switch, {} leaf)",
                layer.layer,
                layer.total(),
                layer.switch,
                layer.leaf_switch,
                layer.leaf
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_netlist;
    use crate::structure::{ControlSequence, Layer, Node, NodeDescriptor};
    use bddlay_diagnostics::DiagnosticSink;
    use bddlay_source::Span;

    fn node(descriptor: NodeDescriptor) -> Node {
        Node {
            descriptor,
            span: Span::DUMMY,
        }
    }

    #[test]
    fn counts_by_layer_and_net_size() {
        let layers = vec![
            Layer {
                index: 0,
                nodes: vec![node(NodeDescriptor::Branch { left: 0, right: 1 })],
                span: Span::DUMMY,
            },
            Layer {
                index: 1,
                nodes: vec![
                    node(NodeDescriptor::LeafSwitch { low: -2, high: -1 }),
                    node(NodeDescriptor::Leaf { target: -1 }),
                ],
                span: Span::DUMMY,
            },
        ];
        let netlist = build_netlist(
            &layers,
            &ControlSequence::from_indices(&[0, 1]),
            &DiagnosticSink::new(),
        );
        let stats = NetlistStats::compute(&netlist);

        assert_eq!(stats.transistors, 5);
        assert_eq!(stats.leaf_transistors, 3);
        assert_eq!(stats.layers[0].switch, 2);
        assert_eq!(stats.layers[1].leaf_switch, 2);
        assert_eq!(stats.layers[1].leaf, 1);
        assert_eq!(stats.layers[1].total(), 3);
        // (0,0): {0,1}; (1,0): {0,2,3}; (1,1): {1,4}
        assert_eq!(stats.nets, 3);
        assert_eq!(stats.net_sizes.get(&2), Some(&2));
        assert_eq!(stats.net_sizes.get(&3), Some(&1));
        assert_eq!(stats.largest_net, 3);
    }

    #[test]
    fn empty_netlist() {
        let stats = NetlistStats::compute(&Netlist::default());
        assert_eq!(stats, NetlistStats::default());
        assert_eq!(stats.to_string(), "transistors: 0\nleaf transistors: 0\nnets: 0 (largest 0)\n");
    }

    #[test]
    fn serializes_to_json() {
        let json = serde_json::to_value(NetlistStats::default()).unwrap();
        assert_eq!(json["transistors"], 0);
        assert!(json["net_sizes"].as_object().unwrap().is_empty());
    }
}
