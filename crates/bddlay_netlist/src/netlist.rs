//! The transistor arena and the nets derived from shared coordinates.

use crate::ids::{NetId, TransistorId};
use crate::transistor::{Coord, Transistor};
use serde::Serialize;
use std::collections::HashMap;

/// Transistors sharing one endpoint coordinate.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct Net {
    /// Dense net id.
    pub id: NetId,
    /// The shared coordinate.
    pub coord: Coord,
    /// Member transistors, in registration order, without duplicates.
    pub members: Vec<TransistorId>,
}

impl Net {
    /// Number of members (always at least 2).
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always `false`; nets are never empty.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns `true` if `id` is a member.
    pub fn contains(&self, id: TransistorId) -> bool {
        self.members.contains(&id)
    }
}

/// The built network: a dense transistor arena plus its nets.
///
/// Transistors are indexed by [`TransistorId`], nets by [`NetId`]. Both are
/// immutable once built.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Netlist {
    transistors: Vec<Transistor>,
    nets: Vec<Net>,
    #[serde(skip)]
    nets_by_transistor: Vec<Vec<NetId>>,
}

impl Netlist {
    /// Derives nets from a transistor list whose ids are `0..len` in order.
    ///
    /// Each transistor registers its source coordinate and, if non-terminal,
    /// its target coordinate. A coordinate registered by two or more
    /// transistors becomes a net. Nets are numbered in first-registration
    /// order of their coordinates.
    pub fn from_transistors(transistors: Vec<Transistor>) -> Self {
        let mut order: Vec<Coord> = Vec::new();
        let mut by_coord: HashMap<Coord, Vec<TransistorId>> = HashMap::new();

        let mut register = |coord: Coord, id: TransistorId| {
            let members = by_coord.entry(coord).or_insert_with(|| {
                order.push(coord);
                Vec::new()
            });
            if !members.contains(&id) {
                members.push(id);
            }
        };
        for t in &transistors {
            register(t.source, t.id);
            if let Some(coord) = t.target.coord() {
                register(coord, t.id);
            }
        }

        let mut nets = Vec::new();
        let mut nets_by_transistor = vec![Vec::new(); transistors.len()];
        for coord in order {
            let Some(members) = by_coord.remove(&coord) else {
                continue;
            };
            if members.len() < 2 {
                continue;
            }
            let id = NetId::from(nets.len());
            for member in &members {
                if let Some(slot) = nets_by_transistor.get_mut(member.index()) {
                    slot.push(id);
                }
            }
            nets.push(Net { id, coord, members });
        }

        Self {
            transistors,
            nets,
            nets_by_transistor,
        }
    }

    /// All transistors, indexed by id.
    pub fn transistors(&self) -> &[Transistor] {
        &self.transistors
    }

    /// All nets, indexed by id.
    pub fn nets(&self) -> &[Net] {
        &self.nets
    }

    /// Looks up a transistor.
    pub fn transistor(&self, id: TransistorId) -> Option<&Transistor> {
        self.transistors.get(id.index())
    }

    /// Looks up a net.
    pub fn net(&self, id: NetId) -> Option<&Net> {
        self.nets.get(id.index())
    }

    /// Number of transistors.
    pub fn len(&self) -> usize {
        self.transistors.len()
    }

    /// Returns `true` if there are no transistors.
    pub fn is_empty(&self) -> bool {
        self.transistors.is_empty()
    }

    /// Number of nets.
    pub fn net_count(&self) -> usize {
        self.nets.len()
    }

    /// Every transistor id, ascending.
    pub fn ids(&self) -> impl Iterator<Item = TransistorId> + '_ {
        self.transistors.iter().map(|t| t.id)
    }

    /// Nets that `id` belongs to.
    pub fn nets_of(&self, id: TransistorId) -> &[NetId] {
        self.nets_by_transistor
            .get(id.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns `true` if some net contains both `a` and `b`.
    pub fn shares_net(&self, a: TransistorId, b: TransistorId) -> bool {
        let (nets_a, nets_b) = (self.nets_of(a), self.nets_of(b));
        nets_a.iter().any(|n| nets_b.contains(n))
    }

    /// Transistors from terminal nodes (leaf and leaf-switch).
    pub fn leaf_transistors(&self) -> impl Iterator<Item = &Transistor> + '_ {
        self.transistors.iter().filter(|t| t.kind.is_leaf())
    }

    /// Dense symmetric adjacency: `m[a][b]` is set when `a != b` share a net.
    ///
    /// Uses O(n²) memory in the transistor count.
    pub fn connection_matrix(&self) -> Vec<Vec<bool>> {
        let n = self.transistors.len();
        let mut matrix = vec![vec![false; n]; n];
        for net in &self.nets {
            for (i, a) in net.members.iter().enumerate() {
                for b in &net.members[i + 1..] {
                    let (a, b) = (a.index(), b.index());
                    if a < n && b < n {
                        matrix[a][b] = true;
                        matrix[b][a] = true;
                    }
                }
            }
        }
        matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transistor::{Activation, Target, TransistorKind};
    use bddlay_source::Span;

    fn leaf(id: u32, source: Coord, target: i64) -> Transistor {
        Transistor {
            id: TransistorId::from_raw(id),
            layer: source.layer,
            node: source.node,
            branch: None,
            kind: TransistorKind::Leaf,
            source,
            target: Target::resolve(target, source.layer),
            control: None,
            activation: Activation::Always,
            span: Span::DUMMY,
        }
    }

    fn ids(raw: &[u32]) -> Vec<TransistorId> {
        raw.iter().copied().map(TransistorId::from_raw).collect()
    }

    #[test]
    fn shared_source_forms_net() {
        let netlist = Netlist::from_transistors(vec![
            leaf(0, Coord::new(0, 0), -1),
            leaf(1, Coord::new(0, 0), -2),
            leaf(2, Coord::new(0, 1), -1),
        ]);
        assert_eq!(netlist.net_count(), 1);
        assert_eq!(netlist.nets()[0].members, ids(&[0, 1]));
        assert_eq!(netlist.nets()[0].coord, Coord::new(0, 0));
    }

    #[test]
    fn target_meets_source() {
        let netlist = Netlist::from_transistors(vec![
            leaf(0, Coord::new(0, 0), 0),
            leaf(1, Coord::new(1, 0), -1),
        ]);
        assert_eq!(netlist.net_count(), 1);
        assert_eq!(netlist.nets()[0].coord, Coord::new(1, 0));
        assert!(netlist.shares_net(TransistorId::from_raw(0), TransistorId::from_raw(1)));
    }

    #[test]
    fn singletons_are_dropped() {
        let netlist = Netlist::from_transistors(vec![
            leaf(0, Coord::new(0, 0), -1),
            leaf(1, Coord::new(0, 1), -1),
        ]);
        assert_eq!(netlist.net_count(), 0);
        assert!(netlist.nets_of(TransistorId::from_raw(0)).is_empty());
    }

    #[test]
    fn reverse_index_and_matrix() {
        let netlist = Netlist::from_transistors(vec![
            leaf(0, Coord::new(0, 0), 0),
            leaf(1, Coord::new(0, 0), 1),
            leaf(2, Coord::new(1, 0), -1),
            leaf(3, Coord::new(1, 1), -1),
        ]);
        // (0,0): {0,1}, (1,0): {0,2}, (1,1): {1,3}
        assert_eq!(netlist.net_count(), 3);
        assert_eq!(netlist.nets_of(TransistorId::from_raw(0)).len(), 2);
        assert!(!netlist.shares_net(TransistorId::from_raw(2), TransistorId::from_raw(3)));

        let m = netlist.connection_matrix();
        assert!(m[0][1] && m[1][0]);
        assert!(m[0][2] && m[2][0]);
        assert!(m[1][3]);
        assert!(!m[2][3]);
        assert!(!m[0][0]);
    }

    #[test]
    fn lookups() {
        let netlist = Netlist::from_transistors(vec![leaf(0, Coord::new(0, 0), -1)]);
        assert!(netlist.transistor(TransistorId::from_raw(0)).is_some());
        assert!(netlist.transistor(TransistorId::from_raw(1)).is_none());
        assert!(netlist.net(NetId::from_raw(0)).is_none());
        assert_eq!(netlist.leaf_transistors().count(), 1);
        assert_eq!(netlist.ids().collect::<Vec<_>>(), ids(&[0]));
    }
}
