//! Single-row permutation placement with diffusion sharing.
//!
//! Transistors occupy slots `0..n` of one row. The cost combines a 1-D
//! wirelength (each net's slot span) with an area term that rewards placing
//! net co-members side by side, where they could share a diffusion region.

use crate::cost::{self, Point};
use crate::error::PlaceError;
use crate::layout::{Layout, Position};
use bddlay_config::SingleRowConfig;
use bddlay_netlist::{NetId, Netlist, TransistorId};
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::collections::BTreeMap;

/// Weights of the two cost terms.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RowWeights {
    /// Weight of the wirelength term.
    pub w_wire: f64,
    /// Weight of the area term.
    pub w_area: f64,
}

impl RowWeights {
    /// Checks that both weights are finite and non-negative.
    pub fn validate(self) -> Result<Self, PlaceError> {
        let ok = |w: f64| w.is_finite() && w >= 0.0;
        if ok(self.w_wire) && ok(self.w_area) {
            Ok(self)
        } else {
            Err(PlaceError::InvalidWeights {
                w_wire: self.w_wire,
                w_area: self.w_area,
            })
        }
    }
}

impl From<&SingleRowConfig> for RowWeights {
    fn from(config: &SingleRowConfig) -> Self {
        Self {
            w_wire: config.w_wire,
            w_area: config.w_area,
        }
    }
}

/// A row order of all transistors.
#[derive(Clone, Debug)]
pub struct SingleRowLayout<'a> {
    netlist: &'a Netlist,
    weights: RowWeights,
    order: Vec<TransistorId>,
    slot_of: Vec<usize>,
}

impl<'a> SingleRowLayout<'a> {
    /// Places the transistors in a random order.
    pub fn new<R: Rng + ?Sized>(
        netlist: &'a Netlist,
        weights: RowWeights,
        rng: &mut R,
    ) -> Result<Self, PlaceError> {
        let weights = weights.validate()?;
        let mut order: Vec<TransistorId> = netlist.ids().collect();
        order.shuffle(rng);
        debug!(
            "single-row layout: {} transistors, w_wire {}, w_area {}",
            order.len(),
            weights.w_wire,
            weights.w_area
        );
        Ok(Self::from_order_unchecked(netlist, weights, order))
    }

    /// Uses a given order, which must contain every transistor exactly once.
    pub fn from_order(
        netlist: &'a Netlist,
        weights: RowWeights,
        order: Vec<TransistorId>,
    ) -> Result<Self, PlaceError> {
        let weights = weights.validate()?;
        if order.len() != netlist.len() {
            return Err(PlaceError::InvalidPermutation {
                reason: format!("{} slots for {} transistors", order.len(), netlist.len()),
            });
        }
        let mut seen = vec![false; netlist.len()];
        for &id in &order {
            let slot = seen
                .get_mut(id.index())
                .ok_or(PlaceError::UnknownTransistor { id })?;
            if *slot {
                return Err(PlaceError::InvalidPermutation {
                    reason: format!("{id} appears twice"),
                });
            }
            *slot = true;
        }
        Ok(Self::from_order_unchecked(netlist, weights, order))
    }

    fn from_order_unchecked(netlist: &'a Netlist, weights: RowWeights, order: Vec<TransistorId>) -> Self {
        let mut slot_of = vec![0; order.len()];
        for (slot, id) in order.iter().enumerate() {
            slot_of[id.index()] = slot;
        }
        Self {
            netlist,
            weights,
            order,
            slot_of,
        }
    }

    /// Transistor ids in slot order.
    pub fn placement(&self) -> &[TransistorId] {
        &self.order
    }

    /// Slot of one transistor.
    pub fn slot_of(&self, id: TransistorId) -> Option<usize> {
        self.slot_of.get(id.index()).copied()
    }

    /// The cost weights.
    pub fn weights(&self) -> RowWeights {
        self.weights
    }

    /// Sum over nets of `max slot - min slot`.
    pub fn wire_cost(&self) -> usize {
        self.netlist
            .nets()
            .iter()
            .map(|net| cost::net_row_span(net, &self.slot_of))
            .sum()
    }

    /// Number of adjacent slot pairs whose transistors share a net.
    pub fn shared_pairs(&self) -> usize {
        (0..self.order.len().saturating_sub(1))
            .filter(|&k| self.pair_shared(k))
            .count()
    }

    /// `transistors - shared_pairs`.
    pub fn area_cost(&self) -> usize {
        self.order.len() - self.shared_pairs()
    }

    fn pair_shared(&self, left_slot: usize) -> bool {
        self.netlist
            .shares_net(self.order[left_slot], self.order[left_slot + 1])
    }

    fn weighted(&self, wire: f64, area: f64) -> f64 {
        self.weights.w_wire * wire + self.weights.w_area * area
    }

    fn swapped(&self, i: usize, j: usize) -> Self {
        let mut next = self.clone();
        let (a, b) = (next.order[i], next.order[j]);
        next.order.swap(i, j);
        next.slot_of[a.index()] = j;
        next.slot_of[b.index()] = i;
        next
    }

    /// Two distinct uniformly random slots.
    fn pick_slots<R: Rng + ?Sized>(&self, rng: &mut R) -> (usize, usize) {
        let n = self.order.len();
        let i = rng.gen_range(0..n);
        let mut j = rng.gen_range(0..n - 1);
        if j >= i {
            j += 1;
        }
        (i, j)
    }
}

/// Left slots of the adjacent pairs touching slot `i` or `j`.
fn touched_pairs(i: usize, j: usize, n: usize) -> Vec<usize> {
    let mut pairs = Vec::with_capacity(4);
    for s in [i, j] {
        if s > 0 {
            pairs.push(s - 1);
        }
        if s + 1 < n {
            pairs.push(s);
        }
    }
    pairs.sort_unstable();
    pairs.dedup();
    pairs
}

impl Layout for SingleRowLayout<'_> {
    fn model_name(&self) -> &'static str {
        "single-row"
    }

    fn netlist(&self) -> &Netlist {
        self.netlist
    }

    fn cost(&self) -> f64 {
        self.weighted(self.wire_cost() as f64, self.area_cost() as f64)
    }

    fn neighbor<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        if self.order.len() < 2 {
            return self.clone();
        }
        let (i, j) = self.pick_slots(rng);
        self.swapped(i, j)
    }

    /// Only the nets of the two swapped transistors and the adjacent pairs
    /// around the two slots can change, so only those are re-evaluated.
    fn neighbor_with_cost<R: Rng + ?Sized>(&self, current_cost: f64, rng: &mut R) -> (Self, f64) {
        let n = self.order.len();
        if n < 2 {
            return (self.clone(), current_cost);
        }
        let (i, j) = self.pick_slots(rng);
        let next = self.swapped(i, j);

        let mut nets: Vec<NetId> = self.netlist.nets_of(self.order[i]).to_vec();
        nets.extend_from_slice(self.netlist.nets_of(self.order[j]));
        nets.sort_unstable();
        nets.dedup();
        let span = |layout: &Self| -> i64 {
            nets.iter()
                .filter_map(|&id| layout.netlist.net(id))
                .map(|net| cost::net_row_span(net, &layout.slot_of) as i64)
                .sum()
        };

        let pairs = touched_pairs(i, j, n);
        let shared = |layout: &Self| -> i64 {
            pairs.iter().filter(|&&k| layout.pair_shared(k)).count() as i64
        };

        let wire_delta = span(&next) - span(self);
        let area_delta = shared(self) - shared(&next);
        let cost = current_cost + self.weighted(wire_delta as f64, area_delta as f64);
        (next, cost)
    }

    fn positions(&self) -> BTreeMap<TransistorId, Position> {
        self.order
            .iter()
            .enumerate()
            .map(|(slot, &id)| (id, Position::Slot(slot)))
            .collect()
    }

    fn points(&self) -> Vec<Point> {
        self.slot_of
            .iter()
            .map(|&slot| Point::new(slot as f64, 0.0))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bddlay_diagnostics::DiagnosticSink;
    use bddlay_netlist::load_netlist;
    use bddlay_source::SourceText;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn netlist(text: &str) -> Netlist {
        let source = SourceText::new("t.bdd", text.to_string());
        load_netlist(&source, &DiagnosticSink::new()).unwrap().1
    }

    /// Two transistors sharing their source node.
    fn pair() -> Netlist {
        netlist("[(-1,-2)]\n[0]")
    }

    /// Nets {0,1}, {0,2,3}, {1,4,5}.
    fn six() -> Netlist {
        netlist("[(0,1)]\n[(-2,-1)],[(-2,-1)]\n[0,1]")
    }

    fn ids(raw: &[u32]) -> Vec<TransistorId> {
        raw.iter().copied().map(TransistorId::from_raw).collect()
    }

    const WIRE_ONLY: RowWeights = RowWeights {
        w_wire: 1.0,
        w_area: 0.0,
    };
    const AREA_ONLY: RowWeights = RowWeights {
        w_wire: 0.0,
        w_area: 1.0,
    };

    #[test]
    fn wire_only_pair_is_swap_invariant() {
        let nl = pair();
        assert_eq!(nl.net_count(), 1);
        let mut rng = StdRng::seed_from_u64(11);
        let layout = SingleRowLayout::new(&nl, WIRE_ONLY, &mut rng).unwrap();
        let slots: Vec<usize> = nl.ids().filter_map(|id| layout.slot_of(id)).collect();
        assert_eq!(layout.cost(), (slots[0] as f64 - slots[1] as f64).abs());
        assert_eq!(layout.cost(), 1.0);

        let next = layout.neighbor(&mut rng);
        assert_ne!(next.placement(), layout.placement());
        assert_eq!(next.cost(), layout.cost());
    }

    #[test]
    fn area_counts_shared_adjacencies() {
        let nl = six();
        let adjacent = SingleRowLayout::from_order(&nl, AREA_ONLY, ids(&[0, 1, 2, 3, 4, 5])).unwrap();
        // 0-1 share, 1-2 no, 2-3 share, 3-4 no, 4-5 share
        assert_eq!(adjacent.shared_pairs(), 3);
        assert_eq!(adjacent.area_cost(), 3);
        assert_eq!(adjacent.cost(), 3.0);
    }

    #[test]
    fn breaking_an_adjacency_costs_one() {
        // net {0,1}; transistor 2 is unconnected
        let nl = netlist("[(-1,-2)],[-1]\n[0]");
        assert_eq!(nl.len(), 3);
        let together = SingleRowLayout::from_order(&nl, AREA_ONLY, ids(&[0, 1, 2])).unwrap();
        assert_eq!(together.area_cost(), nl.len() - 1);
        let apart = SingleRowLayout::from_order(&nl, AREA_ONLY, ids(&[0, 2, 1])).unwrap();
        assert_eq!(apart.area_cost(), together.area_cost() + 1);
        assert_eq!(apart.cost() - together.cost(), 1.0);
    }

    #[test]
    fn pair_area_is_n_minus_one_when_adjacent() {
        let nl = pair();
        let layout = SingleRowLayout::from_order(&nl, AREA_ONLY, ids(&[1, 0])).unwrap();
        assert_eq!(layout.area_cost(), nl.len() - 1);
    }

    #[test]
    fn wire_cost_is_sum_of_spans() {
        let nl = six();
        let layout = SingleRowLayout::from_order(&nl, WIRE_ONLY, ids(&[5, 0, 1, 2, 3, 4])).unwrap();
        // slots: 0→1, 1→2, 2→3, 3→4, 4→5, 5→0
        // {0,1}: 1, {0,2,3}: 3, {1,4,5}: 5
        assert_eq!(layout.wire_cost(), 9);
    }

    #[test]
    fn neighbor_is_one_transposition() {
        let nl = six();
        let mut rng = StdRng::seed_from_u64(5);
        let layout = SingleRowLayout::new(&nl, RowWeights { w_wire: 0.5, w_area: 0.5 }, &mut rng).unwrap();
        for _ in 0..100 {
            let before = layout.placement().to_vec();
            let next = layout.neighbor(&mut rng);
            assert_eq!(layout.placement(), before.as_slice());

            let mut sorted = next.placement().to_vec();
            sorted.sort();
            assert_eq!(sorted, ids(&[0, 1, 2, 3, 4, 5]));
            let differing = before
                .iter()
                .zip(next.placement())
                .filter(|(a, b)| a != b)
                .count();
            assert_eq!(differing, 2);
        }
    }

    #[test]
    fn incremental_cost_matches_full_recompute() {
        let nl = netlist("[(0,1)]\n[(0,1),(1,2)]\n[(-1,-2)],[-1],[(-2,-1)]\n[0,1,2]");
        let mut rng = StdRng::seed_from_u64(42);
        let weights = RowWeights {
            w_wire: 0.7,
            w_area: 1.3,
        };
        let mut layout = SingleRowLayout::new(&nl, weights, &mut rng).unwrap();
        let mut cost = layout.cost();
        for _ in 0..200 {
            let (next, next_cost) = layout.neighbor_with_cost(cost, &mut rng);
            assert!(
                (next_cost - next.cost()).abs() < 1e-6,
                "incremental {next_cost} vs full {}",
                next.cost()
            );
            layout = next;
            cost = next_cost;
        }
    }

    #[test]
    fn positions_and_points_agree() {
        let nl = six();
        let layout = SingleRowLayout::from_order(&nl, WIRE_ONLY, ids(&[2, 0, 1, 3, 5, 4])).unwrap();
        let positions = layout.positions();
        assert_eq!(positions[&TransistorId::from_raw(2)], Position::Slot(0));
        assert_eq!(layout.points()[4], Point::new(5.0, 0.0));
        assert_eq!(layout.slot_of(TransistorId::from_raw(0)), Some(1));
    }

    #[test]
    fn rejects_bad_orders_and_weights() {
        let nl = pair();
        assert!(matches!(
            SingleRowLayout::from_order(&nl, WIRE_ONLY, ids(&[0])),
            Err(PlaceError::InvalidPermutation { .. })
        ));
        assert!(matches!(
            SingleRowLayout::from_order(&nl, WIRE_ONLY, ids(&[0, 0])),
            Err(PlaceError::InvalidPermutation { .. })
        ));
        assert!(matches!(
            SingleRowLayout::from_order(&nl, WIRE_ONLY, ids(&[0, 5])),
            Err(PlaceError::UnknownTransistor { .. })
        ));
        let negative = RowWeights {
            w_wire: -1.0,
            w_area: 0.0,
        };
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            SingleRowLayout::new(&nl, negative, &mut rng),
            Err(PlaceError::InvalidWeights { .. })
        ));
    }

    #[test]
    fn tiny_rows() {
        let nl = netlist("[[-1]]\n[0]");
        let mut rng = StdRng::seed_from_u64(0);
        let layout = SingleRowLayout::new(&nl, WIRE_ONLY, &mut rng).unwrap();
        assert_eq!(layout.neighbor(&mut rng).placement(), layout.placement());
        assert_eq!(layout.neighbor_with_cost(4.0, &mut rng).1, 4.0);
        assert_eq!(layout.area_cost(), 1);
    }

    #[test]
    fn touched_pairs_dedups() {
        assert_eq!(touched_pairs(0, 1, 5), vec![0, 1]);
        assert_eq!(touched_pairs(2, 4, 5), vec![1, 2, 3]);
        assert_eq!(touched_pairs(0, 4, 5), vec![0, 3]);
    }
}
