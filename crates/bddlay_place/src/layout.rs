//! The contract shared by every layout model.

use crate::cost::{self, Point};
use bddlay_netlist::{Netlist, TransistorId};
use rand::Rng;
use serde::Serialize;
use std::collections::BTreeMap;

/// Where one transistor is placed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Position {
    /// A point in a continuous area.
    Point(Point),
    /// A slot index in a single row.
    Slot(usize),
}

/// A placement of every transistor of a netlist.
///
/// Layouts are values: [`Layout::neighbor`] returns a new, independent
/// layout and never changes the receiver, so an optimizer can always
/// compare the current and candidate layouts side by side.
pub trait Layout: Clone {
    /// Short model name used in logs and reports.
    fn model_name(&self) -> &'static str;

    /// The netlist being placed.
    fn netlist(&self) -> &Netlist;

    /// The model's cost. Lower is better.
    fn cost(&self) -> f64;

    /// A randomly perturbed copy of this layout.
    fn neighbor<R: Rng + ?Sized>(&self, rng: &mut R) -> Self;

    /// Transistor id → position.
    fn positions(&self) -> BTreeMap<TransistorId, Position>;

    /// Positions as points indexed by transistor id. Row slots map to
    /// `(slot, 0)`.
    fn points(&self) -> Vec<Point>;

    /// A neighbor and its cost, given the cost of `self`.
    ///
    /// The default recomputes the cost in full. Models that can derive the
    /// cost change from the perturbation alone override this.
    fn neighbor_with_cost<R: Rng + ?Sized>(&self, current_cost: f64, rng: &mut R) -> (Self, f64) {
        let _ = current_cost;
        let next = self.neighbor(rng);
        let cost = next.cost();
        (next, cost)
    }

    /// Pairwise Manhattan wirelength over [`Layout::points`].
    fn manhattan_wirelength(&self) -> f64 {
        cost::total_manhattan(self.netlist().nets(), &self.points())
    }

    /// Half-perimeter wirelength over [`Layout::points`].
    fn hpwl(&self) -> f64 {
        cost::total_hpwl(self.netlist().nets(), &self.points())
    }
}

/// Collects per-id points into a position map.
pub(crate) fn point_map(points: &[Point]) -> BTreeMap<TransistorId, Position> {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| (TransistorId::from(i), Position::Point(*p)))
        .collect()
}
