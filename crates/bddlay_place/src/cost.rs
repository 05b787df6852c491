//! Wirelength cost functions over nets and positions.
//!
//! Positions are given as a slice indexed by transistor id. A net member
//! without a position (id past the end of the slice) is ignored, and a net
//! with fewer than two positioned members contributes nothing.

use bddlay_config::WireMetric;
use bddlay_netlist::Net;
use serde::{Deserialize, Serialize};

/// A point in the placement area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// `|dx| + |dy|`.
    pub fn manhattan(self, other: Point) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

fn member_points<'a>(net: &'a Net, positions: &'a [Point]) -> impl Iterator<Item = Point> + 'a {
    net.members
        .iter()
        .filter_map(move |id| positions.get(id.index()).copied())
}

/// Half-perimeter of one net's bounding box.
pub fn net_hpwl(net: &Net, positions: &[Point]) -> f64 {
    let mut count = 0usize;
    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in member_points(net, positions) {
        count += 1;
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }
    if count < 2 {
        return 0.0;
    }
    (max_x - min_x) + (max_y - min_y)
}

/// Sum of pairwise Manhattan distances inside one net.
///
/// Quadratic in the net size.
pub fn net_manhattan(net: &Net, positions: &[Point]) -> f64 {
    let points: Vec<Point> = member_points(net, positions).collect();
    let mut total = 0.0;
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            total += a.manhattan(*b);
        }
    }
    total
}

/// Sum of Manhattan distances from each member to the net centroid.
pub fn net_star(net: &Net, positions: &[Point]) -> f64 {
    let points: Vec<Point> = member_points(net, positions).collect();
    if points.len() < 2 {
        return 0.0;
    }
    let n = points.len() as f64;
    let center = Point::new(
        points.iter().map(|p| p.x).sum::<f64>() / n,
        points.iter().map(|p| p.y).sum::<f64>() / n,
    );
    points.iter().map(|p| p.manhattan(center)).sum()
}

/// Total half-perimeter wirelength.
pub fn total_hpwl(nets: &[Net], positions: &[Point]) -> f64 {
    nets.iter().map(|net| net_hpwl(net, positions)).sum()
}

/// Total pairwise Manhattan wirelength. Never less than [`total_hpwl`], and
/// equal to it when every net has exactly two positioned members.
pub fn total_manhattan(nets: &[Net], positions: &[Point]) -> f64 {
    nets.iter().map(|net| net_manhattan(net, positions)).sum()
}

/// Total star (centroid) wirelength.
pub fn total_star(nets: &[Net], positions: &[Point]) -> f64 {
    nets.iter().map(|net| net_star(net, positions)).sum()
}

/// Evaluates the chosen metric.
pub fn wirelength(metric: WireMetric, nets: &[Net], positions: &[Point]) -> f64 {
    match metric {
        WireMetric::Hpwl => total_hpwl(nets, positions),
        WireMetric::Manhattan => total_manhattan(nets, positions),
        WireMetric::Star => total_star(nets, positions),
    }
}

/// Span `max slot - min slot` of one net in a row, given each transistor's
/// slot.
pub fn net_row_span(net: &Net, slots: &[usize]) -> usize {
    let mut iter = net.members.iter().filter_map(|id| slots.get(id.index()).copied());
    let Some(first) = iter.next() else {
        return 0;
    };
    let (min, max) = iter.fold((first, first), |(lo, hi), s| (lo.min(s), hi.max(s)));
    max - min
}

/// Percentage by which `final_cost` improves on `initial_cost`, or `None`
/// when the baseline is zero.
pub fn improvement_percent(initial_cost: f64, final_cost: f64) -> Option<f64> {
    if initial_cost == 0.0 {
        return None;
    }
    Some((initial_cost - final_cost) / initial_cost * 100.0)
}
