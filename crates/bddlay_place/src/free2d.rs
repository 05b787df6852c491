//! Continuous placement in a bounded rectangle.

use crate::cost::{self, Point};
use crate::error::PlaceError;
use crate::layout::{point_map, Layout, Position};
use bddlay_config::{Free2dConfig, WireMetric};
use bddlay_netlist::{Netlist, TransistorId};
use log::debug;
use rand::Rng;
use std::collections::BTreeMap;

/// Fraction of the shorter area side a single move may cover.
const MOVE_FRACTION: f64 = 0.1;

/// Transistors at arbitrary points in `[0, width] x [0, height]`.
#[derive(Clone, Debug)]
pub struct Free2dLayout<'a> {
    netlist: &'a Netlist,
    width: f64,
    height: f64,
    metric: WireMetric,
    positions: Vec<Point>,
}

pub(crate) fn check_area(width: f64, height: f64) -> Result<(), PlaceError> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(PlaceError::InvalidArea { width, height })
    }
}

impl<'a> Free2dLayout<'a> {
    /// Places every transistor uniformly at random.
    pub fn new<R: Rng + ?Sized>(
        netlist: &'a Netlist,
        config: &Free2dConfig,
        rng: &mut R,
    ) -> Result<Self, PlaceError> {
        check_area(config.width, config.height)?;
        let positions = (0..netlist.len())
            .map(|_| {
                Point::new(
                    rng.gen_range(0.0..=config.width),
                    rng.gen_range(0.0..=config.height),
                )
            })
            .collect();
        debug!(
            "free2d layout: {} transistors in {} x {}, metric {:?}",
            netlist.len(),
            config.width,
            config.height,
            config.metric
        );
        Ok(Self {
            netlist,
            width: config.width,
            height: config.height,
            metric: config.metric,
            positions,
        })
    }

    /// Uses the given positions, one per transistor in id order. Every
    /// position must lie inside the area.
    pub fn with_positions(
        netlist: &'a Netlist,
        config: &Free2dConfig,
        positions: Vec<Point>,
    ) -> Result<Self, PlaceError> {
        check_area(config.width, config.height)?;
        if positions.len() != netlist.len() {
            return Err(PlaceError::PositionCount {
                expected: netlist.len(),
                actual: positions.len(),
            });
        }
        let inside =
            |p: &Point| (0.0..=config.width).contains(&p.x) && (0.0..=config.height).contains(&p.y);
        if let Some(i) = positions.iter().position(|p| !inside(p)) {
            return Err(PlaceError::OutsideArea {
                id: TransistorId::from(i),
                position: positions[i],
            });
        }
        Ok(Self {
            netlist,
            width: config.width,
            height: config.height,
            metric: config.metric,
            positions,
        })
    }

    /// Area width and height.
    pub fn area(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// The cost metric.
    pub fn metric(&self) -> WireMetric {
        self.metric
    }

    /// Position of one transistor.
    pub fn position(&self, id: TransistorId) -> Option<Point> {
        self.positions.get(id.index()).copied()
    }
}

impl Layout for Free2dLayout<'_> {
    fn model_name(&self) -> &'static str {
        "free2d"
    }

    fn netlist(&self) -> &Netlist {
        self.netlist
    }

    fn cost(&self) -> f64 {
        cost::wirelength(self.metric, self.netlist.nets(), &self.positions)
    }

    fn neighbor<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        let mut next = self.clone();
        if next.positions.is_empty() {
            return next;
        }
        let id = rng.gen_range(0..next.positions.len());
        let range = self.width.min(self.height) * MOVE_FRACTION;
        let p = next.positions[id];
        next.positions[id] = Point::new(
            (p.x + rng.gen_range(-range..=range)).clamp(0.0, self.width),
            (p.y + rng.gen_range(-range..=range)).clamp(0.0, self.height),
        );
        next
    }

    fn positions(&self) -> BTreeMap<TransistorId, Position> {
        point_map(&self.positions)
    }

    fn points(&self) -> Vec<Point> {
        self.positions.clone()
    }
}
