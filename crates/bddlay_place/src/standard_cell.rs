//! Multi-row standard-cell placement on a site grid.
//!
//! The area is divided into `floor(height / row_height)` rows of
//! `floor(width / site_width)` sites. A legal position is the lower-left
//! corner of a site, `(site * site_width, row * row_height)`.

use crate::cost::{self, Point};
use crate::error::PlaceError;
use crate::free2d::check_area;
use crate::layout::{point_map, Layout, Position};
use bddlay_config::StandardCellConfig;
use bddlay_diagnostics::{codes, Diagnostic};
use bddlay_netlist::{Netlist, TransistorId};
use bddlay_source::Span;
use log::debug;
use rand::Rng;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Positions within this distance of a grid line count as on it.
const GRID_TOLERANCE: f64 = 1e-6;

/// Largest site offset of a same-row move.
const ROW_JITTER: i64 = 5;

/// The row/site grid of a standard-cell area.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CellGrid {
    /// Area width.
    pub width: f64,
    /// Area height.
    pub height: f64,
    /// Horizontal site pitch.
    pub site_width: f64,
    /// Vertical row pitch.
    pub row_height: f64,
    /// Number of rows.
    pub num_rows: usize,
    /// Number of sites in every row.
    pub sites_per_row: usize,
}

impl CellGrid {
    /// Derives the grid from an area and pitches.
    pub fn from_config(config: &StandardCellConfig) -> Result<Self, PlaceError> {
        check_area(config.width, config.height)?;
        let invalid = || PlaceError::InvalidGrid {
            width: config.width,
            height: config.height,
            site_width: config.site_width,
            row_height: config.row_height,
        };
        if !(config.site_width > 0.0 && config.row_height > 0.0)
            || !config.site_width.is_finite()
            || !config.row_height.is_finite()
        {
            return Err(invalid());
        }
        let num_rows = (config.height / config.row_height).floor() as usize;
        let sites_per_row = (config.width / config.site_width).floor() as usize;
        if num_rows == 0 || sites_per_row == 0 {
            return Err(invalid());
        }
        Ok(Self {
            width: config.width,
            height: config.height,
            site_width: config.site_width,
            row_height: config.row_height,
            num_rows,
            sites_per_row,
        })
    }

    /// The legal point of a row and site.
    pub fn site_point(&self, row: usize, site: usize) -> Point {
        Point::new(site as f64 * self.site_width, row as f64 * self.row_height)
    }

    /// Row containing `y`, clamped to the grid.
    pub fn row_of(&self, y: f64) -> usize {
        clamp_index((y / self.row_height).floor(), self.num_rows)
    }

    /// Site containing `x`, clamped to the grid.
    pub fn site_of(&self, x: f64) -> usize {
        clamp_index((x / self.site_width).floor(), self.sites_per_row)
    }

    /// Snaps a point to the nearest row and site inside the grid.
    pub fn legalize(&self, x: f64, y: f64) -> Point {
        let row = clamp_index((y / self.row_height).round(), self.num_rows);
        let site = clamp_index((x / self.site_width).round(), self.sites_per_row);
        self.site_point(row, site)
    }

    /// Total number of sites.
    pub fn capacity(&self) -> usize {
        self.num_rows * self.sites_per_row
    }
}

fn clamp_index(value: f64, len: usize) -> usize {
    if value <= 0.0 || value.is_nan() {
        0
    } else {
        (value as usize).min(len - 1)
    }
}

fn on_grid(value: f64, pitch: f64) -> bool {
    let units = value / pitch;
    (units - units.round()).abs() * pitch <= GRID_TOLERANCE
}

/// How a position breaks the grid rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// `y` is not a multiple of the row height.
    OffRow,
    /// `x` is not a multiple of the site width.
    OffSite,
    /// The position is outside `[0, width) x [0, height)`.
    OutOfBounds,
}

/// The first illegal position found in a layout.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LegalityViolation {
    /// The offending transistor.
    pub id: TransistorId,
    /// Its position.
    pub position: Point,
    /// What is wrong.
    pub kind: ViolationKind,
}

impl LegalityViolation {
    /// Converts the violation into a diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::warning(codes::ILLEGAL_POSITION, self.to_string(), Span::DUMMY)
            .with_help("legalize the layout to snap positions to the nearest site")
    }
}

impl fmt::Display for LegalityViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            ViolationKind::OffRow => "is not on a row",
            ViolationKind::OffSite => "is not on a site",
            ViolationKind::OutOfBounds => "is outside the placement area",
        };
        write!(
            f,
            "{} at ({:.2}, {:.2}) {what}",
            self.id, self.position.x, self.position.y
        )
    }
}

/// Transistors on the sites of a row grid. Cost is pairwise Manhattan
/// wirelength.
#[derive(Clone, Debug)]
pub struct StandardCellLayout<'a> {
    netlist: &'a Netlist,
    grid: CellGrid,
    positions: Vec<Point>,
}

impl<'a> StandardCellLayout<'a> {
    /// Places every transistor on a random row and site.
    pub fn new<R: Rng + ?Sized>(
        netlist: &'a Netlist,
        config: &StandardCellConfig,
        rng: &mut R,
    ) -> Result<Self, PlaceError> {
        let grid = CellGrid::from_config(config)?;
        let positions = (0..netlist.len())
            .map(|_| {
                grid.site_point(
                    rng.gen_range(0..grid.num_rows),
                    rng.gen_range(0..grid.sites_per_row),
                )
            })
            .collect();
        debug!(
            "standard-cell layout: {} transistors on {} rows x {} sites",
            netlist.len(),
            grid.num_rows,
            grid.sites_per_row
        );
        Ok(Self {
            netlist,
            grid,
            positions,
        })
    }

    /// Uses the given positions, one per transistor in id order. They need
    /// not be legal.
    pub fn with_positions(
        netlist: &'a Netlist,
        config: &StandardCellConfig,
        positions: Vec<Point>,
    ) -> Result<Self, PlaceError> {
        let grid = CellGrid::from_config(config)?;
        if positions.len() != netlist.len() {
            return Err(PlaceError::PositionCount {
                expected: netlist.len(),
                actual: positions.len(),
            });
        }
        Ok(Self {
            netlist,
            grid,
            positions,
        })
    }

    /// The row/site grid.
    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    /// Snaps a point to the nearest legal site.
    pub fn legalize(&self, x: f64, y: f64) -> Point {
        self.grid.legalize(x, y)
    }

    /// A copy with every position snapped to its nearest legal site.
    pub fn legalize_all(&self) -> Self {
        let mut next = self.clone();
        for p in &mut next.positions {
            *p = self.grid.legalize(p.x, p.y);
        }
        next
    }

    /// Returns the first position that is off a row, off a site, or out of
    /// bounds, checked in id order.
    pub fn check_legality(&self) -> Result<(), LegalityViolation> {
        for (i, &p) in self.positions.iter().enumerate() {
            let kind = if !on_grid(p.y, self.grid.row_height) {
                ViolationKind::OffRow
            } else if !on_grid(p.x, self.grid.site_width) {
                ViolationKind::OffSite
            } else if p.x < 0.0 || p.x >= self.grid.width || p.y < 0.0 || p.y >= self.grid.height {
                ViolationKind::OutOfBounds
            } else {
                continue;
            };
            return Err(LegalityViolation {
                id: TransistorId::from(i),
                position: p,
                kind,
            });
        }
        Ok(())
    }

    /// Moves one transistor by a same-row jitter, to a random site, or to an
    /// adjacent site, chosen uniformly. Returns the moved id, or `None` for an
    /// empty layout.
    fn perturb<R: Rng + ?Sized>(&self, rng: &mut R) -> (Self, Option<TransistorId>) {
        let mut next = self.clone();
        if next.positions.is_empty() {
            return (next, None);
        }
        let grid = &self.grid;
        let id = rng.gen_range(0..next.positions.len());
        let current = next.positions[id];
        let row = grid.row_of(current.y) as i64;
        let site = grid.site_of(current.x) as i64;
        let clamp = |v: i64, len: usize| v.clamp(0, len as i64 - 1) as usize;

        let (new_row, new_site) = match rng.gen_range(0..3) {
            0 => (
                row as usize,
                clamp(site + rng.gen_range(-ROW_JITTER..=ROW_JITTER), grid.sites_per_row),
            ),
            1 => (
                rng.gen_range(0..grid.num_rows),
                rng.gen_range(0..grid.sites_per_row),
            ),
            _ => {
                let dx = rng.gen_range(-1..=1);
                let dy = rng.gen_range(-1..=1);
                (clamp(row + dy, grid.num_rows), clamp(site + dx, grid.sites_per_row))
            }
        };
        next.positions[id] = grid.site_point(new_row, new_site);
        (next, Some(TransistorId::from(id)))
    }

    /// Occupied sites per row divided by the sites in a row.
    pub fn row_utilization(&self) -> Vec<f64> {
        let mut counts = vec![0usize; self.grid.num_rows];
        for p in &self.positions {
            counts[self.grid.row_of(p.y)] += 1;
        }
        counts
            .into_iter()
            .map(|c| c as f64 / self.grid.sites_per_row as f64)
            .collect()
    }
}

impl Layout for StandardCellLayout<'_> {
    fn model_name(&self) -> &'static str {
        "standard-cell"
    }

    fn netlist(&self) -> &Netlist {
        self.netlist
    }

    fn cost(&self) -> f64 {
        cost::total_manhattan(self.netlist.nets(), &self.positions)
    }

    fn neighbor<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        self.perturb(rng).0
    }

    /// Only the nets of the moved transistor change length.
    fn neighbor_with_cost<R: Rng + ?Sized>(&self, current_cost: f64, rng: &mut R) -> (Self, f64) {
        let (next, moved) = self.perturb(rng);
        let Some(id) = moved else {
            return (next, current_cost);
        };
        let delta: f64 = self
            .netlist
            .nets_of(id)
            .iter()
            .filter_map(|&net| self.netlist.net(net))
            .map(|net| {
                cost::net_manhattan(net, &next.positions) - cost::net_manhattan(net, &self.positions)
            })
            .sum();
        (next, current_cost + delta)
    }

    fn positions(&self) -> BTreeMap<TransistorId, Position> {
        point_map(&self.positions)
    }

    fn points(&self) -> Vec<Point> {
        self.positions.clone()
    }
}
