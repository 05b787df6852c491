//! Serializable summaries of a finished placement.

use crate::anneal::{AnnealOutcome, StopReason};
use crate::cost::{self, improvement_percent};
use crate::free2d::Free2dLayout;
use crate::layout::{Layout, Position};
use crate::single_row::{RowWeights, SingleRowLayout};
use crate::standard_cell::{CellGrid, LegalityViolation, StandardCellLayout};
use bddlay_common::ContentHash;
use bddlay_config::WireMetric;
use bddlay_netlist::TransistorId;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Wirelength of the same layout under every metric.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WirelengthComparison {
    /// Pairwise Manhattan wirelength.
    pub manhattan: f64,
    /// Half-perimeter wirelength.
    pub hpwl: f64,
    /// Distance-to-centroid wirelength.
    pub star: f64,
    /// `manhattan / hpwl`, absent when HPWL is zero.
    pub ratio: Option<f64>,
}

impl WirelengthComparison {
    fn of<L: Layout>(layout: &L) -> Self {
        let manhattan = layout.manhattan_wirelength();
        let hpwl = layout.hpwl();
        Self {
            manhattan,
            hpwl,
            star: cost::total_star(layout.netlist().nets(), &layout.points()),
            ratio: (hpwl > 0.0).then(|| manhattan / hpwl),
        }
    }
}

/// Extra detail for single-row layouts.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RowDetails {
    /// Transistor ids in slot order.
    pub placement: Vec<TransistorId>,
    /// Sum of net slot spans.
    pub wire_cost: usize,
    /// Transistors minus shared adjacent pairs.
    pub area_cost: usize,
    /// Adjacent pairs sharing a net.
    pub shared_pairs: usize,
    /// Cost weights.
    pub weights: RowWeights,
}

/// Extra detail for standard-cell layouts.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GridDetails {
    /// The row/site grid.
    pub grid: CellGrid,
    /// Number of sites on the grid.
    pub capacity: usize,
    /// First legality violation, if any.
    pub violation: Option<LegalityViolation>,
    /// Occupancy of each row.
    pub row_utilization: Vec<f64>,
    /// Mean of `row_utilization`.
    pub mean_utilization: f64,
    /// Maximum of `row_utilization`.
    pub max_utilization: f64,
}

/// A complete placement result.
#[derive(Clone, Debug, Serialize)]
pub struct LayoutReport {
    /// Layout model name.
    pub model: String,
    /// Hex XXH3 digest of the input document.
    pub input_hash: String,
    /// Number of transistors.
    pub transistors: usize,
    /// Number of nets.
    pub nets: usize,
    /// Cost before optimization.
    pub initial_cost: f64,
    /// Cost of the returned layout.
    pub final_cost: f64,
    /// Relative improvement; absent when the initial cost is zero.
    pub improvement_percent: Option<f64>,
    /// Iterations performed.
    pub iterations: usize,
    /// Why the optimizer stopped.
    pub stop_reason: StopReason,
    /// Free 2-D cost metric, when applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<WireMetric>,
    /// Wirelength under every metric.
    pub wirelength: WirelengthComparison,
    /// Final positions.
    pub positions: BTreeMap<TransistorId, Position>,
    /// Single-row detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<RowDetails>,
    /// Standard-cell detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standard_cell: Option<GridDetails>,
}

impl LayoutReport {
    fn base<L: Layout>(outcome: &AnnealOutcome<L>, input: ContentHash) -> Self {
        let best = &outcome.best;
        Self {
            model: best.model_name().to_string(),
            input_hash: input.to_hex(),
            transistors: best.netlist().len(),
            nets: best.netlist().net_count(),
            initial_cost: outcome.initial_cost,
            final_cost: outcome.best_cost,
            improvement_percent: improvement_percent(outcome.initial_cost, outcome.best_cost),
            iterations: outcome.iterations,
            stop_reason: outcome.stop_reason,
            metric: None,
            wirelength: WirelengthComparison::of(best),
            positions: best.positions(),
            row: None,
            standard_cell: None,
        }
    }

    /// Report for a free 2-D run.
    pub fn free2d(outcome: &AnnealOutcome<Free2dLayout<'_>>, input: ContentHash) -> Self {
        Self {
            metric: Some(outcome.best.metric()),
            ..Self::base(outcome, input)
        }
    }

    /// Report for a single-row run.
    pub fn single_row(outcome: &AnnealOutcome<SingleRowLayout<'_>>, input: ContentHash) -> Self {
        let best = &outcome.best;
        Self {
            row: Some(RowDetails {
                placement: best.placement().to_vec(),
                wire_cost: best.wire_cost(),
                area_cost: best.area_cost(),
                shared_pairs: best.shared_pairs(),
                weights: best.weights(),
            }),
            ..Self::base(outcome, input)
        }
    }

    /// Report for a standard-cell run.
    pub fn standard_cell(outcome: &AnnealOutcome<StandardCellLayout<'_>>, input: ContentHash) -> Self {
        let best = &outcome.best;
        let row_utilization = best.row_utilization();
        let mean_utilization = if row_utilization.is_empty() {
            0.0
        } else {
            row_utilization.iter().sum::<f64>() / row_utilization.len() as f64
        };
        let max_utilization = row_utilization.iter().copied().fold(0.0, f64::max);
        Self {
            standard_cell: Some(GridDetails {
                grid: *best.grid(),
                capacity: best.grid().capacity(),
                violation: best.check_legality().err(),
                row_utilization,
                mean_utilization,
                max_utilization,
            }),
            ..Self::base(outcome, input)
        }
    }
}

impl fmt::Display for LayoutReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "model: {}", self.model)?;
        writeln!(f, "input: {}", self.input_hash)?;
        writeln!(f, "transistors: {}, nets: {}", self.transistors, self.nets)?;
        if let Some(metric) = self.metric {
            writeln!(f, "metric: {metric:?}")?;
        }
        writeln!(
            f,
            "cost: {:.2} -> {:.2} after {} iterations ({:?})",
            self.initial_cost, self.final_cost, self.iterations, self.stop_reason
        )?;
        match self.improvement_percent {
            Some(pct) => writeln!(f, "improvement: {pct:.2}%")?,
            None => writeln!(f, "improvement: n/a (initial cost is 0)")?,
        }
        write!(
            f,
            "wirelength: manhattan {:.2}, hpwl {:.2}, star {:.2}",
            self.wirelength.manhattan, self.wirelength.hpwl, self.wirelength.star
        )?;
        match self.wirelength.ratio {
            Some(ratio) => writeln!(f, ", ratio {ratio:.2}")?,
            None => writeln!(f)?,
        }

        if let Some(row) = &self.row {
            let order: Vec<String> = row.placement.iter().map(ToString::to_string).collect();
            writeln!(f, "row: {}", order.join(" "))?;
            writeln!(
                f,
                "wire cost: {}, area cost: {}, shared pairs: {}, weights: {} / {}",
                row.wire_cost, row.area_cost, row.shared_pairs, row.weights.w_wire, row.weights.w_area
            )?;
        }
        if let Some(cells) = &self.standard_cell {
            writeln!(
                f,
                "grid: {} rows x {} sites ({} sites for {} transistors)",
                cells.grid.num_rows, cells.grid.sites_per_row, cells.capacity, self.transistors
            )?;
            match &cells.violation {
                None => writeln!(f, "legality: legal")?,
                Some(v) => writeln!(f, "legality: {v}")?,
            }
            writeln!(
                f,
                "row utilization: mean {:.2}, max {:.2}",
                cells.mean_utilization, cells.max_utilization
            )?;
        }

        writeln!(f, "positions:")?;
        for (id, position) in &self.positions {
            match position {
                Position::Point(p) => writeln!(f, "  {id}: ({:.2}, {:.2})", p.x, p.y)?,
                Position::Slot(slot) => writeln!(f, "  {id}: slot {slot}")?,
            }
        }
        Ok(())
    }
}
