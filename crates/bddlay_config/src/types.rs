//! Configuration types deserialized from `bddlay.toml`.

use serde::{Deserialize, Serialize};

/// The full configuration. Every section falls back to its defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct BddlayConfig {
    /// Simulated annealing schedule.
    pub anneal: AnnealConfig,
    /// Free 2-D placement area and cost metric.
    pub free2d: Free2dConfig,
    /// Single-row cost weights.
    pub single_row: SingleRowConfig,
    /// Standard-cell area and grid.
    pub standard_cell: StandardCellConfig,
}

/// Annealing schedule settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnnealConfig {
    /// Starting temperature.
    pub initial_temperature: f64,
    /// Geometric cooling factor applied after every iteration.
    pub cooling_rate: f64,
    /// The run stops once the temperature falls below this floor.
    pub min_temperature: f64,
    /// Iteration budget.
    pub max_iterations: usize,
    /// RNG seed. `None` seeds from system entropy.
    pub seed: Option<u64>,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 1000.0,
            cooling_rate: 0.95,
            min_temperature: 1.0,
            max_iterations: 1000,
            seed: None,
        }
    }
}

/// Wirelength metric used as the cost of a free 2-D layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WireMetric {
    /// Half-perimeter of each net's bounding box.
    #[default]
    Hpwl,
    /// Sum of pairwise Manhattan distances inside each net.
    Manhattan,
    /// Sum of Manhattan distances from each member to the net centroid.
    Star,
}

/// Free 2-D placement settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Free2dConfig {
    /// Area width.
    pub width: f64,
    /// Area height.
    pub height: f64,
    /// Cost metric.
    pub metric: WireMetric,
}

impl Default for Free2dConfig {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 100.0,
            metric: WireMetric::Hpwl,
        }
    }
}

/// Single-row cost weights.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SingleRowConfig {
    /// Weight of the 1-D wirelength term.
    pub w_wire: f64,
    /// Weight of the diffusion-sharing area term.
    pub w_area: f64,
}

impl Default for SingleRowConfig {
    fn default() -> Self {
        Self {
            w_wire: 0.5,
            w_area: 0.5,
        }
    }
}

/// Standard-cell area and grid settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StandardCellConfig {
    /// Area width.
    pub width: f64,
    /// Area height.
    pub height: f64,
    /// Horizontal pitch of a placement site.
    pub site_width: f64,
    /// Vertical pitch of a row.
    pub row_height: f64,
}

impl Default for StandardCellConfig {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 100.0,
            site_width: 1.0,
            row_height: 2.0,
        }
    }
}
