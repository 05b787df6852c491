//! Simulated annealing over any [`Layout`].
//!
//! Each iteration proposes a neighbor of the current layout and adopts it by
//! the Metropolis criterion: always if it is cheaper, otherwise with
//! probability `exp(-delta / temperature)`. The temperature is multiplied by
//! the cooling rate after every iteration. A run ends when the iteration
//! budget is spent or the temperature falls below its floor, and returns the
//! cheapest layout seen.

use crate::layout::Layout;
use bddlay_config::AnnealConfig;
use log::{debug, info};
use rand::Rng;
use serde::Serialize;

/// Iterations between progress log lines.
const PROGRESS_INTERVAL: usize = 100;

/// Temperature schedule and iteration budget.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AnnealSchedule {
    /// Starting temperature.
    pub initial_temperature: f64,
    /// Factor applied to the temperature after each iteration.
    pub cooling_rate: f64,
    /// The run stops once the temperature drops below this.
    pub min_temperature: f64,
    /// Maximum number of iterations.
    pub max_iterations: usize,
}

impl Default for AnnealSchedule {
    fn default() -> Self {
        Self::from(&AnnealConfig::default())
    }
}

impl From<&AnnealConfig> for AnnealSchedule {
    fn from(config: &AnnealConfig) -> Self {
        Self {
            initial_temperature: config.initial_temperature,
            cooling_rate: config.cooling_rate,
            min_temperature: config.min_temperature,
            max_iterations: config.max_iterations,
        }
    }
}

/// Why a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// All iterations were used.
    IterationBudget,
    /// The temperature fell below the floor.
    TemperatureFloor,
}

/// The result of an annealing run.
#[derive(Clone, Debug)]
pub struct AnnealOutcome<L> {
    /// Cheapest layout seen.
    pub best: L,
    /// Its cost.
    pub best_cost: f64,
    /// Cost of the starting layout.
    pub initial_cost: f64,
    /// Iterations performed.
    pub iterations: usize,
    /// Temperature when the run ended.
    pub final_temperature: f64,
    /// Cost of the current layout after each iteration.
    pub cost_history: Vec<f64>,
    /// Best cost after each iteration.
    pub best_history: Vec<f64>,
    /// Why the run ended.
    pub stop_reason: StopReason,
}

/// Probability of moving from a layout of cost `current` to one of cost
/// `candidate` at `temperature`.
pub fn acceptance_probability(current: f64, candidate: f64, temperature: f64) -> f64 {
    if candidate < current {
        1.0
    } else if temperature <= 0.0 {
        0.0
    } else {
        ((current - candidate) / temperature).exp()
    }
}

struct Run {
    schedule: AnnealSchedule,
    temperature: f64,
    iterations: usize,
    cost_history: Vec<f64>,
    best_history: Vec<f64>,
}

impl Run {
    fn new(schedule: AnnealSchedule) -> Self {
        Self {
            schedule,
            temperature: schedule.initial_temperature,
            iterations: 0,
            cost_history: Vec::with_capacity(schedule.max_iterations),
            best_history: Vec::with_capacity(schedule.max_iterations),
        }
    }

    fn accept<R: Rng + ?Sized>(&self, current: f64, candidate: f64, rng: &mut R) -> bool {
        acceptance_probability(current, candidate, self.temperature) > rng.gen::<f64>()
    }

    /// Records one iteration and cools.
    fn finish_iteration(&mut self, current_cost: f64, best_cost: f64) {
        self.iterations += 1;
        self.cost_history.push(current_cost);
        self.best_history.push(best_cost);
        self.temperature *= self.schedule.cooling_rate;

        if self.iterations % PROGRESS_INTERVAL == 0 {
            debug!(
                "iteration {}: current cost {:.2}, best cost {:.2}, temperature {:.2}",
                self.iterations, current_cost, best_cost, self.temperature
            );
        }
    }

    /// Returns `true` while the temperature is below the floor. Checked
    /// before every iteration, so a run that starts cold does no work.
    fn below_floor(&self) -> bool {
        let below = self.temperature < self.schedule.min_temperature;
        if below {
            debug!(
                "temperature {:.4} below floor {} after {} iterations",
                self.temperature, self.schedule.min_temperature, self.iterations
            );
        }
        below
    }

    fn into_outcome<L>(self, best: L, best_cost: f64, initial_cost: f64, floor_hit: bool) -> AnnealOutcome<L> {
        info!(
            "annealing finished after {} iterations: cost {:.2} -> {:.2}",
            self.iterations, initial_cost, best_cost
        );
        AnnealOutcome {
            best,
            best_cost,
            initial_cost,
            iterations: self.iterations,
            final_temperature: self.temperature,
            cost_history: self.cost_history,
            best_history: self.best_history,
            stop_reason: if floor_hit {
                StopReason::TemperatureFloor
            } else {
                StopReason::IterationBudget
            },
        }
    }
}

/// Anneals with a full cost evaluation of both layouts every iteration.
///
/// Every evaluated candidate is a best-layout candidate, whether or not it is
/// adopted.
pub fn anneal<L: Layout, R: Rng + ?Sized>(
    initial: L,
    schedule: &AnnealSchedule,
    rng: &mut R,
) -> AnnealOutcome<L> {
    let initial_cost = initial.cost();
    info!(
        "annealing {} layout, initial cost {:.2}",
        initial.model_name(),
        initial_cost
    );
    let mut run = Run::new(*schedule);
    let mut best = initial.clone();
    let mut best_cost = initial_cost;
    let mut current = initial;
    let mut floor_hit = false;

    loop {
        if run.below_floor() {
            floor_hit = true;
            break;
        }
        if run.iterations >= schedule.max_iterations {
            break;
        }
        let candidate = current.neighbor(rng);
        let current_cost = current.cost();
        let candidate_cost = candidate.cost();

        if candidate_cost < best_cost {
            best = candidate.clone();
            best_cost = candidate_cost;
        }
        let adopted_cost = if run.accept(current_cost, candidate_cost, rng) {
            current = candidate;
            candidate_cost
        } else {
            current_cost
        };

        run.finish_iteration(adopted_cost, best_cost);
    }

    run.into_outcome(best, best_cost, initial_cost, floor_hit)
}

/// Anneals while carrying the current cost forward instead of recomputing
/// it, and asks the layout for each candidate's cost through
/// [`Layout::neighbor_with_cost`], which row and cell layouts can answer
/// locally.
pub fn anneal_enhanced<L: Layout, R: Rng + ?Sized>(
    initial: L,
    schedule: &AnnealSchedule,
    rng: &mut R,
) -> AnnealOutcome<L> {
    let initial_cost = initial.cost();
    info!(
        "annealing {} layout (incremental), initial cost {:.2}",
        initial.model_name(),
        initial_cost
    );
    let mut run = Run::new(*schedule);
    let mut best = initial.clone();
    let mut best_cost = initial_cost;
    let mut current = initial;
    let mut current_cost = initial_cost;
    let mut floor_hit = false;

    loop {
        if run.below_floor() {
            floor_hit = true;
            break;
        }
        if run.iterations >= schedule.max_iterations {
            break;
        }
        let (candidate, candidate_cost) = current.neighbor_with_cost(current_cost, rng);

        if run.accept(current_cost, candidate_cost, rng) {
            current = candidate;
            current_cost = candidate_cost;
            if current_cost < best_cost {
                best = current.clone();
                best_cost = current_cost;
            }
        }

        run.finish_iteration(current_cost, best_cost);
    }

    run.into_outcome(best, best_cost, initial_cost, floor_hit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::single_row::{RowWeights, SingleRowLayout};
    use bddlay_diagnostics::DiagnosticSink;
    use bddlay_netlist::{load_netlist, Netlist};
    use bddlay_source::SourceText;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn netlist() -> Netlist {
        let source = SourceText::new(
            "t.bdd",
            "[(0,1)]\n[(0,1),(1,2)]\n[(-1,-2)],[-1],[(-2,-1)]\n[0,1,2]".into(),
        );
        load_netlist(&source, &DiagnosticSink::new()).unwrap().1
    }

    fn weights() -> RowWeights {
        RowWeights {
            w_wire: 0.5,
            w_area: 0.5,
        }
    }

    #[test]
    fn acceptance() {
        assert_eq!(acceptance_probability(10.0, 5.0, 1.0), 1.0);
        assert_eq!(acceptance_probability(10.0, 12.0, 0.0), 0.0);
        assert!((acceptance_probability(10.0, 12.0, 2.0) - (-1.0f64).exp()).abs() < 1e-12);
        // equal cost is accepted with probability 1 at any positive temperature
        assert_eq!(acceptance_probability(3.0, 3.0, 5.0), 1.0);
    }

    #[test]
    fn default_schedule_stops_at_floor() {
        let nl = netlist();
        let mut rng = StdRng::seed_from_u64(1);
        let layout = SingleRowLayout::new(&nl, weights(), &mut rng).unwrap();
        let outcome = anneal(layout, &AnnealSchedule::default(), &mut rng);
        // 1000 * 0.95^k < 1 first holds at k = 135
        assert_eq!(outcome.stop_reason, StopReason::TemperatureFloor);
        assert_eq!(outcome.iterations, 135);
        assert!(outcome.final_temperature < 1.0);
        assert_eq!(outcome.cost_history.len(), 135);
    }

    #[test]
    fn start_below_floor_does_no_work() {
        let nl = netlist();
        let schedule = AnnealSchedule {
            initial_temperature: 0.5,
            min_temperature: 1.0,
            ..AnnealSchedule::default()
        };
        for incremental in [false, true] {
            let mut rng = StdRng::seed_from_u64(2);
            let layout = SingleRowLayout::new(&nl, weights(), &mut rng).unwrap();
            let placement = layout.placement().to_vec();
            let outcome = if incremental {
                anneal_enhanced(layout, &schedule, &mut rng)
            } else {
                anneal(layout, &schedule, &mut rng)
            };
            assert_eq!(outcome.iterations, 0);
            assert_eq!(outcome.stop_reason, StopReason::TemperatureFloor);
            assert_eq!(outcome.best_cost, outcome.initial_cost);
            assert_eq!(outcome.best.placement(), placement.as_slice());
            assert!(outcome.cost_history.is_empty());
            assert_eq!(outcome.final_temperature, 0.5);
        }
    }

    #[test]
    fn budget_stops_first_when_smaller() {
        let nl = netlist();
        let mut rng = StdRng::seed_from_u64(1);
        let layout = SingleRowLayout::new(&nl, weights(), &mut rng).unwrap();
        let schedule = AnnealSchedule {
            max_iterations: 20,
            ..AnnealSchedule::default()
        };
        let outcome = anneal_enhanced(layout, &schedule, &mut rng);
        assert_eq!(outcome.stop_reason, StopReason::IterationBudget);
        assert_eq!(outcome.iterations, 20);
    }

    #[test]
    fn best_cost_is_non_increasing_and_real() {
        let nl = netlist();
        for seed in 0..5 {
            let mut rng = StdRng::seed_from_u64(seed);
            let layout = SingleRowLayout::new(&nl, weights(), &mut rng).unwrap();
            let outcome = anneal(layout, &AnnealSchedule::default(), &mut rng);
            assert!(outcome.best_history.windows(2).all(|w| w[1] <= w[0]));
            assert!(outcome.best_cost <= outcome.initial_cost);
            assert_eq!(outcome.best.cost(), outcome.best_cost);
            for cost in &outcome.cost_history {
                assert!(outcome.best_cost <= *cost);
            }
        }
    }

    #[test]
    fn enhanced_tracks_true_costs() {
        let nl = netlist();
        let mut rng = StdRng::seed_from_u64(8);
        let layout = SingleRowLayout::new(&nl, weights(), &mut rng).unwrap();
        let schedule = AnnealSchedule {
            cooling_rate: 0.999,
            max_iterations: 500,
            ..AnnealSchedule::default()
        };
        let outcome = anneal_enhanced(layout, &schedule, &mut rng);
        assert!((outcome.best.cost() - outcome.best_cost).abs() < 1e-9);
        assert!(outcome.best_history.windows(2).all(|w| w[1] <= w[0]));
        assert_eq!(outcome.iterations, 500);
    }

    #[test]
    fn same_seed_same_result() {
        let nl = netlist();
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let layout = SingleRowLayout::new(&nl, weights(), &mut rng).unwrap();
            let outcome = anneal_enhanced(layout, &AnnealSchedule::default(), &mut rng);
            (outcome.best.placement().to_vec(), outcome.cost_history)
        };
        assert_eq!(run(21), run(21));
    }

    #[test]
    fn cold_start_only_accepts_improvements() {
        let nl = netlist();
        let mut rng = StdRng::seed_from_u64(13);
        let layout = SingleRowLayout::new(&nl, weights(), &mut rng).unwrap();
        let schedule = AnnealSchedule {
            initial_temperature: 0.0,
            cooling_rate: 0.5,
            min_temperature: 0.0,
            max_iterations: 100,
        };
        let outcome = anneal_enhanced(layout, &schedule, &mut rng);
        assert!(outcome.cost_history.windows(2).all(|w| w[1] <= w[0]));
        assert_eq!(outcome.stop_reason, StopReason::IterationBudget);
    }
}
