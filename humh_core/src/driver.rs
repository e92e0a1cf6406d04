//! Simulation Driver - owns the grid across steps.
//!
//! A `Simulation` is a finite, non-restartable stream of `StepRecord`s:
//!
//! ```text
//!   Running ──step──► Running
//!      │
//!      ├── grid fully active ──► Terminated(FullyManifested)
//!      └── last frame        ──► Terminated(FrameLimitReached)
//! ```
//!
//! Each step strictly depends on the grid left by the previous one.

use crate::activation;
use crate::classify::{classify, StateLabel};
use crate::config::SimulationConfig;
use crate::error::Result;
use crate::grid::{Grid, Position};
use crate::metrics;
use crate::summary::RunSummary;
use crate::trajectory::observer_position;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Observable output of one step. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// 0-based step index
    pub step_index: usize,

    /// Observer center for this step (may lie just outside the grid)
    pub observer: Position,

    /// Cells turned on by this step
    pub newly_activated: usize,

    /// Active cells after the step (percent)
    pub total_active_ratio: f64,

    /// Newly activated cells over the whole grid (percent)
    pub raw_manifestation_cost: f64,

    /// Raw cost after harmonic compression (percent)
    pub parsimonious_energy: f64,

    /// EH of the post-step grid
    pub harmonic_entropy: f64,

    /// p of the post-step grid
    pub active_proportion: f64,

    /// Classification of `(harmonic_entropy, active_proportion)`
    pub state: StateLabel,
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// Every cell became active before the frame limit
    FullyManifested,
    /// The configured number of frames was exhausted
    FrameLimitReached,
}

impl TerminationReason {
    pub fn name(&self) -> &'static str {
        match self {
            TerminationReason::FullyManifested => "fully_manifested",
            TerminationReason::FrameLimitReached => "frame_limit_reached",
        }
    }
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Driver state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Running,
    Terminated(TerminationReason),
}

impl RunState {
    pub fn is_terminated(&self) -> bool {
        matches!(self, RunState::Terminated(_))
    }

    pub fn termination(&self) -> Option<TerminationReason> {
        match self {
            RunState::Running => None,
            RunState::Terminated(reason) => Some(*reason),
        }
    }
}

/// Complete output of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    /// Configuration the run used
    pub config: SimulationConfig,

    /// Grid before the first step
    pub initial_grid: Grid,

    /// One record per processed step, in order
    pub records: Vec<StepRecord>,

    /// Grid after the last step
    pub final_grid: Grid,

    /// Why the run stopped
    pub termination: TerminationReason,
}

impl Timeline {
    /// Number of steps processed.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Aggregates the timeline into its final summary.
    pub fn summary(&self) -> RunSummary {
        RunSummary::from_records(&self.initial_grid, &self.records, Some(self.termination))
    }
}

/// A single simulation run.
pub struct Simulation {
    config: SimulationConfig,
    initial_grid: Grid,
    grid: Grid,
    history: Vec<StepRecord>,
    next_step: usize,
    state: RunState,
}

impl Simulation {
    /// Creates a simulation whose initial population is drawn from `rng`.
    ///
    /// Fails with `InvalidConfig` before any state is created.
    pub fn new<R: Rng + ?Sized>(config: SimulationConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;
        let grid = Grid::random(config.grid_size, config.initial_active_probability, rng);
        Ok(Self::from_parts(config, grid))
    }

    /// Creates a simulation with a ChaCha8 population seeded from `seed`.
    pub fn with_seed(config: SimulationConfig, seed: u64) -> Result<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::new(config, &mut rng)
    }

    /// Creates a simulation over an explicit initial grid.
    ///
    /// The grid's size overrides `config.grid_size`.
    pub fn with_grid(config: SimulationConfig, grid: Grid) -> Result<Self> {
        let config = config.with_grid_size(grid.size());
        config.validate()?;
        Ok(Self::from_parts(config, grid))
    }

    fn from_parts(config: SimulationConfig, grid: Grid) -> Self {
        debug!(
            grid_size = config.grid_size,
            frame_count = config.frame_count,
            radius = config.activation_radius,
            initial_active = grid.count_active(),
            "simulation initialized"
        );
        Self {
            initial_grid: grid.snapshot(),
            grid,
            history: Vec::with_capacity(config.frame_count.min(4096)),
            next_step: 0,
            state: RunState::Running,
            config,
        }
    }

    /// Advances one step. Returns `None` once the run has terminated.
    pub fn step(&mut self) -> Option<StepRecord> {
        if self.state.is_terminated() {
            return None;
        }

        let step_index = self.next_step;
        let cell_count = self.grid.cell_count() as f64;
        let radius = self.config.activation_radius;
        let observer = observer_position(step_index, self.config.grid_size);

        // Pre-step snapshot for cost computation
        let pre_grid = self.grid.snapshot();
        let activation = activation::apply(&mut self.grid, observer, radius);

        let total_active_ratio = metrics::active_ratio_percent(&self.grid);
        let raw_manifestation_cost = metrics::manifestation_cost(&pre_grid, observer, radius) * 100.0;
        debug_assert_eq!(
            raw_manifestation_cost,
            activation.newly_activated as f64 / cell_count * 100.0
        );
        let parsimonious_energy =
            metrics::parsimonious_energy(raw_manifestation_cost, self.config.compression_percent);

        let (harmonic_entropy, active_proportion) = metrics::harmonic_entropy(&self.grid);
        let state = classify(harmonic_entropy, active_proportion);

        let record = StepRecord {
            step_index,
            observer,
            newly_activated: activation.newly_activated,
            total_active_ratio,
            raw_manifestation_cost,
            parsimonious_energy,
            harmonic_entropy,
            active_proportion,
            state,
        };

        trace!(
            step = step_index,
            row = observer.row,
            col = observer.col,
            newly = activation.newly_activated,
            eh = harmonic_entropy,
            state = %state,
            "step"
        );

        self.history.push(record.clone());
        self.next_step += 1;

        if self.grid.is_fully_active() {
            self.terminate(TerminationReason::FullyManifested);
        } else if self.next_step >= self.config.frame_count {
            self.terminate(TerminationReason::FrameLimitReached);
        }

        Some(record)
    }

    fn terminate(&mut self, reason: TerminationReason) {
        debug!(steps = self.next_step, reason = %reason, "simulation terminated");
        self.state = RunState::Terminated(reason);
    }

    /// Current grid, for rendering.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Grid as it was before the first step.
    pub fn initial_grid(&self) -> &Grid {
        &self.initial_grid
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Records of every step processed so far, in order.
    pub fn history(&self) -> &[StepRecord] {
        &self.history
    }

    /// Number of steps processed so far.
    pub fn steps_taken(&self) -> usize {
        self.next_step
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Drains the remaining steps into a timeline.
    pub fn into_timeline(mut self) -> Timeline {
        while self.step().is_some() {}
        let termination = self
            .state
            .termination()
            // a drained simulation always ends terminated
            .unwrap_or(TerminationReason::FrameLimitReached);

        Timeline {
            config: self.config,
            initial_grid: self.initial_grid,
            records: self.history,
            final_grid: self.grid,
            termination,
        }
    }
}

impl Iterator for Simulation {
    type Item = StepRecord;

    fn next(&mut self) -> Option<Self::Item> {
        self.step()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.state.is_terminated() {
            (0, Some(0))
        } else {
            (1, Some(self.config.frame_count - self.next_step))
        }
    }
}

/// Runs a full simulation with the initial population drawn from `rng`.
pub fn run<R: Rng + ?Sized>(config: SimulationConfig, rng: &mut R) -> Result<Timeline> {
    Ok(Simulation::new(config, rng)?.into_timeline())
}

/// Runs a full simulation with a ChaCha8 population seeded from `seed`.
pub fn run_seeded(config: SimulationConfig, seed: u64) -> Result<Timeline> {
    Ok(Simulation::with_seed(config, seed)?.into_timeline())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HumhError;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn small_config() -> SimulationConfig {
        SimulationConfig::default()
            .with_grid_size(20)
            .with_frame_count(50)
            .with_activation_radius(2)
    }

    #[test]
    fn test_invalid_config_rejected_before_run() {
        let config = SimulationConfig::default().with_activation_radius(0);
        let err = run_seeded(config, 42).unwrap_err();
        assert!(matches!(err, HumhError::InvalidConfig { field: "activation_radius", .. }));
    }

    #[test]
    fn test_full_radius_terminates_early() {
        let config = SimulationConfig::new(5, 100, 10, 70.0, 0.15).unwrap();
        let timeline = run_seeded(config, 42).unwrap();

        assert_eq!(timeline.termination, TerminationReason::FullyManifested);
        assert_eq!(timeline.len(), 1);
        assert!(timeline.final_grid.is_fully_active());

        let last = timeline.records.last().unwrap();
        assert_eq!(last.total_active_ratio, 100.0);
        assert_eq!(last.harmonic_entropy, 0.0);
        assert_eq!(last.state, StateLabel::FullHarmony);
    }

    #[test]
    fn test_maximal_radius_manifests_whole_grid() {
        let config = SimulationConfig::new(5, 3, usize::MAX, 70.0, 0.0).unwrap();
        let timeline = run_seeded(config, 42).unwrap();

        assert_eq!(timeline.termination, TerminationReason::FullyManifested);
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.records[0].newly_activated, 25);
        assert!(timeline.final_grid.is_fully_active());
    }

    #[test]
    fn test_frame_limit_reached() {
        let config = SimulationConfig::default()
            .with_grid_size(50)
            .with_frame_count(10)
            .with_activation_radius(1)
            .with_initial_active_probability(0.0);
        let mut sim = Simulation::with_seed(config, 7).unwrap();

        let records: Vec<_> = sim.by_ref().collect();

        assert_eq!(records.len(), 10);
        assert_eq!(
            sim.state(),
            RunState::Terminated(TerminationReason::FrameLimitReached)
        );
        assert!(sim.step().is_none());
        assert_eq!(sim.steps_taken(), 10);
        assert_eq!(sim.history(), records.as_slice());
    }

    #[test]
    fn test_step_indices_contiguous() {
        let timeline = run_seeded(small_config(), 3).unwrap();
        for (i, record) in timeline.records.iter().enumerate() {
            assert_eq!(record.step_index, i);
            assert_eq!(record.observer, observer_position(i, 20));
        }
    }

    #[test]
    fn test_record_fields_consistent() {
        let config = small_config().with_compression_percent(25.0);
        let timeline = run_seeded(config, 11).unwrap();

        for record in &timeline.records {
            assert_relative_eq!(
                record.raw_manifestation_cost,
                record.newly_activated as f64 / 400.0 * 100.0,
                epsilon = 1e-9
            );
            assert_relative_eq!(
                record.parsimonious_energy,
                record.raw_manifestation_cost * 0.75,
                epsilon = 1e-9
            );
            assert_relative_eq!(
                record.total_active_ratio,
                record.active_proportion * 100.0,
                epsilon = 1e-9
            );
            assert_eq!(record.state, classify(record.harmonic_entropy, record.active_proportion));
        }
    }

    #[test]
    fn test_first_step_against_initial_grid() {
        let config = small_config();
        let mut sim = Simulation::with_seed(config, 5).unwrap();
        let initial = sim.initial_grid().clone();

        let record = sim.step().unwrap();
        let expected_new = activation::count_newly_activated(&initial, record.observer, 2);

        assert_eq!(record.newly_activated, expected_new);
        assert_eq!(sim.grid().count_active(), initial.count_active() + expected_new);
    }

    #[test]
    fn test_reproducible_with_seed() {
        let a = run_seeded(SimulationConfig::default(), 42).unwrap();
        let b = run_seeded(SimulationConfig::default(), 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_only_initial_population_is_random() {
        let config = small_config();
        let mut rng_a = ChaCha8Rng::seed_from_u64(1);
        let grid = Grid::random(20, 0.15, &mut rng_a);

        let a = Simulation::with_grid(config.clone(), grid.clone()).unwrap().into_timeline();
        let b = Simulation::with_grid(config, grid).unwrap().into_timeline();
        assert_eq!(a, b);
    }

    #[test]
    fn test_already_full_grid_processes_one_step() {
        let mut grid = Grid::new(4);
        activation::apply(&mut grid, Position::new(1, 1), 4);
        let timeline = Simulation::with_grid(SimulationConfig::default(), grid)
            .unwrap()
            .into_timeline();

        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.records[0].newly_activated, 0);
        assert_eq!(timeline.termination, TerminationReason::FullyManifested);
    }

    #[test]
    fn test_with_grid_uses_grid_size() {
        let sim = Simulation::with_grid(SimulationConfig::default(), Grid::new(7)).unwrap();
        assert_eq!(sim.config().grid_size, 7);
    }

    #[test]
    fn test_full_compression_zeroes_energy() {
        let config = small_config().with_compression_percent(100.0);
        let timeline = run_seeded(config, 9).unwrap();
        assert!(timeline.records.iter().all(|r| r.parsimonious_energy == 0.0));
    }

    #[test]
    fn test_into_timeline_keeps_pulled_records() {
        let mut sim = Simulation::with_seed(small_config(), 4).unwrap();
        let first = sim.step().unwrap();
        let second = sim.step().unwrap();

        let timeline = sim.into_timeline();
        assert_eq!(timeline.len(), 50);
        assert_eq!(timeline.records[0], first);
        assert_eq!(timeline.records[1], second);
    }

    #[test]
    fn test_size_hint() {
        let config = small_config().with_frame_count(3);
        let mut sim = Simulation::with_seed(config, 1).unwrap();
        assert_eq!(sim.size_hint(), (1, Some(3)));
        sim.step();
        assert_eq!(sim.size_hint().1, Some(2));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_active_ratio_non_decreasing(
            seed in any::<u64>(),
            size in 1usize..25,
            radius in 1usize..6,
            frames in 1usize..120,
            p in 0.0f64..=1.0,
        ) {
            let config = SimulationConfig::new(size, frames, radius, 50.0, p).unwrap();
            let timeline = run_seeded(config, seed).unwrap();

            prop_assert!(!timeline.is_empty());
            prop_assert!(timeline.len() <= frames);

            let mut previous = metrics::active_ratio_percent(&timeline.initial_grid);
            for record in &timeline.records {
                prop_assert!(record.total_active_ratio >= previous);
                prop_assert!((0.0..=1.0).contains(&record.harmonic_entropy));
                previous = record.total_active_ratio;
            }

            match timeline.termination {
                TerminationReason::FullyManifested => prop_assert!(timeline.final_grid.is_fully_active()),
                TerminationReason::FrameLimitReached => {
                    prop_assert_eq!(timeline.len(), frames);
                    prop_assert!(!timeline.final_grid.is_fully_active());
                }
            }
        }
    }
}
