//! Scenario runner - executes scenarios and checks trajectory invariants.

use crate::context::SimContext;
use crate::error::SimError;
use crate::scenarios::{Expectation, ScenarioId};

use humh_core::{
    classify, Grid, RunSummary, Simulation, SimulationConfig, StateLabel, StepRecord,
    TerminationReason, Timeline,
};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Slack allowed when comparing derived percentages.
const FLOAT_TOLERANCE: f64 = 1e-9;

/// Field overrides applied on top of a scenario preset.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub grid_size: Option<usize>,
    pub frame_count: Option<usize>,
    pub activation_radius: Option<usize>,
    pub compression_percent: Option<f64>,
    pub initial_active_probability: Option<f64>,
}

impl ConfigOverrides {
    /// Returns `config` with every set override applied.
    pub fn apply(&self, mut config: SimulationConfig) -> SimulationConfig {
        if let Some(v) = self.grid_size {
            config.grid_size = v;
        }
        if let Some(v) = self.frame_count {
            config.frame_count = v;
        }
        if let Some(v) = self.activation_radius {
            config.activation_radius = v;
        }
        if let Some(v) = self.compression_percent {
            config.compression_percent = v;
        }
        if let Some(v) = self.initial_active_probability {
            config.initial_active_probability = v;
        }
        config
    }

    pub fn is_empty(&self) -> bool {
        self.grid_size.is_none()
            && self.frame_count.is_none()
            && self.activation_radius.is_none()
            && self.compression_percent.is_none()
            && self.initial_active_probability.is_none()
    }
}

/// Results from running a scenario.
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    /// Scenario that was run
    pub scenario: ScenarioId,

    /// Seed used
    pub seed: u64,

    /// Whether the run passed all checks
    pub passed: bool,

    /// Failure message if any
    pub failure_reason: Option<String>,

    /// Full timeline of the run
    pub timeline: Timeline,

    /// Final aggregates
    pub summary: RunSummary,

    /// Metrics collected during run
    pub metrics: ScenarioMetrics,
}

impl ScenarioResult {
    /// Steps executed.
    pub fn total_steps(&self) -> usize {
        self.timeline.len()
    }

    pub fn termination(&self) -> TerminationReason {
        self.timeline.termination
    }
}

/// Metrics collected during scenario execution.
#[derive(Debug, Clone, Default)]
pub struct ScenarioMetrics {
    /// Steps spent under each label
    pub state_counts: BTreeMap<&'static str, usize>,

    /// Cells turned on over the whole run
    pub cells_manifested: usize,

    /// Highest EH observed
    pub peak_entropy: f64,

    /// First step labelled full harmony
    pub first_full_harmony_step: Option<usize>,
}

impl ScenarioMetrics {
    /// Accumulates one step.
    pub fn observe(&mut self, record: &StepRecord) {
        *self.state_counts.entry(record.state.name()).or_insert(0) += 1;
        self.cells_manifested += record.newly_activated;
        self.peak_entropy = self.peak_entropy.max(record.harmonic_entropy);
        if record.state == StateLabel::FullHarmony && self.first_full_harmony_step.is_none() {
            self.first_full_harmony_step = Some(record.step_index);
        }
    }
}

/// Checks the invariants every timeline must satisfy.
pub fn check_timeline(timeline: &Timeline) -> Result<(), String> {
    let config = &timeline.config;
    if timeline.records.is_empty() {
        return Err("timeline has no records".to_string());
    }
    if timeline.len() > config.frame_count {
        return Err(format!(
            "{} steps exceed frame_count {}",
            timeline.len(),
            config.frame_count
        ));
    }

    let mut previous_ratio = humh_core::metrics::active_ratio_percent(&timeline.initial_grid);
    for (i, record) in timeline.records.iter().enumerate() {
        if record.step_index != i {
            return Err(format!("step index {} at position {}", record.step_index, i));
        }
        if record.total_active_ratio + FLOAT_TOLERANCE < previous_ratio {
            return Err(format!(
                "active ratio decreased at step {}: {:.4}% -> {:.4}%",
                i, previous_ratio, record.total_active_ratio
            ));
        }
        if !(0.0..=1.0).contains(&record.harmonic_entropy) {
            return Err(format!("EH {} out of range at step {}", record.harmonic_entropy, i));
        }
        if record.parsimonious_energy > record.raw_manifestation_cost + FLOAT_TOLERANCE {
            return Err(format!("parsimonious energy exceeds raw cost at step {}", i));
        }
        let expected = classify(record.harmonic_entropy, record.active_proportion);
        if record.state != expected {
            return Err(format!(
                "step {} labelled {} but classifies as {}",
                i, record.state, expected
            ));
        }
        previous_ratio = record.total_active_ratio;
    }

    let fully_active = timeline.final_grid.is_fully_active();
    match timeline.termination {
        TerminationReason::FullyManifested if !fully_active => {
            Err("terminated as fully manifested with inactive cells left".to_string())
        }
        TerminationReason::FrameLimitReached if fully_active => {
            Err("grid fully active but run did not stop".to_string())
        }
        TerminationReason::FrameLimitReached if timeline.len() != config.frame_count => Err(
            format!(
                "frame limit reported after {} of {} frames",
                timeline.len(),
                config.frame_count
            ),
        ),
        _ => Ok(()),
    }
}

/// Checks a scenario-specific expectation.
pub fn check_expectation(timeline: &Timeline, expectation: Expectation) -> Result<(), String> {
    match expectation {
        Expectation::None => Ok(()),
        Expectation::Terminates(reason) if timeline.termination != reason => Err(format!(
            "expected termination {} but got {}",
            reason, timeline.termination
        )),
        Expectation::Terminates(_) => Ok(()),
        Expectation::EnergyEqualsRawCost => timeline
            .records
            .iter()
            .find(|r| (r.parsimonious_energy - r.raw_manifestation_cost).abs() > FLOAT_TOLERANCE)
            .map_or(Ok(()), |r| {
                Err(format!("energy differs from raw cost at step {}", r.step_index))
            }),
        Expectation::ZeroEnergy => timeline
            .records
            .iter()
            .find(|r| r.parsimonious_energy != 0.0)
            .map_or(Ok(()), |r| {
                Err(format!("nonzero energy at step {}", r.step_index))
            }),
    }
}

/// Runs scenarios.
pub struct ScenarioRunner {
    /// Master seed
    seed: u64,

    /// Overrides applied to every preset
    overrides: ConfigOverrides,
}

impl ScenarioRunner {
    /// Creates a new scenario runner.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            overrides: ConfigOverrides::default(),
        }
    }

    /// Sets the config overrides.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Resolved configuration for a scenario.
    pub fn config_for(&self, scenario: ScenarioId) -> SimulationConfig {
        self.overrides.apply(scenario.config())
    }

    /// Runs a scenario and returns the result.
    pub fn run(&self, scenario: ScenarioId) -> Result<ScenarioResult, SimError> {
        self.run_observed(scenario, |_, _, _| {})
    }

    /// Runs a scenario, handing every step and the post-step grid to
    /// `on_frame` as it is produced.
    pub fn run_observed<F>(&self, scenario: ScenarioId, mut on_frame: F) -> Result<ScenarioResult, SimError>
    where
        F: FnMut(&SimContext, &StepRecord, &Grid),
    {
        info!("Starting scenario: {} (seed={})", scenario.name(), self.seed);
        debug!("  {}", scenario.description());

        let config = self.config_for(scenario);
        let mut context = SimContext::new(self.seed);
        let mut rng = context.population_rng();
        let mut sim = Simulation::new(config, &mut rng)?;
        let mut metrics = ScenarioMetrics::default();

        debug!(
            "  initial active: {}/{} cells",
            sim.initial_grid().count_active(),
            sim.initial_grid().cell_count()
        );

        while let Some(record) = sim.step() {
            metrics.observe(&record);
            on_frame(&context, &record, sim.grid());
            context.advance_frame();

            if record.step_index % 25 == 0 {
                debug!(
                    "  step={} | active={:.1}% | EH={:.4} | {}",
                    record.step_index, record.total_active_ratio, record.harmonic_entropy, record.state
                );
            }
        }

        let timeline = sim.into_timeline();
        if timeline.termination == TerminationReason::FullyManifested {
            info!("Universe fully manifested after {} steps", timeline.len());
        }

        let check = check_timeline(&timeline)
            .and_then(|_| check_expectation(&timeline, scenario.expectation()));
        let failure_reason = check.err();
        if let Some(reason) = &failure_reason {
            warn!("{} check failed: {}", scenario.name(), reason);
        }

        let summary = timeline.summary();

        Ok(ScenarioResult {
            scenario,
            seed: self.seed,
            passed: failure_reason.is_none(),
            failure_reason,
            timeline,
            summary,
            metrics,
        })
    }
}
