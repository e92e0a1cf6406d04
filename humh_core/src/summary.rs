//! Run Summary
//! ===========
//!
//! Final aggregate values of a run, derived purely from the initial grid and
//! the step records. Nothing here is tracked by the driver while it runs.
//!
//! Key values:
//! - initial / final `(EH, p, label)`
//! - mean raw cost and mean parsimonious energy (terminating step included)
//! - entropy reduction and compression savings, when their baselines are nonzero
//! - verdict: whether the universe reached full manifestation (`p > 0.9`)

use crate::classify::{classify, StateLabel};
use crate::driver::{StepRecord, TerminationReason};
use crate::grid::Grid;
use crate::metrics;
use serde::{Deserialize, Serialize};

/// Final proportion above which a run counts as manifested.
pub const MANIFESTED_PROPORTION_THRESHOLD: f64 = 0.9;

/// Entropy, proportion and label at one point of the run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub harmonic_entropy: f64,
    pub active_proportion: f64,
    pub state: StateLabel,
}

impl StateSnapshot {
    pub fn of_grid(grid: &Grid) -> Self {
        let (harmonic_entropy, active_proportion) = metrics::harmonic_entropy(grid);
        Self {
            harmonic_entropy,
            active_proportion,
            state: classify(harmonic_entropy, active_proportion),
        }
    }

    pub fn of_record(record: &StepRecord) -> Self {
        Self {
            harmonic_entropy: record.harmonic_entropy,
            active_proportion: record.active_proportion,
            state: record.state,
        }
    }
}

/// Outcome of a run relative to full manifestation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Final proportion above the manifestation threshold
    Manifested,
    /// Still on its way to full harmony
    InTransit,
}

impl Verdict {
    pub fn from_proportion(p: f64) -> Self {
        if p > MANIFESTED_PROPORTION_THRESHOLD {
            Verdict::Manifested
        } else {
            Verdict::InTransit
        }
    }
}

/// Aggregates of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of processed steps
    pub frames_simulated: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination: Option<TerminationReason>,

    pub initial: StateSnapshot,
    pub final_state: StateSnapshot,

    /// Active ratio of the initial grid (percent)
    pub initial_energy_percent: f64,

    /// Active ratio after the last step (percent)
    pub final_total_energy_percent: f64,

    /// Mean raw manifestation cost per step (percent)
    pub mean_raw_cost: f64,

    /// Mean parsimonious energy per step (percent)
    pub mean_parsimonious_energy: f64,

    /// `(EH₀ - EH_f) / EH₀` in percent; none when EH₀ is zero
    pub entropy_reduction_percent: Option<f64>,

    /// `(raw - parsimonious) / raw` in percent; none when the mean raw cost is zero
    pub compression_savings_percent: Option<f64>,

    pub verdict: Verdict,
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

impl RunSummary {
    /// Builds the summary from a run's initial grid and its records.
    ///
    /// With no records the final state equals the initial one.
    pub fn from_records(
        initial_grid: &Grid,
        records: &[StepRecord],
        termination: Option<TerminationReason>,
    ) -> Self {
        let initial = StateSnapshot::of_grid(initial_grid);
        let initial_energy_percent = metrics::active_ratio_percent(initial_grid);

        let (final_state, final_total_energy_percent) = match records.last() {
            Some(last) => (StateSnapshot::of_record(last), last.total_active_ratio),
            None => (initial, initial_energy_percent),
        };

        let mean_raw_cost = mean(records.iter().map(|r| r.raw_manifestation_cost));
        let mean_parsimonious_energy = mean(records.iter().map(|r| r.parsimonious_energy));

        let entropy_reduction_percent = (initial.harmonic_entropy > 0.0).then(|| {
            (initial.harmonic_entropy - final_state.harmonic_entropy) / initial.harmonic_entropy
                * 100.0
        });

        let compression_savings_percent = (mean_raw_cost > 0.0)
            .then(|| (mean_raw_cost - mean_parsimonious_energy) / mean_raw_cost * 100.0);

        Self {
            frames_simulated: records.len(),
            termination,
            initial,
            final_state,
            initial_energy_percent,
            final_total_energy_percent,
            mean_raw_cost,
            mean_parsimonious_energy,
            entropy_reduction_percent,
            compression_savings_percent,
            verdict: Verdict::from_proportion(final_state.active_proportion),
        }
    }
}
