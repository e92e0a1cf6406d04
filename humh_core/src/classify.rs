//! Harmonic state classification.

use serde::{Deserialize, Serialize};

/// Entropy below this is treated as harmonic (empty or full).
pub const HARMONY_ENTROPY_THRESHOLD: f64 = 0.3;

/// Entropy above this is treated as maximal chaos.
pub const CHAOS_ENTROPY_THRESHOLD: f64 = 0.7;

/// Within the harmonic band, proportions below this are empty harmony.
pub const EMPTY_PROPORTION_THRESHOLD: f64 = 0.2;

/// Discrete state of the grid at a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateLabel {
    /// Low entropy, mostly inactive
    EmptyHarmony,
    /// Low entropy, mostly active
    FullHarmony,
    /// Entropy near its peak
    MaxChaos,
    /// Everything in between, boundaries included
    EntropicTransition,
}

impl StateLabel {
    /// Returns all labels.
    pub fn all() -> [StateLabel; 4] {
        [
            StateLabel::EmptyHarmony,
            StateLabel::FullHarmony,
            StateLabel::MaxChaos,
            StateLabel::EntropicTransition,
        ]
    }

    /// Returns the label name.
    pub fn name(&self) -> &'static str {
        match self {
            StateLabel::EmptyHarmony => "empty_harmony",
            StateLabel::FullHarmony => "full_harmony",
            StateLabel::MaxChaos => "max_chaos",
            StateLabel::EntropicTransition => "entropic_transition",
        }
    }

    /// Returns a description of the label.
    pub fn description(&self) -> &'static str {
        match self {
            StateLabel::EmptyHarmony => "Unmanifested universe, EH < 0.3 with p < 0.2",
            StateLabel::FullHarmony => "Manifested universe, EH < 0.3 with p >= 0.2",
            StateLabel::MaxChaos => "Balanced active/inactive split, EH > 0.7",
            StateLabel::EntropicTransition => "In transit between harmony and chaos, 0.3 <= EH <= 0.7",
        }
    }

    /// Returns true for either harmony label.
    pub fn is_harmonic(&self) -> bool {
        matches!(self, StateLabel::EmptyHarmony | StateLabel::FullHarmony)
    }
}

impl std::fmt::Display for StateLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Maps `(EH, p)` to a state label.
///
/// Both thresholds are strict, so EH exactly 0.3 or exactly 0.7 is an
/// entropic transition.
pub fn classify(harmonic_entropy: f64, proportion: f64) -> StateLabel {
    if harmonic_entropy < HARMONY_ENTROPY_THRESHOLD {
        if proportion < EMPTY_PROPORTION_THRESHOLD {
            StateLabel::EmptyHarmony
        } else {
            StateLabel::FullHarmony
        }
    } else if harmonic_entropy > CHAOS_ENTROPY_THRESHOLD {
        StateLabel::MaxChaos
    } else {
        StateLabel::EntropicTransition
    }
}
