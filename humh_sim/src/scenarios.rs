//! Named simulation scenarios.

use crate::error::SimError;
use humh_core::{SimulationConfig, TerminationReason};

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScenarioId {
    /// Default parameters: 30×30, 225 frames, radius 4, 70% compression
    Baseline,

    /// Radius wider than the grid: one touch manifests everything
    FullCoverage,

    /// No compression: parsimonious energy equals raw cost
    NoCompression,

    /// Total compression: parsimonious energy is always zero
    TotalCompression,

    /// Empty initial universe
    EmptyStart,

    /// 90% of cells active from the start
    DenseStart,

    /// Radius 1 over a long run
    Pinpoint,

    /// Radius 10 on the default grid
    WideObserver,
}

/// Outcome a scenario must produce on top of the generic trajectory checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expectation {
    /// Only the generic checks apply
    None,
    /// Run must end with the given termination reason
    Terminates(TerminationReason),
    /// Every step's parsimonious energy must equal its raw cost
    EnergyEqualsRawCost,
    /// Every step's parsimonious energy must be zero
    ZeroEnergy,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::Baseline,
            ScenarioId::FullCoverage,
            ScenarioId::NoCompression,
            ScenarioId::TotalCompression,
            ScenarioId::EmptyStart,
            ScenarioId::DenseStart,
            ScenarioId::Pinpoint,
            ScenarioId::WideObserver,
        ]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::Baseline => "baseline",
            ScenarioId::FullCoverage => "full_coverage",
            ScenarioId::NoCompression => "no_compression",
            ScenarioId::TotalCompression => "total_compression",
            ScenarioId::EmptyStart => "empty_start",
            ScenarioId::DenseStart => "dense_start",
            ScenarioId::Pinpoint => "pinpoint",
            ScenarioId::WideObserver => "wide_observer",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::Baseline => "30x30 grid, 225 frames, radius 4, 70% harmonic compression",
            ScenarioId::FullCoverage => "5x5 grid with radius 10, must fully manifest on the first touch",
            ScenarioId::NoCompression => "0% compression, final energy equals raw cost",
            ScenarioId::TotalCompression => "100% compression, final energy is always zero",
            ScenarioId::EmptyStart => "No cell active initially, starts in empty harmony",
            ScenarioId::DenseStart => "90% of cells active initially",
            ScenarioId::Pinpoint => "Radius 1 over 1000 frames",
            ScenarioId::WideObserver => "Radius 10 on the default grid",
        }
    }

    /// Returns the preset configuration of the scenario.
    pub fn config(&self) -> SimulationConfig {
        let base = SimulationConfig::default();
        match self {
            ScenarioId::Baseline => base,
            ScenarioId::FullCoverage => base
                .with_grid_size(5)
                .with_frame_count(100)
                .with_activation_radius(10),
            ScenarioId::NoCompression => base.with_compression_percent(0.0),
            ScenarioId::TotalCompression => base.with_compression_percent(100.0),
            ScenarioId::EmptyStart => base.with_initial_active_probability(0.0),
            ScenarioId::DenseStart => base.with_initial_active_probability(0.9),
            ScenarioId::Pinpoint => base.with_activation_radius(1).with_frame_count(1000),
            ScenarioId::WideObserver => base.with_activation_radius(10),
        }
    }

    /// Returns the scenario-specific expectation.
    pub fn expectation(&self) -> Expectation {
        match self {
            ScenarioId::FullCoverage => {
                Expectation::Terminates(TerminationReason::FullyManifested)
            }
            ScenarioId::NoCompression => Expectation::EnergyEqualsRawCost,
            ScenarioId::TotalCompression => Expectation::ZeroEnergy,
            _ => Expectation::None,
        }
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "baseline" | "default" => Ok(ScenarioId::Baseline),
            "full_coverage" | "fullcoverage" => Ok(ScenarioId::FullCoverage),
            "no_compression" | "nocompression" => Ok(ScenarioId::NoCompression),
            "total_compression" | "totalcompression" => Ok(ScenarioId::TotalCompression),
            "empty_start" | "emptystart" => Ok(ScenarioId::EmptyStart),
            "dense_start" | "densestart" => Ok(ScenarioId::DenseStart),
            "pinpoint" => Ok(ScenarioId::Pinpoint),
            "wide_observer" | "wideobserver" => Ok(ScenarioId::WideObserver),
            _ => Err(SimError::unknown_scenario(s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for scenario in ScenarioId::all() {
            let parsed: ScenarioId = scenario.name().parse().unwrap();
            assert_eq!(parsed, scenario);
        }
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("DEFAULT".parse::<ScenarioId>().unwrap(), ScenarioId::Baseline);
        assert_eq!("full-coverage".parse::<ScenarioId>().unwrap(), ScenarioId::FullCoverage);
        assert!(matches!(
            "nope".parse::<ScenarioId>(),
            Err(SimError::UnknownScenario(_))
        ));
    }

    #[test]
    fn test_all_presets_valid() {
        for scenario in ScenarioId::all() {
            assert!(scenario.config().validate().is_ok(), "{}", scenario);
        }
    }

    #[test]
    fn test_descriptions_distinct() {
        let all = ScenarioId::all();
        for (i, a) in all.iter().enumerate() {
            assert!(!a.description().is_empty());
            for b in &all[i + 1..] {
                assert_ne!(a.description(), b.description());
            }
        }
    }

    #[test]
    fn test_full_coverage_preset() {
        let config = ScenarioId::FullCoverage.config();
        assert_eq!(config.grid_size, 5);
        assert_eq!(config.activation_radius, 10);
        assert_eq!(config.frame_count, 100);
    }
}
