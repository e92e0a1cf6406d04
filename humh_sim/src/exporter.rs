//! JSON exporter for external renderers.
//!
//! Exports a run as a sequence of frames, one per step, so a rendering loop
//! can replay it at its own pace.

use crate::error::SimError;
use humh_core::{Grid, RunSummary, SimulationConfig, StepRecord, TerminationReason};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// A single frame of simulation data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimFrame {
    /// Virtual time in seconds
    pub time_sec: f64,

    /// Per-step metrics
    #[serde(flatten)]
    pub record: StepRecord,

    /// Post-step grid, one string per row (`#` active, `.` inactive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<Vec<String>>,
}

/// Encodes grid rows as strings.
pub fn encode_rows(grid: &Grid) -> Vec<String> {
    grid.rows()
        .map(|row| row.iter().map(|&c| if c { '#' } else { '.' }).collect())
        .collect()
}

/// Complete simulation export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimExport {
    /// Scenario name
    pub scenario: String,

    /// Seed used
    pub seed: u64,

    /// Resolved configuration
    pub config: SimulationConfig,

    /// Initial grid rows
    pub initial_grid: Vec<String>,

    /// All frames
    pub frames: Vec<SimFrame>,

    /// Why the run stopped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination: Option<TerminationReason>,

    /// Whether all checks passed
    pub passed: bool,

    /// Final aggregates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<RunSummary>,
}

impl SimExport {
    /// Creates a new export container.
    pub fn new(scenario: &str, seed: u64, config: SimulationConfig) -> Self {
        Self {
            scenario: scenario.to_string(),
            seed,
            config,
            initial_grid: Vec::new(),
            frames: Vec::new(),
            termination: None,
            passed: false,
            summary: None,
        }
    }

    /// Records the grid before the first step.
    pub fn set_initial_grid(&mut self, grid: &Grid) {
        self.initial_grid = encode_rows(grid);
    }

    /// Adds a frame.
    pub fn add_frame(&mut self, frame: SimFrame) {
        self.frames.push(frame);
    }

    /// Finalizes the export.
    pub fn finalize(&mut self, termination: TerminationReason, passed: bool, summary: RunSummary) {
        self.termination = Some(termination);
        self.passed = passed;
        self.summary = Some(summary);
    }

    /// Serializes to pretty JSON.
    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), SimError> {
        let json = self.to_json()?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ScenarioRunner;
    use crate::scenarios::ScenarioId;

    #[test]
    fn test_encode_rows() {
        let grid = Grid::from_rows(&[vec![true, false], vec![false, false]]).unwrap();
        assert_eq!(encode_rows(&grid), vec!["#.".to_string(), "..".to_string()]);
    }

    #[test]
    fn test_export_parses_back() {
        let runner = ScenarioRunner::new(42);
        let scenario = ScenarioId::FullCoverage;
        let mut export = SimExport::new(scenario.name(), 42, runner.config_for(scenario));

        let result = runner
            .run_observed(scenario, |ctx, record, grid| {
                export.add_frame(SimFrame {
                    time_sec: ctx.time_secs(),
                    record: record.clone(),
                    grid: Some(encode_rows(grid)),
                });
            })
            .unwrap();
        export.set_initial_grid(&result.timeline.initial_grid);
        export.finalize(result.termination(), result.passed, result.summary.clone());

        let json = export.to_json().unwrap();
        let parsed: SimExport = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.frames.len(), result.total_steps());
        assert_eq!(parsed.frames[0].record.step_index, 0);
        assert_eq!(parsed.frames[0].record.state, result.timeline.records[0].state);
        assert_eq!(parsed.frames[0].record.observer, result.timeline.records[0].observer);
        assert_eq!(parsed.frames[0].grid.as_ref().unwrap()[0], "#####");
        assert_eq!(parsed.termination, Some(TerminationReason::FullyManifested));
        assert!(json.contains("\"state\": \"full_harmony\""));
    }

    #[test]
    fn test_write_to_file() {
        let path = std::env::temp_dir().join(format!("humh_export_{}.json", std::process::id()));
        let export = SimExport::new("baseline", 1, SimulationConfig::default());

        export.write_to_file(&path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(contents.contains("\"scenario\": \"baseline\""));
        assert!(!contents.contains("\"summary\""));
    }
}
