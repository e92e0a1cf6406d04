//! Error types for the simulation harness.

use humh_core::HumhError;
use thiserror::Error;

/// Errors that can occur while running or exporting scenarios.
#[derive(Debug, Error)]
pub enum SimError {
    /// The resolved simulation config was rejected by the engine
    #[error(transparent)]
    Engine(#[from] HumhError),

    /// Scenario name did not match any preset
    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),

    /// Export file could not be written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Export serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SimError {
    /// Creates an unknown scenario error.
    pub fn unknown_scenario(name: impl std::fmt::Display) -> Self {
        Self::UnknownScenario(name.to_string())
    }
}
