//! Error types for the HUMH engine.

use thiserror::Error;

/// Errors raised before a run begins. No step can fail once a run has started.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HumhError {
    /// A `SimulationConfig` field lies outside its valid range
    #[error("Invalid config: {field} {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: String,
    },
}

impl HumhError {
    /// Creates an invalid config error for the named field.
    pub fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HumhError>;
