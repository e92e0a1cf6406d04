//! Simulation configuration.

use crate::error::{HumhError, Result};
use serde::{Deserialize, Serialize};

/// Default grid side length.
pub const DEFAULT_GRID_SIZE: usize = 30;

/// Default maximum number of steps.
pub const DEFAULT_FRAME_COUNT: usize = 225;

/// Default half-width of the observer's square neighborhood.
pub const DEFAULT_ACTIVATION_RADIUS: usize = 4;

/// Default harmonic compression applied to raw cost (percent).
pub const DEFAULT_COMPRESSION_PERCENT: f64 = 70.0;

/// Default probability of a cell starting active (15 / 85 split).
pub const DEFAULT_INITIAL_ACTIVE_PROBABILITY: f64 = 0.15;

/// Configuration for a simulation run. Immutable once a run starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Side length N of the N×N grid
    pub grid_size: usize,

    /// Maximum number of steps
    pub frame_count: usize,

    /// Half-width of the square activation neighborhood (not a disk)
    pub activation_radius: usize,

    /// Discount applied to raw manifestation cost, in [0, 100]
    pub compression_percent: f64,

    /// Probability each cell starts active, in [0, 1]
    pub initial_active_probability: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            frame_count: DEFAULT_FRAME_COUNT,
            activation_radius: DEFAULT_ACTIVATION_RADIUS,
            compression_percent: DEFAULT_COMPRESSION_PERCENT,
            initial_active_probability: DEFAULT_INITIAL_ACTIVE_PROBABILITY,
        }
    }
}

impl SimulationConfig {
    /// Creates a validated configuration.
    pub fn new(
        grid_size: usize,
        frame_count: usize,
        activation_radius: usize,
        compression_percent: f64,
        initial_active_probability: f64,
    ) -> Result<Self> {
        let config = Self {
            grid_size,
            frame_count,
            activation_radius,
            compression_percent,
            initial_active_probability,
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets the grid size.
    pub fn with_grid_size(mut self, grid_size: usize) -> Self {
        self.grid_size = grid_size;
        self
    }

    /// Sets the maximum number of steps.
    pub fn with_frame_count(mut self, frame_count: usize) -> Self {
        self.frame_count = frame_count;
        self
    }

    /// Sets the activation radius.
    pub fn with_activation_radius(mut self, radius: usize) -> Self {
        self.activation_radius = radius;
        self
    }

    /// Sets the compression percentage.
    pub fn with_compression_percent(mut self, percent: f64) -> Self {
        self.compression_percent = percent;
        self
    }

    /// Sets the initial active probability.
    pub fn with_initial_active_probability(mut self, probability: f64) -> Self {
        self.initial_active_probability = probability;
        self
    }

    /// Checks every field against its valid range.
    pub fn validate(&self) -> Result<()> {
        if self.grid_size < 1 {
            return Err(HumhError::invalid_config("grid_size", "must be at least 1"));
        }
        if self.frame_count < 1 {
            return Err(HumhError::invalid_config("frame_count", "must be at least 1"));
        }
        if self.activation_radius < 1 {
            return Err(HumhError::invalid_config(
                "activation_radius",
                "must be at least 1",
            ));
        }
        if !self.compression_percent.is_finite()
            || !(0.0..=100.0).contains(&self.compression_percent)
        {
            return Err(HumhError::invalid_config(
                "compression_percent",
                format!("must be within [0, 100], got {}", self.compression_percent),
            ));
        }
        if !self.initial_active_probability.is_finite()
            || !(0.0..=1.0).contains(&self.initial_active_probability)
        {
            return Err(HumhError::invalid_config(
                "initial_active_probability",
                format!(
                    "must be within [0, 1], got {}",
                    self.initial_active_probability
                ),
            ));
        }
        Ok(())
    }

    /// Total number of cells (N²).
    pub fn cell_count(&self) -> usize {
        self.grid_size * self.grid_size
    }
}
