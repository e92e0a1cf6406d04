//! HUMH Core - Observer-Driven Manifestation Engine
//!
//! Simulates an N×N binary grid evolving under a moving observer that
//! activates every cell in a clipped square neighborhood around its
//! position, and derives three families of values from the trajectory:
//! 1. **Harmonic Entropy**: `EH = 1 - |2p - 1|` over the active proportion `p`
//! 2. **Manifestation Cost**: fraction of the grid newly activated by a step,
//!    discounted by a compression factor into a parsimonious energy
//! 3. **State Classification**: one of four discrete harmony labels per step
//!
//! # Usage
//!
//! ```ignore
//! use humh_core::{SimulationConfig, Simulation};
//!
//! let config = SimulationConfig::default();
//! let mut sim = Simulation::with_seed(config, 42)?;
//!
//! while let Some(record) = sim.step() {
//!     render(sim.grid(), &record);
//! }
//! ```
//!
//! The only random element of a run is the initial population. Everything
//! after it is a deterministic function of the config.

pub mod activation;
pub mod classify;
pub mod config;
pub mod driver;
pub mod error;
pub mod grid;
pub mod metrics;
pub mod summary;
pub mod trajectory;

// Re-export key types for convenience
pub use activation::Activation;
pub use classify::{classify, StateLabel};
pub use config::SimulationConfig;
pub use driver::{run, run_seeded, RunState, Simulation, StepRecord, TerminationReason, Timeline};
pub use error::{HumhError, Result};
pub use grid::{Grid, Position};
pub use summary::{RunSummary, StateSnapshot, Verdict};
