//! HUMH Deterministic Scenario Harness
//!
//! Runs the HUMH engine under named scenarios with all randomness derived
//! from a single 64-bit seed, so any failing run is reproducible from its
//! seed number.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     ScenarioRunner                       │
//! │  ┌──────────────┐   ┌─────────────────────────────────┐  │
//! │  │  SimContext  │──►│ Simulation (humh_core)          │  │
//! │  │ seed + clock │   │ grid → activation → metrics     │  │
//! │  └──────────────┘   └───────────────┬─────────────────┘  │
//! │                                     │ StepRecord         │
//! │              ┌──────────────────────┼──────────────┐     │
//! │              ▼                      ▼              ▼     │
//! │        invariant checks        SimExport       report    │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use humh_sim::{ScenarioRunner, scenarios::ScenarioId};
//!
//! let result = ScenarioRunner::new(42).run(ScenarioId::Baseline)?;
//! assert!(result.passed);
//! ```

mod context;
mod error;
mod exporter;
pub mod report;
mod runner;
pub mod scenarios;

pub use context::SimContext;
pub use error::SimError;
pub use exporter::{encode_rows, SimExport, SimFrame};
pub use runner::{check_expectation, check_timeline, ConfigOverrides, ScenarioMetrics, ScenarioResult, ScenarioRunner};
