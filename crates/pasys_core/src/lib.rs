//! Phased-array trade-space evaluation library
//!
//! This crate evaluates phased-array system designs (antenna arrays plus
//! their RF chains) against mission scenarios and explores the resulting
//! trade space. It provides:
//! - A composable metric-model pipeline (antenna, power, cost, link or
//!   radar) merging into one conflict-checked metrics record
//! - Requirement verification with must/should severities and margins
//! - Design-space declaration with grid, random and Latin hypercube
//!   sampling
//! - A batch runner with per-case failure isolation and parallel
//!   evaluation behind the `parallel` feature
//! - Pareto-frontier extraction and weighted ranking
//!
//! # Example
//!
//! ```ignore
//! use pasys_core::{DesignSpace, VariableKind, SampleMethod, BatchRunner};
//!
//! let space = DesignSpace::new()
//!     .add_variable("array.nx", VariableKind::Categorical {
//!         values: vec![8.0.into(), 16.0.into(), 32.0.into()],
//!     })?
//!     .add_variable("rf.tx_power_w_per_elem", VariableKind::Float { low: 0.5, high: 4.0 })?;
//! let doe = pasys_core::trades::sample(&space, SampleMethod::Lhs, 64, 42)?;
//! let results = BatchRunner::new(scenario, Some(requirements)).run(&doe, 4, None);
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod architecture;
pub mod constants;
pub mod error;
pub mod evaluate;
pub mod metrics;
pub mod models;
pub mod requirements;
pub mod scenario;
pub mod trades;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use architecture::{Architecture, ArrayConfig, CostConfig, RfChainConfig};
pub use error::{ConfigError, EvaluateError};
pub use evaluate::evaluate_case;
pub use metrics::{MetricValue, MetricsRecord};
pub use requirements::{
    ComparisonOp, Requirement, RequirementSet, Severity, VerificationReport,
};
pub use scenario::{CommsLinkScenario, IntegrationType, RadarDetectionScenario, Scenario};
pub use trades::{
    BatchRunner, DesignPoint, DesignSpace, Direction, DoeTable, Objective, ResultsTable,
    SampleMethod, Variable, VariableKind, extract_pareto, filter_feasible, rank_pareto, sample,
};
