//! Metric models.
//!
//! Each model is a pure function from (architecture, scenario, context)
//! to an ordered list of metric outputs. The evaluation pipeline runs
//! them in a fixed order and merges the outputs into one record; models
//! must therefore emit disjoint key sets. The context a model receives
//! is the record accumulated by the models that ran before it.

pub mod antenna;
pub mod cascade;
pub mod comms;
pub mod radar;
pub mod swapc;

use crate::error::EvaluateError;
use crate::metrics::MetricValue;

/// Ordered metric outputs from one model.
pub type ModelOutput = Vec<(String, MetricValue)>;

pub(crate) fn model_error(model: &'static str, reason: impl Into<String>) -> EvaluateError {
    EvaluateError::Model {
        model,
        reason: reason.into(),
    }
}
