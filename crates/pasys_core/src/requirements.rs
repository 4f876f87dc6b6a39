//! Formal requirements and verification against a metrics record.
//!
//! A requirement compares one metric against a threshold. Verification
//! reduces a full record to pass/fail per requirement plus an aggregate
//! verdict: a case passes overall iff every `must`-severity requirement
//! passes. A requirement whose metric is absent from the record fails —
//! missing data is never silently skipped.

use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::metrics::MetricsRecord;

/// Relative tolerance for `==`/`!=` comparisons on floats.
const EQ_REL_TOL: f64 = 1e-9;

/// Comparison operator applied as `metric OP threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOp {
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
}

impl ComparisonOp {
    /// Apply the operator to a metric value and threshold.
    #[must_use]
    pub fn apply(self, value: f64, threshold: f64) -> bool {
        let approx_eq = {
            let scale = value.abs().max(threshold.abs()).max(1.0);
            (value - threshold).abs() <= EQ_REL_TOL * scale
        };
        match self {
            ComparisonOp::Ge => value >= threshold,
            ComparisonOp::Le => value <= threshold,
            ComparisonOp::Gt => value > threshold,
            ComparisonOp::Lt => value < threshold,
            ComparisonOp::Eq => approx_eq,
            ComparisonOp::Ne => !approx_eq,
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ComparisonOp::Ge => ">=",
            ComparisonOp::Le => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Lt => "<",
            ComparisonOp::Eq => "==",
            ComparisonOp::Ne => "!=",
        };
        write!(f, "{s}")
    }
}

/// Whether a failed requirement sinks the case or is only advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Must,
    Should,
}

/// A single verifiable requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    /// Stable identifier (e.g. "REQ-001")
    pub id: String,
    /// Display name
    pub name: String,
    /// Metric key to check in the record
    pub metric_key: String,
    /// Comparison operator
    pub op: ComparisonOp,
    /// Threshold value
    pub value: f64,
    /// Severity
    pub severity: Severity,
}

impl Requirement {
    /// Check this requirement against a record. Absent or non-numeric
    /// metrics fail.
    #[must_use]
    pub fn check(&self, metrics: &MetricsRecord) -> bool {
        match metrics.get_f64(&self.metric_key) {
            Some(value) if !value.is_nan() => self.op.apply(value, self.value),
            _ => false,
        }
    }

    /// Signed margin toward the threshold: positive when passing, for
    /// the ordered operators. `==`/`!=` report the absolute difference.
    #[must_use]
    pub fn margin(&self, metrics: &MetricsRecord) -> Option<f64> {
        let value = metrics.get_f64(&self.metric_key)?;
        Some(match self.op {
            ComparisonOp::Ge | ComparisonOp::Gt => value - self.value,
            ComparisonOp::Le | ComparisonOp::Lt => self.value - value,
            ComparisonOp::Eq | ComparisonOp::Ne => (value - self.value).abs(),
        })
    }
}

/// Ordered collection of requirements, unique by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequirementSet {
    pub name: String,
    requirements: Vec<Requirement>,
}

impl RequirementSet {
    /// Build a set, rejecting duplicate identifiers.
    pub fn new(
        name: impl Into<String>,
        requirements: Vec<Requirement>,
    ) -> Result<Self, ConfigError> {
        let mut seen = FxHashSet::default();
        for req in &requirements {
            if !seen.insert(req.id.as_str()) {
                return Err(ConfigError::DuplicateRequirement(req.id.clone()));
            }
        }
        Ok(Self {
            name: name.into(),
            requirements,
        })
    }

    #[must_use]
    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.requirements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    /// Verify every requirement against a metrics record.
    #[must_use]
    pub fn verify(&self, metrics: &MetricsRecord) -> VerificationReport {
        let mut must_total = 0usize;
        let mut must_passed = 0usize;
        let mut failed_ids = Vec::new();

        for req in &self.requirements {
            let passed = req.check(metrics);
            if req.severity == Severity::Must {
                must_total += 1;
                if passed {
                    must_passed += 1;
                }
            }
            if !passed {
                failed_ids.push(req.id.clone());
            }
        }

        VerificationReport {
            passes: must_passed == must_total,
            must_pass_count: must_passed,
            must_total_count: must_total,
            failed_ids,
        }
    }
}

/// Result of verifying one metrics record against a requirement set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// True iff every must-severity requirement passed
    pub passes: bool,
    /// Must requirements that passed
    pub must_pass_count: usize,
    /// Total must requirements
    pub must_total_count: usize,
    /// Ids of all failed requirements, in set order
    pub failed_ids: Vec<String>,
}
