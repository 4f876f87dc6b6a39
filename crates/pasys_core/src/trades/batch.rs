//! Batch evaluation of a DOE table.
//!
//! Each design point is applied to a base architecture via its facet
//! paths, evaluated, and the result collected into a results table in
//! input order. A failing case never sinks the batch: the error text is
//! recorded on that row under `meta.error` and the run continues.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::architecture::Architecture;
use crate::error::EvaluateError;
use crate::evaluate::evaluate_case;
use crate::metrics::{MetricValue, MetricsRecord};
use crate::requirements::RequirementSet;
use crate::scenario::Scenario;

use super::doe::{DesignPoint, DoeTable};

/// Ordered evaluation results, one row per design point.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultsTable {
    rows: Vec<MetricsRecord>,
}

impl ResultsTable {
    #[must_use]
    pub fn new(rows: Vec<MetricsRecord>) -> Self {
        Self { rows }
    }

    #[must_use]
    pub fn rows(&self) -> &[MetricsRecord] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricsRecord> {
        self.rows.iter()
    }

    /// Rows that evaluated without error.
    pub fn clean_rows(&self) -> impl Iterator<Item = &MetricsRecord> {
        self.rows.iter().filter(|r| !r.contains_key("meta.error"))
    }
}

/// Progress callback: (completed, total) after each case. Invoked from
/// worker threads when running parallel.
pub type ProgressFn<'a> = &'a (dyn Fn(usize, usize) + Sync);

/// Runs a DOE table against a fixed scenario and requirement set.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    base: Architecture,
    scenario: Scenario,
    requirements: Option<RequirementSet>,
}

impl BatchRunner {
    #[must_use]
    pub fn new(scenario: Scenario, requirements: Option<RequirementSet>) -> Self {
        Self {
            base: Architecture::default(),
            scenario,
            requirements,
        }
    }

    /// Use a non-default base architecture; design points override only
    /// the fields their paths name.
    #[must_use]
    pub fn with_base_architecture(mut self, base: Architecture) -> Self {
        self.base = base;
        self
    }

    /// Evaluate every point in the table.
    ///
    /// Results are returned in input order regardless of completion
    /// order. `n_workers > 1` evaluates on a dedicated thread pool of
    /// that size (with the `parallel` feature; sequential otherwise).
    /// A panicking progress callback is contained and does not abort
    /// the batch.
    pub fn run(
        &self,
        doe: &DoeTable,
        n_workers: usize,
        progress: Option<ProgressFn>,
    ) -> ResultsTable {
        let total = doe.len();
        let completed = Arc::new(AtomicUsize::new(0));

        let eval_one = |point: &DesignPoint| -> MetricsRecord {
            let row = self.evaluate_point(&doe.variables, point);
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(callback) = progress {
                let _ = catch_unwind(AssertUnwindSafe(|| callback(done, total)));
            }
            row
        };

        #[cfg(feature = "parallel")]
        if n_workers > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n_workers)
                .build();
            let rows = match pool {
                // Indexed parallel collect preserves input order
                Ok(pool) => pool.install(|| doe.points.par_iter().map(eval_one).collect()),
                Err(_) => doe.points.iter().map(eval_one).collect(),
            };
            return ResultsTable::new(rows);
        }

        #[cfg(not(feature = "parallel"))]
        let _ = n_workers;
        ResultsTable::new(doe.points.iter().map(eval_one).collect())
    }

    /// Evaluate one design point, folding any error into the row.
    fn evaluate_point(&self, variables: &[String], point: &DesignPoint) -> MetricsRecord {
        match self.try_evaluate_point(variables, point) {
            Ok(row) => row,
            Err(e) => {
                let mut row = MetricsRecord::new();
                // These inserts cannot conflict on a fresh record
                let _ = row.insert("meta.case_id", point.case_id.as_str());
                for (name, value) in variables.iter().zip(&point.values) {
                    let _ = row.insert(name.as_str(), value.clone());
                }
                let _ = row.insert("meta.error", e.to_string());
                row
            }
        }
    }

    fn try_evaluate_point(
        &self,
        variables: &[String],
        point: &DesignPoint,
    ) -> Result<MetricsRecord, EvaluateError> {
        let arch = apply_point(&self.base, variables, point)?;
        arch.validate()?;

        let metrics = evaluate_case(
            &arch,
            &self.scenario,
            self.requirements.as_ref(),
            Some(&point.case_id),
        )?;

        // Input columns first (after the case id), then all metrics
        let mut row = MetricsRecord::new();
        row.insert("meta.case_id", point.case_id.as_str())?;
        for (name, value) in variables.iter().zip(&point.values) {
            row.insert(name.as_str(), value.clone())?;
        }
        for (key, value) in metrics.iter() {
            if key != "meta.case_id" {
                row.insert(key, value.clone())?;
            }
        }
        Ok(row)
    }
}

fn bad_value(path: &str, reason: impl Into<String>) -> EvaluateError {
    EvaluateError::BadValue {
        path: path.to_string(),
        reason: reason.into(),
    }
}

fn as_f64(path: &str, value: &MetricValue) -> Result<f64, EvaluateError> {
    value
        .as_f64()
        .ok_or_else(|| bad_value(path, "expected a numeric value"))
}

fn as_u32(path: &str, value: &MetricValue) -> Result<u32, EvaluateError> {
    let v = as_f64(path, value)?;
    if v.fract() != 0.0 || v < 0.0 || v > f64::from(u32::MAX) {
        return Err(bad_value(path, format!("{v} is not a valid count")));
    }
    Ok(v as u32)
}

/// Apply a design point to a copy of the base architecture using the
/// facet-path convention (`array.nx`, `rf.pa_efficiency`, ...).
pub fn apply_point(
    base: &Architecture,
    variables: &[String],
    point: &DesignPoint,
) -> Result<Architecture, EvaluateError> {
    let mut arch = base.clone();

    for (path, value) in variables.iter().zip(&point.values) {
        match path.as_str() {
            "array.nx" => arch.array.nx = as_u32(path, value)?,
            "array.ny" => arch.array.ny = as_u32(path, value)?,
            "array.dx_lambda" => arch.array.dx_lambda = as_f64(path, value)?,
            "array.dy_lambda" => arch.array.dy_lambda = as_f64(path, value)?,
            "array.element_gain_db" => arch.array.element_gain_db = as_f64(path, value)?,
            "rf.tx_power_w_per_elem" => arch.rf.tx_power_w_per_elem = as_f64(path, value)?,
            "rf.pa_efficiency" => arch.rf.pa_efficiency = as_f64(path, value)?,
            "rf.psu_efficiency" => arch.rf.psu_efficiency = as_f64(path, value)?,
            "rf.noise_figure_db" => arch.rf.noise_figure_db = as_f64(path, value)?,
            "rf.feed_loss_db" => arch.rf.feed_loss_db = as_f64(path, value)?,
            "rf.system_loss_db" => arch.rf.system_loss_db = as_f64(path, value)?,
            "rf.n_tx_beams" => arch.rf.n_tx_beams = as_u32(path, value)?,
            "cost.cost_per_elem_usd" => arch.cost.cost_per_elem_usd = as_f64(path, value)?,
            "cost.nre_usd" => arch.cost.nre_usd = as_f64(path, value)?,
            "cost.integration_cost_usd" => {
                arch.cost.integration_cost_usd = as_f64(path, value)?;
            }
            _ => return Err(EvaluateError::UnknownPath(path.clone())),
        }
    }

    Ok(arch)
}
