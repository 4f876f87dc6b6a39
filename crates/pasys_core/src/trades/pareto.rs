//! Pareto-frontier extraction and ranking over a results table.
//!
//! Rows with a `meta.error` or a missing or non-finite objective value
//! are excluded before any dominance comparison. Dominance is the
//! standard definition: one row dominates another when it is at least
//! as good on every objective and strictly better on at least one.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::metrics::MetricsRecord;

use super::batch::ResultsTable;

/// Optimization direction for one objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Minimize,
    Maximize,
}

/// One objective: a metric key and the direction that improves it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub key: String,
    pub direction: Direction,
}

impl Objective {
    pub fn minimize(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: Direction::Minimize,
        }
    }

    pub fn maximize(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: Direction::Maximize,
        }
    }
}

/// Objective values in canonical maximize-space, or None if this row
/// cannot participate (errored, missing key, non-finite value).
fn canonical_values(row: &MetricsRecord, objectives: &[Objective]) -> Option<Vec<f64>> {
    if row.contains_key("meta.error") {
        return None;
    }
    objectives
        .iter()
        .map(|obj| {
            let v = row.get_f64(&obj.key)?;
            if !v.is_finite() {
                return None;
            }
            Some(match obj.direction {
                Direction::Maximize => v,
                Direction::Minimize => -v,
            })
        })
        .collect()
}

/// True when `a` dominates `b` (both in canonical maximize-space).
fn dominates(a: &[f64], b: &[f64]) -> bool {
    let mut strictly_better = false;
    for (&x, &y) in a.iter().zip(b) {
        if x < y {
            return false;
        }
        if x > y {
            strictly_better = true;
        }
    }
    strictly_better
}

/// Extract the non-dominated subset of a results table, in input order.
#[must_use]
pub fn extract_pareto(results: &ResultsTable, objectives: &[Objective]) -> ResultsTable {
    let candidates: Vec<(&MetricsRecord, Vec<f64>)> = results
        .iter()
        .filter_map(|row| canonical_values(row, objectives).map(|v| (row, v)))
        .collect();

    let frontier = candidates
        .iter()
        .filter(|(_, values)| {
            !candidates
                .iter()
                .any(|(_, other)| dominates(other, values))
        })
        .map(|(row, _)| (*row).clone())
        .collect();

    ResultsTable::new(frontier)
}

/// Rank rows by a min-max normalized weighted sum of the objectives,
/// best first. Ties are broken by case id so the order is total.
///
/// Weights default to equal; when given they must match the objective
/// count.
pub fn rank_pareto(
    results: &ResultsTable,
    objectives: &[Objective],
    weights: Option<&[f64]>,
) -> Result<ResultsTable, ConfigError> {
    if let Some(w) = weights
        && w.len() != objectives.len()
    {
        return Err(ConfigError::WeightCountMismatch {
            expected: objectives.len(),
            actual: w.len(),
        });
    }
    let weights: Vec<f64> = match weights {
        Some(w) => w.to_vec(),
        None => vec![1.0; objectives.len()],
    };

    let candidates: Vec<(&MetricsRecord, Vec<f64>)> = results
        .iter()
        .filter_map(|row| canonical_values(row, objectives).map(|v| (row, v)))
        .collect();
    if candidates.is_empty() {
        return Ok(ResultsTable::default());
    }

    // Per-objective min/max over the participating rows
    let n_obj = objectives.len();
    let mut mins = vec![f64::INFINITY; n_obj];
    let mut maxs = vec![f64::NEG_INFINITY; n_obj];
    for (_, values) in &candidates {
        for (j, &v) in values.iter().enumerate() {
            mins[j] = mins[j].min(v);
            maxs[j] = maxs[j].max(v);
        }
    }

    let mut scored: Vec<(f64, &str, &MetricsRecord)> = candidates
        .iter()
        .map(|(row, values)| {
            let score: f64 = values
                .iter()
                .zip(&weights)
                .enumerate()
                .map(|(j, (&v, &w))| {
                    let span = maxs[j] - mins[j];
                    // A constant objective contributes nothing
                    let normalized = if span > 0.0 { (v - mins[j]) / span } else { 0.0 };
                    w * normalized
                })
                .sum();
            let case_id = row.get_text("meta.case_id").unwrap_or_default();
            (score, case_id, *row)
        })
        .collect();

    scored.sort_by(|(score_a, id_a, _), (score_b, id_b, _)| {
        score_b
            .partial_cmp(score_a)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| id_a.cmp(id_b))
    });

    Ok(ResultsTable::new(
        scored.into_iter().map(|(_, _, row)| row.clone()).collect(),
    ))
}

/// Rows whose requirement verification passed.
#[must_use]
pub fn filter_feasible(results: &ResultsTable) -> ResultsTable {
    ResultsTable::new(
        results
            .iter()
            .filter(|row| row.get_f64("verification.passes") == Some(1.0))
            .cloned()
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricValue;

    fn row(case_id: &str, cost: f64, margin: f64) -> MetricsRecord {
        let mut r = MetricsRecord::new();
        r.insert("meta.case_id", case_id).unwrap();
        r.insert("cost_usd", cost).unwrap();
        r.insert("snr_margin_db", margin).unwrap();
        r
    }

    fn objectives() -> Vec<Objective> {
        vec![
            Objective::minimize("cost_usd"),
            Objective::maximize("snr_margin_db"),
        ]
    }

    fn table() -> ResultsTable {
        ResultsTable::new(vec![
            row("case_00000", 100.0, 5.0),
            row("case_00001", 200.0, 10.0),
            // Dominated by case_00000: worse cost, same margin
            row("case_00002", 150.0, 5.0),
            // Dominated by case_00001 on both axes
            row("case_00003", 300.0, 8.0),
        ])
    }

    fn ids(results: &ResultsTable) -> Vec<&str> {
        results
            .iter()
            .map(|r| r.get_text("meta.case_id").unwrap())
            .collect()
    }

    #[test]
    fn dominated_rows_excluded() {
        let frontier = extract_pareto(&table(), &objectives());
        assert_eq!(ids(&frontier), vec!["case_00000", "case_00001"]);
    }

    #[test]
    fn extraction_is_idempotent() {
        let frontier = extract_pareto(&table(), &objectives());
        let again = extract_pareto(&frontier, &objectives());
        assert_eq!(ids(&frontier), ids(&again));
    }

    #[test]
    fn equal_rows_do_not_dominate_each_other() {
        let results = ResultsTable::new(vec![
            row("case_00000", 100.0, 5.0),
            row("case_00001", 100.0, 5.0),
        ]);
        let frontier = extract_pareto(&results, &objectives());
        assert_eq!(frontier.len(), 2);
    }

    #[test]
    fn errored_rows_never_reach_the_frontier() {
        let mut errored = row("case_00004", 1.0, 100.0);
        errored.insert("meta.error", "model blew up").unwrap();
        let mut rows: Vec<MetricsRecord> = table().rows().to_vec();
        rows.push(errored);

        let frontier = extract_pareto(&ResultsTable::new(rows), &objectives());
        assert_eq!(ids(&frontier), vec!["case_00000", "case_00001"]);
    }

    #[test]
    fn missing_objective_excludes_row() {
        let mut incomplete = MetricsRecord::new();
        incomplete.insert("meta.case_id", "case_00005").unwrap();
        incomplete.insert("cost_usd", 1.0).unwrap();
        let results = ResultsTable::new(vec![row("case_00000", 100.0, 5.0), incomplete]);

        let frontier = extract_pareto(&results, &objectives());
        assert_eq!(ids(&frontier), vec!["case_00000"]);
    }

    #[test]
    fn ranking_orders_best_first() {
        let frontier = extract_pareto(&table(), &objectives());
        // Weight margin heavily: the expensive high-margin design wins
        let ranked = rank_pareto(&frontier, &objectives(), Some(&[0.1, 0.9])).unwrap();
        assert_eq!(ids(&ranked), vec!["case_00001", "case_00000"]);

        // Weight cost heavily instead
        let ranked = rank_pareto(&frontier, &objectives(), Some(&[0.9, 0.1])).unwrap();
        assert_eq!(ids(&ranked), vec!["case_00000", "case_00001"]);
    }

    #[test]
    fn tie_broken_by_case_id() {
        let results = ResultsTable::new(vec![
            row("case_00001", 100.0, 5.0),
            row("case_00000", 100.0, 5.0),
        ]);
        let ranked = rank_pareto(&results, &objectives(), None).unwrap();
        assert_eq!(ids(&ranked), vec!["case_00000", "case_00001"]);
    }

    #[test]
    fn weight_count_mismatch_rejected() {
        let err = rank_pareto(&table(), &objectives(), Some(&[1.0])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::WeightCountMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn feasible_filter_reads_verification() {
        let mut pass = row("case_00000", 100.0, 5.0);
        pass.insert("verification.passes", 1.0).unwrap();
        let mut fail = row("case_00001", 100.0, 5.0);
        fail.insert("verification.passes", 0.0).unwrap();
        let unverified = row("case_00002", 100.0, 5.0);

        let feasible =
            filter_feasible(&ResultsTable::new(vec![pass, fail, unverified]));
        assert_eq!(ids(&feasible), vec!["case_00000"]);
    }

    #[test]
    fn zero_objectives_keeps_all_clean_rows() {
        let frontier = extract_pareto(&table(), &[]);
        assert_eq!(frontier.len(), 4);
    }

    #[test]
    fn text_objective_value_excludes_row() {
        let mut r = row("case_00000", 100.0, 5.0);
        r.insert("label", MetricValue::Text("x".into())).unwrap();
        let results = ResultsTable::new(vec![r]);
        let frontier = extract_pareto(
            &results,
            &[Objective::maximize("label")],
        );
        assert!(frontier.is_empty());
    }
}
