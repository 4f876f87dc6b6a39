//! Metrics record: the append-only accumulator threaded through the
//! evaluation pipeline.
//!
//! Keys are namespaced by convention: bare physics keys from the metric
//! models, `meta.*` for bookkeeping, `verification.*` for requirement
//! results, and `array.*`/`rf.*`/`cost.*` for the input columns a batch
//! row carries. Insertion order is preserved so downstream tabular export
//! sees a stable column order, and inserting an existing key is a
//! conflict, never an overwrite.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::EvaluateError;

/// A single metric value. Almost everything is a float; a handful of
/// fields (case id, error text, integration type) are text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Float(f64),
    Text(String),
}

impl MetricValue {
    /// Numeric view of this value, if it is a float.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Float(v) => Some(*v),
            MetricValue::Text(_) => None,
        }
    }

    /// Text view of this value, if it is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetricValue::Float(_) => None,
            MetricValue::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Float(v) => write!(f, "{v}"),
            MetricValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for MetricValue {
    fn from(v: f64) -> Self {
        MetricValue::Float(v)
    }
}

impl From<&str> for MetricValue {
    fn from(s: &str) -> Self {
        MetricValue::Text(s.to_string())
    }
}

impl From<String> for MetricValue {
    fn from(s: String) -> Self {
        MetricValue::Text(s)
    }
}

/// Ordered, append-only mapping of metric name to value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsRecord {
    entries: Vec<(String, MetricValue)>,
    #[serde(skip)]
    index: FxHashMap<String, usize>,
}

impl MetricsRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new key. Fails with `MetricConflict` if the key exists.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<MetricValue>,
    ) -> Result<(), EvaluateError> {
        let key = key.into();
        if self.index.contains_key(&key) {
            return Err(EvaluateError::MetricConflict(key));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value.into()));
        Ok(())
    }

    /// Fold a model's output into this record, preserving its order.
    /// Any key already present aborts the merge with `MetricConflict`.
    pub fn merge(
        &mut self,
        outputs: impl IntoIterator<Item = (String, MetricValue)>,
    ) -> Result<(), EvaluateError> {
        for (key, value) in outputs {
            self.insert(key, value)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&MetricValue> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    /// Numeric value for a key, if present and a float.
    #[must_use]
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(MetricValue::as_f64)
    }

    /// Text value for a key, if present and text.
    #[must_use]
    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(MetricValue::as_text)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Rebuild the key index after deserialization (the index is not
    /// serialized).
    pub fn rebuild_index(&mut self) {
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, (k, _))| (k.clone(), i))
            .collect();
    }
}

impl FromIterator<(String, MetricValue)> for MetricsRecord {
    /// Collects entries, panicking on duplicate keys. Intended for tests
    /// and literals; pipeline code uses `merge` for checked insertion.
    fn from_iter<T: IntoIterator<Item = (String, MetricValue)>>(iter: T) -> Self {
        let mut record = MetricsRecord::new();
        for (k, v) in iter {
            record.insert(k, v).expect("duplicate key in literal record");
        }
        record
    }
}
