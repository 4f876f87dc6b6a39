//! Design space declaration.
//!
//! Variables are named by the configuration path they drive
//! (`array.nx`, `rf.tx_power_w_per_elem`, `cost.nre_usd`). The space
//! only declares ranges; sampling lives in `doe` and path application
//! in the batch runner.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::metrics::MetricValue;

/// The kind and range of one design variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VariableKind {
    /// Explicit finite set of values
    Categorical { values: Vec<MetricValue> },
    /// Inclusive integer range
    Int { low: i64, high: i64 },
    /// Inclusive continuous range
    Float { low: f64, high: f64 },
}

/// A named design variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    #[serde(flatten)]
    pub kind: VariableKind,
}

impl Variable {
    fn validate(&self) -> Result<(), ConfigError> {
        match &self.kind {
            VariableKind::Categorical { values } => {
                if values.is_empty() {
                    return Err(ConfigError::EmptyCategorical(self.name.clone()));
                }
            }
            VariableKind::Int { low, high } => {
                if low > high {
                    return Err(ConfigError::InvalidBounds {
                        variable: self.name.clone(),
                        low: *low as f64,
                        high: *high as f64,
                    });
                }
            }
            VariableKind::Float { low, high } => {
                if !(low.is_finite() && high.is_finite()) || low > high {
                    return Err(ConfigError::InvalidBounds {
                        variable: self.name.clone(),
                        low: *low,
                        high: *high,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Ordered collection of uniquely-named variables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesignSpace {
    variables: Vec<Variable>,
}

impl DesignSpace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable, consuming and returning the space so calls chain
    /// with `?`.
    pub fn add_variable(
        mut self,
        name: impl Into<String>,
        kind: VariableKind,
    ) -> Result<Self, ConfigError> {
        let variable = Variable {
            name: name.into(),
            kind,
        };
        variable.validate()?;
        if self.variables.iter().any(|v| v.name == variable.name) {
            return Err(ConfigError::DuplicateVariable(variable.name));
        }
        self.variables.push(variable);
        Ok(self)
    }

    /// Build from a pre-assembled variable list (config loading).
    pub fn from_variables(variables: Vec<Variable>) -> Result<Self, ConfigError> {
        let mut seen = FxHashSet::default();
        for v in &variables {
            v.validate()?;
            if !seen.insert(v.name.as_str()) {
                return Err(ConfigError::DuplicateVariable(v.name.clone()));
            }
        }
        Ok(Self { variables })
    }

    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Variable names in declaration order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.variables.iter().map(|v| v.name.clone()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}
