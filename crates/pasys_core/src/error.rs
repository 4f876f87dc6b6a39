use std::fmt;

/// Errors raised at construction time: invalid design spaces, duplicate
/// identifiers, invalid architecture or scenario parameters.
///
/// These always fail fast; nothing is silently corrected.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// A numeric range variable was declared with low > high
    InvalidBounds {
        variable: String,
        low: f64,
        high: f64,
    },
    /// A categorical variable was declared with no values
    EmptyCategorical(String),
    /// Two variables in a design space share a name
    DuplicateVariable(String),
    /// Two requirements in a set share an identifier
    DuplicateRequirement(String),
    /// Grid sampling requested over a continuous variable
    GridRequiresDiscreteVariable(String),
    /// Objective weights do not match the objective count
    WeightCountMismatch { expected: usize, actual: usize },
    /// An architecture or scenario parameter is out of its valid range
    InvalidParameter { name: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBounds {
                variable,
                low,
                high,
            } => {
                write!(f, "variable '{variable}': low {low} > high {high}")
            }
            ConfigError::EmptyCategorical(name) => {
                write!(f, "categorical variable '{name}' has no values")
            }
            ConfigError::DuplicateVariable(name) => {
                write!(f, "variable '{name}' already exists in design space")
            }
            ConfigError::DuplicateRequirement(id) => {
                write!(f, "requirement id '{id}' is not unique")
            }
            ConfigError::GridRequiresDiscreteVariable(name) => {
                write!(
                    f,
                    "grid sampling requires a finite discretization for variable '{name}'"
                )
            }
            ConfigError::WeightCountMismatch { expected, actual } => {
                write!(f, "expected {expected} weights, got {actual}")
            }
            ConfigError::InvalidParameter { name, reason } => {
                write!(f, "invalid parameter '{name}': {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors raised while evaluating a single case.
///
/// Outside the batch runner these propagate to the caller; inside it they
/// are caught per case and recorded on the row's `meta.error` field.
#[derive(Debug, Clone)]
pub enum EvaluateError {
    /// Two models attempted to write the same metric key. This is a
    /// programming-error class failure and aborts the evaluation.
    MetricConflict(String),
    /// A model rejected its inputs (e.g. scan angle at 90 degrees)
    Model { model: &'static str, reason: String },
    /// A design point referenced an unknown configuration path
    UnknownPath(String),
    /// A design point value could not be applied to its target field
    BadValue { path: String, reason: String },
    /// The point's architecture failed validation
    Config(ConfigError),
}

impl fmt::Display for EvaluateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluateError::MetricConflict(key) => {
                write!(f, "metric key '{key}' written twice")
            }
            EvaluateError::Model { model, reason } => {
                write!(f, "{model} model: {reason}")
            }
            EvaluateError::UnknownPath(path) => {
                write!(f, "unknown design variable path '{path}'")
            }
            EvaluateError::BadValue { path, reason } => {
                write!(f, "cannot apply value at '{path}': {reason}")
            }
            EvaluateError::Config(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for EvaluateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EvaluateError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for EvaluateError {
    fn from(e: ConfigError) -> Self {
        EvaluateError::Config(e)
    }
}
