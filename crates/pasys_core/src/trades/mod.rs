//! Trade-space exploration: design spaces, DOE sampling, batch
//! evaluation and Pareto analysis.

pub mod batch;
pub mod design_space;
pub mod doe;
pub mod pareto;

pub use batch::{BatchRunner, ResultsTable};
pub use design_space::{DesignSpace, Variable, VariableKind};
pub use doe::{DesignPoint, DoeTable, SampleMethod, sample};
pub use pareto::{Direction, Objective, extract_pareto, filter_feasible, rank_pareto};
