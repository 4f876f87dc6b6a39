//! Design-of-experiments sampling.
//!
//! Three samplers over a `DesignSpace`: exhaustive grid, seeded uniform
//! random, and Latin hypercube. All are deterministic for a given
//! (space, method, n, seed) so batches reproduce exactly.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::metrics::MetricValue;

use super::design_space::{DesignSpace, VariableKind};

/// Sampling strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleMethod {
    /// Cartesian product of all discrete levels
    Grid,
    /// Independent uniform draws
    Random,
    /// Latin hypercube: stratified, one sample per stratum per dimension
    Lhs,
}

/// One sampled point: a case id plus one value per variable, in
/// declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignPoint {
    pub case_id: String,
    pub values: Vec<MetricValue>,
}

/// An ordered table of design points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoeTable {
    /// Variable names, one per value column
    pub variables: Vec<String>,
    pub points: Vec<DesignPoint>,
}

impl DoeTable {
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

fn case_id(index: usize) -> String {
    format!("case_{index:05}")
}

/// Sample a design space.
///
/// `n_samples` is the point count for `Random` and `Lhs`; `Grid`
/// ignores it and produces the full Cartesian product.
pub fn sample(
    space: &DesignSpace,
    method: SampleMethod,
    n_samples: usize,
    seed: u64,
) -> Result<DoeTable, ConfigError> {
    let points = match method {
        SampleMethod::Grid => sample_grid(space)?,
        SampleMethod::Random => sample_random(space, n_samples, seed),
        SampleMethod::Lhs => sample_lhs(space, n_samples, seed),
    };

    Ok(DoeTable {
        variables: space.names(),
        points: points
            .into_iter()
            .enumerate()
            .map(|(i, values)| DesignPoint {
                case_id: case_id(i),
                values,
            })
            .collect(),
    })
}

/// Discrete levels for one variable under grid sampling. A float range
/// only discretizes when it is a single point.
fn grid_levels(name: &str, kind: &VariableKind) -> Result<Vec<MetricValue>, ConfigError> {
    match kind {
        VariableKind::Categorical { values } => Ok(values.clone()),
        VariableKind::Int { low, high } => {
            Ok((*low..=*high).map(|v| MetricValue::Float(v as f64)).collect())
        }
        VariableKind::Float { low, high } => {
            if low == high {
                Ok(vec![MetricValue::Float(*low)])
            } else {
                Err(ConfigError::GridRequiresDiscreteVariable(name.to_string()))
            }
        }
    }
}

fn sample_grid(space: &DesignSpace) -> Result<Vec<Vec<MetricValue>>, ConfigError> {
    let levels: Vec<Vec<MetricValue>> = space
        .variables()
        .iter()
        .map(|v| grid_levels(&v.name, &v.kind))
        .collect::<Result<_, _>>()?;

    if levels.is_empty() {
        return Ok(vec![]);
    }

    // Odometer over level indices; last variable varies fastest
    let mut points = Vec::with_capacity(levels.iter().map(Vec::len).product());
    let mut indices = vec![0usize; levels.len()];
    loop {
        points.push(
            indices
                .iter()
                .zip(&levels)
                .map(|(&i, column)| column[i].clone())
                .collect(),
        );

        let mut carry = true;
        for (index, column) in indices.iter_mut().zip(&levels).rev() {
            if carry {
                *index += 1;
                if *index >= column.len() {
                    *index = 0;
                } else {
                    carry = false;
                }
            }
        }
        if carry {
            break;
        }
    }
    Ok(points)
}

fn sample_random(space: &DesignSpace, n_samples: usize, seed: u64) -> Vec<Vec<MetricValue>> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..n_samples)
        .map(|_| {
            space
                .variables()
                .iter()
                .map(|v| match &v.kind {
                    VariableKind::Categorical { values } => {
                        values[rng.random_range(0..values.len())].clone()
                    }
                    VariableKind::Int { low, high } => {
                        MetricValue::Float(rng.random_range(*low..=*high) as f64)
                    }
                    VariableKind::Float { low, high } => {
                        MetricValue::Float(rng.random_range(*low..=*high))
                    }
                })
                .collect()
        })
        .collect()
}

fn sample_lhs(space: &DesignSpace, n_samples: usize, seed: u64) -> Vec<Vec<MetricValue>> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let n = n_samples;
    if n == 0 {
        return vec![];
    }

    // One column per variable: a shuffled stratum assignment plus a
    // jitter within each stratum.
    let columns: Vec<Vec<MetricValue>> = space
        .variables()
        .iter()
        .map(|v| {
            let mut strata: Vec<usize> = (0..n).collect();
            strata.shuffle(&mut rng);

            match &v.kind {
                VariableKind::Categorical { values } => strata
                    .iter()
                    .map(|&s| values[s * values.len() / n].clone())
                    .collect(),
                VariableKind::Int { low, high } => {
                    let span = (*high - *low) as f64;
                    strata
                        .iter()
                        .map(|&s| {
                            let u = (s as f64 + rng.random::<f64>()) / n as f64;
                            let value = (*low as f64 + span * u).round();
                            MetricValue::Float(value.clamp(*low as f64, *high as f64))
                        })
                        .collect()
                }
                VariableKind::Float { low, high } => strata
                    .iter()
                    .map(|&s| {
                        let u = (s as f64 + rng.random::<f64>()) / n as f64;
                        MetricValue::Float(low + (high - low) * u)
                    })
                    .collect(),
            }
        })
        .collect();

    (0..n)
        .map(|i| columns.iter().map(|column| column[i].clone()).collect())
        .collect()
}
