//! SWaP-C models: power draw and cost rollups.

use crate::architecture::Architecture;
use crate::error::EvaluateError;
use crate::models::{ModelOutput, model_error};

/// Power budget: radiated RF, DC into the amplifiers, prime power at
/// the supply input.
pub fn evaluate_power(arch: &Architecture) -> Result<ModelOutput, EvaluateError> {
    let n_elements = f64::from(arch.array.n_elements());
    let rf = &arch.rf;

    if rf.pa_efficiency <= 0.0 || rf.psu_efficiency <= 0.0 {
        return Err(model_error("power", "efficiencies must be positive"));
    }

    let rf_power_w = rf.tx_power_w_per_elem * n_elements;
    let dc_power_w = rf_power_w / rf.pa_efficiency;
    let prime_power_w = dc_power_w / rf.psu_efficiency;

    Ok(vec![
        ("rf_power_w".into(), rf_power_w.into()),
        ("dc_power_w".into(), dc_power_w.into()),
        ("prime_power_w".into(), prime_power_w.into()),
    ])
}

/// Cost rollup: per-element recurring cost plus fixed NRE and
/// integration cost.
pub fn evaluate_cost(arch: &Architecture) -> Result<ModelOutput, EvaluateError> {
    let n_elements = f64::from(arch.array.n_elements());
    let cost = &arch.cost;

    let recurring_cost_usd = cost.cost_per_elem_usd * n_elements;
    let cost_usd = recurring_cost_usd + cost.nre_usd + cost.integration_cost_usd;

    Ok(vec![
        ("recurring_cost_usd".into(), recurring_cost_usd.into()),
        ("cost_usd".into(), cost_usd.into()),
    ])
}
