//! Cascaded RF chain analysis: Friis noise figure, intercept points,
//! dynamic range.
//!
//! These are standalone utilities for sizing receiver and transmitter
//! chains; the evaluation pipeline does not call them.

use serde::{Deserialize, Serialize};

use crate::constants::{K_B, T_REF, db_to_linear, linear_to_db};
use crate::error::EvaluateError;
use crate::models::model_error;

/// One stage of an RF chain, in signal flow order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RfStage {
    pub name: String,
    /// Stage gain in dB (negative for loss)
    pub gain_db: f64,
    /// Stage noise figure in dB
    pub noise_figure_db: f64,
    /// Input third-order intercept in dBm; ideal stages use a large value
    #[serde(default = "default_ideal_dbm")]
    pub iip3_dbm: f64,
}

fn default_ideal_dbm() -> f64 {
    100.0
}

impl RfStage {
    pub fn new(name: impl Into<String>, gain_db: f64, noise_figure_db: f64) -> Self {
        Self {
            name: name.into(),
            gain_db,
            noise_figure_db,
            iip3_dbm: default_ideal_dbm(),
        }
    }

    #[must_use]
    pub fn with_iip3(mut self, iip3_dbm: f64) -> Self {
        self.iip3_dbm = iip3_dbm;
        self
    }

    /// Output IP3.
    #[must_use]
    pub fn oip3_dbm(&self) -> f64 {
        self.iip3_dbm + self.gain_db
    }
}

/// Convert noise figure to equivalent noise temperature: Te = T0*(F-1).
#[must_use]
pub fn noise_figure_to_temp_k(nf_db: f64) -> f64 {
    T_REF * (db_to_linear(nf_db) - 1.0)
}

/// Convert equivalent noise temperature to noise figure: F = 1 + Te/T0.
#[must_use]
pub fn noise_temp_to_figure_db(te_k: f64) -> f64 {
    linear_to_db(1.0 + te_k / T_REF)
}

/// Friis cascade result.
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseCascade {
    pub total_nf_db: f64,
    pub total_gain_db: f64,
    pub noise_temp_k: f64,
}

/// Cascaded noise figure over (gain_db, nf_db) stages:
/// F = F1 + (F2-1)/G1 + (F3-1)/(G1*G2) + ...
pub fn friis_noise_figure(stages: &[(f64, f64)]) -> Result<NoiseCascade, EvaluateError> {
    let Some(((g0, nf0), rest)) = stages.split_first() else {
        return Err(model_error("cascade", "at least one stage required"));
    };

    let mut f_total = db_to_linear(*nf0);
    let mut cumulative_gain = db_to_linear(*g0);

    for (gain_db, nf_db) in rest {
        f_total += (db_to_linear(*nf_db) - 1.0) / cumulative_gain;
        cumulative_gain *= db_to_linear(*gain_db);
    }

    let total_nf_db = linear_to_db(f_total);
    Ok(NoiseCascade {
        total_nf_db,
        total_gain_db: stages.iter().map(|(g, _)| g).sum(),
        noise_temp_k: noise_figure_to_temp_k(total_nf_db),
    })
}

/// Cascaded input IP3 over (gain_db, iip3_dbm) stages:
/// 1/IIP3 = 1/IIP3_1 + G1/IIP3_2 + G1*G2/IIP3_3 + ... (linear power).
pub fn cascade_iip3(stages: &[(f64, f64)]) -> Result<f64, EvaluateError> {
    let Some(((g0, iip3_0), rest)) = stages.split_first() else {
        return Err(model_error("cascade", "at least one stage required"));
    };

    let mut inv_iip3 = 1.0 / db_to_linear(*iip3_0);
    let mut cumulative_gain = db_to_linear(*g0);

    for (gain_db, iip3_dbm) in rest {
        inv_iip3 += cumulative_gain / db_to_linear(*iip3_dbm);
        cumulative_gain *= db_to_linear(*gain_db);
    }

    Ok(linear_to_db(1.0 / inv_iip3))
}

/// Spurious-free dynamic range: (2/3)*(IIP3 - integrated noise floor).
#[must_use]
pub fn sfdr_db(iip3_dbm: f64, noise_floor_dbm_hz: f64, bandwidth_hz: f64) -> f64 {
    let noise_floor_dbm = noise_floor_dbm_hz + 10.0 * bandwidth_hz.log10();
    (2.0 / 3.0) * (iip3_dbm - noise_floor_dbm)
}

/// Minimum detectable signal: kTB + NF + required SNR, in dBm.
#[must_use]
pub fn mds_dbm(noise_figure_db: f64, bandwidth_hz: f64, snr_required_db: f64) -> f64 {
    let kt_dbm_hz = linear_to_db(K_B * T_REF * 1000.0);
    kt_dbm_hz + 10.0 * bandwidth_hz.log10() + noise_figure_db + snr_required_db
}

/// Full cascade summary for a receiver or transmitter chain.
#[derive(Debug, Clone, PartialEq)]
pub struct CascadeAnalysis {
    pub total_gain_db: f64,
    pub total_nf_db: f64,
    pub noise_temp_k: f64,
    pub iip3_dbm: f64,
    pub oip3_dbm: f64,
    pub sfdr_db: f64,
    pub mds_dbm: f64,
}

/// Analyze a complete chain: noise, linearity and dynamic range at the
/// given bandwidth.
pub fn cascade_analysis(
    stages: &[RfStage],
    bandwidth_hz: f64,
) -> Result<CascadeAnalysis, EvaluateError> {
    if bandwidth_hz <= 0.0 {
        return Err(model_error("cascade", "bandwidth must be positive"));
    }

    let nf_stages: Vec<(f64, f64)> = stages
        .iter()
        .map(|s| (s.gain_db, s.noise_figure_db))
        .collect();
    let iip3_stages: Vec<(f64, f64)> =
        stages.iter().map(|s| (s.gain_db, s.iip3_dbm)).collect();

    let noise = friis_noise_figure(&nf_stages)?;
    let iip3_dbm = cascade_iip3(&iip3_stages)?;

    let kt_dbm_hz = linear_to_db(K_B * T_REF * 1000.0);
    let noise_floor_dbm_hz = kt_dbm_hz + noise.total_nf_db;

    Ok(CascadeAnalysis {
        total_gain_db: noise.total_gain_db,
        total_nf_db: noise.total_nf_db,
        noise_temp_k: noise.noise_temp_k,
        iip3_dbm,
        oip3_dbm: iip3_dbm + noise.total_gain_db,
        sfdr_db: sfdr_db(iip3_dbm, noise_floor_dbm_hz, bandwidth_hz),
        mds_dbm: mds_dbm(noise.total_nf_db, bandwidth_hz, 0.0),
    })
}
