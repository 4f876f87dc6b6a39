//! Monostatic radar detection model.
//!
//! Evaluates the radar range equation in dB form, applies pulse
//! integration gain, compares against the Albersheim required SNR and
//! estimates achieved probability of detection for a non-fluctuating
//! target. Antenna gain comes from pipeline context (`g_peak_db` less
//! `scan_loss_db`) with an aperture-approximation fallback when the
//! model runs standalone.

use std::f64::consts::PI;

use crate::architecture::Architecture;
use crate::constants::{K_B, w_to_dbw, wavelength_m};
use crate::error::EvaluateError;
use crate::metrics::MetricsRecord;
use crate::models::{ModelOutput, model_error};
use crate::scenario::{IntegrationType, RadarDetectionScenario};

/// Complementary error function, Abramowitz & Stegun 7.1.26 rational
/// approximation (|error| < 1.5e-7).
#[must_use]
pub fn erfc(x: f64) -> f64 {
    const P: f64 = 0.327_591_1;
    const A1: f64 = 0.254_829_592;
    const A2: f64 = -0.284_496_736;
    const A3: f64 = 1.421_413_741;
    const A4: f64 = -1.453_152_027;
    const A5: f64 = 1.061_405_429;

    let ax = x.abs();
    let t = 1.0 / (1.0 + P * ax);
    let poly = t * (A1 + t * (A2 + t * (A3 + t * (A4 + t * A5))));
    let erfc_pos = poly * (-ax * ax).exp();

    if x >= 0.0 { erfc_pos } else { 2.0 - erfc_pos }
}

/// Normalized detection threshold for a single-sample square-law
/// detector at the given false-alarm probability: -ln(pfa).
pub fn detection_threshold(pfa: f64) -> Result<f64, EvaluateError> {
    if !(pfa > 0.0 && pfa < 1.0) {
        return Err(model_error("radar", "pfa must be in (0, 1)"));
    }
    Ok(-pfa.ln())
}

/// Probability of detection for a non-fluctuating target at a given
/// integrated SNR, using the Gaussian approximation to the Marcum Q
/// function: Pd = 0.5 * erfc((b - a) / sqrt(2)) with a = sqrt(2*SNR),
/// b = sqrt(2*threshold).
pub fn pd_from_snr(snr_db: f64, pfa: f64) -> Result<f64, EvaluateError> {
    let threshold = detection_threshold(pfa)?;
    let snr_linear = 10f64.powf(snr_db / 10.0);

    let a = (2.0 * snr_linear).sqrt();
    let b = (2.0 * threshold).sqrt();
    let pd = 0.5 * erfc((b - a) / std::f64::consts::SQRT_2);
    Ok(pd.clamp(0.0, 1.0))
}

/// Albersheim's equation: required SNR in dB for the given Pd/Pfa with
/// n-pulse non-coherent integration. Valid roughly for Pd in
/// [0.1, 0.9999] and Pfa in [1e-10, 0.1].
pub fn albersheim_snr(pd: f64, pfa: f64, n_pulses: u32) -> Result<f64, EvaluateError> {
    if !(0.1..=0.9999).contains(&pd) {
        return Err(model_error("radar", "pd out of Albersheim validity range"));
    }
    if !(1e-10..=0.1).contains(&pfa) {
        return Err(model_error("radar", "pfa out of Albersheim validity range"));
    }
    if n_pulses < 1 {
        return Err(model_error("radar", "n_pulses must be >= 1"));
    }

    let n = f64::from(n_pulses);
    let a = (0.62 / pfa).ln();
    let b = (pd / (1.0 - pd)).ln();

    Ok(-5.0 * n.log10()
        + (6.2 + 4.54 / (n + 0.44).sqrt()) * (a + 0.12 * a * b + 1.7 * b).log10())
}

/// Coherent integration gain: full 10*log10(n).
pub fn coherent_integration_gain(n_pulses: u32) -> Result<f64, EvaluateError> {
    if n_pulses < 1 {
        return Err(model_error("radar", "n_pulses must be >= 1"));
    }
    if n_pulses == 1 {
        return Ok(0.0);
    }
    Ok(10.0 * f64::from(n_pulses).log10())
}

/// Non-coherent integration gain: 10*eta*log10(n) with an efficiency
/// exponent that drops as the operating Pd rises.
pub fn noncoherent_integration_gain(n_pulses: u32, pd: f64) -> Result<f64, EvaluateError> {
    if n_pulses < 1 {
        return Err(model_error("radar", "n_pulses must be >= 1"));
    }
    if n_pulses == 1 {
        return Ok(0.0);
    }

    let efficiency = if pd >= 0.99 {
        0.7
    } else if pd >= 0.9 {
        0.8
    } else if pd >= 0.5 {
        0.85
    } else {
        0.9
    };

    Ok(10.0 * efficiency * f64::from(n_pulses).log10())
}

/// Evaluate radar detection performance.
pub fn evaluate(
    arch: &Architecture,
    scenario: &RadarDetectionScenario,
    context: &MetricsRecord,
) -> Result<ModelOutput, EvaluateError> {
    // Antenna gain from the pipeline, or the aperture approximation
    let g_ant_db = match context.get_f64("g_peak_db") {
        Some(g) => g - context.get_f64("scan_loss_db").unwrap_or(0.0),
        None => {
            let aperture = arch.array.aperture_lambda_sq();
            10.0 * (4.0 * PI * aperture).log10()
        }
    };

    let n_elements = f64::from(arch.array.n_elements());
    let peak_power_w = arch.rf.tx_power_w_per_elem * n_elements;
    let peak_power_dbw = w_to_dbw(peak_power_w);

    let lambda = wavelength_m(scenario.freq_hz);
    let wavelength_db = 10.0 * lambda.log10();

    let system_loss_db = arch.rf.feed_loss_db + arch.rf.system_loss_db;

    let rcs_dbsm = scenario.target_rcs_dbsm;
    let range_db = 10.0 * scenario.range_m.log10();

    let noise_power_w = K_B * scenario.rx_noise_temp_k * scenario.bandwidth_hz;
    let noise_power_dbw = w_to_dbw(noise_power_w) + arch.rf.noise_figure_db;

    // (4*pi)^3 in dB, about 32.98
    let radar_constant_db = 30.0 * (4.0 * PI).log10();

    let snr_single_db = peak_power_dbw + 2.0 * g_ant_db + 2.0 * wavelength_db + rcs_dbsm
        - 4.0 * range_db
        - system_loss_db
        - radar_constant_db
        - noise_power_dbw;

    let integration_gain_db = match scenario.integration {
        IntegrationType::Coherent => coherent_integration_gain(scenario.n_pulses)?,
        IntegrationType::Noncoherent => {
            noncoherent_integration_gain(scenario.n_pulses, scenario.pd_required)?
        }
    };
    let snr_integrated_db = snr_single_db + integration_gain_db;

    // Integration gain already applied, so require the 1-pulse SNR
    let snr_required_db = albersheim_snr(scenario.pd_required, scenario.pfa, 1)?;
    let snr_margin_db = snr_integrated_db - snr_required_db;

    let pd_achieved = pd_from_snr(snr_integrated_db, scenario.pfa)?;

    // R^4 scaling: the zero-margin range is R * 10^(margin/40)
    let detection_range_m = if snr_margin_db > -40.0 {
        scenario.range_m * 10f64.powf(snr_margin_db / 40.0)
    } else {
        0.0
    };

    Ok(vec![
        ("peak_power_w".into(), peak_power_w.into()),
        ("peak_power_dbw".into(), peak_power_dbw.into()),
        ("g_ant_db".into(), g_ant_db.into()),
        ("wavelength_m".into(), lambda.into()),
        ("target_rcs_dbsm".into(), rcs_dbsm.into()),
        ("target_rcs_m2".into(), scenario.target_rcs_m2().into()),
        ("range_m".into(), scenario.range_m.into()),
        ("noise_power_dbw".into(), noise_power_dbw.into()),
        ("system_loss_db".into(), system_loss_db.into()),
        ("snr_single_pulse_db".into(), snr_single_db.into()),
        ("integration_gain_db".into(), integration_gain_db.into()),
        ("snr_integrated_db".into(), snr_integrated_db.into()),
        ("snr_required_db".into(), snr_required_db.into()),
        ("snr_margin_db".into(), snr_margin_db.into()),
        ("pd_achieved".into(), pd_achieved.into()),
        ("pd_required".into(), scenario.pd_required.into()),
        ("pfa".into(), scenario.pfa.into()),
        ("n_pulses".into(), f64::from(scenario.n_pulses).into()),
        (
            "integration_type".into(),
            scenario.integration.as_str().into(),
        ),
        ("detection_range_m".into(), detection_range_m.into()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> RadarDetectionScenario {
        RadarDetectionScenario {
            freq_hz: 10e9,
            bandwidth_hz: 1e6,
            range_m: 20e3,
            target_rcs_dbsm: 10.0,
            rx_noise_temp_k: 290.0,
            pfa: 1e-6,
            pd_required: 0.9,
            n_pulses: 16,
            scan_angle_deg: 0.0,
            integration: IntegrationType::Noncoherent,
        }
    }

    fn get(out: &ModelOutput, key: &str) -> f64 {
        out.iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_f64())
            .unwrap()
    }

    #[test]
    fn erfc_reference_points() {
        assert!((erfc(0.0) - 1.0).abs() < 1e-7);
        assert!((erfc(1.0) - 0.157_299_2).abs() < 1e-6);
        assert!((erfc(-1.0) - 1.842_700_8).abs() < 1e-6);
        assert!(erfc(5.0) < 2e-12);
    }

    #[test]
    fn albersheim_single_pulse_reference() {
        // Pd=0.9, Pfa=1e-6, n=1 is about 13.1 dB
        let snr = albersheim_snr(0.9, 1e-6, 1).unwrap();
        assert!((snr - 13.1).abs() < 0.2);
    }

    #[test]
    fn albersheim_rejects_out_of_range_pd() {
        assert!(albersheim_snr(0.05, 1e-6, 1).is_err());
    }

    #[test]
    fn integration_gains() {
        assert_eq!(coherent_integration_gain(1).unwrap(), 0.0);
        assert!((coherent_integration_gain(10).unwrap() - 10.0).abs() < 1e-12);
        // Pd=0.9 tier: 10*0.8*log10(16) = 9.63 dB
        let g = noncoherent_integration_gain(16, 0.9).unwrap();
        assert!((g - 9.633).abs() < 1e-3);
        // Noncoherent never beats coherent
        assert!(g < coherent_integration_gain(16).unwrap());
    }

    #[test]
    fn pd_monotonic_in_snr() {
        let lo = pd_from_snr(5.0, 1e-6).unwrap();
        let hi = pd_from_snr(15.0, 1e-6).unwrap();
        assert!(hi > lo);
        assert!((0.0..=1.0).contains(&lo));
        assert!((0.0..=1.0).contains(&hi));
        // Well above threshold the detector saturates
        assert!(pd_from_snr(30.0, 1e-6).unwrap() > 0.999);
    }

    #[test]
    fn context_gain_flows_through() {
        let mut context = MetricsRecord::new();
        context.insert("g_peak_db", 30.0).unwrap();
        let out = evaluate(&Architecture::default(), &scenario(), &context).unwrap();
        assert!((get(&out, "g_ant_db") - 30.0).abs() < 1e-12);

        context.insert("scan_loss_db", 2.0).unwrap();
        let out = evaluate(&Architecture::default(), &scenario(), &context).unwrap();
        assert!((get(&out, "g_ant_db") - 28.0).abs() < 1e-12);
    }

    #[test]
    fn detection_range_scales_with_margin() {
        let out = evaluate(&Architecture::default(), &scenario(), &MetricsRecord::new()).unwrap();
        let margin = get(&out, "snr_margin_db");
        let expected = 20e3 * 10f64.powf(margin / 40.0);
        assert!((get(&out, "detection_range_m") - expected).abs() < 1e-6);
    }

    #[test]
    fn integrated_snr_adds_gain() {
        let out = evaluate(&Architecture::default(), &scenario(), &MetricsRecord::new()).unwrap();
        let single = get(&out, "snr_single_pulse_db");
        let gain = get(&out, "integration_gain_db");
        assert!((get(&out, "snr_integrated_db") - (single + gain)).abs() < 1e-12);
    }
}
