//! Analytical antenna metrics for a uniform rectangular array.
//!
//! Runs first in the pipeline so downstream link and radar models can
//! read `g_peak_db` and `scan_loss_db` from context.

use std::f64::consts::PI;

use crate::architecture::Architecture;
use crate::error::EvaluateError;
use crate::models::{ModelOutput, model_error};
use crate::scenario::Scenario;

/// Uniform-taper first sidelobe level relative to the main beam (dB).
const UNIFORM_TAPER_SLL_DB: f64 = -13.26;

/// Broadside 3 dB beamwidth factor for a uniform line aperture.
const BEAMWIDTH_FACTOR: f64 = 0.886;

/// Directivity estimate for a uniform rectangular aperture, in dB.
///
/// D = 4*pi*A/lambda^2 = 4*pi*(nx*dx)*(ny*dy) with spacing in wavelengths.
#[must_use]
pub fn directivity_rectangular_db(nx: u32, ny: u32, dx_lambda: f64, dy_lambda: f64) -> f64 {
    let lx = f64::from(nx) * dx_lambda;
    let ly = f64::from(ny) * dy_lambda;
    10.0 * (4.0 * PI * lx * ly).log10()
}

/// Cosine-model scan loss at an angle from boresight, in dB (positive).
/// Infinite at and beyond 90 degrees.
#[must_use]
pub fn scan_loss_db(scan_angle_deg: f64) -> f64 {
    if scan_angle_deg >= 90.0 {
        return f64::INFINITY;
    }
    let loss_linear = scan_angle_deg.to_radians().cos();
    if loss_linear <= 0.0 {
        return f64::INFINITY;
    }
    let loss_db = -10.0 * loss_linear.log10();
    // Avoid -0.0 at boresight
    if loss_db.abs() < 1e-10 { 0.0 } else { loss_db }
}

/// Ideal array gain: element gain plus 10*log10(n).
pub fn array_gain_db(n_elements: u32, element_gain_db: f64) -> Result<f64, EvaluateError> {
    if n_elements < 1 {
        return Err(model_error("antenna", "n_elements must be >= 1"));
    }
    Ok(element_gain_db + 10.0 * f64::from(n_elements).log10())
}

/// Broadside 3 dB beamwidth for a line aperture of `n * d` wavelengths,
/// in degrees.
#[must_use]
pub fn beamwidth_broadside_deg(n: u32, d_lambda: f64) -> f64 {
    let length_lambda = f64::from(n) * d_lambda;
    (BEAMWIDTH_FACTOR / length_lambda).to_degrees()
}

/// Evaluate antenna metrics for an architecture in a scenario.
///
/// Emits `n_elements`, `directivity_db`, `g_peak_db`, per-axis
/// beamwidths, `sll_db` and `scan_loss_db`.
pub fn evaluate(arch: &Architecture, scenario: &Scenario) -> Result<ModelOutput, EvaluateError> {
    let array = &arch.array;
    let n_elements = array.n_elements();

    let directivity_db =
        directivity_rectangular_db(array.nx, array.ny, array.dx_lambda, array.dy_lambda);
    let g_peak_db = directivity_db + array.element_gain_db - arch.rf.feed_loss_db;

    let scan_loss = scan_loss_db(scenario.scan_angle_deg());
    if scan_loss.is_infinite() {
        return Err(model_error(
            "antenna",
            format!(
                "scan angle {} deg is at or beyond the horizon",
                scenario.scan_angle_deg()
            ),
        ));
    }

    Ok(vec![
        ("n_elements".into(), f64::from(n_elements).into()),
        ("directivity_db".into(), directivity_db.into()),
        ("g_peak_db".into(), g_peak_db.into()),
        (
            "beamwidth_az_deg".into(),
            beamwidth_broadside_deg(array.nx, array.dx_lambda).into(),
        ),
        (
            "beamwidth_el_deg".into(),
            beamwidth_broadside_deg(array.ny, array.dy_lambda).into(),
        ),
        ("sll_db".into(), UNIFORM_TAPER_SLL_DB.into()),
        ("scan_loss_db".into(), scan_loss.into()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{RadarDetectionScenario, IntegrationType};

    fn radar_at(scan_angle_deg: f64) -> Scenario {
        Scenario::RadarDetection(RadarDetectionScenario {
            freq_hz: 10e9,
            bandwidth_hz: 1e6,
            range_m: 20e3,
            target_rcs_dbsm: 0.0,
            rx_noise_temp_k: 290.0,
            pfa: 1e-6,
            pd_required: 0.9,
            n_pulses: 1,
            scan_angle_deg,
            integration: IntegrationType::Noncoherent,
        })
    }

    #[test]
    fn directivity_8x8_half_wavelength() {
        // 4*pi*4*4 = 201.06 -> 23.03 dB
        let d = directivity_rectangular_db(8, 8, 0.5, 0.5);
        assert!((d - 23.03).abs() < 0.01);
    }

    #[test]
    fn scan_loss_boresight_is_zero() {
        assert_eq!(scan_loss_db(0.0), 0.0);
    }

    #[test]
    fn scan_loss_60_degrees() {
        // cos(60) = 0.5 -> 3.01 dB
        assert!((scan_loss_db(60.0) - 3.0103).abs() < 1e-3);
    }

    #[test]
    fn scan_at_horizon_is_model_error() {
        let err = evaluate(&Architecture::default(), &radar_at(90.0)).unwrap_err();
        assert!(matches!(err, EvaluateError::Model { model: "antenna", .. }));
    }

    #[test]
    fn beamwidth_shrinks_with_aperture() {
        assert!(beamwidth_broadside_deg(32, 0.5) < beamwidth_broadside_deg(8, 0.5));
        // 16 * 0.5 lambda aperture: 0.886/8 rad = 6.35 deg
        assert!((beamwidth_broadside_deg(16, 0.5) - 6.345).abs() < 0.01);
    }

    #[test]
    fn gain_includes_element_and_feed_terms() {
        let mut arch = Architecture::default();
        arch.array.element_gain_db = 5.0;
        arch.rf.feed_loss_db = 2.0;
        let out = evaluate(&arch, &radar_at(0.0)).unwrap();
        let g = out
            .iter()
            .find(|(k, _)| k == "g_peak_db")
            .and_then(|(_, v)| v.as_f64())
            .unwrap();
        let d = directivity_rectangular_db(8, 8, 0.5, 0.5);
        assert!((g - (d + 5.0 - 2.0)).abs() < 1e-12);
    }
}
