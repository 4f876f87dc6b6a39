//! One-way communications link budget.

use std::f64::consts::PI;

use crate::architecture::Architecture;
use crate::constants::{K_B, w_to_dbw, wavelength_m};
use crate::error::EvaluateError;
use crate::metrics::MetricsRecord;
use crate::models::{ModelOutput, model_error};
use crate::scenario::CommsLinkScenario;

/// Free-space path loss in dB.
pub fn free_space_path_loss_db(range_m: f64, freq_hz: f64) -> Result<f64, EvaluateError> {
    if range_m <= 0.0 || freq_hz <= 0.0 {
        return Err(model_error("comms", "range and frequency must be positive"));
    }
    let lambda = wavelength_m(freq_hz);
    Ok(20.0 * (4.0 * PI * range_m / lambda).log10())
}

/// Evaluate the link budget. Reads `g_peak_db` from context when the
/// antenna model ran first; otherwise falls back to the aperture
/// approximation.
pub fn evaluate(
    arch: &Architecture,
    scenario: &CommsLinkScenario,
    context: &MetricsRecord,
) -> Result<ModelOutput, EvaluateError> {
    let g_tx_db = match context.get_f64("g_peak_db") {
        Some(g) => g,
        None => {
            let aperture = arch.array.aperture_lambda_sq();
            10.0 * (4.0 * PI * aperture).log10() - arch.rf.feed_loss_db
        }
    };

    let tx_power_w = arch.rf.tx_power_w_per_elem * f64::from(arch.array.n_elements());
    let tx_power_dbw = w_to_dbw(tx_power_w);
    let eirp_dbw = tx_power_dbw + g_tx_db;

    let path_loss_db = free_space_path_loss_db(scenario.range_m, scenario.freq_hz)?;

    let rx_power_dbw =
        eirp_dbw - path_loss_db - scenario.atmospheric_loss_db + scenario.rx_gain_db;

    // Noise floor at the receiver: kTB plus this architecture's NF
    let noise_power_w = K_B * scenario.rx_noise_temp_k * scenario.bandwidth_hz;
    let noise_power_dbw = w_to_dbw(noise_power_w) + arch.rf.noise_figure_db;

    let snr_rx_db = rx_power_dbw - noise_power_dbw;
    let link_margin_db = snr_rx_db - scenario.required_snr_db;

    Ok(vec![
        ("tx_power_w".into(), tx_power_w.into()),
        ("tx_power_dbw".into(), tx_power_dbw.into()),
        ("eirp_dbw".into(), eirp_dbw.into()),
        ("path_loss_db".into(), path_loss_db.into()),
        ("rx_power_dbw".into(), rx_power_dbw.into()),
        ("noise_power_dbw".into(), noise_power_dbw.into()),
        ("snr_rx_db".into(), snr_rx_db.into()),
        ("required_snr_db".into(), scenario.required_snr_db.into()),
        ("link_margin_db".into(), link_margin_db.into()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> CommsLinkScenario {
        CommsLinkScenario {
            freq_hz: 10e9,
            bandwidth_hz: 10e6,
            range_m: 100e3,
            required_snr_db: 10.0,
            rx_gain_db: 20.0,
            rx_noise_temp_k: 290.0,
            atmospheric_loss_db: 1.0,
        }
    }

    #[test]
    fn fspl_reference_value() {
        // 100 km at 10 GHz: 32.45 + 20log10(100) + 20log10(10000) = 152.45 dB
        let loss = free_space_path_loss_db(100e3, 10e9).unwrap();
        assert!((loss - 152.44).abs() < 0.02);
    }

    #[test]
    fn fspl_rejects_nonpositive_range() {
        assert!(free_space_path_loss_db(0.0, 10e9).is_err());
    }

    #[test]
    fn uses_context_gain_when_present() {
        let mut context = MetricsRecord::new();
        context.insert("g_peak_db", 30.0).unwrap();
        let out = evaluate(&Architecture::default(), &scenario(), &context).unwrap();
        let get = |k: &str| {
            out.iter()
                .find(|(key, _)| key == k)
                .and_then(|(_, v)| v.as_f64())
                .unwrap()
        };
        // EIRP = 10log10(64 W) + 30 dB
        assert!((get("eirp_dbw") - (w_to_dbw(64.0) + 30.0)).abs() < 1e-9);
    }

    #[test]
    fn margin_is_snr_minus_required() {
        let out = evaluate(&Architecture::default(), &scenario(), &MetricsRecord::new()).unwrap();
        let get = |k: &str| {
            out.iter()
                .find(|(key, _)| key == k)
                .and_then(|(_, v)| v.as_f64())
                .unwrap()
        };
        assert!((get("link_margin_db") - (get("snr_rx_db") - 10.0)).abs() < 1e-12);
    }
}
