//! End-to-end single-case evaluation.

use crate::architecture::{Architecture, ArrayConfig};
use crate::evaluate::evaluate_case;
use crate::scenario::{CommsLinkScenario, Scenario};

use super::{margin_requirements, x_band_radar};

#[test]
fn radar_case_with_verification() {
    let arch = Architecture {
        array: ArrayConfig {
            nx: 32,
            ny: 32,
            ..Default::default()
        },
        ..Default::default()
    };
    let metrics = evaluate_case(
        &arch,
        &x_band_radar(),
        Some(&margin_requirements()),
        Some("case_00000"),
    )
    .unwrap();

    // A 1 kW, 30+ dB gain array sees a 10 dBsm target at 20 km easily
    assert!(metrics.get_f64("snr_margin_db").unwrap() > 0.0);
    assert_eq!(metrics.get_f64("verification.passes"), Some(1.0));
    assert_eq!(metrics.get_text("verification.failed_ids"), Some(""));
    assert!(metrics.get_f64("detection_range_m").unwrap() > 20e3);
}

#[test]
fn gain_scales_with_aperture() {
    let small = evaluate_case(&Architecture::default(), &x_band_radar(), None, None).unwrap();

    let mut big_arch = Architecture::default();
    big_arch.array.nx = 16;
    big_arch.array.ny = 16;
    let big = evaluate_case(&big_arch, &x_band_radar(), None, None).unwrap();

    // 4x the elements: +6 dB directivity, +12 dB two-way in the margin,
    // plus 6 dB more transmit power
    let delta_gain =
        big.get_f64("g_peak_db").unwrap() - small.get_f64("g_peak_db").unwrap();
    assert!((delta_gain - 6.02).abs() < 0.01);

    let delta_snr = big.get_f64("snr_single_pulse_db").unwrap()
        - small.get_f64("snr_single_pulse_db").unwrap();
    assert!((delta_snr - 18.06).abs() < 0.05);
}

#[test]
fn comms_case_margin_closes_with_power() {
    let scenario = Scenario::CommsLink(CommsLinkScenario {
        freq_hz: 30e9,
        bandwidth_hz: 50e6,
        range_m: 1_000e3,
        required_snr_db: 6.0,
        rx_gain_db: 40.0,
        rx_noise_temp_k: 290.0,
        atmospheric_loss_db: 2.0,
    });

    let low = evaluate_case(&Architecture::default(), &scenario, None, None).unwrap();

    let mut hot = Architecture::default();
    hot.rf.tx_power_w_per_elem = 10.0;
    let high = evaluate_case(&hot, &scenario, None, None).unwrap();

    let delta = high.get_f64("link_margin_db").unwrap() - low.get_f64("link_margin_db").unwrap();
    assert!((delta - 10.0).abs() < 1e-9);
}

#[test]
fn every_model_contributes_to_the_record() {
    let metrics = evaluate_case(&Architecture::default(), &x_band_radar(), None, None).unwrap();

    // One representative key per model
    for key in [
        "directivity_db",  // antenna
        "prime_power_w",   // power
        "cost_usd",        // cost
        "snr_margin_db",   // radar
        "meta.runtime_s",  // pipeline bookkeeping
    ] {
        assert!(metrics.contains_key(key), "missing {key}");
    }
}
