//! Single-case evaluation pipeline.
//!
//! Runs the metric models in a fixed order (antenna, power, cost, then
//! exactly one scenario model), merging each model's output into one
//! record. The record accumulated so far is the context for the next
//! model, which is how antenna gain reaches the link and radar models.
//! Requirements are verified last and their results injected under
//! `verification.*`; wall time lands in `meta.runtime_s`.

use std::time::Instant;

use crate::architecture::Architecture;
use crate::error::EvaluateError;
use crate::metrics::MetricsRecord;
use crate::models::{antenna, comms, radar, swapc};
use crate::requirements::RequirementSet;
use crate::scenario::Scenario;

/// Evaluate one architecture against one scenario.
///
/// Model errors and metric-key conflicts propagate to the caller; the
/// batch runner is the layer that catches them per case.
pub fn evaluate_case(
    arch: &Architecture,
    scenario: &Scenario,
    requirements: Option<&RequirementSet>,
    case_id: Option<&str>,
) -> Result<MetricsRecord, EvaluateError> {
    let start = Instant::now();
    let mut metrics = MetricsRecord::new();

    if let Some(id) = case_id {
        metrics.insert("meta.case_id", id)?;
    }

    metrics.merge(antenna::evaluate(arch, scenario)?)?;
    metrics.merge(swapc::evaluate_power(arch)?)?;
    metrics.merge(swapc::evaluate_cost(arch)?)?;

    match scenario {
        Scenario::CommsLink(s) => {
            let output = comms::evaluate(arch, s, &metrics)?;
            metrics.merge(output)?;
        }
        Scenario::RadarDetection(s) => {
            let output = radar::evaluate(arch, s, &metrics)?;
            metrics.merge(output)?;
        }
    }

    if let Some(requirements) = requirements
        && !requirements.is_empty()
    {
        let report = requirements.verify(&metrics);
        metrics.insert("verification.passes", if report.passes { 1.0 } else { 0.0 })?;
        metrics.insert(
            "verification.must_pass_count",
            report.must_pass_count as f64,
        )?;
        metrics.insert(
            "verification.must_total_count",
            report.must_total_count as f64,
        )?;
        metrics.insert("verification.failed_ids", report.failed_ids.join(","))?;
    }

    metrics.insert("meta.runtime_s", start.elapsed().as_secs_f64())?;
    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirements::{ComparisonOp, Requirement, Severity};
    use crate::scenario::{CommsLinkScenario, IntegrationType, RadarDetectionScenario};

    fn radar_scenario() -> Scenario {
        Scenario::RadarDetection(RadarDetectionScenario {
            freq_hz: 10e9,
            bandwidth_hz: 1e6,
            range_m: 20e3,
            target_rcs_dbsm: 10.0,
            rx_noise_temp_k: 290.0,
            pfa: 1e-6,
            pd_required: 0.9,
            n_pulses: 16,
            scan_angle_deg: 20.0,
            integration: IntegrationType::Noncoherent,
        })
    }

    fn comms_scenario() -> Scenario {
        Scenario::CommsLink(CommsLinkScenario {
            freq_hz: 10e9,
            bandwidth_hz: 10e6,
            range_m: 100e3,
            required_snr_db: 10.0,
            rx_gain_db: 20.0,
            rx_noise_temp_k: 290.0,
            atmospheric_loss_db: 0.5,
        })
    }

    #[test]
    fn radar_pipeline_produces_full_record() {
        let metrics = evaluate_case(
            &Architecture::default(),
            &radar_scenario(),
            None,
            Some("case_00000"),
        )
        .unwrap();

        assert_eq!(metrics.get_text("meta.case_id"), Some("case_00000"));
        for key in [
            "g_peak_db",
            "scan_loss_db",
            "prime_power_w",
            "cost_usd",
            "snr_margin_db",
            "detection_range_m",
            "meta.runtime_s",
        ] {
            assert!(metrics.contains_key(key), "missing {key}");
        }
        // No verification keys without requirements
        assert!(!metrics.contains_key("verification.passes"));
    }

    #[test]
    fn comms_pipeline_produces_link_budget() {
        let metrics =
            evaluate_case(&Architecture::default(), &comms_scenario(), None, None).unwrap();
        for key in ["eirp_dbw", "path_loss_db", "snr_rx_db", "link_margin_db"] {
            assert!(metrics.contains_key(key), "missing {key}");
        }
        assert!(!metrics.contains_key("meta.case_id"));
    }

    #[test]
    fn antenna_gain_reaches_radar_model() {
        let metrics =
            evaluate_case(&Architecture::default(), &radar_scenario(), None, None).unwrap();
        let g_peak = metrics.get_f64("g_peak_db").unwrap();
        let scan_loss = metrics.get_f64("scan_loss_db").unwrap();
        let g_ant = metrics.get_f64("g_ant_db").unwrap();
        assert!((g_ant - (g_peak - scan_loss)).abs() < 1e-12);
    }

    #[test]
    fn verification_keys_injected() {
        let requirements = RequirementSet::new(
            "radar",
            vec![
                Requirement {
                    id: "REQ-001".into(),
                    name: "positive margin".into(),
                    metric_key: "snr_margin_db".into(),
                    op: ComparisonOp::Ge,
                    value: 0.0,
                    severity: Severity::Must,
                },
                Requirement {
                    id: "REQ-002".into(),
                    name: "impossible cost".into(),
                    metric_key: "cost_usd".into(),
                    op: ComparisonOp::Le,
                    value: 1.0,
                    severity: Severity::Must,
                },
            ],
        )
        .unwrap();

        let metrics = evaluate_case(
            &Architecture::default(),
            &radar_scenario(),
            Some(&requirements),
            None,
        )
        .unwrap();

        assert_eq!(metrics.get_f64("verification.passes"), Some(0.0));
        assert_eq!(metrics.get_f64("verification.must_total_count"), Some(2.0));
        let failed = metrics.get_text("verification.failed_ids").unwrap();
        assert!(failed.contains("REQ-002"));
    }

    #[test]
    fn runtime_recorded_last() {
        let metrics =
            evaluate_case(&Architecture::default(), &radar_scenario(), None, None).unwrap();
        assert_eq!(metrics.keys().last(), Some("meta.runtime_s"));
        assert!(metrics.get_f64("meta.runtime_s").unwrap() >= 0.0);
    }
}
