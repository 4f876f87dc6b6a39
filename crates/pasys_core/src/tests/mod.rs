//! Integration tests for the trade-space engine
//!
//! Tests are organized by topic:
//! - `pipeline` - End-to-end single-case evaluation
//! - `sampling` - DOE sampling across the three methods
//! - `batch` - Batch runner ordering, determinism and failure isolation
//! - `pareto` - Frontier extraction over evaluated tables

mod pipeline;

use crate::metrics::MetricValue;
use crate::requirements::{ComparisonOp, Requirement, RequirementSet, Severity};
use crate::scenario::{IntegrationType, RadarDetectionScenario, Scenario};
use crate::trades::design_space::{DesignSpace, VariableKind};

pub(crate) fn x_band_radar() -> Scenario {
    Scenario::RadarDetection(RadarDetectionScenario {
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
    })
}

pub(crate) fn nx_power_space() -> DesignSpace {
    DesignSpace::new()
        .add_variable(
            "array.nx",
            VariableKind::Categorical {
                values: [8.0, 16.0, 32.0]
                    .iter()
                    .map(|&v| MetricValue::Float(v))
                    .collect(),
            },
        )
        .unwrap()
        .add_variable(
            "rf.tx_power_w_per_elem",
            VariableKind::Float { low: 1.0, high: 5.0 },
        )
        .unwrap()
}

pub(crate) fn margin_requirements() -> RequirementSet {
    RequirementSet::new(
        "detection",
        vec![
            Requirement {
                id: "REQ-001".into(),
                name: "snr margin".into(),
                metric_key: "snr_margin_db".into(),
                op: ComparisonOp::Ge,
                value: 0.0,
                severity: Severity::Must,
            },
            Requirement {
                id: "REQ-002".into(),
                name: "prime power".into(),
                metric_key: "prime_power_w".into(),
                op: ComparisonOp::Le,
                value: 50_000.0,
                severity: Severity::Should,
            },
        ],
    )
    .unwrap()
}
