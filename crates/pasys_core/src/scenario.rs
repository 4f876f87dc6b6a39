//! Mission scenarios: the operating conditions a design is evaluated
//! against.
//!
//! A scenario is one of two mutually exclusive variants. The evaluation
//! pipeline dispatches on the variant tag to pick the scenario-specific
//! model; this is a closed set, not an open extension point.

use serde::{Deserialize, Serialize};

use crate::constants::{C_LIGHT, db_to_linear};
use crate::error::ConfigError;

/// Pulse integration type for radar scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationType {
    Coherent,
    Noncoherent,
}

impl IntegrationType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            IntegrationType::Coherent => "coherent",
            IntegrationType::Noncoherent => "noncoherent",
        }
    }
}

/// One-way communications link scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommsLinkScenario {
    /// Operating frequency (Hz)
    pub freq_hz: f64,
    /// Signal bandwidth (Hz)
    pub bandwidth_hz: f64,
    /// Link distance (m)
    pub range_m: f64,
    /// SNR required for demodulation (dB)
    pub required_snr_db: f64,
    /// Receive antenna gain at the far end (dBi)
    #[serde(default)]
    pub rx_gain_db: f64,
    /// Receive system noise temperature (K)
    #[serde(default = "default_noise_temp")]
    pub rx_noise_temp_k: f64,
    /// Atmospheric/propagation loss beyond free space (dB)
    #[serde(default)]
    pub atmospheric_loss_db: f64,
}

/// Monostatic radar detection scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarDetectionScenario {
    /// Operating frequency (Hz)
    pub freq_hz: f64,
    /// Signal bandwidth (Hz)
    pub bandwidth_hz: f64,
    /// Target range (m)
    pub range_m: f64,
    /// Target radar cross section (dBsm)
    pub target_rcs_dbsm: f64,
    /// Receiver noise temperature (K)
    #[serde(default = "default_noise_temp")]
    pub rx_noise_temp_k: f64,
    /// Probability of false alarm
    #[serde(default = "default_pfa")]
    pub pfa: f64,
    /// Required probability of detection
    #[serde(default = "default_pd")]
    pub pd_required: f64,
    /// Number of pulses integrated
    #[serde(default = "default_n_pulses")]
    pub n_pulses: u32,
    /// Beam scan angle from boresight (degrees)
    #[serde(default)]
    pub scan_angle_deg: f64,
    /// Integration type
    #[serde(default = "default_integration")]
    pub integration: IntegrationType,
}

fn default_noise_temp() -> f64 {
    290.0
}

fn default_pfa() -> f64 {
    1e-6
}

fn default_pd() -> f64 {
    0.9
}

fn default_n_pulses() -> u32 {
    1
}

fn default_integration() -> IntegrationType {
    IntegrationType::Noncoherent
}

impl RadarDetectionScenario {
    /// Target RCS in square meters.
    #[must_use]
    pub fn target_rcs_m2(&self) -> f64 {
        db_to_linear(self.target_rcs_dbsm)
    }
}

/// The scenario a case is evaluated against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scenario {
    CommsLink(CommsLinkScenario),
    RadarDetection(RadarDetectionScenario),
}

impl Scenario {
    #[must_use]
    pub fn freq_hz(&self) -> f64 {
        match self {
            Scenario::CommsLink(s) => s.freq_hz,
            Scenario::RadarDetection(s) => s.freq_hz,
        }
    }

    #[must_use]
    pub fn bandwidth_hz(&self) -> f64 {
        match self {
            Scenario::CommsLink(s) => s.bandwidth_hz,
            Scenario::RadarDetection(s) => s.bandwidth_hz,
        }
    }

    #[must_use]
    pub fn range_m(&self) -> f64 {
        match self {
            Scenario::CommsLink(s) => s.range_m,
            Scenario::RadarDetection(s) => s.range_m,
        }
    }

    /// Wavelength in meters.
    #[must_use]
    pub fn wavelength_m(&self) -> f64 {
        C_LIGHT / self.freq_hz()
    }

    /// Scan angle from boresight; zero for comms links.
    #[must_use]
    pub fn scan_angle_deg(&self) -> f64 {
        match self {
            Scenario::CommsLink(_) => 0.0,
            Scenario::RadarDetection(s) => s.scan_angle_deg,
        }
    }

    /// Validate shared and variant-specific fields.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
            ConfigError::InvalidParameter {
                name,
                reason: reason.into(),
            }
        }

        if self.freq_hz() <= 0.0 {
            return Err(invalid("freq_hz", "must be positive"));
        }
        if self.bandwidth_hz() <= 0.0 {
            return Err(invalid("bandwidth_hz", "must be positive"));
        }
        if self.range_m() <= 0.0 {
            return Err(invalid("range_m", "must be positive"));
        }

        match self {
            Scenario::CommsLink(s) => {
                if s.rx_noise_temp_k <= 0.0 {
                    return Err(invalid("rx_noise_temp_k", "must be positive"));
                }
                if s.atmospheric_loss_db < 0.0 {
                    return Err(invalid("atmospheric_loss_db", "must be non-negative"));
                }
            }
            Scenario::RadarDetection(s) => {
                if s.rx_noise_temp_k <= 0.0 {
                    return Err(invalid("rx_noise_temp_k", "must be positive"));
                }
                if !(s.pfa > 0.0 && s.pfa < 1.0) {
                    return Err(invalid("pfa", "must be in (0, 1)"));
                }
                if !(s.pd_required > 0.0 && s.pd_required < 1.0) {
                    return Err(invalid("pd_required", "must be in (0, 1)"));
                }
                if s.n_pulses < 1 {
                    return Err(invalid("n_pulses", "must be >= 1"));
                }
                if !(0.0..=90.0).contains(&s.scan_angle_deg) {
                    return Err(invalid("scan_angle_deg", "must be in [0, 90]"));
                }
            }
        }
        Ok(())
    }
}
