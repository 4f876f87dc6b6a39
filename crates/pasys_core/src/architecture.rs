//! Architecture configuration: the immutable design record under study.
//!
//! An architecture has three facets matching the design-space path
//! convention: `array.*` (geometry), `rf.*` (chain parameters) and
//! `cost.*` (cost parameters). Instances are built once per evaluation
//! and never mutated afterwards; validation happens at construction.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Planar rectangular array geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayConfig {
    /// Element count along x
    pub nx: u32,
    /// Element count along y
    pub ny: u32,
    /// Element spacing along x, in wavelengths
    pub dx_lambda: f64,
    /// Element spacing along y, in wavelengths
    pub dy_lambda: f64,
    /// Per-element gain (dBi)
    pub element_gain_db: f64,
}

impl Default for ArrayConfig {
    fn default() -> Self {
        Self {
            nx: 8,
            ny: 8,
            dx_lambda: 0.5,
            dy_lambda: 0.5,
            element_gain_db: 0.0,
        }
    }
}

impl ArrayConfig {
    /// Total element count.
    #[must_use]
    pub fn n_elements(&self) -> u32 {
        self.nx * self.ny
    }

    /// Aperture area in square wavelengths.
    #[must_use]
    pub fn aperture_lambda_sq(&self) -> f64 {
        f64::from(self.nx) * self.dx_lambda * f64::from(self.ny) * self.dy_lambda
    }
}

/// RF chain parameters shared by all elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RfChainConfig {
    /// Transmit power per element (W)
    pub tx_power_w_per_elem: f64,
    /// Power amplifier efficiency, (0, 1]
    pub pa_efficiency: f64,
    /// Prime-to-DC supply efficiency, (0, 1]
    pub psu_efficiency: f64,
    /// Receiver noise figure (dB)
    pub noise_figure_db: f64,
    /// Feed network loss (dB)
    pub feed_loss_db: f64,
    /// Additional system losses (dB)
    pub system_loss_db: f64,
    /// Simultaneous transmit beams
    pub n_tx_beams: u32,
}

impl Default for RfChainConfig {
    fn default() -> Self {
        Self {
            tx_power_w_per_elem: 1.0,
            pa_efficiency: 0.3,
            psu_efficiency: 0.9,
            noise_figure_db: 3.0,
            feed_loss_db: 1.5,
            system_loss_db: 0.0,
            n_tx_beams: 1,
        }
    }
}

/// Cost parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostConfig {
    /// Recurring cost per element (USD)
    pub cost_per_elem_usd: f64,
    /// Non-recurring engineering cost (USD)
    pub nre_usd: f64,
    /// Assembly/integration/test cost (USD)
    pub integration_cost_usd: f64,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            cost_per_elem_usd: 100.0,
            nre_usd: 0.0,
            integration_cost_usd: 0.0,
        }
    }
}

/// Complete architecture under evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Architecture {
    #[serde(default)]
    pub array: ArrayConfig,
    #[serde(default)]
    pub rf: RfChainConfig,
    #[serde(default)]
    pub cost: CostConfig,
}

impl Architecture {
    /// Build and validate an architecture.
    pub fn new(
        array: ArrayConfig,
        rf: RfChainConfig,
        cost: CostConfig,
    ) -> Result<Self, ConfigError> {
        let arch = Self { array, rf, cost };
        arch.validate()?;
        Ok(arch)
    }

    /// Validate all facet parameters, failing fast on the first problem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
            ConfigError::InvalidParameter {
                name,
                reason: reason.into(),
            }
        }

        if self.array.nx < 1 || self.array.ny < 1 {
            return Err(invalid("array.nx/ny", "element counts must be >= 1"));
        }
        if self.array.dx_lambda <= 0.0 || self.array.dy_lambda <= 0.0 {
            return Err(invalid("array.dx/dy_lambda", "spacing must be positive"));
        }
        if self.rf.tx_power_w_per_elem <= 0.0 {
            return Err(invalid("rf.tx_power_w_per_elem", "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.rf.pa_efficiency) || self.rf.pa_efficiency == 0.0 {
            return Err(invalid("rf.pa_efficiency", "must be in (0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.rf.psu_efficiency) || self.rf.psu_efficiency == 0.0 {
            return Err(invalid("rf.psu_efficiency", "must be in (0, 1]"));
        }
        if self.rf.noise_figure_db < 0.0 {
            return Err(invalid("rf.noise_figure_db", "must be non-negative"));
        }
        if self.rf.feed_loss_db < 0.0 || self.rf.system_loss_db < 0.0 {
            return Err(invalid("rf losses", "must be non-negative"));
        }
        if self.rf.n_tx_beams < 1 {
            return Err(invalid("rf.n_tx_beams", "must be >= 1"));
        }
        if self.cost.cost_per_elem_usd < 0.0
            || self.cost.nre_usd < 0.0
            || self.cost.integration_cost_usd < 0.0
        {
            return Err(invalid("cost", "costs must be non-negative"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_architecture_is_valid() {
        assert!(Architecture::default().validate().is_ok());
    }

    #[test]
    fn element_count_and_aperture() {
        let array = ArrayConfig {
            nx: 16,
            ny: 8,
            ..Default::default()
        };
        assert_eq!(array.n_elements(), 128);
        assert!((array.aperture_lambda_sq() - 32.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_zero_efficiency() {
        let arch = Architecture {
            rf: RfChainConfig {
                pa_efficiency: 0.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(arch.validate().is_err());
    }

    #[test]
    fn rejects_zero_elements() {
        let arch = Architecture {
            array: ArrayConfig {
                nx: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(arch.validate().is_err());
    }
}
