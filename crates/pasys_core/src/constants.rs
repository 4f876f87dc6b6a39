//! Physical constants and unit conversions used throughout the crate.
//!
//! These are pure values and free functions with no lifecycle; keep them
//! here rather than threading them through configuration.

/// Speed of light in vacuum \[m/s\]
pub const C_LIGHT: f64 = 299_792_458.0;

/// Boltzmann constant \[J/K\]
pub const K_B: f64 = 1.380_649e-23;

/// Standard reference temperature \[K\]
pub const T_REF: f64 = 290.0;

/// Convert dB to linear scale (power).
#[must_use]
pub fn db_to_linear(db: f64) -> f64 {
    10f64.powf(db / 10.0)
}

/// Convert linear scale (power) to dB. Non-positive input maps to -inf.
#[must_use]
pub fn linear_to_db(linear: f64) -> f64 {
    if linear > 0.0 {
        10.0 * linear.log10()
    } else {
        f64::NEG_INFINITY
    }
}

/// Convert dBW to Watts.
#[must_use]
pub fn dbw_to_w(dbw: f64) -> f64 {
    db_to_linear(dbw)
}

/// Convert Watts to dBW. Non-positive input maps to -inf.
#[must_use]
pub fn w_to_dbw(w: f64) -> f64 {
    linear_to_db(w)
}

/// Wavelength in meters for a frequency in Hz.
#[must_use]
pub fn wavelength_m(freq_hz: f64) -> f64 {
    C_LIGHT / freq_hz
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_round_trips() {
        assert!((db_to_linear(3.0) - 1.995262).abs() < 1e-6);
        assert!((linear_to_db(100.0) - 20.0).abs() < 1e-12);
        assert!((w_to_dbw(db_to_linear(13.0)) - 13.0).abs() < 1e-12);
    }

    #[test]
    fn zero_power_is_neg_inf() {
        assert_eq!(linear_to_db(0.0), f64::NEG_INFINITY);
        assert_eq!(w_to_dbw(-1.0), f64::NEG_INFINITY);
    }

    #[test]
    fn x_band_wavelength() {
        assert!((wavelength_m(10e9) - 0.0299792458).abs() < 1e-12);
    }
}
