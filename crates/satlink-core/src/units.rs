//! Decibel helpers and physical constants
//!
//! The constants are carried as an overridable [`PhysicalConstants`] value
//! inside every configuration so tests can substitute idealized numbers.

use serde::{Deserialize, Serialize};

use crate::error::{LinkError, LinkResult};

/// Boltzmann constant (J/K), CODATA 2014 value used by the reference analysis.
pub const BOLTZMANN_J_PER_K: f64 = 1.380_648_52e-23;

/// Speed of light in vacuum (m/s).
pub const SPEED_OF_LIGHT_M_PER_S: f64 = 299_792_458.0;

/// Standard noise reference temperature (K).
pub const REFERENCE_TEMPERATURE_K: f64 = 290.0;

/// Physical constants used by the noise and path-loss models.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalConstants {
    /// Boltzmann constant (J/K)
    pub boltzmann_j_per_k: f64,
    /// Speed of light (m/s)
    pub speed_of_light_m_per_s: f64,
    /// Reference temperature for noise-figure conversion (K)
    pub reference_temperature_k: f64,
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            boltzmann_j_per_k: BOLTZMANN_J_PER_K,
            speed_of_light_m_per_s: SPEED_OF_LIGHT_M_PER_S,
            reference_temperature_k: REFERENCE_TEMPERATURE_K,
        }
    }
}

impl PhysicalConstants {
    pub(crate) fn validate(&self) -> LinkResult<()> {
        crate::error::require_positive("constants.boltzmann_j_per_k", self.boltzmann_j_per_k)?;
        crate::error::require_positive(
            "constants.speed_of_light_m_per_s",
            self.speed_of_light_m_per_s,
        )?;
        crate::error::require_positive(
            "constants.reference_temperature_k",
            self.reference_temperature_k,
        )?;
        Ok(())
    }
}

/// Convert a power ratio in dB to linear scale.
pub fn db_to_linear(db: f64) -> f64 {
    10.0_f64.powf(db / 10.0)
}

/// Convert a linear power ratio to dB.
///
/// Non-positive input yields `-inf` or NaN; use [`checked_linear_to_db`]
/// where the argument is not known to be positive.
pub fn linear_to_db(linear: f64) -> f64 {
    10.0 * linear.log10()
}

/// Convert a linear power ratio to dB, rejecting non-positive arguments.
///
/// `quantity` names the formula in the returned error.
pub fn checked_linear_to_db(quantity: &'static str, linear: f64) -> LinkResult<f64> {
    if linear > 0.0 && linear.is_finite() {
        Ok(linear_to_db(linear))
    } else {
        Err(LinkError::NumericDomain {
            quantity,
            value: linear,
        })
    }
}

/// Convert watts to dBm.
pub fn watts_to_dbm(watts: f64) -> f64 {
    linear_to_db(watts) + 30.0
}

/// Convert dBm to watts.
pub fn dbm_to_watts(dbm: f64) -> f64 {
    db_to_linear(dbm - 30.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_linear_inverse() {
        for &x in &[-150.0, -30.0, -3.0, 0.0, 0.5, 3.0, 37.7, 120.0] {
            let back = linear_to_db(db_to_linear(x));
            assert!(
                (back - x).abs() < 1e-9,
                "round trip of {x} dB gave {back}"
            );
        }
    }

    #[test]
    fn test_known_values() {
        assert!((db_to_linear(3.0) - 1.995).abs() < 0.001);
        assert!((db_to_linear(10.0) - 10.0).abs() < 1e-12);
        assert!((watts_to_dbm(1.0) - 30.0).abs() < 1e-12);
        assert!((dbm_to_watts(33.0) - 1.995).abs() < 0.001);
    }

    #[test]
    fn test_checked_rejects_non_positive() {
        assert!(checked_linear_to_db("noise floor", 0.0).is_err());
        assert!(checked_linear_to_db("noise floor", -1.0).is_err());
        assert!(checked_linear_to_db("noise floor", f64::NAN).is_err());
        let db = checked_linear_to_db("noise floor", 100.0).unwrap();
        assert!((db - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_default_constants() {
        let c = PhysicalConstants::default();
        assert_eq!(c.speed_of_light_m_per_s, 299_792_458.0);
        assert_eq!(c.reference_temperature_k, 290.0);
        assert!(c.validate().is_ok());

        let bad = PhysicalConstants {
            boltzmann_j_per_k: 0.0,
            ..c
        };
        assert!(bad.validate().is_err());
    }
}
