//! Receiver noise model
//!
//! The system noise temperature comes from one of three inputs:
//!
//! | Input | Conversion |
//! |-------|------------|
//! | Direct | `T_sys` as given |
//! | Noise figure `NF` (dB) | `T_sys = (10^(NF/10) − 1) · T_ref` |
//! | Gain `G` (dB) and `G/T` (dB/K) | `T_sys = 10^(G/10) / 10^(G/T/10)` |
//!
//! The antenna (ambient) temperature is added on top, and the thermal noise
//! floor over the receiver bandwidth is `10·log10(k·T·B) + 30` dBm.

use serde::{Deserialize, Serialize};

use crate::error::{require_finite, require_non_negative, require_positive, LinkError, LinkResult};
use crate::units::{checked_linear_to_db, db_to_linear, linear_to_db, PhysicalConstants};

/// How the receiver system temperature is specified.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SystemTemperature {
    /// Known system noise temperature (K)
    Direct { kelvin: f64 },
    /// Receiver noise figure (dB)
    NoiseFigure { noise_figure_db: f64 },
    /// Antenna gain (dB) and station figure of merit G/T (dB/K)
    GainOverTemperature { gain_db: f64, g_over_t_db_per_k: f64 },
}

impl SystemTemperature {
    /// Resolve to kelvin.
    pub fn kelvin(&self, constants: &PhysicalConstants) -> LinkResult<f64> {
        match *self {
            SystemTemperature::Direct { kelvin } => {
                require_positive("noise.system.kelvin", kelvin)
            }
            SystemTemperature::NoiseFigure { noise_figure_db } => {
                // NF = 0 dB is a noiseless receiver; anything below is unphysical.
                require_non_negative("noise.system.noise_figure_db", noise_figure_db)?;
                Ok(noise_figure_to_kelvin(noise_figure_db, constants.reference_temperature_k))
            }
            SystemTemperature::GainOverTemperature {
                gain_db,
                g_over_t_db_per_k,
            } => {
                require_finite("noise.system.gain_db", gain_db)?;
                require_finite("noise.system.g_over_t_db_per_k", g_over_t_db_per_k)?;
                Ok(db_to_linear(gain_db) / db_to_linear(g_over_t_db_per_k))
            }
        }
    }
}

/// Noise figure (dB) to equivalent noise temperature (K).
pub fn noise_figure_to_kelvin(noise_figure_db: f64, reference_temperature_k: f64) -> f64 {
    (db_to_linear(noise_figure_db) - 1.0) * reference_temperature_k
}

/// Station figure of merit G/T (dB/K) for a gain and total temperature.
pub fn g_over_t_db_per_k(gain_db: f64, total_temperature_k: f64) -> LinkResult<f64> {
    Ok(gain_db - checked_linear_to_db("system temperature", total_temperature_k)?)
}

/// Thermal noise floor in dBm over `bandwidth_hz` at `temperature_k`.
///
/// N = 10*log10(k*T*B) + 30  (dBW to dBm)
pub fn thermal_noise_floor_dbm(
    bandwidth_hz: f64,
    temperature_k: f64,
    constants: &PhysicalConstants,
) -> LinkResult<f64> {
    let ktb = constants.boltzmann_j_per_k * temperature_k * bandwidth_hz;
    Ok(checked_linear_to_db("noise floor", ktb)? + 30.0)
}

/// Receiver noise temperature inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseTemperature {
    /// Receiver system temperature
    pub system: SystemTemperature,
    /// Antenna / ambient contribution (K)
    pub antenna_k: f64,
}

impl NoiseTemperature {
    pub fn direct(system_k: f64, antenna_k: f64) -> Self {
        Self {
            system: SystemTemperature::Direct { kelvin: system_k },
            antenna_k,
        }
    }

    pub fn from_noise_figure(noise_figure_db: f64, antenna_k: f64) -> Self {
        Self {
            system: SystemTemperature::NoiseFigure { noise_figure_db },
            antenna_k,
        }
    }

    pub fn from_g_over_t(gain_db: f64, g_over_t_db_per_k: f64, antenna_k: f64) -> Self {
        Self {
            system: SystemTemperature::GainOverTemperature {
                gain_db,
                g_over_t_db_per_k,
            },
            antenna_k,
        }
    }

    /// Total temperature `T_sys + T_antenna` (K).
    pub fn total_kelvin(&self, constants: &PhysicalConstants) -> LinkResult<f64> {
        let system_k = self.system.kelvin(constants)?;
        require_positive("noise.antenna_k", self.antenna_k)?;
        let total = system_k + self.antenna_k;
        if total > 0.0 {
            Ok(total)
        } else {
            Err(LinkError::invalid(
                "noise",
                format!("total temperature must be > 0, got {total} K"),
            ))
        }
    }
}

/// Evaluated noise figures for one receiver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NoiseBudget {
    /// Receiver system temperature (K)
    pub system_k: f64,
    /// Antenna temperature (K)
    pub antenna_k: f64,
    /// `system_k + antenna_k` (K)
    pub total_k: f64,
    /// Noise spectral density (dBm/Hz)
    pub density_dbm_per_hz: f64,
    /// Noise power over the bandwidth (dBm)
    pub floor_dbm: f64,
}

impl NoiseBudget {
    pub fn compute(
        temperature: &NoiseTemperature,
        bandwidth_hz: f64,
        constants: &PhysicalConstants,
    ) -> LinkResult<Self> {
        require_positive("bandwidth_hz", bandwidth_hz)?;
        let system_k = temperature.system.kelvin(constants)?;
        let total_k = temperature.total_kelvin(constants)?;
        let floor_dbm = thermal_noise_floor_dbm(bandwidth_hz, total_k, constants)?;

        Ok(Self {
            system_k,
            antenna_k: temperature.antenna_k,
            total_k,
            density_dbm_per_hz: floor_dbm - linear_to_db(bandwidth_hz),
            floor_dbm,
        })
    }
}
