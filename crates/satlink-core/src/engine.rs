//! Link Budget Engine: SNR for one slant range or one altitude
//!
//! Combines transmit power, antenna gains, free-space path loss (FSPL), the
//! configuration's composite extra loss and its noise floor:
//!
//! ```text
//! λ     = c / f
//! FSPL  = 20·log10(4π·d / λ)
//! EIRP  = P_tx + G_tx
//! P_rx  = EIRP + G_rx − FSPL − L_extra
//! SNR   = P_rx − N
//! margin = SNR − SNR_required
//! ```
//!
//! ## Example
//!
//! ```rust
//! use satlink_core::engine::LinkBudgetEngine;
//! use satlink_core::params::LinkConfiguration;
//!
//! let engine = LinkBudgetEngine::new(LinkConfiguration::downlink().unwrap());
//! let sample = engine.evaluate_altitude(400.0).unwrap();
//!
//! assert!((sample.snr_db - 50.21).abs() < 0.01);
//! assert!((sample.margin_db - (sample.snr_db - 6.0)).abs() < 1e-12);
//! ```

use std::f64::consts::PI;

use serde::Serialize;

use crate::error::{require_non_negative, LinkResult};
use crate::geometry::slant_range_m;
use crate::params::LinkConfiguration;
use crate::sweep::{self, AltitudeSampling, AltitudeSweepResult, SweepSample};
use crate::units::{checked_linear_to_db, linear_to_db};

/// Full link budget at one slant range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinkBudgetResult {
    /// Slant range (m)
    pub slant_range_m: f64,
    /// Carrier wavelength (m)
    pub wavelength_m: f64,
    /// Effective Isotropic Radiated Power (dBm)
    pub eirp_dbm: f64,
    /// Free-space path loss (dB, positive value)
    pub fspl_db: f64,
    /// Composite extra loss (dB)
    pub extra_loss_db: f64,
    /// Received power (dBm)
    pub received_power_dbm: f64,
    /// Noise floor at receiver (dBm)
    pub noise_floor_dbm: f64,
    /// Signal-to-Noise Ratio (dB)
    pub snr_db: f64,
    /// Carrier-to-Noise density ratio (dB-Hz)
    pub cn0_dbhz: f64,
    /// Link margin above required SNR (dB)
    pub margin_db: f64,
}

impl LinkBudgetResult {
    /// True when the SNR meets the requirement.
    pub fn closes(&self) -> bool {
        self.margin_db >= 0.0
    }
}

/// Free-space path loss in dB.
///
/// FSPL = 20*log10(4*pi*d/λ). A non-positive distance or wavelength has no
/// logarithm and fails with a numeric domain error.
pub fn free_space_path_loss_db(distance_m: f64, wavelength_m: f64) -> LinkResult<f64> {
    let ratio = 4.0 * PI * distance_m / wavelength_m;
    // 20*log10(r) == 10*log10(r^2); keep the argument unsquared for range.
    Ok(2.0 * checked_linear_to_db("free-space path loss", ratio)?)
}

/// Full budget at `slant_range_m` for `config`.
pub fn evaluate(config: &LinkConfiguration, slant_range_m: f64) -> LinkResult<LinkBudgetResult> {
    let params = config.params();
    let noise = config.noise();

    let wavelength_m = config.wavelength_m();
    let fspl_db = free_space_path_loss_db(slant_range_m, wavelength_m)?;
    let eirp_dbm = params.eirp_dbm();
    let extra_loss_db = config.composite_loss().total_db;

    let received_power_dbm = eirp_dbm + params.rx_antenna_gain_dbi - fspl_db - extra_loss_db;
    let snr_db = received_power_dbm - noise.floor_dbm;
    let cn0_dbhz = snr_db + linear_to_db(params.bandwidth_hz);

    Ok(LinkBudgetResult {
        slant_range_m,
        wavelength_m,
        eirp_dbm,
        fspl_db,
        extra_loss_db,
        received_power_dbm,
        noise_floor_dbm: noise.floor_dbm,
        snr_db,
        cn0_dbhz,
        margin_db: snr_db - params.required_snr_db,
    })
}

/// SNR (dB) at `slant_range_m` for `config`.
pub fn compute_snr(config: &LinkConfiguration, slant_range_m: f64) -> LinkResult<f64> {
    evaluate(config, slant_range_m).map(|budget| budget.snr_db)
}

/// Slant range, SNR and margin at one altitude.
pub fn evaluate_altitude(config: &LinkConfiguration, altitude_km: f64) -> LinkResult<SweepSample> {
    require_non_negative("altitude_km", altitude_km)?;
    let params = config.params();

    let range_m = slant_range_m(params.earth_radius_km, altitude_km, params.elevation_deg)?;
    let snr_db = compute_snr(config, range_m)?;

    Ok(SweepSample {
        altitude_km,
        slant_range_m: range_m,
        snr_db,
        margin_db: snr_db - params.required_snr_db,
    })
}

/// Engine bound to one validated configuration.
#[derive(Debug, Clone)]
pub struct LinkBudgetEngine {
    config: LinkConfiguration,
}

impl LinkBudgetEngine {
    pub fn new(config: LinkConfiguration) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LinkConfiguration {
        &self.config
    }

    /// Full budget at one slant range.
    pub fn evaluate(&self, slant_range_m: f64) -> LinkResult<LinkBudgetResult> {
        evaluate(&self.config, slant_range_m)
    }

    /// SNR (dB) at one slant range.
    pub fn compute_snr(&self, slant_range_m: f64) -> LinkResult<f64> {
        compute_snr(&self.config, slant_range_m)
    }

    /// Full budget at one altitude.
    pub fn evaluate_budget_at_altitude(&self, altitude_km: f64) -> LinkResult<LinkBudgetResult> {
        require_non_negative("altitude_km", altitude_km)?;
        let params = self.config.params();
        let range_m = slant_range_m(params.earth_radius_km, altitude_km, params.elevation_deg)?;
        self.evaluate(range_m)
    }

    /// Slant range, SNR and margin at one altitude.
    pub fn evaluate_altitude(&self, altitude_km: f64) -> LinkResult<SweepSample> {
        evaluate_altitude(&self.config, altitude_km)
    }

    /// Sweep a validated altitude sampling.
    pub fn sweep(&self, sampling: &AltitudeSampling) -> LinkResult<AltitudeSweepResult> {
        sweep::sweep(&self.config, sampling)
    }

    /// Sweep an explicit list of altitudes.
    pub fn sweep_altitudes(&self, altitudes_km: &[f64]) -> AltitudeSweepResult {
        sweep::sweep_altitudes(&self.config, altitudes_km)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LinkError;
    use crate::params::LinkParams;
    use crate::units::PhysicalConstants;

    #[test]
    fn test_fspl_known_values() {
        let c = PhysicalConstants::default().speed_of_light_m_per_s;
        // 1 GHz at 1 km ≈ 92.45 dB
        let fspl = free_space_path_loss_db(1000.0, c / 1e9).unwrap();
        assert!(
            (fspl - 92.45).abs() < 0.1,
            "FSPL at 1GHz/1km = {fspl:.2} dB, expected ~92.45"
        );

        // 2.4 GHz at 100 m ≈ 80.0 dB
        let fspl2 = free_space_path_loss_db(100.0, c / 2.4e9).unwrap();
        assert!(
            (fspl2 - 80.04).abs() < 0.2,
            "FSPL at 2.4GHz/100m = {fspl2:.2} dB, expected ~80.0"
        );
    }

    #[test]
    fn test_fspl_doubling_distance_adds_6db() {
        let l1 = free_space_path_loss_db(500_000.0, 0.1363).unwrap();
        let l2 = free_space_path_loss_db(1_000_000.0, 0.1363).unwrap();
        assert!((l2 - l1 - 6.0206).abs() < 1e-3);
    }

    #[test]
    fn test_zero_distance_is_numeric_error() {
        let err = free_space_path_loss_db(0.0, 0.1).unwrap_err();
        assert!(err.is_numeric());
    }

    #[test]
    fn test_downlink_reference_scenario() {
        let config = LinkConfiguration::downlink().unwrap();
        let budget = LinkBudgetEngine::new(config)
            .evaluate_budget_at_altitude(400.0)
            .unwrap();

        assert!((budget.eirp_dbm - 40.0).abs() < 1e-12);
        assert!(
            (budget.fspl_db - 154.1019).abs() < 1e-3,
            "FSPL = {:.4}",
            budget.fspl_db
        );
        assert!(
            (budget.snr_db - 50.2142).abs() < 0.01,
            "downlink SNR at 400 km = {:.4} dB, expected 50.2142",
            budget.snr_db
        );
        assert!((budget.margin_db - 44.2142).abs() < 0.01);
        assert!(budget.closes());
    }

    #[test]
    fn test_uplink_reference_scenario() {
        let config = LinkConfiguration::uplink().unwrap();
        let sample = evaluate_altitude(&config, 400.0).unwrap();
        assert!(
            (sample.snr_db - 55.0933).abs() < 0.01,
            "uplink SNR at 400 km = {:.4} dB, expected 55.0933",
            sample.snr_db
        );
        assert!((sample.slant_range_m - 549_899.54).abs() < 0.1);
    }

    #[test]
    fn test_snr_matches_free_function() {
        let config = LinkConfiguration::downlink().unwrap();
        let engine = LinkBudgetEngine::new(config.clone());
        let a = engine.compute_snr(1.0e6).unwrap();
        let b = compute_snr(&config, 1.0e6).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_cn0_relation() {
        let config = LinkConfiguration::downlink().unwrap();
        let budget = evaluate(&config, 2.0e6).unwrap();
        let expected = budget.snr_db + 10.0 * 26.37e3_f64.log10();
        assert!((budget.cn0_dbhz - expected).abs() < 1e-9);
    }

    #[test]
    fn test_extra_loss_lowers_snr_one_for_one() {
        let base = LinkConfiguration::downlink().unwrap();
        let rainy = LinkConfiguration::new(LinkParams {
            losses: crate::losses::FixedLosses {
                rain_db: 2.5,
                ..LinkParams::downlink().losses
            },
            ..LinkParams::downlink()
        })
        .unwrap();

        let d = 3.0e6;
        let delta = compute_snr(&base, d).unwrap() - compute_snr(&rainy, d).unwrap();
        assert!((delta - 2.5).abs() < 1e-9, "delta = {delta}");
    }

    #[test]
    fn test_non_finite_altitude() {
        let config = LinkConfiguration::downlink().unwrap();
        let err = evaluate_altitude(&config, f64::NAN).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_negative_altitude_is_rejected() {
        let config = LinkConfiguration::downlink().unwrap();
        for &h in &[-200.0, -13_000.0] {
            match evaluate_altitude(&config, h) {
                Err(LinkError::InvalidConfiguration { field, .. }) => assert_eq!(field, "altitude_km"),
                other => panic!("altitude {h} km: unexpected result {other:?}"),
            }
        }
        let engine = LinkBudgetEngine::new(config);
        assert!(engine.evaluate_budget_at_altitude(-13_000.0).is_err());
    }
}
