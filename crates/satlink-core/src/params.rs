//! Link parameters and validated configuration
//!
//! [`LinkParams`] is plain data: every assumption of an analysis (antenna
//! characteristics, loss guesses, temperatures, physical constants) is a
//! named field with a documented default. [`LinkConfiguration`] is the
//! validated, immutable form used by the engine. It is built once per run
//! and caches the altitude-independent composite loss and noise budget.
//!
//! ## Example
//!
//! ```rust
//! use satlink_core::params::{LinkConfiguration, LinkParams};
//!
//! let params = LinkParams {
//!     elevation_deg: 30.0,
//!     ..LinkParams::downlink()
//! };
//! let config = LinkConfiguration::new(params).unwrap();
//! assert!(config.composite_loss().total_db > 0.0);
//! ```

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{require_finite, require_non_negative, require_positive, LinkError, LinkResult};
use crate::losses::{
    AntennaPointing, CompositeLoss, FixedLosses, LossBudget, LossTerm,
    DEFAULT_POINTING_LOSS_CEILING_DB,
};
use crate::noise::{NoiseBudget, NoiseTemperature};
use crate::units::PhysicalConstants;

/// Mean equatorial Earth radius used by the reference analysis (km).
pub const DEFAULT_EARTH_RADIUS_KM: f64 = 6378.14;

/// Which end of the link transmits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkDirection {
    /// Spacecraft to ground station
    #[default]
    Downlink,
    /// Ground station to spacecraft
    Uplink,
}

impl fmt::Display for LinkDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkDirection::Downlink => write!(f, "downlink"),
            LinkDirection::Uplink => write!(f, "uplink"),
        }
    }
}

impl std::str::FromStr for LinkDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "downlink" | "down" => Ok(LinkDirection::Downlink),
            "uplink" | "up" => Ok(LinkDirection::Uplink),
            _ => Err(format!("unknown link direction: {s}")),
        }
    }
}

/// Raw link parameters.
///
/// `Default` is the downlink preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkParams {
    /// Link direction (informational; behaviour is driven by the fields below)
    pub direction: LinkDirection,
    /// Carrier frequency (Hz)
    pub frequency_hz: f64,
    /// Transmitter output power (dBm)
    pub tx_power_dbm: f64,
    /// Transmit antenna gain (dBi)
    pub tx_antenna_gain_dbi: f64,
    /// Receive antenna gain (dBi)
    pub rx_antenna_gain_dbi: f64,
    /// Receiver noise bandwidth (Hz)
    pub bandwidth_hz: f64,
    /// Elevation angle at the ground station (degrees, (0, 90])
    pub elevation_deg: f64,
    /// Earth radius (km)
    pub earth_radius_km: f64,
    /// Ground station antenna pointing
    pub ground_antenna: AntennaPointing,
    /// Spacecraft antenna pointing
    pub spacecraft_antenna: AntennaPointing,
    /// Constant losses (dB)
    pub losses: FixedLosses,
    /// Loss terms summed into the composite extra loss
    pub loss_terms: Vec<LossTerm>,
    /// Spacecraft pointing loss above which the approximation is flagged (dB)
    pub pointing_loss_ceiling_db: f64,
    /// Receiver noise temperature
    pub noise: NoiseTemperature,
    /// Minimum SNR for reliable reception (dB)
    pub required_snr_db: f64,
    /// Margin levels drawn above the required SNR (dB)
    pub margin_levels_db: Vec<f64>,
    /// Physical constants
    pub constants: PhysicalConstants,
}

impl Default for LinkParams {
    fn default() -> Self {
        Self::downlink()
    }
}

impl LinkParams {
    /// S-band downlink: spacecraft radio (33 dBm, 7 dBi patch) into a 37.7 dBi
    /// ground dish with a 130.13 K system temperature.
    pub fn downlink() -> Self {
        Self {
            direction: LinkDirection::Downlink,
            frequency_hz: 2.2e9,
            tx_power_dbm: 33.0,
            tx_antenna_gain_dbi: 7.0,
            rx_antenna_gain_dbi: 37.7,
            bandwidth_hz: 26.37e3,
            elevation_deg: 45.0,
            earth_radius_km: DEFAULT_EARTH_RADIUS_KM,
            ground_antenna: AntennaPointing::new(0.02, 2.115),
            spacecraft_antenna: AntennaPointing::new(15.0, 86.0),
            losses: FixedLosses::default(),
            loss_terms: LossTerm::ALL.to_vec(),
            pointing_loss_ceiling_db: DEFAULT_POINTING_LOSS_CEILING_DB,
            noise: NoiseTemperature::direct(130.13, 50.0),
            required_snr_db: 6.0,
            margin_levels_db: vec![3.0, 6.0],
            constants: PhysicalConstants::default(),
        }
    }

    /// S-band uplink: 45 dBm into a 35 dBi ground dish, received by a 7.5 dBi
    /// patch and a 5 dB noise-figure radio.
    ///
    /// The atmospheric loss is configured but left out of `loss_terms`,
    /// matching the uplink analysis this preset reproduces.
    pub fn uplink() -> Self {
        Self {
            direction: LinkDirection::Uplink,
            frequency_hz: 2.07e9,
            tx_power_dbm: 45.0,
            tx_antenna_gain_dbi: 35.0,
            rx_antenna_gain_dbi: 7.5,
            ground_antenna: AntennaPointing::new(0.02, 2.75),
            loss_terms: LossTerm::ALL
                .iter()
                .copied()
                .filter(|t| *t != LossTerm::Atmospheric)
                .collect(),
            noise: NoiseTemperature::from_noise_figure(5.0, 50.0),
            ..Self::downlink()
        }
    }

    /// Preset for a direction.
    pub fn preset(direction: LinkDirection) -> Self {
        match direction {
            LinkDirection::Downlink => Self::downlink(),
            LinkDirection::Uplink => Self::uplink(),
        }
    }

    /// Effective isotropic radiated power (dBm).
    pub fn eirp_dbm(&self) -> f64 {
        self.tx_power_dbm + self.tx_antenna_gain_dbi
    }

    /// Loss-budget view of these parameters.
    pub fn loss_budget(&self) -> LossBudget<'_> {
        LossBudget {
            ground: self.ground_antenna,
            spacecraft: self.spacecraft_antenna,
            fixed: self.losses,
            terms: &self.loss_terms,
            pointing_loss_ceiling_db: self.pointing_loss_ceiling_db,
        }
    }

    /// Check every field; the first offending field is named in the error.
    pub fn validate(&self) -> LinkResult<()> {
        require_positive("frequency_hz", self.frequency_hz)?;
        require_finite("tx_power_dbm", self.tx_power_dbm)?;
        require_finite("tx_antenna_gain_dbi", self.tx_antenna_gain_dbi)?;
        require_finite("rx_antenna_gain_dbi", self.rx_antenna_gain_dbi)?;
        require_positive("bandwidth_hz", self.bandwidth_hz)?;

        require_finite("elevation_deg", self.elevation_deg)?;
        if !(self.elevation_deg > 0.0 && self.elevation_deg <= 90.0) {
            return Err(LinkError::invalid(
                "elevation_deg",
                format!("must be in (0, 90], got {}", self.elevation_deg),
            ));
        }
        require_positive("earth_radius_km", self.earth_radius_km)?;

        require_non_negative(
            "ground_antenna.pointing_error_deg",
            self.ground_antenna.pointing_error_deg,
        )?;
        require_positive("ground_antenna.hpbw_deg", self.ground_antenna.hpbw_deg)?;
        require_non_negative(
            "spacecraft_antenna.pointing_error_deg",
            self.spacecraft_antenna.pointing_error_deg,
        )?;
        require_positive("spacecraft_antenna.hpbw_deg", self.spacecraft_antenna.hpbw_deg)?;

        // Loss terms may be negative to model a gain, but must be finite.
        require_finite("losses.polarization_db", self.losses.polarization_db)?;
        require_finite("losses.ionospheric_db", self.losses.ionospheric_db)?;
        require_finite("losses.atmospheric_db", self.losses.atmospheric_db)?;
        require_finite("losses.rain_db", self.losses.rain_db)?;
        require_finite("losses.tx_line_db", self.losses.tx_line_db)?;
        require_finite("losses.rx_line_db", self.losses.rx_line_db)?;

        let mut seen = BTreeSet::new();
        for term in &self.loss_terms {
            if !seen.insert(*term) {
                return Err(LinkError::invalid(
                    "loss_terms",
                    format!("lists '{term}' more than once"),
                ));
            }
        }
        require_positive("pointing_loss_ceiling_db", self.pointing_loss_ceiling_db)?;

        require_finite("required_snr_db", self.required_snr_db)?;
        for &level in &self.margin_levels_db {
            require_finite("margin_levels_db", level)?;
        }

        self.constants.validate()?;
        Ok(())
    }
}

/// Validated, immutable link configuration.
#[derive(Debug, Clone)]
pub struct LinkConfiguration {
    params: LinkParams,
    composite_loss: CompositeLoss,
    noise: NoiseBudget,
}

impl LinkConfiguration {
    /// Validate `params` and precompute everything that does not depend on
    /// altitude.
    pub fn new(params: LinkParams) -> LinkResult<Self> {
        params.validate()?;

        let composite_loss = params.loss_budget().compute()?;
        let noise = NoiseBudget::compute(&params.noise, params.bandwidth_hz, &params.constants)?;

        tracing::debug!(
            direction = %params.direction,
            frequency_hz = params.frequency_hz,
            composite_loss_db = composite_loss.total_db,
            total_temperature_k = noise.total_k,
            noise_floor_dbm = noise.floor_dbm,
            "link configuration ready"
        );

        Ok(Self {
            params,
            composite_loss,
            noise,
        })
    }

    /// Validated downlink preset.
    pub fn downlink() -> LinkResult<Self> {
        Self::new(LinkParams::downlink())
    }

    /// Validated uplink preset.
    pub fn uplink() -> LinkResult<Self> {
        Self::new(LinkParams::uplink())
    }

    pub fn params(&self) -> &LinkParams {
        &self.params
    }

    pub fn composite_loss(&self) -> &CompositeLoss {
        &self.composite_loss
    }

    pub fn noise(&self) -> &NoiseBudget {
        &self.noise
    }

    pub fn constants(&self) -> &PhysicalConstants {
        &self.params.constants
    }

    /// Carrier wavelength (m).
    pub fn wavelength_m(&self) -> f64 {
        self.params.constants.speed_of_light_m_per_s / self.params.frequency_hz
    }

    pub fn into_params(self) -> LinkParams {
        self.params
    }
}

impl TryFrom<LinkParams> for LinkConfiguration {
    type Error = LinkError;

    fn try_from(params: LinkParams) -> LinkResult<Self> {
        Self::new(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(err: LinkError) -> &'static str {
        match err {
            LinkError::InvalidConfiguration { field, .. } => field,
            other => panic!("expected configuration error, got {other}"),
        }
    }

    #[test]
    fn test_presets_validate() {
        assert!(LinkParams::downlink().validate().is_ok());
        assert!(LinkParams::uplink().validate().is_ok());
        assert_eq!(LinkParams::default(), LinkParams::downlink());
    }

    #[test]
    fn test_uplink_omits_atmospheric_term() {
        let up = LinkParams::uplink();
        assert!(!up.loss_terms.contains(&LossTerm::Atmospheric));
        assert_eq!(up.losses.atmospheric_db, 0.3);
        assert!(LinkParams::downlink().loss_terms.contains(&LossTerm::Atmospheric));
    }

    #[test]
    fn test_zero_bandwidth_fails_at_construction() {
        let params = LinkParams {
            bandwidth_hz: 0.0,
            ..LinkParams::downlink()
        };
        let err = LinkConfiguration::new(params).unwrap_err();
        assert_eq!(field_of(err), "bandwidth_hz");
    }

    #[test]
    fn test_elevation_bounds() {
        for &el in &[0.0, -5.0, 90.5, f64::NAN] {
            let params = LinkParams {
                elevation_deg: el,
                ..LinkParams::downlink()
            };
            let err = LinkConfiguration::new(params).unwrap_err();
            assert_eq!(field_of(err), "elevation_deg", "elevation {el}");
        }
        let zenith = LinkParams {
            elevation_deg: 90.0,
            ..LinkParams::downlink()
        };
        assert!(LinkConfiguration::new(zenith).is_ok());
    }

    #[test]
    fn test_invalid_fields_are_named() {
        let cases: Vec<(LinkParams, &str)> = vec![
            (
                LinkParams {
                    frequency_hz: -1.0,
                    ..LinkParams::downlink()
                },
                "frequency_hz",
            ),
            (
                LinkParams {
                    earth_radius_km: -6378.0,
                    ..LinkParams::downlink()
                },
                "earth_radius_km",
            ),
            (
                LinkParams {
                    ground_antenna: AntennaPointing::new(0.02, 0.0),
                    ..LinkParams::downlink()
                },
                "ground_antenna.hpbw_deg",
            ),
            (
                LinkParams {
                    spacecraft_antenna: AntennaPointing::new(-1.0, 86.0),
                    ..LinkParams::downlink()
                },
                "spacecraft_antenna.pointing_error_deg",
            ),
            (
                LinkParams {
                    noise: NoiseTemperature::direct(130.13, -4.0),
                    ..LinkParams::downlink()
                },
                "noise.antenna_k",
            ),
            (
                LinkParams {
                    loss_terms: vec![LossTerm::Rain, LossTerm::Rain],
                    ..LinkParams::downlink()
                },
                "loss_terms",
            ),
        ];

        for (params, expected) in cases {
            let err = LinkConfiguration::new(params).unwrap_err();
            assert_eq!(field_of(err), expected);
        }
    }

    #[test]
    fn test_cached_budgets() {
        let config = LinkConfiguration::downlink().unwrap();
        assert!((config.composite_loss().total_db - 5.216_061).abs() < 1e-5);
        assert!((config.noise().total_k - 180.13).abs() < 1e-9);
        assert!((config.wavelength_m() - 0.136_269).abs() < 1e-6);
        assert!((config.params().eirp_dbm() - 40.0).abs() < 1e-12);
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!("Uplink".parse::<LinkDirection>().unwrap(), LinkDirection::Uplink);
        assert_eq!("down".parse::<LinkDirection>().unwrap(), LinkDirection::Downlink);
        assert!("sideways".parse::<LinkDirection>().is_err());
        assert_eq!(LinkDirection::Uplink.to_string(), "uplink");
    }

    #[test]
    fn test_preset_by_direction() {
        assert_eq!(LinkParams::preset(LinkDirection::Uplink), LinkParams::uplink());
    }
}
