//! Loss Budget: antenna pointing and composite extra loss
//!
//! Two pointing-loss approximations are provided:
//!
//! - **Ground station** (parabolic reflector): a sinc²-shaped gain roll-off,
//!   `x = 2·e·(79.76/B)` degrees and
//!   `L = −10·log10( 3282.81 · sin²(x·π/180) / x² )`.
//! - **Spacecraft** (wide-beam patch): the near-boresight quadratic
//!   `L = 12·(e/B)²` dB, only meaningful while `e/B` stays well under 1.
//!
//! Every other loss (polarization, ionosphere, atmosphere, rain, transmit and
//! receive line) is a constant dB input. The composite loss is the plain sum
//! of the terms selected for the link, which approximates multiplying the
//! linear loss factors.
//!
//! ## Example
//!
//! ```rust
//! use satlink_core::losses::{ground_pointing_loss_db, spacecraft_pointing_loss_db};
//!
//! let gs = ground_pointing_loss_db(0.02, 2.115).unwrap();
//! let sc = spacecraft_pointing_loss_db(15.0, 86.0).unwrap();
//! assert!(gs < 0.01);
//! assert!((sc - 0.365).abs() < 0.001);
//! ```

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{require_non_negative, require_positive, LinkResult};
use crate::units::checked_linear_to_db;

// ── Constants ────────────────────────────────────────────────────────────────

/// Beamwidth normalisation of the reflector roll-off (degrees).
const ROLL_OFF_BEAMWIDTH_FACTOR: f64 = 79.76;

/// Gain-pattern constant of the reflector roll-off, ≈ (180/π)².
const GAIN_PATTERN_CONSTANT: f64 = 3282.81;

/// Below this argument `sinc` is evaluated from its Taylor series.
const SINC_SERIES_THRESHOLD: f64 = 1e-4;

/// Default ceiling above which the quadratic spacecraft approximation is
/// reported as out of its valid domain (dB).
pub const DEFAULT_POINTING_LOSS_CEILING_DB: f64 = 20.0;

// ── Pointing losses ──────────────────────────────────────────────────────────

/// Antenna pointing characteristics of one terminal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AntennaPointing {
    /// Pointing error (degrees, >= 0)
    pub pointing_error_deg: f64,
    /// Half-power beamwidth (degrees, > 0)
    pub hpbw_deg: f64,
}

impl AntennaPointing {
    pub fn new(pointing_error_deg: f64, hpbw_deg: f64) -> Self {
        Self {
            pointing_error_deg,
            hpbw_deg,
        }
    }
}

/// `sin(u)/u` with the removable singularity at zero handled by series.
fn sinc(u: f64) -> f64 {
    if u.abs() < SINC_SERIES_THRESHOLD {
        let u2 = u * u;
        1.0 - u2 / 6.0 + u2 * u2 / 120.0
    } else {
        u.sin() / u
    }
}

/// Ground-station pointing loss (dB) for a reflector antenna.
///
/// The reference expression evaluates `sin` in radians but divides by the
/// roll-off squared in degrees. Rewriting the ratio as
/// `3282.81·(π/180)²·sinc²(x·π/180)` is algebraically identical and stays
/// finite at `x = 0`, where the loss tends to `−10·log10(3282.81·(π/180)²)`,
/// a few micro-dB below zero.
pub fn ground_pointing_loss_db(pointing_error_deg: f64, hpbw_deg: f64) -> LinkResult<f64> {
    require_non_negative("ground_antenna.pointing_error_deg", pointing_error_deg)?;
    require_positive("ground_antenna.hpbw_deg", hpbw_deg)?;

    let roll_off_deg = 2.0 * pointing_error_deg * (ROLL_OFF_BEAMWIDTH_FACTOR / hpbw_deg);
    let deg_to_rad = PI / 180.0;
    let s = sinc(roll_off_deg * deg_to_rad);
    let ratio = GAIN_PATTERN_CONSTANT * deg_to_rad * deg_to_rad * s * s;

    Ok(-checked_linear_to_db("ground pointing roll-off", ratio)?)
}

/// Spacecraft pointing loss (dB), quadratic near-boresight approximation.
pub fn spacecraft_pointing_loss_db(pointing_error_deg: f64, hpbw_deg: f64) -> LinkResult<f64> {
    require_non_negative("spacecraft_antenna.pointing_error_deg", pointing_error_deg)?;
    require_positive("spacecraft_antenna.hpbw_deg", hpbw_deg)?;

    let normalized = pointing_error_deg / hpbw_deg;
    Ok(12.0 * normalized * normalized)
}

// ── Loss terms ───────────────────────────────────────────────────────────────

/// One contribution to the composite extra loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossTerm {
    GroundPointing,
    SpacecraftPointing,
    Polarization,
    Ionospheric,
    Atmospheric,
    Rain,
    TransmitLine,
    ReceiveLine,
}

impl LossTerm {
    /// Every term, in budget order.
    pub const ALL: [LossTerm; 8] = [
        LossTerm::GroundPointing,
        LossTerm::SpacecraftPointing,
        LossTerm::Polarization,
        LossTerm::Ionospheric,
        LossTerm::Atmospheric,
        LossTerm::Rain,
        LossTerm::TransmitLine,
        LossTerm::ReceiveLine,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LossTerm::GroundPointing => "ground_pointing",
            LossTerm::SpacecraftPointing => "spacecraft_pointing",
            LossTerm::Polarization => "polarization",
            LossTerm::Ionospheric => "ionospheric",
            LossTerm::Atmospheric => "atmospheric",
            LossTerm::Rain => "rain",
            LossTerm::TransmitLine => "transmit_line",
            LossTerm::ReceiveLine => "receive_line",
        }
    }
}

impl fmt::Display for LossTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Constant (altitude-independent) losses in dB.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedLosses {
    /// Polarization mismatch
    pub polarization_db: f64,
    /// Ionospheric loss
    pub ionospheric_db: f64,
    /// Atmospheric gases
    pub atmospheric_db: f64,
    /// Rain attenuation
    pub rain_db: f64,
    /// Transmit-side electronics / line loss
    pub tx_line_db: f64,
    /// Receive-side electronics / line loss
    pub rx_line_db: f64,
}

impl Default for FixedLosses {
    fn default() -> Self {
        Self {
            polarization_db: 0.3,
            ionospheric_db: 0.1,
            atmospheric_db: 0.3,
            rain_db: 0.0,
            tx_line_db: 3.65,
            rx_line_db: 0.5,
        }
    }
}

// ── Composite loss ───────────────────────────────────────────────────────────

/// Evaluated composite loss: per-term values and their sum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeLoss {
    /// Included terms with their values (dB), in configuration order
    pub terms: Vec<(LossTerm, f64)>,
    /// Arithmetic sum of `terms` (dB)
    pub total_db: f64,
    /// Spacecraft pointing loss exceeded the sanity ceiling
    pub pointing_out_of_domain: bool,
}

impl CompositeLoss {
    /// Sum a list of evaluated terms.
    pub fn from_terms(terms: Vec<(LossTerm, f64)>) -> Self {
        let total_db = terms.iter().map(|(_, db)| db).sum();
        Self {
            terms,
            total_db,
            pointing_out_of_domain: false,
        }
    }

    /// Value of one term, if it is part of the budget.
    pub fn term(&self, term: LossTerm) -> Option<f64> {
        self.terms
            .iter()
            .find(|(t, _)| *t == term)
            .map(|&(_, db)| db)
    }
}

/// Inputs of the composite loss for one link direction.
#[derive(Debug, Clone, Copy)]
pub struct LossBudget<'a> {
    pub ground: AntennaPointing,
    pub spacecraft: AntennaPointing,
    pub fixed: FixedLosses,
    /// Terms to include, in order
    pub terms: &'a [LossTerm],
    /// Spacecraft pointing loss above which the approximation is flagged (dB)
    pub pointing_loss_ceiling_db: f64,
}

impl LossBudget<'_> {
    /// Value of a single term (dB), whether or not it is included.
    pub fn term_value(&self, term: LossTerm) -> LinkResult<f64> {
        let value = match term {
            LossTerm::GroundPointing => {
                ground_pointing_loss_db(self.ground.pointing_error_deg, self.ground.hpbw_deg)?
            }
            LossTerm::SpacecraftPointing => spacecraft_pointing_loss_db(
                self.spacecraft.pointing_error_deg,
                self.spacecraft.hpbw_deg,
            )?,
            LossTerm::Polarization => self.fixed.polarization_db,
            LossTerm::Ionospheric => self.fixed.ionospheric_db,
            LossTerm::Atmospheric => self.fixed.atmospheric_db,
            LossTerm::Rain => self.fixed.rain_db,
            LossTerm::TransmitLine => self.fixed.tx_line_db,
            LossTerm::ReceiveLine => self.fixed.rx_line_db,
        };
        Ok(value)
    }

    /// Evaluate every included term and sum them.
    pub fn compute(&self) -> LinkResult<CompositeLoss> {
        let terms = self
            .terms
            .iter()
            .map(|&term| self.term_value(term).map(|db| (term, db)))
            .collect::<LinkResult<Vec<_>>>()?;

        let mut composite = CompositeLoss::from_terms(terms);

        if let Some(sc_loss) = composite.term(LossTerm::SpacecraftPointing) {
            if sc_loss > self.pointing_loss_ceiling_db {
                tracing::warn!(
                    loss_db = sc_loss,
                    ceiling_db = self.pointing_loss_ceiling_db,
                    pointing_error_deg = self.spacecraft.pointing_error_deg,
                    hpbw_deg = self.spacecraft.hpbw_deg,
                    "spacecraft pointing loss outside the quadratic approximation's valid domain"
                );
                composite.pointing_out_of_domain = true;
            }
        }

        tracing::debug!(total_db = composite.total_db, terms = composite.terms.len(), "composite loss");
        Ok(composite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn budget(terms: &[LossTerm]) -> LossBudget<'_> {
        LossBudget {
            ground: AntennaPointing::new(0.02, 2.115),
            spacecraft: AntennaPointing::new(15.0, 86.0),
            fixed: FixedLosses::default(),
            terms,
            pointing_loss_ceiling_db: DEFAULT_POINTING_LOSS_CEILING_DB,
        }
    }

    #[test]
    fn test_ground_pointing_reference() {
        // 2.115 deg HPBW, 0.02 deg error
        let loss = ground_pointing_loss_db(0.02, 2.115).unwrap();
        assert!(
            (loss - 0.000_998_6).abs() < 1e-6,
            "ground pointing loss = {loss:.7} dB"
        );
    }

    #[test]
    fn test_ground_pointing_zero_error_is_finite() {
        let loss = ground_pointing_loss_db(0.0, 2.115).unwrap();
        let limit = -10.0 * (GAIN_PATTERN_CONSTANT * (PI / 180.0).powi(2)).log10();
        assert!(loss.is_finite());
        assert!((loss - limit).abs() < 1e-12, "{loss} vs limit {limit}");
        assert!(loss.abs() < 1e-5);
    }

    #[test]
    fn test_ground_pointing_continuous_at_series_switch() {
        // Roll-off argument straddling the Taylor-series threshold
        let e_switch = SINC_SERIES_THRESHOLD * (180.0 / PI) * 2.115 / (2.0 * ROLL_OFF_BEAMWIDTH_FACTOR);
        let below = ground_pointing_loss_db(e_switch * 0.999, 2.115).unwrap();
        let above = ground_pointing_loss_db(e_switch * 1.001, 2.115).unwrap();
        assert!((below - above).abs() < 1e-9);
    }

    #[test]
    fn test_ground_pointing_grows_with_error() {
        let small = ground_pointing_loss_db(0.1, 2.0).unwrap();
        let large = ground_pointing_loss_db(0.8, 2.0).unwrap();
        assert!(large > small, "{large} <= {small}");
    }

    #[test]
    fn test_spacecraft_pointing_reference() {
        let loss = spacecraft_pointing_loss_db(15.0, 86.0).unwrap();
        assert!((loss - 0.365_062).abs() < 1e-6, "loss = {loss}");
        assert_eq!(spacecraft_pointing_loss_db(0.0, 86.0).unwrap(), 0.0);
    }

    #[test]
    fn test_invalid_beamwidth() {
        assert!(ground_pointing_loss_db(0.02, 0.0).unwrap_err().is_configuration());
        assert!(spacecraft_pointing_loss_db(1.0, -5.0).unwrap_err().is_configuration());
        assert!(spacecraft_pointing_loss_db(-1.0, 5.0).is_err());
    }

    #[test]
    fn test_composite_is_sum_of_terms() {
        let all = budget(&LossTerm::ALL).compute().unwrap();
        let manual: f64 = all.terms.iter().map(|(_, v)| v).sum();
        assert!((all.total_db - manual).abs() < 1e-12);
        assert!(
            (all.total_db - 5.216_061).abs() < 1e-5,
            "downlink composite = {:.6}",
            all.total_db
        );

        // Order does not matter
        let mut reversed = LossTerm::ALL;
        reversed.reverse();
        let rev = budget(&reversed).compute().unwrap();
        assert!((rev.total_db - all.total_db).abs() < 1e-12);
    }

    #[test]
    fn test_excluded_term_is_absent() {
        let terms: Vec<LossTerm> = LossTerm::ALL
            .iter()
            .copied()
            .filter(|t| *t != LossTerm::Atmospheric)
            .collect();
        let composite = budget(&terms).compute().unwrap();
        assert_eq!(composite.term(LossTerm::Atmospheric), None);
        assert!(
            (composite.total_db - 4.916_061).abs() < 1e-5,
            "uplink-style composite = {:.6}",
            composite.total_db
        );
    }

    #[test]
    fn test_empty_budget() {
        let composite = budget(&[]).compute().unwrap();
        assert_eq!(composite.total_db, 0.0);
        assert!(composite.terms.is_empty());
    }

    #[test]
    fn test_pointing_ceiling_flag() {
        let mut b = budget(&LossTerm::ALL);
        assert!(!b.compute().unwrap().pointing_out_of_domain);

        // 12 * (60/43)^2 ≈ 23.4 dB
        b.spacecraft = AntennaPointing::new(60.0, 43.0);
        let composite = b.compute().unwrap();
        assert!(composite.pointing_out_of_domain);
        assert!(composite.term(LossTerm::SpacecraftPointing).unwrap() > 20.0);
    }

    #[test]
    fn test_term_display() {
        assert_eq!(LossTerm::TransmitLine.to_string(), "transmit_line");
        assert_eq!(LossTerm::ALL.len(), 8);
    }
}
