//! # Satellite Link Budget Engine
//!
//! Computes the signal-to-noise ratio of a ground-station to spacecraft radio
//! link as a function of spacecraft altitude.
//!
//! ## Overview
//!
//! - **Geometry**: slant range from Earth radius, altitude and elevation angle
//! - **Losses**: antenna pointing losses plus fixed loss terms, combined into
//!   one composite extra loss
//! - **Noise**: system temperature from a direct value, a noise figure or G/T,
//!   and the resulting thermal noise floor
//! - **Engine**: free-space path loss, received power, SNR and margin
//! - **Sweep**: SNR over a range of altitudes, optionally in parallel
//!
//! ## Signal Flow
//!
//! ```text
//! altitude → slant range → FSPL ─┐
//! P_tx + G_tx (EIRP) + G_rx ─────┼→ P_rx → SNR = P_rx − noise floor
//! pointing + fixed losses ───────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use satlink_core::prelude::*;
//!
//! let config = LinkConfiguration::downlink().unwrap();
//! let engine = LinkBudgetEngine::new(config);
//!
//! let result = engine
//!     .sweep(&AltitudeSampling::linspace(400.0, 60_000.0, 500).unwrap())
//!     .unwrap();
//!
//! let first = &result.samples()[0];
//! assert!((first.snr_db - 50.21).abs() < 0.01);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod losses;
pub mod noise;
pub mod observe;
pub mod params;
pub mod sweep;
pub mod units;

pub use config::{AnalysisConfig, ConfigError};
pub use engine::{compute_snr, LinkBudgetEngine, LinkBudgetResult};
pub use error::{LinkError, LinkResult};
pub use geometry::slant_range_m;
pub use losses::{CompositeLoss, FixedLosses, LossBudget, LossTerm};
pub use noise::{NoiseBudget, NoiseTemperature, SystemTemperature};
pub use params::{LinkConfiguration, LinkDirection, LinkParams};
pub use sweep::{AltitudeSampling, AltitudeSweepResult, SweepFailure, SweepSample};
pub use units::PhysicalConstants;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::engine::{LinkBudgetEngine, LinkBudgetResult};
    pub use crate::error::{LinkError, LinkResult};
    pub use crate::losses::{AntennaPointing, FixedLosses, LossTerm};
    pub use crate::noise::{NoiseTemperature, SystemTemperature};
    pub use crate::params::{LinkConfiguration, LinkDirection, LinkParams};
    pub use crate::sweep::{AltitudeSampling, AltitudeSweepResult, Spacing, SweepSample};
}
