//! Altitude sweeps
//!
//! A sweep evaluates the engine at every altitude of an [`AltitudeSampling`]
//! (or an explicit list). Samples are independent: a sample that fails, for
//! instance because its altitude is negative, is recorded as a
//! [`SweepFailure`] and the rest of the sweep proceeds.
//!
//! With the `parallel` feature the samples are evaluated with Rayon; the
//! output order is the same as the sequential path.
//!
//! ## Example
//!
//! ```rust
//! use satlink_core::params::LinkConfiguration;
//! use satlink_core::sweep::{sweep, AltitudeSampling};
//!
//! let config = LinkConfiguration::downlink().unwrap();
//! let sampling = AltitudeSampling::linspace(400.0, 60_000.0, 500).unwrap();
//! let result = sweep(&config, &sampling).unwrap();
//!
//! assert_eq!(result.len(), 500);
//! assert!(result.is_complete());
//! ```

use serde::{Deserialize, Serialize, Serializer};

use crate::engine::evaluate_altitude;
use crate::error::{require_finite, require_non_negative, require_positive, LinkError, LinkResult};
use crate::params::{LinkConfiguration, LinkDirection};

/// Upper bound on the number of samples a sampling may produce.
pub const MAX_SAMPLES: usize = 10_000_000;

// ── Sampling ─────────────────────────────────────────────────────────────────

/// Spacing between consecutive altitudes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Spacing {
    /// Fixed number of evenly spaced points, endpoints included
    Count(usize),
    /// Fixed step (km) from the start, not exceeding the end
    StepKm(f64),
}

/// Altitude range to sweep (km).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AltitudeSampling {
    pub start_km: f64,
    pub end_km: f64,
    pub spacing: Spacing,
}

impl Default for AltitudeSampling {
    /// 500 points from 400 km to 60 000 km.
    fn default() -> Self {
        Self {
            start_km: 400.0,
            end_km: 60_000.0,
            spacing: Spacing::Count(500),
        }
    }
}

impl AltitudeSampling {
    /// `count` evenly spaced altitudes from `start_km` to `end_km` inclusive.
    pub fn linspace(start_km: f64, end_km: f64, count: usize) -> LinkResult<Self> {
        let sampling = Self {
            start_km,
            end_km,
            spacing: Spacing::Count(count),
        };
        sampling.validate()?;
        Ok(sampling)
    }

    /// Altitudes `start_km, start_km + step_km, …` up to `end_km`.
    pub fn step(start_km: f64, end_km: f64, step_km: f64) -> LinkResult<Self> {
        let sampling = Self {
            start_km,
            end_km,
            spacing: Spacing::StepKm(step_km),
        };
        sampling.validate()?;
        Ok(sampling)
    }

    pub fn validate(&self) -> LinkResult<()> {
        require_non_negative("sweep.start_km", self.start_km)?;
        require_finite("sweep.end_km", self.end_km)?;
        if self.end_km < self.start_km {
            return Err(LinkError::invalid(
                "sweep.end_km",
                format!("must be >= start_km ({}), got {}", self.start_km, self.end_km),
            ));
        }
        match self.spacing {
            Spacing::Count(0) => Err(LinkError::invalid("sweep.spacing.count", "must be >= 1")),
            Spacing::Count(n) if n > MAX_SAMPLES => Err(LinkError::invalid(
                "sweep.spacing.count",
                format!("must be <= {MAX_SAMPLES}, got {n}"),
            )),
            Spacing::Count(_) => Ok(()),
            Spacing::StepKm(step) => {
                require_positive("sweep.spacing.step_km", step)?;
                if self.step_count(step) > MAX_SAMPLES {
                    return Err(LinkError::invalid(
                        "sweep.spacing.step_km",
                        format!("produces more than {MAX_SAMPLES} samples"),
                    ));
                }
                Ok(())
            }
        }
    }

    fn step_count(&self, step_km: f64) -> usize {
        // Tolerate rounding so an end that is a whole number of steps away is kept.
        let steps = ((self.end_km - self.start_km) / step_km * (1.0 + 1e-12)).floor();
        if steps >= MAX_SAMPLES as f64 {
            usize::MAX
        } else {
            steps as usize + 1
        }
    }

    /// Number of altitudes this sampling produces.
    pub fn len(&self) -> LinkResult<usize> {
        self.validate()?;
        Ok(match self.spacing {
            Spacing::Count(n) => n,
            Spacing::StepKm(step) => self.step_count(step),
        })
    }

    /// The altitudes, ascending.
    pub fn altitudes(&self) -> LinkResult<Vec<f64>> {
        let n = self.len()?;
        let altitudes = match self.spacing {
            Spacing::Count(1) => vec![self.start_km],
            Spacing::Count(_) => {
                let delta = (self.end_km - self.start_km) / (n - 1) as f64;
                let mut values: Vec<f64> =
                    (0..n).map(|i| self.start_km + i as f64 * delta).collect();
                // Pin the last point to the requested end exactly.
                values[n - 1] = self.end_km;
                values
            }
            Spacing::StepKm(step) => (0..n)
                .map(|i| (self.start_km + i as f64 * step).min(self.end_km))
                .collect(),
        };
        Ok(altitudes)
    }
}

// ── Results ──────────────────────────────────────────────────────────────────

/// One successfully evaluated altitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepSample {
    pub altitude_km: f64,
    pub slant_range_m: f64,
    pub snr_db: f64,
    pub margin_db: f64,
}

/// One altitude that could not be evaluated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepFailure {
    /// Position in the requested altitude sequence
    pub index: usize,
    pub altitude_km: f64,
    #[serde(serialize_with = "serialize_error")]
    pub error: LinkError,
}

fn serialize_error<S: Serializer>(error: &LinkError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Horizontal reference line for SNR plots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdLine {
    pub label: String,
    pub snr_db: f64,
}

/// Threshold lines for a required SNR and margin levels, lowest first.
pub fn threshold_lines(required_snr_db: f64, margin_levels_db: &[f64]) -> Vec<ThresholdLine> {
    let mut lines = vec![ThresholdLine {
        label: format!("{required_snr_db} dB SNR"),
        snr_db: required_snr_db,
    }];
    lines.extend(margin_levels_db.iter().map(|&margin| ThresholdLine {
        label: format!("{required_snr_db} dB SNR with {margin} dB margin"),
        snr_db: required_snr_db + margin,
    }));
    lines.sort_by(|a, b| a.snr_db.total_cmp(&b.snr_db));
    lines
}

/// Axis bounds for presenting a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotBounds {
    pub altitude_min_km: f64,
    pub altitude_max_km: f64,
    pub snr_min_db: f64,
    pub snr_max_db: f64,
}

impl Default for PlotBounds {
    fn default() -> Self {
        Self {
            altitude_min_km: 400.0,
            altitude_max_km: 60_000.0,
            snr_min_db: 0.0,
            snr_max_db: 60.0,
        }
    }
}

/// Outcome of a sweep: ascending samples, per-altitude failures and the
/// threshold lines in force.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AltitudeSweepResult {
    pub direction: LinkDirection,
    pub required_snr_db: f64,
    samples: Vec<SweepSample>,
    failures: Vec<SweepFailure>,
    thresholds: Vec<ThresholdLine>,
}

impl AltitudeSweepResult {
    /// Samples in ascending altitude order.
    pub fn samples(&self) -> &[SweepSample] {
        &self.samples
    }

    /// Failed altitudes in request order.
    pub fn failures(&self) -> &[SweepFailure] {
        &self.failures
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// True when every requested altitude produced a sample.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of successful samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn threshold_lines(&self) -> &[ThresholdLine] {
        &self.thresholds
    }

    /// `(altitude_km, snr_db)` pairs.
    pub fn snr_curve(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.samples.iter().map(|s| (s.altitude_km, s.snr_db))
    }

    /// Sample with the highest SNR.
    pub fn peak_snr(&self) -> Option<&SweepSample> {
        self.samples.iter().max_by(|a, b| a.snr_db.total_cmp(&b.snr_db))
    }

    /// Sample with the lowest SNR.
    pub fn min_snr(&self) -> Option<&SweepSample> {
        self.samples.iter().min_by(|a, b| a.snr_db.total_cmp(&b.snr_db))
    }

    /// Highest altitude at which the link still meets the required SNR.
    ///
    /// Between the last closing sample and the next failing one the margin is
    /// interpolated linearly to its zero crossing. `None` when no sample
    /// closes.
    pub fn closure_altitude_km(&self) -> Option<f64> {
        let last_ok = self.samples.iter().rposition(|s| s.margin_db >= 0.0)?;
        let ok = &self.samples[last_ok];
        match self.samples.get(last_ok + 1) {
            Some(next) if next.margin_db < ok.margin_db => {
                let t = ok.margin_db / (ok.margin_db - next.margin_db);
                Some(ok.altitude_km + t * (next.altitude_km - ok.altitude_km))
            }
            _ => Some(ok.altitude_km),
        }
    }
}

// ── Orchestration ────────────────────────────────────────────────────────────

#[cfg(not(feature = "parallel"))]
fn evaluate_all(config: &LinkConfiguration, altitudes_km: &[f64]) -> Vec<LinkResult<SweepSample>> {
    altitudes_km
        .iter()
        .map(|&altitude| evaluate_altitude(config, altitude))
        .collect()
}

#[cfg(feature = "parallel")]
fn evaluate_all(config: &LinkConfiguration, altitudes_km: &[f64]) -> Vec<LinkResult<SweepSample>> {
    use rayon::prelude::*;

    // Indexed parallel collect keeps the input order.
    altitudes_km
        .par_iter()
        .map(|&altitude| evaluate_altitude(config, altitude))
        .collect()
}

/// Sweep an explicit list of altitudes (km), in any order.
///
/// Failures are recorded and excluded; samples are returned in ascending
/// altitude order.
pub fn sweep_altitudes(config: &LinkConfiguration, altitudes_km: &[f64]) -> AltitudeSweepResult {
    let params = config.params();
    let span = tracing::debug_span!(
        "sweep",
        direction = %params.direction,
        requested = altitudes_km.len()
    );
    let _guard = span.enter();

    let mut samples = Vec::with_capacity(altitudes_km.len());
    let mut failures = Vec::new();

    for (index, outcome) in evaluate_all(config, altitudes_km).into_iter().enumerate() {
        match outcome {
            Ok(sample) => samples.push(sample),
            Err(error) => {
                let altitude_km = altitudes_km[index];
                tracing::warn!(index, altitude_km, %error, "sweep sample failed");
                failures.push(SweepFailure {
                    index,
                    altitude_km,
                    error,
                });
            }
        }
    }

    samples.sort_by(|a, b| a.altitude_km.total_cmp(&b.altitude_km));

    tracing::info!(
        samples = samples.len(),
        failures = failures.len(),
        "sweep complete"
    );

    AltitudeSweepResult {
        direction: params.direction,
        required_snr_db: params.required_snr_db,
        samples,
        failures,
        thresholds: threshold_lines(params.required_snr_db, &params.margin_levels_db),
    }
}

/// Sweep a sampling; fails only if the sampling itself is invalid.
pub fn sweep(config: &LinkConfiguration, sampling: &AltitudeSampling) -> LinkResult<AltitudeSweepResult> {
    let altitudes = sampling.altitudes()?;
    Ok(sweep_altitudes(config, &altitudes))
}
