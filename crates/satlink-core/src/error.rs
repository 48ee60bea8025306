//! Error types for link-budget computations
//!
//! Three families of failure exist:
//!
//! - **Configuration** errors are detected once, when a [`LinkConfiguration`]
//!   or an [`AltitudeSampling`] is constructed, and name the offending field.
//!   A negative altitude in an explicit altitude list is reported the same
//!   way for that sample.
//! - **Geometry** errors come from the slant-range formula when the target is
//!   below the local horizon for the requested elevation.
//! - **Numeric** errors come from a logarithm of a non-positive argument in
//!   the loss, path-loss or noise-floor formulas.
//!
//! During a sweep, per-altitude errors of any family are recorded and never
//! abort the run.
//!
//! [`LinkConfiguration`]: crate::params::LinkConfiguration
//! [`AltitudeSampling`]: crate::sweep::AltitudeSampling

/// Result type for link-budget operations
pub type LinkResult<T> = Result<T, LinkError>;

/// Errors that can occur while building or evaluating a link budget
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LinkError {
    #[error("invalid configuration: {field} {reason}")]
    InvalidConfiguration { field: &'static str, reason: String },

    #[error(
        "geometry domain error at altitude {altitude_km} km, elevation {elevation_deg} deg: {reason}"
    )]
    GeometryDomain {
        altitude_km: f64,
        elevation_deg: f64,
        reason: String,
    },

    #[error("numeric domain error in {quantity}: log10 of non-positive value {value:e}")]
    NumericDomain { quantity: &'static str, value: f64 },
}

impl LinkError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        LinkError::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }

    /// True for errors raised by the slant-range formula.
    pub fn is_geometry(&self) -> bool {
        matches!(self, LinkError::GeometryDomain { .. })
    }

    /// True for errors raised by a logarithm of a non-positive argument.
    pub fn is_numeric(&self) -> bool {
        matches!(self, LinkError::NumericDomain { .. })
    }

    /// True for errors raised while validating inputs.
    pub fn is_configuration(&self) -> bool {
        matches!(self, LinkError::InvalidConfiguration { .. })
    }
}

/// Reject NaN and infinities with a field-named configuration error.
pub(crate) fn require_finite(field: &'static str, value: f64) -> LinkResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(LinkError::invalid(field, format!("must be finite, got {value}")))
    }
}

/// Reject values that are not strictly positive (including NaN).
pub(crate) fn require_positive(field: &'static str, value: f64) -> LinkResult<f64> {
    require_finite(field, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(LinkError::invalid(field, format!("must be > 0, got {value}")))
    }
}

/// Reject negative values (including NaN).
pub(crate) fn require_non_negative(field: &'static str, value: f64) -> LinkResult<f64> {
    require_finite(field, value)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(LinkError::invalid(field, format!("must be >= 0, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_names_field() {
        let err = require_positive("bandwidth_hz", 0.0).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("bandwidth_hz"), "message was: {msg}");
        assert!(err.is_configuration());
    }

    #[test]
    fn test_nan_is_rejected() {
        assert!(require_finite("frequency_hz", f64::NAN).is_err());
        assert!(require_positive("frequency_hz", f64::NAN).is_err());
        assert!(require_non_negative("frequency_hz", f64::INFINITY).is_err());
    }

    #[test]
    fn test_classification() {
        let geo = LinkError::GeometryDomain {
            altitude_km: -100.0,
            elevation_deg: 5.0,
            reason: "below horizon".into(),
        };
        assert!(geo.is_geometry());
        assert!(!geo.is_numeric());

        let num = LinkError::NumericDomain {
            quantity: "free-space path loss",
            value: 0.0,
        };
        assert!(num.is_numeric());
        assert!(num.to_string().contains("free-space path loss"));
    }

    #[test]
    fn test_non_negative_accepts_zero() {
        assert_eq!(require_non_negative("rain_db", 0.0), Ok(0.0));
        assert!(require_non_negative("rain_db", -0.1).is_err());
    }
}
