//! Slant-range geometry over a spherical Earth
//!
//! A ground station sees a spacecraft at a fixed elevation angle `θ`. With
//! Earth radius `Re` and orbit radius `Ro = Re + h`, the straight-line
//! distance between the two is
//!
//! ```text
//! d = Re · ( sqrt( (Ro/Re)² − cos²θ ) − sinθ )
//! ```
//!
//! ```text
//!              spacecraft
//!                 *
//!                /|
//!             d /  | h
//!              /   |
//!   station  o-θ---+---- local horizon
//!             \    |
//!           Re \   | Re
//!               \  |
//!                 ⊕  Earth centre
//! ```
//!
//! ## Example
//!
//! ```rust
//! use satlink_core::geometry::slant_range_m;
//!
//! // Straight overhead the slant range is simply the altitude.
//! let d = slant_range_m(6378.14, 400.0, 90.0).unwrap();
//! assert!((d - 400_000.0).abs() < 1e-6);
//! ```

use crate::error::{require_finite, require_non_negative, require_positive, LinkError, LinkResult};

/// Slant range in meters from a ground station to a spacecraft.
///
/// * `earth_radius_km` - Earth radius (km, > 0)
/// * `altitude_km` - spacecraft altitude above the surface (km, >= 0)
/// * `elevation_deg` - elevation angle at the ground station (degrees, [0, 90])
///
/// `θ = 0` is accepted and yields the (large, finite) horizon range. Negative
/// altitudes and elevations outside [0, 90] are configuration errors. A
/// negative radicand fails with [`LinkError::GeometryDomain`] rather than
/// producing NaN.
pub fn slant_range_m(earth_radius_km: f64, altitude_km: f64, elevation_deg: f64) -> LinkResult<f64> {
    require_positive("earth_radius_km", earth_radius_km)?;
    require_non_negative("altitude_km", altitude_km)?;
    require_finite("elevation_deg", elevation_deg)?;
    if !(0.0..=90.0).contains(&elevation_deg) {
        return Err(LinkError::invalid(
            "elevation_deg",
            format!("must be in [0, 90], got {elevation_deg}"),
        ));
    }

    let elevation_rad = elevation_deg.to_radians();
    let (sin_el, cos_el) = elevation_rad.sin_cos();
    let radius_ratio = (earth_radius_km + altitude_km) / earth_radius_km;
    let radicand = horizon_radicand(radius_ratio, cos_el, altitude_km, elevation_deg)?;

    // At h = 0 the exact result is 0 and rounding may leave a tiny negative residue.
    let earth_radius_m = earth_radius_km * 1e3;
    Ok((earth_radius_m * (radicand.sqrt() - sin_el)).max(0.0))
}

/// `(Ro/Re)² − cos²θ`, which is negative for a target below the local horizon.
fn horizon_radicand(
    radius_ratio: f64,
    cos_el: f64,
    altitude_km: f64,
    elevation_deg: f64,
) -> LinkResult<f64> {
    let radicand = radius_ratio * radius_ratio - cos_el * cos_el;
    if radicand < 0.0 {
        return Err(LinkError::GeometryDomain {
            altitude_km,
            elevation_deg,
            reason: format!("target below local horizon (radicand {radicand:.3e} < 0)"),
        });
    }
    Ok(radicand)
}

/// Slant range in kilometers; see [`slant_range_m`].
pub fn slant_range_km(earth_radius_km: f64, altitude_km: f64, elevation_deg: f64) -> LinkResult<f64> {
    slant_range_m(earth_radius_km, altitude_km, elevation_deg).map(|m| m / 1e3)
}
