//! Uniform scaling of a geometry about an origin.
//!
//! - Planar: `p ↦ o + (p − o)·k`.
//! - Spherical: each vertex keeps its rhumb bearing from `o` while its rhumb
//!   distance is multiplied by `k`. Works on the unit sphere; the radius cancels.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use nalgebra::Vector2;

use super::measure::Space;
use super::types::Geometry;

/// Below this |Δψ| the rhumb line is treated as an east-west course.
const RHUMB_EPS: f64 = 1e-11;

/// Scale `geom` about `origin` by `factor`. `factor == 1` returns an unchanged copy.
pub fn scale_geometry(geom: &Geometry, origin: Vector2<f64>, factor: f64, space: Space) -> Geometry {
    if factor == 1.0 {
        return geom.clone();
    }
    match space {
        Space::Planar => geom.map_coords(|p| origin + (p - origin) * factor),
        Space::Spherical => geom.map_coords(|p| {
            let (dist, bearing) = rhumb_distance_bearing(origin, p);
            rhumb_destination(origin, dist * factor, bearing)
        }),
    }
}

#[inline]
fn mercator_psi(phi: f64) -> f64 {
    (phi / 2.0 + FRAC_PI_4).tan().ln()
}

/// Signed longitude difference wrapped to (−π, π].
#[inline]
fn wrap_delta_lambda(mut d: f64) -> f64 {
    if d > PI {
        d -= 2.0 * PI;
    } else if d < -PI {
        d += 2.0 * PI;
    }
    d
}

/// Angular rhumb distance (radians) and bearing (radians, clockwise from north)
/// from `from` to `to`, both lon/lat in degrees.
pub(crate) fn rhumb_distance_bearing(from: Vector2<f64>, to: Vector2<f64>) -> (f64, f64) {
    let phi1 = from.y.to_radians();
    let phi2 = to.y.to_radians();
    let d_phi = phi2 - phi1;
    let d_lambda = wrap_delta_lambda((to.x - from.x).to_radians());
    let d_psi = mercator_psi(phi2) - mercator_psi(phi1);
    let q = if d_psi.abs() > RHUMB_EPS {
        d_phi / d_psi
    } else {
        phi1.cos()
    };
    let dist = (d_phi * d_phi + q * q * d_lambda * d_lambda).sqrt();
    let bearing = d_lambda.atan2(d_psi);
    (dist, bearing)
}

/// Point reached from `origin` after angular distance `dist` along `bearing`.
pub(crate) fn rhumb_destination(origin: Vector2<f64>, dist: f64, bearing: f64) -> Vector2<f64> {
    let phi1 = origin.y.to_radians();
    let lambda1 = origin.x.to_radians();
    let d_phi = dist * bearing.cos();
    let mut phi2 = phi1 + d_phi;
    // past a pole: reflect back
    if phi2.abs() > FRAC_PI_2 {
        phi2 = if phi2 > 0.0 { PI - phi2 } else { -PI - phi2 };
    }
    let d_psi = mercator_psi(phi2) - mercator_psi(phi1);
    let q = if d_psi.abs() > RHUMB_EPS {
        d_phi / d_psi
    } else {
        phi1.cos()
    };
    let d_lambda = dist * bearing.sin() / q;
    let mut lon = (lambda1 + d_lambda).to_degrees();
    let lat = phi2.to_degrees();
    if lon - origin.x > 180.0 {
        lon -= 360.0;
    } else if origin.x - lon > 180.0 {
        lon += 360.0;
    }
    Vector2::new(lon, lat)
}
