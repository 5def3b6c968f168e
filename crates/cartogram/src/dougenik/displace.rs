//! Vertex displacement under the combined force field of every feature.
//!
//! Cost: O(points · features) per call; this is the hot loop of the method.

use nalgebra::Vector2;

use super::metrics::FeatureMetrics;
use crate::geom::Geometry;

/// Scalar force factor of feature `m` on a point at distance `distance` from its centre,
/// already divided by the distance so it multiplies the offset vector directly.
///
/// Far field (`distance > radius`): `mass · radius / distance`.
/// Near field: `mass · (distance/radius)² · (4 − 3·distance/radius)`; both branches
/// equal `mass` at `distance == radius`.
#[inline]
pub fn force_factor(m: &FeatureMetrics, distance: f64, reduction: f64) -> f64 {
    let f = if distance > m.radius {
        m.mass * (m.radius / distance)
    } else {
        let t = distance / m.radius;
        m.mass * t * t * (4.0 - 3.0 * t)
    };
    f * reduction / distance
}

/// New position of `p0`: every feature pushes along `p0 − center`, measured from
/// the start position; contributions add up.
#[inline]
pub fn displace_point(p0: Vector2<f64>, field: &[FeatureMetrics], reduction: f64) -> Vector2<f64> {
    let mut p = p0;
    for m in field {
        let offset = p0 - m.center;
        p += offset * force_factor(m, offset.norm(), reduction);
    }
    p
}

/// Geometry with every coordinate displaced; structure and type are kept.
pub fn displace_geometry(geom: &Geometry, field: &[FeatureMetrics], reduction: f64) -> Geometry {
    geom.map_coords(|p| displace_point(p, field, reduction))
}
