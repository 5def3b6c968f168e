//! Area and centroid primitives.
//!
//! Planar area is the absolute shoelace sum; spherical area is the spherical
//! excess of each ring on a sphere of radius [`EARTH_RADIUS`] (square metres),
//! for coordinates given as longitude/latitude in degrees.
//! Both follow the same composition rules: polygon = exterior − holes,
//! multipolygon = sum of parts.

use nalgebra::Vector2;

use super::types::{open_vertices, Geometry, Polygon, Ring};

/// Sphere radius used for spherical areas and rhumb-line scaling (metres).
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Area model used by the primitives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Space {
    /// Projected coordinates in linear units.
    Planar,
    /// Longitude/latitude in degrees on a sphere.
    Spherical,
}

/// Signed shoelace area of a ring; positive for counter-clockwise rings.
pub fn signed_ring_area(ring: &Ring) -> f64 {
    let pts = open_vertices(ring);
    let n = pts.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let a = pts[i];
        let b = pts[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

/// Unsigned spherical-excess area of a lon/lat ring, in square metres.
pub fn spherical_ring_area(ring: &Ring) -> f64 {
    let pts = open_vertices(ring);
    let n = pts.len();
    if n < 3 {
        return 0.0;
    }
    let mut total = 0.0;
    for i in 0..n {
        let lower = pts[(i + n - 1) % n];
        let middle = pts[i];
        let upper = pts[(i + 1) % n];
        total += (upper.x.to_radians() - lower.x.to_radians()) * middle.y.to_radians().sin();
    }
    (total * EARTH_RADIUS * EARTH_RADIUS / 2.0).abs()
}

#[inline]
fn ring_area(ring: &Ring, space: Space) -> f64 {
    match space {
        Space::Planar => signed_ring_area(ring).abs(),
        Space::Spherical => spherical_ring_area(ring),
    }
}

/// Exterior area minus the area of every hole.
pub fn polygon_area(poly: &Polygon, space: Space) -> f64 {
    let Some(exterior) = poly.exterior() else {
        return 0.0;
    };
    let holes: f64 = poly.holes().iter().map(|h| ring_area(h, space)).sum();
    ring_area(exterior, space) - holes
}

/// Area of a geometry; a multipolygon counts every part.
pub fn area(geom: &Geometry, space: Space) -> f64 {
    geom.polygons().iter().map(|p| polygon_area(p, space)).sum()
}

/// Part with the largest area, for callers that need one representative polygon.
/// Ties keep the first part. `None` only for an empty multipolygon.
pub fn largest_polygon(geom: &Geometry, space: Space) -> Option<&Polygon> {
    let mut best: Option<(&Polygon, f64)> = None;
    for p in geom.polygons() {
        let a = polygon_area(p, space);
        if best.map_or(true, |(_, b)| a > b) {
            best = Some((p, a));
        }
    }
    best.map(|(p, _)| p)
}

/// Arithmetic mean of every ring vertex, closing vertices excluded.
///
/// Not guaranteed to lie inside a concave polygon. An empty geometry yields NaN.
pub fn centroid(geom: &Geometry) -> Vector2<f64> {
    let mut sum = Vector2::zeros();
    let mut count = 0usize;
    for ring in geom.rings() {
        for p in open_vertices(ring) {
            sum += p;
            count += 1;
        }
    }
    sum / count as f64
}
