//! Ring orientation normalization.
//!
//! Canonical convention: RFC 7946 right-hand rule. Exterior rings run
//! counter-clockwise and holes clockwise in the x/y plane. The check uses the
//! sign of the shoelace area, so zero-area rings are left as they are.

use super::measure::signed_ring_area;
use super::types::{FeatureCollection, Geometry, Polygon, Ring};

/// Reverse `ring` in place unless its signed area already has the wanted sign.
fn orient_ring(ring: &mut Ring, counter_clockwise: bool) {
    let a = signed_ring_area(ring);
    if (counter_clockwise && a < 0.0) || (!counter_clockwise && a > 0.0) {
        ring.reverse();
    }
}

fn orient_polygon(poly: &mut Polygon) {
    for (i, ring) in poly.rings.iter_mut().enumerate() {
        orient_ring(ring, i == 0);
    }
}

/// Geometry with every exterior counter-clockwise and every hole clockwise.
pub fn normalize_geometry(geom: &Geometry) -> Geometry {
    let mut out = geom.clone();
    for poly in out.polygons_mut() {
        orient_polygon(poly);
    }
    out
}

/// Orientation-normalized copy of a collection. Idempotent.
pub fn normalize_orientation(fc: &FeatureCollection) -> FeatureCollection {
    FeatureCollection {
        features: fc
            .features
            .iter()
            .map(|f| f.with_geometry(normalize_geometry(&f.geometry)))
            .collect(),
    }
}

/// True when every ring already follows the canonical convention.
pub fn is_normalized(geom: &Geometry) -> bool {
    geom.polygons().iter().all(|p| {
        p.rings.iter().enumerate().all(|(i, r)| {
            let a = signed_ring_area(r);
            if i == 0 {
                a >= 0.0
            } else {
                a <= 0.0
            }
        })
    })
}
