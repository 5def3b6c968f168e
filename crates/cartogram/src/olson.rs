//! Single-pass scaling cartogram (Olson-style non-contiguous cartogram).
//!
//! Each feature is shrunk or grown uniformly about its own centroid so that its
//! value density matches the feature with the largest value, which keeps its size.
//!
//! - Reference: the first feature (input order) holding the maximum value.
//! - `scale_i = sqrt((value_i / area_i) / (value_ref / area_ref))`, reference = 1.
//! - The factor is stored in the output properties under [`SCALE_PROPERTY`].
//!
//! Degenerate input (zero area, all-zero values) yields non-finite factors; it is
//! not filtered here.

use crate::geom::{area, centroid, normalize_orientation, scale_geometry, FeatureCollection, Space};
use crate::projection::{reproject_backward, reproject_forward, ProjectionContext};

/// Output property holding each feature's scale factor.
pub const SCALE_PROPERTY: &str = "scale";

/// Index of the first maximum of `values`. `None` for an empty slice.
pub fn reference_index(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if best.map_or(true, |(_, b)| v > b) {
            best = Some((i, v));
        }
    }
    best.map(|(i, _)| i)
}

/// Per-feature scale factors relative to the reference feature.
pub fn scale_factors(areas: &[f64], values: &[f64]) -> Vec<f64> {
    debug_assert_eq!(areas.len(), values.len());
    let Some(r) = reference_index(values) else {
        return Vec::new();
    };
    if values[r] <= 0.0 {
        tracing::warn!(reference = r, value = values[r], "scaling reference value is not positive");
    }
    let ref_scale = values[r] / areas[r];
    areas
        .iter()
        .zip(values)
        .enumerate()
        .map(|(i, (&a, &v))| {
            if i == r {
                1.0
            } else {
                (v / a / ref_scale).sqrt()
            }
        })
        .collect()
}

/// Scale every feature about its centroid, in the coordinates it is given in.
///
/// `space` picks planar (affine) or spherical (rhumb-line) area and scaling.
/// Input is not mutated; output keeps feature order and gains a `scale` property.
pub fn scale(fc: &FeatureCollection, field: &str, space: Space) -> FeatureCollection {
    let areas: Vec<f64> = fc.features.iter().map(|f| area(&f.geometry, space)).collect();
    let values = fc.values(field);
    let factors = scale_factors(&areas, &values);

    let features = fc
        .features
        .iter()
        .zip(&factors)
        .map(|(f, &k)| {
            let origin = centroid(&f.geometry);
            let mut out = f.with_geometry(scale_geometry(&f.geometry, origin, k, space));
            out.properties.insert(SCALE_PROPERTY.to_string(), k.into());
            out
        })
        .collect();
    FeatureCollection { features }
}

/// Scaling cartogram of geographic input under `ctx`.
///
/// Geographic context: spherical area and rhumb-line scaling on lon/lat.
/// Planar context: reproject, planar scaling, project back.
/// Rings are orientation-normalized on the way out.
pub fn scaling_cartogram(fc: &FeatureCollection, field: &str, ctx: &ProjectionContext) -> FeatureCollection {
    let working = reproject_forward(fc, ctx);
    let scaled = scale(&working, field, ctx.space());
    normalize_orientation(&reproject_backward(&scaled, ctx))
}
