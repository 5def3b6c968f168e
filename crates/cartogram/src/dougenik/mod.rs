//! Force-field cartogram (Dougenik, Chrisman & Niemeyer, 1985).
//!
//! Purpose
//! - Move every vertex of every feature under the "gravity" of all features,
//!   where each feature's mass is the radius gap between its current circle and
//!   the circle of the area its value asks for. Repeat for a fixed number of
//!   iterations, recomputing the metrics from the moved geometry each time.
//!
//! Complexity
//! - O(iterations · points · features): every point feels every feature. No
//!   spatial index is used, so results do not depend on any cut-off.
//!
//! Termination
//! - Exactly `iterations` passes; there is no early stop on `average_error`.
//!   Zero iterations returns the input geometry.
//!
//! Layout
//! - `metrics.rs`: `FeatureMetrics`, `IterationState`, `compute_metrics`.
//! - `displace.rs`: force law and per-vertex displacement.

mod displace;
mod metrics;

pub use displace::{displace_geometry, displace_point, force_factor};
pub use metrics::{compute_metrics, FeatureMetrics, IterationState};

use crate::geom::{normalize_orientation, FeatureCollection};
use crate::projection::{project_with, unproject_with, ProjectionContext};

/// One force-field pass over `fc`.
pub fn step(fc: &FeatureCollection, state: &IterationState) -> FeatureCollection {
    FeatureCollection {
        features: fc
            .features
            .iter()
            .map(|f| {
                f.with_geometry(displace_geometry(
                    &f.geometry,
                    &state.features,
                    state.force_reduction_factor,
                ))
            })
            .collect(),
    }
}

/// Run `iterations` passes on planar coordinates. Input is not mutated.
pub fn force_field(fc: &FeatureCollection, field: &str, iterations: usize) -> FeatureCollection {
    let mut current = fc.clone();
    for i in 0..iterations {
        let state = compute_metrics(&current, field);
        tracing::debug!(
            iteration = i,
            average_error = state.average_error,
            force_reduction_factor = state.force_reduction_factor,
            "force-field iteration"
        );
        current = step(&current, &state);
    }
    current
}

/// Like [`force_field`], also returning the metrics of the final geometry.
pub fn force_field_with_metrics(
    fc: &FeatureCollection,
    field: &str,
    iterations: usize,
) -> (FeatureCollection, IterationState) {
    let out = force_field(fc, field, iterations);
    let state = compute_metrics(&out, field);
    (out, state)
}

/// Force-field cartogram of geographic input.
///
/// The method needs a plane, so coordinates always go through the context
/// projection (the display projection for a geographic context) and back.
/// Rings are orientation-normalized on the way out.
pub fn force_field_cartogram(
    fc: &FeatureCollection,
    field: &str,
    iterations: usize,
    ctx: &ProjectionContext,
) -> FeatureCollection {
    let projected = project_with(fc, ctx.projection.as_ref());
    let moved = force_field(&projected, field, iterations);
    normalize_orientation(&unproject_with(&moved, ctx.projection.as_ref()))
}
