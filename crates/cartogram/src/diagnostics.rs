//! Post-run diagnostics attached to cartogram output.

use crate::geom::{area, FeatureCollection, Space};
use crate::projection::{project_with, reproject_forward, ProjectionContext};

/// Output property holding each feature's relative area error.
pub const AREA_ERROR_PROPERTY: &str = "area_error";

/// Where feature areas are measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AreaFrame {
    /// Working space of the context: spherical for a geographic map, planar
    /// after `reproject_forward` for a projected one.
    Context,
    /// Plane of the context projection, whatever the context kind. The
    /// force-field method equalizes areas here.
    ProjectionPlane,
}

impl AreaFrame {
    /// Area of every feature of `fc` (geographic coordinates), in input order.
    pub fn areas(self, fc: &FeatureCollection, ctx: &ProjectionContext) -> Vec<f64> {
        let (measured, space) = match self {
            AreaFrame::Context => (reproject_forward(fc, ctx), ctx.space()),
            AreaFrame::ProjectionPlane => (project_with(fc, ctx.projection.as_ref()), Space::Planar),
        };
        measured.features.iter().map(|f| area(&f.geometry, space)).collect()
    }
}

/// `(area_i / Σarea) / (value_i / Σvalue)` per feature; 1 means the feature's share
/// of the map matches its share of the total value.
pub fn area_errors(fc: &FeatureCollection, field: &str, space: Space) -> Vec<f64> {
    let areas: Vec<f64> = fc.features.iter().map(|f| area(&f.geometry, space)).collect();
    error_ratios(&areas, &fc.values(field))
}

fn error_ratios(areas: &[f64], values: &[f64]) -> Vec<f64> {
    let area_total: f64 = areas.iter().sum();
    let value_total: f64 = values.iter().sum();
    areas
        .iter()
        .zip(values)
        .map(|(a, v)| a / area_total / (v / value_total))
        .collect()
}

/// Store `errors` under `area_error`, one per feature in order.
pub fn set_area_errors(fc: &mut FeatureCollection, errors: &[f64]) {
    for (f, &e) in fc.features.iter_mut().zip(errors) {
        f.properties.insert(AREA_ERROR_PROPERTY.to_string(), e.into());
    }
}

/// Add `area_error` to every feature of `fc`.
pub fn annotate_area_error(fc: &mut FeatureCollection, field: &str, space: Space) {
    let errors = area_errors(fc, field, space);
    set_area_errors(fc, &errors);
}

/// Area errors of geographic `fc` with areas taken in `frame`.
pub fn area_errors_in(frame: AreaFrame, fc: &FeatureCollection, field: &str, ctx: &ProjectionContext) -> Vec<f64> {
    error_ratios(&frame.areas(fc, ctx), &fc.values(field))
}

/// Area errors measured in the working space of `ctx`.
pub fn area_errors_in_context(fc: &FeatureCollection, field: &str, ctx: &ProjectionContext) -> Vec<f64> {
    area_errors_in(AreaFrame::Context, fc, field, ctx)
}

/// [`annotate_area_error`] with areas measured in the working space of `ctx`.
pub fn annotate_area_error_in_context(fc: &mut FeatureCollection, field: &str, ctx: &ProjectionContext) {
    let errors = area_errors_in_context(fc, field, ctx);
    set_area_errors(fc, &errors);
}

/// Area errors of force-field output, measured in the plane the method ran in.
pub fn force_field_area_errors(fc: &FeatureCollection, field: &str, ctx: &ProjectionContext) -> Vec<f64> {
    area_errors_in(AreaFrame::ProjectionPlane, fc, field, ctx)
}
