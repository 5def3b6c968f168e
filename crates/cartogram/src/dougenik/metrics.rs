//! Per-iteration metrics: one `FeatureMetrics` per feature, plus the
//! collection-wide `IterationState` derived from them.

use std::f64::consts::PI;

use nalgebra::Vector2;

use crate::geom::{area, centroid, FeatureCollection, Space};

/// Force-field inputs for one feature, recomputed from the current geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FeatureMetrics {
    pub center: Vector2<f64>,
    pub value: f64,
    pub area: f64,
    /// Area the feature should have: `value · Σarea / Σvalue`.
    pub desired: f64,
    /// Radius of the circle with the feature's current area.
    pub radius: f64,
    /// Signed: positive grows the feature, negative shrinks it.
    pub mass: f64,
    /// `max(area, desired) / min(area, desired)`; 1 when on target.
    pub size_error: f64,
}

/// Collection-wide state of one iteration.
#[derive(Clone, Debug, PartialEq)]
pub struct IterationState {
    pub average_error: f64,
    pub force_reduction_factor: f64,
    pub features: Vec<FeatureMetrics>,
}

/// Metrics of `fc` (planar coordinates) for attribute `field`.
///
/// `Σvalue == 0` gives non-finite desired areas; not guarded.
pub fn compute_metrics(fc: &FeatureCollection, field: &str) -> IterationState {
    let areas: Vec<f64> = fc.features.iter().map(|f| area(&f.geometry, Space::Planar)).collect();
    let values = fc.values(field);
    let area_total: f64 = areas.iter().sum();
    let value_total: f64 = values.iter().sum();
    let fraction = area_total / value_total;

    let features: Vec<FeatureMetrics> = fc
        .features
        .iter()
        .zip(areas.iter().zip(&values))
        .map(|(f, (&a, &v))| {
            let desired = v * fraction;
            let radius = (a / PI).sqrt();
            let mass = if desired / PI > 0.0 {
                (desired / PI).sqrt() - radius
            } else {
                0.0
            };
            FeatureMetrics {
                center: centroid(&f.geometry),
                value: v,
                area: a,
                desired,
                radius,
                mass,
                size_error: a.max(desired) / a.min(desired),
            }
        })
        .collect();

    let average_error = features.iter().map(|m| m.size_error).sum::<f64>() / features.len() as f64;
    IterationState {
        average_error,
        force_reduction_factor: 1.0 / (1.0 + average_error),
        features,
    }
}
