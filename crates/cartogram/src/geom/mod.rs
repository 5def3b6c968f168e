//! Geometry primitives shared by the cartogram methods.
//!
//! Purpose
//! - Feature/geometry types (`Ring`, `Polygon`, `Geometry`, `Feature`, `FeatureCollection`).
//! - Area (planar or spherical), vertex-mean centroid, largest-part selection.
//! - Uniform scaling about a point (affine or along rhumb lines).
//! - Ring orientation normalization applied to every result leaving the engine.
//!
//! Conventions
//! - Rings are closed (first == last); helpers that build rings close them.
//! - Geometry is never repaired: self-intersecting rings go through unchanged.

mod measure;
mod orient;
mod transform;
mod types;

pub use measure::{
    area, centroid, largest_polygon, polygon_area, signed_ring_area, spherical_ring_area, Space,
    EARTH_RADIUS,
};
pub use orient::{is_normalized, normalize_geometry, normalize_orientation};
pub use transform::scale_geometry;
pub use types::{numeric_value, Feature, FeatureCollection, Geometry, Polygon, Ring};
pub(crate) use types::{close_ring, open_vertices};

#[cfg(test)]
mod tests;
