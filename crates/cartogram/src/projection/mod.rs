//! Conversion between geographic input coordinates and the plane the methods compute in.
//!
//! - `Projection`: forward (lon/lat degrees → plane) and inverse, per coordinate.
//! - `ProjectionContext`: whether the map works in geographic or planar
//!   coordinates, plus the projection in use. One context per call.
//! - `reproject_forward/backward`: identity for a geographic context.
//! - `project_with/unproject_with`: unconditional, for methods that always need a plane.

mod builtin;

use std::fmt;
use std::sync::Arc;

use nalgebra::Vector2;

use crate::error::Error;
use crate::geom::{FeatureCollection, Space};

pub use builtin::{Equirectangular, Identity, LambertAzimuthalEqualArea, WebMercator, MERCATOR_MAX_LAT};

/// Per-coordinate map projection.
pub trait Projection: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;
    /// Geographic (lon, lat) in degrees → planar (x, y).
    fn forward(&self, lonlat: Vector2<f64>) -> Vector2<f64>;
    /// Planar (x, y) → geographic (lon, lat) in degrees.
    fn inverse(&self, xy: Vector2<f64>) -> Vector2<f64>;
}

/// Coordinate system the map works in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectionKind {
    /// Longitude/latitude in degrees; the projection is display-only.
    Geographic,
    /// Projected coordinates in linear units.
    Planar,
}

/// Projection tag plus definition, shared by every feature of one call.
#[derive(Clone, Debug)]
pub struct ProjectionContext {
    pub kind: ProjectionKind,
    pub projection: Arc<dyn Projection>,
}

impl ProjectionContext {
    /// Geographic map drawn with `display` (used only by methods that need a plane).
    pub fn geographic(display: Arc<dyn Projection>) -> Self {
        Self {
            kind: ProjectionKind::Geographic,
            projection: display,
        }
    }

    /// Planar map in the coordinate system defined by `crs`.
    pub fn planar(crs: Arc<dyn Projection>) -> Self {
        Self {
            kind: ProjectionKind::Planar,
            projection: crs,
        }
    }

    #[inline]
    pub fn is_geographic(&self) -> bool {
        self.kind == ProjectionKind::Geographic
    }

    /// Area model matching the working space of this context.
    #[inline]
    pub fn space(&self) -> Space {
        match self.kind {
            ProjectionKind::Geographic => Space::Spherical,
            ProjectionKind::Planar => Space::Planar,
        }
    }
}

impl Default for ProjectionContext {
    fn default() -> Self {
        Self::geographic(Arc::new(Equirectangular))
    }
}

/// Resolve a projection by name or EPSG code.
pub fn projection_from_name(name: &str) -> Result<Arc<dyn Projection>, Error> {
    let p: Arc<dyn Projection> = match name.trim().to_ascii_lowercase().as_str() {
        "equirectangular" | "epsg:4326" | "epsg:4087" => Arc::new(Equirectangular),
        "mercator" | "webmercator" | "epsg:3857" => Arc::new(WebMercator),
        "laea" | "epsg:3035" => Arc::new(LambertAzimuthalEqualArea::europe()),
        "identity" => Arc::new(Identity),
        _ => return Err(Error::UnknownProjection(name.to_string())),
    };
    Ok(p)
}

/// Project every coordinate with `projection`.
pub fn project_with(fc: &FeatureCollection, projection: &dyn Projection) -> FeatureCollection {
    fc.map_coords(|p| projection.forward(p))
}

/// Inverse-project every coordinate with `projection`.
pub fn unproject_with(fc: &FeatureCollection, projection: &dyn Projection) -> FeatureCollection {
    fc.map_coords(|p| projection.inverse(p))
}

/// Into the computation space: identity for a geographic context.
///
/// Round trips through `reproject_backward` are exact only where the projection
/// is invertible; [`WebMercator`] clamps latitudes beyond ±[`MERCATOR_MAX_LAT`],
/// so such vertices come back on the clamp latitude.
pub fn reproject_forward(fc: &FeatureCollection, ctx: &ProjectionContext) -> FeatureCollection {
    match ctx.kind {
        ProjectionKind::Geographic => fc.clone(),
        ProjectionKind::Planar => project_with(fc, ctx.projection.as_ref()),
    }
}

/// Back from the computation space: identity for a geographic context.
pub fn reproject_backward(fc: &FeatureCollection, ctx: &ProjectionContext) -> FeatureCollection {
    match ctx.kind {
        ProjectionKind::Geographic => fc.clone(),
        ProjectionKind::Planar => unproject_with(fc, ctx.projection.as_ref()),
    }
}
