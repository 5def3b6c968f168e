//! Cartogram construction: distort polygon features so that each feature's
//! area follows a numeric attribute while the map stays recognizable.
//!
//! Methods (pick one per call, see [`Method`]):
//! - `olson`: single-pass scaling of each feature about its centroid.
//! - `dougenik`: iterative force field acting on every vertex.
//! - `solver`: bridge to an external diffusion solver, loaded once per handle.
//!
//! Data flow: reprojection → method → ring orientation normalization.
//! Input coordinates are geographic (lon/lat degrees); the [`ProjectionContext`]
//! says whether the map works in that space or in a projected plane.
//!
//! Degenerate input (zero-area features, all-zero values) is not filtered and
//! shows up as non-finite numbers in the output.

pub mod diagnostics;
pub mod dougenik;
pub mod error;
pub mod geojson;
pub mod geom;
pub mod method;
pub mod olson;
pub mod projection;
pub mod rand;
pub mod solver;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{Error, SolverError};
pub use method::{compute, Method};
pub use projection::{ProjectionContext, ProjectionKind};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::diagnostics::{
        annotate_area_error, annotate_area_error_in_context, area_errors, force_field_area_errors, AreaFrame,
    };
    pub use crate::dougenik::{force_field, force_field_cartogram, FeatureMetrics, IterationState};
    pub use crate::geom::{
        area, centroid, normalize_orientation, Feature, FeatureCollection, Geometry, Polygon, Ring,
        Space,
    };
    pub use crate::method::{compute, Method};
    pub use crate::olson::{scale, scaling_cartogram};
    pub use crate::projection::{
        projection_from_name, reproject_backward, reproject_forward, Projection, ProjectionContext,
        ProjectionKind,
    };
    pub use crate::solver::{CommandLoader, DiffusionSolver, SolverHandle, SolverLoader};
    pub use crate::{Error, SolverError};
    pub use nalgebra::Vector2 as Vec2;
}
