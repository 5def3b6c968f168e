//! Bridge to an external diffusion cartogram solver (Gastner–Seguy–More).
//!
//! Purpose
//! - Hand a collection and a field name to a compiled solver and adapt its
//!   input/output to the map: reproject for planar maps, project back,
//!   normalize ring orientation.
//!
//! Lifecycle
//! - The solver is loaded lazily, at most once per `SolverHandle`. Concurrent
//!   first calls wait for the same load. A failed load leaves the handle empty;
//!   the next call tries again. There is no teardown.
//!
//! Errors
//! - Load and solve failures come back as the `SolverError` the solver produced,
//!   unchanged. No retries.

mod command;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::error::SolverError;
use crate::geom::{normalize_orientation, FeatureCollection};
use crate::projection::{reproject_backward, reproject_forward, ProjectionContext};

pub use command::{CommandLoader, CommandSolver};

/// A loaded diffusion solver.
#[async_trait]
pub trait DiffusionSolver: Send + Sync {
    /// Cartogram of `fc` for attribute `field`, same features in the same order.
    async fn make_cartogram(
        &self,
        fc: &FeatureCollection,
        field: &str,
    ) -> Result<FeatureCollection, SolverError>;
}

/// One-time initialization of a solver.
#[async_trait]
pub trait SolverLoader: Send + Sync {
    async fn load(&self) -> Result<Arc<dyn DiffusionSolver>, SolverError>;
}

/// Injectable solver handle with a write-once cell.
pub struct SolverHandle {
    loader: Box<dyn SolverLoader>,
    cell: OnceCell<Arc<dyn DiffusionSolver>>,
}

impl SolverHandle {
    pub fn new(loader: impl SolverLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            cell: OnceCell::new(),
        }
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }

    /// The loaded solver, loading it on first use.
    pub async fn solver(&self) -> Result<Arc<dyn DiffusionSolver>, SolverError> {
        let s = self
            .cell
            .get_or_try_init(|| async {
                tracing::debug!("loading diffusion solver");
                self.loader.load().await
            })
            .await?;
        Ok(Arc::clone(s))
    }

    /// Diffusion cartogram of geographic input under `ctx`.
    ///
    /// Planar context: the solver sees projected coordinates and its result is
    /// projected back. Geographic context: the solver sees lon/lat as given.
    pub async fn solve(
        &self,
        fc: &FeatureCollection,
        field: &str,
        ctx: &ProjectionContext,
    ) -> Result<FeatureCollection, SolverError> {
        let solver = self.solver().await?;
        let input = reproject_forward(fc, ctx);
        let result = solver.make_cartogram(&input, field).await?;
        Ok(normalize_orientation(&reproject_backward(&result, ctx)))
    }
}

impl fmt::Debug for SolverHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolverHandle")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

#[cfg(test)]
mod tests;
