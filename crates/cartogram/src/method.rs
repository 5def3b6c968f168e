//! One entry point for the three cartogram methods.

use crate::dougenik::force_field_cartogram;
use crate::error::Error;
use crate::geom::FeatureCollection;
use crate::olson::scaling_cartogram;
use crate::projection::ProjectionContext;
use crate::solver::SolverHandle;

/// Cartogram method and the parameters only it needs.
#[derive(Clone, Copy, Debug)]
pub enum Method<'a> {
    /// Per-feature scaling about the centroid (Olson).
    Scaling,
    /// Iterative force field (Dougenik et al.); runs exactly `iterations` passes.
    ForceField { iterations: usize },
    /// Diffusion cartogram computed by an external solver (Gastner–Seguy–More).
    Diffusion { solver: &'a SolverHandle },
}

impl Method<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Method::Scaling => "scaling",
            Method::ForceField { .. } => "force-field",
            Method::Diffusion { .. } => "diffusion",
        }
    }
}

/// Cartogram of `fc` (geographic coordinates) sized by attribute `field`.
///
/// Output has the input's features in the input's order, transformed geometry,
/// extended properties and right-hand-rule ring orientation.
pub async fn compute(
    fc: &FeatureCollection,
    field: &str,
    method: Method<'_>,
    ctx: &ProjectionContext,
) -> Result<FeatureCollection, Error> {
    tracing::info!(method = method.name(), features = fc.len(), field, "cartogram start");
    let out = match method {
        Method::Scaling => scaling_cartogram(fc, field, ctx),
        Method::ForceField { iterations } => force_field_cartogram(fc, field, iterations, ctx),
        Method::Diffusion { solver } => solver.solve(fc, field, ctx).await.map_err(Error::Solver)?,
    };
    tracing::info!(method = method.name(), features = out.len(), "cartogram done");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SolverError;
    use crate::geom::{Feature, Geometry, Polygon};
    use crate::projection::Equirectangular;
    use crate::solver::{DiffusionSolver, SolverLoader};
    use async_trait::async_trait;
    use serde_json::{json, Map};
    use std::sync::Arc;

    struct Echo;

    #[async_trait]
    impl DiffusionSolver for Echo {
        async fn make_cartogram(
            &self,
            fc: &FeatureCollection,
            _field: &str,
        ) -> Result<FeatureCollection, SolverError> {
            Ok(fc.clone())
        }
    }

    struct BrokenLoader;

    #[async_trait]
    impl SolverLoader for BrokenLoader {
        async fn load(&self) -> Result<Arc<dyn DiffusionSolver>, SolverError> {
            Err("module failed to instantiate".into())
        }
    }

    struct EchoLoader;

    #[async_trait]
    impl SolverLoader for EchoLoader {
        async fn load(&self) -> Result<Arc<dyn DiffusionSolver>, SolverError> {
            Ok(Arc::new(Echo))
        }
    }

    fn sample() -> FeatureCollection {
        let cells = [(0.0, 1.0), (1.0, 3.0), (2.0, 2.0)];
        FeatureCollection::new(
            cells
                .iter()
                .map(|&(x0, v)| {
                    let mut props = Map::new();
                    props.insert("v".into(), json!(v));
                    Feature::new(
                        Geometry::Polygon(Polygon::from_exterior(&[
                            (x0, 0.0),
                            (x0 + 1.0, 0.0),
                            (x0 + 1.0, 1.0),
                            (x0, 1.0),
                        ])),
                        props,
                    )
                })
                .collect(),
        )
    }

    #[tokio::test]
    async fn every_method_keeps_cardinality_and_order() {
        let fc = sample();
        let ctx = ProjectionContext::geographic(Arc::new(Equirectangular));
        let handle = SolverHandle::new(EchoLoader);
        for method in [
            Method::Scaling,
            Method::ForceField { iterations: 3 },
            Method::Diffusion { solver: &handle },
        ] {
            let out = compute(&fc, "v", method, &ctx).await.unwrap();
            assert_eq!(out.len(), fc.len(), "{}", method.name());
            for (a, b) in fc.features.iter().zip(&out.features) {
                assert_eq!(a.properties["v"], b.properties["v"]);
            }
        }
    }

    #[tokio::test]
    async fn only_scaling_adds_scale() {
        let fc = sample();
        let ctx = ProjectionContext::default();
        let scaled = compute(&fc, "v", Method::Scaling, &ctx).await.unwrap();
        assert!(scaled.features.iter().all(|f| f.properties.contains_key("scale")));
        let forced = compute(&fc, "v", Method::ForceField { iterations: 1 }, &ctx)
            .await
            .unwrap();
        assert!(forced.features.iter().all(|f| f.properties.len() == 1));
    }

    #[tokio::test]
    async fn solver_load_failure_surfaces_as_solver_error() {
        let handle = SolverHandle::new(BrokenLoader);
        let err = compute(&sample(), "v", Method::Diffusion { solver: &handle }, &ProjectionContext::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Solver(_)));
        assert_eq!(err.to_string(), "module failed to instantiate");
    }
}
