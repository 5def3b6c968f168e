use super::*;
use crate::geom::{is_normalized, Feature, Geometry, Polygon};
use crate::projection::{Equirectangular, WebMercator};
use serde_json::{json, Map};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Debug)]
struct Boom(&'static str);

impl fmt::Display for Boom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "boom: {}", self.0)
    }
}

impl std::error::Error for Boom {}

/// Returns its input with every ring reversed and records what it was given.
#[derive(Default)]
struct ReversingSolver {
    seen: Mutex<Vec<FeatureCollection>>,
}

#[async_trait]
impl DiffusionSolver for ReversingSolver {
    async fn make_cartogram(
        &self,
        fc: &FeatureCollection,
        field: &str,
    ) -> Result<FeatureCollection, SolverError> {
        assert_eq!(field, "pop");
        self.seen.lock().unwrap().push(fc.clone());
        let mut out = fc.clone();
        for f in &mut out.features {
            for p in f.geometry.polygons_mut() {
                for r in &mut p.rings {
                    r.reverse();
                }
            }
        }
        Ok(out)
    }
}

struct FailingSolver;

#[async_trait]
impl DiffusionSolver for FailingSolver {
    async fn make_cartogram(
        &self,
        _fc: &FeatureCollection,
        _field: &str,
    ) -> Result<FeatureCollection, SolverError> {
        Err(Box::new(Boom("diffusion diverged")))
    }
}

/// Counts loads; fails the first `fail_first` of them.
struct CountingLoader {
    loads: Arc<AtomicUsize>,
    fail_first: usize,
    solver: Arc<dyn DiffusionSolver>,
}

#[async_trait]
impl SolverLoader for CountingLoader {
    async fn load(&self) -> Result<Arc<dyn DiffusionSolver>, SolverError> {
        let n = self.loads.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if n < self.fail_first {
            return Err(Box::new(Boom("wasm missing")));
        }
        Ok(Arc::clone(&self.solver))
    }
}

fn handle(solver: Arc<dyn DiffusionSolver>, fail_first: usize) -> (SolverHandle, Arc<AtomicUsize>) {
    let loads = Arc::new(AtomicUsize::new(0));
    let h = SolverHandle::new(CountingLoader {
        loads: Arc::clone(&loads),
        fail_first,
        solver,
    });
    (h, loads)
}

fn sample() -> FeatureCollection {
    let mut props = Map::new();
    props.insert("pop".into(), json!(10));
    FeatureCollection::new(vec![Feature::new(
        Geometry::Polygon(Polygon::from_exterior(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)])),
        props,
    )])
}

fn geographic() -> ProjectionContext {
    ProjectionContext::geographic(Arc::new(Equirectangular))
}

#[tokio::test]
async fn loads_once_and_reuses_the_solver() {
    let (h, loads) = handle(Arc::new(ReversingSolver::default()), 0);
    assert!(!h.is_initialized());
    h.solve(&sample(), "pop", &geographic()).await.unwrap();
    h.solve(&sample(), "pop", &geographic()).await.unwrap();
    assert!(h.is_initialized());
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn concurrent_first_calls_share_one_load() {
    let (h, loads) = handle(Arc::new(ReversingSolver::default()), 0);
    let fc = sample();
    let ctx = geographic();
    let (a, b) = tokio::join!(h.solve(&fc, "pop", &ctx), h.solve(&fc, "pop", &ctx));
    assert!(a.is_ok() && b.is_ok());
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn independent_handles_load_independently() {
    let solver: Arc<dyn DiffusionSolver> = Arc::new(ReversingSolver::default());
    let (h1, l1) = handle(Arc::clone(&solver), 0);
    let (h2, l2) = handle(solver, 0);
    h1.solver().await.unwrap();
    assert!(h1.is_initialized() && !h2.is_initialized());
    h2.solver().await.unwrap();
    assert_eq!((l1.load(Ordering::SeqCst), l2.load(Ordering::SeqCst)), (1, 1));
}

#[tokio::test]
async fn load_failure_propagates_and_leaves_handle_empty() {
    let (h, loads) = handle(Arc::new(ReversingSolver::default()), 1);
    let err = h.solve(&sample(), "pop", &geographic()).await.unwrap_err();
    assert_eq!(err.downcast_ref::<Boom>().map(|b| b.0), Some("wasm missing"));
    assert!(!h.is_initialized());
    h.solve(&sample(), "pop", &geographic()).await.unwrap();
    assert_eq!(loads.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn solver_failure_is_returned_unmodified() {
    let (h, _) = handle(Arc::new(FailingSolver), 0);
    let err = h.solve(&sample(), "pop", &geographic()).await.unwrap_err();
    let boom = err.downcast_ref::<Boom>().expect("original error type");
    assert_eq!(boom.0, "diffusion diverged");
    assert_eq!(err.to_string(), "boom: diffusion diverged");
}

#[tokio::test]
async fn geographic_input_reaches_solver_unchanged() {
    let solver = Arc::new(ReversingSolver::default());
    let (h, _) = handle(solver.clone(), 0);
    let fc = sample();
    let out = h.solve(&fc, "pop", &geographic()).await.unwrap();
    assert_eq!(solver.seen.lock().unwrap()[0], fc);
    // the reversed rings come back normalized
    assert!(is_normalized(&out.features[0].geometry));
    assert_eq!(out, fc);
}

#[tokio::test]
async fn planar_input_is_projected_and_result_projected_back() {
    let solver = Arc::new(ReversingSolver::default());
    let (h, _) = handle(solver.clone(), 0);
    let fc = sample();
    let ctx = ProjectionContext::planar(Arc::new(WebMercator));
    let out = h.solve(&fc, "pop", &ctx).await.unwrap();

    let seen = solver.seen.lock().unwrap()[0].clone();
    let p = seen.features[0].geometry.polygons()[0].rings[0][1];
    assert!(p.x > 100_000.0, "solver should see metres, got {p:?}");

    assert!(is_normalized(&out.features[0].geometry));
    for (a, b) in fc.features[0]
        .geometry
        .rings()
        .flatten()
        .zip(out.features[0].geometry.rings().flatten())
    {
        assert!((a - b).norm() < 1e-9);
    }
    assert_eq!(out.features[0].properties["pop"], json!(10));
}

#[cfg(unix)]
#[tokio::test]
async fn command_solver_round_trips_through_a_process() {
    let mut loader = CommandLoader::new("sh", vec!["-c".into(), "cat".into(), "solver".into()]);
    loader.probe_args = vec!["-c".into(), "true".into()];
    let h = SolverHandle::new(loader);
    let fc = sample();
    let out = h.solve(&fc, "pop", &geographic()).await.unwrap();
    assert_eq!(out, fc);
}

#[cfg(unix)]
#[tokio::test]
async fn command_solver_reports_stderr_on_failure() {
    let mut loader = CommandLoader::new(
        "sh",
        vec!["-c".into(), "echo no grid for $1 >&2; exit 3".into(), "solver".into()],
    );
    loader.probe_args = vec!["-c".into(), "true".into()];
    let h = SolverHandle::new(loader);
    let err = h.solve(&sample(), "pop", &geographic()).await.unwrap_err();
    assert!(err.to_string().contains("no grid for pop"), "{err}");
}

#[cfg(unix)]
#[tokio::test]
async fn failing_probe_is_a_load_error() {
    let mut loader = CommandLoader::new("sh", vec![]);
    loader.probe_args = vec!["-c".into(), "exit 1".into()];
    let h = SolverHandle::new(loader);
    assert!(h.solver().await.is_err());
    assert!(!h.is_initialized());
}
