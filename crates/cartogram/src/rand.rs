//! Seeded synthetic maps for benches, examples and tests.
//!
//! Model
//! - `grid_collection`: a `rows × cols` lattice of quadrilateral cells around a
//!   lon/lat origin. Interior lattice nodes are jittered once and shared by the
//!   adjacent cells, so the map stays contiguous. Each cell gets a random value.
//! - `draw_island`: a star-shaped ring (increasing angles, each jittered by
//!   less than half the spacing, and jittered radii); simple but generally not
//!   convex. Used to give grid features offshore parts.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.

use std::f64::consts::TAU;

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Map};

use crate::geom::{close_ring, Feature, FeatureCollection, Geometry, Polygon, Ring};

/// Property name holding the synthetic value.
pub const VALUE_FIELD: &str = "value";

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    pub fn new(seed: u64, index: u64) -> Self {
        Self { seed, index }
    }

    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing, cheap and stable.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Lattice map configuration.
#[derive(Clone, Copy, Debug)]
pub struct GridCfg {
    pub rows: usize,
    pub cols: usize,
    /// South-west corner (lon, lat) in degrees.
    pub origin: (f64, f64),
    /// Cell side in degrees.
    pub cell: f64,
    /// Node jitter as a fraction of `cell`. Clamped to [0, 0.3] so cells stay simple.
    pub jitter: f64,
    /// Values are drawn uniformly from `[min, max)`.
    pub value_range: (f64, f64),
}

impl Default for GridCfg {
    fn default() -> Self {
        Self {
            rows: 4,
            cols: 4,
            origin: (0.0, 40.0),
            cell: 1.0,
            jitter: 0.15,
            value_range: (1.0, 100.0),
        }
    }
}

/// Contiguous lattice of cells with random values under [`VALUE_FIELD`].
/// Cells are listed row by row from the south-west corner.
pub fn grid_collection(cfg: GridCfg, tok: ReplayToken) -> FeatureCollection {
    let mut rng = tok.to_std_rng();
    let jitter = cfg.jitter.clamp(0.0, 0.3) * cfg.cell;
    let (nr, nc) = (cfg.rows + 1, cfg.cols + 1);
    let mut nodes = Vec::with_capacity(nr * nc);
    for r in 0..nr {
        for c in 0..nc {
            let mut p = Vector2::new(
                cfg.origin.0 + c as f64 * cfg.cell,
                cfg.origin.1 + r as f64 * cfg.cell,
            );
            let interior = r > 0 && r < cfg.rows && c > 0 && c < cfg.cols;
            if interior && jitter > 0.0 {
                p.x += rng.gen_range(-jitter..jitter);
                p.y += rng.gen_range(-jitter..jitter);
            }
            nodes.push(p);
        }
    }
    let node = |r: usize, c: usize| nodes[r * nc + c];
    let (lo, hi) = cfg.value_range;

    let mut features = Vec::with_capacity(cfg.rows * cfg.cols);
    for r in 0..cfg.rows {
        for c in 0..cfg.cols {
            let mut ring: Ring = vec![node(r, c), node(r, c + 1), node(r + 1, c + 1), node(r + 1, c)];
            close_ring(&mut ring);
            let value = if hi > lo { rng.gen_range(lo..hi) } else { lo };
            let mut props = Map::new();
            props.insert("row".into(), json!(r));
            props.insert("col".into(), json!(c));
            props.insert(VALUE_FIELD.into(), json!(value));
            features.push(Feature::new(Geometry::Polygon(Polygon::new(vec![ring])), props));
        }
    }
    FeatureCollection::new(features)
}

/// Star-shaped island configuration.
#[derive(Clone, Copy, Debug)]
pub struct IslandCfg {
    pub vertices: usize,
    /// Angular jitter as a fraction of the base spacing Δ=2π/n. Clamped to [0, 0.49].
    pub angle_jitter_frac: f64,
    /// Radii = `radius * (1 + u)`, with `u∈[-radial_jitter, radial_jitter]`.
    pub radial_jitter: f64,
    pub radius: f64,
}

impl Default for IslandCfg {
    fn default() -> Self {
        Self {
            vertices: 12,
            angle_jitter_frac: 0.3,
            radial_jitter: 0.25,
            radius: 0.5,
        }
    }
}

/// Counter-clockwise star-shaped polygon around `center`.
pub fn draw_island(center: Vector2<f64>, cfg: IslandCfg, tok: ReplayToken) -> Polygon {
    let mut rng = tok.to_std_rng();
    let n = cfg.vertices.max(3);
    let aj = cfg.angle_jitter_frac.clamp(0.0, 0.49);
    let rj = cfg.radial_jitter.clamp(0.0, 0.9);
    let delta = TAU / n as f64;
    let phase = rng.gen::<f64>() * TAU;
    let mut ring: Ring = (0..n)
        .map(|k| {
            let th = phase + k as f64 * delta + (rng.gen::<f64>() * 2.0 - 1.0) * aj * delta;
            let r = cfg.radius * (1.0 + (rng.gen::<f64>() * 2.0 - 1.0) * rj);
            center + Vector2::new(th.cos(), th.sin()) * r
        })
        .collect();
    close_ring(&mut ring);
    Polygon::new(vec![ring])
}
