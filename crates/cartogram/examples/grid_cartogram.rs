//! Run the two in-process methods on a synthetic 6x6 grid, where the eastern
//! column owns an offshore island each, and print how far each feature's area
//! share is from its value share.
//!
//! cargo run -p cartogram --example grid_cartogram

use std::sync::Arc;

use cartogram::diagnostics::force_field_area_errors;
use cartogram::dougenik::force_field_cartogram;
use cartogram::geom::Geometry;
use cartogram::olson::scaling_cartogram;
use cartogram::projection::{LambertAzimuthalEqualArea, ProjectionContext};
use cartogram::rand::{draw_island, grid_collection, GridCfg, IslandCfg, ReplayToken, VALUE_FIELD};
use nalgebra::Vector2;

fn mean_abs_log(errors: &[f64]) -> f64 {
    errors.iter().map(|e| e.ln().abs()).sum::<f64>() / errors.len() as f64
}

fn main() {
    let cfg = GridCfg {
        rows: 6,
        cols: 6,
        origin: (5.0, 45.0),
        ..GridCfg::default()
    };
    let mut fc = grid_collection(cfg, ReplayToken::new(7, 0));
    let east = cfg.origin.0 + cfg.cols as f64 * cfg.cell;
    for (i, f) in fc.features.iter_mut().enumerate() {
        if f.properties["col"] != cfg.cols - 1 {
            continue;
        }
        let row = f.properties["row"].as_f64().unwrap_or(0.0);
        let center = Vector2::new(east + 1.0, cfg.origin.1 + (row + 0.5) * cfg.cell);
        let island_cfg = IslandCfg {
            radius: 0.3,
            ..IslandCfg::default()
        };
        let island = draw_island(center, island_cfg, ReplayToken::new(7, i as u64));
        let mainland = f.geometry.polygons().to_vec();
        f.geometry = Geometry::MultiPolygon(mainland.into_iter().chain([island]).collect());
    }
    let ctx = ProjectionContext::geographic(Arc::new(LambertAzimuthalEqualArea::europe()));

    let input = force_field_area_errors(&fc, VALUE_FIELD, &ctx);
    println!("input        mean |ln area_error| = {:.4}", mean_abs_log(&input));
    for iterations in [1usize, 5, 20] {
        let out = force_field_cartogram(&fc, VALUE_FIELD, iterations, &ctx);
        let e = force_field_area_errors(&out, VALUE_FIELD, &ctx);
        println!("force-field  {iterations:>2} it  mean |ln area_error| = {:.4}", mean_abs_log(&e));
    }
    let scaled = scaling_cartogram(&fc, VALUE_FIELD, &ctx);
    let largest = scaled
        .features
        .iter()
        .filter_map(|f| f.properties.get("scale").and_then(|v| v.as_f64()))
        .fold(0.0, f64::max);
    println!("scaling      largest scale factor = {largest:.4}");
}
