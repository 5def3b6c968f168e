//! Per-feature diagnostics table written next to the cartogram.

use anyhow::{Context, Result};
use cartogram::diagnostics::{area_errors_in, AreaFrame};
use cartogram::geom::{numeric_value, FeatureCollection};
use cartogram::olson::SCALE_PROPERTY;
use cartogram::ProjectionContext;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// One row per feature: `index, value, area_in, area_out, area_error, scale`.
/// Areas are measured in `frame`; `scale` is null unless the method recorded one.
pub fn diagnostics_frame(
    input: &FeatureCollection,
    output: &FeatureCollection,
    field: &str,
    ctx: &ProjectionContext,
    frame: AreaFrame,
) -> Result<DataFrame> {
    let area_in = frame.areas(input, ctx);
    let area_out = frame.areas(output, ctx);
    let index: Vec<u32> = (0..output.len() as u32).collect();
    let scale: Vec<Option<f64>> = output
        .features
        .iter()
        .map(|f| f.properties.get(SCALE_PROPERTY).and_then(|v| v.as_f64()))
        .collect();
    let value: Vec<f64> = output
        .features
        .iter()
        .map(|f| numeric_value(f.properties.get(field)))
        .collect();
    let df = df!(
        "index" => index,
        "value" => value,
        "area_in" => area_in,
        "area_out" => area_out,
        "area_error" => area_errors_in(frame, output, field, ctx),
        "scale" => scale,
    )?;
    Ok(df)
}

pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    Ok(())
}

/// `area_error` column of a diagnostics CSV written by [`write_csv`].
pub fn read_area_errors(path: &Path) -> Result<Vec<f64>> {
    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(100))
        .finish()?
        .select([col("area_error").cast(DataType::Float64)])
        .collect()
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(df.column("area_error")?.f64()?.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartogram::rand::{grid_collection, GridCfg, ReplayToken, VALUE_FIELD};
    use cartogram::{compute, Method};
    use tempfile::tempdir;

    #[tokio::test]
    async fn frame_has_one_row_per_feature() {
        let fc = grid_collection(GridCfg::default(), ReplayToken::new(3, 0));
        let ctx = ProjectionContext::default();
        let out = compute(&fc, VALUE_FIELD, Method::Scaling, &ctx).await.unwrap();
        let df = diagnostics_frame(&fc, &out, VALUE_FIELD, &ctx, AreaFrame::Context).unwrap();
        assert_eq!(df.shape(), (16, 6));
        assert_eq!(df.column("scale").unwrap().null_count(), 0);

        let forced = compute(&fc, VALUE_FIELD, Method::ForceField { iterations: 1 }, &ctx)
            .await
            .unwrap();
        let df = diagnostics_frame(&fc, &forced, VALUE_FIELD, &ctx, AreaFrame::ProjectionPlane).unwrap();
        assert_eq!(df.column("scale").unwrap().null_count(), 16);
    }

    #[tokio::test]
    async fn csv_round_trips_area_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("diag").join("grid.csv");
        let fc = grid_collection(GridCfg::default(), ReplayToken::new(4, 0));
        let ctx = ProjectionContext::default();
        let out = compute(&fc, VALUE_FIELD, Method::ForceField { iterations: 2 }, &ctx)
            .await
            .unwrap();
        let mut df = diagnostics_frame(&fc, &out, VALUE_FIELD, &ctx, AreaFrame::Context).unwrap();
        write_csv(&mut df, &path).unwrap();
        let read = read_area_errors(&path).unwrap();
        let expected = area_errors_in(AreaFrame::Context, &out, VALUE_FIELD, &ctx);
        assert_eq!(read.len(), expected.len());
        for (a, b) in read.iter().zip(&expected) {
            assert!((a - b).abs() < 1e-9 * b.abs().max(1.0));
        }
    }
}
