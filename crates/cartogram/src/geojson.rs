//! GeoJSON (RFC 7946) interchange for feature collections.
//!
//! Only `Polygon`/`MultiPolygon` features are accepted. Positions may carry
//! extra ordinates; only x/y are kept. Rings are closed on the way in.

use nalgebra::Vector2;
use serde_json::{json, Map, Value};

use crate::error::Error;
use crate::geom::{close_ring, Feature, FeatureCollection, Geometry, Polygon, Ring};

fn position(v: &Value, at: &str) -> Result<Vector2<f64>, Error> {
    let arr = v
        .as_array()
        .ok_or_else(|| Error::geojson(at, "position must be an array"))?;
    match (arr.first().and_then(Value::as_f64), arr.get(1).and_then(Value::as_f64)) {
        (Some(x), Some(y)) => Ok(Vector2::new(x, y)),
        _ => Err(Error::geojson(at, "position needs two numbers")),
    }
}

fn ring(v: &Value, at: &str) -> Result<Ring, Error> {
    let arr = v
        .as_array()
        .ok_or_else(|| Error::geojson(at, "ring must be an array of positions"))?;
    let mut out: Ring = arr
        .iter()
        .enumerate()
        .map(|(i, p)| position(p, &format!("{at}[{i}]")))
        .collect::<Result<_, _>>()?;
    close_ring(&mut out);
    Ok(out)
}

fn polygon(v: &Value, at: &str) -> Result<Polygon, Error> {
    let arr = v
        .as_array()
        .ok_or_else(|| Error::geojson(at, "polygon must be an array of rings"))?;
    let rings = arr
        .iter()
        .enumerate()
        .map(|(i, r)| ring(r, &format!("{at}[{i}]")))
        .collect::<Result<_, _>>()?;
    Ok(Polygon::new(rings))
}

fn geometry(v: &Value, index: usize) -> Result<Geometry, Error> {
    let at = format!("features[{index}].geometry");
    let kind = v.get("type").and_then(Value::as_str).unwrap_or("null");
    if !matches!(kind, "Polygon" | "MultiPolygon") {
        return Err(Error::UnsupportedGeometry {
            index,
            kind: kind.to_string(),
        });
    }
    let coords = v
        .get("coordinates")
        .ok_or_else(|| Error::geojson(&at, "missing coordinates"))?;
    let at = format!("{at}.coordinates");
    if kind == "Polygon" {
        return Ok(Geometry::Polygon(polygon(coords, &at)?));
    }
    let parts = coords
        .as_array()
        .ok_or_else(|| Error::geojson(&at, "multipolygon must be an array of polygons"))?
        .iter()
        .enumerate()
        .map(|(i, p)| polygon(p, &format!("{at}[{i}]")))
        .collect::<Result<_, _>>()?;
    Ok(Geometry::MultiPolygon(parts))
}

fn feature(v: &Value, index: usize) -> Result<Feature, Error> {
    let at = format!("features[{index}]");
    if v.get("type").and_then(Value::as_str) != Some("Feature") {
        return Err(Error::geojson(at, "expected a Feature"));
    }
    let geom = geometry(v.get("geometry").unwrap_or(&Value::Null), index)?;
    let properties = match v.get("properties") {
        Some(Value::Object(m)) => m.clone(),
        None | Some(Value::Null) => Map::new(),
        Some(_) => return Err(Error::geojson(at, "properties must be an object")),
    };
    Ok(Feature {
        id: v.get("id").cloned(),
        geometry: geom,
        properties,
    })
}

impl TryFrom<&Value> for FeatureCollection {
    type Error = Error;

    fn try_from(v: &Value) -> Result<Self, Error> {
        if v.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
            return Err(Error::geojson("$", "expected a FeatureCollection"));
        }
        let features = v
            .get("features")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::geojson("$.features", "missing features array"))?;
        let features = features
            .iter()
            .enumerate()
            .map(|(i, f)| feature(f, i))
            .collect::<Result<_, _>>()?;
        Ok(FeatureCollection { features })
    }
}

fn ring_value(r: &Ring) -> Value {
    Value::Array(r.iter().map(|p| json!([p.x, p.y])).collect())
}

fn polygon_value(p: &Polygon) -> Value {
    Value::Array(p.rings.iter().map(ring_value).collect())
}

impl From<&Geometry> for Value {
    fn from(g: &Geometry) -> Value {
        let coordinates = match g {
            Geometry::Polygon(p) => polygon_value(p),
            Geometry::MultiPolygon(ps) => Value::Array(ps.iter().map(polygon_value).collect()),
        };
        json!({ "type": g.type_name(), "coordinates": coordinates })
    }
}

impl From<&FeatureCollection> for Value {
    fn from(fc: &FeatureCollection) -> Value {
        let features = fc
            .features
            .iter()
            .map(|f| {
                let mut obj = Map::new();
                obj.insert("type".into(), json!("Feature"));
                if let Some(id) = &f.id {
                    obj.insert("id".into(), id.clone());
                }
                obj.insert("geometry".into(), Value::from(&f.geometry));
                obj.insert("properties".into(), Value::Object(f.properties.clone()));
                Value::Object(obj)
            })
            .collect();
        json!({ "type": "FeatureCollection", "features": Value::Array(features) })
    }
}

/// Parse a GeoJSON `FeatureCollection` from text.
pub fn from_str(s: &str) -> Result<FeatureCollection, Error> {
    let v: Value = serde_json::from_str(s).map_err(|e| Error::geojson("$", e.to_string()))?;
    FeatureCollection::try_from(&v)
}

/// Serialize a collection as compact GeoJSON text.
pub fn to_string(fc: &FeatureCollection) -> String {
    Value::from(fc).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "id": 7, "properties": {"pop": "12"},
             "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0,5],[1,1],[0,1]]]}},
            {"type": "Feature", "properties": null,
             "geometry": {"type": "MultiPolygon", "coordinates": [[[[2,2],[3,2],[3,3],[2,2]]]]}}
        ]
    }"#;

    #[test]
    fn parses_polygons_and_closes_rings() {
        let fc = from_str(SAMPLE).unwrap();
        assert_eq!(fc.len(), 2);
        let ring = &fc.features[0].geometry.polygons()[0].rings[0];
        assert_eq!(ring.len(), 5);
        assert_eq!(ring[0], ring[4]);
        assert_eq!(ring[1], Vector2::new(1.0, 0.0));
        assert_eq!(fc.features[0].id, Some(json!(7)));
        assert_eq!(fc.features[0].value("pop"), 12.0);
        assert!(fc.features[1].properties.is_empty());
        assert_eq!(fc.features[1].geometry.type_name(), "MultiPolygon");
    }

    #[test]
    fn rejects_non_polygonal_geometry() {
        let text = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[0,0]}}]}"#;
        match from_str(text) {
            Err(Error::UnsupportedGeometry { index, kind }) => {
                assert_eq!(index, 0);
                assert_eq!(kind, "Point");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn writes_back_what_it_reads() {
        let fc = from_str(SAMPLE).unwrap();
        let again = from_str(&to_string(&fc)).unwrap();
        assert_eq!(fc, again);
    }
}
