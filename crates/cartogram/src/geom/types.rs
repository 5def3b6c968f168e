//! Feature and geometry types shared by every cartogram method.
//!
//! - `Ring`: closed coordinate loop (first == last, as in GeoJSON).
//! - `Polygon`: exterior ring followed by holes.
//! - `Geometry`: `Polygon` or `MultiPolygon`; other GeoJSON types never enter the engine.
//! - `Feature`/`FeatureCollection`: geometry plus a JSON property bag.

use nalgebra::Vector2;
use serde_json::{Map, Value};

/// Closed ring of coordinates. `x` is longitude/easting, `y` latitude/northing.
pub type Ring = Vec<Vector2<f64>>;

/// Exterior ring followed by zero or more holes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polygon {
    pub rings: Vec<Ring>,
}

impl Polygon {
    #[inline]
    pub fn new(rings: Vec<Ring>) -> Self {
        Self { rings }
    }

    /// Polygon from a single exterior ring given as open or closed `(x, y)` pairs.
    pub fn from_exterior(points: &[(f64, f64)]) -> Self {
        let mut ring: Ring = points.iter().map(|&(x, y)| Vector2::new(x, y)).collect();
        close_ring(&mut ring);
        Self { rings: vec![ring] }
    }

    #[inline]
    pub fn exterior(&self) -> Option<&Ring> {
        self.rings.first()
    }

    #[inline]
    pub fn holes(&self) -> &[Ring] {
        self.rings.get(1..).unwrap_or(&[])
    }
}

/// Polygonal geometry accepted by the engine.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Polygon(Polygon),
    MultiPolygon(Vec<Polygon>),
}

impl Geometry {
    /// Parts as a slice of polygons (a single-element slice for `Polygon`).
    pub fn polygons(&self) -> &[Polygon] {
        match self {
            Geometry::Polygon(p) => std::slice::from_ref(p),
            Geometry::MultiPolygon(ps) => ps,
        }
    }

    pub fn polygons_mut(&mut self) -> &mut [Polygon] {
        match self {
            Geometry::Polygon(p) => std::slice::from_mut(p),
            Geometry::MultiPolygon(ps) => ps,
        }
    }

    /// Every ring of every part, in order.
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        self.polygons().iter().flat_map(|p| p.rings.iter())
    }

    /// Apply `f` to every coordinate, keeping the geometry type and ring structure.
    pub fn map_coords<F>(&self, mut f: F) -> Geometry
    where
        F: FnMut(Vector2<f64>) -> Vector2<f64>,
    {
        let mut map_poly = |p: &Polygon| Polygon {
            rings: p.rings.iter().map(|r| r.iter().map(|&c| f(c)).collect()).collect(),
        };
        match self {
            Geometry::Polygon(p) => Geometry::Polygon(map_poly(p)),
            Geometry::MultiPolygon(ps) => Geometry::MultiPolygon(ps.iter().map(map_poly).collect()),
        }
    }

    /// Total number of stored coordinates (closing vertices included).
    pub fn num_coords(&self) -> usize {
        self.rings().map(Vec::len).sum()
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPolygon(_) => "MultiPolygon",
        }
    }
}

/// Geometry plus its property bag. `id` is carried through untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    pub id: Option<Value>,
    pub geometry: Geometry,
    pub properties: Map<String, Value>,
}

impl Feature {
    pub fn new(geometry: Geometry, properties: Map<String, Value>) -> Self {
        Self {
            id: None,
            geometry,
            properties,
        }
    }

    /// Numeric attribute `field`, coerced with [`numeric_value`].
    #[inline]
    pub fn value(&self, field: &str) -> f64 {
        numeric_value(self.properties.get(field))
    }

    /// Same feature with `geometry` swapped in; properties and id are kept.
    pub fn with_geometry(&self, geometry: Geometry) -> Self {
        Self {
            id: self.id.clone(),
            geometry,
            properties: self.properties.clone(),
        }
    }
}

/// Ordered sequence of features; output collections keep the input order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    #[inline]
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Values of `field` for every feature, in order.
    pub fn values(&self, field: &str) -> Vec<f64> {
        self.features.iter().map(|f| f.value(field)).collect()
    }

    /// Apply `f` to every coordinate of every feature.
    pub fn map_coords<F>(&self, mut f: F) -> FeatureCollection
    where
        F: FnMut(Vector2<f64>) -> Vector2<f64>,
    {
        FeatureCollection {
            features: self
                .features
                .iter()
                .map(|ft| ft.with_geometry(ft.geometry.map_coords(&mut f)))
                .collect(),
        }
    }
}

/// Coerce an attribute to a number: JSON numbers as-is, numeric strings parsed,
/// everything else (missing, null, bool, unparsable) is 0. Non-finite results are 0.
pub fn numeric_value(v: Option<&Value>) -> f64 {
    let x = match v {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if x.is_finite() {
        x
    } else {
        0.0
    }
}

/// Append the first vertex if the ring is open.
pub(crate) fn close_ring(ring: &mut Ring) {
    if let (Some(first), Some(last)) = (ring.first().copied(), ring.last().copied()) {
        if first != last {
            ring.push(first);
        }
    }
}

/// Ring vertices without the closing duplicate.
#[inline]
pub(crate) fn open_vertices(ring: &Ring) -> &[Vector2<f64>] {
    match (ring.first(), ring.last()) {
        (Some(a), Some(b)) if ring.len() > 1 && a == b => &ring[..ring.len() - 1],
        _ => ring,
    }
}
