use super::*;
use nalgebra::Vector2;
use proptest::prelude::*;

fn square(x0: f64, y0: f64, side: f64) -> Polygon {
    Polygon::from_exterior(&[
        (x0, y0),
        (x0 + side, y0),
        (x0 + side, y0 + side),
        (x0, y0 + side),
    ])
}

fn square_cw(x0: f64, y0: f64, side: f64) -> Polygon {
    Polygon::from_exterior(&[
        (x0, y0),
        (x0, y0 + side),
        (x0 + side, y0 + side),
        (x0 + side, y0),
    ])
}

#[test]
fn planar_area_subtracts_holes_and_sums_parts() {
    let mut with_hole = square(0.0, 0.0, 10.0);
    with_hole.rings.push(square_cw(2.0, 2.0, 2.0).rings.remove(0));
    let g = Geometry::Polygon(with_hole.clone());
    assert!((area(&g, Space::Planar) - 96.0).abs() < 1e-12);

    let multi = Geometry::MultiPolygon(vec![with_hole, square(20.0, 0.0, 3.0)]);
    assert!((area(&multi, Space::Planar) - 105.0).abs() < 1e-12);
}

#[test]
fn planar_area_ignores_winding() {
    let ccw = Geometry::Polygon(square(0.0, 0.0, 4.0));
    let cw = Geometry::Polygon(square_cw(0.0, 0.0, 4.0));
    assert_eq!(area(&ccw, Space::Planar), area(&cw, Space::Planar));
    assert!(signed_ring_area(&ccw.polygons()[0].rings[0]) > 0.0);
    assert!(signed_ring_area(&cw.polygons()[0].rings[0]) < 0.0);
}

#[test]
fn spherical_area_of_one_degree_cell_at_equator() {
    let g = Geometry::Polygon(square(0.0, 0.0, 1.0));
    let expected = EARTH_RADIUS * EARTH_RADIUS * 1f64.to_radians() * 1f64.to_radians().sin();
    let got = area(&g, Space::Spherical);
    assert!(((got - expected) / expected).abs() < 1e-9, "got {got}, expected {expected}");
}

#[test]
fn spherical_cells_shrink_towards_the_pole() {
    let equator = area(&Geometry::Polygon(square(0.0, 0.0, 1.0)), Space::Spherical);
    let north = area(&Geometry::Polygon(square(0.0, 60.0, 1.0)), Space::Spherical);
    assert!(north < equator * 0.51 && north > equator * 0.49);
}

#[test]
fn largest_polygon_picks_biggest_part() {
    let multi = Geometry::MultiPolygon(vec![
        square(0.0, 0.0, 1.0),
        square(5.0, 5.0, 3.0),
        square(10.0, 10.0, 2.0),
    ]);
    let p = largest_polygon(&multi, Space::Planar).unwrap();
    assert_eq!(p, &square(5.0, 5.0, 3.0));
    assert!(largest_polygon(&Geometry::MultiPolygon(vec![]), Space::Planar).is_none());
}

#[test]
fn centroid_skips_closing_vertex() {
    let g = Geometry::Polygon(square(0.0, 0.0, 2.0));
    let c = centroid(&g);
    assert!((c - Vector2::new(1.0, 1.0)).norm() < 1e-12);
}

#[test]
fn planar_scale_about_centroid_scales_area_quadratically() {
    let g = Geometry::Polygon(square(3.0, 4.0, 2.0));
    let c = centroid(&g);
    let s = scale_geometry(&g, c, 0.5, Space::Planar);
    assert!((area(&s, Space::Planar) - 1.0).abs() < 1e-12);
    assert!((centroid(&s) - c).norm() < 1e-12);
}

#[test]
fn spherical_scale_round_trips_and_quadruples_area() {
    let g = Geometry::Polygon(square(10.0, 20.0, 1.0));
    let c = centroid(&g);
    let big = scale_geometry(&g, c, 2.0, Space::Spherical);
    let ratio = area(&big, Space::Spherical) / area(&g, Space::Spherical);
    assert!((ratio - 4.0).abs() < 0.05, "ratio {ratio}");

    let back = scale_geometry(&big, c, 0.5, Space::Spherical);
    for (a, b) in g.rings().flatten().zip(back.rings().flatten()) {
        assert!((a - b).norm() < 1e-9);
    }
}

#[test]
fn scale_by_one_is_identity() {
    let g = Geometry::Polygon(square(-170.0, 50.0, 5.0));
    let c = centroid(&g);
    assert_eq!(scale_geometry(&g, c, 1.0, Space::Spherical), g);
}

#[test]
fn normalize_fixes_exterior_and_holes() {
    let mut p = square_cw(0.0, 0.0, 10.0);
    p.rings.push(square(2.0, 2.0, 2.0).rings.remove(0));
    let g = Geometry::Polygon(p);
    assert!(!is_normalized(&g));
    let n = normalize_geometry(&g);
    assert!(is_normalized(&n));
    assert!(signed_ring_area(&n.polygons()[0].rings[0]) > 0.0);
    assert!(signed_ring_area(&n.polygons()[0].rings[1]) < 0.0);
    assert_eq!(area(&n, Space::Planar), area(&g, Space::Planar));
}

#[test]
fn numeric_value_coercion() {
    use serde_json::json;
    assert_eq!(numeric_value(Some(&json!(12.5))), 12.5);
    assert_eq!(numeric_value(Some(&json!(" 42 "))), 42.0);
    assert_eq!(numeric_value(Some(&json!("n/a"))), 0.0);
    assert_eq!(numeric_value(Some(&json!("NaN"))), 0.0);
    assert_eq!(numeric_value(Some(&json!(null))), 0.0);
    assert_eq!(numeric_value(Some(&json!(true))), 0.0);
    assert_eq!(numeric_value(None), 0.0);
}

fn ring_strategy() -> impl Strategy<Value = Polygon> {
    (
        -100.0f64..100.0,
        -100.0f64..100.0,
        0.1f64..50.0,
        0.1f64..50.0,
        any::<bool>(),
    )
        .prop_map(|(x, y, w, h, flip)| {
            let pts = if flip {
                [(x, y), (x, y + h), (x + w, y + h), (x + w, y)]
            } else {
                [(x, y), (x + w, y), (x + w, y + h), (x, y + h)]
            };
            Polygon::from_exterior(&pts)
        })
}

proptest! {
    #[test]
    fn normalize_is_idempotent(parts in prop::collection::vec(ring_strategy(), 1..4)) {
        let fc = FeatureCollection::new(vec![Feature::new(
            Geometry::MultiPolygon(parts),
            serde_json::Map::new(),
        )]);
        let once = normalize_orientation(&fc);
        let twice = normalize_orientation(&once);
        prop_assert_eq!(&once, &twice);
        prop_assert!(is_normalized(&once.features[0].geometry));
    }
}
