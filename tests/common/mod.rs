//! Shared helpers for the integration tests
//!
//! Builds small solids out of axis-aligned rectangles and compares polygon
//! sets by area, since the boolean operations are free to reorder vertices.

#![allow(dead_code)]

use clipper2::FillRule;
use layercarve::polygon_clipping::{difference_polygons, polygons_area, union_all};
use layercarve::{BoundingBox, LayerGeometry, Polygon, Solid, SolidSettings};

/// Install a test subscriber once; `RUST_LOG` controls the output
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A solid whose every layer is the rectangle `(x0, y0)`-`(x1, y1)`
pub fn rect_solid(
    name: &str,
    settings: SolidSettings,
    (x0, y0, x1, y1): (f64, f64, f64, f64),
    layers: usize,
) -> Solid {
    Solid::new(
        name,
        settings,
        BoundingBox::from_corners((x0, y0, 0.0), (x1, y1, layers as f64 * 0.2)),
        vec![LayerGeometry::from_polygons(vec![Polygon::rectangle(x0, y0, x1, y1)]); layers],
    )
}

/// Area of one solid at one layer
pub fn area_at(solid: &Solid, layer: usize) -> f64 {
    polygons_area(&solid.layers[layer].polygons)
}

/// Area of the union of several polygon sets
pub fn union_area(sets: &[&[Polygon]]) -> f64 {
    let all: Vec<Polygon> = sets.iter().flat_map(|set| set.iter().cloned()).collect();
    polygons_area(&union_all(&all, FillRule::NonZero).unwrap())
}

/// Area covered by exactly one of the two sets
pub fn symmetric_difference_area(a: &[Polygon], b: &[Polygon]) -> f64 {
    let only_a = difference_polygons(a, b, FillRule::NonZero).unwrap();
    let only_b = difference_polygons(b, a, FillRule::NonZero).unwrap();
    polygons_area(&only_a) + polygons_area(&only_b)
}
