//! Polygon boolean and offset operations for layer geometry
//!
//! This module provides polygon clipping operations using the Clipper2 library,
//! which is a Rust port of Angus Johnson's Clipper2 library (the successor
//! to the polyclipping library used by most slicers).
//!
//! Operations available on closed areas:
//! - Union: Combine polygon sets, resolving self-intersections with a fill rule
//! - Intersection: Find overlapping areas
//! - Difference: Subtract one polygon set from another
//! - Offset: Grow or shrink areas by a distance
//!
//! Operations involving open curves:
//! - Offset: Turn curves into a closed band of a given half width
//! - Clipping: Keep the parts of curves that lie inside an area
//!
//! Coordinates are processed at 0.01 mm precision. Empty operands never reach
//! Clipper2: an empty subject yields an empty result and an empty clip set leaves
//! the subject unchanged.

use crate::model::{Polygon, Polyline, Vertex2D};
use clipper2::{Centi, EndType, FillRule, JoinType, Paths, difference, inflate, intersect, union};

/// Miter limit used when offsetting closed areas
const MITER_LIMIT: f64 = 2.0;

/// Parameter distance below which curve pieces are dropped
const PARAM_EPSILON: f64 = 1e-9;

/// Points this close to a polygon edge count as on the boundary (half the clipping precision)
const BOUNDARY_TOLERANCE: f64 = 0.005;

/// Error type for polygon clipping operations
#[derive(Debug, thiserror::Error)]
pub enum ClippingError {
    /// Invalid polygon data
    #[error("Invalid polygon: {0}")]
    InvalidPolygon(String),

    /// Clipper operation failed
    #[error("Clipper operation failed: {0}")]
    ClipperError(String),
}

/// Convert closed polygons to Clipper2 paths
fn polygons_to_paths(polygons: &[Polygon]) -> Vec<Vec<(f64, f64)>> {
    polygons
        .iter()
        .map(|polygon| polygon.vertices.iter().map(|v| (v.x, v.y)).collect())
        .collect()
}

/// Convert open polylines to Clipper2 paths, skipping chains without a segment
fn polylines_to_paths(polylines: &[Polyline]) -> Vec<Vec<(f64, f64)>> {
    polylines
        .iter()
        .filter(|polyline| polyline.vertices.len() >= 2)
        .map(|polyline| polyline.vertices.iter().map(|v| (v.x, v.y)).collect())
        .collect()
}

/// Convert Clipper2 paths back to polygons
fn paths_to_polygons(paths: Vec<Vec<(f64, f64)>>) -> Vec<Polygon> {
    paths
        .into_iter()
        // Skip degenerate polygons (need at least 3 vertices)
        .filter(|path| path.len() >= 3)
        .map(|path| Polygon::new(path.into_iter().map(Vertex2D::from).collect()))
        .collect()
}

fn clipper_error(err: impl std::fmt::Debug) -> ClippingError {
    ClippingError::ClipperError(format!("{:?}", err))
}

/// Perform union operation on two polygon sets
///
/// Overlapping areas are merged; the fill rule decides how self-intersecting
/// or nested loops of the inputs are interpreted.
///
/// # Arguments
///
/// * `subject_polygons` - The first set of polygons
/// * `clip_polygons` - The second set of polygons, may be empty
/// * `fill_rule` - Fill rule for interpreting both sets
///
/// # Returns
///
/// A vector of polygons representing the union of all input polygons.
pub fn union_polygons(
    subject_polygons: &[Polygon],
    clip_polygons: &[Polygon],
    fill_rule: FillRule,
) -> Result<Vec<Polygon>, ClippingError> {
    let (subject_polygons, clip_polygons) = if subject_polygons.is_empty() {
        (clip_polygons, subject_polygons)
    } else {
        (subject_polygons, clip_polygons)
    };

    if subject_polygons.is_empty() {
        return Ok(Vec::new());
    }

    let result = union::<Centi>(
        polygons_to_paths(subject_polygons),
        polygons_to_paths(clip_polygons),
        fill_rule,
    )
    .map_err(clipper_error)?;

    Ok(paths_to_polygons(result.into()))
}

/// Union a single polygon set with itself, merging overlaps between its loops
pub fn union_all(polygons: &[Polygon], fill_rule: FillRule) -> Result<Vec<Polygon>, ClippingError> {
    union_polygons(polygons, &[], fill_rule)
}

/// Perform intersection operation on two polygon sets
///
/// # Arguments
///
/// * `subject_polygons` - The first set of polygons
/// * `clip_polygons` - The second set of polygons
/// * `fill_rule` - Fill rule for interpreting both sets
///
/// # Returns
///
/// A vector of polygons representing the intersection of the two sets.
pub fn intersect_polygons(
    subject_polygons: &[Polygon],
    clip_polygons: &[Polygon],
    fill_rule: FillRule,
) -> Result<Vec<Polygon>, ClippingError> {
    if subject_polygons.is_empty() || clip_polygons.is_empty() {
        return Ok(Vec::new());
    }

    let result = intersect::<Centi>(
        polygons_to_paths(subject_polygons),
        polygons_to_paths(clip_polygons),
        fill_rule,
    )
    .map_err(clipper_error)?;

    Ok(paths_to_polygons(result.into()))
}

/// Perform difference operation on two polygon sets
///
/// Subtracts the clip polygons from the subject polygons. With an empty clip
/// set the subject is returned as is.
pub fn difference_polygons(
    subject_polygons: &[Polygon],
    clip_polygons: &[Polygon],
    fill_rule: FillRule,
) -> Result<Vec<Polygon>, ClippingError> {
    if subject_polygons.is_empty() {
        return Ok(Vec::new());
    }

    if clip_polygons.is_empty() {
        return Ok(subject_polygons.to_vec());
    }

    let result = difference::<Centi>(
        polygons_to_paths(subject_polygons),
        polygons_to_paths(clip_polygons),
        fill_rule,
    )
    .map_err(clipper_error)?;

    Ok(paths_to_polygons(result.into()))
}

/// Offset closed areas outward by `delta` (inward when negative)
pub fn offset_polygons(polygons: &[Polygon], delta: f64) -> Result<Vec<Polygon>, ClippingError> {
    if !delta.is_finite() {
        return Err(ClippingError::InvalidPolygon(format!(
            "Offset distance must be finite, got {}",
            delta
        )));
    }
    if polygons.is_empty() {
        return Ok(Vec::new());
    }
    if delta == 0.0 {
        return Ok(polygons.to_vec());
    }

    let paths: Paths<Centi> = polygons_to_paths(polygons).into();
    let result = inflate(paths, delta, JoinType::Miter, EndType::Polygon, MITER_LIMIT);
    Ok(paths_to_polygons(result.into()))
}

/// Turn open curves into a closed band extending `half_width` to each side
///
/// Joins and caps are rounded. A non-positive width yields no band.
pub fn offset_polylines(
    polylines: &[Polyline],
    half_width: f64,
) -> Result<Vec<Polygon>, ClippingError> {
    if !half_width.is_finite() {
        return Err(ClippingError::InvalidPolygon(format!(
            "Band width must be finite, got {}",
            half_width
        )));
    }
    let paths = polylines_to_paths(polylines);
    if paths.is_empty() || half_width <= 0.0 {
        return Ok(Vec::new());
    }

    let paths: Paths<Centi> = paths.into();
    let result = inflate(paths, half_width, JoinType::Round, EndType::Round, MITER_LIMIT);
    Ok(paths_to_polygons(result.into()))
}

/// Keep the parts of open curves that lie inside the area
///
/// Each curve is split where it crosses a polygon boundary; the pieces whose
/// midpoint is inside the area under `fill_rule` are returned, consecutive
/// inside pieces joined into one fragment. Pieces running along the boundary
/// are kept, the area being closed.
pub fn clip_polylines(
    polylines: &[Polyline],
    polygons: &[Polygon],
    fill_rule: FillRule,
) -> Vec<Polyline> {
    let mut fragments = Vec::new();
    if polygons.is_empty() {
        return fragments;
    }
    for polyline in polylines {
        let mut current: Vec<Vertex2D> = Vec::new();

        for segment in polyline.vertices.windows(2) {
            let (start, end) = (segment[0], segment[1]);
            let mut params = vec![0.0, 1.0];
            params.extend(crossing_params(&start, &end, polygons));
            params.sort_by(f64::total_cmp);
            params.dedup_by(|a, b| (*a - *b).abs() < PARAM_EPSILON);

            for window in params.windows(2) {
                let (t0, t1) = (window[0], window[1]);
                if t1 - t0 < PARAM_EPSILON {
                    continue;
                }
                let mid = start.lerp(&end, (t0 + t1) / 2.0);
                if contains_point(polygons, &mid, fill_rule) {
                    let piece_start = start.lerp(&end, t0);
                    let continues = current
                        .last()
                        .is_some_and(|last| last.distance(&piece_start) < PARAM_EPSILON);
                    if !continues {
                        flush_fragment(&mut current, &mut fragments);
                        current.push(piece_start);
                    }
                    current.push(start.lerp(&end, t1));
                } else {
                    flush_fragment(&mut current, &mut fragments);
                }
            }
        }

        flush_fragment(&mut current, &mut fragments);
    }

    fragments
}

fn flush_fragment(current: &mut Vec<Vertex2D>, fragments: &mut Vec<Polyline>) {
    if current.len() >= 2 {
        fragments.push(Polyline::new(std::mem::take(current)));
    } else {
        current.clear();
    }
}

/// Parameters along `start -> end` where the segment crosses a polygon edge
fn crossing_params(start: &Vertex2D, end: &Vertex2D, polygons: &[Polygon]) -> Vec<f64> {
    let rx = end.x - start.x;
    let ry = end.y - start.y;
    let mut params = Vec::new();

    for polygon in polygons {
        let n = polygon.vertices.len();
        for i in 0..n {
            let a = &polygon.vertices[i];
            let b = &polygon.vertices[(i + 1) % n];
            let sx = b.x - a.x;
            let sy = b.y - a.y;
            let denom = rx * sy - ry * sx;
            if denom.abs() < f64::EPSILON {
                // Parallel edges never split the segment
                continue;
            }
            let qx = a.x - start.x;
            let qy = a.y - start.y;
            let t = (qx * sy - qy * sx) / denom;
            let u = (qx * ry - qy * rx) / denom;
            if t > 0.0 && t < 1.0 && (0.0..=1.0).contains(&u) {
                params.push(t);
            }
        }
    }

    params
}

/// Winding number of the polygon set around a point
fn winding_number(polygons: &[Polygon], point: &Vertex2D) -> i32 {
    let mut winding = 0;
    for polygon in polygons {
        let n = polygon.vertices.len();
        for i in 0..n {
            let a = &polygon.vertices[i];
            let b = &polygon.vertices[(i + 1) % n];
            let side = (b.x - a.x) * (point.y - a.y) - (point.x - a.x) * (b.y - a.y);
            if a.y <= point.y {
                if b.y > point.y && side > 0.0 {
                    winding += 1;
                }
            } else if b.y <= point.y && side < 0.0 {
                winding -= 1;
            }
        }
    }
    winding
}

/// Whether a point lies inside the polygon set under the given fill rule
///
/// Points on an edge, within half the clipping precision, are inside.
pub fn contains_point(polygons: &[Polygon], point: &Vertex2D, fill_rule: FillRule) -> bool {
    on_boundary(polygons, point) || filled_predicate(fill_rule)(winding_number(polygons, point))
}

fn on_boundary(polygons: &[Polygon], point: &Vertex2D) -> bool {
    polygons.iter().any(|polygon| {
        let n = polygon.vertices.len();
        (0..n).any(|i| {
            let a = &polygon.vertices[i];
            let b = &polygon.vertices[(i + 1) % n];
            segment_distance(a, b, point) <= BOUNDARY_TOLERANCE
        })
    })
}

/// Distance from `point` to the segment `a -> b`
fn segment_distance(a: &Vertex2D, b: &Vertex2D, point: &Vertex2D) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let length_sq = dx * dx + dy * dy;
    if length_sq == 0.0 {
        return a.distance(point);
    }
    let t = (((point.x - a.x) * dx + (point.y - a.y) * dy) / length_sq).clamp(0.0, 1.0);
    a.lerp(b, t).distance(point)
}

/// Map a winding number to inside/outside under a fill rule
fn filled_predicate(fill_rule: FillRule) -> fn(i32) -> bool {
    match fill_rule {
        FillRule::EvenOdd => |winding| winding % 2 != 0,
        FillRule::Positive => |winding| winding > 0,
        FillRule::Negative => |winding| winding < 0,
        _ => |winding| winding != 0,
    }
}

/// Net area covered by a polygon set
///
/// Holes produced by the boolean operations are oriented opposite to their
/// outer loops, so summing signed areas subtracts them.
pub fn polygons_area(polygons: &[Polygon]) -> f64 {
    polygons.iter().map(Polygon::signed_area).sum::<f64>().abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, size: f64) -> Polygon {
        Polygon::rectangle(x0, y0, x0 + size, y0 + size)
    }

    fn line(points: &[(f64, f64)]) -> Polyline {
        Polyline::new(points.iter().copied().map(Vertex2D::from).collect())
    }

    #[test]
    fn test_union_two_squares() {
        let result = union_polygons(
            &[square(0.0, 0.0, 10.0)],
            &[square(5.0, 5.0, 10.0)],
            FillRule::NonZero,
        )
        .expect("Failed to union polygons");

        assert_eq!(result.len(), 1, "Expected one merged polygon");
        assert!((polygons_area(&result) - 175.0).abs() < 1e-6);
    }

    #[test]
    fn test_union_with_empty_subject_uses_clip() {
        let result = union_polygons(&[], &[square(0.0, 0.0, 4.0)], FillRule::NonZero).unwrap();
        assert!((polygons_area(&result) - 16.0).abs() < 1e-6);
        assert!(union_all(&[], FillRule::NonZero).unwrap().is_empty());
    }

    #[test]
    fn test_union_all_fill_rules() {
        // Two coincident squares: non-zero keeps the area, even-odd cancels it
        let doubled = [square(0.0, 0.0, 10.0), square(0.0, 0.0, 10.0)];
        let non_zero = union_all(&doubled, FillRule::NonZero).unwrap();
        assert!((polygons_area(&non_zero) - 100.0).abs() < 1e-6);
        let even_odd = union_all(&doubled, FillRule::EvenOdd).unwrap();
        assert!(polygons_area(&even_odd) < 1e-6);
    }

    #[test]
    fn test_intersection_two_squares() {
        let result = intersect_polygons(
            &[square(0.0, 0.0, 10.0)],
            &[square(5.0, 5.0, 10.0)],
            FillRule::NonZero,
        )
        .expect("Failed to intersect polygons");

        // Overlapping region (5,5) to (10,10)
        assert!((polygons_area(&result) - 25.0).abs() < 1e-6);
    }

    #[test]
    fn test_intersection_with_empty_operand() {
        let result = intersect_polygons(&[square(0.0, 0.0, 1.0)], &[], FillRule::NonZero).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_difference_two_squares() {
        let result = difference_polygons(
            &[square(0.0, 0.0, 10.0)],
            &[square(5.0, 5.0, 10.0)],
            FillRule::NonZero,
        )
        .expect("Failed to compute difference");

        assert!((polygons_area(&result) - 75.0).abs() < 1e-6);
    }

    #[test]
    fn test_difference_with_empty_clip_is_identity() {
        let subject = vec![square(0.3, 0.7, 2.0)];
        let result = difference_polygons(&subject, &[], FillRule::NonZero).unwrap();
        assert_eq!(result, subject);
    }

    #[test]
    fn test_difference_of_identical_squares_is_empty() {
        let result = difference_polygons(
            &[square(0.0, 0.0, 10.0)],
            &[square(0.0, 0.0, 10.0)],
            FillRule::NonZero,
        )
        .unwrap();
        assert!(polygons_area(&result) < 1e-6);
    }

    #[test]
    fn test_offset_grows_square() {
        let result = offset_polygons(&[square(0.0, 0.0, 10.0)], 1.0).unwrap();
        // Miter joins keep square corners
        assert!((polygons_area(&result) - 144.0).abs() < 0.5);

        let shrunk = offset_polygons(&[square(0.0, 0.0, 10.0)], -1.0).unwrap();
        assert!((polygons_area(&shrunk) - 64.0).abs() < 0.5);
    }

    #[test]
    fn test_offset_rejects_non_finite_distance() {
        assert!(offset_polygons(&[square(0.0, 0.0, 1.0)], f64::INFINITY).is_err());
        assert!(offset_polylines(&[line(&[(0.0, 0.0), (1.0, 0.0)])], f64::NAN).is_err());
    }

    #[test]
    fn test_offset_polyline_makes_band() {
        let band = offset_polylines(&[line(&[(0.0, 0.0), (10.0, 0.0)])], 0.5).unwrap();
        // 10 x 1 rectangle plus two half discs of radius 0.5
        let expected = 10.0 + std::f64::consts::PI * 0.25;
        assert!((polygons_area(&band) - expected).abs() < 0.1);

        assert!(offset_polylines(&[line(&[(0.0, 0.0)])], 0.5).unwrap().is_empty());
        assert!(
            offset_polylines(&[line(&[(0.0, 0.0), (1.0, 0.0)])], 0.0)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_clip_polyline_through_square() {
        let fragments = clip_polylines(
            &[line(&[(-5.0, 5.0), (15.0, 5.0)])],
            &[square(0.0, 0.0, 10.0)],
            FillRule::NonZero,
        );
        assert_eq!(fragments.len(), 1);
        let fragment = &fragments[0];
        assert_eq!(fragment.vertices.len(), 2);
        assert!((fragment.vertices[0].x - 0.0).abs() < 1e-9);
        assert!((fragment.vertices[1].x - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_clip_polyline_keeps_corner_inside() {
        let fragments = clip_polylines(
            &[line(&[(-5.0, 5.0), (5.0, 5.0), (5.0, 15.0)])],
            &[square(0.0, 0.0, 10.0)],
            FillRule::NonZero,
        );
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].vertices.len(), 3);
        assert!((fragments[0].length() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_clip_polyline_splits_at_gap() {
        let fragments = clip_polylines(
            &[line(&[(-1.0, 1.0), (30.0, 1.0)])],
            &[square(0.0, 0.0, 10.0), square(20.0, 0.0, 5.0)],
            FillRule::NonZero,
        );
        assert_eq!(fragments.len(), 2);
        let total: f64 = fragments.iter().map(Polyline::length).sum();
        assert!((total - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_clip_polyline_outside_is_empty() {
        let fragments = clip_polylines(
            &[line(&[(20.0, 20.0), (30.0, 30.0)])],
            &[square(0.0, 0.0, 10.0)],
            FillRule::NonZero,
        );
        assert!(fragments.is_empty());
        assert!(clip_polylines(&[line(&[(0.0, 0.0), (1.0, 1.0)])], &[], FillRule::NonZero).is_empty());
    }

    #[test]
    fn test_clip_polyline_along_boundary_is_kept() {
        // An outline traced exactly on the area's own edges
        let outline = square(0.0, 0.0, 10.0).to_closed_polyline();
        let fragments = clip_polylines(&[outline], &[square(0.0, 0.0, 10.0)], FillRule::NonZero);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].vertices.len(), 5);
        assert!((fragments[0].length() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_contains_point_on_every_edge() {
        let area = [square(0.0, 0.0, 10.0)];
        for (x, y) in [(5.0, 0.0), (10.0, 5.0), (5.0, 10.0), (0.0, 5.0), (10.0, 10.0)] {
            assert!(
                contains_point(&area, &Vertex2D::new(x, y), FillRule::NonZero),
                "({x}, {y}) not on the boundary"
            );
        }
        assert!(!contains_point(&area, &Vertex2D::new(10.01, 5.0), FillRule::NonZero));
    }

    #[test]
    fn test_contains_point_respects_holes() {
        let mut hole = square(2.0, 2.0, 6.0);
        hole.vertices.reverse();
        let ring = [square(0.0, 0.0, 10.0), hole];
        assert!(contains_point(&ring, &Vertex2D::new(1.0, 1.0), FillRule::NonZero));
        assert!(!contains_point(&ring, &Vertex2D::new(5.0, 5.0), FillRule::NonZero));
        assert!(!contains_point(&ring, &Vertex2D::new(11.0, 5.0), FillRule::EvenOdd));
    }

    #[test]
    fn test_polygons_area_subtracts_holes() {
        let mut hole = square(2.0, 2.0, 6.0);
        hole.vertices.reverse();
        assert!((polygons_area(&[square(0.0, 0.0, 10.0), hole]) - 64.0).abs() < 1e-9);
    }
}
