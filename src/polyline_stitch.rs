//! Re-stitching of curve fragments into open chains and closed loops
//!
//! Cutting a surface curve against several areas leaves it in pieces whose
//! endpoints no longer coincide exactly. Stitching chains pieces greedily by
//! nearest endpoint, reversing a piece when its far end is the closer one, and
//! promotes a chain to a closed polygon once its two ends meet.

use crate::model::{Polygon, Polyline, Vertex2D};

/// Result of stitching: chains that stayed open and loops that closed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stitched {
    /// Open chains
    pub polylines: Vec<Polyline>,
    /// Closed loops
    pub polygons: Vec<Polygon>,
}

/// Join fragments whose endpoints lie within `max_distance` of each other
///
/// A chain becomes a closed polygon when its ends are within `max_distance`,
/// it has at least three distinct vertices and it is longer than twice the
/// tolerance. Fragments with fewer than two vertices are dropped.
pub fn stitch(fragments: Vec<Polyline>, max_distance: f64) -> Stitched {
    let mut pieces: Vec<Vec<Vertex2D>> = fragments
        .into_iter()
        .map(|fragment| fragment.vertices)
        .filter(|vertices| vertices.len() >= 2)
        .collect();
    let mut used = vec![false; pieces.len()];
    let mut stitched = Stitched::default();

    for start in 0..pieces.len() {
        if used[start] {
            continue;
        }
        used[start] = true;
        let mut chain = std::mem::take(&mut pieces[start]);

        // Grow the back end first, then flip and grow what was the front end.
        for _ in 0..2 {
            while !closes(&chain, max_distance) {
                let Some(end) = chain.last().copied() else {
                    break;
                };
                let Some((next, reversed)) = nearest_piece(&pieces, &used, &end, max_distance)
                else {
                    break;
                };
                used[next] = true;
                let mut piece = std::mem::take(&mut pieces[next]);
                if reversed {
                    piece.reverse();
                }
                append_piece(&mut chain, piece);
            }
            if closes(&chain, max_distance) {
                break;
            }
            chain.reverse();
        }

        if closes(&chain, max_distance) {
            if let (Some(first), Some(last)) = (chain.first(), chain.last()) {
                if first.distance(last) <= f64::EPSILON {
                    chain.pop();
                }
            }
            stitched.polygons.push(Polygon::new(chain));
        } else {
            stitched.polylines.push(Polyline::new(chain));
        }
    }

    stitched
}

/// Find the unused piece with an endpoint nearest to `end`
///
/// Returns the piece index and whether it has to be reversed to continue the chain.
fn nearest_piece(
    pieces: &[Vec<Vertex2D>],
    used: &[bool],
    end: &Vertex2D,
    max_distance: f64,
) -> Option<(usize, bool)> {
    let mut best: Option<(usize, bool)> = None;
    let mut best_distance = max_distance;

    for (index, piece) in pieces.iter().enumerate() {
        if used[index] {
            continue;
        }
        let (Some(front), Some(back)) = (piece.first(), piece.last()) else {
            continue;
        };
        let to_front = end.distance(front);
        if to_front <= best_distance {
            best_distance = to_front;
            best = Some((index, false));
        }
        let to_back = end.distance(back);
        if to_back < best_distance {
            best_distance = to_back;
            best = Some((index, true));
        }
    }

    best
}

/// Append a piece, dropping its first vertex when it coincides with the chain end
fn append_piece(chain: &mut Vec<Vertex2D>, piece: Vec<Vertex2D>) {
    let skip = match (chain.last(), piece.first()) {
        (Some(last), Some(first)) if last.distance(first) <= f64::EPSILON => 1,
        _ => 0,
    };
    chain.extend(piece.into_iter().skip(skip));
}

fn closes(chain: &[Vertex2D], max_distance: f64) -> bool {
    let (Some(first), Some(last)) = (chain.first(), chain.last()) else {
        return false;
    };
    if first.distance(last) > max_distance {
        return false;
    }
    let closing_duplicate = usize::from(first.distance(last) <= f64::EPSILON);
    if chain.len() - closing_duplicate < 3 {
        return false;
    }
    let length: f64 = chain.windows(2).map(|pair| pair[0].distance(&pair[1])).sum();
    length > 2.0 * max_distance
}
