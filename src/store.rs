//! Layer-wise access to the geometry of many solids
//!
//! Every stage works on one layer index at a time and never looks across
//! layers. [`split_by_layer`] hands out, for each layer index, mutable views of
//! that layer in every solid. The views of different layers are disjoint, so
//! [`for_each_layer`] can process them on separate threads.

use crate::error::{Error, Result};
use crate::model::{LayerGeometry, Solid};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Mutable views of one layer index across all solids, indexed by solid position
pub type LayerViews<'a> = Vec<&'a mut LayerGeometry>;

/// Number of layers shared by all solids
///
/// Fails with [`Error::LayerCountMismatch`] naming the first solid whose count
/// differs from the first solid's. An empty list has zero layers.
pub fn layer_count(solids: &[Solid]) -> Result<usize> {
    let Some(first) = solids.first() else {
        return Ok(0);
    };
    let expected = first.layer_count();
    match solids.iter().find(|solid| solid.layer_count() != expected) {
        Some(solid) => Err(Error::LayerCountMismatch {
            solid: solid.name().to_string(),
            expected,
            found: solid.layer_count(),
        }),
        None => Ok(expected),
    }
}

/// Split the layers of all solids into per-layer views
pub fn split_by_layer(solids: &mut [Solid]) -> Result<Vec<LayerViews<'_>>> {
    let count = layer_count(solids)?;
    let mut by_layer: Vec<LayerViews<'_>> = (0..count)
        .map(|_| Vec::with_capacity(solids.len()))
        .collect();
    for solid in solids.iter_mut() {
        for (views, geometry) in by_layer.iter_mut().zip(solid.layers.iter_mut()) {
            views.push(geometry);
        }
    }
    Ok(by_layer)
}

/// Run `body` once per layer index, stopping at the first error
///
/// With `parallel` set (and the `parallel` feature enabled) layers are
/// processed on the rayon thread pool; the result does not depend on it.
pub fn for_each_layer<F>(by_layer: Vec<LayerViews<'_>>, parallel: bool, body: F) -> Result<()>
where
    F: Fn(usize, &mut [&mut LayerGeometry]) -> Result<()> + Send + Sync,
{
    if parallel && cfg!(feature = "parallel") {
        run_parallel(by_layer, &body)
    } else {
        run_sequential(by_layer, &body)
    }
}

fn run_sequential<F>(by_layer: Vec<LayerViews<'_>>, body: &F) -> Result<()>
where
    F: Fn(usize, &mut [&mut LayerGeometry]) -> Result<()>,
{
    by_layer
        .into_iter()
        .enumerate()
        .try_for_each(|(layer_nr, mut views)| body(layer_nr, &mut views))
}

#[cfg(feature = "parallel")]
fn run_parallel<F>(by_layer: Vec<LayerViews<'_>>, body: &F) -> Result<()>
where
    F: Fn(usize, &mut [&mut LayerGeometry]) -> Result<()> + Send + Sync,
{
    by_layer
        .into_par_iter()
        .enumerate()
        .try_for_each(|(layer_nr, mut views)| body(layer_nr, &mut views))
}

#[cfg(not(feature = "parallel"))]
fn run_parallel<F>(by_layer: Vec<LayerViews<'_>>, body: &F) -> Result<()>
where
    F: Fn(usize, &mut [&mut LayerGeometry]) -> Result<()>,
{
    run_sequential(by_layer, body)
}
