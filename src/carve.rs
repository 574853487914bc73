//! Priority-ordered carving between ordinary solids
//!
//! Solids are ranked by their carve order (stable on ties). Each solid then
//! has the areas of all lower-ranked solids subtracted from it, layer by
//! layer, so that afterwards no two participating solids share area. Area
//! difference is not commutative, so the processing order is fixed up front.
//!
//! With alternating carve order enabled, solids of equal carve order swap
//! which one yields on even layers, spreading contested area between them
//! instead of always favouring the same one.

use crate::error::{Error, Result};
use crate::model::Solid;
use crate::polygon_clipping::difference_polygons;
use crate::store;
use clipper2::FillRule;
use tracing::{debug, info};

/// An ordered pair of solids whose shared area must be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarvePair {
    /// Later-ranked solid, carved by default
    pub current: usize,
    /// Earlier-ranked solid, the carving tool by default
    pub other: usize,
    /// Both solids have the same carve order
    pub tied: bool,
}

impl CarvePair {
    /// Solid indices `(carved, tool)` at the given layer
    pub fn direction(&self, layer_nr: usize, alternate_carve_order: bool) -> (usize, usize) {
        if alternate_carve_order && self.tied && layer_nr % 2 == 0 {
            (self.other, self.current)
        } else {
            (self.current, self.other)
        }
    }
}

/// Solid indices sorted ascending by carve order, ties kept in input order
pub fn rank_solids(solids: &[Solid]) -> Vec<usize> {
    let mut ranked: Vec<usize> = (0..solids.len()).collect();
    ranked.sort_by_key(|&index| solids[index].settings().carve_order);
    ranked
}

/// All pairs that need carving, in processing order
///
/// Pairs with a solid that does not take part in carving, or whose bounding
/// boxes do not touch, are left out.
pub fn carve_pairs(solids: &[Solid]) -> Vec<CarvePair> {
    let ranked = rank_solids(solids);
    let mut pairs = Vec::new();

    for (rank, &current) in ranked.iter().enumerate().skip(1) {
        let current_solid = &solids[current];
        if !current_solid.takes_part_in_carving() {
            debug!(
                solid = current_solid.name(),
                role = %current_solid.role(),
                "Solid excluded from carving"
            );
            continue;
        }
        for &other in &ranked[..rank] {
            let other_solid = &solids[other];
            if !other_solid.takes_part_in_carving() {
                continue;
            }
            if !current_solid.bounds().hit(other_solid.bounds()) {
                debug!(
                    solid = current_solid.name(),
                    other = other_solid.name(),
                    "Bounding boxes disjoint, pair skipped"
                );
                continue;
            }
            pairs.push(CarvePair {
                current,
                other,
                tied: current_solid.settings().carve_order == other_solid.settings().carve_order,
            });
        }
    }

    pairs
}

/// Remove overlap between participating solids, layer by layer
///
/// # Arguments
///
/// * `solids` - All solids; only their closed areas are rewritten
/// * `alternate_carve_order` - Swap the carving direction of tied solids on even layers
/// * `parallel` - Process layers in parallel
///
/// # Errors
///
/// Fails before touching any geometry if the solids disagree on their layer
/// count, and with [`Error::Clipping`] if a boolean operation fails.
pub fn resolve_carving(
    solids: &mut [Solid],
    alternate_carve_order: bool,
    parallel: bool,
) -> Result<()> {
    let layer_count = store::layer_count(solids)?;
    let pairs = carve_pairs(solids);
    info!(
        solids = solids.len(),
        layers = layer_count,
        pairs = pairs.len(),
        alternate_carve_order,
        "Carving overlapping solids"
    );
    if pairs.is_empty() {
        return Ok(());
    }

    let names: Vec<String> = solids.iter().map(|s| s.name().to_string()).collect();
    let by_layer = store::split_by_layer(solids)?;
    store::for_each_layer(by_layer, parallel, |layer_nr, layers| {
        for pair in &pairs {
            let (carved, tool) = pair.direction(layer_nr, alternate_carve_order);
            if layers[carved].polygons.is_empty() || layers[tool].polygons.is_empty() {
                continue;
            }
            let remaining = difference_polygons(
                &layers[carved].polygons,
                &layers[tool].polygons,
                FillRule::NonZero,
            )
            .map_err(|e| Error::clipping(&names[carved], layer_nr, e))?;
            layers[carved].polygons = remaining;
        }
        Ok(())
    })
}
