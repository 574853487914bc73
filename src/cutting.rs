//! Cutting stencils
//!
//! A cutting stencil takes over the area of every solid it overlaps: the
//! shared area is removed from the other solid and handed to the stencil.
//! Stencils in a surface mode also carry their boundary as open curves. Those
//! curves are cut into fragments by the solids they cross and re-stitched
//! afterwards, so the stencil ends up with the parts of its skin that lie
//! inside printed solids. A surface+interior stencil also keeps the interior
//! area it took.

use crate::error::{Error, Result};
use crate::model::{LayerGeometry, Polygon, Polyline, Role, Solid, SurfaceMode};
use crate::polygon_clipping::{
    ClippingError, clip_polylines, difference_polygons, intersect_polygons, offset_polylines,
    union_all, union_polygons,
};
use crate::polyline_stitch::stitch;
use crate::store;
use clipper2::FillRule;
use tracing::{debug, info};

/// A stencil and the solids it cuts
#[derive(Debug, Clone)]
struct StencilPlan {
    solid: usize,
    mode: SurfaceMode,
    band_width: f64,
    targets: Vec<usize>,
}

fn stencil_plans(solids: &[Solid]) -> Vec<StencilPlan> {
    let mut plans = Vec::new();
    for (index, stencil) in solids.iter().enumerate() {
        if stencil.role() != Role::CuttingStencil {
            continue;
        }
        let settings = stencil.settings();
        let reach = stencil.bounds().expand_xy(settings.stencil_band_width / 2.0);
        let targets: Vec<usize> = solids
            .iter()
            .enumerate()
            .filter(|(other_index, other)| {
                if *other_index == index || !other.role().is_cut_by_stencils() {
                    return false;
                }
                let hit = other.bounds().hit(&reach);
                if !hit {
                    debug!(
                        stencil = stencil.name(),
                        solid = other.name(),
                        "Bounding boxes disjoint, solid not cut"
                    );
                }
                hit
            })
            .map(|(other_index, _)| other_index)
            .collect();
        debug!(
            stencil = stencil.name(),
            mode = %settings.surface_mode,
            targets = targets.len(),
            "Cutting stencil planned"
        );
        plans.push(StencilPlan {
            solid: index,
            mode: settings.surface_mode,
            band_width: settings.stencil_band_width,
            targets,
        });
    }
    plans
}

/// Apply every cutting stencil to the solids it overlaps, layer by layer
///
/// Stencils are applied in input order. Support, anti-overhang and other
/// stencil solids are never cut.
///
/// # Errors
///
/// Fails before touching any geometry if the solids disagree on their layer
/// count, and with [`Error::Clipping`] if a boolean operation fails.
pub fn apply_cutting_meshes(solids: &mut [Solid], parallel: bool) -> Result<()> {
    let layer_count = store::layer_count(solids)?;
    let plans = stencil_plans(solids);
    info!(
        solids = solids.len(),
        layers = layer_count,
        stencils = plans.len(),
        "Applying cutting stencils"
    );
    if plans.is_empty() {
        return Ok(());
    }

    let names: Vec<String> = solids.iter().map(|s| s.name().to_string()).collect();
    let by_layer = store::split_by_layer(solids)?;
    store::for_each_layer(by_layer, parallel, |layer_nr, layers| {
        for plan in &plans {
            cut_layer(plan, layers)
                .map_err(|e| Error::clipping(&names[plan.solid], layer_nr, e))?;
        }
        Ok(())
    })
}

/// Apply one stencil at one layer
fn cut_layer(
    plan: &StencilPlan,
    layers: &mut [&mut LayerGeometry],
) -> std::result::Result<(), ClippingError> {
    let uses_curves = plan.mode.uses_curves();
    let half_width = plan.band_width / 2.0;

    let stencil = &*layers[plan.solid];
    let mut area = stencil.polygons.clone();
    let mut curves: Vec<Polyline> = Vec::new();
    if uses_curves {
        // Closed loops become explicitly closed curves so they can be cut too
        curves.extend(stencil.polylines.iter().cloned());
        curves.extend(area.iter().map(Polygon::to_closed_polyline));
    }
    if plan.mode == SurfaceMode::Surface {
        area.clear();
    }

    let effective = match plan.mode {
        SurfaceMode::Area => area.clone(),
        SurfaceMode::SurfaceAndInterior => {
            let band = offset_polylines(&curves, half_width)?;
            union_polygons(&area, &band, FillRule::NonZero)?
        }
        SurfaceMode::Surface => offset_polylines(&curves, half_width)?,
    };
    if effective.is_empty() {
        return Ok(());
    }

    let mut claimed: Vec<Polygon> = Vec::new();
    let mut fragments: Vec<Polyline> = Vec::new();
    for &target in &plan.targets {
        let target_area = &layers[target].polygons;
        if target_area.is_empty() {
            continue;
        }
        if !area.is_empty() {
            claimed.extend(intersect_polygons(&area, target_area, FillRule::NonZero)?);
        }
        if uses_curves {
            fragments.extend(clip_polylines(&curves, target_area, FillRule::NonZero));
        }
        let remaining = difference_polygons(target_area, &effective, FillRule::NonZero)?;
        layers[target].polygons = remaining;
    }

    let stencil = &mut *layers[plan.solid];
    if uses_curves {
        let stitched = stitch(fragments, plan.band_width);
        stencil.polylines = stitched.polylines;
        // Surface+interior keeps the interior it took even where no loop closes
        stencil.polygons = match plan.mode {
            SurfaceMode::SurfaceAndInterior => {
                union_polygons(&claimed, &stitched.polygons, FillRule::NonZero)?
            }
            _ => stitched.polygons,
        };
    } else {
        stencil.polygons = union_all(&claimed, FillRule::NonZero)?;
    }
    Ok(())
}
