//! Bonding overlap between touching solids
//!
//! After carving, touching solids share a boundary but no area. For
//! multi-material prints a thin shared band improves adhesion, so each solid
//! with a bonding width grows into its neighbours, but only near its own
//! boundary: the neighbours' footprint (widened by the merge margin to bridge
//! hairline gaps) is intersected with the solid's core grown by half the
//! bonding width, and the result is unioned back into the solid.
//!
//! The core is the solid minus its neighbours widened by the merge margin, so
//! it ignores bands that were already exchanged. Bands never leave the closed
//! union of the layer: the union of all carving solids, with gaps narrower
//! than twice the margin filled. Growth repeats until no solid gains area, so
//! running the stage on its own output changes nothing.

use crate::error::{Error, Result};
use crate::model::{LayerGeometry, Polygon, Solid, SolidSettings};
use crate::polygon_clipping::{
    ClippingError, difference_polygons, intersect_polygons, offset_polygons, union_all,
    union_polygons,
};
use crate::store;
use clipper2::FillRule;
use tracing::{debug, info, warn};

/// Upper bound on growth rounds per layer
const MAX_BONDING_ROUNDS: usize = 8;

/// One solid that grows a bonding band, with the neighbours it grows into
struct BondingPlan {
    solid: usize,
    neighbours: Vec<usize>,
    half_width: f64,
    settings: SolidSettings,
}

fn bonding_plans(solids: &[Solid], merge_margin: f64) -> Vec<BondingPlan> {
    let mut plans = Vec::new();
    for (index, solid) in solids.iter().enumerate() {
        let width = solid.settings().bonding_overlap_width;
        if width == 0.0 || !solid.takes_part_in_carving() {
            continue;
        }
        let reach = solid.bounds().expand_xy(merge_margin);
        let neighbours: Vec<usize> = solids
            .iter()
            .enumerate()
            .filter(|(other_index, other)| {
                *other_index != index
                    && other.takes_part_in_carving()
                    && other.bounds().hit(&reach)
            })
            .map(|(other_index, _)| other_index)
            .collect();
        if neighbours.is_empty() {
            debug!(solid = solid.name(), "No neighbours within reach, no bonding band");
            continue;
        }
        plans.push(BondingPlan {
            solid: index,
            neighbours,
            half_width: width / 2.0,
            settings: solid.settings().clone(),
        });
    }
    plans
}

/// Reintroduce a thin overlap band where participating solids touch
///
/// Solids are processed in input order; a later solid sees the bands already
/// added to earlier ones. Does nothing for fewer than two solids.
///
/// # Arguments
///
/// * `solids` - All solids; only their closed areas are rewritten
/// * `merge_margin` - Outward offset applied to neighbour areas before intersecting
/// * `parallel` - Process layers in parallel
pub fn generate_bonding_overlap(
    solids: &mut [Solid],
    merge_margin: f64,
    parallel: bool,
) -> Result<()> {
    if solids.len() < 2 {
        return Ok(());
    }
    let layer_count = store::layer_count(solids)?;
    let plans = bonding_plans(solids, merge_margin);
    info!(
        solids = solids.len(),
        layers = layer_count,
        bonding = plans.len(),
        merge_margin,
        "Generating bonding overlap"
    );
    if plans.is_empty() {
        return Ok(());
    }

    let participants: Vec<usize> = solids
        .iter()
        .enumerate()
        .filter(|(_, solid)| solid.takes_part_in_carving())
        .map(|(index, _)| index)
        .collect();
    let names: Vec<String> = solids.iter().map(|s| s.name().to_string()).collect();
    let by_layer = store::split_by_layer(solids)?;
    store::for_each_layer(by_layer, parallel, |layer_nr, layers| {
        let hull = closed_union(&participants, layers, merge_margin)
            .map_err(|e| Error::clipping(&names[plans[0].solid], layer_nr, e))?;
        if hull.is_empty() {
            return Ok(());
        }
        for _ in 0..MAX_BONDING_ROUNDS {
            if !grow_bands(&plans, layers, &hull, merge_margin, &names, layer_nr)? {
                return Ok(());
            }
        }
        warn!(
            layer = layer_nr,
            rounds = MAX_BONDING_ROUNDS,
            "Bonding bands still growing, stopped"
        );
        Ok(())
    })
}

/// Union of the carving solids with gaps below twice the margin closed
fn closed_union(
    participants: &[usize],
    layers: &[&mut LayerGeometry],
    merge_margin: f64,
) -> std::result::Result<Vec<Polygon>, ClippingError> {
    let area: Vec<Polygon> = participants
        .iter()
        .flat_map(|&index| layers[index].polygons.iter().cloned())
        .collect();
    let union = union_all(&area, FillRule::NonZero)?;
    if merge_margin <= 0.0 {
        return Ok(union);
    }
    let widened = offset_polygons(&union, merge_margin)?;
    offset_polygons(&widened, -merge_margin)
}

/// One growth round over every plan; returns whether any solid gained area
fn grow_bands(
    plans: &[BondingPlan],
    layers: &mut [&mut LayerGeometry],
    hull: &[Polygon],
    merge_margin: f64,
    names: &[String],
    layer_nr: usize,
) -> Result<bool> {
    // Cores are taken before any band is added in this round.
    let mut cores = Vec::with_capacity(plans.len());
    for plan in plans {
        let clipping = |e| Error::clipping(&names[plan.solid], layer_nr, e);
        let neighbour_area: Vec<Polygon> = plan
            .neighbours
            .iter()
            .flat_map(|&neighbour| layers[neighbour].polygons.iter().cloned())
            .collect();
        let widened = offset_polygons(&neighbour_area, merge_margin).map_err(clipping)?;
        let core = difference_polygons(&layers[plan.solid].polygons, &widened, FillRule::NonZero)
            .map_err(clipping)?;
        cores.push(core);
    }

    let mut grew = false;
    for (plan, core) in plans.iter().zip(&cores) {
        if core.is_empty() {
            continue;
        }
        let clipping = |e| Error::clipping(&names[plan.solid], layer_nr, e);
        let settings = &plan.settings;

        let mut footprint: Vec<Polygon> = Vec::new();
        for &neighbour in &plan.neighbours {
            let area = &layers[neighbour].polygons;
            if area.is_empty() {
                continue;
            }
            let widened = offset_polygons(area, merge_margin).map_err(clipping)?;
            footprint = union_polygons(&footprint, &widened, settings.fill_rule())
                .map_err(clipping)?;
        }
        if footprint.is_empty() {
            continue;
        }

        let grown = offset_polygons(core, plan.half_width + merge_margin).map_err(clipping)?;
        let near = intersect_polygons(&footprint, &grown, FillRule::NonZero).map_err(clipping)?;
        let band = intersect_polygons(&near, hull, FillRule::NonZero).map_err(clipping)?;
        let own = &layers[plan.solid].polygons;
        let gain = difference_polygons(&band, own, FillRule::NonZero).map_err(clipping)?;
        if gain.is_empty() {
            continue;
        }
        let bonded = union_polygons(own, &gain, settings.fill_rule()).map_err(clipping)?;
        layers[plan.solid].polygons = bonded;
        grew = true;
    }
    Ok(grew)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoundingBox;
    use crate::polygon_clipping::polygons_area;

    fn solid(name: &str, settings: SolidSettings, x0: f64) -> Solid {
        Solid::new(
            name,
            settings,
            BoundingBox::from_corners((x0, 0.0, 0.0), (x0 + 10.0, 10.0, 1.0)),
            vec![LayerGeometry::default()],
        )
    }

    #[test]
    fn test_plans_skip_zero_width_and_excluded_roles() {
        let solids = vec![
            solid("a", SolidSettings::new(), 0.0),
            solid("b", SolidSettings::new().with_bonding_overlap(0.0), 10.0),
            solid("c", SolidSettings::new().as_support(), 5.0),
        ];
        let plans = bonding_plans(&solids, 0.02);
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].solid, 0);
        // Zero-width solids are still neighbours; excluded roles are not
        assert_eq!(plans[0].neighbours, vec![1]);
        assert_eq!(plans[0].half_width, 0.075);
    }

    #[test]
    fn test_merge_margin_bridges_adjacent_bounds() {
        let solids = vec![
            solid("a", SolidSettings::new(), 0.0),
            solid("b", SolidSettings::new(), 10.01),
        ];
        assert_eq!(bonding_plans(&solids, 0.02).len(), 2);
        assert!(bonding_plans(&solids, 0.0).is_empty());
    }

    #[test]
    fn test_single_solid_is_untouched() {
        let mut solids = vec![solid("only", SolidSettings::new(), 0.0)];
        solids[0].layers[0] = LayerGeometry::from_polygons(vec![Polygon::rectangle(
            0.0, 0.0, 10.0, 10.0,
        )]);
        let before = solids[0].layers.clone();
        generate_bonding_overlap(&mut solids, 0.02, false).unwrap();
        assert_eq!(solids[0].layers, before);
    }

    fn squares(a: (f64, f64), b: (f64, f64)) -> Vec<Solid> {
        let mut solids = vec![
            solid("left", SolidSettings::new().with_bonding_overlap(0.2), a.0),
            solid("right", SolidSettings::new().with_bonding_overlap(0.2), b.0),
        ];
        solids[0].layers[0] = LayerGeometry::from_polygons(vec![Polygon::rectangle(
            a.0, 0.0, a.1, 10.0,
        )]);
        solids[1].layers[0] = LayerGeometry::from_polygons(vec![Polygon::rectangle(
            b.0, 0.0, b.1, 10.0,
        )]);
        solids
    }

    #[test]
    fn test_touching_solids_share_a_band() {
        let mut solids = squares((0.0, 10.0), (10.0, 20.0));
        generate_bonding_overlap(&mut solids, 0.0, false).unwrap();

        let shared = intersect_polygons(
            &solids[0].layers[0].polygons,
            &solids[1].layers[0].polygons,
            FillRule::NonZero,
        )
        .unwrap();
        // Each side grows half the bonding width into the other
        assert!((polygons_area(&shared) - 0.2 * 10.0).abs() < 0.05);
        assert!((polygons_area(&solids[0].layers[0].polygons) - 101.0).abs() < 0.05);
        assert!((polygons_area(&solids[1].layers[0].polygons) - 101.0).abs() < 0.05);
    }

    #[test]
    fn test_second_pass_adds_nothing() {
        let mut solids = squares((0.0, 10.0), (10.0, 20.0));
        generate_bonding_overlap(&mut solids, 0.0, false).unwrap();
        let once: Vec<f64> = solids
            .iter()
            .map(|s| polygons_area(&s.layers[0].polygons))
            .collect();
        generate_bonding_overlap(&mut solids, 0.0, false).unwrap();
        for (solid, before) in solids.iter().zip(once) {
            assert!((polygons_area(&solid.layers[0].polygons) - before).abs() < 1e-6);
        }
    }

    #[test]
    fn test_merge_margin_bridges_hairline_gap() {
        let mut solids = squares((0.0, 10.0), (10.01, 20.01));
        generate_bonding_overlap(&mut solids, 0.02, false).unwrap();
        assert!(polygons_area(&solids[0].layers[0].polygons) > 100.9);
        let shared = intersect_polygons(
            &solids[0].layers[0].polygons,
            &solids[1].layers[0].polygons,
            FillRule::NonZero,
        )
        .unwrap();
        assert!(polygons_area(&shared) > 0.5);
    }

    #[test]
    fn test_closed_union_fills_hairline_gap_only() {
        let mut left = LayerGeometry::from_polygons(vec![Polygon::rectangle(0.0, 0.0, 10.0, 10.0)]);
        let mut right =
            LayerGeometry::from_polygons(vec![Polygon::rectangle(10.01, 0.0, 20.0, 10.0)]);
        let layers = [&mut left, &mut right];

        let hull = closed_union(&[0, 1], &layers, 0.02).unwrap();
        assert!((polygons_area(&hull) - 200.0).abs() < 1e-6);
        let unclosed = closed_union(&[0, 1], &layers, 0.0).unwrap();
        assert!((polygons_area(&unclosed) - 199.9).abs() < 1e-6);
    }

    #[test]
    fn test_band_stays_inside_solids_at_open_seam_ends() {
        let mut solids = squares((0.0, 10.0), (10.0, 20.0));
        solids[1].layers[0] =
            LayerGeometry::from_polygons(vec![Polygon::rectangle(10.0, 5.0, 20.0, 15.0)]);
        let union_before = polygons_area(
            &union_all(
                &[
                    solids[0].layers[0].polygons.clone(),
                    solids[1].layers[0].polygons.clone(),
                ]
                .concat(),
                FillRule::NonZero,
            )
            .unwrap(),
        );

        generate_bonding_overlap(&mut solids, 0.02, false).unwrap();

        let all = [
            solids[0].layers[0].polygons.clone(),
            solids[1].layers[0].polygons.clone(),
        ]
        .concat();
        let union_after = polygons_area(&union_all(&all, FillRule::NonZero).unwrap());
        assert!((union_after - union_before).abs() < 1e-6);
    }
}
