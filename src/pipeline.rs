//! Full multi-volume pass
//!
//! Runs the three stages in their fixed order, each over all layers before
//! the next one starts:
//!
//! 1. [`resolve_carving`] removes overlap between ordinary solids
//! 2. [`generate_bonding_overlap`] adds back a thin band where solids touch
//! 3. [`apply_cutting_meshes`] hands area over to cutting stencils
//!
//! Bonding relies on carving having removed all overlap, which can be checked
//! in between with [`CarveConfig::verify_non_overlap`].

use crate::carve::resolve_carving;
use crate::config::CarveConfig;
use crate::cutting::apply_cutting_meshes;
use crate::error::Result;
use crate::model::Solid;
use crate::overlap::generate_bonding_overlap;
use crate::validator::{find_overlaps, validate_solids};
use std::time::Instant;
use tracing::info;

/// Shared area in mm² below which two solids are considered disjoint
///
/// Covers the rounding of the 0.01 mm clipping grid.
pub const OVERLAP_TOLERANCE: f64 = 1e-4;

/// Resolve all multi-volume conflicts in place
///
/// # Errors
///
/// Input is validated up front; on a contract violation no geometry is
/// modified. A verification failure after carving is reported as
/// [`Error::OverlapRemaining`](crate::Error::OverlapRemaining) for the first
/// offending pair.
///
/// # Example
///
/// ```
/// use layercarve::{BoundingBox, CarveConfig, LayerGeometry, Polygon, Solid, SolidSettings};
///
/// let square = |x0: f64| {
///     Solid::new(
///         format!("part-{x0}"),
///         SolidSettings::new(),
///         BoundingBox::from_corners((x0, 0.0, 0.0), (x0 + 10.0, 10.0, 0.2)),
///         vec![LayerGeometry::from_polygons(vec![Polygon::rectangle(
///             x0,
///             0.0,
///             x0 + 10.0,
///             10.0,
///         )])],
///     )
/// };
/// let mut solids = vec![square(0.0), square(5.0)];
/// layercarve::process_multi_volumes(&mut solids, &CarveConfig::new()).unwrap();
/// ```
pub fn process_multi_volumes(solids: &mut [Solid], config: &CarveConfig) -> Result<()> {
    config.validate()?;
    validate_solids(solids)?;
    let started = Instant::now();
    info!(
        solids = solids.len(),
        layers = solids.first().map_or(0, Solid::layer_count),
        parallel = config.parallel,
        "Resolving multi-volume conflicts"
    );

    resolve_carving(solids, config.alternate_carve_order, config.parallel)?;
    if config.verify_non_overlap {
        if let Some(violation) = find_overlaps(solids, OVERLAP_TOLERANCE)?.into_iter().next() {
            return Err(violation.into());
        }
    }
    generate_bonding_overlap(solids, config.merge_margin, config.parallel)?;
    apply_cutting_meshes(solids, config.parallel)?;

    info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Multi-volume conflicts resolved"
    );
    Ok(())
}
