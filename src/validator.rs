//! Validation of solids before and after multi-volume processing
//!
//! [`validate_solids`] runs before any geometry is touched and rejects input
//! that breaks the processing contract:
//! - All solids have the same number of layers
//! - Bonding and stencil widths are finite and non-negative
//! - Every vertex coordinate is finite
//!
//! A solid with more than one role flag is accepted; [`Role::classify`]
//! decides which role wins and a warning is logged.
//!
//! [`find_overlaps`] checks the result of carving: participating solids may
//! not share area at any layer.
//!
//! [`Role::classify`]: crate::model::Role::classify

use crate::error::{Error, Result};
use crate::model::Solid;
use crate::polygon_clipping::{intersect_polygons, polygons_area};
use crate::store;
use clipper2::FillRule;
use tracing::warn;

/// Two carving participants sharing area at one layer
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapViolation {
    /// Name of the earlier solid in input order
    pub first: String,
    /// Name of the later solid in input order
    pub second: String,
    /// Layer index
    pub layer: usize,
    /// Shared area in mm²
    pub area: f64,
}

impl From<OverlapViolation> for Error {
    fn from(violation: OverlapViolation) -> Self {
        Error::OverlapRemaining {
            first: violation.first,
            second: violation.second,
            layer: violation.layer,
            area: violation.area,
        }
    }
}

/// Validate solids before processing
///
/// # Errors
///
/// - [`Error::LayerCountMismatch`] if the layer counts differ
/// - [`Error::InvalidSettings`] for unusable widths, naming the solid
/// - [`Error::InvalidGeometry`] for non-finite coordinates
pub fn validate_solids(solids: &[Solid]) -> Result<()> {
    store::layer_count(solids)?;
    for solid in solids {
        validate_settings(solid)?;
        validate_geometry(solid)?;
        if solid.settings().role_flag_count() > 1 {
            warn!(
                solid = solid.name(),
                role = %solid.role(),
                "Several role flags set, using the highest-priority role"
            );
        }
    }
    Ok(())
}

fn validate_settings(solid: &Solid) -> Result<()> {
    solid.settings().validate().map_err(|err| match err {
        Error::InvalidSettings(message) => {
            Error::InvalidSettings(format!("Solid '{}': {}", solid.name(), message))
        }
        other => other,
    })
}

fn validate_geometry(solid: &Solid) -> Result<()> {
    for (layer_nr, layer) in solid.layers.iter().enumerate() {
        if let Some(vertex) = layer.vertices().find(|vertex| !vertex.is_finite()) {
            return Err(Error::InvalidGeometry {
                solid: solid.name().to_string(),
                layer: layer_nr,
                message: format!("Non-finite vertex ({}, {})", vertex.x, vertex.y),
            });
        }
    }
    Ok(())
}

/// Find pairs of carving participants that share more than `tolerance` mm²
///
/// Violations are reported pair by pair in input order, and by ascending
/// layer within a pair.
pub fn find_overlaps(solids: &[Solid], tolerance: f64) -> Result<Vec<OverlapViolation>> {
    let layer_count = store::layer_count(solids)?;
    let participants: Vec<&Solid> = solids
        .iter()
        .filter(|solid| solid.takes_part_in_carving())
        .collect();
    let mut violations = Vec::new();

    for (index, first) in participants.iter().enumerate() {
        for second in &participants[index + 1..] {
            if !first.bounds().hit(second.bounds()) {
                continue;
            }
            for layer_nr in 0..layer_count {
                let shared = intersect_polygons(
                    &first.layer(layer_nr)?.polygons,
                    &second.layer(layer_nr)?.polygons,
                    FillRule::NonZero,
                )
                .map_err(|e| Error::clipping(first.name(), layer_nr, e))?;
                let area = polygons_area(&shared);
                if area > tolerance {
                    violations.push(OverlapViolation {
                        first: first.name().to_string(),
                        second: second.name().to_string(),
                        layer: layer_nr,
                        area,
                    });
                }
            }
        }
    }

    Ok(violations)
}
