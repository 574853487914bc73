//! Per-solid configuration snapshot and role classification

use crate::error::{Error, Result};
use clipper2::FillRule;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a solid represents its layer geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SurfaceMode {
    /// Closed areas only
    #[default]
    #[serde(rename = "area")]
    Area,
    /// Closed areas plus open boundary curves
    #[serde(rename = "surface+interior")]
    SurfaceAndInterior,
    /// Open boundary curves only
    #[serde(rename = "surface-only")]
    Surface,
}

impl SurfaceMode {
    /// Name used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            SurfaceMode::Area => "area",
            SurfaceMode::SurfaceAndInterior => "surface+interior",
            SurfaceMode::Surface => "surface-only",
        }
    }

    /// Whether open curves are part of the representation
    pub fn uses_curves(&self) -> bool {
        !matches!(self, SurfaceMode::Area)
    }
}

impl fmt::Display for SurfaceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SurfaceMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "area" => Ok(SurfaceMode::Area),
            "surface+interior" => Ok(SurfaceMode::SurfaceAndInterior),
            "surface-only" => Ok(SurfaceMode::Surface),
            other => Err(Error::invalid_setting(
                "surface-representation-mode",
                other,
                "one of 'area', 'surface+interior', 'surface-only'",
            )),
        }
    }
}

/// Configuration snapshot of a single solid
///
/// Resolved upstream; the carving stages only read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SolidSettings {
    /// Rank key for carving; lower values win contested area
    pub carve_order: i32,
    /// Solid only modifies infill of other solids
    pub infill_only: bool,
    /// Solid marks regions where no overhang support is generated
    pub anti_overhang: bool,
    /// Solid is used as support structure
    pub support: bool,
    /// Solid carves and claims area from every ordinary solid
    pub cutting_stencil: bool,
    /// Layer geometry representation
    #[serde(rename = "surface-representation-mode")]
    pub surface_mode: SurfaceMode,
    /// Width of the bonding band against touching solids, 0 disables
    pub bonding_overlap_width: f64,
    /// Union self-intersecting areas with the non-zero rule instead of even-odd
    pub union_all_self_intersections: bool,
    /// Band width of surface curves, also the re-stitch closing tolerance
    pub stencil_band_width: f64,
}

impl Default for SolidSettings {
    fn default() -> Self {
        Self {
            carve_order: 0,
            infill_only: false,
            anti_overhang: false,
            support: false,
            cutting_stencil: false,
            surface_mode: SurfaceMode::Area,
            bonding_overlap_width: 0.15,
            union_all_self_intersections: true,
            stencil_band_width: 0.4,
        }
    }
}

impl SolidSettings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a settings snapshot from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the carve order
    pub fn with_carve_order(mut self, carve_order: i32) -> Self {
        self.carve_order = carve_order;
        self
    }

    /// Set the surface representation mode
    pub fn with_surface_mode(mut self, mode: SurfaceMode) -> Self {
        self.surface_mode = mode;
        self
    }

    /// Set the bonding overlap width
    pub fn with_bonding_overlap(mut self, width: f64) -> Self {
        self.bonding_overlap_width = width;
        self
    }

    /// Set the stencil band width
    pub fn with_stencil_band_width(mut self, width: f64) -> Self {
        self.stencil_band_width = width;
        self
    }

    /// Mark the solid as a cutting stencil
    pub fn as_cutting_stencil(mut self) -> Self {
        self.cutting_stencil = true;
        self
    }

    /// Mark the solid as support
    pub fn as_support(mut self) -> Self {
        self.support = true;
        self
    }

    /// Mark the solid as an anti-overhang region
    pub fn as_anti_overhang(mut self) -> Self {
        self.anti_overhang = true;
        self
    }

    /// Mark the solid as infill-only
    pub fn as_infill_only(mut self) -> Self {
        self.infill_only = true;
        self
    }

    /// Fill rule used when this solid unions areas
    pub fn fill_rule(&self) -> FillRule {
        if self.union_all_self_intersections {
            FillRule::NonZero
        } else {
            FillRule::EvenOdd
        }
    }

    /// Number of role flags set; more than one is resolved by [`Role::classify`]
    pub fn role_flag_count(&self) -> usize {
        [
            self.infill_only,
            self.anti_overhang,
            self.support,
            self.cutting_stencil,
        ]
        .iter()
        .filter(|flag| **flag)
        .count()
    }

    /// Check numeric settings
    pub fn validate(&self) -> Result<()> {
        if !self.bonding_overlap_width.is_finite() || self.bonding_overlap_width < 0.0 {
            return Err(Error::invalid_setting(
                "bonding-overlap-width",
                self.bonding_overlap_width,
                "a finite, non-negative length",
            ));
        }
        if !self.stencil_band_width.is_finite() || self.stencil_band_width < 0.0 {
            return Err(Error::invalid_setting(
                "stencil-band-width",
                self.stencil_band_width,
                "a finite, non-negative length",
            ));
        }
        Ok(())
    }
}

/// What part a solid plays in multi-volume processing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Regular printed solid
    Ordinary,
    /// Only modifies infill of other solids
    InfillOnly,
    /// Suppresses support generation
    AntiOverhang,
    /// Support structure
    Support,
    /// Represented by surface curves
    SurfaceRepresentation,
    /// Boolean stencil against all ordinary solids
    CuttingStencil,
}

impl Role {
    /// Classify a solid from its settings
    ///
    /// Flags are checked in priority order: cutting stencil, support,
    /// anti-overhang, infill-only, then surface representation.
    pub fn classify(settings: &SolidSettings) -> Self {
        if settings.cutting_stencil {
            Role::CuttingStencil
        } else if settings.support {
            Role::Support
        } else if settings.anti_overhang {
            Role::AntiOverhang
        } else if settings.infill_only {
            Role::InfillOnly
        } else if settings.surface_mode.uses_curves() {
            Role::SurfaceRepresentation
        } else {
            Role::Ordinary
        }
    }

    /// Whether the solid is carved against, and carves, other solids by rank,
    /// and whether it takes part in bonding overlap
    ///
    /// Stencils in a surface mode stay out: their area is only settled by the
    /// cutting pass.
    pub fn takes_part_in_carving(&self, mode: SurfaceMode) -> bool {
        match self {
            Role::Ordinary => true,
            Role::CuttingStencil => mode == SurfaceMode::Area,
            _ => false,
        }
    }

    /// Whether cutting stencils remove area from this solid
    pub fn is_cut_by_stencils(&self) -> bool {
        matches!(
            self,
            Role::Ordinary | Role::InfillOnly | Role::SurfaceRepresentation
        )
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Ordinary => "ordinary",
            Role::InfillOnly => "infill-only",
            Role::AntiOverhang => "anti-overhang",
            Role::Support => "support",
            Role::SurfaceRepresentation => "surface-representation",
            Role::CuttingStencil => "cutting-stencil",
        };
        f.write_str(name)
    }
}
