//! Pipeline-wide configuration

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default distance used to bridge neighbouring solids when bonding, in millimetres
pub const DEFAULT_MERGE_MARGIN: f64 = 0.02;

/// Options that apply to the whole multi-volume pass rather than to one solid
///
/// # Example
///
/// ```
/// use layercarve::CarveConfig;
///
/// let config = CarveConfig::new()
///     .with_alternate_carve_order(false)
///     .with_parallel(false);
/// assert!(!config.alternate_carve_order);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CarveConfig {
    /// Let solids with equal carve order swap precedence on even layers
    pub alternate_carve_order: bool,
    /// Outward offset applied to neighbours when collecting the bonding footprint
    pub merge_margin: f64,
    /// Process the layers of each stage in parallel
    pub parallel: bool,
    /// Fail if carving leaves overlapping area between ordinary solids
    pub verify_non_overlap: bool,
}

impl Default for CarveConfig {
    fn default() -> Self {
        Self {
            alternate_carve_order: true,
            merge_margin: DEFAULT_MERGE_MARGIN,
            parallel: true,
            verify_non_overlap: false,
        }
    }
}

impl CarveConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON; missing keys keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Enable or disable alternating carve order for tied solids
    pub fn with_alternate_carve_order(mut self, enabled: bool) -> Self {
        self.alternate_carve_order = enabled;
        self
    }

    /// Set the bonding merge margin
    pub fn with_merge_margin(mut self, margin: f64) -> Self {
        self.merge_margin = margin;
        self
    }

    /// Enable or disable per-layer parallelism
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Enable or disable the non-overlap check after carving
    pub fn with_verification(mut self, verify: bool) -> Self {
        self.verify_non_overlap = verify;
        self
    }

    /// Check numeric options
    pub fn validate(&self) -> Result<()> {
        if !self.merge_margin.is_finite() || self.merge_margin < 0.0 {
            return Err(Error::invalid_setting(
                "merge-margin",
                self.merge_margin,
                "a finite, non-negative length",
            ));
        }
        Ok(())
    }
}
