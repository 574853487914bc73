//! Error types for multi-volume processing
//!
//! Every failure in this crate is a contract violation by the caller or by the
//! upstream slicing stage: the algorithms themselves are deterministic and have no
//! transient failure modes. Errors carry the solid name and layer index wherever
//! one is known, so a malformed model can be traced back to its source.
//!
//! # Error Codes
//!
//! Error codes follow the pattern: `E<category><number>`
//!
//! Categories:
//! - **E1xxx**: Input contract violations
//! - **E2xxx**: Failures reported by the polygon boolean primitive
//! - **E3xxx**: Post-condition checks
//!
//! ## Error Codes
//!
//! - `E1001`: Solids disagree on their number of layers
//! - `E1002`: A layer index outside a solid's range was requested
//! - `E1003`: Invalid or unrecognised settings
//! - `E1004`: Invalid layer geometry (non-finite coordinates)
//! - `E2001`: Polygon clipping failed
//! - `E3001`: Area overlap left behind after carving

use crate::polygon_clipping::ClippingError;
use thiserror::Error;

/// Result type for multi-volume operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving multi-volume conflicts
#[derive(Error, Debug)]
pub enum Error {
    /// Solids disagree on their number of layers
    ///
    /// **Error Code**: E1001
    ///
    /// **Common Causes**:
    /// - Solids sliced with different layer height settings
    /// - A solid added after the layer count was fixed
    #[error("[E1001] Solid '{solid}' has {found} layers, expected {expected}")]
    LayerCountMismatch {
        /// Name of the offending solid
        solid: String,
        /// Layer count of the first solid
        expected: usize,
        /// Layer count of the offending solid
        found: usize,
    },

    /// A layer index outside a solid's range was requested
    ///
    /// **Error Code**: E1002
    #[error("[E1002] Layer {layer} is out of range for solid '{solid}' ({layer_count} layers)")]
    LayerOutOfRange {
        /// Name of the solid
        solid: String,
        /// Requested layer index
        layer: usize,
        /// Number of layers the solid has
        layer_count: usize,
    },

    /// Invalid or unrecognised settings
    ///
    /// **Error Code**: E1003
    ///
    /// **Common Causes**:
    /// - Unknown surface representation mode
    /// - Negative or non-finite widths
    /// - Malformed JSON configuration
    #[error("[E1003] Invalid settings: {0}")]
    InvalidSettings(String),

    /// Invalid layer geometry
    ///
    /// **Error Code**: E1004
    #[error("[E1004] Invalid geometry in solid '{solid}' at layer {layer}: {message}")]
    InvalidGeometry {
        /// Name of the solid
        solid: String,
        /// Layer index
        layer: usize,
        /// Description of the problem
        message: String,
    },

    /// Invalid source mesh
    ///
    /// **Error Code**: E1005
    ///
    /// **Common Causes**:
    /// - Mesh without vertices or triangles
    /// - Triangle referencing a vertex index past the vertex list
    #[error("[E1005] Invalid mesh: {0}")]
    InvalidMesh(String),

    /// Polygon clipping failed
    ///
    /// **Error Code**: E2001
    #[error("[E2001] Clipping failed for solid '{solid}' at layer {layer}: {source}")]
    Clipping {
        /// Name of the solid being modified
        solid: String,
        /// Layer index
        layer: usize,
        /// Underlying clipping error
        #[source]
        source: ClippingError,
    },

    /// Area overlap left behind after carving
    ///
    /// **Error Code**: E3001
    #[error(
        "[E3001] Solids '{first}' and '{second}' still overlap by {area:.4} mm² at layer {layer}"
    )]
    OverlapRemaining {
        /// First solid of the pair
        first: String,
        /// Second solid of the pair
        second: String,
        /// Layer index
        layer: usize,
        /// Overlapping area
        area: f64,
    },
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidSettings(format!("Failed to parse configuration: {}", err))
    }
}

impl Error {
    /// Wrap a clipping error with the solid and layer it happened at
    pub fn clipping(solid: &str, layer: usize, source: ClippingError) -> Self {
        Error::Clipping {
            solid: solid.to_string(),
            layer,
            source,
        }
    }

    /// Create an InvalidSettings error naming the setting and the rejected value
    pub fn invalid_setting(name: &str, value: impl std::fmt::Display, expected: &str) -> Self {
        Error::InvalidSettings(format!(
            "'{}' must be {}, got '{}'",
            name, expected, value
        ))
    }
}
