//! # layercarve
//!
//! Multi-volume conflict resolution for sliced layer geometry.
//!
//! When several solids are sliced into the same stack of layers, their
//! cross-sections can claim the same area. This crate settles who owns what,
//! one layer at a time:
//!
//! - **Carving**: solids are ranked by carve order and lower-ranked solids
//!   lose the area they share with higher-ranked ones
//! - **Bonding overlap**: touching solids grow a thin band into each other so
//!   multi-material prints weld together
//! - **Cutting stencils**: a stencil solid takes over the area of every solid
//!   it overlaps, optionally working on its open boundary curves
//!
//! Layers are independent, so every stage processes them in parallel when the
//! `parallel` feature is enabled.
//!
//! ## Example
//!
//! ```
//! use layercarve::{
//!     BoundingBox, CarveConfig, LayerGeometry, Polygon, Solid, SolidSettings,
//!     polygon_clipping::polygons_area,
//! };
//!
//! # fn main() -> layercarve::Result<()> {
//! let bounds = BoundingBox::from_corners((0.0, 0.0, 0.0), (10.0, 10.0, 0.2));
//! let layer = LayerGeometry::from_polygons(vec![Polygon::rectangle(0.0, 0.0, 10.0, 10.0)]);
//!
//! let mut solids = vec![
//!     Solid::new("first", SolidSettings::new(), bounds, vec![layer.clone()]),
//!     Solid::new("second", SolidSettings::new().with_carve_order(1), bounds, vec![layer]),
//! ];
//! let config = CarveConfig::new().with_alternate_carve_order(false);
//! layercarve::process_multi_volumes(&mut solids, &config)?;
//!
//! // The higher carve order yields: the second solid gave up the whole square
//! assert!(solids[1].layers[0].polygons.is_empty());
//! assert!((polygons_area(&solids[0].layers[0].polygons) - 100.0).abs() < 1e-6);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod carve;
pub mod config;
pub mod cutting;
pub mod error;
pub mod mesh_ops;
pub mod model;
pub mod overlap;
pub mod pipeline;
pub mod polygon_clipping;
pub mod polyline_stitch;
pub mod store;
pub mod validator;

pub use config::CarveConfig;
pub use error::{Error, Result};
pub use model::{
    BoundingBox, LayerGeometry, Mesh, Polygon, Polyline, Role, Solid, SolidSettings, SurfaceMode,
    Triangle, Vertex, Vertex2D,
};
pub use pipeline::process_multi_volumes;
