//! Data structures for sliced multi-volume models

mod bounds;
mod mesh;
mod settings;
mod slice;
mod solid;

pub use bounds::BoundingBox;
pub use mesh::{Mesh, Triangle, Vertex};
pub use settings::{Role, SolidSettings, SurfaceMode};
pub use slice::{LayerGeometry, Polygon, Polyline, Vertex2D};
pub use solid::Solid;
