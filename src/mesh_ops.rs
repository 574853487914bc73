//! Bounding volume computation for solids
//!
//! Solids are compared by their axis-aligned bounding boxes before any per-layer
//! work is done. The box either comes from the source triangle mesh or, when only
//! the sliced layers are available, from the layer outlines and the layer heights.

use crate::error::{Error, Result};
use crate::model::{BoundingBox, LayerGeometry, Mesh};
use nalgebra::Point3;

/// Compute the axis-aligned bounding box (AABB) of a mesh
///
/// Only vertices referenced by a triangle contribute.
///
/// # Arguments
/// * `mesh` - The mesh to compute the bounding box for
///
/// # Returns
/// The bounding box, or an error for meshes without vertices or triangles
pub fn compute_mesh_aabb(mesh: &Mesh) -> Result<BoundingBox> {
    if mesh.vertices.is_empty() {
        return Err(Error::InvalidMesh(
            "Cannot compute bounding box of empty mesh".to_string(),
        ));
    }

    if mesh.triangles.is_empty() {
        return Err(Error::InvalidMesh(
            "Cannot compute bounding box of mesh with no triangles".to_string(),
        ));
    }

    let vertex_count = mesh.vertices.len();
    let mut points = Vec::with_capacity(mesh.triangles.len() * 3);
    for triangle in &mesh.triangles {
        for index in [triangle.v1, triangle.v2, triangle.v3] {
            let vertex = mesh.vertices.get(index).ok_or_else(|| {
                Error::InvalidMesh(format!(
                    "Triangle references vertex {} but mesh has {} vertices",
                    index, vertex_count
                ))
            })?;
            points.push(Point3::new(vertex.x, vertex.y, vertex.z));
        }
    }

    BoundingBox::from_points(points).ok_or_else(|| {
        Error::InvalidMesh("Cannot compute bounding box of empty mesh".to_string())
    })
}

/// Compute the bounding box of sliced layers
///
/// Layer `i` is taken to span `z_bottom + i * layer_height` to
/// `z_bottom + (i + 1) * layer_height`. Returns `None` when no layer holds
/// any vertex.
pub fn compute_layers_aabb(
    layers: &[LayerGeometry],
    z_bottom: f64,
    layer_height: f64,
) -> Option<BoundingBox> {
    let mut first_layer = None;
    let mut last_layer = 0;
    let mut planar: Option<(f64, f64, f64, f64)> = None;

    for (index, layer) in layers.iter().enumerate() {
        for vertex in layer.vertices() {
            first_layer.get_or_insert(index);
            last_layer = index;
            planar = Some(match planar {
                None => (vertex.x, vertex.y, vertex.x, vertex.y),
                Some((x0, y0, x1, y1)) => (
                    x0.min(vertex.x),
                    y0.min(vertex.y),
                    x1.max(vertex.x),
                    y1.max(vertex.y),
                ),
            });
        }
    }

    let first_layer = first_layer?;
    let (x0, y0, x1, y1) = planar?;
    Some(BoundingBox::new(
        Point3::new(x0, y0, (first_layer as f64).mul_add(layer_height, z_bottom)),
        Point3::new(
            x1,
            y1,
            ((last_layer + 1) as f64).mul_add(layer_height, z_bottom),
        ),
    ))
}
