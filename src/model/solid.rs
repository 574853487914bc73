//! Sliced solids

use super::{BoundingBox, LayerGeometry, Mesh, Role, SolidSettings};
use crate::error::{Error, Result};
use crate::mesh_ops;
use std::sync::Arc;

/// One sliced input volume
///
/// Name, settings, role and bounds are fixed at construction. Only the
/// per-layer geometry is rewritten by the processing stages.
#[derive(Debug, Clone)]
pub struct Solid {
    name: String,
    source: Option<Arc<Mesh>>,
    settings: SolidSettings,
    role: Role,
    bounds: BoundingBox,
    /// Geometry per layer index
    pub layers: Vec<LayerGeometry>,
}

impl Solid {
    /// Create a solid from already computed bounds
    pub fn new(
        name: impl Into<String>,
        settings: SolidSettings,
        bounds: BoundingBox,
        layers: Vec<LayerGeometry>,
    ) -> Self {
        let role = Role::classify(&settings);
        Self {
            name: name.into(),
            source: None,
            settings,
            role,
            bounds,
            layers,
        }
    }

    /// Create a solid whose bounds are derived from its source mesh
    pub fn from_mesh(
        name: impl Into<String>,
        mesh: Arc<Mesh>,
        settings: SolidSettings,
        layers: Vec<LayerGeometry>,
    ) -> Result<Self> {
        let bounds = mesh_ops::compute_mesh_aabb(&mesh)?;
        let mut solid = Self::new(name, settings, bounds, layers);
        solid.source = Some(mesh);
        Ok(solid)
    }

    /// Create a solid whose bounds are derived from its sliced layers
    ///
    /// Layer `i` spans `z_bottom + i * layer_height` upwards. A solid without
    /// any vertex gets an empty box at `z_bottom`.
    pub fn from_layers(
        name: impl Into<String>,
        settings: SolidSettings,
        layers: Vec<LayerGeometry>,
        z_bottom: f64,
        layer_height: f64,
    ) -> Self {
        let bounds = mesh_ops::compute_layers_aabb(&layers, z_bottom, layer_height)
            .unwrap_or_else(|| {
                BoundingBox::from_corners((0.0, 0.0, z_bottom), (0.0, 0.0, z_bottom))
            });
        Self::new(name, settings, bounds, layers)
    }

    /// Name used in logs and errors
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mesh the solid was sliced from, if known
    pub fn source(&self) -> Option<&Arc<Mesh>> {
        self.source.as_ref()
    }

    /// Configuration snapshot
    pub fn settings(&self) -> &SolidSettings {
        &self.settings
    }

    /// Role derived from the settings
    pub fn role(&self) -> Role {
        self.role
    }

    /// Axis-aligned bounding volume
    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    /// Number of layers
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Geometry at one layer index
    pub fn layer(&self, layer_nr: usize) -> Result<&LayerGeometry> {
        self.layers.get(layer_nr).ok_or_else(|| Error::LayerOutOfRange {
            solid: self.name.clone(),
            layer: layer_nr,
            layer_count: self.layers.len(),
        })
    }

    /// Whether the solid is ranked against others and takes part in bonding
    pub fn takes_part_in_carving(&self) -> bool {
        self.role.takes_part_in_carving(self.settings.surface_mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Polygon, SurfaceMode};

    #[test]
    fn test_role_is_computed_once_from_settings() {
        let solid = Solid::new(
            "skin",
            SolidSettings::new()
                .as_cutting_stencil()
                .with_surface_mode(SurfaceMode::Surface),
            BoundingBox::from_corners((0.0, 0.0, 0.0), (1.0, 1.0, 1.0)),
            vec![LayerGeometry::default()],
        );
        assert_eq!(solid.role(), Role::CuttingStencil);
        assert!(!solid.takes_part_in_carving());
        assert_eq!(solid.name(), "skin");
        assert!(solid.source().is_none());
    }

    #[test]
    fn test_from_mesh_uses_mesh_bounds() {
        let mesh = Arc::new(Mesh::cuboid((0.0, 0.0, 0.0), (10.0, 20.0, 5.0)));
        let layers = vec![LayerGeometry::from_polygons(vec![Polygon::rectangle(
            0.0, 0.0, 10.0, 20.0,
        )])];
        let solid = Solid::from_mesh("box", mesh, SolidSettings::new(), layers).unwrap();
        assert_eq!(solid.bounds().max.y, 20.0);
        assert_eq!(solid.layer_count(), 1);
        assert!(solid.source().is_some());
        assert!(solid.takes_part_in_carving());
    }

    #[test]
    fn test_from_layers_uses_layer_extent() {
        let layers = vec![
            LayerGeometry::default(),
            LayerGeometry::from_polygons(vec![Polygon::rectangle(1.0, 2.0, 3.0, 4.0)]),
        ];
        let solid = Solid::from_layers("sliced", SolidSettings::new(), layers, 0.0, 0.5);
        assert_eq!(solid.bounds().min.x, 1.0);
        assert_eq!(solid.bounds().max.y, 4.0);
        assert_eq!(solid.bounds().min.z, 0.5);
        assert_eq!(solid.bounds().max.z, 1.0);
    }

    #[test]
    fn test_layer_out_of_range() {
        let solid = Solid::new(
            "part",
            SolidSettings::new(),
            BoundingBox::from_corners((0.0, 0.0, 0.0), (1.0, 1.0, 1.0)),
            vec![LayerGeometry::default(); 3],
        );
        assert!(solid.layer(2).is_ok());
        let err = solid.layer(3).unwrap_err();
        assert!(err.to_string().contains("[E1002]"));
        assert!(err.to_string().contains("'part'"));
    }
}
