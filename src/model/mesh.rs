//! Source triangle meshes

/// A vertex in 3D space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Z coordinate
    pub z: f64,
}

impl Vertex {
    /// Create a new vertex
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// A triangle defined by three vertex indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle {
    /// Index of first vertex
    pub v1: usize,
    /// Index of second vertex
    pub v2: usize,
    /// Index of third vertex
    pub v3: usize,
}

impl Triangle {
    /// Create a new triangle
    pub fn new(v1: usize, v2: usize, v3: usize) -> Self {
        Self { v1, v2, v3 }
    }
}

/// The triangle mesh a solid was sliced from
///
/// Carving never reads the triangles; the mesh is kept so a solid can derive
/// its bounding volume and stay traceable to its source.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// List of vertices
    pub vertices: Vec<Vertex>,
    /// List of triangles
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new mesh with pre-allocated capacity
    pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            triangles: Vec::with_capacity(triangles),
        }
    }

    /// Closed axis-aligned box mesh spanning `min` to `max`
    pub fn cuboid(min: (f64, f64, f64), max: (f64, f64, f64)) -> Self {
        let mut mesh = Self::with_capacity(8, 12);
        let (x0, y0, z0) = min;
        let (x1, y1, z1) = max;
        mesh.vertices.extend([
            Vertex::new(x0, y0, z0),
            Vertex::new(x1, y0, z0),
            Vertex::new(x1, y1, z0),
            Vertex::new(x0, y1, z0),
            Vertex::new(x0, y0, z1),
            Vertex::new(x1, y0, z1),
            Vertex::new(x1, y1, z1),
            Vertex::new(x0, y1, z1),
        ]);
        mesh.triangles.extend([
            Triangle::new(3, 2, 1),
            Triangle::new(1, 0, 3),
            Triangle::new(4, 5, 6),
            Triangle::new(6, 7, 4),
            Triangle::new(0, 1, 5),
            Triangle::new(5, 4, 0),
            Triangle::new(1, 2, 6),
            Triangle::new(6, 5, 1),
            Triangle::new(2, 3, 7),
            Triangle::new(7, 6, 2),
            Triangle::new(3, 0, 4),
            Triangle::new(4, 7, 3),
        ]);
        mesh
    }
}
