//! Per-layer geometry of a sliced solid

/// A 2D vertex with x, y coordinates in millimetres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex2D {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Vertex2D {
    /// Create a new 2D vertex
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another vertex
    pub fn distance(&self, other: &Vertex2D) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Linear interpolation towards `other` at parameter `t`
    pub fn lerp(&self, other: &Vertex2D, t: f64) -> Vertex2D {
        Vertex2D::new(
            t.mul_add(other.x - self.x, self.x),
            t.mul_add(other.y - self.y, self.y),
        )
    }

    /// Whether both coordinates are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Vertex2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// A closed boundary loop
///
/// The closing edge from the last vertex back to the first is implicit.
/// Orientation follows the boolean primitives: outer loops counter-clockwise,
/// holes clockwise.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    /// Loop vertices
    pub vertices: Vec<Vertex2D>,
}

impl Polygon {
    /// Create a polygon from its loop vertices
    pub fn new(vertices: Vec<Vertex2D>) -> Self {
        Self { vertices }
    }

    /// Axis-aligned rectangle spanning `(x0, y0)` to `(x1, y1)`, counter-clockwise
    pub fn rectangle(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::new(vec![
            Vertex2D::new(x0, y0),
            Vertex2D::new(x1, y0),
            Vertex2D::new(x1, y1),
            Vertex2D::new(x0, y1),
        ])
    }

    /// Signed area (positive for counter-clockwise loops)
    pub fn signed_area(&self) -> f64 {
        let n = self.vertices.len();
        if n < 3 {
            return 0.0;
        }
        let mut twice_area = 0.0;
        for i in 0..n {
            let a = &self.vertices[i];
            let b = &self.vertices[(i + 1) % n];
            twice_area += a.x * b.y - b.x * a.y;
        }
        twice_area / 2.0
    }

    /// Explicitly closed open curve: the first vertex is repeated at the end
    pub fn to_closed_polyline(&self) -> Polyline {
        let mut vertices = self.vertices.clone();
        if let Some(first) = self.vertices.first() {
            vertices.push(*first);
        }
        Polyline::new(vertices)
    }
}

/// An open chain of vertices
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polyline {
    /// Chain vertices, in order
    pub vertices: Vec<Vertex2D>,
}

impl Polyline {
    /// Create a polyline from its vertices
    pub fn new(vertices: Vec<Vertex2D>) -> Self {
        Self { vertices }
    }

    /// Total length of all segments
    pub fn length(&self) -> f64 {
        self.vertices
            .windows(2)
            .map(|pair| pair[0].distance(&pair[1]))
            .sum()
    }
}

/// Geometry of one solid at one layer index
///
/// Closed areas and open curves are kept apart; open curves only carry
/// meaning for solids that use a surface representation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayerGeometry {
    /// Closed-area polygon set
    pub polygons: Vec<Polygon>,
    /// Open-curve set
    pub polylines: Vec<Polyline>,
}

impl LayerGeometry {
    /// Create a layer with the given closed areas and no open curves
    pub fn from_polygons(polygons: Vec<Polygon>) -> Self {
        Self {
            polygons,
            polylines: Vec::new(),
        }
    }

    /// Whether the layer holds neither area nor curves
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty() && self.polylines.is_empty()
    }

    /// Iterate every vertex of the layer, areas first
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex2D> {
        self.polygons
            .iter()
            .flat_map(|p| p.vertices.iter())
            .chain(self.polylines.iter().flat_map(|p| p.vertices.iter()))
    }
}
