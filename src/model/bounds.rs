//! Axis-aligned bounding volumes

use nalgebra::{Point3, Vector3};

/// An axis-aligned bounding box in millimetres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner
    pub min: Point3<f64>,
    /// Maximum corner
    pub max: Point3<f64>,
}

impl BoundingBox {
    /// Create a box from its two corners
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    /// Create a box from `(x, y, z)` corner tuples
    pub fn from_corners(min: (f64, f64, f64), max: (f64, f64, f64)) -> Self {
        Self::new(
            Point3::new(min.0, min.1, min.2),
            Point3::new(max.0, max.1, max.2),
        )
    }

    /// Smallest box containing all points, or `None` for an empty input
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point3<f64>>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::new(first, first), |bounds, p| Self {
            min: bounds.min.inf(&p),
            max: bounds.max.sup(&p),
        }))
    }

    /// Whether the two boxes intersect; boxes that only touch count as hitting
    pub fn hit(&self, other: &BoundingBox) -> bool {
        (0..3).all(|axis| self.max[axis] >= other.min[axis] && self.min[axis] <= other.max[axis])
    }

    /// Grow the box by `distance` on both in-plane axes, leaving Z untouched
    pub fn expand_xy(&self, distance: f64) -> Self {
        let delta = Vector3::new(distance, distance, 0.0);
        Self::new(self.min - delta, self.max + delta)
    }

    /// Size along each axis
    pub fn extent(&self) -> Vector3<f64> {
        self.max - self.min
    }
}
