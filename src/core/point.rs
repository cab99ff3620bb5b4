//! Point and lattice index types.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// A 2D point (or vector) in world coordinates, meters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    /// X coordinate in meters
    pub x: f32,
    /// Y coordinate in meters
    pub y: f32,
}

impl Point2D {
    /// Create a new point.
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Origin.
    pub const ZERO: Point2D = Point2D { x: 0.0, y: 0.0 };

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(&self, other: &Point2D) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Squared distance (avoids sqrt).
    #[inline]
    pub fn distance_squared(&self, other: &Point2D) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Manhattan (L1) distance to another point.
    #[inline]
    pub fn manhattan_distance(&self, other: &Point2D) -> f32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Length (magnitude) of this point as a vector from the origin.
    #[inline]
    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Normalize to unit length. The zero vector is returned unchanged.
    #[inline]
    pub fn normalized(&self) -> Point2D {
        let len = self.length();
        if len > 0.0 {
            Point2D::new(self.x / len, self.y / len)
        } else {
            *self
        }
    }

    /// Angle from this point to another (radians, CCW from +X).
    #[inline]
    pub fn angle_to(&self, other: &Point2D) -> f32 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Rotate around the origin by `angle` radians.
    #[inline]
    pub fn rotate(&self, angle: f32) -> Point2D {
        let (sin_a, cos_a) = angle.sin_cos();
        Point2D::new(
            self.x * cos_a - self.y * sin_a,
            self.x * sin_a + self.y * cos_a,
        )
    }

    /// Dot product with another vector.
    #[inline]
    pub fn dot(&self, other: &Point2D) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Cross product (z-component of the 3D cross product).
    #[inline]
    pub fn cross(&self, other: &Point2D) -> f32 {
        self.x * other.y - self.y * other.x
    }
}

impl Add for Point2D {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Point2D::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point2D {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Point2D::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f32> for Point2D {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: f32) -> Self {
        Point2D::new(self.x * scalar, self.y * scalar)
    }
}

impl Neg for Point2D {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Point2D::new(-self.x, -self.y)
    }
}

/// Integer lattice index of a planner node.
///
/// Used only for node identity and neighbor enumeration; world locations
/// are carried separately on each node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridIndex {
    pub xi: i32,
    pub yi: i32,
}

impl GridIndex {
    /// Create a new lattice index.
    #[inline]
    pub fn new(xi: i32, yi: i32) -> Self {
        Self { xi, yi }
    }

    /// Offset by an integer step.
    #[inline]
    pub fn offset(&self, dx: i32, dy: i32) -> GridIndex {
        GridIndex::new(self.xi + dx, self.yi + dy)
    }
}
