//! Plane geometry kernel: oriented line segments.
//!
//! Segments are represented by their endpoints only (no parametric form),
//! which keeps transforms trivial and avoids angle wrapping. Intersection
//! follows the standard parametric formulation; endpoint contact counts as
//! an intersection, as does collinear overlap.

use crate::core::Point2D;
use serde::{Deserialize, Serialize};

/// Tolerance for the parallel / collinear classification.
const EPS: f32 = 1e-6;

/// An oriented 2D line segment from `p0` to `p1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub p0: Point2D,
    pub p1: Point2D,
}

impl Segment {
    /// Create a segment from two endpoints.
    #[inline]
    pub fn new(p0: Point2D, p1: Point2D) -> Self {
        Self { p0, p1 }
    }

    /// Create a segment from raw coordinates.
    #[inline]
    pub fn from_coords(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self::new(Point2D::new(x0, y0), Point2D::new(x1, y1))
    }

    /// Direction vector from `p0` to `p1` (not normalized).
    #[inline]
    pub fn direction(&self) -> Point2D {
        self.p1 - self.p0
    }

    /// Length of the segment.
    #[inline]
    pub fn length(&self) -> f32 {
        self.direction().length()
    }

    /// Unit vector perpendicular to the segment direction.
    ///
    /// Right-hand convention: the direction rotated +90° CCW, so for a
    /// segment pointing +X the normal points +Y.
    #[inline]
    pub fn unit_normal(&self) -> Point2D {
        let d = self.direction().normalized();
        Point2D::new(-d.y, d.x)
    }

    /// Whether this segment intersects `other`.
    ///
    /// Agrees with [`Segment::intersection`] by construction.
    #[inline]
    pub fn intersects(&self, other: &Segment) -> bool {
        self.intersection(other).is_some()
    }

    /// Intersection point with `other`, if the segments touch.
    ///
    /// For collinear overlapping segments a point of the shared span is
    /// returned (the overlap start along `self`).
    pub fn intersection(&self, other: &Segment) -> Option<Point2D> {
        let r = self.direction();
        let s = other.direction();
        let qp = other.p0 - self.p0;
        let denom = r.cross(&s);

        if denom.abs() <= EPS {
            // Parallel. Only collinear segments can still touch.
            if qp.cross(&r).abs() > EPS {
                return None;
            }
            let len_sq = r.dot(&r);
            if len_sq <= EPS * EPS {
                // Degenerate: self is a point.
                return other.contains_collinear(self.p0).then_some(self.p0);
            }
            // Project other's endpoints onto self's parameter axis.
            let t0 = qp.dot(&r) / len_sq;
            let t1 = (other.p1 - self.p0).dot(&r) / len_sq;
            let (lo, hi) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
            if hi < 0.0 || lo > 1.0 {
                return None;
            }
            let t = lo.max(0.0);
            return Some(self.p0 + r * t);
        }

        let t = qp.cross(&s) / denom;
        let u = qp.cross(&r) / denom;
        if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
            Some(self.p0 + r * t)
        } else {
            None
        }
    }

    /// Whether a point known to lie on this segment's carrier line falls
    /// within the segment's extent.
    fn contains_collinear(&self, p: Point2D) -> bool {
        let r = self.direction();
        let len_sq = r.dot(&r);
        if len_sq <= EPS * EPS {
            return self.p0.distance_squared(&p) <= EPS * EPS;
        }
        let t = (p - self.p0).dot(&r) / len_sq;
        (0.0..=1.0).contains(&t)
    }
}
