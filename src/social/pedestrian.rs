//! Reference pedestrian with Gaussian-falloff social cost fields.

use super::Human;
use crate::core::math::angle_diff;
use crate::core::Point2D;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::f32::consts::PI;

/// Tuning parameters for the pedestrian cost fields.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PedestrianParams {
    /// Falloff of the proximity cost (meters).
    pub sigma_safety: f32,
    /// Falloff of the out-of-view cost (meters).
    pub sigma_visibility: f32,
    /// Falloff of the surprise cost with wall standoff (meters).
    pub sigma_hidden: f32,
    /// Full field-of-view angle (radians).
    pub fov: f32,
}

impl Default for PedestrianParams {
    fn default() -> Self {
        Self {
            sigma_safety: 1.2,
            sigma_visibility: 2.5,
            sigma_hidden: 1.5,
            fov: 2.0 * PI / 3.0,
        }
    }
}

/// A tracked pedestrian.
///
/// Pose lives in `Cell`s so an external predictor can update a handle that
/// is already registered with the planner (the core is single-threaded).
#[derive(Debug)]
pub struct Pedestrian {
    loc: Cell<Point2D>,
    angle: Cell<f32>,
    params: PedestrianParams,
}

impl Pedestrian {
    /// Create a pedestrian at a pose with default parameters.
    pub fn new(loc: Point2D, angle: f32) -> Self {
        Self::with_params(loc, angle, PedestrianParams::default())
    }

    /// Create a pedestrian with explicit parameters.
    pub fn with_params(loc: Point2D, angle: f32, params: PedestrianParams) -> Self {
        Self {
            loc: Cell::new(loc),
            angle: Cell::new(angle),
            params,
        }
    }

    /// Update the observed location.
    pub fn set_loc(&self, loc: Point2D) {
        self.loc.set(loc);
    }

    /// Update the observed heading.
    pub fn set_angle(&self, angle: f32) {
        self.angle.set(angle);
    }

    /// Whether `p` falls inside this pedestrian's field of view.
    fn in_fov(&self, p: Point2D) -> bool {
        let bearing = angle_diff(self.angle.get(), self.loc.get().angle_to(&p));
        bearing.abs() <= self.params.fov * 0.5
    }
}

impl Human for Pedestrian {
    fn loc(&self) -> Point2D {
        self.loc.get()
    }

    fn angle(&self) -> f32 {
        self.angle.get()
    }

    fn safety_cost(&self, loc: Point2D) -> f32 {
        let d2 = self.loc.get().distance_squared(&loc);
        let s2 = self.params.sigma_safety * self.params.sigma_safety;
        (-d2 / (2.0 * s2)).exp()
    }

    fn visibility_cost(&self, loc: Point2D) -> f32 {
        // Standing where the pedestrian can already see the robot is free.
        if self.in_fov(loc) {
            return 0.0;
        }
        let d2 = self.loc.get().distance_squared(&loc);
        let s2 = self.params.sigma_visibility * self.params.sigma_visibility;
        (-d2 / (2.0 * s2)).exp()
    }

    fn hidden_cost(&self, node_loc: Point2D, wall_point: Point2D) -> f32 {
        // Surprise only matters where the pedestrian is headed.
        if !self.in_fov(node_loc) {
            return 0.0;
        }
        let w2 = node_loc.distance_squared(&wall_point);
        let s2 = self.params.sigma_hidden * self.params.sigma_hidden;
        (-w2 / (2.0 * s2)).exp()
    }
}
