//! Capability set the planner requires from each pedestrian handle.

use crate::core::Point2D;
use crate::map::VectorMap;

/// A pedestrian as seen by the planner.
///
/// All cost functions return non-negative scalars; larger means worse for
/// the robot. The exact numeric forms are the implementor's contract.
pub trait Human {
    /// Current location in world coordinates.
    fn loc(&self) -> Point2D;

    /// Current heading in radians.
    fn angle(&self) -> f32;

    /// Whether this human's line of sight to `viewpoint` is blocked by a
    /// map wall.
    fn is_hidden(&self, viewpoint: Point2D, map: &VectorMap) -> bool {
        map.intersects(self.loc(), viewpoint)
    }

    /// Proximity cost of the robot standing at `loc`.
    fn safety_cost(&self, loc: Point2D) -> f32;

    /// Cost of the robot standing at `loc` where this human cannot see it.
    fn visibility_cost(&self, loc: Point2D) -> f32;

    /// Surprise cost of the robot lurking at `node_loc` behind a wall,
    /// where `wall_point` is the sight-line intersection with that wall.
    fn hidden_cost(&self, node_loc: Point2D, wall_point: Point2D) -> f32;
}
