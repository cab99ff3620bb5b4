//! Human-aware global path planning.
//!
//! The planner runs A* over a lazily expanded 8-connected lattice. Nodes
//! carry a social cost derived from registered pedestrians in addition to
//! the geometric path cost, and edges are collision-checked against the
//! vector map with a cushion box approximating the robot footprint.
//!
//! # Example
//!
//! ```ignore
//! use marga_nav::planning::{GlobalPlanner, PlannerConfig};
//!
//! let mut planner = GlobalPlanner::new(map, PlannerConfig::default());
//! planner.initialize_map(robot_loc);
//! let path = planner.plan(goal);
//! let target = planner.closest_path_node(robot_loc, &mut canvas);
//! ```

mod frontier;
mod node;
mod planner;

pub use frontier::Frontier;
pub use node::{NeighborRef, Node, NodeKey, SocialType};
pub use planner::{GlobalPlanner, PlannerConfig};
