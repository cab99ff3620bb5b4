//! Search-lattice node types.

use crate::core::{GridIndex, Point2D};
use std::fmt;

/// Identity of a lattice node.
///
/// Keys are the node's grid index, hashed as a packed integer pair, with a
/// reserved sentinel for the search start. This keeps node identity
/// allocation-free in the expansion loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKey(GridIndex);

impl NodeKey {
    /// Sentinel key of the start node.
    pub const START: NodeKey = NodeKey(GridIndex {
        xi: i32::MIN,
        yi: i32::MIN,
    });

    /// Key for a lattice index.
    #[inline]
    pub fn from_index(index: GridIndex) -> Self {
        NodeKey(index)
    }

    /// Whether this is the start sentinel.
    #[inline]
    pub fn is_start(&self) -> bool {
        *self == Self::START
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_start() {
            write!(f, "START")
        } else {
            write!(f, "{}_{}", self.0.xi, self.0.yi)
        }
    }
}

/// Which pedestrian cost dominated a node's social cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SocialType {
    #[default]
    None,
    Safety,
    Visibility,
    Hidden,
}

/// Reference to an adjacent lattice cell, stored by key rather than by
/// pointer; the nav map owns every node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborRef {
    /// Lattice index of the neighbor.
    pub index: GridIndex,
    /// Key of the neighbor.
    pub key: NodeKey,
    /// Edge length to the neighbor in meters.
    pub step_length: f32,
    /// Direction code, row-major over the 3x3 stencil with the center (4)
    /// omitted: dx = (d%3==2) - (d%3==0), dy = (d<3) - (d>5).
    pub direction: u8,
}

/// Decode a direction code into an integer lattice step.
#[inline]
pub(crate) fn step_offset(direction: u8) -> (i32, i32) {
    let dx = (direction % 3 == 2) as i32 - (direction % 3 == 0) as i32;
    let dy = (direction < 3) as i32 - (direction > 5) as i32;
    (dx, dy)
}

/// A materialized search node.
#[derive(Debug, Clone)]
pub struct Node {
    pub key: NodeKey,
    pub index: GridIndex,
    /// World location, derived from the parent location plus the lattice step.
    pub loc: Point2D,
    /// Path cost from the start, excluding social terms.
    pub cost: f32,
    /// Dominant pedestrian cost at this node.
    pub social_cost: f32,
    pub social_type: SocialType,
    pub parent: NodeKey,
    pub neighbors: Vec<NeighborRef>,
    pub visited: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_decode() {
        // Row-major over the stencil, top row first.
        assert_eq!(step_offset(0), (-1, 1));
        assert_eq!(step_offset(1), (0, 1));
        assert_eq!(step_offset(2), (1, 1));
        assert_eq!(step_offset(3), (-1, 0));
        assert_eq!(step_offset(5), (1, 0));
        assert_eq!(step_offset(6), (-1, -1));
        assert_eq!(step_offset(7), (0, -1));
        assert_eq!(step_offset(8), (1, -1));
    }

    #[test]
    fn test_start_key_is_reserved() {
        let key = NodeKey::from_index(GridIndex::new(3, -2));
        assert!(!key.is_start());
        assert!(NodeKey::START.is_start());
        assert_eq!(format!("{}", key), "3_-2");
        assert_eq!(format!("{}", NodeKey::START), "START");
    }
}
