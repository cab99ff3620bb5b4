//! Range-finder scan type.

use serde::{Deserialize, Serialize};

/// A single 2D range-finder scan.
///
/// Beam `i` of `n` is at bearing `angle_min + i / n * (angle_max - angle_min)`
/// relative to the sensor heading. Ranges are meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaserScan {
    /// Start angle in radians (relative to the sensor heading)
    pub angle_min: f32,
    /// End angle in radians
    pub angle_max: f32,
    /// Minimum valid range in meters
    pub range_min: f32,
    /// Maximum valid range in meters
    pub range_max: f32,
    /// Range measurements in meters
    pub ranges: Vec<f32>,
}

impl LaserScan {
    /// Create a new scan.
    pub fn new(
        angle_min: f32,
        angle_max: f32,
        range_min: f32,
        range_max: f32,
        ranges: Vec<f32>,
    ) -> Self {
        Self {
            angle_min,
            angle_max,
            range_min,
            range_max,
            ranges,
        }
    }

    /// Number of range measurements.
    #[inline]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Check if the scan is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}
