//! Beam observation model with piecewise range clipping.
//!
//! Predicted ranges come from casting a subsampled set of beams against the
//! vector map. Each kept beam contributes `-Δr²/σ²` to a particle's log
//! weight, with the residual clipped to `[-d_short, d_long]` so single
//! outlier beams cannot dominate.

use crate::core::{LaserScan, Point2D};
use crate::geometry::Segment;
use crate::map::VectorMap;
use serde::Deserialize;

/// Observation model parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BeamModelConfig {
    /// Range variance σ² of the sensor (m²).
    #[serde(default = "default_var_obs")]
    pub var_obs: f32,

    /// Residual clip for observations shorter than predicted (meters).
    #[serde(default = "default_d_short")]
    pub d_short: f32,

    /// Residual clip for observations longer than predicted (meters).
    #[serde(default = "default_d_long")]
    pub d_long: f32,

    /// Sensor mount offset forward along the body x axis (meters).
    #[serde(default = "default_sensor_offset")]
    pub sensor_offset: f32,

    /// Keep every Nth beam of the scan.
    #[serde(default = "default_beam_subsample")]
    pub beam_subsample: usize,
}

fn default_var_obs() -> f32 {
    1.0
}
fn default_d_short() -> f32 {
    0.5
}
fn default_d_long() -> f32 {
    0.5
}
fn default_sensor_offset() -> f32 {
    0.2
}
fn default_beam_subsample() -> usize {
    10
}

impl Default for BeamModelConfig {
    fn default() -> Self {
        Self {
            var_obs: default_var_obs(),
            d_short: default_d_short(),
            d_long: default_d_long(),
            sensor_offset: default_sensor_offset(),
            beam_subsample: default_beam_subsample(),
        }
    }
}

/// Ray-cast beam model over a vector map.
#[derive(Debug, Clone)]
pub struct BeamModel {
    config: BeamModelConfig,
}

impl BeamModel {
    /// Create a beam model.
    pub fn new(config: BeamModelConfig) -> Self {
        Self { config }
    }

    /// Sensor origin for a body pose.
    #[inline]
    pub fn sensor_loc(&self, loc: Point2D, angle: f32) -> Point2D {
        loc + Point2D::new(angle.cos(), angle.sin()) * self.config.sensor_offset
    }

    /// Predicted scan endpoints for a pose, one per kept beam.
    ///
    /// Each ray runs from `range_min` to `range_max` along its bearing; the
    /// wall intersection closest to the sensor wins, and a beam that hits
    /// nothing predicts a point at `range_max`.
    pub fn predicted_point_cloud(
        &self,
        map: &VectorMap,
        loc: Point2D,
        angle: f32,
        num_ranges: usize,
        range_min: f32,
        range_max: f32,
        angle_min: f32,
        angle_max: f32,
    ) -> Vec<Point2D> {
        if num_ranges == 0 {
            return Vec::new();
        }
        let subsample = self.config.beam_subsample.max(1);
        let n = num_ranges / subsample;
        let sensor = self.sensor_loc(loc, angle);

        let mut cloud = Vec::with_capacity(n);
        for i in 0..n {
            let ray_angle = angle
                + angle_min
                + (subsample * i) as f32 / num_ranges as f32 * (angle_max - angle_min);
            let dir = Point2D::new(ray_angle.cos(), ray_angle.sin());
            let ray = Segment::new(sensor + dir * range_min, sensor + dir * range_max);

            let mut closest = sensor + dir * range_max;
            let mut closest_dist = range_max;
            for wall in map.segments() {
                if let Some(hit) = wall.intersection(&ray) {
                    let d = hit.distance(&sensor);
                    if d < closest_dist {
                        closest_dist = d;
                        closest = hit;
                    }
                }
            }
            cloud.push(closest);
        }
        cloud
    }

    /// Log-likelihood increment of a scan for one particle pose.
    ///
    /// Beams whose observed range falls outside the trusted interval
    /// `(1.05·range_min, 0.95·range_max)` are skipped. A pose whose
    /// predictions match the scan exactly contributes 0.
    pub fn log_likelihood(
        &self,
        map: &VectorMap,
        loc: Point2D,
        angle: f32,
        scan: &LaserScan,
    ) -> f32 {
        let cloud = self.predicted_point_cloud(
            map,
            loc,
            angle,
            scan.len(),
            scan.range_min,
            scan.range_max,
            scan.angle_min,
            scan.angle_max,
        );
        if cloud.is_empty() {
            return 0.0;
        }

        let ratio = scan.len() / cloud.len();
        let sensor = self.sensor_loc(loc, angle);

        let mut log_sum = 0.0;
        for (i, predicted) in cloud.iter().enumerate() {
            let observed = scan.ranges[ratio * i];
            if observed <= 1.05 * scan.range_min || observed >= 0.95 * scan.range_max {
                continue;
            }
            let predicted_range = predicted.distance(&sensor);
            let diff = (observed - predicted_range).clamp(-self.config.d_short, self.config.d_long);
            log_sum += -(diff * diff) / self.config.var_obs;
        }
        log_sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square_room(half: f32) -> VectorMap {
        VectorMap::from_segments(vec![
            Segment::from_coords(-half, -half, half, -half),
            Segment::from_coords(half, -half, half, half),
            Segment::from_coords(half, half, -half, half),
            Segment::from_coords(-half, half, -half, -half),
        ])
    }

    /// Build a full-resolution scan whose kept beams exactly match the
    /// model's predictions for the given pose.
    fn matching_scan(
        model: &BeamModel,
        map: &VectorMap,
        loc: Point2D,
        angle: f32,
        num_ranges: usize,
        range_min: f32,
        range_max: f32,
        angle_min: f32,
        angle_max: f32,
    ) -> LaserScan {
        let cloud = model.predicted_point_cloud(
            map, loc, angle, num_ranges, range_min, range_max, angle_min, angle_max,
        );
        let sensor = model.sensor_loc(loc, angle);
        let subsample = num_ranges / cloud.len();
        let mut ranges = vec![range_max; num_ranges];
        for (i, p) in cloud.iter().enumerate() {
            ranges[subsample * i] = p.distance(&sensor);
        }
        LaserScan::new(angle_min, angle_max, range_min, range_max, ranges)
    }

    #[test]
    fn test_predicted_cloud_hits_walls() {
        let model = BeamModel::new(BeamModelConfig::default());
        let map = square_room(5.0);
        let cloud = model.predicted_point_cloud(
            &map,
            Point2D::ZERO,
            0.0,
            100,
            0.02,
            20.0,
            -std::f32::consts::PI,
            std::f32::consts::PI,
        );
        assert_eq!(cloud.len(), 10);
        // Every endpoint lies on the room boundary, not at max range.
        for p in &cloud {
            assert!(p.x.abs() <= 5.0 + 1e-4);
            assert!(p.y.abs() <= 5.0 + 1e-4);
        }
    }

    #[test]
    fn test_open_space_predicts_max_range() {
        let model = BeamModel::new(BeamModelConfig::default());
        let map = VectorMap::from_segments(Vec::new());
        let cloud =
            model.predicted_point_cloud(&map, Point2D::ZERO, 0.0, 10, 0.1, 4.0, -0.5, 0.5);
        assert_eq!(cloud.len(), 1);
        let sensor = model.sensor_loc(Point2D::ZERO, 0.0);
        assert_relative_eq!(cloud[0].distance(&sensor), 4.0, epsilon = 1e-5);
    }

    #[test]
    fn test_perfect_match_scores_zero() {
        let model = BeamModel::new(BeamModelConfig::default());
        let map = square_room(5.0);
        let pose = Point2D::new(0.3, -0.4);
        let scan = matching_scan(
            &model,
            &map,
            pose,
            0.2,
            100,
            0.02,
            20.0,
            -std::f32::consts::PI,
            std::f32::consts::PI,
        );
        assert_eq!(model.log_likelihood(&map, pose, 0.2, &scan), 0.0);
    }

    #[test]
    fn test_mismatch_scores_negative() {
        let model = BeamModel::new(BeamModelConfig::default());
        let map = square_room(5.0);
        let scan = matching_scan(
            &model,
            &map,
            Point2D::ZERO,
            0.0,
            100,
            0.02,
            20.0,
            -std::f32::consts::PI,
            std::f32::consts::PI,
        );
        let offset_pose = Point2D::new(1.0, 0.5);
        assert!(model.log_likelihood(&map, offset_pose, 0.0, &scan) < 0.0);
    }

    #[test]
    fn test_out_of_gate_beams_skipped() {
        let model = BeamModel::new(BeamModelConfig::default());
        let map = square_room(5.0);
        // All observations pinned at max range: every beam is skipped.
        let scan = LaserScan::new(
            -std::f32::consts::PI,
            std::f32::consts::PI,
            0.02,
            20.0,
            vec![20.0; 100],
        );
        assert_eq!(model.log_likelihood(&map, Point2D::ZERO, 0.0, &scan), 0.0);
    }
}
