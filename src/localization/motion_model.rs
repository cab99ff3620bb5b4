//! Odometry-based motion model for the particle filter proposal.
//!
//! Each odometry step is rotated into a particle's map frame and applied
//! with independent Gaussian noise on x, y and heading. Noise magnitudes
//! scale linearly with the translation and rotation of the step.

use super::noise::NoiseGenerator;
use super::particle_filter::Particle;
use crate::core::Point2D;
use serde::Deserialize;

/// Noise gains for the odometry motion model.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MotionModelConfig {
    /// Translation error per unit translation (m/m).
    #[serde(default = "default_k1")]
    pub k1: f32,

    /// Translation error per unit rotation (m/rad).
    #[serde(default = "default_k2")]
    pub k2: f32,

    /// Angular error per unit translation (rad/m).
    #[serde(default = "default_k3")]
    pub k3: f32,

    /// Angular error per unit rotation (rad/rad).
    #[serde(default = "default_k4")]
    pub k4: f32,
}

fn default_k1() -> f32 {
    0.40
}
fn default_k2() -> f32 {
    0.02
}
fn default_k3() -> f32 {
    0.20
}
fn default_k4() -> f32 {
    0.40
}

impl Default for MotionModelConfig {
    fn default() -> Self {
        Self {
            k1: default_k1(),
            k2: default_k2(),
            k3: default_k3(),
            k4: default_k4(),
        }
    }
}

/// Samples noisy particle motion from odometry deltas.
#[derive(Debug, Clone)]
pub struct MotionModel {
    config: MotionModelConfig,
}

impl MotionModel {
    /// Create a motion model with the given gains.
    pub fn new(config: MotionModelConfig) -> Self {
        Self { config }
    }

    /// Apply one odometry step to a particle.
    ///
    /// `map_trans` is the odometry translation already rotated into the
    /// particle's map frame; `dtheta_odom` is the heading change. A zero
    /// step applies exactly zero noise.
    pub fn apply(
        &self,
        particle: &mut Particle,
        map_trans: Point2D,
        dtheta_odom: f32,
        rng: &mut NoiseGenerator,
    ) {
        let trans = map_trans.length();
        let abs_dtheta = dtheta_odom.abs();

        let sigma_xy = self.config.k1 * trans + self.config.k2 * abs_dtheta;
        let sigma_theta = self.config.k3 * trans + self.config.k4 * abs_dtheta;

        let noise = Point2D::new(rng.gaussian(sigma_xy), rng.gaussian(sigma_xy));
        particle.loc = particle.loc + map_trans + noise;
        particle.angle += dtheta_odom + rng.gaussian(sigma_theta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle(x: f32, y: f32, angle: f32) -> Particle {
        Particle {
            loc: Point2D::new(x, y),
            angle,
            log_weight: 0.0,
        }
    }

    #[test]
    fn test_zero_step_is_exact() {
        let model = MotionModel::new(MotionModelConfig::default());
        let mut rng = NoiseGenerator::new(42);
        let mut p = particle(1.0, 2.0, 0.5);

        model.apply(&mut p, Point2D::ZERO, 0.0, &mut rng);

        assert_eq!(p.loc, Point2D::new(1.0, 2.0));
        assert_eq!(p.angle, 0.5);
    }

    #[test]
    fn test_forward_step_mean() {
        let model = MotionModel::new(MotionModelConfig::default());
        let mut rng = NoiseGenerator::new(42);

        let n = 1000;
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        for _ in 0..n {
            let mut p = particle(0.0, 0.0, 0.0);
            model.apply(&mut p, Point2D::new(1.0, 0.0), 0.0, &mut rng);
            sum_x += p.loc.x;
            sum_y += p.loc.y;
        }

        let mean_x = sum_x / n as f32;
        let mean_y = sum_y / n as f32;
        assert!((mean_x - 1.0).abs() < 0.1, "mean x: {}", mean_x);
        assert!(mean_y.abs() < 0.1, "mean y: {}", mean_y);
    }

    #[test]
    fn test_rotation_scales_heading_noise() {
        let model = MotionModel::new(MotionModelConfig::default());
        let mut rng = NoiseGenerator::new(42);

        let n = 500;
        let mut spread_still = 0.0;
        let mut spread_turning = 0.0;
        for _ in 0..n {
            let mut p = particle(0.0, 0.0, 0.0);
            model.apply(&mut p, Point2D::ZERO, 0.01, &mut rng);
            spread_still += (p.angle - 0.01).powi(2);

            let mut p = particle(0.0, 0.0, 0.0);
            model.apply(&mut p, Point2D::ZERO, 1.0, &mut rng);
            spread_turning += (p.angle - 1.0).powi(2);
        }
        assert!(spread_turning > spread_still);
    }
}
