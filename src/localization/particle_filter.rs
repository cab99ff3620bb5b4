//! Sequential importance resampling particle filter.

use super::motion_model::{MotionModel, MotionModelConfig};
use super::noise::NoiseGenerator;
use super::sensor_model::{BeamModel, BeamModelConfig};
use crate::core::math::angle_diff;
use crate::core::{LaserScan, Point2D};
use crate::error::Result;
use crate::map::VectorMap;
use serde::Deserialize;
use std::f32::consts::PI;
use std::path::Path;

/// A single pose hypothesis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Hypothesized location.
    pub loc: Point2D,
    /// Hypothesized heading in radians. Deliberately not wrapped, so the
    /// raw-mean pose estimate stays continuous.
    pub angle: f32,
    /// Unnormalized log importance weight.
    pub log_weight: f32,
}

/// Filter tuning knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    /// Number of particles.
    #[serde(default = "default_num_particles")]
    pub num_particles: usize,

    /// Initial location spread (standard deviation, meters).
    #[serde(default = "default_init_loc_stddev")]
    pub init_loc_stddev: f32,

    /// Initial heading spread (standard deviation, radians).
    #[serde(default = "default_init_angle_stddev")]
    pub init_angle_stddev: f32,

    /// Motion model noise gains.
    #[serde(default)]
    pub motion: MotionModelConfig,

    /// Observation model parameters.
    #[serde(default)]
    pub beam: BeamModelConfig,

    /// Minimum travel since the last weight update before a scan is
    /// processed (meters).
    #[serde(default = "default_min_update_dist")]
    pub min_update_dist: f32,

    /// Maximum travel since the last weight update before a scan is
    /// considered stale (meters).
    #[serde(default = "default_max_update_dist")]
    pub max_update_dist: f32,

    /// Odometry translation treated as a teleport (meters).
    #[serde(default = "default_odom_jump_dist")]
    pub odom_jump_dist: f32,

    /// Resample every Nth weight update.
    #[serde(default = "default_resample_period")]
    pub resample_period: u32,

    /// Random seed (0 = entropy).
    #[serde(default)]
    pub seed: u64,
}

fn default_num_particles() -> usize {
    50
}
fn default_init_loc_stddev() -> f32 {
    0.25
}
fn default_init_angle_stddev() -> f32 {
    PI / 6.0
}
fn default_min_update_dist() -> f32 {
    0.1
}
fn default_max_update_dist() -> f32 {
    1.0
}
fn default_odom_jump_dist() -> f32 {
    1.0
}
fn default_resample_period() -> u32 {
    6
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            num_particles: default_num_particles(),
            init_loc_stddev: default_init_loc_stddev(),
            init_angle_stddev: default_init_angle_stddev(),
            motion: MotionModelConfig::default(),
            beam: BeamModelConfig::default(),
            min_update_dist: default_min_update_dist(),
            max_update_dist: default_max_update_dist(),
            odom_jump_dist: default_odom_jump_dist(),
            resample_period: default_resample_period(),
            seed: 0,
        }
    }
}

/// Monte Carlo localization filter.
///
/// Fuses wheel odometry (proposal) with range scans (weighting) against a
/// known vector map. All state, including the update/resample bookkeeping,
/// is per instance.
#[derive(Debug)]
pub struct ParticleFilter {
    config: FilterConfig,
    map: VectorMap,
    motion_model: MotionModel,
    beam_model: BeamModel,
    particles: Vec<Particle>,
    rng: NoiseGenerator,

    prev_odom_loc: Point2D,
    prev_odom_angle: f32,
    odom_initialized: bool,

    max_log_weight: f32,
    updates_since_resample: u32,
    last_update_loc: Point2D,
    last_resample_loc: Point2D,
}

impl ParticleFilter {
    /// Create an empty filter; call an initializer before feeding sensors.
    pub fn new(config: FilterConfig) -> Self {
        let motion_model = MotionModel::new(config.motion);
        let beam_model = BeamModel::new(config.beam);
        let rng = NoiseGenerator::new(config.seed);
        Self {
            config,
            map: VectorMap::default(),
            motion_model,
            beam_model,
            particles: Vec::new(),
            rng,
            prev_odom_loc: Point2D::ZERO,
            prev_odom_angle: 0.0,
            odom_initialized: false,
            max_log_weight: 0.0,
            updates_since_resample: 0,
            last_update_loc: Point2D::ZERO,
            last_resample_loc: Point2D::ZERO,
        }
    }

    /// Load a map file and (re)initialize the particle set around a pose.
    pub fn initialize<P: AsRef<Path>>(&mut self, map_file: P, loc: Point2D, angle: f32) -> Result<()> {
        let map = VectorMap::load(map_file)?;
        self.initialize_with_map(map, loc, angle);
        Ok(())
    }

    /// (Re)initialize the particle set around a pose with a loaded map.
    ///
    /// Draws `num_particles` particles from independent Gaussians around
    /// the pose; all log weights start at zero.
    pub fn initialize_with_map(&mut self, map: VectorMap, loc: Point2D, angle: f32) {
        self.map = map;
        self.particles.clear();
        self.odom_initialized = false;
        self.max_log_weight = 0.0;
        self.reset_odom(loc, angle);

        for _ in 0..self.config.num_particles {
            self.particles.push(Particle {
                loc: Point2D::new(
                    self.rng.gaussian_about(loc.x, self.config.init_loc_stddev),
                    self.rng.gaussian_about(loc.y, self.config.init_loc_stddev),
                ),
                angle: self.rng.gaussian_about(angle, self.config.init_angle_stddev),
                log_weight: 0.0,
            });
        }
    }

    /// Reset the odometry bookkeeping to a pose. Called on initialization
    /// and when the robot teleports.
    fn reset_odom(&mut self, loc: Point2D, angle: f32) {
        self.last_update_loc = loc;
        self.last_resample_loc = loc;
        self.prev_odom_loc = loc;
        self.prev_odom_angle = angle;
        self.updates_since_resample = 0;
    }

    /// Propagate particles with a new odometry reading.
    ///
    /// A translation of `odom_jump_dist` or more is treated as a teleport:
    /// the odometry state resets and the particle set is left untouched.
    pub fn observe_odometry(&mut self, odom_loc: Point2D, odom_angle: f32) {
        let odom_trans = odom_loc - self.prev_odom_loc;

        if self.odom_initialized && odom_trans.length() < self.config.odom_jump_dist {
            let raw_dtheta = odom_angle - self.prev_odom_angle;
            if raw_dtheta.abs() > 2.0 * PI {
                log::warn!("reported odometry rotation exceeds 2π: {:.3} rad", raw_dtheta);
            }
            let dtheta = angle_diff(self.prev_odom_angle, odom_angle);

            for particle in &mut self.particles {
                // Rotate the odometry step into this particle's map frame.
                let map_trans =
                    odom_trans.rotate(angle_diff(self.prev_odom_angle, particle.angle));
                self.motion_model
                    .apply(particle, map_trans, dtheta, &mut self.rng);
            }
            self.prev_odom_loc = odom_loc;
            self.prev_odom_angle = odom_angle;
        } else {
            self.reset_odom(odom_loc, odom_angle);
            self.odom_initialized = true;
            log::info!("odometry reset (initialization or jump)");
        }
    }

    /// Weight particles against a new range scan.
    ///
    /// Scans are processed only after the robot has travelled between
    /// `min_update_dist` and `max_update_dist` since the last update; every
    /// `resample_period`-th update triggers a resample.
    pub fn observe_laser(&mut self, scan: &LaserScan) {
        if !self.odom_initialized || self.particles.is_empty() {
            return;
        }

        let dist_since_update = self.prev_odom_loc.distance(&self.last_update_loc);
        if dist_since_update <= self.config.min_update_dist
            || dist_since_update >= self.config.max_update_dist
        {
            return;
        }
        self.last_update_loc = self.prev_odom_loc;

        // Weights live in (-inf, 0], so the running max starts at -inf.
        self.max_log_weight = f32::NEG_INFINITY;
        for particle in &mut self.particles {
            particle.log_weight +=
                self.beam_model
                    .log_likelihood(&self.map, particle.loc, particle.angle, scan);
            if particle.log_weight > self.max_log_weight {
                self.max_log_weight = particle.log_weight;
            }
        }

        if self.updates_since_resample >= self.config.resample_period.saturating_sub(1) {
            self.resample();
            self.updates_since_resample = 0;
            self.last_resample_loc = self.prev_odom_loc;
        } else {
            self.updates_since_resample += 1;
        }
    }

    /// Low-variance resampling over the cumulative normalized weights.
    ///
    /// Leaves the particle count unchanged and all log weights at zero. A
    /// degenerate (all-zero) weight sum aborts the resample and keeps the
    /// current particles.
    fn resample(&mut self) {
        let n = self.particles.len();
        if n == 0 {
            return;
        }

        let mut breakpoints = Vec::with_capacity(n);
        let mut normalized_sum = 0.0f32;
        for particle in &mut self.particles {
            particle.log_weight -= self.max_log_weight;
            normalized_sum += particle.log_weight.exp();
            breakpoints.push(normalized_sum);
        }

        let step = normalized_sum / n as f32;
        if step <= 0.0 || !step.is_finite() {
            log::warn!("resample skipped: degenerate particle weights");
            return;
        }
        let mut sample_point = self.rng.uniform() * step;

        let mut new_particles = Vec::with_capacity(n);
        for (i, particle) in self.particles.iter().enumerate() {
            while breakpoints[i] > sample_point {
                new_particles.push(Particle {
                    log_weight: 0.0,
                    ..*particle
                });
                sample_point += step;
            }
        }

        // Float accumulation can leave the stride a draw short; the count
        // must stay at n.
        while new_particles.len() < n {
            if let Some(&last) = self.particles.last() {
                new_particles.push(Particle {
                    log_weight: 0.0,
                    ..last
                });
            } else {
                break;
            }
        }
        new_particles.truncate(n);

        self.max_log_weight = 0.0;
        self.particles = new_particles;
    }

    /// Current pose estimate: the weight-normalized mean of locations and
    /// of raw headings.
    ///
    /// The heading mean is deliberately arithmetic, not circular; particle
    /// headings are unwrapped so the mean stays meaningful away from ±π.
    pub fn location(&self) -> (Point2D, f32) {
        let mut loc_sum = Point2D::ZERO;
        let mut angle_sum = 0.0f32;
        let mut weight_sum = 0.0f32;

        for particle in &self.particles {
            let w = (particle.log_weight - self.max_log_weight).exp();
            loc_sum = loc_sum + particle.loc * w;
            angle_sum += particle.angle * w;
            weight_sum += w;
        }

        if weight_sum > 0.0 {
            (loc_sum * (1.0 / weight_sum), angle_sum / weight_sum)
        } else {
            (Point2D::ZERO, 0.0)
        }
    }

    /// Current particle set.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// The loaded map.
    pub fn map(&self) -> &VectorMap {
        &self.map
    }

    /// Predicted scan endpoints for an arbitrary pose (one per kept beam).
    #[allow(clippy::too_many_arguments)]
    pub fn predicted_point_cloud(
        &self,
        loc: Point2D,
        angle: f32,
        num_ranges: usize,
        range_min: f32,
        range_max: f32,
        angle_min: f32,
        angle_max: f32,
    ) -> Vec<Point2D> {
        self.beam_model.predicted_point_cloud(
            &self.map, loc, angle, num_ranges, range_min, range_max, angle_min, angle_max,
        )
    }
}
