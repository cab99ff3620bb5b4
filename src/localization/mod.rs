//! Monte Carlo localization against a known vector map.
//!
//! # Components
//!
//! - [`MotionModel`]: odometry proposal with translation/rotation noise
//! - [`BeamModel`]: ray-cast observation model with piecewise clipping
//! - [`ParticleFilter`]: sequential importance resampling filter
//!
//! # Example
//!
//! ```ignore
//! use marga_nav::localization::{FilterConfig, ParticleFilter};
//!
//! let mut filter = ParticleFilter::new(FilterConfig::default());
//! filter.initialize("maps/lobby.txt", start_loc, start_angle)?;
//!
//! filter.observe_odometry(odom_loc, odom_angle);
//! filter.observe_laser(&scan);
//! let (loc, angle) = filter.location();
//! ```

mod motion_model;
mod noise;
mod particle_filter;
mod sensor_model;

pub use motion_model::{MotionModel, MotionModelConfig};
pub use noise::NoiseGenerator;
pub use particle_filter::{FilterConfig, Particle, ParticleFilter};
pub use sensor_model::{BeamModel, BeamModelConfig};
