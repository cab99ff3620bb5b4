//! Configuration loading.
//!
//! Every tuning knob of the planner and the filter is a field with a
//! sensible default, so a partial (or absent) TOML file is fine.
//!
//! ```toml
//! [planner]
//! resolution = 0.25
//!
//! [filter]
//! num_particles = 100
//! seed = 7
//!
//! [filter.motion]
//! k1 = 0.3
//! ```

use crate::error::Result;
use crate::localization::FilterConfig;
use crate::planning::PlannerConfig;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Top-level configuration for the navigation core.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NavConfig {
    /// Global planner knobs.
    #[serde(default)]
    pub planner: PlannerConfig,

    /// Particle filter knobs.
    #[serde(default)]
    pub filter: FilterConfig,
}

impl NavConfig {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }
}
