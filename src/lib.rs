//! marga-nav: socially-aware navigation core for indoor mobile robots.
//!
//! Two subsystems do the heavy lifting:
//!
//! - [`planning::GlobalPlanner`]: A* over a lazily expanded 8-connected
//!   lattice with collision cushions and per-node pedestrian costs, plus
//!   replan logic and target-node selection for a local controller.
//! - [`localization::ParticleFilter`]: Monte Carlo localization fusing
//!   wheel odometry with 2D range scans against a known polyline map.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │        planning/          localization/         │  ← Subsystems
//! │   (lattice A*, social)   (MCL particle filter)  │
//! └─────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────┐
//! │      map, social/, viz, config, error           │  ← Collaborators
//! └─────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────┐
//! │              core/, geometry                    │  ← Foundation
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! Everything is single-threaded and synchronous: callers serialize the
//! sensor observations and planner queries, and each subsystem instance
//! owns its mutable state. Diagnostics go through the `log` facade; setup
//! errors surface as [`error::NavError`].

pub mod core;
pub mod geometry;

pub mod config;
pub mod error;
pub mod map;
pub mod social;
pub mod viz;

pub mod localization;
pub mod planning;

pub use crate::core::{GridIndex, LaserScan, Point2D};

pub use config::NavConfig;
pub use error::{NavError, Result};
pub use geometry::Segment;
pub use localization::{FilterConfig, Particle, ParticleFilter};
pub use map::VectorMap;
pub use planning::{GlobalPlanner, Node, NodeKey, PlannerConfig, SocialType};
pub use social::{Human, Pedestrian};
pub use viz::{Canvas, Color, NullCanvas};
