//! Error types for the navigation core.

use thiserror::Error;

/// Navigation error type.
///
/// Only setup operations (map loading, configuration) return errors.
/// Runtime anomalies inside the planner and the filter (infeasible search,
/// degenerate particle weights, odometry jumps) are recovered locally and
/// reported through the `log` facade instead.
#[derive(Error, Debug)]
pub enum NavError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("map parse error at line {line}: {reason}")]
    MapParse { line: usize, reason: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for NavError {
    fn from(e: toml::de::Error) -> Self {
        NavError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NavError>;
