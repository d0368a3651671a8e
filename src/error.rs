//! Error types for the boundaries around the game core.
//!
//! The simulation itself never fails: collisions and ignored inputs are state
//! transitions. Errors only arise when reading configuration or exchanging
//! payloads with the host.

use std::path::PathBuf;

use thiserror::Error;

/// Invalid or unreadable game configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("grid size must be at least 1")]
    EmptyGrid,

    #[error("grid size {grid_size} exceeds the maximum of {max}")]
    GridTooLarge { grid_size: usize, max: usize },

    #[error("start position ({x}, {y}) is outside a {grid_size}x{grid_size} grid")]
    StartOutOfBounds { x: i32, y: i32, grid_size: usize },

    #[error("minimum speed must be greater than zero")]
    ZeroMinSpeed,

    #[error("minimum speed {min_ms}ms is slower than initial speed {initial_ms}ms")]
    MinSpeedAboveInitial { min_ms: u64, initial_ms: u64 },

    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Failure to encode or decode a message exchanged with the host.
#[derive(Error, Debug)]
pub enum HostError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A direction name that does not map to any of the four directions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized direction: {0:?}")]
pub struct ParseDirectionError(pub String);
