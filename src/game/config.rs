use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::action::Direction;
use super::state::{Position, grid_side};
use crate::error::ConfigError;

/// Largest accepted grid side; a snapshot holds `grid_size²` cells.
pub const MAX_GRID_SIZE: usize = 256;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the square grid
    pub grid_size: usize,
    /// Tick interval at the start of a round, in milliseconds
    pub initial_speed_ms: u64,
    /// How much the tick interval shrinks per food eaten, in milliseconds
    pub speed_increment_ms: u64,
    /// Floor for the tick interval, in milliseconds
    pub min_speed_ms: u64,
    /// Column of the snake's single starting cell
    pub start_x: i32,
    /// Row of the snake's single starting cell
    pub start_y: i32,
    /// Direction committed at reset
    pub start_direction: Direction,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            initial_speed_ms: 150,
            speed_increment_ms: 5,
            min_speed_ms: 50,
            start_x: 10,
            start_y: 10,
            start_direction: Direction::Right,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom grid size.
    ///
    /// The start cell is moved to the grid's centre so it stays in bounds.
    pub fn new(grid_size: usize) -> Self {
        Self::default().with_grid_size(grid_size)
    }

    /// Replace the grid size, re-centring the start cell
    pub fn with_grid_size(self, grid_size: usize) -> Self {
        let centre = grid_side(grid_size / 2);
        Self {
            grid_size,
            start_x: centre,
            start_y: centre,
            ..self
        }
    }

    /// Parse a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::EmptyGrid);
        }

        if self.grid_size > MAX_GRID_SIZE {
            return Err(ConfigError::GridTooLarge {
                grid_size: self.grid_size,
                max: MAX_GRID_SIZE,
            });
        }

        let size = grid_side(self.grid_size);
        if !(0..size).contains(&self.start_x) || !(0..size).contains(&self.start_y) {
            return Err(ConfigError::StartOutOfBounds {
                x: self.start_x,
                y: self.start_y,
                grid_size: self.grid_size,
            });
        }

        if self.min_speed_ms == 0 {
            return Err(ConfigError::ZeroMinSpeed);
        }

        if self.min_speed_ms > self.initial_speed_ms {
            return Err(ConfigError::MinSpeedAboveInitial {
                min_ms: self.min_speed_ms,
                initial_ms: self.initial_speed_ms,
            });
        }

        Ok(())
    }

    pub fn start_position(&self) -> Position {
        Position::new(self.start_x, self.start_y)
    }

    pub fn initial_speed(&self) -> Duration {
        Duration::from_millis(self.initial_speed_ms)
    }

    /// Tick interval after one more food, never below the floor
    pub fn next_speed_ms(&self, current_ms: u64) -> u64 {
        current_ms
            .saturating_sub(self.speed_increment_ms)
            .max(self.min_speed_ms)
    }
}
