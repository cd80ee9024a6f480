//! Numeric configuration shared by the world and its systems.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Point;

/// Every tunable constant of a simulation session.
///
/// Missing fields fall back to the values of the original encounter, so a
/// scenario file only needs to list what it overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Width of the playable area.
    pub screen_width: f32,
    /// Height of the playable area.
    pub screen_height: f32,
    /// Side length of a placement grid cell.
    pub grid_size: f32,
    /// Minimum distance between a unit and any path waypoint.
    pub path_buffer: f32,
    /// Minimum distance between two unit centers.
    pub unit_buffer: f32,
    /// Maximum distance from a unit center at which picking selects it.
    pub pick_radius: f32,
    /// Ticks between two spawns of the same wave.
    pub spawn_delay: u32,
    /// Balance the economy starts with.
    pub starting_money: u32,
    /// Lives the player starts with.
    pub starting_lives: u32,
    /// Waypoints enemies follow, from entrance to exit.
    pub path: Vec<Point>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            screen_width: 800.0,
            screen_height: 600.0,
            grid_size: 40.0,
            path_buffer: 30.0,
            unit_buffer: 40.0,
            pick_radius: 20.0,
            spawn_delay: 60,
            starting_money: 200,
            starting_lives: 20,
            path: vec![
                Point::new(0.0, 300.0),
                Point::new(200.0, 300.0),
                Point::new(200.0, 150.0),
                Point::new(400.0, 150.0),
                Point::new(400.0, 450.0),
                Point::new(600.0, 450.0),
                Point::new(600.0, 300.0),
                Point::new(800.0, 300.0),
            ],
        }
    }
}

impl SimulationConfig {
    /// Checks the configuration for values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(positive(self.screen_width) && positive(self.screen_height)) {
            return Err(ConfigError::InvalidScreen {
                width: self.screen_width,
                height: self.screen_height,
            });
        }

        if !positive(self.grid_size) {
            return Err(ConfigError::InvalidGridSize(self.grid_size));
        }

        for (name, value) in [
            ("path_buffer", self.path_buffer),
            ("unit_buffer", self.unit_buffer),
            ("pick_radius", self.pick_radius),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidDistance { name, value });
            }
        }

        if self.path.is_empty() {
            return Err(ConfigError::EmptyPath);
        }

        if let Some(index) = self
            .path
            .iter()
            .position(|waypoint| !(waypoint.x().is_finite() && waypoint.y().is_finite()))
        {
            return Err(ConfigError::NonFiniteWaypoint(index));
        }

        Ok(())
    }
}

fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

/// Reasons a [`SimulationConfig`] is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// Screen dimensions must be positive.
    #[error("screen dimensions must be positive, got {width}x{height}")]
    InvalidScreen {
        /// Configured width.
        width: f32,
        /// Configured height.
        height: f32,
    },
    /// Grid cells must have a positive size.
    #[error("grid size must be positive, got {0}")]
    InvalidGridSize(f32),
    /// Buffers and the pick radius must be finite and not negative.
    #[error("{name} must be a finite, non-negative distance, got {value}")]
    InvalidDistance {
        /// Configuration field holding the distance.
        name: &'static str,
        /// Configured value.
        value: f32,
    },
    /// Enemies need at least one waypoint to spawn on.
    #[error("path must contain at least one waypoint")]
    EmptyPath,
    /// A waypoint has a NaN or infinite coordinate.
    #[error("path waypoint {0} is not finite")]
    NonFiniteWaypoint(usize),
}
