//! Guard tuning parameters.

use serde::{Deserialize, Serialize};
use watchpost_common::ConfigError;

/// Per-guard tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Movement speed while chasing
    pub chase_speed: f32,
    /// Seconds of accumulated sight before the target is fully detected
    pub max_sight_duration: f32,
    /// Beyond this distance from the last known position the guard travels
    /// toward it instead of treating itself as already there
    pub lost_distance: f32,
    /// Movement speed while patrolling
    pub patrol_speed: f32,
    /// Horizontal distance at which a patrol waypoint counts as reached
    pub waypoint_tolerance: f32,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            chase_speed: 5.0,
            max_sight_duration: 2.0,
            lost_distance: 3.0,
            patrol_speed: 2.0,
            waypoint_tolerance: 0.5,
        }
    }
}

impl GuardConfig {
    /// Sets the chase speed.
    #[must_use]
    pub const fn with_chase_speed(mut self, speed: f32) -> Self {
        self.chase_speed = speed;
        self
    }

    /// Sets the sight duration needed for full detection.
    #[must_use]
    pub const fn with_max_sight_duration(mut self, seconds: f32) -> Self {
        self.max_sight_duration = seconds;
        self
    }

    /// Sets the lost distance.
    #[must_use]
    pub const fn with_lost_distance(mut self, distance: f32) -> Self {
        self.lost_distance = distance;
        self
    }

    /// Checks that every field is finite and strictly positive.
    pub fn check(&self) -> Result<(), ConfigError> {
        ConfigError::require_positive("chase_speed", self.chase_speed)?;
        ConfigError::require_positive("max_sight_duration", self.max_sight_duration)?;
        ConfigError::require_positive("lost_distance", self.lost_distance)?;
        ConfigError::require_positive("patrol_speed", self.patrol_speed)?;
        ConfigError::require_positive("waypoint_tolerance", self.waypoint_tolerance)?;
        Ok(())
    }

    /// Clamps values to sensible ranges.
    pub fn validate(&mut self) {
        self.chase_speed = self.chase_speed.clamp(0.1, 50.0);
        self.max_sight_duration = self.max_sight_duration.clamp(0.05, 60.0);
        self.lost_distance = self.lost_distance.clamp(0.1, 100.0);
        self.patrol_speed = self.patrol_speed.clamp(0.1, 50.0);
        self.waypoint_tolerance = self.waypoint_tolerance.clamp(0.01, 10.0);
    }
}
