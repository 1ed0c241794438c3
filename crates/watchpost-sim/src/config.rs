//! Simulation configuration.
//!
//! Describes the level (bounds, walls), perception ranges, the guards with
//! their routes, and the intruder's path. Loaded from and saved to TOML.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::{info, warn};
use watchpost_ai::GuardConfig;
use watchpost_common::{ConfigError, Vec3, WatchpostError, WatchpostResult};

/// Default configuration file name.
pub const CONFIG_FILE: &str = "watchpost.toml";

/// Axis-aligned box that blocks line of sight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallBox {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl WallBox {
    /// Creates a box from two opposite corners in any order.
    #[must_use]
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Whether `point` lies inside the box.
    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Whether the segment from `a` to `b` passes through the box.
    #[must_use]
    pub fn intersects_segment(&self, a: Vec3, b: Vec3) -> bool {
        let delta = b - a;
        let mut t_min = 0.0_f32;
        let mut t_max = 1.0_f32;

        for axis in 0..3 {
            let origin = a[axis];
            let dir = delta[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if dir.abs() <= f32::EPSILON {
                if origin < lo || origin > hi {
                    return false;
                }
                continue;
            }

            let inv = 1.0 / dir;
            let (t0, t1) = {
                let t0 = (lo - origin) * inv;
                let t1 = (hi - origin) * inv;
                if t0 <= t1 {
                    (t0, t1)
                } else {
                    (t1, t0)
                }
            };
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return false;
            }
        }
        true
    }
}

/// Spawn point and route of one guard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardSpawn {
    /// Starting position
    pub position: Vec3,
    /// Patrol waypoints; empty means the guard idles
    #[serde(default)]
    pub patrol: Vec<Vec3>,
}

/// The intruder the guards try to catch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntruderConfig {
    /// Path followed in a loop
    pub path: Vec<Vec3>,
    /// Walking speed
    pub speed: f32,
    /// Seconds after which the intruder stops making noise (None = never)
    pub silent_after: Option<f32>,
    /// Whether full detection ends the run
    pub caught_on_detection: bool,
}

impl Default for IntruderConfig {
    fn default() -> Self {
        Self {
            path: vec![
                Vec3::new(-18.0, 0.0, 18.0),
                Vec3::new(18.0, 0.0, 18.0),
                Vec3::new(18.0, 0.0, -18.0),
                Vec3::new(-18.0, 0.0, -18.0),
            ],
            speed: 1.5,
            silent_after: None,
            caught_on_detection: true,
        }
    }
}

/// Simulation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Timing ===
    /// Fixed simulation ticks per second
    pub tick_rate: u32,
    /// Simulated seconds to run
    pub duration: f32,
    /// Simulated frame delta fed to the fixed-step accumulator
    pub frame_time: f32,
    /// RNG seed for sound jitter (None = random)
    pub seed: Option<u64>,

    // === Level ===
    /// Half extent of the square navigable area around the origin
    pub half_extent: f32,

    // === Perception ===
    /// Maximum sight distance
    pub view_distance: f32,
    /// Full width of the view cone in degrees
    pub view_angle: f32,
    /// Eye height above the feet
    pub eye_height: f32,
    /// Maximum hearing distance
    pub hearing_range: f32,
    /// Localization error at the edge of hearing range
    pub hearing_jitter: f32,

    // === Actors ===
    /// Tuning shared by all guards
    pub guard: GuardConfig,
    /// Intruder settings
    pub intruder: IntruderConfig,
    /// Guards to spawn
    pub guards: Vec<GuardSpawn>,
    /// Sight-blocking walls
    pub walls: Vec<WallBox>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate: 30,
            duration: 60.0,
            frame_time: 1.0 / 24.0,
            seed: None,

            half_extent: 25.0,

            view_distance: 14.0,
            view_angle: 100.0,
            eye_height: 1.6,
            hearing_range: 10.0,
            hearing_jitter: 1.5,

            guard: GuardConfig::default(),
            intruder: IntruderConfig::default(),
            guards: vec![
                GuardSpawn {
                    position: Vec3::new(-10.0, 0.0, 0.0),
                    patrol: vec![Vec3::new(-10.0, 0.0, 10.0), Vec3::new(-10.0, 0.0, -10.0)],
                },
                GuardSpawn {
                    position: Vec3::new(10.0, 0.0, 0.0),
                    patrol: vec![Vec3::new(10.0, 0.0, -10.0), Vec3::new(10.0, 0.0, 10.0)],
                },
            ],
            walls: vec![WallBox::new(Vec3::new(-2.0, 0.0, -6.0), Vec3::new(2.0, 3.0, 6.0))],
        }
    }
}

impl SimConfig {
    /// Load configuration from a path.
    /// Returns default config if the file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match Self::load_strict(path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Failed to load config file: {e}");
                Self::default()
            },
        }
    }

    /// Load configuration from a path, reporting any failure.
    pub fn load_strict<P: AsRef<Path>>(path: P) -> WatchpostResult<Self> {
        let mut contents = String::new();
        fs::File::open(path)?.read_to_string(&mut contents)?;
        let config: Self = toml::from_str(&contents).map_err(|e| WatchpostError::Serialization(e.to_string()))?;
        config.check()?;
        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Rejects values that would make the run meaningless.
    pub fn check(&self) -> Result<(), ConfigError> {
        ConfigError::require_positive("duration", self.duration)?;
        ConfigError::require_positive("frame_time", self.frame_time)?;
        ConfigError::require_positive("half_extent", self.half_extent)?;
        self.guard.check()
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.tick_rate = self.tick_rate.clamp(1, 240);
        self.duration = self.duration.clamp(0.1, 3600.0);
        self.frame_time = self.frame_time.clamp(0.001, 0.25);

        self.half_extent = self.half_extent.clamp(1.0, 1000.0);

        self.view_distance = self.view_distance.clamp(0.0, 500.0);
        self.view_angle = self.view_angle.clamp(1.0, 360.0);
        self.eye_height = self.eye_height.clamp(0.0, 10.0);
        self.hearing_range = self.hearing_range.clamp(0.0, 500.0);
        self.hearing_jitter = self.hearing_jitter.clamp(0.0, 50.0);

        self.intruder.speed = self.intruder.speed.clamp(0.0, 50.0);
        self.guard.validate();
    }

    /// Fixed tick length in seconds.
    #[must_use]
    pub fn fixed_dt(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = SimConfig::default();
        assert_eq!(config.tick_rate, 30);
        assert_eq!(config.guards.len(), 2);
        assert!(config.check().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = SimConfig::default();
        config.tick_rate = 0;
        config.view_angle = 720.0;
        config.guard.max_sight_duration = 0.0;

        config.validate();

        assert_eq!(config.tick_rate, 1);
        assert_eq!(config.view_angle, 360.0);
        assert!(config.guard.max_sight_duration > 0.0);
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("watchpost.toml");

        let mut config = SimConfig::default();
        config.seed = Some(42);
        config.duration = 12.5;
        config.guards.truncate(1);

        config.save_to(&config_path).expect("Failed to save config");

        let loaded = SimConfig::load_from(&config_path);
        assert_eq!(loaded.seed, Some(42));
        assert_eq!(loaded.duration, 12.5);
        assert_eq!(loaded.guards, config.guards);
        assert_eq!(loaded.walls, config.walls);
    }

    #[test]
    fn test_config_load_missing_file() {
        let config = SimConfig::load_from("/nonexistent/path/watchpost.toml");
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn test_strict_load_reports_bad_values() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("bad.toml");
        fs::write(&path, "duration = -1.0\n").expect("write");

        assert!(matches!(
            SimConfig::load_strict(&path),
            Err(WatchpostError::Config(ConfigError::NotPositive { field: "duration", .. }))
        ));
        assert_eq!(SimConfig::load_from(&path), SimConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("partial.toml");
        fs::write(&path, "tick_rate = 60\n\n[guard]\nchase_speed = 7.0\n").expect("write");

        let config = SimConfig::load_strict(&path).expect("load");
        assert_eq!(config.tick_rate, 60);
        assert_eq!(config.guard.chase_speed, 7.0);
        assert_eq!(config.guard.lost_distance, GuardConfig::default().lost_distance);
        assert_eq!(config.intruder, IntruderConfig::default());
    }

    #[test]
    fn test_wall_blocks_segment() {
        let wall = WallBox::new(Vec3::new(1.0, 0.0, -1.0), Vec3::new(-1.0, 2.0, 1.0));
        assert!(wall.intersects_segment(Vec3::new(-5.0, 1.0, 0.0), Vec3::new(5.0, 1.0, 0.0)));
        assert!(!wall.intersects_segment(Vec3::new(-5.0, 1.0, 3.0), Vec3::new(5.0, 1.0, 3.0)));
        assert!(!wall.intersects_segment(Vec3::new(-5.0, 1.0, 0.0), Vec3::new(-2.0, 1.0, 0.0)));
        assert!(wall.contains(Vec3::new(0.0, 1.0, 0.0)));
    }
}
