//! Engine configuration.
//!
//! Every section implements `Default`; a JSON file only needs the fields it
//! overrides.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use crate::camera::{OrbitConfig, RetriggerPolicy};

/// Error while reading configuration or input data
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Radial tree placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Horizontal distance added per depth level
    pub level_distance: f32,
    /// Vertical offset added per depth level
    pub level_height: f32,
    /// Traversal stops below this depth (cycle guard)
    pub max_depth: u32,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            level_distance: 4.0,
            level_height: 0.6,
            max_depth: 64,
        }
    }
}

/// Flat-collection patterns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    pub galaxy_arms: usize,
    /// Radians of twist per unit of arm distance
    pub spiral_tightness: f32,
    pub galaxy_jitter: f32,
    /// Fraction of radius each coordinate may drift
    pub constellation_jitter: f32,
    pub timeline_polarity_scale: f32,
    pub timeline_jitter: f32,
    /// Cluster centers sit on a ring of `cluster_ring × radius`
    pub cluster_ring: f32,
    /// Sunflower spacing inside a cluster
    pub cluster_spacing: f32,
    pub cluster_jitter: f32,
    pub helix_radius: f32,
    /// Full turns across the whole list (4 turns = 8π)
    pub helix_turns: f32,
    /// Helix height as a multiple of the radius parameter
    pub helix_height: f32,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            galaxy_arms: 3,
            spiral_tightness: 0.35,
            galaxy_jitter: 0.5,
            constellation_jitter: 0.3,
            timeline_polarity_scale: 5.0,
            timeline_jitter: 2.0,
            cluster_ring: 0.6,
            cluster_spacing: 2.0,
            cluster_jitter: 1.0,
            helix_radius: 5.0,
            helix_turns: 4.0,
            helix_height: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub default_strength: f32,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            default_strength: 0.5,
        }
    }
}

/// Camera choreography
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Seconds for a full transition
    pub transition_seconds: f32,
    pub polar_min: f32,
    pub polar_max: f32,
    /// Target of mode-change transitions: face forward, level horizon
    pub home: OrbitConfig,
    pub retrigger: RetriggerPolicy,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            transition_seconds: 1.5,
            polar_min: 0.1,
            polar_max: PI - 0.1,
            home: OrbitConfig {
                azimuth: 0.0,
                polar: PI / 2.0,
                radius: 30.0,
            },
            retrigger: RetriggerPolicy::Ignore,
        }
    }
}

impl CameraConfig {
    /// Progress gained per second of elapsed time.
    pub fn rate(&self) -> f32 {
        if self.transition_seconds > f32::EPSILON {
            1.0 / self.transition_seconds
        } else {
            f32::INFINITY
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    pub tree: TreeConfig,
    pub pattern: PatternConfig,
    pub connection: ConnectionConfig,
    pub camera: CameraConfig,
}

impl AtlasConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError {
            message: format!("Invalid config: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engines cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cam = &self.camera;
        let in_range = |v: f32| (0.0..=PI).contains(&v);
        if !in_range(cam.polar_min) || !in_range(cam.polar_max) {
            return Err(ConfigError {
                message: format!(
                    "Invalid config: camera polar range [{}, {}] must lie within [0, π]",
                    cam.polar_min, cam.polar_max
                ),
            });
        }
        if cam.polar_min > cam.polar_max {
            return Err(ConfigError {
                message: format!(
                    "Invalid config: camera polar_min {} exceeds polar_max {}",
                    cam.polar_min, cam.polar_max
                ),
            });
        }
        if cam.transition_seconds.is_nan() || cam.transition_seconds < 0.0 {
            return Err(ConfigError {
                message: format!(
                    "Invalid config: camera transition_seconds {} is negative",
                    cam.transition_seconds
                ),
            });
        }
        Ok(())
    }

    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError {
            message: format!("Failed to read {}: {}", path, e),
        })?;
        Self::from_json_str(&text)
    }
}
