//! Simulation settings
//!
//! Loaded from a JSON document; any field left out keeps its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Result, SimError};

/// Starting values for the difficulty accelerators and scalar tunables.
///
/// Level scripts usually override these with their own float commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultySettings {
    /// Camera rotation starting value
    pub camera_rotation: f32,
    /// Camera rotation increase per second of play
    pub camera_rotation_rate: f32,
    /// Camera rotation ceiling
    pub camera_rotation_max: f32,
    /// Threat speed starting value (radius units per second)
    pub threat_speed: f32,
    /// Threat speed increase per second of play
    pub threat_speed_rate: f32,
    /// Threat speed ceiling
    pub threat_speed_max: f32,
    /// Player rotation rate (degrees per second)
    pub player_rotation_rate: f32,
    /// Radial gap inserted between consecutive patterns
    pub pattern_radius_offset: f32,
    /// Seconds between accelerator updates
    pub update_interval: f32,
}

impl Default for DifficultySettings {
    fn default() -> Self {
        Self {
            camera_rotation: CAMERA_ROTATION,
            camera_rotation_rate: 0.0,
            camera_rotation_max: CAMERA_ROTATION_MAX,
            threat_speed: THREAT_VELOCITY,
            threat_speed_rate: 0.0,
            threat_speed_max: THREAT_VELOCITY_MAX,
            player_rotation_rate: PLAYER_ROTATION_RATE,
            pattern_radius_offset: PATTERN_RADIUS_OFFSET,
            update_interval: DIFFICULTY_UPDATE_INTERVAL,
        }
    }
}

/// Simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Geometry ===
    /// Number of lanes around the play field
    pub lanes: u32,
    /// Player's fixed radius
    pub player_radius: f32,

    // === Spawning ===
    /// Placement radius for a pattern spawned onto an empty field
    pub first_pattern_radius: f32,
    /// Spawning is allowed while the furthest on-screen threat is inside this radius
    pub spawn_patterns_until_radius: f32,
    /// Threats pre-allocated by the pool
    pub pool_starting_size: usize,
    /// Hard cap on pool growth
    pub pool_max_size: usize,

    // === Solver ===
    /// Solver stays idle while the nearest pattern is further out than this
    pub solver_lookahead_radius: f32,
    /// Run the safe-lane solver every tick
    pub autoplay: bool,

    // === Flow ===
    /// Seconds of intro messaging before the level begins
    pub intro_seconds: f32,
    /// Seed for pattern selection
    pub seed: u64,

    pub difficulty: DifficultySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lanes: LANES,
            player_radius: PLAYER_RADIUS,
            first_pattern_radius: FIRST_PATTERN_RADIUS,
            spawn_patterns_until_radius: SPAWN_PATTERNS_UNTIL_RADIUS,
            pool_starting_size: POOL_STARTING_SIZE,
            pool_max_size: POOL_MAX_SIZE,
            solver_lookahead_radius: SOLVER_LOOKAHEAD_RADIUS,
            autoplay: false,
            intro_seconds: 0.0,
            seed: 0,
            difficulty: DifficultySettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let json = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                SimError::NotFound { name: name.clone() }
            } else {
                SimError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let settings = Self::from_json(&name, &json)?;
        log::info!("Loaded settings from {}", name);
        Ok(settings)
    }

    /// Parse and validate settings from JSON text
    pub fn from_json(name: &str, json: &str) -> Result<Self> {
        let settings: Settings =
            serde_json::from_str(json).map_err(|e| SimError::malformed(name, e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject combinations the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| {
            Err(SimError::InvalidSettings {
                reason: reason.to_string(),
            })
        };

        if self.lanes < 3 {
            return invalid("at least 3 lanes are required");
        }
        if self.difficulty.update_interval <= 0.0 {
            return invalid("difficulty update interval must be positive");
        }
        if self.pool_max_size < self.pool_starting_size {
            return invalid("pool max size is smaller than its starting size");
        }
        if self.pool_max_size == 0 {
            return invalid("pool max size must be positive");
        }
        Ok(())
    }

    /// Angular width of one lane in degrees
    pub fn lane_arc_degrees(&self) -> f32 {
        360.0 / self.lanes as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_document_keeps_defaults() {
        let settings =
            Settings::from_json("partial", r#"{ "lanes": 8, "difficulty": { "threat_speed": 35 } }"#)
                .unwrap();
        assert_eq!(settings.lanes, 8);
        assert_eq!(settings.difficulty.threat_speed, 35.0);
        assert_eq!(settings.player_radius, PLAYER_RADIUS);
        assert_eq!(settings.difficulty.pattern_radius_offset, PATTERN_RADIUS_OFFSET);
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = Settings::from_json("broken", "{ lanes: ").unwrap_err();
        assert!(matches!(err, SimError::MalformedDocument { .. }));
    }

    #[test]
    fn test_validate_rejects_too_few_lanes() {
        let settings = Settings {
            lanes: 2,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SimError::InvalidSettings { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = Settings::load("/definitely/not/here/settings.json").unwrap_err();
        assert!(matches!(err, SimError::NotFound { .. }));
    }

    #[test]
    fn test_lane_arc() {
        assert_eq!(Settings::default().lane_arc_degrees(), 60.0);
    }
}
