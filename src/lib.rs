//! Hexlanes - radial lane-avoidance simulation core
//!
//! Core modules:
//! - `content`: Pattern and level documents (walls, command tapes)
//! - `persistence`: Document loading from disk or memory
//! - `sim`: Tick-driven simulation (threats, difficulty, level script, solver)
//! - `settings`: Data-driven tunables

pub mod content;
pub mod error;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use error::{Result, SimError};
pub use settings::{DifficultySettings, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the headless runner (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Stand-in dt when a tick reports no elapsed time
    pub const PAUSED_DT: f32 = 1.0e-4;
    /// Largest dt a single tick will integrate
    pub const MAX_DT: f32 = 0.1;

    /// Number of lanes around the play field
    pub const LANES: u32 = 6;
    /// Player's fixed distance from the center
    pub const PLAYER_RADIUS: f32 = 5.0;

    /// Placement radius when nothing is on screen
    pub const FIRST_PATTERN_RADIUS: f32 = 50.0;
    /// Keep spawning until the furthest pattern reaches this radius.
    /// Also the radius a recycled threat is parked at.
    pub const SPAWN_PATTERNS_UNTIL_RADIUS: f32 = 100.0;
    /// Solver ignores patterns whose closest threat is further than this
    pub const SOLVER_LOOKAHEAD_RADIUS: f32 = 60.0;

    /// Threat pool defaults
    pub const POOL_STARTING_SIZE: usize = 100;
    pub const POOL_MAX_SIZE: usize = 4096;

    /// Difficulty defaults
    pub const CAMERA_ROTATION: f32 = 1.0;
    pub const CAMERA_ROTATION_MAX: f32 = 10.0;
    pub const THREAT_VELOCITY: f32 = 20.0;
    pub const THREAT_VELOCITY_MAX: f32 = 40.0;
    /// Degrees per second
    pub const PLAYER_ROTATION_RATE: f32 = 300.0;
    /// Minimum radial gap between consecutive patterns
    pub const PATTERN_RADIUS_OFFSET: f32 = 20.0;
    /// Seconds between difficulty increases
    pub const DIFFICULTY_UPDATE_INTERVAL: f32 = 1.0;

    /// Runner: seconds the player stays dead before respawning
    pub const RESPAWN_SECONDS: f32 = 1.0;
}

/// Wrap an angle in degrees to [0, 360)
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Shortest signed difference `to - from` in degrees, in [-180, 180)
#[inline]
pub fn delta_degrees(from: f32, to: f32) -> f32 {
    let mut delta = (to - from).rem_euclid(360.0);
    if delta >= 180.0 {
        delta -= 360.0;
    }
    delta
}

/// Convert polar (r, theta in radians) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
