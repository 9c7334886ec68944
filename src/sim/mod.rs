//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied dt only (clamped, never read from a clock)
//! - Seeded RNG only
//! - Stable iteration order (on-screen order, wall order)
//! - No rendering or platform dependencies

pub mod arc;
pub mod difficulty;
pub mod events;
pub mod pattern_instance;
pub mod player;
pub mod script;
pub mod solver;
pub mod state;
pub mod threat;
pub mod threat_manager;
pub mod tick;

pub use arc::LaneArc;
pub use difficulty::{Difficulty, DifficultyAccelerator};
pub use events::{EventSink, PatternEvent, PatternEventKind};
pub use pattern_instance::{InstanceId, PatternInstance};
pub use player::{AutoPlayer, PlayerControl};
pub use script::{LevelScript, RotationDirection};
pub use solver::{MovementOption, SafeLaneSolver, TriggerRef};
pub use state::{SimPhase, Simulation};
pub use threat::{Threat, ThreatId, ThreatPool};
pub use threat_manager::ThreatManager;
pub use tick::clamp_dt;
