//! Simulation context
//!
//! One struct owns every component: the pattern cache, threat manager,
//! difficulty ramps, level script and solver. Nothing is global; callers hold
//! the [`Simulation`] and pass the player collaborator into each tick.

use crate::content::{ParsedLevel, PatternStore};
use crate::error::Result;
use crate::persistence::DocumentLoader;
use crate::settings::Settings;

use super::difficulty::Difficulty;
use super::events::{EventSink, PatternEvent};
use super::script::{LevelScript, RotationDirection};
use super::solver::SafeLaneSolver;
use super::threat_manager::ThreatManager;

/// Current phase of the simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimPhase {
    /// Level-start messaging; nothing spawns or moves yet
    Intro { remaining: f32 },
    /// Active play
    Playing,
    /// Player collaborator reports dead; everything is frozen
    Dead,
}

pub struct Simulation {
    pub settings: Settings,
    pub patterns: PatternStore,
    pub threats: ThreatManager,
    pub difficulty: Difficulty,
    pub script: LevelScript,
    /// Present only when autoplay is enabled
    pub solver: Option<SafeLaneSolver>,
    pub phase: SimPhase,
    /// Direction requested by the level's camera commands
    pub camera: RotationDirection,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Seconds spent in `Playing` since the last respawn
    pub time_alive: f32,
    /// Times the final pattern of the tape went past the player
    pub levels_completed: u32,
    /// Notifications fired during the most recent tick
    pub events: Vec<PatternEvent>,
}

impl Simulation {
    /// Validate settings, load the level and every pattern it references
    pub fn new(settings: Settings, loader: Box<dyn DocumentLoader>, level_name: &str) -> Result<Self> {
        settings.validate()?;

        let mut patterns = PatternStore::new(loader, settings.lanes);
        let level = ParsedLevel::load(level_name, &mut patterns)?;
        log::info!(
            "Loaded level {} ({} commands, {} patterns)",
            level.name(),
            level.commands().len(),
            patterns.len()
        );

        let phase = if settings.intro_seconds > 0.0 {
            SimPhase::Intro {
                remaining: settings.intro_seconds,
            }
        } else {
            SimPhase::Playing
        };

        Ok(Self {
            patterns,
            threats: ThreatManager::new(&settings),
            difficulty: Difficulty::new(&settings.difficulty),
            script: LevelScript::new(level, settings.seed),
            solver: settings
                .autoplay
                .then(|| SafeLaneSolver::new(settings.solver_lookahead_radius)),
            phase,
            camera: RotationDirection::default(),
            time_ticks: 0,
            time_alive: 0.0,
            levels_completed: 0,
            events: Vec::new(),
            settings,
        })
    }

    /// Register an observer for pattern lifecycle notifications
    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) {
        self.threats.subscribe(sink);
    }

    /// Rewind the tape and start playing
    pub fn begin_level(&mut self) {
        log::info!("Beginning level {}", self.script.level().name());
        self.script.restart();
        self.time_alive = 0.0;
        self.phase = SimPhase::Playing;
    }

    /// Swap in another level, clearing the field
    pub fn change_level(&mut self, level_name: &str) -> Result<()> {
        let level = ParsedLevel::load(level_name, &mut self.patterns)?;
        self.script = LevelScript::new(level, self.settings.seed);
        self.threats.clear();
        self.difficulty = Difficulty::new(&self.settings.difficulty);
        self.begin_level();
        Ok(())
    }

    /// Signed camera rotation rate for renderers (CCW positive)
    pub fn camera_rotation_rate(&self) -> f32 {
        self.difficulty.camera_rotation_rate() * self.camera.sign()
    }

    pub fn is_playing(&self) -> bool {
        self.phase == SimPhase::Playing
    }
}
