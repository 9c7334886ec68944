//! Difficulty ramps
//!
//! Two independent accelerators (camera rotation, threat speed) climb toward
//! their ceilings on a fixed cadence of live play and drop back to their
//! starting values when the player dies.

use crate::content::FloatParam;
use crate::settings::DifficultySettings;

/// Ramping scalar with a starting value, increase rate and ceiling
#[derive(Debug, Clone, PartialEq)]
pub struct DifficultyAccelerator {
    value: f32,
    starting_value: f32,
    increase_by: f32,
    ceiling: f32,
}

impl DifficultyAccelerator {
    pub fn new(starting_value: f32, increase_by: f32, ceiling: f32) -> Self {
        Self {
            value: starting_value,
            starting_value,
            increase_by,
            ceiling,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn starting_value(&self) -> f32 {
        self.starting_value
    }

    pub fn increase_by(&self) -> f32 {
        self.increase_by
    }

    pub fn ceiling(&self) -> f32 {
        self.ceiling
    }

    /// `value = min(value + increase_by * dt, ceiling)`
    pub fn advance(&mut self, dt: f32) {
        self.value = (self.value + self.increase_by * dt).min(self.ceiling);
    }

    pub fn reset(&mut self) {
        self.value = self.starting_value;
    }

    /// Restore the value reached after `increases` unit steps
    pub fn reset_with_increases(&mut self, increases: u32) {
        self.value = (self.starting_value + self.increase_by * increases as f32).min(self.ceiling);
    }

    /// Also re-initializes the current value
    pub fn set_starting_value(&mut self, value: f32) {
        self.starting_value = value;
        self.reset();
    }

    pub fn set_increase_by(&mut self, increase_by: f32) {
        self.increase_by = increase_by;
    }

    pub fn set_ceiling(&mut self, ceiling: f32) {
        self.ceiling = ceiling;
    }
}

/// Both accelerators plus the plain scalar tunables the level script sets
#[derive(Debug, Clone)]
pub struct Difficulty {
    pub rotation: DifficultyAccelerator,
    pub threat: DifficultyAccelerator,
    /// Degrees per second
    pub player_rotation_rate: f32,
    /// Radial gap between consecutive patterns
    pub pattern_radius_offset: f32,
    update_interval: f32,
    accumulator: f32,
}

impl Difficulty {
    pub fn new(settings: &DifficultySettings) -> Self {
        Self {
            rotation: DifficultyAccelerator::new(
                settings.camera_rotation,
                settings.camera_rotation_rate,
                settings.camera_rotation_max,
            ),
            threat: DifficultyAccelerator::new(
                settings.threat_speed,
                settings.threat_speed_rate,
                settings.threat_speed_max,
            ),
            player_rotation_rate: settings.player_rotation_rate,
            pattern_radius_offset: settings.pattern_radius_offset,
            update_interval: settings.update_interval,
            accumulator: 0.0,
        }
    }

    /// Current threat speed (radius units per second)
    pub fn threat_speed(&self) -> f32 {
        self.threat.value()
    }

    /// Current camera rotation rate
    pub fn camera_rotation_rate(&self) -> f32 {
        self.rotation.value()
    }

    /// Accumulate live play time, stepping both ramps once per full interval
    pub fn tick(&mut self, dt: f32) {
        self.accumulator += dt;
        while self.accumulator >= self.update_interval {
            self.accumulator -= self.update_interval;
            self.rotation.advance(self.update_interval);
            self.threat.advance(self.update_interval);
        }
    }

    /// Death reset: both ramps back to their starting values
    pub fn reset(&mut self) {
        self.rotation.reset();
        self.threat.reset();
        self.accumulator = 0.0;
    }

    /// Apply a float command from the level script
    pub fn apply(&mut self, param: FloatParam, value: f32) {
        match param {
            FloatParam::RotationStart => self.rotation.set_starting_value(value),
            FloatParam::RotationRate => self.rotation.set_increase_by(value),
            FloatParam::RotationCeiling => self.rotation.set_ceiling(value),
            FloatParam::ThreatStart => self.threat.set_starting_value(value),
            FloatParam::ThreatRate => self.threat.set_increase_by(value),
            FloatParam::ThreatCeiling => self.threat.set_ceiling(value),
            FloatParam::PlayerRotationRate => {
                log::debug!("Player rotation rate set to {}", value);
                self.player_rotation_rate = value;
            }
            FloatParam::PatternRadiusOffset => self.pattern_radius_offset = value,
        }
    }
}
