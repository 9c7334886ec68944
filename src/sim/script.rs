//! Level script interpreter
//!
//! Walks the command tape of a [`ParsedLevel`]. Parameter and camera commands
//! apply as soon as they reach the head of the tape; spawn commands wait until
//! the threat manager has room and only then advance the cursor.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::content::{LevelCommand, ParsedLevel, Placement};
use crate::error::Result;

use super::difficulty::Difficulty;
use super::events::PatternEvent;
use super::pattern_instance::InstanceId;
use super::threat_manager::ThreatManager;

/// Direction the camera spins in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationDirection {
    Clockwise,
    #[default]
    CounterClockwise,
}

impl RotationDirection {
    /// Sign applied to the camera rotation rate (CCW positive)
    pub fn sign(&self) -> f32 {
        match self {
            RotationDirection::Clockwise => -1.0,
            RotationDirection::CounterClockwise => 1.0,
        }
    }
}

pub struct LevelScript {
    level: ParsedLevel,
    rng: Pcg32,
}

impl LevelScript {
    pub fn new(level: ParsedLevel, seed: u64) -> Self {
        Self {
            level,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn level(&self) -> &ParsedLevel {
        &self.level
    }

    pub fn level_mut(&mut self) -> &mut ParsedLevel {
        &mut self.level
    }

    /// Rewind to the first command (level start and respawn)
    pub fn restart(&mut self) {
        self.level.reset();
    }

    /// Apply every non-spawn command at the head of the tape.
    ///
    /// Stops on the first spawn command. The loop is bounded by the tape
    /// length, so a tape without reachable spawns cannot hang the tick.
    pub fn drain_immediate(&mut self, difficulty: &mut Difficulty, camera: &mut RotationDirection) {
        for _ in 0..self.level.commands().len() {
            match *self.level.next_command() {
                LevelCommand::SpawnOne(_) | LevelCommand::SpawnGroup(_) => return,
                LevelCommand::FloatParam(param, value) => difficulty.apply(param, value),
                LevelCommand::RepeatMarker => {}
                LevelCommand::CameraCw => set_camera(camera, RotationDirection::Clockwise),
                LevelCommand::CameraCcw => set_camera(camera, RotationDirection::CounterClockwise),
            }
            self.level.command_handled();
        }
        log::warn!(
            "Level {} has no spawn reachable from command {}",
            self.level.name(),
            self.level.cursor()
        );
    }

    /// Hand the spawn command at the head of the tape to the threat manager
    /// if it is ready. Returns the ids of the spawned instances, empty while
    /// gated.
    pub fn try_spawn(
        &mut self,
        threats: &mut ThreatManager,
        difficulty: &Difficulty,
        events: &mut Vec<PatternEvent>,
    ) -> Result<Vec<InstanceId>> {
        if !threats.ready_to_spawn() {
            return Ok(Vec::new());
        }

        let is_last = self.level.at_last_command();
        let chosen: Vec<Placement> = match self.level.next_command() {
            LevelCommand::SpawnOne(candidates) => {
                let pick = self.rng.random_range(0..candidates.len());
                vec![candidates[pick].clone()]
            }
            LevelCommand::SpawnGroup(groups) => {
                let pick = self.rng.random_range(0..groups.len());
                groups[pick].clone()
            }
            _ => return Ok(Vec::new()),
        };

        let count = chosen.len();
        let mut spawned = Vec::with_capacity(count);
        for (i, placement) in chosen.into_iter().enumerate() {
            let last_before_restart = is_last && i + 1 == count;
            spawned.push(threats.spawn_pattern(
                placement,
                last_before_restart,
                difficulty.pattern_radius_offset,
                events,
            )?);
        }

        self.level.command_handled();
        Ok(spawned)
    }
}

fn set_camera(camera: &mut RotationDirection, direction: RotationDirection) {
    if *camera != direction {
        log::debug!("Camera now rotating {:?}", direction);
        *camera = direction;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{FloatParam, Pattern, Wall};
    use crate::settings::{DifficultySettings, Settings};
    use std::sync::Arc;

    fn placement(name: &str) -> Placement {
        Placement::new(Arc::new(Pattern::new(
            name,
            vec![Wall {
                side: 0,
                distance: 0.0,
                height: 5.0,
                is_trigger: false,
            }],
        )))
    }

    fn script(commands: Vec<LevelCommand>) -> LevelScript {
        LevelScript::new(ParsedLevel::from_commands("test", commands).unwrap(), 7)
    }

    #[test]
    fn test_drain_applies_params_and_stops_at_spawn() {
        let mut script = script(vec![
            LevelCommand::FloatParam(FloatParam::ThreatStart, 33.0),
            LevelCommand::CameraCw,
            LevelCommand::SpawnOne(vec![placement("a")]),
            LevelCommand::FloatParam(FloatParam::ThreatStart, 99.0),
        ]);
        let mut difficulty = Difficulty::new(&DifficultySettings::default());
        let mut camera = RotationDirection::CounterClockwise;

        script.drain_immediate(&mut difficulty, &mut camera);
        assert_eq!(script.level().cursor(), 2);
        assert_eq!(difficulty.threat_speed(), 33.0);
        assert_eq!(camera, RotationDirection::Clockwise);

        // Head is a spawn; draining again does nothing
        script.drain_immediate(&mut difficulty, &mut camera);
        assert_eq!(script.level().cursor(), 2);
    }

    #[test]
    fn test_spawn_waits_for_readiness() {
        let mut script = script(vec![LevelCommand::SpawnOne(vec![placement("far")])]);
        let mut threats = ThreatManager::new(&Settings::default());
        let difficulty = Difficulty::new(&DifficultySettings::default());
        let mut events = Vec::new();

        // 50, 75 and 100: the third pushes the furthest radius to the threshold
        for _ in 0..3 {
            assert_eq!(script.try_spawn(&mut threats, &difficulty, &mut events).unwrap().len(), 1);
        }
        assert!(script.try_spawn(&mut threats, &difficulty, &mut events).unwrap().is_empty());
        assert_eq!(threats.patterns_on_screen().len(), 3);
    }

    #[test]
    fn test_group_spawns_every_member_further_out() {
        let mut script = script(vec![LevelCommand::SpawnGroup(vec![vec![
            placement("first"),
            placement("second"),
        ]])]);
        let mut threats = ThreatManager::new(&Settings::default());
        let difficulty = Difficulty::new(&DifficultySettings::default());
        let mut events = Vec::new();

        let ids = script.try_spawn(&mut threats, &difficulty, &mut events).unwrap();
        assert_eq!(ids.len(), 2);

        let on_screen = threats.patterns_on_screen();
        let r0 = threats.threat(on_screen[0].closest_threat().unwrap()).radius;
        let r1 = threats.threat(on_screen[1].closest_threat().unwrap()).radius;
        assert_eq!((r0, r1), (50.0, 75.0));
        // Single-command tape: the last member closes the loop
        assert!(!on_screen[0].last_before_restart);
        assert!(on_screen[1].last_before_restart);
    }

    #[test]
    fn test_last_command_marks_restart() {
        let mut script = script(vec![
            LevelCommand::SpawnOne(vec![placement("a")]),
            LevelCommand::SpawnOne(vec![placement("b")]),
        ]);
        let mut threats = ThreatManager::new(&Settings::default());
        let difficulty = Difficulty::new(&DifficultySettings::default());
        let mut events = Vec::new();

        script.try_spawn(&mut threats, &difficulty, &mut events).unwrap();
        script.try_spawn(&mut threats, &difficulty, &mut events).unwrap();
        let flags: Vec<_> = threats
            .patterns_on_screen()
            .iter()
            .map(|p| (p.name().to_string(), p.last_before_restart))
            .collect();
        assert_eq!(flags, vec![("a".to_string(), false), ("b".to_string(), true)]);
        assert_eq!(script.level().cursor(), 0);
    }

    #[test]
    fn test_same_seed_same_choices() {
        let candidates: Vec<_> = ["a", "b", "c", "d"].into_iter().map(placement).collect();
        let pick = |seed| {
            let level =
                ParsedLevel::from_commands("t", vec![LevelCommand::SpawnOne(candidates.clone())])
                    .unwrap();
            let mut script = LevelScript::new(level, seed);
            let mut names = Vec::new();
            for _ in 0..10 {
                let mut threats = ThreatManager::new(&Settings::default());
                let mut events = Vec::new();
                script
                    .try_spawn(&mut threats, &Difficulty::new(&DifficultySettings::default()), &mut events)
                    .unwrap();
                names.push(threats.patterns_on_screen()[0].name().to_string());
            }
            names
        };
        assert_eq!(pick(11), pick(11));
    }

    #[test]
    fn test_camera_request_for_current_direction_is_noop() {
        let mut camera = RotationDirection::Clockwise;
        set_camera(&mut camera, RotationDirection::Clockwise);
        assert_eq!(camera, RotationDirection::Clockwise);
        assert_eq!(camera.sign(), -1.0);
    }
}
