//! Level command tapes
//!
//! A level is an ordered list of commands with a cursor. Float commands tune
//! difficulty, spawn commands pick patterns to place, and an optional
//! repeat marker sets where the cursor wraps to once the tape runs out.

use std::sync::Arc;

use serde::Deserialize;

use super::lenient_flag;
use super::pattern::{Pattern, PatternStore};
use crate::error::{Result, SimError};
use crate::persistence::DocumentKind;

/// Scalar directive carried by a float command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatParam {
    RotationStart,
    RotationRate,
    RotationCeiling,
    ThreatStart,
    ThreatRate,
    ThreatCeiling,
    PlayerRotationRate,
    PatternRadiusOffset,
}

/// A pattern plus the transform it is placed with
#[derive(Debug, Clone)]
pub struct Placement {
    pub pattern: Arc<Pattern>,
    /// Extra radial distance added to every wall
    pub distance_offset: f32,
    /// Rotation in whole lanes
    pub rotation_offset: i32,
    pub mirrored: bool,
}

impl Placement {
    /// Identity placement
    pub fn new(pattern: Arc<Pattern>) -> Self {
        Self {
            pattern,
            distance_offset: 0.0,
            rotation_offset: 0,
            mirrored: false,
        }
    }
}

/// One entry of the command tape
#[derive(Debug, Clone)]
pub enum LevelCommand {
    FloatParam(FloatParam, f32),
    /// Spawn one placement chosen uniformly at random
    SpawnOne(Vec<Placement>),
    /// Spawn every member of one group chosen uniformly at random
    SpawnGroup(Vec<Vec<Placement>>),
    RepeatMarker,
    CameraCw,
    CameraCcw,
}

impl LevelCommand {
    pub fn is_spawn(&self) -> bool {
        matches!(self, LevelCommand::SpawnOne(_) | LevelCommand::SpawnGroup(_))
    }
}

#[derive(Deserialize)]
struct LevelDocument {
    commands: Vec<RawCommand>,
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum RawCommand {
    RotationDifficulty(f32),
    RotationDifficultyRate(f32),
    RotationDifficultyMax(f32),
    ThreatSpeed(f32),
    ThreatSpeedRate(f32),
    ThreatSpeedMax(f32),
    PlayerSpeed(f32),
    PatternRadiusOffset(f32),
    SpawnOne(Vec<RawPlacement>),
    SpawnGroup(Vec<Vec<RawPlacement>>),
    RepeatFromHere,
    CwCamera,
    CcwCamera,
}

#[derive(Deserialize)]
struct RawPlacement {
    pattern: String,
    #[serde(default)]
    offset: f32,
    #[serde(default)]
    rotate: i32,
    #[serde(default, deserialize_with = "lenient_flag")]
    mirrored: bool,
}

/// Command tape with its cursor and repeat point
#[derive(Debug, Clone)]
pub struct ParsedLevel {
    name: String,
    commands: Vec<LevelCommand>,
    cursor: usize,
    repeat_index: usize,
}

impl ParsedLevel {
    /// Load a level document by name, resolving every referenced pattern.
    ///
    /// Any missing or malformed pattern fails the whole level.
    pub fn load(name: &str, patterns: &mut PatternStore) -> Result<Self> {
        let text = patterns.loader().load_document(DocumentKind::Level, name)?;
        Self::parse(name, &text, patterns)
    }

    /// Parse level document text
    pub fn parse(name: &str, text: &str, patterns: &mut PatternStore) -> Result<Self> {
        let doc: LevelDocument =
            serde_json::from_str(text).map_err(|e| SimError::malformed(name, e.to_string()))?;

        let mut commands = Vec::with_capacity(doc.commands.len());
        for raw in doc.commands {
            let command = match raw {
                RawCommand::RotationDifficulty(v) => LevelCommand::FloatParam(FloatParam::RotationStart, v),
                RawCommand::RotationDifficultyRate(v) => LevelCommand::FloatParam(FloatParam::RotationRate, v),
                RawCommand::RotationDifficultyMax(v) => LevelCommand::FloatParam(FloatParam::RotationCeiling, v),
                RawCommand::ThreatSpeed(v) => LevelCommand::FloatParam(FloatParam::ThreatStart, v),
                RawCommand::ThreatSpeedRate(v) => LevelCommand::FloatParam(FloatParam::ThreatRate, v),
                RawCommand::ThreatSpeedMax(v) => LevelCommand::FloatParam(FloatParam::ThreatCeiling, v),
                RawCommand::PlayerSpeed(v) => LevelCommand::FloatParam(FloatParam::PlayerRotationRate, v),
                RawCommand::PatternRadiusOffset(v) => {
                    LevelCommand::FloatParam(FloatParam::PatternRadiusOffset, v)
                }
                RawCommand::SpawnOne(candidates) => {
                    if candidates.is_empty() {
                        return Err(SimError::malformed(name, "spawn_one without candidates"));
                    }
                    LevelCommand::SpawnOne(resolve_all(candidates, patterns)?)
                }
                RawCommand::SpawnGroup(groups) => {
                    if groups.is_empty() || groups.iter().any(|g| g.is_empty()) {
                        return Err(SimError::malformed(name, "spawn_group with an empty group"));
                    }
                    let groups = groups
                        .into_iter()
                        .map(|group| resolve_all(group, patterns))
                        .collect::<Result<Vec<_>>>()?;
                    LevelCommand::SpawnGroup(groups)
                }
                RawCommand::RepeatFromHere => LevelCommand::RepeatMarker,
                RawCommand::CwCamera => LevelCommand::CameraCw,
                RawCommand::CcwCamera => LevelCommand::CameraCcw,
            };
            commands.push(command);
        }

        Self::from_commands(name, commands)
    }

    /// Build a level from commands, validating that the cursor can always
    /// reach a spawn command.
    pub fn from_commands(name: &str, commands: Vec<LevelCommand>) -> Result<Self> {
        if commands.is_empty() {
            return Err(SimError::malformed(name, "level has no commands"));
        }

        let repeat_index = commands
            .iter()
            .position(|c| matches!(c, LevelCommand::RepeatMarker))
            .map(|i| i + 1)
            .unwrap_or(0);

        if !commands[repeat_index.min(commands.len())..]
            .iter()
            .any(LevelCommand::is_spawn)
        {
            return Err(SimError::malformed(
                name,
                "no spawn command at or after the repeat point",
            ));
        }

        Ok(Self {
            name: name.to_string(),
            commands,
            cursor: 0,
            repeat_index,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn commands(&self) -> &[LevelCommand] {
        &self.commands
    }

    /// Command under the cursor
    pub fn next_command(&self) -> &LevelCommand {
        &self.commands[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Where the cursor wraps to after the last command
    pub fn repeat_index(&self) -> usize {
        self.repeat_index
    }

    /// Whether the cursor sits on the final command of the tape
    pub fn at_last_command(&self) -> bool {
        self.cursor + 1 == self.commands.len()
    }

    /// Advance past the current command, wrapping to the repeat point
    pub fn command_handled(&mut self) {
        self.cursor += 1;
        if self.cursor >= self.commands.len() {
            self.cursor = self.repeat_index;
        }
    }

    /// Rewind to the first command
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Test/tool hook to place the cursor anywhere on the tape
    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.commands.len() - 1);
    }
}

fn resolve_all(raw: Vec<RawPlacement>, patterns: &mut PatternStore) -> Result<Vec<Placement>> {
    raw.into_iter()
        .map(|r| -> Result<Placement> {
            Ok(Placement {
                pattern: patterns.load(&r.pattern)?,
                distance_offset: r.offset,
                rotation_offset: r.rotate,
                mirrored: r.mirrored,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryLoader;

    const WALL: &str = r#"{ "walls": [ { "side": 0, "distance": 0, "height": 5 } ] }"#;

    fn store() -> PatternStore {
        let loader = MemoryLoader::new()
            .with_pattern("a", WALL)
            .with_pattern("b", WALL)
            .with_pattern("c", WALL);
        PatternStore::new(Box::new(loader), 6)
    }

    #[test]
    fn test_parse_all_command_kinds() {
        let text = r#"{ "commands": [
            { "rotation_difficulty": 1.5 },
            { "threat_speed_max": 60 },
            { "player_speed": 280 },
            "cw_camera",
            { "spawn_one": [ { "pattern": "a", "offset": 4, "rotate": 2, "mirrored": "1" } ] },
            "repeat_from_here",
            "ccw_camera",
            { "spawn_group": [ [ { "pattern": "b" }, { "pattern": "c" } ] ] }
        ] }"#;
        let level = ParsedLevel::parse("lvl", text, &mut store()).unwrap();

        assert_eq!(level.commands().len(), 8);
        assert_eq!(level.repeat_index(), 6);
        assert!(matches!(
            level.commands()[0],
            LevelCommand::FloatParam(FloatParam::RotationStart, v) if v == 1.5
        ));
        match &level.commands()[4] {
            LevelCommand::SpawnOne(candidates) => {
                let p = &candidates[0];
                assert_eq!(p.pattern.name(), "a");
                assert_eq!(p.distance_offset, 4.0);
                assert_eq!(p.rotation_offset, 2);
                assert!(p.mirrored);
            }
            other => panic!("unexpected command {other:?}"),
        }
        match &level.commands()[7] {
            LevelCommand::SpawnGroup(groups) => assert_eq!(groups[0].len(), 2),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_unknown_pattern_fails_level() {
        let text = r#"{ "commands": [ { "spawn_one": [ { "pattern": "missing" } ] } ] }"#;
        assert!(matches!(
            ParsedLevel::parse("lvl", text, &mut store()),
            Err(SimError::NotFound { .. })
        ));
    }

    #[test]
    fn test_unknown_command_is_malformed() {
        let text = r#"{ "commands": [ "warp_drive" ] }"#;
        assert!(matches!(
            ParsedLevel::parse("lvl", text, &mut store()),
            Err(SimError::MalformedDocument { .. })
        ));
    }

    #[test]
    fn test_level_without_spawn_after_repeat_is_rejected() {
        let text = r#"{ "commands": [ { "spawn_one": [ { "pattern": "a" } ] }, "repeat_from_here", "cw_camera" ] }"#;
        assert!(matches!(
            ParsedLevel::parse("lvl", text, &mut store()),
            Err(SimError::MalformedDocument { .. })
        ));
    }

    #[test]
    fn test_first_repeat_marker_wins() {
        let mut patterns = store();
        let a = Placement::new(patterns.load("a").unwrap());
        let level = ParsedLevel::from_commands(
            "lvl",
            vec![
                LevelCommand::RepeatMarker,
                LevelCommand::SpawnOne(vec![a.clone()]),
                LevelCommand::RepeatMarker,
                LevelCommand::SpawnOne(vec![a]),
            ],
        )
        .unwrap();
        assert_eq!(level.repeat_index(), 1);
    }

    #[test]
    fn test_cursor_wraps_to_repeat_index() {
        let mut patterns = store();
        let spawn = |name: &str, patterns: &mut PatternStore| {
            LevelCommand::SpawnOne(vec![Placement::new(patterns.load(name).unwrap())])
        };
        let commands = vec![
            spawn("a", &mut patterns),
            LevelCommand::RepeatMarker,
            spawn("b", &mut patterns),
            spawn("c", &mut patterns),
        ];
        let mut level = ParsedLevel::from_commands("lvl", commands).unwrap();

        level.command_handled(); // past a
        level.command_handled(); // past the marker
        assert_eq!(level.cursor(), 2);
        level.command_handled(); // past b
        assert!(level.at_last_command());
        level.command_handled(); // past c, wraps
        assert_eq!(level.cursor(), 2);

        level.reset();
        assert_eq!(level.cursor(), 0);
    }
}
