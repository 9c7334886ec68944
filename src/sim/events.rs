//! Pattern lifecycle notifications
//!
//! The threat manager dispatches these synchronously inside the tick, in the
//! order spawned, past player, at player, off screen.

use super::pattern_instance::{InstanceId, PatternInstance};

/// Lifecycle transition of a pattern instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternEventKind {
    Spawned,
    /// Furthest threat crossed the player radius
    PastPlayer,
    /// Closest threat crossed the player radius
    AtPlayer,
    /// Retired and returned to the pool
    OffScreen,
}

/// Record of one notification, kept for the tick it happened in
#[derive(Debug, Clone, PartialEq)]
pub struct PatternEvent {
    pub kind: PatternEventKind,
    pub instance: InstanceId,
    pub pattern: String,
    pub last_before_restart: bool,
}

impl PatternEvent {
    pub fn new(kind: PatternEventKind, instance: &PatternInstance) -> Self {
        Self {
            kind,
            instance: instance.id,
            pattern: instance.name().to_string(),
            last_before_restart: instance.last_before_restart,
        }
    }

    /// The final pattern of the level tape has moved past the player
    pub fn completes_level(&self) -> bool {
        self.kind == PatternEventKind::PastPlayer && self.last_before_restart
    }
}

/// Observer registered on the threat manager at setup time
pub trait EventSink {
    fn pattern_spawned(&mut self, _instance: &PatternInstance) {}
    fn pattern_is_past_player(&mut self, _instance: &PatternInstance) {}
    fn pattern_is_at_player(&mut self, _instance: &PatternInstance) {}
    fn pattern_is_off_screen(&mut self, _instance: &PatternInstance) {}
}

/// Route one notification to the matching sink method
pub(crate) fn dispatch(sink: &mut dyn EventSink, kind: PatternEventKind, instance: &PatternInstance) {
    match kind {
        PatternEventKind::Spawned => sink.pattern_spawned(instance),
        PatternEventKind::PastPlayer => sink.pattern_is_past_player(instance),
        PatternEventKind::AtPlayer => sink.pattern_is_at_player(instance),
        PatternEventKind::OffScreen => sink.pattern_is_off_screen(instance),
    }
}
