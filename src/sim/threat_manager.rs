//! Threat manager
//!
//! Owns the threat pool and the on-screen pattern list. Spawns patterns at
//! the right radius, moves every threat inward each tick, and fires lifecycle
//! events when patterns cross the player or drain off screen.

use std::sync::Arc;

use crate::content::{Placement, Wall};
use crate::error::Result;
use crate::settings::Settings;

use super::events::{EventSink, PatternEvent, PatternEventKind, dispatch};
use super::pattern_instance::{InstanceId, PatternInstance};
use super::threat::{Threat, ThreatId, ThreatPool};

pub struct ThreatManager {
    pool: ThreatPool,
    /// Oldest (nearest) first
    on_screen: Vec<PatternInstance>,
    sinks: Vec<Box<dyn EventSink>>,
    lanes: u32,
    player_radius: f32,
    first_pattern_radius: f32,
    spawn_until_radius: f32,
    next_instance_id: u64,
}

impl ThreatManager {
    pub fn new(settings: &Settings) -> Self {
        Self {
            pool: ThreatPool::new(settings.pool_starting_size, settings.pool_max_size),
            on_screen: Vec::new(),
            sinks: Vec::new(),
            lanes: settings.lanes,
            player_radius: settings.player_radius,
            first_pattern_radius: settings.first_pattern_radius,
            spawn_until_radius: settings.spawn_patterns_until_radius,
            next_instance_id: 1,
        }
    }

    /// Register an observer for lifecycle notifications
    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    pub fn pool(&self) -> &ThreatPool {
        &self.pool
    }

    pub fn threat(&self, id: ThreatId) -> &Threat {
        self.pool.get(id)
    }

    pub fn lanes(&self) -> u32 {
        self.lanes
    }

    pub fn player_radius(&self) -> f32 {
        self.player_radius
    }

    /// On-screen patterns, nearest first
    pub fn patterns_on_screen(&self) -> &[PatternInstance] {
        &self.on_screen
    }

    /// Pattern the player will meet next
    pub fn nearest_pattern(&self) -> Option<&PatternInstance> {
        self.on_screen.first()
    }

    /// Inner radius of the newest pattern's furthest threat (0 when empty)
    pub fn furthest_threat_radius(&self) -> f32 {
        self.newest(PatternInstance::furthest_threat)
            .map(|threat| threat.radius)
            .unwrap_or(0.0)
    }

    /// Whether the field has room for another pattern
    pub fn ready_to_spawn(&self) -> bool {
        self.furthest_threat_radius() < self.spawn_until_radius
    }

    /// Radius the next pattern would be placed at
    pub fn spawn_radius(&self, pattern_radius_offset: f32) -> f32 {
        match self.newest(PatternInstance::outermost_threat) {
            Some(threat) => threat.outer_radius() + pattern_radius_offset,
            None => self.first_pattern_radius,
        }
    }

    fn newest(&self, pick: fn(&PatternInstance) -> Option<ThreatId>) -> Option<&Threat> {
        self.on_screen
            .last()
            .and_then(pick)
            .map(|id| self.pool.get(id))
    }

    /// Materialize one wall of `instance` at `spawn_radius`
    pub fn spawn_threat(
        &mut self,
        instance: &PatternInstance,
        wall: &Wall,
        spawn_radius: f32,
    ) -> Result<ThreatId> {
        let id = self.pool.acquire()?;
        let lane = instance.lane_for(wall, self.lanes);

        let threat = self.pool.get_mut(id);
        threat.place(instance.radius_for(wall, spawn_radius));
        threat.thickness = wall.height;
        threat.is_trigger = wall.is_trigger;
        threat.lane = lane;
        threat.lane_angle = lane as f32 * (360.0 / self.lanes as f32);
        Ok(id)
    }

    /// Place a whole pattern behind whatever is already on screen
    pub fn spawn_pattern(
        &mut self,
        placement: Placement,
        last_before_restart: bool,
        pattern_radius_offset: f32,
        events: &mut Vec<PatternEvent>,
    ) -> Result<InstanceId> {
        let spawn_radius = self.spawn_radius(pattern_radius_offset);
        let mut instance = PatternInstance::new(InstanceId(self.next_instance_id), placement);
        instance.last_before_restart = last_before_restart;
        self.next_instance_id += 1;

        let pattern = Arc::clone(instance.pattern());
        let mut threats = Vec::with_capacity(pattern.walls().len());
        for wall in pattern.walls() {
            match self.spawn_threat(&instance, wall, spawn_radius) {
                Ok(id) => threats.push(id),
                Err(e) => {
                    for id in threats {
                        self.pool.release(id);
                    }
                    return Err(e);
                }
            }
        }
        instance.attach(threats, &self.pool);

        log::debug!(
            "Spawned {} ({}) at radius {:.1}",
            instance.name(),
            instance.id.0,
            spawn_radius
        );

        let id = instance.id;
        self.notify(PatternEventKind::Spawned, &instance, events);
        self.on_screen.push(instance);
        Ok(id)
    }

    /// Move every threat inward by `threat_speed * dt` and fire events.
    ///
    /// At most one pattern retires per call: the first eligible one in
    /// on-screen order. Others wait for the next tick.
    pub fn advance(&mut self, threat_speed: f32, dt: f32, events: &mut Vec<PatternEvent>) {
        let delta = threat_speed * dt;
        let mut past_player = Vec::new();
        let mut at_player = Vec::new();
        let mut off_screen = None;

        for (index, instance) in self.on_screen.iter().enumerate() {
            for id in instance.threats() {
                self.pool.get_mut(*id).step(delta);
            }

            if let Some(furthest) = instance.furthest_threat().map(|id| self.pool.get(id)) {
                if furthest.has_just_passed(self.player_radius) {
                    past_player.push(index);
                }
            }
            if let Some(outermost) = instance.outermost_threat().map(|id| self.pool.get(id)) {
                if off_screen.is_none() && outermost.outer_radius() <= 0.0 {
                    off_screen = Some(index);
                }
            }
            if let Some(closest) = instance.closest_threat().map(|id| self.pool.get(id)) {
                if closest.has_just_passed(self.player_radius) {
                    at_player.push(index);
                }
            }
        }

        // Dispatch only after the iteration; retirement mutates the list
        for index in past_player {
            let instance = self.on_screen[index].clone();
            self.notify(PatternEventKind::PastPlayer, &instance, events);
        }
        for index in at_player {
            let instance = self.on_screen[index].clone();
            self.notify(PatternEventKind::AtPlayer, &instance, events);
        }
        if let Some(index) = off_screen {
            let instance = self.retire(index);
            self.notify(PatternEventKind::OffScreen, &instance, events);
        }
    }

    /// Release a pattern's threats and drop it from the on-screen list
    fn retire(&mut self, index: usize) -> PatternInstance {
        let mut instance = self.on_screen.remove(index);
        log::debug!(
            "Retiring {} ({}), {} threats",
            instance.name(),
            instance.id.0,
            instance.threats().len()
        );
        for id in instance.detach() {
            self.pool.release(id);
        }
        instance
    }

    /// Retire everything on screen without firing events (respawn)
    pub fn clear(&mut self) {
        while !self.on_screen.is_empty() {
            let _ = self.retire(self.on_screen.len() - 1);
        }
    }

    fn notify(
        &mut self,
        kind: PatternEventKind,
        instance: &PatternInstance,
        events: &mut Vec<PatternEvent>,
    ) {
        for sink in &mut self.sinks {
            dispatch(sink.as_mut(), kind, instance);
        }
        events.push(PatternEvent::new(kind, instance));
    }
}
