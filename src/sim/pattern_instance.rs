//! A pattern placed on the field
//!
//! Holds the placement transform and the ids of the threats materialized
//! from the pattern's walls, in wall order.

use std::sync::Arc;

use crate::content::{Pattern, Placement, Wall};

use super::threat::{ThreatId, ThreatPool};

/// Identifier unique to one spawn occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub u64);

#[derive(Debug, Clone)]
pub struct PatternInstance {
    pub id: InstanceId,
    pub placement: Placement,
    /// Produced by the last command of the level tape
    pub last_before_restart: bool,
    threats: Vec<ThreatId>,
    triggers: Vec<ThreatId>,
    outermost: Option<ThreatId>,
}

impl PatternInstance {
    pub fn new(id: InstanceId, placement: Placement) -> Self {
        Self {
            id,
            placement,
            last_before_restart: false,
            threats: Vec::new(),
            triggers: Vec::new(),
            outermost: None,
        }
    }

    pub fn pattern(&self) -> &Arc<Pattern> {
        &self.placement.pattern
    }

    pub fn name(&self) -> &str {
        self.placement.pattern.name()
    }

    /// Lane a wall lands in after rotation, then mirroring
    pub fn lane_for(&self, wall: &Wall, lanes: u32) -> u32 {
        let lanes_i = lanes as i64;
        let rotated =
            (wall.side as i64 + self.placement.rotation_offset as i64).rem_euclid(lanes_i);
        let lane = if self.placement.mirrored {
            lanes_i - 1 - rotated
        } else {
            rotated
        };
        lane as u32
    }

    /// Inner radius a wall is placed at for a given spawn radius
    pub fn radius_for(&self, wall: &Wall, spawn_radius: f32) -> f32 {
        spawn_radius + wall.distance + self.placement.distance_offset
    }

    /// Live threats in wall order (ascending radius)
    pub fn threats(&self) -> &[ThreatId] {
        &self.threats
    }

    /// Trigger-flagged subset, in wall order
    pub fn triggers(&self) -> &[ThreatId] {
        &self.triggers
    }

    /// Threat with the smallest inner radius
    pub fn closest_threat(&self) -> Option<ThreatId> {
        self.threats.first().copied()
    }

    /// Threat with the largest inner radius (last in wall order).
    ///
    /// Drives the past-player crossing and spawn gating.
    pub fn furthest_threat(&self) -> Option<ThreatId> {
        self.threats.last().copied()
    }

    /// Threat with the largest outer radius (latest in wall order on ties).
    ///
    /// Differs from [`furthest_threat`](Self::furthest_threat) when an
    /// earlier wall is thicker. Drives retirement and next-pattern placement.
    pub fn outermost_threat(&self) -> Option<ThreatId> {
        self.outermost
    }

    /// Take ownership of spawned threats and derive closest/outermost/triggers.
    ///
    /// Threats decay uniformly, so the derived ids stay valid for the
    /// instance's lifetime.
    pub(crate) fn attach(&mut self, threats: Vec<ThreatId>, pool: &ThreatPool) {
        self.threats = threats;
        self.triggers = self
            .threats
            .iter()
            .copied()
            .filter(|id| pool.get(*id).is_trigger)
            .collect();

        let mut outermost: Option<ThreatId> = None;
        for id in &self.threats {
            let outer = pool.get(*id).outer_radius();
            if outermost.is_none_or(|f| outer >= pool.get(f).outer_radius()) {
                outermost = Some(*id);
            }
        }
        self.outermost = outermost;
    }

    /// Hand back every threat id, leaving the instance empty
    pub(crate) fn detach(&mut self) -> Vec<ThreatId> {
        self.triggers.clear();
        self.outermost = None;
        std::mem::take(&mut self.threats)
    }

    /// Radial extent from the closest inner edge to the furthest outer edge
    pub fn total_length(&self, pool: &ThreatPool) -> f32 {
        match (self.closest_threat(), self.outermost_threat()) {
            (Some(closest), Some(outermost)) => {
                pool.get(outermost).outer_radius() - pool.get(closest).radius
            }
            _ => 0.0,
        }
    }

    /// Triggers sharing the smallest radius that is not below `past_radius`.
    ///
    /// Ties are all returned. Empty once every trigger is inside `past_radius`.
    pub fn next_triggers(&self, pool: &ThreatPool, past_radius: f32) -> Vec<ThreatId> {
        let closest = self
            .triggers
            .iter()
            .map(|id| pool.get(*id).radius)
            .filter(|r| *r >= past_radius)
            .min_by(|a, b| a.total_cmp(b));

        match closest {
            Some(radius) => self
                .triggers
                .iter()
                .copied()
                .filter(|id| pool.get(*id).radius == radius)
                .collect(),
            None => Vec::new(),
        }
    }
}
