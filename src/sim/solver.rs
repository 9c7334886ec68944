//! Safe-lane solver
//!
//! Greedy single-step heuristic: look at the nearest pattern's next set of
//! triggers and steer toward whichever is angularly closest, unless a lethal
//! threat at the player's radius sits in the way.

use super::pattern_instance::InstanceId;
use super::threat::ThreatId;
use super::threat_manager::ThreatManager;

/// Direction the solver wants the player to rotate in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovementOption {
    #[default]
    None,
    Clockwise,
    CounterClockwise,
}

/// Identity of a trigger: the slot alone is not enough since slots recycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerRef {
    pub instance: InstanceId,
    pub threat: ThreatId,
}

#[derive(Debug, Clone)]
pub struct SafeLaneSolver {
    lookahead_radius: f32,
    recommendation: MovementOption,
    pub next_triggers: Vec<TriggerRef>,
    /// Set when `next_triggers` differs from the previous update's set
    pub next_triggers_changed: bool,
    pub closest_cw_trigger: Option<TriggerRef>,
    pub closest_ccw_trigger: Option<TriggerRef>,
    pub closest_cw_angle: f32,
    pub closest_ccw_angle: f32,
    pub can_move_cw: bool,
    pub can_move_ccw: bool,
}

impl SafeLaneSolver {
    pub fn new(lookahead_radius: f32) -> Self {
        Self {
            lookahead_radius,
            recommendation: MovementOption::None,
            next_triggers: Vec::new(),
            next_triggers_changed: false,
            closest_cw_trigger: None,
            closest_ccw_trigger: None,
            closest_cw_angle: f32::MAX,
            closest_ccw_angle: f32::MAX,
            can_move_cw: true,
            can_move_ccw: true,
        }
    }

    /// Last recommendation produced
    pub fn recommendation(&self) -> MovementOption {
        self.recommendation
    }

    /// Re-evaluate against post-advance threat positions.
    ///
    /// When neither direction is both closest and unblocked the previous
    /// recommendation is kept.
    pub fn update(&mut self, threats: &ThreatManager, player_angle: f32) -> MovementOption {
        self.next_triggers_changed = false;

        let pool = threats.pool();
        let lanes = threats.lanes();
        let player_radius = threats.player_radius();

        let Some(nearest) = threats.nearest_pattern() else {
            self.clear_targets();
            return self.recommend(MovementOption::None);
        };
        match nearest.closest_threat() {
            Some(id) if pool.get(id).radius <= self.lookahead_radius => {}
            _ => {
                self.clear_targets();
                return self.recommend(MovementOption::None);
            }
        }

        let next: Vec<TriggerRef> = nearest
            .next_triggers(pool, player_radius)
            .into_iter()
            .map(|threat| TriggerRef {
                instance: nearest.id,
                threat,
            })
            .collect();
        if next != self.next_triggers {
            self.next_triggers_changed = true;
            self.next_triggers = next;
        }

        self.closest_cw_trigger = None;
        self.closest_ccw_trigger = None;
        self.closest_cw_angle = f32::MAX;
        self.closest_ccw_angle = f32::MAX;
        if self.next_triggers.is_empty() {
            return self.recommend(MovementOption::None);
        }

        for trigger in &self.next_triggers {
            let arc = pool.get(trigger.threat).arc(lanes);
            if arc.contains_angle(player_angle) {
                self.closest_cw_trigger = Some(*trigger);
                self.closest_ccw_trigger = Some(*trigger);
                self.closest_cw_angle = 0.0;
                self.closest_ccw_angle = 0.0;
                return self.recommend(MovementOption::None);
            }

            let cw = arc.clockwise_distance(player_angle);
            if cw < self.closest_cw_angle {
                self.closest_cw_angle = cw;
                self.closest_cw_trigger = Some(*trigger);
            }
            let ccw = arc.counter_clockwise_distance(player_angle);
            if ccw < self.closest_ccw_angle {
                self.closest_ccw_angle = ccw;
                self.closest_ccw_trigger = Some(*trigger);
            }
        }

        // Lethal threats level with the player can cut off a direction
        self.can_move_cw = true;
        self.can_move_ccw = true;
        for id in nearest.threats() {
            let threat = pool.get(*id);
            if threat.is_trigger || !threat.is_beside(player_radius) {
                continue;
            }
            let arc = threat.arc(lanes);
            if arc.clockwise_distance(player_angle) < self.closest_cw_angle {
                self.can_move_cw = false;
            }
            if arc.counter_clockwise_distance(player_angle) < self.closest_ccw_angle {
                self.can_move_ccw = false;
            }
        }

        if self.closest_ccw_angle <= self.closest_cw_angle && self.can_move_ccw {
            self.recommend(MovementOption::CounterClockwise)
        } else if self.closest_cw_angle <= self.closest_ccw_angle && self.can_move_cw {
            self.recommend(MovementOption::Clockwise)
        } else {
            self.recommendation
        }
    }

    /// Forget triggers from a pattern that is gone or out of range
    fn clear_targets(&mut self) {
        if !self.next_triggers.is_empty() {
            self.next_triggers.clear();
            self.next_triggers_changed = true;
        }
        self.closest_cw_trigger = None;
        self.closest_ccw_trigger = None;
        self.closest_cw_angle = f32::MAX;
        self.closest_ccw_angle = f32::MAX;
    }

    fn recommend(&mut self, option: MovementOption) -> MovementOption {
        self.recommendation = option;
        option
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Pattern, Placement, Wall};
    use crate::settings::Settings;
    use std::sync::Arc;

    fn wall(side: u32, distance: f32, height: f32, is_trigger: bool) -> Wall {
        Wall {
            side,
            distance,
            height,
            is_trigger,
        }
    }

    /// Pattern placed with its first wall at radius 0 so distances are radii
    fn manager_with(walls: Vec<Wall>) -> ThreatManager {
        let settings = Settings {
            first_pattern_radius: 0.0,
            ..Default::default()
        };
        let mut tm = ThreatManager::new(&settings);
        let mut events = Vec::new();
        tm.spawn_pattern(
            Placement::new(Arc::new(Pattern::new("p", walls))),
            false,
            0.0,
            &mut events,
        )
        .unwrap();
        tm
    }

    #[test]
    fn test_nothing_on_screen() {
        let tm = ThreatManager::new(&Settings::default());
        let mut solver = SafeLaneSolver::new(60.0);
        assert_eq!(solver.update(&tm, 0.0), MovementOption::None);
    }

    #[test]
    fn test_pattern_beyond_lookahead_is_ignored() {
        let tm = manager_with(vec![wall(2, 80.0, 5.0, true)]);
        let mut solver = SafeLaneSolver::new(60.0);
        assert_eq!(solver.update(&tm, 0.0), MovementOption::None);
        assert!(solver.next_triggers.is_empty());
    }

    #[test]
    fn test_equal_distances_prefer_counter_clockwise() {
        let tm = manager_with(vec![wall(2, 20.0, 5.0, true), wall(4, 20.0, 5.0, true)]);
        let mut solver = SafeLaneSolver::new(60.0);

        for _ in 0..3 {
            assert_eq!(solver.update(&tm, 0.0), MovementOption::CounterClockwise);
            assert_eq!(solver.closest_ccw_angle, 90.0);
            assert_eq!(solver.closest_cw_angle, 90.0);
        }
    }

    #[test]
    fn test_blocked_direction_falls_back() {
        // Lethal wall in lane 1 at the player's radius cuts off the CCW route
        let tm = manager_with(vec![
            wall(1, 0.0, 10.0, false),
            wall(2, 20.0, 5.0, true),
            wall(4, 20.0, 5.0, true),
        ]);
        let mut solver = SafeLaneSolver::new(60.0);
        assert_eq!(solver.update(&tm, 0.0), MovementOption::Clockwise);
        assert!(!solver.can_move_ccw);
        assert!(solver.can_move_cw);
    }

    #[test]
    fn test_blocker_level_with_trigger_does_not_block() {
        // Both walls sit in lane 2, 90 degrees counter-clockwise
        let tm = manager_with(vec![wall(2, 0.0, 10.0, false), wall(2, 20.0, 5.0, true)]);
        let mut solver = SafeLaneSolver::new(60.0);
        assert_eq!(solver.update(&tm, 0.0), MovementOption::CounterClockwise);
        assert_eq!(solver.closest_ccw_angle, 90.0);
        assert!(solver.can_move_ccw);
        assert!(solver.can_move_cw);
    }

    #[test]
    fn test_aligned_with_trigger_stays_put() {
        let tm = manager_with(vec![wall(0, 20.0, 5.0, true), wall(3, 20.0, 5.0, true)]);
        let mut solver = SafeLaneSolver::new(60.0);
        assert_eq!(solver.update(&tm, 10.0), MovementOption::None);
        assert_eq!(solver.closest_cw_angle, 0.0);
    }

    #[test]
    fn test_closer_clockwise_trigger_wins() {
        let tm = manager_with(vec![wall(5, 20.0, 5.0, true)]);
        let mut solver = SafeLaneSolver::new(60.0);
        // Lane 5 spans 270..330; from 0 that is 30 degrees clockwise
        assert_eq!(solver.update(&tm, 0.0), MovementOption::Clockwise);
        assert_eq!(solver.closest_cw_angle, 30.0);
    }

    #[test]
    fn test_next_triggers_change_signal() {
        let tm = manager_with(vec![wall(2, 20.0, 5.0, true)]);
        let mut solver = SafeLaneSolver::new(60.0);
        solver.update(&tm, 0.0);
        assert!(solver.next_triggers_changed);
        solver.update(&tm, 0.0);
        assert!(!solver.next_triggers_changed);
    }

    #[test]
    fn test_fully_blocked_keeps_previous() {
        let tm = manager_with(vec![
            wall(1, 0.0, 10.0, false),
            wall(5, 0.0, 10.0, false),
            wall(3, 20.0, 5.0, true),
        ]);
        let mut solver = SafeLaneSolver::new(60.0);
        solver.recommendation = MovementOption::Clockwise;
        assert_eq!(solver.update(&tm, 0.0), MovementOption::Clockwise);
        assert!(!solver.can_move_cw && !solver.can_move_ccw);
    }

    #[test]
    fn test_targets_cleared_when_pattern_leaves() {
        let mut tm = manager_with(vec![wall(2, 20.0, 5.0, true)]);
        let mut solver = SafeLaneSolver::new(60.0);
        solver.update(&tm, 0.0);
        assert_eq!(solver.next_triggers.len(), 1);
        assert!(solver.closest_ccw_trigger.is_some());

        tm.clear();
        assert_eq!(solver.update(&tm, 0.0), MovementOption::None);
        assert!(solver.next_triggers.is_empty());
        assert!(solver.next_triggers_changed);
        assert!(solver.closest_cw_trigger.is_none());
        assert!(solver.closest_ccw_trigger.is_none());
        assert_eq!(solver.closest_cw_angle, f32::MAX);
        assert_eq!(solver.closest_ccw_angle, f32::MAX);

        solver.update(&tm, 0.0);
        assert!(!solver.next_triggers_changed);
    }
}
