//! Player-control collaborator
//!
//! The simulation only reads the player's angle and liveness and writes a
//! recommended direction. [`AutoPlayer`] is a headless implementation that
//! follows the recommendation and dies on contact with lethal threats.

use super::solver::MovementOption;
use super::threat_manager::ThreatManager;
use crate::wrap_degrees;

pub trait PlayerControl {
    /// Angle in degrees, [0, 360)
    fn current_angle(&self) -> f32;

    fn is_dead(&self) -> bool;

    /// Written once per tick while autoplay is enabled
    fn set_recommended_direction(&mut self, direction: MovementOption);
}

/// Headless player steered by the solver's recommendation
#[derive(Debug, Clone, Default)]
pub struct AutoPlayer {
    pub angle: f32,
    pub dead: bool,
    pub input: MovementOption,
    pub deaths: u32,
}

impl AutoPlayer {
    pub fn new(angle: f32) -> Self {
        Self {
            angle: wrap_degrees(angle),
            ..Default::default()
        }
    }

    /// Rotate according to the current input, then check for contact
    pub fn update(&mut self, threats: &ThreatManager, rotation_rate: f32, dt: f32) {
        if self.dead {
            return;
        }

        let step = rotation_rate * dt;
        match self.input {
            MovementOption::None => {}
            MovementOption::Clockwise => self.angle = wrap_degrees(self.angle - step),
            MovementOption::CounterClockwise => self.angle = wrap_degrees(self.angle + step),
        }

        if self.touching_lethal(threats) {
            self.dead = true;
            self.deaths += 1;
            log::info!("Player died at {:.1} degrees", self.angle);
        }
    }

    /// Whether a non-trigger threat covers the player's radius and angle
    pub fn touching_lethal(&self, threats: &ThreatManager) -> bool {
        let radius = threats.player_radius();
        threats.pool().iter_active().any(|(_, threat)| {
            !threat.is_trigger
                && threat.is_beside(radius)
                && threat.arc(threats.lanes()).contains_angle(self.angle)
        })
    }

    pub fn respawn(&mut self) {
        self.dead = false;
        self.input = MovementOption::None;
    }
}

impl PlayerControl for AutoPlayer {
    fn current_angle(&self) -> f32 {
        self.angle
    }

    fn is_dead(&self) -> bool {
        self.dead
    }

    fn set_recommended_direction(&mut self, direction: MovementOption) {
        self.input = direction;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Pattern, Placement, Wall};
    use crate::settings::Settings;
    use std::sync::Arc;

    fn manager_with_wall(side: u32, is_trigger: bool) -> ThreatManager {
        let settings = Settings {
            first_pattern_radius: 0.0,
            ..Default::default()
        };
        let mut tm = ThreatManager::new(&settings);
        let wall = Wall {
            side,
            distance: 0.0,
            height: 10.0,
            is_trigger,
        };
        tm.spawn_pattern(
            Placement::new(Arc::new(Pattern::new("p", vec![wall]))),
            false,
            0.0,
            &mut Vec::new(),
        )
        .unwrap();
        tm
    }

    #[test]
    fn test_rotation_follows_input() {
        let tm = ThreatManager::new(&Settings::default());
        let mut player = AutoPlayer::new(0.0);

        player.set_recommended_direction(MovementOption::Clockwise);
        player.update(&tm, 300.0, 0.1);
        assert_eq!(player.current_angle(), 330.0);

        player.set_recommended_direction(MovementOption::CounterClockwise);
        player.update(&tm, 300.0, 0.2);
        assert_eq!(player.current_angle(), 30.0);
    }

    #[test]
    fn test_lethal_contact_kills() {
        let tm = manager_with_wall(0, false);
        let mut player = AutoPlayer::new(0.0);
        player.update(&tm, 300.0, 0.0);
        assert!(player.is_dead());
        assert_eq!(player.deaths, 1);

        player.respawn();
        assert!(!player.is_dead());
    }

    #[test]
    fn test_triggers_are_harmless() {
        let tm = manager_with_wall(0, true);
        let mut player = AutoPlayer::new(0.0);
        player.update(&tm, 300.0, 0.0);
        assert!(!player.is_dead());
    }
}
