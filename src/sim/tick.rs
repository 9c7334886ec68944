//! Simulation tick
//!
//! Within one tick: phase transitions, command draining, spawning, threat
//! advancement with event dispatch, then the solver. The solver therefore
//! always sees post-advance positions.

use super::player::PlayerControl;
use super::state::{SimPhase, Simulation};
use crate::consts::{MAX_DT, PAUSED_DT};
use crate::error::Result;

/// Clamp a wall-clock interval into something the tick can integrate
pub fn clamp_dt(dt: f32) -> f32 {
    if dt <= 0.0 || dt.is_nan() {
        PAUSED_DT
    } else {
        dt.min(MAX_DT)
    }
}

impl Simulation {
    /// Advance the simulation by `dt` seconds.
    ///
    /// Fails only on pool exhaustion, which is fatal for the caller.
    pub fn tick(&mut self, player: &mut dyn PlayerControl, dt: f32) -> Result<()> {
        self.events.clear();
        let dt = clamp_dt(dt);
        self.time_ticks += 1;

        if player.is_dead() {
            if self.phase != SimPhase::Dead {
                self.on_death();
            }
            return Ok(());
        }
        if self.phase == SimPhase::Dead {
            self.on_respawn();
        }

        if let SimPhase::Intro { remaining } = self.phase {
            let remaining = remaining - dt;
            if remaining > 0.0 {
                self.phase = SimPhase::Intro { remaining };
                return Ok(());
            }
            self.begin_level();
        }

        self.time_alive += dt;
        self.difficulty.tick(dt);

        self.script.drain_immediate(&mut self.difficulty, &mut self.camera);
        self.script
            .try_spawn(&mut self.threats, &self.difficulty, &mut self.events)?;

        self.threats
            .advance(self.difficulty.threat_speed(), dt, &mut self.events);
        self.levels_completed += self.events.iter().filter(|e| e.completes_level()).count() as u32;

        if let Some(solver) = self.solver.as_mut() {
            let recommendation = solver.update(&self.threats, player.current_angle());
            player.set_recommended_direction(recommendation);
        }

        Ok(())
    }

    fn on_death(&mut self) {
        log::info!(
            "Player died after {:.2}s ({} patterns on screen)",
            self.time_alive,
            self.threats.patterns_on_screen().len()
        );
        self.difficulty.reset();
        self.phase = SimPhase::Dead;
    }

    fn on_respawn(&mut self) {
        log::info!("Respawning");
        self.threats.clear();
        self.begin_level();
    }
}
