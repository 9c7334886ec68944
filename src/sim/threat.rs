//! Live threats and the pool that recycles them
//!
//! A threat is a wall that has been placed on the field. Its radius shrinks
//! every tick until the owning pattern retires, at which point it is parked
//! back in the pool. Threats are never freed during play, only reused.

use glam::Vec2;

use super::arc::LaneArc;
use crate::consts::SPAWN_PATTERNS_UNTIL_RADIUS;
use crate::error::{Result, SimError};
use crate::polar_to_cartesian;

/// Index of a slot in the [`ThreatPool`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ThreatId(u32);

impl ThreatId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// A materialized wall moving toward the center
#[derive(Debug, Clone, PartialEq)]
pub struct Threat {
    /// Inner edge; may go negative while the pattern drains off screen
    pub radius: f32,
    /// Radius before the last step, for crossing detection
    pub last_radius: f32,
    /// Radial thickness
    pub thickness: f32,
    /// Lane index after rotation/mirroring
    pub lane: u32,
    /// Lane center angle (degrees), fixed for the threat's lifetime
    pub lane_angle: f32,
    /// Non-lethal safe-gap marker
    pub is_trigger: bool,
}

impl Default for Threat {
    fn default() -> Self {
        Self {
            radius: SPAWN_PATTERNS_UNTIL_RADIUS,
            last_radius: SPAWN_PATTERNS_UNTIL_RADIUS,
            thickness: 0.0,
            lane: 0,
            lane_angle: 0.0,
            is_trigger: false,
        }
    }
}

impl Threat {
    #[inline]
    pub fn outer_radius(&self) -> f32 {
        self.radius + self.thickness
    }

    /// Place the threat without registering a crossing
    pub fn place(&mut self, radius: f32) {
        self.radius = radius;
        self.last_radius = radius;
    }

    /// Move inward by `delta`
    #[inline]
    pub fn step(&mut self, delta: f32) {
        self.last_radius = self.radius;
        self.radius -= delta;
    }

    /// Inner edge crossed `threshold` during the last step
    pub fn has_just_passed(&self, threshold: f32) -> bool {
        self.last_radius > threshold && self.radius < threshold
    }

    /// Radial band straddles `radius` (edges included)
    pub fn is_beside(&self, radius: f32) -> bool {
        self.radius <= radius && self.outer_radius() >= radius
    }

    /// Angular window this threat covers
    pub fn arc(&self, lanes: u32) -> LaneArc {
        LaneArc::new(self.lane_angle, 180.0 / lanes as f32)
    }

    /// Inner and outer radius clamped to zero for drawing
    pub fn display_radii(&self) -> (f32, f32) {
        (self.radius.max(0.0), self.outer_radius().max(0.0))
    }

    /// Corners of the hexagon-sector trapezoid covered by this threat:
    /// outer-left, outer-right, inner-right, inner-left.
    pub fn display_points(&self, lanes: u32) -> [Vec2; 4] {
        let (inner, outer) = self.display_radii();
        let half_tan = (std::f32::consts::PI / lanes as f32).tan();
        let rotation = Vec2::from_angle(self.lane_angle.to_radians());

        // Local frame has the lane pointing along +x
        let corner = |r: f32, side: f32| rotation.rotate(Vec2::new(r, side * r * half_tan));
        [
            corner(outer, 1.0),
            corner(outer, -1.0),
            corner(inner, -1.0),
            corner(inner, 1.0),
        ]
    }

    /// Center of the threat's band, for debug overlays
    pub fn display_center(&self) -> Vec2 {
        let (inner, outer) = self.display_radii();
        polar_to_cartesian((inner + outer) / 2.0, self.lane_angle.to_radians())
    }

    /// Park the threat back at the sentinel radius
    fn reset(&mut self) {
        *self = Threat::default();
    }
}

/// Arena of threat slots with a free-index stack.
///
/// `acquire` and `release` are O(1) and allocate only when the free stack is
/// empty and the pool is still under its maximum size.
#[derive(Debug, Clone)]
pub struct ThreatPool {
    slots: Vec<Threat>,
    active: Vec<bool>,
    free: Vec<u32>,
    max_size: usize,
}

impl ThreatPool {
    /// Pre-allocate `starting_size` parked threats
    pub fn new(starting_size: usize, max_size: usize) -> Self {
        let starting_size = starting_size.min(max_size);
        Self {
            slots: vec![Threat::default(); starting_size],
            active: vec![false; starting_size],
            // Reversed so slot 0 is handed out first
            free: (0..starting_size as u32).rev().collect(),
            max_size,
        }
    }

    /// Take a parked threat, growing the arena if none is free
    pub fn acquire(&mut self) -> Result<ThreatId> {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                if self.slots.len() >= self.max_size {
                    return Err(SimError::PoolExhausted {
                        capacity: self.slots.len(),
                    });
                }
                self.slots.push(Threat::default());
                self.active.push(false);
                (self.slots.len() - 1) as u32
            }
        };
        self.active[index as usize] = true;
        Ok(ThreatId(index))
    }

    /// Reset a threat and return it to the free stack.
    ///
    /// Releasing a slot that is not active is ignored.
    pub fn release(&mut self, id: ThreatId) {
        let index = id.index();
        if !self.active.get(index).copied().unwrap_or(false) {
            log::warn!("Ignoring release of inactive threat slot {}", index);
            return;
        }
        self.slots[index].reset();
        self.active[index] = false;
        self.free.push(id.0);
    }

    pub fn get(&self, id: ThreatId) -> &Threat {
        &self.slots[id.index()]
    }

    pub fn get_mut(&mut self, id: ThreatId) -> &mut Threat {
        &mut self.slots[id.index()]
    }

    pub fn is_active(&self, id: ThreatId) -> bool {
        self.active.get(id.index()).copied().unwrap_or(false)
    }

    pub fn active_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Slots allocated so far (active + free)
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Active threats in slot order
    pub fn iter_active(&self) -> impl Iterator<Item = (ThreatId, &Threat)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(i, _)| self.active[*i])
            .map(|(i, t)| (ThreatId(i as u32), t))
    }
}
