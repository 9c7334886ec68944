//! Lane arc geometry
//!
//! Every threat occupies exactly one lane: an angular window of
//! `360 / lanes` degrees centered on the lane angle. Angles are in degrees,
//! counter-clockwise positive, wrapped to [0, 360). Moving clockwise
//! decreases the angle.

use crate::{delta_degrees, wrap_degrees};

/// Angular window of one lane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneArc {
    /// Lane center angle (degrees, [0, 360))
    pub center: f32,
    /// Half of the lane's angular width (degrees)
    pub half_width: f32,
}

impl LaneArc {
    pub fn new(center: f32, half_width: f32) -> Self {
        Self {
            center: wrap_degrees(center),
            half_width,
        }
    }

    /// Arc for lane `lane` out of `lanes`
    pub fn for_lane(lane: u32, lanes: u32) -> Self {
        let width = 360.0 / lanes as f32;
        Self::new(lane as f32 * width, width / 2.0)
    }

    /// Clockwise-most edge ("right" side)
    #[inline]
    pub fn angle_start(&self) -> f32 {
        wrap_degrees(self.center - self.half_width)
    }

    /// Counter-clockwise-most edge ("left" side)
    #[inline]
    pub fn angle_end(&self) -> f32 {
        wrap_degrees(self.center + self.half_width)
    }

    /// Whether `angle` lies inside the window (edges included)
    pub fn contains_angle(&self, angle: f32) -> bool {
        delta_degrees(angle, self.center).abs() <= self.half_width
    }

    /// Degrees to rotate clockwise from `from` until reaching the window's
    /// counter-clockwise edge
    pub fn clockwise_distance(&self, from: f32) -> f32 {
        wrap_degrees(from - self.angle_end())
    }

    /// Degrees to rotate counter-clockwise from `from` until reaching the
    /// window's clockwise edge
    pub fn counter_clockwise_distance(&self, from: f32) -> f32 {
        wrap_degrees(self.angle_start() - from)
    }
}
