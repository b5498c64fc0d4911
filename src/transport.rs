use crate::particle::{Particle, Step};
use crate::units::m_to_cm;

/// External transport engine: tracks one primary to completion and reports
/// every step to `on_step`.
pub trait TransportHost {
    fn transport(&mut self, primary: Particle, on_step: &mut dyn FnMut(&Step));
}

pub const DEFAULT_STEP_CM: f64 = 10.0;
pub const DEFAULT_WORLD_HALF_EXTENT_M: f64 = 50.0;

/// Physics-free host: the primary flies straight through a cubic world in
/// fixed-length steps and never produces secondaries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StraightLineTransport {
    pub step_cm: f64,
    pub world_half_extent_cm: f64,
}

impl Default for StraightLineTransport {
    fn default() -> Self {
        Self {
            step_cm: DEFAULT_STEP_CM,
            world_half_extent_cm: m_to_cm(DEFAULT_WORLD_HALF_EXTENT_M),
        }
    }
}

impl StraightLineTransport {
    /// Distance from `position` along `direction` to the world boundary.
    fn distance_to_boundary(&self, position: [f64; 3], direction: [f64; 3]) -> f64 {
        let mut distance = f64::INFINITY;
        for i in 0..3 {
            let d = if direction[i] > 0.0 {
                (self.world_half_extent_cm - position[i]) / direction[i]
            } else if direction[i] < 0.0 {
                (-self.world_half_extent_cm - position[i]) / direction[i]
            } else {
                continue;
            };
            distance = distance.min(d.max(0.0));
        }
        distance
    }
}

impl TransportHost for StraightLineTransport {
    fn transport(&mut self, mut primary: Particle, on_step: &mut dyn FnMut(&Step)) {
        let mut remaining = self.distance_to_boundary(primary.position, primary.direction);
        if !remaining.is_finite() || !(self.step_cm > 0.0) {
            primary.alive = false;
            return;
        }

        while primary.alive && remaining > 0.0 {
            let length = self.step_cm.min(remaining);
            let pre = primary.position;
            primary.move_by(length);
            remaining -= length;
            on_step(&Step::primary(pre, primary.position, length));
            if remaining <= 0.0 {
                primary.alive = false;
            }
        }
    }
}
