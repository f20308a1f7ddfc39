//! Dash activation, cooldown and speed decay.

use super::tuning::PlayerTuning;

/// Output of one dash tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashStep {
    /// Horizontal speed magnitude for this tick.
    pub speed: f32,
    pub spawn_afterimage: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashState {
    remaining: u32,
    can_dash: bool,
}

impl Default for DashState {
    fn default() -> Self {
        Self { remaining: 0, can_dash: true }
    }
}

/// Linear decay from `dash_speed` to `base_speed` over the dash, floored at `base_speed`.
pub fn dash_speed_at(remaining: u32, tuning: &PlayerTuning) -> f32 {
    let steps = tuning.dash_steps.max(1) as f32;
    (tuning.dash_speed * (remaining as f32 / steps)).max(tuning.base_speed)
}

impl DashState {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    #[inline]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[inline]
    pub fn can_dash(&self) -> bool {
        self.can_dash
    }

    /// Start a dash if none is running and the cooldown has been refreshed.
    pub fn try_activate(&mut self, tuning: &PlayerTuning) -> bool {
        if self.is_active() || !self.can_dash || tuning.dash_steps == 0 {
            return false;
        }
        self.remaining = tuning.dash_steps;
        self.can_dash = false;
        true
    }

    /// Consume one dash tick. `None` when no dash is running.
    pub fn step(&mut self, tuning: &PlayerTuning) -> Option<DashStep> {
        if !self.is_active() {
            return None;
        }
        let step = DashStep {
            speed: dash_speed_at(self.remaining, tuning),
            spawn_afterimage: self.remaining % tuning.afterimage_cadence.max(1) == 0,
        };
        self.remaining -= 1;
        Some(step)
    }

    /// Recharge on ground contact once the dash is over. Returns `true` when newly recharged.
    pub fn refresh(&mut self, grounded: bool) -> bool {
        if grounded && !self.is_active() && !self.can_dash {
            self.can_dash = true;
            return true;
        }
        false
    }
}
