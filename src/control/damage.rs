//! Post-hit invulnerability window.

use std::time::Duration;

use bevy::time::{Timer, TimerMode};

/// `Some(timer)` while the player is recovering from a hit.
///
/// Keeping the timer inside the option makes "damaging without a timer" unrepresentable.
#[derive(Debug, Clone, Default)]
pub struct DamageState {
    timer: Option<Timer>,
}

impl DamageState {
    #[inline]
    pub fn is_damaging(&self) -> bool {
        self.timer.is_some()
    }

    /// Open a new window. Returns `false` (and changes nothing) if one is already open.
    pub fn begin(&mut self, window: Duration) -> bool {
        if self.is_damaging() {
            return false;
        }
        self.timer = Some(Timer::new(window, TimerMode::Once));
        true
    }

    /// Advance the window by `dt`. Returns `true` on the tick the window closes.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let Some(timer) = &mut self.timer else {
            return false;
        };
        timer.tick(dt);
        if timer.is_finished() {
            self.timer = None;
            return true;
        }
        false
    }
}
