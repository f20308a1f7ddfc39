//! Gameplay constants for the controllers.
//!
//! Defaults are the canonical values; `Tunables` can override them from TOML.

use std::time::Duration;

use serde::Deserialize;

pub const BASE_SPEED: f32 = 200.0;
pub const DASH_SPEED: f32 = 1800.0;
pub const JUMP_VELOCITY: f32 = 480.0;
pub const GRAVITY: f32 = 350.0;
pub const ENEMY_SPEED: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub base_speed: f32,
    pub dash_speed: f32,
    pub jump_velocity: f32,
    /// Dash length in ticks.
    pub dash_steps: u32,
    /// Spawn an afterimage when the remaining dash steps are a multiple of this.
    pub afterimage_cadence: u32,
    /// Afterimages older than this many ticks are evicted.
    pub afterimage_lifetime: u32,
    pub afterimage_alpha: f32,
    pub damage_window_ms: u64,
    pub knockback_speed: f32,
    /// Ticks after leaving the ground during which a jump is still honoured.
    pub jump_grace_ticks: u32,
}

impl PlayerTuning {
    #[inline]
    pub fn damage_window(&self) -> Duration {
        Duration::from_millis(self.damage_window_ms)
    }
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            base_speed: BASE_SPEED,
            dash_speed: DASH_SPEED,
            jump_velocity: JUMP_VELOCITY,
            dash_steps: 20,
            afterimage_cadence: 2,
            afterimage_lifetime: 12,
            afterimage_alpha: 0.5,
            damage_window_ms: 250,
            knockback_speed: 500.0,
            jump_grace_ticks: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub speed: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self { speed: ENEMY_SPEED }
    }
}
