//! Collaborator seams the controllers drive.
//!
//! Controllers never touch engine types directly. The plugins implement these traits over
//! Avian / Bevy components; tests implement them over plain structs.

use bevy::math::Vec2;

/// Minimal physics capability of a single body.
///
/// The engine is y-up: positive `y` velocity moves the body upward.
pub trait PhysicsBody {
    fn position(&self) -> Vec2;
    fn velocity(&self) -> Vec2;
    fn set_velocity_x(&mut self, vx: f32);
    fn set_velocity_y(&mut self, vy: f32);

    fn set_velocity(&mut self, v: Vec2) {
        self.set_velocity_x(v.x);
        self.set_velocity_y(v.y);
    }

    /// Resting on a solid surface this tick.
    fn is_on_ground(&self) -> bool;
    fn set_gravity_enabled(&mut self, enabled: bool);
}

/// Animation clips shared by every animated actor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AnimationKey {
    #[default]
    Idle,
    MoveLeft,
    MoveRight,
}

impl AnimationKey {
    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::MoveLeft => "move-left",
            Self::MoveRight => "move-right",
        }
    }
}

/// Pose of an animated sprite at one instant, copied into afterimages.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSnapshot {
    pub clip: AnimationKey,
    pub frame: usize,
    pub size: Vec2,
    pub flip_x: bool,
}

pub trait AnimationPlayer {
    /// Play `key`. Playing the current clip again is a no-op unless `restart_if_same`.
    fn play(&mut self, key: AnimationKey, restart_if_same: bool);
    fn current(&self) -> AnimationKey;
    fn snapshot(&self) -> FrameSnapshot;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}
