//! Enemy patrol: walk one way until a patrol boundary says otherwise.

use super::body::{AnimationKey, AnimationPlayer, PhysicsBody};
use super::tuning::EnemyTuning;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PatrolState {
    PatrolLeft,
    #[default]
    PatrolRight,
}

impl PatrolState {
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Self::PatrolLeft => Self::PatrolRight,
            Self::PatrolRight => Self::PatrolLeft,
        }
    }

    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Self::PatrolLeft => -1.0,
            Self::PatrolRight => 1.0,
        }
    }

    #[inline]
    pub fn clip(self) -> AnimationKey {
        match self {
            Self::PatrolLeft => AnimationKey::MoveLeft,
            Self::PatrolRight => AnimationKey::MoveRight,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyController {
    state: PatrolState,
    speed: f32,
}

impl EnemyController {
    pub fn new(tuning: &EnemyTuning) -> Self {
        Self { state: PatrolState::default(), speed: tuning.speed }
    }

    #[inline]
    pub fn state(&self) -> PatrolState {
        self.state
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Spawn pose: idle until the first patrol tick.
    pub fn attach<B: PhysicsBody, A: AnimationPlayer>(&self, body: &mut B, animation: &mut A) {
        body.set_gravity_enabled(true);
        body.set_velocity_x(0.0);
        animation.play(AnimationKey::Idle, true);
    }

    pub fn tick<B: PhysicsBody, A: AnimationPlayer>(&self, body: &mut B, animation: &mut A) {
        body.set_velocity_x(self.state.sign() * self.speed);
        animation.play(self.state.clip(), false);
    }

    /// Patrol boundary contact.
    pub fn reverse_direction(&mut self) {
        self.state = self.state.flipped();
    }
}
