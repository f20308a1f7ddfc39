//! Player motion / ability state machine.
//!
//! Tick order:
//! 1. damage window (while damaging, only afterimage aging runs)
//! 2. horizontal movement + dash activation (skipped while dashing)
//! 3. dash execution (decaying speed, afterimage spawn on even steps)
//! 4. afterimage aging
//! 5. dash recharge on ground + jump grace window

use std::time::Duration;

use bevy::math::Vec2;

use super::afterimage::{AfterimageTrail, AfterimageVisuals};
use super::body::{AnimationKey, AnimationPlayer, Facing, PhysicsBody};
use super::damage::DamageState;
use super::dash::DashState;
use super::tuning::PlayerTuning;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HorizontalIntent {
    Left,
    Right,
    #[default]
    None,
}

/// Input sampled for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerInput {
    pub horizontal: HorizontalIntent,
    pub jump: bool,
    pub dash: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerPhase {
    Idle,
    MovingLeft,
    MovingRight,
    Jumping,
    Dashing,
    Damaged,
}

/// What changed during a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// The damage window closed this tick.
    pub recovered: bool,
    pub dash_started: bool,
    pub afterimage_spawned: bool,
    pub afterimages_evicted: usize,
    pub jumped: bool,
}

#[derive(Debug, Clone)]
pub struct PlayerController<H> {
    tuning: PlayerTuning,
    facing: Facing,
    intent: HorizontalIntent,
    grounded: bool,
    damage: DamageState,
    dash: DashState,
    jump_grace: u32,
    trail: AfterimageTrail<H>,
}

impl<H> PlayerController<H> {
    pub fn new(tuning: PlayerTuning) -> Self {
        Self {
            trail: AfterimageTrail::from_tuning(&tuning),
            tuning,
            facing: Facing::Right,
            intent: HorizontalIntent::None,
            grounded: false,
            damage: DamageState::default(),
            dash: DashState::default(),
            jump_grace: 0,
        }
    }

    #[inline]
    pub fn facing(&self) -> Facing {
        self.facing
    }

    #[inline]
    pub fn dash(&self) -> &DashState {
        &self.dash
    }

    #[inline]
    pub fn damage(&self) -> &DamageState {
        &self.damage
    }

    #[inline]
    pub fn is_damaging(&self) -> bool {
        self.damage.is_damaging()
    }

    #[inline]
    pub fn jump_grace(&self) -> u32 {
        self.jump_grace
    }

    #[inline]
    pub fn trail(&self) -> &AfterimageTrail<H> {
        &self.trail
    }

    pub fn phase(&self) -> PlayerPhase {
        if self.damage.is_damaging() {
            PlayerPhase::Damaged
        } else if self.dash.is_active() {
            PlayerPhase::Dashing
        } else if !self.grounded {
            PlayerPhase::Jumping
        } else {
            match self.intent {
                HorizontalIntent::Left => PlayerPhase::MovingLeft,
                HorizontalIntent::Right => PlayerPhase::MovingRight,
                HorizontalIntent::None => PlayerPhase::Idle,
            }
        }
    }

    /// Bind the controller to a freshly spawned body.
    pub fn attach<B: PhysicsBody, A: AnimationPlayer>(&self, body: &mut B, animation: &mut A) {
        body.set_gravity_enabled(true);
        body.set_velocity(Vec2::ZERO);
        animation.play(AnimationKey::Idle, true);
    }

    /// Advance one simulation tick.
    pub fn tick<B, A, V>(
        &mut self,
        input: &PlayerInput,
        dt: Duration,
        body: &mut B,
        animation: &mut A,
        visuals: &mut V,
    ) -> TickReport
    where
        B: PhysicsBody,
        A: AnimationPlayer,
        V: AfterimageVisuals<Handle = H>,
    {
        let mut report = TickReport::default();
        if dt.is_zero() {
            return report;
        }

        if self.damage.is_damaging() {
            report.recovered = self.damage.tick(dt);
            if !report.recovered {
                // Knockback owns the velocity until the window closes.
                report.afterimages_evicted = self.trail.advance(visuals);
                return report;
            }
        }

        if !self.dash.is_active() {
            self.apply_horizontal(input.horizontal, body, animation);
            if input.dash {
                report.dash_started = self.dash.try_activate(&self.tuning);
            }
        }

        if let Some(step) = self.dash.step(&self.tuning) {
            body.set_velocity_x(step.speed * self.facing.sign());
            if step.spawn_afterimage {
                let snapshot = animation.snapshot();
                self.trail.spawn(body.position(), snapshot, self.tuning.afterimage_alpha, visuals);
                report.afterimage_spawned = true;
            }
        }

        report.afterimages_evicted = self.trail.advance(visuals);

        self.grounded = body.is_on_ground();
        self.jump_grace = self.jump_grace.saturating_sub(1);
        if self.grounded {
            self.dash.refresh(true);
            self.jump_grace = self.tuning.jump_grace_ticks;
        }

        if input.jump && self.jump_grace > 0 {
            body.set_velocity_y(self.tuning.jump_velocity);
            report.jumped = true;
        }

        report
    }

    /// Hazard contact. Ignored while dashing or already recovering; otherwise knocks the body
    /// back against its current velocity and opens the invulnerability window.
    pub fn handle_damage<B: PhysicsBody>(&mut self, body: &mut B) -> bool {
        if self.dash.is_active() || self.damage.is_damaging() {
            return false;
        }
        // A body at rest has no direction to reverse; knock it straight up.
        let direction = (-body.velocity()).normalize_or(Vec2::Y);
        body.set_velocity(direction * self.tuning.knockback_speed);
        self.damage.begin(self.tuning.damage_window())
    }

    /// Release every live afterimage.
    pub fn teardown<V: AfterimageVisuals<Handle = H>>(&mut self, visuals: &mut V) {
        self.trail.clear(visuals);
    }

    fn apply_horizontal<B: PhysicsBody, A: AnimationPlayer>(
        &mut self,
        intent: HorizontalIntent,
        body: &mut B,
        animation: &mut A,
    ) {
        self.intent = intent;
        match intent {
            HorizontalIntent::Left => {
                body.set_velocity_x(-self.tuning.base_speed);
                self.facing = Facing::Left;
                animation.play(AnimationKey::MoveLeft, false);
            }
            HorizontalIntent::Right => {
                body.set_velocity_x(self.tuning.base_speed);
                self.facing = Facing::Right;
                animation.play(AnimationKey::MoveRight, false);
            }
            HorizontalIntent::None => {
                body.set_velocity_x(0.0);
                animation.play(AnimationKey::Idle, false);
            }
        }
    }
}
