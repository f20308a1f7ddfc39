//! Animation plugin: asset-free clip playback.
//!
//! There is no sprite sheet. A clip is a list of frame ids played at a fixed rate, and a
//! frame id maps to a pose of the solid-colour quad (horizontal flip + a stride squash).
//! `SpriteAnimation` is the `AnimationPlayer` the controllers drive.

use std::time::Duration;

use bevy::prelude::*;

use crate::common::state::GameState;
use crate::control::{AnimationKey, AnimationPlayer, FrameSnapshot};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipDef {
    pub frames: &'static [usize],
    pub fps: f32,
    pub looping: bool,
}

pub fn clip_def(key: AnimationKey) -> ClipDef {
    match key {
        AnimationKey::Idle => ClipDef { frames: &[5], fps: 20.0, looping: false },
        AnimationKey::MoveLeft => ClipDef { frames: &[1, 2, 3, 4], fps: 8.0, looping: true },
        AnimationKey::MoveRight => ClipDef { frames: &[6, 7, 8, 9], fps: 8.0, looping: true },
    }
}

#[derive(Component, Debug, Clone)]
pub struct SpriteAnimation {
    clip: AnimationKey,
    cursor: usize,
    timer: Timer,
    base_size: Vec2,
}

impl SpriteAnimation {
    pub fn new(base_size: Vec2) -> Self {
        let clip = AnimationKey::Idle;
        Self { clip, cursor: 0, timer: frame_timer(clip), base_size }
    }

    #[inline]
    pub fn frame(&self) -> usize {
        clip_def(self.clip).frames[self.cursor]
    }

    pub fn advance(&mut self, dt: Duration) {
        self.timer.tick(dt);
        let def = clip_def(self.clip);
        let last = def.frames.len() - 1;
        for _ in 0..self.timer.times_finished_this_tick() {
            self.cursor = if def.looping { (self.cursor + 1) % def.frames.len() } else { (self.cursor + 1).min(last) };
        }
    }
}

fn frame_timer(clip: AnimationKey) -> Timer {
    Timer::from_seconds(1.0 / clip_def(clip).fps, TimerMode::Repeating)
}

impl AnimationPlayer for SpriteAnimation {
    fn play(&mut self, key: AnimationKey, restart_if_same: bool) {
        if key == self.clip && !restart_if_same {
            return;
        }
        self.clip = key;
        self.cursor = 0;
        self.timer = frame_timer(key);
    }

    fn current(&self) -> AnimationKey {
        self.clip
    }

    fn snapshot(&self) -> FrameSnapshot {
        let frame = self.frame();
        // Even frame ids are the mid-stride poses.
        let size = if frame % 2 == 0 { self.base_size * Vec2::new(1.06, 0.94) } else { self.base_size };
        FrameSnapshot { clip: self.clip, frame, size, flip_x: self.clip == AnimationKey::MoveLeft }
    }
}

/// A sprite posed like `snapshot`.
pub fn posed_sprite(snapshot: &FrameSnapshot, color: Color) -> Sprite {
    Sprite {
        color,
        custom_size: Some(snapshot.size),
        flip_x: snapshot.flip_x,
        ..default()
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        (advance_animations, apply_poses.after(advance_animations)).run_if(in_state(GameState::InGame)),
    );
}

fn advance_animations(time: Res<Time>, mut q: Query<&mut SpriteAnimation>) {
    let dt = time.delta();
    for mut anim in &mut q {
        anim.advance(dt);
    }
}

fn apply_poses(mut q: Query<(&SpriteAnimation, &mut Sprite)>) {
    for (anim, mut sprite) in &mut q {
        let snapshot = anim.snapshot();
        sprite.custom_size = Some(snapshot.size);
        sprite.flip_x = snapshot.flip_x;
    }
}
