//! Player plugin.
//!
//! Pipeline:
//! - Update: sample keyboard into the `PlayerIntent` resource
//! - FixedUpdate: `PlayerController::tick` against the Avian body (after ground sensing)
//! - FixedPostUpdate: any `Hazard` in `CollidingEntities` -> `PlayerController::handle_damage`,
//!   every step for as long as the overlap lasts (the controller ignores it while dashing or
//!   already recovering)
//! - Update: damage tint, afterimage fade
//!
//! Afterimages are plain sprite entities; the controller's trail owns their lifetime through
//! `GhostSprites`, the `AfterimageVisuals` implementation over `Commands`.

use avian2d::collision::narrow_phase::CollisionEventSystems;
use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::{layers::Layer, state::GameState, tunables::Tunables};
use crate::control::{
    AfterimageVisuals, AnimationPlayer, FrameSnapshot, HorizontalIntent, PlayerController,
    PlayerInput,
};
use crate::plugins::animation::{posed_sprite, SpriteAnimation};
use crate::plugins::physics::{ground_caster, AvianBody, GroundSensing, GroundSensor};
use crate::plugins::world::{Hazard, LevelLayout, TILE};

pub const PLAYER_SIZE: Vec2 = Vec2::new(26.0, 40.0);
const PLAYER_COLOR: Color = Color::srgb(0.2, 0.75, 0.9);
const DAMAGE_TINT: Color = Color::srgb(1.0, 0.0, 0.0);

#[derive(Component)]
pub struct Player;

#[derive(Component, Deref, DerefMut)]
pub struct PlayerControl(pub PlayerController<Entity>);

/// Sprite colour outside the damage window.
#[derive(Component, Debug, Clone, Copy)]
pub struct BaseTint(pub Color);

#[derive(Component)]
pub struct AfterimageGhost;

#[derive(Resource, Default, Debug)]
pub struct PlayerIntent(pub PlayerInput);

pub fn plugin(app: &mut App) {
    app.insert_resource(PlayerIntent::default())
        .add_systems(OnEnter(GameState::InGame), spawn)
        .add_systems(OnExit(GameState::InGame), release_afterimages)
        .add_systems(Update, gather_input)
        .add_systems(
            FixedUpdate,
            tick_players.after(GroundSensing).run_if(in_state(GameState::InGame)),
        )
        .add_systems(
            FixedPostUpdate,
            react_to_hazards
                .after(CollisionEventSystems)
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(
            Update,
            (apply_damage_tint, fade_afterimages).run_if(in_state(GameState::InGame)),
        );
}

/// Afterimage sprites spawned and despawned through `Commands`.
struct GhostSprites<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    color: Color,
}

impl AfterimageVisuals for GhostSprites<'_, '_, '_> {
    type Handle = Entity;

    fn spawn_visual(&mut self, position: Vec2, snapshot: &FrameSnapshot, alpha: f32) -> Entity {
        self.commands
            .spawn((
                Name::new("Afterimage"),
                AfterimageGhost,
                posed_sprite(snapshot, self.color.with_alpha(alpha)),
                // Behind the player.
                Transform::from_translation(position.extend(0.5)),
                DespawnOnExit(GameState::InGame),
            ))
            .id()
    }

    fn release_visual(&mut self, handle: Entity) {
        self.commands.entity(handle).try_despawn();
    }
}

fn spawn(mut commands: Commands, tunables: Res<Tunables>, layout: Option<Res<LevelLayout>>) {
    let Some(layout) = layout else {
        warn!("No level layout loaded, player not spawned");
        return;
    };

    // The body is taller than a tile; stand it on the tile's floor.
    let position = layout.player_spawn + Vec2::Y * (PLAYER_SIZE.y - TILE) * 0.5;
    let transform = Transform::from_translation(position.extend(1.0));
    let controller = PlayerController::new(tunables.player);
    let mut velocity = LinearVelocity::ZERO;
    let mut gravity = GravityScale(0.0);
    let mut animation = SpriteAnimation::new(PLAYER_SIZE);
    controller.attach(&mut AvianBody::new(&transform, &mut velocity, &mut gravity, false), &mut animation);

    let layers = CollisionLayers::new(
        Layer::Player,
        [Layer::World, Layer::Enemy, Layer::Hazard, Layer::Collectible],
    );

    commands.spawn((
        (
            Name::new("Player"),
            Player,
            PlayerControl(controller),
            BaseTint(PLAYER_COLOR),
            Sprite {
                color: PLAYER_COLOR,
                custom_size: Some(PLAYER_SIZE),
                ..default()
            },
            animation,
            transform,
            DespawnOnExit(GameState::InGame),
        ),
        (
            RigidBody::Dynamic,
            Collider::rectangle(PLAYER_SIZE.x, PLAYER_SIZE.y),
            LockedAxes::ROTATION_LOCKED,
            Restitution::new(0.2),
            Friction::ZERO,
            layers,
            velocity,
            gravity,
            TranslationInterpolation,
        ),
        (
            GroundSensor::default(),
            ground_caster(PLAYER_SIZE),
            CollidingEntities::default(),
            CollisionEventsEnabled,
        ),
    ));
    debug!("Player spawned at {position}");
}

fn gather_input(keys: Option<Res<ButtonInput<KeyCode>>>, mut intent: ResMut<PlayerIntent>) {
    let Some(keys) = keys else {
        return;
    };

    let horizontal = if keys.any_pressed([KeyCode::ArrowLeft, KeyCode::KeyA]) {
        HorizontalIntent::Left
    } else if keys.any_pressed([KeyCode::ArrowRight, KeyCode::KeyD]) {
        HorizontalIntent::Right
    } else {
        HorizontalIntent::None
    };

    intent.0 = PlayerInput {
        horizontal,
        jump: keys.any_pressed([KeyCode::Space, KeyCode::ArrowUp, KeyCode::KeyW]),
        dash: keys.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]),
    };
}

pub fn tick_players(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    intent: Res<PlayerIntent>,
    mut q_player: Query<
        (
            &mut PlayerControl,
            &Transform,
            &mut LinearVelocity,
            &mut GravityScale,
            &GroundSensor,
            &mut SpriteAnimation,
            &BaseTint,
        ),
        With<Player>,
    >,
) {
    let dt = time.delta();
    for (mut control, tf, mut vel, mut gravity, ground, mut anim, tint) in &mut q_player {
        let mut body = AvianBody::new(tf, &mut vel, &mut gravity, ground.grounded);
        let mut ghosts = GhostSprites { commands: &mut commands, color: tint.0 };
        let report = control.tick(&intent.0, dt, &mut body, &mut *anim, &mut ghosts);

        if report.dash_started {
            debug!("Dash started facing {:?}", control.facing());
        }
        if report.jumped {
            debug!("Jump with {} grace ticks left", control.jump_grace());
        }
        if report.afterimages_evicted > 0 {
            trace!("{} afterimages expired, {} alive", report.afterimages_evicted, control.trail().len());
        }
        if report.recovered {
            debug!("Player recovered from damage, playing {}", anim.current().name());
        }
    }
}

pub fn react_to_hazards(
    q_hazards: Query<(), With<Hazard>>,
    mut q_player: Query<
        (
            &mut PlayerControl,
            &CollidingEntities,
            &Transform,
            &mut LinearVelocity,
            &mut GravityScale,
            &GroundSensor,
        ),
        With<Player>,
    >,
) {
    for (mut control, colliding, tf, mut vel, mut gravity, ground) in &mut q_player {
        let Some(&hazard) = colliding.iter().find(|&&e| q_hazards.contains(e)) else {
            continue;
        };

        let mut body = AvianBody::new(tf, &mut vel, &mut gravity, ground.grounded);
        if control.handle_damage(&mut body) {
            debug!("Player hit by {hazard}, knocked back at {}", vel.0);
        }
    }
}

fn apply_damage_tint(mut q_player: Query<(&PlayerControl, &BaseTint, &mut Sprite), With<Player>>) {
    for (control, tint, mut sprite) in &mut q_player {
        let color = if control.is_damaging() { DAMAGE_TINT } else { tint.0 };
        if sprite.color != color {
            sprite.color = color;
        }
    }
}

/// Afterimages fade linearly over their lifetime.
fn fade_afterimages(
    q_player: Query<&PlayerControl>,
    mut q_ghosts: Query<&mut Sprite, With<AfterimageGhost>>,
) {
    for control in &q_player {
        let trail = control.trail();
        let span = (trail.lifetime() + 1) as f32;
        for image in trail.iter() {
            if let Ok(mut sprite) = q_ghosts.get_mut(*image.handle()) {
                let alpha = image.alpha * (1.0 - image.age as f32 / span);
                sprite.color.set_alpha(alpha);
            }
        }
    }
}

fn release_afterimages(mut commands: Commands, mut q_player: Query<(&mut PlayerControl, &BaseTint)>) {
    for (mut control, tint) in &mut q_player {
        let mut ghosts = GhostSprites { commands: &mut commands, color: tint.0 };
        control.teardown(&mut ghosts);
    }
}

#[cfg(test)]
mod tests;
