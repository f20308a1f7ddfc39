//! Enemies plugin: ground patrollers.
//!
//! Each enemy walks at a constant speed until it touches a `PatrolBoundary` sensor, then
//! turns around. Enemies carry `Hazard`, so touching one hurts the player, and they cast
//! shadows through a Firefly occluder.
//!
//! ```text
//! OnEnter(InGame):  spawn_patrollers at LevelLayout::enemy_spawns
//! FixedUpdate:      patrol            (EnemyController::tick -> LinearVelocity)
//! FixedPostUpdate:  reverse_at_boundaries (CollisionStart with a PatrolBoundary)
//! ```

use avian2d::collision::narrow_phase::CollisionEventSystems;
use avian2d::prelude::*;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy_firefly::prelude::Occluder2d;

use crate::common::{layers::Layer, state::GameState, tunables::Tunables};
use crate::control::EnemyController;
use crate::plugins::animation::SpriteAnimation;
use crate::plugins::physics::{split_contact, AvianBody};
use crate::plugins::world::{Hazard, LevelLayout, PatrolBoundary};

pub const ENEMY_SIZE: Vec2 = Vec2::new(28.0, 30.0);
const ENEMY_COLOR: Color = Color::srgb(0.9, 0.25, 0.25);

#[derive(Component)]
pub struct Enemy;

#[derive(Component, Deref, DerefMut)]
pub struct EnemyControl(pub EnemyController);

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_patrollers)
        .add_systems(FixedUpdate, patrol.run_if(in_state(GameState::InGame)))
        .add_systems(
            FixedPostUpdate,
            reverse_at_boundaries
                .after(CollisionEventSystems)
                .run_if(in_state(GameState::InGame)),
        );
}

pub fn spawn_patrollers(mut commands: Commands, tunables: Res<Tunables>, layout: Option<Res<LevelLayout>>) {
    let Some(layout) = layout else {
        warn!("No level layout loaded, enemies not spawned");
        return;
    };

    let layers = CollisionLayers::new(Layer::Enemy, [Layer::World, Layer::Player, Layer::PatrolBoundary]);

    for (i, &pos) in layout.enemy_spawns.iter().enumerate() {
        let transform = Transform::from_translation(pos.extend(1.0));
        let controller = EnemyController::new(&tunables.enemy);
        let mut velocity = LinearVelocity::ZERO;
        let mut gravity = GravityScale(0.0);
        let mut animation = SpriteAnimation::new(ENEMY_SIZE);
        controller.attach(&mut AvianBody::new(&transform, &mut velocity, &mut gravity, false), &mut animation);

        commands.spawn((
            (
                Name::new(format!("Enemy{i}")),
                Enemy,
                Hazard,
                EnemyControl(controller),
                Sprite {
                    color: ENEMY_COLOR,
                    custom_size: Some(ENEMY_SIZE),
                    ..default()
                },
                animation,
                transform,
                Occluder2d::circle(ENEMY_SIZE.y * 0.5),
                DespawnOnExit(GameState::InGame),
            ),
            (
                RigidBody::Dynamic,
                Collider::rectangle(ENEMY_SIZE.x, ENEMY_SIZE.y),
                LockedAxes::ROTATION_LOCKED,
                Friction::ZERO,
                layers,
                velocity,
                gravity,
                TranslationInterpolation,
            ),
        ));
    }
    info!("Spawned {} patrollers", layout.enemy_spawns.len());
}

pub fn patrol(
    mut q_enemies: Query<
        (&EnemyControl, &Transform, &mut LinearVelocity, &mut GravityScale, &mut SpriteAnimation),
        With<Enemy>,
    >,
) {
    for (control, tf, mut vel, mut gravity, mut anim) in &mut q_enemies {
        // Patrol speed does not depend on ground contact.
        let mut body = AvianBody::new(tf, &mut vel, &mut gravity, false);
        control.tick(&mut body, &mut *anim);
    }
}

pub fn reverse_at_boundaries(
    mut started: MessageReader<CollisionStart>,
    q_boundaries: Query<(), With<PatrolBoundary>>,
    mut q_enemies: Query<&mut EnemyControl, With<Enemy>>,
    // Per-frame dedupe: one turn per enemy even if it reaches two sensors in one step.
    mut turned: Local<HashSet<Entity>>,
) {
    turned.clear();

    for ev in started.read() {
        let Some((enemy, other)) = split_contact(ev, |e| q_enemies.contains(e)) else {
            continue;
        };
        if !q_boundaries.contains(other) || !turned.insert(enemy) {
            continue;
        }
        let Ok(mut control) = q_enemies.get_mut(enemy) else {
            continue;
        };
        control.reverse_direction();
        debug!("{enemy} turned around, now playing {}", control.state().clip().name());
    }
}
