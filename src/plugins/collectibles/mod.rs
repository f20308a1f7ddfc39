//! Collectibles plugin: coins and the running score.

use avian2d::collision::narrow_phase::CollisionEventSystems;
use avian2d::prelude::*;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::{layers::Layer, state::GameState};
use crate::plugins::physics::split_contact;
use crate::plugins::player::Player;
use crate::plugins::world::{LevelLayout, TILE};

const COIN_VALUE: u32 = 1;
const COIN_COLOR: Color = Color::srgb(1.0, 0.85, 0.2);

#[derive(Component, Debug, Clone, Copy)]
pub struct Coin {
    pub value: u32,
}

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Score(pub u32);

pub fn plugin(app: &mut App) {
    app.init_resource::<Score>()
        .add_systems(OnEnter(GameState::InGame), (reset_score, spawn_coins))
        .add_systems(
            FixedPostUpdate,
            collect_coins
                .after(CollisionEventSystems)
                .run_if(in_state(GameState::InGame)),
        );
}

fn reset_score(mut score: ResMut<Score>) {
    score.0 = 0;
}

pub fn spawn_coins(mut commands: Commands, layout: Option<Res<LevelLayout>>) {
    let Some(layout) = layout else {
        return;
    };
    let radius = TILE * 0.25;
    for &pos in &layout.coins {
        commands.spawn((
            Name::new("Coin"),
            Coin { value: COIN_VALUE },
            Sprite::from_color(COIN_COLOR, Vec2::splat(radius * 2.0)),
            Transform::from_translation(pos.extend(0.5)),
            RigidBody::Static,
            Collider::circle(radius),
            Sensor,
            CollisionEventsEnabled,
            CollisionLayers::new(Layer::Collectible, [Layer::Player]),
            DespawnOnExit(GameState::InGame),
        ));
    }
}

pub fn collect_coins(
    mut commands: Commands,
    mut started: MessageReader<CollisionStart>,
    q_player: Query<(), With<Player>>,
    q_coins: Query<&Coin>,
    mut score: ResMut<Score>,
    // A coin's despawn is deferred; don't count it twice in the same step.
    mut taken: Local<HashSet<Entity>>,
) {
    taken.clear();

    for ev in started.read() {
        let Some((_, other)) = split_contact(ev, |e| q_player.contains(e)) else {
            continue;
        };
        let Ok(coin) = q_coins.get(other) else {
            continue;
        };
        if !taken.insert(other) {
            continue;
        }
        score.0 += coin.value;
        commands.entity(other).try_despawn();
        info!("Coin collected, score {}", score.0);
    }
}
