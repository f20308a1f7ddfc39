//! Lighting plugin (Firefly) (render-only).
//!
//! One point light rides on the player and flushes red during the damage window.
//! Enemies carry `Occluder2d`, so they throw shadows across the level.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy_firefly::prelude::*;

use crate::common::state::GameState;
use crate::plugins::player::{Player, PlayerControl};

const LIGHT_COLOR: Color = Color::srgb(1.0, 0.9, 0.75);
const HURT_LIGHT_COLOR: Color = Color::srgb(1.0, 0.35, 0.3);

#[derive(Component)]
pub struct PlayerLight;

pub fn plugin(app: &mut App) {
    if !app.is_plugin_added::<FireflyPlugin>() {
        app.add_plugins(FireflyPlugin);
    }

    app.add_systems(OnEnter(GameState::InGame), setup)
        .add_systems(Update, follow_player_light.run_if(in_state(GameState::InGame)));
}

fn setup(mut commands: Commands) {
    commands.spawn((
        Name::new("PlayerLight"),
        PlayerLight,
        PointLight2d {
            color: LIGHT_COLOR,
            radius: 450.0,
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 10.0),
        DespawnOnExit(GameState::InGame),
    ));
}

fn follow_player_light(
    q_player: Query<(&Transform, &PlayerControl), (With<Player>, Without<PlayerLight>)>,
    mut q_light: Query<(&mut Transform, &mut PointLight2d), (With<PlayerLight>, Without<Player>)>,
) {
    let Ok((tf_player, control)) = q_player.single() else {
        return;
    };
    let Ok((mut tf_light, mut light)) = q_light.single_mut() else {
        return;
    };

    tf_light.translation.x = tf_player.translation.x;
    tf_light.translation.y = tf_player.translation.y;

    let color = if control.is_damaging() { HURT_LIGHT_COLOR } else { LIGHT_COLOR };
    if light.color != color {
        light.color = color;
    }
}
