//! World plugin: loads the level layout and spawns its static geometry.
//!
//! `Loading` parses the layout into a `LevelLayout` resource and moves on to `InGame`;
//! every `OnEnter(InGame)` spawner reads that resource. Pressing R goes back through
//! `Loading`, which respawns everything scoped to `InGame`.

use std::path::Path;

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::{layers::Layer, state::GameState, tunables::Tunables};

pub mod level;

pub use level::{LevelError, LevelLayout, DEFAULT_LEVEL, TILE};

/// Damages the player on contact.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Hazard;

/// Turns patrolling enemies around.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct PatrolBoundary;

const GROUND_COLOR: Color = Color::srgb(0.25, 0.27, 0.33);
const SPIKE_COLOR: Color = Color::srgb(0.85, 0.2, 0.25);

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::Loading), load_level);
    app.add_systems(OnEnter(GameState::InGame), spawn_level_geometry);
    app.add_systems(Update, restart_on_key.run_if(in_state(GameState::InGame)));
}

pub fn load_level(
    mut commands: Commands,
    tunables: Res<Tunables>,
    mut next: ResMut<NextState<GameState>>,
) -> Result {
    let layout = match &tunables.level_path {
        Some(path) => LevelLayout::load(Path::new(path))?,
        None => LevelLayout::parse(DEFAULT_LEVEL)?,
    };
    info!(
        "Level loaded: {}x{} tiles, {} enemies, {} coins",
        layout.width,
        layout.height,
        layout.enemy_spawns.len(),
        layout.coins.len()
    );
    commands.insert_resource(layout);
    next.set(GameState::InGame);
    Ok(())
}

fn spawn_level_geometry(mut commands: Commands, layout: Option<Res<LevelLayout>>) {
    let Some(layout) = layout else {
        warn!("No level layout loaded, nothing to spawn");
        return;
    };

    let ground_layers = CollisionLayers::new(Layer::World, [Layer::Player, Layer::Enemy]);
    for (i, run) in layout.ground.iter().enumerate() {
        let size = run.size();
        commands.spawn((
            Name::new(format!("Ground{i}")),
            Sprite::from_color(GROUND_COLOR, size),
            Transform::from_translation(run.center().extend(0.0)),
            RigidBody::Static,
            Collider::rectangle(size.x, size.y),
            ground_layers,
            DespawnOnExit(GameState::InGame),
        ));
    }

    for &pos in &layout.boundaries {
        commands.spawn((
            Name::new("PatrolBoundary"),
            PatrolBoundary,
            Transform::from_translation(pos.extend(0.0)),
            RigidBody::Static,
            Collider::rectangle(TILE, TILE),
            Sensor,
            CollisionEventsEnabled,
            CollisionLayers::new(Layer::PatrolBoundary, [Layer::Enemy]),
            DespawnOnExit(GameState::InGame),
        ));
    }

    // Spikes fill the lower half of their tile.
    let spike_size = Vec2::new(TILE, TILE * 0.5);
    for &pos in &layout.hazards {
        commands.spawn((
            Name::new("Spikes"),
            Hazard,
            Sprite::from_color(SPIKE_COLOR, spike_size),
            Transform::from_translation((pos - Vec2::new(0.0, TILE * 0.25)).extend(0.0)),
            RigidBody::Static,
            Collider::rectangle(spike_size.x, spike_size.y),
            Sensor,
            CollisionEventsEnabled,
            CollisionLayers::new(Layer::Hazard, [Layer::Player]),
            DespawnOnExit(GameState::InGame),
        ));
    }

    info!("Level geometry spawned: {} ground runs", layout.ground.len());
}

fn restart_on_key(keys: Option<Res<ButtonInput<KeyCode>>>, mut next: ResMut<NextState<GameState>>) {
    if keys.is_some_and(|k| k.just_pressed(KeyCode::KeyR)) {
        info!("Restarting level");
        next.set(GameState::Loading);
    }
}
