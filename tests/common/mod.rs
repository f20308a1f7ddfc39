//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides core ECS runtime.
//! - we then call `bevy_platformer::game::configure_headless` to install gameplay plugins.

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::state::app::StatesPlugin;
use bevy_platformer::common::state::GameState;
use bevy_platformer::common::tunables::Tunables;

pub fn app_headless() -> App {
    let mut app = App::new();

    // AssetPlugin + ScenePlugin so SceneSpawner exists.
    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        AssetPlugin::default(),
        ScenePlugin,
    ));

    // Built-in defaults and level, regardless of config files on disk.
    app.insert_resource(Tunables::default());
    bevy_platformer::game::configure_headless(&mut app);
    app.finish();
    app.cleanup();
    app
}

/// Headless app that has finished loading the built-in level.
pub fn app_in_game() -> App {
    let mut app = app_headless();
    for _ in 0..3 {
        app.update();
    }
    assert_eq!(*app.world().resource::<State<GameState>>().get(), GameState::InGame);
    app
}

pub fn entities_with<C: Component>(app: &mut App) -> Vec<Entity> {
    app.world_mut().query_filtered::<Entity, With<C>>().iter(app.world()).collect()
}
