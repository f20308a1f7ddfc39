//! Feature plugins.

use bevy::prelude::*;

pub mod animation;
pub mod collectibles;
pub mod core;
pub mod enemies;
pub mod physics;
pub mod player;
pub mod world;

// Render-only
pub mod camera;
pub mod lighting;

/// Register gameplay plugins that work in headless tests.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    physics::plugin(app);
    animation::plugin(app);
    world::plugin(app);
    player::plugin(app);
    enemies::plugin(app);
    collectibles::plugin(app);
}

/// Register render-only plugins (requires DefaultPlugins / render infra).
pub fn register_render(app: &mut App) {
    lighting::plugin(app);
    camera::plugin(app);
}
