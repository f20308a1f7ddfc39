//! Test helpers.
//!
//! `World::run_system_once` (via `RunSystemOnce`) runs a system without building a schedule.
//! Commands it queues are applied by `world.flush()` before assertions.

use avian2d::prelude::*;
use bevy::ecs::message::Messages;
use bevy::ecs::system::{IntoSystem, RunSystemOnce};
use bevy::prelude::*;

/// Run a system once on the given world, then flush deferred commands.
/// Returns the system output.
pub fn run_system_once<T, Out, Marker>(world: &mut World, system: T) -> Out
where
    T: IntoSystem<(), Out, Marker>,
{
    let out = world.run_system_once(system).expect("system run failed");
    world.flush();
    out
}

/// Write a `CollisionStart` between two bare colliders (no parent bodies).
pub fn write_collision_start(world: &mut World, collider1: Entity, collider2: Entity) {
    if world.get_resource::<Messages<CollisionStart>>().is_none() {
        world.init_resource::<Messages<CollisionStart>>();
    }
    world.write_message(CollisionStart { collider1, collider2, body1: None, body2: None });
}
