//! Core plugin: shared resources and global settings.
//!
//! Must be registered before any plugin that reads `Tunables` while building.

use crate::common::tunables::Tunables;
use bevy::prelude::*;

pub fn plugin(app: &mut App) {
    if !app.world().contains_resource::<Tunables>() {
        app.insert_resource(Tunables::load());
    }
    let fixed_hz = app.world().resource::<Tunables>().fixed_hz;
    app.insert_resource(Time::<Fixed>::from_hz(fixed_hz));
    app.insert_resource(ClearColor(Color::srgb(0.05, 0.05, 0.07)));
}
