//! Global state machine.
//!
//! `Loading` parses the level layout, `InGame` owns every level entity. Leaving `InGame`
//! tears the level down (`DespawnOnExit`), so a restart is `InGame -> Loading -> InGame`.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    InGame,
}
