//! Tunable gameplay constants.
//!
//! Defaults are compiled in. `Tunables::load` overlays a TOML file on top of them, so a file
//! only needs the keys it changes.

use std::path::Path;

use bevy::prelude::*;
use serde::Deserialize;

use crate::control::tuning::{EnemyTuning, PlayerTuning, GRAVITY};

#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Tunables {
    pub pixels_per_meter: f32,
    /// Downward acceleration applied by the physics engine.
    pub gravity: f32,
    pub fixed_hz: f64,
    pub player: PlayerTuning,
    pub enemy: EnemyTuning,
    /// Level layout file; the built-in level is used when unset.
    pub level_path: Option<String>,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            pixels_per_meter: 32.0,
            gravity: GRAVITY,
            fixed_hz: 60.0,
            player: PlayerTuning::default(),
            enemy: EnemyTuning::default(),
            level_path: None,
        }
    }
}

impl Tunables {
    pub const ENV_VAR: &'static str = "PLATFORMER_TUNABLES";
    pub const DEFAULT_PATH: &'static str = "config/tunables.toml";

    /// Load from `$PLATFORMER_TUNABLES` or `config/tunables.toml`.
    pub fn load() -> Self {
        let path = std::env::var(Self::ENV_VAR).unwrap_or_else(|_| Self::DEFAULT_PATH.to_string());
        Self::load_from(Path::new(&path))
    }

    /// Missing file: defaults. Malformed file: defaults plus a warning.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            debug!("No tunables at {}, using defaults", path.display());
            return Self::default();
        };
        match Self::from_toml(&content) {
            Ok(tunables) => {
                info!("Loaded tunables from {}", path.display());
                tunables
            }
            Err(e) => {
                warn!("Failed to parse {}: {e}, using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
