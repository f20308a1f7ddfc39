//! Library entry point.
//!
//! `control` is the engine-independent gameplay core; `plugins` wires it into Bevy and Avian.
//! Integration tests in `tests/` are compiled as separate crates and import from here.

pub mod common;
pub mod control;
pub mod game;
pub mod plugins;
