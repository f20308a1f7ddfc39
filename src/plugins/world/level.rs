//! ASCII level layouts.
//!
//! One character per tile, first line is the top row:
//!
//! ```text
//! #  ground        P  player spawn    E  enemy spawn
//! |  patrol edge   ^  spikes          o  coin
//! .  empty (space works too)
//! ```
//!
//! Positions are tile centres in world units with the grid centred on the origin.

use std::path::Path;

use bevy::prelude::*;
use thiserror::Error;

/// Edge length of one tile in world units.
pub const TILE: f32 = 32.0;

pub const DEFAULT_LEVEL: &str = "\
#......................................#
#......................................#
#......................................#
#......................................#
#..........................o.o.o.......#
#.........................########.....#
#........|.....E.....|.................#
#.........###########..................#
#..o.o.................................#
#.P.........^^^.........|....E.....|...#
########################################
########################################
";

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("unknown tile {ch:?} at line {line}, column {column}")]
    UnknownTile { ch: char, line: usize, column: usize },
    #[error("level has no player spawn")]
    MissingPlayerSpawn,
    #[error("level has {0} player spawns, expected exactly one")]
    MultiplePlayerSpawns(usize),
    #[error("level layout is empty")]
    Empty,
    #[error("failed to read level file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct LevelLayout {
    pub width: usize,
    pub height: usize,
    /// Horizontal runs of ground tiles, merged so bodies slide across seams.
    pub ground: Vec<Rect>,
    pub player_spawn: Vec2,
    pub enemy_spawns: Vec<Vec2>,
    pub boundaries: Vec<Vec2>,
    pub hazards: Vec<Vec2>,
    pub coins: Vec<Vec2>,
}

impl LevelLayout {
    pub fn parse(text: &str) -> Result<Self, LevelError> {
        let mut rows: Vec<&str> = text.lines().map(|l| l.trim_end_matches('\r')).collect();
        while rows.last().is_some_and(|r| r.trim().is_empty()) {
            rows.pop();
        }
        let first = rows.iter().position(|r| !r.trim().is_empty()).ok_or(LevelError::Empty)?;
        let rows = &rows[first..];

        let mut layout = LevelLayout {
            width: rows.iter().map(|r| r.chars().count()).max().unwrap_or(0),
            height: rows.len(),
            ..default()
        };

        let mut players = Vec::new();
        for (row, line) in rows.iter().enumerate() {
            let mut run_start: Option<usize> = None;
            for (column, ch) in line.chars().enumerate() {
                let center = layout.cell_center(column, row);
                match ch {
                    '#' => {
                        run_start.get_or_insert(column);
                        continue;
                    }
                    '.' | ' ' => {}
                    'P' => players.push(center),
                    'E' => layout.enemy_spawns.push(center),
                    '|' => layout.boundaries.push(center),
                    '^' => layout.hazards.push(center),
                    'o' => layout.coins.push(center),
                    _ => return Err(LevelError::UnknownTile { ch, line: row + 1, column: column + 1 }),
                }
                if let Some(start) = run_start.take() {
                    layout.push_ground_run(row, start, column);
                }
            }
            if let Some(start) = run_start {
                layout.push_ground_run(row, start, line.chars().count());
            }
        }

        layout.player_spawn = match players.as_slice() {
            [] => return Err(LevelError::MissingPlayerSpawn),
            [spawn] => *spawn,
            many => return Err(LevelError::MultiplePlayerSpawns(many.len())),
        };
        Ok(layout)
    }

    pub fn load(path: &Path) -> Result<Self, LevelError> {
        Self::parse(&std::fs::read_to_string(path)?)
    }

    pub fn cell_center(&self, column: usize, row: usize) -> Vec2 {
        Vec2::new(
            (column as f32 + 0.5 - self.width as f32 * 0.5) * TILE,
            (self.height as f32 * 0.5 - row as f32 - 0.5) * TILE,
        )
    }

    /// Ground tiles `start..end` of `row`.
    fn push_ground_run(&mut self, row: usize, start: usize, end: usize) {
        let half = Vec2::splat(TILE * 0.5);
        let min = self.cell_center(start, row) - half;
        let max = self.cell_center(end - 1, row) + half;
        self.ground.push(Rect::from_corners(min, max));
    }
}
