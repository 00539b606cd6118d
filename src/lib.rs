//! Tank Arena - A tile-based top-down tank combat game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tile maps, hostile AI, projectiles, collisions, run state)
//! - `persistence`: Keyed JSON stores for authored levels and the run save
//! - `editor`: Level authoring session with live validity feedback
//! - `game`: Screen orchestration (menu, playing, editing)
//! - `settings`: Data-driven simulation parameters

pub mod editor;
pub mod error;
pub mod game;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use error::{ArenaError, Result};
pub use game::{Game, Screen};
pub use settings::SimParams;

use glam::IVec2;

/// Game configuration constants (defaults for [`SimParams`])
pub mod consts {
    /// Fixed simulation rate
    pub const TICKS_PER_SECOND: u32 = 10;

    /// Arena dimensions in pixels
    pub const ARENA_WIDTH: i32 = 780;
    pub const ARENA_HEIGHT: i32 = 780;

    /// Tank sprite edge; the tile grid is half of this
    pub const UNIT_SIZE: i32 = 60;
    /// Pixels moved per tick by tanks and projectiles
    pub const STEP: i32 = 10;

    /// Projectile sprite edge
    pub const PROJECTILE_SIZE: i32 = 12;
    /// Ticks the player must wait between shots
    pub const FIRE_INTERVAL: u32 = 5;
    /// Score awarded per destroyed hostile
    pub const KILL_SCORE: u64 = 10;

    /// 1-in-N chance per patrol tick to turn clockwise
    pub const PATROL_TURN_ODDS: u32 = 10;
    /// 1-in-N chance per patrol tick to fire blindly
    pub const PATROL_FIRE_ODDS: u32 = 15;

    /// Explosion animation length
    pub const EFFECT_FRAMES: u32 = 15;
    /// Explosion sprite is drawn this far up-left of the impact
    pub const EFFECT_OFFSET: i32 = 28;
}

/// Convert a pixel coordinate to a tile index for the given grid scale
#[inline]
pub fn pixel_to_cell(pixel: i32, grid_scale: i32) -> i32 {
    pixel.div_euclid(grid_scale)
}

/// Top-left pixel of a tile cell
#[inline]
pub fn cell_to_pixel(cell: (usize, usize), grid_scale: i32) -> IVec2 {
    IVec2::new(cell.0 as i32 * grid_scale, cell.1 as i32 * grid_scale)
}
