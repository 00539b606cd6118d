//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (collections keep spawn order)
//! - No rendering, audio or storage dependencies

pub mod ai;
pub mod collision;
pub mod disjoint;
pub mod geom;
pub mod motion;
pub mod projectile;
pub mod run;
pub mod stage_clear;
pub mod state;
pub mod tick;
pub mod tile;
pub mod validate;

pub use collision::{Resolution, WallReaction, resolve, wall_reaction};
pub use disjoint::DisjointSet;
pub use geom::{Direction, Mask, Rect};
pub use motion::project_next_position;
pub use run::{LevelSource, advance_level, load_level, replay, start_run};
pub use stage_clear::StageClearWalk;
pub use state::{
    Behavior, Effect, Faction, GameEvent, GamePhase, HostileTank, PlayerTank, Projectile, RunState,
};
pub use tick::{TickInput, TickOutcome, tick};
pub use tile::{Tile, TileMap};
pub use validate::MapProblem;
