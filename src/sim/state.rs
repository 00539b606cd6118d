//! Run state and core simulation types
//!
//! Everything a tick reads or writes lives in [`RunState`]. Entities reference
//! each other only by id; the collections own them.

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geom::{Direction, Rect};
use super::stage_clear::StageClearWalk;
use super::tile::TileMap;
use crate::settings::SimParams;

/// Which side fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Hostile,
}

/// Hostile tank behavior state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Behavior {
    /// Wander, bounce off walls, occasionally turn or fire blindly
    #[default]
    Patrol,
    /// Hold position facing the aligned player and keep firing
    Attack,
}

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active combat
    Playing,
    /// Player destroyed; waiting for replay
    GameOver,
    /// Every authored level beaten; victory walk plays out
    StageClear,
}

/// The player's tank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerTank {
    pub id: u32,
    pub pos: IVec2,
    pub facing: Direction,
    /// 0 = ready to fire; otherwise counts up to the fire interval
    pub cooldown: u32,
}

impl PlayerTank {
    pub fn new(id: u32, pos: IVec2) -> Self {
        Self {
            id,
            pos,
            facing: Direction::Up,
            cooldown: 0,
        }
    }

    pub fn bounds(&self, params: &SimParams) -> Rect {
        Rect::square(self.pos, params.unit_size)
    }
}

/// An autonomous hostile tank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostileTank {
    pub id: u32,
    pub pos: IVec2,
    pub facing: Direction,
    pub behavior: Behavior,
    /// Id of this tank's outstanding projectile (at most one)
    pub projectile: Option<u32>,
}

impl HostileTank {
    pub fn new(id: u32, pos: IVec2, facing: Direction) -> Self {
        Self {
            id,
            pos,
            facing,
            behavior: Behavior::Patrol,
            projectile: None,
        }
    }

    pub fn bounds(&self, params: &SimParams) -> Rect {
        Rect::square(self.pos, params.unit_size)
    }
}

/// A projectile in flight. Facing is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projectile {
    pub id: u32,
    pub faction: Faction,
    pub facing: Direction,
    pub pos: IVec2,
}

impl Projectile {
    pub fn bounds(&self, params: &SimParams) -> Rect {
        Rect::square(self.pos, params.projectile_size)
    }
}

/// Explosion animation at an impact site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Effect {
    /// Top-left of the explosion sprite
    pub pos: IVec2,
    /// Frames already shown
    pub frame: u32,
}

/// Things the presentation layer may want to react to (sound, shake)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Fired { faction: Faction, at: IVec2 },
    Impact { at: IVec2 },
    HostileDestroyed { id: u32 },
    PlayerDestroyed,
    LevelCleared { level: u32 },
    StageCleared,
}

/// Complete state of a playthrough
#[derive(Debug, Clone)]
pub struct RunState {
    /// Geometry and balance in effect for this run
    pub params: SimParams,
    /// Current level ordinal (1-based)
    pub level: u32,
    pub score: u64,
    pub phase: GamePhase,
    /// Live terrain; destroyed soft walls revert to `Empty` here
    pub map: TileMap,
    pub player: Option<PlayerTank>,
    /// Hostile tanks (ascending id)
    pub hostiles: Vec<HostileTank>,
    pub player_projectiles: Vec<Projectile>,
    pub hostile_projectiles: Vec<Projectile>,
    pub effects: Vec<Effect>,
    /// Present only in [`GamePhase::StageClear`]
    pub stage_clear: Option<StageClearWalk>,
    /// Events produced by the last tick
    pub events: Vec<GameEvent>,
    /// Simulation tick counter
    pub time_ticks: u64,
    rng: Pcg32,
    next_id: u32,
}

impl RunState {
    /// Blank run at level 1 with an empty level-sized map and no entities
    pub fn new(params: SimParams, seed: u64) -> Self {
        let (w, h) = params.level_grid();
        Self {
            map: TileMap::new(w.max(1), h.max(1)),
            params,
            level: 1,
            score: 0,
            phase: GamePhase::Playing,
            player: None,
            hostiles: Vec::new(),
            player_projectiles: Vec::new(),
            hostile_projectiles: Vec::new(),
            effects: Vec::new(),
            stage_clear: None,
            events: Vec::new(),
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// True while `id` names a hostile projectile still in flight
    pub fn hostile_projectile_alive(&self, id: u32) -> bool {
        self.hostile_projectiles.iter().any(|p| p.id == id)
    }

    /// Drop every projectile and explosion
    pub fn clear_transients(&mut self) {
        self.player_projectiles.clear();
        self.hostile_projectiles.clear();
        self.effects.clear();
    }
}
