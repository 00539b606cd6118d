//! Run save: one snapshot of an in-progress playthrough
//!
//! Entities are stored as minimal records (pixel location, facing, and for
//! hostiles their outstanding projectile) and rebuilt with fresh ids on load.

use std::collections::BTreeMap;

use glam::IVec2;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Storage;
use crate::error::{ArenaError, Result};
use crate::settings::SimParams;
use crate::sim::geom::Direction;
use crate::sim::state::{
    Effect, Faction, GamePhase, HostileTank, PlayerTank, Projectile, RunState,
};
use crate::sim::tile::Tile;
use crate::{cell_to_pixel, pixel_to_cell};

const SCORE: &str = "score";
const LEVEL: &str = "level";
const MAP: &str = "map";
const LOCATION: &str = "location";
const FACING: &str = "facing";
const COOLDOWN: &str = "cooldown";
const SOFT_WALL: &str = "soft_wall";
const HARD_WALL: &str = "hard_wall";
const GREEN_LAND: &str = "green_land";
const NPC_TANK: &str = "npc_tank";
const BULLET: &str = "bullet";
/// Hostile projectiles whose owner was destroyed while they were in flight
const NPC_BULLET: &str = "npc_bullet";
const BOMB: &str = "bomb";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectileRecord {
    pub location: [i32; 2],
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostileRecord {
    pub location: [i32; 2],
    pub direction: Direction,
    pub bullet: Option<ProjectileRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectRecord {
    pub location: [i32; 2],
    pub frame: u32,
}

fn loc(pos: IVec2) -> [i32; 2] {
    pos.to_array()
}

impl From<&Projectile> for ProjectileRecord {
    fn from(p: &Projectile) -> Self {
        Self {
            location: loc(p.pos),
            direction: p.facing,
        }
    }
}

/// Wall kinds stored as location lists next to the map
const WALL_KEYS: [(&str, Tile); 3] = [
    (SOFT_WALL, Tile::SoftWall),
    (HARD_WALL, Tile::HardWall),
    (GREEN_LAND, Tile::GreenLand),
];

#[derive(Debug, Clone)]
pub struct SaveStore<S> {
    storage: S,
}

impl<S: Storage> SaveStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn exists(&self) -> Result<bool> {
        Ok(self.storage.get(LEVEL)?.is_some())
    }

    fn field<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let value = self.storage.get(key)?.unwrap_or(Value::Null);
        Ok(serde_json::from_value(value)?)
    }

    /// Overwrite the save with `state`
    pub fn save(&mut self, state: &RunState) -> Result<()> {
        let scale = state.params.grid_scale();
        let mut entries = BTreeMap::new();
        let mut put = |key: &str, value: Value| {
            entries.insert(key.to_string(), value);
        };

        put(SCORE, serde_json::to_value(state.score)?);
        put(LEVEL, serde_json::to_value(state.level)?);
        put(MAP, serde_json::to_value(&state.map)?);
        put(
            LOCATION,
            serde_json::to_value(state.player.as_ref().map(|p| loc(p.pos)))?,
        );
        put(
            FACING,
            serde_json::to_value(state.player.as_ref().map(|p| p.facing))?,
        );
        put(
            COOLDOWN,
            serde_json::to_value(state.player.as_ref().map(|p| p.cooldown))?,
        );
        for (key, kind) in WALL_KEYS {
            let cells: Vec<[i32; 2]> = state
                .map
                .cells_of(kind)
                .map(|cell| loc(cell_to_pixel(cell, scale)))
                .collect();
            put(key, serde_json::to_value(cells)?);
        }

        let hostiles: Vec<HostileRecord> = state
            .hostiles
            .iter()
            .map(|h| HostileRecord {
                location: loc(h.pos),
                direction: h.facing,
                bullet: h
                    .projectile
                    .and_then(|id| state.hostile_projectiles.iter().find(|p| p.id == id))
                    .map(ProjectileRecord::from),
            })
            .collect();
        put(NPC_TANK, serde_json::to_value(hostiles)?);

        let orphans: Vec<ProjectileRecord> = state
            .hostile_projectiles
            .iter()
            .filter(|p| !state.hostiles.iter().any(|h| h.projectile == Some(p.id)))
            .map(ProjectileRecord::from)
            .collect();
        put(NPC_BULLET, serde_json::to_value(orphans)?);

        let bullets: Vec<ProjectileRecord> = state
            .player_projectiles
            .iter()
            .map(ProjectileRecord::from)
            .collect();
        put(BULLET, serde_json::to_value(bullets)?);

        let bombs: Vec<EffectRecord> = state
            .effects
            .iter()
            .map(|e| EffectRecord {
                location: loc(e.pos),
                frame: e.frame,
            })
            .collect();
        put(BOMB, serde_json::to_value(bombs)?);

        self.storage.set_all(entries)?;
        log::info!("game saved at level {} with score {}", state.level, state.score);
        Ok(())
    }

    /// Rebuild the saved run. Hostiles resume in `Patrol`.
    pub fn load(&self, params: SimParams, seed: u64) -> Result<RunState> {
        if !self.exists()? {
            return Err(ArenaError::MissingSave);
        }
        let scale = params.grid_scale();
        let mut state = RunState::new(params, seed);
        state.score = self.field(SCORE)?;
        state.level = self.field(LEVEL)?;
        state.map = self.field(MAP)?;

        for (key, kind) in WALL_KEYS {
            let cells: Option<Vec<[i32; 2]>> = self.field(key)?;
            let Some(cells) = cells else {
                continue;
            };
            state.map.replace_all(kind, Tile::Empty);
            for [x, y] in cells {
                state
                    .map
                    .set(pixel_to_cell(x, scale), pixel_to_cell(y, scale), kind);
            }
        }

        let location: Option<[i32; 2]> = self.field(LOCATION)?;
        let facing: Option<Direction> = self.field(FACING)?;
        let cooldown: Option<u32> = self.field(COOLDOWN)?;
        if let Some(location) = location {
            let id = state.next_entity_id();
            let mut player = PlayerTank::new(id, IVec2::from_array(location));
            player.facing = facing.unwrap_or(Direction::Up);
            player.cooldown = cooldown.unwrap_or(0);
            state.player = Some(player);
        }

        let hostiles: Option<Vec<HostileRecord>> = self.field(NPC_TANK)?;
        for record in hostiles.unwrap_or_default() {
            let id = state.next_entity_id();
            let pos = IVec2::from_array(record.location);
            let mut tank = HostileTank::new(id, pos, record.direction);
            if let Some(bullet) = record.bullet {
                let pid = state.next_entity_id();
                state
                    .hostile_projectiles
                    .push(restore_projectile(pid, Faction::Hostile, &bullet));
                tank.projectile = Some(pid);
            }
            state.hostiles.push(tank);
        }

        let orphans: Option<Vec<ProjectileRecord>> = self.field(NPC_BULLET)?;
        for record in orphans.unwrap_or_default() {
            let id = state.next_entity_id();
            state
                .hostile_projectiles
                .push(restore_projectile(id, Faction::Hostile, &record));
        }

        let bullets: Option<Vec<ProjectileRecord>> = self.field(BULLET)?;
        for record in bullets.unwrap_or_default() {
            let id = state.next_entity_id();
            state
                .player_projectiles
                .push(restore_projectile(id, Faction::Player, &record));
        }

        let bombs: Option<Vec<EffectRecord>> = self.field(BOMB)?;
        state.effects = bombs
            .unwrap_or_default()
            .into_iter()
            .map(|r| Effect {
                pos: IVec2::from_array(r.location),
                frame: r.frame,
            })
            .collect();

        state.phase = if state.player.is_some() {
            GamePhase::Playing
        } else {
            GamePhase::GameOver
        };
        log::info!("game loaded at level {} with score {}", state.level, state.score);
        Ok(state)
    }
}

fn restore_projectile(id: u32, faction: Faction, record: &ProjectileRecord) -> Projectile {
    Projectile {
        id,
        faction,
        facing: record.direction,
        pos: IVec2::from_array(record.location),
    }
}
