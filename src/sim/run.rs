//! Level progression: starting runs, level transitions, stage clear, replay

use rand::Rng;

use super::geom::Direction;
use super::stage_clear::StageClearWalk;
use super::state::{GameEvent, GamePhase, HostileTank, PlayerTank, RunState};
use super::tile::{Tile, TileMap};
use crate::cell_to_pixel;
use crate::error::{ArenaError, Result};
use crate::settings::SimParams;

/// Where authored level maps come from
pub trait LevelSource {
    /// Number of authored levels
    fn total_levels(&self) -> Result<u32>;

    /// Map for ordinal `level` (1-based)
    fn level_map(&self, level: u32) -> Result<TileMap>;
}

/// Levels held in memory, ordinal `n` at index `n - 1`
impl LevelSource for Vec<TileMap> {
    fn total_levels(&self) -> Result<u32> {
        Ok(self.len() as u32)
    }

    fn level_map(&self, level: u32) -> Result<TileMap> {
        level
            .checked_sub(1)
            .and_then(|i| self.get(i as usize))
            .cloned()
            .ok_or(ArenaError::MissingLevel(level))
    }
}

/// Fresh run at level 1 with score 0
pub fn start_run(params: SimParams, seed: u64, levels: &impl LevelSource) -> Result<RunState> {
    let mut state = RunState::new(params, seed);
    load_level(&mut state, 1, levels)?;
    Ok(state)
}

/// Move the run to `level`. Ordinals past the last authored level go to the
/// stage-clear walk instead of the store. On error the run is left untouched.
pub fn load_level(state: &mut RunState, level: u32, levels: &impl LevelSource) -> Result<()> {
    let total = levels.total_levels()?;
    if level > total {
        state.level = level;
        enter_stage_clear(state);
        return Ok(());
    }
    let map = levels.level_map(level)?;
    state.level = level;
    begin_level(state, map);
    log::info!("level {level} of {total} loaded");
    Ok(())
}

/// Advance after the last hostile fell
pub fn advance_level(state: &mut RunState, levels: &impl LevelSource) -> Result<()> {
    state.events.push(GameEvent::LevelCleared { level: state.level });
    load_level(state, state.level + 1, levels)
}

/// Install `map` and populate it: one hostile per `UnitSpawn` cell with a
/// random facing, and the player at the start position.
pub fn begin_level(state: &mut RunState, map: TileMap) {
    state.hostiles.clear();
    state.clear_transients();
    state.stage_clear = None;
    state.map = map;

    let scale = state.params.grid_scale();
    let spawns: Vec<_> = state.map.cells_of(Tile::UnitSpawn).collect();
    for cell in spawns {
        let facing = Direction::from_index(state.rng_mut().random_range(0..4));
        let id = state.next_entity_id();
        state
            .hostiles
            .push(HostileTank::new(id, cell_to_pixel(cell, scale), facing));
    }

    state.player = None;
    spawn_player(state);
    state.phase = GamePhase::Playing;
}

/// Put a fresh player tank at the start position
pub fn spawn_player(state: &mut RunState) {
    let id = state.next_entity_id();
    state.player = Some(PlayerTank::new(id, state.params.player_start()));
}

/// Every level is beaten: drop all combat and start the victory walk
pub fn enter_stage_clear(state: &mut RunState) {
    state.hostiles.clear();
    state.player = None;
    state.clear_transients();
    let (w, h) = state.params.stage_clear_grid();
    state.stage_clear = Some(StageClearWalk::new(w.max(1), h.max(1)));
    state.phase = GamePhase::StageClear;
    state.events.push(GameEvent::StageCleared);
    log::info!("stage clear with score {}", state.score);
}

/// Mark the run lost once the player tank is gone
pub fn check_game_over(state: &mut RunState) -> bool {
    if state.phase == GamePhase::Playing && state.player.is_none() {
        state.phase = GamePhase::GameOver;
        log::info!("game over on level {} with score {}", state.level, state.score);
        return true;
    }
    false
}

/// Retry the current level: respawn the player, drop projectiles and
/// explosions. Map, hostiles, score and ordinal carry over.
pub fn replay(state: &mut RunState) -> Result<()> {
    if state.phase != GamePhase::GameOver {
        return Err(ArenaError::NotGameOver);
    }
    state.clear_transients();
    spawn_player(state);
    state.phase = GamePhase::Playing;
    log::info!("replaying level {}", state.level);
    Ok(())
}
