//! Main simulation tick

use super::ai::{avoid_collisions, update_hostiles};
use super::collision::resolve;
use super::geom::Direction;
use super::motion::{step_blocked, try_step};
use super::projectile::{advance_all, fire_player, tick_cooldown};
use super::run::check_game_over;
use super::state::{GamePhase, RunState};

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Turn to this facing and try to move one step
    pub movement: Option<Direction>,
    /// Fire if the cooldown allows
    pub fire: bool,
    /// Demo mode - the player tank drives itself
    pub autopilot: bool,
}

/// What the caller has to do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing to do
    Continue,
    /// No hostiles left; load the next level
    LevelCleared,
    /// Player destroyed (or already dead); only replay is accepted
    GameOver,
    /// Victory walk in progress; `finished` once the grid is full
    StageClear { finished: bool },
}

/// Advance the run by one fixed step
pub fn tick(state: &mut RunState, input: &TickInput) -> TickOutcome {
    state.events.clear();

    match state.phase {
        GamePhase::GameOver => return TickOutcome::GameOver,
        GamePhase::StageClear => {
            let finished = state.stage_clear.as_mut().is_none_or(|walk| walk.step());
            state.time_ticks += 1;
            return TickOutcome::StageClear { finished };
        }
        GamePhase::Playing => {}
    }

    let input = if input.autopilot {
        autopilot_input(state)
    } else {
        input.clone()
    };

    // Player acts first
    if input.fire {
        fire_player(state);
    }
    let params = state.params;
    if let Some(player) = state.player.as_mut() {
        if let Some(dir) = input.movement {
            player.facing = dir;
            try_step(&state.map, &mut player.pos, dir, &params);
        }
        tick_cooldown(&mut player.cooldown, params.fire_interval);
    }

    avoid_collisions(state);
    update_hostiles(state);
    advance_all(state);
    resolve(state);
    advance_effects(state);
    state.time_ticks += 1;

    if state.hostiles.is_empty() {
        return TickOutcome::LevelCleared;
    }
    if check_game_over(state) {
        return TickOutcome::GameOver;
    }
    TickOutcome::Continue
}

/// Age explosions by one frame and drop finished ones
pub fn advance_effects(state: &mut RunState) {
    let frames = state.params.effect_frames;
    for effect in &mut state.effects {
        effect.frame += 1;
    }
    state.effects.retain(|e| e.frame < frames);
}

/// Steer the player: shoot along a shared axis with the nearest hostile,
/// otherwise close the horizontal gap (vertical when that is blocked). A shot
/// is only taken once the tank already faces the target.
pub fn autopilot_input(state: &RunState) -> TickInput {
    let mut input = TickInput::default();
    let Some(player) = &state.player else {
        return input;
    };
    let params = &state.params;
    let me = player.bounds(params).center();

    let Some(target) = state
        .hostiles
        .iter()
        .map(|h| h.bounds(params).center())
        .min_by_key(|c| (c.x - me.x).abs() + (c.y - me.y).abs())
    else {
        return input;
    };

    let horizontal = match target.x.cmp(&me.x) {
        std::cmp::Ordering::Less => Some(Direction::Left),
        std::cmp::Ordering::Greater => Some(Direction::Right),
        std::cmp::Ordering::Equal => None,
    };
    let vertical = match target.y.cmp(&me.y) {
        std::cmp::Ordering::Less => Some(Direction::Up),
        std::cmp::Ordering::Greater => Some(Direction::Down),
        std::cmp::Ordering::Equal => None,
    };

    match (horizontal, vertical) {
        (Some(dir), None) | (None, Some(dir)) => {
            if player.facing == dir {
                input.fire = true;
            } else {
                input.movement = Some(dir);
            }
        }
        (Some(h), Some(v)) => {
            let blocked = step_blocked(&state.map, player.pos, h, params);
            input.movement = Some(if blocked { v } else { h });
        }
        (None, None) => input.fire = true,
    }
    input
}
