//! Hostile tank controller
//!
//! Each hostile runs a two-state machine. In `Patrol` it drives forward,
//! reverses at walls and the arena edge, and now and then turns or fires at
//! random. When it lines up with the player on either axis it switches to
//! `Attack`, turns to face the player and fires whenever its previous shot is
//! gone. There is no line-of-sight test: walls do not hide the player.

use rand::Rng;

use super::geom::{Direction, Mask, Rect};
use super::motion::{project_next_position, step_blocked};
use super::projectile::fire_hostile;
use super::state::{Behavior, HostileTank, RunState};
use crate::settings::SimParams;

/// Turn `tank` toward `target` if their centers share an axis.
/// Returns whether the target was found.
pub fn acquire_target(tank: &mut HostileTank, target: &Rect, params: &SimParams) -> bool {
    let me = tank.bounds(params).center();
    let them = target.center();
    if me.x == them.x {
        tank.facing = if them.y > me.y {
            Direction::Down
        } else {
            Direction::Up
        };
        return true;
    }
    if me.y == them.y {
        tank.facing = if them.x < me.x {
            Direction::Left
        } else {
            Direction::Right
        };
        return true;
    }
    false
}

/// Roll a 1-in-`odds` chance; zero odds never fire
fn roll(rng: &mut impl Rng, odds: u32) -> bool {
    odds > 0 && rng.random_range(1..=odds) == odds
}

/// One tick of behavior for hostile `index` against the player's bounds
pub fn update_hostile(state: &mut RunState, index: usize, target: &Rect) {
    let params = state.params;
    let tank = &mut state.hostiles[index];
    let found = acquire_target(tank, target, &params);

    match tank.behavior {
        Behavior::Patrol => {
            if found {
                tank.behavior = Behavior::Attack;
                log::debug!("hostile {} spotted the player, attacking", tank.id);
            }
        }
        Behavior::Attack => {
            if found {
                fire_hostile(state, index);
            } else {
                tank.behavior = Behavior::Patrol;
                log::debug!("hostile {} lost the player, patrolling", tank.id);
            }
        }
    }

    if state.hostiles[index].behavior == Behavior::Patrol {
        patrol(state, index);
    }
}

/// Forward step or reversal, then the random turn and blind shot
fn patrol(state: &mut RunState, index: usize) {
    let params = state.params;
    let tank = &mut state.hostiles[index];
    if step_blocked(&state.map, tank.pos, tank.facing, &params) {
        tank.facing = tank.facing.reversed();
    } else {
        tank.pos += tank.facing.delta() * params.step;
    }

    if roll(state.rng_mut(), params.patrol_turn_odds) {
        let tank = &mut state.hostiles[index];
        tank.facing = tank.facing.clockwise();
    }
    if roll(state.rng_mut(), params.patrol_fire_odds) {
        fire_hostile(state, index);
    }
}

/// Run every hostile's state machine. Skipped when there is no player.
pub fn update_hostiles(state: &mut RunState) {
    let Some(target) = state.player.as_ref().map(|p| p.bounds(&state.params)) else {
        return;
    };
    for index in 0..state.hostiles.len() {
        update_hostile(state, index, &target);
    }
}

/// Reverse both tanks of every pair whose next positions would overlap.
/// Contacts are found from the facings at the start of the tick, and a tank
/// in several contacts still reverses only once.
pub fn avoid_collisions(state: &mut RunState) {
    let params = &state.params;
    let masks: Vec<Mask> = Direction::ALL
        .iter()
        .map(|&d| Mask::tank(params.unit_size, d))
        .collect();
    let mask_for = |d: Direction| &masks[d as usize];

    let next: Vec<(Direction, Rect)> = state
        .hostiles
        .iter()
        .map(|h| (h.facing, project_next_position(h.pos, h.facing, params)))
        .collect();
    let mut flip = vec![false; next.len()];
    for i in 0..next.len() {
        for j in (i + 1)..next.len() {
            let ((face_a, rect_a), (face_b, rect_b)) = (&next[i], &next[j]);
            if rect_a.intersects(rect_b)
                && mask_for(*face_a).overlaps(
                    rect_a.top_left(),
                    mask_for(*face_b),
                    rect_b.top_left(),
                )
            {
                flip[i] = true;
                flip[j] = true;
            }
        }
    }
    for (tank, _) in state.hostiles.iter_mut().zip(flip).filter(|(_, f)| *f) {
        tank.facing = tank.facing.reversed();
    }
}
