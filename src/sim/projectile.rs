//! Projectile lifecycle: firing, cooldown, flight and expiry

use glam::IVec2;

use super::geom::{Direction, Rect};
use super::state::{Faction, GameEvent, Projectile, RunState};
use crate::settings::SimParams;

/// Spawn point for a projectile leaving `shooter` along `facing`: flush with
/// the leading edge, centered across the perpendicular axis.
pub fn muzzle_position(shooter: &Rect, facing: Direction, size: i32) -> IVec2 {
    let c = shooter.center();
    let half = size / 2;
    match facing {
        Direction::Right => IVec2::new(shooter.right() - size, c.y - half),
        Direction::Left => IVec2::new(shooter.left(), c.y - half),
        Direction::Down => IVec2::new(c.x - half, shooter.bottom() - size),
        Direction::Up => IVec2::new(c.x - half, shooter.top()),
    }
}

/// Fire from the player's tank. No-op while the cooldown is running.
/// Returns the new projectile's id.
pub fn fire_player(state: &mut RunState) -> Option<u32> {
    let params = state.params;
    let (bounds, facing) = {
        let player = state.player.as_mut()?;
        if player.cooldown != 0 {
            return None;
        }
        player.cooldown = 1;
        (player.bounds(&params), player.facing)
    };
    let id = state.next_entity_id();
    let pos = muzzle_position(&bounds, facing, params.projectile_size);
    state.player_projectiles.push(Projectile {
        id,
        faction: Faction::Player,
        facing,
        pos,
    });
    state.events.push(GameEvent::Fired {
        faction: Faction::Player,
        at: pos,
    });
    Some(id)
}

/// Fire from hostile tank `index`. No-op while its previous projectile flies.
pub fn fire_hostile(state: &mut RunState, index: usize) -> Option<u32> {
    let params = state.params;
    let tank = state.hostiles.get(index)?;
    if let Some(prev) = tank.projectile {
        if state.hostile_projectile_alive(prev) {
            return None;
        }
    }
    let (bounds, facing) = (tank.bounds(&params), tank.facing);
    let id = state.next_entity_id();
    let pos = muzzle_position(&bounds, facing, params.projectile_size);
    state.hostile_projectiles.push(Projectile {
        id,
        faction: Faction::Hostile,
        facing,
        pos,
    });
    state.hostiles[index].projectile = Some(id);
    state.events.push(GameEvent::Fired {
        faction: Faction::Hostile,
        at: pos,
    });
    Some(id)
}

/// Advance the player's fire cooldown by one tick
pub fn tick_cooldown(cooldown: &mut u32, interval: u32) {
    if *cooldown > 0 {
        *cooldown += 1;
    }
    if *cooldown > interval {
        *cooldown = 0;
    }
}

/// Move one step; false once the projectile has left the arena
pub fn advance(projectile: &mut Projectile, params: &SimParams) -> bool {
    projectile.pos += projectile.facing.delta() * params.step;
    params.arena_rect().contains_rect(&projectile.bounds(params))
}

/// Advance every projectile, dropping the ones that left the arena
pub fn advance_all(state: &mut RunState) {
    let params = &state.params;
    state.player_projectiles.retain_mut(|p| advance(p, params));
    state.hostile_projectiles.retain_mut(|p| advance(p, params));
}
