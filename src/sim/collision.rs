//! Collision and combat resolution
//!
//! Runs once per tick over the collections as they stand after movement, in
//! a fixed order:
//!
//! 1. player shots vs soft walls (both destroyed)
//! 2. player shots vs hard walls (shot destroyed)
//! 3. hostile shots vs soft walls
//! 4. hostile shots vs hard walls
//! 5. hostile shots vs player shots (mutual cancel, no effect)
//! 6. player shots vs hostile tanks (both destroyed, score)
//! 7. hostile shots vs the player tank (both destroyed)
//!
//! A shot consumed by an earlier pass is gone before later passes look at it.
//! Within a pass one shot takes out every target it overlaps.

use super::geom::Rect;
use super::state::{Effect, Faction, GameEvent, Projectile, RunState};
use super::tile::{Tile, TileMap};
use crate::consts::EFFECT_OFFSET;
use crate::pixel_to_cell;

/// What a tile does to a projectile that touches it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallReaction {
    /// Wall and projectile both destroyed
    Shatter,
    /// Projectile destroyed, wall stands
    Absorb,
}

/// Projectile reaction for each tile kind
pub fn wall_reaction(tile: Tile) -> Option<WallReaction> {
    match tile {
        Tile::SoftWall => Some(WallReaction::Shatter),
        Tile::HardWall => Some(WallReaction::Absorb),
        Tile::Empty | Tile::GreenLand | Tile::UnitSpawn | Tile::Dummy => None,
    }
}

/// Summary of one resolver run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Resolution {
    pub walls_destroyed: usize,
    pub hostiles_destroyed: usize,
    pub player_destroyed: bool,
}

/// Run all seven passes
pub fn resolve(state: &mut RunState) -> Resolution {
    let mut res = Resolution::default();

    res.walls_destroyed += projectiles_vs_walls(state, Faction::Player, Tile::SoftWall);
    projectiles_vs_walls(state, Faction::Player, Tile::HardWall);
    res.walls_destroyed += projectiles_vs_walls(state, Faction::Hostile, Tile::SoftWall);
    projectiles_vs_walls(state, Faction::Hostile, Tile::HardWall);

    cancel_projectiles(state);

    res.hostiles_destroyed = shots_vs_hostiles(state);
    if res.hostiles_destroyed > 0 && state.hostiles.is_empty() {
        // Level is over; the transition resets everything pass 7 would touch
        return res;
    }

    res.player_destroyed = shots_vs_player(state);
    res
}

/// Cells of kind `kind` whose rectangles overlap `bounds`
fn overlapping_cells(map: &TileMap, bounds: &Rect, scale: i32, kind: Tile) -> Vec<(i32, i32)> {
    let x0 = pixel_to_cell(bounds.left(), scale).max(0);
    let y0 = pixel_to_cell(bounds.top(), scale).max(0);
    let x1 = pixel_to_cell(bounds.right() - 1, scale).min(map.width() as i32 - 1);
    let y1 = pixel_to_cell(bounds.bottom() - 1, scale).min(map.height() as i32 - 1);
    let mut cells = Vec::new();
    for y in y0..=y1 {
        for x in x0..=x1 {
            if map.get(x, y) == Some(kind) {
                cells.push((x, y));
            }
        }
    }
    cells
}

/// Explosion and impact event at a shot's position
fn explode(state: &mut RunState, shot: &Rect) {
    state.effects.push(Effect {
        pos: shot.top_left() - EFFECT_OFFSET,
        frame: 0,
    });
    state.events.push(GameEvent::Impact { at: shot.center() });
}

fn projectiles_mut(state: &mut RunState, faction: Faction) -> &mut Vec<Projectile> {
    match faction {
        Faction::Player => &mut state.player_projectiles,
        Faction::Hostile => &mut state.hostile_projectiles,
    }
}

/// Passes 1-4. Returns the number of wall tiles removed.
fn projectiles_vs_walls(state: &mut RunState, faction: Faction, kind: Tile) -> usize {
    let Some(reaction) = wall_reaction(kind) else {
        return 0;
    };
    let params = state.params;
    let scale = params.grid_scale();
    let shots = std::mem::take(projectiles_mut(state, faction));
    let mut survivors = Vec::with_capacity(shots.len());
    let mut removed = 0;

    for shot in shots {
        let bounds = shot.bounds(&params);
        let cells = overlapping_cells(&state.map, &bounds, scale, kind);
        if cells.is_empty() {
            survivors.push(shot);
            continue;
        }
        for (x, y) in cells {
            if reaction == WallReaction::Shatter {
                state.map.set(x, y, Tile::Empty);
                removed += 1;
            }
            explode(state, &bounds);
        }
    }

    *projectiles_mut(state, faction) = survivors;
    removed
}

/// Remove every `a` that overlaps at least one live `b`, together with all
/// the `b`s it overlaps. Returns the destroyed pairs in pass order.
fn collide_groups<A: Clone, B>(
    a: &mut Vec<A>,
    b: &mut Vec<B>,
    mut overlaps: impl FnMut(&A, &B) -> bool,
) -> Vec<(A, B)> {
    let mut pairs = Vec::new();
    let mut kept = Vec::with_capacity(a.len());
    for item in a.drain(..) {
        let mut hit = false;
        let mut i = 0;
        while i < b.len() {
            if overlaps(&item, &b[i]) {
                pairs.push((item.clone(), b.remove(i)));
                hit = true;
            } else {
                i += 1;
            }
        }
        if !hit {
            kept.push(item);
        }
    }
    *a = kept;
    pairs
}

/// Pass 5: opposing shots cancel each other
fn cancel_projectiles(state: &mut RunState) {
    let params = state.params;
    collide_groups(
        &mut state.hostile_projectiles,
        &mut state.player_projectiles,
        |h, p| h.bounds(&params).intersects(&p.bounds(&params)),
    );
}

/// Pass 6. Returns the number of hostiles destroyed.
fn shots_vs_hostiles(state: &mut RunState) -> usize {
    let params = state.params;
    let pairs = collide_groups(&mut state.player_projectiles, &mut state.hostiles, |p, h| {
        p.bounds(&params).intersects(&h.bounds(&params))
    });
    for (shot, tank) in &pairs {
        state.score += params.kill_score;
        explode(state, &shot.bounds(&params));
        state.events.push(GameEvent::HostileDestroyed { id: tank.id });
        log::debug!("hostile {} destroyed, score {}", tank.id, state.score);
    }
    pairs.len()
}

/// Pass 7. Returns whether the player was destroyed.
fn shots_vs_player(state: &mut RunState) -> bool {
    let params = state.params;
    let mut players: Vec<_> = state.player.take().into_iter().collect();
    let pairs = collide_groups(&mut state.hostile_projectiles, &mut players, |h, p| {
        h.bounds(&params).intersects(&p.bounds(&params))
    });
    state.player = players.pop();
    for (shot, _) in &pairs {
        explode(state, &shot.bounds(&params));
    }
    if pairs.is_empty() {
        return false;
    }
    state.events.push(GameEvent::PlayerDestroyed);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SimParams;
    use crate::sim::geom::Direction;
    use crate::sim::state::{HostileTank, PlayerTank};
    use glam::IVec2;

    fn blank() -> RunState {
        RunState::new(SimParams::deterministic(), 11)
    }

    fn shot(state: &mut RunState, faction: Faction, pos: IVec2) {
        let id = state.next_entity_id();
        let p = Projectile {
            id,
            faction,
            facing: Direction::Up,
            pos,
        };
        match faction {
            Faction::Player => state.player_projectiles.push(p),
            Faction::Hostile => state.hostile_projectiles.push(p),
        }
    }

    fn hostile(state: &mut RunState, pos: IVec2) {
        let id = state.next_entity_id();
        state.hostiles.push(HostileTank::new(id, pos, Direction::Down));
    }

    #[test]
    fn test_every_tile_kind_has_a_reaction_decision() {
        assert_eq!(wall_reaction(Tile::SoftWall), Some(WallReaction::Shatter));
        assert_eq!(wall_reaction(Tile::HardWall), Some(WallReaction::Absorb));
        assert_eq!(wall_reaction(Tile::GreenLand), None);
        assert_eq!(wall_reaction(Tile::UnitSpawn), None);
    }

    #[test]
    fn test_soft_wall_destroyed_with_shot() {
        let mut state = blank();
        state.map.set(5, 5, Tile::SoftWall);
        shot(&mut state, Faction::Player, IVec2::new(155, 155));
        let res = resolve(&mut state);
        assert_eq!(res.walls_destroyed, 1);
        assert_eq!(state.map.get(5, 5), Some(Tile::Empty));
        assert!(state.player_projectiles.is_empty());
        assert_eq!(state.effects.len(), 1);
        assert_eq!(state.effects[0].pos, IVec2::new(155 - 28, 155 - 28));
    }

    #[test]
    fn test_shot_straddling_two_soft_walls_takes_both() {
        let mut state = blank();
        state.map.set(5, 5, Tile::SoftWall);
        state.map.set(6, 5, Tile::SoftWall);
        shot(&mut state, Faction::Hostile, IVec2::new(175, 160));
        let res = resolve(&mut state);
        assert_eq!(res.walls_destroyed, 2);
        assert_eq!(state.map.count(Tile::SoftWall), 0);
        assert_eq!(state.effects.len(), 2);
    }

    #[test]
    fn test_hard_wall_absorbs_shot() {
        let mut state = blank();
        state.map.set(2, 2, Tile::HardWall);
        shot(&mut state, Faction::Hostile, IVec2::new(65, 65));
        resolve(&mut state);
        assert_eq!(state.map.get(2, 2), Some(Tile::HardWall));
        assert!(state.hostile_projectiles.is_empty());
    }

    #[test]
    fn test_edge_contact_is_a_miss() {
        let mut state = blank();
        state.map.set(2, 2, Tile::HardWall);
        // Shot ends exactly where the wall cell starts
        shot(&mut state, Faction::Player, IVec2::new(48, 60));
        resolve(&mut state);
        assert_eq!(state.player_projectiles.len(), 1);
    }

    #[test]
    fn test_opposing_shots_cancel_without_effect() {
        let mut state = blank();
        shot(&mut state, Faction::Player, IVec2::new(300, 300));
        shot(&mut state, Faction::Hostile, IVec2::new(305, 305));
        resolve(&mut state);
        assert!(state.player_projectiles.is_empty());
        assert!(state.hostile_projectiles.is_empty());
        assert!(state.effects.is_empty());
    }

    #[test]
    fn test_wall_hit_consumes_shot_before_cancellation() {
        let mut state = blank();
        state.map.set(10, 10, Tile::SoftWall);
        shot(&mut state, Faction::Player, IVec2::new(300, 300));
        shot(&mut state, Faction::Hostile, IVec2::new(305, 305));
        resolve(&mut state);
        // The player shot died on the wall; the hostile one flew on
        assert!(state.player_projectiles.is_empty());
        assert_eq!(state.hostile_projectiles.len(), 1);
    }

    #[test]
    fn test_kill_scores_and_keeps_others() {
        let mut state = blank();
        hostile(&mut state, IVec2::new(100, 100));
        hostile(&mut state, IVec2::new(400, 100));
        shot(&mut state, Faction::Player, IVec2::new(120, 120));
        let res = resolve(&mut state);
        assert_eq!(res.hostiles_destroyed, 1);
        assert_eq!(state.score, 10);
        assert_eq!(state.hostiles.len(), 1);
        assert_eq!(state.hostiles[0].pos, IVec2::new(400, 100));
    }

    #[test]
    fn test_last_kill_skips_player_pass() {
        let mut state = blank();
        let id = state.next_entity_id();
        state.player = Some(PlayerTank::new(id, IVec2::new(360, 720)));
        hostile(&mut state, IVec2::new(100, 100));
        shot(&mut state, Faction::Player, IVec2::new(120, 120));
        shot(&mut state, Faction::Hostile, IVec2::new(380, 730));
        let res = resolve(&mut state);
        assert!(state.hostiles.is_empty());
        assert!(!res.player_destroyed);
        assert!(state.player.is_some());
    }

    #[test]
    fn test_hostile_shot_destroys_player() {
        let mut state = blank();
        let id = state.next_entity_id();
        state.player = Some(PlayerTank::new(id, IVec2::new(360, 720)));
        hostile(&mut state, IVec2::new(100, 100));
        shot(&mut state, Faction::Hostile, IVec2::new(380, 730));
        let res = resolve(&mut state);
        assert!(res.player_destroyed);
        assert!(state.player.is_none());
        assert!(state.hostile_projectiles.is_empty());
        assert!(state.events.contains(&GameEvent::PlayerDestroyed));
    }
}
