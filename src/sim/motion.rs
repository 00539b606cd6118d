//! Tank movement against the tile grid

use glam::IVec2;

use super::geom::{Direction, Rect};
use super::tile::TileMap;
use crate::pixel_to_cell;
use crate::settings::SimParams;

/// Bounds a tank at `pos` would occupy after one step along `facing`
pub fn project_next_position(pos: IVec2, facing: Direction, params: &SimParams) -> Rect {
    Rect::square(pos + facing.delta() * params.step, params.unit_size)
}

/// Three pixels on the leading edge of `next`: both corners and the middle
pub fn probe_points(next: &Rect, facing: Direction) -> [IVec2; 3] {
    let c = next.center();
    match facing {
        Direction::Right => {
            let x = next.right() - 1;
            [
                IVec2::new(x, next.top()),
                IVec2::new(x, c.y),
                IVec2::new(x, next.bottom() - 1),
            ]
        }
        Direction::Down => {
            let y = next.bottom() - 1;
            [
                IVec2::new(next.left() + 1, y),
                IVec2::new(c.x, y),
                IVec2::new(next.right() - 1, y),
            ]
        }
        Direction::Left => {
            let x = next.left();
            [
                IVec2::new(x, next.top()),
                IVec2::new(x, c.y),
                IVec2::new(x, next.bottom() - 1),
            ]
        }
        Direction::Up => {
            let y = next.top();
            [
                IVec2::new(next.left() + 1, y),
                IVec2::new(c.x, y),
                IVec2::new(next.right() - 1, y),
            ]
        }
    }
}

/// True if a step along `facing` would hit a wall or leave the arena
pub fn step_blocked(map: &TileMap, pos: IVec2, facing: Direction, params: &SimParams) -> bool {
    let next = project_next_position(pos, facing, params);
    if !params.arena_rect().contains_rect(&next) {
        return true;
    }
    let scale = params.grid_scale();
    probe_points(&next, facing).iter().any(|p| {
        map.get(pixel_to_cell(p.x, scale), pixel_to_cell(p.y, scale))
            .is_some_and(|tile| tile.blocks_movement())
    })
}

/// Step along `facing` unless blocked; returns whether the tank moved
pub fn try_step(map: &TileMap, pos: &mut IVec2, facing: Direction, params: &SimParams) -> bool {
    if step_blocked(map, *pos, facing, params) {
        return false;
    }
    *pos += facing.delta() * params.step;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tile::Tile;

    fn params() -> SimParams {
        SimParams::default()
    }

    #[test]
    fn test_projection_is_pure() {
        let pos = IVec2::new(100, 100);
        let next = project_next_position(pos, Direction::Left, &params());
        assert_eq!(next, Rect::new(90, 100, 60, 60));
    }

    #[test]
    fn test_probes_on_leading_edge() {
        let next = Rect::new(0, 0, 60, 60);
        let probes = probe_points(&next, Direction::Right);
        assert!(probes.iter().all(|p| p.x == 59));
        let probes = probe_points(&next, Direction::Up);
        assert!(probes.iter().all(|p| p.y == 0));
        assert_eq!(probes[1], IVec2::new(30, 0));
    }

    #[test]
    fn test_arena_edge_blocks() {
        let map = TileMap::new(26, 26);
        let p = params();
        assert!(step_blocked(&map, IVec2::new(0, 300), Direction::Left, &p));
        assert!(step_blocked(&map, IVec2::new(720, 300), Direction::Right, &p));
        assert!(!step_blocked(&map, IVec2::new(710, 300), Direction::Right, &p));
    }

    #[test]
    fn test_walls_block_but_greenland_does_not() {
        let mut map = TileMap::new(26, 26);
        // Tank at (60, 60) covers cells 2..4; cell (4, 2) is just to its right
        map.set(4, 2, Tile::SoftWall);
        let p = params();
        let mut pos = IVec2::new(60, 60);
        assert!(!try_step(&map, &mut pos, Direction::Right, &p));
        assert_eq!(pos, IVec2::new(60, 60));

        map.set(4, 2, Tile::GreenLand);
        assert!(try_step(&map, &mut pos, Direction::Right, &p));
        assert_eq!(pos, IVec2::new(70, 60));
    }

    #[test]
    fn test_wall_under_lower_corner_blocks_down() {
        let mut map = TileMap::new(26, 26);
        map.set(3, 4, Tile::HardWall);
        let p = params();
        assert!(step_blocked(&map, IVec2::new(60, 60), Direction::Down, &p));
        assert!(!step_blocked(&map, IVec2::new(60, 60), Direction::Up, &p));
    }
}
