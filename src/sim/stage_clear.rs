//! Victory walk shown once every authored level is beaten
//!
//! A tank marches over a coarse grid (one cell per tank), marking each cell it
//! visits. It keeps going straight while the next cell is unvisited and turns
//! clockwise otherwise, which spirals inward until the grid is full.

use super::geom::Direction;
use super::tile::{Tile, TileMap};

#[derive(Debug, Clone)]
pub struct StageClearWalk {
    /// Visited cells are `Dummy`, the rest `Empty`
    pub map: TileMap,
    pub pos: (usize, usize),
    pub direction: Direction,
    /// Every placed tank in visit order, with the facing it was placed with
    pub trail: Vec<((usize, usize), Direction)>,
}

impl StageClearWalk {
    /// Start at the top-left cell heading right
    pub fn new(width: usize, height: usize) -> Self {
        let mut map = TileMap::new(width, height);
        map.set(0, 0, Tile::Dummy);
        Self {
            map,
            pos: (0, 0),
            direction: Direction::Right,
            trail: vec![((0, 0), Direction::Right)],
        }
    }

    pub fn is_full(&self) -> bool {
        self.map.count(Tile::Empty) == 0
    }

    fn open_neighbor(&self, direction: Direction) -> Option<(usize, usize)> {
        let d = direction.delta();
        let (x, y) = (self.pos.0 as i32 + d.x, self.pos.1 as i32 + d.y);
        (self.map.get(x, y) == Some(Tile::Empty)).then(|| (x as usize, y as usize))
    }

    /// Place the next tank. Returns true once the grid is full.
    pub fn step(&mut self) -> bool {
        if self.is_full() {
            return true;
        }
        let mut direction = self.direction;
        for _ in 0..Direction::ALL.len() {
            if let Some(next) = self.open_neighbor(direction) {
                self.pos = next;
                self.direction = direction;
                self.map.set(next.0 as i32, next.1 as i32, Tile::Dummy);
                self.trail.push((next, direction));
                return self.is_full();
            }
            direction = direction.clockwise();
        }
        // Boxed in with cells left elsewhere; nothing more to visit
        log::warn!("stage clear walk stuck at {:?}", self.pos);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_walk_starts_marked() {
        let walk = StageClearWalk::new(13, 13);
        assert_eq!(walk.map.get(0, 0), Some(Tile::Dummy));
        assert_eq!(walk.trail.len(), 1);
        assert!(!walk.is_full());
    }

    #[test]
    fn test_walk_turns_clockwise_at_edge() {
        let mut walk = StageClearWalk::new(3, 3);
        walk.step();
        walk.step();
        assert_eq!(walk.pos, (2, 0));
        walk.step();
        assert_eq!(walk.pos, (2, 1));
        assert_eq!(walk.direction, Direction::Down);
    }

    #[test]
    fn test_walk_fills_grid_spiral() {
        let mut walk = StageClearWalk::new(13, 13);
        let mut steps = 0;
        while !walk.step() {
            steps += 1;
            assert!(steps < 1000);
        }
        assert!(walk.is_full());
        assert_eq!(walk.trail.len(), 169);
        let visited: HashSet<_> = walk.trail.iter().map(|(p, _)| *p).collect();
        assert_eq!(visited.len(), 169);
        for pair in walk.trail.windows(2) {
            let (a, b) = (pair[0].0, pair[1].0);
            let dist = a.0.abs_diff(b.0) + a.1.abs_diff(b.1);
            assert_eq!(dist, 1);
        }
        // Spiral ends in the middle
        assert_eq!(walk.pos, (6, 6));
        assert!(walk.step());
    }
}
