//! Level map validation
//!
//! A level is playable when it is not blank and all of its non-`HardWall`
//! terrain forms one 4-connected region. Hard walls are left out of the graph
//! and may fragment freely.

use thiserror::Error;

use super::disjoint::DisjointSet;
use super::tile::{Tile, TileMap};

/// Why an authored map cannot be saved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MapProblem {
    #[error("map is empty!")]
    Empty,
    #[error("empty is not connected!")]
    Disconnected,
}

/// True iff every cell is `Empty`
pub fn is_empty(map: &TileMap) -> bool {
    map.cells().all(|(_, tile)| tile == Tile::Empty)
}

/// True iff exactly one connected region of non-`HardWall` cells exists
pub fn is_connected(map: &TileMap) -> bool {
    open_regions(map) == 1
}

/// Number of 4-connected regions of non-`HardWall` cells
pub fn open_regions(map: &TileMap) -> usize {
    let mut set = DisjointSet::new(map.len());
    for index in 0..map.len() {
        if !map.at(index).is_open() {
            continue;
        }
        let (x, y) = map.coords(index);
        let (x, y) = (x as i32, y as i32);
        for (nx, ny) in [(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)] {
            if map.get(nx, ny).is_some_and(Tile::is_open) {
                set.union(index, map.index(nx as usize, ny as usize));
            }
        }
    }
    set.roots()
        .into_iter()
        .filter(|&root| map.at(root).is_open())
        .count()
}

/// Both save-time checks, emptiness first
pub fn check(map: &TileMap) -> Result<(), MapProblem> {
    if is_empty(map) {
        return Err(MapProblem::Empty);
    }
    if !is_connected(map) {
        return Err(MapProblem::Disconnected);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_corner_wall_stays_connected() {
        let mut map = TileMap::new(13, 13);
        map.set(0, 0, Tile::HardWall);
        assert_eq!(map.count(Tile::Empty), 168);
        assert!(is_connected(&map));
        assert!(!is_empty(&map));
        assert_eq!(check(&map), Ok(()));
    }

    #[test]
    fn test_full_row_wall_disconnects() {
        let mut map = TileMap::new(13, 13);
        for x in 0..13 {
            map.set(x, 6, Tile::HardWall);
        }
        assert!(!is_connected(&map));
        assert_eq!(open_regions(&map), 2);
        assert_eq!(check(&map), Err(MapProblem::Disconnected));

        // One gap reconnects the halves
        map.set(4, 6, Tile::SoftWall);
        assert!(is_connected(&map));
    }

    #[test]
    fn test_blank_map_is_empty_but_connected() {
        let map = TileMap::new(13, 13);
        assert!(is_empty(&map));
        assert!(is_connected(&map));
        assert_eq!(check(&map), Err(MapProblem::Empty));
    }

    #[test]
    fn test_all_hard_wall_is_disconnected_not_empty() {
        let text = "###\n###\n";
        let map = TileMap::from_ascii(text).unwrap();
        assert!(!is_empty(&map));
        assert_eq!(open_regions(&map), 0);
        assert_eq!(check(&map), Err(MapProblem::Disconnected));
    }

    #[test]
    fn test_diagonal_contact_does_not_connect() {
        let map = TileMap::from_ascii(".#\n#.\n").unwrap();
        assert_eq!(open_regions(&map), 2);
    }

    #[test]
    fn test_passable_kinds_all_join_the_graph() {
        let map = TileMap::from_ascii("+\"T?.\n#####\n").unwrap();
        assert!(is_connected(&map));
    }

    proptest! {
        #[test]
        fn any_single_non_empty_cell_breaks_emptiness(
            w in 1usize..20, h in 1usize..20, x in 0usize..20, y in 0usize..20,
            kind in prop_oneof![
                Just(Tile::HardWall), Just(Tile::SoftWall), Just(Tile::GreenLand),
                Just(Tile::UnitSpawn), Just(Tile::Dummy),
            ],
        ) {
            let mut map = TileMap::new(w, h);
            prop_assert!(is_empty(&map));
            map.set((x % w) as i32, (y % h) as i32, kind);
            prop_assert!(!is_empty(&map));
        }

        #[test]
        fn open_rectangle_is_connected(
            w in 1usize..25, h in 1usize..25,
            x0 in 0usize..25, y0 in 0usize..25, rw in 1usize..25, rh in 1usize..25,
        ) {
            // Hard walls everywhere except one rectangle
            let mut map = TileMap::new(w, h);
            for y in 0..h {
                for x in 0..w {
                    map.set(x as i32, y as i32, Tile::HardWall);
                }
            }
            let (x0, y0) = (x0 % w, y0 % h);
            for y in y0..(y0 + rh).min(h) {
                for x in x0..(x0 + rw).min(w) {
                    map.set(x as i32, y as i32, Tile::Empty);
                }
            }
            prop_assert!(is_connected(&map));
        }

        #[test]
        fn wall_column_splits_grid(w in 3usize..25, h in 1usize..25, col in 1usize..24) {
            let col = 1 + col % (w - 2);
            let mut map = TileMap::new(w, h);
            for y in 0..h {
                map.set(col as i32, y as i32, Tile::HardWall);
            }
            prop_assert!(!is_connected(&map));
            prop_assert_eq!(open_regions(&map), 2);
        }
    }
}
