//! Tile kinds and the row-major tile grid

use serde::{Deserialize, Serialize};

use crate::error::{ArenaError, Result};

/// Contents of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tile {
    /// Indestructible, excluded from the connectivity graph
    HardWall,
    /// Destroyed by any projectile
    SoftWall,
    #[default]
    Empty,
    /// Decorative, passable
    GreenLand,
    /// Anchor cell of a hostile tank's 2×2 footprint
    UnitSpawn,
    /// Placeholder marked by the stage-clear walk
    Dummy,
}

impl Tile {
    /// Tiles a tank cannot drive into
    pub fn blocks_movement(self) -> bool {
        matches!(self, Tile::HardWall | Tile::SoftWall)
    }

    /// Tiles that belong to the connectivity graph
    pub fn is_open(self) -> bool {
        self != Tile::HardWall
    }

    /// Tiles offered as authoring tools
    pub fn is_paintable(self) -> bool {
        !matches!(self, Tile::Dummy)
    }

    pub fn glyph(self) -> char {
        match self {
            Tile::HardWall => '#',
            Tile::SoftWall => '+',
            Tile::Empty => '.',
            Tile::GreenLand => '"',
            Tile::UnitSpawn => 'T',
            Tile::Dummy => '?',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '#' => Some(Tile::HardWall),
            '+' => Some(Tile::SoftWall),
            '.' => Some(Tile::Empty),
            '"' => Some(Tile::GreenLand),
            'T' => Some(Tile::UnitSpawn),
            '?' => Some(Tile::Dummy),
            _ => None,
        }
    }
}

/// Serialized shape, checked on the way in
#[derive(Serialize, Deserialize)]
struct TileMapRepr {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

/// Fixed-size grid of tiles, row-major, addressed as `(x, y)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TileMapRepr", into = "TileMapRepr")]
pub struct TileMap {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl TryFrom<TileMapRepr> for TileMap {
    type Error = String;

    fn try_from(repr: TileMapRepr) -> std::result::Result<Self, Self::Error> {
        if repr.width == 0 || repr.height == 0 {
            return Err(format!("tile map {}x{} has no cells", repr.width, repr.height));
        }
        if repr.tiles.len() != repr.width * repr.height {
            return Err(format!(
                "tile map {}x{} carries {} tiles",
                repr.width,
                repr.height,
                repr.tiles.len()
            ));
        }
        Ok(Self {
            width: repr.width,
            height: repr.height,
            tiles: repr.tiles,
        })
    }
}

impl From<TileMap> for TileMapRepr {
    fn from(map: TileMap) -> Self {
        Self {
            width: map.width,
            height: map.height,
            tiles: map.tiles,
        }
    }
}

impl TileMap {
    /// All-`Empty` map.
    ///
    /// # Panics
    /// If either dimension is zero.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "tile map needs at least one cell");
        Self {
            width,
            height,
            tiles: vec![Tile::Empty; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Never true; maps always have at least one cell
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Flat index of an in-bounds cell
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Cell coordinates of a flat index
    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Tile at signed coordinates; `None` outside the grid
    pub fn get(&self, x: i32, y: i32) -> Option<Tile> {
        if self.in_bounds(x, y) {
            Some(self.tiles[self.index(x as usize, y as usize)])
        } else {
            None
        }
    }

    /// Tile at a flat index
    pub fn at(&self, index: usize) -> Tile {
        self.tiles[index]
    }

    /// Unconditional write used by the simulation (wall destruction, walks).
    /// Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: i32, y: i32, tile: Tile) {
        if self.in_bounds(x, y) {
            let index = self.index(x as usize, y as usize);
            self.tiles[index] = tile;
        }
    }

    /// Authoring write. Refused when the left, upper or upper-left neighbour
    /// anchors a tank, since that tank's 2×2 footprint covers this cell.
    /// Returns whether the cell was written.
    pub fn paint(&mut self, x: i32, y: i32, tile: Tile) -> bool {
        if !self.in_bounds(x, y) || self.covered_by_unit(x, y) {
            return false;
        }
        self.set(x, y, tile);
        true
    }

    /// True if a spawn anchored up/left of `(x, y)` covers it
    pub fn covered_by_unit(&self, x: i32, y: i32) -> bool {
        [(x - 1, y), (x, y - 1), (x - 1, y - 1)]
            .into_iter()
            .any(|(nx, ny)| self.get(nx, ny) == Some(Tile::UnitSpawn))
    }

    /// Every cell with its coordinates, row by row
    pub fn cells(&self) -> impl Iterator<Item = ((usize, usize), Tile)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(|(i, &tile)| (self.coords(i), tile))
    }

    /// Coordinates of every cell holding `kind`
    pub fn cells_of(&self, kind: Tile) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells()
            .filter(move |&(_, tile)| tile == kind)
            .map(|(cell, _)| cell)
    }

    pub fn count(&self, kind: Tile) -> usize {
        self.tiles.iter().filter(|&&t| t == kind).count()
    }

    /// Replace every `from` tile with `to`
    pub fn replace_all(&mut self, from: Tile, to: Tile) {
        for tile in self.tiles.iter_mut().filter(|t| **t == from) {
            *tile = to;
        }
    }

    /// Parse the glyph grid written by [`TileMap::to_ascii`].
    /// Blank lines are skipped; all rows must have equal length.
    pub fn from_ascii(text: &str) -> Result<Self> {
        let mut rows: Vec<Vec<Tile>> = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            let mut row = Vec::with_capacity(line.len());
            for (column, glyph) in line.chars().enumerate() {
                let tile = Tile::from_glyph(glyph).ok_or_else(|| ArenaError::LevelText {
                    line: line_no + 1,
                    column: column + 1,
                    reason: format!("unknown glyph {glyph:?}"),
                })?;
                row.push(tile);
            }
            if let Some(expected) = rows.first().map(Vec::len) {
                if expected != row.len() {
                    return Err(ArenaError::LevelText {
                        line: line_no + 1,
                        column: row.len(),
                        reason: format!("row has {} cells, expected {}", row.len(), expected),
                    });
                }
            }
            rows.push(row);
        }
        let Some(width) = rows.first().map(Vec::len) else {
            return Err(ArenaError::LevelText {
                line: 0,
                column: 0,
                reason: "no rows".into(),
            });
        };
        let height = rows.len();
        Ok(Self {
            width,
            height,
            tiles: rows.into_iter().flatten().collect(),
        })
    }

    /// One line per row, one glyph per cell
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in self.tiles.chunks(self.width) {
            out.extend(row.iter().map(|t| t.glyph()));
            out.push('\n');
        }
        out
    }
}
