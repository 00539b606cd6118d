//! Authored level maps keyed by ordinal

use super::Storage;
use crate::error::{ArenaError, Result};
use crate::sim::run::LevelSource;
use crate::sim::tile::TileMap;
use crate::sim::validate;

#[derive(Debug, Clone)]
pub struct LevelStore<S> {
    storage: S,
    /// Required map size in cells; any size is accepted when unset
    grid: Option<(usize, usize)>,
}

impl<S: Storage> LevelStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            grid: None,
        }
    }

    /// Only accept maps of `grid` cells on save
    pub fn with_grid(mut self, grid: (usize, usize)) -> Self {
        self.grid = Some(grid);
        self
    }

    /// Stored ordinals, ascending. Keys that are not positive integers are
    /// skipped.
    pub fn ordinals(&self) -> Result<Vec<u32>> {
        let mut ordinals: Vec<u32> = self
            .storage
            .keys()?
            .iter()
            .filter_map(|k| k.parse().ok())
            .filter(|&n| n > 0)
            .collect();
        ordinals.sort_unstable();
        Ok(ordinals)
    }

    /// Total authored levels
    pub fn count(&self) -> Result<u32> {
        Ok(self.ordinals()?.len() as u32)
    }

    pub fn load(&self, level: u32) -> Result<TileMap> {
        let value = self
            .storage
            .get(&level.to_string())?
            .ok_or(ArenaError::MissingLevel(level))?;
        Ok(serde_json::from_value(value)?)
    }

    /// Persist `map` as level `level` if it passes validation
    pub fn save(&mut self, level: u32, map: &TileMap) -> Result<()> {
        let found = (map.width(), map.height());
        if let Some(expected) = self.grid.filter(|&g| g != found) {
            return Err(ArenaError::GridMismatch { expected, found });
        }
        validate::check(map)?;
        self.storage
            .set(&level.to_string(), serde_json::to_value(map)?)?;
        log::info!("level {level} saved");
        Ok(())
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

impl<S: Storage> LevelSource for LevelStore<S> {
    fn total_levels(&self) -> Result<u32> {
        self.count()
    }

    fn level_map(&self, level: u32) -> Result<TileMap> {
        self.load(level)
    }
}
