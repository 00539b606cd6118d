//! Level authoring session
//!
//! The editor is either browsing the stored levels or editing one map. While
//! editing, the map is re-validated on every status query so the author sees
//! whether it can be saved.

use crate::error::{ArenaError, Result};
use crate::persistence::{LevelStore, Storage};
use crate::settings::SimParams;
use crate::sim::tile::{Tile, TileMap};
use crate::sim::validate;

/// Map currently being edited
#[derive(Debug, Clone)]
struct Draft {
    level: u32,
    map: TileMap,
}

#[derive(Debug, Clone)]
pub struct Editor {
    grid_scale: i32,
    grid: (usize, usize),
    /// Pixel band along the right and bottom edges where painting is ignored
    limit: (i32, i32),
    /// Ordinal offered by the browse buttons
    browse: u32,
    draft: Option<Draft>,
    tool: Option<Tile>,
    drawing: bool,
}

impl Editor {
    pub fn new(params: &SimParams) -> Self {
        let scale = params.grid_scale();
        Self {
            grid_scale: scale,
            grid: params.level_grid(),
            limit: (params.arena_width - scale, params.arena_height - scale),
            browse: 1,
            draft: None,
            tool: None,
            drawing: false,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.draft.is_some()
    }

    pub fn browsing(&self) -> u32 {
        self.browse
    }

    pub fn editing_level(&self) -> Option<u32> {
        self.draft.as_ref().map(|d| d.level)
    }

    pub fn map(&self) -> Option<&TileMap> {
        self.draft.as_ref().map(|d| &d.map)
    }

    pub fn tool(&self) -> Option<Tile> {
        self.tool
    }

    /// Status line for the given number of stored levels
    pub fn status(&self, total: u32) -> String {
        match &self.draft {
            None if total == 0 => "no level create one!".to_string(),
            None => format!("total {total} level"),
            Some(draft) => match validate::check(&draft.map) {
                Ok(()) => format!("editing level {}", draft.level),
                Err(problem) => problem.to_string(),
            },
        }
    }

    pub fn browse_prev(&mut self) {
        if self.browse > 1 {
            self.browse -= 1;
        }
    }

    pub fn browse_next(&mut self, total: u32) {
        if self.browse < total {
            self.browse += 1;
        }
    }

    /// Open the browsed level for editing
    pub fn edit_existing<S: Storage>(&mut self, store: &LevelStore<S>) -> Result<()> {
        let level = self.browse;
        let map = store.load(level)?;
        self.draft = Some(Draft { level, map });
        log::info!("editing level {level}");
        Ok(())
    }

    /// Start a blank map that will be saved as level `total + 1`
    pub fn new_level(&mut self, total: u32) {
        let (w, h) = self.grid;
        self.draft = Some(Draft {
            level: total + 1,
            map: TileMap::new(w.max(1), h.max(1)),
        });
        self.tool = None;
        self.drawing = false;
    }

    /// Pick the tile painted by subsequent strokes
    pub fn select_tool(&mut self, tile: Tile) -> bool {
        if !tile.is_paintable() {
            return false;
        }
        self.tool = Some(tile);
        true
    }

    /// Paint one cell with the current tool
    pub fn paint_cell(&mut self, x: i32, y: i32) -> bool {
        let (Some(tool), Some(draft)) = (self.tool, self.draft.as_mut()) else {
            return false;
        };
        draft.map.paint(x, y, tool)
    }

    /// Paint the cell nearest to a pixel. The last row and column band of
    /// the arena is ignored.
    pub fn paint_pixel(&mut self, px: i32, py: i32) -> bool {
        if px < 0 || py < 0 || px >= self.limit.0 || py >= self.limit.1 {
            return false;
        }
        let half = self.grid_scale / 2;
        let x = (px + half) / self.grid_scale;
        let y = (py + half) / self.grid_scale;
        self.paint_cell(x, y)
    }

    /// Begin a stroke
    pub fn press(&mut self, px: i32, py: i32) -> bool {
        if self.tool.is_none() || self.draft.is_none() {
            return false;
        }
        self.drawing = true;
        self.paint_pixel(px, py)
    }

    /// Continue a stroke; ignored unless a button is held
    pub fn drag(&mut self, px: i32, py: i32) -> bool {
        self.drawing && self.paint_pixel(px, py)
    }

    pub fn release(&mut self) {
        self.drawing = false;
    }

    /// Validate and store the draft. On success the editor goes back to
    /// browsing with the saved level selected; on failure the draft stays.
    pub fn save<S: Storage>(&mut self, store: &mut LevelStore<S>) -> Result<u32> {
        let draft = self.draft.as_ref().ok_or(ArenaError::NotEditing)?;
        store.save(draft.level, &draft.map)?;
        let level = draft.level;
        self.browse = level;
        self.draft = None;
        self.drawing = false;
        Ok(level)
    }

    /// Leave editing without saving
    pub fn discard(&mut self) {
        self.draft = None;
        self.tool = None;
        self.drawing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;
    use crate::sim::validate::MapProblem;

    fn editor() -> Editor {
        Editor::new(&SimParams::default())
    }

    #[test]
    fn test_status_while_browsing() {
        let ed = editor();
        assert_eq!(ed.status(0), "no level create one!");
        assert_eq!(ed.status(3), "total 3 level");
    }

    #[test]
    fn test_new_level_live_status() {
        let mut ed = editor();
        ed.new_level(2);
        assert_eq!(ed.editing_level(), Some(3));
        assert_eq!(ed.map().unwrap().width(), 26);
        assert_eq!(ed.status(2), "map is empty!");

        // No tool yet
        assert!(!ed.paint_cell(0, 0));
        ed.select_tool(Tile::SoftWall);
        assert!(ed.paint_cell(0, 0));
        assert_eq!(ed.status(2), "editing level 3");

        ed.select_tool(Tile::HardWall);
        for x in 0..26 {
            ed.paint_cell(x, 5);
        }
        assert_eq!(ed.status(2), "empty is not connected!");
    }

    #[test]
    fn test_dummy_is_not_a_tool() {
        let mut ed = editor();
        assert!(!ed.select_tool(Tile::Dummy));
        assert_eq!(ed.tool(), None);
    }

    #[test]
    fn test_pixel_painting_rounds_to_nearest_cell() {
        let mut ed = editor();
        ed.new_level(0);
        ed.select_tool(Tile::GreenLand);
        assert!(ed.paint_pixel(44, 46));
        assert_eq!(ed.map().unwrap().get(1, 2), Some(Tile::GreenLand));
        // Last band is off limits
        assert!(!ed.paint_pixel(750, 10));
        assert!(!ed.paint_pixel(10, 779));
        assert!(ed.paint_pixel(749, 749));
        assert_eq!(ed.map().unwrap().get(25, 25), Some(Tile::GreenLand));
    }

    #[test]
    fn test_spawn_footprint_blocks_painting() {
        let mut ed = editor();
        ed.new_level(0);
        ed.select_tool(Tile::UnitSpawn);
        assert!(ed.paint_cell(4, 4));
        ed.select_tool(Tile::HardWall);
        assert!(!ed.paint_cell(5, 4));
        assert!(!ed.paint_cell(4, 5));
        assert!(!ed.paint_cell(5, 5));
        assert!(ed.paint_cell(3, 4));
        assert!(ed.paint_cell(6, 4));
    }

    #[test]
    fn test_drag_only_paints_while_pressed() {
        let mut ed = editor();
        ed.new_level(0);
        ed.select_tool(Tile::SoftWall);
        assert!(!ed.drag(100, 100));
        assert!(ed.press(100, 100));
        assert!(ed.drag(130, 100));
        ed.release();
        assert!(!ed.drag(160, 100));
        assert_eq!(ed.map().unwrap().count(Tile::SoftWall), 2);
    }

    #[test]
    fn test_save_validates_then_returns_to_browsing() {
        let mut store = LevelStore::new(MemoryStorage::new());
        let mut ed = editor();
        ed.new_level(store.count().unwrap());

        let err = ed.save(&mut store).unwrap_err();
        assert!(matches!(err, ArenaError::InvalidMap(MapProblem::Empty)));
        assert!(ed.is_editing());

        ed.select_tool(Tile::UnitSpawn);
        ed.paint_cell(10, 10);
        assert_eq!(ed.save(&mut store).unwrap(), 1);
        assert!(!ed.is_editing());
        assert_eq!(ed.browsing(), 1);
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_browse_and_edit_existing() {
        let mut store = LevelStore::new(MemoryStorage::new());
        for n in 1..=3 {
            let mut map = TileMap::new(26, 26);
            map.set(n, n, Tile::UnitSpawn);
            store.save(n as u32, &map).unwrap();
        }
        let mut ed = editor();
        ed.browse_prev();
        assert_eq!(ed.browsing(), 1);
        ed.browse_next(3);
        ed.browse_next(3);
        ed.browse_next(3);
        assert_eq!(ed.browsing(), 3);

        ed.edit_existing(&store).unwrap();
        assert_eq!(ed.editing_level(), Some(3));
        assert_eq!(ed.map().unwrap().get(3, 3), Some(Tile::UnitSpawn));
        ed.discard();
        assert!(!ed.is_editing());
    }
}
