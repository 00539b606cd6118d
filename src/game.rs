//! Screen orchestration: main menu, playing a run, editing levels
//!
//! [`Game`] owns both stores, the current run and the editor session, and
//! routes menu actions to them. Rendering and input mapping live outside.

use crate::editor::Editor;
use crate::error::{ArenaError, Result};
use crate::persistence::{LevelStore, SaveStore, Storage};
use crate::settings::SimParams;
use crate::sim::run::{advance_level, replay, start_run};
use crate::sim::state::{GamePhase, RunState};
use crate::sim::tick::{TickInput, TickOutcome, tick};

/// Which screen is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Playing,
    Editing,
}

pub struct Game<S: Storage> {
    params: SimParams,
    levels: LevelStore<S>,
    saves: SaveStore<S>,
    screen: Screen,
    run: Option<RunState>,
    editor: Editor,
    /// Message shown on the menu after a failed action
    notice: Option<String>,
    /// Seed for the next run; bumped per run so replays of the binary repeat
    next_seed: u64,
    running: bool,
}

impl<S: Storage> Game<S> {
    pub fn new(params: SimParams, levels: LevelStore<S>, saves: SaveStore<S>, seed: u64) -> Self {
        let editor = Editor::new(&params);
        let levels = levels.with_grid(params.level_grid());
        Self {
            params,
            levels,
            saves,
            screen: Screen::Menu,
            run: None,
            editor,
            notice: None,
            next_seed: seed,
            running: true,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn run(&self) -> Option<&RunState> {
        self.run.as_ref()
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    pub fn levels(&self) -> &LevelStore<S> {
        &self.levels
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    fn take_seed(&mut self) -> u64 {
        let seed = self.next_seed;
        self.next_seed = self.next_seed.wrapping_add(1);
        seed
    }

    /// Status line for the active screen
    pub fn status(&self) -> Result<String> {
        Ok(match self.screen {
            Screen::Menu => self.notice.clone().unwrap_or_default(),
            Screen::Editing => self.editor.status(self.levels.count()?),
            Screen::Playing => match &self.run {
                Some(run) => format!("Level: {}", run.level),
                None => String::new(),
            },
        })
    }

    /// Level 1, score 0
    pub fn new_game(&mut self) -> Result<()> {
        let seed = self.take_seed();
        self.run = Some(start_run(self.params, seed, &self.levels)?);
        self.screen = Screen::Playing;
        self.notice = None;
        log::info!("new game started");
        Ok(())
    }

    /// Resume the saved run. Without a save the menu shows a notice and
    /// nothing else changes.
    pub fn load_game(&mut self) -> Result<()> {
        let seed = self.take_seed();
        match self.saves.load(self.params, seed) {
            Ok(run) => {
                self.run = Some(run);
                self.screen = Screen::Playing;
                self.notice = None;
                Ok(())
            }
            Err(ArenaError::MissingSave) => {
                self.notice = Some(ArenaError::MissingSave.to_string());
                log::warn!("load requested but no save exists");
                Err(ArenaError::MissingSave)
            }
            Err(e) => Err(e),
        }
    }

    /// Persist the run and return to the menu
    pub fn save_game(&mut self) -> Result<()> {
        let run = self
            .run
            .as_ref()
            .filter(|r| r.phase == GamePhase::Playing)
            .ok_or(ArenaError::NotPlaying)?;
        self.saves.save(run)?;
        self.back_to_menu();
        Ok(())
    }

    /// Drop the run (or editing session) and show the menu
    pub fn back_to_menu(&mut self) {
        self.run = None;
        self.editor.discard();
        self.screen = Screen::Menu;
    }

    /// One simulation step. Level transitions are applied here.
    pub fn step(&mut self, input: &TickInput) -> Result<TickOutcome> {
        let run = self.run.as_mut().ok_or(ArenaError::NotPlaying)?;
        let outcome = tick(run, input);
        if outcome == TickOutcome::LevelCleared {
            advance_level(run, &self.levels)?;
        }
        Ok(outcome)
    }

    /// Retry the current level after game over
    pub fn replay(&mut self) -> Result<()> {
        let run = self.run.as_mut().ok_or(ArenaError::NotPlaying)?;
        replay(run)
    }

    pub fn open_editor(&mut self) {
        self.run = None;
        self.editor.discard();
        self.screen = Screen::Editing;
    }

    /// Start a new level numbered after the stored ones
    pub fn new_level(&mut self) -> Result<()> {
        let total = self.levels.count()?;
        self.editor.new_level(total);
        Ok(())
    }

    pub fn edit_level(&mut self) -> Result<()> {
        self.editor.edit_existing(&self.levels)
    }

    pub fn browse_next(&mut self) -> Result<()> {
        let total = self.levels.count()?;
        self.editor.browse_next(total);
        Ok(())
    }

    pub fn save_level(&mut self) -> Result<u32> {
        self.editor.save(&mut self.levels)
    }

    pub fn quit(&mut self) {
        self.running = false;
    }
}
