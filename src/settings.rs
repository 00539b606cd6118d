//! Simulation parameters
//!
//! Every component receives these at construction; nothing reads a global
//! scale. Persisted as a standalone JSON document next to the stores.

use std::path::Path;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ArenaError, Result};
use crate::sim::Rect;

/// Arena geometry, pacing and balance knobs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimParams {
    // === Geometry ===
    /// Arena width in pixels
    pub arena_width: i32,
    /// Arena height in pixels
    pub arena_height: i32,
    /// Tank sprite edge in pixels (tile grid = half of this)
    pub unit_size: i32,
    /// Pixels per tick for tanks and projectiles
    pub step: i32,
    /// Projectile sprite edge in pixels
    pub projectile_size: i32,

    // === Combat ===
    /// Player fire cooldown in ticks
    pub fire_interval: u32,
    /// Score per destroyed hostile
    pub kill_score: u64,

    // === Hostile patrol ===
    /// 1-in-N clockwise turn per patrol tick (0 disables)
    pub patrol_turn_odds: u32,
    /// 1-in-N blind shot per patrol tick (0 disables)
    pub patrol_fire_odds: u32,

    // === Presentation pacing ===
    /// Explosion lifetime in ticks
    pub effect_frames: u32,
    /// External clock rate
    pub ticks_per_second: u32,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            unit_size: UNIT_SIZE,
            step: STEP,
            projectile_size: PROJECTILE_SIZE,

            fire_interval: FIRE_INTERVAL,
            kill_score: KILL_SCORE,

            patrol_turn_odds: PATROL_TURN_ODDS,
            patrol_fire_odds: PATROL_FIRE_ODDS,

            effect_frames: EFFECT_FRAMES,
            ticks_per_second: TICKS_PER_SECOND,
        }
    }
}

impl SimParams {
    /// Parameters with the random patrol perturbations switched off
    pub fn deterministic() -> Self {
        Self {
            patrol_turn_odds: 0,
            patrol_fire_odds: 0,
            ..Self::default()
        }
    }

    /// Movement quantum: half the tank sprite
    #[inline]
    pub fn grid_scale(&self) -> i32 {
        self.unit_size / 2
    }

    /// Authoring grid dimensions (cells of `grid_scale` pixels)
    pub fn level_grid(&self) -> (usize, usize) {
        let scale = self.grid_scale();
        (
            (self.arena_width / scale) as usize,
            (self.arena_height / scale) as usize,
        )
    }

    /// Stage-clear walk grid dimensions (cells of `unit_size` pixels)
    pub fn stage_clear_grid(&self) -> (usize, usize) {
        (
            (self.arena_width / self.unit_size) as usize,
            (self.arena_height / self.unit_size) as usize,
        )
    }

    /// Arena pixel rectangle
    pub fn arena_rect(&self) -> Rect {
        Rect::new(0, 0, self.arena_width, self.arena_height)
    }

    /// Player spawn: bottom-center of the arena
    pub fn player_start(&self) -> IVec2 {
        IVec2::new(
            (self.arena_width - self.unit_size) / 2,
            self.arena_height - self.unit_size,
        )
    }

    /// Reject parameter sets the grid math cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.arena_width <= 0 || self.arena_height <= 0 {
            return Err(ArenaError::InvalidParams("arena must be non-empty".into()));
        }
        if self.unit_size < 2 || self.unit_size % 2 != 0 {
            return Err(ArenaError::InvalidParams(format!(
                "unit_size {} must be even and at least 2",
                self.unit_size
            )));
        }
        if self.step <= 0 || self.grid_scale() % self.step != 0 {
            return Err(ArenaError::InvalidParams(format!(
                "step {} must divide grid scale {}",
                self.step,
                self.grid_scale()
            )));
        }
        if self.projectile_size <= 0 || self.projectile_size > self.unit_size {
            return Err(ArenaError::InvalidParams(format!(
                "projectile_size {} must be in 1..={}",
                self.projectile_size, self.unit_size
            )));
        }
        if self.unit_size > self.arena_width || self.unit_size > self.arena_height {
            return Err(ArenaError::InvalidParams("tank larger than arena".into()));
        }
        Ok(())
    }

    /// Load parameters from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<SimParams>(&json) {
                Ok(params) => match params.validate() {
                    Ok(()) => {
                        log::info!("Loaded simulation parameters from {}", path.display());
                        return params;
                    }
                    Err(e) => log::warn!("Ignoring {}: {}", path.display(), e),
                },
                Err(e) => log::warn!("Ignoring malformed {}: {}", path.display(), e),
            },
            Err(_) => log::info!("No parameter file at {}, using defaults", path.display()),
        }
        Self::default()
    }

    /// Write parameters as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Simulation parameters saved to {}", path.display());
        Ok(())
    }
}
