//! Tank Arena headless runner
//!
//! Manages the level store and runs the simulation without graphics.
//!
//! # Usage
//!
//! ```bash
//! # Check every stored level
//! tank-arena validate
//!
//! # Store an ASCII level as the next ordinal
//! tank-arena import maps/first.txt
//!
//! # Let the autopilot play 600 ticks
//! tank-arena run --ticks 600 --seed 7
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use tank_arena::persistence::{FileStorage, LevelStore, SaveStore};
use tank_arena::sim::tick::{TickInput, TickOutcome};
use tank_arena::sim::tile::TileMap;
use tank_arena::sim::validate;
use tank_arena::{Game, Result, SimParams};

#[derive(Parser)]
#[command(name = "tank-arena")]
#[command(about = "Headless tank arena: level store tools and autopilot runs")]
#[command(version)]
struct Cli {
    /// Level store file
    #[arg(long, global = true, default_value = "levels.json")]
    levels: PathBuf,

    /// Run save file
    #[arg(long, global = true, default_value = "save.json")]
    save: PathBuf,

    /// Simulation parameter file (defaults when missing)
    #[arg(long, global = true)]
    params: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report whether each stored level can be played
    Validate,

    /// Store an ASCII level map
    Import {
        /// Map file (`#` hard wall, `+` soft wall, `.` empty, `"` green land, `T` tank)
        file: PathBuf,

        /// Ordinal to store under (defaults to the next free one)
        #[arg(short, long)]
        level: Option<u32>,
    },

    /// Simulate with the autopilot at the controls
    Run {
        /// Ticks to simulate
        #[arg(short, long, default_value = "600")]
        ticks: u32,

        /// Random seed
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Resume the saved run instead of starting a new one
        #[arg(long)]
        resume: bool,

        /// Save the run when the ticks run out
        #[arg(long)]
        save_on_exit: bool,

        /// Replay after game over instead of stopping
        #[arg(long)]
        replay: bool,
    },

    /// Print the effective simulation parameters as JSON
    Params,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        log::error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let params = match &cli.params {
        Some(path) => SimParams::load(path),
        None => SimParams::default(),
    };
    params.validate()?;

    let mut levels =
        LevelStore::new(FileStorage::new(&cli.levels)).with_grid(params.level_grid());

    match cli.command {
        Commands::Validate => {
            let ordinals = levels.ordinals()?;
            if ordinals.is_empty() {
                println!("no levels in {}", cli.levels.display());
            }
            for level in ordinals {
                let map = levels.load(level)?;
                match validate::check(&map) {
                    Ok(()) => println!("level {level}: ok"),
                    Err(problem) => println!("level {level}: {problem}"),
                }
            }
        }
        Commands::Import { file, level } => {
            let text = std::fs::read_to_string(&file)?;
            let map = TileMap::from_ascii(&text)?;
            let level = match level {
                Some(n) => n,
                None => levels.count()? + 1,
            };
            levels.save(level, &map)?;
            println!("stored {} as level {level}", file.display());
        }
        Commands::Run {
            ticks,
            seed,
            resume,
            save_on_exit,
            replay,
        } => {
            let saves = SaveStore::new(FileStorage::new(&cli.save));
            let mut game = Game::new(params, levels, saves, seed);
            if resume {
                game.load_game()?;
            } else {
                game.new_game()?;
            }

            let input = TickInput {
                autopilot: true,
                ..Default::default()
            };
            let mut elapsed = 0;
            while elapsed < ticks && game.is_running() {
                elapsed += 1;
                match game.step(&input)? {
                    TickOutcome::GameOver if replay => game.replay()?,
                    TickOutcome::GameOver | TickOutcome::StageClear { finished: true } => {
                        game.quit()
                    }
                    _ => {}
                }
            }

            if let Some(state) = game.run() {
                println!(
                    "level {} score {} phase {:?} after {elapsed} ticks",
                    state.level, state.score, state.phase
                );
            }
            if save_on_exit {
                game.save_game()?;
                println!("saved to {}", cli.save.display());
            }
        }
        Commands::Params => {
            println!("{}", serde_json::to_string_pretty(&params)?);
        }
    }
    Ok(())
}
