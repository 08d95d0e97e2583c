#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs tower defence sessions headless or in a window.

mod layout_transfer;

use std::{fs, path::PathBuf, str::FromStr, time::Duration};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tower_defence_core::{CellCoord, Command, Event, FrameInput, GameState, TowerTypeId};
use tower_defence_game::{GameConfig, TowerDefenceGame};
use tower_defence_rendering::{Presentation, RenderingBackend, Scene};
use tower_defence_rendering_macroquad::MacroquadBackend;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use self::layout_transfer::{LayoutTower, TowerLayout};

#[derive(Parser, Debug)]
#[command(name = "tower-defence")]
#[command(about = "Runs a tower defence session")]
struct Args {
    /// TOML file overriding the default level and balance settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of fixed steps simulated in headless mode.
    #[arg(long, default_value_t = 3_600)]
    ticks: u32,

    /// Length of a simulation step in milliseconds.
    #[arg(long, default_value_t = 16)]
    dt_ms: u64,

    /// Tower placed before the first tick, written as `kind@row,col`.
    #[arg(long = "tower", value_name = "KIND@ROW,COL")]
    towers: Vec<TowerPlacement>,

    /// Layout string whose towers are placed before the first tick.
    #[arg(long)]
    layout: Option<String>,

    /// Prints the layout string of the placed towers.
    #[arg(long)]
    export_layout: bool,

    /// Prints the final snapshot as JSON.
    #[arg(long)]
    snapshot: bool,

    /// Enters a quiz between waves.
    #[arg(long)]
    quiz: bool,

    /// Opens an interactive window instead of running headless.
    #[arg(long)]
    window: bool,

    /// Sprite manifest used by the window; unlisted sprites fall back to shapes.
    #[arg(long, value_name = "MANIFEST", requires = "window")]
    sprites: Option<PathBuf>,
}

/// Tower requested on the command line.
#[derive(Clone, Copy, Debug, PartialEq)]
struct TowerPlacement {
    kind: TowerTypeId,
    cell: CellCoord,
}

impl FromStr for TowerPlacement {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (kind, cell) = value
            .split_once('@')
            .ok_or_else(|| format!("expected KIND@ROW,COL, got '{value}'"))?;
        let kind = kind
            .trim()
            .parse::<TowerTypeId>()
            .map_err(|error| error.to_string())?;
        let (row, col) = cell
            .split_once(',')
            .ok_or_else(|| format!("expected ROW,COL, got '{cell}'"))?;
        let row = row
            .trim()
            .parse::<i32>()
            .map_err(|error| format!("invalid row '{row}': {error}"))?;
        let col = col
            .trim()
            .parse::<i32>()
            .map_err(|error| format!("invalid column '{col}': {error}"))?;
        Ok(Self {
            kind,
            cell: CellCoord::new(row, col),
        })
    }
}

/// Entry point for the tower defence command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = load_config(args.config.as_ref())?;
    if args.quiz {
        config.quiz_between_waves = true;
    }

    let mut game = TowerDefenceGame::new(config).context("level configuration is not playable")?;
    let _ = game.start();
    place_towers(&mut game, &args)?;

    if args.export_layout {
        println!("{}", export_layout(&game).encode()?);
    }

    if args.window {
        return run_window(game, args.sprites);
    }

    run_headless(&mut game, args.ticks, Duration::from_millis(args.dt_ms));
    print_summary(&game);
    if args.snapshot {
        println!("{}", serde_json::to_string_pretty(&game.snapshot())?);
    }
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    GameConfig::from_toml_str(&contents)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}

fn place_towers(game: &mut TowerDefenceGame, args: &Args) -> Result<()> {
    let mut placements = Vec::new();
    if let Some(layout) = &args.layout {
        let layout = TowerLayout::decode(layout).context("failed to decode --layout")?;
        let config = game.config();
        if (layout.rows, layout.cols) != (config.rows, config.cols) {
            bail!(
                "layout targets a {}x{} grid but the level is {}x{}",
                layout.rows,
                layout.cols,
                config.rows,
                config.cols
            );
        }
        placements.extend(layout.towers.iter().map(|tower| TowerPlacement {
            kind: tower.kind,
            cell: tower.cell,
        }));
    }
    placements.extend_from_slice(&args.towers);

    for placement in placements {
        match game.apply(Command::PlaceTower {
            kind: placement.kind,
            cell: placement.cell,
        }) {
            Ok(()) => info!(kind = %placement.kind, cell = ?placement.cell, "tower placed"),
            Err(error) => {
                warn!(kind = %placement.kind, cell = ?placement.cell, %error, "tower skipped");
            }
        }
    }
    Ok(())
}

fn export_layout(game: &TowerDefenceGame) -> TowerLayout {
    let config = game.config();
    TowerLayout {
        rows: config.rows,
        cols: config.cols,
        tile_size: config.tile_size,
        towers: game
            .towers()
            .towers()
            .iter()
            .map(|tower| LayoutTower {
                kind: tower.kind(),
                cell: tower.cell(),
            })
            .collect(),
    }
}

fn run_headless(game: &mut TowerDefenceGame, ticks: u32, dt: Duration) {
    let input = FrameInput::default();
    for tick in 0..ticks {
        game.update(dt, &input);
        for event in game.recent_events() {
            log_event(event);
        }
        match game.state() {
            GameState::GameOver => {
                info!(tick, "session ended");
                return;
            }
            GameState::Quiz => {
                if let Err(error) = game.apply(Command::CompleteQuiz { gold: 0 }) {
                    warn!(%error, "quiz could not be completed");
                }
                for event in game.recent_events() {
                    log_event(event);
                }
            }
            _ => {}
        }
    }
}

fn log_event(event: &Event) {
    match event {
        Event::WaveStart { wave, enemies } => info!(wave, enemies, "wave started"),
        Event::WaveComplete { wave, bonus } => info!(wave, bonus, "wave complete"),
        Event::StateChanged { from, to } => info!(%from, %to, "state changed"),
        Event::QuizStarted { wave, difficulty } => {
            info!(wave, ?difficulty, "quiz started");
        }
        Event::GameOver { wave, score } => info!(wave, score, "game over"),
        other => debug!(kind = ?other.kind(), event = ?other, "event"),
    }
}

fn print_summary(game: &TowerDefenceGame) {
    let snapshot = game.snapshot();
    println!("state: {}", snapshot.state);
    println!("wave:  {}", snapshot.wave);
    println!("gold:  {}", snapshot.gold);
    println!("lives: {}", snapshot.lives);
    println!("score: {}", snapshot.score);
    for tower in &snapshot.towers {
        println!(
            "tower {} at ({}, {}): {} kills, {:.0} damage",
            tower.kind,
            tower.cell.row(),
            tower.cell.col(),
            tower.kills,
            tower.total_damage
        );
    }
}

fn window_backend(sprites: Option<PathBuf>) -> MacroquadBackend {
    let backend = MacroquadBackend::new().with_vsync(true);
    match sprites {
        Some(manifest) => backend.with_sprite_manifest(manifest),
        None => backend,
    }
}

fn run_window(mut game: TowerDefenceGame, sprites: Option<PathBuf>) -> Result<()> {
    let scene = Scene::from_snapshot(&game.snapshot(), None, false);
    let presentation = Presentation::new(
        "Tower Defence",
        Presentation::DEFAULT_CLEAR_COLOR,
        scene,
    );
    window_backend(sprites).run(presentation, move |dt, input, scene| {
        game.update(dt, &input);
        for event in game.recent_events() {
            log_event(event);
        }
        let preview = input
            .cursor
            .and_then(|cursor| game.placement_preview(cursor));
        *scene = Scene::from_snapshot(&game.snapshot(), preview.as_ref(), false);
    })
}
