//! Blasttui: tile-blast puzzle in the terminal.

mod anim;
mod app;
mod input;
mod theme;
mod ui;
mod viewport;

use anyhow::{Context, Result};
use app::App;
use blasttui::{Color, EngineConfig, GridLayout};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;
    let config = engine_config(&args)?;
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "theme not loaded, using default");
        theme::Theme::default()
    });
    let mut app = App::new(&args, config, theme)?;
    app.run()?;
    Ok(())
}

/// Tile-blast puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "blasttui",
    version,
    about = "Tile-blast puzzle in the terminal. Pop groups of same-coloured tiles; the rest fall.",
    long_about = "Blasttui is a terminal take on the tile-blast puzzle.\n\n\
        Click a tile (or move the cursor onto it and press Enter). If it touches at least \
        one other tile of its colour, up, down, left or right, the whole group pops and the \
        tiles above fall into the gap. Nothing refills from the top.\n\n\
        CONTROLS:\n  Mouse click  Pop          Arrows / hjkl  Move cursor\n  Enter/Space  Pop          n              New board\n  q / Esc      Quit"
)]
pub struct Args {
    /// Board width in tiles.
    #[arg(long, default_value = "9", value_name = "COLS")]
    pub width: usize,

    /// Board height in tiles.
    #[arg(long, default_value = "9", value_name = "ROWS")]
    pub height: usize,

    /// Tile edge length in world units.
    #[arg(long, default_value = "1.0", value_name = "SIZE")]
    pub tile_size: f32,

    /// Gap between neighbouring tiles in world units.
    #[arg(long, default_value = "0.1", value_name = "GAP")]
    pub tile_spacing: f32,

    /// Smallest group that pops.
    #[arg(long, default_value = "2", value_name = "N")]
    pub min_match: usize,

    /// Number of tile colours in play (red, green, blue, yellow, purple, orange).
    #[arg(long, default_value = "6", value_name = "N", value_parser = clap::value_parser!(u8).range(1..=6))]
    pub colors: u8,

    /// Seed for dealing boards. Same seed, same boards.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Apply pops instantly (no burst or fall animation).
    #[arg(long)]
    pub no_animation: bool,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses One Dark if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Write logs to this file. The terminal is taken by the game, so nothing is logged without it.
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log filter when RUST_LOG is unset (e.g. info, debug, blasttui=trace).
    #[arg(long, default_value = "info", value_name = "FILTER")]
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}

fn init_logging(args: &Args) -> Result<()> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };
    let file = std::fs::File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .with_context(|| format!("invalid log filter {:?}", args.log_level))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

fn engine_config(args: &Args) -> Result<EngineConfig> {
    let layout = GridLayout::new(args.width, args.height, args.tile_size, args.tile_spacing)
        .context("invalid board layout")?;
    let config = EngineConfig {
        layout,
        palette: Color::palette(args.colors as usize),
        min_match: args.min_match,
    };
    config.validate().context("invalid game settings")?;
    Ok(config)
}
