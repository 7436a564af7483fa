use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::fs::File;
use std::io::{BufWriter, Stdout, stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

mod driver;
mod firework;
mod geometry;
mod render;
mod show;
mod state;
mod surface;

use driver::Ticker;
use render::Scenery;
use show::FireworkShow;
use surface::Rgba;
use surface::terminal::TerminalSurface;

/// Fireworks over the terminal, followed by a pulsing greeting.
#[derive(Debug, Parser)]
#[command(name = "fireworks", version, after_help = "Press 'q', ESC, or Ctrl+C to exit")]
struct Cli {
    /// Background color as hex (e.g. --bg-color 1a1b26)
    #[arg(long, value_name = "RRGGBB", value_parser = parse_hex_color, default_value = "202124")]
    bg_color: (u8, u8, u8),

    /// Frames per second
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=240))]
    fps: u32,

    /// Logical units per terminal pixel
    #[arg(long, default_value_t = 8.0)]
    scale: f32,

    /// Seed for a reproducible show
    #[arg(long)]
    seed: Option<u64>,

    /// Text shown once the fireworks are over
    #[arg(long, default_value = render::CAPTION)]
    caption: String,

    /// Write logs to this file (filtered by RUST_LOG, default info)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn parse_hex_color(hex: &str) -> Result<(u8, u8, u8), String> {
    let digits = hex.trim_start_matches('#');
    let invalid = || format!("invalid hex color '{hex}', expected RRGGBB (e.g. 1a1b26)");
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(invalid());
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())
    };
    Ok((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

fn init_logging(path: &PathBuf) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

// Runs its closure exactly once when dropped, including during unwinding.
struct RestoreOnDrop<F: FnOnce()>(Option<F>);

impl<F: FnOnce()> RestoreOnDrop<F> {
    fn new(restore: F) -> Self {
        Self(Some(restore))
    }
}

impl<F: FnOnce()> Drop for RestoreOnDrop<F> {
    fn drop(&mut self) {
        if let Some(restore) = self.0.take() {
            restore();
        }
    }
}

fn restore_terminal() {
    let mut out = stdout();
    if let Err(e) = execute!(out, Show, LeaveAlternateScreen) {
        tracing::warn!(error = %e, "leaving alternate screen");
    }
    if let Err(e) = terminal::disable_raw_mode() {
        tracing::warn!(error = %e, "disabling raw mode");
    }
}

fn is_exit_key(event: &Event) -> bool {
    let Event::Key(key) = event else {
        return false;
    };
    key.code == KeyCode::Char('q')
        || key.code == KeyCode::Esc
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

fn run_show(
    show: &mut FireworkShow,
    surface: &mut TerminalSurface,
    fps: u32,
    out: &mut BufWriter<Stdout>,
) -> anyhow::Result<()> {
    let mut ticker = Ticker::new(fps);
    loop {
        if event::poll(ticker.remaining()).context("polling terminal events")? {
            let event = event::read().context("reading terminal event")?;
            if is_exit_key(&event) {
                return Ok(());
            }
            if let Event::Resize(cols, rows) = event {
                tracing::debug!(cols, rows, "terminal resized");
                surface.resize(cols as usize, rows as usize);
                execute!(out, Clear(ClearType::All))?;
            }
        }

        if ticker.due() {
            show.frame(surface);
            surface.present(out).context("drawing frame")?;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let seed = cli.seed.unwrap_or_else(|| fastrand::u64(..));
    let (cols, rows) = terminal::size().context("querying terminal size")?;
    tracing::info!(cols, rows, seed, fps = cli.fps, scale = cli.scale, "starting fireworks");

    let scenery = Scenery {
        background: Rgba::opaque(cli.bg_color),
        caption: cli.caption,
    };
    let mut show = FireworkShow::new(fastrand::Rng::with_seed(seed), scenery);
    let mut surface = TerminalSurface::new(cols as usize, rows as usize, cli.scale);

    let mut out = BufWriter::with_capacity(1024 * 64, stdout());
    terminal::enable_raw_mode().context("enabling raw mode")?;
    let restore = RestoreOnDrop::new(restore_terminal);
    execute!(out, EnterAlternateScreen, Hide, Clear(ClearType::All))
        .context("entering alternate screen")?;

    let result = run_show(&mut show, &mut surface, cli.fps, &mut out);
    drop(restore);

    tracing::info!(frames = show.state().frame, "stopped");
    result
}
