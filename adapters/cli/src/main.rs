#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Rat Maze in the terminal.

mod ascii;

use std::{fs, path::Path, path::PathBuf, thread};

use anyhow::{bail, Context, Result};
use clap::Parser;
use ratmaze_core::{Direction, Event, Outcome, TICK_INTERVAL};
use ratmaze_rendering::present;
use ratmaze_session::{Session, SessionConfig};
use ratmaze_world::query;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::ascii::AsciiSurface;

/// Runs a Rat Maze session and prints its frames.
#[derive(Debug, Parser)]
#[command(name = "ratmaze", version)]
struct Args {
    /// TOML file holding the session configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides the seed from the configuration.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 100)]
    ticks: u64,

    /// Scripted presses, one per tick: U, D, L, R, or `.` for none.
    #[arg(long, default_value = "")]
    moves: String,

    /// Sleeps between ticks so the game runs at its natural pace.
    #[arg(long)]
    realtime: bool,

    /// Prints a frame every N ticks; 0 prints only the final frame.
    #[arg(long, default_value_t = 0)]
    frames: u64,

    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Entry point for the Rat Maze command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => SessionConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    let script = parse_moves(&args.moves)?;

    let mut session = Session::new(&config).context("invalid session configuration")?;
    info!(
        seed = config.seed,
        ticks = args.ticks,
        scripted = script.len(),
        "session started"
    );

    let input = session.input();
    let mut events = Vec::new();
    let mut wins = 0_u64;
    let mut losses = 0_u64;

    for tick in 0..args.ticks {
        let press = usize::try_from(tick)
            .ok()
            .and_then(|index| script.get(index).copied())
            .flatten();
        if let Some(direction) = press {
            input.press(direction);
        }

        events.clear();
        let fired = session.advance(TICK_INTERVAL, &mut events);
        for event in &events {
            if let Event::GameConcluded { outcome, .. } = event {
                match outcome {
                    Outcome::Won => wins += 1,
                    Outcome::Lost => losses += 1,
                }
            }
        }
        debug!(tick, fired, events = events.len(), "advanced");

        if args.frames > 0 && (tick + 1) % args.frames == 0 {
            print_frame(&session);
        }
        if args.realtime {
            thread::sleep(TICK_INTERVAL);
        }
    }

    print_frame(&session);
    if let Some(message) = session.end_message() {
        println!("{message}");
    }
    info!(ticks = session.tick_count(), wins, losses, "session finished");
    Ok(())
}

fn init_tracing(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid log filter `{level}`"))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn load_config(path: &Path) -> Result<SessionConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read session config at {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse session config at {}", path.display()))
}

fn parse_moves(script: &str) -> Result<Vec<Option<Direction>>> {
    script
        .chars()
        .filter(|symbol| !symbol.is_whitespace())
        .map(|symbol| {
            Ok(match symbol.to_ascii_uppercase() {
                'U' => Some(Direction::Up),
                'D' => Some(Direction::Down),
                'L' => Some(Direction::Left),
                'R' => Some(Direction::Right),
                '.' => None,
                other => bail!("unknown move `{other}`; expected U, D, L, R or ."),
            })
        })
        .collect()
}

fn print_frame(session: &Session) {
    let mut surface = AsciiSurface::new(query::board(session.world()));
    present(&session.scene(), &mut surface);
    println!("{surface}");
}
