//! Bingo Night terminal front end
//!
//! Usage:
//!   bingo                       - classic game, stats in the platform data dir
//!   bingo --mode speed --auto   - three minute round with auto-play
//!   bingo --seed 42 --stats s.json
//!
//! Type `h` at the prompt for commands. Set `RUST_LOG=debug` for engine logs.

mod command;
mod render;

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use bingo_core::ContentPool;
use bingo_engine::{EngineConfig, GameModeKind, GameSession, SoundBank};
use bingo_stats::{JsonFileStore, StatsTracker};
use clap::Parser;
use crossbeam_channel::{Sender, select, unbounded};

use crate::command::{Command, HELP};
use crate::render::{PrintAnnouncer, TerminalBell, TerminalRenderer, format_board, format_stats};

/// Longest wait for input while no session timer is running
const IDLE_WAIT: Duration = Duration::from_secs(1);

#[derive(Parser)]
#[command(name = "bingo", version, about = "Bingo Night in your terminal")]
struct Cli {
    /// Starting mode (classic, speed, challenge)
    #[arg(short, long)]
    mode: Option<GameModeKind>,

    /// Seed for reproducible boards and calls
    #[arg(long)]
    seed: Option<u64>,

    /// Engine config file (.yaml, .yml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content pool file (.yaml, .yml or .json)
    #[arg(short, long)]
    pool: Option<PathBuf>,

    /// Stats file
    #[arg(long)]
    stats: Option<PathBuf>,

    /// Start auto-play right away
    #[arg(short, long)]
    auto: bool,

    /// Start with sound off
    #[arg(long)]
    mute: bool,

    /// Don't print the caller's lines
    #[arg(long)]
    quiet_caller: bool,
}

/// What the stdin thread hands the main loop
enum Input {
    Command(Command),
    Invalid(String),
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(mode) = cli.mode {
        config.starting_mode = mode;
    }
    if cli.mute {
        config.sound_enabled = false;
    }
    if cli.quiet_caller {
        config.speech.enabled = false;
    }

    let pool = match cli.pool.as_ref().or(config.content_pool.as_ref()) {
        Some(path) => ContentPool::load(path)
            .with_context(|| format!("Failed to load content pool {}", path.display()))?,
        None => ContentPool::standard(),
    };

    let store = match cli.stats.as_ref().or(config.stats_path.as_ref()) {
        Some(path) => JsonFileStore::new(path),
        None => JsonFileStore::at_default_location(),
    };
    log::info!("Stats file: {}", store.path().display());
    let stats = StatsTracker::open(store);

    let clock = Instant::now();
    let now_ms = || millis(clock.elapsed());

    let sound_paths = config.sounds.clone();
    let mut session = match cli.seed {
        Some(seed) => GameSession::with_seed(pool, config, stats, seed, now_ms()),
        None => GameSession::new(pool, config, stats, now_ms()),
    }
    .context("Failed to start a game")?;

    session.set_sounds(SoundBank::preload(&sound_paths, TerminalBell));
    session.set_announcer(PrintAnnouncer);
    session.subscribe(TerminalRenderer::new());

    println!("Welcome to Bingo Night! Type h for help.");
    session.publish_state(now_ms());
    if cli.auto {
        session.toggle_auto_play(now_ms())?;
    }

    let (input_tx, input_rx) = unbounded();
    thread::Builder::new()
        .name("stdin".into())
        .spawn(move || read_input(input_tx))
        .context("Failed to spawn input thread")?;

    loop {
        // Sleep until the next timer tick unless input arrives first
        let wait = session
            .time_until_next_tick(now_ms())
            .map_or(IDLE_WAIT, Duration::from_millis);
        select! {
            recv(input_rx) -> input => match input {
                Ok(Input::Command(command)) => {
                    if !apply(&mut session, command, now_ms())? {
                        break;
                    }
                }
                Ok(Input::Invalid(message)) => println!("? {}", message),
                // stdin closed
                Err(_) => break,
            },
            default(wait) => session.tick(now_ms())?,
        }
    }

    log::info!("Goodbye after {} rounds", session.round_id());
    Ok(())
}

/// Session clock reading; saturates instead of truncating
fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// Parse stdin lines until EOF or the receiver goes away
fn read_input(tx: Sender<Input>) {
    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::warn!("Failed to read input: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let input = match line.parse::<Command>() {
            Ok(command) => Input::Command(command),
            Err(e) => Input::Invalid(e.to_string()),
        };
        if tx.send(input).is_err() {
            break;
        }
    }
}

/// Run one command; returns false to quit
fn apply(session: &mut GameSession, command: Command, now_ms: u64) -> Result<bool> {
    match command {
        Command::NewGame => session.new_game(now_ms)?,
        Command::Call => {
            session.call_item(now_ms)?;
        }
        Command::CheckBingo => {
            session.check_bingo(now_ms);
        }
        Command::ToggleAutoPlay => {
            session.toggle_auto_play(now_ms)?;
        }
        Command::ToggleSound => {
            session.toggle_sound();
        }
        Command::SelectMode(kind) => session.select_mode(kind, now_ms)?,
        Command::ToggleCell(index) => {
            session.toggle_cell(index)?;
        }
        Command::CloseWinDialog => {
            session.close_win_dialog();
        }
        Command::Board => print!("{}", format_board(&session.snapshot())),
        Command::Stats => println!("{}", format_stats(session.stats())),
        Command::ResetStats => session.reset_stats(),
        Command::Help => println!("{}", HELP),
        Command::Quit => return Ok(false),
    }
    Ok(true)
}
