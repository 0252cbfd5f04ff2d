use std::{
    fs::File,
    io::{stdout, Write},
    path::{Path, PathBuf},
    sync::{
        mpsc::{channel, Receiver, Sender, TryRecvError},
        Mutex,
    },
    thread::{sleep, Builder},
    time::{Duration, Instant},
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use crossterm::event::{self, Event};
use engine::{
    game_mode::{Difficulty, GameMode},
    game_state::{GameState, TICK_HZ},
    high_score::TOP_SHOWN,
};
use input::{KeyInput, KeyLatch};
use menu::Menu;
use terminal::Screen;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod input;
mod menu;
mod terminal;

#[derive(Parser)]
struct Cli {
    /// Ticks per second. Buttons are sampled and the frame is pushed once per tick
    #[arg(long, default_value_t = TICK_HZ, value_parser = clap::value_parser!(u32).range(1..=1000))]
    tick_hz: u32,
    /// Game steps run between two ticks
    #[arg(long, default_value_t = 4)]
    steps_per_tick: u32,
    /// Ticks a button stays held after its key is pressed
    #[arg(long, default_value_t = 30)]
    hold_ticks: u32,
    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Start>,
}

#[derive(Subcommand)]
enum Start {
    /// Play against the computer
    Single {
        #[arg(long, value_enum, default_value_t = Level::Easy)]
        difficulty: Level,
    },
    /// Two players on one keyboard
    Multi,
}

#[derive(Clone, Copy, ValueEnum)]
enum Level {
    Easy,
    Hard,
}

impl From<Level> for Difficulty {
    fn from(level: Level) -> Self {
        match level {
            Level::Easy => Difficulty::Easy,
            Level::Hard => Difficulty::Hard,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }
    let mut stdout = stdout();
    terminal::enter(&mut stdout).context("failed to set up the terminal")?;
    let result = run(&cli, &mut Screen::new(stdout.lock()));
    let restored = terminal::leave(&mut stdout).context("failed to restore the terminal");
    let menu = result?;
    restored?;
    let top = menu.high_scores().top(TOP_SHOWN);
    if !top.is_empty() {
        println!("high scores:");
        for entry in top {
            println!("{}", entry.format_entry());
        }
    }
    Ok(())
}

fn init_logging(path: &Path) -> Result<()> {
    let log_file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// the event loop: one tick per period, with the game steps or the menu in between.
fn run(cli: &Cli, screen: &mut Screen<impl Write>) -> Result<Menu> {
    let (key_tx, key_rx) = channel();
    spawn_key_listener(key_tx)?;

    let mut state = GameState::new();
    let mut menu = match cli.command {
        Some(Start::Single { difficulty }) => {
            Menu::start(GameMode::Single(difficulty.into()), &mut state)?
        }
        Some(Start::Multi) => Menu::start(GameMode::Multi, &mut state)?,
        None => Menu::new(&mut state),
    };
    let mut latch = KeyLatch::new(cli.hold_ticks);
    let period = Duration::from_secs(1) / cli.tick_hz;
    info!(tick_hz = cli.tick_hz, steps_per_tick = cli.steps_per_tick, "pong started");

    let mut next_tick = Instant::now();
    loop {
        if !drain_keys(&key_rx, &mut latch, &mut menu, &mut state)? {
            return Ok(menu);
        }
        if state.tick(latch.tick()) {
            for _ in 0..cli.steps_per_tick {
                if let Some(outcome) = state.step().context("game step failed")? {
                    menu.session_over(outcome, &mut state);
                    break;
                }
            }
        } else {
            menu.update(&mut state).context("menu failed")?;
        }
        if state.in_game() {
            screen.draw(state.frame())?;
        } else {
            screen.draw(&menu.screen())?;
        }

        next_tick += period;
        let now = Instant::now();
        if next_tick > now {
            sleep(next_tick - now);
        } else {
            // running late, don't try to catch up.
            next_tick = now;
        }
    }
}

/// feeds pending key presses into the latch. returns false once the player asked to quit.
fn drain_keys(
    key_rx: &Receiver<KeyInput>,
    latch: &mut KeyLatch,
    menu: &mut Menu,
    state: &mut GameState,
) -> Result<bool> {
    loop {
        match key_rx.try_recv() {
            Ok(KeyInput::Press(button)) => latch.press(button),
            Ok(KeyInput::Back) => {
                menu.back(state);
                latch.release_all();
            }
            Ok(KeyInput::Quit) => return Ok(false),
            Err(TryRecvError::Empty) => return Ok(true),
            Err(TryRecvError::Disconnected) => bail!("key listener stopped"),
        }
    }
}

fn spawn_key_listener(key_tx: Sender<KeyInput>) -> Result<()> {
    Builder::new()
        .name("key_listener".to_owned())
        .spawn(move || loop {
            let event = match event::read() {
                Ok(event) => event,
                Err(err) => {
                    error!("failed to read terminal event: {err}");
                    return;
                }
            };
            if let Event::Key(key_event) = event {
                if let Some(input) = KeyInput::from_event(key_event) {
                    if key_tx.send(input).is_err() {
                        return;
                    }
                }
            }
        })
        .context("failed to spawn the key listener")?;
    Ok(())
}
