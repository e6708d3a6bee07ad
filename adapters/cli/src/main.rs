#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line host that runs the Labyrinth game in a terminal.

mod clock;
mod commands;
mod terminal;

use std::{
    fs,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
    sync::mpsc::{self, Receiver, RecvTimeoutError},
    thread,
    time::{Duration, Instant},
};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use labyrinth_core::{CellCoord, ContentError, Event, GameConfig, Input, Timer};
use labyrinth_rendering::{Renderer, Scene, Viewport};
use labyrinth_system_editor::LevelEditor;
use labyrinth_system_session::{CustomSource, PlayPhase, Session};
use labyrinth_world::MazeFile;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    clock::TimerQueue,
    commands::{parse_placement, Command},
    terminal::AsciiRenderer,
};

const DEFAULT_LOG_FILTER: &str = "labyrinth=info";
const IDLE_WAIT: Duration = Duration::from_millis(50);
const VIEW_COLUMNS: usize = 61;
const VIEW_ROWS: usize = 41;

/// Grid maze game with treasures, wandering enemies and a level editor.
#[derive(Parser, Debug)]
#[command(name = "labyrinth")]
struct Cli {
    /// TOML file overriding the default game constants.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed for enemy heading choices.
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Play interactively, one command per stdin line.
    Play {
        /// In-game layout file to play as a custom level.
        #[arg(long, conflicts_with = "maze")]
        layout: Option<PathBuf>,
        /// Raw maze file (`. # x X`) to play as a custom level.
        #[arg(long)]
        maze: Option<PathBuf>,
    },
    /// Replay the recorded solution of a built-in level and print each frame.
    Solve {
        /// Level number as listed on the SELECT LEVEL screen.
        #[arg(long)]
        level: usize,
    },
    /// Parse a raw maze file and print its wall grid and markers.
    Inspect {
        /// Raw maze file to parse.
        file: PathBuf,
    },
    /// Read `SYMBOL X Y` placements from stdin and print the exported layout.
    Export,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();
    let config = load_config(cli.config.as_deref(), cli.seed)?;

    match cli.command {
        CliCommand::Play { layout, maze } => {
            let source = layout
                .map(CustomSource::Layout)
                .or(maze.map(CustomSource::Maze));
            play(config, source.as_ref())
        }
        CliCommand::Solve { level } => solve(config, level),
        CliCommand::Inspect { file } => inspect(&file),
        CliCommand::Export => export(&config),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: Option<&Path>, seed: Option<u64>) -> Result<GameConfig> {
    let mut config = match path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("failed to parse config file {}", path.display()))?
        }
        None => GameConfig::default(),
    };
    if let Some(seed) = seed {
        config.rng_seed = seed;
    }
    Ok(config)
}

fn viewport(config: &GameConfig) -> Result<Viewport> {
    Viewport::new(VIEW_COLUMNS, VIEW_ROWS, config.cell_size)
        .context("invalid cell_size in configuration")
}

fn play(config: GameConfig, source: Option<&CustomSource>) -> Result<()> {
    let mut renderer = AsciiRenderer::new(io::stdout().lock(), viewport(&config)?);
    let mut session = Session::new(config).context("failed to load the built-in levels")?;
    let mut timer = TimerQueue::default();
    let mut events = Vec::new();

    session.boot(&mut events);
    if let Some(source) = source {
        session.open_custom(source, &mut timer, &mut events);
    }
    let _ = drain(&mut events);
    present(&session, &mut renderer)?;

    let lines = spawn_stdin_reader();
    let started = Instant::now();
    while session.is_running() {
        timer.advance_to(started.elapsed());
        while let Some(token) = timer.pop_due() {
            session.on_timer(token, &mut timer, &mut events);
        }

        let wait = timer.next_due().map_or(IDLE_WAIT, |due| {
            due.saturating_sub(started.elapsed()).min(IDLE_WAIT)
        });
        match lines.recv_timeout(wait) {
            Ok(line) => {
                timer.advance_to(started.elapsed());
                match Command::parse(&line) {
                    Ok(Some(command)) => apply(command, &mut session, &mut timer, &mut events),
                    Ok(None) => {}
                    Err(error) => warn!("{error:#}"),
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                session.handle(Input::Close, &mut timer, &mut events);
            }
        }

        if drain(&mut events) {
            present(&session, &mut renderer)?;
        }
    }
    info!(high_score = session.scoreboard().high(), "session ended");
    Ok(())
}

fn spawn_stdin_reader() -> Receiver<String> {
    let (sender, receiver) = mpsc::channel();
    let _ = thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if sender.send(line).is_err() {
                break;
            }
        }
    });
    receiver
}

fn apply(command: Command, session: &mut Session, timer: &mut dyn Timer, events: &mut Vec<Event>) {
    match command {
        Command::Move(direction) => session.handle(Input::Key(direction), timer, events),
        Command::Click(point) => session.handle(Input::Click(point), timer, events),
        Command::Quit => session.handle(Input::Close, timer, events),
        Command::Press(label) => {
            if let Err(error) = press(session, label, timer, events) {
                warn!("{error:#}");
            }
        }
    }
}

fn press(
    session: &mut Session,
    label: &str,
    timer: &mut dyn Timer,
    events: &mut Vec<Event>,
) -> Result<()> {
    let anchor = session
        .buttons()
        .iter()
        .find(|button| button.label == label)
        .map(|button| button.rect.label_anchor())
        .ok_or_else(|| anyhow!("no {label} button on this screen"))?;
    session.handle(Input::Click(anchor), timer, events);
    Ok(())
}

/// Logs the batch and reports whether the screen needs redrawing.
fn drain(events: &mut Vec<Event>) -> bool {
    let mut redraw = false;
    for event in events.drain(..) {
        match event {
            Event::RedrawRequested => redraw = true,
            Event::ModeChanged { mode } => {
                debug!(?mode, "mode changed");
                redraw = true;
            }
            Event::NoticeShown { text } => {
                info!(%text, "notice");
                redraw = true;
            }
            other => debug!(event = ?other, "session event"),
        }
    }
    redraw
}

fn present<R: Renderer>(session: &Session, renderer: &mut R) -> Result<()> {
    Scene::capture(session).draw(renderer)
}

fn solve(config: GameConfig, level: usize) -> Result<()> {
    let mut renderer = AsciiRenderer::new(io::stdout().lock(), viewport(&config)?);
    let mut session = Session::new(config).context("failed to load the built-in levels")?;
    let count = session.levels().len();
    let chosen = level
        .checked_sub(1)
        .and_then(|index| session.levels().get(index))
        .ok_or_else(|| anyhow!("level {level} does not exist (choose 1 to {count})"))?;
    if !chosen.has_auto_solution() {
        bail!("{} has no recorded solution", chosen.name());
    }

    let mut timer = TimerQueue::default();
    let mut events = Vec::new();
    session.boot(&mut events);
    press(&mut session, "SELECT LEVEL", &mut timer, &mut events)?;
    press(&mut session, &format!("Level {level}"), &mut timer, &mut events)?;
    press(&mut session, "AUTO", &mut timer, &mut events)?;
    let _ = drain(&mut events);
    present(&session, &mut renderer)?;

    while matches!(
        session.phase(),
        Some(PlayPhase::AutoSolving | PlayPhase::AutoFinishPause)
    ) {
        let token = timer
            .pop_next()
            .ok_or_else(|| anyhow!("auto-solve stalled with no pending timers"))?;
        session.on_timer(token, &mut timer, &mut events);
        if drain(&mut events) {
            present(&session, &mut renderer)?;
        }
    }
    info!(
        level,
        elapsed_ms = timer.now().as_millis() as u64,
        score = session.scoreboard().current(),
        "auto-solve finished"
    );
    Ok(())
}

fn inspect(path: &Path) -> Result<()> {
    let maze = MazeFile::load(path)
        .with_context(|| format!("failed to load maze file {}", path.display()))?;
    let mut out = io::stdout().lock();
    for row in maze.wall_grid() {
        let line: String = row.iter().map(|bit| char::from(b'0' + bit)).collect();
        writeln!(out, "{line}")?;
    }
    writeln!(out, "start: {}", describe(maze.start()))?;
    writeln!(out, "end: {}", describe(maze.end()))?;
    Ok(())
}

fn describe(marker: Option<CellCoord>) -> String {
    marker.map_or_else(
        || "missing".to_owned(),
        |cell| format!("line {}, column {}", cell.row(), cell.column()),
    )
}

fn export(config: &GameConfig) -> Result<()> {
    let mut editor = LevelEditor::new(config);
    for (index, line) in io::stdin().lock().lines().enumerate() {
        let number = index + 1;
        let line = line.context("failed to read placements from stdin")?;
        let Some((symbol, point)) =
            parse_placement(&line).with_context(|| format!("line {number}"))?
        else {
            continue;
        };
        if let Err(reason) = editor.place(symbol, point) {
            match reason.message() {
                Some(message) => warn!(line = number, "{message}"),
                None => debug!(line = number, ?reason, "placement ignored"),
            }
        }
    }
    if !editor.has_start_and_end() {
        return Err(ContentError::MissingStartOrEnd.into());
    }
    writeln!(io::stdout().lock(), "{}", editor.export().to_text())?;
    Ok(())
}
