use std::fs::{self, File, OpenOptions};
use std::io;
use std::panic;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use maze_snake::config::{FRAME_INTERVAL_MS, THEMES, Theme};
use maze_snake::error::{GameError, LevelError};
use maze_snake::game::SnakeGame;
use maze_snake::input::GameInput;
use maze_snake::level::{DirectoryLevels, EmbeddedLevels, LevelLoader};
use maze_snake::renderer::TerminalRenderer;
use maze_snake::sound::{BellSoundPlayer, SilentSoundPlayer, SoundPlayer};
use maze_snake::terminal_runtime::{TerminalSession, poll_inputs, restore_terminal};
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Load `levelN.json` files from this directory instead of the built-in levels.
    #[arg(long = "levels-dir")]
    levels_dir: Option<PathBuf>,

    /// Seed for apple placement.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = ThemeChoice::Classic)]
    theme: ThemeChoice,

    /// Ring the terminal bell on game events.
    #[arg(long)]
    bell: bool,

    /// Log file path. Defaults to the local data directory.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ThemeChoice {
    Classic,
    Ocean,
    Neon,
}

impl ThemeChoice {
    fn theme(self) -> &'static Theme {
        &THEMES[self as usize]
    }
}

#[derive(Debug, Error)]
enum AppError {
    #[error("terminal error")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Level(#[from] LevelError),

    #[error(transparent)]
    Game(#[from] GameError),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(error) = init_tracing(cli.log_file.as_deref()) {
        eprintln!("Failed to open log file: {error}");
    }
    install_panic_hook();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let _ = restore_terminal();
            tracing::error!(%error, "game stopped");
            eprintln!("maze-snake: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let levels: Box<dyn LevelLoader> = match &cli.levels_dir {
        Some(dir) => Box::new(DirectoryLevels::open(dir)?),
        None => Box::new(EmbeddedLevels),
    };
    let sound: Box<dyn SoundPlayer> = if cli.bell {
        Box::new(BellSoundPlayer::stdout())
    } else {
        Box::new(SilentSoundPlayer::default())
    };
    let rng = cli.seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
    let theme = cli.theme.theme();

    tracing::info!(
        levels = levels.level_count(),
        seed = ?cli.seed,
        theme = theme.name,
        "starting"
    );
    let mut game = SnakeGame::new(levels, sound, rng)?;
    let mut session = TerminalSession::enter()?;
    let clock = Instant::now();

    loop {
        let now = clock.elapsed().as_secs_f64() * 1000.0;

        for input in poll_inputs()? {
            if input == GameInput::Quit {
                return Ok(());
            }
            game.input_mut().apply(input, now);
        }
        game.input_mut().expire_stale(now);

        game.update(now)?;

        let mut rendered = Ok(());
        session.terminal_mut().draw(|frame| {
            let mut renderer = TerminalRenderer::new(frame, theme);
            rendered = game.render(&mut renderer, now);
        })?;
        rendered?;

        thread::sleep(Duration::from_millis(FRAME_INTERVAL_MS));
    }
}

fn init_tracing(log_file: Option<&Path>) -> io::Result<()> {
    let path = match log_file {
        Some(path) => path.to_path_buf(),
        None => default_log_path()?,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file: File = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .compact()
        .init();
    Ok(())
}

fn default_log_path() -> io::Result<PathBuf> {
    let dir = dirs::data_local_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no local data directory"))?;
    Ok(dir.join("maze-snake").join("maze-snake.log"))
}

fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        tracing::error!(%info, "panic");
        default_hook(info);
    }));
}
