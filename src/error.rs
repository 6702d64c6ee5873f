use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading or populating a level.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level {number} does not exist")]
    NotFound { number: u32 },

    #[error("failed to read level file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("level {number} is not valid level JSON")]
    Parse {
        number: u32,
        #[source]
        source: serde_json::Error,
    },

    #[error("level {number} has an invalid layout: {reason}")]
    InvalidLayout { number: u32, reason: String },

    #[error("no free cell for a new apple after {attempts} attempts")]
    GridTooFull { attempts: u32 },
}

/// Fatal errors raised while driving the game.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("no game objects registered for state {0}")]
    UnregisteredState(String),

    #[error(transparent)]
    Level(#[from] LevelError),
}

/// Failure reported by a sound backend. Never fatal to a frame.
#[derive(Debug, Error)]
pub enum SoundError {
    #[error("sound output failed")]
    Io(#[from] io::Error),

    #[error("unknown sound handle {0}")]
    UnknownHandle(u32),
}
