use std::io::{self, Write};

use crate::error::SoundError;

/// Logical sound events raised by the game.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SoundCue {
    /// "3, 2, 1, go" at the start of a level.
    Countdown,
    /// Background loop while a level runs.
    LevelMusic,
    AppleEaten,
    LevelComplete,
    GameOver,
}

/// Identifies a playing sound so it can be stopped later.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct SoundHandle(pub u32);

/// Sound output capability. Calls return immediately; playback continues in
/// the backend.
pub trait SoundPlayer {
    fn play(&mut self, cue: SoundCue, looping: bool) -> Result<SoundHandle, SoundError>;

    fn stop(&mut self, handle: SoundHandle) -> Result<(), SoundError>;
}

/// Plays nothing. Cues are only traced.
#[derive(Debug, Default)]
pub struct SilentSoundPlayer {
    next_handle: u32,
}

impl SoundPlayer for SilentSoundPlayer {
    fn play(&mut self, cue: SoundCue, looping: bool) -> Result<SoundHandle, SoundError> {
        self.next_handle += 1;
        tracing::debug!(?cue, looping, handle = self.next_handle, "sound cue");
        Ok(SoundHandle(self.next_handle))
    }

    fn stop(&mut self, handle: SoundHandle) -> Result<(), SoundError> {
        tracing::debug!(handle = handle.0, "sound stopped");
        Ok(())
    }
}

/// Rings the terminal bell for one-shot cues. Loops are silent.
pub struct BellSoundPlayer<W: Write = io::Stdout> {
    out: W,
    next_handle: u32,
}

impl BellSoundPlayer {
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> BellSoundPlayer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            next_handle: 0,
        }
    }
}

impl<W: Write> SoundPlayer for BellSoundPlayer<W> {
    fn play(&mut self, cue: SoundCue, looping: bool) -> Result<SoundHandle, SoundError> {
        if !looping && cue != SoundCue::Countdown {
            self.out.write_all(b"\x07")?;
            self.out.flush()?;
        }
        self.next_handle += 1;
        Ok(SoundHandle(self.next_handle))
    }

    fn stop(&mut self, handle: SoundHandle) -> Result<(), SoundError> {
        if handle.0 == 0 || handle.0 > self.next_handle {
            return Err(SoundError::UnknownHandle(handle.0));
        }
        Ok(())
    }
}
