use std::io;
use std::time::Duration;

use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::input::{GameInput, KeyCode};

/// Concrete terminal type used by the runtime.
pub type AppTerminal = Terminal<CrosstermBackend<io::Stdout>>;

/// Owns terminal lifecycle (raw mode + alternate screen) for one game session.
///
/// On drop, this type restores terminal state best-effort.
pub struct TerminalSession {
    terminal: AppTerminal,
}

impl TerminalSession {
    /// Enters raw mode, switches to alternate screen, and creates a ratatui terminal.
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        if let Err(error) = execute!(stdout, EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(error);
        }

        let backend = CrosstermBackend::new(stdout);
        match Terminal::new(backend) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(error) => {
                let _ = restore_terminal();
                Err(error)
            }
        }
    }

    pub fn terminal_mut(&mut self) -> &mut AppTerminal {
        &mut self.terminal
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = restore_terminal();
    }
}

/// Leaves raw mode and the alternate screen. Safe to call more than once.
pub fn restore_terminal() -> io::Result<()> {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    execute!(stdout, Show, LeaveAlternateScreen)
}

/// Drains every pending terminal event without blocking.
pub fn poll_inputs() -> io::Result<Vec<GameInput>> {
    let mut inputs = Vec::new();
    while event::poll(Duration::ZERO)? {
        if let Event::Key(key) = event::read()? {
            if let Some(input) = map_key_event(key) {
                inputs.push(input);
            }
        }
    }
    Ok(inputs)
}

/// Translates a crossterm key event into game input.
///
/// Repeats count as presses so held keys stay alive under the hold timeout.
#[must_use]
pub fn map_key_event(key: KeyEvent) -> Option<GameInput> {
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, event::KeyCode::Char('c' | 'C'))
    {
        return Some(GameInput::Quit);
    }

    let code = match key.code {
        event::KeyCode::Left => KeyCode::Left,
        event::KeyCode::Up => KeyCode::Up,
        event::KeyCode::Right => KeyCode::Right,
        event::KeyCode::Down => KeyCode::Down,
        event::KeyCode::Enter | event::KeyCode::Char(' ') => KeyCode::Enter,
        event::KeyCode::Char('a' | 'A') => KeyCode::A,
        event::KeyCode::Char('z' | 'Z') => KeyCode::Z,
        event::KeyCode::Char('q' | 'Q') | event::KeyCode::Esc => return Some(GameInput::Quit),
        _ => return None,
    };

    match key.kind {
        KeyEventKind::Press | KeyEventKind::Repeat => Some(GameInput::Press(code)),
        KeyEventKind::Release => Some(GameInput::Release(code)),
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode as TermKey, KeyEvent, KeyEventKind, KeyModifiers};

    use crate::input::{GameInput, KeyCode};

    use super::map_key_event;

    fn press(code: TermKey) -> Option<GameInput> {
        map_key_event(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn arrows_map_to_direction_keys() {
        assert_eq!(press(TermKey::Up), Some(GameInput::Press(KeyCode::Up)));
        assert_eq!(press(TermKey::Down), Some(GameInput::Press(KeyCode::Down)));
        assert_eq!(press(TermKey::Left), Some(GameInput::Press(KeyCode::Left)));
        assert_eq!(
            press(TermKey::Right),
            Some(GameInput::Press(KeyCode::Right))
        );
    }

    #[test]
    fn enter_and_space_confirm() {
        assert_eq!(
            press(TermKey::Enter),
            Some(GameInput::Press(KeyCode::Enter))
        );
        assert_eq!(
            press(TermKey::Char(' ')),
            Some(GameInput::Press(KeyCode::Enter))
        );
    }

    #[test]
    fn speed_keys_track_release() {
        assert_eq!(press(TermKey::Char('a')), Some(GameInput::Press(KeyCode::A)));
        assert_eq!(press(TermKey::Char('Z')), Some(GameInput::Press(KeyCode::Z)));

        let release =
            KeyEvent::new_with_kind(TermKey::Char('a'), KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(map_key_event(release), Some(GameInput::Release(KeyCode::A)));

        let repeat =
            KeyEvent::new_with_kind(TermKey::Char('z'), KeyModifiers::NONE, KeyEventKind::Repeat);
        assert_eq!(map_key_event(repeat), Some(GameInput::Press(KeyCode::Z)));
    }

    #[test]
    fn quit_keys() {
        assert_eq!(press(TermKey::Char('q')), Some(GameInput::Quit));
        assert_eq!(press(TermKey::Esc), Some(GameInput::Quit));
        assert_eq!(
            map_key_event(KeyEvent::new(TermKey::Char('c'), KeyModifiers::CONTROL)),
            Some(GameInput::Quit)
        );
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        assert_eq!(press(TermKey::Char('x')), None);
        assert_eq!(press(TermKey::Tab), None);
    }
}
