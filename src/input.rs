use std::collections::HashMap;

use crate::config::KEY_HOLD_TIMEOUT_MS;

/// Canonical movement directions of the snake.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Direction {
    Left,
    Up,
    Right,
    Down,
}

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Grid step `(dx, dy)` for one move in this direction. `y` grows downwards.
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Left => (-1, 0),
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
        }
    }
}

/// Logical keys understood by the game.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum KeyCode {
    None,
    Left,
    Up,
    Right,
    Down,
    Enter,
    /// Accelerate.
    A,
    /// Decelerate.
    Z,
}

impl KeyCode {
    /// Returns the movement direction for arrow keys.
    #[must_use]
    pub fn direction(self) -> Option<Direction> {
        match self {
            Self::Left => Some(Direction::Left),
            Self::Up => Some(Direction::Up),
            Self::Right => Some(Direction::Right),
            Self::Down => Some(Direction::Down),
            Self::None | Self::Enter | Self::A | Self::Z => None,
        }
    }
}

/// High-level input events produced by a terminal backend.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameInput {
    Press(KeyCode),
    Release(KeyCode),
    Quit,
}

/// Returns whether a direction change is legal (no immediate 180° turns).
#[must_use]
pub fn direction_change_is_valid(current: Direction, next: Direction) -> bool {
    next != current.opposite()
}

/// Input capability consumed by game objects.
///
/// `last_pressed_key` is a single edge-triggered slot; consumers reset it
/// explicitly when they are done with it.
#[derive(Debug, Clone)]
pub struct InputState {
    last_pressed: KeyCode,
    /// Held keys with the timestamp of their latest press or repeat.
    held: HashMap<KeyCode, f64>,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_pressed: KeyCode::Right,
            held: HashMap::new(),
        }
    }

    /// Feeds one backend event observed at `now` (milliseconds).
    pub fn apply(&mut self, input: GameInput, now: f64) {
        match input {
            GameInput::Press(key) => self.press(key, now),
            GameInput::Release(key) => self.release(key),
            GameInput::Quit => {}
        }
    }

    /// Records a press or key-repeat.
    pub fn press(&mut self, key: KeyCode, now: f64) {
        if key == KeyCode::None {
            return;
        }
        self.held.insert(key, now);
        self.last_pressed = key;
    }

    pub fn release(&mut self, key: KeyCode) {
        self.held.remove(&key);
    }

    /// Drops keys whose press events stopped arriving, for terminals that
    /// never report releases.
    pub fn expire_stale(&mut self, now: f64) {
        self.held
            .retain(|_, pressed_at| now - *pressed_at <= KEY_HOLD_TIMEOUT_MS);
    }

    #[must_use]
    pub fn last_pressed_key(&self) -> KeyCode {
        self.last_pressed
    }

    #[must_use]
    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.held.contains_key(&key)
    }

    pub fn reset_last_pressed_key(&mut self) {
        self.last_pressed = KeyCode::None;
    }
}
