use rand::rngs::StdRng;

use crate::collision::{Collision, resolve};
use crate::config::{
    APPLE_GROWTH, APPLE_POINTS, DEFAULT_START_POSITION, TIME_BONUS_PER_SECOND,
};
use crate::error::{GameError, LevelError};
use crate::level::{LevelGrid, LevelLoader};
use crate::snake::{Controls, Position, Snake};

/// Level clock in frame-timestamp milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GameTimer {
    started_at: Option<f64>,
    stopped_at: Option<f64>,
}

impl GameTimer {
    pub fn start(&mut self, now: f64) {
        self.started_at = Some(now);
        self.stopped_at = None;
    }

    /// Freezes the elapsed time at `now`.
    pub fn stop(&mut self, now: f64) {
        if self.started_at.is_some() {
            self.stopped_at = Some(now);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Whole seconds since start, or zero when not started.
    #[must_use]
    pub fn elapsed_seconds(&self, now: f64) -> u32 {
        let Some(started_at) = self.started_at else {
            return 0;
        };
        let end = self.stopped_at.unwrap_or(now);
        ((end - started_at).max(0.0) / 1000.0) as u32
    }
}

/// Score, level number, grid and snake of one playthrough.
pub struct LevelSession {
    pub snake: Snake,
    pub score: u32,
    pub timer: GameTimer,
    level_number: u32,
    grid: Option<LevelGrid>,
    levels: Box<dyn LevelLoader>,
    rng: StdRng,
}

impl LevelSession {
    #[must_use]
    pub fn new(levels: Box<dyn LevelLoader>, rng: StdRng) -> Self {
        let (x, y) = DEFAULT_START_POSITION;
        Self {
            snake: Snake::new(Position::new(x, y)),
            score: 0,
            timer: GameTimer::default(),
            level_number: 0,
            grid: None,
            levels,
            rng,
        }
    }

    /// Starts a new playthrough: score zero, next level is level 1.
    pub fn reset(&mut self) {
        self.score = 0;
        self.level_number = 0;
    }

    /// Loads the next level (wrapping after the last), respawns the snake and
    /// places one extra apple.
    pub fn begin_next_level(&mut self) -> Result<(), GameError> {
        let count = self.levels.level_count().max(1);
        let number = self.level_number % count + 1;

        let data = self.levels.load(number)?;
        let mut grid = LevelGrid::from_data(number, &data)?;
        self.snake.initialize(data.start_position());
        grid.place_new_apple(&mut self.rng, &self.snake)?;

        tracing::info!(level = number, name = %data.name, apples = data.apple_count, "level loaded");
        self.level_number = number;
        self.grid = Some(grid);
        self.timer.reset();
        Ok(())
    }

    /// Moves the snake if it is due and applies what it ran into.
    ///
    /// Returns `None` when the snake did not move this frame.
    pub fn advance_snake(
        &mut self,
        now: f64,
        controls: Controls,
    ) -> Result<Option<Collision>, LevelError> {
        let Some(grid) = self.grid.as_mut() else {
            return Ok(None);
        };
        if self.snake.tick(now, controls).is_none() {
            return Ok(None);
        }

        let collision = resolve(&self.snake, grid);
        match collision {
            Collision::Wall | Collision::SelfHit => {
                tracing::debug!(?collision, score = self.score, "snake died");
                self.snake.die();
            }
            Collision::Apple(position) => {
                self.snake.grow(APPLE_GROWTH);
                grid.eat_apple(position);
                self.score += APPLE_POINTS;
                grid.place_new_apple(&mut self.rng, &self.snake)?;
            }
            Collision::None => {}
        }
        Ok(Some(collision))
    }

    /// Apples still to eat on the current level.
    #[must_use]
    pub fn apples_left(&self) -> i64 {
        self.grid.as_ref().map_or(0, LevelGrid::apples_left)
    }

    /// Bonus earned for finishing under the level's deadline.
    #[must_use]
    pub fn time_bonus(&self, now: f64) -> u32 {
        let Some(grid) = self.grid.as_ref() else {
            return 0;
        };
        let elapsed = self.timer.elapsed_seconds(now);
        grid.time_bonus_until()
            .saturating_sub(elapsed)
            .saturating_mul(TIME_BONUS_PER_SECOND)
    }

    #[must_use]
    pub fn level_number(&self) -> u32 {
        self.level_number
    }

    #[must_use]
    pub fn grid(&self) -> Option<&LevelGrid> {
        self.grid.as_ref()
    }
}
