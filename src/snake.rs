use std::collections::VecDeque;

use crate::config::{MAX_SPEED, MIN_SPEED, MOVE_THRESHOLD, START_SPEED};
use crate::input::{Direction, direction_change_is_valid};

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the neighbouring cell one step in `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Manhattan distance between two cells.
    #[must_use]
    pub fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Which two cell sides a bent body segment connects.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Corner {
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

/// Drawing hint for one segment.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SegmentShape {
    Head(Direction),
    Straight(Direction),
    Corner(Corner),
}

/// Shape of the segment behind the head, from its own direction and the
/// direction the new head took.
#[must_use]
pub fn body_shape(previous: Direction, next: Direction) -> SegmentShape {
    use Direction::{Down, Left, Right, Up};

    match (previous, next) {
        (Right, Up) | (Down, Left) => SegmentShape::Corner(Corner::UpLeft),
        (Left, Up) | (Down, Right) => SegmentShape::Corner(Corner::UpRight),
        (Right, Down) | (Up, Left) => SegmentShape::Corner(Corner::DownLeft),
        (Left, Down) | (Up, Right) => SegmentShape::Corner(Corner::DownRight),
        _ => SegmentShape::Straight(previous),
    }
}

/// One cell of the snake.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SnakeSegment {
    pub position: Position,
    pub direction: Direction,
    pub shape: SegmentShape,
}

impl SnakeSegment {
    #[must_use]
    pub fn is_head(&self) -> bool {
        matches!(self.shape, SegmentShape::Head(_))
    }
}

/// Player controls sampled when the snake advances.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct Controls {
    pub turn: Option<Direction>,
    pub accelerate: bool,
    pub decelerate: bool,
}

/// Snake body, direction, speed and growth queue.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<SnakeSegment>,
    direction: Direction,
    speed: u32,
    growth: u32,
    started: bool,
    last_move: f64,
}

impl Snake {
    /// Creates a stopped three-segment snake heading right from `start`.
    #[must_use]
    pub fn new(start: Position) -> Self {
        let mut snake = Self {
            body: VecDeque::new(),
            direction: Direction::Right,
            speed: START_SPEED,
            growth: 0,
            started: false,
            last_move: 0.0,
        };
        snake.initialize(start);
        snake
    }

    /// Creates a snake from explicit positions (front is head) for scripted setups.
    ///
    /// Needs at least three positions, like a freshly spawned snake.
    #[must_use]
    pub fn from_positions(positions: &[Position], direction: Direction) -> Self {
        debug_assert!(positions.len() >= 3, "a snake has at least three segments");
        let body = positions
            .iter()
            .enumerate()
            .map(|(index, position)| SnakeSegment {
                position: *position,
                direction,
                shape: if index == 0 {
                    SegmentShape::Head(direction)
                } else {
                    SegmentShape::Straight(direction)
                },
            })
            .collect();

        Self {
            body,
            direction,
            speed: START_SPEED,
            growth: 0,
            started: false,
            last_move: 0.0,
        }
    }

    /// Resets to three segments at `start`, `start - (1, 0)` and `start - (2, 0)`,
    /// alive at the starting speed but not yet moving.
    pub fn initialize(&mut self, start: Position) {
        self.direction = Direction::Right;
        self.speed = START_SPEED;
        self.body = (0..3)
            .map(|offset| SnakeSegment {
                position: Position::new(start.x - offset, start.y),
                direction: Direction::Right,
                shape: if offset == 0 {
                    SegmentShape::Head(Direction::Right)
                } else {
                    SegmentShape::Straight(Direction::Right)
                },
            })
            .collect();
        self.growth = 0;
        self.started = false;
    }

    /// Lets the snake move at the starting speed.
    pub fn start(&mut self) {
        self.started = true;
        self.speed = START_SPEED;
    }

    pub fn stop(&mut self) {
        self.started = false;
    }

    /// Kills the snake. A dead snake has speed zero and never moves again
    /// until restarted.
    pub fn die(&mut self) {
        self.speed = 0;
    }

    /// Queues `amount` segments of growth; the body extends on later moves.
    pub fn grow(&mut self, amount: u32) {
        self.growth += amount;
    }

    /// Turns towards `requested` unless it is the exact reverse of the current direction.
    pub fn set_direction(&mut self, requested: Direction) {
        if direction_change_is_valid(self.direction, requested) {
            self.direction = requested;
        }
    }

    /// Advances one cell when enough time has passed for the current speed.
    ///
    /// Returns the new head position when the snake moved.
    pub fn tick(&mut self, now: f64, controls: Controls) -> Option<Position> {
        let due = (now - self.last_move) * f64::from(self.speed) > MOVE_THRESHOLD;
        if !self.started || !self.is_alive() || !due {
            return None;
        }
        self.last_move = now;

        if self.growth > 0 {
            self.growth -= 1;
        } else {
            self.body.pop_back();
        }

        self.adjust_speed(controls);
        if let Some(turn) = controls.turn {
            self.set_direction(turn);
        }

        let old_head = self.body.front_mut()?;
        let new_position = old_head.position.step(self.direction);
        old_head.shape = body_shape(old_head.direction, self.direction);

        self.body.push_front(SnakeSegment {
            position: new_position,
            direction: self.direction,
            shape: SegmentShape::Head(self.direction),
        });

        Some(new_position)
    }

    fn adjust_speed(&mut self, controls: Controls) {
        if controls.accelerate && self.speed < MAX_SPEED {
            self.speed += 1;
        }
        if controls.decelerate && self.speed > MIN_SPEED {
            self.speed -= 1;
        }
    }

    /// Returns the head segment.
    #[must_use]
    pub fn head(&self) -> SnakeSegment {
        *self
            .body
            .front()
            .expect("snake body must always contain at least one segment")
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.iter().any(|segment| segment.position == position)
    }

    /// Returns true if the head overlaps any non-head segment.
    #[must_use]
    pub fn head_overlaps_body(&self) -> bool {
        let head = self.head().position;
        self.body.iter().skip(1).any(|segment| segment.position == head)
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.speed > 0
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    #[must_use]
    pub fn speed(&self) -> u32 {
        self.speed
    }

    #[must_use]
    pub fn pending_growth(&self) -> u32 {
        self.growth
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &SnakeSegment> {
        self.body.iter()
    }
}
