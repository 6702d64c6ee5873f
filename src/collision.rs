use crate::level::{LevelBlockType, LevelGrid};
use crate::snake::{Position, Snake};

/// Outcome of moving the head onto a new cell.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Collision {
    None,
    Wall,
    SelfHit,
    Apple(Position),
}

impl Collision {
    /// Returns true when the collision kills the snake.
    #[must_use]
    pub fn is_fatal(self) -> bool {
        matches!(self, Self::Wall | Self::SelfHit)
    }
}

/// Decides what happens at the head's current cell.
///
/// Walls are checked first, then the body, then apples. Leaving the grid
/// counts as hitting a wall.
#[must_use]
pub fn resolve(snake: &Snake, grid: &LevelGrid) -> Collision {
    let head = snake.head().position;
    let block = grid.block_at(head);

    if !grid.contains(head) || block == Some(LevelBlockType::Wall) {
        return Collision::Wall;
    }
    if snake.head_overlaps_body() {
        return Collision::SelfHit;
    }
    if block == Some(LevelBlockType::Apple) {
        return Collision::Apple(head);
    }

    Collision::None
}
