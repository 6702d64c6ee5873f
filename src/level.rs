use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rand::Rng;
use serde::Deserialize;

use crate::config::{GridSize, MAX_APPLE_PLACEMENT_ATTEMPTS};
use crate::error::LevelError;
use crate::snake::{Position, Snake};

const EMBEDDED_LEVELS: &[&str] = &[
    include_str!("../levels/level1.json"),
    include_str!("../levels/level2.json"),
    include_str!("../levels/level3.json"),
    include_str!("../levels/level4.json"),
];

const CELL_EMPTY: u8 = 0;
const CELL_WALL: u8 = 1;
const CELL_APPLE: u8 = 2;

/// Authored level description as stored in `levelN.json`.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelData {
    pub name: String,
    /// Apples to eat before the level is complete.
    pub apple_count: u32,
    /// Seconds under which a time bonus is awarded.
    pub time_bonus_until: u32,
    #[serde(alias = "startXPosition")]
    pub start_x: i32,
    #[serde(alias = "startYPosition")]
    pub start_y: i32,
    /// Rows of cell codes: 0 empty, 1 wall, 2 apple.
    pub data: Vec<Vec<u8>>,
}

impl LevelData {
    /// Parses level `number` from JSON.
    pub fn from_json(number: u32, raw: &str) -> Result<Self, LevelError> {
        serde_json::from_str(raw).map_err(|source| LevelError::Parse { number, source })
    }

    #[must_use]
    pub fn start_position(&self) -> Position {
        Position::new(self.start_x, self.start_y)
    }
}

/// Source of level data, numbered from 1.
pub trait LevelLoader {
    /// Number of levels before numbering wraps back to 1.
    fn level_count(&self) -> u32;

    fn load(&self, number: u32) -> Result<LevelData, LevelError>;
}

/// The four levels compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedLevels;

impl LevelLoader for EmbeddedLevels {
    fn level_count(&self) -> u32 {
        EMBEDDED_LEVELS.len() as u32
    }

    fn load(&self, number: u32) -> Result<LevelData, LevelError> {
        let raw = number
            .checked_sub(1)
            .and_then(|index| EMBEDDED_LEVELS.get(index as usize))
            .ok_or(LevelError::NotFound { number })?;
        LevelData::from_json(number, raw)
    }
}

/// Levels read from `level1.json`, `level2.json`, ... in a directory.
#[derive(Debug, Clone)]
pub struct DirectoryLevels {
    dir: PathBuf,
    count: u32,
}

impl DirectoryLevels {
    /// Opens `dir` and counts consecutive level files starting at 1.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, LevelError> {
        let dir = dir.into();
        let count = (1..)
            .take_while(|number| level_path(&dir, *number).is_file())
            .count() as u32;

        if count == 0 {
            return Err(LevelError::NotFound { number: 1 });
        }

        Ok(Self { dir, count })
    }
}

impl LevelLoader for DirectoryLevels {
    fn level_count(&self) -> u32 {
        self.count
    }

    fn load(&self, number: u32) -> Result<LevelData, LevelError> {
        let path = level_path(&self.dir, number);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(LevelError::NotFound { number });
            }
            Err(source) => return Err(LevelError::Io { path, source }),
        };
        LevelData::from_json(number, &raw)
    }
}

fn level_path(dir: &Path, number: u32) -> PathBuf {
    dir.join(format!("level{number}.json"))
}

/// Kind of block occupying a grid cell.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum LevelBlockType {
    Wall,
    Apple,
}

/// A wall or apple at a grid position.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct LevelBlock {
    pub position: Position,
    pub kind: LevelBlockType,
}

/// Blocks of the current level, keyed by cell. At most one block per cell.
#[derive(Debug, Clone)]
pub struct LevelGrid {
    name: String,
    size: GridSize,
    apple_target: u32,
    time_bonus_until: u32,
    apples_eaten: u32,
    blocks: HashMap<Position, LevelBlockType>,
}

impl LevelGrid {
    /// Builds the walls and authored apples of level `number`.
    ///
    /// Does not place the extra random apple; see [`LevelGrid::place_new_apple`].
    pub fn from_data(number: u32, data: &LevelData) -> Result<Self, LevelError> {
        let height = data.data.len();
        let width = data.data.first().map_or(0, Vec::len);
        let invalid = |reason: String| LevelError::InvalidLayout { number, reason };

        if width < 3 || height < 3 {
            return Err(invalid(format!("grid {width}x{height} is smaller than 3x3")));
        }
        if let Some(row) = data.data.iter().position(|row| row.len() != width) {
            return Err(invalid(format!("row {row} is not {width} cells wide")));
        }
        let width = u16::try_from(width).map_err(|_| invalid("grid is too wide".to_owned()))?;
        let height = u16::try_from(height).map_err(|_| invalid("grid is too tall".to_owned()))?;

        let start = data.start_position();
        for offset in 0..3 {
            let cell = Position::new(start.x - offset, start.y);
            let inside = cell.x >= 0
                && cell.y >= 0
                && cell.x < i32::from(width)
                && cell.y < i32::from(height);
            if !inside || data.data[cell.y as usize][cell.x as usize] == CELL_WALL {
                return Err(invalid(format!(
                    "spawn cell ({}, {}) is outside the grid or walled",
                    cell.x, cell.y
                )));
            }
        }

        let mut blocks = HashMap::new();
        for (y, row) in data.data.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                let kind = match *cell {
                    CELL_EMPTY => continue,
                    CELL_WALL => LevelBlockType::Wall,
                    CELL_APPLE => LevelBlockType::Apple,
                    other => {
                        return Err(invalid(format!("unknown cell code {other} at ({x}, {y})")));
                    }
                };
                blocks.insert(Position::new(x as i32, y as i32), kind);
            }
        }

        Ok(Self {
            name: data.name.clone(),
            size: GridSize { width, height },
            apple_target: data.apple_count,
            time_bonus_until: data.time_bonus_until,
            apples_eaten: 0,
            blocks,
        })
    }

    /// Returns true when `position` lies on the grid.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < i32::from(self.size.width)
            && position.y < i32::from(self.size.height)
    }

    /// Returns the block at `position`, if any.
    #[must_use]
    pub fn block_at(&self, position: Position) -> Option<LevelBlockType> {
        self.blocks.get(&position).copied()
    }

    /// Removes the apple at `position` and counts it as eaten.
    ///
    /// Returns false when there is no apple there.
    pub fn eat_apple(&mut self, position: Position) -> bool {
        if self.block_at(position) != Some(LevelBlockType::Apple) {
            return false;
        }
        self.blocks.remove(&position);
        self.apples_eaten += 1;
        true
    }

    /// Places an apple on a random interior cell free of blocks and of the snake.
    pub fn place_new_apple<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        snake: &Snake,
    ) -> Result<Position, LevelError> {
        let max_x = i32::from(self.size.width) - 1;
        let max_y = i32::from(self.size.height) - 1;

        for _ in 0..MAX_APPLE_PLACEMENT_ATTEMPTS {
            let candidate = Position::new(rng.gen_range(1..max_x), rng.gen_range(1..max_y));
            if !self.blocks.contains_key(&candidate) && !snake.occupies(candidate) {
                self.blocks.insert(candidate, LevelBlockType::Apple);
                return Ok(candidate);
            }
        }

        tracing::error!(
            level = %self.name,
            attempts = MAX_APPLE_PLACEMENT_ATTEMPTS,
            "no free cell for a new apple"
        );
        Err(LevelError::GridTooFull {
            attempts: MAX_APPLE_PLACEMENT_ATTEMPTS,
        })
    }

    /// Apples still to eat; the level is complete at zero or below.
    #[must_use]
    pub fn apples_left(&self) -> i64 {
        i64::from(self.apple_target) - i64::from(self.apples_eaten)
    }

    #[must_use]
    pub fn apples_eaten(&self) -> u32 {
        self.apples_eaten
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn size(&self) -> GridSize {
        self.size
    }

    #[must_use]
    pub fn time_bonus_until(&self) -> u32 {
        self.time_bonus_until
    }

    /// Iterates over all blocks in no particular order.
    pub fn blocks(&self) -> impl Iterator<Item = LevelBlock> + '_ {
        self.blocks.iter().map(|(position, kind)| LevelBlock {
            position: *position,
            kind: *kind,
        })
    }
}
