use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Block;

use crate::config::{BORDER_HALF_BLOCK, CELL_WIDTH, GridSize, Theme};
use crate::input::Direction;
use crate::level::{LevelBlock, LevelBlockType};
use crate::snake::{Corner, Position, SegmentShape, SnakeSegment};
use crate::ui::hud::{HUD_HEIGHT, render_hud};
use crate::ui::menu::render_overlay;

/// Values shown on the status lines below the board.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct HudView<'a> {
    pub level_number: u32,
    pub level_name: &'a str,
    pub apples_left: i64,
    pub score: u32,
    pub elapsed_seconds: u32,
    pub speed: u32,
}

/// Screens drawn on top of the board.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Overlay<'a> {
    MainMenu { items: Vec<&'a str>, selected: usize },
    /// Seconds until the level runs; zero or less shows "GO!".
    Countdown { seconds_left: i64 },
    LevelComplete { bonus: u32 },
    GameOver { score: u32 },
    Message { title: &'a str, lines: Vec<String> },
}

/// Drawing capability used by game objects.
///
/// Calls arrive in draw order: board, blocks, HUD, snake, overlays.
pub trait Renderer {
    fn draw_board(&mut self, size: GridSize);

    fn draw_block(&mut self, block: LevelBlock);

    fn draw_segment(&mut self, segment: &SnakeSegment);

    fn draw_hud(&mut self, hud: &HudView<'_>);

    fn draw_overlay(&mut self, overlay: &Overlay<'_>);
}

/// Renders into one ratatui frame.
pub struct TerminalRenderer<'f, 'a> {
    frame: &'f mut Frame<'a>,
    theme: &'static Theme,
    board: Option<Board>,
}

#[derive(Debug, Clone, Copy)]
struct Board {
    /// Bordered area including the frame.
    outer: Rect,
    /// Cell area inside the frame.
    inner: Rect,
    size: GridSize,
}

impl<'f, 'a> TerminalRenderer<'f, 'a> {
    pub fn new(frame: &'f mut Frame<'a>, theme: &'static Theme) -> Self {
        Self {
            frame,
            theme,
            board: None,
        }
    }

    fn put_cell(&mut self, position: Position, glyph: &str, style: Style) {
        let Some(board) = self.board else {
            return;
        };
        let Some((x, y)) = logical_to_terminal(board.inner, board.size, position) else {
            return;
        };
        self.frame.buffer_mut().set_string(x, y, glyph, style);
    }

    fn overlay_area(&self) -> Rect {
        self.board
            .map_or_else(|| self.frame.area(), |board| board.outer)
    }
}

impl Renderer for TerminalRenderer<'_, '_> {
    fn draw_board(&mut self, size: GridSize) {
        let area = self.frame.area();
        let width = size
            .width
            .saturating_mul(CELL_WIDTH)
            .saturating_add(2)
            .min(area.width);
        let height = size
            .height
            .saturating_add(2)
            .min(area.height.saturating_sub(HUD_HEIGHT));
        let outer = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y,
            width,
            height,
        };

        let block = Block::bordered()
            .border_set(BORDER_HALF_BLOCK)
            .border_style(Style::new().fg(self.theme.border_fg))
            .style(Style::new().bg(self.theme.play_bg));
        let inner = block.inner(outer);
        self.frame.render_widget(block, outer);

        self.board = Some(Board { outer, inner, size });
    }

    fn draw_block(&mut self, block: LevelBlock) {
        let (glyph, style) = match block.kind {
            LevelBlockType::Wall => ("██", Style::new().fg(self.theme.wall)),
            LevelBlockType::Apple => ("● ", Style::new().fg(self.theme.apple)),
        };
        self.put_cell(block.position, glyph, style);
    }

    fn draw_segment(&mut self, segment: &SnakeSegment) {
        let glyph = segment_glyph(segment.shape);
        let style = if segment.is_head() {
            Style::new()
                .fg(self.theme.snake_head)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::new().fg(self.theme.snake_body)
        };
        self.put_cell(segment.position, glyph, style);
    }

    fn draw_hud(&mut self, hud: &HudView<'_>) {
        let area = self.frame.area();
        let top = self
            .board
            .map_or(area.y, |board| board.outer.bottom());
        let hud_area = Rect {
            x: area.x,
            y: top,
            width: area.width,
            height: HUD_HEIGHT.min(area.bottom().saturating_sub(top)),
        };
        let width = self.board.map_or(area.width, |board| board.outer.width);
        let hud_area = Rect {
            x: area.x + (area.width - width) / 2,
            width,
            ..hud_area
        };
        render_hud(self.frame, hud_area, hud, self.theme);
    }

    fn draw_overlay(&mut self, overlay: &Overlay<'_>) {
        let area = self.overlay_area();
        render_overlay(self.frame, area, overlay, self.theme);
    }
}

/// Two-column glyph for a segment; the second column links to a right-hand neighbour.
fn segment_glyph(shape: SegmentShape) -> &'static str {
    match shape {
        SegmentShape::Head(Direction::Left) => "◆━",
        SegmentShape::Head(_) => "◆ ",
        SegmentShape::Straight(Direction::Left | Direction::Right) => "━━",
        SegmentShape::Straight(Direction::Up | Direction::Down) => "┃ ",
        SegmentShape::Corner(Corner::UpLeft) => "┛ ",
        SegmentShape::Corner(Corner::UpRight) => "┗━",
        SegmentShape::Corner(Corner::DownLeft) => "┓ ",
        SegmentShape::Corner(Corner::DownRight) => "┏━",
    }
}

fn logical_to_terminal(inner: Rect, bounds: GridSize, position: Position) -> Option<(u16, u16)> {
    if position.x < 0
        || position.y < 0
        || position.x >= i32::from(bounds.width)
        || position.y >= i32::from(bounds.height)
    {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?.checked_mul(CELL_WIDTH)?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(CELL_WIDTH) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}
