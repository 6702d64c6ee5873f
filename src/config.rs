use ratatui::style::Color;
use ratatui::symbols::border;

/// Logical grid dimensions of a level, in cells.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

/// A color theme applied to all visual elements.
#[derive(Debug)]
pub struct Theme {
    pub name: &'static str,
    pub snake_head: Color,
    pub snake_body: Color,
    pub wall: Color,
    pub apple: Color,
    /// Background color for empty play-area cells.
    pub play_bg: Color,
    pub border_fg: Color,
    pub hud_label: Color,
    pub hud_value: Color,
    pub popup_fg: Color,
    pub popup_bg: Color,
    pub menu_title: Color,
    pub menu_selected: Color,
    pub menu_footer: Color,
}

/// Green snake in a brick maze.
pub const THEME_CLASSIC: Theme = Theme {
    name: "Classic",
    snake_head: Color::LightGreen,
    snake_body: Color::Green,
    wall: Color::Rgb(150, 75, 40),
    apple: Color::Red,
    play_bg: Color::Black,
    border_fg: Color::DarkGray,
    hud_label: Color::DarkGray,
    hud_value: Color::White,
    popup_fg: Color::White,
    popup_bg: Color::Rgb(90, 40, 20),
    menu_title: Color::Green,
    menu_selected: Color::Green,
    menu_footer: Color::DarkGray,
};

/// Ocean cyan theme.
pub const THEME_OCEAN: Theme = Theme {
    name: "Ocean",
    snake_head: Color::White,
    snake_body: Color::Cyan,
    wall: Color::Blue,
    apple: Color::Yellow,
    play_bg: Color::Black,
    border_fg: Color::Cyan,
    hud_label: Color::DarkGray,
    hud_value: Color::Cyan,
    popup_fg: Color::White,
    popup_bg: Color::Rgb(0, 40, 80),
    menu_title: Color::Cyan,
    menu_selected: Color::Cyan,
    menu_footer: Color::DarkGray,
};

/// Neon magenta/yellow theme.
pub const THEME_NEON: Theme = Theme {
    name: "Neon",
    snake_head: Color::White,
    snake_body: Color::Magenta,
    wall: Color::DarkGray,
    apple: Color::Yellow,
    play_bg: Color::Black,
    border_fg: Color::Magenta,
    hud_label: Color::DarkGray,
    hud_value: Color::Magenta,
    popup_fg: Color::Yellow,
    popup_bg: Color::Black,
    menu_title: Color::Magenta,
    menu_selected: Color::Yellow,
    menu_footer: Color::DarkGray,
};

/// All available themes, in `--theme` order.
pub const THEMES: &[Theme] = &[THEME_CLASSIC, THEME_OCEAN, THEME_NEON];

/// Half-block border set: solid side faces the play area.
pub const BORDER_HALF_BLOCK: border::Set = border::Set {
    top_left: "▄",
    top_right: "▄",
    bottom_left: "▀",
    bottom_right: "▀",
    vertical_left: "█",
    vertical_right: "█",
    horizontal_top: "▄",
    horizontal_bottom: "▀",
};

/// Terminal columns used for one grid cell. Two columns keep cells roughly square.
pub const CELL_WIDTH: u16 = 2;

/// Speed bounds for the accelerate/decelerate keys.
pub const MIN_SPEED: u32 = 3;
pub const MAX_SPEED: u32 = 15;

/// Speed the snake has when a level starts running.
pub const START_SPEED: u32 = 6;

/// The snake advances once `elapsed_ms * speed` exceeds this value.
pub const MOVE_THRESHOLD: f64 = 750.0;

/// Segments gained per apple.
pub const APPLE_GROWTH: u32 = 3;

/// Points awarded per apple.
pub const APPLE_POINTS: u32 = 25;

/// Bonus points per second left under the level deadline.
pub const TIME_BONUS_PER_SECOND: u32 = 10;

/// Length of the "get ready" countdown before a level runs.
pub const COUNTDOWN_SECONDS: u32 = 3;

/// Random draws before apple placement gives up on a level.
pub const MAX_APPLE_PLACEMENT_ATTEMPTS: u32 = 10_000;

/// Snake spawn used when a level does not name one.
pub const DEFAULT_START_POSITION: (i32, i32) = (10, 10);

/// Interval between frames of the terminal driver.
pub const FRAME_INTERVAL_MS: u64 = 16;

/// A key without release events counts as held this long after its last repeat.
pub const KEY_HOLD_TIMEOUT_MS: f64 = 150.0;
