use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::config::Theme;
use crate::renderer::HudView;

/// Terminal rows reserved for the HUD below the board.
pub const HUD_HEIGHT: u16 = 2;

const HUD_INNER_MARGIN_X: u16 = 1;

/// Renders the two status lines into `area`.
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, hud: &HudView<'_>, theme: &Theme) {
    let area = inset_horizontal(area, HUD_INNER_MARGIN_X);
    let [top_row, bottom_row] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);
    let [top_left, top_right] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(16)]).areas(top_row);
    let [bottom_left, bottom_right] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(16)]).areas(bottom_row);

    let label = Style::new().fg(theme.hud_label);
    let value = Style::new().fg(theme.hud_value);

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(format!("Level {}: ", hud.level_number), label),
            Span::styled(hud.level_name.to_owned(), value),
        ])),
        top_left,
    );
    frame.render_widget(
        Paragraph::new(labelled("Score", hud.score.to_string(), label, value))
            .alignment(Alignment::Right),
        top_right,
    );
    frame.render_widget(
        Paragraph::new(Line::from(
            [
                labelled("Apples left", hud.apples_left.max(0).to_string(), label, value).spans,
                vec![Span::raw("   ")],
                labelled("Speed", hud.speed.to_string(), label, value).spans,
            ]
            .concat(),
        )),
        bottom_left,
    );
    frame.render_widget(
        Paragraph::new(labelled(
            "Time",
            format!("{}s", hud.elapsed_seconds),
            label,
            value,
        ))
        .alignment(Alignment::Right),
        bottom_right,
    );
}

fn labelled(name: &str, text: String, label: Style, value: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{name}: "), label),
        Span::styled(text, value),
    ])
}

fn inset_horizontal(area: Rect, margin: u16) -> Rect {
    let total_margin = margin.saturating_mul(2);
    Rect {
        x: area.x.saturating_add(margin),
        y: area.y,
        width: area.width.saturating_sub(total_margin),
        height: area.height,
    }
}
