use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::config::Theme;
use crate::renderer::Overlay;

/// Draws any overlay screen centered in `area`.
pub fn render_overlay(frame: &mut Frame<'_>, area: Rect, overlay: &Overlay<'_>, theme: &Theme) {
    match overlay {
        Overlay::MainMenu { items, selected } => {
            render_main_menu(frame, area, items, *selected, theme);
        }
        Overlay::Countdown { seconds_left } => {
            let count = if *seconds_left <= 0 {
                "GO!".to_owned()
            } else {
                seconds_left.to_string()
            };
            render_popup(
                frame,
                area,
                "",
                vec![
                    Line::from("Get ready!"),
                    Line::from(""),
                    Line::from(count).style(Style::new().add_modifier(Modifier::BOLD)),
                ],
                theme,
            );
        }
        Overlay::LevelComplete { bonus } => render_popup(
            frame,
            area,
            " level complete ",
            vec![
                Line::from("Well done!"),
                Line::from(format!("Time bonus: {bonus}")),
                Line::from(""),
                Line::from("[Enter] Next level"),
            ],
            theme,
        ),
        Overlay::GameOver { score } => render_popup(
            frame,
            area,
            " game over ",
            vec![
                Line::from("Game over!"),
                Line::from(format!("Total score: {score}")),
                Line::from(""),
                Line::from("[Enter] Continue"),
            ],
            theme,
        ),
        Overlay::Message { title, lines } => render_popup(
            frame,
            area,
            title,
            lines.iter().map(|line| Line::from(line.clone())).collect(),
            theme,
        ),
    }
}

/// Draws the title screen with its selectable entries.
fn render_main_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    items: &[&str],
    selected: usize,
    theme: &Theme,
) {
    let popup = centered_popup(area, 70, 60);
    frame.render_widget(Clear, popup);

    let [title_row, body_row, footer_row] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(2),
    ])
    .areas(popup);

    frame.render_widget(
        Paragraph::new(Line::from("MAZE SNAKE"))
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(theme.menu_title)
                    .add_modifier(Modifier::BOLD),
            ),
        title_row,
    );

    let mut body = vec![Line::from("")];
    for (index, item) in items.iter().enumerate() {
        if index == selected {
            body.push(
                Line::from(format!("> {item} <")).style(
                    Style::default()
                        .fg(theme.menu_selected)
                        .add_modifier(Modifier::BOLD),
                ),
            );
        } else {
            body.push(Line::from(*item));
        }
    }
    frame.render_widget(
        Paragraph::new(body)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" menu ")),
        body_row,
    );

    frame.render_widget(
        Paragraph::new(Line::from("Arrows move · [A]/[Z] speed · [Q] quit"))
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.menu_footer)),
        footer_row,
    );
}

fn render_popup(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    lines: Vec<Line<'_>>,
    theme: &Theme,
) {
    let popup = centered_popup(area, 60, 40);
    frame.render_widget(Clear, popup);

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::new().fg(theme.popup_fg).bg(theme.popup_bg))
            .block(Block::bordered().title(title.to_owned())),
        popup,
    );
}

fn centered_popup(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .areas(mid);

    center
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;

    use crate::config::THEME_OCEAN;
    use crate::renderer::Overlay;

    use super::{centered_popup, render_overlay};

    fn draw_text(overlay: &Overlay<'_>) -> String {
        let mut terminal =
            Terminal::new(TestBackend::new(60, 20)).expect("test terminal should build");
        terminal
            .draw(|frame| {
                let area = frame.area();
                render_overlay(frame, area, overlay, &THEME_OCEAN);
            })
            .expect("draw should succeed");

        let buffer = terminal.backend().buffer();
        (0..20u16)
            .map(|y| {
                (0..60u16)
                    .map(|x| buffer[(x, y)].symbol().to_owned())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn popup_is_centered_inside_area() {
        let popup = centered_popup(Rect::new(0, 0, 100, 50), 60, 40);

        assert_eq!(popup, Rect::new(20, 15, 60, 20));
    }

    #[test]
    fn countdown_switches_to_go_at_zero() {
        assert!(draw_text(&Overlay::Countdown { seconds_left: 2 }).contains('2'));
        assert!(draw_text(&Overlay::Countdown { seconds_left: 0 }).contains("GO!"));
    }

    #[test]
    fn main_menu_marks_selected_entry() {
        let text = draw_text(&Overlay::MainMenu {
            items: vec!["Start new game", "Credits"],
            selected: 1,
        });

        assert!(text.contains("> Credits <"));
        assert!(text.contains("Start new game"));
        assert!(!text.contains("> Start new game <"));
    }

    #[test]
    fn game_over_shows_total_score() {
        assert!(draw_text(&Overlay::GameOver { score: 325 }).contains("Total score: 325"));
    }
}
