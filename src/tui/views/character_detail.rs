//! Character Detail View - full record of one character in a centered popup

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::models::Character;
use crate::models::availability::display_value;

/// Render the detail popup over `area`.
pub fn render(frame: &mut Frame, area: Rect, character: &Character, favorite: bool) {
    let popup = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup);

    let title = if favorite {
        format!(" {} ★ ", character.display_name())
    } else {
        format!(" {} ", character.display_name())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title);

    let label = Style::default().add_modifier(Modifier::BOLD);
    let field = |name: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!("{:<11}", name), label),
            Span::raw(value),
        ])
    };

    let mut lines = vec![
        field("Height:", display_value(character.height)),
        field("Mass:", display_value(character.mass)),
        field("Homeworld:", display_value(character.homeworld_name())),
        field("Species:", display_value(character.species_name())),
        field("Gender:", display_value(character.gender.as_deref())),
        field("Eye color:", display_value(character.eye_color.as_deref())),
        Line::from(""),
        Line::from(Span::styled("Films", label)),
    ];

    let films = character.film_titles();
    if films.is_empty() {
        lines.push(Line::from(Span::styled(
            "  -",
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.extend(films.into_iter().map(|title| Line::from(format!("  • {}", title))));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "f:Favorite  Esc/Enter:Close",
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, popup);
}

/// A rect of `percent_x` by `percent_y` centered in `area`
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
