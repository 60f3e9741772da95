//! Character Table View - the filtered working set
//!
//! One row per character with the attributes shown in the catalog, plus a
//! favorite marker. Selection is clamped to the current row count.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use crate::models::Character;
use crate::models::availability::display_value;

const HEADERS: [&str; 8] = [
    "Name",
    "Height",
    "Mass",
    "Homeworld",
    "Species",
    "Gender",
    "Eye Color",
    "★",
];

/// State for the character table
pub struct CharacterTableView {
    /// Selected row index
    pub selected: usize,
    /// Table widget state
    pub table_state: TableState,
}

impl Default for CharacterTableView {
    fn default() -> Self {
        Self::new()
    }
}

impl CharacterTableView {
    pub fn new() -> Self {
        let mut table_state = TableState::default();
        table_state.select(Some(0));
        Self {
            selected: 0,
            table_state,
        }
    }

    /// Keep the selection inside `len` rows
    pub fn clamp(&mut self, len: usize) {
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
        self.table_state.select(Some(self.selected));
    }

    /// Move selection down
    pub fn select_next(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.selected = (self.selected + 1).min(len - 1);
        self.table_state.select(Some(self.selected));
    }

    /// Move selection up
    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.table_state.select(Some(self.selected));
    }

    /// Jump to top
    pub fn select_first(&mut self) {
        self.selected = 0;
        self.table_state.select(Some(0));
    }

    /// Jump to bottom
    pub fn select_last(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
        self.table_state.select(Some(self.selected));
    }

    /// Render the view
    pub fn render<F>(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        characters: &[&Character],
        is_favorite: F,
        focused: bool,
    ) where
        F: Fn(&str) -> bool,
    {
        let border_style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!(" {} ", title));

        if characters.is_empty() {
            let empty = Paragraph::new("No characters match")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let header = Row::new(HEADERS.iter().map(|h| Cell::from(*h)))
            .style(Style::default().add_modifier(Modifier::BOLD))
            .bottom_margin(1);

        let rows = characters.iter().map(|c| {
            let favorite = if is_favorite(&c.id) { "★" } else { "" };
            Row::new(vec![
                Cell::from(c.display_name().to_string()),
                Cell::from(display_value(c.height)),
                Cell::from(display_value(c.mass)),
                Cell::from(display_value(c.homeworld_name())),
                Cell::from(display_value(c.species_name())),
                Cell::from(display_value(c.gender.as_deref())),
                Cell::from(display_value(c.eye_color.as_deref())),
                Cell::from(favorite).style(Style::default().fg(Color::Yellow)),
            ])
        });

        let widths = [
            Constraint::Min(18),
            Constraint::Length(7),
            Constraint::Length(6),
            Constraint::Length(14),
            Constraint::Length(12),
            Constraint::Length(14),
            Constraint::Length(14),
            Constraint::Length(2),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("> ");

        frame.render_stateful_widget(table, area, &mut self.table_state);
    }
}
