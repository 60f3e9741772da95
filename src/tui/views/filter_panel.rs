//! Filter Panel View - facet tabs with option checkboxes

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
};

use crate::overview::FilterControl;

/// Cursor over facets and their options
#[derive(Debug, Default)]
pub struct FilterPanelView {
    /// Index of the active facet
    pub active: usize,
    /// Index of the highlighted option within the active facet
    pub cursor: usize,
}

impl FilterPanelView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to the next facet, wrapping around
    pub fn next_facet(&mut self, facet_count: usize) {
        if facet_count == 0 {
            return;
        }
        self.active = (self.active + 1) % facet_count;
        self.cursor = 0;
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self, option_count: usize) {
        if option_count == 0 {
            return;
        }
        self.cursor = (self.cursor + 1).min(option_count - 1);
    }

    /// Options change as pages arrive; keep the cursor on a real option
    pub fn clamp(&mut self, facet_count: usize, option_count: usize) {
        if self.active >= facet_count {
            self.active = 0;
        }
        if self.cursor >= option_count {
            self.cursor = option_count.saturating_sub(1);
        }
    }

    /// The active facet control, if any
    pub fn active_control<'a>(&self, controls: &'a [FilterControl]) -> Option<&'a FilterControl> {
        controls.get(self.active)
    }

    /// The highlighted option value, if any
    pub fn highlighted<'a>(&self, controls: &'a [FilterControl]) -> Option<&'a str> {
        self.active_control(controls)
            .and_then(|control| control.options.get(self.cursor))
            .map(String::as_str)
    }

    /// Render the view
    pub fn render(&self, frame: &mut Frame, area: Rect, controls: &[FilterControl], focused: bool) {
        let border_style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Filters ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(inner);

        let titles = controls.iter().map(|control| {
            if control.values.is_empty() {
                control.label.clone()
            } else {
                format!("{} ({})", control.label, control.values.len())
            }
        });
        let tabs = Tabs::new(titles)
            .select(self.active)
            .highlight_style(Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan));
        frame.render_widget(tabs, chunks[0]);

        let Some(control) = self.active_control(controls) else {
            return;
        };
        if control.options.is_empty() {
            let empty = Paragraph::new("  No options in the current working set")
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(empty, chunks[1]);
            return;
        }

        let mut spans = Vec::new();
        for (idx, option) in control.options.iter().enumerate() {
            let checked = control.values.iter().any(|v| v == option);
            let mark = if checked { "[x]" } else { "[ ]" };
            let mut style = if checked {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            if focused && idx == self.cursor {
                style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
            }
            spans.push(Span::styled(format!("{} {}", mark, option), style));
            spans.push(Span::raw("  "));
        }

        let options = Paragraph::new(Line::from(spans)).wrap(Wrap { trim: false });
        frame.render_widget(options, chunks[1]);
    }
}
