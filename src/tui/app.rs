//! TUI Application - main event loop and terminal management
//!
//! This module contains the core TUI application logic including:
//! - Terminal setup and restoration
//! - Key handling over the [`Overview`]
//! - Background page fetches, applied through the two-phase load protocol

use std::io::{self, stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use tokio::sync::mpsc;

use super::views::{CharacterTableView, FilterPanelView, character_detail};
use crate::commands::Session;
use crate::models::{Page, PageRequest};
use crate::overview::{LoadState, Overview};
use crate::source::{AnySource, CharacterSource, SourceError};
use crate::storage::KeyValueStore;

type FetchOutcome = Result<Option<Page>, SourceError>;

/// Which pane receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Table,
    Filters,
}

/// TUI Application state
pub struct TuiApp<S: KeyValueStore> {
    overview: Overview<S>,
    table: CharacterTableView,
    filters: FilterPanelView,
    focus: Focus,
    /// Whether to quit the application
    should_quit: bool,
    /// A load was asked for and not yet dispatched
    load_requested: bool,
    /// Transient message for the status bar (e.g. a failed save)
    notice: Option<String>,
    /// Where pages come from, for the title bar
    source_label: String,
    /// Last key pressed (for gg detection)
    last_key: Option<KeyCode>,
}

impl<S: KeyValueStore> TuiApp<S> {
    /// Create the app. The first page is requested on the first loop iteration.
    pub fn new(overview: Overview<S>, source_label: impl Into<String>) -> Self {
        Self {
            overview,
            table: CharacterTableView::new(),
            filters: FilterPanelView::new(),
            focus: Focus::Table,
            should_quit: false,
            load_requested: true,
            notice: None,
            source_label: source_label.into(),
            last_key: None,
        }
    }

    pub fn overview(&self) -> &Overview<S> {
        &self.overview
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Start a pending load, if one was requested and the overview allows it.
    pub fn take_load_request(&mut self) -> Option<PageRequest> {
        if !std::mem::take(&mut self.load_requested) {
            return None;
        }
        self.overview.begin_load_more()
    }

    /// Apply a finished fetch.
    pub fn complete_load(&mut self, outcome: FetchOutcome) {
        self.overview.complete_load(outcome);
        self.sync_selection();
    }

    fn filtered_len(&self) -> usize {
        self.overview.filtered().len()
    }

    fn selected_id(&self) -> Option<String> {
        self.overview
            .filtered()
            .get(self.table.selected)
            .map(|c| c.id.clone())
    }

    fn sync_selection(&mut self) {
        let len = self.filtered_len();
        self.table.clamp(len);

        let controls = self.overview.filter_controls();
        let option_count = self
            .filters
            .active_control(&controls)
            .map_or(0, |c| c.options.len());
        self.filters.clamp(controls.len(), option_count);
    }

    fn toggle_favorite(&mut self, id: &str) {
        match self.overview.toggle_favorite_by_id(id) {
            Ok(_) => self.notice = None,
            Err(e) => {
                tracing::warn!(error = %e, id, "favorite toggle failed");
                self.notice = Some(format!("Could not save favorites: {}", e));
            }
        }
        self.sync_selection();
    }

    /// Handle keyboard events
    pub fn handle_key(&mut self, key: KeyCode) {
        let previous = self.last_key.replace(key);
        if self.overview.inspected().is_some() {
            self.handle_detail_key(key);
        } else {
            match key {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('F') => {
                    self.overview.toggle_favorites_only();
                    self.table.select_first();
                    self.sync_selection();
                }
                KeyCode::Char('n') => self.load_requested = true,
                _ => match self.focus {
                    Focus::Table => self.handle_table_key(key, previous),
                    Focus::Filters => self.handle_filter_key(key),
                },
            }
        }
    }

    fn handle_detail_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc | KeyCode::Enter => self.overview.close_inspect(),
            KeyCode::Char('f') => {
                if let Some(id) = self.overview.inspected().map(|c| c.id.clone()) {
                    self.toggle_favorite(&id);
                }
            }
            _ => {}
        }
    }

    fn handle_table_key(&mut self, key: KeyCode, previous: Option<KeyCode>) {
        let len = self.filtered_len();
        match key {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.table.select_next(len),
            KeyCode::Char('k') | KeyCode::Up => self.table.select_previous(),
            KeyCode::Char('g') => {
                // Check for gg sequence
                if previous == Some(KeyCode::Char('g')) {
                    self.table.select_first();
                    self.last_key = None;
                }
            }
            KeyCode::Char('G') | KeyCode::End => self.table.select_last(len),
            KeyCode::Home => self.table.select_first(),
            KeyCode::Enter => {
                if let Some(id) = self.selected_id() {
                    if let Err(e) = self.overview.inspect(&id) {
                        self.notice = Some(e.to_string());
                    }
                }
            }
            KeyCode::Char('f') => {
                if let Some(id) = self.selected_id() {
                    self.toggle_favorite(&id);
                }
            }
            KeyCode::Tab => {
                self.focus = Focus::Filters;
                self.sync_selection();
            }
            _ => {}
        }
    }

    fn handle_filter_key(&mut self, key: KeyCode) {
        let controls = self.overview.filter_controls();
        let option_count = self
            .filters
            .active_control(&controls)
            .map_or(0, |c| c.options.len());

        match key {
            KeyCode::Esc => self.focus = Focus::Table,
            KeyCode::Tab => {
                self.filters.next_facet(controls.len());
                if self.filters.active == 0 {
                    self.focus = Focus::Table;
                }
            }
            KeyCode::Char('h') | KeyCode::Left => self.filters.move_left(),
            KeyCode::Char('l') | KeyCode::Right => self.filters.move_right(option_count),
            KeyCode::Char(' ') => {
                let target = self.filters.active_control(&controls).and_then(|control| {
                    self.filters
                        .highlighted(&controls)
                        .map(|value| (control.key.clone(), value.to_string()))
                });
                if let Some((key, value)) = target {
                    if let Err(e) = self.overview.toggle_option(&key, &value) {
                        self.notice = Some(e.to_string());
                    }
                }
            }
            KeyCode::Char('c') => {
                if let Some(control) = self.filters.active_control(&controls) {
                    if let Err(e) = self.overview.select(&control.key, Vec::<String>::new()) {
                        self.notice = Some(e.to_string());
                    }
                }
            }
            _ => {}
        }
        self.sync_selection();
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title bar
                Constraint::Length(5), // Filter panel
                Constraint::Min(5),    // Character table
                Constraint::Length(3), // Status bar
            ])
            .split(area);

        self.render_title_bar(frame, chunks[0]);

        let controls = self.overview.filter_controls();
        self.filters
            .render(frame, chunks[1], &controls, self.focus == Focus::Filters);

        let title = if self.overview.favorites_only() {
            "Favorites"
        } else {
            "Characters"
        };
        let characters = self.overview.filtered();
        let overview = &self.overview;
        self.table.render(
            frame,
            chunks[2],
            title,
            &characters,
            |id| overview.is_favorite(id),
            self.focus == Focus::Table,
        );

        self.render_status_bar(frame, chunks[3]);

        if let Some(character) = self.overview.inspected() {
            let favorite = self.overview.is_favorite(&character.id);
            character_detail::render(frame, area, character, favorite);
        }
    }

    /// Render the title bar with source and working-set counts
    fn render_title_bar(&self, frame: &mut Frame, area: Rect) {
        let window = self.overview.window();
        let loaded = match window.total_count() {
            Some(total) => format!("{} / {} loaded", window.len(), total),
            None => format!("{} loaded", window.len()),
        };
        let mode = if self.overview.favorites_only() {
            Span::styled(
                format!("★ Favorites only ({})", self.overview.favorites().len()),
                Style::default().fg(Color::Yellow),
            )
        } else {
            Span::raw(loaded)
        };

        let title = Paragraph::new(Line::from(vec![
            Span::styled(" Roster ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("{}  ", self.source_label),
                Style::default().fg(Color::DarkGray),
            ),
            mode,
        ]))
        .block(Block::default().borders(Borders::ALL));

        frame.render_widget(title, area);
    }

    /// Render the status bar with load state and keybindings
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let state = match self.overview.load_state() {
            LoadState::Loading => Span::styled("Loading… ", Style::default().fg(Color::Yellow)),
            LoadState::Failed(message) => Span::styled(
                format!("Load failed: {} ", message),
                Style::default().fg(Color::Red),
            ),
            LoadState::Idle if self.overview.can_load_more() => {
                Span::styled("n:Load more ", Style::default().fg(Color::Green))
            }
            LoadState::Idle => Span::raw(""),
        };

        let mut spans = vec![state];
        if let Some(notice) = &self.notice {
            spans.push(Span::styled(
                format!("{} ", notice),
                Style::default().fg(Color::Red),
            ));
        }
        let keys = match self.focus {
            Focus::Table => {
                " j/k:Navigate  gg/G:Top/Bottom  Enter:Detail  f:Favorite  F:Favorites only  Tab:Filters  q:Quit"
            }
            Focus::Filters => " Tab:Next facet  h/l:Move  Space:Toggle  c:Clear  Esc:Table  q:Quit",
        };
        spans.push(Span::styled(keys, Style::default().fg(Color::DarkGray)));

        let status = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(status, area);
    }
}

/// Setup the terminal for TUI mode
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    Terminal::new(backend)
}

/// Restore the terminal to normal mode
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Run the TUI application over an opened session.
pub async fn run_tui(session: Session) -> crate::Result<()> {
    let Session { overview, source } = session;
    let source = Arc::new(source);
    let mut app = TuiApp::new(overview, source.describe());

    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &mut app, &source).await;
    restore_terminal()?;

    result
}

/// Fetch one page in the background and report the outcome on `tx`.
///
/// A fetch that panics is reported as [`SourceError::Aborted`] so the
/// overview never stays in `Loading`.
fn spawn_fetch<C>(source: Arc<C>, request: PageRequest, tx: mpsc::Sender<FetchOutcome>)
where
    C: CharacterSource + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let fetch = tokio::spawn(async move { source.fetch_page(&request).await });
        let outcome = match fetch.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "fetch task failed");
                Err(SourceError::Aborted(e.to_string()))
            }
        };
        let _ = tx.send(outcome).await;
    });
}

async fn event_loop<S: KeyValueStore>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut TuiApp<S>,
    source: &Arc<AnySource>,
) -> crate::Result<()> {
    let (tx, mut rx) = mpsc::channel::<FetchOutcome>(1);

    loop {
        // At most one fetch is in flight: begin_load_more refuses while loading.
        if let Some(request) = app.take_load_request() {
            spawn_fetch(Arc::clone(source), request, tx.clone());
        }

        terminal.draw(|f| app.render(f))?;

        tokio::select! {
            _ = tokio::time::sleep(Duration::from_millis(100)) => {
                if event::poll(Duration::from_millis(0))? {
                    if let Event::Key(key) = event::read()? {
                        if key.kind == KeyEventKind::Press {
                            app.handle_key(key.code);
                        }
                    }
                }
            }
            Some(outcome) = rx.recv() => {
                app.complete_load(outcome);
            }
        }

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favorites::FavoritesStore;
    use crate::models::Character;
    use crate::storage::MemoryStore;
    use std::num::NonZeroU32;

    fn page() -> Page {
        Page::new(
            vec![
                Character::new("1", "Luke Skywalker").with_gender("male"),
                Character::new("2", "Leia Organa").with_gender("female"),
                Character::new("3", "R2-D2").with_gender("n/a"),
            ],
            Some("c3".to_string()),
            true,
        )
    }

    fn app() -> TuiApp<MemoryStore> {
        let overview = Overview::with_default_facets(
            FavoritesStore::load(MemoryStore::new()),
            NonZeroU32::new(3).unwrap(),
        );
        TuiApp::new(overview, "test")
    }

    fn loaded_app() -> TuiApp<MemoryStore> {
        let mut app = app();
        let request = app.take_load_request().unwrap();
        assert_eq!(request.after, None);
        app.complete_load(Ok(Some(page())));
        app
    }

    struct PanickingSource;

    impl CharacterSource for PanickingSource {
        async fn fetch_page(
            &self,
            _request: &PageRequest,
        ) -> std::result::Result<Option<Page>, SourceError> {
            panic!("connection reset")
        }

        fn describe(&self) -> String {
            "panicking".to_string()
        }
    }

    #[tokio::test]
    async fn test_panicked_fetch_clears_loading() {
        let mut app = app();
        let request = app.take_load_request().unwrap();
        let (tx, mut rx) = mpsc::channel(1);

        spawn_fetch(Arc::new(PanickingSource), request, tx);
        let outcome = rx.recv().await.unwrap();
        assert!(matches!(outcome, Err(SourceError::Aborted(_))));

        app.complete_load(outcome);
        assert!(matches!(app.overview().load_state(), LoadState::Failed(_)));
        app.handle_key(KeyCode::Char('n'));
        assert!(app.take_load_request().is_some());
    }

    #[test]
    fn test_initial_load_requested_once() {
        let mut app = app();
        assert!(app.take_load_request().is_some());
        // Loading: no second request until the first completes
        app.handle_key(KeyCode::Char('n'));
        assert!(app.take_load_request().is_none());
    }

    #[test]
    fn test_load_more_uses_cursor() {
        let mut app = loaded_app();
        app.handle_key(KeyCode::Char('n'));
        let request = app.take_load_request().unwrap();
        assert_eq!(request.after.as_deref(), Some("c3"));
    }

    #[test]
    fn test_failed_load_keeps_rows() {
        let mut app = loaded_app();
        app.handle_key(KeyCode::Char('n'));
        app.take_load_request().unwrap();
        app.complete_load(Err(SourceError::Http("timeout".to_string())));
        assert_eq!(app.overview().window().len(), 3);
        assert!(matches!(app.overview().load_state(), LoadState::Failed(_)));
    }

    #[test]
    fn test_gg_and_g_navigation() {
        let mut app = loaded_app();
        app.handle_key(KeyCode::Char('G'));
        assert_eq!(app.table.selected, 2);
        app.handle_key(KeyCode::Char('g'));
        assert_eq!(app.table.selected, 2);
        app.handle_key(KeyCode::Char('g'));
        assert_eq!(app.table.selected, 0);
    }

    #[test]
    fn test_favorite_and_favorites_only() {
        let mut app = loaded_app();
        app.handle_key(KeyCode::Char('j'));
        app.handle_key(KeyCode::Char('f'));
        assert!(app.overview().is_favorite("2"));

        app.handle_key(KeyCode::Char('F'));
        assert!(app.overview().favorites_only());
        assert_eq!(app.overview().filtered().len(), 1);

        // No fetch in favorites-only mode
        app.handle_key(KeyCode::Char('n'));
        assert!(app.take_load_request().is_none());
    }

    #[test]
    fn test_detail_open_and_close() {
        let mut app = loaded_app();
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.overview().inspected().map(|c| c.id.as_str()), Some("1"));

        app.handle_key(KeyCode::Char('f'));
        assert!(app.overview().is_favorite("1"));

        app.handle_key(KeyCode::Esc);
        assert!(app.overview().inspected().is_none());
        assert!(!app.should_quit());
    }

    #[test]
    fn test_filter_toggle_and_clear() {
        let mut app = loaded_app();
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.focus(), Focus::Filters);

        // Gender options exclude "n/a": [male, female]
        app.handle_key(KeyCode::Char('l'));
        app.handle_key(KeyCode::Char(' '));
        let names: Vec<&str> = app
            .overview()
            .filtered()
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(names, vec!["2"]);

        app.handle_key(KeyCode::Char('c'));
        assert_eq!(app.overview().filtered().len(), 3);

        app.handle_key(KeyCode::Esc);
        assert_eq!(app.focus(), Focus::Table);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = loaded_app();
        app.handle_key(KeyCode::Char('q'));
        assert!(app.should_quit());

        let mut app = loaded_app();
        app.handle_key(KeyCode::Esc);
        assert!(app.should_quit());
    }
}
