use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::api_client::HpoApiClient;
use crate::clipboard::{ClipboardSink, SystemClipboard};
use crate::config::Config;
use crate::detail::DetailController;
use crate::export::TermExporter;
use crate::favorites::{favorite, FAVORITES};
use crate::fetch::{FetchEvent, Fetcher};
use crate::logging::LogBuffer;
use crate::search::{SearchController, SearchPhase};
use crate::selection::SelectionStore;
use crate::term::{Term, TermRef};
use crate::ui::overlay;

/// Event loop tick; debounce and fetch results are polled at this cadence.
const TICK: Duration = Duration::from_millis(50);

/// Which pane plain keys act on.
#[derive(Clone, Copy, PartialEq)]
pub enum AppMode {
    /// Typing edits the query; every change restarts the debounce.
    Query,
    /// Navigating the search results.
    Results,
    /// Navigating the selection list.
    Selection,
}

/// Modal popups layered over everything, including the detail overlay.
#[derive(Clone, PartialEq)]
pub enum Popup {
    None,
    Help,
    Logs,
    /// Blocking notice the user must dismiss (clipboard failures etc).
    Notice(String),
}

pub struct TuiApp {
    config: Config,
    fetcher: Fetcher,
    input: Input,
    pub search: SearchController,
    pub detail: DetailController,
    pub selection: SelectionStore,
    mode: AppMode,
    popup: Popup,
    results_state: ListState,
    selection_state: ListState,
    /// Cursor over the overlay's combined parents+children list.
    related_cursor: usize,
    status_message: String,
    log_buffer: LogBuffer,
    should_quit: bool,
}

impl TuiApp {
    pub fn new(config: Config, log_buffer: LogBuffer) -> Self {
        let client = HpoApiClient::new(
            &config.server.search_url,
            &config.server.term_url,
            config.behavior.max_results,
        );
        let search = SearchController::new(config.behavior.debounce_ms);
        Self {
            config,
            fetcher: Fetcher::new(client),
            input: Input::default(),
            search,
            detail: DetailController::new(),
            selection: SelectionStore::new(),
            mode: AppMode::Query,
            popup: Popup::None,
            results_state: ListState::default(),
            selection_state: ListState::default(),
            related_cursor: 0,
            status_message: "Type to search the Human Phenotype Ontology".to_string(),
            log_buffer,
            should_quit: false,
        }
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;

            if event::poll(TICK)? {
                if let Event::Key(key) = event::read()? {
                    self.on_key(key);
                }
            }
            self.on_tick();

            if self.should_quit {
                return Ok(());
            }
        }
    }

    /// Per-tick work: fire the debounce and drain finished fetches.
    fn on_tick(&mut self) {
        if let Some(query) = self.search.poll_ready_query() {
            self.fetcher.spawn_search(query);
        }
        while let Some(done) = self.fetcher.try_recv() {
            match done {
                FetchEvent::SearchDone { query, result } => {
                    // A stale response leaves the live list (and its
                    // cursor) untouched.
                    if self.search.apply_result(&query, result) {
                        self.results_state.select(if self.search.result_count() > 0 {
                            Some(0)
                        } else {
                            None
                        });
                    }
                }
                FetchEvent::DetailDone { id, data } => {
                    self.detail.apply_fetch(&id, data);
                }
            }
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if self.popup != Popup::None {
            // Any dismissing key closes the popup.
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char(_)) {
                self.popup = Popup::None;
            }
            return;
        }
        match key.code {
            KeyCode::F(1) => {
                self.popup = Popup::Help;
                return;
            }
            KeyCode::F(12) => {
                self.popup = Popup::Logs;
                return;
            }
            _ => {}
        }
        if self.detail.is_open() {
            self.on_overlay_key(key);
            return;
        }
        match self.mode {
            AppMode::Query => self.on_query_key(key),
            AppMode::Results => self.on_results_key(key),
            AppMode::Selection => self.on_selection_key(key),
        }
    }

    fn on_query_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                if self.input.value().is_empty() {
                    self.should_quit = true;
                } else {
                    self.input.reset();
                    self.search.on_input_changed("");
                    self.results_state.select(None);
                }
            }
            KeyCode::Enter | KeyCode::Down | KeyCode::Tab => {
                if self.search.result_count() > 0 {
                    self.mode = AppMode::Results;
                    if self.results_state.selected().is_none() {
                        self.results_state.select(Some(0));
                    }
                } else if key.code == KeyCode::Tab {
                    self.mode = AppMode::Selection;
                }
            }
            KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.export_selection();
            }
            _ => {
                let before = self.input.value().to_string();
                self.input.handle_event(&Event::Key(key));
                if self.input.value() != before {
                    self.search.on_input_changed(self.input.value());
                }
            }
        }
    }

    fn on_results_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('/') => self.mode = AppMode::Query,
            KeyCode::Tab => self.mode = AppMode::Selection,
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => {
                Self::move_cursor(&mut self.results_state, self.search.result_count(), -1)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                Self::move_cursor(&mut self.results_state, self.search.result_count(), 1)
            }
            KeyCode::Enter | KeyCode::Char('a') => {
                if let Some(term) = self.selected_result() {
                    self.add_to_selection(term);
                }
            }
            KeyCode::Char('i') => {
                if let Some(term) = self.selected_result() {
                    self.open_detail(term);
                }
            }
            KeyCode::Char('e') => self.export_selection(),
            KeyCode::Char(c) if c.is_ascii_digit() => self.add_favorite(c),
            _ => {}
        }
    }

    fn on_selection_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.mode = AppMode::Query,
            KeyCode::Tab => self.mode = AppMode::Query,
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => {
                Self::move_cursor(&mut self.selection_state, self.selection.count(), -1)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                Self::move_cursor(&mut self.selection_state, self.selection.count(), 1)
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(term) = self.selected_selection_entry() {
                    self.selection.remove(&term.id);
                    let count = self.selection.count();
                    if count == 0 {
                        self.selection_state.select(None);
                    } else if self.selection_state.selected().unwrap_or(0) >= count {
                        self.selection_state.select(Some(count - 1));
                    }
                    self.status_message = format!("Removed {}", term.name);
                }
            }
            KeyCode::Char('c') => {
                self.selection.clear();
                self.selection_state.select(None);
                self.status_message = "Selection cleared".to_string();
            }
            KeyCode::Enter | KeyCode::Char('i') => {
                if let Some(term) = self.selected_selection_entry() {
                    self.open_detail(term);
                }
            }
            KeyCode::Char('e') => self.export_selection(),
            KeyCode::Char(c) if c.is_ascii_digit() => self.add_favorite(c),
            _ => {}
        }
    }

    fn on_overlay_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.detail.close();
                self.related_cursor = 0;
            }
            KeyCode::Char('a') => {
                if let Some(term) = self.detail.current_term() {
                    self.add_to_selection(term);
                }
                self.detail.close();
                self.related_cursor = 0;
            }
            KeyCode::Char('y') => {
                let mut clipboard = SystemClipboard;
                self.copy_genes(&mut clipboard);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.related_cursor = self.related_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let count = self.related_terms().len();
                if count > 0 && self.related_cursor + 1 < count {
                    self.related_cursor += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(related) = self.highlighted_related() {
                    self.open_detail(Term::from(related));
                }
            }
            KeyCode::Char('s') => {
                if let Some(related) = self.highlighted_related() {
                    self.add_to_selection(Term::from(related));
                }
            }
            _ => {}
        }
    }

    fn copy_genes(&mut self, clipboard: &mut dyn ClipboardSink) {
        match self.detail.copy_genes(clipboard) {
            Ok(count) => {
                self.status_message = format!("Copied {} genes", count);
            }
            Err(e) => {
                self.popup = Popup::Notice(format!("Copy failed: {e}"));
            }
        }
    }

    fn open_detail(&mut self, term: Term) {
        self.related_cursor = 0;
        if let Some(request) = self.detail.open(term) {
            self.fetcher.spawn_detail(request);
        }
    }

    fn add_to_selection(&mut self, term: Term) {
        let name = term.name.clone();
        if self.selection.add(term) {
            self.status_message = format!("Added {}", name);
        } else {
            self.status_message = format!("{} is already selected", name);
        }
        if self.selection_state.selected().is_none() && !self.selection.is_empty() {
            self.selection_state.select(Some(0));
        }
    }

    fn add_favorite(&mut self, digit: char) {
        // Favorites are 1-based on screen.
        let index = match digit.to_digit(10) {
            Some(0) | None => return,
            Some(n) => (n - 1) as usize,
        };
        if let Some(fav) = favorite(index) {
            self.add_to_selection(Term::from(fav));
        }
    }

    fn export_selection(&mut self) {
        if !self.selection.export_enabled() {
            self.status_message = "Nothing to export".to_string();
            return;
        }
        let behavior = &self.config.behavior;
        match TermExporter::export(
            &self.selection,
            behavior.export_dir.as_deref(),
            &behavior.export_filename,
        ) {
            Ok(Some(outcome)) => {
                self.status_message = outcome.status_message();
                if behavior.clear_selection_after_export {
                    self.selection.clear();
                    self.selection_state.select(None);
                }
            }
            Ok(None) => {}
            Err(e) => {
                self.popup = Popup::Notice(format!("Export failed: {e}"));
            }
        }
    }

    fn selected_result(&self) -> Option<Term> {
        let index = self.results_state.selected()?;
        self.search.terms().get(index).cloned()
    }

    fn selected_selection_entry(&self) -> Option<Term> {
        let index = self.selection_state.selected()?;
        self.selection.get(index).cloned()
    }

    /// Parents then children, as one navigable list for the overlay.
    pub fn related_terms(&self) -> Vec<TermRef> {
        let Some(state) = self.detail.state() else {
            return Vec::new();
        };
        let mut all = Vec::new();
        if let crate::detail::RelatedSection::Items(parents) = &state.parents {
            all.extend(parents.iter().cloned());
        }
        if let crate::detail::RelatedSection::Items(children) = &state.children {
            all.extend(children.iter().cloned());
        }
        all
    }

    fn highlighted_related(&self) -> Option<TermRef> {
        self.related_terms().get(self.related_cursor).cloned()
    }

    fn move_cursor(state: &mut ListState, count: usize, delta: isize) {
        if count == 0 {
            state.select(None);
            return;
        }
        let current = state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, count as isize - 1) as usize;
        state.select(Some(next));
    }

    fn draw(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // query input
                Constraint::Min(5),    // results | selection
                Constraint::Length(3), // favorites bar
                Constraint::Length(1), // status line
            ])
            .split(f.area());

        self.draw_input(f, chunks[0]);

        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);
        self.draw_results(f, panes[0]);
        self.draw_selection(f, panes[1]);
        self.draw_favorites(f, chunks[2]);
        self.draw_status(f, chunks[3]);

        if self.detail.is_open() {
            overlay::render_detail(f, self);
        }
        match &self.popup {
            Popup::Help => overlay::render_help(f),
            Popup::Logs => overlay::render_logs(f, &self.log_buffer),
            Popup::Notice(message) => overlay::render_notice(f, message),
            Popup::None => {}
        }
    }

    fn draw_input(&self, f: &mut Frame, area: Rect) {
        let style = if self.mode == AppMode::Query {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Gray)
        };
        let input = Paragraph::new(self.input.value())
            .style(style)
            .block(Block::default().borders(Borders::ALL).title("Search HPO"));
        f.render_widget(input, area);

        if self.mode == AppMode::Query && !self.detail.is_open() {
            f.set_cursor_position((
                area.x + self.input.visual_cursor() as u16 + 1,
                area.y + 1,
            ));
        }
    }

    fn draw_results(&mut self, f: &mut Frame, area: Rect) {
        let (title, lines): (String, Vec<ListItem>) = match self.search.phase() {
            SearchPhase::Idle => (
                "Results".to_string(),
                vec![ListItem::new("Type at least one character to search")],
            ),
            SearchPhase::Pending | SearchPhase::Loading { .. } => {
                ("Results".to_string(), vec![ListItem::new("Searching...")])
            }
            SearchPhase::NoResults { query } => (
                "Results (0)".to_string(),
                vec![ListItem::new(format!("No results for \"{query}\""))],
            ),
            SearchPhase::Failed { message, .. } => (
                "Results".to_string(),
                vec![ListItem::new(Line::from(Span::styled(
                    format!("Search failed: {message}"),
                    Style::default().fg(Color::Red),
                )))],
            ),
            SearchPhase::Results { .. } => {
                let items = self
                    .search
                    .terms()
                    .iter()
                    .map(|t| ListItem::new(self.result_label(t)))
                    .collect();
                (format!("Results ({})", self.search.result_count()), items)
            }
        };

        let has_results = matches!(self.search.phase(), SearchPhase::Results { .. });
        let border_style = if self.mode == AppMode::Results {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let list = List::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title(title),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        if has_results {
            f.render_stateful_widget(list, area, &mut self.results_state);
        } else {
            f.render_widget(list, area);
        }
    }

    fn result_label(&self, term: &Term) -> String {
        if self.config.display.show_result_ids {
            format!(
                "{}{}{}",
                term.name, self.config.display.result_id_separator, term.id
            )
        } else {
            term.name.clone()
        }
    }

    fn draw_selection(&mut self, f: &mut Frame, area: Rect) {
        let border_style = if self.mode == AppMode::Selection {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let title = format!("Selection ({})", self.selection.count_label());
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title);

        if self.selection.is_empty() {
            let empty = Paragraph::new("No terms selected yet").block(block);
            f.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = self
            .selection
            .iter()
            .map(|t| ListItem::new(format!("{} ({})", t.name, t.id)))
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        f.render_stateful_widget(list, area, &mut self.selection_state);
    }

    fn draw_favorites(&self, f: &mut Frame, area: Rect) {
        let mut spans: Vec<Span> = Vec::new();
        for (i, (_, name)) in FAVORITES.iter().enumerate().take(9) {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(
                format!("{}:", i + 1),
                Style::default().fg(Color::Cyan),
            ));
            spans.push(Span::raw(*name));
        }
        let bar = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Favorites (press number in list modes)"),
        );
        f.render_widget(bar, area);
    }

    fn draw_status(&self, f: &mut Frame, area: Rect) {
        let mode = if self.detail.is_open() {
            "DETAIL"
        } else {
            match self.mode {
                AppMode::Query => "QUERY",
                AppMode::Results => "RESULTS",
                AppMode::Selection => "SELECTION",
            }
        };
        let export_hint = if self.selection.export_enabled() {
            "e=Export"
        } else {
            "e=Export (empty)"
        };
        let line = Line::from(vec![
            Span::styled(
                format!(" {} ", mode),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw("| "),
            Span::raw(&self.status_message),
            Span::raw(" | "),
            Span::raw(export_hint),
            Span::raw(" | F1=Help"),
        ]);
        let status = Paragraph::new(line).style(Style::default().bg(Color::DarkGray));
        f.render_widget(status, area);
    }

    pub fn related_cursor(&self) -> usize {
        self.related_cursor
    }
}

/// Set up the terminal, run the app, and restore the terminal on the way
/// out even when the run loop errors.
pub fn run_tui_app(config: Config, log_buffer: LogBuffer) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = TuiApp::new(config, log_buffer);
    let res = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}
