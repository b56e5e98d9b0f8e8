use std::{
    cmp, io,
    iter::once,
    thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info};
use vjuega_core::{
    catalog::{
        calendar::{events_in_month, upcoming},
        CatalogBrowser, FilterCategory, Initial, YearRange,
    },
    models::{GameOrigin, GameRecord},
    resource::LoadEvent,
};

use crate::{
    debounce::Debounced,
    form::{wrap, AddGameForm, Field, TextInput},
};

const TICK_RATE: Duration = Duration::from_millis(100);
const TOP_COUNTS: usize = 25;
const UPCOMING_LIMIT: usize = 15;
const GALLERY_ORIGIN: GameOrigin = GameOrigin::GameJamPlus2526;

const MONTHS: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    muted: Color,
    selection_bg: Color,
    success: Color,
    warning: Color,
    danger: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Cyan,
            muted: Color::DarkGray,
            selection_bg: Color::DarkGray,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Loading,
    Error,
    Catalog,
    Filters,
    Stats,
    Calendar,
    Highlights,
    Gallery,
}

impl Screen {
    const TABS: [(Screen, &'static str, &'static str); 6] = [
        (Screen::Catalog, "1", "Catálogo"),
        (Screen::Filters, "2", "Filtros"),
        (Screen::Stats, "3", "Estadísticas"),
        (Screen::Calendar, "4", "Calendario"),
        (Screen::Highlights, "5", "Destacados"),
        (Screen::Gallery, "6", "GameJam+"),
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Browse,
    Search,
    Jump,
}

enum AppEvent {
    Input(Event),
    Tick,
}

#[derive(Debug, Clone, Copy, Default)]
struct FilterPanel {
    category: usize,
    cursor: usize,
}

impl FilterPanel {
    fn category(&self) -> FilterCategory {
        FilterCategory::ALL[self.category]
    }

    fn move_category(&mut self, delta: isize) {
        self.category = wrap(self.category, delta, FilterCategory::ALL.len());
        self.cursor = 0;
    }

    fn move_cursor(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.cursor = 0;
            return;
        }
        let next = self.cursor as isize + delta;
        self.cursor = next.clamp(0, len as isize - 1) as usize;
    }
}

#[derive(Debug, Clone, Copy)]
struct CalendarView {
    year: i32,
    month: u32,
}

impl CalendarView {
    fn starting_at(today: NaiveDate) -> Self {
        Self {
            year: today.year(),
            month: today.month(),
        }
    }

    fn shift(&mut self, delta: i32) {
        let index = self.year * 12 + self.month as i32 - 1 + delta;
        self.year = index.div_euclid(12);
        self.month = index.rem_euclid(12) as u32 + 1;
    }

    fn title(&self) -> String {
        format!("{} {}", MONTHS[self.month as usize - 1], self.year)
    }
}

/// Terminal browser for the game catalog.
pub struct VjuegaApp {
    browser: CatalogBrowser,
    source: String,
    screen: Screen,
    state: UiState,
    search_input: TextInput,
    search: Debounced<String>,
    jump_input: TextInput,
    gallery_cursor: usize,
    load_rx: Option<mpsc::Receiver<LoadEvent>>,
    load_error: Option<String>,
    filters: FilterPanel,
    calendar: CalendarView,
    form: Option<AddGameForm>,
    theme: Theme,
}

impl VjuegaApp {
    pub fn new(browser: CatalogBrowser, source: String, debounce: Duration) -> Self {
        Self {
            browser,
            source,
            screen: Screen::Loading,
            state: UiState::default(),
            search_input: TextInput::default(),
            search: Debounced::new(debounce),
            jump_input: TextInput::default(),
            gallery_cursor: 0,
            load_rx: None,
            load_error: None,
            filters: FilterPanel::default(),
            calendar: CalendarView::starting_at(Local::now().date_naive()),
            form: None,
            theme: Theme::default(),
        }
    }

    pub fn attach_loader(&mut self, receiver: mpsc::Receiver<LoadEvent>) {
        self.load_rx = Some(receiver);
    }

    pub async fn run(&mut self) -> Result<()> {
        self.state
            .set_status(format!("Cargando catálogo desde {}", self.source));

        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx);

        let mut load_rx = self.load_rx.take();

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.state.should_quit {
                break;
            }

            if let Some(rx) = load_rx.as_mut() {
                let mut load_closed = false;
                tokio::select! {
                    maybe_event = event_rx.recv() => {
                        if !self.process_app_event(maybe_event) {
                            break;
                        }
                    }
                    maybe_load = rx.recv() => {
                        match maybe_load {
                            Some(event) => self.handle_load_event(event),
                            None => load_closed = true,
                        }
                    }
                }
                if load_closed {
                    load_rx = None;
                    self.handle_load_closed();
                }
            } else {
                let maybe_event = event_rx.recv().await;
                if !self.process_app_event(maybe_event) {
                    break;
                }
            }

            if self.state.should_quit {
                break;
            }
        }

        restore_terminal(&mut terminal)?;
        Ok(())
    }

    fn handle_load_event(&mut self, event: LoadEvent) {
        match event {
            LoadEvent::Loaded { catalog, report } => {
                info!(records = report.records, source = %report.source, "Catalog ready");
                let summary = report.summary();
                self.browser.replace(catalog, report);
                self.screen = Screen::Catalog;
                self.refresh_records();
                self.state.set_status(summary);
            }
            LoadEvent::Failed(err) => {
                error!(%err, "Catalog unavailable");
                let hint = if err.is_transport() {
                    "Revisa la conexión o la fuente configurada."
                } else {
                    "La hoja no tiene el formato esperado."
                };
                self.load_error = Some(format!("{err}\n\n{hint}"));
                self.screen = Screen::Error;
            }
        }
    }

    /// The loader went away. Without a prior event the load can never finish.
    fn handle_load_closed(&mut self) {
        if self.screen != Screen::Loading {
            return;
        }
        error!(source = %self.source, "Catalog loader stopped without a result");
        self.load_error = Some(format!(
            "La carga desde {} terminó sin resultado.",
            self.source
        ));
        self.screen = Screen::Error;
    }

    fn handle_tick(&mut self) {
        if let Some(term) = self.search.poll(Instant::now()) {
            self.apply_search(term);
        }
    }

    fn process_app_event(&mut self, maybe_event: Option<AppEvent>) -> bool {
        match maybe_event {
            Some(AppEvent::Input(event)) => {
                if let Err(err) = self.handle_input(event) {
                    self.state.set_status(format!("Error: {err}"));
                }
                true
            }
            Some(AppEvent::Tick) => {
                self.handle_tick();
                true
            }
            None => false,
        }
    }

    fn refresh_records(&mut self) {
        self.state.set_records(self.browser.filtered());
    }

    fn apply_search(&mut self, term: String) {
        self.browser.set_search(term);
        self.refresh_records();
        self.state
            .set_status(format!("{} resultados", self.state.records.len()));
    }

    fn queue_search(&mut self) {
        self.search
            .push(self.search_input.value().to_string(), Instant::now());
    }

    fn handle_input(&mut self, event: Event) -> Result<()> {
        let Event::Key(key) = event else {
            return Ok(());
        };
        if self.form.is_some() {
            return self.handle_form_key(key);
        }
        let screen = self.screen;
        match screen {
            Screen::Loading | Screen::Error => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
                    self.state.should_quit = true;
                }
                Ok(())
            }
            Screen::Catalog if self.state.mode == Mode::Search => self.handle_search_key(key),
            Screen::Catalog if self.state.mode == Mode::Jump => self.handle_jump_key(key),
            _ if self.handle_navigation_key(&key) => Ok(()),
            Screen::Catalog => self.handle_catalog_key(key),
            Screen::Filters => self.handle_filter_key(key),
            Screen::Stats => Ok(()),
            Screen::Calendar => self.handle_calendar_key(key),
            Screen::Highlights | Screen::Gallery => self.handle_gallery_key(key),
        }
    }

    fn handle_navigation_key(&mut self, key: &KeyEvent) -> bool {
        if !(key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT) {
            return false;
        }
        match key.code {
            KeyCode::Char('q') => self.state.should_quit = true,
            KeyCode::Char('1') => self.screen = Screen::Catalog,
            KeyCode::Char('2') => self.screen = Screen::Filters,
            KeyCode::Char('3') => self.screen = Screen::Stats,
            KeyCode::Char('4') => self.screen = Screen::Calendar,
            KeyCode::Char('5') => self.show_gallery(Screen::Highlights),
            KeyCode::Char('6') => self.show_gallery(Screen::Gallery),
            KeyCode::Char('a') => {
                self.screen = Screen::Catalog;
                self.form = Some(AddGameForm::new());
                self.state.set_status("Nuevo juego".to_string());
            }
            KeyCode::Esc if self.screen != Screen::Catalog => self.screen = Screen::Catalog,
            _ => return false,
        }
        true
    }

    fn handle_catalog_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.state.move_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.state.move_cursor(-1),
            KeyCode::Char('g') => self.state.move_to(0),
            KeyCode::Char('G') => self.state.move_to_end(),
            KeyCode::Home => self.state.move_to(0),
            KeyCode::End => self.state.move_to_end(),
            KeyCode::PageDown => self.state.page_down(),
            KeyCode::PageUp => self.state.page_up(),
            KeyCode::Left => self.step_initial(-1),
            KeyCode::Right => self.step_initial(1),
            KeyCode::Char('/') => {
                self.state.mode = Mode::Search;
                self.state.set_status("Buscar por título, desarrollador o descripción".to_string());
            }
            KeyCode::Char(':') => {
                self.state.mode = Mode::Jump;
                self.jump_input.clear();
                self.state.set_status("Ir a un juego por su slug".to_string());
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_jump_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => {
                self.state.mode = Mode::Browse;
                self.jump_input.clear();
            }
            KeyCode::Enter => {
                self.state.mode = Mode::Browse;
                let slug = self.jump_input.value().trim().trim_start_matches('/').to_string();
                self.jump_input.clear();
                self.open_slug(&slug);
            }
            KeyCode::Backspace => self.jump_input.backspace(),
            KeyCode::Delete => self.jump_input.delete(),
            KeyCode::Left => self.jump_input.move_cursor(-1),
            KeyCode::Right => self.jump_input.move_cursor(1),
            KeyCode::Home => self.jump_input.move_home(),
            KeyCode::End => self.jump_input.move_end(),
            KeyCode::Char(ch) => {
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                    self.jump_input.insert(ch);
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Select the game routed to by `slug` in the catalog screen. Filters
    /// that hide it are cleared first.
    fn open_slug(&mut self, slug: &str) -> bool {
        let Some(record) = self.browser.find_by_slug(slug) else {
            self.state
                .set_status(format!("No hay ningún juego en /{slug}"));
            return false;
        };
        if !self.state.records.iter().any(|visible| visible.slug == record.slug) {
            self.browser.clear_filters();
            self.browser.set_search(String::new());
            self.search_input.clear();
            self.search.flush();
            self.refresh_records();
        }
        self.state.select_slug(&record.slug);
        self.screen = Screen::Catalog;
        self.state
            .set_status(format!("{} (/{})", record.title(), record.slug));
        true
    }

    fn show_gallery(&mut self, screen: Screen) {
        if self.screen != screen {
            self.gallery_cursor = 0;
        }
        self.screen = screen;
    }

    fn gallery_records(&self) -> Vec<GameRecord> {
        match self.screen {
            Screen::Highlights => self.browser.highlighted(),
            Screen::Gallery => self.browser.by_origin(GALLERY_ORIGIN),
            _ => Vec::new(),
        }
    }

    fn handle_gallery_key(&mut self, key: KeyEvent) -> Result<()> {
        let records = self.gallery_records();
        let last = records.len().saturating_sub(1);
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.gallery_cursor = (self.gallery_cursor + 1).min(last);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.gallery_cursor = self.gallery_cursor.saturating_sub(1);
            }
            KeyCode::Enter => {
                if let Some(record) = records.get(self.gallery_cursor) {
                    self.open_slug(&record.slug);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => {
                self.state.mode = Mode::Browse;
                self.search_input.clear();
                self.search.flush();
                self.apply_search(String::new());
            }
            KeyCode::Enter => {
                self.state.mode = Mode::Browse;
                self.search.flush();
                self.apply_search(self.search_input.value().to_string());
            }
            KeyCode::Backspace => {
                self.search_input.backspace();
                self.queue_search();
            }
            KeyCode::Delete => {
                self.search_input.delete();
                self.queue_search();
            }
            KeyCode::Left => self.search_input.move_cursor(-1),
            KeyCode::Right => self.search_input.move_cursor(1),
            KeyCode::Home => self.search_input.move_home(),
            KeyCode::End => self.search_input.move_end(),
            KeyCode::Char(ch) => {
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                    self.search_input.insert(ch);
                    self.queue_search();
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn step_initial(&mut self, delta: isize) {
        let buckets: Vec<Option<Initial>> = once(None)
            .chain(('A'..='Z').map(|ch| Some(Initial::Letter(ch))))
            .chain(once(Some(Initial::Other)))
            .collect();
        let current = self.browser.query().initial;
        let index = buckets
            .iter()
            .position(|bucket| *bucket == current)
            .unwrap_or_default();
        let next = buckets[wrap(index, delta, buckets.len())];
        self.browser.set_initial(next);
        self.refresh_records();
        let label = next.map_or_else(|| "todas".to_string(), |initial| initial.key().to_string());
        self.state.set_status(format!(
            "Inicial: {label} ({} juegos)",
            self.state.records.len()
        ));
    }

    fn handle_filter_key(&mut self, key: KeyEvent) -> Result<()> {
        let category = self.filters.category();
        let values = self.browser.facets().values(category);
        match key.code {
            KeyCode::Char('h') | KeyCode::Left => self.filters.move_category(-1),
            KeyCode::Char('l') | KeyCode::Right => self.filters.move_category(1),
            KeyCode::Char('j') | KeyCode::Down => self.filters.move_cursor(1, values.len()),
            KeyCode::Char('k') | KeyCode::Up => self.filters.move_cursor(-1, values.len()),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(value) = values.get(self.filters.cursor) {
                    self.browser.toggle_filter(category, value);
                    self.refresh_records();
                    self.report_matches();
                }
            }
            KeyCode::Char('c') => {
                self.browser.clear_category(category);
                self.refresh_records();
                self.report_matches();
            }
            KeyCode::Char('C') => {
                self.browser.clear_filters();
                self.refresh_records();
                self.report_matches();
            }
            KeyCode::Char('[') => self.adjust_years(-1, 0),
            KeyCode::Char(']') => self.adjust_years(1, 0),
            KeyCode::Char('{') => self.adjust_years(0, -1),
            KeyCode::Char('}') => self.adjust_years(0, 1),
            KeyCode::Char('y') => {
                self.browser.set_year_range(None);
                self.refresh_records();
                self.report_matches();
            }
            _ => {}
        }
        Ok(())
    }

    fn adjust_years(&mut self, min_delta: i32, max_delta: i32) {
        let current = self.browser.effective_year_range();
        let range = YearRange::new(current.min + min_delta, current.max + max_delta);
        debug!(min = range.min, max = range.max, "Year filter adjusted");
        self.browser.set_year_range(Some(range));
        self.refresh_records();
        self.report_matches();
    }

    fn report_matches(&mut self) {
        self.state.set_status(format!(
            "{} de {} juegos coinciden",
            self.state.records.len(),
            self.browser.total()
        ));
    }

    fn handle_calendar_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('h') | KeyCode::Left => self.calendar.shift(-1),
            KeyCode::Char('l') | KeyCode::Right => self.calendar.shift(1),
            KeyCode::Char('t') => {
                self.calendar = CalendarView::starting_at(Local::now().date_naive());
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(form) = self.form.as_mut() else {
            return Ok(());
        };
        match key.code {
            KeyCode::Esc => {
                self.form = None;
                self.state.set_status("Alta cancelada".to_string());
            }
            KeyCode::Enter => {
                let draft = form.to_draft()?;
                self.form = None;
                let record = self.browser.add_game(draft);
                self.refresh_records();
                self.state.select_slug(&record.slug);
                self.state.set_status(format!(
                    "Añadido {} como /{}",
                    record.title(),
                    record.slug
                ));
            }
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
            KeyCode::Left => {
                if form.focused().is_choice() {
                    form.cycle_choice(-1);
                } else if let Some(input) = form.input_mut() {
                    input.move_cursor(-1);
                }
            }
            KeyCode::Right => {
                if form.focused().is_choice() {
                    form.cycle_choice(1);
                } else if let Some(input) = form.input_mut() {
                    input.move_cursor(1);
                }
            }
            KeyCode::Home => {
                if let Some(input) = form.input_mut() {
                    input.move_home();
                }
            }
            KeyCode::End => {
                if let Some(input) = form.input_mut() {
                    input.move_end();
                }
            }
            KeyCode::Backspace => {
                if let Some(input) = form.input_mut() {
                    input.backspace();
                }
            }
            KeyCode::Delete => {
                if let Some(input) = form.input_mut() {
                    input.delete();
                }
            }
            KeyCode::Char(ch) => {
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                    if form.focused().is_choice() {
                        if ch == ' ' {
                            form.cycle_choice(1);
                        }
                    } else if let Some(input) = form.input_mut() {
                        input.insert(ch);
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        match self.screen {
            Screen::Loading => self.draw_loading(frame),
            Screen::Error => self.draw_error(frame),
            _ => self.draw_main(frame),
        }
        if let Some(form) = &self.form {
            self.render_form(frame, form);
        }
    }

    fn draw_loading(&self, frame: &mut Frame) {
        let area = centered_rect(60, 5, frame.size());
        let paragraph = Paragraph::new(vec![
            Line::from(Span::styled(
                "Cargando catálogo…",
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                self.source.clone(),
                Style::default().fg(self.theme.muted),
            )),
        ])
        .block(Block::default().borders(Borders::ALL).title("Venezuela Juega"))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn draw_error(&self, frame: &mut Frame) {
        let area = centered_rect(72, 12, frame.size());
        let message = self
            .load_error
            .clone()
            .unwrap_or_else(|| "Error desconocido".to_string());
        let mut lines: Vec<Line> = message.lines().map(|line| Line::from(line.to_string())).collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "q para salir",
            Style::default().fg(self.theme.muted),
        )));
        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("No se pudo cargar el catálogo")
                    .border_style(Style::default().fg(self.theme.danger)),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn draw_main(&mut self, frame: &mut Frame) {
        let size = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(4),
            ])
            .split(size);

        self.render_tabs(frame, chunks[0]);
        match self.screen {
            Screen::Filters => self.draw_filters(frame, chunks[1]),
            Screen::Stats => self.draw_stats(frame, chunks[1]),
            Screen::Calendar => self.draw_calendar(frame, chunks[1]),
            Screen::Highlights | Screen::Gallery => self.draw_gallery(frame, chunks[1]),
            _ => self.draw_catalog(frame, chunks[1]),
        }
        self.render_status(frame, chunks[2]);
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let mut spans = Vec::new();
        for (screen, key, label) in Screen::TABS {
            let style = if screen == self.screen {
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.primary_fg)
            };
            spans.push(Span::styled(format!(" {key} "), Style::default().fg(self.theme.muted)));
            spans.push(Span::styled(label, style));
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(" a ", Style::default().fg(self.theme.muted)));
        spans.push(Span::raw("Añadir  "));
        spans.push(Span::styled(" q ", Style::default().fg(self.theme.muted)));
        spans.push(Span::raw("Salir"));

        let paragraph = Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL).title("Venezuela Juega"));
        frame.render_widget(paragraph, area);
    }

    fn draw_catalog(&mut self, frame: &mut Frame, area: Rect) {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3)])
            .split(body[0]);

        self.render_search(frame, left[0]);
        self.render_game_list(frame, left[1]);
        self.render_game_info(frame, body[1], self.state.current_record());
    }

    fn draw_gallery(&self, frame: &mut Frame, area: Rect) {
        let records = self.gallery_records();
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);

        let highlights = self.screen == Screen::Highlights;
        let items: Vec<ListItem> = records
            .iter()
            .map(|record| {
                let detail = if highlights {
                    record.highlight_reason().unwrap_or_default().to_string()
                } else {
                    record.developer_line()
                };
                let mut line = vec![Span::styled(
                    record.title().to_string(),
                    Style::default()
                        .fg(self.theme.primary_fg)
                        .add_modifier(Modifier::BOLD),
                )];
                if !detail.is_empty() {
                    line.push(Span::styled(
                        format!(" · {detail}"),
                        Style::default().fg(self.theme.muted),
                    ));
                }
                ListItem::new(Line::from(line))
            })
            .collect();

        let title = if highlights {
            format!("Destacados ({})", records.len())
        } else {
            format!("{} ({})", GALLERY_ORIGIN.label(), records.len())
        };
        let mut list_state = ListState::default();
        let selected = self.gallery_cursor.min(records.len().saturating_sub(1));
        if !records.is_empty() {
            list_state.select(Some(selected));
        }
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_symbol("▶ ")
            .highlight_style(Style::default().bg(self.theme.selection_bg));
        frame.render_stateful_widget(list, body[0], &mut list_state);

        self.render_game_info(frame, body[1], records.get(selected));
    }

    fn render_search(&self, frame: &mut Frame, area: Rect) {
        if self.state.mode == Mode::Jump {
            let paragraph = Paragraph::new(Line::from(vec![
                Span::styled(": ", Style::default().fg(self.theme.accent)),
                Span::raw(self.jump_input.value().to_string()),
            ]))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Ir a /slug")
                    .border_style(Style::default().fg(self.theme.accent)),
            );
            frame.render_widget(paragraph, area);
            let cursor_x = (area.x + 3 + self.jump_input.cursor() as u16)
                .min(area.x + area.width.saturating_sub(2));
            frame.set_cursor(cursor_x, area.y + 1);
            return;
        }

        let searching = self.state.mode == Mode::Search;
        let border = if searching {
            self.theme.accent
        } else {
            self.theme.muted
        };
        let content = if searching || !self.search_input.value().is_empty() {
            Line::from(vec![
                Span::styled("/ ", Style::default().fg(self.theme.accent)),
                Span::raw(self.search_input.value().to_string()),
            ])
        } else {
            Line::from(Span::styled(
                "/ para buscar",
                Style::default().fg(self.theme.muted),
            ))
        };
        let paragraph = Paragraph::new(content).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Buscar")
                .border_style(Style::default().fg(border)),
        );
        frame.render_widget(paragraph, area);

        if searching {
            let cursor_x = (area.x + 3 + self.search_input.cursor() as u16)
                .min(area.x + area.width.saturating_sub(2));
            frame.set_cursor(cursor_x, area.y + 1);
        }
    }

    fn render_game_list(&mut self, frame: &mut Frame, area: Rect) {
        self.state.list_height = area.height.saturating_sub(2) as usize;
        self.state.clamp_cursor();
        self.state.ensure_cursor_visible();

        let mut list_state = ListState::default();
        let height = area.height.saturating_sub(2) as usize;
        let games = self.state.visible_records(height);
        if !games.is_empty() {
            let selected = self
                .state
                .cursor
                .saturating_sub(self.state.offset)
                .min(games.len().saturating_sub(1));
            list_state.select(Some(selected));
        }
        let items: Vec<ListItem> = games
            .iter()
            .enumerate()
            .map(|(idx, game)| {
                let is_selected = self.state.cursor == self.state.offset + idx;
                let marker = if is_selected {
                    Span::styled(
                        "▶ ",
                        Style::default()
                            .fg(self.theme.accent)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if game.game.is_highlighted {
                    Span::styled("★ ", Style::default().fg(self.theme.warning))
                } else {
                    Span::raw("  ")
                };
                let title = Span::styled(
                    game.title().to_string(),
                    Style::default()
                        .fg(self.theme.primary_fg)
                        .add_modifier(Modifier::BOLD),
                );
                let mut line = vec![marker, title];
                if !game.game.developers.is_empty() {
                    line.push(Span::styled(
                        format!(" · {}", game.developer_line()),
                        Style::default().fg(self.theme.muted),
                    ));
                }
                ListItem::new(Line::from(line))
            })
            .collect();

        let mut title = format!("Juegos ({}/{})", self.state.records.len(), self.browser.total());
        if let Some(initial) = self.browser.query().initial {
            title.push_str(&format!(" · {}", initial.key()));
        }
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().bg(self.theme.selection_bg));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_game_info(&self, frame: &mut Frame, area: Rect, record: Option<&GameRecord>) {
        let block = Block::default().borders(Borders::ALL).title("Detalle");
        let Some(record) = record else {
            let paragraph = Paragraph::new("Ningún juego coincide").block(block);
            frame.render_widget(paragraph, area);
            return;
        };

        let game = &record.game;
        let label = Style::default().fg(self.theme.muted);
        let mut lines = vec![
            Line::from(Span::styled(
                game.title.clone(),
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(format!("/{}", record.slug), label)),
            Line::from(""),
        ];
        let mut field = |name: &str, value: String| {
            if !value.is_empty() {
                lines.push(Line::from(vec![
                    Span::styled(format!("{name}: "), label),
                    Span::raw(value),
                ]));
            }
        };
        field("Desarrollo", record.developer_line());
        field("Distribución", game.publishers.join(", "));
        field("Plataformas", game.platform.join(", "));
        field("Géneros", game.genre.join(", "));
        field("Estado", game.status.label().to_string());
        field(
            "Origen",
            game.origin.map(|origin| origin.label().to_string()).unwrap_or_default(),
        );
        field("Lanzamiento", game.release_date.clone());
        field(
            "Actualizado",
            game.last_update_date.clone().unwrap_or_default(),
        );
        field("Motor", game.engine.clone());
        field("Idiomas", game.languages.join(", "));
        field("Financiamiento", game.funding.clone().unwrap_or_default());
        field("Presskit", game.press_kit_url.clone().unwrap_or_default());
        field("Trailer", game.trailer_url.clone().unwrap_or_default());
        field(
            "Imagen",
            record.display_image().map(str::to_string).unwrap_or_default(),
        );
        field(
            "Capturas",
            if game.screenshots.is_empty() {
                String::new()
            } else {
                game.screenshots.len().to_string()
            },
        );

        if let Some(reason) = record.highlight_reason() {
            lines.push(Line::from(Span::styled(
                format!("★ {reason}"),
                Style::default().fg(self.theme.warning),
            )));
        }
        if !game.stores.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("Tiendas", label)));
            for store in &game.stores {
                lines.push(Line::from(format!("  {}: {}", store.name, store.url)));
            }
        }
        if !game.links.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("Enlaces", label)));
            for link in &game.links {
                lines.push(Line::from(format!("  {}: {}", link.name, link.url)));
            }
        }
        if let Some(pitch) = &game.pitch {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                pitch.clone(),
                Style::default().add_modifier(Modifier::ITALIC),
            )));
        }
        if !game.description.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(game.description.clone()));
        }

        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn draw_filters(&self, frame: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(22),
                Constraint::Min(20),
                Constraint::Length(36),
            ])
            .split(area);

        let query = self.browser.query();
        let categories: Vec<ListItem> = FilterCategory::ALL
            .iter()
            .map(|category| {
                let count = query.selected(*category).count();
                let text = if count > 0 {
                    format!("{} ({count})", category.label())
                } else {
                    category.label().to_string()
                };
                ListItem::new(text)
            })
            .collect();
        let mut category_state = ListState::default();
        category_state.select(Some(self.filters.category));
        let categories = List::new(categories)
            .block(Block::default().borders(Borders::ALL).title("Categoría"))
            .highlight_style(
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_stateful_widget(categories, columns[0], &mut category_state);

        let category = self.filters.category();
        let values = self.browser.facets().values(category);
        let items: Vec<ListItem> = values
            .iter()
            .map(|value| {
                let checked = query.is_selected(category, value);
                let marker = if checked { "[x] " } else { "[ ] " };
                let style = if checked {
                    Style::default().fg(self.theme.success)
                } else {
                    Style::default().fg(self.theme.primary_fg)
                };
                ListItem::new(Line::from(Span::styled(format!("{marker}{value}"), style)))
            })
            .collect();
        let mut value_state = ListState::default();
        if !values.is_empty() {
            value_state.select(Some(self.filters.cursor.min(values.len() - 1)));
        }
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(category.label()),
            )
            .highlight_style(Style::default().bg(self.theme.selection_bg));
        frame.render_stateful_widget(list, columns[1], &mut value_state);

        let years = self.browser.effective_year_range();
        let bounds = self.browser.year_bounds();
        let year_line = if query.year_range.is_some() {
            format!("Años: {}–{}", years.min, years.max)
        } else {
            format!("Años: todos ({}–{})", bounds.min, bounds.max)
        };
        let summary = vec![
            Line::from(format!(
                "{} de {} juegos",
                self.state.records.len(),
                self.browser.total()
            )),
            Line::from(year_line),
            Line::from(""),
            Line::from(Span::styled(
                "←/→ categoría  ↑/↓ valor",
                Style::default().fg(self.theme.muted),
            )),
            Line::from(Span::styled(
                "Espacio marcar  c limpiar  C todo",
                Style::default().fg(self.theme.muted),
            )),
            Line::from(Span::styled(
                "[ ] año mínimo  { } año máximo",
                Style::default().fg(self.theme.muted),
            )),
            Line::from(Span::styled(
                "y quitar filtro de años",
                Style::default().fg(self.theme.muted),
            )),
        ];
        let paragraph = Paragraph::new(summary)
            .block(Block::default().borders(Borders::ALL).title("Resumen"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, columns[2]);
    }

    fn draw_stats(&self, frame: &mut Frame, area: Rect) {
        let stats = self.browser.stats();
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(34),
                Constraint::Percentage(33),
                Constraint::Percentage(33),
            ])
            .split(area);

        self.render_counts(
            frame,
            columns[0],
            format!("Plataformas ({})", stats.platforms.len()),
            stats.top_platforms(TOP_COUNTS),
        );
        self.render_counts(
            frame,
            columns[1],
            format!("Géneros ({})", stats.genres.len()),
            stats.top_genres(TOP_COUNTS),
        );
        self.render_counts(
            frame,
            columns[2],
            format!("Estados · {} juegos", stats.total),
            stats
                .statuses
                .iter()
                .map(|(status, count)| (status.label().to_string(), *count))
                .collect(),
        );
    }

    fn render_counts(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: String,
        rows: Vec<(String, usize)>,
    ) {
        let items: Vec<ListItem> = rows
            .into_iter()
            .map(|(name, count)| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{count:>4} "), Style::default().fg(self.theme.accent)),
                    Span::raw(name),
                ]))
            })
            .collect();
        let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(list, area);
    }

    fn draw_calendar(&self, frame: &mut Frame, area: Rect) {
        let events = self.browser.calendar();
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);

        let month: Vec<ListItem> = events_in_month(&events, self.calendar.year, self.calendar.month)
            .into_iter()
            .map(|event| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{:>2} ", event.date.day()),
                        Style::default().fg(self.theme.accent),
                    ),
                    Span::raw(event.title.clone()),
                ]))
            })
            .collect();
        let month_title = format!("◀ {} ▶", self.calendar.title());
        let month_list = if month.is_empty() {
            List::new(vec![ListItem::new(Span::styled(
                "Sin lanzamientos con fecha",
                Style::default().fg(self.theme.muted),
            ))])
        } else {
            List::new(month)
        };
        frame.render_widget(
            month_list.block(Block::default().borders(Borders::ALL).title(month_title)),
            columns[0],
        );

        let today = Local::now().date_naive();
        let next: Vec<ListItem> = upcoming(&events, today, UPCOMING_LIMIT)
            .into_iter()
            .map(|event| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{} ", event.date.format("%d/%m/%Y")),
                        Style::default().fg(self.theme.accent),
                    ),
                    Span::raw(event.title.clone()),
                ]))
            })
            .collect();
        frame.render_widget(
            List::new(next).block(Block::default().borders(Borders::ALL).title("Próximos")),
            columns[1],
        );
    }

    fn render_form(&self, frame: &mut Frame, form: &AddGameForm) {
        let frame_area = frame.size();
        let width = cmp::max(cmp::min(70_u16, frame_area.width.saturating_sub(4)), 30_u16);
        let height = (Field::ALL.len() as u16 + 4).min(frame_area.height);
        let area = centered_rect(width, height, frame_area);
        frame.render_widget(Clear, area);

        let label_width = Field::ALL
            .iter()
            .map(|field| field.label().chars().count())
            .max()
            .unwrap_or_default();
        let mut lines: Vec<Line> = Field::ALL
            .iter()
            .map(|field| {
                let focused = *field == form.focused();
                let label_style = if focused {
                    Style::default()
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(self.theme.muted)
                };
                let value = if field.is_choice() {
                    format!("◀ {} ▶", form.display(*field))
                } else {
                    form.display(*field)
                };
                Line::from(vec![
                    Span::styled(format!("{:<label_width$} ", field.label()), label_style),
                    Span::raw(value),
                ])
            })
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" guardar  "),
            Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" siguiente  "),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" cancelar"),
        ]));

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Añadir juego"));
        frame.render_widget(paragraph, area);

        let focused = form.focused();
        if !focused.is_choice() {
            let row = Field::ALL
                .iter()
                .position(|field| *field == focused)
                .unwrap_or_default() as u16;
            let cursor_x = (area.x + 2 + label_width as u16 + form.input(focused).cursor() as u16)
                .min(area.x + area.width.saturating_sub(2));
            frame.set_cursor(cursor_x, area.y + 1 + row);
        }
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Estado");
        let primary = if self.state.mode == Mode::Search && self.search.is_pending() {
            format!("Buscando: {}", self.search_input.value())
        } else {
            self.state.status.clone()
        };
        let secondary = self
            .browser
            .report()
            .map(|report| report.summary())
            .unwrap_or_else(|| self.source.clone());
        let paragraph = Paragraph::new(vec![
            Line::from(primary),
            Line::from(Span::styled(secondary, Style::default().fg(self.theme.muted))),
        ])
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

struct UiState {
    records: Vec<GameRecord>,
    cursor: usize,
    offset: usize,
    list_height: usize,
    status: String,
    mode: Mode,
    should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            cursor: 0,
            offset: 0,
            list_height: 1,
            status: "Listo".to_string(),
            mode: Mode::Browse,
            should_quit: false,
        }
    }
}

impl UiState {
    /// Replace the visible records, keeping the selected game when it survives.
    fn set_records(&mut self, records: Vec<GameRecord>) {
        let selected = self.current_record().map(|record| record.slug.clone());
        self.records = records;
        self.cursor = 0;
        self.offset = 0;
        if let Some(slug) = selected {
            self.select_slug(&slug);
        }
    }

    fn select_slug(&mut self, slug: &str) -> bool {
        match self.records.iter().position(|record| record.slug == slug) {
            Some(pos) => {
                self.cursor = pos;
                self.ensure_cursor_visible();
                true
            }
            None => false,
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.records.is_empty() {
            return;
        }
        let len = self.records.len() as isize;
        let idx = (self.cursor as isize + delta).clamp(0, len - 1);
        self.cursor = idx as usize;
        self.ensure_cursor_visible();
    }

    fn move_to(&mut self, index: usize) {
        if self.records.is_empty() {
            return;
        }
        self.cursor = index.min(self.records.len() - 1);
        self.ensure_cursor_visible();
    }

    fn move_to_end(&mut self) {
        if self.records.is_empty() {
            return;
        }
        self.cursor = self.records.len() - 1;
        self.ensure_cursor_visible();
    }

    fn page_down(&mut self) {
        if self.records.is_empty() || self.list_height == 0 {
            return;
        }
        let delta = self.list_height.min(self.records.len());
        self.move_cursor(delta as isize);
    }

    fn page_up(&mut self) {
        if self.records.is_empty() || self.list_height == 0 {
            return;
        }
        let delta = self.list_height.min(self.records.len());
        self.move_cursor(-(delta as isize));
    }

    fn visible_records(&self, height: usize) -> &[GameRecord] {
        if self.records.is_empty() {
            return &[];
        }
        let end = (self.offset + height).min(self.records.len());
        &self.records[self.offset..end]
    }

    fn current_record(&self) -> Option<&GameRecord> {
        self.records.get(self.cursor)
    }

    fn set_status(&mut self, message: String) {
        self.status = message;
    }

    fn clamp_cursor(&mut self) {
        if self.records.is_empty() {
            self.cursor = 0;
            self.offset = 0;
        } else if self.cursor >= self.records.len() {
            self.cursor = self.records.len() - 1;
        }
    }

    fn ensure_cursor_visible(&mut self) {
        if self.records.is_empty() || self.list_height == 0 {
            self.offset = 0;
            return;
        }
        let height = self.list_height;
        let max_offset = self.records.len().saturating_sub(height);

        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + height {
            self.offset = self.cursor + 1 - height;
        }

        if self.offset > max_offset {
            self.offset = max_offset;
        }
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use vjuega_core::{
        models::GameStatus,
        resource::{CatalogLoader, InlineSource},
    };

    const SHEET: &str = "\
Título del videojuego,Desarrollador(es),Género(s),Plataforma(s),Estado actual,Fecha de lanzamiento,Destacado,Descripción del Destacado,Origen inicial
Alpha,Estudio Uno,RPG,PC,Publicado,3/15/2021,TRUE,Premio Nacional,GameJam+ 25/26
Beta,Estudio Dos,Puzzle,\"PC, Switch\",Pausado,2023,,,Desde casa
Gamma,Estudio Uno,RPG,Android,,TBA,FALSE,,GameJam+ 25/26
";

    async fn loaded_app() -> Result<VjuegaApp> {
        let (catalog, report) = CatalogLoader::new(InlineSource::new("inline", SHEET))
            .load()
            .await?;
        let mut app = VjuegaApp::new(CatalogBrowser::default(), "inline".to_string(), Duration::ZERO);
        app.handle_load_event(LoadEvent::Loaded { catalog, report });
        Ok(app)
    }

    fn press(app: &mut VjuegaApp, code: KeyCode) {
        let key = KeyEvent::new(code, KeyModifiers::NONE);
        assert!(app.process_app_event(Some(AppEvent::Input(Event::Key(key)))));
    }

    fn type_text(app: &mut VjuegaApp, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    fn titles(app: &VjuegaApp) -> Vec<&str> {
        app.state.records.iter().map(GameRecord::title).collect()
    }

    fn screen_text(app: &mut VjuegaApp) -> Result<String> {
        let mut terminal = Terminal::new(TestBackend::new(120, 32))?;
        terminal.draw(|frame| app.draw(frame))?;
        Ok(terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect())
    }

    #[tokio::test]
    async fn load_event_switches_to_catalog() -> Result<()> {
        let app = loaded_app().await?;
        assert_eq!(app.screen, Screen::Catalog);
        assert_eq!(titles(&app), vec!["Alpha", "Beta", "Gamma"]);
        assert!(app.state.status.starts_with("3 games from inline"));
        Ok(())
    }

    #[tokio::test]
    async fn failed_load_blocks_on_error_screen() -> Result<()> {
        let result = CatalogLoader::new(InlineSource::new("inline", "a,b\n")).load().await;
        let Err(err) = result else {
            anyhow::bail!("load should fail without a header");
        };
        let mut app = VjuegaApp::new(CatalogBrowser::default(), "inline".to_string(), Duration::ZERO);
        app.handle_load_event(LoadEvent::Failed(err));
        assert_eq!(app.screen, Screen::Error);

        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.screen, Screen::Error);
        assert!(screen_text(&mut app)?.contains("No se pudo cargar"));

        press(&mut app, KeyCode::Char('q'));
        assert!(app.state.should_quit);
        Ok(())
    }

    #[tokio::test]
    async fn search_applies_after_debounce_tick() -> Result<()> {
        let mut app = loaded_app().await?;
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "estudio uno");
        assert_eq!(app.state.records.len(), 3);

        assert!(app.process_app_event(Some(AppEvent::Tick)));
        assert_eq!(titles(&app), vec!["Alpha", "Gamma"]);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state.mode, Mode::Browse);
        assert_eq!(app.state.records.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn filter_panel_toggles_and_clears() -> Result<()> {
        let mut app = loaded_app().await?;
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.screen, Screen::Filters);

        // Status values come in enum order, so "Pausado" sits at index 4.
        for _ in 0..4 {
            press(&mut app, KeyCode::Down);
        }
        press(&mut app, KeyCode::Char(' '));
        assert!(app
            .browser
            .query()
            .is_selected(FilterCategory::Status, GameStatus::OnHold.label()));
        assert_eq!(titles(&app), vec!["Beta"]);

        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.state.records.is_empty());

        press(&mut app, KeyCode::Char('C'));
        assert_eq!(app.state.records.len(), 3);
        assert!(screen_text(&mut app)?.contains("Categoría"));
        Ok(())
    }

    #[tokio::test]
    async fn year_keys_narrow_the_range() -> Result<()> {
        let mut app = loaded_app().await?;
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char(']'));
        assert_eq!(
            app.browser.query().year_range,
            Some(YearRange::new(2022, 2023))
        );
        assert_eq!(titles(&app), vec!["Beta"]);

        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.browser.query().year_range, None);
        assert_eq!(app.state.records.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn add_game_form_inserts_and_selects() -> Result<()> {
        let mut app = loaded_app().await?;
        press(&mut app, KeyCode::Char('a'));
        assert!(app.form.is_some());

        press(&mut app, KeyCode::Enter);
        assert!(app.form.is_some());
        assert!(app.state.status.starts_with("Error"));

        type_text(&mut app, "Alpha");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "PC");
        press(&mut app, KeyCode::Enter);

        assert!(app.form.is_none());
        assert_eq!(app.state.records[0].slug, "alpha-1");
        assert_eq!(app.state.current_record().map(|r| r.id), Some(4));
        assert_eq!(app.browser.total(), 4);
        Ok(())
    }

    #[tokio::test]
    async fn initial_index_steps_through_letters() -> Result<()> {
        let mut app = loaded_app().await?;
        press(&mut app, KeyCode::Right);
        assert_eq!(titles(&app), vec!["Alpha"]);
        press(&mut app, KeyCode::Right);
        assert_eq!(titles(&app), vec!["Beta"]);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.browser.query().initial, None);
        assert_eq!(app.state.records.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn screens_render_their_panels() -> Result<()> {
        let mut app = loaded_app().await?;
        assert!(screen_text(&mut app)?.contains("Estudio Uno"));

        press(&mut app, KeyCode::Char('3'));
        let stats = screen_text(&mut app)?;
        assert!(stats.contains("Plataformas"));
        assert!(stats.contains("Pausado"));

        press(&mut app, KeyCode::Char('4'));
        app.calendar = CalendarView { year: 2021, month: 3 };
        assert!(screen_text(&mut app)?.contains("Alpha"));
        Ok(())
    }

    #[tokio::test]
    async fn highlight_and_gallery_tabs_list_their_games() -> Result<()> {
        let mut app = loaded_app().await?;
        press(&mut app, KeyCode::Char('5'));
        assert_eq!(app.screen, Screen::Highlights);
        let text = screen_text(&mut app)?;
        assert!(text.contains("Destacados (1)"));
        assert!(text.contains("Premio Nacional"));

        press(&mut app, KeyCode::Char('6'));
        assert_eq!(app.screen, Screen::Gallery);
        let text = screen_text(&mut app)?;
        assert!(text.contains("GameJam+ 25/26 (2)"));
        assert!(text.contains("Gamma"));

        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, Screen::Catalog);
        assert_eq!(app.state.current_record().map(GameRecord::title), Some("Gamma"));
        Ok(())
    }

    #[tokio::test]
    async fn slug_jump_reveals_filtered_out_game() -> Result<()> {
        let mut app = loaded_app().await?;
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "beta");
        press(&mut app, KeyCode::Enter);
        assert_eq!(titles(&app), vec!["Beta"]);

        press(&mut app, KeyCode::Char(':'));
        type_text(&mut app, "/GAM");
        assert!(screen_text(&mut app)?.contains("Ir a /slug"));
        type_text(&mut app, "MA");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.state.mode, Mode::Browse);
        assert_eq!(app.state.records.len(), 3);
        assert_eq!(app.state.current_record().map(|r| r.slug.as_str()), Some("gamma"));
        assert_eq!(app.browser.query().search, "");
        assert_eq!(app.search_input.value(), "");

        press(&mut app, KeyCode::Char(':'));
        type_text(&mut app, "nope");
        press(&mut app, KeyCode::Enter);
        assert!(app.state.status.starts_with("No hay ningún juego"));
        assert_eq!(app.state.current_record().map(|r| r.slug.as_str()), Some("gamma"));
        Ok(())
    }

    #[tokio::test]
    async fn closed_loader_without_result_is_an_error() -> Result<()> {
        let mut app = VjuegaApp::new(CatalogBrowser::default(), "inline".to_string(), Duration::ZERO);
        app.handle_load_closed();
        assert_eq!(app.screen, Screen::Error);
        assert!(screen_text(&mut app)?.contains("No se pudo cargar"));

        let mut app = loaded_app().await?;
        app.handle_load_closed();
        assert_eq!(app.screen, Screen::Catalog);
        Ok(())
    }

    #[test]
    fn calendar_view_wraps_years() {
        let mut view = CalendarView { year: 2024, month: 1 };
        view.shift(-1);
        assert_eq!((view.year, view.month), (2023, 12));
        view.shift(13);
        assert_eq!((view.year, view.month), (2025, 1));
        assert_eq!(view.title(), "Enero 2025");
    }

    #[test]
    fn ui_state_keeps_cursor_visible() {
        let mut state = UiState {
            list_height: 2,
            ..UiState::default()
        };
        let records: Vec<GameRecord> = (1..=5)
            .map(|id| {
                GameRecord::new(
                    id,
                    format!("game-{id}"),
                    vjuega_core::GameDraft::titled(format!("Game {id}")),
                )
            })
            .collect();
        state.set_records(records.clone());
        state.move_to_end();
        assert_eq!((state.cursor, state.offset), (4, 3));
        state.page_up();
        assert_eq!((state.cursor, state.offset), (2, 2));

        state.set_records(records[1..4].to_vec());
        assert_eq!(state.current_record().map(|r| r.slug.as_str()), Some("game-3"));
        assert!(!state.select_slug("game-9"));
    }
}
