//! Interactive search console.
//!
//! A TUI with a search input, a progress gauge, the resolved player header,
//! the result cards and a navigation sidebar that follows the scroll
//! position.
//!
//! Launch with `cubelytics [QUERY]`.

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use cubelytics_client::{SearchController, SearchError, SearchUpdate, StreamProgress, Transport, Update};
use cubelytics_protocol::{Platform, PlayerIdentity};
use cubelytics_render::{CardStatus, ScrollSpy, Surface, Viewport};

use crate::layout::{surface_lines, BodyLine, LineKind};

const PAGE_LINES: usize = 10;

/// Console state between frames.
pub struct SearchConsole {
    controller: SearchController,
    updates: mpsc::UnboundedReceiver<Update>,
    /// Current text in the input field.
    input: String,
    /// Cursor position within the input field, in characters.
    cursor_pos: usize,
    last_query: Option<String>,
    progress: Option<StreamProgress>,
    player: Option<PlayerIdentity>,
    surface: Option<Surface>,
    error: Option<String>,
    /// First visible line of the cards column.
    scroll: usize,
    /// Height of the cards column at the last render.
    viewport_height: usize,
    spy: ScrollSpy,
    expand_cards: bool,
    finished_at: Option<chrono::DateTime<chrono::Local>>,
}

impl SearchConsole {
    pub fn new(transport: Arc<dyn Transport>, linger: Duration, expand_cards: bool) -> Self {
        let (controller, updates) = SearchController::new(transport, linger);
        Self {
            controller,
            updates,
            input: String::new(),
            cursor_pos: 0,
            last_query: None,
            progress: None,
            player: None,
            surface: None,
            error: None,
            scroll: 0,
            viewport_height: 0,
            spy: ScrollSpy::new(),
            expand_cards,
            finished_at: None,
        }
    }

    pub fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
        self.cursor_pos = self.input.chars().count();
    }

    pub fn is_searching(&self) -> bool {
        self.controller.is_running()
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn progress(&self) -> Option<StreamProgress> {
        self.progress
    }

    pub fn active_card(&self) -> Option<usize> {
        self.spy.active()
    }

    /// Submit the input as a new search. Blank input and submissions while a
    /// search is running are ignored.
    pub fn submit(&mut self) {
        let query = self.input.trim().to_string();
        match self.controller.submit(&query) {
            Ok(generation) => {
                tracing::debug!(generation, query = %query, "Search submitted");
                self.last_query = Some(query);
            }
            Err(SearchError::EmptyQuery) => {}
            Err(SearchError::Busy) => tracing::debug!("Search already running"),
        }
    }

    /// Apply every pending update from the current search.
    pub fn drain_updates(&mut self) {
        while let Ok(update) = self.updates.try_recv() {
            if self.controller.accepts(&update) {
                self.apply(update.update);
            }
        }
    }

    /// Wait for the next update and apply it; `false` once the channel is
    /// closed.
    pub async fn next_update(&mut self) -> bool {
        match self.updates.recv().await {
            Some(update) => {
                if self.controller.accepts(&update) {
                    self.apply(update.update);
                }
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, update: SearchUpdate) {
        match update {
            SearchUpdate::Started { .. } => {
                self.player = None;
                self.surface = None;
                self.error = None;
                self.progress = Some(StreamProgress::new());
                self.scroll = 0;
                self.spy.reset();
                self.finished_at = None;
            }
            SearchUpdate::PlayerResolved(player) => self.player = Some(player),
            SearchUpdate::Progress(progress) => self.progress = Some(progress),
            SearchUpdate::Rendered(mut surface) => {
                for card in &mut surface.cards {
                    card.expanded = self.expand_cards;
                }
                self.surface = Some(surface);
                self.finished_at = Some(chrono::Local::now());
                self.update_spy();
            }
            SearchUpdate::Failed(message) => {
                self.error = Some(message);
                self.progress = None;
            }
            SearchUpdate::ProgressCollapsed => self.progress = None,
        }
    }

    fn card_layout(&self) -> (Vec<BodyLine>, Vec<std::ops::Range<usize>>) {
        match &self.surface {
            Some(surface) => surface_lines(&surface.cards),
            None => (Vec::new(), Vec::new()),
        }
    }

    fn update_spy(&mut self) {
        let (_, extents) = self.card_layout();
        let viewport = Viewport::new(self.scroll, self.viewport_height.max(1));
        self.spy.observe(&extents, viewport);
    }

    fn scroll_by(&mut self, delta: isize) {
        let (lines, _) = self.card_layout();
        let max = lines.len().saturating_sub(1);
        self.scroll = self.scroll.saturating_add_signed(delta).min(max);
        self.update_spy();
    }

    /// Scroll so the next (or previous) card starts at the top.
    fn jump_card(&mut self, forward: bool) {
        let (_, extents) = self.card_layout();
        if extents.is_empty() {
            return;
        }
        let current = self.spy.active().unwrap_or(0);
        let target = if forward {
            (current + 1).min(extents.len() - 1)
        } else {
            current.saturating_sub(1)
        };
        self.scroll = extents[target].start;
        self.spy.activate(target);
    }

    fn toggle_active_card(&mut self) {
        let Some(index) = self.spy.active() else {
            return;
        };
        if let Some(card) = self.surface.as_mut().and_then(|s| s.cards.get_mut(index)) {
            card.toggle();
        }
        self.update_spy();
    }

    /// Handle keyboard input. Returns `true` if the console should exit.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        match (code, modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Esc, _) => return true,
            (KeyCode::Enter, _) => self.submit(),
            (KeyCode::Char(' '), _) if self.input.is_empty() => self.toggle_active_card(),
            (KeyCode::Char(c), _) => {
                let at = byte_index(&self.input, self.cursor_pos);
                self.input.insert(at, c);
                self.cursor_pos += 1;
            }
            (KeyCode::Backspace, _) => {
                if self.cursor_pos > 0 {
                    let at = byte_index(&self.input, self.cursor_pos - 1);
                    self.input.remove(at);
                    self.cursor_pos -= 1;
                }
            }
            (KeyCode::Delete, _) => {
                if self.cursor_pos < self.input.chars().count() {
                    let at = byte_index(&self.input, self.cursor_pos);
                    self.input.remove(at);
                }
            }
            (KeyCode::Left, _) => self.cursor_pos = self.cursor_pos.saturating_sub(1),
            (KeyCode::Right, _) => {
                self.cursor_pos = (self.cursor_pos + 1).min(self.input.chars().count());
            }
            (KeyCode::Home, _) => self.cursor_pos = 0,
            (KeyCode::End, _) => self.cursor_pos = self.input.chars().count(),
            (KeyCode::Up, _) => self.scroll_by(-1),
            (KeyCode::Down, _) => self.scroll_by(1),
            (KeyCode::PageUp, _) => self.scroll_by(-(PAGE_LINES as isize)),
            (KeyCode::PageDown, _) => self.scroll_by(PAGE_LINES as isize),
            (KeyCode::Tab, _) => self.jump_card(true),
            (KeyCode::BackTab, _) => self.jump_card(false),
            _ => {}
        }
        false
    }

    /// Render the full console layout.
    fn render(&mut self, frame: &mut Frame) {
        let header_height = if self.player.is_some() { 5 } else { 0 };
        let status_height = if self.progress.is_some() || self.error.is_some() { 3 } else { 0 };
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),             // Input
                Constraint::Length(status_height), // Progress or error
                Constraint::Length(header_height), // Player
                Constraint::Min(5),                // Cards + navigation
            ])
            .split(frame.area());

        self.render_input(frame, outer[0]);
        self.render_status(frame, outer[1]);
        self.render_player(frame, outer[2]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
            .split(outer[3]);

        self.viewport_height = columns[0].height.saturating_sub(2) as usize;
        self.update_spy();
        self.render_cards(frame, columns[0]);
        self.render_nav(frame, columns[1]);
    }

    fn render_input(&self, frame: &mut Frame, area: Rect) {
        let title = if self.is_searching() {
            " Search (running…, Esc = quit) "
        } else {
            " Search (Enter = submit, Tab = next card, Space = toggle, Esc = quit) "
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green));

        let line = if self.input.is_empty() {
            Line::from(vec![
                Span::styled(" > ", Style::default().fg(Color::Green)),
                Span::styled("Username or UUID…", Style::default().fg(Color::DarkGray)),
            ])
        } else {
            Line::from(vec![
                Span::styled(" > ", Style::default().fg(Color::Green)),
                Span::styled(self.input.as_str(), Style::default().fg(Color::White)),
            ])
        };
        frame.render_widget(Paragraph::new(line).block(block), area);

        let cursor_x = area.x + 4 + self.cursor_pos as u16;
        frame.set_cursor_position((cursor_x, area.y + 1));
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        if area.height == 0 {
            return;
        }
        if let Some(error) = &self.error {
            let block = Block::default()
                .title(" Error ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red));
            let text = Paragraph::new(Span::styled(error.as_str(), Style::default().fg(Color::Red))).block(block);
            frame.render_widget(text, area);
            return;
        }
        if let Some(progress) = &self.progress {
            let gauge = Gauge::default()
                .block(Block::default().title(format!(" {} ", progress.label())).borders(Borders::ALL))
                .gauge_style(Style::default().fg(Color::Cyan))
                .ratio(progress.ratio().clamp(0.0, 1.0))
                .label(progress.count_text());
            frame.render_widget(gauge, area);
        }
    }

    fn render_player(&self, frame: &mut Frame, area: Rect) {
        let Some(player) = &self.player else {
            return;
        };
        let badge = match player.platform {
            Platform::Bedrock => Span::styled(" 🪨 Bedrock ", Style::default().fg(Color::Black).bg(Color::Gray)),
            Platform::Java => Span::styled(" ☕ Java ", Style::default().fg(Color::Black).bg(Color::Yellow)),
        };
        let lines = vec![
            Line::from(vec![
                Span::styled(
                    format!(" {} ", player.display_name),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
                badge,
            ]),
            Line::from(Span::styled(
                format!(" {}", player.id.display_line()),
                Style::default().fg(Color::Gray),
            )),
            Line::from(Span::styled(
                format!(" Skin: {}", player.avatar.display_url()),
                Style::default().fg(Color::DarkGray),
            )),
        ];
        let title = match &self.last_query {
            Some(query) => format!(" Player ({query}) "),
            None => " Player ".to_string(),
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_cards(&self, frame: &mut Frame, area: Rect) {
        let title = match (&self.surface, self.finished_at) {
            (Some(surface), Some(at)) => format!(" Sources ({}, {}) ", surface.cards.len(), at.format("%H:%M:%S")),
            _ => " Sources ".to_string(),
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White));

        let (lines, extents) = self.card_layout();
        if lines.is_empty() {
            let hint = match (&self.surface, self.is_searching()) {
                (Some(_), _) => "  No sources returned.",
                (None, true) => "  Waiting for results…",
                (None, false) => "  Enter a username or UUID to search.",
            };
            let text = Paragraph::new(Span::styled(hint, Style::default().fg(Color::DarkGray))).block(block);
            frame.render_widget(text, area);
            return;
        }

        let statuses: Vec<CardStatus> = self
            .surface
            .as_ref()
            .map(|s| s.cards.iter().map(|c| c.status).collect())
            .unwrap_or_default();
        let card_at = |line: usize| extents.iter().position(|e| e.contains(&line));

        let styled: Vec<Line> = lines
            .iter()
            .enumerate()
            .skip(self.scroll)
            .take(area.height.saturating_sub(2) as usize)
            .map(|(i, line)| {
                let status = card_at(i).and_then(|c| statuses.get(c).copied());
                styled_line(line, status)
            })
            .collect();
        frame.render_widget(Paragraph::new(styled).block(block), area);
    }

    fn render_nav(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Navigation ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White));

        let Some(surface) = &self.surface else {
            frame.render_widget(block, area);
            return;
        };

        let lines: Vec<Line> = surface
            .nav
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let marker_color = match entry.status {
                    CardStatus::Ok => Color::Green,
                    CardStatus::Failed => Color::Red,
                };
                let mut label_style = Style::default().fg(Color::White);
                if self.spy.is_active(i) {
                    label_style = label_style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
                }
                Line::from(vec![
                    Span::raw(format!(" {} ", entry.icon)),
                    Span::styled(entry.label.as_str(), label_style),
                    Span::styled(format!(" {}", entry.status.marker()), Style::default().fg(marker_color)),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

fn styled_line(line: &BodyLine, status: Option<CardStatus>) -> Line<'static> {
    let indent = "  ".repeat(line.depth + 1);
    match &line.kind {
        LineKind::CardHeader => {
            let color = match status {
                Some(CardStatus::Failed) => Color::Red,
                _ => Color::Green,
            };
            Line::from(Span::styled(
                format!(" {}", line.text),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
        }
        LineKind::Heading => Line::from(Span::styled(
            format!("{indent}{}", line.text),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        LineKind::Field { key, value } => Line::from(vec![
            Span::styled(format!("{indent}{key}: "), Style::default().fg(Color::Gray)),
            Span::styled(value.clone(), Style::default().fg(Color::White)),
        ]),
        LineKind::TableHeader => Line::from(Span::styled(
            format!("{indent}{}", line.text),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::UNDERLINED),
        )),
        LineKind::TableRow => Line::from(format!("{indent}{}", line.text)),
        LineKind::Placeholder => Line::from(Span::styled(
            format!("{indent}{}", line.text),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
        LineKind::Warning => Line::from(Span::styled(
            format!("{indent}{}", line.text),
            Style::default().fg(Color::Yellow),
        )),
        LineKind::Blank => Line::from(""),
    }
}

fn byte_index(text: &str, char_pos: usize) -> usize {
    text.char_indices().nth(char_pos).map(|(i, _)| i).unwrap_or(text.len())
}

/// Set up the terminal for TUI rendering.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Leave raw mode and the alternate screen.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the console event loop, optionally starting with `initial_query`.
pub async fn run_console(
    transport: Arc<dyn Transport>,
    linger: Duration,
    expand_cards: bool,
    initial_query: Option<String>,
) -> Result<(), anyhow::Error> {
    use std::io::IsTerminal;
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        return Err(anyhow::anyhow!(
            "Interactive console requires a terminal (TTY); use --plain or --json."
        ));
    }

    // Restore the terminal if anything panics mid-frame.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        default_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;
    let mut console = SearchConsole::new(transport, linger, expand_cards);
    if let Some(query) = initial_query {
        console.set_input(&query);
        console.submit();
    }

    let tick_rate = Duration::from_millis(100);

    loop {
        console.drain_updates();

        terminal.draw(|frame| {
            console.render(frame);
        })?;

        if event::poll(tick_rate)? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press && console.handle_key(key_event.code, key_event.modifiers) {
                    break;
                }
            }
        }
    }

    restore_terminal(&mut terminal)?;
    Ok(())
}
