use std::{cmp, io, thread, time::Duration};

use anyhow::{Context, Result};
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use league_core::{
    ClubId, ClubStatistics, ErrorKind, NewPlayer, PlayerQuery, PlayerRef, RosterError,
    RosterStore,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::input::{parse_date_of_birth, parse_kit_number, TextInput};

const TICK_RATE: Duration = Duration::from_millis(250);
const MENU_ITEMS: [&str; 5] = [
    "Enroll New Club",
    "Add Player to Club",
    "Search & Update Player",
    "Display Statistics",
    "Exit System",
];
const FORM_LABELS: [&str; 4] = ["Name", "Kit number", "Position", "Date of birth"];
const SEARCH_MODES: [&str; 2] = ["Search by Name", "Search by Kit Number"];
const PAGE: u16 = 10;

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    muted: Color,
    success: Color,
    danger: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Cyan,
            muted: Color::DarkGray,
            success: Color::Green,
            danger: Color::Red,
        }
    }
}

#[derive(Debug)]
enum AppEvent {
    Input(Event),
    Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Menu,
    Statistics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchMode {
    Name,
    Kit,
}

#[derive(Debug, Clone)]
struct PlayerForm {
    club: ClubId,
    fields: [TextInput; 4],
    focus: usize,
}

impl PlayerForm {
    fn new(club: ClubId) -> Self {
        Self {
            club,
            fields: Default::default(),
            focus: 0,
        }
    }

    fn focused_mut(&mut self) -> &mut TextInput {
        &mut self.fields[self.focus]
    }

    fn move_focus(&mut self, delta: isize) {
        let last = FORM_LABELS.len() as isize - 1;
        self.focus = (self.focus as isize + delta).clamp(0, last) as usize;
    }

    fn on_last_field(&self) -> bool {
        self.focus + 1 == FORM_LABELS.len()
    }

    fn build(&self) -> Result<NewPlayer> {
        let [name, kit, position, dob] = &self.fields;
        Ok(NewPlayer {
            name: name.value(),
            kit_number: parse_kit_number(kit.raw())?,
            position: position.value(),
            date_of_birth: parse_date_of_birth(dob.raw())?,
        })
    }
}

#[derive(Debug, Clone)]
enum Modal {
    EnrollClub(TextInput),
    PickClub { cursor: usize },
    PlayerForm(PlayerForm),
    PickSearchMode { cursor: usize },
    SearchQuery { mode: SearchMode, input: TextInput },
    UpdatePosition { player: PlayerRef, input: TextInput },
}

pub struct LeagueApp {
    store: RosterStore,
    screen: Screen,
    modal: Option<Modal>,
    menu_cursor: usize,
    report: Vec<ClubStatistics>,
    report_scroll: u16,
    status: String,
    status_level: StatusLevel,
    should_quit: bool,
    theme: Theme,
}

impl LeagueApp {
    pub fn new(store: RosterStore) -> Self {
        Self {
            store,
            screen: Screen::Menu,
            modal: None,
            menu_cursor: 0,
            report: Vec::new(),
            report_scroll: 0,
            status: "Ready".to_string(),
            status_level: StatusLevel::Info,
            should_quit: false,
            theme: Theme::default(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx);
        info!("Control panel opened");

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.should_quit {
                break;
            }
            match event_rx.recv().await {
                Some(AppEvent::Input(event)) => self.handle_input(event),
                Some(AppEvent::Tick) => {}
                None => break,
            }
        }

        restore_terminal(&mut terminal)?;
        info!(
            clubs = self.store.club_count(),
            players = self.store.total_players(),
            "System shutting down"
        );
        Ok(())
    }

    fn set_status(&mut self, level: StatusLevel, message: impl Into<String>) {
        self.status = message.into();
        self.status_level = level;
    }

    fn report_error(&mut self, err: &RosterError) {
        debug!(kind = ?err.kind(), %err, "Operation refused");
        self.set_status(StatusLevel::Error, err.to_string());
    }

    fn handle_input(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if let Some(modal) = self.modal.take() {
            self.modal = self.handle_modal_key(modal, key);
            return;
        }
        match self.screen {
            Screen::Menu => self.handle_menu_key(key),
            Screen::Statistics => self.handle_statistics_key(key),
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Char('j') | KeyCode::Down => self.move_menu_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_menu_cursor(-1),
            KeyCode::Char(ch @ '1'..='5') => {
                self.menu_cursor = (ch as usize) - ('1' as usize);
                self.activate_menu_item(self.menu_cursor);
            }
            KeyCode::Enter => self.activate_menu_item(self.menu_cursor),
            _ => {}
        }
    }

    fn move_menu_cursor(&mut self, delta: isize) {
        let last = MENU_ITEMS.len() as isize - 1;
        self.menu_cursor = (self.menu_cursor as isize + delta).clamp(0, last) as usize;
    }

    fn activate_menu_item(&mut self, index: usize) {
        match index {
            0 => {
                self.modal = Some(Modal::EnrollClub(TextInput::default()));
            }
            1 | 2 if self.store.is_empty() => self.report_error(&RosterError::NoClubsEnrolled),
            1 => {
                self.modal = Some(Modal::PickClub { cursor: 0 });
            }
            2 => {
                self.modal = Some(Modal::PickSearchMode { cursor: 0 });
            }
            3 => match self.store.league_statistics() {
                Ok(report) => {
                    self.report = report;
                    self.report_scroll = 0;
                    self.screen = Screen::Statistics;
                    self.set_status(StatusLevel::Info, "League statistics");
                }
                Err(err) => self.report_error(&err),
            },
            4 => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn handle_statistics_key(&mut self, key: KeyEvent) {
        let max_scroll = statistics_lines(&self.report).len().saturating_sub(1) as u16;
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Backspace => {
                self.screen = Screen::Menu;
                self.set_status(StatusLevel::Info, "Ready");
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.report_scroll = cmp::min(self.report_scroll.saturating_add(1), max_scroll);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.report_scroll = self.report_scroll.saturating_sub(1);
            }
            KeyCode::PageDown => {
                self.report_scroll = cmp::min(self.report_scroll.saturating_add(PAGE), max_scroll);
            }
            KeyCode::PageUp => {
                self.report_scroll = self.report_scroll.saturating_sub(PAGE);
            }
            KeyCode::Home => self.report_scroll = 0,
            _ => {}
        }
    }

    fn handle_modal_key(&mut self, modal: Modal, key: KeyEvent) -> Option<Modal> {
        match modal {
            Modal::EnrollClub(mut input) => match key.code {
                KeyCode::Esc => {
                    self.set_status(StatusLevel::Info, "Enrollment cancelled");
                    None
                }
                KeyCode::Enter => match self.store.enroll_club(input.value()) {
                    Ok(id) => {
                        let name = self.club_name(id);
                        self.set_status(
                            StatusLevel::Success,
                            format!("Club '{name}' has been successfully enrolled."),
                        );
                        None
                    }
                    Err(err) => {
                        self.report_error(&err);
                        (err.kind() != ErrorKind::CapacityExceeded)
                            .then_some(Modal::EnrollClub(input))
                    }
                },
                _ => {
                    edit_text(&mut input, &key);
                    Some(Modal::EnrollClub(input))
                }
            },
            Modal::PickClub { mut cursor } => {
                let total = self.store.club_count();
                match key.code {
                    KeyCode::Esc => {
                        self.set_status(StatusLevel::Info, "Club selection cancelled");
                        return None;
                    }
                    KeyCode::Char('j') | KeyCode::Down => {
                        cursor = cmp::min(cursor + 1, total.saturating_sub(1));
                    }
                    KeyCode::Char('k') | KeyCode::Up => cursor = cursor.saturating_sub(1),
                    KeyCode::Char(ch) if ch.is_ascii_digit() => {
                        let number = ch.to_digit(10).unwrap_or_default() as usize;
                        return self.open_player_form(ClubId::from_menu_number(number), cursor);
                    }
                    KeyCode::Enter => return self.open_player_form(ClubId(cursor), cursor),
                    _ => {}
                }
                Some(Modal::PickClub { cursor })
            }
            Modal::PlayerForm(mut form) => match key.code {
                KeyCode::Esc => {
                    self.set_status(StatusLevel::Info, "Registration cancelled");
                    None
                }
                KeyCode::Tab | KeyCode::Down => {
                    form.move_focus(1);
                    Some(Modal::PlayerForm(form))
                }
                KeyCode::BackTab | KeyCode::Up => {
                    form.move_focus(-1);
                    Some(Modal::PlayerForm(form))
                }
                KeyCode::Enter if !form.on_last_field() => {
                    form.move_focus(1);
                    Some(Modal::PlayerForm(form))
                }
                KeyCode::Enter => self.submit_player_form(form),
                _ => {
                    edit_text(form.focused_mut(), &key);
                    Some(Modal::PlayerForm(form))
                }
            },
            Modal::PickSearchMode { mut cursor } => {
                let mode = match key.code {
                    KeyCode::Esc => {
                        self.set_status(StatusLevel::Info, "Search cancelled");
                        return None;
                    }
                    KeyCode::Char('j') | KeyCode::Down => {
                        cursor = cmp::min(cursor + 1, SEARCH_MODES.len() - 1);
                        None
                    }
                    KeyCode::Char('k') | KeyCode::Up => {
                        cursor = cursor.saturating_sub(1);
                        None
                    }
                    KeyCode::Char('1') => Some(SearchMode::Name),
                    KeyCode::Char('2') => Some(SearchMode::Kit),
                    KeyCode::Enter if cursor == 0 => Some(SearchMode::Name),
                    KeyCode::Enter => Some(SearchMode::Kit),
                    _ => None,
                };
                match mode {
                    Some(mode) => Some(Modal::SearchQuery {
                        mode,
                        input: TextInput::default(),
                    }),
                    None => Some(Modal::PickSearchMode { cursor }),
                }
            }
            Modal::SearchQuery { mode, mut input } => match key.code {
                KeyCode::Esc => {
                    self.set_status(StatusLevel::Info, "Search cancelled");
                    None
                }
                KeyCode::Enter => self.submit_search(mode, input),
                _ => {
                    edit_text(&mut input, &key);
                    Some(Modal::SearchQuery { mode, input })
                }
            },
            Modal::UpdatePosition { player, mut input } => match key.code {
                KeyCode::Esc => {
                    self.set_status(StatusLevel::Info, "Update cancelled");
                    None
                }
                KeyCode::Enter => match self.store.update_player_position(player, input.value()) {
                    Ok(()) => {
                        self.set_status(
                            StatusLevel::Success,
                            "Player details updated successfully.",
                        );
                        None
                    }
                    Err(err) => {
                        self.report_error(&err);
                        (err.kind() != ErrorKind::InvalidSelection)
                            .then_some(Modal::UpdatePosition { player, input })
                    }
                },
                _ => {
                    edit_text(&mut input, &key);
                    Some(Modal::UpdatePosition { player, input })
                }
            },
        }
    }

    fn open_player_form(&mut self, club: ClubId, cursor: usize) -> Option<Modal> {
        match self.store.ensure_room(club) {
            Ok(entry) => {
                let message = format!("Registering a player for '{}'", entry.name);
                self.set_status(StatusLevel::Info, message);
                Some(Modal::PlayerForm(PlayerForm::new(club)))
            }
            Err(err) => {
                self.report_error(&err);
                Some(Modal::PickClub { cursor })
            }
        }
    }

    fn submit_player_form(&mut self, form: PlayerForm) -> Option<Modal> {
        let player = match form.build() {
            Ok(player) => player,
            Err(err) => {
                self.set_status(StatusLevel::Error, err.to_string());
                return Some(Modal::PlayerForm(form));
            }
        };
        let name = player.name.clone();
        match self.store.add_player(form.club, player) {
            Ok(_) => {
                let club = self.club_name(form.club);
                self.set_status(
                    StatusLevel::Success,
                    format!("Player '{name}' added to '{club}'."),
                );
                None
            }
            Err(err) => {
                self.report_error(&err);
                match err.kind() {
                    ErrorKind::ValidationFailed | ErrorKind::DuplicatePlayer => {
                        Some(Modal::PlayerForm(form))
                    }
                    _ => None,
                }
            }
        }
    }

    fn submit_search(&mut self, mode: SearchMode, input: TextInput) -> Option<Modal> {
        let query = match mode {
            SearchMode::Name => PlayerQuery::Name(input.value()),
            SearchMode::Kit => match parse_kit_number(input.raw()) {
                Ok(kit) => PlayerQuery::Kit(kit),
                Err(err) => {
                    self.set_status(StatusLevel::Error, err.to_string());
                    return Some(Modal::SearchQuery { mode, input });
                }
            },
        };
        match self.store.search_player(&query) {
            Ok(found) => {
                let club = self.club_name(found.club);
                let position = self
                    .store
                    .player(found)
                    .map(|player| player.position.clone())
                    .unwrap_or_default();
                self.set_status(
                    StatusLevel::Info,
                    format!("Player found in Club '{club}'. Enter a new position."),
                );
                Some(Modal::UpdatePosition {
                    player: found,
                    input: TextInput::with_value(&position),
                })
            }
            Err(err) => {
                self.report_error(&err);
                (err.kind() == ErrorKind::NotFound).then_some(Modal::SearchQuery { mode, input })
            }
        }
    }

    fn club_name(&self, club: ClubId) -> String {
        self.store
            .club(club)
            .map(|entry| entry.name.clone())
            .unwrap_or_default()
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.size();
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(4),
            ])
            .split(area);

        self.render_header(frame, layout[0]);
        match self.screen {
            Screen::Menu => self.render_menu(frame, layout[1]),
            Screen::Statistics => self.render_statistics(frame, layout[1]),
        }
        self.render_status(frame, layout[2]);

        match &self.modal {
            Some(Modal::EnrollClub(input)) => self.render_text_prompt(
                frame,
                "Enroll New Club",
                &format!(
                    "Enter the club name (max {} characters)",
                    self.store.config().club_name_max_len
                ),
                input,
            ),
            Some(Modal::PickClub { cursor }) => self.render_club_picker(frame, *cursor),
            Some(Modal::PlayerForm(form)) => self.render_player_form(frame, form),
            Some(Modal::PickSearchMode { cursor }) => self.render_search_modes(frame, *cursor),
            Some(Modal::SearchQuery { mode, input }) => {
                let instruction = match mode {
                    SearchMode::Name => "Enter player name to search",
                    SearchMode::Kit => "Enter kit number to search",
                };
                self.render_text_prompt(frame, "Search Player", instruction, input);
            }
            Some(Modal::UpdatePosition { player, input }) => {
                self.render_update_position(frame, *player, input)
            }
            None => {}
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let title = Line::from(vec![
            Span::styled(
                "LEAGUE SYSTEM CONTROL PANEL",
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", Local::now().format("%H:%M:%S")),
                Style::default().fg(self.theme.muted),
            ),
        ]);
        let header = Paragraph::new(title)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        frame.render_widget(header, area);
    }

    fn render_menu(&self, frame: &mut Frame, area: Rect) {
        let menu_height = (MENU_ITEMS.len() as u16)
            .saturating_mul(2)
            .saturating_add(2)
            .min(area.height);
        let menu_width = 34.min(area.width.max(1));
        let menu_area = centered_rect(menu_width, menu_height, area);

        let menu_lines: Vec<Line> = MENU_ITEMS
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                if idx == self.menu_cursor {
                    Line::from(Span::styled(
                        format!("▶ [{}] {item}", idx + 1),
                        Style::default()
                            .fg(self.theme.accent)
                            .add_modifier(Modifier::BOLD),
                    ))
                } else {
                    Line::from(Span::styled(
                        format!("  [{}] {item}", idx + 1),
                        Style::default().fg(self.theme.primary_fg),
                    ))
                }
            })
            .collect();

        let menu = Paragraph::new(menu_lines)
            .block(Block::default().borders(Borders::ALL).title("Menu"));
        frame.render_widget(menu, menu_area);
    }

    fn render_statistics(&self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = statistics_lines(&self.report)
            .into_iter()
            .map(|line| {
                let style = if line.starts_with("[TEAM]") {
                    Style::default()
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::BOLD)
                } else if line.starts_with("[ALERT]") {
                    Style::default().fg(self.theme.danger)
                } else if line.starts_with("[STATS]") {
                    Style::default().fg(self.theme.success)
                } else {
                    Style::default().fg(self.theme.primary_fg)
                };
                Line::from(Span::styled(line, style))
            })
            .collect();
        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("League Statistics (Esc to return)"),
            )
            .scroll((self.report_scroll, 0));
        frame.render_widget(paragraph, area);
    }

    fn render_text_prompt(
        &self,
        frame: &mut Frame,
        title: &str,
        instruction: &str,
        input: &TextInput,
    ) {
        let area = modal_area(frame.size(), 60, 7);
        frame.render_widget(Clear, area);

        let input_line = Line::from(vec![
            Span::styled("> ", Style::default().fg(self.theme.accent)),
            Span::raw(input.raw().to_string()),
        ]);
        let paragraph = Paragraph::new(vec![
            Line::from(instruction.to_string()),
            input_line,
            Line::from(""),
            helper_line(&[("Enter", "confirm"), ("Esc", "cancel")]),
        ])
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);

        let cursor_x =
            (area.x + 3 + input.cursor() as u16).min(area.x + area.width.saturating_sub(2));
        frame.set_cursor(cursor_x, area.y + 2);
    }

    fn render_club_picker(&self, frame: &mut Frame, cursor: usize) {
        let clubs = self.store.clubs();
        let max_players = self.store.config().max_players_per_club;
        let area = modal_area(frame.size(), 48, clubs.len() as u16 + 4);
        frame.render_widget(Clear, area);

        let mut lines: Vec<Line> = clubs
            .iter()
            .enumerate()
            .map(|(idx, club)| {
                let label = format!(
                    "[{}] {} ({}/{})",
                    idx + 1,
                    club.name,
                    club.player_count(),
                    max_players
                );
                if idx == cursor {
                    Line::from(Span::styled(
                        format!("▶ {label}"),
                        Style::default()
                            .fg(self.theme.accent)
                            .add_modifier(Modifier::BOLD),
                    ))
                } else {
                    Line::from(format!("  {label}"))
                }
            })
            .collect();
        lines.push(helper_line(&[("Enter", "select"), ("Esc", "cancel")]));

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Select a Club"));
        frame.render_widget(paragraph, area);
    }

    fn render_player_form(&self, frame: &mut Frame, form: &PlayerForm) {
        let area = modal_area(frame.size(), 64, FORM_LABELS.len() as u16 + 5);
        frame.render_widget(Clear, area);

        let config = self.store.config();
        let hints = [
            format!("max {} chars", config.player_name_max_len),
            format!(
                "{}-{}",
                config.kit_number_range.min, config.kit_number_range.max
            ),
            format!("max {} chars", config.position_max_len),
            "dd mm yyyy".to_string(),
        ];
        let label_width = FORM_LABELS.iter().map(|label| label.len()).max().unwrap_or(0);

        let mut lines: Vec<Line> = FORM_LABELS
            .iter()
            .zip(form.fields.iter())
            .zip(hints.iter())
            .enumerate()
            .map(|(idx, ((label, field), hint))| {
                let focused = idx == form.focus;
                let label_style = if focused {
                    Style::default()
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(self.theme.primary_fg)
                };
                Line::from(vec![
                    Span::styled(format!("{label:>label_width$}: "), label_style),
                    Span::raw(field.raw().to_string()),
                    Span::styled(format!("  ({hint})"), Style::default().fg(self.theme.muted)),
                ])
            })
            .collect();
        lines.push(Line::from(""));
        lines.push(helper_line(&[
            ("Tab", "next"),
            ("Enter", "next/submit"),
            ("Esc", "cancel"),
        ]));

        let title = format!("Add Player to {}", self.club_name(form.club));
        let paragraph =
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(paragraph, area);

        let field = &form.fields[form.focus];
        let cursor_x = (area.x + 1 + label_width as u16 + 2 + field.cursor() as u16)
            .min(area.x + area.width.saturating_sub(2));
        frame.set_cursor(cursor_x, area.y + 1 + form.focus as u16);
    }

    fn render_search_modes(&self, frame: &mut Frame, cursor: usize) {
        let area = modal_area(frame.size(), 40, SEARCH_MODES.len() as u16 + 4);
        frame.render_widget(Clear, area);

        let mut lines: Vec<Line> = SEARCH_MODES
            .iter()
            .enumerate()
            .map(|(idx, mode)| {
                if idx == cursor {
                    Line::from(Span::styled(
                        format!("▶ [{}] {mode}", idx + 1),
                        Style::default()
                            .fg(self.theme.accent)
                            .add_modifier(Modifier::BOLD),
                    ))
                } else {
                    Line::from(format!("  [{}] {mode}", idx + 1))
                }
            })
            .collect();
        lines.push(helper_line(&[("Enter", "select"), ("Esc", "cancel")]));

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Search Player"));
        frame.render_widget(paragraph, area);
    }

    fn render_update_position(&self, frame: &mut Frame, player: PlayerRef, input: &TextInput) {
        let area = modal_area(frame.size(), 60, 10);
        frame.render_widget(Clear, area);

        let club = self.club_name(player.club);
        let mut lines = vec![Line::from(Span::styled(
            format!("Player found in Club '{club}':"),
            Style::default().fg(self.theme.success),
        ))];
        if let Some(entry) = self.store.player(player) {
            lines.push(Line::from(format!("  Name: {}", entry.name)));
            lines.push(Line::from(format!("  Kit Number: {}", entry.kit_number)));
            lines.push(Line::from(format!("  Position: {}", entry.position)));
        }
        lines.push(Line::from("New position:"));
        lines.push(Line::from(vec![
            Span::styled("> ", Style::default().fg(self.theme.accent)),
            Span::raw(input.raw().to_string()),
        ]));
        lines.push(helper_line(&[("Enter", "update"), ("Esc", "cancel")]));

        let input_row = lines.len() as u16 - 2;
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Update Player"));
        frame.render_widget(paragraph, area);

        let cursor_x =
            (area.x + 3 + input.cursor() as u16).min(area.x + area.width.saturating_sub(2));
        frame.set_cursor(cursor_x, area.y + 1 + input_row);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Status");
        let color = match self.status_level {
            StatusLevel::Info => self.theme.primary_fg,
            StatusLevel::Success => self.theme.success,
            StatusLevel::Error => self.theme.danger,
        };
        let primary = Line::from(Span::styled(self.status.clone(), Style::default().fg(color)));
        let config = self.store.config();
        let secondary = Line::from(Span::styled(
            format!(
                "Clubs: {}/{}  Players: {}  Reference year: {}",
                self.store.club_count(),
                config.max_clubs,
                self.store.total_players(),
                config.reference_year
            ),
            Style::default().fg(self.theme.muted),
        ));
        let paragraph = Paragraph::new(vec![primary, secondary])
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

fn edit_text(input: &mut TextInput, key: &KeyEvent) {
    match key.code {
        KeyCode::Left => input.move_cursor(-1),
        KeyCode::Right => input.move_cursor(1),
        KeyCode::Home => input.move_home(),
        KeyCode::End => input.move_end(),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Char(ch) => {
            if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                input.insert(ch);
            }
        }
        _ => {}
    }
}

/// Plain-text league report, one entry per rendered line.
fn statistics_lines(report: &[ClubStatistics]) -> Vec<String> {
    let mut lines = Vec::new();
    for stats in report {
        lines.push(format!("[TEAM] Club: {}", stats.name));
        lines.push(format!("[INFO] Number of Players: {}", stats.player_count));
        for player in &stats.players {
            lines.push(format!("[PLAYER] Name: {}", player.name));
            lines.push(format!("         Kit Number: {}", player.kit_number));
            lines.push(format!("         Age: {}", player.age));
            lines.push(format!("         Position: {}", player.position));
        }
        match stats.average_age {
            Some(average) => lines.push(format!("[STATS] Average Player Age: {average:.2}")),
            None => lines.push("[ALERT] This team has no players yet.".to_string()),
        }
        lines.push(String::new());
    }
    lines
}

fn helper_line(entries: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::new();
    for (key, action) in entries {
        spans.push(Span::styled(
            key.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!(" {action}  ")));
    }
    Line::from(spans)
}

fn modal_area(frame_area: Rect, width: u16, height: u16) -> Rect {
    let width = cmp::max(
        cmp::min(width, frame_area.width.saturating_sub(4)),
        24_u16,
    );
    let height = height.min(frame_area.height.saturating_sub(2)).max(5_u16);
    centered_rect(width, height, frame_area)
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
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

#[cfg(test)]
mod tests {
    use super::*;
    use league_core::{DateOfBirth, LeagueConfig};
    use ratatui::backend::TestBackend;

    fn press(app: &mut LeagueApp, code: KeyCode) {
        app.handle_input(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    fn type_text(app: &mut LeagueApp, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    fn app_with_sam() -> LeagueApp {
        let mut store = RosterStore::default();
        let reds = store.enroll_club("Reds").expect("enroll");
        store
            .add_player(
                reds,
                NewPlayer {
                    name: "Sam".to_string(),
                    kit_number: 7,
                    position: "Forward".to_string(),
                    date_of_birth: DateOfBirth::new(1, 1, 2000),
                },
            )
            .expect("add");
        LeagueApp::new(store)
    }

    fn screen_text(app: &mut LeagueApp) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).expect("terminal");
        terminal.draw(|frame| app.draw(frame)).expect("draw");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn enrolls_club_from_menu() {
        let mut app = LeagueApp::new(RosterStore::default());
        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.modal, Some(Modal::EnrollClub(_))));
        type_text(&mut app, "Reds");
        press(&mut app, KeyCode::Enter);

        assert!(app.modal.is_none());
        assert_eq!(app.store.club_count(), 1);
        assert_eq!(app.status_level, StatusLevel::Success);
        assert!(app.status.contains("Reds"));
    }

    #[test]
    fn oversized_club_name_keeps_prompt_open() {
        let mut app = LeagueApp::new(RosterStore::default());
        press(&mut app, KeyCode::Char('1'));
        type_text(&mut app, &"x".repeat(21));
        press(&mut app, KeyCode::Enter);

        assert!(matches!(app.modal, Some(Modal::EnrollClub(_))));
        assert_eq!(app.status_level, StatusLevel::Error);
        assert!(app.store.is_empty());
    }

    #[test]
    fn full_league_closes_prompt() {
        let mut store = RosterStore::new(LeagueConfig {
            max_clubs: 1,
            ..LeagueConfig::default()
        });
        store.enroll_club("Reds").expect("enroll");
        let mut app = LeagueApp::new(store);
        press(&mut app, KeyCode::Char('1'));
        type_text(&mut app, "Blues");
        press(&mut app, KeyCode::Enter);

        assert!(app.modal.is_none());
        assert!(app.status.contains("Club limit reached"));
        assert_eq!(app.store.club_count(), 1);
    }

    #[test]
    fn player_actions_need_a_club() {
        let mut app = LeagueApp::new(RosterStore::default());
        press(&mut app, KeyCode::Char('2'));
        assert!(app.modal.is_none());
        assert_eq!(app.status, RosterError::NoClubsEnrolled.to_string());

        press(&mut app, KeyCode::Char('3'));
        assert!(app.modal.is_none());
        press(&mut app, KeyCode::Char('4'));
        assert_eq!(app.screen, Screen::Menu);
        assert_eq!(app.status_level, StatusLevel::Error);
    }

    #[test]
    fn registers_player_through_form() {
        let mut app = LeagueApp::new(RosterStore::default());
        app.store.enroll_club("Reds").expect("enroll");

        press(&mut app, KeyCode::Char('2'));
        assert!(matches!(app.modal, Some(Modal::PickClub { cursor: 0 })));
        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.modal, Some(Modal::PlayerForm(_))));

        type_text(&mut app, "Sam");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "7");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "Forward");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "1 1 2000");
        press(&mut app, KeyCode::Enter);

        assert!(app.modal.is_none(), "status: {}", app.status);
        assert_eq!(app.status, "Player 'Sam' added to 'Reds'.");
        let sam = app
            .store
            .search_player(&PlayerQuery::Kit(7))
            .expect("registered");
        assert_eq!(app.store.player(sam).map(|p| p.age(2024)), Some(24));
    }

    #[test]
    fn unparsable_kit_keeps_form_open() {
        let mut app = LeagueApp::new(RosterStore::default());
        app.store.enroll_club("Reds").expect("enroll");
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Enter);

        type_text(&mut app, "Sam");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "seven");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Forward");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "1 1 2000");
        press(&mut app, KeyCode::Enter);

        assert!(matches!(app.modal, Some(Modal::PlayerForm(_))));
        assert!(app.status.contains("kit number"));
        assert_eq!(app.store.total_players(), 0);
    }

    #[test]
    fn duplicate_kit_is_reported_in_form() {
        let mut app = app_with_sam();
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('1'));
        type_text(&mut app, "Alex");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "7");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "Keeper");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "2 3 1990");
        press(&mut app, KeyCode::Enter);

        assert!(matches!(app.modal, Some(Modal::PlayerForm(_))));
        assert!(app.status.starts_with("Duplicate entry"));
        assert_eq!(app.store.total_players(), 1);
    }

    #[test]
    fn invalid_club_number_stays_in_picker() {
        let mut app = app_with_sam();
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('4'));

        assert!(matches!(app.modal, Some(Modal::PickClub { .. })));
        assert_eq!(app.status, "Invalid club selection #4.");
    }

    #[test]
    fn full_club_is_refused_at_selection() {
        let mut store = RosterStore::new(LeagueConfig {
            max_players_per_club: 1,
            ..LeagueConfig::default()
        });
        let reds = store.enroll_club("Reds").expect("enroll");
        store
            .add_player(
                reds,
                NewPlayer {
                    name: "Sam".to_string(),
                    kit_number: 7,
                    position: "Forward".to_string(),
                    date_of_birth: DateOfBirth::new(1, 1, 2000),
                },
            )
            .expect("add");
        let mut app = LeagueApp::new(store);
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Enter);

        assert!(matches!(app.modal, Some(Modal::PickClub { .. })));
        assert!(app.status.contains("at capacity"));
    }

    #[test]
    fn search_by_kit_then_update_position() {
        let mut app = app_with_sam();
        press(&mut app, KeyCode::Char('3'));
        press(&mut app, KeyCode::Char('2'));
        assert!(matches!(
            app.modal,
            Some(Modal::SearchQuery {
                mode: SearchMode::Kit,
                ..
            })
        ));
        type_text(&mut app, "7");
        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.modal, Some(Modal::UpdatePosition { .. })));
        assert!(app.status.contains("Reds"));

        for _ in 0.."Forward".len() {
            press(&mut app, KeyCode::Backspace);
        }
        type_text(&mut app, "Midfielder");
        press(&mut app, KeyCode::Enter);

        assert!(app.modal.is_none());
        let sam = app
            .store
            .search_player(&PlayerQuery::Kit(7))
            .expect("still there");
        let player = app.store.player(sam).expect("resolves");
        assert_eq!(player.position, "Midfielder");
        assert_eq!(player.name, "Sam");
    }

    #[test]
    fn search_by_name_ignores_case() {
        let mut app = app_with_sam();
        press(&mut app, KeyCode::Char('3'));
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "sAM");
        press(&mut app, KeyCode::Enter);

        match &app.modal {
            Some(Modal::UpdatePosition { input, .. }) => assert_eq!(input.raw(), "Forward"),
            other => panic!("unexpected modal {other:?}"),
        }
        press(&mut app, KeyCode::Esc);
        assert!(app.modal.is_none());
        assert_eq!(app.status, "Update cancelled");
    }

    #[test]
    fn search_miss_keeps_query_open() {
        let mut app = app_with_sam();
        press(&mut app, KeyCode::Char('3'));
        press(&mut app, KeyCode::Char('1'));
        type_text(&mut app, "Nobody");
        press(&mut app, KeyCode::Enter);

        assert!(matches!(app.modal, Some(Modal::SearchQuery { .. })));
        assert_eq!(app.status, "Player not found.");
    }

    #[test]
    fn statistics_screen_lists_clubs() {
        let mut app = app_with_sam();
        app.store.enroll_club("Blues").expect("enroll");
        press(&mut app, KeyCode::Char('4'));
        assert_eq!(app.screen, Screen::Statistics);

        let lines = statistics_lines(&app.report);
        assert!(lines.contains(&"[TEAM] Club: Reds".to_string()));
        assert!(lines.contains(&"[STATS] Average Player Age: 24.00".to_string()));
        assert!(lines.contains(&"[ALERT] This team has no players yet.".to_string()));

        press(&mut app, KeyCode::Down);
        assert_eq!(app.report_scroll, 1);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, Screen::Menu);
    }

    #[test]
    fn renders_menu_and_picker() {
        let mut app = app_with_sam();
        let text = screen_text(&mut app);
        assert!(text.contains("LEAGUE SYSTEM CONTROL PANEL"));
        assert!(text.contains("Enroll New Club"));
        assert!(text.contains("Clubs: 1/10"));

        press(&mut app, KeyCode::Char('2'));
        let text = screen_text(&mut app);
        assert!(text.contains("[1] Reds (1/15)"));

        press(&mut app, KeyCode::Enter);
        let text = screen_text(&mut app);
        assert!(text.contains("Add Player to Reds"));
    }

    #[test]
    fn quits_from_menu() {
        let mut app = LeagueApp::new(RosterStore::default());
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
