use std::mem;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Local;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap};
use ratatui::Frame;

use crate::models::{intensity_label, Context, Draft, Mood, MoodEntry};
use crate::store::{BlobStore, EntryStore};

use super::forms::NoteForm;
use super::helpers::{centered_rect, format_header, format_relative};
use super::screens::HistoryScreen;

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height allocation for the mood carousel row.
const MOOD_ROW_HEIGHT: u16 = 6;
/// How many entries the history feed shows.
const FEED_LIMIT: usize = 10;
/// Step size for intensity adjustments via the arrow keys.
const INTENSITY_STEP: i64 = 5;
/// How long the "Saved" affordance lingers before the app resets the draft
/// and lands on the history screen.
const SAVE_FLASH: Duration = Duration::from_millis(600);
/// Index of the mood card the cursor starts on: the second card, so both
/// neighbors are visible from the start.
const INITIAL_MOOD_CURSOR: usize = 1;

/// High-level navigation states. Keeping this explicit makes it easy to
/// reason about which rendering path runs and what the keyboard should do.
enum Screen {
    Capture,
    History,
}

/// Fine-grained modes scoped to the current screen. The note editor is the
/// only modal flow; everything else edits the draft directly.
enum Mode {
    Normal,
    EditingNote(NoteForm),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI. Owns the entry store and
/// the in-progress draft; the rendering functions are pure readers of this
/// state, so the whole core can be exercised in tests without a terminal.
pub struct App<S: BlobStore> {
    store: EntryStore<S>,
    screen: Screen,
    mode: Mode,
    draft: Draft,
    /// Which mood card the cursor is on. Distinct from the draft's selected
    /// mood: moving the cursor previews, Enter commits the choice.
    mood_cursor: usize,
    history: HistoryScreen,
    status: Option<StatusMessage>,
    /// Deadline of the pending save flash. While set, capture input is
    /// ignored (the save action is single-flight) and the next tick past the
    /// deadline resets the draft and navigates to the history screen.
    save_flash: Option<Instant>,
}

impl<S: BlobStore> App<S> {
    pub fn new(store: EntryStore<S>) -> Self {
        Self {
            store,
            screen: Screen::Capture,
            mode: Mode::Normal,
            draft: Draft::default(),
            mood_cursor: INITIAL_MOOD_CURSOR,
            history: HistoryScreen::new(),
            status: None,
            save_flash: None,
        }
    }

    /// Dispatch a key press. Returns `true` when the app should exit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::EditingNote(form) => self.handle_note_editor(code, form),
        };

        Ok(exit)
    }

    /// Timer hook called once per event-loop iteration. The save flash is the
    /// only scheduled continuation in the app: once its deadline passes, the
    /// draft resets and the screen switches to the history feed.
    pub fn on_tick(&mut self) {
        if let Some(deadline) = self.save_flash {
            if Instant::now() >= deadline {
                self.save_flash = None;
                self.draft.reset();
                self.mood_cursor = INITIAL_MOOD_CURSOR;
                self.history.reset();
                self.clear_status();
                self.screen = Screen::History;
            }
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match self.screen {
            Screen::Capture => {
                // Single-flight save: while the flash is pending the capture
                // controls are inert.
                if self.save_flash.is_some() {
                    return Mode::Normal;
                }

                match code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        *exit = true;
                    }
                    KeyCode::Left => {
                        self.mood_cursor = self.mood_cursor.saturating_sub(1);
                    }
                    KeyCode::Right => {
                        self.mood_cursor = (self.mood_cursor + 1).min(Mood::ALL.len() - 1);
                    }
                    KeyCode::Enter => {
                        let mood = Mood::ALL[self.mood_cursor];
                        self.draft.select_mood(mood);
                        self.set_status(format!("{mood} selected."), StatusKind::Info);
                    }
                    KeyCode::Up => {
                        self.draft
                            .set_intensity(i64::from(self.draft.intensity) + INTENSITY_STEP);
                    }
                    KeyCode::Down => {
                        self.draft
                            .set_intensity(i64::from(self.draft.intensity) - INTENSITY_STEP);
                    }
                    KeyCode::Char(ch @ '1'..='4') => {
                        let index = ch as usize - '1' as usize;
                        self.draft.toggle_context(Context::ALL[index]);
                    }
                    KeyCode::Char('n') | KeyCode::Char('N') => {
                        self.clear_status();
                        return Mode::EditingNote(NoteForm::new(&self.draft.note));
                    }
                    KeyCode::Char('s') | KeyCode::Char('S') => {
                        self.try_save();
                    }
                    KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Tab => {
                        self.clear_status();
                        self.history.reset();
                        self.screen = Screen::History;
                    }
                    _ => {}
                }
                Mode::Normal
            }
            Screen::History => {
                match code {
                    KeyCode::Char('q') => {
                        *exit = true;
                    }
                    KeyCode::Esc | KeyCode::Char('b') | KeyCode::Char('B') | KeyCode::Left => {
                        // Returning to capture preserves any in-progress
                        // draft untouched.
                        self.clear_status();
                        self.screen = Screen::Capture;
                    }
                    KeyCode::Up => self.history.scroll_by(-1),
                    KeyCode::Down => self.history.scroll_by(1),
                    KeyCode::PageUp => self.history.scroll_by(-5),
                    KeyCode::PageDown => self.history.scroll_by(5),
                    KeyCode::Home => self.history.reset(),
                    _ => {}
                }
                Mode::Normal
            }
        }
    }

    fn handle_note_editor(&mut self, code: KeyCode, mut form: NoteForm) -> Mode {
        match code {
            KeyCode::Enter => {
                self.draft.set_note(form.accept());
                Mode::Normal
            }
            KeyCode::Esc => Mode::Normal,
            KeyCode::Backspace => {
                form.backspace();
                Mode::EditingNote(form)
            }
            KeyCode::Char(ch) => {
                form.push_char(ch);
                Mode::EditingNote(form)
            }
            _ => Mode::EditingNote(form),
        }
    }

    /// Commit the draft if a mood has been chosen, then arm the save flash.
    /// The guard mirrors the disabled save button: without a mood this is a
    /// status message, not an error.
    fn try_save(&mut self) {
        if !self.draft.can_save() {
            self.set_status("Select a mood before saving.", StatusKind::Error);
            return;
        }

        if self.store.commit(&self.draft).is_some() {
            self.set_status("Saved ✓", StatusKind::Info);
            self.save_flash = Some(Instant::now() + SAVE_FLASH);
        }
    }

    pub fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match self.screen {
            Screen::Capture => self.draw_capture(frame, content_area),
            Screen::History => self.draw_history(frame, content_area),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        if let Mode::EditingNote(form) = &self.mode {
            self.draw_note_editor(frame, area, form);
        }
    }

    fn draw_capture(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(MOOD_ROW_HEIGHT),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(3),
            ])
            .split(area);

        let header = Paragraph::new(vec![
            Line::from(Span::styled(
                "Hi there, what's the vibe?",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format_header(Local::now()),
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Check-in"));
        frame.render_widget(header, chunks[0]);

        self.draw_mood_row(frame, chunks[1]);
        self.draw_intensity(frame, chunks[2]);
        self.draw_contexts(frame, chunks[3]);
        self.draw_note_preview(frame, chunks[4]);
    }

    fn draw_mood_row(&self, frame: &mut Frame, area: Rect) {
        let count = Mood::ALL.len() as u16;
        let percent = (100 / count).max(1);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Percentage(percent); count as usize])
            .split(area);

        for (index, mood) in Mood::ALL.into_iter().enumerate() {
            let is_cursor = index == self.mood_cursor;
            let is_selected = self.draft.mood == Some(mood);

            let title = if is_selected {
                format!("{} *", mood.label())
            } else {
                mood.label().to_string()
            };

            let mut block = Block::default().borders(Borders::ALL).title(title);
            if is_cursor {
                block = block.style(Style::default().fg(Color::Yellow));
            } else if is_selected {
                block = block.style(Style::default().fg(Color::Green));
            }

            let face = if is_selected || is_cursor {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };

            let card = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(mood.icon(), face)),
            ])
            .alignment(Alignment::Center)
            .block(block);
            frame.render_widget(card, columns[index]);
        }
    }

    fn draw_intensity(&self, frame: &mut Frame, area: Rect) {
        let value = self.draft.intensity;
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Intensity"))
            .gauge_style(Style::default().fg(Color::Magenta))
            .percent(u16::from(value))
            .label(format!("{} ({value})", intensity_label(value)));
        frame.render_widget(gauge, area);
    }

    fn draw_contexts(&self, frame: &mut Frame, area: Rect) {
        let mut spans = Vec::with_capacity(Context::ALL.len() * 2);
        for (index, context) in Context::ALL.into_iter().enumerate() {
            let selected = self.draft.contexts.contains(&context);
            let style = if selected {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let marker = if selected { "x" } else { " " };
            spans.push(Span::styled(
                format!("[{marker}] {} ({})", context.label(), index + 1),
                style,
            ));
            spans.push(Span::raw("   "));
        }

        let tags = Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Add Context"));
        frame.render_widget(tags, area);
    }

    fn draw_note_preview(&self, frame: &mut Frame, area: Rect) {
        let content = if self.draft.note.is_empty() {
            Line::from(Span::styled(
                "What's on your mind? Press [n] to write.",
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Line::from(Span::raw(self.draft.note.clone()))
        };

        let note = Paragraph::new(content)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Notes (optional)"));
        frame.render_widget(note, area);
    }

    fn draw_history(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(1)])
            .split(area);

        self.draw_stat_cards(frame, chunks[0]);
        self.draw_feed(frame, chunks[1]);
    }

    fn draw_stat_cards(&self, frame: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let top_card = match self.store.weekly_stats() {
            Some(stats) => Paragraph::new(vec![
                Line::from(Span::styled(
                    format!("{} {}", stats.top_mood.icon(), stats.top_mood.label()),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("{} of {} entries this week", stats.count, stats.total),
                    Style::default().fg(Color::DarkGray),
                )),
            ]),
            None => Paragraph::new(vec![
                Line::from(Span::styled(
                    "None",
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    "No entries this week",
                    Style::default().fg(Color::DarkGray),
                )),
            ]),
        }
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Top Mood"));
        frame.render_widget(top_card, columns[0]);

        let total_card = Paragraph::new(vec![
            Line::from(Span::styled(
                self.store.total().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Total logged",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Entries"));
        frame.render_widget(total_card, columns[1]);
    }

    fn draw_feed(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Recent Entries");

        if self.store.entries().is_empty() {
            let message = Paragraph::new(vec![
                Line::from(""),
                Line::from("No entries yet"),
                Line::from(Span::styled(
                    "Start logging your moods!",
                    Style::default().fg(Color::DarkGray),
                )),
            ])
            .alignment(Alignment::Center)
            .block(block);
            frame.render_widget(message, area);
            return;
        }

        let mut lines = Vec::new();
        for entry in self.store.entries().iter().take(FEED_LIMIT) {
            lines.extend(entry_card_lines(entry));
        }

        let feed = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((self.history.scroll, 0))
            .block(block);
        frame.render_widget(feed, area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph =
            Paragraph::new(vec![status_line, self.footer_instructions()]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
        match (&self.screen, &self.mode) {
            (_, Mode::EditingNote(_)) => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Apply   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            (Screen::Capture, _) => {
                let save_hint = if self.save_flash.is_some() {
                    Span::styled(" Saved ✓   ", Style::default().fg(Color::Green))
                } else if self.draft.can_save() {
                    Span::raw(" Log Mood   ")
                } else {
                    Span::styled(" Log Mood (pick a mood first)   ", Style::default().fg(Color::DarkGray))
                };
                Line::from(vec![
                    Span::styled("[←→]", key_style),
                    Span::raw(" Browse   "),
                    Span::styled("[Enter]", key_style),
                    Span::raw(" Pick Mood   "),
                    Span::styled("[↑↓]", key_style),
                    Span::raw(" Intensity   "),
                    Span::styled("[1-4]", key_style),
                    Span::raw(" Context   "),
                    Span::styled("[n]", key_style),
                    Span::raw(" Note   "),
                    Span::styled("[s]", key_style),
                    save_hint,
                    Span::styled("[h]", key_style),
                    Span::raw(" History   "),
                    Span::styled("[q]", key_style),
                    Span::raw(" Quit"),
                ])
            }
            (Screen::History, _) => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Scroll   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Back to Check-in   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
        }
    }

    fn draw_note_editor(&self, frame: &mut Frame, area: Rect, form: &NoteForm) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let paragraph = Paragraph::new(vec![form.build_line(), Line::from("")])
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Edit Note"));
        frame.render_widget(paragraph, popup_area);
    }

    fn set_status<T: Into<String>>(&mut self, text: T, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}

/// Build the text lines for one feed card: mood header with the relative
/// timestamp, the note when present, then the context chips.
fn entry_card_lines(entry: &MoodEntry) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(4);

    lines.push(Line::from(vec![
        Span::styled(
            format!("{} {}", entry.mood.icon(), entry.mood.label()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                "  •  {} ({})",
                intensity_label(entry.intensity),
                entry.intensity
            ),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("  •  {}", format_relative(entry.timestamp)),
            Style::default().fg(Color::Magenta),
        ),
    ]));

    if !entry.note.is_empty() {
        lines.push(Line::from(Span::raw(format!("   {}", entry.note))));
    }

    if !entry.contexts.is_empty() {
        let chips = entry
            .contexts
            .iter()
            .map(|context| format!("#{}", context.tag()))
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(Line::from(Span::styled(
            format!("   {chips}"),
            Style::default().fg(Color::Cyan),
        )));
    }

    lines.push(Line::from(""));
    lines
}
