//! TUI (Terminal User Interface) module for GodString
//!
//! This module provides the interactive window using Ratatui.
//!
//! # Layout
//! - Left panel: title, tribute, word bank status, the pull button and the
//!   sacred words of the current pull
//! - Right panel: the divine message, or the failure text of the last pull
//!
//! # Trigger
//! The pull button follows the session's [`TriggerState`]: enabled when the
//! bank is usable and idle, "Pulling..." while a request is in flight, and
//! greyed out when the bank holds fewer than ten words.

use crate::session::{AppInterface, BankNotice, TriggerState, UserAction};
use crate::{debug_log, info_log};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};
use std::io;
use std::path::Path;
use std::time::Duration;

const LEFT_PANEL_WIDTH: u16 = 42;
const EVENT_POLL_TIMEOUT_MS: u64 = 100;
const ASCII_CONTROL_CHAR_THRESHOLD: u32 = 32;
const WORD_SEPARATOR: &str = " • ";

const IDLE_PLACEHOLDER: &str =
    "Your divine message will appear here...\n\nPress ENTER to pull the string.";
const PULLING_PLACEHOLDER: &str = "The string is being pulled...";
const WORDS_PLACEHOLDER: &str = "Sacred words will appear here...";

const GOLD: Color = Color::Rgb(255, 215, 0);
const PURPLE: Color = Color::Rgb(159, 122, 234);
const SOFT_GREEN: Color = Color::Rgb(144, 238, 144);
const ORANGE: Color = Color::Rgb(255, 165, 0);
const SOFT_RED: Color = Color::Rgb(255, 107, 107);
const MUTED: Color = Color::Rgb(176, 176, 176);
const DISABLED_BG: Color = Color::Rgb(74, 85, 104);
const DISABLED_FG: Color = Color::Rgb(113, 128, 150);

// Style constants for consistent UI
const TITLE_STYLE: Style = Style::new().fg(GOLD).add_modifier(Modifier::BOLD);
const SUBTITLE_STYLE: Style = Style::new().fg(MUTED).add_modifier(Modifier::ITALIC);
const PLACEHOLDER_STYLE: Style = Style::new().fg(Color::DarkGray).add_modifier(Modifier::ITALIC);
const MESSAGE_STYLE: Style = Style::new().fg(Color::White);
const ERROR_STYLE: Style = Style::new().fg(SOFT_RED);
const BUTTON_READY_STYLE: Style = Style::new()
    .fg(Color::White)
    .bg(PURPLE)
    .add_modifier(Modifier::BOLD);
const BUTTON_DISABLED_STYLE: Style = Style::new().fg(DISABLED_FG).bg(DISABLED_BG);

#[derive(Clone, Copy, PartialEq, Debug)]
enum StatusTone {
    Info,
    Success,
    Warning,
    Error,
}

impl StatusTone {
    fn style(self) -> Style {
        match self {
            Self::Info => Style::new().fg(MUTED),
            Self::Success => Style::new().fg(SOFT_GREEN),
            Self::Warning => Style::new().fg(ORANGE),
            Self::Error => Style::new().fg(SOFT_RED),
        }
    }
}

fn status_for(notice: &BankNotice) -> (String, StatusTone) {
    match notice {
        BankNotice::Loaded(count) => (format!("✓ Loaded {count} words"), StatusTone::Success),
        BankNotice::TooSmall(count) => (
            format!("⚠ Not enough words in the word bank ({count})"),
            StatusTone::Error,
        ),
        BankNotice::Missing(path) => (
            format!("⚠ {} not found in directory", path.display()),
            StatusTone::Warning,
        ),
        BankNotice::Created(path) => (
            format!("✓ Created sample {}", path.display()),
            StatusTone::Success,
        ),
        BankNotice::Failed(reason) => (
            format!("Error loading word bank: {reason}"),
            StatusTone::Error,
        ),
    }
}

fn button_label(trigger: TriggerState) -> &'static str {
    match trigger {
        TriggerState::Busy => "⏳ Pulling...",
        TriggerState::Ready | TriggerState::Disabled => "📿 Pull String",
    }
}

fn instructions(trigger: TriggerState, confirming: bool) -> &'static str {
    if confirming {
        return "Y: Use fallback word bank | N: Continue without words";
    }
    match trigger {
        TriggerState::Ready => "ENTER/SPACE/P: Pull String | ESC/Q: Quit",
        TriggerState::Busy => "Waiting for the local model... | ESC/Q: Quit",
        TriggerState::Disabled => "Add at least 10 words to the word bank | ESC/Q: Quit",
    }
}

fn has_modifier_keys(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::ALT) || key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Map a key press to an action given the trigger state.
fn action_for_key(key: &KeyEvent, trigger: TriggerState) -> Option<UserAction> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UserAction::Exit);
    }
    if has_modifier_keys(key) {
        return None;
    }
    match key.code {
        KeyCode::Esc | KeyCode::Char('q' | 'Q') => Some(UserAction::Exit),
        KeyCode::Enter | KeyCode::Char(' ' | 'p' | 'P') if trigger == TriggerState::Ready => {
            Some(UserAction::Pull)
        }
        _ => None,
    }
}

fn answer_for_key(key: &KeyEvent) -> Option<bool> {
    match key.code {
        KeyCode::Char('y' | 'Y') | KeyCode::Enter => Some(true),
        KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(false),
        _ => None,
    }
}

/// Context for rendering the UI - groups related parameters to avoid too many function arguments.
struct RenderContext<'a> {
    status: &'a str,
    status_tone: StatusTone,
    trigger: TriggerState,
    words: &'a [String],
    message: &'a str,
    message_is_error: bool,
    placeholder: &'a str,
    confirm_prompt: Option<&'a str>,
}

/// Main TUI interface component.
///
/// Generic over the ratatui backend so rendering can run against a test
/// buffer; [`TuiInterface::new`] sets up the real terminal.
pub struct TuiInterface<B: Backend = CrosstermBackend<io::Stdout>> {
    terminal: Terminal<B>,
    owns_terminal: bool,
    status: String,
    status_tone: StatusTone,
    trigger: TriggerState,
    words: Vec<String>,
    message: String,
    message_is_error: bool,
    placeholder: &'static str,
    confirm_prompt: Option<String>,
}

impl TuiInterface {
    pub fn new() -> Result<Self, io::Error> {
        info_log!("TuiInterface::new() - Initializing TUI");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        info_log!("Terminal setup complete: alternate screen, cursor hidden");

        let mut interface = Self::with_terminal(terminal);
        interface.owns_terminal = true;
        Ok(interface)
    }
}

impl<B: Backend> TuiInterface<B> {
    pub fn with_terminal(terminal: Terminal<B>) -> Self {
        Self {
            terminal,
            owns_terminal: false,
            status: "Loading word bank...".to_string(),
            status_tone: StatusTone::Info,
            trigger: TriggerState::Disabled,
            words: Vec::new(),
            message: String::new(),
            message_is_error: false,
            placeholder: IDLE_PLACEHOLDER,
            confirm_prompt: None,
        }
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub fn cleanup(&mut self) -> Result<(), io::Error> {
        if !self.owns_terminal {
            return Ok(());
        }
        self.owns_terminal = false;
        disable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, LeaveAlternateScreen, cursor::Show)?;
        Ok(())
    }

    /// Draw the current UI state to the terminal.
    fn draw(&mut self) -> Result<(), io::Error> {
        let ctx = RenderContext {
            status: &self.status,
            status_tone: self.status_tone,
            trigger: self.trigger,
            words: &self.words,
            message: &self.message,
            message_is_error: self.message_is_error,
            placeholder: self.placeholder,
            confirm_prompt: self.confirm_prompt.as_deref(),
        };

        self.terminal.draw(|f| {
            render_static(f, &ctx);
        })?;
        Ok(())
    }

    /// Log and handle draw errors appropriately
    fn draw_or_log(&mut self) {
        if let Err(e) = self.draw() {
            debug_log!("Draw error: {}", e);
        }
    }

    /// Wait up to the poll timeout for a key press.
    ///
    /// Non-key events and key releases are dropped, as are the garbage
    /// characters some terminals emit on focus changes.
    fn read_key(&mut self) -> Result<Option<KeyEvent>, io::Error> {
        if !event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            return Ok(None);
        }

        match event::read()? {
            Event::Key(key) => {
                if key.kind != event::KeyEventKind::Press {
                    return Ok(None);
                }
                if let KeyCode::Char(c) = key.code
                    && (c == '\u{FFFD}' || (c as u32) < ASCII_CONTROL_CHAR_THRESHOLD)
                {
                    debug_log!("read_key() - Ignoring invalid character {:?}", c);
                    return Ok(None);
                }
                Ok(Some(key))
            }
            Event::Resize(_, _) => {
                self.draw_or_log();
                Ok(None)
            }
            other => {
                debug_log!("read_key() - Ignoring event: {:?}", other);
                Ok(None)
            }
        }
    }
}

/// Render the complete UI layout using the provided context.
fn render_static(f: &mut Frame, ctx: &RenderContext) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(3)])
        .split(f.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(LEFT_PANEL_WIDTH), Constraint::Min(20)])
        .split(rows[0]);

    render_left_panel(f, columns[0], ctx);
    render_message(f, columns[1], ctx);
    render_instructions(f, rows[1], ctx);

    if let Some(prompt) = ctx.confirm_prompt {
        render_confirm(f, f.area(), prompt);
    }
}

fn render_left_panel(f: &mut Frame, area: Rect, ctx: &RenderContext) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(1), // Subtitle
            Constraint::Length(5), // Tribute
            Constraint::Length(4), // Status
            Constraint::Length(3), // Button
            Constraint::Min(4),    // Sacred words
        ])
        .split(area);

    let title = Paragraph::new("✝ GodString ✝")
        .style(TITLE_STYLE)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Style::new().fg(GOLD)));
    f.render_widget(title, chunks[0]);

    let subtitle = Paragraph::new("Divine Word Interpreter")
        .style(SUBTITLE_STYLE)
        .alignment(Alignment::Center);
    f.render_widget(subtitle, chunks[1]);

    let tribute = Paragraph::new(vec![
        Line::from("Inspired by Terry A. Davis"),
        Line::from("1969-2018"),
        Line::from("✝"),
    ])
    .style(Style::new().fg(Color::White))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(tribute, chunks[2]);

    let status = Paragraph::new(ctx.status)
        .style(ctx.status_tone.style())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, chunks[3]);

    render_button(f, chunks[4], ctx.trigger);
    render_words(f, chunks[5], ctx.words);
}

fn render_button(f: &mut Frame, area: Rect, trigger: TriggerState) {
    let (style, border) = match trigger {
        TriggerState::Ready => (BUTTON_READY_STYLE, Style::new().fg(GOLD)),
        TriggerState::Busy | TriggerState::Disabled => {
            (BUTTON_DISABLED_STYLE, Style::new().fg(Color::DarkGray))
        }
    };
    let button = Paragraph::new(button_label(trigger))
        .style(style)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Thick)
                .border_style(border),
        );
    f.render_widget(button, area);
}

fn render_words(f: &mut Frame, area: Rect, words: &[String]) {
    let line = if words.is_empty() {
        Line::from(Span::styled(WORDS_PLACEHOLDER, PLACEHOLDER_STYLE))
    } else {
        Line::from(Span::styled(words.join(WORD_SEPARATOR), MESSAGE_STYLE))
    };
    let paragraph = Paragraph::new(line).wrap(Wrap { trim: true }).block(
        Block::default()
            .title(Span::styled("Sacred Words:", TITLE_STYLE))
            .borders(Borders::ALL),
    );
    f.render_widget(paragraph, area);
}

fn render_message(f: &mut Frame, area: Rect, ctx: &RenderContext) {
    let (text, style) = if ctx.message.is_empty() {
        (ctx.placeholder, PLACEHOLDER_STYLE)
    } else if ctx.message_is_error {
        (ctx.message, ERROR_STYLE)
    } else {
        (ctx.message, MESSAGE_STYLE)
    };

    let lines: Vec<Line> = text
        .lines()
        .map(|line| Line::from(Span::styled(line, style)))
        .collect();

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .title(Span::styled("Divine Message", TITLE_STYLE))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::new().fg(GOLD)),
    );
    f.render_widget(paragraph, area);
}

fn render_instructions(f: &mut Frame, area: Rect, ctx: &RenderContext) {
    let paragraph = Paragraph::new(instructions(ctx.trigger, ctx.confirm_prompt.is_some()))
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

fn render_confirm(f: &mut Frame, area: Rect, prompt: &str) {
    let width = area.width.saturating_sub(4).min(60);
    let height = 7.min(area.height);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    let paragraph = Paragraph::new(vec![
        Line::from(prompt),
        Line::from(""),
        Line::from(Span::styled("[Y]es / [N]o", TITLE_STYLE)),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title("Create Fallback Word Bank?")
            .borders(Borders::ALL)
            .border_style(Style::new().fg(ORANGE)),
    );
    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

impl<B: Backend> AppInterface for TuiInterface<B> {
    fn display_wordbank_status(&mut self, notice: &BankNotice) {
        let (status, tone) = status_for(notice);
        info_log!("display_wordbank_status() - {}", status);
        self.status = status;
        self.status_tone = tone;
        self.draw_or_log();
    }

    fn offer_default_wordbank(&mut self, path: &Path) -> bool {
        self.confirm_prompt = Some(format!(
            "{} not found. Would you like to use the fallback word bank?",
            path.display()
        ));

        let answer = loop {
            if self.draw().is_err() {
                break false;
            }
            match self.read_key() {
                Ok(Some(key)) => {
                    if let Some(answer) = answer_for_key(&key) {
                        break answer;
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    debug_log!("offer_default_wordbank() - Input error: {}", e);
                    break false;
                }
            }
        };

        info_log!("offer_default_wordbank() - Answer: {}", answer);
        self.confirm_prompt = None;
        self.draw_or_log();
        answer
    }

    fn next_action(&mut self, trigger: TriggerState) -> Option<UserAction> {
        self.trigger = trigger;
        if self.draw().is_err() {
            info_log!("next_action() - Draw failed, returning Exit");
            return Some(UserAction::Exit);
        }

        match self.read_key() {
            Ok(Some(key)) => {
                let action = action_for_key(&key, trigger);
                debug_log!("next_action() - Key {:?} -> {:?}", key.code, action);
                action
            }
            Ok(None) => None,
            Err(e) => {
                info_log!("next_action() - Error handling input, returning Exit: {}", e);
                Some(UserAction::Exit)
            }
        }
    }

    fn display_words(&mut self, words: &[String]) {
        self.words = words.to_vec();
        self.message.clear();
        self.message_is_error = false;
        self.placeholder = PULLING_PLACEHOLDER;
    }

    fn display_pulling(&mut self) {
        self.trigger = TriggerState::Busy;
        self.draw_or_log();
    }

    fn display_message(&mut self, message: &str) {
        self.message = message.to_string();
        self.message_is_error = false;
        self.placeholder = IDLE_PLACEHOLDER;
        self.draw_or_log();
    }

    fn display_failure(&mut self, text: &str) {
        self.message = text.to_string();
        self.message_is_error = true;
        self.placeholder = IDLE_PLACEHOLDER;
        self.draw_or_log();
    }

    fn display_exit_message(&mut self) {
        self.status = "Exiting...".to_string();
        self.status_tone = StatusTone::Info;
        self.draw_or_log();
    }
}

impl<B: Backend> Drop for TuiInterface<B> {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use std::path::PathBuf;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn screen(interface: &TuiInterface<TestBackend>) -> String {
        let buffer = interface.terminal().backend().buffer();
        buffer.content.iter().map(|cell| cell.symbol()).collect()
    }

    fn test_interface() -> TuiInterface<TestBackend> {
        TuiInterface::with_terminal(Terminal::new(TestBackend::new(120, 32)).unwrap())
    }

    #[test]
    fn test_pull_keys_only_when_ready() {
        for code in [KeyCode::Enter, KeyCode::Char(' '), KeyCode::Char('p')] {
            assert_eq!(action_for_key(&key(code), TriggerState::Ready), Some(UserAction::Pull));
            assert_eq!(action_for_key(&key(code), TriggerState::Busy), None);
            assert_eq!(action_for_key(&key(code), TriggerState::Disabled), None);
        }
    }

    #[test]
    fn test_exit_keys_in_any_state() {
        for trigger in [TriggerState::Ready, TriggerState::Busy, TriggerState::Disabled] {
            assert_eq!(action_for_key(&key(KeyCode::Esc), trigger), Some(UserAction::Exit));
            assert_eq!(action_for_key(&key(KeyCode::Char('q')), trigger), Some(UserAction::Exit));
            let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
            assert_eq!(action_for_key(&ctrl_c, trigger), Some(UserAction::Exit));
        }
    }

    #[test]
    fn test_modified_keys_ignored() {
        let alt_p = KeyEvent::new(KeyCode::Char('p'), KeyModifiers::ALT);
        assert_eq!(action_for_key(&alt_p, TriggerState::Ready), None);
    }

    #[test]
    fn test_answer_keys() {
        assert_eq!(answer_for_key(&key(KeyCode::Char('y'))), Some(true));
        assert_eq!(answer_for_key(&key(KeyCode::Char('N'))), Some(false));
        assert_eq!(answer_for_key(&key(KeyCode::Esc)), Some(false));
        assert_eq!(answer_for_key(&key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_status_for_notices() {
        assert_eq!(
            status_for(&BankNotice::Loaded(35)),
            ("✓ Loaded 35 words".to_string(), StatusTone::Success)
        );
        assert_eq!(status_for(&BankNotice::TooSmall(3)).1, StatusTone::Error);
        assert_eq!(
            status_for(&BankNotice::Missing(PathBuf::from("bank.db"))).1,
            StatusTone::Warning
        );
    }

    #[test]
    fn test_button_label_follows_trigger() {
        assert_eq!(button_label(TriggerState::Busy), "⏳ Pulling...");
        assert_eq!(button_label(TriggerState::Ready), "📿 Pull String");
    }

    #[test]
    fn test_renders_initial_layout() {
        let mut interface = test_interface();
        interface.draw().unwrap();
        let text = screen(&interface);
        assert!(text.contains("GodString"));
        assert!(text.contains("Divine Message"));
        assert!(text.contains("Loading word bank..."));
        assert!(text.contains("Sacred words will appear here..."));
    }

    #[test]
    fn test_renders_words_and_message() {
        let mut interface = test_interface();
        interface.display_wordbank_status(&BankNotice::Loaded(35));
        interface.display_words(&["grace".to_string(), "mercy".to_string()]);
        interface.display_pulling();
        let pulling = screen(&interface);
        assert!(pulling.contains("grace • mercy"));
        assert!(pulling.contains("The string is being pulled..."));

        interface.display_message("Be still.\n\nKnow peace.");
        let done = screen(&interface);
        assert!(done.contains("Be still."));
        assert!(done.contains("Know peace."));
        assert!(done.contains("Loaded 35 words"));
    }

    #[test]
    fn test_renders_failure_text() {
        let mut interface = test_interface();
        interface.display_failure("Cannot connect to the local inference service.");
        assert!(screen(&interface).contains("Cannot connect"));
    }
}
