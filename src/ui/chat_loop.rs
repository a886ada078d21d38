//! Full-screen chat loop.
//!
//! Each submitted line is one turn. The user's entry and a typing indicator
//! are drawn first, then the turn is awaited to completion before the next
//! key is read, so a session never has two turns in flight.

use std::{error::Error, io, time::Duration};

use chrono::Local;
use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};

use crate::core::completion::{CompletionBackend, HttpBackend};
use crate::core::config::Settings;
use crate::core::session::ChatSession;
use crate::ui::renderer::{ui, ViewState};
use crate::utils::logging::{log_last_entry, TranscriptLog};

type ChatTerminal = Terminal<CrosstermBackend<io::Stdout>>;

const PAGE_SCROLL: u16 = 10;

#[derive(Debug, PartialEq, Eq)]
pub enum KeyAction {
    None,
    Submit(String),
    Quit,
}

/// Input line and scroll position for the chat view.
#[derive(Debug)]
pub struct ChatView {
    pub state: ViewState,
    max_scroll: u16,
}

impl Default for ChatView {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatView {
    pub fn new() -> Self {
        Self {
            state: ViewState {
                auto_scroll: true,
                ..ViewState::default()
            },
            max_scroll: 0,
        }
    }

    pub fn set_max_scroll(&mut self, max_scroll: u16) {
        self.max_scroll = max_scroll;
        if self.state.scroll_offset > max_scroll {
            self.state.scroll_offset = max_scroll;
        }
    }

    fn current_offset(&self) -> u16 {
        if self.state.auto_scroll {
            self.max_scroll
        } else {
            self.state.scroll_offset.min(self.max_scroll)
        }
    }

    fn scroll_up(&mut self, rows: u16) {
        self.state.scroll_offset = self.current_offset().saturating_sub(rows);
        self.state.auto_scroll = false;
    }

    fn scroll_down(&mut self, rows: u16) {
        let offset = self.current_offset().saturating_add(rows);
        if offset >= self.max_scroll {
            self.state.scroll_offset = self.max_scroll;
            self.state.auto_scroll = true;
        } else {
            self.state.scroll_offset = offset;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyAction {
        if key.kind != KeyEventKind::Press {
            return KeyAction::None;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
            KeyCode::Esc => KeyAction::Quit,
            KeyCode::Enter => {
                if self.state.input.trim().is_empty() {
                    return KeyAction::None;
                }
                self.state.auto_scroll = true;
                KeyAction::Submit(std::mem::take(&mut self.state.input))
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.state.input.push(c);
                KeyAction::None
            }
            KeyCode::Backspace => {
                self.state.input.pop();
                KeyAction::None
            }
            KeyCode::Up => {
                self.scroll_up(1);
                KeyAction::None
            }
            KeyCode::Down => {
                self.scroll_down(1);
                KeyAction::None
            }
            KeyCode::PageUp => {
                self.scroll_up(PAGE_SCROLL);
                KeyAction::None
            }
            KeyCode::PageDown => {
                self.scroll_down(PAGE_SCROLL);
                KeyAction::None
            }
            _ => KeyAction::None,
        }
    }
}

fn setup_terminal() -> Result<ChatTerminal, Box<dyn Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout)).inspect_err(|_| {
        let _ = disable_raw_mode();
    })?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut ChatTerminal) -> Result<(), Box<dyn Error>> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn draw(
    terminal: &mut ChatTerminal,
    view: &mut ChatView,
    session: &ChatSession,
) -> io::Result<()> {
    let mut max_scroll = 0;
    terminal.draw(|f| max_scroll = ui(f, &view.state, session.transcript()))?;
    view.set_max_scroll(max_scroll);
    Ok(())
}

pub async fn run_chat(settings: Settings) -> Result<(), Box<dyn Error>> {
    let log = TranscriptLog::new(settings.log_file.clone())?;
    if let Err(err) = log.start_session(&settings.model, Local::now()) {
        warn!(error = %err, "failed to write transcript log");
    }

    let backend = HttpBackend::from_settings(&settings);
    let mut session = ChatSession::with_context_warn_threshold(settings.context_warn_threshold);
    info!(model = %settings.model, endpoint = %backend.endpoint(), "starting chat session");

    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &mut session, &backend, &log).await;
    restore_terminal(&mut terminal)?;

    result
}

async fn event_loop(
    terminal: &mut ChatTerminal,
    session: &mut ChatSession,
    backend: &dyn CompletionBackend,
    log: &TranscriptLog,
) -> Result<(), Box<dyn Error>> {
    let mut view = ChatView::new();

    loop {
        draw(terminal, &mut view, session)?;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };

        match view.handle_key(key) {
            KeyAction::Quit => return Ok(()),
            KeyAction::Submit(input) => {
                let pending = session.begin_turn(&input);
                log_last_entry(log, session.transcript());

                view.state.waiting = true;
                draw(terminal, &mut view, session)?;

                session.complete_pending(pending, backend).await;
                log_last_entry(log, session.transcript());
                view.state.waiting = false;
            }
            KeyAction::None => {}
        }
    }
}
