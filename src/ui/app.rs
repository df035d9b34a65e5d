//! Main TUI application state and logic

use crate::player::PlaybackState;
use crate::session::Session;
use crate::snapshot::Status;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Event poll timeout while nothing is playing
const IDLE_POLL: Duration = Duration::from_millis(100);

/// Which scrollable pane receives Up/Down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Narration,
    Variables,
}

impl FocusedPane {
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Narration => FocusedPane::Variables,
            FocusedPane::Variables => FocusedPane::Narration,
        }
    }
}

/// The main application state
pub struct App {
    /// Active algorithm, its timeline player and tick source
    pub session: Session,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub source_scroll: super::panes::SourceScrollState,
    pub variables_scroll: usize,
    pub narration_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    pub fn new(session: Session) -> Self {
        App {
            session,
            focused_pane: FocusedPane::Narration,
            source_scroll: super::panes::SourceScrollState::default(),
            variables_scroll: 0,
            narration_scroll: usize::MAX,
            should_quit: false,
            status_message: String::from("Ready!"),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or_else(Instant::now),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            let was_playing = self.session.player().is_playing();
            if self.session.pump() {
                self.narration_scroll = usize::MAX;
            }
            if was_playing && self.session.player().state() == PlaybackState::Ended {
                self.status_message = "Playback complete".to_string();
            }

            // Wake up in time for the next tick while playing
            let timeout = self.session.timeout().unwrap_or(IDLE_POLL);
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_chunks[0]);

        // Left column: Payload (top) | Narration (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(columns[0]);

        // Right column: Pseudocode (top) | Variables (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(columns[1]);

        let algorithm = self.session.algorithm();
        let player = self.session.player();
        let snapshot = player.current_snapshot();
        let title = format!("{} · {}", algorithm.family().name(), algorithm.name());

        super::panes::render_payload_pane(frame, left_rows[0], &title, snapshot);

        super::panes::render_narration_pane(
            frame,
            left_rows[1],
            player.timeline(),
            player.position(),
            self.focused_pane == FocusedPane::Narration,
            &mut self.narration_scroll,
        );

        super::panes::render_source_pane(
            frame,
            right_rows[0],
            "Pseudocode",
            algorithm.pseudocode(),
            snapshot.and_then(|s| s.source_line),
            snapshot.is_some_and(|s| s.status == Status::Error),
            &mut self.source_scroll,
        );

        super::panes::render_variables_pane(
            frame,
            right_rows[1],
            snapshot
                .map(|s| s.variables.as_slice())
                .unwrap_or_default(),
            self.focused_pane == FocusedPane::Variables,
            &mut self.variables_scroll,
        );

        super::panes::render_status_bar(
            frame,
            main_chunks[1],
            &super::panes::StatusRenderData {
                message: &self.status_message,
                algorithm: algorithm.name(),
                position: player.position(),
                total: player.len(),
                progress: player.progress(),
                state: player.state(),
                status: snapshot.map(|s| s.status),
                elapsed: player.elapsed(),
                speed: player.speed(),
            },
        );
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                let n = c.to_digit(10).map_or(1, |d| d as usize);
                let before = self.session.player().position();
                self.session.seek(before + n);
                let stepped = self.session.player().position() - before;
                self.status_message = format!("Stepped forward {} step(s)", stepped);
                self.narration_scroll = usize::MAX;
            }
            KeyCode::Char('f') => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Tab => {
                self.session.next_algorithm();
                self.on_reload();
            }
            KeyCode::BackTab => {
                self.session.previous_algorithm();
                self.on_reload();
            }
            KeyCode::Char('r') => {
                if self.session.reseed(rand::random()) {
                    self.on_reload();
                    self.status_message = "Re-recorded with a new seed".to_string();
                } else {
                    self.status_message = "This input has no random source".to_string();
                }
            }
            KeyCode::Left => {
                self.session.step_back();
                self.status_message = "Stepped backward".to_string();
                self.narration_scroll = usize::MAX;
            }
            KeyCode::Right => {
                self.session.step_forward();
                self.status_message = "Stepped forward".to_string();
                self.narration_scroll = usize::MAX;
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Narration => {
                    self.narration_scroll = self.narration_scroll.saturating_sub(1);
                }
                FocusedPane::Variables => {
                    self.variables_scroll = self.variables_scroll.saturating_sub(1);
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Narration => {
                    self.narration_scroll = self.narration_scroll.saturating_add(1);
                }
                FocusedPane::Variables => {
                    self.variables_scroll = self.variables_scroll.saturating_add(1);
                }
            },
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.session.faster();
                self.status_message = format!("Speed {}", self.session.player().speed());
            }
            KeyCode::Char('-') | KeyCode::Char('_') => {
                self.session.slower();
                self.status_message = format!("Speed {}", self.session.player().speed());
            }
            KeyCode::Char(' ') => {
                // Toggle auto-play (with 200ms debounce to prevent key repeat spam)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.session.toggle();
                    self.status_message = match self.session.player().state() {
                        PlaybackState::Playing => "Playing...".to_string(),
                        PlaybackState::Ended => "Already at the end".to_string(),
                        _ => "Paused".to_string(),
                    };
                }
            }
            KeyCode::Enter => {
                self.session.seek_end();
                self.status_message = "Jumped to end".to_string();
                self.narration_scroll = usize::MAX;
            }
            KeyCode::Backspace => {
                self.session.seek_start();
                self.status_message = "Jumped to start".to_string();
                self.narration_scroll = usize::MAX;
            }
            _ => {}
        }
    }

    /// Reset per-timeline view state after the session re-recorded
    fn on_reload(&mut self) {
        self.source_scroll = super::panes::SourceScrollState::default();
        self.variables_scroll = 0;
        self.narration_scroll = usize::MAX;
        let steps = self.session.player().len();
        self.status_message = format!("Recorded {} step(s)", steps);
    }
}
