//! TUI module for clockly
//!
//! A category-grouped sound selector with an offline preview of the
//! selected sound.

mod state;
mod status;
mod waveform;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    DefaultTerminal, Frame,
};
use std::time::Duration;
use tracing::warn;

use clockly_tones::{backend::CpalHost, ToneSequencer};

use crate::app::Clockly;
use state::{Row, SelectorState};
use status::{render_status, AudioStats, LastPlay};
use waveform::render_waveform;

pub struct UiApp<'a> {
    clockly: &'a Clockly,
    sequencer: ToneSequencer<CpalHost>,
    selector: SelectorState,
    last: LastPlay,
    /// Offline render of the selection, refreshed when the cursor moves
    preview: Vec<f32>,
    should_quit: bool,
}

impl<'a> UiApp<'a> {
    pub fn new(clockly: &'a Clockly) -> EyreResult<Self> {
        let mut app = Self {
            clockly,
            sequencer: clockly.live_sequencer()?,
            selector: SelectorState::from_catalog(clockly.catalog()),
            last: LastPlay::Idle,
            preview: Vec::new(),
            should_quit: false,
        };
        app.refresh_preview();
        Ok(app)
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selector.previous();
                self.refresh_preview();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selector.next();
                self.refresh_preview();
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.play_selected(),
            _ => {}
        }
    }

    fn play_selected(&mut self) {
        let Some(name) = self.selector.selected_name() else {
            return;
        };

        self.last = if self.sequencer.play_sound(name) {
            LastPlay::Played(name.to_string())
        } else {
            LastPlay::Unknown(name.to_string())
        };
    }

    fn refresh_preview(&mut self) {
        self.preview = match self.selector.selected_name() {
            Some(name) => self.clockly.render_samples(name).unwrap_or_else(|err| {
                warn!(sound = name, %err, "preview render failed");
                Vec::new()
            }),
            None => Vec::new(),
        };
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        // Main layout: status, body, help
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Status bar
                Constraint::Min(8),    // Selector + preview
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(24), Constraint::Min(20)])
            .split(chunks[1]);

        let selected_name = self.selector.selected_name();
        let selected = selected_name.and_then(|name| self.sequencer.sound(name));
        let stats = AudioStats::from_buffer(&self.preview);
        render_status(frame, chunks[0], &self.last, selected, &stats);

        // Selector
        let items: Vec<ListItem> = self
            .selector
            .rows()
            .iter()
            .map(|row| match row {
                Row::Header(name) => ListItem::new(name.as_str()).style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Row::Sound(name) => ListItem::new(format!("  {name}")),
            })
            .collect();
        let list = List::new(items)
            .block(Block::default().title(" Sounds ").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::Green));
        let mut list_state = ListState::default().with_selected(self.selector.selected_row());
        frame.render_stateful_widget(list, body[0], &mut list_state);

        render_waveform(frame, body[1], selected_name.unwrap_or("Preview"), &self.preview);

        let help = Paragraph::new(" [↑/↓] Select  [Enter/Space] Play  [Q] Quit")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[2]);
    }
}
