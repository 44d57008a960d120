//! # Link Viewer Component
//!
//! Overlay for links the sequence asks to show embedded. A terminal cannot
//! host a browser, so the overlay shows the address and lets the user hand it
//! to the system opener or dismiss it. Links that are not embedded skip the
//! overlay and go straight to the opener.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `LinkViewerState` lives in `TuiState` while the overlay is open
//! - `LinkViewer` is created each frame with borrowed state

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkViewerState {
    pub url: String,
    /// Set once the opener has been asked, so the overlay can say so.
    pub opened: bool,
}

impl LinkViewerState {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            opened: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    OpenExternal(String),
    Close,
}

impl EventHandler for LinkViewerState {
    type Event = LinkEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::Escape | TuiEvent::InputChar('q') => Some(LinkEvent::Close),
            TuiEvent::Submit | TuiEvent::InputChar('o') => {
                self.opened = true;
                Some(LinkEvent::OpenExternal(self.url.clone()))
            }
            _ => None,
        }
    }
}

/// Transient render wrapper for the link overlay.
pub struct LinkViewer<'a> {
    state: &'a LinkViewerState,
}

impl<'a> LinkViewer<'a> {
    pub fn new(state: &'a LinkViewerState) -> Self {
        Self { state }
    }
}

impl Component for LinkViewer<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(70, 40, area);
        frame.render_widget(Clear, overlay);

        let help_text = " Enter Open in browser  Esc Back ";
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Link ")
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(help_text).centered())
            .padding(Padding::horizontal(1));

        let mut lines = vec![Line::styled(
            self.state.url.as_str(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::UNDERLINED),
        )];
        if self.state.opened {
            lines.push(Line::raw(""));
            lines.push(Line::styled(
                "Sent to your browser.",
                Style::default().fg(Color::DarkGray),
            ));
        }

        let body = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .block(block);
        frame.render_widget(body, overlay);
    }
}

/// Compute a centered rect using percentage of the outer rect.
fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}
