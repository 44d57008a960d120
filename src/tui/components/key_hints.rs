//! # KeyHints Component
//!
//! The strip below the tray. While a text field has focus it plays the part
//! of the on-screen keyboard: it takes [`KEYBOARD_ROWS`] rows, the core is
//! told the keyboard appeared, and the tray slides up above it. Otherwise it
//! shrinks to the tray's resting bottom margin and shows a one-line hint for
//! whatever the tray currently holds.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::core::tray::TrayMode;
use crate::tui::component::Component;

/// Rows the strip occupies while "the keyboard" is up.
pub const KEYBOARD_ROWS: u16 = 3;

pub struct KeyHints<'a> {
    mode: TrayMode,
    /// Keyboard label of the focused field ("text", "email", "number").
    keyboard: Option<&'a str>,
    cancel_visible: bool,
}

impl<'a> KeyHints<'a> {
    pub fn new(mode: TrayMode, keyboard: Option<&'a str>, cancel_visible: bool) -> Self {
        Self {
            mode,
            keyboard,
            cancel_visible,
        }
    }

    fn hints(&self) -> Vec<(&'static str, &'static str)> {
        let mut hints = match self.mode {
            TrayMode::Idle => vec![("↑↓", "Scroll")],
            TrayMode::PromptShown => vec![("Tab", "Next"), ("1-9", "Pick"), ("Enter", "Select")],
            TrayMode::TextPromptShown => vec![("Enter", "Send"), ("←→", "Move")],
        };
        if self.cancel_visible {
            hints.push(("Esc", "Close"));
        }
        hints.push(("Ctrl+C", "Quit"));
        hints
    }

    fn hint_line(&self) -> Line<'static> {
        let key_style = Style::default().add_modifier(Modifier::BOLD);
        let label_style = Style::default().fg(Color::DarkGray);
        let mut spans = Vec::new();
        for (i, (key, label)) in self.hints().into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(key, key_style));
            spans.push(Span::styled(format!(" {label}"), label_style));
        }
        Line::from(spans)
    }
}

impl Component for KeyHints<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if area.is_empty() {
            return;
        }
        let line = self.hint_line();

        // Short strip: the resting margin, or the keyboard mid-slide.
        if area.height < KEYBOARD_ROWS || self.keyboard.is_none() {
            let last_row = Rect::new(area.x, area.bottom() - 1, area.width, 1);
            frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), last_row);
            return;
        }

        let title = format!(" {} keyboard ", self.keyboard.unwrap_or("text"));
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(title)
            .title_alignment(Alignment::Center);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        // Bottom row of the strip carries the hints.
        let hints_row = Rect::new(inner.x, inner.bottom().saturating_sub(1), inner.width, 1);
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), hints_row);
    }
}
