//! # Header Component
//!
//! Top bar of the chat screen: the title on the left, the cancel affordance
//! on the right.
//!
//! ## Cancel Affordance
//!
//! The `✕ Esc` control fades in when the sequence reveals it. A terminal has
//! no alpha channel, so opacity is mapped onto modifiers:
//!
//! | opacity      | rendering        |
//! |--------------|------------------|
//! | 0.0          | not drawn        |
//! | (0.0, 0.5)   | `DIM`            |
//! | [0.5, 1.0]   | tint color       |
//!
//! Clicks on [`Header::cancel_area`] are reported by the parent as
//! `Action::CancelPressed`.
//!
//! ## Unseen Content
//!
//! When the message list is scrolled away from the bottom the title gains a
//! `↓ New` marker, as the conversation may have moved on below.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

pub const CANCEL_LABEL: &str = " ✕ Esc ";

/// Opacity below which the cancel control is drawn dimmed.
const DIM_THRESHOLD: f32 = 0.5;

pub struct Header {
    pub title: String,
    /// 0.0 (hidden) to 1.0 (fully shown)
    pub cancel_opacity: f32,
    pub cancel_tint: Color,
    pub has_unseen_content: bool,
}

impl Header {
    pub fn new(title: impl Into<String>, cancel_opacity: f32, cancel_tint: Color) -> Self {
        Self {
            title: title.into(),
            cancel_opacity,
            cancel_tint,
            has_unseen_content: false,
        }
    }

    /// Screen rect occupied by the cancel control within a header at `area`.
    pub fn cancel_area(area: Rect) -> Rect {
        let width = (CANCEL_LABEL.width() as u16).min(area.width);
        Rect::new(area.right().saturating_sub(width), area.y, width, area.height.min(1))
    }

    fn cancel_style(&self) -> Option<Style> {
        if self.cancel_opacity <= 0.0 {
            return None;
        }
        let style = Style::default().fg(self.cancel_tint);
        Some(if self.cancel_opacity < DIM_THRESHOLD {
            style.add_modifier(Modifier::DIM)
        } else {
            style
        })
    }
}

impl Component for Header {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title_text = if self.has_unseen_content {
            format!(" {} | ↓ New", self.title)
        } else {
            format!(" {}", self.title)
        };
        frame.render_widget(
            Line::from(Span::styled(
                title_text,
                Style::default().add_modifier(Modifier::BOLD),
            )),
            area,
        );

        if let Some(style) = self.cancel_style() {
            frame.render_widget(
                Line::from(Span::styled(CANCEL_LABEL, style)),
                Self::cancel_area(area),
            );
        }
    }
}
