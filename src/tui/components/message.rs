use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Padding, Paragraph, Widget, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::core::message::{Message, Origin};
use crate::tui::component::Component;
use crate::tui::palette::Palette;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;
/// Bubbles never span more than this share of the row.
const MAX_BUBBLE_PERCENT: u16 = 75;
/// Entrance fade progress below which a row is drawn dimmed.
const FADE_DIM_THRESHOLD: f32 = 0.999;

/// A single conversation row: a bordered bubble, left-aligned for the app
/// and right-aligned for the user, below `leading_margin` blank rows.
///
/// # Height Calculation
///
/// [`calculate_height`](Self::calculate_height) predicts the rendered height
/// with `textwrap`, using options that match ratatui's `Paragraph` wrapping,
/// so the parent `MessageList` can lay out rows without rendering them.
#[derive(Clone, Copy)]
pub struct ChatRow<'a> {
    pub message: &'a Message,
    pub leading_margin: u16,
    pub palette: &'a Palette,
    /// Entrance fade progress, 0.0 to 1.0.
    pub fade: f32,
}

impl<'a> ChatRow<'a> {
    pub fn new(message: &'a Message, leading_margin: u16, palette: &'a Palette, fade: f32) -> Self {
        Self {
            message,
            leading_margin,
            palette,
            fade,
        }
    }

    /// Outer width of the bubble for `text` in a row of `width` columns.
    pub fn bubble_width(text: &str, width: u16) -> u16 {
        let share = u32::from(width) * u32::from(MAX_BUBBLE_PERCENT) / 100;
        let max_width = u16::try_from(share)
            .unwrap_or(width)
            .max(HORIZONTAL_OVERHEAD + 1)
            .min(width);
        let longest = text
            .trim()
            .lines()
            .map(UnicodeWidthStr::width)
            .max()
            .unwrap_or(0);
        let wanted = u16::try_from(longest)
            .unwrap_or(u16::MAX)
            .saturating_add(HORIZONTAL_OVERHEAD);
        wanted.min(max_width)
    }

    /// Calculate the height of a row, margin included, for a given width.
    pub fn calculate_height(message: &Message, width: u16, leading_margin: u16) -> u16 {
        let content_width = Self::bubble_width(&message.text, width).saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Degenerate case: terminal too narrow for borders + padding.
            return leading_margin.saturating_add(1);
        }

        let content = message.text.trim();
        if content.is_empty() {
            return leading_margin.saturating_add(VERTICAL_OVERHEAD);
        }

        let options = textwrap::Options::new(content_width as usize)
            .break_words(true)
            .word_separator(textwrap::WordSeparator::AsciiSpace);

        let lines = textwrap::wrap(content, options);
        let line_count = u16::try_from(lines.len()).unwrap_or(u16::MAX).max(1);
        leading_margin
            .saturating_add(line_count)
            .saturating_add(VERTICAL_OVERHEAD)
    }

    fn bubble_area(&self, area: Rect) -> Rect {
        let margin = self.leading_margin.min(area.height);
        let width = Self::bubble_width(&self.message.text, area.width);
        let x = match self.message.origin {
            Origin::App => area.x,
            Origin::User => area.right().saturating_sub(width),
        };
        Rect::new(x, area.y.saturating_add(margin), width, area.height - margin)
    }

    fn faded(&self, style: Style) -> Style {
        if self.fade < FADE_DIM_THRESHOLD {
            style.add_modifier(Modifier::DIM)
        } else {
            style
        }
    }
}

impl<'a> Widget for ChatRow<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bubble = self.bubble_area(area);
        if bubble.is_empty() {
            return;
        }

        let (border_style, text_style) = self.palette.bubble(self.message.origin);
        let block = Block::bordered()
            .border_type(self.palette.border_type)
            .border_style(self.faded(border_style))
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(bubble);
        block.render(bubble, buf);

        Paragraph::new(self.message.text.trim())
            .style(self.faded(text_style))
            .wrap(Wrap { trim: true })
            .render(inner_area, buf);
    }
}

impl<'a> Component for ChatRow<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}
