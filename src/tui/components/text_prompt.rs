//! # TextPrompt Component
//!
//! The single-line field shown in the tray when the sequence asks for free
//! text.
//!
//! ## Responsibilities
//!
//! - Capture text input, filtered by the prompt's `KeyboardKind`
//! - Enforce the optional `max_length` (in characters)
//! - Handle editing (backspace, delete, cursor movement, paste)
//! - Handle submission (Enter), ignoring blank input
//! - Show the placeholder while empty
//!
//! ## State Management
//!
//! The buffer and cursor are internal state. The field spec is set when the
//! core reports `FocusTextInput` and cleared after submission.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::prompt::TextInputSpec;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::palette::Palette;

/// Border (2) + padding (2) consumed horizontally by the bordered block
const HORIZONTAL_OVERHEAD: u16 = 4;
/// Offset from area edge to content (border + padding)
const CONTENT_OFFSET: u16 = 2;

/// High-level events emitted by the TextPrompt
#[derive(Debug, Clone, PartialEq)]
pub enum TextPromptEvent {
    /// User submitted the text (Enter pressed)
    Submit(String),
    ContentChanged,
    /// A character was refused by the keyboard filter or length limit
    Rejected,
}

#[derive(Debug, Default)]
pub struct TextPrompt {
    pub buffer: String,
    /// Field currently accepting input, if any
    pub spec: Option<TextInputSpec>,
    /// Cursor position as byte offset in buffer
    cursor: usize,
    /// First visible column when the text is wider than the field
    scroll: usize,
}

impl TextPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take focus for a new field, discarding any previous text.
    pub fn focus(&mut self, spec: TextInputSpec) {
        self.spec = Some(spec);
        self.buffer.clear();
        self.cursor = 0;
        self.scroll = 0;
    }

    /// Drop focus and any unsent text.
    pub fn blur(&mut self) {
        self.spec = None;
        self.buffer.clear();
        self.cursor = 0;
        self.scroll = 0;
    }

    pub fn is_focused(&self) -> bool {
        self.spec.is_some()
    }

    fn accepts(&self, c: char) -> bool {
        let Some(spec) = &self.spec else {
            return false;
        };
        let within_limit = spec
            .max_length
            .is_none_or(|max| self.buffer.chars().count() < max);
        spec.keyboard.accepts(c) && within_limit
    }

    fn insert(&mut self, c: char) -> bool {
        if !self.accepts(c) {
            return false;
        }
        self.buffer.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        true
    }

    /// Display column of the cursor.
    fn cursor_column(&self) -> usize {
        self.buffer[..self.cursor].width()
    }

    /// Cursor column relative to the first visible column, clamped for a `Rect`.
    fn visible_cursor_column(&self) -> u16 {
        u16::try_from(self.cursor_column().saturating_sub(self.scroll)).unwrap_or(u16::MAX)
    }

    /// Keep the cursor inside a field `inner_width` columns wide.
    fn update_scroll(&mut self, inner_width: u16) {
        let column = self.cursor_column();
        let inner_width = usize::from(inner_width);
        if inner_width == 0 || column < self.scroll {
            self.scroll = column;
        } else if column >= self.scroll + inner_width {
            self.scroll = column + 1 - inner_width;
        }
    }

    /// The slice of the buffer visible from `scroll`, at most `width` columns.
    fn visible_text(&self, width: u16) -> String {
        let end = self.scroll + usize::from(width);
        let mut column = 0usize;
        let mut out = String::new();
        for c in self.buffer.chars() {
            let w = c.width().unwrap_or(0);
            if column >= end {
                break;
            }
            if column >= self.scroll && column + w <= end {
                out.push(c);
            }
            column += w;
        }
        out
    }
}

/// Find the byte offset of the previous character boundary before `pos` in `text`.
fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Find the byte offset of the next character boundary after `pos` in `text`.
fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

/// Transient render wrapper: the field plus its styling props.
pub struct TextPromptView<'a> {
    prompt: &'a mut TextPrompt,
    palette: &'a Palette,
    /// False while the field slides away after submission.
    interactive: bool,
}

impl<'a> TextPromptView<'a> {
    pub fn new(prompt: &'a mut TextPrompt, palette: &'a Palette, interactive: bool) -> Self {
        Self {
            prompt,
            palette,
            interactive,
        }
    }
}

impl Component for TextPromptView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if area.is_empty() {
            return;
        }
        let bordered = area.height >= 3;
        let inner_width = if bordered {
            area.width.saturating_sub(HORIZONTAL_OVERHEAD)
        } else {
            area.width
        };
        self.prompt.update_scroll(inner_width);

        let text_style = Style::default().fg(self.palette.text_input);
        let border_style = Style::default().fg(self.palette.text_input_border);
        let (placeholder, kind) = self
            .prompt
            .spec
            .as_ref()
            .map(|s| (s.placeholder.as_str(), s.keyboard.label()))
            .unwrap_or(("", ""));

        let line = if self.prompt.buffer.is_empty() {
            Line::from(Span::styled(
                placeholder.to_string(),
                text_style.add_modifier(Modifier::DIM | Modifier::ITALIC),
            ))
        } else {
            Line::from(Span::styled(
                self.prompt.visible_text(inner_width),
                text_style,
            ))
        };

        let mut paragraph = Paragraph::new(line);
        if bordered {
            paragraph = paragraph.block(
                Block::bordered()
                    .border_type(self.palette.border_type)
                    .border_style(border_style)
                    .title(format!(" {kind} "))
                    .padding(ratatui::widgets::Padding::horizontal(1)),
            );
        }
        if !self.interactive {
            paragraph = paragraph.style(Style::default().add_modifier(Modifier::DIM));
        }
        frame.render_widget(paragraph, area);

        if self.interactive && self.prompt.is_focused() {
            let offset = if bordered { CONTENT_OFFSET } else { 0 };
            let x = area
                .x
                .saturating_add(offset)
                .saturating_add(self.prompt.visible_cursor_column())
                .min(area.right().saturating_sub(1));
            let y = if bordered { area.y + 1 } else { area.y };
            frame.set_cursor_position((x, y));
        }
    }
}

impl EventHandler for TextPrompt {
    type Event = TextPromptEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if !self.is_focused() {
            return None;
        }
        match event {
            TuiEvent::InputChar(c) => Some(if self.insert(*c) {
                TextPromptEvent::ContentChanged
            } else {
                TextPromptEvent::Rejected
            }),
            TuiEvent::Paste(text) => {
                // Newlines and other refused characters are dropped.
                let inserted = text.chars().filter(|&c| self.insert(c)).count();
                Some(if inserted > 0 {
                    TextPromptEvent::ContentChanged
                } else {
                    TextPromptEvent::Rejected
                })
            }
            TuiEvent::Backspace => (self.cursor > 0).then(|| {
                let prev = prev_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                TextPromptEvent::ContentChanged
            }),
            TuiEvent::Delete => (self.cursor < self.buffer.len()).then(|| {
                let next = next_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(self.cursor..next);
                TextPromptEvent::ContentChanged
            }),
            TuiEvent::CursorLeft => (self.cursor > 0).then(|| {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                TextPromptEvent::ContentChanged
            }),
            TuiEvent::CursorRight => (self.cursor < self.buffer.len()).then(|| {
                self.cursor = next_char_boundary(&self.buffer, self.cursor);
                TextPromptEvent::ContentChanged
            }),
            TuiEvent::CursorHome => (self.cursor != 0).then(|| {
                self.cursor = 0;
                TextPromptEvent::ContentChanged
            }),
            TuiEvent::CursorEnd => (self.cursor != self.buffer.len()).then(|| {
                self.cursor = self.buffer.len();
                TextPromptEvent::ContentChanged
            }),
            TuiEvent::Submit => {
                if self.buffer.trim().is_empty() {
                    return None;
                }
                let text = std::mem::take(&mut self.buffer);
                self.cursor = 0;
                self.scroll = 0;
                self.spec = None;
                Some(TextPromptEvent::Submit(text))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::prompt::KeyboardKind;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn focused(keyboard: KeyboardKind) -> TextPrompt {
        let mut prompt = TextPrompt::new();
        let mut spec = TextInputSpec::new("field");
        spec.keyboard = keyboard;
        prompt.focus(spec);
        prompt
    }

    fn type_str(prompt: &mut TextPrompt, text: &str) {
        for c in text.chars() {
            prompt.handle_event(&TuiEvent::InputChar(c));
        }
    }

    #[test]
    fn test_unfocused_ignores_input() {
        let mut prompt = TextPrompt::new();
        assert_eq!(prompt.handle_event(&TuiEvent::InputChar('a')), None);
        assert!(prompt.buffer.is_empty());
    }

    #[test]
    fn test_handle_input() {
        let mut prompt = focused(KeyboardKind::Text);

        let res = prompt.handle_event(&TuiEvent::InputChar('a'));
        assert_eq!(res, Some(TextPromptEvent::ContentChanged));
        type_str(&mut prompt, "bc");
        assert_eq!(prompt.buffer, "abc");

        prompt.handle_event(&TuiEvent::CursorLeft);
        prompt.handle_event(&TuiEvent::Backspace);
        assert_eq!(prompt.buffer, "ac");
        prompt.handle_event(&TuiEvent::CursorHome);
        prompt.handle_event(&TuiEvent::Delete);
        assert_eq!(prompt.buffer, "c");
    }

    #[test]
    fn test_number_keyboard_rejects_letters() {
        let mut prompt = focused(KeyboardKind::Number);
        assert_eq!(
            prompt.handle_event(&TuiEvent::InputChar('x')),
            Some(TextPromptEvent::Rejected)
        );
        type_str(&mut prompt, "4a2");
        assert_eq!(prompt.buffer, "42");
    }

    #[test]
    fn test_email_paste_drops_spaces() {
        let mut prompt = focused(KeyboardKind::Email);
        prompt.handle_event(&TuiEvent::Paste("ada @ example.com\n".into()));
        assert_eq!(prompt.buffer, "ada@example.com");
    }

    #[test]
    fn test_max_length_counts_characters() {
        let mut prompt = TextPrompt::new();
        let mut spec = TextInputSpec::new("code");
        spec.max_length = Some(3);
        prompt.focus(spec);
        type_str(&mut prompt, "éèêë");
        assert_eq!(prompt.buffer, "éèê");
    }

    #[test]
    fn test_submit_clears_and_releases_focus() {
        let mut prompt = focused(KeyboardKind::Text);
        assert_eq!(prompt.handle_event(&TuiEvent::Submit), None);
        type_str(&mut prompt, "  ");
        assert_eq!(prompt.handle_event(&TuiEvent::Submit), None);

        type_str(&mut prompt, "Ada");
        assert_eq!(
            prompt.handle_event(&TuiEvent::Submit),
            Some(TextPromptEvent::Submit("  Ada".into()))
        );
        assert!(prompt.buffer.is_empty());
        assert!(!prompt.is_focused());
        assert_eq!(prompt.handle_event(&TuiEvent::Submit), None);
    }

    #[test]
    fn test_scroll_follows_cursor() {
        let mut prompt = focused(KeyboardKind::Text);
        type_str(&mut prompt, "abcdefghij");
        prompt.update_scroll(4);
        assert_eq!(prompt.scroll, 7);
        assert_eq!(prompt.visible_text(4), "hij");
        prompt.handle_event(&TuiEvent::CursorHome);
        prompt.update_scroll(4);
        assert_eq!(prompt.scroll, 0);
    }

    #[test]
    fn test_long_paste_renders_tail_at_cursor() {
        let backend = TestBackend::new(30, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let palette = Palette::default();
        let mut prompt = TextPrompt::new();
        prompt.focus(TextInputSpec::new("bio"));
        let mut long = "a".repeat(70_000);
        long.push('z');
        prompt.handle_event(&TuiEvent::Paste(long));

        terminal
            .draw(|f| {
                TextPromptView::new(&mut prompt, &palette, true).render(f, f.area());
            })
            .unwrap();

        // 30 wide minus border and padding leaves 26 columns; the cursor sits
        // one past the last character.
        assert_eq!(prompt.scroll, 70_001 - 25);
        let visible = prompt.visible_text(26);
        assert_eq!(visible.chars().count(), 25);
        assert!(visible.ends_with('z'));
        let row: String = (0..30)
            .map(|x| terminal.backend().buffer()[(x, 1)].symbol().to_string())
            .collect();
        assert!(row.contains("aaaz"));
    }

    #[test]
    fn test_render_shows_placeholder_and_keyboard_kind() {
        let backend = TestBackend::new(30, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let palette = Palette::default();
        let mut prompt = TextPrompt::new();
        let mut spec = TextInputSpec::new("email");
        spec.placeholder = "you@example.com".into();
        spec.keyboard = KeyboardKind::Email;
        prompt.focus(spec);

        terminal
            .draw(|f| {
                TextPromptView::new(&mut prompt, &palette, true).render(f, f.area());
            })
            .unwrap();

        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(text.contains("you@example.com"));
        assert!(text.contains("email"));
    }
}
