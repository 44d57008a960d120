//! # ButtonTray Component
//!
//! The buttons of the live prompt, stacked above the keyboard strip.
//!
//! The core decides how many rows the tray gets each frame (the spring
//! animation lives in `core::tray`); this component divides those rows among
//! the buttons. A slot of three or more rows is drawn as a bordered button,
//! a thinner slot as a single colored line, an empty slot not at all.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `ButtonTrayState` (focus, click targets) lives in `TuiState`
//! - `ButtonTray` is created each frame with borrowed state and props

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::core::prompt::TrayButton;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::palette::Palette;

/// Columns left free on each side of a button.
const SIDE_MARGIN: u16 = 2;
/// Slots at least this tall get a border.
const BORDERED_MIN_HEIGHT: u16 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrayEvent {
    /// The button with this title was activated.
    Tapped(String),
}

#[derive(Debug, Default)]
pub struct ButtonTrayState {
    pub focused: usize,
    generation: u64,
    titles: Vec<String>,
    /// Screen rect of every drawn button, with its index
    hit_areas: Vec<(Rect, usize)>,
}

impl ButtonTrayState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset focus when the tray content is replaced.
    pub fn sync(&mut self, generation: u64, buttons: &[TrayButton]) {
        if generation != self.generation {
            self.generation = generation;
            self.focused = 0;
        }
        self.titles = buttons.iter().map(|b| b.title.clone()).collect();
        self.focused = self.focused.min(self.titles.len().saturating_sub(1));
    }

    /// Forget the buttons (tray collapsed). Clicks no longer hit anything.
    pub fn clear(&mut self) {
        self.titles.clear();
        self.hit_areas.clear();
    }

    pub fn hit_test(&self, column: u16, row: u16) -> Option<&str> {
        self.hit_areas
            .iter()
            .find(|(rect, _)| rect.contains((column, row).into()))
            .and_then(|&(_, index)| self.titles.get(index))
            .map(String::as_str)
    }

    fn tap(&self, index: usize) -> Option<TrayEvent> {
        self.titles.get(index).cloned().map(TrayEvent::Tapped)
    }

    fn move_focus(&mut self, forward: bool) {
        let count = self.titles.len();
        if count == 0 {
            return;
        }
        self.focused = if forward {
            (self.focused + 1) % count
        } else {
            (self.focused + count - 1) % count
        };
    }
}

impl EventHandler for ButtonTrayState {
    type Event = TrayEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::FocusNext | TuiEvent::CursorRight => {
                self.move_focus(true);
                None
            }
            TuiEvent::FocusPrev | TuiEvent::CursorLeft => {
                self.move_focus(false);
                None
            }
            TuiEvent::Submit | TuiEvent::InputChar(' ') => self.tap(self.focused),
            // 1-9 pick a button directly
            TuiEvent::InputChar(c @ '1'..='9') => {
                let index = c.to_digit(10).map_or(0, |d| d as usize - 1);
                self.tap(index)
            }
            TuiEvent::MouseClick(column, row) => self
                .hit_test(*column, *row)
                .map(|title| TrayEvent::Tapped(title.to_string())),
            _ => None,
        }
    }
}

pub struct ButtonTray<'a> {
    state: &'a mut ButtonTrayState,
    buttons: &'a [TrayButton],
    palette: &'a Palette,
    /// False while hiding: drawn dimmed, focus not shown.
    interactive: bool,
}

impl<'a> ButtonTray<'a> {
    pub fn new(
        state: &'a mut ButtonTrayState,
        buttons: &'a [TrayButton],
        palette: &'a Palette,
        interactive: bool,
    ) -> Self {
        Self {
            state,
            buttons,
            palette,
            interactive,
        }
    }
}

/// Split `height` rows into `count` slots, extra rows going to the first slots.
fn slot_heights(height: u16, count: usize) -> Vec<u16> {
    if count == 0 {
        return Vec::new();
    }
    let count_u16 = u16::try_from(count).unwrap_or(u16::MAX);
    let base = height / count_u16;
    let extra = (height % count_u16) as usize;
    (0..count)
        .map(|i| base + u16::from(i < extra))
        .collect()
}

impl Component for ButtonTray<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.hit_areas.clear();

        let button_style = self.palette.button();
        let width = area.width.saturating_sub(SIDE_MARGIN * 2);
        let mut y = area.y;

        for (index, (button, height)) in self
            .buttons
            .iter()
            .zip(slot_heights(area.height, self.buttons.len()))
            .enumerate()
        {
            if height == 0 || width == 0 {
                continue;
            }
            let rect = Rect::new(area.x + SIDE_MARGIN, y, width, height);
            y += height;

            let focused = self.interactive && index == self.state.focused;
            let mut style = button_style;
            if focused {
                style = style.add_modifier(Modifier::REVERSED);
            }
            if !self.interactive {
                style = style.add_modifier(Modifier::DIM);
            }

            let mut spans = Vec::new();
            if let Some(image) = &button.image {
                spans.push(Span::raw(format!("{image} ")));
            }
            spans.push(Span::raw(button.title.as_str()));
            let label = Line::from(spans);

            let paragraph = Paragraph::new(label)
                .alignment(Alignment::Center)
                .style(style);
            let paragraph = if height >= BORDERED_MIN_HEIGHT {
                paragraph.block(
                    Block::bordered()
                        .border_type(self.palette.border_type)
                        .border_style(style),
                )
            } else {
                paragraph
            };
            frame.render_widget(paragraph, rect);

            self.state.hit_areas.push((rect, index));
        }
    }
}
