//! # MessageList Component
//!
//! Scrollable view of the conversation.
//!
//! ## Responsibilities
//!
//! - Display the message log as chat bubbles
//! - Perform efficient layout caching (row heights)
//! - Carry out scroll requests from the core, animated
//! - Fade in rows the first time they are rendered
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and `&'a mut MessageLog`
//! (props). The log is borrowed mutably because rendering a row marks it as
//! shown, which is what suppresses a second entrance animation.
//!
//! ## Animated Scroll
//!
//! A `ScrollRequest` sets `scroll_target`. Each frame moves the offset a third
//! of the remaining distance (at least one row) until the target is reached.
//! Manual scrolling cancels the animation.

use std::collections::HashMap;
use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::message::MessageLog;
use crate::core::state::ScrollRequest;
use crate::core::timeline::linear;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::ChatRow;
use crate::tui::event::TuiEvent;
use crate::tui::palette::Palette;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    /// Scroll offset and view state
    pub scroll_state: ScrollViewState,
    /// Cached layout measurements
    pub layout: LayoutCache,
    /// Offset an animated scroll is heading for
    pub scroll_target: Option<u16>,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// Whether content exists below the viewport
    pub has_unseen_content: bool,
    /// Fade start time per row, removed once the fade completes
    fades: HashMap<usize, Duration>,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            scroll_target: None,
            viewport_height: 0,
            has_unseen_content: false,
            fades: HashMap::new(),
        }
    }

    /// Content height, saturating at the largest scrollable size.
    fn total_height(&self) -> u16 {
        self.layout
            .heights
            .iter()
            .fold(0u16, |acc, &h| acc.saturating_add(h))
    }

    fn max_offset(&self) -> u16 {
        self.total_height().saturating_sub(self.viewport_height)
    }

    fn set_offset_y(&mut self, y: u16) {
        let x = self.scroll_state.offset().x;
        self.scroll_state.set_offset(Position { x, y });
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        if self.scroll_state.offset().y > max_y {
            self.set_offset_y(max_y);
        }
        if let Some(target) = self.scroll_target {
            self.scroll_target = Some(target.min(max_y));
        }
    }

    /// Turn a core scroll request into a scroll target.
    ///
    /// `RevealRow` only scrolls when the content overflows the viewport and
    /// the row's bottom edge is below it.
    pub fn apply_request(&mut self, request: ScrollRequest) {
        let max_y = self.max_offset();
        match request {
            ScrollRequest::Bottom => self.scroll_target = Some(max_y),
            ScrollRequest::RevealRow { row } => {
                if self.total_height() <= self.viewport_height {
                    return;
                }
                let Some(&row_bottom) = self.layout.prefix_heights.get(row) else {
                    return;
                };
                let current = self.scroll_state.offset().y;
                if row_bottom > current.saturating_add(self.viewport_height) {
                    let target = row_bottom.saturating_sub(self.viewport_height).min(max_y);
                    self.scroll_target = Some(target);
                }
            }
        }
    }

    /// Advance an animated scroll by one frame.
    pub fn step_scroll(&mut self) {
        let Some(target) = self.scroll_target else {
            return;
        };
        let current = self.scroll_state.offset().y;
        if current == target {
            self.scroll_target = None;
            return;
        }
        let distance = current.abs_diff(target);
        let step = distance.div_ceil(3).max(1);
        let next = if target > current {
            current + step
        } else {
            current - step
        };
        self.set_offset_y(next);
        if next == target {
            self.scroll_target = None;
        }
    }

    /// Start the entrance fade for `row`.
    pub fn start_fade(&mut self, row: usize, now: Duration) {
        self.fades.insert(row, now);
    }

    /// Fade progress for `row` at `now`. Rows without a running fade are opaque.
    pub fn fade(&self, row: usize, now: Duration, duration: Duration) -> f32 {
        self.fades
            .get(&row)
            .map_or(1.0, |&since| linear(now.saturating_sub(since), duration))
    }

    fn prune_fades(&mut self, now: Duration, duration: Duration) {
        self.fades
            .retain(|_, since| now.saturating_sub(*since) < duration);
    }

    pub fn is_animating(&self) -> bool {
        self.scroll_target.is_some() || !self.fades.is_empty()
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub log: &'a mut MessageLog,
    pub palette: &'a Palette,
    /// Blank rows between messages from different authors
    pub row_spacing: u16,
    pub now: Duration,
    pub row_fade: Duration,
    pub request: Option<ScrollRequest>,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        log: &'a mut MessageLog,
        palette: &'a Palette,
        row_spacing: u16,
        now: Duration,
        row_fade: Duration,
    ) -> Self {
        Self {
            state,
            log,
            palette,
            row_spacing,
            now,
            row_fade,
            request: None,
        }
    }

    pub fn with_request(mut self, request: Option<ScrollRequest>) -> Self {
        self.request = request;
        self
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area
        let num_rows = self.log.len();

        // 1. Update Layout Cache
        let layout = &mut self.state.layout;
        let reusable = layout.reusable_count(num_rows, content_width);
        layout.heights.truncate(reusable.min(layout.heights.len()));

        for (i, message) in self.log.iter().enumerate().skip(layout.heights.len()) {
            let margin = self.log.leading_margin(i, self.row_spacing);
            layout
                .heights
                .push(ChatRow::calculate_height(message, content_width, margin));
        }
        layout.rebuild_prefix_heights();
        layout.update_metadata(num_rows, content_width);

        let total_height = self.state.total_height();

        // 2. Scroll: pending request, one animation step, clamp
        self.state.viewport_height = area.height;
        if let Some(request) = self.request.take() {
            self.state.apply_request(request);
        }
        self.state.clamp_scroll();
        self.state.step_scroll();

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render visible rows into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u16 = if visible_range.start > 0 {
            self.state.layout.prefix_heights[visible_range.start - 1]
        } else {
            0
        };

        for i in visible_range {
            let height = self.state.layout.heights[i];
            let Some(row) = self.log.render_row(i, self.row_spacing) else {
                break;
            };
            if row.animate_entrance {
                self.state.start_fade(i, self.now);
            }
            let fade = self.state.fade(i, self.now, self.row_fade);

            let row_rect = Rect::new(0, y_offset, content_width, height);
            scroll_view.render_widget(
                ChatRow::new(row.message, row.leading_margin, self.palette, fade),
                row_rect,
            );
            y_offset = y_offset.saturating_add(height);
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);

        // 4. Auxiliary state
        self.state.prune_fades(self.now, self.row_fade);
        let current_offset = self.state.scroll_state.offset().y;
        self.state.has_unseen_content = current_offset < self.state.max_offset();
    }
}

/// EventHandler is implemented on `MessageListState` rather than `MessageList`
/// because `MessageList` is recreated each frame and cannot hold scroll state.
impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => self.scroll_state.scroll_up(),
            TuiEvent::ScrollDown => self.scroll_state.scroll_down(),
            TuiEvent::ScrollPageUp => self.scroll_state.scroll_page_up(),
            TuiEvent::ScrollPageDown => self.scroll_state.scroll_page_down(),
            _ => return None,
        }
        // Manual scrolling wins over an animated one.
        self.scroll_target = None;
        self.clamp_scroll();
        None
    }
}

/// Cached layout measurements
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    row_count: usize,
    content_width: u16,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            row_count: 0,
            content_width: 0,
        }
    }

    /// Number of cached heights still valid. Messages are immutable and
    /// append-only, so only a width change (or a fresh log) invalidates.
    pub fn reusable_count(&self, row_count: usize, content_width: u16) -> usize {
        if self.content_width != content_width || self.heights.is_empty() {
            return 0;
        }
        if row_count < self.row_count {
            return 0;
        }
        self.row_count
    }

    pub fn update_metadata(&mut self, row_count: usize, content_width: u16) {
        self.row_count = row_count;
        self.content_width = content_width;
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn visible_range(
        &self,
        scroll_offset: u16,
        viewport_height: u16,
    ) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}
