//! # Chat Screen State
//!
//! Everything the screen shows, in one place. This module is domain state
//! only; presentation caches (scroll offsets, row heights, widget focus) live
//! in the `tui` module.
//!
//! ```text
//! ChatScreen
//! ├── theme: ChatTheme              // colors and flags
//! ├── timing: Timing                // phase delays, spring
//! ├── metrics: Metrics              // row/tray sizes
//! ├── log: MessageLog               // conversation rows + animated markers
//! ├── prompt: Option<Prompt>        // live button prompt (awaiting a tap)
//! ├── tray: Tray                    // buttons | text field | nothing
//! ├── keyboard: KeyboardInset       // tray bottom offset, animated
//! ├── cancel: CancelAffordance      // ✕ in the header
//! ├── lifecycle: Lifecycle          // Created → Active → Dismissed
//! ├── observing_keyboard: bool
//! ├── scroll: Option<ScrollRequest> // consumed by the message list
//! └── timeline: Timeline            // scheduled phases
//! ```
//!
//! State changes only happen through `update(screen, action)` in action.rs.

use std::time::Duration;

use crate::core::message::MessageLog;
use crate::core::prompt::Prompt;
use crate::core::theme::ChatTheme;
use crate::core::timeline::{Timeline, Timing, linear};
use crate::core::tray::{Tray, TrayMetrics, TrayMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Created,
    Active,
    Dismissed,
}

/// A scroll the message list should perform on its next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollRequest {
    /// Bring `row` into view, but only if the content overflows the viewport.
    RevealRow { row: usize },
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metrics {
    pub tray: TrayMetrics,
    /// Blank rows between messages from different authors.
    pub row_spacing: u16,
    /// Full-screen presentation drops the header's top margin.
    pub fullscreen: bool,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            tray: TrayMetrics::default(),
            row_spacing: 1,
            fullscreen: false,
        }
    }
}

/// Animated distance between the tray and the bottom of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardInset {
    from: u16,
    to: u16,
    since: Duration,
    duration: Duration,
    pub visible: bool,
}

impl KeyboardInset {
    pub fn resting(offset: u16) -> Self {
        Self {
            from: offset,
            to: offset,
            since: Duration::ZERO,
            duration: Duration::ZERO,
            visible: false,
        }
    }

    pub fn current(&self, now: Duration) -> u16 {
        let t = linear(now.saturating_sub(self.since), self.duration);
        let from = f32::from(self.from);
        let to = f32::from(self.to);
        (from + (to - from) * t).round() as u16
    }

    pub fn target(&self) -> u16 {
        self.to
    }

    pub fn animate_to(&mut self, target: u16, now: Duration, duration: Duration) {
        self.from = self.current(now);
        self.to = target;
        self.since = now;
        self.duration = duration;
    }

    pub fn is_animating(&self, now: Duration) -> bool {
        now.saturating_sub(self.since) < self.duration && self.from != self.to
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelAffordance {
    pub visible: bool,
    pub fade_since: Option<Duration>,
}

impl CancelAffordance {
    pub fn opacity(&self, now: Duration, fade: Duration) -> f32 {
        match (self.visible, self.fade_since) {
            (false, _) => 0.0,
            (true, None) => 1.0,
            (true, Some(since)) => linear(now.saturating_sub(since), fade),
        }
    }
}

pub struct ChatScreen {
    pub theme: ChatTheme,
    pub timing: Timing,
    pub metrics: Metrics,
    pub log: MessageLog,
    pub prompt: Option<Prompt>,
    pub tray: Tray,
    pub keyboard: KeyboardInset,
    pub cancel: CancelAffordance,
    pub lifecycle: Lifecycle,
    pub observing_keyboard: bool,
    pub scroll: Option<ScrollRequest>,
    pub timeline: Timeline,
}

impl ChatScreen {
    pub fn new(theme: ChatTheme, timing: Timing, metrics: Metrics) -> Self {
        let keyboard = KeyboardInset::resting(metrics.tray.bottom_margin);
        Self {
            theme,
            timing,
            metrics,
            log: MessageLog::new(),
            prompt: None,
            tray: Tray::default(),
            keyboard,
            cancel: CancelAffordance {
                visible: true,
                fade_since: None,
            },
            lifecycle: Lifecycle::Created,
            observing_keyboard: false,
            scroll: None,
            timeline: Timeline::new(),
        }
    }

    pub fn now(&self) -> Duration {
        self.timeline.now()
    }

    pub fn mode(&self) -> TrayMode {
        self.tray.mode()
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle == Lifecycle::Active
    }

    /// Tray height in rows at `now`.
    pub fn tray_height(&self, now: Duration) -> u16 {
        self.tray.height(now, &self.timing.spring, &self.metrics.tray)
    }

    /// True while anything on screen is mid-animation or waiting on a phase.
    pub fn is_animating(&self, now: Duration) -> bool {
        !self.timeline.is_idle() || self.tray.is_animating() || self.keyboard.is_animating(now)
    }
}
