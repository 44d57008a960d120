//! # Tray
//!
//! The transient strip pinned above the keyboard. It holds either a set of
//! buttons for the live prompt or a single text field, never both.
//!
//! ```text
//! Tray
//! ├── content: TrayContent    // Empty | Buttons(..) | TextInput(spec)
//! ├── motion: TrayMotion      // Hidden → Revealing → Shown → Hiding → Hidden
//! ├── collapsed: bool         // zero-height constraint engaged
//! ├── accepting_input: bool   // taps / submissions are honoured
//! └── generation: u64         // bumped whenever content is replaced
//! ```
//!
//! Scheduled tray phases remember the generation they were created for. When
//! new content replaces old content mid-animation, the old phases arrive with
//! a stale generation and are dropped.

use std::time::Duration;

use crate::core::prompt::{TextInputSpec, TrayButton};
use crate::core::timeline::Spring;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TrayContent {
    #[default]
    Empty,
    Buttons(Vec<TrayButton>),
    TextInput(TextInputSpec),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrayMotion {
    #[default]
    Hidden,
    Revealing { since: Duration },
    Shown,
    Hiding { since: Duration },
}

/// Which prompt lifecycle state the screen is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayMode {
    Idle,
    PromptShown,
    TextPromptShown,
}

#[derive(Debug, Clone)]
pub struct Tray {
    pub content: TrayContent,
    pub motion: TrayMotion,
    pub collapsed: bool,
    pub accepting_input: bool,
    pub generation: u64,
}

impl Default for Tray {
    fn default() -> Self {
        Self {
            content: TrayContent::Empty,
            motion: TrayMotion::Hidden,
            collapsed: true,
            accepting_input: false,
            generation: 0,
        }
    }
}

impl Tray {
    /// Swap in new content, relaxing the zero-height constraint.
    /// Returns the new generation.
    pub fn replace(&mut self, content: TrayContent, motion: TrayMotion) -> u64 {
        self.generation += 1;
        self.content = content;
        self.motion = motion;
        self.collapsed = false;
        self.accepting_input = matches!(motion, TrayMotion::Shown);
        self.generation
    }

    /// Re-engage the zero-height constraint and drop all widgets.
    pub fn collapse(&mut self) {
        self.content = TrayContent::Empty;
        self.motion = TrayMotion::Hidden;
        self.collapsed = true;
        self.accepting_input = false;
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    pub fn mode(&self) -> TrayMode {
        match self.content {
            TrayContent::Empty => TrayMode::Idle,
            TrayContent::Buttons(_) => TrayMode::PromptShown,
            TrayContent::TextInput(_) => TrayMode::TextPromptShown,
        }
    }

    pub fn buttons(&self) -> &[TrayButton] {
        match &self.content {
            TrayContent::Buttons(buttons) => buttons,
            _ => &[],
        }
    }

    pub fn text_input(&self) -> Option<&TextInputSpec> {
        match &self.content {
            TrayContent::TextInput(spec) => Some(spec),
            _ => None,
        }
    }

    /// How much of each widget is visible at `now`. May exceed 1.0 briefly
    /// while the spring overshoots.
    pub fn visible_fraction(&self, now: Duration, spring: &Spring) -> f32 {
        match self.motion {
            TrayMotion::Hidden => 0.0,
            TrayMotion::Shown => 1.0,
            TrayMotion::Revealing { since } => spring.progress(now.saturating_sub(since)),
            TrayMotion::Hiding { since } => spring.retract(now.saturating_sub(since)),
        }
    }

    pub fn is_animating(&self) -> bool {
        matches!(
            self.motion,
            TrayMotion::Revealing { .. } | TrayMotion::Hiding { .. }
        )
    }

    /// Rows the tray wants at `now`, before any clamping by the terminal.
    pub fn height(&self, now: Duration, spring: &Spring, metrics: &TrayMetrics) -> u16 {
        if self.collapsed {
            return 0;
        }
        let fraction = self.visible_fraction(now, spring).clamp(0.0, 1.0);
        let full = match &self.content {
            TrayContent::Empty => 0,
            TrayContent::Buttons(buttons) => metrics
                .button_height
                .saturating_mul(u16::try_from(buttons.len()).unwrap_or(u16::MAX)),
            TrayContent::TextInput(_) => metrics.text_input_height,
        };
        (f32::from(full) * fraction).round() as u16
    }
}

/// Row sizes for tray widgets and the resting bottom offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrayMetrics {
    pub button_height: u16,
    pub text_input_height: u16,
    /// Offset between tray and screen bottom while the keyboard is hidden.
    pub bottom_margin: u16,
}

impl Default for TrayMetrics {
    fn default() -> Self {
        Self {
            button_height: 3,
            text_input_height: 3,
            bottom_margin: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buttons(titles: &[&str]) -> TrayContent {
        TrayContent::Buttons(
            titles
                .iter()
                .map(|t| TrayButton {
                    title: (*t).to_string(),
                    image: None,
                })
                .collect(),
        )
    }

    #[test]
    fn new_tray_is_collapsed_and_idle() {
        let tray = Tray::default();
        assert!(tray.collapsed);
        assert_eq!(tray.mode(), TrayMode::Idle);
        assert_eq!(tray.height(Duration::ZERO, &Spring::default(), &TrayMetrics::default()), 0);
    }

    #[test]
    fn replace_bumps_generation_and_relaxes_constraint() {
        let mut tray = Tray::default();
        let first = tray.replace(buttons(&["Yes", "No"]), TrayMotion::Hidden);
        let second = tray.replace(buttons(&["Ok"]), TrayMotion::Hidden);
        assert_eq!(second, first + 1);
        assert!(!tray.collapsed);
        assert!(!tray.is_current(first));
        assert_eq!(tray.buttons().len(), 1);
    }

    #[test]
    fn height_follows_spring_and_clamps_overshoot() {
        let spring = Spring::default();
        let metrics = TrayMetrics::default();
        let mut tray = Tray::default();
        tray.replace(buttons(&["Yes", "No"]), TrayMotion::Revealing { since: Duration::ZERO });

        assert_eq!(tray.height(Duration::ZERO, &spring, &metrics), 0);
        for t in (0..700).step_by(10) {
            let h = tray.height(Duration::from_millis(t), &spring, &metrics);
            assert!(h <= 6, "height {h} exceeded full tray at {t}ms");
        }
        tray.motion = TrayMotion::Shown;
        assert_eq!(tray.height(Duration::ZERO, &spring, &metrics), 6);
    }

    #[test]
    fn oversized_button_height_saturates() {
        let metrics = TrayMetrics {
            button_height: 20_000,
            ..TrayMetrics::default()
        };
        let mut tray = Tray::default();
        tray.replace(buttons(&["A", "B", "C", "D"]), TrayMotion::Shown);
        assert_eq!(tray.height(Duration::ZERO, &Spring::default(), &metrics), u16::MAX);
    }

    #[test]
    fn collapse_clears_widgets() {
        let mut tray = Tray::default();
        tray.replace(TrayContent::TextInput(TextInputSpec::new("name")), TrayMotion::Shown);
        assert_eq!(tray.mode(), TrayMode::TextPromptShown);
        assert!(tray.accepting_input);

        tray.collapse();
        assert_eq!(tray.mode(), TrayMode::Idle);
        assert!(tray.collapsed);
        assert!(!tray.accepting_input);
        assert!(tray.text_input().is_none());
    }
}
