//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::time::Duration;

use crate::core::action::{Action, Effect, SequenceEvent, update};
use crate::core::prompt::{Prompt, TextInputSpec};
use crate::core::sequence::{ChatSequence, SequenceHandle};
use crate::core::state::{ChatScreen, Metrics};
use crate::core::theme::ChatTheme;
use crate::core::timeline::Timing;

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// A screen with default theme, timing and metrics, not yet activated.
pub fn test_screen() -> ChatScreen {
    ChatScreen::new(ChatTheme::default(), Timing::default(), Metrics::default())
}

/// A screen that has been activated and whose start delay has elapsed.
pub fn active_screen() -> ChatScreen {
    let mut screen = test_screen();
    update(&mut screen, Action::Activate);
    let start = screen.timing.start_delay;
    run_until(&mut screen, start);
    screen
}

/// Complete every phase due at or before `now`. Returns the non-`None` effects.
pub fn run_until(screen: &mut ChatScreen, now: Duration) -> Vec<Effect> {
    let mut effects = Vec::new();
    while let Some(phase) = screen.timeline.pop_due(now) {
        let effect = update(screen, Action::Phase(phase));
        if effect != Effect::None {
            effects.push(effect);
        }
    }
    effects
}

/// `run_until` relative to the screen's current clock.
pub fn advance(screen: &mut ChatScreen, delta: Duration) -> Vec<Effect> {
    let target = screen.now() + delta;
    run_until(screen, target)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Start,
    ButtonTapped {
        index: usize,
        label: String,
        prompt: Prompt,
    },
    TextEntered {
        text: String,
        spec: TextInputSpec,
    },
    Dismissed,
}

/// Records every call and replays a fixed opening from `start`.
#[derive(Default)]
pub struct RecordingSequence {
    pub calls: Vec<Call>,
    opening: Vec<SequenceEvent>,
}

impl RecordingSequence {
    pub fn with_opening(opening: Vec<SequenceEvent>) -> Self {
        Self {
            calls: Vec::new(),
            opening,
        }
    }
}

impl ChatSequence for RecordingSequence {
    fn start(&mut self, ui: &SequenceHandle) {
        self.calls.push(Call::Start);
        for event in self.opening.drain(..) {
            ui.send(event);
        }
    }

    fn button_tapped(&mut self, index: usize, label: &str, prompt: &Prompt, _ui: &SequenceHandle) {
        self.calls.push(Call::ButtonTapped {
            index,
            label: label.to_string(),
            prompt: prompt.clone(),
        });
    }

    fn text_entered(&mut self, text: &str, spec: &TextInputSpec, _ui: &SequenceHandle) {
        self.calls.push(Call::TextEntered {
            text: text.to_string(),
            spec: spec.clone(),
        });
    }

    fn dismissed(&mut self) {
        self.calls.push(Call::Dismissed);
    }
}
