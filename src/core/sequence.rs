//! # Sequence
//!
//! A sequence is the script behind the screen: it decides which message,
//! prompt or text field comes next and reacts to the user's answers.
//!
//! The screen never hands the sequence a reference to itself. Instead every
//! call receives a [`SequenceHandle`], a cheap sender whose methods enqueue
//! actions. The driver drains them after the call returns, so a sequence can
//! emit any number of events from inside a callback without re-entering the
//! screen.
//!
//! ```text
//!  ChatDriver ── start / button_tapped / text_entered / dismissed ──▶ ChatSequence
//!      ▲                                                               │
//!      └──────────── Action (mpsc) ◀── SequenceHandle::add_app_message ┘
//! ```

use log::warn;
use std::sync::mpsc::Sender;
use std::time::Duration;

use crate::core::action::{Action, SequenceEvent};
use crate::core::prompt::{Prompt, TextInputSpec};

pub trait ChatSequence {
    /// Called once, shortly after the screen becomes active.
    fn start(&mut self, ui: &SequenceHandle);

    /// The user picked option `index` (zero-based) of `prompt`.
    fn button_tapped(&mut self, index: usize, label: &str, prompt: &Prompt, ui: &SequenceHandle);

    /// The user submitted `text` into the field described by `spec`.
    fn text_entered(&mut self, text: &str, spec: &TextInputSpec, ui: &SequenceHandle);

    /// The screen went away. No further calls follow.
    fn dismissed(&mut self);
}

/// The screen's callback slots, as seen from a sequence.
#[derive(Clone)]
pub struct SequenceHandle {
    tx: Sender<Action>,
}

impl SequenceHandle {
    pub fn new(tx: Sender<Action>) -> Self {
        Self { tx }
    }

    pub fn send(&self, event: SequenceEvent) {
        if self.tx.send(Action::Sequence(event)).is_err() {
            warn!("Sequence event dropped: screen is gone");
        }
    }

    /// Apply `event` after `delay` on the screen's timeline.
    pub fn send_after(&self, delay: Duration, event: SequenceEvent) {
        if delay.is_zero() {
            return self.send(event);
        }
        if self.tx.send(Action::Defer { delay, event }).is_err() {
            warn!("Deferred sequence event dropped: screen is gone");
        }
    }

    pub fn open_link(&self, url: impl Into<String>, embedded: bool) {
        self.send(SequenceEvent::OpenLink {
            url: url.into(),
            embedded,
        });
    }

    pub fn reveal_cancel(&self) {
        self.send(SequenceEvent::RevealCancel);
    }

    pub fn request_dismiss(&self) {
        self.send(SequenceEvent::RequestDismiss);
    }

    pub fn add_app_message(&self, text: impl Into<String>) {
        self.send(SequenceEvent::AddAppMessage(text.into()));
    }

    pub fn add_user_message(&self, text: impl Into<String>) {
        self.send(SequenceEvent::AddUserMessage(text.into()));
    }

    pub fn show_prompt(&self, prompt: Prompt) {
        self.send(SequenceEvent::ShowPrompt(prompt));
    }

    pub fn hide_prompt(&self) {
        self.send(SequenceEvent::HidePrompt);
    }

    pub fn show_text_prompt(&self, spec: TextInputSpec) {
        self.send(SequenceEvent::ShowTextPrompt(spec));
    }

    pub fn start_typing(&self) {
        self.send(SequenceEvent::StartTyping);
    }

    pub fn stop_typing(&self) {
        self.send(SequenceEvent::StopTyping);
    }
}
