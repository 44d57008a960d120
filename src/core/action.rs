//! # Actions
//!
//! Everything that can happen to the chat screen becomes an `Action`.
//! The sequence adds a message? That's `Action::Sequence(SequenceEvent::AddAppMessage(..))`.
//! The user presses a tray button? That's `Action::Tap(label)`.
//! An animation phase comes due? That's `Action::Phase(phase)`.
//!
//! `update()` mutates the screen and returns a single `Effect` describing what
//! the outside world must do next (call into the sequence, focus the text
//! field, close the screen). No I/O happens here.
//!
//! ```text
//! ChatScreen + Action  →  update()  →  Effect
//! ```

use log::{debug, info, warn};
use std::time::Duration;

use crate::core::message::Origin;
use crate::core::prompt::{Prompt, TextInputSpec};
use crate::core::state::{ChatScreen, KeyboardInset, Lifecycle, ScrollRequest};
use crate::core::timeline::Phase;
use crate::core::tray::{TrayContent, TrayMotion};

/// The calls a sequence can make on the screen.
#[derive(Debug, Clone, PartialEq)]
pub enum SequenceEvent {
    OpenLink { url: String, embedded: bool },
    RevealCancel,
    RequestDismiss,
    AddAppMessage(String),
    AddUserMessage(String),
    ShowPrompt(Prompt),
    HidePrompt,
    ShowTextPrompt(TextInputSpec),
    StartTyping,
    StopTyping,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Activate,
    Deactivate,
    Sequence(SequenceEvent),
    /// A sequence event to apply after `delay`.
    Defer {
        delay: Duration,
        event: SequenceEvent,
    },
    /// The user pressed the tray widget labelled with this title.
    Tap(String),
    TextSubmitted(String),
    KeyboardShown(u16),
    KeyboardHidden,
    CancelPressed,
    Phase(Phase),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    StartSequence,
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
    FocusTextInput(TextInputSpec),
    OpenLink {
        url: String,
        embedded: bool,
    },
    Close,
}

pub fn update(screen: &mut ChatScreen, action: Action) -> Effect {
    match action {
        Action::Activate => activate(screen),
        Action::Deactivate => deactivate(screen),
        _ if !screen.is_active() => {
            debug!("Ignoring {:?} while {:?}", action, screen.lifecycle);
            Effect::None
        }
        Action::Sequence(event) => apply_sequence_event(screen, event),
        Action::Defer { delay, event } => {
            screen.timeline.schedule(delay, Phase::Deferred(event));
            Effect::None
        }
        Action::Tap(label) => handle_tap(screen, label),
        Action::TextSubmitted(text) => submit_text(screen, text),
        Action::KeyboardShown(height) => {
            if screen.observing_keyboard {
                move_keyboard(screen, height, true);
            }
            Effect::None
        }
        Action::KeyboardHidden => {
            if screen.observing_keyboard {
                let margin = screen.metrics.tray.bottom_margin;
                move_keyboard(screen, margin, false);
            }
            Effect::None
        }
        Action::CancelPressed => {
            if screen.cancel.visible {
                info!("Cancel pressed, closing screen");
                Effect::Close
            } else {
                debug!("Cancel pressed while hidden; ignoring");
                Effect::None
            }
        }
        Action::Phase(phase) => complete_phase(screen, phase),
    }
}

fn activate(screen: &mut ChatScreen) -> Effect {
    if screen.lifecycle != Lifecycle::Created {
        debug!("Activate ignored in {:?}", screen.lifecycle);
        return Effect::None;
    }
    info!("Chat screen activated");
    screen.lifecycle = Lifecycle::Active;
    screen.cancel.visible = !screen.theme.hides_cancel_button_on_start;
    screen.cancel.fade_since = None;
    screen.keyboard = KeyboardInset::resting(screen.metrics.tray.bottom_margin);
    screen.observing_keyboard = true;
    screen
        .timeline
        .schedule(screen.timing.start_delay, Phase::StartFlow);
    Effect::None
}

fn deactivate(screen: &mut ChatScreen) -> Effect {
    if screen.lifecycle == Lifecycle::Dismissed {
        return Effect::None;
    }
    let cancelled = screen.timeline.cancel_all();
    info!("Chat screen dismissed ({} pending phases cancelled)", cancelled);
    screen.lifecycle = Lifecycle::Dismissed;
    screen.observing_keyboard = false;
    screen.prompt = None;
    screen.tray.collapse();
    screen.scroll = None;
    Effect::Dismissed
}

fn apply_sequence_event(screen: &mut ChatScreen, event: SequenceEvent) -> Effect {
    match event {
        SequenceEvent::OpenLink { url, embedded } => Effect::OpenLink { url, embedded },
        SequenceEvent::RevealCancel => {
            if !screen.cancel.visible {
                screen.cancel.visible = true;
                screen.cancel.fade_since = Some(screen.now());
                screen
                    .timeline
                    .schedule(screen.timing.cancel_fade, Phase::CancelFadeComplete);
            }
            Effect::None
        }
        SequenceEvent::RequestDismiss => Effect::Close,
        SequenceEvent::AddAppMessage(text) => append_message(screen, text, Origin::App),
        SequenceEvent::AddUserMessage(text) => append_message(screen, text, Origin::User),
        SequenceEvent::ShowPrompt(prompt) => show_prompt(screen, prompt),
        SequenceEvent::HidePrompt => hide_prompt(screen),
        SequenceEvent::ShowTextPrompt(spec) => show_text_prompt(screen, spec),
        SequenceEvent::StartTyping => {
            debug!("Sequence started typing");
            Effect::None
        }
        SequenceEvent::StopTyping => {
            debug!("Sequence stopped typing");
            Effect::None
        }
    }
}

fn append_message(screen: &mut ChatScreen, text: String, origin: Origin) -> Effect {
    let row = screen.log.append(text, origin);
    debug!("Appended {:?} row {}", origin, row);
    screen
        .timeline
        .schedule(screen.timing.reveal_newest_delay, Phase::RevealNewestRow { row });
    Effect::None
}

fn show_prompt(screen: &mut ChatScreen, prompt: Prompt) -> Effect {
    if let Prompt::TextInput(spec) = prompt {
        return show_text_prompt(screen, spec);
    }

    let buttons = prompt.tray_buttons();
    if buttons.is_empty() {
        warn!("Prompt without options ignored: {:?}", prompt);
        return Effect::None;
    }

    debug!("Showing prompt with {} option(s)", buttons.len());
    let generation = screen
        .tray
        .replace(TrayContent::Buttons(buttons), TrayMotion::Hidden);
    screen.prompt = Some(prompt);
    screen.timeline.schedule(
        screen.timing.tray_reveal_delay,
        Phase::TrayRevealBegin { generation },
    );
    Effect::None
}

fn hide_prompt(screen: &mut ChatScreen) -> Effect {
    screen.prompt = None;
    // A hide is already pending once input stops being accepted after the
    // widgets became visible.
    let hide_pending = !screen.tray.accepting_input
        && !matches!(screen.tray.motion, TrayMotion::Hidden);
    if matches!(screen.tray.content, TrayContent::Empty) || hide_pending {
        debug!("HidePrompt with nothing to hide");
        return Effect::None;
    }
    schedule_hide(screen);
    Effect::None
}

fn schedule_hide(screen: &mut ChatScreen) {
    screen.tray.accepting_input = false;
    let generation = screen.tray.generation;
    screen.timeline.schedule(
        screen.timing.tray_hide_delay,
        Phase::TrayHideBegin { generation },
    );
}

fn show_text_prompt(screen: &mut ChatScreen, spec: TextInputSpec) -> Effect {
    debug!("Showing text prompt for '{}'", spec.key);
    screen.prompt = None;
    screen
        .tray
        .replace(TrayContent::TextInput(spec.clone()), TrayMotion::Shown);
    Effect::FocusTextInput(spec)
}

fn handle_tap(screen: &mut ChatScreen, label: String) -> Effect {
    if !screen.tray.accepting_input {
        debug!("Tap on '{}' while tray is not interactive", label);
        return Effect::None;
    }
    let Some(prompt) = screen.prompt.as_ref() else {
        debug!("Tap on '{}' with no live prompt", label);
        return Effect::None;
    };
    let Some(index) = prompt.resolve_tap(&label) else {
        debug!("Tap on '{}' does not match any option", label);
        return Effect::None;
    };
    info!("Button {} ('{}') tapped", index, label);
    Effect::ButtonTapped {
        index,
        label,
        prompt: prompt.clone(),
    }
}

fn submit_text(screen: &mut ChatScreen, text: String) -> Effect {
    let Some(spec) = screen.tray.text_input().cloned() else {
        debug!("Text submitted with no text prompt shown");
        return Effect::None;
    };
    if !screen.tray.accepting_input {
        debug!("Duplicate text submission ignored");
        return Effect::None;
    }
    info!("Text entered for '{}'", spec.key);
    schedule_hide(screen);
    Effect::TextEntered { text, spec }
}

fn move_keyboard(screen: &mut ChatScreen, offset: u16, visible: bool) {
    let duration = if visible {
        screen.timing.keyboard_show
    } else {
        screen.timing.keyboard_hide
    };
    let now = screen.now();
    screen.keyboard.animate_to(offset, now, duration);
    screen.keyboard.visible = visible;
    screen.timeline.schedule(duration, Phase::KeyboardSettled);
}

fn complete_phase(screen: &mut ChatScreen, phase: Phase) -> Effect {
    match phase {
        Phase::StartFlow => {
            info!("Starting sequence");
            Effect::StartSequence
        }
        Phase::RevealNewestRow { row } => {
            screen.scroll = Some(ScrollRequest::RevealRow { row });
            Effect::None
        }
        Phase::TrayRevealBegin { generation } => {
            if screen.tray.is_current(generation) {
                let now = screen.now();
                screen.tray.motion = TrayMotion::Revealing { since: now };
                // Stays non-interactive if HidePrompt already withdrew the prompt.
                screen.tray.accepting_input = screen.prompt.is_some();
                screen.timeline.schedule(
                    screen.timing.spring.duration,
                    Phase::TrayRevealComplete { generation },
                );
            } else {
                debug!("Stale reveal for generation {}", generation);
            }
            Effect::None
        }
        Phase::TrayRevealComplete { generation } => {
            if screen.tray.is_current(generation) {
                screen.tray.motion = TrayMotion::Shown;
                screen.scroll = Some(ScrollRequest::Bottom);
            }
            Effect::None
        }
        Phase::TrayHideBegin { generation } => {
            if screen.tray.is_current(generation) {
                let now = screen.now();
                screen.tray.motion = TrayMotion::Hiding { since: now };
                screen.timeline.schedule(
                    screen.timing.spring.duration,
                    Phase::TrayHideComplete { generation },
                );
            } else {
                debug!("Stale hide for generation {}", generation);
            }
            Effect::None
        }
        Phase::TrayHideComplete { generation } => {
            if screen.tray.is_current(generation) {
                screen.tray.collapse();
            }
            Effect::None
        }
        Phase::KeyboardSettled => {
            screen.scroll = Some(ScrollRequest::Bottom);
            Effect::None
        }
        Phase::CancelFadeComplete => {
            screen.cancel.fade_since = None;
            Effect::None
        }
        Phase::Deferred(event) => apply_sequence_event(screen, event),
    }
}
