//! # Chat Driver
//!
//! Glue between the pure reducer and the sequence. The driver owns the
//! screen, the sequence and the receiving end of the sequence channel.
//!
//! Every `dispatch` runs the action through `update()`. Effects aimed at the
//! sequence (start, tapped, entered, dismissed) are delivered here; whatever
//! the sequence enqueued in response is drained and dispatched in turn.
//! Effects aimed at the presentation layer (focus, links, close) are returned
//! to the caller in the order they happened.

use log::debug;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use crate::core::action::{Action, Effect, update};
use crate::core::sequence::{ChatSequence, SequenceHandle};
use crate::core::state::ChatScreen;

pub struct ChatDriver<S: ChatSequence> {
    screen: ChatScreen,
    sequence: S,
    handle: SequenceHandle,
    rx: Receiver<Action>,
}

impl<S: ChatSequence> ChatDriver<S> {
    pub fn new(screen: ChatScreen, sequence: S) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            screen,
            sequence,
            handle: SequenceHandle::new(tx),
            rx,
        }
    }

    pub fn screen(&self) -> &ChatScreen {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut ChatScreen {
        &mut self.screen
    }

    pub fn sequence(&self) -> &S {
        &self.sequence
    }

    /// Apply `action` and everything it causes. Returns presentation effects.
    pub fn dispatch(&mut self, action: Action) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.apply(action, &mut effects);
        self.drain(&mut effects);
        effects
    }

    /// Advance the clock to `now`, completing every phase that is due.
    pub fn tick(&mut self, now: Duration) -> Vec<Effect> {
        let mut effects = Vec::new();
        while let Some(phase) = self.screen.timeline.pop_due(now) {
            self.apply(Action::Phase(phase), &mut effects);
            self.drain(&mut effects);
        }
        effects
    }

    /// Time of the next scheduled phase, if any.
    pub fn next_due(&self) -> Option<Duration> {
        self.screen.timeline.next_due()
    }

    fn drain(&mut self, effects: &mut Vec<Effect>) {
        while let Ok(action) = self.rx.try_recv() {
            debug!("Driver received: {:?}", action);
            self.apply(action, effects);
        }
    }

    fn apply(&mut self, action: Action, effects: &mut Vec<Effect>) {
        match update(&mut self.screen, action) {
            Effect::None => {}
            Effect::StartSequence => self.sequence.start(&self.handle),
            Effect::ButtonTapped {
                index,
                label,
                prompt,
            } => self
                .sequence
                .button_tapped(index, &label, &prompt, &self.handle),
            Effect::TextEntered { text, spec } => {
                self.sequence.text_entered(&text, &spec, &self.handle)
            }
            Effect::Dismissed => self.sequence.dismissed(),
            effect => effects.push(effect),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::SequenceEvent;
    use crate::core::prompt::Prompt;
    use crate::test_support::{Call, RecordingSequence, ms, test_screen};

    fn driver_with(sequence: RecordingSequence) -> ChatDriver<RecordingSequence> {
        ChatDriver::new(test_screen(), sequence)
    }

    #[test]
    fn start_is_called_once_after_activation_delay() {
        let mut driver = driver_with(RecordingSequence::default());
        driver.dispatch(Action::Activate);
        driver.tick(ms(100));
        assert!(driver.sequence().calls.is_empty());

        driver.tick(ms(250));
        driver.tick(ms(1000));
        assert_eq!(driver.sequence().calls, vec![Call::Start]);
    }

    #[test]
    fn events_emitted_by_start_are_applied() {
        let sequence = RecordingSequence::with_opening(vec![
            SequenceEvent::AddAppMessage("Hi!".into()),
            SequenceEvent::RevealCancel,
            SequenceEvent::RequestDismiss,
        ]);
        let mut driver = driver_with(sequence);
        driver.dispatch(Action::Activate);

        let effects = driver.tick(ms(250));
        assert_eq!(effects, vec![Effect::Close]);
        assert_eq!(driver.screen().log.len(), 1);
    }

    #[test]
    fn tap_reaches_sequence_with_prompt_context() {
        let prompt = Prompt::Conditional(vec!["Left".into(), "Right".into()]);
        let sequence = RecordingSequence::with_opening(vec![SequenceEvent::ShowPrompt(prompt.clone())]);
        let mut driver = driver_with(sequence);
        driver.dispatch(Action::Activate);
        driver.tick(ms(300));

        driver.dispatch(Action::Tap("Right".into()));
        assert_eq!(
            driver.sequence().calls.last(),
            Some(&Call::ButtonTapped {
                index: 1,
                label: "Right".into(),
                prompt,
            })
        );
    }

    #[test]
    fn deactivate_notifies_sequence_once() {
        let mut driver = driver_with(RecordingSequence::default());
        driver.dispatch(Action::Activate);
        driver.dispatch(Action::Deactivate);
        driver.dispatch(Action::Deactivate);
        driver.tick(ms(1000));

        assert_eq!(driver.sequence().calls, vec![Call::Dismissed]);
    }
}
