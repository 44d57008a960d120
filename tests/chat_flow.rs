//! End-to-end flows through the public API: a sequence drives the screen via
//! its handle, the test plays the user and the clock.

use std::time::Duration;

use banter::core::action::{Action, Effect, SequenceEvent};
use banter::core::driver::ChatDriver;
use banter::core::message::Origin;
use banter::core::prompt::{ChatButton, Prompt, TextInputSpec};
use banter::core::script::{Script, ScriptedSequence};
use banter::core::sequence::{ChatSequence, SequenceHandle};
use banter::core::state::{ChatScreen, Lifecycle, Metrics};
use banter::core::theme::ChatTheme;
use banter::core::timeline::Timing;
use banter::core::tray::TrayMode;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[derive(Debug, Clone, PartialEq)]
enum Heard {
    Start,
    Tapped(usize, String),
    Entered(String, String),
    Dismissed,
}

/// Plays an opening on start and records everything the screen reports.
#[derive(Default)]
struct Recorder {
    opening: Vec<SequenceEvent>,
    heard: Vec<Heard>,
}

impl ChatSequence for Recorder {
    fn start(&mut self, ui: &SequenceHandle) {
        self.heard.push(Heard::Start);
        for event in self.opening.drain(..) {
            ui.send(event);
        }
    }

    fn button_tapped(&mut self, index: usize, label: &str, _prompt: &Prompt, _ui: &SequenceHandle) {
        self.heard.push(Heard::Tapped(index, label.to_string()));
    }

    fn text_entered(&mut self, text: &str, spec: &TextInputSpec, _ui: &SequenceHandle) {
        self.heard.push(Heard::Entered(text.to_string(), spec.key.clone()));
    }

    fn dismissed(&mut self) {
        self.heard.push(Heard::Dismissed);
    }
}

fn screen() -> ChatScreen {
    ChatScreen::new(ChatTheme::default(), Timing::default(), Metrics::default())
}

fn start<S: ChatSequence>(sequence: S) -> (ChatDriver<S>, Vec<Effect>) {
    let mut driver = ChatDriver::new(screen(), sequence);
    let mut effects = driver.dispatch(Action::Activate);
    effects.extend(driver.tick(ms(2000)));
    (driver, effects)
}

#[test]
fn name_prompt_forwards_text_once_and_collapses() {
    let spec = TextInputSpec::new("name");
    let recorder = Recorder {
        opening: vec![
            SequenceEvent::AddAppMessage("Hi!".into()),
            SequenceEvent::AddAppMessage("What's your name?".into()),
            SequenceEvent::ShowPrompt(Prompt::TextInput(spec.clone())),
        ],
        ..Default::default()
    };
    let (mut driver, effects) = start(recorder);
    assert!(effects.contains(&Effect::FocusTextInput(spec)));
    assert_eq!(driver.screen().mode(), TrayMode::TextPromptShown);

    driver.dispatch(Action::TextSubmitted("Ada".into()));
    driver.dispatch(Action::TextSubmitted("Ada".into()));
    driver.tick(ms(5000));

    let entered: Vec<_> = driver
        .sequence()
        .heard
        .iter()
        .filter(|h| matches!(h, Heard::Entered(..)))
        .collect();
    assert_eq!(entered, vec![&Heard::Entered("Ada".into(), "name".into())]);

    let screen = driver.screen();
    assert_eq!(screen.mode(), TrayMode::Idle);
    assert!(screen.tray.collapsed);
    assert_eq!(screen.tray_height(ms(5000)), 0);

    let rows: Vec<_> = screen.log.iter().map(|m| (m.text.as_str(), m.origin)).collect();
    assert_eq!(
        rows,
        vec![("Hi!", Origin::App), ("What's your name?", Origin::App)]
    );
    let default_margin = screen.metrics.row_spacing;
    assert_eq!(screen.log.leading_margin(0, default_margin), default_margin);
    assert_eq!(screen.log.leading_margin(1, default_margin), 0);
}

#[test]
fn tapping_no_reports_index_one_once() {
    let prompt = Prompt::Buttons(vec![ChatButton::new("Yes"), ChatButton::new("No")]);
    let recorder = Recorder {
        opening: vec![SequenceEvent::ShowPrompt(prompt)],
        ..Default::default()
    };
    let (mut driver, _) = start(recorder);
    assert_eq!(driver.screen().mode(), TrayMode::PromptShown);

    driver.dispatch(Action::Tap("No".into()));
    driver.dispatch(Action::Sequence(SequenceEvent::HidePrompt));
    driver.dispatch(Action::Tap("No".into()));
    driver.tick(ms(5000));

    assert_eq!(
        driver.sequence().heard,
        vec![Heard::Start, Heard::Tapped(1, "No".into())]
    );
    assert_eq!(driver.screen().mode(), TrayMode::Idle);
}

#[test]
fn unknown_label_is_ignored() {
    let recorder = Recorder {
        opening: vec![SequenceEvent::ShowPrompt(Prompt::Conditional(vec![
            "Left".into(),
            "Right".into(),
        ]))],
        ..Default::default()
    };
    let (mut driver, _) = start(recorder);
    driver.dispatch(Action::Tap("Up".into()));
    assert_eq!(driver.sequence().heard, vec![Heard::Start]);
    assert!(driver.screen().prompt.is_some());
}

#[test]
fn teardown_cancels_pending_work() {
    let recorder = Recorder {
        opening: vec![SequenceEvent::AddAppMessage("Hello".into())],
        ..Default::default()
    };
    let mut driver = ChatDriver::new(screen(), recorder);
    driver.dispatch(Action::Activate);
    // Dismissed before the start delay elapses: the sequence never starts.
    driver.dispatch(Action::Deactivate);
    driver.tick(ms(5000));

    assert_eq!(driver.sequence().heard, vec![Heard::Dismissed]);
    assert_eq!(driver.screen().lifecycle, Lifecycle::Dismissed);
    assert!(driver.next_due().is_none());
    assert!(driver.screen().log.is_empty());
}

const INTRO: &str = r#"
[[steps]]
say = "What's your name?"

[[steps]]
prompt = { text_input = { key = "name" } }

[[steps]]
say = "Hi {name}. Continue?"

[[steps]]
prompt = { conditional = ["Yes", "No"] }
goto = ["more", "bye"]

[[steps]]
id = "more"
say = "Onwards."

[[steps]]
id = "bye"
dismiss = true
"#;

#[test]
fn scripted_sequence_plays_to_dismissal() {
    let script = Script::parse(INTRO).unwrap();
    let (mut driver, effects) = start(ScriptedSequence::new(script));
    assert!(matches!(effects.last(), Some(Effect::FocusTextInput(spec)) if spec.key == "name"));

    driver.dispatch(Action::TextSubmitted("Ada".into()));
    driver.tick(ms(5000));
    assert_eq!(driver.screen().mode(), TrayMode::PromptShown);

    let effects = driver.dispatch(Action::Tap("No".into()));
    assert_eq!(effects, vec![Effect::Close]);
    assert!(driver.sequence().is_finished());
    assert_eq!(driver.sequence().answers().get("name").map(String::as_str), Some("Ada"));

    let texts: Vec<_> = driver.screen().log.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["What's your name?", "Ada", "Hi Ada. Continue?", "No"]);
}

#[test]
fn welcome_script_is_valid() {
    let script = Script::welcome().unwrap();
    assert!(script.prompt_count() >= 3);
}
