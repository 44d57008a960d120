//! # Scripted Sequence
//!
//! A [`ChatSequence`] that plays a conversation declared in TOML. Each
//! `[[steps]]` table does exactly one thing:
//!
//! ```toml
//! pace_ms = 600                                   # typing pause before each `say`
//!
//! [[steps]]
//! say = "What's your name?"
//!
//! [[steps]]
//! prompt = { text_input = { key = "name", placeholder = "Ada" } }
//!
//! [[steps]]
//! say = "Hi {name}! Shall we continue?"
//!
//! [[steps]]
//! prompt = { conditional = ["Yes", "No"] }
//! goto = ["more", "bye"]                          # one target per option
//!
//! [[steps]]
//! id = "more"
//! link = { url = "https://ratatui.rs", embedded = true }
//!
//! [[steps]]
//! id = "bye"
//! dismiss = true
//! ```
//!
//! Steps run in order until a prompt is reached; the script then waits for
//! the answer. `goto` on a prompt step picks the next step per option index,
//! on any other step it names the single next step.

use log::{debug, info, warn};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::core::action::SequenceEvent;
use crate::core::prompt::{Prompt, TextInputSpec};
use crate::core::sequence::{ChatSequence, SequenceHandle};

/// The script played when none is configured.
pub const WELCOME_SCRIPT: &str = r#"
pace_ms = 700

[[steps]]
say = "Hi there!"

[[steps]]
say = "I'm Banter, a scripted chat running right in your terminal."

[[steps]]
reveal_cancel = true

[[steps]]
say = "Want a quick tour?"

[[steps]]
prompt = { conditional = ["Sure", "No thanks"] }
goto = ["name", "bye"]

[[steps]]
id = "name"
say = "Great. What should I call you?"

[[steps]]
prompt = { text_input = { key = "name", placeholder = "Your name", max_length = 32 } }

[[steps]]
say = "Nice to meet you, {name}!"

[[steps]]
say = "Buttons can carry a glyph too. Pick one."

[[steps]]
prompt = { buttons = [{ title = "Read the docs", image = "»" }, { title = "Skip", image = "×" }] }
goto = ["docs", "bye"]

[[steps]]
id = "docs"
link = { url = "https://ratatui.rs", embedded = true }

[[steps]]
say = "That's the tour, {name}."

[[steps]]
id = "bye"
say = "Thanks for stopping by. Esc closes this screen any time."

[[steps]]
prompt = { single_button = { title = "Close" } }

[[steps]]
dismiss = true
"#;

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ScriptError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    /// The script has no steps.
    Empty,
    /// Step `index` declares no action.
    EmptyStep(usize),
    /// Step `index` declares more than one action.
    AmbiguousStep(usize),
    /// Two steps share an `id`.
    DuplicateId(String),
    /// Step `index` jumps to an `id` no step has.
    UnknownTarget { index: usize, target: String },
    /// Starting at step `index`, the steps loop without ever waiting for the user.
    EndlessLoop(usize),
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Io(e) => write!(f, "script I/O error: {e}"),
            ScriptError::Parse(e) => write!(f, "script parse error: {e}"),
            ScriptError::Empty => write!(f, "script has no steps"),
            ScriptError::EmptyStep(index) => write!(f, "step {index} has no action"),
            ScriptError::AmbiguousStep(index) => {
                write!(f, "step {index} has more than one action")
            }
            ScriptError::DuplicateId(id) => write!(f, "step id '{id}' is used twice"),
            ScriptError::UnknownTarget { index, target } => {
                write!(f, "step {index} jumps to unknown id '{target}'")
            }
            ScriptError::EndlessLoop(index) => write!(
                f,
                "steps loop from step {index} without a prompt or dismiss"
            ),
        }
    }
}

impl std::error::Error for ScriptError {}

// ============================================================================
// TOML shape
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScriptFile {
    #[serde(default)]
    pace_ms: u64,
    #[serde(default)]
    steps: Vec<StepFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct StepFile {
    id: Option<String>,
    say: Option<String>,
    reply: Option<String>,
    prompt: Option<Prompt>,
    link: Option<LinkStep>,
    #[serde(default)]
    reveal_cancel: bool,
    #[serde(default)]
    dismiss: bool,
    #[serde(default)]
    goto: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LinkStep {
    pub url: String,
    #[serde(default)]
    pub embedded: bool,
}

// ============================================================================
// Validated script
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum StepAction {
    Say(String),
    Reply(String),
    Prompt(Prompt),
    Link(LinkStep),
    RevealCancel,
    Dismiss,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub action: StepAction,
    /// Resolved step indices (see module docs).
    pub goto: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    pub pace: Duration,
    pub steps: Vec<Step>,
}

impl Script {
    pub fn parse(source: &str) -> Result<Self, ScriptError> {
        let file: ScriptFile = toml::from_str(source).map_err(ScriptError::Parse)?;
        if file.steps.is_empty() {
            return Err(ScriptError::Empty);
        }

        let mut ids: HashMap<String, usize> = HashMap::new();
        for (index, step) in file.steps.iter().enumerate() {
            if let Some(id) = &step.id {
                if ids.insert(id.clone(), index).is_some() {
                    return Err(ScriptError::DuplicateId(id.clone()));
                }
            }
        }

        let steps = file
            .steps
            .into_iter()
            .enumerate()
            .map(|(index, step)| compile_step(index, step, &ids))
            .collect::<Result<Vec<_>, _>>()?;
        check_progress(&steps)?;

        Ok(Self {
            pace: Duration::from_millis(file.pace_ms),
            steps,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let source = fs::read_to_string(path).map_err(ScriptError::Io)?;
        let script = Self::parse(&source)?;
        info!("Loaded script from {} ({} steps)", path.display(), script.steps.len());
        Ok(script)
    }

    pub fn welcome() -> Result<Self, ScriptError> {
        Self::parse(WELCOME_SCRIPT)
    }

    /// Number of steps that wait for the user.
    pub fn prompt_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s.action, StepAction::Prompt(_)))
            .count()
    }
}

fn compile_step(
    index: usize,
    step: StepFile,
    ids: &HashMap<String, usize>,
) -> Result<Step, ScriptError> {
    let mut actions = Vec::new();
    if let Some(text) = step.say {
        actions.push(StepAction::Say(text));
    }
    if let Some(text) = step.reply {
        actions.push(StepAction::Reply(text));
    }
    if let Some(prompt) = step.prompt {
        actions.push(StepAction::Prompt(prompt));
    }
    if let Some(link) = step.link {
        actions.push(StepAction::Link(link));
    }
    if step.reveal_cancel {
        actions.push(StepAction::RevealCancel);
    }
    if step.dismiss {
        actions.push(StepAction::Dismiss);
    }

    if actions.len() > 1 {
        return Err(ScriptError::AmbiguousStep(index));
    }
    let action = actions.pop().ok_or(ScriptError::EmptyStep(index))?;

    let goto = step
        .goto
        .into_iter()
        .map(|target| {
            ids.get(&target)
                .copied()
                .ok_or(ScriptError::UnknownTarget { index, target })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Step { action, goto })
}

/// Every run of non-waiting steps must reach a prompt, a dismiss or the end.
fn check_progress(steps: &[Step]) -> Result<(), ScriptError> {
    for start in 0..steps.len() {
        let mut cursor = start;
        let mut walked = 0;
        while let Some(step) = steps.get(cursor) {
            if matches!(step.action, StepAction::Prompt(_) | StepAction::Dismiss) {
                break;
            }
            walked += 1;
            if walked > steps.len() {
                return Err(ScriptError::EndlessLoop(start));
            }
            cursor = step.goto.first().copied().unwrap_or(cursor + 1);
        }
    }
    Ok(())
}

/// Replace `{key}` with earlier text answers. Unknown keys are left as-is.
pub fn interpolate(text: &str, answers: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let key = &after[..close];
                match answers.get(key) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

// ============================================================================
// Sequence
// ============================================================================

pub struct ScriptedSequence {
    script: Script,
    cursor: usize,
    /// Prompt step currently waiting for an answer.
    waiting: Option<usize>,
    answers: HashMap<String, String>,
    finished: bool,
}

impl ScriptedSequence {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            cursor: 0,
            waiting: None,
            answers: HashMap::new(),
            finished: false,
        }
    }

    pub fn answers(&self) -> &HashMap<String, String> {
        &self.answers
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Emit steps from the cursor until a prompt, a dismiss or the end.
    /// Later steps are deferred so `say` lines arrive one typing pause apart.
    fn run(&mut self, ui: &SequenceHandle) {
        let mut delay = Duration::ZERO;

        while let Some(step) = self.script.steps.get(self.cursor) {
            let index = self.cursor;
            debug!("Script step {}: {:?}", index, step.action);
            self.cursor = step.goto.first().copied().unwrap_or(index + 1);

            match &step.action {
                StepAction::Say(text) => {
                    let text = interpolate(text, &self.answers);
                    if !self.script.pace.is_zero() {
                        ui.send_after(delay, SequenceEvent::StartTyping);
                        delay += self.script.pace;
                        ui.send_after(delay, SequenceEvent::StopTyping);
                    }
                    ui.send_after(delay, SequenceEvent::AddAppMessage(text));
                }
                StepAction::Reply(text) => {
                    let text = interpolate(text, &self.answers);
                    ui.send_after(delay, SequenceEvent::AddUserMessage(text));
                }
                StepAction::Link(link) => {
                    ui.send_after(
                        delay,
                        SequenceEvent::OpenLink {
                            url: link.url.clone(),
                            embedded: link.embedded,
                        },
                    );
                }
                StepAction::RevealCancel => ui.send_after(delay, SequenceEvent::RevealCancel),
                StepAction::Prompt(prompt) => {
                    self.waiting = Some(index);
                    ui.send_after(delay, SequenceEvent::ShowPrompt(prompt.clone()));
                    return;
                }
                StepAction::Dismiss => {
                    self.finished = true;
                    ui.send_after(delay, SequenceEvent::RequestDismiss);
                    return;
                }
            }
        }

        info!("Script reached its last step");
        self.finished = true;
    }

    /// Take the waiting prompt step, pointing the cursor at the branch for `option`.
    fn answer(&mut self, option: usize) -> bool {
        let Some(index) = self.waiting.take() else {
            warn!("Answer received with no prompt waiting");
            return false;
        };
        let step = &self.script.steps[index];
        self.cursor = step.goto.get(option).copied().unwrap_or(index + 1);
        true
    }
}

impl ChatSequence for ScriptedSequence {
    fn start(&mut self, ui: &SequenceHandle) {
        info!("Script started ({} steps)", self.script.steps.len());
        self.run(ui);
    }

    fn button_tapped(&mut self, index: usize, label: &str, _prompt: &Prompt, ui: &SequenceHandle) {
        if !self.answer(index) {
            return;
        }
        ui.hide_prompt();
        ui.add_user_message(label);
        self.run(ui);
    }

    fn text_entered(&mut self, text: &str, spec: &TextInputSpec, ui: &SequenceHandle) {
        if !self.answer(0) {
            return;
        }
        self.answers.insert(spec.key.clone(), text.to_string());
        ui.add_user_message(text);
        self.run(ui);
    }

    fn dismissed(&mut self) {
        info!("Script dismissed at step {}", self.cursor);
        self.finished = true;
        self.waiting = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::Action;
    use std::sync::mpsc::{self, Receiver};

    fn handle() -> (SequenceHandle, Receiver<Action>) {
        let (tx, rx) = mpsc::channel();
        (SequenceHandle::new(tx), rx)
    }

    fn events(rx: &Receiver<Action>) -> Vec<SequenceEvent> {
        rx.try_iter()
            .map(|action| match action {
                Action::Sequence(event) => event,
                Action::Defer { event, .. } => event,
                other => panic!("unexpected action {other:?}"),
            })
            .collect()
    }

    #[test]
    fn welcome_script_is_valid() {
        let script = Script::welcome().unwrap();
        assert!(script.steps.len() > 5);
        assert_eq!(script.prompt_count(), 4);
    }

    #[test]
    fn empty_script_is_rejected() {
        assert!(matches!(Script::parse("pace_ms = 10"), Err(ScriptError::Empty)));
    }

    #[test]
    fn step_without_action_is_rejected() {
        let err = Script::parse("[[steps]]\nid = \"lonely\"").unwrap_err();
        assert!(matches!(err, ScriptError::EmptyStep(0)));
    }

    #[test]
    fn step_with_two_actions_is_rejected() {
        let err = Script::parse("[[steps]]\nsay = \"a\"\n\n[[steps]]\nsay = \"b\"\nreply = \"c\"")
            .unwrap_err();
        assert!(matches!(err, ScriptError::AmbiguousStep(1)));
        assert_eq!(err.to_string(), "step 1 has more than one action");
    }

    #[test]
    fn unknown_goto_target_is_rejected() {
        let err = Script::parse("[[steps]]\nsay = \"a\"\ngoto = [\"nowhere\"]").unwrap_err();
        match err {
            ScriptError::UnknownTarget { index, target } => {
                assert_eq!(index, 0);
                assert_eq!(target, "nowhere");
            }
            other => panic!("expected UnknownTarget, got {other:?}"),
        }
    }

    #[test]
    fn loop_without_a_prompt_is_rejected() {
        let err = Script::parse("[[steps]]\nid = \"a\"\nsay = \"again\"\ngoto = [\"a\"]")
            .unwrap_err();
        assert!(matches!(err, ScriptError::EndlessLoop(0)));

        let source = r#"
[[steps]]
say = "intro"

[[steps]]
id = "spin"
say = "round"

[[steps]]
reply = "and round"
goto = ["spin"]
"#;
        assert!(matches!(Script::parse(source), Err(ScriptError::EndlessLoop(0))));
    }

    #[test]
    fn loop_through_a_prompt_is_accepted() {
        let source = r#"
[[steps]]
id = "ask"
say = "Again?"

[[steps]]
prompt = { conditional = ["Yes", "No"] }
goto = ["ask", "bye"]

[[steps]]
id = "bye"
dismiss = true
"#;
        let script = Script::parse(source).unwrap();
        assert_eq!(script.steps[1].goto, vec![0, 2]);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let source = "[[steps]]\nid = \"x\"\nsay = \"a\"\n\n[[steps]]\nid = \"x\"\nsay = \"b\"";
        assert!(matches!(Script::parse(source), Err(ScriptError::DuplicateId(id)) if id == "x"));
    }

    #[test]
    fn unknown_fields_are_parse_errors() {
        let err = Script::parse("[[steps]]\nshout = \"a\"").unwrap_err();
        assert!(matches!(err, ScriptError::Parse(_)));
    }

    #[test]
    fn interpolation_fills_known_keys_only() {
        let mut answers = HashMap::new();
        answers.insert("name".to_string(), "Ada".to_string());
        assert_eq!(interpolate("Hi {name}!", &answers), "Hi Ada!");
        assert_eq!(interpolate("{missing} {name}", &answers), "{missing} Ada");
        assert_eq!(interpolate("open { brace", &answers), "open { brace");
    }

    #[test]
    fn start_runs_until_first_prompt() {
        let script = Script::parse(
            r#"
[[steps]]
say = "Hi!"

[[steps]]
say = "What's your name?"

[[steps]]
prompt = { text_input = { key = "name" } }

[[steps]]
say = "never yet"
"#,
        )
        .unwrap();
        let mut sequence = ScriptedSequence::new(script);
        let (ui, rx) = handle();
        sequence.start(&ui);

        assert_eq!(
            events(&rx),
            vec![
                SequenceEvent::AddAppMessage("Hi!".into()),
                SequenceEvent::AddAppMessage("What's your name?".into()),
                SequenceEvent::ShowPrompt(Prompt::TextInput(TextInputSpec::new("name"))),
            ]
        );
        assert!(!sequence.is_finished());
    }

    #[test]
    fn pace_brackets_messages_with_typing_and_defers_them() {
        let script = Script::parse("pace_ms = 400\n[[steps]]\nsay = \"a\"\n[[steps]]\nsay = \"b\"")
            .unwrap();
        let mut sequence = ScriptedSequence::new(script);
        let (ui, rx) = handle();
        sequence.start(&ui);

        let actions: Vec<Action> = rx.try_iter().collect();
        assert_eq!(actions[0], Action::Sequence(SequenceEvent::StartTyping));
        assert_eq!(
            actions[2],
            Action::Defer {
                delay: Duration::from_millis(400),
                event: SequenceEvent::AddAppMessage("a".into()),
            }
        );
        assert_eq!(
            actions.last(),
            Some(&Action::Defer {
                delay: Duration::from_millis(800),
                event: SequenceEvent::AddAppMessage("b".into()),
            })
        );
        assert!(sequence.is_finished());
    }

    #[test]
    fn tap_follows_goto_for_option() {
        let script = Script::parse(
            r#"
[[steps]]
prompt = { conditional = ["Yes", "No"] }
goto = ["yes", "no"]

[[steps]]
id = "yes"
say = "yay"

[[steps]]
id = "no"
say = "oh well"
"#,
        )
        .unwrap();
        let prompt = Prompt::Conditional(vec!["Yes".into(), "No".into()]);
        let mut sequence = ScriptedSequence::new(script);
        let (ui, rx) = handle();
        sequence.start(&ui);
        events(&rx);

        sequence.button_tapped(1, "No", &prompt, &ui);
        assert_eq!(
            events(&rx),
            vec![
                SequenceEvent::HidePrompt,
                SequenceEvent::AddUserMessage("No".into()),
                SequenceEvent::AddAppMessage("oh well".into()),
            ]
        );
    }

    #[test]
    fn text_answer_is_stored_and_interpolated() {
        let script = Script::parse(
            r#"
[[steps]]
prompt = { text_input = { key = "name" } }

[[steps]]
say = "Hello {name}"

[[steps]]
dismiss = true
"#,
        )
        .unwrap();
        let spec = TextInputSpec::new("name");
        let mut sequence = ScriptedSequence::new(script);
        let (ui, rx) = handle();
        sequence.start(&ui);
        events(&rx);

        sequence.text_entered("Ada", &spec, &ui);
        assert_eq!(sequence.answers().get("name").map(String::as_str), Some("Ada"));
        assert_eq!(
            events(&rx),
            vec![
                SequenceEvent::AddUserMessage("Ada".into()),
                SequenceEvent::AddAppMessage("Hello Ada".into()),
                SequenceEvent::RequestDismiss,
            ]
        );
        assert!(sequence.is_finished());
    }

    #[test]
    fn answers_without_a_waiting_prompt_are_ignored() {
        let script = Script::parse("[[steps]]\nsay = \"hi\"").unwrap();
        let mut sequence = ScriptedSequence::new(script);
        let (ui, rx) = handle();
        sequence.start(&ui);
        events(&rx);

        let prompt = Prompt::Conditional(vec!["Yes".into()]);
        sequence.button_tapped(0, "Yes", &prompt, &ui);
        sequence.text_entered("late", &TextInputSpec::new("k"), &ui);
        assert!(events(&rx).is_empty());
    }
}
