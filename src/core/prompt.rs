//! # Prompts
//!
//! A prompt is the sequence asking the user for something: pick one of a few
//! options, press a single button, or type a value.
//!
//! Prompts deserialize from TOML so scripts can declare them inline:
//!
//! ```toml
//! prompt = { conditional = ["Yes", "No"] }
//! prompt = { buttons = [{ title = "Rate us", image = "★" }, { title = "Later" }] }
//! prompt = { single_button = { title = "Continue" } }
//! prompt = { text_input = { key = "email", placeholder = "you@example.com", keyboard = "email" } }
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChatButton {
    pub title: String,
    /// Glyph drawn before the title (e.g. an emoji or nerd-font icon).
    #[serde(default)]
    pub image: Option<String>,
}

impl ChatButton {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// Which characters the text field accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyboardKind {
    #[default]
    Text,
    Email,
    Number,
}

impl KeyboardKind {
    pub fn accepts(self, c: char) -> bool {
        match self {
            KeyboardKind::Text => !c.is_control(),
            KeyboardKind::Email => !c.is_control() && !c.is_whitespace(),
            KeyboardKind::Number => c.is_ascii_digit() || c == '.' || c == '-',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            KeyboardKind::Text => "text",
            KeyboardKind::Email => "email",
            KeyboardKind::Number => "number",
        }
    }
}

/// Field metadata for a free-text prompt. Echoed back with the entered text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TextInputSpec {
    /// Identifies the answer (scripts interpolate it as `{key}`).
    pub key: String,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub keyboard: KeyboardKind,
    #[serde(default)]
    pub max_length: Option<usize>,
}

impl TextInputSpec {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            placeholder: String::new(),
            keyboard: KeyboardKind::default(),
            max_length: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Prompt {
    Conditional(Vec<String>),
    Buttons(Vec<ChatButton>),
    SingleButton(ChatButton),
    TextInput(TextInputSpec),
}

/// One widget in the button tray.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrayButton {
    pub title: String,
    pub image: Option<String>,
}

impl Prompt {
    /// Tray widgets for this prompt, one per option, in option order.
    /// Empty for `TextInput`, which uses the text field instead.
    pub fn tray_buttons(&self) -> Vec<TrayButton> {
        match self {
            Prompt::Conditional(options) => options
                .iter()
                .map(|title| TrayButton {
                    title: title.clone(),
                    image: None,
                })
                .collect(),
            Prompt::Buttons(buttons) => buttons.iter().map(TrayButton::from).collect(),
            Prompt::SingleButton(button) => vec![TrayButton::from(button)],
            Prompt::TextInput(_) => Vec::new(),
        }
    }

    /// Zero-based index of the option labelled `label`, if any.
    pub fn resolve_tap(&self, label: &str) -> Option<usize> {
        match self {
            Prompt::Conditional(options) => options.iter().position(|o| o == label),
            Prompt::Buttons(buttons) => buttons.iter().position(|b| b.title == label),
            Prompt::SingleButton(button) => (button.title == label).then_some(0),
            Prompt::TextInput(_) => None,
        }
    }

    pub fn option_count(&self) -> usize {
        match self {
            Prompt::Conditional(options) => options.len(),
            Prompt::Buttons(buttons) => buttons.len(),
            Prompt::SingleButton(_) => 1,
            Prompt::TextInput(_) => 0,
        }
    }
}

impl From<&ChatButton> for TrayButton {
    fn from(button: &ChatButton) -> Self {
        Self {
            title: button.title.clone(),
            image: button.image.clone(),
        }
    }
}
