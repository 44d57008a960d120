//! # Chat Theme
//!
//! Named colors and flags for the chat screen. Colors are stored as strings
//! ("blue", "#1e1e2e", "reset", ...) so the core stays free of any rendering
//! library; the TUI resolves them when it draws.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChatTheme {
    pub background_color: String,
    pub chat_view_background_color: String,
    /// Rounded borders on the chat view and bubbles.
    pub rounded_corners: bool,
    pub x_button_tint_color: String,
    pub hides_cancel_button_on_start: bool,
    pub app_bubble_color: String,
    pub app_text_color: String,
    pub user_bubble_color: String,
    pub user_text_color: String,
    pub button_text_color: String,
    pub button_background_color: String,
    pub button_bold: bool,
    pub text_input_color: String,
    pub text_input_border_color: String,
}

impl Default for ChatTheme {
    fn default() -> Self {
        Self {
            background_color: "reset".to_string(),
            chat_view_background_color: "reset".to_string(),
            rounded_corners: true,
            x_button_tint_color: "gray".to_string(),
            hides_cancel_button_on_start: false,
            app_bubble_color: "blue".to_string(),
            app_text_color: "white".to_string(),
            user_bubble_color: "green".to_string(),
            user_text_color: "white".to_string(),
            button_text_color: "black".to_string(),
            button_background_color: "cyan".to_string(),
            button_bold: true,
            text_input_color: "white".to_string(),
            text_input_border_color: "cyan".to_string(),
        }
    }
}
