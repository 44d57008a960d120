//! Resolves the string colors of a `ChatTheme` into ratatui styles once,
//! at startup. Unknown color names fall back to the default theme's value.

use std::str::FromStr;

use log::warn;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

use crate::core::message::Origin;
use crate::core::theme::ChatTheme;

#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub chat_background: Color,
    pub border_type: BorderType,
    pub cancel_tint: Color,
    pub app_bubble: Color,
    pub app_text: Color,
    pub user_bubble: Color,
    pub user_text: Color,
    pub button_text: Color,
    pub button_background: Color,
    pub button_modifier: Modifier,
    pub text_input: Color,
    pub text_input_border: Color,
}

impl Palette {
    pub fn from_theme(theme: &ChatTheme) -> Self {
        let fallback = ChatTheme::default();
        let color = |value: &str, default: &str| parse_color(value, default);

        Self {
            background: color(&theme.background_color, &fallback.background_color),
            chat_background: color(
                &theme.chat_view_background_color,
                &fallback.chat_view_background_color,
            ),
            border_type: if theme.rounded_corners {
                BorderType::Rounded
            } else {
                BorderType::Plain
            },
            cancel_tint: color(&theme.x_button_tint_color, &fallback.x_button_tint_color),
            app_bubble: color(&theme.app_bubble_color, &fallback.app_bubble_color),
            app_text: color(&theme.app_text_color, &fallback.app_text_color),
            user_bubble: color(&theme.user_bubble_color, &fallback.user_bubble_color),
            user_text: color(&theme.user_text_color, &fallback.user_text_color),
            button_text: color(&theme.button_text_color, &fallback.button_text_color),
            button_background: color(
                &theme.button_background_color,
                &fallback.button_background_color,
            ),
            button_modifier: if theme.button_bold {
                Modifier::BOLD
            } else {
                Modifier::empty()
            },
            text_input: color(&theme.text_input_color, &fallback.text_input_color),
            text_input_border: color(
                &theme.text_input_border_color,
                &fallback.text_input_border_color,
            ),
        }
    }

    /// Border and text style for a bubble.
    pub fn bubble(&self, origin: Origin) -> (Style, Style) {
        let (border, text) = match origin {
            Origin::App => (self.app_bubble, self.app_text),
            Origin::User => (self.user_bubble, self.user_text),
        };
        (Style::default().fg(border), Style::default().fg(text))
    }

    pub fn button(&self) -> Style {
        Style::default()
            .fg(self.button_text)
            .bg(self.button_background)
            .add_modifier(self.button_modifier)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_theme(&ChatTheme::default())
    }
}

fn parse_color(value: &str, default: &str) -> Color {
    Color::from_str(value).unwrap_or_else(|_| {
        warn!("Unknown theme color '{}', using '{}'", value, default);
        Color::from_str(default).unwrap_or(Color::Reset)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_theme_resolves() {
        let palette = Palette::default();
        assert_eq!(palette.app_bubble, Color::Blue);
        assert_eq!(palette.user_bubble, Color::Green);
        assert_eq!(palette.background, Color::Reset);
        assert_eq!(palette.border_type, BorderType::Rounded);
        assert!(palette.button_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn hex_colors_and_square_corners() {
        let theme = ChatTheme {
            app_bubble_color: "#102030".into(),
            rounded_corners: false,
            button_bold: false,
            ..ChatTheme::default()
        };
        let palette = Palette::from_theme(&theme);
        assert_eq!(palette.app_bubble, Color::Rgb(0x10, 0x20, 0x30));
        assert_eq!(palette.border_type, BorderType::Plain);
        assert!(palette.button_modifier.is_empty());
    }

    #[test]
    fn unknown_color_falls_back() {
        let theme = ChatTheme {
            user_bubble_color: "not-a-color".into(),
            ..ChatTheme::default()
        };
        assert_eq!(Palette::from_theme(&theme).user_bubble, Color::Green);
    }

    #[test]
    fn bubble_styles_follow_origin() {
        let palette = Palette::default();
        let (border, text) = palette.bubble(Origin::User);
        assert_eq!(border.fg, Some(Color::Green));
        assert_eq!(text.fg, Some(Color::White));
    }
}
