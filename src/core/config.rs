//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.banter/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::state::Metrics;
use crate::core::theme::ChatTheme;
use crate::core::timeline::{Spring, Timing};
use crate::core::tray::TrayMetrics;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BanterConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub theme: ChatTheme,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Script to run, relative to `~/.banter/` unless absolute.
    pub script: Option<String>,
}

/// Durations in milliseconds.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TimingConfig {
    pub start_delay_ms: Option<u64>,
    pub reveal_newest_delay_ms: Option<u64>,
    pub tray_reveal_delay_ms: Option<u64>,
    pub tray_hide_delay_ms: Option<u64>,
    pub spring_duration_ms: Option<u64>,
    pub spring_damping: Option<f32>,
    pub spring_velocity: Option<f32>,
    pub keyboard_show_ms: Option<u64>,
    pub keyboard_hide_ms: Option<u64>,
    pub cancel_fade_ms: Option<u64>,
    pub row_fade_ms: Option<u64>,
}

/// Sizes in terminal rows.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LayoutConfig {
    pub tray_bottom_margin: Option<u16>,
    pub button_height: Option<u16>,
    pub text_input_height: Option<u16>,
    pub row_spacing: Option<u16>,
    pub fullscreen: Option<bool>,
}

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub theme: ChatTheme,
    pub timing: Timing,
    pub metrics: Metrics,
    pub script_path: Option<PathBuf>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".banter"))
}

/// Returns the path to `~/.banter/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.banter/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `BanterConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<BanterConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(BanterConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(BanterConfig::default());
    }

    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<BanterConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: BanterConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r##"# Banter Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# script = "welcome.toml"            # Relative to ~/.banter/, or BANTER_SCRIPT env var

# [theme]
# background_color = "reset"         # Named color, "#rrggbb", or "reset"
# chat_view_background_color = "reset"
# rounded_corners = true
# x_button_tint_color = "gray"
# hides_cancel_button_on_start = false
# app_bubble_color = "blue"
# app_text_color = "white"
# user_bubble_color = "green"
# user_text_color = "white"
# button_text_color = "black"
# button_background_color = "cyan"
# button_bold = true
# text_input_color = "white"
# text_input_border_color = "cyan"

# [timing]
# start_delay_ms = 250
# reveal_newest_delay_ms = 500
# tray_reveal_delay_ms = 50
# tray_hide_delay_ms = 100
# spring_duration_ms = 700
# spring_damping = 0.6
# spring_velocity = 1.5
# keyboard_show_ms = 450
# keyboard_hide_ms = 700
# cancel_fade_ms = 350
# row_fade_ms = 300

# [layout]
# tray_bottom_margin = 1
# button_height = 3
# text_input_height = 3
# row_spacing = 1
# fullscreen = false
"##;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_script` is the `--script` flag (None = not specified).
pub fn resolve(config: &BanterConfig, cli_script: Option<&Path>) -> ResolvedConfig {
    // Script: CLI → env → config → built-in
    let script_path = cli_script
        .map(Path::to_path_buf)
        .or_else(|| std::env::var("BANTER_SCRIPT").ok().map(PathBuf::from))
        .or_else(|| config.general.script.as_deref().map(resolve_relative));

    ResolvedConfig {
        theme: config.theme.clone(),
        timing: resolve_timing(&config.timing),
        metrics: resolve_metrics(&config.layout),
        script_path,
    }
}

/// Relative script paths in the config file are anchored at `~/.banter/`.
fn resolve_relative(script: &str) -> PathBuf {
    let path = PathBuf::from(script);
    if path.is_absolute() {
        return path;
    }
    match config_dir() {
        Some(dir) => dir.join(path),
        None => path,
    }
}

fn resolve_timing(timing: &TimingConfig) -> Timing {
    let defaults = Timing::default();
    let millis = |value: Option<u64>, fallback: Duration| {
        value.map(Duration::from_millis).unwrap_or(fallback)
    };

    Timing {
        start_delay: millis(timing.start_delay_ms, defaults.start_delay),
        reveal_newest_delay: millis(timing.reveal_newest_delay_ms, defaults.reveal_newest_delay),
        tray_reveal_delay: millis(timing.tray_reveal_delay_ms, defaults.tray_reveal_delay),
        tray_hide_delay: millis(timing.tray_hide_delay_ms, defaults.tray_hide_delay),
        spring: Spring {
            duration: millis(timing.spring_duration_ms, defaults.spring.duration),
            damping_ratio: timing
                .spring_damping
                .unwrap_or(defaults.spring.damping_ratio),
            initial_velocity: timing
                .spring_velocity
                .unwrap_or(defaults.spring.initial_velocity),
        },
        keyboard_show: millis(timing.keyboard_show_ms, defaults.keyboard_show),
        keyboard_hide: millis(timing.keyboard_hide_ms, defaults.keyboard_hide),
        cancel_fade: millis(timing.cancel_fade_ms, defaults.cancel_fade),
        row_fade: millis(timing.row_fade_ms, defaults.row_fade),
    }
}

fn resolve_metrics(layout: &LayoutConfig) -> Metrics {
    let defaults = Metrics::default();
    Metrics {
        tray: TrayMetrics {
            button_height: layout
                .button_height
                .unwrap_or(defaults.tray.button_height)
                .max(1),
            text_input_height: layout
                .text_input_height
                .unwrap_or(defaults.tray.text_input_height)
                .max(1),
            bottom_margin: layout
                .tray_bottom_margin
                .unwrap_or(defaults.tray.bottom_margin),
        },
        row_spacing: layout.row_spacing.unwrap_or(defaults.row_spacing),
        fullscreen: layout.fullscreen.unwrap_or(defaults.fullscreen),
    }
}
