//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the chat screen,
//! and translates keyboard and mouse events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Clock
//!
//! The core runs on an explicit clock. Each loop iteration measures the time
//! since startup and hands it to `ChatDriver::tick`, which completes every
//! phase that has come due. Rendering uses the same instant so springs and
//! fades agree with the phases.
//!
//! ## Redraw Strategy
//!
//! - **Animating** (tray spring, keyboard slide, row fade, scroll, or a phase
//!   pending): draws every ~60ms.
//! - **Idle**: sleeps up to 500ms or until the next phase is due, and only
//!   redraws on events.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous redraws.

mod component;
mod components;
mod event;
mod palette;
mod ui;

use log::{debug, info, warn};
use std::collections::VecDeque;
use std::io::stdout;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use ratatui::layout::Rect;

use crate::core::action::{Action, Effect};
use crate::core::config::ResolvedConfig;
use crate::core::driver::ChatDriver;
use crate::core::script::{Script, ScriptedSequence};
use crate::core::sequence::ChatSequence;
use crate::core::state::ChatScreen;
use crate::core::tray::TrayMode;
use crate::tui::component::EventHandler;
use crate::tui::components::{
    ButtonTrayState, KEYBOARD_ROWS, LinkEvent, LinkViewerState, MessageListState, TextPrompt,
    TextPromptEvent, TrayEvent,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::palette::Palette;

const FRAME_INTERVAL: Duration = Duration::from_millis(60);
const IDLE_INTERVAL: Duration = Duration::from_millis(500);

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    // Persistent component states
    pub message_list: MessageListState,
    pub button_tray: ButtonTrayState,
    pub text_prompt: TextPrompt,
    // Embedded link overlay (None = hidden)
    pub link_viewer: Option<LinkViewerState>,
    pub palette: Palette,
    pub title: String,
    /// Where the cancel control was last drawn, for click hit-testing.
    pub cancel_area: Rect,
}

impl TuiState {
    pub fn new(palette: Palette, title: impl Into<String>) -> Self {
        Self {
            message_list: MessageListState::new(),
            button_tray: ButtonTrayState::new(),
            text_prompt: TextPrompt::new(),
            link_viewer: None,
            palette,
            title: title.into(),
            cancel_area: Rect::default(),
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol is harmlessly ignored by terminals that don't support it
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Present `script` until the user or the script closes the screen.
pub fn run(config: ResolvedConfig, script: Script) -> std::io::Result<()> {
    let palette = Palette::from_theme(&config.theme);
    let screen = ChatScreen::new(config.theme, config.timing, config.metrics);
    let mut driver = ChatDriver::new(screen, ScriptedSequence::new(script));
    let mut tui = TuiState::new(palette, "Banter");

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new()
        .inspect_err(|e| warn!("Failed to enable terminal modes: {}", e));

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame
    let effects = driver.dispatch(Action::Activate);
    let mut should_quit = handle_effects(&mut driver, &mut tui, effects);

    while !should_quit {
        let now = start_time.elapsed();
        let effects = driver.tick(now);
        if !effects.is_empty() {
            needs_redraw = true;
        }
        let closed = handle_effects(&mut driver, &mut tui, effects);
        if closed || release_text_focus(&mut driver, &mut tui) {
            break;
        }

        let animating = driver.screen().is_animating(now) || tui.message_list.is_animating();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, driver.screen_mut(), &mut tui, now))?;
            needs_redraw = false;
        }

        // Short timeout while animating, otherwise sleep until the next phase
        let timeout = if animating {
            FRAME_INTERVAL
        } else {
            driver
                .next_due()
                .map_or(IDLE_INTERVAL, |due| due.saturating_sub(now).min(IDLE_INTERVAL))
        };
        let first_event = poll_event_timeout(timeout)?;
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        let mut pending = first_event;
        while let Some(event) = pending {
            if route_event(&mut driver, &mut tui, event) {
                should_quit = true;
                break;
            }
            pending = poll_event_immediate()?;
        }
    }

    // Teardown: cancels outstanding phases and notifies the sequence.
    driver.dispatch(Action::Deactivate);
    info!("Chat screen closed");

    ratatui::restore();
    Ok(())
}

/// Route one terminal event. Returns true when the app should quit.
fn route_event<S: ChatSequence>(
    driver: &mut ChatDriver<S>,
    tui: &mut TuiState,
    event: TuiEvent,
) -> bool {
    match event {
        // Ctrl+C always quits regardless of what is shown
        TuiEvent::ForceQuit => return true,
        // Resize just needs a redraw (already flagged)
        TuiEvent::Resize => return false,
        _ => {}
    }

    // Link overlay captures everything while open
    if let Some(viewer) = tui.link_viewer.as_mut() {
        match viewer.handle_event(&event) {
            Some(LinkEvent::Close) => tui.link_viewer = None,
            Some(LinkEvent::OpenExternal(url)) => open_external(&url),
            None => {}
        }
        return false;
    }

    let effects = match &event {
        TuiEvent::Escape => driver.dispatch(Action::CancelPressed),
        TuiEvent::MouseClick(column, row)
            if tui.cancel_area.contains((*column, *row).into()) =>
        {
            driver.dispatch(Action::CancelPressed)
        }
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.message_list.handle_event(&event);
            Vec::new()
        }
        _ => match driver.screen().mode() {
            TrayMode::PromptShown => match tui.button_tray.handle_event(&event) {
                Some(TrayEvent::Tapped(label)) => driver.dispatch(Action::Tap(label)),
                None => Vec::new(),
            },
            TrayMode::TextPromptShown => match tui.text_prompt.handle_event(&event) {
                Some(TextPromptEvent::Submit(text)) => {
                    let mut effects = driver.dispatch(Action::TextSubmitted(text));
                    effects.extend(driver.dispatch(Action::KeyboardHidden));
                    effects
                }
                Some(TextPromptEvent::Rejected) => {
                    debug!("Character rejected by text field");
                    Vec::new()
                }
                Some(TextPromptEvent::ContentChanged) | None => Vec::new(),
            },
            TrayMode::Idle => Vec::new(),
        },
    };
    handle_effects(driver, tui, effects)
}

/// Lower the keyboard once the text field has left the tray without a
/// submission (replaced by buttons, or the screen was torn down).
fn release_text_focus<S: ChatSequence>(driver: &mut ChatDriver<S>, tui: &mut TuiState) -> bool {
    if !tui.text_prompt.is_focused() || driver.screen().mode() == TrayMode::TextPromptShown {
        return false;
    }
    debug!("Text field left the tray unsubmitted");
    tui.text_prompt.blur();
    let effects = driver.dispatch(Action::KeyboardHidden);
    handle_effects(driver, tui, effects)
}

/// Carry out presentation effects. Returns true when the screen closed.
fn handle_effects<S: ChatSequence>(
    driver: &mut ChatDriver<S>,
    tui: &mut TuiState,
    effects: Vec<Effect>,
) -> bool {
    let mut queue: VecDeque<Effect> = effects.into();
    let mut closed = false;
    while let Some(effect) = queue.pop_front() {
        debug!("Handling effect: {:?}", effect);
        match effect {
            Effect::FocusTextInput(spec) => {
                tui.text_prompt.focus(spec);
                queue.extend(driver.dispatch(Action::KeyboardShown(KEYBOARD_ROWS)));
            }
            Effect::OpenLink { url, embedded } => {
                if embedded {
                    info!("Showing embedded link: {}", url);
                    tui.link_viewer = Some(LinkViewerState::new(url));
                } else {
                    open_external(&url);
                }
            }
            Effect::Close => closed = true,
            other => debug!("Effect not handled by the TUI: {:?}", other),
        }
    }
    closed
}

fn open_external(url: &str) {
    info!("Opening link externally: {}", url);
    if let Err(e) = open::that(url) {
        warn!("Failed to open {}: {}", url, e);
    }
}
