//! # Core Chat Logic
//!
//! This module contains Banter's conversation choreography.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • ChatScreen (state)   │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • Timeline (delays)    │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │ ChatDriver │      │  Sequence  │
//!     │  Adapter   │ ◀──▶ │  (glue)    │ ◀──▶ │ (scripted) │
//!     │ (ratatui)  │      │            │      │            │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: `ChatScreen`, everything the screen knows in one place
//! - [`action`]: `Action`, `Effect` and the `update()` reducer
//! - [`timeline`]: named delayed phases and the spring curve
//! - [`message`]: the append-only message log
//! - [`prompt`]: prompt variants and tap resolution
//! - [`tray`]: the button tray and its reveal/hide motion
//! - [`sequence`]: the `ChatSequence` trait and its `SequenceHandle`
//! - [`driver`]: routes effects between the reducer and the sequence
//! - [`script`]: a TOML-driven `ChatSequence`
//! - [`config`]: `~/.banter/config.toml` loading and resolution

pub mod action;
pub mod config;
pub mod driver;
pub mod message;
pub mod prompt;
pub mod script;
pub mod sequence;
pub mod state;
pub mod theme;
pub mod timeline;
pub mod tray;
