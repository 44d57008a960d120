//! # TUI Components
//!
//! This module contains all UI components for the chat screen.
//!
//! ## Component Architecture
//!
//! Components in this directory follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Simple display components that receive all data as parameters:
//! - `Header`: Title plus the cancel affordance
//! - `ChatRow`: A single conversation bubble
//! - `KeyHints`: The keyboard strip below the tray
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that manage local state and emit events:
//! - `MessageList`: Scrollable conversation view with layout caching
//! - `ButtonTray`: Prompt buttons with focus and click targets
//! - `TextPrompt`: Single-line field filtered by keyboard kind
//! - `LinkViewer`: Overlay for embedded links
//!
//! Stateful components keep their state in a struct owned by `TuiState` and
//! are wrapped each frame by a transient render type borrowing that state
//! together with its props.
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── header.rs        (Title + cancel)
//! ├── message.rs       (Single bubble renderer)
//! ├── message_list.rs  (Scrollable conversation)
//! ├── button_tray.rs   (Prompt buttons)
//! ├── text_prompt.rs   (Text field)
//! ├── key_hints.rs     (Keyboard strip)
//! └── link_viewer.rs   (Embedded link overlay)
//! ```

pub mod button_tray;
pub mod header;
pub mod key_hints;
pub mod link_viewer;
pub mod message;
pub mod message_list;
pub mod text_prompt;

pub use button_tray::{ButtonTray, ButtonTrayState, TrayEvent};
pub use header::Header;
pub use key_hints::{KEYBOARD_ROWS, KeyHints};
pub use link_viewer::{LinkEvent, LinkViewer, LinkViewerState};
pub use message_list::{MessageList, MessageListState};
pub use text_prompt::{TextPrompt, TextPromptEvent, TextPromptView};
