//! # Message List Model
//!
//! The append-only conversation backing the visible row list.
//!
//! ```text
//! MessageLog
//! ├── messages: Vec<Message>        // display order, never reordered
//! └── animated_rows: HashSet<usize> // rows whose entrance already played
//! ```
//!
//! Rows are identified by position. Because nothing is ever removed, a row
//! index stays valid for the screen's lifetime, and so does its marker.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Who authored a message. Controls row alignment and styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    App,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub origin: Origin,
}

/// Everything a row renderer needs for one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSpec<'a> {
    pub index: usize,
    pub message: &'a Message,
    /// True only the first time this row index is rendered.
    pub animate_entrance: bool,
    /// Blank rows above the bubble. Zero when grouped with the previous row.
    pub leading_margin: u16,
}

#[derive(Debug, Default)]
pub struct MessageLog {
    messages: Vec<Message>,
    animated_rows: HashSet<usize>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and return its row index.
    pub fn append(&mut self, text: impl Into<String>, origin: Origin) -> usize {
        self.messages.push(Message {
            text: text.into(),
            origin,
        });
        self.messages.len() - 1
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    /// True when the row directly above `index` has the same origin.
    pub fn is_grouped_with_previous(&self, index: usize) -> bool {
        let Some(current) = self.messages.get(index) else {
            return false;
        };
        index
            .checked_sub(1)
            .and_then(|prev| self.messages.get(prev))
            .is_some_and(|prev| prev.origin == current.origin)
    }

    /// Leading margin for a row without touching the animation markers.
    /// Used by layout passes that only need heights.
    pub fn leading_margin(&self, index: usize, default_margin: u16) -> u16 {
        if self.is_grouped_with_previous(index) {
            0
        } else {
            default_margin
        }
    }

    /// Produce the row for `index`, marking it as shown.
    ///
    /// The first call for a given index reports `animate_entrance = true`;
    /// every later call (scrolling back, relayout after resize) reports false.
    pub fn render_row(&mut self, index: usize, default_margin: u16) -> Option<RowSpec<'_>> {
        if index >= self.messages.len() {
            return None;
        }
        let animate_entrance = self.animated_rows.insert(index);
        let leading_margin = self.leading_margin(index, default_margin);
        Some(RowSpec {
            index,
            message: &self.messages[index],
            animate_entrance,
            leading_margin,
        })
    }

    pub fn was_rendered(&self, index: usize) -> bool {
        self.animated_rows.contains(&index)
    }
}
