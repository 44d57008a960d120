use ratatui::Frame;
use ratatui::layout::Rect;

use crate::tui::event::TuiEvent;

/// Something drawn into a region of the chat screen.
///
/// Components get their data as props (struct fields), usually borrowed from
/// `ChatScreen` for domain data and from `TuiState` for presentation state,
/// and render into the `Rect` they are given.
///
/// `render` takes `&mut self` so a component can update the state it borrows
/// while drawing: the message list caches row heights and advances its
/// scroll animation, the button tray records click targets. This mirrors
/// Ratatui's `StatefulWidget`.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// Persistent component state that reacts to terminal input.
///
/// Implemented on the state struct rather than the per-frame wrapper, since
/// the wrapper does not outlive a frame.
pub trait EventHandler {
    /// High-level event emitted for the TUI loop to act on.
    type Event;

    /// Handle a low-level `TuiEvent`, returning a high-level event if one results.
    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}
