use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::Block;

use crate::core::state::ChatScreen;
use crate::core::tray::TrayMode;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{
    ButtonTray, Header, KeyHints, LinkViewer, MessageList, TextPromptView,
};

/// Screen regions for one frame, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenAreas {
    pub header: Rect,
    pub chat: Rect,
    pub tray: Rect,
    /// Keyboard strip, or the tray's resting bottom margin.
    pub inset: Rect,
}

/// Split `area` for a screen whose tray is `tray_height` rows tall and sits
/// `inset` rows above the bottom.
pub fn screen_areas(area: Rect, fullscreen: bool, tray_height: u16, inset: u16) -> ScreenAreas {
    use Constraint::{Length, Min};
    let top_margin = u16::from(!fullscreen);
    let [_, header, chat, tray, inset] = Layout::vertical([
        Length(top_margin),
        Length(1),
        Min(0),
        Length(tray_height),
        Length(inset),
    ])
    .areas(area);
    ScreenAreas {
        header,
        chat,
        tray,
        inset,
    }
}

pub fn draw_ui(frame: &mut Frame, screen: &mut ChatScreen, tui: &mut TuiState, now: Duration) {
    let areas = screen_areas(
        frame.area(),
        screen.metrics.fullscreen,
        screen.tray_height(now),
        screen.keyboard.current(now),
    );
    tui.cancel_area = Header::cancel_area(areas.header);

    frame.render_widget(
        Block::default().style(Style::default().bg(tui.palette.background)),
        frame.area(),
    );
    frame.render_widget(
        Block::default().style(Style::default().bg(tui.palette.chat_background)),
        areas.chat,
    );

    // Message list first: it decides whether there is unseen content.
    let request = screen.scroll.take();
    MessageList::new(
        &mut tui.message_list,
        &mut screen.log,
        &tui.palette,
        screen.metrics.row_spacing,
        now,
        screen.timing.row_fade,
    )
    .with_request(request)
    .render(frame, areas.chat);

    let mut header = Header::new(
        tui.title.as_str(),
        screen.cancel.opacity(now, screen.timing.cancel_fade),
        tui.palette.cancel_tint,
    );
    header.has_unseen_content = tui.message_list.has_unseen_content;
    header.render(frame, areas.header);

    let interactive = screen.tray.accepting_input;
    match screen.mode() {
        TrayMode::PromptShown => {
            let buttons = screen.tray.buttons();
            tui.button_tray.sync(screen.tray.generation, buttons);
            ButtonTray::new(&mut tui.button_tray, buttons, &tui.palette, interactive)
                .render(frame, areas.tray);
        }
        TrayMode::TextPromptShown => {
            tui.button_tray.clear();
            TextPromptView::new(&mut tui.text_prompt, &tui.palette, interactive)
                .render(frame, areas.tray);
        }
        TrayMode::Idle => tui.button_tray.clear(),
    }

    let keyboard = screen
        .keyboard
        .visible
        .then(|| screen.tray.text_input().map(|spec| spec.keyboard.label()))
        .flatten();
    KeyHints::new(screen.mode(), keyboard, screen.cancel.visible).render(frame, areas.inset);

    if let Some(link) = &tui.link_viewer {
        LinkViewer::new(link).render(frame, frame.area());
    }
}
