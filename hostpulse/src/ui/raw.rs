//! Raw payload pane for inspecting the last events as received.

use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::state::DisplayState;
use crate::ui::theme::Palette;

pub fn draw_raw(f: &mut ratatui::Frame<'_>, area: Rect, s: &DisplayState, p: &Palette) {
    let mut text = String::new();
    match &s.last_connection_info {
        Some(info) => text.push_str(&format!("connected: {info:#?}\n")),
        None => text.push_str("connected: —\n"),
    }
    match &s.last_snapshot {
        Some(snap) => text.push_str(&format!("os-update: {snap:#?}")),
        None => text.push_str("os-update: —"),
    }
    let para = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .style(p.base())
        .block(Block::default().borders(Borders::ALL).title("Raw data").style(p.base()));
    f.render_widget(para, area);
}
