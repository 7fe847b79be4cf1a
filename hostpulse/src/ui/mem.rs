//! Memory split gauge (available vs used, MB).

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Gauge},
};

use crate::state::DisplayState;
use crate::ui::theme::Palette;

pub fn draw_mem(f: &mut ratatui::Frame<'_>, area: Rect, s: &DisplayState, p: &Palette) {
    let ratio = &s.memory_ratio;
    let label = ratio
        .0
        .iter()
        .map(|slice| format!("{}: {:.1} MB", slice.label, slice.mb))
        .collect::<Vec<_>>()
        .join("  |  ");

    let g = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Memory").style(p.base()))
        .gauge_style(Style::default().fg(p.danger).bg(p.accent))
        .ratio(ratio.used_fraction())
        .label(label);
    f.render_widget(g, area);
}
