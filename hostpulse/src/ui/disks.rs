//! Per-mount cards with a usage gauge.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Gauge},
};

use crate::format::{format_bytes, truncate_middle};
use crate::state::DisplayState;
use crate::ui::theme::Palette;

pub fn draw_disks(f: &mut ratatui::Frame<'_>, area: Rect, s: &DisplayState, p: &Palette) {
    f.render_widget(
        Block::default().borders(Borders::ALL).title("Filesystems").style(p.base()),
        area,
    );
    let Some(entries) = s.last_snapshot.as_ref().and_then(|m| m.fs.as_deref()) else {
        return;
    };

    let inner = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    };
    if inner.height == 0 {
        return;
    }

    let show_n = (inner.height as usize).min(entries.len());
    let constraints: Vec<Constraint> = (0..show_n).map(|_| Constraint::Length(1)).collect();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (slot, d) in rows.iter().zip(entries) {
        let ratio = if d.size > 0.0 {
            (d.used / d.size).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let color = if ratio < 0.9 { p.accent } else { p.danger };
        let label = format!(
            "{}  {} / {}  ({:.0}%)",
            truncate_middle(&d.mount, (slot.width / 3) as usize),
            format_bytes(d.used.max(0.0) as u64, 1),
            format_bytes(d.size.max(0.0) as u64, 1),
            ratio * 100.0
        );
        let g = Gauge::default()
            .ratio(ratio)
            .label(label)
            .gauge_style(Style::default().fg(color).bg(p.bg));
        f.render_widget(g, *slot);
    }
}
