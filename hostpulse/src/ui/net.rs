//! Scalar readouts: temperature, network rates, disk usage, process counts.

use ratatui::{
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

use crate::format::{disk_usage, PLACEHOLDER};
use crate::state::DisplayState;
use crate::ui::theme::Palette;

pub fn draw_stats(f: &mut ratatui::Frame<'_>, area: Rect, s: &DisplayState, p: &Palette) {
    let snap = s.last_snapshot.as_ref();
    let disk_pct = snap
        .and_then(|m| m.fs.as_deref())
        .map(disk_usage)
        .unwrap_or(0);
    let procs = snap.and_then(|m| m.processes.clone()).unwrap_or_default();
    let n = |v: Option<u64>| v.map(|x| x.to_string()).unwrap_or_else(|| PLACEHOLDER.into());

    let lines = vec![
        Line::from(format!("Temperature: {:.1}°C", s.temperature)),
        Line::from(format!("Memory available: {:.1} MB", s.memory_available_mb)),
        Line::from(format!(
            "Network: ↓ {:.1} KB/s  ↑ {:.1} KB/s",
            s.network_rx_kb, s.network_tx_kb
        )),
        Line::from(format!("Disk usage: {disk_pct}%")),
        Line::from(format!(
            "Processes: {} total, {} running, {} sleeping, {} blocked",
            n(procs.all),
            n(procs.running),
            n(procs.sleeping),
            n(procs.blocked)
        )),
    ];
    let para = Paragraph::new(lines)
        .style(p.base())
        .block(Block::default().borders(Borders::ALL).title("Vitals").style(p.base()));
    f.render_widget(para, area);
}
