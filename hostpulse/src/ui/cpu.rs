//! CPU usage sparkline over the trailing window, plus per-core and load figures.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Borders, Paragraph, Sparkline, Wrap},
};

use crate::format::{cpu_cores_display, load_avg_display};
use crate::state::DisplayState;
use crate::ui::theme::Palette;

pub fn draw_cpu(f: &mut ratatui::Frame<'_>, area: Rect, s: &DisplayState, p: &Palette) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let bars = s.cpu_window.as_bars();
    let spark = Sparkline::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("CPU Usage (now: {:>5.1}%)", s.cpu_usage))
                .style(p.base()),
        )
        .data(&bars)
        .max(100)
        .style(Style::default().fg(p.accent).bg(p.bg));
    f.render_widget(spark, cols[0]);

    let snap = s.last_snapshot.as_ref();
    let cores = snap
        .and_then(|m| m.cpu.as_ref())
        .and_then(|c| c.cores.as_deref());
    let load = snap.and_then(|m| m.loadavg.as_deref());
    let brand = snap
        .and_then(|m| m.cpu.as_ref())
        .and_then(|c| c.brand.clone())
        .unwrap_or_default();

    let lines = vec![
        Line::from(brand),
        Line::from(format!("load: {}", load_avg_display(load))),
        Line::from(format!("cores: {}", cpu_cores_display(cores))),
    ];
    let para = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .style(p.base())
        .block(Block::default().borders(Borders::ALL).title("Cores").style(p.base()));
    f.render_widget(para, cols[1]);
}
