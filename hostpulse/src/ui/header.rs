//! Top header with connection status and host identity.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::format::{uptime_display, PLACEHOLDER};
use crate::state::{ConnectionStatus, DisplayState};
use crate::ui::theme::Palette;

pub fn draw_header(f: &mut ratatui::Frame<'_>, area: Rect, s: &DisplayState, p: &Palette) {
    let status_color = match s.status {
        ConnectionStatus::Connected => p.accent,
        ConnectionStatus::Connecting => p.muted,
        ConnectionStatus::Disconnected => p.danger,
    };
    let host = s.hostname().unwrap_or(PLACEHOLDER);
    let updated = s
        .last_updated
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| PLACEHOLDER.into());

    let mut spans = vec![
        Span::styled(format!("● {} ", s.status.label()), Style::default().fg(status_color)),
        Span::styled(
            format!(
                "| host: {host} | {} × {} cpu | up {} | updated {updated}",
                if s.cpu_type.is_empty() { PLACEHOLDER } else { s.cpu_type.as_str() },
                s.cpu_count,
                uptime_display(s.uptime()),
            ),
            p.base(),
        ),
    ];
    if let Some(err) = s.last_error.as_deref() {
        spans.push(Span::styled(format!(" | {err}"), Style::default().fg(p.danger)));
    }

    let title = "hostpulse · q quit · t theme · r raw";
    let para = Paragraph::new(Line::from(spans))
        .style(p.base())
        .block(Block::default().borders(Borders::BOTTOM).title(title).style(p.muted()));
    f.render_widget(para, area);
}
