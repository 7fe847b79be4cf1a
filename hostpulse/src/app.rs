//! App state and main loop: input handling, applying agent events, and drawing.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    widgets::Block,
    Terminal,
};
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::state::DisplayState;
use crate::theme::{save_theme, Theme};
use crate::types::ServerEvent;
use crate::ui::{
    cpu::draw_cpu, disks::draw_disks, header::draw_header, mem::draw_mem, net::draw_stats,
    raw::draw_raw, theme::palette,
};
use crate::ws::{Connection, ViewerEvent};

const FRAME_INTERVAL: Duration = Duration::from_millis(50);

pub struct App {
    state: DisplayState,
    show_raw: bool,
    should_quit: bool,
    persist_theme: bool,
}

impl App {
    pub fn new(theme: Theme) -> Self {
        Self {
            state: DisplayState::new(theme),
            show_raw: false,
            should_quit: false,
            persist_theme: true,
        }
    }

    /// Keeps theme toggles in memory only.
    pub fn without_persistence(mut self) -> Self {
        self.persist_theme = false;
        self
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn show_raw(&self) -> bool {
        self.show_raw
    }

    pub fn apply(&mut self, ev: ViewerEvent) {
        match ev {
            ViewerEvent::TransportConnected => {
                info!("socket connected to agent");
                self.state.on_transport_connected();
            }
            ViewerEvent::Server(ServerEvent::Connected(info)) => {
                info!(host = ?info.hostname, "system info received");
                self.state.on_connection_info(info);
            }
            ViewerEvent::Server(ServerEvent::OsUpdate(snap)) => self.state.on_snapshot(*snap),
            ViewerEvent::Server(ServerEvent::Error(e)) => {
                warn!("agent reported: {}", e.message);
                self.state.on_transport_error(e.message);
            }
            ViewerEvent::Disconnected => {
                if self.state.on_disconnect() {
                    info!("disconnected from agent");
                }
            }
            ViewerEvent::TransportError(e) => {
                if self.state.on_transport_error(e.clone()) {
                    warn!("socket error: {e}");
                }
            }
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('t') | KeyCode::Char('T') => {
                let theme = self.state.toggle_theme();
                if self.persist_theme {
                    if let Err(e) = save_theme(theme) {
                        warn!("theme not saved: {e}");
                    }
                }
            }
            KeyCode::Char('r') | KeyCode::Char('R') => self.show_raw = !self.show_raw,
            _ => {}
        }
    }

    pub async fn run(&mut self, url: &str) -> anyhow::Result<()> {
        // Terminal setup
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let (tx, mut rx) = mpsc::unbounded_channel();
        let conn = Connection::new(url);
        info!(url = conn.url(), "connecting to agent");
        let conn = conn.spawn(tx);

        // Main loop
        let res = self.event_loop(&mut terminal, &mut rx).await;
        conn.abort();

        // Teardown
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        res
    }

    async fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        rx: &mut mpsc::UnboundedReceiver<ViewerEvent>,
    ) -> anyhow::Result<()> {
        loop {
            // Input (non-blocking)
            while event::poll(Duration::from_millis(10))? {
                if let Event::Key(k) = event::read()? {
                    if k.kind == KeyEventKind::Press {
                        self.handle_key(k.code);
                    }
                }
            }
            if self.should_quit {
                break;
            }

            while let Ok(ev) = rx.try_recv() {
                self.apply(ev);
            }

            terminal.draw(|f| self.draw(f))?;
            sleep(FRAME_INTERVAL).await;
        }
        Ok(())
    }

    pub fn draw(&self, f: &mut ratatui::Frame<'_>) {
        let area = f.area();
        let p = palette(self.state.theme);
        f.render_widget(Block::default().style(p.base()), area);

        // Root rows: header, cpu, memory, vitals + disks
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Ratio(1, 3),
                Constraint::Length(3),
                Constraint::Min(7),
            ])
            .split(area);

        draw_header(f, rows[0], &self.state, &p);
        draw_cpu(f, rows[1], &self.state, &p);
        draw_mem(f, rows[2], &self.state, &p);

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[3]);
        draw_stats(f, bottom[0], &self.state, &p);
        if self.show_raw {
            draw_raw(f, bottom[1], &self.state, &p);
        } else {
            draw_disks(f, bottom[1], &self.state, &p);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ConnectionStatus;
    use crate::types::{ConnectionInfo, ErrorMessage, Memory, Snapshot};
    use ratatui::backend::TestBackend;

    fn app() -> App {
        App::new(Theme::Light).without_persistence()
    }

    fn update(total: f64, available: f64) -> ViewerEvent {
        ViewerEvent::Server(ServerEvent::OsUpdate(Box::new(Snapshot {
            memory: Some(Memory {
                total,
                available: Some(available),
                ..Default::default()
            }),
            ..Default::default()
        })))
    }

    #[test]
    fn lifecycle_connecting_connected_disconnected() {
        let mut a = app();
        assert_eq!(a.state().status, ConnectionStatus::Connecting);
        a.apply(ViewerEvent::TransportConnected);
        assert_eq!(a.state().status, ConnectionStatus::Connected);
        a.apply(ViewerEvent::Disconnected);
        a.apply(ViewerEvent::Disconnected);
        assert_eq!(a.state().status, ConnectionStatus::Disconnected);
        a.apply(ViewerEvent::Server(ServerEvent::Connected(ConnectionInfo::default())));
        assert_eq!(a.state().status, ConnectionStatus::Connected);
        a.apply(ViewerEvent::TransportError("refused".into()));
        assert_eq!(a.state().status, ConnectionStatus::Disconnected);
    }

    #[test]
    fn agent_error_event_disconnects_but_keeps_display() {
        let mut a = app();
        a.apply(ViewerEvent::TransportConnected);
        a.apply(update(2048.0 * 1024.0 * 1024.0, 1024.0 * 1024.0 * 1024.0));
        let before = a.state().memory_ratio;
        a.apply(ViewerEvent::Server(ServerEvent::Error(ErrorMessage {
            message: "Failed to get system information".into(),
        })));
        assert_eq!(a.state().status, ConnectionStatus::Disconnected);
        assert_eq!(a.state().memory_ratio, before);
        assert_eq!(
            a.state().last_error.as_deref(),
            Some("Failed to get system information")
        );
    }

    #[test]
    fn keys_toggle_theme_raw_and_quit() {
        let mut a = app();
        a.handle_key(KeyCode::Char('t'));
        assert_eq!(a.state().theme, Theme::Dark);
        a.handle_key(KeyCode::Char('r'));
        assert!(a.show_raw());
        assert!(!a.should_quit());
        a.handle_key(KeyCode::Esc);
        assert!(a.should_quit());
    }

    #[test]
    fn draws_without_data_and_with_data() {
        let mut a = app();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| a.draw(f)).unwrap();

        a.apply(update(4096.0 * 1024.0 * 1024.0, 1024.0 * 1024.0 * 1024.0));
        a.handle_key(KeyCode::Char('r'));
        terminal.draw(|f| a.draw(f)).unwrap();
        let buf = terminal.backend().buffer();
        let text: String = buf.content.iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Used: 3072.0 MB"), "memory label missing");
    }
}
