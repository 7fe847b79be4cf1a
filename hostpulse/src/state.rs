//! Per-viewer display state: the last payloads received and everything
//! derived from them for rendering. Owned by exactly one viewer.

use chrono::{DateTime, Local};

use crate::format::{mb, round1};
use crate::history::TrailingWindow;
use crate::theme::Theme;
use crate::types::{ConnectionInfo, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Disconnected,
}

impl ConnectionStatus {
    pub fn label(self) -> &'static str {
        match self {
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Disconnected => "disconnected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemorySlice {
    pub label: &'static str,
    pub mb: f64,
}

/// Available/used split in MB. Always exactly two slices; replaced wholesale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryRatio(pub [MemorySlice; 2]);

impl MemoryRatio {
    pub fn new(available_mb: f64, used_mb: f64) -> Self {
        MemoryRatio([
            MemorySlice {
                label: "Available",
                mb: available_mb,
            },
            MemorySlice {
                label: "Used",
                mb: used_mb,
            },
        ])
    }

    pub fn available(&self) -> f64 {
        self.0[0].mb
    }

    pub fn used(&self) -> f64 {
        self.0[1].mb
    }

    pub fn total(&self) -> f64 {
        self.available() + self.used()
    }

    /// Share of the used slice, 0..=1.
    pub fn used_fraction(&self) -> f64 {
        let total = self.total();
        if total > 0.0 {
            (self.used() / total).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

impl Default for MemoryRatio {
    // before any data: everything "available"
    fn default() -> Self {
        MemoryRatio::new(1.0, 0.0)
    }
}

#[derive(Debug, Clone)]
pub struct DisplayState {
    pub status: ConnectionStatus,
    pub theme: Theme,
    pub last_snapshot: Option<Snapshot>,
    pub last_connection_info: Option<ConnectionInfo>,
    pub last_error: Option<String>,

    // from ConnectionInfo
    pub cpu_type: String,
    pub cpu_count: u64,

    // from the latest Snapshot
    pub cpu_usage: f64,
    pub memory_available_mb: f64,
    pub temperature: f64,
    pub network_rx_kb: f64,
    pub network_tx_kb: f64,
    pub last_updated: Option<DateTime<Local>>,

    pub memory_ratio: MemoryRatio,
    pub cpu_window: TrailingWindow,
}

impl DisplayState {
    pub fn new(theme: Theme) -> Self {
        Self {
            status: ConnectionStatus::Connecting,
            theme,
            last_snapshot: None,
            last_connection_info: None,
            last_error: None,
            cpu_type: String::new(),
            cpu_count: 0,
            cpu_usage: 0.0,
            memory_available_mb: 0.0,
            temperature: 0.0,
            network_rx_kb: 0.0,
            network_tx_kb: 0.0,
            last_updated: None,
            memory_ratio: MemoryRatio::default(),
            cpu_window: TrailingWindow::default(),
        }
    }

    pub fn on_transport_connected(&mut self) {
        self.status = ConnectionStatus::Connected;
    }

    /// Returns true only when this call moved the status to Disconnected.
    pub fn on_disconnect(&mut self) -> bool {
        if self.status == ConnectionStatus::Disconnected {
            return false;
        }
        self.status = ConnectionStatus::Disconnected;
        true
    }

    pub fn on_transport_error(&mut self, message: impl Into<String>) -> bool {
        self.last_error = Some(message.into());
        self.on_disconnect()
    }

    pub fn on_connection_info(&mut self, info: ConnectionInfo) {
        self.status = ConnectionStatus::Connected;
        self.cpu_type = info
            .platform
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Unknown".into());
        self.cpu_count = info.cpus.unwrap_or(0);
        self.last_connection_info = Some(info);
    }

    pub fn on_snapshot(&mut self, snap: Snapshot) {
        self.on_snapshot_at(snap, Local::now());
    }

    /// Applies a snapshot received at `now` (wall clock of receipt).
    pub fn on_snapshot_at(&mut self, snap: Snapshot, now: DateTime<Local>) {
        let mem = snap.memory.clone().unwrap_or_default();
        let usable = mem.usable().unwrap_or(0.0);
        self.memory_ratio = MemoryRatio::new(mb(usable), mb(mem.total - usable));

        let cpu = cpu_usage_of(&snap);
        self.cpu_usage = round1(cpu);
        self.cpu_window.push(cpu);

        self.temperature = snap.temperature.filter(|t| t.is_finite()).unwrap_or(0.0);
        self.memory_available_mb = mb(usable);

        let net = snap.network.clone().unwrap_or_default();
        let rx = net.rx_sec.or(net.rx_bytes).unwrap_or(0.0) / 1024.0;
        let tx = net.tx_sec.or(net.tx_bytes).unwrap_or(0.0) / 1024.0;
        self.network_rx_kb = round1(rx);
        self.network_tx_kb = round1(tx);

        self.last_updated = Some(now);
        self.last_snapshot = Some(snap);
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    pub fn hostname(&self) -> Option<&str> {
        self.last_connection_info
            .as_ref()
            .and_then(|i| i.hostname.as_deref())
            .or_else(|| {
                self.last_snapshot
                    .as_ref()
                    .and_then(|s| s.os.as_ref())
                    .and_then(|o| o.hostname.as_deref())
            })
    }

    pub fn uptime(&self) -> Option<u64> {
        self.last_snapshot
            .as_ref()
            .and_then(|s| s.uptime)
            .or_else(|| self.last_connection_info.as_ref().and_then(|i| i.uptime))
    }
}

/// Aggregate load when it is non-zero, else the 15-minute load average, else 0.
pub fn cpu_usage_of(snap: &Snapshot) -> f64 {
    let nonzero = |v: &f64| *v != 0.0 && v.is_finite();
    snap.cpu
        .as_ref()
        .and_then(|c| c.usage)
        .filter(nonzero)
        .or_else(|| {
            snap.loadavg
                .as_ref()
                .and_then(|l| l.get(2).copied())
                .filter(nonzero)
        })
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cpu, Memory, Network};

    const MIB: f64 = 1024.0 * 1024.0;

    fn snap(usage: Option<f64>) -> Snapshot {
        Snapshot {
            cpu: Some(Cpu {
                usage,
                ..Default::default()
            }),
            memory: Some(Memory {
                total: 8_000.0 * MIB,
                available: Some(3_000.0 * MIB),
                free: Some(500.0 * MIB),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn starts_connecting_with_placeholder_ratio() {
        let s = DisplayState::new(Theme::Light);
        assert_eq!(s.status, ConnectionStatus::Connecting);
        assert_eq!(s.memory_ratio.available(), 1.0);
        assert_eq!(s.memory_ratio.used(), 0.0);
        assert!(s.cpu_window.is_empty());
    }

    #[test]
    fn snapshot_replaces_memory_ratio() {
        let mut s = DisplayState::new(Theme::Light);
        s.on_snapshot(snap(Some(12.34)));
        assert_eq!(s.memory_ratio.0.len(), 2);
        assert_eq!(s.memory_ratio.available(), 3_000.0);
        assert_eq!(s.memory_ratio.used(), 5_000.0);
        assert!((s.memory_ratio.total() - 8_000.0).abs() < 0.2);
        assert_eq!(s.memory_available_mb, 3_000.0);
        assert_eq!(s.cpu_usage, 12.3);
        assert!(s.last_updated.is_some());
    }

    #[test]
    fn memory_falls_back_to_free() {
        let mut s = DisplayState::new(Theme::Light);
        let mut sn = snap(Some(1.0));
        if let Some(m) = sn.memory.as_mut() {
            m.available = None;
        }
        s.on_snapshot(sn);
        assert_eq!(s.memory_ratio.available(), 500.0);
        assert_eq!(s.memory_ratio.used(), 7_500.0);
    }

    #[test]
    fn ratio_rounds_each_slice_to_one_decimal() {
        let mut s = DisplayState::new(Theme::Light);
        s.on_snapshot(Snapshot {
            memory: Some(Memory {
                total: 10.0 * MIB,
                available: Some(3.33333 * MIB),
                ..Default::default()
            }),
            ..Default::default()
        });
        assert_eq!(s.memory_ratio.available(), 3.3);
        assert_eq!(s.memory_ratio.used(), 6.7);
        assert!((s.memory_ratio.total() - 10.0).abs() < 0.1 + 1e-9);
    }

    #[test]
    fn cpu_window_keeps_last_ten_raw_values() {
        let mut s = DisplayState::new(Theme::Light);
        for i in 1..=11 {
            s.on_snapshot(snap(Some(i as f64 + 0.25)));
        }
        let got: Vec<f64> = s.cpu_window.values().collect();
        let want: Vec<f64> = (2..=11).map(|i| i as f64 + 0.25).collect();
        assert_eq!(got, want);
    }

    #[test]
    fn cpu_usage_falls_back_to_fifteen_minute_load() {
        let mut sn = snap(None);
        sn.loadavg = Some(vec![0.5, 1.5, 2.5]);
        assert_eq!(cpu_usage_of(&sn), 2.5);

        // a zero aggregate reading counts as absent
        sn.cpu = Some(Cpu {
            usage: Some(0.0),
            ..Default::default()
        });
        assert_eq!(cpu_usage_of(&sn), 2.5);

        sn.loadavg = None;
        assert_eq!(cpu_usage_of(&sn), 0.0);
    }

    #[test]
    fn network_prefers_rate_then_counter() {
        let mut s = DisplayState::new(Theme::Light);
        let mut sn = snap(Some(1.0));
        sn.network = Some(Network {
            rx_sec: Some(2048.0),
            rx_bytes: Some(1_000_000.0),
            tx_bytes: Some(5120.0),
            ..Default::default()
        });
        s.on_snapshot(sn);
        assert_eq!(s.network_rx_kb, 2.0);
        assert_eq!(s.network_tx_kb, 5.0);
    }

    #[test]
    fn empty_snapshot_reads_zeros() {
        let mut s = DisplayState::new(Theme::Dark);
        s.on_snapshot(Snapshot::default());
        assert_eq!(s.memory_ratio.available(), 0.0);
        assert_eq!(s.memory_ratio.used(), 0.0);
        assert_eq!(s.temperature, 0.0);
        assert_eq!(s.cpu_window.values().collect::<Vec<_>>(), vec![0.0]);
    }

    #[test]
    fn connection_info_sets_identity_and_status() {
        let mut s = DisplayState::new(Theme::Light);
        s.on_connection_info(ConnectionInfo {
            platform: Some("linux".into()),
            cpus: Some(8),
            hostname: Some("box".into()),
            ..Default::default()
        });
        assert_eq!(s.status, ConnectionStatus::Connected);
        assert_eq!(s.cpu_type, "linux");
        assert_eq!(s.cpu_count, 8);
        assert_eq!(s.hostname(), Some("box"));

        s.on_connection_info(ConnectionInfo::default());
        assert_eq!(s.cpu_type, "Unknown");
        assert_eq!(s.cpu_count, 0);
        assert_eq!(s.hostname(), None);
    }

    #[test]
    fn disconnect_transitions_once() {
        let mut s = DisplayState::new(Theme::Light);
        s.on_transport_connected();
        assert!(s.on_disconnect());
        assert!(!s.on_disconnect());
        assert_eq!(s.status, ConnectionStatus::Disconnected);

        s.on_transport_connected();
        assert!(s.on_transport_error("reset"));
        assert!(!s.on_disconnect());
        assert_eq!(s.last_error.as_deref(), Some("reset"));
    }

    #[test]
    fn disconnect_keeps_last_display_values() {
        let mut s = DisplayState::new(Theme::Light);
        s.on_snapshot(snap(Some(40.0)));
        let before = s.memory_ratio;
        s.on_disconnect();
        assert_eq!(s.memory_ratio, before);
        assert_eq!(s.cpu_usage, 40.0);
    }

    #[test]
    fn last_updated_is_receipt_time() {
        let mut s = DisplayState::new(Theme::Light);
        let mut sn = snap(Some(1.0));
        sn.timestamp = Some(0);
        let now = Local::now();
        s.on_snapshot_at(sn, now);
        assert_eq!(s.last_updated, Some(now));
    }
}
