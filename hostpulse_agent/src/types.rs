//! Data types sent to viewers over WebSocket.
//! Keep this module minimal and stable; it defines the wire format.

use serde::Serialize;

#[derive(Debug, Serialize, Clone, PartialEq, Default)]
pub struct CpuSpeed {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CpuLoad {
    pub usage: f32,
    pub cores: Vec<f32>,
    pub brand: String,
    pub speed: CpuSpeed,
}

/// Memory totals in bytes. Only constructible through [`MemoryUsage::from_totals`],
/// which keeps `used == total - available`.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct MemoryUsage {
    total: u64,
    // mirrors `available` so "free" reads as usable memory for viewers
    free: u64,
    available: u64,
    used: u64,
    usage: f64,
    swaptotal: u64,
    swapused: u64,
    swapfree: u64,
}

impl MemoryUsage {
    /// `available` wins over raw `free` whenever the host reports it.
    /// Readings above `total` are clamped to it.
    pub fn from_totals(total: u64, available: Option<u64>, free: u64) -> Self {
        let available = available.unwrap_or(free).min(total);
        let used = total.saturating_sub(available);
        let usage = if total > 0 {
            used as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        Self {
            total,
            free: available,
            available,
            used,
            usage,
            swaptotal: 0,
            swapused: 0,
            swapfree: 0,
        }
    }

    pub fn with_swap(mut self, total: u64, used: u64) -> Self {
        self.swaptotal = total;
        self.swapused = used.min(total);
        self.swapfree = total.saturating_sub(used);
        self
    }

    pub fn total(&self) -> u64 {
        self.total
    }
    pub fn available(&self) -> u64 {
        self.available
    }
    pub fn used(&self) -> u64 {
        self.used
    }
    pub fn usage(&self) -> f64 {
        self.usage
    }
}

#[derive(Debug, Serialize, Clone, PartialEq, Default)]
pub struct NetworkStats {
    pub iface: String,
    // cumulative totals since the interface came up
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    // bytes per second over the last sampling period
    pub rx_sec: f64,
    pub tx_sec: f64,
}

/// Addresses and hardware id of one interface.
#[derive(Debug, Serialize, Clone, PartialEq, Default)]
pub struct NetworkInterface {
    pub iface: String,
    pub mac: String,
    pub ip4: Vec<String>,
    pub ip6: Vec<String>,
    pub internal: bool,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct DiskDevice {
    pub device: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub size: u64,
    pub removable: bool,
}

#[derive(Debug, Serialize, Clone, PartialEq, Default)]
pub struct CpuInfo {
    pub manufacturer: String,
    pub brand: String,
    // GHz
    pub speed: f64,
    pub cores: usize,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct FsEntry {
    pub fs: String,
    pub mount: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub size: u64,
    pub used: u64,
    pub available: u64,
    #[serde(rename = "use")]
    pub use_pct: f64,
}

#[derive(Debug, Serialize, Clone, PartialEq, Default)]
pub struct ProcessCounts {
    pub all: usize,
    pub running: usize,
    pub blocked: usize,
    pub sleeping: usize,
}

#[derive(Debug, Serialize, Clone, PartialEq, Default)]
pub struct OsInfo {
    pub platform: String,
    pub distro: String,
    pub release: String,
    pub kernel: String,
    pub arch: String,
    pub hostname: String,
}

/// One sampling tick. Broadcast unmodified to every viewer as `os-update`.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub cpu: CpuLoad,
    pub memory: MemoryUsage,
    pub temperature: f32,
    pub temperature_cores: Vec<f32>,
    pub temperature_max: f32,
    pub temperature_socket: Vec<f32>,
    pub temperature_chipset: Vec<f32>,
    pub network: NetworkStats,
    pub network_stats: Vec<NetworkStats>,
    pub network_interfaces: Vec<NetworkInterface>,
    pub fs: Vec<FsEntry>,
    pub disk_layout: Vec<DiskDevice>,
    pub processes: ProcessCounts,
    pub users: Vec<String>,
    pub loadavg: [f64; 3],
    pub uptime: u64,
    pub os: OsInfo,
    pub cpu_speed: CpuSpeed,
    pub cpu_info: CpuInfo,
    pub timestamp: i64,
}

/// Sent once to a newly connected viewer as `connected`.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInfo {
    pub status: &'static str,
    #[serde(rename = "type")]
    pub platform: String,
    pub cpus: usize,
    pub total_memory: u64,
    pub available_memory: u64,
    pub hostname: String,
    pub os_info: OsInfo,
    pub uptime: u64,
    pub current_load: f32,
    pub timestamp: i64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ErrorMessage {
    pub message: String,
}

/// Server→viewer envelope: one JSON text frame per event.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    #[serde(rename = "connected")]
    Connected(ConnectionInfo),
    #[serde(rename = "os-update")]
    OsUpdate(Box<Snapshot>),
    #[serde(rename = "error")]
    Error(ErrorMessage),
}

impl ServerEvent {
    pub fn error(message: impl Into<String>) -> Self {
        ServerEvent::Error(ErrorMessage {
            message: message.into(),
        })
    }
}
