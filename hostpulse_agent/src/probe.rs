//! Host metrics collection using sysinfo for hostpulse_agent.

use std::collections::BTreeMap;
use std::net::IpAddr;
use std::time::Instant;

use sysinfo::{
    Components, DiskKind, Disks, Networks, ProcessRefreshKind, ProcessStatus, ProcessesToUpdate,
    System, Users,
};
use thiserror::Error;

use crate::types::{
    ConnectionInfo, CpuInfo, CpuLoad, CpuSpeed, DiskDevice, FsEntry, MemoryUsage,
    NetworkInterface, NetworkStats, OsInfo, ProcessCounts, Snapshot,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProbeError {
    #[error("host reported no CPUs")]
    NoCpus,
    #[error("host memory totals unavailable")]
    MemoryUnavailable,
}

/// Point-in-time readings of the host. `snapshot` is the full periodic read,
/// `connection_info` the narrower one sent to each new viewer.
pub trait HostProbe: Send + 'static {
    fn snapshot(&mut self) -> Result<Snapshot, ProbeError>;
    fn connection_info(&mut self) -> Result<ConnectionInfo, ProbeError>;
}

pub struct SysinfoProbe {
    // Persistent sysinfo handles so CPU and network deltas have a baseline
    sys: System,
    networks: Networks,
    disks: Disks,
    components: Components,
    users: Users,
    last_net_refresh: Instant,
}

impl SysinfoProbe {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu_all();
        sys.refresh_memory();
        Self {
            sys,
            networks: Networks::new_with_refreshed_list(),
            disks: Disks::new_with_refreshed_list(),
            components: Components::new_with_refreshed_list(),
            users: Users::new_with_refreshed_list(),
            last_net_refresh: Instant::now(),
        }
    }

    fn check_host(&self) -> Result<(), ProbeError> {
        if self.sys.cpus().is_empty() {
            return Err(ProbeError::NoCpus);
        }
        if self.sys.total_memory() == 0 {
            return Err(ProbeError::MemoryUnavailable);
        }
        Ok(())
    }

    fn memory(&self) -> MemoryUsage {
        // sysinfo reports 0 available on platforms that don't track it
        let available = Some(self.sys.available_memory()).filter(|v| *v > 0);
        MemoryUsage::from_totals(self.sys.total_memory(), available, self.sys.free_memory())
            .with_swap(self.sys.total_swap(), self.sys.used_swap())
    }

    fn cpu(&self) -> CpuLoad {
        let cpus = self.sys.cpus();
        let freqs: Vec<f64> = cpus.iter().map(|c| c.frequency() as f64 / 1000.0).collect();
        let speed = if freqs.is_empty() {
            CpuSpeed {
                avg: 0.0,
                min: 0.0,
                max: 0.0,
            }
        } else {
            CpuSpeed {
                avg: freqs.iter().sum::<f64>() / freqs.len() as f64,
                min: freqs.iter().copied().fold(f64::INFINITY, f64::min),
                max: freqs.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            }
        };
        CpuLoad {
            usage: self.sys.global_cpu_usage(),
            cores: cpus.iter().map(|c| c.cpu_usage()).collect(),
            brand: cpus
                .first()
                .map(|c| c.brand().trim().to_string())
                .unwrap_or_default(),
            speed,
        }
    }

    fn networks(&mut self) -> Vec<NetworkStats> {
        self.networks.refresh(true);
        let now = Instant::now();
        let secs = now.duration_since(self.last_net_refresh).as_secs_f64();
        self.last_net_refresh = now;

        let mut stats: Vec<NetworkStats> = self
            .networks
            .iter()
            .map(|(name, data)| NetworkStats {
                iface: name.clone(),
                rx_bytes: data.total_received(),
                tx_bytes: data.total_transmitted(),
                rx_sec: per_second(data.received(), secs),
                tx_sec: per_second(data.transmitted(), secs),
            })
            .collect();
        stats.sort_by(|a, b| a.iface.cmp(&b.iface));
        stats
    }

    fn cpu_info(&self) -> CpuInfo {
        let cpus = self.sys.cpus();
        let first = cpus.first();
        CpuInfo {
            manufacturer: first
                .map(|c| c.vendor_id().trim().to_string())
                .unwrap_or_default(),
            brand: first.map(|c| c.brand().trim().to_string()).unwrap_or_default(),
            speed: first.map(|c| c.frequency() as f64 / 1000.0).unwrap_or(0.0),
            cores: cpus.len(),
        }
    }

    // Reads the handles refreshed by `networks()`
    fn interfaces(&self) -> Vec<NetworkInterface> {
        let mut list: Vec<NetworkInterface> = self
            .networks
            .iter()
            .map(|(name, data)| {
                let (ip4, ip6) = split_addresses(data.ip_networks().iter().map(|n| n.addr));
                NetworkInterface {
                    iface: name.clone(),
                    mac: data.mac_address().to_string(),
                    ip4,
                    ip6,
                    internal: is_loopback(name),
                }
            })
            .collect();
        list.sort_by(|a, b| a.iface.cmp(&b.iface));
        list
    }

    // Reads the handles refreshed by `filesystems()`
    fn disk_layout(&self) -> Vec<DiskDevice> {
        dedupe_devices(self.disks.list().iter().map(|d| DiskDevice {
            device: d.name().to_string_lossy().into_owned(),
            kind: disk_kind_label(d.kind()).to_string(),
            size: d.total_space(),
            removable: d.is_removable(),
        }))
    }

    fn filesystems(&mut self) -> Vec<FsEntry> {
        self.disks.refresh(true);
        self.disks
            .list()
            .iter()
            .filter(|d| d.total_space() > 0)
            .map(|d| {
                let size = d.total_space();
                let available = d.available_space().min(size);
                let used = size - available;
                FsEntry {
                    fs: d.name().to_string_lossy().into_owned(),
                    mount: d.mount_point().to_string_lossy().into_owned(),
                    kind: d.file_system().to_string_lossy().into_owned(),
                    size,
                    used,
                    available,
                    use_pct: used as f64 / size as f64 * 100.0,
                }
            })
            .collect()
    }

    fn processes(&mut self) -> ProcessCounts {
        self.sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing(),
        );
        count_statuses(self.sys.processes().values().map(|p| p.status()))
    }

    fn temperatures(&mut self) -> Temperatures {
        self.components.refresh(false);
        classify_temperatures(
            self.components
                .iter()
                .filter_map(|c| c.temperature().map(|t| (c.label(), t))),
        )
    }

    fn os_info() -> OsInfo {
        OsInfo {
            platform: std::env::consts::OS.to_string(),
            distro: System::long_os_version()
                .or_else(System::name)
                .unwrap_or_default(),
            release: System::os_version().unwrap_or_default(),
            kernel: System::kernel_version().unwrap_or_default(),
            arch: std::env::consts::ARCH.to_string(),
            hostname: hostname(),
        }
    }
}

impl Default for SysinfoProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl HostProbe for SysinfoProbe {
    fn snapshot(&mut self) -> Result<Snapshot, ProbeError> {
        self.sys.refresh_cpu_all();
        self.sys.refresh_memory();
        self.check_host()?;

        let network_stats = self.networks();
        let network_interfaces = self.interfaces();
        let fs = self.filesystems();
        let disk_layout = self.disk_layout();
        let temps = self.temperatures();
        self.users.refresh();
        let load = System::load_average();
        let cpu = self.cpu();

        Ok(Snapshot {
            cpu_speed: cpu.speed.clone(),
            cpu_info: self.cpu_info(),
            cpu,
            memory: self.memory(),
            temperature: temps.main,
            temperature_cores: temps.cores,
            temperature_max: temps.max,
            temperature_socket: temps.socket,
            temperature_chipset: temps.chipset,
            network: primary_interface(&network_stats),
            network_stats,
            network_interfaces,
            fs,
            disk_layout,
            processes: self.processes(),
            users: self.users.list().iter().map(|u| u.name().to_string()).collect(),
            loadavg: [load.one, load.five, load.fifteen],
            uptime: System::uptime(),
            os: Self::os_info(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        })
    }

    fn connection_info(&mut self) -> Result<ConnectionInfo, ProbeError> {
        // CPU usage stays as of the last tick; a refresh here would move the tick's baseline.
        self.sys.refresh_memory();
        self.check_host()?;

        let memory = self.memory();
        let os_info = Self::os_info();
        Ok(ConnectionInfo {
            status: "connected",
            platform: os_info.platform.clone(),
            cpus: self.sys.cpus().len(),
            total_memory: memory.total(),
            available_memory: memory.available(),
            hostname: os_info.hostname.clone(),
            os_info,
            uptime: System::uptime(),
            current_load: self.sys.global_cpu_usage(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        })
    }
}

fn hostname() -> String {
    System::host_name().unwrap_or_else(|| "unknown".into())
}

fn per_second(delta: u64, secs: f64) -> f64 {
    if secs > 0.0 {
        delta as f64 / secs
    } else {
        0.0
    }
}

/// The busiest non-loopback interface, or an empty record when there is none.
pub fn primary_interface(stats: &[NetworkStats]) -> NetworkStats {
    stats
        .iter()
        .filter(|n| !is_loopback(&n.iface))
        .max_by_key(|n| n.rx_bytes.saturating_add(n.tx_bytes))
        .or_else(|| stats.first())
        .cloned()
        .unwrap_or_default()
}

fn is_loopback(iface: &str) -> bool {
    iface == "lo" || iface.starts_with("lo0")
}

/// Splits addresses into IPv4 and IPv6 text lists, input order kept.
pub fn split_addresses(addrs: impl Iterator<Item = IpAddr>) -> (Vec<String>, Vec<String>) {
    let mut ip4 = Vec::new();
    let mut ip6 = Vec::new();
    for addr in addrs {
        match addr {
            IpAddr::V4(a) => ip4.push(a.to_string()),
            IpAddr::V6(a) => ip6.push(a.to_string()),
        }
    }
    (ip4, ip6)
}

pub fn disk_kind_label(kind: DiskKind) -> &'static str {
    match kind {
        DiskKind::SSD => "SSD",
        DiskKind::HDD => "HD",
        DiskKind::Unknown(_) => "Unknown",
    }
}

/// One entry per device name (sysinfo lists each mounted volume); the
/// largest reported size wins. Sorted by device.
pub fn dedupe_devices(devices: impl Iterator<Item = DiskDevice>) -> Vec<DiskDevice> {
    let mut by_name: BTreeMap<String, DiskDevice> = BTreeMap::new();
    for d in devices {
        match by_name.get_mut(&d.device) {
            Some(existing) if existing.size >= d.size => {}
            Some(existing) => *existing = d,
            None => {
                by_name.insert(d.device.clone(), d);
            }
        }
    }
    by_name.into_values().collect()
}

pub fn count_statuses(statuses: impl Iterator<Item = ProcessStatus>) -> ProcessCounts {
    let mut counts = ProcessCounts::default();
    for status in statuses {
        counts.all += 1;
        match status {
            ProcessStatus::Run => counts.running += 1,
            ProcessStatus::Sleep | ProcessStatus::Idle => counts.sleeping += 1,
            ProcessStatus::UninterruptibleDiskSleep | ProcessStatus::LockBlocked => {
                counts.blocked += 1
            }
            _ => {}
        }
    }
    counts
}

#[derive(Debug, Default, PartialEq)]
pub struct Temperatures {
    pub main: f32,
    pub cores: Vec<f32>,
    pub socket: Vec<f32>,
    pub chipset: Vec<f32>,
    pub max: f32,
}

/// Buckets sensor readings by label. `main` is the hottest CPU-like sensor;
/// every value falls back to 0 when no sensor matches.
pub fn classify_temperatures<'a>(readings: impl Iterator<Item = (&'a str, f32)>) -> Temperatures {
    let mut t = Temperatures::default();
    let mut main: Option<f32> = None;
    let mut max: Option<f32> = None;
    for (label, value) in readings {
        if !value.is_finite() {
            continue;
        }
        let l = label.to_ascii_lowercase();
        if l.contains("core ") {
            t.cores.push(value);
        }
        if l.contains("package") || l.contains("tctl") || l.contains("tdie") {
            t.socket.push(value);
        }
        if l.contains("pch") || l.contains("chipset") {
            t.chipset.push(value);
        }
        if l.contains("cpu") || l.contains("package") || l.contains("tctl") || l.contains("tdie")
        {
            main = Some(main.map_or(value, |m| m.max(value)));
        }
        max = Some(max.map_or(value, |m| m.max(value)));
    }
    t.main = main.unwrap_or(0.0);
    t.max = max.unwrap_or(0.0);
    t
}
