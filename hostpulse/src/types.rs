//! Types that mirror the agent's JSON schema.
//! Optional fields stay `Option` so display code can fall back between them.

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Cpu {
    pub usage: Option<f64>,
    pub cores: Option<Vec<f64>>,
    pub brand: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Memory {
    #[serde(default)]
    pub total: f64,
    pub free: Option<f64>,
    pub available: Option<f64>,
    pub used: Option<f64>,
    pub usage: Option<f64>,
}

impl Memory {
    /// Usable memory in bytes: `available` when reported, else raw `free`.
    pub fn usable(&self) -> Option<f64> {
        self.available.or(self.free)
    }
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Network {
    pub iface: Option<String>,
    // per-second rates, preferred when present
    pub rx_sec: Option<f64>,
    pub tx_sec: Option<f64>,
    // cumulative counters
    pub rx_bytes: Option<f64>,
    pub tx_bytes: Option<f64>,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct FsEntry {
    #[serde(default)]
    pub fs: String,
    #[serde(default)]
    pub mount: String,
    #[serde(default)]
    pub size: f64,
    #[serde(default)]
    pub used: f64,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Processes {
    pub all: Option<u64>,
    pub running: Option<u64>,
    pub blocked: Option<u64>,
    pub sleeping: Option<u64>,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct OsInfo {
    pub platform: Option<String>,
    pub distro: Option<String>,
    pub release: Option<String>,
    pub kernel: Option<String>,
    pub arch: Option<String>,
    pub hostname: Option<String>,
}

/// `os-update` payload.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub cpu: Option<Cpu>,
    pub memory: Option<Memory>,
    pub temperature: Option<f64>,
    pub temperature_max: Option<f64>,
    pub network: Option<Network>,
    pub fs: Option<Vec<FsEntry>>,
    pub processes: Option<Processes>,
    pub loadavg: Option<Vec<f64>>,
    pub uptime: Option<u64>,
    pub os: Option<OsInfo>,
    pub timestamp: Option<i64>,
}

/// `connected` payload.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInfo {
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub platform: Option<String>,
    pub cpus: Option<u64>,
    pub total_memory: Option<u64>,
    pub available_memory: Option<u64>,
    pub hostname: Option<String>,
    pub os_info: Option<OsInfo>,
    pub uptime: Option<u64>,
    pub current_load: Option<f64>,
    pub timestamp: Option<i64>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ErrorMessage {
    pub message: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    #[serde(rename = "connected")]
    Connected(ConnectionInfo),
    #[serde(rename = "os-update")]
    OsUpdate(Box<Snapshot>),
    #[serde(rename = "error")]
    Error(ErrorMessage),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_os_update_with_missing_fields() {
        let js = r#"{"event":"os-update","data":{"memory":{"total":100,"free":30},"loadavg":[1,2,3]}}"#;
        let ServerEvent::OsUpdate(snap) = serde_json::from_str(js).unwrap() else {
            panic!("wrong variant");
        };
        let mem = snap.memory.unwrap();
        assert_eq!(mem.available, None);
        assert_eq!(mem.usable(), Some(30.0));
        assert!(snap.cpu.is_none());
        assert_eq!(snap.loadavg, Some(vec![1.0, 2.0, 3.0]));
    }

    #[test]
    fn parses_connected_camel_case() {
        let js = r#"{"event":"connected","data":{"status":"connected","type":"linux","cpus":8,"totalMemory":1024,"hostname":"box"}}"#;
        let ServerEvent::Connected(info) = serde_json::from_str(js).unwrap() else {
            panic!("wrong variant");
        };
        assert_eq!(info.platform.as_deref(), Some("linux"));
        assert_eq!(info.cpus, Some(8));
        assert_eq!(info.total_memory, Some(1024));
    }

    #[test]
    fn parses_error_event() {
        let js = r#"{"event":"error","data":{"message":"Failed to get system information"}}"#;
        assert_eq!(
            serde_json::from_str::<ServerEvent>(js).unwrap(),
            ServerEvent::Error(ErrorMessage {
                message: "Failed to get system information".into()
            })
        );
    }

    #[test]
    fn available_wins_over_free() {
        let m = Memory {
            total: 10.0,
            free: Some(1.0),
            available: Some(4.0),
            ..Default::default()
        };
        assert_eq!(m.usable(), Some(4.0));
    }
}
