//! Background monitor: samples the host on a fixed period and fans each
//! snapshot out to every subscribed viewer as a pre-serialized frame.

use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{info, warn};

use crate::probe::HostProbe;
use crate::types::ServerEvent;

pub const MONITOR_INTERVAL: Duration = Duration::from_millis(3000);
pub const CHANNEL_CAPACITY: usize = 16;
pub const CONNECTION_INFO_ERROR: &str = "Failed to get system information";

pub type SharedProbe = Arc<Mutex<dyn HostProbe>>;

#[derive(Clone)]
pub struct Monitor {
    probe: SharedProbe,
    frames: broadcast::Sender<String>,
}

impl Monitor {
    pub fn new<P: HostProbe>(probe: P) -> Self {
        let (frames, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            probe: Arc::new(Mutex::new(probe)),
            frames,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.frames.subscribe()
    }

    pub fn viewer_count(&self) -> usize {
        self.frames.receiver_count()
    }

    /// One sampling cycle. Returns false when the read failed and nothing was sent.
    pub async fn tick(&self) -> bool {
        let read = {
            let mut probe = self.probe.lock().await;
            probe.snapshot()
        };
        let snap = match read {
            Ok(s) => s,
            Err(e) => {
                warn!("monitoring cycle skipped: {e}");
                return false;
            }
        };
        info!(
            cpu_usage = snap.cpu.usage,
            cpu_cores = snap.cpu.cores.len(),
            mem_total = snap.memory.total(),
            mem_available = snap.memory.available(),
            mem_used = snap.memory.used(),
            mem_usage_pct = snap.memory.usage(),
            uptime = snap.uptime,
            disks = snap.fs.len(),
            procs = snap.processes.all,
            "os-update"
        );
        let frame = match serde_json::to_string(&ServerEvent::OsUpdate(Box::new(snap))) {
            Ok(js) => js,
            Err(e) => {
                warn!("snapshot serialization failed: {e}");
                return false;
            }
        };
        // No subscribers is fine: the frame is simply dropped.
        let _ = self.frames.send(frame);
        true
    }

    /// The one-time frame for a new viewer: `connected` info, or an `error`
    /// event when the host read fails.
    pub async fn connection_frame(&self) -> String {
        let read = {
            let mut probe = self.probe.lock().await;
            probe.connection_info()
        };
        let event = match read {
            Ok(info) => ServerEvent::Connected(info),
            Err(e) => {
                warn!("connection info unavailable: {e}");
                ServerEvent::error(CONNECTION_INFO_ERROR)
            }
        };
        serde_json::to_string(&event).unwrap_or_else(|_| {
            format!(r#"{{"event":"error","data":{{"message":"{CONNECTION_INFO_ERROR}"}}}}"#)
        })
    }

    /// Starts the periodic loop. The first sample is taken one full period
    /// after start; a slow read delays the following tick instead of overlapping it.
    pub fn start(&self, period: Duration) -> MonitorHandle {
        info!("starting host monitoring with {}ms interval", period.as_millis());
        let monitor = self.clone();
        let task = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // interval() yields immediately; consume that so sampling starts after one period
            ticker.tick().await;
            loop {
                ticker.tick().await;
                monitor.tick().await;
            }
        });
        MonitorHandle { task }
    }
}

/// Owns the sampling task; stopping (or dropping) the handle ends it.
pub struct MonitorHandle {
    task: JoinHandle<()>,
}

impl MonitorHandle {
    pub fn stop(self) {
        self.task.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
