//! Shared agent state handed to every WebSocket connection.

use std::sync::atomic::{AtomicU64, AtomicUsize};
use std::sync::Arc;

use crate::monitor::Monitor;

#[derive(Clone)]
pub struct AppState {
    pub monitor: Monitor,

    // Connection bookkeeping for logs
    pub client_count: Arc<AtomicUsize>,
    pub next_client_id: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(monitor: Monitor) -> Self {
        Self {
            monitor,
            client_count: Arc::new(AtomicUsize::new(0)),
            next_client_id: Arc::new(AtomicU64::new(1)),
        }
    }
}
