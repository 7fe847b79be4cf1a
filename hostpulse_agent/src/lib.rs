//! hostpulse_agent: samples host metrics on a fixed period and pushes each
//! snapshot to every connected viewer over WebSocket.

pub mod config;
pub mod monitor;
pub mod probe;
pub mod state;
pub mod types;
pub mod ws;
