//! Library surface for the hostpulse viewer: wire mirrors, display state and helpers.

pub mod app;
pub mod format;
pub mod history;
pub mod state;
pub mod theme;
pub mod types;
pub mod ui;
pub mod ws;
