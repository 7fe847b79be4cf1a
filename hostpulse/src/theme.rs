//! Persisted theme preference: `{"theme": "dark"|"light"}`.
//! Stored under XDG config dir: $XDG_CONFIG_HOME/hostpulse/settings.json (fallback ~/.config/hostpulse/settings.json)

use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub theme: Theme,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("could not write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not encode settings: {0}")]
    Encode(#[from] serde_json::Error),
}

pub fn config_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("hostpulse")
    } else {
        dirs_next::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hostpulse")
    }
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

/// Saved theme, or Light when nothing (or nothing readable) is stored.
pub fn load_theme() -> Theme {
    match fs::read_to_string(settings_path()) {
        Ok(s) => serde_json::from_str::<Settings>(&s)
            .map(|s| s.theme)
            .unwrap_or_default(),
        Err(_) => Theme::default(),
    }
}

pub fn save_theme(theme: Theme) -> Result<(), ThemeError> {
    let path = settings_path();
    let io_err = |source| ThemeError::Io {
        path: path.clone(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let data = serde_json::to_vec_pretty(&Settings { theme })?;
    fs::write(&path, data).map_err(io_err)
}
