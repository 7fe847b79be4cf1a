//! Colors for the light and dark themes.

use ratatui::style::{Color, Style};

use crate::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg: Color,
    pub fg: Color,
    pub muted: Color,
    pub accent: Color,
    pub danger: Color,
}

pub const LIGHT: Palette = Palette {
    bg: Color::Rgb(255, 255, 255),
    fg: Color::Rgb(30, 41, 59),
    muted: Color::Rgb(100, 116, 139),
    accent: Color::Rgb(99, 102, 241),
    danger: Color::Rgb(239, 68, 68),
};

pub const DARK: Palette = Palette {
    bg: Color::Rgb(30, 41, 59),
    fg: Color::Rgb(241, 245, 249),
    muted: Color::Rgb(148, 163, 184),
    accent: Color::Rgb(129, 140, 248),
    danger: Color::Rgb(248, 113, 113),
};

pub fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => LIGHT,
        Theme::Dark => DARK,
    }
}

impl Palette {
    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted).bg(self.bg)
    }
}
