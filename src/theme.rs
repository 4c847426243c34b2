use crate::storage::KeyValueStore;
use ratatui::style::Color;
use std::fmt;
use std::str::FromStr;
use tracing::{error, warn};

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Light => "ライト",
            Theme::Dark => "ダーク",
            Theme::System => "システム",
        }
    }

    /// Cycle order used by the theme toggle.
    pub fn next(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::System,
            Theme::System => Theme::Light,
        }
    }

    pub fn is_dark(self, system: SystemAppearance) -> bool {
        match self {
            Theme::Light => false,
            Theme::Dark => true,
            Theme::System => system == SystemAppearance::Dark,
        }
    }

    pub fn palette(self, system: SystemAppearance) -> Palette {
        if self.is_dark(system) {
            Palette {
                text: Color::White,
                muted: Color::Gray,
                accent: Color::Cyan,
                hint: Color::Yellow,
            }
        } else {
            Palette {
                text: Color::Black,
                muted: Color::DarkGray,
                accent: Color::Blue,
                hint: Color::Magenta,
            }
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            _ => Err(format!("Unknown theme: {}", s)),
        }
    }
}

/// Colour scheme the terminal itself reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemAppearance {
    Light,
    Dark,
}

impl SystemAppearance {
    /// Reads `COLORFGBG` ("fg;bg"); terminals without it are assumed dark.
    pub fn detect() -> Self {
        Self::from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
    }

    fn from_colorfgbg(value: Option<&str>) -> Self {
        let background = value
            .and_then(|v| v.rsplit(';').next())
            .and_then(|bg| bg.trim().parse::<u8>().ok());
        match background {
            // 7 and 15 are the light greys/white of the 16-colour palette
            Some(7) | Some(15) => SystemAppearance::Light,
            _ => SystemAppearance::Dark,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub hint: Color,
}

/// Remembers the chosen theme between runs.
pub struct ThemeStore<S> {
    kv: S,
}

impl<S: KeyValueStore> ThemeStore<S> {
    pub fn new(kv: S) -> Self {
        ThemeStore { kv }
    }

    /// The saved theme, or `fallback` when nothing usable is stored.
    pub fn load(&self, fallback: Theme) -> Theme {
        match self.kv.get(THEME_KEY) {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|e| {
                warn!(error = %e, "Ignoring stored theme");
                fallback
            }),
            Ok(None) => fallback,
            Err(e) => {
                error!(error = %e, "Failed to read theme");
                fallback
            }
        }
    }

    pub fn save(&self, theme: Theme) {
        if let Err(e) = self.kv.set(THEME_KEY, theme.as_str()) {
            error!(error = %e, "Failed to save theme");
        }
    }
}
