use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/spindle/config.toml` or `~/.config/spindle/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `SPINDLE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub playback: PlaybackSettings,
    pub controls: ControlsSettings,
    pub library: LibrarySettings,
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// What next/prev do at the ends of the playlist.
    pub boundary: BoundarySetting,
    /// Whether repeat-one starts enabled.
    pub repeat_one: bool,
    /// Poll cadence of the event loop (milliseconds). Drives position
    /// updates and end-of-track detection.
    pub tick_ms: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            boundary: BoundarySetting::Wrap,
            repeat_one: false,
            tick_ms: 100,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoundarySetting {
    #[serde(alias = "wrap-around", alias = "wrap_around", alias = "loop")]
    Wrap,
    #[serde(alias = "stop", alias = "stop-at-end", alias = "stop_at_end")]
    Clamp,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Seconds to seek with `Left` / `Right`.
    pub seek_small_secs: u32,
    /// Seconds to seek with `Ctrl+Left` / `Ctrl+Right` (and `H` / `L`).
    pub seek_large_secs: u32,
    /// How much `[` / `]` change the title column width.
    pub column_step: u16,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            seek_small_secs: 5,
            seek_large_secs: 10,
            column_step: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions accepted on import (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks when a directory is imported.
    pub follow_links: bool,
    /// Whether an imported directory is walked recursively.
    pub recursive: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into()],
            follow_links: true,
            recursive: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Where the INI settings document lives. Defaults to `settings.ini`
    /// next to `config.toml`.
    pub settings_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` wins when set.
    pub level: String,
    /// Log file. Defaults to `$XDG_STATE_HOME/spindle/spindle.log`.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
