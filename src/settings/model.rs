use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer};

/// Everything persisted between sessions.
///
/// Section names are written capitalized (`[Window]`); both spellings are
/// accepted on load.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PersistedSettings {
    #[serde(alias = "Window")]
    pub window: WindowState,
    #[serde(alias = "Audio")]
    pub audio: AudioState,
    #[serde(alias = "Columns")]
    pub columns: ColumnWidths,
    #[serde(alias = "Playlist", deserialize_with = "playlist_items")]
    pub playlist: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WindowState {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowState {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AudioState {
    /// Output device name; empty selects the system default.
    pub device_name: String,
}

/// Relative widths of the playlist table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnWidths {
    pub track_width: u16,
    pub title_width: u16,
    pub artist_width: u16,
    pub duration_width: u16,
}

impl Default for ColumnWidths {
    fn default() -> Self {
        Self {
            track_width: 30,
            title_width: 400,
            artist_width: 200,
            duration_width: 70,
        }
    }
}

impl ColumnWidths {
    pub const MIN_WIDTH: u16 = 10;
    pub const MAX_WIDTH: u16 = 2000;

    /// Widen (positive) or narrow (negative) the title column.
    pub fn adjust_title(&mut self, delta: i32) {
        let next = i32::from(self.title_width) + delta;
        self.title_width = next.clamp(i32::from(Self::MIN_WIDTH), i32::from(Self::MAX_WIDTH)) as u16;
    }

    /// The widths in table order: track, title, artist, duration.
    pub fn as_array(&self) -> [u16; 4] {
        [
            self.track_width,
            self.title_width,
            self.artist_width,
            self.duration_width,
        ]
    }
}

fn playlist_items<'de, D>(deserializer: D) -> Result<Vec<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = BTreeMap::<String, String>::deserialize(deserializer)?;
    Ok(ordered_items(items))
}

/// `item_N = path` entries ordered by `N`. Other keys and blank values are
/// dropped.
pub(super) fn ordered_items<I>(items: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut numbered: Vec<(usize, String)> = items
        .into_iter()
        .filter_map(|(key, value)| {
            let ordinal = key
                .to_ascii_lowercase()
                .strip_prefix("item_")?
                .parse::<usize>()
                .ok()?;
            let value = value.trim().to_string();
            (!value.is_empty()).then_some((ordinal, value))
        })
        .collect();
    numbered.sort_by_key(|(ordinal, _)| *ordinal);
    numbered.into_iter().map(|(_, v)| PathBuf::from(v)).collect()
}
