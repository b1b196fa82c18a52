use std::fs;
use std::path::PathBuf;

use ::config::{Config, File, FileFormat};
use ini::{EscapePolicy, Ini};
use tracing::{debug, info, warn};

use crate::error::SettingsError;

use super::model::PersistedSettings;

/// Reads and writes the settings document at a fixed path.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: Option<PathBuf>,
}

impl SettingsStore {
    /// `None` disables persistence (no home directory to put it in).
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// Load the document, falling back to defaults when it is missing or
    /// unreadable.
    pub fn load(&self) -> PersistedSettings {
        match self.try_load() {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "ignoring saved settings");
                PersistedSettings::default()
            }
        }
    }

    pub fn try_load(&self) -> Result<PersistedSettings, SettingsError> {
        let Some(path) = &self.path else {
            return Ok(PersistedSettings::default());
        };

        let cfg = Config::builder()
            .add_source(File::from(path.as_path()).format(FileFormat::Ini).required(false))
            .build()?;
        let settings: PersistedSettings = cfg.try_deserialize()?;
        debug!(
            path = %path.display(),
            tracks = settings.playlist.len(),
            "loaded saved settings"
        );
        Ok(settings)
    }

    /// Write the whole document, replacing what was there.
    pub fn save(&self, settings: &PersistedSettings) -> Result<(), SettingsError> {
        let Some(path) = &self.path else {
            debug!("no settings path; not saving");
            return Ok(());
        };

        let write_err = |source| SettingsError::Write {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        to_ini(settings)
            .write_to_file_policy(path, EscapePolicy::Reserved)
            .map_err(write_err)?;
        info!(path = %path.display(), "saved settings");
        Ok(())
    }
}

fn to_ini(settings: &PersistedSettings) -> Ini {
    let mut ini = Ini::new();
    ini.with_section(Some("Window"))
        .set("width", settings.window.width.to_string())
        .set("height", settings.window.height.to_string());
    ini.with_section(Some("Audio"))
        .set("device_name", settings.audio.device_name.as_str());
    ini.with_section(Some("Columns"))
        .set("track_width", settings.columns.track_width.to_string())
        .set("title_width", settings.columns.title_width.to_string())
        .set("artist_width", settings.columns.artist_width.to_string())
        .set("duration_width", settings.columns.duration_width.to_string());

    let mut playlist = ini.with_section(Some("Playlist"));
    for (i, path) in settings.playlist.iter().enumerate() {
        playlist.set(format!("item_{i}"), path.to_string_lossy());
    }
    ini
}
