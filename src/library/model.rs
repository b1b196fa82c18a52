use std::path::{Path, PathBuf};
use std::time::Duration;

use super::metadata::TrackMetadata;

/// Artist shown when the file carries no artist tag.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// One importable audio file and the fields derived from its tags.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub path: PathBuf,
    pub title: String,
    pub artist: String,
    pub track_number: String,
    /// `Duration::ZERO` when the length could not be determined.
    pub duration: Duration,
}

impl Track {
    /// Build a track from whatever metadata could be read, filling the gaps
    /// with filename-derived defaults.
    pub fn new(path: &Path, meta: TrackMetadata) -> Self {
        let basename = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();

        Self {
            path: path.to_path_buf(),
            title: non_empty(meta.title).unwrap_or(basename),
            artist: non_empty(meta.artist).unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
            track_number: meta
                .track_number
                .map(|n| n.to_string())
                .unwrap_or_else(|| "0".to_string()),
            duration: meta.duration.unwrap_or(Duration::ZERO),
        }
    }

    /// Whether the track length is known.
    pub fn has_duration(&self) -> bool {
        !self.duration.is_zero()
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Ordered collection of tracks addressed by contiguous indices.
///
/// Paths are unique: pushing a path that is already present is refused.
#[derive(Debug, Default, Clone)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Track> {
        self.tracks.iter()
    }

    pub fn contains_path(&self, path: &Path) -> bool {
        self.tracks.iter().any(|t| t.path == path)
    }

    /// Append `track`. Returns `false` (and drops it) when its path is already listed.
    pub fn push(&mut self, track: Track) -> bool {
        if self.contains_path(&track.path) {
            return false;
        }
        self.tracks.push(track);
        true
    }

    /// Remove the track at `index`, shifting later tracks down.
    pub fn remove(&mut self, index: usize) -> Option<Track> {
        if index < self.tracks.len() {
            Some(self.tracks.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Track paths in playlist order, as persisted in the settings document.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.tracks.iter().map(|t| t.path.clone()).collect()
    }
}
