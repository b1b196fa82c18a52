//! Tag reading behind a small trait so the importer can be tested without
//! real audio files.

use std::path::Path;
use std::time::Duration;

use lofty::prelude::{Accessor, AudioFile, TaggedFileExt};

use crate::error::MetadataError;

/// Fields the player needs from a file's tags. Every field is optional;
/// `Track::new` supplies the fallbacks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub track_number: Option<u32>,
    pub duration: Option<Duration>,
}

pub trait MetadataReader {
    fn read(&self, path: &Path) -> Result<TrackMetadata, MetadataError>;
}

/// `MetadataReader` backed by `lofty`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyReader;

impl MetadataReader for LoftyReader {
    fn read(&self, path: &Path) -> Result<TrackMetadata, MetadataError> {
        let tagged = lofty::read_from_path(path)?;

        let duration = tagged.properties().duration();
        let mut meta = TrackMetadata {
            duration: (!duration.is_zero()).then_some(duration),
            ..TrackMetadata::default()
        };

        if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
            meta.title = tag.title().map(|v| v.to_string());
            meta.artist = tag.artist().map(|v| v.to_string());
            meta.track_number = tag.track();
        }

        Ok(meta)
    }
}
