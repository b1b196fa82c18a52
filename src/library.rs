//! Playlist model and import pipeline.
//!
//! Tracks enter the playlist through the `ImportQueue` (dropped/pasted
//! paths, command-line arguments, the add prompt and the restored settings)
//! and get their title/artist/duration from a `MetadataReader`.

mod import;
mod metadata;
mod model;

pub use import::{ImportQueue, load_track, parse_dropped_paths};
pub use metadata::{LoftyReader, MetadataReader, TrackMetadata};
pub use model::{Playlist, Track, UNKNOWN_ARTIST};
