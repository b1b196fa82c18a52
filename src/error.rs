//! Domain error types.
//!
//! None of these reach the user as a fatal error: the transport absorbs
//! audio failures, the importer falls back to filename defaults and the
//! settings store falls back to built-in defaults. They exist so the
//! fallbacks can be logged with a useful reason.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures reported by an audio output.
#[derive(Error, Debug)]
pub enum AudioError {
    /// The named output device does not exist or could not be opened.
    #[error("output device unavailable: {name}")]
    DeviceUnavailable { name: String },
    /// No output stream could be opened at all.
    #[error("failed to open output stream: {0}")]
    Stream(#[from] rodio::StreamError),
    /// The file could not be opened.
    #[error("failed to open {path:?}: {source}")]
    Open { path: PathBuf, source: io::Error },
    /// The file could not be decoded.
    #[error("failed to decode {path:?}: {source}")]
    Decode {
        path: PathBuf,
        source: rodio::decoder::DecoderError,
    },
    /// A seek was refused by the decoder.
    #[error("seek failed: {0}")]
    Seek(#[from] rodio::source::SeekError),
    /// An operation needed a loaded track.
    #[error("no track loaded")]
    NoTrackLoaded,
}

/// Failures reading tags from a file.
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("failed to read tags: {0}")]
    Read(#[from] lofty::error::LoftyError),
}

/// Failures loading or saving the persisted settings document.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The document exists but could not be parsed.
    #[error("settings file is corrupt: {0}")]
    Corrupt(#[from] ::config::ConfigError),
    #[error("failed to write settings to {path:?}: {source}")]
    Write { path: PathBuf, source: io::Error },
}
