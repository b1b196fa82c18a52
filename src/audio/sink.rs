//! Utilities for creating `rodio` sinks from file paths.
//!
//! The helper here encapsulates opening/decoding a file and preparing a
//! paused `Sink` ready to be started.

use std::fs::File;
use std::path::Path;

use rodio::{Decoder, OutputStream, Sink};

use crate::error::AudioError;

/// Create a paused `Sink` on `stream` holding the decoded contents of `path`.
pub(super) fn create_paused_sink(stream: &OutputStream, path: &Path) -> Result<Sink, AudioError> {
    let file = File::open(path).map_err(|source| AudioError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    // `try_from(File)` records the byte length, which makes the decoder seekable.
    let source = Decoder::try_from(file).map_err(|source| AudioError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let sink = Sink::connect_new(stream.mixer());
    sink.pause();
    sink.append(source);
    Ok(sink)
}
