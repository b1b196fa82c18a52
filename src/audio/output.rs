use std::path::Path;
use std::time::Duration;

use crate::error::AudioError;

/// The mixer primitives the transport needs.
///
/// Implementations only report whether something is audible; elapsed time
/// is estimated by `PlaybackClock`.
pub trait AudioOutput {
    /// Prepare `path` for playback, replacing anything loaded before.
    fn load(&mut self, path: &Path) -> Result<(), AudioError>;
    /// Start the loaded track at `start`.
    fn play(&mut self, start: Duration) -> Result<(), AudioError>;
    fn pause(&mut self);
    fn resume(&mut self);
    /// Stop and unload.
    fn stop(&mut self);
    /// Jump to `position` in the loaded track.
    fn set_position(&mut self, position: Duration) -> Result<(), AudioError>;
    /// True while audio is being produced.
    fn is_busy(&self) -> bool;
}
