use std::time::Duration;

use crate::config::BoundarySetting;
use crate::library::Track;

/// Top-level player state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// What next/prev do past the ends of the playlist.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum BoundaryPolicy {
    /// Wrap around modulo the playlist length.
    #[default]
    Wrap,
    /// Do nothing past the first/last track; playback stops after the last one.
    Clamp,
}

impl From<BoundarySetting> for BoundaryPolicy {
    fn from(s: BoundarySetting) -> Self {
        match s {
            BoundarySetting::Wrap => Self::Wrap,
            BoundarySetting::Clamp => Self::Clamp,
        }
    }
}

/// Snapshot of the transport, mutated only by `TransportController`.
///
/// `position` stays within `[0, track_length]`; `cursor` is `None` exactly
/// when the playlist is empty.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlaybackState {
    pub cursor: Option<usize>,
    pub phase: Phase,
    pub position: Duration,
    pub track_length: Duration,
    pub repeat_one: bool,
}

impl PlaybackState {
    /// Position as a fraction of the track length (0 for unknown lengths).
    pub fn progress(&self) -> f64 {
        if self.track_length.is_zero() {
            return 0.0;
        }
        (self.position.as_secs_f64() / self.track_length.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// The cursor, but only while something is playing or paused.
    pub fn active_index(&self) -> Option<usize> {
        match self.phase {
            Phase::Stopped => None,
            Phase::Playing | Phase::Paused => self.cursor,
        }
    }
}

/// Told about every transport transition.
pub trait PlaybackObserver {
    fn playback_changed(&self, state: &PlaybackState, track: Option<&Track>);
}
