//! Position estimate for a mixer that can only say whether it is busy.

use std::time::{Duration, Instant};

/// Source of "now" for re-basing the clock.
pub trait TimeSource {
    fn now(&self) -> Instant;
}

/// The real monotonic clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct WallClock;

impl TimeSource for WallClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Elapsed-time estimate anchored at the last discontinuity.
///
/// Every play, resume and seek re-anchors the clock with `start`, so the
/// estimate is always `offset + (now - reference)` and never accumulates
/// rounding from incremental updates.
#[derive(Debug, Clone, Default)]
pub struct PlaybackClock {
    reference: Option<Instant>,
    offset: Duration,
    track_length: Duration,
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upper bound for `sample`. Zero means the length is unknown.
    pub fn set_track_length(&mut self, length: Duration) {
        self.track_length = length;
    }

    /// Anchor the clock: `at` is the track position at instant `now`.
    pub fn start(&mut self, at: Duration, now: Instant) {
        self.reference = Some(now);
        self.offset = at;
    }

    /// Estimated position at `now`, clamped to `[0, track_length]`.
    ///
    /// Always zero for an unknown-length track.
    pub fn sample(&self, now: Instant) -> Duration {
        if self.track_length.is_zero() {
            return Duration::ZERO;
        }
        let elapsed = self
            .reference
            .map(|r| now.saturating_duration_since(r))
            .unwrap_or(Duration::ZERO);
        (self.offset + elapsed).min(self.track_length)
    }
}
