//! The transport state machine: Stopped / Playing / Paused over a playlist.
//!
//! Every operation absorbs its own failures. Out-of-range indices and actions
//! on an empty playlist are no-ops, and output errors are logged and leave
//! the transport Stopped.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::audio::AudioOutput;
use crate::library::{Playlist, Track};

use super::clock::{PlaybackClock, TimeSource, WallClock};
use super::state::{BoundaryPolicy, Phase, PlaybackObserver, PlaybackState};

pub struct TransportController<A: AudioOutput, T: TimeSource = WallClock> {
    playlist: Playlist,
    state: PlaybackState,
    clock: PlaybackClock,
    output: A,
    time: T,
    policy: BoundaryPolicy,
    observers: Vec<Box<dyn PlaybackObserver>>,
}

impl<A: AudioOutput, T: TimeSource> TransportController<A, T> {
    pub fn new(output: A, time: T, policy: BoundaryPolicy) -> Self {
        Self {
            playlist: Playlist::new(),
            state: PlaybackState::default(),
            clock: PlaybackClock::new(),
            output,
            time,
            policy,
            observers: Vec::new(),
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn output(&self) -> &A {
        &self.output
    }

    /// Direct access to the output, for device switching. Follow with
    /// `reload_output` so the current track resumes on the new stream.
    pub fn output_mut(&mut self) -> &mut A {
        &mut self.output
    }

    /// The track under the cursor.
    pub fn current_track(&self) -> Option<&Track> {
        self.state.cursor.and_then(|c| self.playlist.get(c))
    }

    /// Register an observer; it immediately receives the current snapshot.
    pub fn subscribe(&mut self, observer: Box<dyn PlaybackObserver>) {
        observer.playback_changed(&self.state, self.current_track());
        self.observers.push(observer);
    }

    /// Set the initial repeat-one flag (from configuration).
    pub fn set_repeat_one(&mut self, on: bool) {
        self.state.repeat_one = on;
    }

    /// Append `track`. Returns `false` when its path is already listed.
    pub fn add_track(&mut self, track: Track) -> bool {
        if !self.playlist.push(track) {
            return false;
        }
        if self.state.cursor.is_none() {
            self.state.cursor = Some(0);
            self.notify();
        }
        true
    }

    /// Load and start the track at `index`.
    pub fn play_track(&mut self, index: usize) {
        let Some(track) = self.playlist.get(index) else {
            debug!(index, len = self.playlist.len(), "ignoring play of missing track");
            return;
        };
        let path = track.path.clone();
        let length = track.duration;

        self.state.cursor = Some(index);
        self.state.position = Duration::ZERO;
        self.state.track_length = length;
        self.clock.set_track_length(length);

        let started = self
            .output
            .load(&path)
            .and_then(|()| self.output.play(Duration::ZERO));
        match started {
            Ok(()) => {
                self.state.phase = Phase::Playing;
                self.clock.start(Duration::ZERO, self.time.now());
                info!(index, path = %path.display(), "playing");
            }
            Err(e) => {
                warn!(index, error = %e, "could not start track");
                self.output.stop();
                self.state.phase = Phase::Stopped;
            }
        }
        self.notify();
    }

    /// Playing -> Paused, Paused -> Playing, Stopped -> play the cursor track.
    pub fn toggle_play_pause(&mut self) {
        match self.state.phase {
            Phase::Playing => {
                self.state.position = self.clock.sample(self.time.now());
                self.output.pause();
                self.state.phase = Phase::Paused;
            }
            Phase::Paused => {
                self.output.resume();
                self.clock.start(self.state.position, self.time.now());
                self.state.phase = Phase::Playing;
            }
            Phase::Stopped => {
                if let Some(cursor) = self.state.cursor {
                    self.play_track(cursor);
                }
                return;
            }
        }
        self.notify();
    }

    /// Stop output and rewind; the cursor stays where it is.
    pub fn stop(&mut self) {
        if self.state.phase == Phase::Stopped && self.state.position.is_zero() {
            return;
        }
        self.output.stop();
        self.state.phase = Phase::Stopped;
        self.state.position = Duration::ZERO;
        self.clock.start(Duration::ZERO, self.time.now());
        self.notify();
    }

    /// Seek relative to the current position by `delta_secs` (may be negative).
    pub fn seek_by(&mut self, delta_secs: i64) {
        self.seek_by_micros(delta_secs.saturating_mul(1_000_000));
    }

    /// Like `seek_by`, with microsecond precision for MPRIS `Seek` offsets.
    pub fn seek_by_micros(&mut self, delta_micros: i64) {
        let current = self.current_position(self.time.now());
        let delta = Duration::from_micros(delta_micros.unsigned_abs());
        let target = if delta_micros >= 0 {
            current.saturating_add(delta)
        } else {
            current.saturating_sub(delta)
        };
        self.seek_to(target);
    }

    /// Seek to an absolute position, clamped to the track length.
    ///
    /// The output is repositioned whatever the phase, so a resume after a
    /// paused seek continues from the new spot.
    pub fn seek_to(&mut self, target: Duration) {
        if self.state.cursor.is_none() {
            return;
        }
        let position = target.min(self.state.track_length);
        self.state.position = position;
        if let Err(e) = self.output.set_position(position) {
            debug!(error = %e, "output did not accept the new position");
        }
        self.clock.start(position, self.time.now());
        self.notify();
    }

    pub fn next_track(&mut self) {
        if let Some(next) = self.next_index() {
            self.play_track(next);
        }
    }

    pub fn prev_track(&mut self) {
        if let Some(prev) = self.prev_index() {
            self.play_track(prev);
        }
    }

    /// Periodic poll: refresh the position and handle the end of the track.
    pub fn on_tick(&mut self, now: Instant) {
        if self.state.phase != Phase::Playing || self.playlist.is_empty() {
            return;
        }

        self.state.position = self.clock.sample(now);

        // Unknown lengths never end on elapsed time; only a silent output ends them.
        let ended = if self.state.track_length.is_zero() {
            !self.output.is_busy()
        } else {
            self.state.position >= self.state.track_length
        };
        if !ended {
            return;
        }

        if self.state.repeat_one {
            if let Some(cursor) = self.state.cursor {
                info!(cursor, "repeating track");
                self.play_track(cursor);
            }
        } else if let Some(next) = self.next_index() {
            self.play_track(next);
        } else {
            info!("reached the end of the playlist");
            self.stop();
        }
    }

    /// Remove the track at `index`.
    ///
    /// Returns the index the selection should move to: the item now at
    /// `index`, or the new last item. `None` when the playlist is empty.
    pub fn delete_track(&mut self, index: usize) -> Option<usize> {
        let removed = self.playlist.remove(index)?;
        debug!(index, path = %removed.path.display(), "removed track");

        match self.state.cursor {
            Some(c) if c == index => {
                self.output.stop();
                self.state.phase = Phase::Stopped;
                self.state.position = Duration::ZERO;
                self.state.track_length = Duration::ZERO;
                self.clock.set_track_length(Duration::ZERO);
            }
            Some(c) if index < c => self.state.cursor = Some(c - 1),
            _ => {}
        }

        if self.playlist.is_empty() {
            self.reset_state();
            self.notify();
            return None;
        }

        let last = self.playlist.len() - 1;
        self.state.cursor = self.state.cursor.map(|c| c.min(last));
        self.notify();
        Some(index.min(last))
    }

    pub fn toggle_repeat(&mut self) {
        if self.playlist.is_empty() {
            return;
        }
        self.state.repeat_one = !self.state.repeat_one;
        self.notify();
    }

    /// Stop playback and empty the playlist.
    pub fn clear(&mut self) {
        self.output.stop();
        self.playlist.clear();
        self.state = PlaybackState::default();
        self.clock = PlaybackClock::new();
        self.notify();
    }

    /// Re-issue the current track on a freshly opened output at the current
    /// position, keeping the phase.
    pub fn reload_output(&mut self) {
        if self.state.phase == Phase::Stopped {
            return;
        }
        let Some(path) = self.current_track().map(|t| t.path.clone()) else {
            return;
        };

        let now = self.time.now();
        let position = self.current_position(now);
        let restarted = self
            .output
            .load(&path)
            .and_then(|()| self.output.play(position));
        match restarted {
            Ok(()) => {
                self.state.position = position;
                if self.state.phase == Phase::Paused {
                    self.output.pause();
                }
                self.clock.start(position, now);
            }
            Err(e) => {
                warn!(error = %e, "could not resume on the new output");
                self.output.stop();
                self.state.phase = Phase::Stopped;
                self.state.position = Duration::ZERO;
            }
        }
        self.notify();
    }

    fn current_position(&self, now: Instant) -> Duration {
        match self.state.phase {
            Phase::Playing => self.clock.sample(now),
            Phase::Paused | Phase::Stopped => self.state.position,
        }
    }

    fn next_index(&self) -> Option<usize> {
        let len = self.playlist.len();
        if len == 0 {
            return None;
        }
        let current = self.state.cursor.unwrap_or(0).min(len - 1);
        match self.policy {
            BoundaryPolicy::Wrap => Some((current + 1) % len),
            BoundaryPolicy::Clamp => (current + 1 < len).then_some(current + 1),
        }
    }

    fn prev_index(&self) -> Option<usize> {
        let len = self.playlist.len();
        if len == 0 {
            return None;
        }
        let current = self.state.cursor.unwrap_or(0).min(len - 1);
        match self.policy {
            BoundaryPolicy::Wrap => Some((current + len - 1) % len),
            BoundaryPolicy::Clamp => current.checked_sub(1),
        }
    }

    // Empty-playlist defaults; repeat-one survives a delete, only `clear` resets it.
    fn reset_state(&mut self) {
        self.state = PlaybackState {
            repeat_one: self.state.repeat_one,
            ..PlaybackState::default()
        };
        self.clock = PlaybackClock::new();
    }

    fn notify(&self) {
        let track = self.current_track();
        for observer in &self.observers {
            observer.playback_changed(&self.state, track);
        }
    }
}
