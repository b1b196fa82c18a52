//! Playback core: the wall-clock position estimate and the transport state
//! machine that owns the playlist cursor and end-of-track policy.

mod clock;
mod state;
mod transport;

pub use clock::{PlaybackClock, TimeSource, WallClock};
pub use state::{BoundaryPolicy, Phase, PlaybackObserver, PlaybackState};
pub use transport::TransportController;
