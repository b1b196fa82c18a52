use std::collections::HashMap;
use std::sync::{Arc, Mutex, mpsc::Sender};
use std::time::{Duration, Instant};

use async_io::{Timer, block_on};
use tracing::{debug, info, warn};
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedObjectPath, OwnedValue, Value};

use crate::library::Track;
use crate::playback::{Phase, PlaybackObserver, PlaybackState};

const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
const BUS_NAME: &str = "org.mpris.MediaPlayer2.spindle";

/// Requests from the desktop, handled by the event loop.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Prev,
    /// Relative seek in microseconds.
    Seek(i64),
    /// Absolute position in microseconds.
    SetPosition(i64),
}

#[derive(Debug, Default)]
struct SharedState {
    phase: Phase,
    title: Option<String>,
    artist: Option<String>,
    length_micros: Option<i64>,
    track_id: Option<OwnedObjectPath>,
    position: Duration,
    /// When `position` was sampled; the property extrapolates while playing.
    sampled_at: Option<Instant>,
}

impl SharedState {
    fn position_at(&self, now: Instant) -> Duration {
        let mut pos = self.position;
        if self.phase == Phase::Playing {
            if let Some(at) = self.sampled_at {
                pos += now.saturating_duration_since(at);
            }
        }
        match self.length_micros {
            Some(len) => pos.min(Duration::from_micros(len.max(0) as u64)),
            None => pos,
        }
    }
}

/// The event-loop side of the MPRIS service: keeps the published state in
/// step with the transport.
pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
}

impl MprisHandle {
    fn update(&self, playback: &PlaybackState, track: Option<&Track>) {
        let Ok(mut s) = self.state.lock() else {
            return;
        };
        s.phase = playback.phase;
        s.position = playback.position;
        s.sampled_at = Some(Instant::now());

        match (playback.active_index(), track) {
            (Some(index), Some(track)) => {
                s.title = Some(track.title.clone());
                s.artist = Some(track.artist.clone());
                s.length_micros = track
                    .has_duration()
                    .then(|| track.duration.as_micros().min(i64::MAX as u128) as i64);
                s.track_id = ObjectPath::try_from(format!("{OBJECT_PATH}/track/{index}"))
                    .ok()
                    .map(OwnedObjectPath::from);
            }
            _ => {
                s.title = None;
                s.artist = None;
                s.length_micros = None;
                s.track_id = None;
            }
        }
    }
}

impl PlaybackObserver for MprisHandle {
    fn playback_changed(&self, state: &PlaybackState, track: Option<&Track>) {
        self.update(state, track);
    }
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {}

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "spindle"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec!["file".to_string()]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec!["audio/mpeg".to_string()]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(ControlCmd::Prev);
    }

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    fn seek(&self, offset: i64) {
        let _ = self.tx.send(ControlCmd::Seek(offset));
    }

    fn set_position(&self, track_id: ObjectPath<'_>, position: i64) {
        let current = self.state.lock().ok().and_then(|s| s.track_id.clone());
        // Requests for a track that is no longer current are ignored.
        if current.as_ref().map(|p| p.as_str()) == Some(track_id.as_str()) && position >= 0 {
            let _ = self.tx.send(ControlCmd::SetPosition(position));
        }
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        match s.phase {
            Phase::Stopped => "Stopped",
            Phase::Playing => "Playing",
            Phase::Paused => "Paused",
        }
    }

    #[zbus(property)]
    fn position(&self) -> i64 {
        self.state
            .lock()
            .map(|s| s.position_at(Instant::now()).as_micros().min(i64::MAX as u128) as i64)
            .unwrap_or(0)
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        let mut insert = |key: &str, value: Value<'_>| {
            if let Ok(v) = OwnedValue::try_from(value) {
                map.insert(key.to_string(), v);
            }
        };

        if let Some(id) = &s.track_id {
            insert("mpris:trackid", Value::from(id.clone().into_inner()));
        }
        if let Some(title) = &s.title {
            insert("xesam:title", Value::from(title.as_str()));
        }
        if let Some(artist) = &s.artist {
            insert("xesam:artist", Value::from(vec![artist.as_str()]));
        }
        if let Some(len) = s.length_micros {
            insert("mpris:length", Value::from(len));
        }
        map
    }
}

/// Start the MPRIS service on a background thread. Failures are logged and
/// the player carries on without media-key support.
pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        block_on(async move {
            let connection = match Connection::session().await {
                Ok(c) => c,
                Err(e) => {
                    warn!(error = %e, "MPRIS: no session bus");
                    return;
                }
            };

            if let Err(e) = connection.request_name(BUS_NAME).await {
                warn!(error = %e, "MPRIS: failed to acquire name");
                return;
            }

            let object_server = connection.object_server();

            if let Err(e) = object_server
                .at(OBJECT_PATH, RootIface { tx: tx.clone() })
                .await
            {
                warn!(error = %e, "MPRIS: failed to register root iface");
                return;
            }

            if let Err(e) = object_server
                .at(
                    OBJECT_PATH,
                    PlayerIface {
                        tx,
                        state: state_for_thread,
                    },
                )
                .await
            {
                warn!(error = %e, "MPRIS: failed to register player iface");
                return;
            }
            info!(name = BUS_NAME, "MPRIS service registered");

            // Keep the service alive.
            loop {
                Timer::after(Duration::from_secs(3600)).await;
                debug!("MPRIS service idle");
            }
        });
    });

    MprisHandle { state }
}

#[cfg(test)]
mod tests;
