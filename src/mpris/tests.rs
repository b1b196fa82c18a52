use super::*;
use crate::library::TrackMetadata;
use std::path::Path;
use std::sync::mpsc;

fn make_track() -> Track {
    Track::new(
        Path::new("/tmp/music/test.mp3"),
        TrackMetadata {
            title: Some("Test Title".to_string()),
            artist: Some("Test Artist".to_string()),
            track_number: Some(3),
            duration: Some(Duration::from_micros(1_234_567)),
        },
    )
}

fn playing_at(cursor: usize) -> PlaybackState {
    PlaybackState {
        cursor: Some(cursor),
        phase: Phase::Playing,
        position: Duration::from_secs(1),
        track_length: Duration::from_micros(1_234_567),
        repeat_one: false,
    }
}

fn iface(state: &Arc<Mutex<SharedState>>) -> (PlayerIface, mpsc::Receiver<ControlCmd>) {
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    (
        PlayerIface {
            tx,
            state: state.clone(),
        },
        rx,
    )
}

#[test]
fn observer_sets_and_clears_shared_state() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let handle = MprisHandle {
        state: state.clone(),
    };

    let track = make_track();
    handle.playback_changed(&playing_at(7), Some(&track));
    {
        let s = state.lock().unwrap();
        assert_eq!(s.phase, Phase::Playing);
        assert_eq!(s.title.as_deref(), Some("Test Title"));
        assert_eq!(s.artist.as_deref(), Some("Test Artist"));
        assert_eq!(s.length_micros, Some(1_234_567));
        assert_eq!(
            s.track_id.as_ref().map(|p| p.as_str()),
            Some("/org/mpris/MediaPlayer2/track/7")
        );
    }

    // Stopped on a track publishes no metadata.
    let stopped = PlaybackState {
        phase: Phase::Stopped,
        ..playing_at(7)
    };
    handle.playback_changed(&stopped, Some(&track));
    {
        let s = state.lock().unwrap();
        assert_eq!(s.phase, Phase::Stopped);
        assert_eq!(s.title, None);
        assert_eq!(s.artist, None);
        assert_eq!(s.length_micros, None);
        assert!(s.track_id.is_none());
    }
}

#[test]
fn playback_status_maps_phase_to_mpris_strings() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (iface, _rx) = iface(&state);

    assert_eq!(iface.playback_status(), "Stopped");
    state.lock().unwrap().phase = Phase::Playing;
    assert_eq!(iface.playback_status(), "Playing");
    state.lock().unwrap().phase = Phase::Paused;
    assert_eq!(iface.playback_status(), "Paused");
}

#[test]
fn metadata_includes_expected_keys_when_present() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let handle = MprisHandle {
        state: state.clone(),
    };
    handle.playback_changed(&playing_at(1), Some(&make_track()));
    let (iface, _rx) = iface(&state);

    let map = iface.metadata();
    for k in ["mpris:trackid", "xesam:title", "xesam:artist", "mpris:length"] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
}

#[test]
fn metadata_is_empty_when_nothing_is_playing() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (iface, _rx) = iface(&state);
    assert!(iface.metadata().is_empty());
}

#[test]
fn paused_position_does_not_advance() {
    let now = Instant::now();
    let s = SharedState {
        phase: Phase::Paused,
        position: Duration::from_secs(4),
        sampled_at: Some(now),
        length_micros: Some(10_000_000),
        ..SharedState::default()
    };
    assert_eq!(s.position_at(now + Duration::from_secs(30)), Duration::from_secs(4));
}

#[test]
fn playing_position_extrapolates_up_to_length() {
    let now = Instant::now();
    let s = SharedState {
        phase: Phase::Playing,
        position: Duration::from_secs(4),
        sampled_at: Some(now),
        length_micros: Some(10_000_000),
        ..SharedState::default()
    };
    assert_eq!(s.position_at(now + Duration::from_secs(2)), Duration::from_secs(6));
    assert_eq!(s.position_at(now + Duration::from_secs(60)), Duration::from_secs(10));
}

#[test]
fn methods_forward_commands() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (iface, rx) = iface(&state);

    iface.play_pause();
    iface.next();
    iface.previous();
    iface.seek(-5_000_000);

    let got: Vec<ControlCmd> = rx.try_iter().collect();
    assert_eq!(
        got,
        vec![
            ControlCmd::PlayPause,
            ControlCmd::Next,
            ControlCmd::Prev,
            ControlCmd::Seek(-5_000_000)
        ]
    );
}

#[test]
fn set_position_ignores_stale_track_ids() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let handle = MprisHandle {
        state: state.clone(),
    };
    handle.playback_changed(&playing_at(2), Some(&make_track()));
    let (iface, rx) = iface(&state);

    let stale = ObjectPath::try_from("/org/mpris/MediaPlayer2/track/9").unwrap();
    iface.set_position(stale, 1_000);
    let current = ObjectPath::try_from("/org/mpris/MediaPlayer2/track/2").unwrap();
    iface.set_position(current, 1_000);

    let got: Vec<ControlCmd> = rx.try_iter().collect();
    assert_eq!(got, vec![ControlCmd::SetPosition(1_000)]);
}
