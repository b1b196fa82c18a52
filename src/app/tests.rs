use super::*;
use crate::audio::AudioOutput;
use crate::config::{ControlsSettings, LibrarySettings};
use crate::error::{AudioError, MetadataError};
use crate::library::{ImportQueue, MetadataReader, Track, TrackMetadata};
use crate::playback::{BoundaryPolicy, Phase, TransportController, WallClock};
use crate::settings::ColumnWidths;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;

struct SilentOutput;

impl AudioOutput for SilentOutput {
    fn load(&mut self, _path: &Path) -> Result<(), AudioError> {
        Ok(())
    }
    fn play(&mut self, _start: Duration) -> Result<(), AudioError> {
        Ok(())
    }
    fn pause(&mut self) {}
    fn resume(&mut self) {}
    fn stop(&mut self) {}
    fn set_position(&mut self, _position: Duration) -> Result<(), AudioError> {
        Ok(())
    }
    fn is_busy(&self) -> bool {
        true
    }
}

struct TitleReader;

impl MetadataReader for TitleReader {
    fn read(&self, path: &Path) -> Result<TrackMetadata, MetadataError> {
        Ok(TrackMetadata {
            title: path.file_stem().map(|s| s.to_string_lossy().to_uppercase()),
            duration: Some(Duration::from_secs(100)),
            ..TrackMetadata::default()
        })
    }
}

fn app_with(titles: &[&str]) -> App<SilentOutput> {
    let transport =
        TransportController::new(SilentOutput, WallClock, BoundaryPolicy::Wrap);
    let mut app = App::new(
        transport,
        ImportQueue::new(&LibrarySettings::default()),
        Box::new(TitleReader),
        ControlsSettings::default(),
        ColumnWidths::default(),
    );
    for t in titles {
        app.transport.add_track(Track::new(
            Path::new(&format!("/music/{t}.mp3")),
            TrackMetadata {
                title: Some(t.to_string()),
                duration: Some(Duration::from_secs(100)),
                ..TrackMetadata::default()
            },
        ));
    }
    app
}

#[test]
fn selection_is_clamped_to_the_playlist() {
    let mut app = app_with(&["a", "b", "c"]);
    app.select_prev();
    assert_eq!(app.selected, 0);
    app.select_next();
    app.select_next();
    app.select_next();
    assert_eq!(app.selected, 2);

    let mut empty = app_with(&[]);
    empty.select_next();
    assert_eq!(empty.selected, 0);
}

#[test]
fn enter_plays_selected_and_stops_the_active_row() {
    let mut app = app_with(&["a", "b"]);
    app.select_next();
    app.activate_selected();
    assert_eq!(app.transport.state().phase, Phase::Playing);
    assert_eq!(app.transport.state().cursor, Some(1));

    app.activate_selected();
    assert_eq!(app.transport.state().phase, Phase::Stopped);
    assert_eq!(app.transport.state().cursor, Some(1));

    app.select_prev();
    app.activate_selected();
    assert_eq!(app.transport.state().cursor, Some(0));
}

#[test]
fn enter_is_ignored_while_importing() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("new.mp3"), b"x").unwrap();

    let mut app = app_with(&["a"]);
    assert_eq!(app.enqueue_paths(vec![dir.path().to_path_buf()]), 1);
    app.activate_selected();
    assert_eq!(app.transport.state().phase, Phase::Stopped);
    assert_eq!(app.status.as_deref(), Some("Import in progress"));

    assert!(app.import_next());
    assert!(!app.import_next());
    app.activate_selected();
    assert_eq!(app.transport.state().phase, Phase::Playing);
}

#[test]
fn import_reads_metadata_and_skips_duplicates() {
    let dir = tempdir().unwrap();
    let path = dir.path().canonicalize().unwrap().join("song.mp3");
    fs::write(&path, b"x").unwrap();

    let mut app = app_with(&[]);
    app.enqueue_paths(vec![path.clone(), path.clone()]);
    while app.import_next() {}

    assert_eq!(app.transport.playlist().len(), 1);
    let track = app.transport.playlist().get(0).unwrap();
    assert_eq!(track.title, "SONG");
    assert_eq!(track.path, path);
    assert_eq!(app.transport.state().cursor, Some(0));
    assert_eq!(app.status.as_deref(), Some("1 track(s) in playlist"));
}

#[test]
fn pasted_text_is_imported() {
    let dir = tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    let a = root.join("one song.mp3");
    let b = root.join("two.mp3");
    fs::write(&a, b"x").unwrap();
    fs::write(&b, b"x").unwrap();

    let mut app = app_with(&[]);
    let text = format!("{}\n{}\n", a.display(), b.display());
    assert_eq!(app.import_pasted(&text), 2);
    while app.import_next() {}
    assert_eq!(app.playlist_paths(), vec![a, b]);
}

#[test]
fn add_path_prompt_submits_and_closes() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("x.mp3"), b"x").unwrap();

    let mut app = app_with(&[]);
    app.open_add_path();
    if let Mode::AddPath { input } = &mut app.mode {
        input.push_str(&dir.path().display().to_string());
    }
    app.submit_add_path();
    assert_eq!(app.mode, Mode::Normal);
    assert_eq!(app.imports.len(), 1);

    app.open_add_path();
    app.submit_add_path();
    assert_eq!(app.imports.len(), 1);
    assert!(app.status.as_deref().unwrap().starts_with("Nothing to import"));
}

#[test]
fn delete_moves_selection_to_neighbour() {
    let mut app = app_with(&["a", "b", "c"]);
    app.selected = 2;
    app.delete_selected();
    assert_eq!(app.selected, 1);
    app.selected = 0;
    app.delete_selected();
    assert_eq!(app.selected, 0);
    assert_eq!(app.transport.playlist().get(0).unwrap().title, "b");
    app.delete_selected();
    assert_eq!(app.selected, 0);
    assert!(!app.has_tracks());
    app.delete_selected();
    assert_eq!(app.selected, 0);
}

#[test]
fn clear_empties_playlist_and_pending_imports() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("x.mp3"), b"x").unwrap();

    let mut app = app_with(&["a", "b"]);
    app.enqueue_paths(vec![dir.path().to_path_buf()]);
    app.selected = 1;
    app.clear_playlist();
    assert!(!app.has_tracks());
    assert!(!app.imports.is_busy());
    assert_eq!(app.selected, 0);
    assert_eq!(app.transport.state().cursor, None);
}

#[test]
fn gauge_click_seeks_to_fraction() {
    let mut app = app_with(&["a"]);
    // Nothing loaded yet, so the length is unknown.
    app.seek_to_fraction(0.5);
    assert_eq!(app.transport.state().position, Duration::ZERO);

    app.activate_selected();
    app.seek_to_fraction(0.5);
    assert_eq!(app.transport.state().position, Duration::from_secs(50));
    app.seek_to_fraction(1.7);
    assert_eq!(app.transport.state().position, Duration::from_secs(100));
    app.seek(-30);
    assert!(app.transport.state().position <= Duration::from_secs(70));
}

#[test]
fn device_picker_offers_default_first_and_returns_choice() {
    let mut app = app_with(&[]);
    app.device_name = "DAC".to_string();
    app.open_device_picker(vec!["Speakers".to_string(), "DAC".to_string()]);
    assert_eq!(app.mode, Mode::DevicePicker { index: 2 });
    assert_eq!(app.devices[0], DEFAULT_DEVICE_LABEL);

    app.picker_move(true);
    assert_eq!(app.mode, Mode::DevicePicker { index: 2 });
    app.picker_move(false);
    assert_eq!(app.take_picked_device().as_deref(), Some("Speakers"));
    assert_eq!(app.mode, Mode::Normal);

    app.open_device_picker(vec!["Speakers".to_string()]);
    app.picker_move(false);
    app.picker_move(false);
    assert_eq!(app.take_picked_device().as_deref(), Some(""));
    assert_eq!(app.take_picked_device(), None);
}

#[test]
fn title_column_steps_by_configured_amount() {
    let mut app = app_with(&[]);
    app.widen_title_column();
    assert_eq!(app.columns.title_width, 410);
    app.narrow_title_column();
    app.narrow_title_column();
    assert_eq!(app.columns.title_width, 390);
}

#[test]
fn now_playing_label_tracks_phase() {
    let mut app = app_with(&["a"]);
    assert_eq!(app.now_playing_label(), "Not playing");
    app.activate_selected();
    assert_eq!(app.now_playing_label(), "Unknown Artist - a");
}
