//! Application model types: `App` and the input `Mode`.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::audio::{AudioOutput, DeviceInfo, RodioOutput};
use crate::config::ControlsSettings;
use crate::library::{ImportQueue, MetadataReader, load_track, parse_dropped_paths};
use crate::playback::{Phase, TimeSource, TransportController, WallClock};
use crate::settings::ColumnWidths;

/// What keyboard input currently drives.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// Choosing an output device; `index` is into `App::devices`.
    DevicePicker { index: usize },
    /// Typing a file or directory path to import.
    AddPath { input: String },
}

/// The main application model.
pub struct App<A: AudioOutput = RodioOutput, T: TimeSource = WallClock> {
    pub transport: TransportController<A, T>,
    /// Highlighted playlist row.
    pub selected: usize,
    pub mode: Mode,
    pub imports: ImportQueue,
    reader: Box<dyn MetadataReader>,
    pub controls: ControlsSettings,
    pub columns: ColumnWidths,

    /// Device names offered by the picker; the first entry is the default.
    pub devices: Vec<String>,
    /// Persisted device selection; empty is the system default.
    pub device_name: String,
    pub device_info: Option<DeviceInfo>,

    /// One-line message under the header (fallbacks, import progress).
    pub status: Option<String>,
}

/// Label used for the system default device in the picker.
pub const DEFAULT_DEVICE_LABEL: &str = "System default";

impl<A: AudioOutput, T: TimeSource> App<A, T> {
    pub fn new(
        transport: TransportController<A, T>,
        imports: ImportQueue,
        reader: Box<dyn MetadataReader>,
        controls: ControlsSettings,
        columns: ColumnWidths,
    ) -> Self {
        Self {
            transport,
            selected: 0,
            mode: Mode::Normal,
            imports,
            reader,
            controls,
            columns,
            devices: Vec::new(),
            device_name: String::new(),
            device_info: None,
            status: None,
        }
    }

    pub fn has_tracks(&self) -> bool {
        !self.transport.playlist().is_empty()
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
    }

    /// Move the selection up one row, stopping at the top.
    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Move the selection down one row, stopping at the bottom.
    pub fn select_next(&mut self) {
        let len = self.transport.playlist().len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    /// Play the selected row, or stop it when it is the active row.
    ///
    /// Ignored while an import is still running.
    pub fn activate_selected(&mut self) {
        if self.imports.is_busy() {
            self.set_status("Import in progress");
            return;
        }
        if !self.has_tracks() {
            return;
        }
        if self.transport.state().active_index() == Some(self.selected) {
            self.transport.stop();
        } else {
            self.transport.play_track(self.selected);
        }
    }

    pub fn delete_selected(&mut self) {
        if !self.has_tracks() {
            return;
        }
        self.selected = self.transport.delete_track(self.selected).unwrap_or(0);
    }

    pub fn clear_playlist(&mut self) {
        self.imports.clear();
        self.transport.clear();
        self.selected = 0;
        self.set_status("Playlist cleared");
    }

    /// Seek by whole seconds, negative for backwards.
    pub fn seek(&mut self, secs: i64) {
        self.transport.seek_by(secs);
    }

    /// Seek to `fraction` (0..=1) of the current track, as a click on the
    /// progress gauge does.
    pub fn seek_to_fraction(&mut self, fraction: f64) {
        let length = self.transport.state().track_length;
        if length.is_zero() {
            return;
        }
        self.transport.seek_to(length.mul_f64(fraction.clamp(0.0, 1.0)));
    }

    pub fn widen_title_column(&mut self) {
        self.columns.adjust_title(i32::from(self.controls.column_step));
    }

    pub fn narrow_title_column(&mut self) {
        self.columns.adjust_title(-i32::from(self.controls.column_step));
    }

    /// Queue a batch of paths for import. Returns how many files were queued.
    pub fn enqueue_paths(&mut self, paths: Vec<PathBuf>) -> usize {
        let queued = self.imports.enqueue(paths);
        if queued > 0 {
            info!(queued, "queued files for import");
            self.set_status(format!("Importing {queued} file(s)"));
        }
        queued
    }

    /// Import whatever a paste (terminal drag-and-drop) delivered.
    pub fn import_pasted(&mut self, text: &str) -> usize {
        let paths = parse_dropped_paths(text);
        debug!(candidates = paths.len(), "paste received");
        self.enqueue_paths(paths)
    }

    /// Read and append the next queued file. Returns `false` when the queue
    /// was empty.
    pub fn import_next(&mut self) -> bool {
        let Some(path) = self.imports.pop_next() else {
            return false;
        };
        let track = load_track(self.reader.as_ref(), &path);
        if !self.transport.add_track(track) {
            debug!(path = %path.display(), "already in playlist");
        }
        if !self.imports.is_busy() {
            let total = self.transport.playlist().len();
            self.set_status(format!("{total} track(s) in playlist"));
        }
        true
    }

    pub fn open_add_path(&mut self) {
        self.mode = Mode::AddPath {
            input: String::new(),
        };
    }

    /// Submit the add-path prompt and return to normal mode.
    pub fn submit_add_path(&mut self) {
        let Mode::AddPath { input } = std::mem::take(&mut self.mode) else {
            return;
        };
        if self.import_pasted(&input) == 0 {
            self.set_status(format!("Nothing to import at {}", input.trim()));
        }
    }

    /// Open the device picker over `devices`, highlighting the current one.
    pub fn open_device_picker(&mut self, devices: Vec<String>) {
        let mut list = Vec::with_capacity(devices.len() + 1);
        list.push(DEFAULT_DEVICE_LABEL.to_string());
        list.extend(devices);

        let index = list
            .iter()
            .skip(1)
            .position(|d| *d == self.device_name)
            .map(|i| i + 1)
            .unwrap_or(0);
        self.devices = list;
        self.mode = Mode::DevicePicker { index };
    }

    pub fn picker_move(&mut self, down: bool) {
        let len = self.devices.len();
        if let Mode::DevicePicker { index } = &mut self.mode {
            if down {
                *index = (*index + 1).min(len.saturating_sub(1));
            } else {
                *index = index.saturating_sub(1);
            }
        }
    }

    /// Close the picker and return the chosen device name (empty for the
    /// default). `None` when the picker was not open.
    pub fn take_picked_device(&mut self) -> Option<String> {
        let Mode::DevicePicker { index } = std::mem::take(&mut self.mode) else {
            return None;
        };
        match index {
            0 => Some(String::new()),
            i => self.devices.get(i).cloned(),
        }
    }

    pub fn cancel_popup(&mut self) {
        self.mode = Mode::Normal;
    }

    /// Title shown in the now-playing box.
    pub fn now_playing_label(&self) -> String {
        let state = self.transport.state();
        match (state.phase, self.transport.current_track()) {
            (Phase::Stopped, _) | (_, None) => "Not playing".to_string(),
            (_, Some(t)) => format!("{} - {}", t.artist, t.title),
        }
    }

    /// The playlist paths, for persisting.
    pub fn playlist_paths(&self) -> Vec<PathBuf> {
        self.transport.playlist().paths()
    }
}
