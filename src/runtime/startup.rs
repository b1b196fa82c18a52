use std::path::PathBuf;

use tracing::{info, warn};

use crate::app::App;
use crate::audio::{RodioOutput, describe_device};
use crate::config;
use crate::library::{ImportQueue, LoftyReader};
use crate::playback::{TransportController, WallClock};
use crate::settings::PersistedSettings;

/// Build the `App` from config and the restored settings document.
pub fn build_app(
    settings: &config::Settings,
    saved: &PersistedSettings,
    output: RodioOutput,
) -> App {
    let mut transport =
        TransportController::new(output, WallClock, settings.playback.boundary.into());
    transport.set_repeat_one(settings.playback.repeat_one);

    let mut app = App::new(
        transport,
        ImportQueue::new(&settings.library),
        Box::new(LoftyReader),
        settings.controls.clone(),
        saved.columns,
    );

    let in_use = app.transport.output().device_name().map(str::to_string);
    let wanted = saved.audio.device_name.trim();
    if !wanted.is_empty() && in_use.is_none() {
        warn!(device = wanted, "saved output device unavailable");
        app.set_status(format!("{wanted} unavailable, using the default device"));
    }
    app.device_name = in_use.clone().unwrap_or_default();
    app.device_info = describe_device(in_use.as_deref());
    app
}

/// Queue the restored playlist followed by the command-line paths.
pub fn queue_initial_imports(app: &mut App, saved: &PersistedSettings, args: Vec<PathBuf>) {
    let restored = app.enqueue_paths(saved.playlist.clone());
    let from_args = app.enqueue_paths(args);
    info!(restored, from_args, "initial imports queued");
}
