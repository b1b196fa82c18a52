use std::env;
use std::path::PathBuf;
use std::sync::mpsc;

use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode, window_size,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::audio::RodioOutput;
use crate::mpris::ControlCmd;
use crate::settings::{AudioState, PersistedSettings, SettingsStore, WindowState};

mod event_loop;
mod logging;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, fallback) = settings::load_settings();
    logging::init(&settings);
    settings::report_fallback(fallback.as_deref());
    info!("starting spindle");

    let store = SettingsStore::new(settings.settings_path());
    let saved = store.load();

    let output = RodioOutput::open(&saved.audio.device_name)?;
    let mut app = startup::build_app(&settings, &saved, output);
    if let Some(reason) = fallback {
        app.set_status(reason);
    }

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);
    app.transport.subscribe(Box::new(mpris));

    let args: Vec<PathBuf> = env::args_os().skip(1).map(PathBuf::from).collect();
    startup::queue_initial_imports(&mut app, &saved, args);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableBracketedPaste,
        EnableMouseCapture
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut app, &control_rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(e) = store.save(&persisted(&app, &saved)) {
        warn!(error = %e, "could not save settings");
    }
    info!("exiting");

    run_result
}

/// Snapshot what the next session restores.
fn persisted(app: &App, saved: &PersistedSettings) -> PersistedSettings {
    let window = window_size()
        .ok()
        .filter(|w| w.width > 0 && w.height > 0)
        .map(|w| WindowState {
            width: u32::from(w.width),
            height: u32::from(w.height),
        })
        .unwrap_or(saved.window);

    // Files still waiting in the import queue belong to the playlist too.
    let mut playlist = app.playlist_paths();
    playlist.extend(app.imports.iter().map(|p| p.to_path_buf()));

    PersistedSettings {
        window,
        audio: AudioState {
            device_name: app.device_name.clone(),
        },
        columns: app.columns,
        playlist,
    }
}
