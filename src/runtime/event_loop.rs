use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use tracing::{debug, info, warn};

use crate::app::{App, Mode};
use crate::audio::{describe_device, output_device_names};
use crate::config;
use crate::mpris::ControlCmd;
use crate::playback::Phase;
use crate::ui;

/// Main terminal event loop: ticks the transport, drains imports, draws the
/// UI and handles input and MPRIS commands. Returns `Ok(())` when shutdown is
/// requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    control_rx: &mpsc::Receiver<ControlCmd>,
) -> Result<(), Box<dyn std::error::Error>> {
    let tick = Duration::from_millis(settings.playback.tick_ms);

    loop {
        app.transport.on_tick(Instant::now());
        let importing = app.import_next();

        let screen = terminal.draw(|f| ui::draw(f, app))?.area;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, app) {
                return Ok(());
            }
        }

        // Keep draining the import queue without waiting a whole tick.
        let timeout = if importing { Duration::ZERO } else { tick };
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if handle_key_event(key, app) {
                        return Ok(());
                    }
                }
                Event::Paste(text) => {
                    app.import_pasted(&text);
                }
                Event::Mouse(mouse) => handle_mouse_event(mouse, app, screen),
                _ => {}
            }
        }
    }
}

fn handle_control_cmd(cmd: ControlCmd, app: &mut App) -> bool {
    debug!(?cmd, "MPRIS command");
    let phase = app.transport.state().phase;
    match cmd {
        ControlCmd::Quit => return true,
        ControlCmd::Play => {
            if phase != Phase::Playing {
                app.transport.toggle_play_pause();
            }
        }
        ControlCmd::Pause => {
            if phase == Phase::Playing {
                app.transport.toggle_play_pause();
            }
        }
        ControlCmd::PlayPause => app.transport.toggle_play_pause(),
        ControlCmd::Stop => app.transport.stop(),
        ControlCmd::Next => app.transport.next_track(),
        ControlCmd::Prev => app.transport.prev_track(),
        ControlCmd::Seek(offset_micros) => app.transport.seek_by_micros(offset_micros),
        ControlCmd::SetPosition(micros) => {
            app.transport
                .seek_to(Duration::from_micros(micros.max(0) as u64));
        }
    }
    false
}

/// Returns `true` when the user asked to quit.
fn handle_key_event(key: KeyEvent, app: &mut App) -> bool {
    match &mut app.mode {
        Mode::Normal => {}
        Mode::DevicePicker { .. } => {
            handle_picker_key(key, app);
            return false;
        }
        Mode::AddPath { input } => {
            match key.code {
                KeyCode::Esc => app.cancel_popup(),
                KeyCode::Enter => app.submit_add_path(),
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Char(c) if !c.is_control() => input.push(c),
                _ => {}
            }
            return false;
        }
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let small = i64::from(app.controls.seek_small_secs);
    let large = i64::from(app.controls.seek_large_secs);

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Enter => app.activate_selected(),
        KeyCode::Char(' ') | KeyCode::Char('p') => app.transport.toggle_play_pause(),
        KeyCode::Left if ctrl => app.seek(-large),
        KeyCode::Right if ctrl => app.seek(large),
        KeyCode::Left => app.seek(-small),
        KeyCode::Right => app.seek(small),
        KeyCode::Char('H') => app.seek(-large),
        KeyCode::Char('L') => app.seek(large),
        KeyCode::Char('n') => app.transport.next_track(),
        KeyCode::Char('b') => app.transport.prev_track(),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Delete | KeyCode::Char('x') => app.delete_selected(),
        KeyCode::Char('r') => app.transport.toggle_repeat(),
        KeyCode::Char('C') => app.clear_playlist(),
        KeyCode::Char('d') => app.open_device_picker(output_device_names()),
        KeyCode::Char('a') => app.open_add_path(),
        KeyCode::Char('[') => app.narrow_title_column(),
        KeyCode::Char(']') => app.widen_title_column(),
        _ => {}
    }
    false
}

fn handle_picker_key(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.cancel_popup(),
        KeyCode::Up | KeyCode::Char('k') => app.picker_move(false),
        KeyCode::Down | KeyCode::Char('j') => app.picker_move(true),
        KeyCode::Enter => {
            if let Some(name) = app.take_picked_device() {
                switch_device(app, &name);
            }
        }
        _ => {}
    }
}

/// Reopen the output on `name` (empty for the default) and resume whatever
/// was loaded.
fn switch_device(app: &mut App, name: &str) {
    match app.transport.output_mut().switch_device(name) {
        Ok(in_use) => {
            if in_use.is_none() && !name.is_empty() {
                app.set_status(format!("{name} unavailable, using the default device"));
            } else {
                app.set_status("Output device changed");
            }
            info!(requested = name, in_use = ?in_use, "switched output device");
            app.device_name = in_use.clone().unwrap_or_default();
            app.device_info = describe_device(in_use.as_deref());
        }
        Err(e) => {
            warn!(error = %e, "could not switch output device");
            app.set_status(format!("Could not switch output device: {e}"));
        }
    }
    app.transport.reload_output();
}

fn handle_mouse_event(mouse: MouseEvent, app: &mut App, screen: Rect) {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) || app.mode != Mode::Normal {
        return;
    }
    let gauge = ui::gauge_area(screen);
    let inside = mouse.row == gauge.y
        && mouse.column >= gauge.x
        && mouse.column < gauge.x + gauge.width;
    if inside && gauge.width > 0 {
        let fraction = f64::from(mouse.column - gauge.x) / f64::from(gauge.width);
        app.seek_to_fraction(fraction);
    }
}
