//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{
        Block, Borders, Cell, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Row,
        Table, TableState, Wrap,
    },
};
use std::{collections::BTreeMap, sync::LazyLock, time::Duration};

use crate::app::{App, Mode};
use crate::audio::AudioOutput;
use crate::config::ControlsSettings;
use crate::playback::{Phase, TimeSource};

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("j/k".to_string(), "up/down".to_string());
    map.insert("enter".to_string(), "play/stop selected".to_string());
    map.insert("space/p".to_string(), "play/pause".to_string());
    map.insert("b/n".to_string(), "prev/next song".to_string());
    // Seek keys are filled dynamically from config.
    map.insert("x".to_string(), "delete".to_string());
    map.insert("C".to_string(), "clear".to_string());
    map.insert("r".to_string(), "repeat one".to_string());
    map.insert("a".to_string(), "add path".to_string());
    map.insert("d".to_string(), "device".to_string());
    map.insert("[/]".to_string(), "title width".to_string());
    map.insert("q".to_string(), "quit".to_string());
    map
});

/// Render the controls help text, incorporating the seek steps.
fn controls_text(controls: &ControlsSettings) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = [
        "j/k", "enter", "space/p", "b/n", "←/→", "H/L", "r", "x", "C", "a", "d", "[/]", "q",
    ];
    order
        .iter()
        .filter_map(|k| match *k {
            "←/→" => Some(format!("[←/→] seek -/+{}s", controls.seek_small_secs)),
            "H/L" => Some(format!("[H/L] seek -/+{}s", controls.seek_large_secs)),
            _ => CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v)),
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
pub fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Playlist "Time" column: `MM:SS`, or `--:--` when unknown.
fn format_track_time(d: Duration) -> String {
    if d.is_zero() {
        "--:--".to_string()
    } else {
        format_mmss(d)
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    // Keep the popup smaller and avoid covering the entire UI.
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(3);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// The screen regions, top to bottom.
struct Areas {
    header: Rect,
    playlist: Rect,
    now_playing: Rect,
    footer: Rect,
}

fn split(area: Rect) -> Areas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(3),
            Constraint::Length(4),
            Constraint::Length(4),
        ])
        .split(area);
    Areas {
        header: chunks[0],
        playlist: chunks[1],
        now_playing: chunks[2],
        footer: chunks[3],
    }
}

fn now_playing_block() -> Block<'static> {
    Block::default().borders(Borders::ALL).title(" now playing ")
}

/// Where the progress gauge is drawn for a terminal of size `area`; mouse
/// clicks inside it seek.
pub fn gauge_area(area: Rect) -> Rect {
    let inner = now_playing_block().inner(split(area).now_playing);
    Rect {
        y: inner.y + 1,
        height: inner.height.saturating_sub(1).min(1),
        ..inner
    }
}

/// Render the entire UI into the provided `frame` using `app` state.
pub fn draw<A: AudioOutput, T: TimeSource>(frame: &mut Frame, app: &App<A, T>) {
    let areas = split(frame.area());

    draw_header(frame, app, areas.header);
    draw_playlist(frame, app, areas.playlist);
    draw_now_playing(frame, app, areas.now_playing);

    let footer = Paragraph::new(controls_text(&app.controls))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, areas.footer);

    match &app.mode {
        Mode::Normal => {}
        Mode::DevicePicker { index } => draw_device_picker(frame, app, *index, areas.playlist),
        Mode::AddPath { input } => draw_add_path(frame, input, areas.playlist),
    }
}

fn draw_header<A: AudioOutput, T: TimeSource>(frame: &mut Frame, app: &App<A, T>, area: Rect) {
    let device = match &app.device_info {
        Some(info) => info.summary(),
        None if app.device_name.is_empty() => "System default".to_string(),
        None => app.device_name.clone(),
    };
    let state = app.transport.state();
    let mut status_parts = vec![
        match state.phase {
            Phase::Stopped => "Stopped".to_string(),
            Phase::Playing => "Playing".to_string(),
            Phase::Paused => "Paused".to_string(),
        },
        format!(
            "Repeat one: {}",
            if state.repeat_one { "ON" } else { "OFF" }
        ),
        format!("{} track(s)", app.transport.playlist().len()),
    ];
    if let Some(msg) = &app.status {
        status_parts.push(msg.clone());
    }

    let header = Paragraph::new(vec![
        Line::from(format!("Output: {device}")),
        Line::from(status_parts.join(" • ")),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" spindle ")
            .title_alignment(Alignment::Center)
            .padding(Padding {
                left: 1,
                right: 0,
                top: 0,
                bottom: 0,
            }),
    );
    frame.render_widget(header, area);
}

fn draw_playlist<A: AudioOutput, T: TimeSource>(frame: &mut Frame, app: &App<A, T>, area: Rect) {
    let active = app.transport.state().active_index();
    let rows: Vec<Row> = app
        .transport
        .playlist()
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let marker = if active == Some(i) { ">" } else { "" };
            Row::new(vec![
                Cell::from(marker),
                Cell::from(t.track_number.as_str()),
                Cell::from(t.title.as_str()),
                Cell::from(t.artist.as_str()),
                Cell::from(format_track_time(t.duration)),
            ])
        })
        .collect();

    let [track, title, artist, duration] = app.columns.as_array();
    let widths = [
        Constraint::Length(1),
        Constraint::Fill(track),
        Constraint::Fill(title),
        Constraint::Fill(artist),
        Constraint::Fill(duration),
    ];

    let header = Row::new(vec!["", "TRK", "Title", "Artist", "Time"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(" playlist "))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = TableState::default();
    if app.has_tracks() {
        state.select(Some(app.selected));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

fn draw_now_playing<A: AudioOutput, T: TimeSource>(
    frame: &mut Frame,
    app: &App<A, T>,
    area: Rect,
) {
    let block = now_playing_block();
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    frame.render_widget(Paragraph::new(app.now_playing_label()), rows[0]);

    let state = app.transport.state();
    let label = format!(
        "{} / {}",
        format_mmss(state.position),
        format_track_time(state.track_length)
    );
    let gauge = Gauge::default().ratio(state.progress()).label(label);
    frame.render_widget(gauge, rows[1]);
}

fn draw_device_picker<A: AudioOutput, T: TimeSource>(
    frame: &mut Frame,
    app: &App<A, T>,
    index: usize,
    area: Rect,
) {
    let height = (app.devices.len() as u16).saturating_add(2);
    let popup = centered_rect_sized(60, height, area);
    frame.render_widget(Clear, popup);

    let items: Vec<ListItem> = app
        .devices
        .iter()
        .map(|d| ListItem::new(d.as_str()))
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" output device (enter selects, esc closes) "),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(index));
    frame.render_stateful_widget(list, popup, &mut state);
}

fn draw_add_path(frame: &mut Frame, input: &str, area: Rect) {
    let popup = centered_rect_sized(72, 3, area);
    frame.render_widget(Clear, popup);
    let prompt = Paragraph::new(format!("{input}_")).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" add file or directory (enter adds, esc closes) "),
    );
    frame.render_widget(prompt, popup);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_mmss_pads_minutes_and_seconds() {
        assert_eq!(format_mmss(Duration::from_secs(0)), "00:00");
        assert_eq!(format_mmss(Duration::from_secs(75)), "01:15");
        assert_eq!(format_mmss(Duration::from_millis(59_999)), "00:59");
        assert_eq!(format_track_time(Duration::ZERO), "--:--");
    }

    #[test]
    fn controls_text_shows_configured_seek_steps() {
        let text = controls_text(&ControlsSettings {
            seek_small_secs: 3,
            seek_large_secs: 30,
            column_step: 10,
        });
        assert!(text.contains("[←/→] seek -/+3s"));
        assert!(text.contains("[H/L] seek -/+30s"));
        assert!(text.contains("[q] quit"));
    }

    #[test]
    fn gauge_sits_inside_the_now_playing_box() {
        let screen = Rect::new(0, 0, 80, 24);
        let gauge = gauge_area(screen);
        let box_area = split(screen).now_playing;
        assert_eq!(gauge.height, 1);
        assert!(gauge.x > box_area.x);
        assert!(gauge.y > box_area.y && gauge.y < box_area.y + box_area.height);
        assert_eq!(gauge.width, box_area.width - 2);
    }
}
