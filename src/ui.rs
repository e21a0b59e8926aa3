//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style, Stylize},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::App;
use crate::config::UiSettings;
use crate::library::now_playing_text;
use crate::session::{PlaybackInfo, PlaybackState};

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("j/k", "up/down");
    map.insert("gg/G", "top/bottom");
    map.insert("enter", "play selected");
    map.insert("space/p", "play/pause");
    map.insert("h/l", "prev/next");
    map.insert("-/+", "volume");
    map.insert("x", "stop");
    map.insert("esc", "dismiss notice");
    map.insert("q", "quit");
    map
});

const VOLUME_BAR_WIDTH: usize = 10;

/// Render the controls help text.
fn controls_text() -> String {
    // Keep the rendered order stable and human-friendly.
    let order = ["j/k", "h/l", "enter", "space/p", "-/+", "x", "gg/G", "esc", "q"];
    order
        .iter()
        .filter_map(|k| CONTROLS_MAP.get(k).map(|v| format!("[{}] {}", k, v)))
        .collect::<Vec<String>>()
        .join(" | ")
}

fn state_glyph(state: PlaybackState) -> &'static str {
    match state {
        PlaybackState::Idle => "■",
        PlaybackState::Loading => "…",
        PlaybackState::Playing => "▶",
        PlaybackState::Paused => "⏸",
    }
}

/// `[######----] 60%`
fn volume_bar(volume: f32, width: usize) -> String {
    let filled = ((volume.clamp(0.0, 1.0) * width as f32).round() as usize).min(width);
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(width - filled),
        (volume * 100.0).round() as u32
    )
}

/// `2/5`, or nothing when there is no playlist.
fn position_text(info: &PlaybackInfo) -> Option<String> {
    if info.playlist.is_empty() {
        None
    } else {
        Some(format!("{}/{}", info.cursor + 1, info.playlist.len()))
    }
}

/// Lines of the mini-player panel; `None` while idle, which hides it.
fn mini_player_lines(info: &PlaybackInfo, ui: &UiSettings) -> Option<(String, String)> {
    let track = match info.state {
        PlaybackState::Idle => return None,
        PlaybackState::Loading => info.loading.as_ref(),
        PlaybackState::Playing | PlaybackState::Paused => info.track.as_ref(),
    }?;

    let song = now_playing_text(track, &ui.now_playing_fields, &ui.now_playing_separator);
    let first = format!("{} {}", state_glyph(info.state), song);

    let mut second = vec![format!("vol {}", volume_bar(info.volume, VOLUME_BAR_WIDTH))];
    if let Some(pos) = position_text(info) {
        second.push(pos);
    }
    if !track.image_url.trim().is_empty() {
        second.push(format!("art {}", track.image_url.trim()));
    }
    Some((first, second.join(" • ")))
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(frame: &mut Frame, app: &App, ui_settings: &UiSettings) {
    let info = app.playback();
    let panel = mini_player_lines(&info, ui_settings);
    let notice = app.notice();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(if panel.is_some() { 4 } else { 0 }),
            Constraint::Length(if notice.is_some() { 1 } else { 0 }),
            Constraint::Length(3),
        ])
        .split(frame.area());

    // Header
    let mut title = String::from(" miniplay ");
    if let Some(label) = &app.source_label {
        title = format!(" miniplay: {} ", label);
    }
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Track list, windowed around the selection.
    {
        let total = app.tracks.len();
        let list_height = chunks[1].height.saturating_sub(2) as usize;
        let sel = app.selected.min(total.saturating_sub(1));
        let (start, end) = if total <= list_height || list_height == 0 {
            (0, total)
        } else {
            let half = list_height / 2;
            let start = sel.saturating_sub(half).min(total - list_height);
            (start, start + list_height)
        };

        let playing_idx = (std::sync::Arc::ptr_eq(&info.playlist, &app.tracks)
            && info.track.is_some())
        .then_some(info.cursor);

        let items: Vec<ListItem> = app.tracks[start..end]
            .iter()
            .enumerate()
            .map(|(offset, track)| {
                let i = start + offset;
                let mut line = track.display();
                if track.preview().is_none() {
                    line.push_str("  (no preview)");
                }
                if playing_idx == Some(i) {
                    ListItem::new(line).bold()
                } else {
                    ListItem::new(line)
                }
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(" tracks "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        if total > 0 {
            state.select(Some(sel - start));
        }
        frame.render_stateful_widget(list, chunks[1], &mut state);
    }

    if let Some((first, second)) = panel {
        let text = format!("{}\n{}", first, second);
        let player = Paragraph::new(text)
            .block(
                Block::bordered()
                    .padding(Padding {
                        left: 1,
                        right: 0,
                        top: 0,
                        bottom: 0,
                    })
                    .title(" now playing "),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(player, chunks[2]);
    }

    if let Some(notice) = notice {
        frame.render_widget(Paragraph::new(notice).yellow(), chunks[3]);
    }

    let footer = Paragraph::new(controls_text())
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

    frame.render_widget(footer, chunks[4]);
}
