use std::path::{Path, PathBuf};

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::theme::Theme;

pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "flac", "ogg", "wav", "aac", "m4a"];

pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| AUDIO_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

/// One playlist entry. Identity is its index in the scanned list; the list
/// is fixed for the lifetime of the player.
pub struct Track {
    pub path: PathBuf,
    pub title: String,
}

/// Enumerate audio files under root, depth-first, directories and files
/// sorted case-insensitively. Runs once at startup.
pub fn scan_tracks(root: &Path) -> Vec<Track> {
    if root.is_file() {
        return if is_audio_file(root) {
            vec![track_from(root.to_path_buf())]
        } else {
            Vec::new()
        };
    }

    let mut entries: Vec<std::fs::DirEntry> = match std::fs::read_dir(root) {
        Ok(rd) => rd.filter_map(|e| e.ok()).collect(),
        Err(_) => return Vec::new(),
    };
    entries.sort_by(|a, b| {
        let a_dir = a.file_type().map(|t| t.is_dir()).unwrap_or(false);
        let b_dir = b.file_type().map(|t| t.is_dir()).unwrap_or(false);
        b_dir.cmp(&a_dir).then_with(|| {
            a.file_name()
                .to_ascii_lowercase()
                .cmp(&b.file_name().to_ascii_lowercase())
        })
    });

    let mut tracks = Vec::new();
    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            tracks.extend(scan_tracks(&path));
        } else if is_audio_file(&path) {
            tracks.push(track_from(path));
        }
    }
    tracks
}

fn track_from(path: PathBuf) -> Track {
    let title = path
        .file_stem()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "Unknown".into());
    Track { path, title }
}

pub fn draw_playlist(
    frame: &mut Frame,
    area: Rect,
    tracks: &[Track],
    cursor: usize,
    active: Option<usize>,
    active_playing: bool,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(" Playlist ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 {
        return;
    }

    // Keep the cursor row visible.
    let visible = inner.height as usize;
    let offset = if cursor >= visible {
        cursor + 1 - visible
    } else {
        0
    };

    let mut lines: Vec<Line> = Vec::new();
    for (i, track) in tracks.iter().enumerate().skip(offset).take(visible) {
        let is_cursor = i == cursor;
        let is_active = active == Some(i);

        let marker = if is_cursor { ">> " } else { "   " };
        // The track's own play control: pause glyph while it plays.
        let status = if is_active {
            if active_playing { "‖ " } else { "▶ " }
        } else {
            "  "
        };

        let title_style = if is_cursor {
            Style::default()
                .fg(Color::Black)
                .bg(theme.accent)
                .add_modifier(Modifier::BOLD)
        } else if is_active {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.text)
        };

        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(theme.accent)),
            Span::styled(status, Style::default().fg(theme.secondary)),
            Span::styled(track.title.clone(), title_style),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}
