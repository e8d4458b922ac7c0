mod audio;
mod controls;
mod gauge;
mod player;
mod playlist;
mod progress;
mod theme;
mod volume;

use std::{env, path::PathBuf, time::Duration};

use anyhow::{bail, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    DefaultTerminal, Frame,
};

use audio::RodioBackend;
use player::Player;
use theme::THEMES;

const TICK: Duration = Duration::from_millis(50);
const SEEK_STEP: f64 = 2.0;
const VOLUME_STEP: u8 = 5;

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tui-playlist")
}

struct App {
    player: Player<RodioBackend>,
    cursor: usize,
    theme_index: usize,
}

fn main() -> Result<()> {
    let root = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let tracks = playlist::scan_tracks(&root);
    if tracks.is_empty() {
        bail!("no audio files found under {}", root.display());
    }

    let backend = RodioBackend::new()?;
    let mut app = App {
        player: Player::new(tracks, backend),
        cursor: 0,
        theme_index: theme::load_theme(),
    };

    let mut terminal = ratatui::init();
    let result = run(&mut terminal, &mut app);
    ratatui::restore();
    result
}

fn run(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| draw(f, app))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') => break,
                        KeyCode::Enter => {
                            if app.player.is_seeking() {
                                let pct = app.player.seek_pct();
                                app.player.end_seek(pct);
                            } else {
                                app.player.select_track(app.cursor)?;
                            }
                        }
                        KeyCode::Char(' ') => app.player.toggle_play_pause(),
                        KeyCode::Char('j') => {
                            let last = app.player.tracks().len() - 1;
                            app.cursor = (app.cursor + 1).min(last);
                        }
                        KeyCode::Char('k') => app.cursor = app.cursor.saturating_sub(1),
                        KeyCode::Char('n') => {
                            app.player.next_track()?;
                            sync_cursor(app);
                        }
                        KeyCode::Char('p') => {
                            app.player.previous_track()?;
                            sync_cursor(app);
                        }
                        KeyCode::Char('s') => app.player.toggle_shuffle(),
                        KeyCode::Char('r') => app.player.toggle_repeat(),
                        KeyCode::Char('m') => app.player.toggle_mute(),
                        KeyCode::Up => {
                            let level = app.player.volume_level().saturating_add(VOLUME_STEP);
                            app.player.set_volume(level.min(100));
                        }
                        KeyCode::Down => {
                            app.player
                                .set_volume(app.player.volume_level().saturating_sub(VOLUME_STEP));
                        }
                        KeyCode::Left => nudge_seek(app, -SEEK_STEP),
                        KeyCode::Right => nudge_seek(app, SEEK_STEP),
                        KeyCode::Char('t') => {
                            app.theme_index = (app.theme_index + 1) % THEMES.len();
                            theme::save_theme(app.theme_index);
                        }
                        _ => {}
                    }
                }
            }
        }

        app.player.on_tick();
        if app.player.finished() {
            app.player.on_track_end()?;
            sync_cursor(app);
        }
    }
    Ok(())
}

// First arrow press starts the drag at the current playhead; the rest move it.
fn nudge_seek(app: &mut App, delta: f64) {
    if !app.player.is_seeking() {
        app.player.begin_seek();
    }
    let pct = app.player.seek_pct() + delta;
    app.player.seek_drag(pct);
}

fn sync_cursor(app: &mut App) {
    if let Some(active) = app.player.active_index() {
        app.cursor = active;
    }
}

fn draw(frame: &mut Frame, app: &App) {
    let theme = &THEMES[app.theme_index];
    let shuffle = app.player.is_shuffle();
    let repeat = app.player.is_repeat();
    let controls_h = controls::controls_height(frame.area().width, shuffle, repeat, theme);

    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(5),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(controls_h),
    ])
    .split(frame.area());

    // Now playing header. The status badge mirrors the global transport
    // control, which select_track and the transport toggle both drive.
    let (status, title) = match app.player.active_index() {
        Some(i) => (
            if app.player.transport_playing() { " ▶ Playing " } else { " ‖ Paused " },
            app.player.tracks()[i].title.as_str(),
        ),
        None => (" ∙ Stopped ", "nothing playing"),
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(status, Style::default().fg(Color::Black).bg(theme.accent)),
        Span::raw("  "),
        Span::styled(title, Style::default().fg(theme.text)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(" Now Playing "),
    );
    frame.render_widget(header, chunks[0]);

    playlist::draw_playlist(
        frame,
        chunks[1],
        app.player.tracks(),
        app.cursor,
        app.player.active_index(),
        app.player.track_marker_playing(),
        theme,
    );

    progress::draw_progress(
        frame,
        chunks[2],
        app.player.display_elapsed(),
        app.player.total_duration(),
        app.player.progress_pct(),
        app.player.is_seeking().then(|| app.player.seek_pct()),
        theme,
    );

    volume::draw_volume(
        frame,
        chunks[3],
        app.player.volume(),
        app.player.volume_icon(),
        theme,
    );

    controls::draw_controls(frame, chunks[4], shuffle, repeat, theme);
}
