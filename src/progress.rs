use std::time::Duration;

use ratatui::{
    layout::{Alignment, Rect},
    text::Line,
    widgets::{Block, BorderType, Borders},
    Frame,
};

use crate::gauge::RoundedGauge;
use crate::player::format_time;
use crate::theme::Theme;

/// Seek control: gauge fill follows the playhead, the right-hand title shows
/// `elapsed / total`. While a drag is in flight the fill stays put and a
/// handle marks the pending position; the elapsed text follows the drag.
pub fn draw_progress(
    frame: &mut Frame,
    area: Rect,
    elapsed: Duration,
    total: Option<Duration>,
    progress_pct: f64,
    seek_pct: Option<f64>,
    theme: &Theme,
) {
    // Unknown duration reads as 0:00 until metadata arrives.
    let label = format!(
        "{} / {}",
        format_time(elapsed),
        format_time(total.unwrap_or_default())
    );

    let title = if seek_pct.is_some() { " Seek " } else { " Progress " };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(title)
        .title(Line::from(format!(" {label} ")).alignment(Alignment::Right));

    let mut gauge = RoundedGauge::new(progress_pct / 100.0, String::new(), theme.accent)
        .dimmed_color(theme.dimmed)
        .block(block);
    if let Some(pct) = seek_pct {
        gauge = gauge.handle(pct / 100.0, theme.secondary);
    }
    frame.render_widget(gauge, area);
}
