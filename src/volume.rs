use ratatui::{
    layout::{Alignment, Rect},
    text::Line,
    widgets::{Block, BorderType, Borders},
    Frame,
};

use crate::gauge::RoundedGauge;
use crate::player::VolumeIcon;
use crate::theme::Theme;

pub fn draw_volume(frame: &mut Frame, area: Rect, volume: f32, icon: VolumeIcon, theme: &Theme) {
    let vol_pct = (volume * 100.0).round() as u16;
    let vol_gauge = RoundedGauge::new(f64::from(volume), String::new(), theme.positive)
        .dimmed_color(theme.dimmed)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(format!(" Volume {} ", icon.glyph()))
                .title(Line::from(format!(" {vol_pct}% ")).alignment(Alignment::Right)),
        );
    frame.render_widget(vol_gauge, area);
}
