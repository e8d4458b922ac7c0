use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::theme::Theme;

fn build_control_spans(shuffle: bool, repeat: bool, theme: &Theme) -> Vec<Span<'static>> {
    let key_style = Style::default().fg(Color::Black).bg(theme.secondary);
    let toggle_style = |on: bool| Style::default().fg(if on { theme.accent } else { Color::Reset });
    vec![
        Span::styled(" Enter ", key_style),
        Span::raw(" Play Track  "),
        Span::styled(" Space ", key_style),
        Span::raw(" Play/Pause  "),
        Span::styled(" n/p ", key_style),
        Span::raw(" Next/Prev  "),
        Span::styled(" ←/→ ", key_style),
        Span::raw(" Seek (Enter applies)  "),
        Span::styled(" ↑/↓ ", key_style),
        Span::raw(" Volume  "),
        Span::styled(" m ", key_style),
        Span::raw(" Mute  "),
        Span::styled(" s ", key_style),
        Span::styled(
            if shuffle { " Shuffle On  " } else { " Shuffle Off  " },
            toggle_style(shuffle),
        ),
        Span::styled(" r ", key_style),
        Span::styled(
            if repeat { " Repeat On  " } else { " Repeat Off  " },
            toggle_style(repeat),
        ),
        Span::styled(" t ", key_style),
        Span::raw(" Theme  "),
        Span::styled(" q ", key_style),
        Span::raw(" Quit"),
    ]
}

/// Wrap spans into lines, breaking at group boundaries (every 2 spans = key + label).
fn wrap_lines(spans: Vec<Span<'static>>, inner_w: usize) -> Vec<Line<'static>> {
    if inner_w == 0 {
        return vec![Line::from(spans)];
    }
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut current_w: usize = 0;
    for chunk in spans.chunks(2) {
        let group_w: usize = Line::from(chunk.to_vec()).width();
        if current_w + group_w > inner_w && current_w > 0 {
            lines.push(Line::from(std::mem::take(&mut current)));
            current_w = 0;
        }
        current.extend(chunk.iter().cloned());
        current_w += group_w;
    }
    if !current.is_empty() {
        lines.push(Line::from(current));
    }
    lines
}

pub fn controls_height(width: u16, shuffle: bool, repeat: bool, theme: &Theme) -> u16 {
    let spans = build_control_spans(shuffle, repeat, theme);
    let inner_w = width.saturating_sub(2) as usize;
    let lines = wrap_lines(spans, inner_w);
    lines.len() as u16 + 2 // +2 for borders
}

pub fn draw_controls(frame: &mut Frame, area: Rect, shuffle: bool, repeat: bool, theme: &Theme) {
    let spans = build_control_spans(shuffle, repeat, theme);
    let inner_w = area.width.saturating_sub(2) as usize;
    let lines = wrap_lines(spans, inner_w);
    let help = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(" Controls "),
    );
    frame.render_widget(help, area);
}
