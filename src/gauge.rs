use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    widgets::{Block, Widget},
};

/// Single-row bar with rounded end caps. Used for the seek control (fill =
/// playback progress) and the volume control. An optional handle marks a
/// pending seek-drag position without moving the fill.
pub struct RoundedGauge<'a> {
    ratio: f64,
    label: String,
    filled_color: Color,
    dimmed_color: Color,
    handle_at: Option<f64>,
    handle_color: Color,
    block: Option<Block<'a>>,
}

impl<'a> RoundedGauge<'a> {
    pub fn new(ratio: f64, label: String, filled_color: Color) -> Self {
        RoundedGauge {
            ratio: ratio.clamp(0.0, 1.0),
            label,
            filled_color,
            dimmed_color: Color::DarkGray,
            handle_at: None,
            handle_color: Color::White,
            block: None,
        }
    }

    pub fn dimmed_color(mut self, color: Color) -> Self {
        self.dimmed_color = color;
        self
    }

    pub fn handle(mut self, ratio: f64, color: Color) -> Self {
        self.handle_at = Some(ratio.clamp(0.0, 1.0));
        self.handle_color = color;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for RoundedGauge<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = if let Some(block) = self.block {
            let inner = block.inner(area);
            block.render(area, buf);
            inner
        } else {
            area
        };

        if inner.width < 2 || inner.height == 0 {
            return;
        }

        let width = inner.width as usize;
        let filled = (self.ratio * width as f64).round() as usize;
        let y = inner.y;

        for col in 0..width {
            let x = inner.x + col as u16;
            let (ch, fg) = if filled == 0 {
                if col == 0 {
                    ('╶', self.dimmed_color)
                } else if col == width - 1 {
                    ('╴', self.dimmed_color)
                } else {
                    ('─', self.dimmed_color)
                }
            } else if col < filled {
                if col == 0 {
                    ('╺', self.filled_color)
                } else if col == filled - 1 && filled < width {
                    ('╸', self.filled_color)
                } else {
                    ('━', self.filled_color)
                }
            } else {
                if col == width - 1 {
                    ('╴', self.dimmed_color)
                } else {
                    ('─', self.dimmed_color)
                }
            };

            buf[(x, y)].set_char(ch).set_fg(fg).set_bg(Color::Reset);
        }

        if let Some(ratio) = self.handle_at {
            let col = ((ratio * (width - 1) as f64).round() as usize).min(width - 1);
            let x = inner.x + col as u16;
            buf[(x, y)]
                .set_char('┃')
                .set_fg(self.handle_color)
                .set_bg(Color::Reset);
        }

        let label_len = self.label.len();
        if label_len <= width {
            let start = inner.x + (width - label_len) as u16 / 2;
            for (i, ch) in self.label.chars().enumerate() {
                let x = start + i as u16;
                let col = (x - inner.x) as usize;
                let fg = if col < filled { Color::White } else { Color::Gray };
                buf[(x, y)].set_char(ch).set_fg(fg).set_bg(Color::Reset);
            }
        }
    }
}
