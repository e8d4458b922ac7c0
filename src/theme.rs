use std::fs;

use ratatui::style::Color;

use crate::config_dir;

pub struct Theme {
    pub name: &'static str,
    pub accent: Color,
    pub secondary: Color,
    pub positive: Color,
    pub text: Color,
    pub dimmed: Color,
}

pub const THEMES: &[Theme] = &[
    Theme {
        name: "Default",
        accent: Color::Cyan,
        secondary: Color::Yellow,
        positive: Color::Green,
        text: Color::White,
        dimmed: Color::DarkGray,
    },
    Theme {
        name: "Dracula",
        accent: Color::Rgb(189, 147, 249),
        secondary: Color::Rgb(255, 121, 198),
        positive: Color::Rgb(80, 250, 123),
        text: Color::White,
        dimmed: Color::DarkGray,
    },
    Theme {
        name: "Nord",
        accent: Color::Rgb(136, 192, 208),
        secondary: Color::Rgb(235, 203, 139),
        positive: Color::Rgb(163, 190, 140),
        text: Color::White,
        dimmed: Color::DarkGray,
    },
    Theme {
        name: "Gruvbox",
        accent: Color::Rgb(214, 153, 62),
        secondary: Color::Rgb(250, 189, 47),
        positive: Color::Rgb(152, 151, 26),
        text: Color::White,
        dimmed: Color::DarkGray,
    },
    Theme {
        name: "Tokyo Night",
        accent: Color::Rgb(122, 162, 247),
        secondary: Color::Rgb(224, 175, 104),
        positive: Color::Rgb(158, 206, 106),
        text: Color::White,
        dimmed: Color::DarkGray,
    },
];

pub fn load_theme() -> usize {
    fs::read_to_string(config_dir().join("theme"))
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .filter(|&i: &usize| i < THEMES.len())
        .unwrap_or(0)
}

pub fn save_theme(index: usize) {
    let dir = config_dir();
    let _ = fs::create_dir_all(&dir);
    let _ = fs::write(dir.join("theme"), format!("{index}"));
}
