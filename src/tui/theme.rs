use ratatui::style::Color;

use crate::model::{Status, UiConfig};

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    /// Title bar and table headers
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub cyan: Color,
    pub purple: Color,
    pub blue: Color,
    pub selection_bg: Color,
    /// Text drawn on top of help-bar key badges
    pub badge_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Reset,
            text: Color::Rgb(0xFF, 0xFF, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0x7C, 0x3A, 0xED),
            dim: Color::Rgb(0x6B, 0x72, 0x80),
            red: Color::Rgb(0xE0, 0x6C, 0x75),
            yellow: Color::Rgb(0xF5, 0x9E, 0x0B),
            green: Color::Rgb(0x98, 0xC3, 0x79),
            cyan: Color::Rgb(0x00, 0xB9, 0xE8),
            purple: Color::Rgb(0xC6, 0x78, 0xDD),
            blue: Color::Rgb(0x61, 0xAF, 0xEF),
            selection_bg: Color::Rgb(0x7C, 0x3A, 0xED),
            badge_fg: Color::Rgb(0x28, 0x2C, 0x34),
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from `[ui.colors]` settings, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                continue;
            };
            match key.as_str() {
                "background" => theme.background = color,
                "text" => theme.text = color,
                "text_bright" => theme.text_bright = color,
                "highlight" => theme.highlight = color,
                "dim" => theme.dim = color,
                "red" => theme.red = color,
                "yellow" => theme.yellow = color,
                "green" => theme.green = color,
                "cyan" => theme.cyan = color,
                "purple" => theme.purple = color,
                "blue" => theme.blue = color,
                "selection_bg" => theme.selection_bg = color,
                "badge_fg" => theme.badge_fg = color,
                _ => {}
            }
        }

        theme
    }

    /// Get the color for a project status
    pub fn status_color(&self, status: Status) -> Color {
        match status {
            Status::Active => self.green,
            Status::Archived => self.yellow,
            Status::Done => self.cyan,
            Status::NotSet => self.dim,
        }
    }
}
