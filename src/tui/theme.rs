// Color palette for the TUI
//
// Carries the classic dark-editor palette of the web client so solved /
// attempted / difficulty cues look the same in the terminal.

use ratatui::style::Color;

pub const FG: Color = Color::Rgb(0xd4, 0xd4, 0xd4);
pub const DIM: Color = Color::Rgb(0x8a, 0x8a, 0x8a);
pub const ACCENT: Color = Color::Rgb(0x0e, 0x63, 0x9c);
pub const SUCCESS: Color = Color::Rgb(0x4e, 0xc9, 0xb0);
pub const WARNING: Color = Color::Rgb(0xcc, 0xa7, 0x00);
pub const ERROR: Color = Color::Rgb(0xf4, 0x47, 0x47);
pub const MEDIUM: Color = Color::Rgb(0xce, 0x91, 0x78);

/// Color for a difficulty label, defaulting to dim for unknown values
pub fn difficulty_color(difficulty: &str) -> Color {
    match difficulty {
        "Easy" => SUCCESS,
        "Medium" => MEDIUM,
        "Hard" => ERROR,
        _ => DIM,
    }
}

/// Tone of console output, mapped from what produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Normal,
    Success,
    Warning,
    Error,
}

impl Tone {
    pub fn color(&self) -> Color {
        match self {
            Tone::Normal => FG,
            Tone::Success => SUCCESS,
            Tone::Warning => WARNING,
            Tone::Error => ERROR,
        }
    }
}
