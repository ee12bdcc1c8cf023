//! Day and night palettes. The night-mode flag picks one; nothing else in the
//! renderer branches on it.

use ratatui::style::{Color, Modifier, Style};

/// Palette color constants.
mod colors {
    use super::Color;

    // === Day ===
    pub const DAY_BG: Color = Color::Rgb(255, 255, 255);
    pub const DAY_TEXT: Color = Color::Rgb(0, 0, 0);
    pub const DAY_MUTED: Color = Color::Rgb(110, 110, 110);
    pub const DAY_SELECTOR_BG: Color = Color::Rgb(211, 211, 211); // lightgray
    pub const DAY_BORDER: Color = Color::Rgb(204, 204, 204);

    // === Night ===
    pub const NIGHT_BG: Color = Color::Rgb(51, 51, 51);
    pub const NIGHT_TEXT: Color = Color::Rgb(230, 230, 230);
    pub const NIGHT_MUTED: Color = Color::Rgb(150, 150, 150);
    pub const NIGHT_SELECTOR_BG: Color = Color::Rgb(80, 80, 80);
    pub const NIGHT_BORDER: Color = Color::Rgb(110, 110, 110);

    // === Shared ===
    pub const HEADER: Color = Color::Rgb(135, 206, 235); // skyblue
    pub const ERROR: Color = Color::Rgb(220, 50, 47);
}

/// Resolved palette used by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg: Color,
    pub text: Color,
    pub muted: Color,
    pub selector_bg: Color,
    pub border: Color,
    pub header: Color,
    pub error: Color,
}

impl Palette {
    pub const fn day() -> Self {
        Self {
            bg: colors::DAY_BG,
            text: colors::DAY_TEXT,
            muted: colors::DAY_MUTED,
            selector_bg: colors::DAY_SELECTOR_BG,
            border: colors::DAY_BORDER,
            header: colors::HEADER,
            error: colors::ERROR,
        }
    }

    pub const fn night() -> Self {
        Self {
            bg: colors::NIGHT_BG,
            text: colors::NIGHT_TEXT,
            muted: colors::NIGHT_MUTED,
            selector_bg: colors::NIGHT_SELECTOR_BG,
            border: colors::NIGHT_BORDER,
            header: colors::HEADER,
            error: colors::ERROR,
        }
    }

    pub const fn for_mode(night_mode: bool) -> Self {
        if night_mode { Self::night() } else { Self::day() }
    }

    /// Base style for the whole screen
    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.bg)
    }

    /// Title bar style
    pub fn header(&self) -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(self.header)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for the bold numeric values
    pub fn value(&self) -> Style {
        self.base().add_modifier(Modifier::BOLD)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted).bg(self.bg)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.border).bg(self.bg)
    }

    pub fn selector(&self) -> Style {
        Style::default().fg(self.text).bg(self.selector_bg)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(self.error).bg(self.bg)
    }

    /// Highlighted menu entry
    pub fn highlight(&self) -> Style {
        Style::default().add_modifier(Modifier::REVERSED)
    }
}
