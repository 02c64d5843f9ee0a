//! Colors and text styles.
//!
//! A `Theme` is built once at startup from the configured [`ThemeType`] and
//! handed to the presentation layer; nothing else reads it.

use ratatui::style::{Color, Modifier, Style};
use std::str::FromStr;

/// List selection indicator shown next to the selected item
pub const LIST_HIGHLIGHT_SYMBOL: &str = "» ";

/// Spinner frames, advanced one per tick
pub const SPINNER_FRAMES: [&str; 4] = ["☱", "☲", "☴", "☲"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeType {
    #[default]
    Dark,
    Light,
    /// Modifiers only, no colors (also selected by `NO_COLOR`)
    NoColor,
}

impl FromStr for ThemeType {
    type Err = ();

    /// Unknown names fall back to the dark theme.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "light" => ThemeType::Light,
            "nocolor" | "no-color" | "no_color" => ThemeType::NoColor,
            _ => ThemeType::Dark,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Palette {
    accent: Color,
    profile: Color,
    success: Color,
    warning: Color,
    error: Color,
    text: Color,
    muted: Color,
    emphasis: Color,
    border: Color,
    selection: Color,
}

const DARK: Palette = Palette {
    accent: Color::Cyan,
    profile: Color::Magenta,
    success: Color::Green,
    warning: Color::Yellow,
    error: Color::Red,
    text: Color::White,
    muted: Color::DarkGray,
    emphasis: Color::Yellow,
    border: Color::DarkGray,
    selection: Color::DarkGray,
};

const LIGHT: Palette = Palette {
    accent: Color::Blue,
    profile: Color::Magenta,
    success: Color::Green,
    // plain yellow is unreadable on white
    warning: Color::Rgb(180, 120, 0),
    error: Color::Red,
    text: Color::Black,
    muted: Color::DarkGray,
    emphasis: Color::Blue,
    border: Color::DarkGray,
    selection: Color::Gray,
};

/// Styles for every UI element. `None` palette means no colors at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    palette: Option<Palette>,
}

impl Theme {
    pub fn new(theme_type: ThemeType) -> Self {
        let palette = match theme_type {
            ThemeType::Dark => Some(DARK),
            ThemeType::Light => Some(LIGHT),
            ThemeType::NoColor => None,
        };
        Self { palette }
    }

    /// Foreground from the palette, or `plain` when colors are off.
    fn fg(&self, pick: fn(&Palette) -> Color, plain: Style) -> Style {
        match &self.palette {
            Some(palette) => Style::default().fg(pick(palette)),
            None => plain,
        }
    }

    fn bold() -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }

    pub fn title_style(&self) -> Style {
        self.fg(|p| p.accent, Style::default()).add_modifier(Modifier::BOLD)
    }

    pub fn profile_style(&self) -> Style {
        self.fg(|p| p.profile, Style::default()).add_modifier(Modifier::BOLD)
    }

    pub fn text_style(&self) -> Style {
        self.fg(|p| p.text, Style::default())
    }

    pub fn muted_style(&self) -> Style {
        self.fg(|p| p.muted, Style::default().add_modifier(Modifier::DIM))
    }

    /// Spinners and key hints
    pub fn emphasis_style(&self) -> Style {
        self.fg(|p| p.emphasis, Self::bold())
    }

    pub fn success_style(&self) -> Style {
        self.fg(|p| p.success, Self::bold())
    }

    pub fn warning_style(&self) -> Style {
        self.fg(|p| p.warning, Self::bold())
    }

    pub fn error_style(&self) -> Style {
        self.fg(|p| p.error, Self::bold())
    }

    pub fn border_focused_style(&self) -> Style {
        self.fg(|p| p.accent, Self::bold())
    }

    pub fn border_style(&self) -> Style {
        self.fg(|p| p.border, Style::default())
    }

    /// Selected list row
    pub fn highlight_style(&self) -> Style {
        match &self.palette {
            Some(palette) => Style::default()
                .fg(palette.emphasis)
                .bg(palette.selection)
                .add_modifier(Modifier::BOLD),
            None => Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED),
        }
    }

    pub fn background_style(&self) -> Style {
        match self.palette {
            Some(_) => Style::default().bg(Color::Reset),
            None => Style::default(),
        }
    }
}
