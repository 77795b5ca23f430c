//! Marquee theme for MovieMagic
//!
//! Color palette and style helpers for the TUI: dark auditorium background,
//! gold marquee accents, rose for favorites.

use ratatui::style::{Color, Modifier, Style};

/// Marquee color palette
pub struct Theme;

impl Theme {
    // ═══════════════════════════════════════════════════════════════════════
    // CORE PALETTE
    // ═══════════════════════════════════════════════════════════════════════

    /// Background: #0f1014 (auditorium black)
    pub const BACKGROUND: Color = Color::Rgb(0x0f, 0x10, 0x14);

    /// Primary: #f5c518 (marquee gold)
    pub const PRIMARY: Color = Color::Rgb(0xf5, 0xc5, 0x18);

    /// Secondary: #5ec8f2 (screen blue)
    pub const SECONDARY: Color = Color::Rgb(0x5e, 0xc8, 0xf2);

    /// Accent: #ff9f43 (popcorn orange)
    pub const ACCENT: Color = Color::Rgb(0xff, 0x9f, 0x43);

    /// Favorite: #e84a5f (rose)
    pub const FAVORITE: Color = Color::Rgb(0xe8, 0x4a, 0x5f);

    /// Text: #e6e6e6 (soft white)
    pub const TEXT: Color = Color::Rgb(0xe6, 0xe6, 0xe6);

    /// Dim: #5a5f6b (muted)
    pub const DIM: Color = Color::Rgb(0x5a, 0x5f, 0x6b);

    /// Success: #4cd964 (green)
    pub const SUCCESS: Color = Color::Rgb(0x4c, 0xd9, 0x64);

    /// Warning: #ffcc00 (amber)
    pub const WARNING: Color = Color::Rgb(0xff, 0xcc, 0x00);

    /// Error: #ff5c5c (red)
    pub const ERROR: Color = Color::Rgb(0xff, 0x5c, 0x5c);

    // ═══════════════════════════════════════════════════════════════════════
    // DERIVED COLORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Slightly lighter background for panels and the dropdown
    pub const BACKGROUND_LIGHT: Color = Color::Rgb(0x19, 0x1b, 0x21);

    /// Border color (dim gold)
    pub const BORDER: Color = Color::Rgb(0x6b, 0x5a, 0x14);

    /// Border color when focused (full gold)
    pub const BORDER_FOCUSED: Color = Self::PRIMARY;

    // ═══════════════════════════════════════════════════════════════════════
    // STYLE HELPERS
    // ═══════════════════════════════════════════════════════════════════════

    /// Default text style
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND)
    }

    /// Highlighted text (inverted with primary color)
    pub fn highlighted() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Dimmed/muted text
    pub fn dimmed() -> Style {
        Style::default().fg(Self::DIM)
    }

    /// Error banner
    pub fn error() -> Style {
        Style::default()
            .fg(Self::ERROR)
            .add_modifier(Modifier::BOLD)
    }

    /// Title text (bold primary)
    pub fn title() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn secondary() -> Style {
        Style::default().fg(Self::SECONDARY)
    }

    pub fn accent() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Border style (unfocused)
    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    /// Border style (focused)
    pub fn border_focused() -> Style {
        Style::default()
            .fg(Self::BORDER_FOCUSED)
            .add_modifier(Modifier::BOLD)
    }

    /// Favorite marker
    pub fn favorite() -> Style {
        Style::default()
            .fg(Self::FAVORITE)
            .add_modifier(Modifier::BOLD)
    }

    /// Rating color by score, gold highlight when selected
    pub fn rating(score: f32, is_selected: bool) -> Style {
        if is_selected {
            Self::accent()
        } else if score >= 7.5 {
            Style::default().fg(Self::SUCCESS)
        } else if score >= 6.0 {
            Style::default().fg(Self::WARNING)
        } else if score > 0.0 {
            Self::dimmed()
        } else {
            Style::default().fg(Self::ERROR)
        }
    }

    pub fn list_item_selected() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .bg(Self::BACKGROUND_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Search input text
    pub fn input() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_LIGHT)
    }

    pub fn input_cursor() -> Style {
        Style::default().fg(Self::BACKGROUND).bg(Self::PRIMARY)
    }

    /// Keybind hint key
    pub fn keybind() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Keybind hint description
    pub fn keybind_desc() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_LIGHT)
    }

    /// Loading spinner
    pub fn loading() -> Style {
        Style::default()
            .fg(Self::SECONDARY)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn year() -> Style {
        Style::default().fg(Self::SECONDARY)
    }

    pub fn genre() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::ITALIC)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// COLOR UTILITIES
// ═══════════════════════════════════════════════════════════════════════════

/// Calculate relative luminance for a color (used in contrast ratio)
/// Formula: https://www.w3.org/TR/WCAG20/#relativeluminancedef
pub fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    fn channel_luminance(c: u8) -> f64 {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }

    0.2126 * channel_luminance(r) + 0.7152 * channel_luminance(g) + 0.0722 * channel_luminance(b)
}

/// Contrast ratio between two colors, from 1 (same) to 21 (black/white)
/// WCAG AA requires >= 4.5:1 for normal text, >= 3:1 for large text
pub fn contrast_ratio(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> f64 {
    let l1 = relative_luminance(fg.0, fg.1, fg.2);
    let l2 = relative_luminance(bg.0, bg.1, bg.2);

    let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };

    (lighter + 0.05) / (darker + 0.05)
}

/// Check if a foreground/background pair meets WCAG AA for normal text
pub fn meets_wcag_aa(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> bool {
    contrast_ratio(fg, bg) >= 4.5
}

/// Extract RGB tuple from ratatui Color (only works for Rgb variant)
pub fn color_to_rgb(color: Color) -> Option<(u8, u8, u8)> {
    match color {
        Color::Rgb(r, g, b) => Some((r, g, b)),
        _ => None,
    }
}
