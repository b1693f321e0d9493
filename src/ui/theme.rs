//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::{ReadingStatus, StatusVerdict};

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for the `Warning` verdict and `LOW` readings.
    pub warning: Color,
    /// Color for the `Ok` verdict and `NORMAL` readings.
    pub ok: Color,
    /// Color for the `Unknown` verdict and stale markers.
    pub muted: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            warning: Color::Red,
            ok: Color::Green,
            muted: Color::Gray,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            warning: Color::Red,
            ok: Color::Green,
            muted: Color::DarkGray,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Get style for an aggregate verdict
    pub fn verdict_style(&self, verdict: StatusVerdict) -> Style {
        match verdict {
            StatusVerdict::Unknown => Style::default().fg(self.muted),
            StatusVerdict::Ok => Style::default().fg(self.ok),
            StatusVerdict::Warning => {
                Style::default().fg(self.warning).add_modifier(Modifier::BOLD)
            }
        }
    }

    /// Get style for a per-reading status annotation
    pub fn reading_style(&self, status: ReadingStatus) -> Style {
        match status {
            ReadingStatus::Normal => Style::default().fg(self.ok),
            ReadingStatus::Low => Style::default().fg(self.warning).add_modifier(Modifier::BOLD),
        }
    }
}
