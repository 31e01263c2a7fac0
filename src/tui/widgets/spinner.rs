//! Busy spinner widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::Widget,
};

use crate::tui::theme::Theme;

/// Spinner animation frames
const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Shown while an extraction is in flight
pub const ANALYZING_MESSAGE: &str = "Analyzing reports...";

/// One-line spinner with a message, centered in its area
pub struct Spinner<'a> {
    frame: usize,
    message: &'a str,
    theme: Theme,
}

impl<'a> Spinner<'a> {
    pub fn new(frame: usize, message: &'a str, theme: Theme) -> Self {
        Self {
            frame,
            message,
            theme,
        }
    }

    /// Get the current spinner character
    pub fn current_char(&self) -> char {
        SPINNER_FRAMES[self.frame % SPINNER_FRAMES.len()]
    }

    /// Advance to next frame, returning the new frame index
    pub fn next_frame(frame: usize) -> usize {
        (frame + 1) % SPINNER_FRAMES.len()
    }
}

impl Widget for Spinner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let text = format!("{} {}", self.current_char(), self.message);
        let width = Span::raw(text.as_str()).width() as u16;
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        buf.set_stringn(
            x,
            area.y,
            &text,
            area.width as usize,
            Style::default()
                .fg(self.theme.accent())
                .add_modifier(Modifier::BOLD),
        );
    }
}
