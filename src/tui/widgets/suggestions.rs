//! Suggestions view - every suggestion tagged with its day

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::overview::{
    centered_content, render_keybindings, render_separator, DASHBOARD_BINDINGS,
};
use super::tabs::{Tab, TabBar};
use crate::tui::theme::Theme;
use crate::types::SuggestionRow;

const DATE_WIDTH: u16 = 14;

/// Suggestions view widget
pub struct SuggestionsView<'a> {
    rows: &'a [SuggestionRow],
    scroll: usize,
    theme: Theme,
}

impl<'a> SuggestionsView<'a> {
    pub fn new(rows: &'a [SuggestionRow], scroll: usize, theme: Theme) -> Self {
        Self {
            rows,
            scroll,
            theme,
        }
    }

    /// Clamp a scroll offset so the last page stays full
    pub fn clamp_scroll(scroll: usize, len: usize, visible_rows: usize) -> usize {
        scroll.min(len.saturating_sub(visible_rows))
    }
}

impl Widget for SuggestionsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let centered_area = centered_content(area);

        let chunks = Layout::vertical([
            Constraint::Length(1), // Top padding
            Constraint::Length(1), // Tabs
            Constraint::Length(1), // Separator
            Constraint::Length(1), // Title
            Constraint::Length(1), // Header
            Constraint::Fill(1),   // Rows
            Constraint::Length(1), // Separator
            Constraint::Length(1), // Keybindings
        ])
        .split(centered_area);

        TabBar::new(Tab::Suggestions, self.theme).render(chunks[1], buf);
        render_separator(chunks[2], buf, self.theme);
        self.render_title(chunks[3], buf);
        self.render_header(chunks[4], buf);
        self.render_rows(chunks[5], buf);
        render_separator(chunks[6], buf, self.theme);

        let mut bindings = vec![("↑↓", "Scroll")];
        bindings.extend_from_slice(&DASHBOARD_BINDINGS);
        render_keybindings(chunks[7], buf, &bindings, self.theme);
    }
}

impl SuggestionsView<'_> {
    fn render_title(&self, area: Rect, buf: &mut Buffer) {
        let title = Paragraph::new(Line::from(vec![
            Span::styled(
                "Improvement Suggestions",
                Style::default()
                    .fg(self.theme.text())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ({})", self.rows.len()),
                Style::default().fg(self.theme.muted()),
            ),
        ]))
        .alignment(Alignment::Center);
        title.render(area, buf);
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let style = Style::default()
            .fg(self.theme.muted())
            .add_modifier(Modifier::BOLD);
        buf.set_stringn(area.x + 2, area.y, "Date", area.width as usize, style);
        buf.set_string(area.x + 2 + DATE_WIDTH, area.y, "Suggestion", style);
    }

    fn render_rows(&self, area: Rect, buf: &mut Buffer) {
        if self.rows.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                "No suggestions",
                Style::default().fg(self.theme.muted()),
            )))
            .alignment(Alignment::Center)
            .render(area, buf);
            return;
        }

        let visible_rows = area.height as usize;
        let offset = Self::clamp_scroll(self.scroll, self.rows.len(), visible_rows);
        let text_x = area.x + 2 + DATE_WIDTH;
        let text_width = area.width.saturating_sub(DATE_WIDTH + 2) as usize;

        for (row, suggestion) in self.rows.iter().skip(offset).take(visible_rows).enumerate() {
            let y = area.y + row as u16;
            buf.set_stringn(
                area.x + 2,
                y,
                &suggestion.date,
                (DATE_WIDTH - 1) as usize,
                Style::default().fg(self.theme.date()),
            );
            buf.set_stringn(
                text_x,
                y,
                &suggestion.text,
                text_width,
                Style::default().fg(self.theme.text()),
            );
        }
    }
}
