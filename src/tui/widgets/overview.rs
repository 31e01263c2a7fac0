//! Overview layout widget

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::stats::StatsCards;
use super::tabs::{Tab, TabBar};
use crate::tui::theme::{efficiency_level, Theme};
use crate::types::DashboardStats;

/// Maximum content width (keeps layout clean on wide terminals)
pub const MAX_CONTENT_WIDTH: u16 = 170;

/// Rows reserved for the hours trend (most recent days win)
const MAX_TREND_ROWS: usize = 10;

/// Rows reserved for the category breakdown
const MAX_CATEGORY_ROWS: usize = 8;

/// Column widths shared by trend and category rows
const LABEL_WIDTH: u16 = 14;
const VALUE_WIDTH: u16 = 16;

/// Format hours with one decimal (e.g., 7.5 -> "7.5h")
pub fn format_hours(hours: f64) -> String {
    format!("{:.1}h", hours)
}

/// Proportional bar of `width` cells: filled for `value / max`, shaded for the rest
pub fn format_bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || width == 0 {
        return "░".repeat(width);
    }
    let ratio = (value / max).clamp(0.0, 1.0);
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    format!("{}{}", "▓".repeat(filled), "░".repeat(empty))
}

/// Center `area` horizontally within MAX_CONTENT_WIDTH
pub fn centered_content(area: Rect) -> Rect {
    let content_width = area.width.min(MAX_CONTENT_WIDTH);
    let x_offset = (area.width.saturating_sub(content_width)) / 2;
    Rect {
        x: area.x + x_offset,
        y: area.y,
        width: content_width,
        height: area.height,
    }
}

/// Draw a full-width "─" separator
pub fn render_separator(area: Rect, buf: &mut Buffer, theme: Theme) {
    if area.height == 0 {
        return;
    }
    let line = "─".repeat(area.width as usize);
    buf.set_string(area.x, area.y, &line, Style::default().fg(theme.muted()));
}

/// Render a centered line of (key, description) hints
pub fn render_keybindings(area: Rect, buf: &mut Buffer, bindings: &[(&str, &str)], theme: Theme) {
    let mut spans = Vec::with_capacity(bindings.len() * 3);
    for (i, (key, desc)) in bindings.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(*key, Style::default().fg(theme.accent())));
        spans.push(Span::styled(
            format!(": {}", desc),
            Style::default().fg(theme.muted()),
        ));
    }
    Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .render(area, buf);
}

/// Dashboard keybindings shared by all tabs
pub const DASHBOARD_BINDINGS: [(&str, &str); 5] = [
    ("Tab", "Switch view"),
    ("i", "Add report"),
    ("c", "Clear all"),
    ("?", "Help"),
    ("q", "Quit"),
];

/// Overview widget: stat cards, hours trend and category breakdown
pub struct Overview<'a> {
    stats: &'a DashboardStats,
    theme: Theme,
}

impl<'a> Overview<'a> {
    pub fn new(stats: &'a DashboardStats, theme: Theme) -> Self {
        Self { stats, theme }
    }
}

impl Widget for Overview<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let centered_area = centered_content(area);

        let trend_rows = self.stats.trend.len().min(MAX_TREND_ROWS) as u16;
        let category_rows = self.stats.categories.len().min(MAX_CATEGORY_ROWS).max(1) as u16;
        let cards_height = StatsCards::height_for(centered_area.width);

        let chunks = Layout::vertical([
            Constraint::Length(1),             // 0: Top padding
            Constraint::Length(1),             // 1: Tabs
            Constraint::Length(1),             // 2: Separator
            Constraint::Length(cards_height),  // 3: Cards
            Constraint::Length(1),             // 4: Trend label
            Constraint::Length(trend_rows),    // 5: Trend rows
            Constraint::Length(1),             // 6: Blank
            Constraint::Length(1),             // 7: Category label
            Constraint::Length(category_rows), // 8: Category rows
            Constraint::Fill(1),               // 9: Remaining space
            Constraint::Length(1),             // 10: Separator
            Constraint::Length(1),             // 11: Keybindings
        ])
        .split(centered_area);

        TabBar::new(Tab::Overview, self.theme).render(chunks[1], buf);
        render_separator(chunks[2], buf, self.theme);
        StatsCards::new(self.stats, self.theme).render(chunks[3], buf);

        self.render_label(chunks[4], buf, "Hours per day");
        self.render_trend(chunks[5], buf);

        self.render_label(chunks[7], buf, "Time by category");
        self.render_categories(chunks[8], buf);

        render_separator(chunks[10], buf, self.theme);
        render_keybindings(chunks[11], buf, &DASHBOARD_BINDINGS, self.theme);
    }
}

impl Overview<'_> {
    fn render_label(&self, area: Rect, buf: &mut Buffer, label: &str) {
        let line = Paragraph::new(Line::from(Span::styled(
            label,
            Style::default()
                .fg(self.theme.text())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center);
        line.render(area, buf);
    }

    /// Bar width left after label and value columns
    fn bar_width(area: Rect) -> usize {
        area.width.saturating_sub(LABEL_WIDTH + VALUE_WIDTH + 4) as usize
    }

    fn render_trend(&self, area: Rect, buf: &mut Buffer) {
        let trend = &self.stats.trend;
        let skip = trend.len().saturating_sub(area.height as usize);
        let max_hours = trend.iter().map(|p| p.hours).fold(0.0_f64, f64::max);
        let bar_width = Self::bar_width(area);

        for (row, point) in trend.iter().skip(skip).enumerate() {
            let y = area.y + row as u16;
            if y >= area.y + area.height {
                break;
            }
            let mut x = area.x + 2;
            buf.set_stringn(
                x,
                y,
                &point.date,
                LABEL_WIDTH as usize,
                Style::default().fg(self.theme.date()),
            );
            x += LABEL_WIDTH;
            buf.set_string(
                x,
                y,
                format_bar(point.hours, max_hours, bar_width),
                Style::default().fg(self.theme.bar()),
            );
            x += bar_width as u16 + 1;
            buf.set_string(
                x,
                y,
                format!("{:>6}", format_hours(point.hours)),
                Style::default().fg(self.theme.text()),
            );
            buf.set_string(
                x + 7,
                y,
                format!("{:>4}%", point.efficiency),
                Style::default().fg(self
                    .theme
                    .efficiency_color(efficiency_level(point.efficiency))),
            );
        }
    }

    fn render_categories(&self, area: Rect, buf: &mut Buffer) {
        if self.stats.categories.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                "No categorized tasks",
                Style::default().fg(self.theme.muted()),
            )))
            .alignment(Alignment::Center)
            .render(area, buf);
            return;
        }

        let bar_width = Self::bar_width(area);

        for (row, category) in self
            .stats
            .categories
            .iter()
            .take(area.height as usize)
            .enumerate()
        {
            let y = area.y + row as u16;
            let mut x = area.x + 2;
            buf.set_stringn(
                x,
                y,
                &category.name,
                LABEL_WIDTH as usize,
                Style::default().fg(self.theme.category()),
            );
            x += LABEL_WIDTH;
            buf.set_string(
                x,
                y,
                format_bar(category.percent, 100.0, bar_width),
                Style::default().fg(self.theme.accent()),
            );
            x += bar_width as u16 + 1;
            buf.set_string(
                x,
                y,
                format!("{:>6} {:>5.1}%", format_hours(category.hours), category.percent),
                Style::default().fg(self.theme.text()),
            );
        }
    }
}
