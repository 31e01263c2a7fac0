//! Days view - per-day list with a detail pane

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use super::overview::{
    centered_content, format_hours, render_keybindings, render_separator, DASHBOARD_BINDINGS,
};
use super::tabs::{Tab, TabBar};
use crate::tui::theme::{efficiency_level, Theme};
use crate::types::ReportRecord;

/// Width of the day list column
const LIST_WIDTH: u16 = 40;

/// Column offsets inside the list (after the 2-char marker)
const COL_HOURS: u16 = 16;
const COL_TASKS: u16 = 24;
const COL_EFFICIENCY: u16 = 32;

/// First visible row so that `selected` stays on screen
pub fn list_offset(selected: Option<usize>, visible_rows: usize) -> usize {
    match selected {
        Some(i) if visible_rows > 0 && i >= visible_rows => i + 1 - visible_rows,
        _ => 0,
    }
}

/// Days view widget
pub struct DaysView<'a> {
    records: &'a [ReportRecord],
    selected: Option<usize>,
    theme: Theme,
}

impl<'a> DaysView<'a> {
    pub fn new(records: &'a [ReportRecord], selected: Option<usize>, theme: Theme) -> Self {
        Self {
            records,
            selected,
            theme,
        }
    }
}

impl Widget for DaysView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let centered_area = centered_content(area);

        let chunks = Layout::vertical([
            Constraint::Length(1), // Top padding
            Constraint::Length(1), // Tabs
            Constraint::Length(1), // Separator
            Constraint::Fill(1),   // Body
            Constraint::Length(1), // Separator
            Constraint::Length(1), // Keybindings
        ])
        .split(centered_area);

        TabBar::new(Tab::Days, self.theme).render(chunks[1], buf);
        render_separator(chunks[2], buf, self.theme);

        let body = Layout::horizontal([Constraint::Length(LIST_WIDTH), Constraint::Fill(1)])
            .spacing(2)
            .split(chunks[3]);
        self.render_list(body[0], buf);
        self.render_detail(body[1], buf);

        render_separator(chunks[4], buf, self.theme);

        let mut bindings = vec![("↑↓", "Select"), ("x", "Remove day")];
        bindings.extend_from_slice(&DASHBOARD_BINDINGS);
        render_keybindings(chunks[5], buf, &bindings, self.theme);
    }
}

impl DaysView<'_> {
    fn render_list(&self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let header_style = Style::default()
            .fg(self.theme.muted())
            .add_modifier(Modifier::BOLD);
        let x = area.x + 2;
        buf.set_stringn(x, area.y, "Date", area.width as usize, header_style);
        buf.set_string(x + COL_HOURS, area.y, "Hours", header_style);
        buf.set_string(x + COL_TASKS, area.y, "Tasks", header_style);
        buf.set_string(x + COL_EFFICIENCY, area.y, "Eff", header_style);

        let visible_rows = area.height.saturating_sub(1) as usize;
        let offset = list_offset(self.selected, visible_rows);

        for (row, (index, record)) in self
            .records
            .iter()
            .enumerate()
            .skip(offset)
            .take(visible_rows)
            .enumerate()
        {
            let y = area.y + 1 + row as u16;
            let is_selected = self.selected == Some(index);

            let (marker, date_style) = if is_selected {
                (
                    "▸ ",
                    Style::default()
                        .fg(self.theme.accent())
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                ("  ", Style::default().fg(self.theme.date()))
            };

            buf.set_string(area.x, y, marker, date_style);
            buf.set_stringn(
                x,
                y,
                record.date_label(),
                (COL_HOURS - 1) as usize,
                date_style,
            );
            buf.set_string(
                x + COL_HOURS,
                y,
                format_hours(record.day_hours()),
                Style::default().fg(self.theme.text()),
            );
            buf.set_string(
                x + COL_TASKS,
                y,
                record.tasks.len().to_string(),
                Style::default().fg(self.theme.text()),
            );
            buf.set_string(
                x + COL_EFFICIENCY,
                y,
                format!("{}%", record.efficiency_score),
                Style::default().fg(self
                    .theme
                    .efficiency_color(efficiency_level(record.efficiency_score))),
            );
        }
    }

    fn render_detail(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Day detail ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.muted()));

        let record = self.selected.and_then(|i| self.records.get(i));
        let lines = match record {
            Some(record) => self.detail_lines(record),
            None => vec![Line::from(Span::styled(
                "Select a day with ↑↓",
                Style::default().fg(self.theme.muted()),
            ))],
        };

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }

    fn section_header(&self, title: &'static str) -> Line<'static> {
        Line::from(Span::styled(
            title,
            Style::default()
                .fg(self.theme.date())
                .add_modifier(Modifier::BOLD),
        ))
    }

    fn detail_lines<'r>(&self, record: &'r ReportRecord) -> Vec<Line<'r>> {
        let muted = Style::default().fg(self.theme.muted());
        let text = Style::default().fg(self.theme.text());

        let mut lines = vec![
            Line::from(Span::styled(
                record.date_label(),
                Style::default()
                    .fg(self.theme.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled("Efficiency ", muted),
                Span::styled(
                    format!("{}%", record.efficiency_score),
                    Style::default().fg(self
                        .theme
                        .efficiency_color(efficiency_level(record.efficiency_score))),
                ),
                Span::styled("  Hours ", muted),
                Span::styled(format_hours(record.day_hours()), text),
                Span::styled("  Tasks ", muted),
                Span::styled(record.tasks.len().to_string(), text),
            ]),
            Line::default(),
        ];

        if !record.summary.trim().is_empty() {
            lines.push(self.section_header("Summary"));
            lines.push(Line::from(Span::styled(record.summary.as_str(), text)));
            lines.push(Line::default());
        }

        lines.push(self.section_header("Tasks"));
        if record.tasks.is_empty() {
            lines.push(Line::from(Span::styled("  (none)", muted)));
        }
        for task in &record.tasks {
            let mut spans = vec![Span::styled("• ", muted)];
            if !task.category.trim().is_empty() {
                spans.push(Span::styled(
                    format!("[{}] ", task.category),
                    Style::default().fg(self.theme.category()),
                ));
            }
            spans.push(Span::styled(task.title.as_str(), text));
            spans.push(Span::styled(
                format!("  {}", format_hours(task.duration_minutes as f64 / 60.0)),
                Style::default().fg(self.theme.bar()),
            ));
            if let Some(range) = task.time_range() {
                spans.push(Span::styled(format!("  {}", range), muted));
            }
            lines.push(Line::from(spans));

            if let Some(description) = &task.description {
                lines.push(Line::from(Span::styled(format!("    {}", description), muted)));
            }
        }

        if !record.suggestions.is_empty() {
            lines.push(Line::default());
            lines.push(self.section_header("Suggestions"));
            for suggestion in &record.suggestions {
                lines.push(Line::from(vec![
                    Span::styled("• ", muted),
                    Span::styled(suggestion.as_str(), text),
                ]));
            }
        }

        lines
    }
}
