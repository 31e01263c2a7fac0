//! Input view - multi-line report entry

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use super::overview::{centered_content, render_keybindings, render_separator};
use super::spinner::{Spinner, ANALYZING_MESSAGE};
use crate::tui::theme::Theme;

const PLACEHOLDER: &str = "Paste or type one or more days of work reports here.";
const CURSOR: &str = "▏";

/// Last `height` lines of `text`, the region around the cursor
pub fn tail_lines(text: &str, height: usize) -> Vec<&str> {
    let lines: Vec<&str> = text.split('\n').collect();
    let start = lines.len().saturating_sub(height);
    lines[start..].to_vec()
}

/// Input view widget
pub struct InputView<'a> {
    text: &'a str,
    busy: bool,
    error: Option<&'a str>,
    record_count: usize,
    spinner_frame: usize,
    theme: Theme,
}

impl<'a> InputView<'a> {
    pub fn new(text: &'a str, theme: Theme) -> Self {
        Self {
            text,
            busy: false,
            error: None,
            record_count: 0,
            spinner_frame: 0,
            theme,
        }
    }

    pub fn busy(mut self, busy: bool, spinner_frame: usize) -> Self {
        self.busy = busy;
        self.spinner_frame = spinner_frame;
        self
    }

    pub fn error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }

    pub fn record_count(mut self, count: usize) -> Self {
        self.record_count = count;
        self
    }
}

impl Widget for InputView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let centered_area = centered_content(area);
        let error_height = if self.error.is_some() { 4 } else { 0 };

        let chunks = Layout::vertical([
            Constraint::Length(1),            // 0: Top padding
            Constraint::Length(1),            // 1: Title
            Constraint::Length(1),            // 2: Separator
            Constraint::Fill(1),              // 3: Editor
            Constraint::Length(error_height), // 4: Error box
            Constraint::Length(1),            // 5: Status
            Constraint::Length(1),            // 6: Separator
            Constraint::Length(1),            // 7: Keybindings
        ])
        .split(centered_area);

        self.render_title(chunks[1], buf);
        render_separator(chunks[2], buf, self.theme);
        self.render_editor(chunks[3], buf);
        if let Some(message) = self.error {
            self.render_error(chunks[4], buf, message);
        }
        self.render_status(chunks[5], buf);
        render_separator(chunks[6], buf, self.theme);

        let mut bindings = vec![("Ctrl+S", "Analyze"), ("Ctrl+U", "Clear text")];
        if self.error.is_some() {
            bindings.push(("Esc", "Dismiss"));
        } else if self.record_count > 0 && !self.busy {
            bindings.push(("Esc", "Dashboard"));
        }
        bindings.push(("Ctrl+C", "Quit"));
        render_keybindings(chunks[7], buf, &bindings, self.theme);
    }
}

impl InputView<'_> {
    fn render_title(&self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![
            Span::styled(
                "worklens",
                Style::default()
                    .fg(self.theme.accent())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "  daily report analysis",
                Style::default().fg(self.theme.muted()),
            ),
        ];
        if self.record_count > 0 {
            spans.push(Span::styled(
                format!("  [{} days in session]", self.record_count),
                Style::default().fg(self.theme.bar()),
            ));
        }
        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .render(area, buf);
    }

    fn render_editor(&self, area: Rect, buf: &mut Buffer) {
        let border_color = if self.busy {
            self.theme.muted()
        } else {
            self.theme.accent()
        };
        let block = Block::default()
            .title(" Daily reports ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.text.is_empty() {
            let mut spans = vec![Span::styled(
                PLACEHOLDER,
                Style::default().fg(self.theme.muted()),
            )];
            if !self.busy {
                spans.insert(0, Span::styled(CURSOR, Style::default().fg(self.theme.accent())));
            }
            Paragraph::new(Line::from(spans)).render(inner, buf);
            return;
        }

        let text_style = Style::default().fg(self.theme.text());
        let visible = tail_lines(self.text, inner.height as usize);
        let last = visible.len().saturating_sub(1);
        let lines: Vec<Line> = visible
            .into_iter()
            .enumerate()
            .map(|(i, line)| {
                if i == last && !self.busy {
                    Line::from(vec![
                        Span::styled(line, text_style),
                        Span::styled(CURSOR, Style::default().fg(self.theme.accent())),
                    ])
                } else {
                    Line::from(Span::styled(line, text_style))
                }
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }

    fn render_error(&self, area: Rect, buf: &mut Buffer, message: &str) {
        let block = Block::default()
            .title(" Analysis failed ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.error()));
        Paragraph::new(Line::from(Span::styled(
            message,
            Style::default().fg(self.theme.error()),
        )))
        .block(block)
        .wrap(Wrap { trim: true })
        .render(area, buf);
    }

    fn render_status(&self, area: Rect, buf: &mut Buffer) {
        if self.busy {
            Spinner::new(self.spinner_frame, ANALYZING_MESSAGE, self.theme).render(area, buf);
            return;
        }

        let chars = self.text.chars().count();
        let lines = if self.text.is_empty() {
            0
        } else {
            self.text.split('\n').count()
        };
        Paragraph::new(Line::from(Span::styled(
            format!("{} lines, {} characters", lines, chars),
            Style::default().fg(self.theme.muted()),
        )))
        .alignment(Alignment::Center)
        .render(area, buf);
    }
}
