//! Help popup widget - displays keyboard shortcuts

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::tui::theme::Theme;

/// Version from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Width and height of the help popup
const POPUP_WIDTH: u16 = 46;
const POPUP_HEIGHT: u16 = 21;

const NAVIGATION: [(&str, &str); 3] = [
    ("Tab / Shift+Tab", "Switch view"),
    ("1-3", "Jump to view"),
    ("Up/Down or j/k", "Select day / scroll"),
];

const ACTIONS: [(&str, &str); 4] = [
    ("i / n", "Add more reports"),
    ("x / Delete", "Remove selected day"),
    ("c", "Clear all days"),
    ("Ctrl+S", "Analyze (input view)"),
];

const GENERAL: [(&str, &str); 3] = [
    ("q", "Quit (dashboard)"),
    ("Ctrl+C", "Quit"),
    ("?", "Toggle help"),
];

/// Help popup widget showing keyboard shortcuts
pub struct HelpPopup {
    theme: Theme,
}

impl HelpPopup {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// Calculate centered popup area
    pub fn centered_area(area: Rect) -> Rect {
        let x = area.x + (area.width.saturating_sub(POPUP_WIDTH)) / 2;
        let y = area.y + (area.height.saturating_sub(POPUP_HEIGHT)) / 2;
        Rect {
            x,
            y,
            width: POPUP_WIDTH.min(area.width),
            height: POPUP_HEIGHT.min(area.height),
        }
    }
}

impl Widget for HelpPopup {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let title = format!(" worklens v{} ", VERSION);
        let block = Block::default()
            .title(title)
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent()));

        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = Vec::new();
        for (i, (header, bindings)) in [
            ("Navigation", &NAVIGATION[..]),
            ("Actions", &ACTIONS[..]),
            ("General", &GENERAL[..]),
        ]
        .into_iter()
        .enumerate()
        {
            if i > 0 {
                lines.push(Line::default());
            }
            lines.push(Line::from(Span::styled(
                header,
                Style::default()
                    .fg(self.theme.date())
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(
                "─".repeat(inner.width as usize),
                Style::default().fg(self.theme.muted()),
            )));
            lines.extend(
                bindings
                    .iter()
                    .map(|(key, desc)| keybinding_line(key, desc, self.theme)),
            );
        }

        let chunks = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).split(inner);
        Paragraph::new(lines).render(chunks[0], buf);

        Paragraph::new(Line::from(Span::styled(
            "Press ? to close",
            Style::default().fg(self.theme.muted()),
        )))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);
    }
}

/// Build a single keybinding line
fn keybinding_line<'a>(key: &'a str, desc: &'a str, theme: Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {:<18}", key), Style::default().fg(theme.accent())),
        Span::styled(desc, Style::default().fg(theme.text())),
    ])
}
