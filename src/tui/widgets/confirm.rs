//! Confirmation popup for irreversible actions

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::tui::theme::Theme;

/// Width and height of the confirm popup
const POPUP_WIDTH: u16 = 46;
const POPUP_HEIGHT: u16 = 8;

/// Which button is highlighted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmChoice {
    Yes,
    #[default]
    No,
}

impl ConfirmChoice {
    pub fn toggle(self) -> Self {
        match self {
            Self::Yes => Self::No,
            Self::No => Self::Yes,
        }
    }
}

/// Confirmation popup overlay
pub struct ConfirmPopup<'a> {
    title: &'a str,
    question: &'a str,
    choice: ConfirmChoice,
    theme: Theme,
}

impl<'a> ConfirmPopup<'a> {
    pub fn new(title: &'a str, question: &'a str, choice: ConfirmChoice, theme: Theme) -> Self {
        Self {
            title,
            question,
            choice,
            theme,
        }
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

    fn button_style(&self, active: bool) -> (&'static str, Style) {
        if active {
            (
                "▸ ",
                Style::default()
                    .fg(self.theme.accent())
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            ("  ", Style::default().fg(self.theme.muted()))
        }
    }
}

impl Widget for ConfirmPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.error()));

        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::vertical([
            Constraint::Length(1), // [0] Padding
            Constraint::Length(2), // [1] Question
            Constraint::Length(1), // [2] Padding
            Constraint::Length(1), // [3] Buttons
            Constraint::Length(1), // [4] Key hints
        ])
        .split(inner);

        Paragraph::new(Line::from(Span::styled(
            self.question,
            Style::default().fg(self.theme.text()),
        )))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[1], buf);

        let (yes_marker, yes_style) = self.button_style(self.choice == ConfirmChoice::Yes);
        let (no_marker, no_style) = self.button_style(self.choice == ConfirmChoice::No);

        let buttons_line = Line::from(vec![
            Span::styled(yes_marker, yes_style),
            Span::styled("Yes", yes_style),
            Span::styled("       ", Style::default()),
            Span::styled(no_marker, no_style),
            Span::styled("No", no_style),
        ]);
        Paragraph::new(buttons_line)
            .alignment(Alignment::Center)
            .render(chunks[3], buf);

        let hint_style = Style::default().fg(self.theme.muted());
        let hint_line = Line::from(vec![
            Span::styled("←→", hint_style.add_modifier(Modifier::BOLD)),
            Span::styled(" Select  ", hint_style),
            Span::styled("Enter", hint_style.add_modifier(Modifier::BOLD)),
            Span::styled(" Confirm  ", hint_style),
            Span::styled("Esc", hint_style.add_modifier(Modifier::BOLD)),
            Span::styled(" Cancel", hint_style),
        ]);
        Paragraph::new(hint_line)
            .alignment(Alignment::Center)
            .render(chunks[4], buf);
    }
}
