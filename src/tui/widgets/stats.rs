//! Stat cards - headline numbers in a card grid

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Widget},
};

use super::overview::format_hours;
use crate::tui::theme::{efficiency_level, Theme};
use crate::types::DashboardStats;

/// Card dimensions
const CARD_WIDTH: u16 = 28;
const CARD_HEIGHT: u16 = 5;

const CARD_COUNT: usize = 4;

/// Calculate number of cards per row based on available width
fn cards_per_row(width: u16) -> usize {
    let usable_width = width.saturating_sub(4); // padding
    let cards = (usable_width / (CARD_WIDTH + 2)) as usize; // +2 for spacing
    cards.clamp(1, CARD_COUNT)
}

/// Centered x for `text` inside `area` using display width
fn centered_x(area: Rect, text: &str) -> u16 {
    let width = Span::raw(text).width() as u16;
    area.x + (area.width.saturating_sub(width)) / 2
}

/// Card grid for days, hours, efficiency and top category
pub struct StatsCards<'a> {
    stats: &'a DashboardStats,
    theme: Theme,
}

impl<'a> StatsCards<'a> {
    pub fn new(stats: &'a DashboardStats, theme: Theme) -> Self {
        Self { stats, theme }
    }

    /// Rows needed to draw the grid at `width`
    pub fn height_for(width: u16) -> u16 {
        let rows = CARD_COUNT.div_ceil(cards_per_row(width));
        (rows as u16) * (CARD_HEIGHT + 1)
    }
}

impl Widget for StatsCards<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let cols = cards_per_row(area.width);
        let cards = self.build_cards();

        let total_cards_width = (cols as u16) * CARD_WIDTH + ((cols - 1) as u16) * 2;
        let start_x = area.x + (area.width.saturating_sub(total_cards_width)) / 2;

        for (i, card) in cards.iter().enumerate() {
            let row = i / cols;
            let col = i % cols;

            let card_x = start_x + (col as u16) * (CARD_WIDTH + 2);
            let card_y = area.y + (row as u16) * (CARD_HEIGHT + 1);

            if card_y + CARD_HEIGHT > area.y + area.height
                || card_x + CARD_WIDTH > area.x + area.width
            {
                continue;
            }

            let card_area = Rect {
                x: card_x,
                y: card_y,
                width: CARD_WIDTH,
                height: CARD_HEIGHT,
            };

            self.render_card(card_area, buf, card);
        }
    }
}

impl StatsCards<'_> {
    fn build_cards(&self) -> Vec<StatCard> {
        let efficiency_color = self
            .theme
            .efficiency_color(efficiency_level(self.stats.avg_efficiency));

        vec![
            StatCard {
                title: "Days Entered".to_string(),
                value: self.stats.day_count.to_string(),
                value_color: self.theme.accent(),
                border_color: self.theme.accent(),
            },
            StatCard {
                title: "Total Hours".to_string(),
                value: format_hours(self.stats.total_hours),
                value_color: self.theme.stat_blue(),
                border_color: self.theme.stat_blue(),
            },
            StatCard {
                title: "Avg Efficiency".to_string(),
                value: format!("{}%", self.stats.avg_efficiency),
                value_color: efficiency_color,
                border_color: efficiency_color,
            },
            StatCard {
                title: "Top Category".to_string(),
                value: self
                    .stats
                    .top_category
                    .clone()
                    .unwrap_or_else(|| "N/A".to_string()),
                value_color: self.theme.stat_warm(),
                border_color: self.theme.category(),
            },
        ]
    }

    fn render_card(&self, area: Rect, buf: &mut Buffer, card: &StatCard) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(card.border_color));
        let inner = block.inner(area);
        block.render(area, buf);

        if area.height > 2 {
            buf.set_stringn(
                centered_x(inner, &card.title),
                area.y + 1,
                &card.title,
                inner.width as usize,
                Style::default().fg(card.border_color),
            );
        }

        if area.height > 3 {
            buf.set_stringn(
                centered_x(inner, &card.value),
                area.y + 3,
                &card.value,
                inner.width as usize,
                Style::default()
                    .fg(card.value_color)
                    .add_modifier(Modifier::BOLD),
            );
        }
    }
}

/// Internal card representation
struct StatCard {
    title: String,
    value: String,
    value_color: Color,
    border_color: Color,
}
