//! Session history list

use gp_core::history::SessionHistory;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Widget};

use crate::theme::Theme;

/// Saved projections with a cursor
pub struct HistoryWidget<'a> {
    history: &'a SessionHistory,
    cursor: usize,
    theme: &'a Theme,
}

impl<'a> HistoryWidget<'a> {
    pub fn new(history: &'a SessionHistory, cursor: usize, theme: &'a Theme) -> Self {
        Self {
            history,
            cursor,
            theme,
        }
    }
}

impl Widget for HistoryWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(" History ({}) ", self.history.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border));

        if self.history.is_empty() {
            Paragraph::new("No saved projections. Press s in the route view to save one.")
                .style(Style::default().fg(self.theme.text_muted))
                .block(block)
                .render(area, buf);
            return;
        }

        let items: Vec<ListItem> = self
            .history
            .entries()
            .enumerate()
            .map(|(i, entry)| {
                let style = if i == self.cursor {
                    Style::default().fg(self.theme.cursor_fg).bg(self.theme.cursor_bg)
                } else {
                    Style::default().fg(self.theme.text)
                };
                ListItem::new(entry.summary()).style(style)
            })
            .collect();
        Widget::render(List::new(items).block(block), area, buf);
    }
}
