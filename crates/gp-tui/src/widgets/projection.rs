//! Projected stats table

use gp_core::UNCAPPED;
use gp_core::projection::Projection;
use gp_core::stats::Stat;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Row, Table, Widget};

use crate::theme::Theme;

/// Start, raw and capped stats side by side, with the final class caps
pub struct ProjectionWidget<'a> {
    projection: &'a Projection,
    caps: Option<gp_core::StatLine>,
    theme: &'a Theme,
}

impl<'a> ProjectionWidget<'a> {
    pub fn new(projection: &'a Projection, theme: &'a Theme) -> Self {
        Self {
            projection,
            caps: None,
            theme,
        }
    }

    pub fn with_caps(mut self, caps: gp_core::StatLine) -> Self {
        self.caps = Some(caps);
        self
    }

    fn cap_text(&self, stat: Stat) -> String {
        match self.caps.map(|caps| caps[stat]) {
            Some(cap) if cap != UNCAPPED => cap.to_string(),
            _ => "-".to_string(),
        }
    }
}

impl Widget for ProjectionWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let p = self.projection;
        let title = format!(" {} → {} Lv{} ", p.character, p.final_class, p.final_level);
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border));

        let raw = p.raw.rounded();
        let capped = p.capped.rounded();
        let rows: Vec<Row> = Stat::ALL
            .into_iter()
            .map(|stat| {
                let hit_cap = raw[stat] > capped[stat];
                let capped_style = if hit_cap {
                    Style::default().fg(self.theme.bad)
                } else {
                    Style::default().fg(self.theme.good)
                };
                Row::new(vec![
                    Cell::from(stat.short_name()).style(Style::default().fg(self.theme.header)),
                    Cell::from(p.start.stats[stat].to_string()),
                    Cell::from(format!("{:.2}", raw[stat])),
                    Cell::from(format!("{:.2}", capped[stat])).style(capped_style),
                    Cell::from(self.cap_text(stat)),
                ])
            })
            .collect();

        let header = Row::new(vec!["Stat", "Start", "Raw", "Capped", "Cap"])
            .style(Style::default().fg(self.theme.accent).add_modifier(Modifier::BOLD));
        let widths = [
            Constraint::Length(5),
            Constraint::Length(6),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(5),
        ];
        Widget::render(
            Table::new(rows, widths)
                .header(header)
                .block(block)
                .style(Style::default().fg(self.theme.text)),
            area,
            buf,
        );
    }
}
