//! Stacked growth-rate bar chart
//!
//! One bar per stat, layered bottom to top as personal, parent, class and
//! boon/bane. A bane shrinks the bar; the lost part is hatched in the bad
//! color. The y-axis runs from 0 to the breakdown's chart ceiling.

use gp_core::growth::{Component, GrowthBreakdown};
use gp_core::stats::Stat;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Widget};

use crate::theme::Theme;

const FILL: &str = "█";
const HATCH: &str = "░";

/// Rows `[from, to)` of one bar, counted from the bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub component: Component,
    pub from: u16,
    pub to: u16,
    /// Part removed by a negative contribution
    pub negative: bool,
}

fn rows_for(value: i32, height: u16, ceiling: i32) -> u16 {
    if value <= 0 || ceiling <= 0 {
        return 0;
    }
    let rows = (i64::from(value) * i64::from(height) + i64::from(ceiling) / 2) / i64::from(ceiling);
    rows.min(i64::from(height)) as u16
}

/// Row ranges for one stat's bar in a plot `height` rows tall
pub fn bar_segments(breakdown: &GrowthBreakdown, stat: Stat, height: u16) -> Vec<Segment> {
    let ceiling = breakdown.chart_ceiling();
    let mut segments = Vec::new();
    let mut level = 0i32;

    for (component, line) in breakdown.components() {
        let value = line[stat];
        if value == 0 {
            continue;
        }
        let next = level + value;
        let (low, high) = (level.min(next), level.max(next));
        let (from, to) = (rows_for(low, height, ceiling), rows_for(high, height, ceiling));
        if to > from {
            segments.push(Segment {
                component,
                from,
                to,
                negative: value < 0,
            });
        }
        level = next;
    }
    segments
}

/// Widget drawing a [`GrowthBreakdown`]
pub struct GrowthChartWidget<'a> {
    breakdown: &'a GrowthBreakdown,
    title: String,
    theme: &'a Theme,
}

impl<'a> GrowthChartWidget<'a> {
    pub fn new(breakdown: &'a GrowthBreakdown, character: &str, theme: &'a Theme) -> Self {
        Self {
            breakdown,
            title: format!(" {character}  total {} ", breakdown.total_sum()),
            theme,
        }
    }

    fn render_legend(&self, area: Rect, buf: &mut Buffer) {
        let mut x = area.x;
        for (component, _) in self.breakdown.components() {
            let label = format!(" {component}  ");
            if x + 1 >= area.right() {
                break;
            }
            buf.set_string(x, area.y, FILL, Style::default().fg(self.theme.component(component)));
            buf.set_string(x + 1, area.y, &label, Style::default().fg(self.theme.text_dim));
            x = x.saturating_add(1 + label.chars().count() as u16);
        }
    }
}

impl Widget for GrowthChartWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(self.title.as_str())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border_accent));
        let inner = block.inner(area);
        block.render(area, buf);

        // legend, plot, totals, labels
        if inner.height < 4 || inner.width < Stat::ALL.len() as u16 {
            return;
        }
        self.render_legend(Rect { height: 1, ..inner }, buf);

        let plot_height = inner.height - 3;
        let plot_bottom = inner.y + 1 + plot_height;
        let column = inner.width / Stat::ALL.len() as u16;
        let bar_width = column.saturating_sub(2).max(1);
        let total = self.breakdown.total();

        for (i, stat) in Stat::ALL.into_iter().enumerate() {
            let x = inner.x + i as u16 * column + (column - bar_width) / 2;

            for segment in bar_segments(self.breakdown, stat, plot_height) {
                let (symbol, color) = if segment.negative {
                    (HATCH, self.theme.bad)
                } else {
                    (FILL, self.theme.component(segment.component))
                };
                for row in segment.from..segment.to {
                    let y = plot_bottom - 1 - row;
                    for dx in 0..bar_width {
                        buf.set_string(x + dx, y, symbol, Style::default().fg(color));
                    }
                }
            }

            let value_style = if total[stat] < 0 {
                Style::default().fg(self.theme.bad)
            } else {
                Style::default().fg(self.theme.text)
            };
            buf.set_string(x, plot_bottom, total[stat].to_string(), value_style);
            buf.set_string(
                x,
                plot_bottom + 1,
                stat.short_name(),
                Style::default().fg(self.theme.header),
            );
        }
    }
}
