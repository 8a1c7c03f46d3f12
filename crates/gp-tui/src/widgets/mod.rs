//! Custom widgets

mod growth_chart;
mod history;
mod projection;

pub use growth_chart::{GrowthChartWidget, Segment, bar_segments};
pub use history::HistoryWidget;
pub use projection::ProjectionWidget;
