//! gp-core: Rules for the growth planner
//!
//! This crate holds the growth-rate composition, expected-stat projection
//! and damage formula, together with the table loaders they read from.
//! Nothing here touches the terminal; the UI lives in `gp-tui`.

pub mod damage;
pub mod data;
pub mod growth;
pub mod history;
pub mod inheritance;
pub mod options;
pub mod projection;
pub mod stats;

mod consts;

pub use consts::*;
pub use data::{DataError, Dataset};
pub use growth::{GrowthBreakdown, GrowthQuery, Trait};
pub use history::{HistoryEntry, SessionHistory};
pub use options::{OptionsError, PlannerOptions};
pub use projection::{Interval, Projection, ProjectionError, ProjectionPlan, StartPoint};
pub use stats::{ExpectedStats, Stat, StatLine};
