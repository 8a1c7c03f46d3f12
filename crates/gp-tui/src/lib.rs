//! gp-tui: Terminal UI for the growth planner
//!
//! Three views share one [`App`]: the growth breakdown chart, the route
//! projection editor and the session history.

pub mod app;
pub mod input;
pub mod theme;
pub mod widgets;

pub use app::{App, Field, UiMode, View};
pub use input::Action;
pub use theme::Theme;
