//! Decision making on top of the planet graph.

mod navigator;
mod state;

pub use navigator::{Navigator, NavigatorConfig};
pub use state::{Decision, NavState};
