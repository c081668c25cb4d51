//! Route planning over the discovered planet graph.
//!
//! All searches are stateless functions over [`crate::planet::PlanetGraph`]
//! and [`crate::planet::FrontierTracker`].

mod search;

pub use search::{Route, Step, next_frontier_heading, shortest_path, shortest_unexplored_path};
