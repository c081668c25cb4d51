//! Planet model: intersections, headings, costed lines and exploration
//! bookkeeping.
//!
//! - [`PlanetGraph`]: symmetric adjacency store of discovered lines
//! - [`FrontierTracker`]: undiscovered headings per node and the
//!   exploration stack

mod frontier;
mod graph;
mod heading;

pub use frontier::{Exploration, ExplorationSummary, FrontierTracker, StackMode};
pub use graph::PlanetGraph;
pub use heading::Heading;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Cost of a line that is known but must never be traversed.
pub const BLOCKED: i32 = -1;

/// An intersection at integer coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Node {
    pub x: i32,
    pub y: i32,
}

impl Node {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Node {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Where the agent stands and which way it faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pose {
    pub node: Node,
    pub orientation: Heading,
}

impl Pose {
    pub fn new(node: Node, orientation: Heading) -> Self {
        Self { node, orientation }
    }
}

/// Far end of a directed line entry: `(from, heading) -> (to, arrival, cost)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    /// Node at the other end
    pub to: Node,
    /// Heading at which the line enters `to`
    pub arrival: Heading,
    /// Traversal cost, or [`BLOCKED`]
    pub cost: i32,
}

impl Edge {
    pub fn new(to: Node, arrival: Heading, cost: i32) -> Self {
        Self { to, arrival, cost }
    }

    /// Whether the line may be used by path search.
    pub fn is_passable(&self) -> bool {
        self.cost >= 0
    }
}
