//! Physical agent seam.
//!
//! The mission loop drives the agent only through [`Robot`]: one scan on
//! arrival at a node and one drive per committed heading. Line following,
//! turning and odometry stay behind the implementation.

use crate::error::Result;
use crate::planet::{Heading, Node};
use crate::protocol::PathStatus;

/// Local result of driving one line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LegOutcome {
    pub status: PathStatus,
    /// Estimated end node
    pub end: Node,
    /// Estimated heading at the end node, pointing back along the line
    pub end_heading: Heading,
}

impl LegOutcome {
    pub fn free(end: Node, end_heading: Heading) -> Self {
        Self {
            status: PathStatus::Free,
            end,
            end_heading,
        }
    }

    /// Obstacle on the line; the agent turned around and returned.
    pub fn blocked(start: Node, start_heading: Heading) -> Self {
        Self {
            status: PathStatus::Blocked,
            end: start,
            end_heading: start_heading,
        }
    }
}

/// Agent that can scan a node and drive a line.
pub trait Robot {
    /// Headings with a line leaving the current node, given the agent's
    /// orientation on arrival.
    fn scan(&mut self, orientation: Heading) -> Result<Vec<Heading>>;

    /// Turn from `orientation` to `heading` and follow the line to the next
    /// node, or back to the start when the line is blocked.
    fn drive(&mut self, orientation: Heading, heading: Heading) -> Result<LegOutcome>;
}
