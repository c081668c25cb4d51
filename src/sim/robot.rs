//! Agent driving on a ground-truth planet.

use std::sync::Arc;

use super::planet_map::PlanetMap;
use crate::error::{GrahaError, Result};
use crate::planet::{Heading, Node};
use crate::robot::{LegOutcome, Robot};

/// Robot with perfect odometry on a [`PlanetMap`].
pub struct SimulatedRobot {
    map: Arc<PlanetMap>,
    node: Node,
    scans: usize,
    legs: usize,
}

impl SimulatedRobot {
    pub fn new(map: Arc<PlanetMap>) -> Self {
        let node = map.start().node;
        Self {
            map,
            node,
            scans: 0,
            legs: 0,
        }
    }

    /// True position.
    pub fn node(&self) -> Node {
        self.node
    }

    pub fn scans(&self) -> usize {
        self.scans
    }

    pub fn legs(&self) -> usize {
        self.legs
    }
}

impl Robot for SimulatedRobot {
    fn scan(&mut self, orientation: Heading) -> Result<Vec<Heading>> {
        self.scans += 1;
        let headings = self.map.headings_at(self.node);
        tracing::debug!(
            "Scan at {} facing {}: {:?}",
            self.node,
            orientation,
            headings
        );
        Ok(headings)
    }

    fn drive(&mut self, orientation: Heading, heading: Heading) -> Result<LegOutcome> {
        let line = self.map.line(self.node, heading).ok_or_else(|| {
            GrahaError::Robot(format!("no line at {} heading {}", self.node, heading))
        })?;
        self.legs += 1;
        tracing::debug!(
            "Turn {} degrees at {}",
            orientation.turn_to(heading),
            self.node
        );

        if line.is_blocked() {
            tracing::debug!("Obstacle on {} {}, returning", self.node, heading);
            return Ok(LegOutcome::blocked(self.node, heading));
        }
        self.node = line.end;
        Ok(LegOutcome::free(line.end, line.end_heading))
    }
}
