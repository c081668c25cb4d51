//! Compass headings at an intersection.

use std::fmt;

use crate::error::{GrahaError, Result};

/// One of the four line directions leaving a node.
///
/// Ordering is N, E, S, W. Per-node edge maps iterate in this order,
/// which keeps search relaxation deterministic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Heading {
    North,
    East,
    South,
    West,
}

impl Heading {
    /// All headings in clockwise order starting at north.
    pub const ALL: [Heading; 4] = [Heading::North, Heading::East, Heading::South, Heading::West];

    /// Wire representation in degrees.
    pub fn degrees(self) -> i32 {
        match self {
            Heading::North => 0,
            Heading::East => 90,
            Heading::South => 180,
            Heading::West => 270,
        }
    }

    /// Convert a wire degree value. Only 0, 90, 180 and 270 are accepted.
    pub fn from_degrees(degrees: i32) -> Result<Self> {
        match degrees {
            0 => Ok(Heading::North),
            90 => Ok(Heading::East),
            180 => Ok(Heading::South),
            270 => Ok(Heading::West),
            other => Err(GrahaError::InvalidHeading(other)),
        }
    }

    /// Heading pointing the other way.
    pub fn opposite(self) -> Self {
        match self {
            Heading::North => Heading::South,
            Heading::East => Heading::West,
            Heading::South => Heading::North,
            Heading::West => Heading::East,
        }
    }

    /// Clockwise rotation in degrees needed to turn from `self` to `to` (0..360).
    pub fn turn_to(self, to: Heading) -> i32 {
        (to.degrees() - self.degrees()).rem_euclid(360)
    }
}

impl TryFrom<i32> for Heading {
    type Error = GrahaError;

    fn try_from(degrees: i32) -> Result<Self> {
        Heading::from_degrees(degrees)
    }
}

impl From<Heading> for i32 {
    fn from(heading: Heading) -> Self {
        heading.degrees()
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Heading::North => "N",
            Heading::East => "E",
            Heading::South => "S",
            Heading::West => "W",
        };
        write!(f, "{}", name)
    }
}
