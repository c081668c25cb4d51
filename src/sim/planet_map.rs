//! Ground-truth planet loaded from TOML.
//!
//! ```toml
//! name = "Gromit"
//! start = { x = 0, y = 0, orientation = 0 }
//! target = { x = 1, y = 1 }            # optional
//!
//! [[paths]]
//! start = { x = 0, y = 0 }
//! start_direction = 0
//! end = { x = 0, y = 1 }
//! end_direction = 180
//! weight = 1                           # -1 marks a blocked line
//!
//! [[unveil]]                           # lines revealed by another agent
//! # same fields as [[paths]]
//!
//! [[select]]                           # remote overrides, used once each
//! at = { x = 0, y = 1 }
//! direction = 90
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{GrahaError, Result};
use crate::planet::{BLOCKED, Heading, Node, Pose};
use crate::protocol::{PathReport, PathStatus};

#[derive(Debug, Deserialize)]
struct PlanetFile {
    name: String,
    start: StartEntry,
    #[serde(default)]
    target: Option<Node>,
    #[serde(default)]
    paths: Vec<PathEntry>,
    #[serde(default)]
    unveil: Vec<PathEntry>,
    #[serde(default)]
    select: Vec<SelectEntry>,
}

#[derive(Debug, Deserialize)]
struct StartEntry {
    x: i32,
    y: i32,
    /// Degrees
    orientation: i32,
}

#[derive(Debug, Deserialize)]
struct PathEntry {
    start: Node,
    start_direction: i32,
    end: Node,
    end_direction: i32,
    #[serde(default = "default_weight")]
    weight: i32,
}

#[derive(Debug, Deserialize)]
struct SelectEntry {
    at: Node,
    direction: i32,
}

fn default_weight() -> i32 {
    1
}

/// One side of a line as seen from its start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Line {
    pub end: Node,
    pub end_heading: Heading,
    /// Negative for blocked lines
    pub weight: i32,
}

impl Line {
    pub fn is_blocked(&self) -> bool {
        self.weight < 0
    }
}

/// Complete planet as the server knows it.
#[derive(Clone, Debug)]
pub struct PlanetMap {
    name: String,
    start: Pose,
    target: Option<Node>,
    lines: HashMap<(Node, Heading), Line>,
    unveil: Vec<PathReport>,
    select: Vec<(Node, Heading)>,
}

impl PlanetMap {
    /// Load a planet from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GrahaError::Config(format!("Failed to read planet {}: {}", path.display(), e))
        })?;
        let map = Self::from_toml(&content)?;
        tracing::info!(
            "Loaded planet {} from {}: {} lines",
            map.name,
            path.display(),
            map.line_count()
        );
        Ok(map)
    }

    /// Parse and validate a planet description.
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: PlanetFile = toml::from_str(content)?;

        let start = Pose::new(
            Node::new(file.start.x, file.start.y),
            Heading::from_degrees(file.start.orientation)?,
        );

        let mut lines = HashMap::new();
        for entry in file.paths.iter().chain(&file.unveil) {
            let report = entry.to_report()?;
            let weight = report.cost();
            lines.insert(
                (report.start, report.start_heading),
                Line {
                    end: report.end,
                    end_heading: report.end_heading,
                    weight,
                },
            );
            lines.insert(
                (report.end, report.end_heading),
                Line {
                    end: report.start,
                    end_heading: report.start_heading,
                    weight,
                },
            );
        }

        let unveil = file
            .unveil
            .iter()
            .map(PathEntry::to_report)
            .collect::<Result<Vec<_>>>()?;
        let select = file
            .select
            .iter()
            .map(|s| Heading::from_degrees(s.direction).map(|h| (s.at, h)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: file.name,
            start,
            target: file.target,
            lines,
            unveil,
            select,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start(&self) -> Pose {
        self.start
    }

    pub fn target(&self) -> Option<Node> {
        self.target
    }

    /// Line leaving `node` toward `heading`.
    pub fn line(&self, node: Node, heading: Heading) -> Option<&Line> {
        self.lines.get(&(node, heading))
    }

    /// Headings with a line at `node`, blocked ones included.
    pub fn headings_at(&self, node: Node) -> Vec<Heading> {
        Heading::ALL
            .into_iter()
            .filter(|&h| self.lines.contains_key(&(node, h)))
            .collect()
    }

    /// Lines revealed by another agent.
    pub fn unveiled(&self) -> &[PathReport] {
        &self.unveil
    }

    /// Remote overrides, in order.
    pub fn selections(&self) -> &[(Node, Heading)] {
        &self.select
    }

    /// Undirected line count.
    pub fn line_count(&self) -> usize {
        self.lines.len() / 2
    }
}

impl PathEntry {
    fn to_report(&self) -> Result<PathReport> {
        let blocked = self.weight < 0;
        Ok(PathReport {
            start: self.start,
            start_heading: Heading::from_degrees(self.start_direction)?,
            end: self.end,
            end_heading: Heading::from_degrees(self.end_direction)?,
            status: if blocked {
                PathStatus::Blocked
            } else {
                PathStatus::Free
            },
            weight: Some(if blocked { BLOCKED } else { self.weight }),
        })
    }
}
