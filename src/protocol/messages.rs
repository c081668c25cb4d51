//! Message types exchanged with the mission server.
//!
//! Two layers:
//! - Wire payloads (`*Payload`): the JSON shapes, headings as raw degrees
//! - Events ([`InboundEvent`], [`OutboundEvent`]): validated, typed values
//!   consumed and produced by the navigator
//!
//! Conversion from wire to event rejects heading values other than
//! 0/90/180/270, so a malformed heading never reaches the graph.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::planet::{BLOCKED, Heading, Node};

/// Sender field of the envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Client,
    Server,
    Debug,
}

/// Whether a driven or reported line can be used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathStatus {
    Free,
    Blocked,
}

/// `testPlanet` payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestPlanetPayload {
    pub planet_name: String,
}

/// `planet` payload (server answer to `ready`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanetPayload {
    pub planet_name: String,
    pub start_x: i32,
    pub start_y: i32,
    pub start_orientation: i32,
}

/// `path` and `pathUnveiled` payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathPayload {
    pub start_x: i32,
    pub start_y: i32,
    pub start_direction: i32,
    pub end_x: i32,
    pub end_y: i32,
    pub end_direction: i32,
    pub path_status: PathStatus,
    /// Absent on client reports; the server fills it in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_weight: Option<i32>,
}

/// `pathSelect` payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathSelectPayload {
    pub start_x: i32,
    pub start_y: i32,
    pub start_direction: i32,
}

/// `target` payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetPayload {
    pub target_x: i32,
    pub target_y: i32,
}

/// Free-text payload of `targetReached`, `explorationCompleted` and `done`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPayload {
    pub message: String,
}

/// Every message type of the protocol, one variant per `type` value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WireMessage {
    TestPlanet(TestPlanetPayload),
    Ready,
    Planet(PlanetPayload),
    Path(PathPayload),
    PathSelect(PathSelectPayload),
    PathUnveiled(PathPayload),
    Target(TargetPayload),
    TargetReached(TextPayload),
    ExplorationCompleted(TextPayload),
    Done(TextPayload),
}

impl WireMessage {
    /// Value of the envelope's `type` field.
    pub fn kind(&self) -> &'static str {
        match self {
            WireMessage::TestPlanet(_) => "testPlanet",
            WireMessage::Ready => "ready",
            WireMessage::Planet(_) => "planet",
            WireMessage::Path(_) => "path",
            WireMessage::PathSelect(_) => "pathSelect",
            WireMessage::PathUnveiled(_) => "pathUnveiled",
            WireMessage::Target(_) => "target",
            WireMessage::TargetReached(_) => "targetReached",
            WireMessage::ExplorationCompleted(_) => "explorationCompleted",
            WireMessage::Done(_) => "done",
        }
    }
}

/// A message together with its sender.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    pub from: Origin,
    pub message: WireMessage,
}

/// A line report with validated headings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathReport {
    pub start: Node,
    pub start_heading: Heading,
    pub end: Node,
    pub end_heading: Heading,
    pub status: PathStatus,
    /// Cost as reported; `None` on client reports
    pub weight: Option<i32>,
}

impl PathReport {
    /// Cost to record in the graph. Blocked lines always get the sentinel.
    pub fn cost(&self) -> i32 {
        match self.status {
            PathStatus::Blocked => BLOCKED,
            PathStatus::Free => self.weight.unwrap_or(0),
        }
    }
}

impl TryFrom<&PathPayload> for PathReport {
    type Error = crate::error::GrahaError;

    fn try_from(p: &PathPayload) -> Result<Self> {
        Ok(Self {
            start: Node::new(p.start_x, p.start_y),
            start_heading: Heading::from_degrees(p.start_direction)?,
            end: Node::new(p.end_x, p.end_y),
            end_heading: Heading::from_degrees(p.end_direction)?,
            status: p.path_status,
            weight: p.path_weight,
        })
    }
}

impl From<&PathReport> for PathPayload {
    fn from(r: &PathReport) -> Self {
        Self {
            start_x: r.start.x,
            start_y: r.start.y,
            start_direction: r.start_heading.degrees(),
            end_x: r.end.x,
            end_y: r.end.y,
            end_direction: r.end_heading.degrees(),
            path_status: r.status,
            path_weight: r.weight,
        }
    }
}

/// Events the navigator consumes, in arrival order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InboundEvent {
    /// Ready acknowledgement with the start pose
    Planet {
        name: String,
        start: Node,
        orientation: Heading,
    },
    /// Authoritative confirmation of the last driven line
    Path(PathReport),
    /// Remote override of the proposed heading
    PathSelect { start: Node, heading: Heading },
    /// Line discovered by another agent
    PathUnveiled(PathReport),
    /// Commanded destination
    Target(Node),
    /// Mission finished
    Done { message: String },
}

impl InboundEvent {
    /// Validate a server message. Client-only message types are rejected.
    pub fn from_wire(message: &WireMessage) -> Result<Self> {
        use crate::error::GrahaError;

        let event = match message {
            WireMessage::Planet(p) => InboundEvent::Planet {
                name: p.planet_name.clone(),
                start: Node::new(p.start_x, p.start_y),
                orientation: Heading::from_degrees(p.start_orientation)?,
            },
            WireMessage::Path(p) => InboundEvent::Path(server_report(p)?),
            WireMessage::PathSelect(p) => InboundEvent::PathSelect {
                start: Node::new(p.start_x, p.start_y),
                heading: Heading::from_degrees(p.start_direction)?,
            },
            WireMessage::PathUnveiled(p) => InboundEvent::PathUnveiled(server_report(p)?),
            WireMessage::Target(t) => InboundEvent::Target(Node::new(t.target_x, t.target_y)),
            WireMessage::Done(t) => InboundEvent::Done {
                message: t.message.clone(),
            },
            other => {
                return Err(GrahaError::Protocol(format!(
                    "unexpected inbound message type '{}'",
                    other.kind()
                )));
            }
        };
        Ok(event)
    }
}

/// Line report from the server, which must carry a weight.
fn server_report(p: &PathPayload) -> Result<PathReport> {
    if p.path_weight.is_none() {
        return Err(crate::error::GrahaError::Protocol(
            "path report without pathWeight".into(),
        ));
    }
    PathReport::try_from(p)
}

/// Which topic family an outbound event belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    /// Mission-level topic (`explorer/<group>`)
    Explorer,
    /// Planet topic (`planet/<name>/<group>`)
    Planet,
}

/// Events the navigator emits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutboundEvent {
    TestPlanet { planet_name: String },
    Ready,
    Path(PathReport),
    PathSelect { start: Node, heading: Heading },
    TargetReached { message: String },
    ExplorationCompleted { message: String },
}

impl OutboundEvent {
    pub fn channel(&self) -> Channel {
        match self {
            OutboundEvent::Path(_) | OutboundEvent::PathSelect { .. } => Channel::Planet,
            _ => Channel::Explorer,
        }
    }

    pub fn to_wire(&self) -> WireMessage {
        match self {
            OutboundEvent::TestPlanet { planet_name } => {
                WireMessage::TestPlanet(TestPlanetPayload {
                    planet_name: planet_name.clone(),
                })
            }
            OutboundEvent::Ready => WireMessage::Ready,
            OutboundEvent::Path(report) => WireMessage::Path(report.into()),
            OutboundEvent::PathSelect { start, heading } => {
                WireMessage::PathSelect(PathSelectPayload {
                    start_x: start.x,
                    start_y: start.y,
                    start_direction: heading.degrees(),
                })
            }
            OutboundEvent::TargetReached { message } => WireMessage::TargetReached(TextPayload {
                message: message.clone(),
            }),
            OutboundEvent::ExplorationCompleted { message } => {
                WireMessage::ExplorationCompleted(TextPayload {
                    message: message.clone(),
                })
            }
        }
    }

    /// Envelope as sent by this client.
    pub fn to_envelope(&self) -> Envelope {
        Envelope {
            from: Origin::Client,
            message: self.to_wire(),
        }
    }
}
