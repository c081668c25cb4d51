//! Simulated mission server.
//!
//! Consumes the frames a [`ChannelTransport`](crate::protocol::ChannelTransport)
//! publishes and answers the way the real server does, from the ground
//! truth of a [`PlanetMap`]. Replies are encoded and fed through an
//! [`InboxSender`], so they take the same decode path as network traffic.

use std::sync::Arc;

use crossbeam_channel::Receiver;

use super::planet_map::PlanetMap;
use crate::error::Result;
use crate::planet::{BLOCKED, Heading, Node};
use crate::protocol::messages::{
    PathSelectPayload, PlanetPayload, TargetPayload, TextPayload,
};
use crate::protocol::{
    Envelope, Frame, InboxSender, Origin, PathReport, PathStatus, WireMessage, wire,
};

/// Frames seen by the mothership, for inspection after the mission.
#[derive(Clone, Debug, Default)]
pub struct MothershipLog {
    /// Topic and message type of every client frame, in order
    pub received: Vec<(String, String)>,
    pub paths: usize,
    pub overrides_sent: usize,
}

impl MothershipLog {
    /// Message types received, in order.
    pub fn kinds(&self) -> Vec<&str> {
        self.received.iter().map(|(_, kind)| kind.as_str()).collect()
    }
}

pub struct Mothership {
    map: Arc<PlanetMap>,
    frames: Receiver<Frame>,
    inbox: InboxSender,
    /// Overrides not issued yet
    selections: Vec<(Node, Heading)>,
    unveiled: bool,
    log: MothershipLog,
}

impl Mothership {
    pub fn new(map: Arc<PlanetMap>, frames: Receiver<Frame>, inbox: InboxSender) -> Self {
        let selections = map.selections().to_vec();
        Self {
            map,
            frames,
            inbox,
            selections,
            unveiled: false,
            log: MothershipLog::default(),
        }
    }

    /// Serve until the client side hangs up.
    pub fn run(mut self) -> Result<MothershipLog> {
        tracing::info!("Mothership serving planet {}", self.map.name());
        while let Ok(frame) = self.frames.recv() {
            self.handle(&frame)?;
        }
        tracing::debug!("Client disconnected");
        Ok(self.log)
    }

    fn handle(&mut self, frame: &Frame) -> Result<()> {
        let envelope = match wire::decode(&frame.bytes) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!("Mothership dropped frame on {}: {}", frame.topic, e);
                return Ok(());
            }
        };
        if envelope.from != Origin::Client {
            return Ok(());
        }
        self.log
            .received
            .push((frame.topic.clone(), envelope.message.kind().to_string()));

        match envelope.message {
            WireMessage::TestPlanet(p) => {
                if p.planet_name != self.map.name() {
                    tracing::warn!(
                        "Test planet {} requested, serving {}",
                        p.planet_name,
                        self.map.name()
                    );
                }
            }
            WireMessage::Ready => {
                let start = self.map.start();
                self.send(WireMessage::Planet(PlanetPayload {
                    planet_name: self.map.name().to_string(),
                    start_x: start.node.x,
                    start_y: start.node.y,
                    start_orientation: start.orientation.degrees(),
                }))?;
                if let Some(target) = self.map.target() {
                    self.send(WireMessage::Target(TargetPayload {
                        target_x: target.x,
                        target_y: target.y,
                    }))?;
                }
            }
            WireMessage::Path(p) => {
                let reported = PathReport::try_from(&p)?;
                self.confirm_path(reported)?;
            }
            WireMessage::PathSelect(p) => {
                let start = Node::new(p.start_x, p.start_y);
                if let Some(pos) = self.selections.iter().position(|&(at, _)| at == start) {
                    let (_, heading) = self.selections.remove(pos);
                    self.log.overrides_sent += 1;
                    self.send(WireMessage::PathSelect(PathSelectPayload {
                        start_x: start.x,
                        start_y: start.y,
                        start_direction: heading.degrees(),
                    }))?;
                }
            }
            WireMessage::TargetReached(t) => {
                tracing::info!("Client reports: {}", t.message);
                self.send(WireMessage::Done(TextPayload {
                    message: "Target reached".into(),
                }))?;
            }
            WireMessage::ExplorationCompleted(t) => {
                tracing::info!("Client reports: {}", t.message);
                self.send(WireMessage::Done(TextPayload {
                    message: "Planet explored".into(),
                }))?;
            }
            other => tracing::warn!("Unexpected client message '{}'", other.kind()),
        }
        Ok(())
    }

    /// Echo a driven path with the true end and weight, then reveal the
    /// lines found by other agents once.
    fn confirm_path(&mut self, reported: PathReport) -> Result<()> {
        let Some(line) = self.map.line(reported.start, reported.start_heading) else {
            tracing::warn!(
                "Client drove a line that does not exist: {} {}",
                reported.start,
                reported.start_heading
            );
            return Ok(());
        };
        self.log.paths += 1;

        let confirmed = if line.is_blocked() {
            PathReport {
                end: reported.start,
                end_heading: reported.start_heading,
                status: PathStatus::Blocked,
                weight: Some(BLOCKED),
                ..reported
            }
        } else {
            PathReport {
                end: line.end,
                end_heading: line.end_heading,
                status: PathStatus::Free,
                weight: Some(line.weight),
                ..reported
            }
        };
        self.send(WireMessage::Path((&confirmed).into()))?;

        if !self.unveiled {
            self.unveiled = true;
            for report in self.map.unveiled() {
                self.send(WireMessage::PathUnveiled(report.into()))?;
            }
        }
        Ok(())
    }

    fn send(&self, message: WireMessage) -> Result<()> {
        let bytes = wire::encode(&Envelope {
            from: Origin::Server,
            message,
        })?;
        self.inbox.push_frame(&bytes);
        Ok(())
    }
}
