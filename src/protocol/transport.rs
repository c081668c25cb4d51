//! Publish/subscribe seam toward the mission server.
//!
//! Connection setup and authentication belong to the concrete transport.
//! The navigator only needs to publish encoded frames on a topic and to
//! subscribe to the planet topic once the planet name is known; inbound
//! frames are handed to an [`super::InboxSender`] by the transport itself.

use crossbeam_channel::Sender;

use super::messages::{Channel, OutboundEvent};
use super::wire;
use crate::error::{GrahaError, Result};

/// Transport trait for server communication
pub trait Transport: Send {
    /// Publish one encoded frame on `topic`
    fn publish(&mut self, topic: &str, frame: &[u8]) -> Result<()>;

    /// Start receiving frames published on `topic`
    fn subscribe(&mut self, topic: &str) -> Result<()> {
        tracing::debug!("Subscribe to {} (no-op)", topic);
        Ok(())
    }
}

/// Topic naming for one agent group.
///
/// In comtest mode both topic families move under `comtest/`, which the
/// protocol test server listens on.
#[derive(Clone, Debug)]
pub struct Topics {
    group_id: String,
    planet: Option<String>,
    comtest: bool,
}

impl Topics {
    pub fn new(group_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            planet: None,
            comtest: false,
        }
    }

    pub fn with_comtest(mut self, comtest: bool) -> Self {
        self.comtest = comtest;
        self
    }

    /// Mission-level topic, subscribed from the start.
    pub fn explorer(&self) -> String {
        if self.comtest {
            format!("comtest/{}", self.group_id)
        } else {
            format!("explorer/{}", self.group_id)
        }
    }

    /// Planet topic, once the planet name is known.
    pub fn planet(&self) -> Option<String> {
        let prefix = if self.comtest { "comtest" } else { "planet" };
        self.planet
            .as_ref()
            .map(|name| format!("{}/{}/{}", prefix, name, self.group_id))
    }

    pub fn set_planet(&mut self, name: impl Into<String>) {
        self.planet = Some(name.into());
    }

    /// Topic for an outbound channel.
    pub fn resolve(&self, channel: Channel) -> Result<String> {
        match channel {
            Channel::Explorer => Ok(self.explorer()),
            Channel::Planet => self
                .planet()
                .ok_or_else(|| GrahaError::Protocol("planet topic not known yet".into())),
        }
    }
}

/// Encode an outbound event and publish it on its topic.
pub fn publish_event<T: Transport + ?Sized>(
    transport: &mut T,
    topics: &Topics,
    event: &OutboundEvent,
) -> Result<()> {
    let topic = topics.resolve(event.channel())?;
    let frame = wire::encode(&event.to_envelope())?;
    tracing::debug!("Send to {}: {}", topic, event.to_wire().kind());
    transport.publish(&topic, &frame)
}

/// A published frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub topic: String,
    pub bytes: Vec<u8>,
}

/// Transport that forwards every published frame into a channel, for an
/// in-process peer such as the simulated mothership.
pub struct ChannelTransport {
    tx: Sender<Frame>,
}

impl ChannelTransport {
    pub fn new(tx: Sender<Frame>) -> Self {
        Self { tx }
    }
}

impl Transport for ChannelTransport {
    fn publish(&mut self, topic: &str, frame: &[u8]) -> Result<()> {
        self.tx
            .send(Frame {
                topic: topic.to_string(),
                bytes: frame.to_vec(),
            })
            .map_err(|_| GrahaError::TransportClosed)
    }
}
