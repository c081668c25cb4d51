//! Inbound event queue.
//!
//! A transport receiver (any thread) hands raw frames to an [`InboxSender`],
//! which decodes and validates them and appends the resulting events to an
//! unbounded FIFO channel. The decision loop owns the [`Inbox`] and drains it
//! only between physical actions, so events are applied in arrival order and
//! never concurrently with a decision.
//!
//! # Example
//!
//! ```ignore
//! let (inbox, sender) = inbox();
//! std::thread::spawn(move || {
//!     while let Some(frame) = socket_recv() {
//!         sender.push_frame(&frame);
//!     }
//! });
//! for event in inbox.drain() {
//!     navigator.apply(event);
//! }
//! ```

use std::time::Instant;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};

use super::messages::{InboundEvent, Origin};
use super::wire;
use crate::error::{GrahaError, Result};

/// Create a connected inbox / sender pair.
pub fn inbox() -> (Inbox, InboxSender) {
    let (tx, rx) = unbounded();
    (Inbox { rx }, InboxSender { tx })
}

/// Producer side, cloneable across receiver threads.
#[derive(Clone)]
pub struct InboxSender {
    tx: Sender<InboundEvent>,
}

impl InboxSender {
    /// Decode, validate and enqueue one frame.
    ///
    /// Own echoes (`from: client`) and debug traffic are skipped. Frames
    /// that fail to decode, carry invalid headings or lack a line weight are logged and
    /// dropped. Returns whether an event was enqueued.
    pub fn push_frame(&self, bytes: &[u8]) -> bool {
        let envelope = match wire::decode(bytes) {
            Ok(envelope) => envelope,
            Err(GrahaError::UnrecognizedMessage(kind)) => {
                tracing::warn!("Ignoring message of unknown type '{}'", kind);
                return false;
            }
            Err(e) => {
                tracing::warn!("Dropping malformed frame: {}", e);
                return false;
            }
        };

        match envelope.from {
            Origin::Server => {}
            Origin::Debug => {
                tracing::debug!("Debug message: {:?}", envelope.message);
                return false;
            }
            Origin::Client => return false,
        }

        match InboundEvent::from_wire(&envelope.message) {
            Ok(event) => self.push(event),
            Err(e) => {
                tracing::warn!("Dropping '{}' message: {}", envelope.message.kind(), e);
                false
            }
        }
    }

    /// Enqueue an already validated event.
    pub fn push(&self, event: InboundEvent) -> bool {
        if self.tx.send(event).is_err() {
            tracing::warn!("Inbox closed, event dropped");
            return false;
        }
        true
    }
}

/// Consumer side, owned by the decision loop.
pub struct Inbox {
    rx: Receiver<InboundEvent>,
}

impl Inbox {
    /// Take every event queued so far, in arrival order.
    pub fn drain(&self) -> Vec<InboundEvent> {
        self.rx.try_iter().collect()
    }

    /// Wait for the next event until `deadline`.
    ///
    /// Returns `Ok(None)` when the deadline passes without an event, and
    /// `TransportClosed` once every sender is gone and the queue is empty.
    pub fn recv_deadline(&self, deadline: Instant) -> Result<Option<InboundEvent>> {
        match self.rx.recv_deadline(deadline) {
            Ok(event) => Ok(Some(event)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(GrahaError::TransportClosed),
        }
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
