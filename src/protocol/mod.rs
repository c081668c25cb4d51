//! Mission server protocol.
//!
//! - [`messages`]: wire payloads and validated inbound/outbound events
//! - [`wire`]: JSON envelope codec
//! - [`inbox`]: thread-safe FIFO queue of inbound events
//! - [`transport`]: publish seam and topic naming

pub mod inbox;
pub mod messages;
pub mod transport;
pub mod wire;

pub use inbox::{Inbox, InboxSender, inbox};
pub use messages::{
    Channel, Envelope, InboundEvent, Origin, OutboundEvent, PathReport, PathStatus, WireMessage,
};
pub use transport::{ChannelTransport, Frame, Topics, Transport, publish_event};
