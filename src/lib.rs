//! GrahaNav - planet exploration for a line-following agent
//!
//! The agent explores an unknown planet of nodes on an integer grid joined by
//! weighted lines. Every node has at most four lines, one per compass
//! heading. A mission server relays discoveries from other agents, may
//! override a proposed heading, and may command a target node.
//!
//! ## Layers
//!
//! - [`planet`]: graph store, headings and frontier bookkeeping
//! - [`planning`]: shortest paths and nearest-frontier search
//! - [`navigation`]: decision state machine
//! - [`protocol`]: message schema, JSON codec, inbound queue, transport seam
//! - [`mission`]: decision loop with the override grace window
//! - [`sim`]: simulated server and agent

pub mod config;
pub mod error;
pub mod mission;
pub mod navigation;
pub mod planet;
pub mod planning;
pub mod protocol;
pub mod robot;
pub mod sim;

pub use config::GrahaConfig;
pub use error::{GrahaError, Result};
pub use mission::{Mission, MissionReport};
pub use navigation::{Decision, NavState, Navigator, NavigatorConfig};
pub use planet::{Heading, Node, PlanetGraph, Pose};
pub use robot::{LegOutcome, Robot};
