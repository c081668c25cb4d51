//! In-process simulation of the server and the physical agent.
//!
//! Used by the binary when no real transport is configured and by the
//! integration tests.

mod mothership;
mod planet_map;
mod robot;

pub use mothership::{Mothership, MothershipLog};
pub use planet_map::{Line, PlanetMap};
pub use robot::SimulatedRobot;

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::unbounded;

use crate::error::Result;
use crate::protocol::{ChannelTransport, Inbox, inbox};

/// Client-side ends of a running simulation.
pub struct Simulation {
    pub transport: ChannelTransport,
    pub inbox: Inbox,
    pub robot: SimulatedRobot,
    pub mothership: JoinHandle<Result<MothershipLog>>,
}

/// Spawn the mothership thread for `map` and wire a transport and inbox to it.
///
/// The mothership exits once the returned transport is dropped.
pub fn spawn(map: PlanetMap) -> Result<Simulation> {
    let map = Arc::new(map);
    let (frame_tx, frame_rx) = unbounded();
    let (inbox, sender) = inbox();

    let mothership_map = Arc::clone(&map);
    let mothership = thread::Builder::new()
        .name("mothership".into())
        .spawn(move || {
            let result = Mothership::new(mothership_map, frame_rx, sender).run();
            if let Err(e) = &result {
                tracing::error!("Mothership error: {}", e);
            }
            result
        })?;

    Ok(Simulation {
        transport: ChannelTransport::new(frame_tx),
        inbox,
        robot: SimulatedRobot::new(map),
        mothership,
    })
}
