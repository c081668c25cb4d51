//! Mission loop.
//!
//! Drives one agent through a complete mission: announce readiness, wait
//! for the planet, then alternate decisions and physical legs until the
//! server declares the mission done. Server events are applied only
//! between actions, from the inbox drained by this loop.

use std::time::Instant;

use crate::config::{GrahaConfig, TimingConfig};
use crate::error::{GrahaError, Result};
use crate::navigation::{Decision, NavState, Navigator, NavigatorConfig};
use crate::protocol::{Inbox, Topics, Transport, publish_event};
use crate::robot::Robot;

/// Default cap on driven legs.
pub const DEFAULT_MAX_LEGS: usize = 500;

/// Summary of a finished mission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissionReport {
    pub planet: Option<String>,
    /// Legs driven, blocked ones included
    pub legs: usize,
    pub nodes: usize,
    /// Directed line entries in the graph
    pub edges: usize,
    pub targets_reached: usize,
    /// Whether the server sent `done`
    pub done: bool,
    pub done_message: Option<String>,
    pub final_state: NavState,
}

/// One agent's mission against a server.
pub struct Mission<T: Transport, R: Robot> {
    navigator: Navigator,
    transport: T,
    robot: R,
    inbox: Inbox,
    topics: Topics,
    timing: TimingConfig,
    max_legs: usize,
}

impl<T: Transport, R: Robot> Mission<T, R> {
    pub fn new(config: &GrahaConfig, transport: T, robot: R, inbox: Inbox) -> Self {
        Self {
            navigator: Navigator::new(NavigatorConfig::from(config)),
            transport,
            robot,
            inbox,
            topics: Topics::new(config.mission.group_id.clone())
                .with_comtest(config.mission.comtest),
            timing: config.timing.clone(),
            max_legs: DEFAULT_MAX_LEGS,
        }
    }

    pub fn with_max_legs(mut self, max_legs: usize) -> Self {
        self.max_legs = max_legs;
        self
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Run the mission to completion.
    pub fn run(&mut self) -> Result<MissionReport> {
        let explorer_topic = self.topics.explorer();
        self.transport.subscribe(&explorer_topic)?;
        self.navigator.begin();
        self.flush()?;

        let deadline = Instant::now() + self.timing.planet_timeout();
        if !self.wait_until(deadline, |nav| nav.pose().is_some())? {
            return Err(GrahaError::Timeout("planet"));
        }

        let mut legs = 0;
        let mut targets_reached = 0;
        loop {
            if legs >= self.max_legs {
                tracing::warn!("Leg limit {} reached, stopping", self.max_legs);
                break;
            }
            self.drain()?;

            if self.navigator.needs_scan()
                && let Some(pose) = self.navigator.pose()
            {
                let headings = self.robot.scan(pose.orientation)?;
                self.navigator.record_scan(&headings);
            }

            match self.navigator.propose() {
                Decision::Proceed(_) => {
                    self.flush()?;

                    // Grace window for a remote override
                    let deadline = Instant::now() + self.timing.override_window();
                    self.wait_until(deadline, |nav| nav.state().is_terminal())?;
                    if self.navigator.state().is_terminal() {
                        continue;
                    }

                    let (Some(heading), Some(pose)) = (self.navigator.commit(), self.navigator.pose())
                    else {
                        continue;
                    };
                    tracing::info!("Leg {}: {} heading {}", legs + 1, pose.node, heading);
                    let outcome = self.robot.drive(pose.orientation, heading)?;
                    legs += 1;

                    self.navigator.report_leg(outcome)?;
                    self.flush()?;
                    let deadline = Instant::now() + self.timing.path_ack_timeout();
                    if !self.wait_until(deadline, |nav| {
                        !nav.awaiting_path() || nav.state().is_terminal()
                    })? {
                        return Err(GrahaError::Timeout("path confirmation"));
                    }
                }
                Decision::TargetReached => {
                    targets_reached += 1;
                    self.flush()?;
                    let deadline = Instant::now() + self.timing.completion_timeout();
                    if !self.wait_until(deadline, |nav| nav.state().is_terminal())? {
                        tracing::info!("No done after target, continuing exploration");
                    }
                }
                Decision::ExplorationCompleted | Decision::Wait => {
                    self.flush()?;
                    let deadline = Instant::now() + self.timing.completion_timeout();
                    let settled = self.wait_until(deadline, |nav| {
                        nav.state() != NavState::AwaitingCompletion
                    })?;
                    if !settled {
                        tracing::warn!("Server did not finish the mission");
                        break;
                    }
                }
                Decision::Finished => break,
            }
        }
        self.flush()?;

        let report = MissionReport {
            planet: self.navigator.planet_name().map(str::to_string),
            legs,
            nodes: self.navigator.graph().node_count(),
            edges: self.navigator.graph().edge_count(),
            targets_reached,
            done: self.navigator.state().is_terminal(),
            done_message: self.navigator.done_message().map(str::to_string),
            final_state: self.navigator.state(),
        };
        tracing::info!(
            "Mission finished after {} legs: {} nodes, {} line entries, state {}",
            report.legs,
            report.nodes,
            report.edges,
            report.final_state.as_str()
        );
        Ok(report)
    }

    /// Publish everything the navigator queued.
    fn flush(&mut self) -> Result<()> {
        for event in self.navigator.take_outbox() {
            publish_event(&mut self.transport, &self.topics, &event)?;
        }
        Ok(())
    }

    /// Apply every event queued so far.
    fn drain(&mut self) -> Result<()> {
        for event in self.inbox.drain() {
            self.navigator.apply(event);
        }
        self.sync_topics()
    }

    /// Apply events as they arrive until `done` holds or `deadline` passes.
    fn wait_until(
        &mut self,
        deadline: Instant,
        done: impl Fn(&Navigator) -> bool,
    ) -> Result<bool> {
        loop {
            if done(&self.navigator) {
                return Ok(true);
            }
            match self.inbox.recv_deadline(deadline)? {
                Some(event) => {
                    self.navigator.apply(event);
                    self.sync_topics()?;
                }
                None => return Ok(done(&self.navigator)),
            }
        }
    }

    /// Subscribe to the planet topic once the planet name is known.
    fn sync_topics(&mut self) -> Result<()> {
        if self.topics.planet().is_some() {
            return Ok(());
        }
        let Some(name) = self.navigator.planet_name() else {
            return Ok(());
        };
        self.topics.set_planet(name);
        if let Some(topic) = self.topics.planet() {
            tracing::info!("Subscribing to {}", topic);
            self.transport.subscribe(&topic)?;
        }
        Ok(())
    }
}
