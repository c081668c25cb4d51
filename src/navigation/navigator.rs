//! Navigation orchestrator.
//!
//! Owns the planet graph and the frontier tracker, applies server events in
//! arrival order and turns the current knowledge into one heading per
//! decision cycle. The orchestrator never blocks and never talks to the
//! transport: outbound messages are queued and collected with
//! [`Navigator::take_outbox`].
//!
//! One decision cycle, as driven by the mission loop:
//!
//! ```text
//! arrive ──► needs_scan? ──► record_scan
//!    │
//!    ▼
//! propose ──► Proceed(h) ──► (override window) ──► commit ──► drive
//!    │                                                          │
//!    ├─► TargetReached / ExplorationCompleted / Wait            ▼
//!    └─► Finished                                  report_leg ──► path event
//! ```

use crate::config::GrahaConfig;
use crate::error::{GrahaError, Result};
use crate::planet::{
    ExplorationSummary, FrontierTracker, Heading, Node, PlanetGraph, Pose, StackMode,
};
use crate::planning::{Route, next_frontier_heading, shortest_path};
use crate::protocol::{InboundEvent, OutboundEvent, PathReport, PathStatus};
use crate::robot::LegOutcome;

use super::state::{Decision, NavState};

/// Configuration for the navigator.
#[derive(Clone, Debug)]
pub struct NavigatorConfig {
    /// How the exploration stack is reconciled
    pub stack_mode: StackMode,
    /// Route to nodes known only from remote reports before completing
    pub visit_unscanned: bool,
    /// Planet requested with `testPlanet`
    pub test_planet: Option<String>,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            stack_mode: StackMode::default(),
            visit_unscanned: true,
            test_planet: None,
        }
    }
}

impl From<&GrahaConfig> for NavigatorConfig {
    fn from(config: &GrahaConfig) -> Self {
        Self {
            stack_mode: config.exploration.stack_mode,
            visit_unscanned: config.exploration.visit_unscanned,
            test_planet: config.mission.test_planet.clone(),
        }
    }
}

/// Line being driven, from commit until the server's path event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Leg {
    start: Node,
    heading: Heading,
    /// Local outcome already reported
    reported: bool,
}

/// Navigation orchestrator.
pub struct Navigator {
    config: NavigatorConfig,
    graph: PlanetGraph,
    frontier: FrontierTracker,
    state: NavState,
    /// Current node and orientation, known once the planet message arrived
    pose: Option<Pose>,
    planet: Option<String>,
    target: Option<Node>,
    /// Heading proposed this cycle, not yet committed
    proposal: Option<Heading>,
    /// Remote override for the current node
    override_heading: Option<Heading>,
    leg: Option<Leg>,
    /// Start of the most recently driven line
    last_leg_start: Option<Node>,
    done_message: Option<String>,
    outbox: Vec<OutboundEvent>,
}

impl Navigator {
    pub fn new(config: NavigatorConfig) -> Self {
        Self {
            frontier: FrontierTracker::new(config.stack_mode),
            config,
            graph: PlanetGraph::new(),
            state: NavState::Exploring,
            pose: None,
            planet: None,
            target: None,
            proposal: None,
            override_heading: None,
            leg: None,
            last_leg_start: None,
            done_message: None,
            outbox: Vec::new(),
        }
    }

    /// Queue the mission start messages.
    pub fn begin(&mut self) {
        if let Some(name) = &self.config.test_planet {
            tracing::info!("Requesting test planet {}", name);
            self.outbox.push(OutboundEvent::TestPlanet {
                planet_name: name.clone(),
            });
        }
        self.outbox.push(OutboundEvent::Ready);
    }

    /// Apply one server event.
    pub fn apply(&mut self, event: InboundEvent) {
        if self.state.is_terminal() {
            tracing::debug!("Mission done, ignoring {:?}", event);
            return;
        }

        match event {
            InboundEvent::Planet {
                name,
                start,
                orientation,
            } => {
                tracing::info!(
                    "Planet {}: start at {} facing {}",
                    name,
                    start,
                    orientation
                );
                self.graph.register_node(start);
                self.pose = Some(Pose::new(start, orientation));
                self.planet = Some(name);
            }
            InboundEvent::Path(report) => self.apply_path(report),
            InboundEvent::PathSelect { start, heading } => self.apply_path_select(start, heading),
            InboundEvent::PathUnveiled(report) => self.apply_unveiled(report),
            InboundEvent::Target(node) => {
                tracing::info!("Target set to {}", node);
                self.target = Some(node);
                if self.state == NavState::TargetSeeking {
                    // Previous target replaced
                    self.state = NavState::Exploring;
                }
                self.engage_target();
            }
            InboundEvent::Done { message } => {
                tracing::info!("Mission done: {}", message);
                self.state = NavState::Done;
                self.done_message = Some(message);
                self.proposal = None;
                self.override_heading = None;
            }
        }
    }

    /// Server confirmation of the line just driven. Its coordinates replace
    /// the local estimate.
    fn apply_path(&mut self, report: PathReport) {
        let cost = report.cost();
        self.graph.add_edge(
            report.start,
            report.start_heading,
            report.end,
            report.end_heading,
            cost,
        );
        self.forget_frontier(report.start, report.start_heading);
        self.forget_frontier(report.end, report.end_heading);

        if let Some(leg) = self.leg.take()
            && (leg.start != report.start || leg.heading != report.start_heading)
        {
            tracing::warn!(
                "Path confirmation {} {} does not match driven leg {} {}",
                report.start,
                report.start_heading,
                leg.start,
                leg.heading
            );
        }

        tracing::info!(
            "Path {} {} -> {} {} cost {}",
            report.start,
            report.start_heading,
            report.end,
            report.end_heading,
            cost
        );
        self.last_leg_start = Some(report.start);
        self.override_heading = None;
        self.pose = Some(Pose::new(report.end, report.end_heading.opposite()));
    }

    fn apply_path_select(&mut self, start: Node, heading: Heading) {
        match self.pose {
            Some(pose) if pose.node == start => {}
            _ => {
                tracing::warn!(
                    "Ignoring path select for {} while at {:?}",
                    start,
                    self.pose.map(|p| p.node)
                );
                return;
            }
        }

        match self.proposal {
            Some(proposal) => {
                tracing::info!("Override: {} instead of proposed {}", heading, proposal)
            }
            None => tracing::info!("Override {} stored for the next decision", heading),
        }
        self.override_heading = Some(heading);
    }

    /// A line discovered by another agent.
    fn apply_unveiled(&mut self, report: PathReport) {
        let cost = report.cost();
        tracing::debug!(
            "Unveiled {} {} <-> {} {} cost {}",
            report.start,
            report.start_heading,
            report.end,
            report.end_heading,
            cost
        );
        self.graph.add_edge(
            report.start,
            report.start_heading,
            report.end,
            report.end_heading,
            cost,
        );
        self.frontier
            .remove_headings(report.start, &[report.start_heading]);
        self.frontier.remove_headings(report.end, &[report.end_heading]);

        for node in [report.start, report.end] {
            if self.touches_current_leg(node) {
                self.frontier.reconcile_stack(node);
            }
            self.frontier.enqueue_unscanned(node);
        }
    }

    fn touches_current_leg(&self, node: Node) -> bool {
        self.last_leg_start == Some(node)
            || self.leg.is_some_and(|leg| leg.start == node)
            || self.pose.is_some_and(|pose| pose.node == node)
    }

    /// Remove a heading that is now a known line.
    fn forget_frontier(&mut self, node: Node, heading: Heading) {
        if self.frontier.remove_headings(node, &[heading]) {
            self.frontier.reconcile_stack(node);
        }
    }

    /// Switch to target seeking if the target is reachable.
    fn engage_target(&mut self) {
        if !matches!(
            self.state,
            NavState::Exploring | NavState::AwaitingCompletion
        ) {
            return;
        }
        let (Some(target), Some(pose)) = (self.target, self.pose) else {
            return;
        };
        if shortest_path(&self.graph, pose.node, target).is_some() {
            tracing::info!("Target {} reachable, seeking", target);
            self.state = NavState::TargetSeeking;
        } else {
            tracing::debug!("Target {} not reachable yet, exploring", target);
        }
    }

    /// Whether the current node still needs a scan.
    pub fn needs_scan(&self) -> bool {
        !self.state.is_terminal() && self.pose.is_some_and(|p| !self.frontier.is_visited(p.node))
    }

    /// Record the headings seen by a scan at the current node. Headings with
    /// a known line are not frontier.
    pub fn record_scan(&mut self, headings: &[Heading]) {
        let Some(pose) = self.pose else {
            tracing::warn!("Scan before the start node is known");
            return;
        };
        let known = self.graph.edges_of(pose.node);
        let unknown: Vec<Heading> = headings
            .iter()
            .copied()
            .filter(|h| !known.contains_key(h))
            .collect();
        tracing::debug!("Scan at {}: {:?}, frontier {:?}", pose.node, headings, unknown);

        self.frontier.add_frontier_headings(pose.node, &unknown);
        self.frontier.mark_visited(pose.node);
    }

    /// Run one decision.
    ///
    /// On `Proceed` a `pathSelect` is queued; the heading is final only
    /// after [`Navigator::commit`].
    pub fn propose(&mut self) -> Decision {
        if self.state.is_terminal() {
            return Decision::Finished;
        }
        let Some(pose) = self.pose else {
            return Decision::Wait;
        };
        self.engage_target();

        let mut heading = None;
        if self.state == NavState::TargetSeeking
            && let Some(target) = self.target
        {
            if pose.node == target {
                tracing::info!("Target {} reached", target);
                self.outbox.push(OutboundEvent::TargetReached {
                    message: format!("Target {} reached", target),
                });
                self.target = None;
                self.state = NavState::Exploring;
                return Decision::TargetReached;
            }
            heading = shortest_path(&self.graph, pose.node, target).and_then(|r| r.first_heading());
            if heading.is_none() {
                tracing::warn!("Target {} no longer reachable, exploring", target);
                self.state = NavState::Exploring;
            }
        }

        if self.state == NavState::Exploring {
            heading = next_frontier_heading(&self.graph, &self.frontier, pose.node)
                .or_else(|| self.heading_to_unscanned(pose.node));
            if heading.is_none() {
                let summary = self.summary();
                tracing::info!(
                    "Exploration completed: {} of {} nodes explored",
                    summary.explored,
                    self.graph.node_count()
                );
                self.outbox.push(OutboundEvent::ExplorationCompleted {
                    message: format!("Explored {} nodes", summary.explored),
                });
                self.state = NavState::AwaitingCompletion;
                return Decision::ExplorationCompleted;
            }
        }

        let Some(heading) = heading else {
            return Decision::Wait;
        };
        tracing::debug!("[{}] propose {} at {}", self.state.as_str(), heading, pose.node);
        self.proposal = Some(heading);
        self.outbox.push(OutboundEvent::PathSelect {
            start: pose.node,
            heading,
        });
        Decision::Proceed(heading)
    }

    /// Cheapest route to a node reported by another agent that nobody has
    /// scanned yet.
    fn heading_to_unscanned(&self, start: Node) -> Option<Heading> {
        if !self.config.visit_unscanned {
            return None;
        }
        let mut best: Option<Route> = None;
        for node in self.frontier.unscanned() {
            if node == start {
                continue;
            }
            if let Some(route) = shortest_path(&self.graph, start, node)
                && best.as_ref().is_none_or(|b| route.cost < b.cost)
            {
                best = Some(route);
            }
        }
        let heading = best.and_then(|r| r.first_heading());
        if heading.is_some() {
            tracing::debug!("Frontier exhausted, heading for an unscanned node");
        }
        heading
    }

    /// Fix the heading to drive: the remote override if one arrived,
    /// otherwise the proposal.
    pub fn commit(&mut self) -> Option<Heading> {
        let pose = self.pose?;
        let proposal = self.proposal.take();
        let heading = self.override_heading.take().or(proposal)?;

        self.frontier.commit_heading(pose.node, heading);
        self.leg = Some(Leg {
            start: pose.node,
            heading,
            reported: false,
        });
        self.last_leg_start = Some(pose.node);
        Some(heading)
    }

    /// Report the local outcome of the committed leg to the server.
    pub fn report_leg(&mut self, outcome: LegOutcome) -> Result<()> {
        let leg = self
            .leg
            .as_mut()
            .ok_or_else(|| GrahaError::Protocol("no leg in progress".into()))?;

        let (end, end_heading) = match outcome.status {
            PathStatus::Free => (outcome.end, outcome.end_heading),
            PathStatus::Blocked => (leg.start, leg.heading),
        };
        let report = PathReport {
            start: leg.start,
            start_heading: leg.heading,
            end,
            end_heading,
            status: outcome.status,
            weight: None,
        };
        leg.reported = true;
        self.outbox.push(OutboundEvent::Path(report));
        Ok(())
    }

    /// A reported leg still waits for its path event.
    pub fn awaiting_path(&self) -> bool {
        self.leg.is_some_and(|leg| leg.reported)
    }

    /// Messages queued since the last call, in order.
    pub fn take_outbox(&mut self) -> Vec<OutboundEvent> {
        std::mem::take(&mut self.outbox)
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn pose(&self) -> Option<Pose> {
        self.pose
    }

    pub fn planet_name(&self) -> Option<&str> {
        self.planet.as_deref()
    }

    pub fn target(&self) -> Option<Node> {
        self.target
    }

    pub fn done_message(&self) -> Option<&str> {
        self.done_message.as_deref()
    }

    pub fn graph(&self) -> &PlanetGraph {
        &self.graph
    }

    pub fn frontier(&self) -> &FrontierTracker {
        &self.frontier
    }

    pub fn summary(&self) -> ExplorationSummary {
        self.frontier.summarize(self.graph.nodes())
    }
}
