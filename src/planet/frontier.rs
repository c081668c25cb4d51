//! Frontier bookkeeping for graph exploration.
//!
//! Tracks, per node, the headings that were seen during a scan but are not
//! yet confirmed as lines, plus the exploration stack that biases the agent
//! toward the most recently discovered incomplete node.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::Deserialize;

use super::{Heading, Node};

/// Exploration state of a single node.
///
/// `Unknown` means the node never had a frontier set assigned (it was
/// never scanned). It is neither explored nor unexplored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exploration {
    Explored,
    Unexplored,
    Unknown,
}

/// How `reconcile_stack` removes entries from the exploration stack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StackMode {
    /// Pop the top entry, whichever node it is.
    Positional,
    /// Remove exactly the reconciled node. Nodes whose frontier set empties
    /// through `remove_headings` also leave the stack immediately.
    #[default]
    Keyed,
}

/// Counts of nodes per exploration state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExplorationSummary {
    pub explored: usize,
    pub unexplored: usize,
    pub unknown: usize,
}

impl ExplorationSummary {
    /// No node is known to have pending headings. Unknown nodes do not count
    /// either way.
    pub fn nothing_pending(&self) -> bool {
        self.unexplored == 0
    }
}

/// Undiscovered headings per node, the exploration stack, visit markers and
/// the queue of nodes known only from remote reports.
#[derive(Clone, Debug, Default)]
pub struct FrontierTracker {
    mode: StackMode,
    /// Pending headings per node, in scan order
    pending: HashMap<Node, Vec<Heading>>,
    /// Nodes with pending headings, most recent last
    stack: Vec<Node>,
    /// Nodes where the agent performed a scan
    visited: HashSet<Node>,
    /// Nodes reported by other agents that nobody has scanned yet
    unscanned: VecDeque<Node>,
}

impl FrontierTracker {
    pub fn new(mode: StackMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Merge scanned headings into the node's frontier set.
    ///
    /// The node gets a (possibly empty) frontier set either way; it is pushed
    /// onto the stack when the set is non-empty and it is not stacked yet.
    pub fn add_frontier_headings(&mut self, node: Node, headings: &[Heading]) {
        let set = self.pending.entry(node).or_default();
        for &heading in headings {
            if !set.contains(&heading) {
                set.push(heading);
            }
        }
        let has_pending = !set.is_empty();

        self.unscanned.retain(|&n| n != node);
        if has_pending {
            if !self.stack.contains(&node) {
                self.stack.push(node);
            }
        } else {
            self.stack.retain(|&n| n != node);
        }
    }

    /// Remove headings confirmed as lines by a remote report.
    ///
    /// Returns true when this call emptied a previously non-empty set.
    pub fn remove_headings(&mut self, node: Node, headings: &[Heading]) -> bool {
        let Some(set) = self.pending.get_mut(&node) else {
            tracing::debug!("No frontier set for {} yet, nothing to remove", node);
            return false;
        };
        let had_pending = !set.is_empty();
        set.retain(|h| !headings.contains(h));
        let emptied = had_pending && set.is_empty();
        if emptied && self.mode == StackMode::Keyed {
            self.stack.retain(|&n| n != node);
        }
        emptied
    }

    /// Remove the heading the agent is about to travel.
    pub fn commit_heading(&mut self, node: Node, heading: Heading) {
        let Some(set) = self.pending.get_mut(&node) else {
            return;
        };
        let Some(pos) = set.iter().position(|&h| h == heading) else {
            return;
        };
        set.remove(pos);
        if set.is_empty()
            && let Some(stack_pos) = self.stack.iter().position(|&n| n == node)
        {
            self.stack.remove(stack_pos);
        }
    }

    /// Drop a stack entry once `node` has no pending headings left.
    ///
    /// In [`StackMode::Positional`] this pops the top of the stack, which is
    /// not necessarily `node` when several nodes are pending.
    pub fn reconcile_stack(&mut self, node: Node) {
        if self.is_explored(node) != Exploration::Explored {
            return;
        }
        match self.mode {
            StackMode::Positional => {
                if let Some(popped) = self.stack.pop()
                    && popped != node
                {
                    tracing::warn!(
                        "Reconciling {} popped {} from the exploration stack",
                        node,
                        popped
                    );
                }
            }
            StackMode::Keyed => self.stack.retain(|&n| n != node),
        }
    }

    pub fn is_explored(&self, node: Node) -> Exploration {
        match self.pending.get(&node) {
            Some(set) if set.is_empty() => Exploration::Explored,
            Some(_) => Exploration::Unexplored,
            None => Exploration::Unknown,
        }
    }

    /// First pending heading at `node`, without removing it.
    pub fn peek_heading(&self, node: Node) -> Option<Heading> {
        self.pending.get(&node).and_then(|set| set.first().copied())
    }

    /// Pending headings at `node` in scan order.
    pub fn pending(&self, node: Node) -> &[Heading] {
        self.pending.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Most recently pushed node that still has pending headings.
    pub fn stack_top(&self) -> Option<Node> {
        self.stack.last().copied()
    }

    /// Exploration stack, bottom first.
    pub fn stack(&self) -> &[Node] {
        &self.stack
    }

    pub fn mark_visited(&mut self, node: Node) {
        self.visited.insert(node);
    }

    pub fn is_visited(&self, node: Node) -> bool {
        self.visited.contains(&node)
    }

    /// Queue a node learned from a remote report for a later visit, unless
    /// its frontier state is already known.
    pub fn enqueue_unscanned(&mut self, node: Node) {
        if self.pending.contains_key(&node) || self.unscanned.contains(&node) {
            return;
        }
        self.unscanned.push_back(node);
    }

    /// Nodes awaiting a scan, oldest first.
    pub fn unscanned(&self) -> impl Iterator<Item = Node> + '_ {
        self.unscanned.iter().copied()
    }

    /// Classify every node in `nodes`.
    pub fn summarize<'a>(&self, nodes: impl IntoIterator<Item = &'a Node>) -> ExplorationSummary {
        let mut summary = ExplorationSummary::default();
        for &node in nodes {
            match self.is_explored(node) {
                Exploration::Explored => summary.explored += 1,
                Exploration::Unexplored => summary.unexplored += 1,
                Exploration::Unknown => summary.unknown += 1,
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Node = Node::new(0, 0);
    const B: Node = Node::new(0, 1);
    const C: Node = Node::new(1, 1);

    #[test]
    fn test_tri_state() {
        let mut tracker = FrontierTracker::new(StackMode::Keyed);
        assert_eq!(tracker.is_explored(A), Exploration::Unknown);

        tracker.add_frontier_headings(A, &[Heading::North]);
        assert_eq!(tracker.is_explored(A), Exploration::Unexplored);

        tracker.commit_heading(A, Heading::North);
        assert_eq!(tracker.is_explored(A), Exploration::Explored);

        tracker.add_frontier_headings(B, &[]);
        assert_eq!(tracker.is_explored(B), Exploration::Explored);
        assert!(tracker.stack().is_empty());
    }

    #[test]
    fn test_add_is_idempotent_and_pushes_once() {
        let mut tracker = FrontierTracker::new(StackMode::Keyed);
        tracker.add_frontier_headings(A, &[Heading::North, Heading::East]);
        tracker.add_frontier_headings(A, &[Heading::East, Heading::North]);

        assert_eq!(tracker.pending(A), &[Heading::North, Heading::East]);
        assert_eq!(tracker.stack(), &[A]);
        assert_eq!(tracker.peek_heading(A), Some(Heading::North));
    }

    #[test]
    fn test_commit_removes_node_from_stack_when_empty() {
        let mut tracker = FrontierTracker::new(StackMode::Positional);
        tracker.add_frontier_headings(A, &[Heading::North]);
        tracker.add_frontier_headings(B, &[Heading::East, Heading::West]);

        tracker.commit_heading(A, Heading::North);
        assert_eq!(tracker.stack(), &[B]);

        tracker.commit_heading(B, Heading::West);
        assert_eq!(tracker.stack(), &[B]);
        assert_eq!(tracker.peek_heading(B), Some(Heading::East));
    }

    #[test]
    fn test_commit_unknown_heading_is_noop() {
        let mut tracker = FrontierTracker::new(StackMode::Keyed);
        tracker.add_frontier_headings(A, &[Heading::North]);
        tracker.commit_heading(A, Heading::South);
        tracker.commit_heading(C, Heading::South);

        assert_eq!(tracker.pending(A), &[Heading::North]);
        assert_eq!(tracker.is_explored(C), Exploration::Unknown);
    }

    #[test]
    fn test_positional_reconcile_pops_top_not_node() {
        // Two pending nodes; the older one (A) is emptied remotely.
        let mut tracker = FrontierTracker::new(StackMode::Positional);
        tracker.add_frontier_headings(A, &[Heading::North]);
        tracker.add_frontier_headings(B, &[Heading::East]);

        tracker.remove_headings(A, &[Heading::North]);
        tracker.reconcile_stack(A);

        // Historical behavior: B is popped although it is still pending,
        // and the explored A stays on the stack.
        assert_eq!(tracker.stack(), &[A]);
        assert_eq!(tracker.is_explored(B), Exploration::Unexplored);
    }

    #[test]
    fn test_keyed_reconcile_removes_exact_node() {
        let mut tracker = FrontierTracker::new(StackMode::Keyed);
        tracker.add_frontier_headings(A, &[Heading::North]);
        tracker.add_frontier_headings(B, &[Heading::East]);
        tracker.add_frontier_headings(C, &[Heading::South]);

        assert!(tracker.remove_headings(B, &[Heading::East]));
        assert!(!tracker.remove_headings(B, &[Heading::East]));
        assert_eq!(tracker.stack(), &[A, C]);

        tracker.reconcile_stack(B);
        assert_eq!(tracker.stack(), &[A, C]);
        assert_eq!(tracker.stack_top(), Some(C));
    }

    #[test]
    fn test_reconcile_ignores_pending_node() {
        let mut tracker = FrontierTracker::new(StackMode::Positional);
        tracker.add_frontier_headings(A, &[Heading::North]);
        tracker.reconcile_stack(A);
        assert_eq!(tracker.stack(), &[A]);
    }

    #[test]
    fn test_unscanned_queue() {
        let mut tracker = FrontierTracker::new(StackMode::Keyed);
        tracker.add_frontier_headings(A, &[Heading::North]);
        tracker.enqueue_unscanned(A);
        tracker.enqueue_unscanned(B);
        tracker.enqueue_unscanned(C);
        tracker.enqueue_unscanned(B);
        assert_eq!(tracker.unscanned().collect::<Vec<_>>(), vec![B, C]);

        tracker.add_frontier_headings(B, &[]);
        assert_eq!(tracker.unscanned().collect::<Vec<_>>(), vec![C]);
    }

    #[test]
    fn test_summary_keeps_unknown_separate() {
        let mut tracker = FrontierTracker::new(StackMode::Keyed);
        tracker.add_frontier_headings(A, &[]);
        tracker.add_frontier_headings(B, &[Heading::West]);

        let summary = tracker.summarize(&[A, B, C]);
        assert_eq!(
            summary,
            ExplorationSummary {
                explored: 1,
                unexplored: 1,
                unknown: 1
            }
        );
        assert!(!summary.nothing_pending());

        let only_unknown = tracker.summarize(&[A, C]);
        assert!(only_unknown.nothing_pending());
        assert_eq!(only_unknown.unknown, 1);
    }

    #[test]
    fn test_visited_marker_independent_of_exploration() {
        let mut tracker = FrontierTracker::new(StackMode::Keyed);
        tracker.add_frontier_headings(A, &[]);
        assert_eq!(tracker.is_explored(A), Exploration::Explored);
        assert!(!tracker.is_visited(A));
        tracker.mark_visited(A);
        assert!(tracker.is_visited(A));
    }
}
