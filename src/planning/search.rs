//! Dijkstra search over the partially known planet.
//!
//! Impassable lines (negative cost) are never relaxed. Among nodes with the
//! same tentative distance the one discovered first (lowest index in
//! [`PlanetGraph::nodes`]) is settled first, and a predecessor is only
//! replaced by a strictly shorter distance, so results are deterministic.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::planet::{Exploration, FrontierTracker, Heading, Node, PlanetGraph};

/// Priority queue entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SearchState {
    /// Tentative distance from the start
    cost: i64,
    /// Discovery index of the node
    node: usize,
}

impl Ord for SearchState {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap: lower cost first, then earlier discovery
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for SearchState {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One leg of a route: leave `node` along `heading`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    pub node: Node,
    pub heading: Heading,
}

/// Result of a search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    /// Legs in travel order; empty when start and goal coincide
    pub steps: Vec<Step>,
    /// Sum of line costs along `steps`
    pub cost: i64,
}

impl Route {
    /// Heading of the first leg.
    pub fn first_heading(&self) -> Option<Heading> {
        self.steps.first().map(|s| s.heading)
    }

    /// Node the route ends at, given where it starts.
    pub fn destination(&self, graph: &PlanetGraph, start: Node) -> Node {
        self.steps
            .last()
            .and_then(|s| graph.edge(s.node, s.heading))
            .map_or(start, |e| e.to)
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Cheapest route from `start` to `target` over passable lines.
///
/// Returns an empty route when `start == target`, and `None` when either node
/// is unknown or `target` is unreachable in the known subgraph.
pub fn shortest_path(graph: &PlanetGraph, start: Node, target: Node) -> Option<Route> {
    if start == target {
        return Some(Route {
            steps: Vec::new(),
            cost: 0,
        });
    }
    let target_idx = graph.index_of(target)?;
    graph.index_of(start)?;
    search(graph, start, |idx| idx == target_idx)
}

/// Cheapest route from `start` to the nearest node that still has pending
/// headings. `start` itself qualifies (empty route).
///
/// Returns `None` when `start` is unknown, when no known node is unexplored,
/// or when no unexplored node is reachable. Nodes whose state is unknown
/// (never scanned) are not targets.
pub fn shortest_unexplored_path(
    graph: &PlanetGraph,
    frontier: &FrontierTracker,
    start: Node,
) -> Option<Route> {
    graph.index_of(start)?;

    let summary = frontier.summarize(graph.nodes());
    if summary.nothing_pending() {
        tracing::debug!(
            "No unexplored nodes ({} explored, {} never scanned)",
            summary.explored,
            summary.unknown
        );
        return None;
    }

    search(graph, start, |idx| {
        graph
            .node_at(idx)
            .is_some_and(|node| frontier.is_explored(node) == Exploration::Unexplored)
    })
}

/// Heading to take from `start` to keep exploring.
///
/// Routes toward the top of the exploration stack. When the agent already
/// stands on that node its first pending heading is returned. `None` means
/// the stack is empty (fully explored) or its top is unreachable.
pub fn next_frontier_heading(
    graph: &PlanetGraph,
    frontier: &FrontierTracker,
    start: Node,
) -> Option<Heading> {
    let top = frontier.stack_top()?;
    let route = shortest_path(graph, start, top)?;
    if route.is_empty() {
        frontier.peek_heading(start)
    } else {
        route.first_heading()
    }
}

/// Dijkstra from `start` until a settled node satisfies `is_goal`.
fn search(graph: &PlanetGraph, start: Node, is_goal: impl Fn(usize) -> bool) -> Option<Route> {
    let n = graph.node_count();
    let start_idx = graph.index_of(start)?;

    let mut dist: Vec<Option<i64>> = vec![None; n];
    // Predecessor index and the heading taken from it
    let mut prev: Vec<Option<(usize, Heading)>> = vec![None; n];
    let mut settled = vec![false; n];
    dist[start_idx] = Some(0);

    let mut heap = BinaryHeap::new();
    heap.push(SearchState {
        cost: 0,
        node: start_idx,
    });

    while let Some(SearchState { cost, node }) = heap.pop() {
        if settled[node] {
            continue;
        }
        settled[node] = true;

        if is_goal(node) {
            return Some(reconstruct(graph, &prev, start_idx, node, cost));
        }

        for (&heading, edge) in graph.edges_at(node) {
            if !edge.is_passable() {
                continue;
            }
            let Some(neighbor) = graph.index_of(edge.to) else {
                continue;
            };
            if settled[neighbor] {
                continue;
            }
            let new_dist = cost + i64::from(edge.cost);
            if dist[neighbor].is_none_or(|d| new_dist < d) {
                dist[neighbor] = Some(new_dist);
                prev[neighbor] = Some((node, heading));
                heap.push(SearchState {
                    cost: new_dist,
                    node: neighbor,
                });
            }
        }
    }

    None
}

fn reconstruct(
    graph: &PlanetGraph,
    prev: &[Option<(usize, Heading)>],
    start_idx: usize,
    goal_idx: usize,
    cost: i64,
) -> Route {
    let mut steps = Vec::new();
    let mut current = goal_idx;
    while current != start_idx {
        let Some((parent, heading)) = prev[current] else {
            break;
        };
        if let Some(node) = graph.node_at(parent) {
            steps.push(Step { node, heading });
        }
        current = parent;
    }
    steps.reverse();
    Route { steps, cost }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planet::{BLOCKED, StackMode};

    fn n(x: i32, y: i32) -> Node {
        Node::new(x, y)
    }

    /// ```text
    /// (0,1) --1-- (1,1) --1-- (2,1)
    ///   |           |
    ///   2           2
    ///   |           |
    /// (0,0) --1-- (1,0)
    /// ```
    fn make_simple_graph() -> PlanetGraph {
        let mut graph = PlanetGraph::new();
        graph.add_edge(n(0, 0), Heading::East, n(1, 0), Heading::West, 1);
        graph.add_edge(n(0, 0), Heading::North, n(0, 1), Heading::South, 2);
        graph.add_edge(n(1, 0), Heading::North, n(1, 1), Heading::South, 2);
        graph.add_edge(n(0, 1), Heading::East, n(1, 1), Heading::West, 1);
        graph.add_edge(n(1, 1), Heading::East, n(2, 1), Heading::West, 1);
        graph
    }

    #[test]
    fn test_same_node_is_empty_route() {
        let graph = make_simple_graph();
        let route = shortest_path(&graph, n(1, 1), n(1, 1)).unwrap();
        assert!(route.is_empty());
        assert_eq!(route.cost, 0);
    }

    #[test]
    fn test_unknown_endpoints() {
        let graph = make_simple_graph();
        assert!(shortest_path(&graph, n(9, 9), n(0, 0)).is_none());
        assert!(shortest_path(&graph, n(0, 0), n(9, 9)).is_none());
    }

    #[test]
    fn test_shortest_path_steps() {
        let graph = make_simple_graph();
        let route = shortest_path(&graph, n(0, 0), n(2, 1)).unwrap();

        // Two equal-cost routes (E,N,E and N,E,E); the tie goes to (1,0),
        // discovered before (0,1).
        assert_eq!(route.cost, 4);
        assert_eq!(
            route.steps,
            vec![
                Step {
                    node: n(0, 0),
                    heading: Heading::East
                },
                Step {
                    node: n(1, 0),
                    heading: Heading::North
                },
                Step {
                    node: n(1, 1),
                    heading: Heading::East
                },
            ]
        );
        assert_eq!(route.destination(&graph, n(0, 0)), n(2, 1));
    }

    #[test]
    fn test_blocked_edges_are_skipped() {
        let mut graph = make_simple_graph();
        graph.add_edge(n(0, 0), Heading::East, n(1, 0), Heading::West, BLOCKED);

        let route = shortest_path(&graph, n(0, 0), n(1, 0)).unwrap();
        // Detour: N(2) + E(1) + S(2)
        assert_eq!(route.cost, 5);
        assert_eq!(route.first_heading(), Some(Heading::North));
        for step in &route.steps {
            assert!(graph.edge(step.node, step.heading).unwrap().is_passable());
        }
    }

    #[test]
    fn test_unreachable_target() {
        let mut graph = make_simple_graph();
        graph.add_edge(n(5, 5), Heading::North, n(5, 6), Heading::South, 1);
        assert!(shortest_path(&graph, n(0, 0), n(5, 6)).is_none());

        graph.register_node(n(7, 7));
        assert!(shortest_path(&graph, n(0, 0), n(7, 7)).is_none());
    }

    #[test]
    fn test_unexplored_path_finds_nearest() {
        let graph = make_simple_graph();
        let mut frontier = FrontierTracker::new(StackMode::Keyed);
        for &node in graph.nodes() {
            frontier.add_frontier_headings(node, &[]);
        }
        frontier.add_frontier_headings(n(2, 1), &[Heading::North]);
        frontier.add_frontier_headings(n(0, 1), &[Heading::West]);

        let route = shortest_unexplored_path(&graph, &frontier, n(1, 0)).unwrap();
        // (0,1) costs 3 via (0,0); (2,1) costs 3 via (1,1). Tie: (0,1) was
        // discovered earlier.
        assert_eq!(route.cost, 3);
        assert_eq!(route.destination(&graph, n(1, 0)), n(0, 1));
    }

    #[test]
    fn test_unexplored_path_at_start() {
        let graph = make_simple_graph();
        let mut frontier = FrontierTracker::new(StackMode::Keyed);
        frontier.add_frontier_headings(n(0, 0), &[Heading::South]);

        let route = shortest_unexplored_path(&graph, &frontier, n(0, 0)).unwrap();
        assert!(route.is_empty());
    }

    #[test]
    fn test_unexplored_path_none_when_explored() {
        let graph = make_simple_graph();
        let mut frontier = FrontierTracker::new(StackMode::Keyed);
        for &node in graph.nodes() {
            frontier.add_frontier_headings(node, &[]);
        }
        assert!(shortest_unexplored_path(&graph, &frontier, n(0, 0)).is_none());
        assert!(shortest_unexplored_path(&graph, &frontier, n(8, 8)).is_none());
    }

    #[test]
    fn test_unknown_nodes_are_not_unexplored() {
        // Only (2,1) was never scanned; everything else is explored.
        let graph = make_simple_graph();
        let mut frontier = FrontierTracker::new(StackMode::Keyed);
        for &node in graph.nodes() {
            if node != n(2, 1) {
                frontier.add_frontier_headings(node, &[]);
            }
        }
        let summary = frontier.summarize(graph.nodes());
        assert_eq!(summary.unknown, 1);
        assert_eq!(summary.unexplored, 0);
        assert!(shortest_unexplored_path(&graph, &frontier, n(0, 0)).is_none());
    }

    #[test]
    fn test_unexplored_path_unreachable() {
        let mut graph = make_simple_graph();
        graph.add_edge(n(0, 0), Heading::West, n(-1, 0), Heading::East, BLOCKED);
        let mut frontier = FrontierTracker::new(StackMode::Keyed);
        for &node in graph.nodes() {
            frontier.add_frontier_headings(node, &[]);
        }
        frontier.add_frontier_headings(n(-1, 0), &[Heading::North]);

        assert!(shortest_unexplored_path(&graph, &frontier, n(0, 0)).is_none());
    }

    #[test]
    fn test_search_state_ordering() {
        let cheap = SearchState { cost: 1, node: 5 };
        let dear = SearchState { cost: 2, node: 0 };
        let early = SearchState { cost: 1, node: 2 };
        assert!(cheap > dear);
        assert!(early > cheap);
    }
}
