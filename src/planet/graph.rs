//! Graph store for discovered lines.
//!
//! Nodes are kept in discovery order alongside a per-node adjacency map,
//! so that searches can break ties by "first seen" without hashing order
//! leaking into results.

use std::collections::{BTreeMap, HashMap};

use super::{Edge, Heading, Node};

static NO_EDGES: BTreeMap<Heading, Edge> = BTreeMap::new();

/// Symmetric adjacency store of every line known on the planet.
///
/// Every insertion writes both directions, so for each entry
/// `(A, hA) -> (B, hB, w)` the entry `(B, hB) -> (A, hA, w)` exists too.
#[derive(Clone, Debug, Default)]
pub struct PlanetGraph {
    /// Nodes in discovery order.
    nodes: Vec<Node>,

    /// Node -> index into `nodes` / `edges`.
    index: HashMap<Node, usize>,

    /// Adjacency: edges[i] = heading -> far end, for nodes[i].
    edges: Vec<BTreeMap<Heading, Edge>>,
}

impl PlanetGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node without any lines. Returns its discovery index.
    pub fn register_node(&mut self, node: Node) -> usize {
        if let Some(&idx) = self.index.get(&node) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(node);
        self.index.insert(node, idx);
        self.edges.push(BTreeMap::new());
        idx
    }

    /// Upsert the symmetric pair `(from, from_heading) <-> (to, to_heading)`.
    ///
    /// Re-adding the same line is a no-op; a different cost or endpoint for an
    /// existing `(node, heading)` overwrites it. If the overwritten entry
    /// pointed somewhere else, the stale reverse entry is dropped.
    pub fn add_edge(
        &mut self,
        from: Node,
        from_heading: Heading,
        to: Node,
        to_heading: Heading,
        cost: i32,
    ) {
        let from_idx = self.register_node(from);
        let to_idx = self.register_node(to);

        self.unlink_stale(from_idx, from, from_heading, to, to_heading);
        self.unlink_stale(to_idx, to, to_heading, from, from_heading);

        self.edges[from_idx].insert(from_heading, Edge::new(to, to_heading, cost));
        self.edges[to_idx].insert(to_heading, Edge::new(from, from_heading, cost));
    }

    /// Drop the reverse half of `(node, heading)` if it is about to be
    /// redirected away from `(new_to, new_arrival)`.
    fn unlink_stale(
        &mut self,
        idx: usize,
        node: Node,
        heading: Heading,
        new_to: Node,
        new_arrival: Heading,
    ) {
        let Some(old) = self.edges[idx].get(&heading).copied() else {
            return;
        };
        if old.to == new_to && old.arrival == new_arrival {
            return;
        }
        if let Some(&old_idx) = self.index.get(&old.to) {
            let points_back = self.edges[old_idx]
                .get(&old.arrival)
                .is_some_and(|e| e.to == node && e.arrival == heading);
            if points_back {
                tracing::debug!(
                    "Dropping stale line {} {} -> {} {}",
                    old.to,
                    old.arrival,
                    node,
                    heading
                );
                self.edges[old_idx].remove(&old.arrival);
            }
        }
    }

    /// Lines leaving `node`, keyed by heading. Unknown nodes have none.
    pub fn edges_of(&self, node: Node) -> &BTreeMap<Heading, Edge> {
        match self.index.get(&node) {
            Some(&idx) => &self.edges[idx],
            None => &NO_EDGES,
        }
    }

    /// Line leaving `node` at `heading`, if known.
    pub fn edge(&self, node: Node, heading: Heading) -> Option<&Edge> {
        self.edges_of(node).get(&heading)
    }

    pub fn contains(&self, node: Node) -> bool {
        self.index.contains_key(&node)
    }

    /// Discovery index of `node`.
    pub fn index_of(&self, node: Node) -> Option<usize> {
        self.index.get(&node).copied()
    }

    /// Node at a discovery index.
    pub fn node_at(&self, idx: usize) -> Option<Node> {
        self.nodes.get(idx).copied()
    }

    /// Adjacency by discovery index.
    pub(crate) fn edges_at(&self, idx: usize) -> &BTreeMap<Heading, Edge> {
        &self.edges[idx]
    }

    /// All nodes in discovery order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of directed entries (twice the number of lines, minus
    /// self-loops that reuse one heading).
    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
