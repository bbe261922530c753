//! Directed cycle detection over parent -> child relationships.

use std::fmt;
use std::hash::{Hash, Hasher};

use mp_core::model::{CollectResult, ObjectId};
use mp_core::{FxHashMap, FxHashSet};
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::debug;

use super::result::ValidationResult;
use crate::bundle::ResponseStatus;

/// A closed walk, compared up to rotation.
///
/// `[1, 2, 3]`, `[2, 3, 1]` and `[3, 1, 2]` are the same cycle;
/// `[3, 2, 1]` is not.
#[derive(Debug, Clone)]
pub struct Cycle<N> {
    nodes: Vec<N>,
    canonical: Vec<N>,
}

impl<N: Ord + Clone> Cycle<N> {
    pub fn new(nodes: Vec<N>) -> Self {
        let canonical = least_rotation(&nodes);
        Self { nodes, canonical }
    }

    /// Cycle closed by a back edge from the top of `stack` to `target`.
    ///
    /// The cycle is the part of the stack above `target`, then `target`.
    pub fn from_back_edge(stack: &[N], target: N) -> Self {
        let start = stack
            .iter()
            .rposition(|node| *node == target)
            .map_or(0, |i| i + 1);
        let mut nodes = stack[start..].to_vec();
        nodes.push(target);
        Self::new(nodes)
    }
}

impl<N> Cycle<N> {
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn least_rotation<N: Ord + Clone>(nodes: &[N]) -> Vec<N> {
    let rotation = move |i: usize| nodes[i..].iter().chain(&nodes[..i]);
    let best = (0..nodes.len())
        .min_by(|&a, &b| rotation(a).cmp(rotation(b)))
        .unwrap_or(0);
    rotation(best).cloned().collect()
}

impl<N: PartialEq> PartialEq for Cycle<N> {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl<N: Eq> Eq for Cycle<N> {}

impl<N: Hash> Hash for Cycle<N> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

/// `c -> a -> b -> c` for the cycle `[a, b, c]`.
impl<N: fmt::Display> fmt::Display for Cycle<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(last) = self.nodes.last() else {
            return Ok(());
        };
        write!(f, "{last}")?;
        for node in &self.nodes {
            write!(f, " -> {node}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    Visited,
    Done,
}

/// Directed graph with nodes and edges kept in insertion order.
#[derive(Debug, Clone)]
pub struct Graph<N> {
    graph: DiGraph<N, ()>,
    index: FxHashMap<N, NodeIndex>,
}

impl<N> Default for Graph<N> {
    fn default() -> Self {
        Self {
            graph: DiGraph::new(),
            index: FxHashMap::default(),
        }
    }
}

impl<N: Clone + Eq + Hash + Ord> Graph<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a node list and an adjacency map.
    pub fn from_adjacency<I, A, C>(nodes: I, adjacency: A) -> Self
    where
        I: IntoIterator<Item = N>,
        A: IntoIterator<Item = (N, C)>,
        C: IntoIterator<Item = N>,
    {
        let mut graph = Self::new();
        for node in nodes {
            graph.add_node(node);
        }
        for (parent, children) in adjacency {
            for child in children {
                graph.add_edge(parent.clone(), child);
            }
        }
        graph
    }

    pub fn add_node(&mut self, node: N) -> NodeIndex {
        if let Some(&idx) = self.index.get(&node) {
            return idx;
        }
        let idx = self.graph.add_node(node.clone());
        self.index.insert(node, idx);
        idx
    }

    /// Add `parent -> child`. Repeated edges are stored once.
    pub fn add_edge(&mut self, parent: N, child: N) {
        let from = self.add_node(parent);
        let to = self.add_node(child);
        self.graph.update_edge(from, to, ());
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Successors of each node, in the order the edges were added.
    fn adjacency(&self) -> Vec<Vec<NodeIndex>> {
        self.graph
            .node_indices()
            .map(|idx| {
                // petgraph yields the newest edge first.
                let mut successors: Vec<NodeIndex> = self.graph.neighbors(idx).collect();
                successors.reverse();
                successors
            })
            .collect()
    }

    /// Every cycle closed by a back edge during a depth-first search from
    /// each unvisited node, in insertion order.
    pub fn cycles(&self) -> FxHashSet<Cycle<N>> {
        let adjacency = self.adjacency();
        let mut state = vec![VisitState::Unvisited; self.graph.node_count()];
        let mut cycles = FxHashSet::default();

        for start in self.graph.node_indices() {
            if state[start.index()] != VisitState::Unvisited {
                continue;
            }
            state[start.index()] = VisitState::Visited;
            let mut stack: Vec<NodeIndex> = vec![start];
            let mut cursors: Vec<usize> = vec![0];

            while let Some(&node) = stack.last() {
                let depth = stack.len() - 1;
                let Some(&next) = adjacency[node.index()].get(cursors[depth]) else {
                    state[node.index()] = VisitState::Done;
                    stack.pop();
                    cursors.pop();
                    continue;
                };
                cursors[depth] += 1;

                match state[next.index()] {
                    VisitState::Visited => {
                        let path: Vec<N> = stack.iter().map(|&i| self.graph[i].clone()).collect();
                        cycles.insert(Cycle::from_back_edge(&path, self.graph[next].clone()));
                    }
                    VisitState::Unvisited => {
                        state[next.index()] = VisitState::Visited;
                        stack.push(next);
                        cursors.push(0);
                    }
                    VisitState::Done => {}
                }
            }
        }

        cycles
    }
}

/// Parent -> child graph of one collect payload. Keys without an identity are skipped.
pub fn relationship_graph(payload: &CollectResult) -> Graph<ObjectId> {
    let mut graph = Graph::new();
    for relationship in payload.relationship_entries() {
        let Some(parent) = relationship.parent.as_ref().and_then(ObjectId::from_key) else {
            continue;
        };
        graph.add_node(parent.clone());
        for child in relationship.child_keys().filter_map(ObjectId::from_key) {
            graph.add_edge(parent.clone(), child);
        }
    }
    graph
}

/// Report every relationship cycle in a collect response as an ERROR.
pub fn validate_relationships(status: &ResponseStatus, body: &str) -> ValidationResult {
    let mut result = ValidationResult::new();

    if !status.is_success() {
        result.add_error(format!(
            "Unable to validate relationships. The collect endpoint response was: {} {}",
            status.status_code, status.reason_phrase
        ));
        return result;
    }

    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            result.add_error(format!(
                "Unable to validate relationships. Returned result is not valid json: '{body:?}' Error: '{e}'"
            ));
            return result;
        }
    };

    if !value
        .as_object()
        .is_some_and(|object| object.contains_key("relationships"))
    {
        result.add_error("No collection result was found.");
        return result;
    }

    let payload: CollectResult = match serde_json::from_value(value) {
        Ok(payload) => payload,
        Err(e) => {
            result.add_error(format!("Unable to validate relationships: '{e}'"));
            return result;
        }
    };

    let graph = relationship_graph(&payload);
    let mut cycles: Vec<String> = graph.cycles().iter().map(ToString::to_string).collect();
    cycles.sort();
    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        cycles = cycles.len(),
        "Relationship graph checked"
    );
    for cycle in cycles {
        result.add_error(format!("Found relationship cycle: {cycle}"));
    }
    result
}
