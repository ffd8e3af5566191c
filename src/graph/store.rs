//! The canonical in-memory graph store.
//!
//! The store exclusively owns the node and edge lists and all node geometry.
//! Derived state (visibility, highlight styles) is written back into the
//! stored flags by the resolvers in [`crate::view`], but positions are only
//! ever mutated through [`GraphStore::move_node`] or the layout adapter.

use std::collections::{HashMap, HashSet};

use super::types::{Edge, Node, Position};

/// Canonical list of nodes and edges plus an id index.
///
/// Insertion order is irrelevant for correctness but stable, so iteration
/// produces deterministic output for tests and serialization.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    index: HashMap<String, usize>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire graph with a new node and edge set.
    ///
    /// Duplicate node ids keep the last occurrence. Edges referencing a
    /// missing node id are dropped silently, matching the load-time
    /// referential-inconsistency recovery contract.
    pub fn replace_all(&mut self, nodes: Vec<Node>, edges: Vec<Edge>) {
        self.nodes.clear();
        self.index.clear();
        for node in nodes {
            self.upsert_node(node);
        }

        let ids: HashSet<&str> = self.index.keys().map(String::as_str).collect();
        self.edges = edges
            .into_iter()
            .filter(|e| ids.contains(e.source.as_str()) && ids.contains(e.target.as_str()))
            .collect();
    }

    /// Insert a node, or replace the node with the same id in place.
    pub fn upsert_node(&mut self, node: Node) {
        match self.index.get(&node.id) {
            Some(&at) => self.nodes[at] = node,
            None => {
                self.index.insert(node.id.clone(), self.nodes.len());
                self.nodes.push(node);
            }
        }
    }

    /// Remove a node and every edge incident to it. No-op for unknown ids.
    pub fn remove_node(&mut self, id: &str) {
        if self.index.remove(id).is_none() {
            return;
        }
        self.nodes.retain(|n| n.id != id);
        self.edges.retain(|e| e.source != id && e.target != id);
        self.reindex();
    }

    /// Update a node's position. Returns false for unknown ids.
    pub fn move_node(&mut self, id: &str, position: Position) -> bool {
        match self.index.get(id) {
            Some(&at) => {
                self.nodes[at].position = position;
                true
            }
            None => false,
        }
    }

    /// Add an edge. Silently ignored when either endpoint id is absent or an
    /// edge with the same id already exists.
    pub fn add_edge(&mut self, edge: Edge) {
        if !self.index.contains_key(&edge.source) || !self.index.contains_key(&edge.target) {
            return;
        }
        if self.edges.iter().any(|e| e.id == edge.id) {
            return;
        }
        self.edges.push(edge);
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&at| &self.nodes[at])
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        match self.index.get(id) {
            Some(&at) => Some(&mut self.nodes[at]),
            None => None,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub fn edges_mut(&mut self) -> &mut [Edge] {
        &mut self.edges
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn reindex(&mut self) {
        self.index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(at, n)| (n.id.clone(), at))
            .collect();
    }
}
