//! Auto-layout adapter.
//!
//! The layout algorithm is treated as a pure function from graph to
//! positions: layered (Sugiyama-style) ranking over a topological order,
//! with a barycenter pass ordering nodes within each rank. The adapter's
//! real contract is the merge behavior around it: on a data refresh,
//! surviving nodes keep their on-screen positions and layout runs only on
//! first load or an explicit "auto layout" request. New nodes introduced by
//! an incremental refresh land at the origin rather than triggering a full
//! re-layout.

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction as PetDirection;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::graph::types::{Edge, Node, Position};
use crate::graph::GraphStore;

/// Fallback node box used when the renderer has not reported a size yet.
pub const DEFAULT_NODE_WIDTH: f64 = 250.0;
pub const DEFAULT_NODE_HEIGHT: f64 = 100.0;

/// Gap between ranks along the flow axis.
const RANK_GAP: f64 = 100.0;
/// Gap between siblings within a rank.
const NODE_GAP: f64 = 80.0;

/// Flow direction of the layered layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Dependencies on the left, consumers to the right.
    #[default]
    #[serde(rename = "LR")]
    LeftRight,
    /// Dependencies on top, consumers below.
    #[serde(rename = "TB")]
    TopBottom,
}

/// Compute a position for every node.
///
/// Ranks follow the longest dependency path: a node is always placed at
/// least one rank after each of its dependencies. Cyclic payloads are
/// tolerated: back edges are ignored for ranking, so the result is still a
/// valid (if imperfect) layered placement.
pub fn layout(nodes: &[Node], edges: &[Edge], direction: Direction) -> HashMap<String, Position> {
    if nodes.is_empty() {
        return HashMap::new();
    }

    let mut graph: DiGraph<&str, ()> = DiGraph::new();
    let mut by_id: HashMap<&str, NodeIndex> = HashMap::new();
    for node in nodes {
        by_id.entry(node.id.as_str()).or_insert_with(|| graph.add_node(node.id.as_str()));
    }
    for edge in edges {
        if let (Some(&s), Some(&t)) = (by_id.get(edge.source.as_str()), by_id.get(edge.target.as_str())) {
            if s != t {
                graph.add_edge(s, t, ());
            }
        }
    }

    let order = match toposort(&graph, None) {
        Ok(order) => order,
        Err(_) => cycle_tolerant_order(&graph),
    };

    // Longest-path layering.
    let mut rank: HashMap<NodeIndex, usize> = HashMap::new();
    for &idx in &order {
        let r = graph
            .neighbors_directed(idx, PetDirection::Incoming)
            .filter_map(|pred| rank.get(&pred).map(|r| r + 1))
            .max()
            .unwrap_or(0);
        rank.insert(idx, r);
    }

    // Group by rank, preserving insertion order within each rank.
    let max_rank = rank.values().copied().max().unwrap_or(0);
    let mut ranks: Vec<Vec<NodeIndex>> = vec![Vec::new(); max_rank + 1];
    for node in nodes {
        let idx = by_id[node.id.as_str()];
        ranks[*rank.get(&idx).unwrap_or(&0)].push(idx);
    }

    // One barycenter sweep: order each rank by the mean order of its
    // predecessors in the previous rank, keeping ties stable.
    let mut slot: HashMap<NodeIndex, usize> = HashMap::new();
    for (i, &idx) in ranks[0].iter().enumerate() {
        slot.insert(idx, i);
    }
    for r in 1..ranks.len() {
        let mut keyed: Vec<(f64, usize, NodeIndex)> = ranks[r]
            .iter()
            .enumerate()
            .map(|(i, &idx)| {
                let preds: Vec<usize> = graph
                    .neighbors_directed(idx, PetDirection::Incoming)
                    .filter_map(|p| slot.get(&p).copied())
                    .collect();
                let bary = if preds.is_empty() {
                    i as f64
                } else {
                    preds.iter().sum::<usize>() as f64 / preds.len() as f64
                };
                (bary, i, idx)
            })
            .collect();
        keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal).then(a.1.cmp(&b.1)));
        ranks[r] = keyed.iter().map(|&(_, _, idx)| idx).collect();
        for (i, &idx) in ranks[r].iter().enumerate() {
            slot.insert(idx, i);
        }
    }

    let mut positions = HashMap::new();
    for (r, members) in ranks.iter().enumerate() {
        for (i, &idx) in members.iter().enumerate() {
            let along = r as f64 * (rank_extent(direction) + RANK_GAP);
            let across = i as f64 * (node_extent(direction) + NODE_GAP);
            let position = match direction {
                Direction::LeftRight => Position::new(along, across),
                Direction::TopBottom => Position::new(across, along),
            };
            positions.insert(graph[idx].to_string(), position);
        }
    }
    positions
}

/// Write layout results back into the store. Ids absent from the map keep
/// their current positions.
pub fn merge_positions(store: &mut GraphStore, positions: &HashMap<String, Position>) {
    for node in store.nodes_mut() {
        if let Some(&position) = positions.get(&node.id) {
            node.position = position;
        }
    }
}

/// Carry current positions into a refreshed node payload.
///
/// Every incoming node whose id already exists keeps the on-screen position
/// (and size) it had; genuinely new nodes keep the payload position, which
/// the backend sets to the origin.
pub fn carry_positions(current: &GraphStore, incoming: &mut [Node]) {
    for node in incoming.iter_mut() {
        if let Some(existing) = current.node(&node.id) {
            node.position = existing.position;
            if node.size.is_none() {
                node.size = existing.size;
            }
        }
    }
}

fn rank_extent(direction: Direction) -> f64 {
    match direction {
        Direction::LeftRight => DEFAULT_NODE_WIDTH,
        Direction::TopBottom => DEFAULT_NODE_HEIGHT,
    }
}

fn node_extent(direction: Direction) -> f64 {
    match direction {
        Direction::LeftRight => DEFAULT_NODE_HEIGHT,
        Direction::TopBottom => DEFAULT_NODE_WIDTH,
    }
}

/// Visit order for cyclic graphs: Kahn peeling, then whatever remains (the
/// cycle members) in insertion order so ranking still terminates.
fn cycle_tolerant_order(graph: &DiGraph<&str, ()>) -> Vec<NodeIndex> {
    let mut indegree: HashMap<NodeIndex, usize> = graph
        .node_indices()
        .map(|idx| (idx, graph.neighbors_directed(idx, PetDirection::Incoming).count()))
        .collect();

    let mut order = Vec::with_capacity(graph.node_count());
    let mut queue: Vec<NodeIndex> = graph
        .node_indices()
        .filter(|idx| indegree[idx] == 0)
        .collect();

    while let Some(idx) = queue.pop() {
        order.push(idx);
        for next in graph.neighbors_directed(idx, PetDirection::Outgoing) {
            if let Some(d) = indegree.get_mut(&next) {
                *d -= 1;
                if *d == 0 {
                    queue.push(next);
                }
            }
        }
    }

    if order.len() < graph.node_count() {
        for idx in graph.node_indices() {
            if !order.contains(&idx) {
                order.push(idx);
            }
        }
    }
    order
}
