//! Upstream dependency traversal.
//!
//! Supports "hide with dependencies" and "focus on upstream tree": given a
//! node, compute the full closure of nodes it depends on by walking incoming
//! edges backward. Lineage graphs are expected to be acyclic, but the
//! traversal treats an already-visited id as terminal so a malformed cyclic
//! payload cannot hang it.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use super::types::Edge;

/// Collect the upstream dependency closure of `node_id`, including the
/// starting node itself.
///
/// BFS over incoming edges: an edge whose target is the current node
/// enqueues its source. O(V+E); recomputed fresh from the current edge list
/// on each invocation rather than incrementally maintained.
pub fn collect_ancestors(node_id: &str, edges: &[Edge]) -> BTreeSet<String> {
    let mut upstream: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in edges {
        upstream
            .entry(edge.target.as_str())
            .or_default()
            .push(edge.source.as_str());
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    visited.insert(node_id);
    queue.push_back(node_id);

    while let Some(current) = queue.pop_front() {
        if let Some(sources) = upstream.get(current) {
            for &source in sources {
                if visited.insert(source) {
                    queue.push_back(source);
                }
            }
        }
    }

    visited.into_iter().map(String::from).collect()
}

/// Number of distinct upstream dependencies of `node_id`, excluding itself.
///
/// This is the `nested_count` the backend attaches to each node.
pub fn ancestor_count(node_id: &str, edges: &[Edge]) -> usize {
    collect_ancestors(node_id, edges).len() - 1
}
