//! Derived visibility computation.
//!
//! A node's hidden flag is never a primary fact: it is recomputed from the
//! layer filter set and the flat hidden-id set. Edge visibility is explicit
//! and deterministic: an edge is hidden iff either endpoint is hidden. The
//! pass reports how many flags actually changed so callers can skip
//! downstream re-render work when nothing moved.

use std::collections::BTreeSet;
use std::collections::HashSet;

use super::{LayerFilters, ViewState};
use crate::graph::types::{Node, NodeKind};
use crate::graph::GraphStore;

/// Pure visibility predicate for a single node.
///
/// Assets are hidden when their layer is filtered out or their id is in the
/// hidden set. Annotations carry no meaningful layer, so only the hidden set
/// applies to them.
pub fn node_hidden(node: &Node, filters: &LayerFilters, hidden_ids: &BTreeSet<String>) -> bool {
    if hidden_ids.contains(&node.id) {
        return true;
    }
    match node.kind {
        NodeKind::Asset => !filters.is_visible(node.layer),
        NodeKind::Note | NodeKind::Group => false,
    }
}

/// Recompute every node and edge hidden flag from the view state.
///
/// Returns the number of flags that changed. Idempotent: a second call with
/// an unchanged view state returns 0 and leaves the store untouched.
pub fn apply(store: &mut GraphStore, view: &ViewState) -> usize {
    let mut changed = 0;

    let mut hidden_now: HashSet<String> = HashSet::new();
    for node in store.nodes_mut() {
        let hidden = node_hidden(node, &view.filters, &view.hidden_nodes);
        if node.hidden != hidden {
            node.hidden = hidden;
            changed += 1;
        }
        if hidden {
            hidden_now.insert(node.id.clone());
        }
    }

    for edge in store.edges_mut() {
        let hidden = hidden_now.contains(&edge.source) || hidden_now.contains(&edge.target);
        if edge.hidden != hidden {
            edge.hidden = hidden;
            changed += 1;
        }
    }

    changed
}
