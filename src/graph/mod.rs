//! Lineage graph data model and algorithms.
//!
//! The [`GraphStore`] is the single owner of nodes, edges, and geometry.
//! Everything else in the engine reads it and writes back derived flags.

mod store;
pub mod traverse;
pub mod types;

pub use store::GraphStore;
pub use traverse::{ancestor_count, collect_ancestors};
pub use types::{Edge, Layer, Node, NodeDetails, NodeKind, Position, Size};
