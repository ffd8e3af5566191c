//! # sqldag
//!
//! An interactive lineage graph engine for SQL data assets.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │              SQL Project (.sql files)                    │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [scan]
//! ┌─────────────────────────────────────────────────────────┐
//! │        Lineage Graph (nodes, dependency edges)           │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [session]
//! ┌─────────────────────────────────────────────────────────┐
//! │   GraphStore + ViewState (filters, hides, selection)     │
//! │   resolvers: visibility, highlight, layout               │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [persist]
//! ┌─────────────────────────────────────────────────────────┐
//! │        ConfigDocument (JSON full-snapshot views)         │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The store owns the data, the view state owns the toggles, and every
//! visible attribute (node hidden flags, edge hidden flags, edge styles)
//! is recomputed from those two by pure resolver passes.

pub mod config;
pub mod dialect;
pub mod graph;
pub mod layout;
pub mod persist;
pub mod scan;
pub mod session;
pub mod view;

#[cfg(feature = "ui")]
pub mod web;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::dialect::Dialect;
    pub use crate::graph::{
        collect_ancestors, Edge, GraphStore, Layer, Node, NodeDetails, NodeKind, Position,
    };
    pub use crate::layout::Direction;
    pub use crate::persist::{ConfigDocument, Viewport, DEFAULT_DOCUMENT};
    pub use crate::session::{AlignAxis, DocumentState, RefreshGuard, Session};
    pub use crate::view::{LayerFilters, NodeStyle, Palette, Theme, ViewState};
}

pub use dialect::Dialect;
pub use graph::GraphStore;
pub use session::Session;
pub use view::ViewState;
