//! Node and edge types for the lineage graph.
//!
//! Nodes represent SQL data assets (tables, views, external references) and
//! user annotations (notes, groups). Edges are directed dependency
//! relationships: the edge source is the dependency, the edge target is the
//! consumer. That convention is fixed by the backend payload and preserved
//! everywhere in the engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Pipeline stage classification of an asset node.
///
/// Used for bulk visibility filtering: toggling a layer hides or reveals
/// every asset assigned to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    /// Raw ingestion layer (bronze in medallion terms).
    Raw,
    /// Intermediate transformation layer (silver).
    Intermediate,
    /// Curated consumption layer (gold / marts).
    Curated,
    /// Referenced but not discovered in the project (ghost nodes).
    External,
    /// Common-table-expression output materialized as its own asset.
    Cte,
    /// Anything that could not be classified.
    #[default]
    Other,
}

impl Layer {
    /// All layers, in filter-toolbar order.
    pub const ALL: [Layer; 6] = [
        Layer::Raw,
        Layer::Intermediate,
        Layer::Curated,
        Layer::External,
        Layer::Cte,
        Layer::Other,
    ];

    /// Lowercase name as it appears in persisted documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::Raw => "raw",
            Layer::Intermediate => "intermediate",
            Layer::Curated => "curated",
            Layer::External => "external",
            Layer::Cte => "cte",
            Layer::Other => "other",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A SQL data asset (table, view, external reference).
    #[default]
    Asset,
    /// A free-text annotation note.
    Note,
    /// A visual grouping rectangle drawn behind other nodes.
    Group,
}

impl NodeKind {
    /// True for annotation nodes (notes and groups).
    pub fn is_annotation(&self) -> bool {
        matches!(self, NodeKind::Note | NodeKind::Group)
    }
}

/// On-canvas position, owned by the graph store.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Rendered size, owned by the rendering layer and read by layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Backend-supplied detail payload for an asset node.
///
/// The known fields are fixed; anything else the backend sends is kept in the
/// extension map so round-trips do not lose data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDetails {
    /// Source object type: "table", "view", or "unknown".
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "type")]
    pub source_type: Option<String>,

    /// Project / catalog qualifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    /// Dataset / schema qualifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,

    /// Path of the source file this asset was parsed from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Raw SQL content, passed through opaquely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Forward-compatible extension fields.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// A node in the lineage graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique, stable identifier. For assets this is typically
    /// `schema.table`; for annotations it is generated at creation time
    /// and never reused.
    pub id: String,

    #[serde(default)]
    pub kind: NodeKind,

    /// Pipeline layer (meaningful for assets only).
    #[serde(default)]
    pub layer: Layer,

    /// Display name.
    pub label: String,

    #[serde(default)]
    pub position: Position,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<NodeDetails>,

    /// Direct upstream dependency count, backend-supplied.
    #[serde(default)]
    pub incoming_count: u32,

    /// Full upstream closure size, backend-supplied.
    #[serde(default)]
    pub nested_count: u32,

    /// Annotation style: draw the note without a background.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub transparent: bool,

    /// Annotation style: override font size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,

    /// Derived visibility flag, recomputed by the resolver. Persisted for
    /// document compatibility but never authoritative.
    #[serde(default)]
    pub hidden: bool,

    /// Multi-selection flag for alignment operations. Transient UI state,
    /// never serialized.
    #[serde(skip)]
    pub selected: bool,
}

impl Node {
    /// Create an asset node at the origin.
    pub fn asset(id: impl Into<String>, label: impl Into<String>, layer: Layer) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Asset,
            layer,
            label: label.into(),
            position: Position::default(),
            size: None,
            details: None,
            incoming_count: 0,
            nested_count: 0,
            transparent: false,
            font_size: None,
            hidden: false,
            selected: false,
        }
    }

    /// Create an annotation note with a generated id.
    pub fn note(label: impl Into<String>, position: Position) -> Self {
        let mut node = Self::asset(format!("note-{}", Uuid::new_v4()), label, Layer::Other);
        node.kind = NodeKind::Note;
        node.position = position;
        node
    }

    /// Create a group annotation with a generated id and a default size.
    pub fn group(label: impl Into<String>, position: Position) -> Self {
        let mut node = Self::asset(format!("group-{}", Uuid::new_v4()), label, Layer::Other);
        node.kind = NodeKind::Group;
        node.position = position;
        node.size = Some(Size {
            width: 300.0,
            height: 200.0,
        });
        node
    }

    /// Builder-style position setter.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }

    /// Builder-style details setter.
    pub fn with_details(mut self, details: NodeDetails) -> Self {
        self.details = Some(details);
        self
    }
}

/// A directed dependency edge: `source` is depended on by `target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,

    /// Derived flag: true when either endpoint is hidden.
    #[serde(default)]
    pub hidden: bool,
}

impl Edge {
    /// Create an edge with the conventional `source-target` id.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: format!("{}-{}", source, target),
            source,
            target,
            hidden: false,
        }
    }
}
