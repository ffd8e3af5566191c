//! Configuration persistence: named full-snapshot view documents.
//!
//! A configuration document captures everything needed to reproduce a view:
//! nodes, edges, viewport, and metadata (theme, style, palette, dialect,
//! discovery mode, titles, project path, hidden-node ids, layer filters).
//! Saves are complete snapshots and loads are complete replacements; there
//! is no diffing. Interactive behavior is never part of the document: the
//! hosting layer re-binds its own handlers after a load.
//!
//! Documents are JSON with camelCase keys. Unknown fields in node details
//! round-trip through the extension map, so documents written by other
//! versions are not damaged by a load/save cycle.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::dialect::Dialect;
use crate::graph::types::{Edge, Node};
use crate::graph::GraphStore;
use crate::view::{LayerFilters, NodeStyle, Palette, Theme, ViewState};

/// Default document filename when the user does not pick one.
pub const DEFAULT_DOCUMENT: &str = "sql_diagram.json";

/// Errors from reading or writing configuration documents.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("Failed to read or write document: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode or decode document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid document filename: {0:?}")]
    InvalidFilename(String),
}

/// Canvas viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

/// Document metadata block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Metadata {
    pub theme: Theme,
    pub node_style: NodeStyle,
    pub palette: Palette,
    pub dialect: Dialect,
    pub discovery_mode: bool,
    pub title: String,
    pub subtitle: String,
    pub path: String,
    pub hidden_node_ids: Vec<String>,
    pub visible_layers: LayerFilters,
}

/// A persisted snapshot of the full view state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigDocument {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub viewport: Viewport,
    pub metadata: Metadata,
}

impl ConfigDocument {
    /// The empty document returned when a named view does not exist yet.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Capture a full snapshot of the store and view state.
pub fn serialize(store: &GraphStore, view: &ViewState, viewport: Viewport) -> ConfigDocument {
    ConfigDocument {
        nodes: store.nodes().to_vec(),
        edges: store.edges().to_vec(),
        viewport,
        metadata: Metadata {
            theme: view.theme,
            node_style: view.node_style,
            palette: view.palette,
            dialect: view.dialect,
            discovery_mode: view.discovery_mode,
            title: view.title.clone(),
            subtitle: view.subtitle.clone(),
            path: view.path.clone(),
            hidden_node_ids: view.hidden_nodes.iter().cloned().collect(),
            visible_layers: view.filters,
        },
    }
}

/// Rebuild store contents and view state from a document.
///
/// Dangling edges are dropped silently by the store. Hidden ids restore
/// verbatim into the flat hidden set; cascade membership is not
/// distinguished. The caller re-runs the visibility resolver afterwards;
/// persisted hidden flags are never authoritative.
pub fn deserialize(doc: ConfigDocument) -> (GraphStore, ViewState, Viewport) {
    let mut store = GraphStore::new();
    store.replace_all(doc.nodes, doc.edges);

    let meta = doc.metadata;
    let mut view = ViewState {
        theme: meta.theme,
        node_style: meta.node_style,
        palette: meta.palette,
        dialect: meta.dialect,
        discovery_mode: meta.discovery_mode,
        filters: meta.visible_layers,
        title: meta.title,
        subtitle: meta.subtitle,
        path: meta.path,
        ..ViewState::default()
    };
    view.hidden_nodes = meta.hidden_node_ids.into_iter().collect();

    (store, view, doc.viewport)
}

/// Write a document to `dir/filename` as an atomic full-snapshot
/// replacement: the JSON is written to a temporary sibling and renamed over
/// the target, so a crash never leaves a truncated document behind.
pub fn write_document(dir: &Path, filename: &str, doc: &ConfigDocument) -> Result<PathBuf, PersistError> {
    validate_filename(filename)?;
    let target = dir.join(filename);
    let tmp = dir.join(format!("{filename}.tmp"));
    let json = serde_json::to_string_pretty(doc)?;
    fs::write(&tmp, json)?;
    fs::rename(&tmp, &target)?;
    Ok(target)
}

/// Read a document from `dir/filename`. A missing file yields the empty
/// document rather than an error, matching the load contract.
pub fn read_document(dir: &Path, filename: &str) -> Result<ConfigDocument, PersistError> {
    validate_filename(filename)?;
    let target = dir.join(filename);
    if !target.exists() {
        return Ok(ConfigDocument::empty());
    }
    let json = fs::read_to_string(&target)?;
    Ok(serde_json::from_str(&json)?)
}

/// List saved configuration documents (`*.json` files) in a directory,
/// sorted by name. A missing directory yields an empty list.
pub fn list_documents(dir: &Path) -> Result<Vec<String>, PersistError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(".json") && entry.path().is_file() {
            files.push(name);
        }
    }
    files.sort();
    Ok(files)
}

/// Reject filenames that are empty or could escape the document directory.
/// Callers validate before any lifecycle transition or IO.
pub fn validate_filename(filename: &str) -> Result<(), PersistError> {
    if filename.trim().is_empty() || filename.contains('/') || filename.contains("..") {
        return Err(PersistError::InvalidFilename(filename.to_string()));
    }
    Ok(())
}
