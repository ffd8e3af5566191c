//! Editor session: the stateful surface the hosting view layer talks to.
//!
//! A [`Session`] owns the graph store, the view state, the document
//! lifecycle, and the refresh-generation guard, and exposes every user
//! operation as a typed method. Node data stays free of callbacks; the
//! host renders from the store and the derived edge styles, and routes
//! gestures back through these methods. After every mutation the session
//! re-runs the visibility resolver and the selection highlighter, so the
//! derived flags are always consistent with the current state.

use std::collections::BTreeSet;

use crate::graph::types::{Edge, Node, Position};
use crate::graph::{collect_ancestors, GraphStore, Layer};
use crate::layout::{self, Direction};
use crate::persist::{self, ConfigDocument, PersistError, Viewport, DEFAULT_DOCUMENT};
use crate::view::highlight::{self, EdgeStyle};
use crate::view::{visibility, ViewState};

/// Axis for multi-selection alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignAxis {
    /// Equalize y: place the selected nodes on one horizontal line.
    Horizontal,
    /// Equalize x: place the selected nodes on one vertical line.
    Vertical,
}

/// Document lifecycle: untitled -> named on first save -> dirty on any
/// mutation -> saved on save; a load replaces the whole in-memory state and
/// lands in the saved state under the loaded name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DocumentState {
    #[default]
    Untitled,
    Saved {
        filename: String,
    },
    Dirty {
        filename: Option<String>,
    },
}

impl DocumentState {
    /// Transition taken by any mutation.
    pub fn touched(self) -> Self {
        match self {
            DocumentState::Untitled => DocumentState::Dirty { filename: None },
            DocumentState::Saved { filename } => DocumentState::Dirty {
                filename: Some(filename),
            },
            dirty @ DocumentState::Dirty { .. } => dirty,
        }
    }

    pub fn is_dirty(&self) -> bool {
        matches!(self, DocumentState::Dirty { .. })
    }

    pub fn filename(&self) -> Option<&str> {
        match self {
            DocumentState::Untitled => None,
            DocumentState::Saved { filename } => Some(filename),
            DocumentState::Dirty { filename } => filename.as_deref(),
        }
    }
}

/// Monotonic request-generation guard for asynchronous graph refreshes.
///
/// Each outgoing fetch takes a sequence number from [`RefreshGuard::begin`];
/// a response is applied only when its number still matches the last-issued
/// request, so a late-arriving superseded response can never overwrite newer
/// state.
#[derive(Debug, Clone, Copy, Default)]
pub struct RefreshGuard {
    issued: u64,
}

impl RefreshGuard {
    /// Register a new outgoing request and return its sequence number.
    pub fn begin(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// True when a response with this sequence number is still current.
    pub fn accept(&self, seq: u64) -> bool {
        seq == self.issued
    }
}

/// The view-state engine behind one open diagram.
#[derive(Debug, Clone, Default)]
pub struct Session {
    store: GraphStore,
    view: ViewState,
    viewport: Viewport,
    document: DocumentState,
    guard: RefreshGuard,
    styles: Vec<EdgeStyle>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn document(&self) -> &DocumentState {
        &self.document
    }

    /// Current derived edge render attributes.
    pub fn edge_styles(&self) -> &[EdgeStyle] {
        &self.styles
    }

    // ------------------------------------------------------------------
    // Refresh cycle
    // ------------------------------------------------------------------

    /// Take a sequence number for an outgoing graph fetch.
    pub fn begin_refresh(&mut self) -> u64 {
        self.guard.begin()
    }

    /// Merge a backend graph payload into the store.
    ///
    /// Returns false (and changes nothing) when the payload belongs to a
    /// superseded request. Surviving nodes keep their on-screen positions;
    /// a full layout runs only when the store was empty, so a refresh never
    /// destroys user-made layout edits.
    pub fn apply_refresh(&mut self, seq: u64, mut nodes: Vec<Node>, edges: Vec<Edge>) -> bool {
        if !self.guard.accept(seq) {
            return false;
        }
        let first_load = self.store.is_empty();
        layout::carry_positions(&self.store, &mut nodes);
        self.store.replace_all(nodes, edges);
        if first_load {
            self.auto_layout(Direction::LeftRight);
        }
        self.touch();
        true
    }

    /// Run the layout algorithm over the full graph and apply the result.
    pub fn auto_layout(&mut self, direction: Direction) {
        let positions = layout::layout(self.store.nodes(), self.store.edges(), direction);
        layout::merge_positions(&mut self.store, &positions);
        self.touch();
    }

    // ------------------------------------------------------------------
    // Graph mutations
    // ------------------------------------------------------------------

    pub fn move_node(&mut self, id: &str, position: Position) {
        if self.store.move_node(id, position) {
            self.touch();
        }
    }

    pub fn add_edge(&mut self, source: &str, target: &str) {
        self.store.add_edge(Edge::new(source, target));
        self.touch();
    }

    /// Add an annotation note and return its generated id.
    pub fn add_note(&mut self, position: Position) -> String {
        let node = Node::note("Comment...", position);
        let id = node.id.clone();
        self.store.upsert_node(node);
        self.touch();
        id
    }

    /// Add a group annotation and return its generated id.
    pub fn add_group(&mut self, position: Position) -> String {
        let node = Node::group("Group Name", position);
        let id = node.id.clone();
        self.store.upsert_node(node);
        self.touch();
        id
    }

    pub fn edit_label(&mut self, id: &str, label: impl Into<String>) {
        if let Some(node) = self.store.node_mut(id) {
            node.label = label.into();
            self.touch();
        }
    }

    pub fn set_transparent(&mut self, id: &str, transparent: bool) {
        if let Some(node) = self.store.node_mut(id) {
            node.transparent = transparent;
            self.touch();
        }
    }

    pub fn set_font_size(&mut self, id: &str, size: Option<f32>) {
        if let Some(node) = self.store.node_mut(id) {
            node.font_size = size;
            self.touch();
        }
    }

    pub fn remove_node(&mut self, id: &str) {
        self.store.remove_node(id);
        if self.view.selected.as_deref() == Some(id) {
            self.view = self.view.clone().clear_selection();
        }
        if self.view.details.as_deref() == Some(id) {
            self.view = self.view.clone().close_details();
        }
        self.touch();
    }

    // ------------------------------------------------------------------
    // Visibility
    // ------------------------------------------------------------------

    pub fn toggle_layer(&mut self, layer: Layer) {
        self.view = self.view.clone().toggle_layer(layer);
        self.touch();
    }

    pub fn set_layer_visible(&mut self, layer: Layer, visible: bool) {
        self.view = self.view.clone().with_layer(layer, visible);
        self.touch();
    }

    pub fn hide_node(&mut self, id: &str) {
        self.view = self.view.clone().hide(id);
        self.touch();
    }

    /// Hide a node together with its full upstream dependency closure.
    ///
    /// The closure is recomputed fresh from the current edge list; the ids
    /// land in the same flat hidden set as single hides.
    pub fn hide_with_dependencies(&mut self, id: &str) -> BTreeSet<String> {
        let ancestors = collect_ancestors(id, self.store.edges());
        self.view = self.view.clone().hide_all(ancestors.iter().cloned());
        self.touch();
        ancestors
    }

    pub fn show_node(&mut self, id: &str) {
        self.view = self.view.clone().show(id);
        self.touch();
    }

    pub fn show_all_nodes(&mut self) {
        self.view = self.view.clone().show_everything();
        self.touch();
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn select(&mut self, id: &str) {
        self.view = self.view.clone().select(id);
        self.refresh_derived();
    }

    pub fn clear_selection(&mut self) {
        self.view = self.view.clone().clear_selection();
        self.refresh_derived();
    }

    pub fn open_details(&mut self, id: &str) {
        self.view = self.view.clone().open_details(id);
    }

    pub fn close_details(&mut self) {
        self.view = self.view.clone().close_details();
    }

    /// Multi-select a node's whole upstream tree for a focus operation.
    pub fn focus_upstream(&mut self, id: &str) -> BTreeSet<String> {
        let ancestors = collect_ancestors(id, self.store.edges());
        for node in self.store.nodes_mut() {
            node.selected = ancestors.contains(&node.id);
        }
        ancestors
    }

    pub fn clear_multi_selection(&mut self) {
        for node in self.store.nodes_mut() {
            node.selected = false;
        }
    }

    /// Align the multi-selected nodes on one axis, at their mean coordinate.
    pub fn align_selected(&mut self, axis: AlignAxis) {
        let selected: Vec<usize> = self
            .store
            .nodes()
            .iter()
            .enumerate()
            .filter(|(_, n)| n.selected)
            .map(|(i, _)| i)
            .collect();
        if selected.len() < 2 {
            return;
        }
        let nodes = self.store.nodes_mut();
        let mean = selected
            .iter()
            .map(|&i| match axis {
                AlignAxis::Horizontal => nodes[i].position.y,
                AlignAxis::Vertical => nodes[i].position.x,
            })
            .sum::<f64>()
            / selected.len() as f64;
        for &i in &selected {
            match axis {
                AlignAxis::Horizontal => nodes[i].position.y = mean,
                AlignAxis::Vertical => nodes[i].position.x = mean,
            }
        }
        self.touch();
    }

    // ------------------------------------------------------------------
    // Appearance toggles
    // ------------------------------------------------------------------

    pub fn toggle_theme(&mut self) {
        self.view = self.view.clone().toggle_theme();
        self.touch();
    }

    pub fn toggle_node_style(&mut self) {
        self.view = self.view.clone().toggle_node_style();
        self.touch();
    }

    pub fn cycle_palette(&mut self) {
        self.view = self.view.clone().cycle_palette();
        self.touch();
    }

    pub fn toggle_counts(&mut self) {
        self.view = self.view.clone().toggle_counts();
        self.touch();
    }

    pub fn toggle_discovery(&mut self) {
        self.view = self.view.clone().toggle_discovery();
        self.touch();
    }

    pub fn set_dialect(&mut self, dialect: crate::dialect::Dialect) {
        self.view = self.view.clone().with_dialect(dialect);
        self.touch();
    }

    pub fn set_titles(&mut self, title: impl Into<String>, subtitle: impl Into<String>) {
        self.view = self.view.clone().with_titles(title, subtitle);
        self.touch();
    }

    pub fn set_path(&mut self, path: impl Into<String>) {
        self.view = self.view.clone().with_path(path);
        self.touch();
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Snapshot the session into a configuration document and advance the
    /// lifecycle to saved. An invalid filename (empty, or one that could
    /// escape the document directory) is rejected before anything else
    /// happens; the lifecycle state is untouched on error.
    pub fn save(&mut self, filename: Option<&str>) -> Result<ConfigDocument, PersistError> {
        let filename = filename
            .or_else(|| self.document.filename())
            .unwrap_or(DEFAULT_DOCUMENT)
            .to_string();
        persist::validate_filename(&filename)?;
        let doc = persist::serialize(&self.store, &self.view, self.viewport);
        self.document = DocumentState::Saved { filename };
        Ok(doc)
    }

    /// Replace the entire in-memory state with a loaded document.
    pub fn load(&mut self, doc: ConfigDocument, filename: impl Into<String>) {
        let (store, view, viewport) = persist::deserialize(doc);
        self.store = store;
        self.view = view;
        self.viewport = viewport;
        self.document = DocumentState::Saved {
            filename: filename.into(),
        };
        self.refresh_derived();
    }

    // ------------------------------------------------------------------

    /// Mark the document dirty and recompute all derived attributes.
    fn touch(&mut self) {
        self.document = std::mem::take(&mut self.document).touched();
        self.refresh_derived();
    }

    /// Re-run the visibility resolver and the selection highlighter.
    /// Both passes skip writes when nothing changed.
    fn refresh_derived(&mut self) {
        visibility::apply(&mut self.store, &self.view);
        highlight::apply_styles(
            &mut self.styles,
            self.store.edges(),
            self.view.selected.as_deref(),
            self.view.theme,
        );
    }
}
