//! View state: every user-facing toggle in one explicit, immutable record.
//!
//! Theme, palette, dialect, filters, and the hidden set form a single
//! [`ViewState`] value passed to the resolvers; each toggle is a pure
//! transition producing a new record, which keeps the derived-visibility and
//! highlight passes trivially testable.

pub mod highlight;
pub mod visibility;

pub use highlight::{style_edges, EdgeStyle, Emphasis};
pub use visibility::node_hidden;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::dialect::Dialect;
use crate::graph::Layer;

/// Color scheme of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// Node rendering style: filled cards or outlined cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStyle {
    #[default]
    Full,
    Border,
}

impl NodeStyle {
    pub fn toggled(self) -> Self {
        match self {
            NodeStyle::Full => NodeStyle::Border,
            NodeStyle::Border => NodeStyle::Full,
        }
    }
}

/// Layer color palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    #[default]
    Standard,
    Vivid,
    Pastel,
}

impl Palette {
    /// Cycle standard -> vivid -> pastel -> standard.
    pub fn next(self) -> Self {
        match self {
            Palette::Standard => Palette::Vivid,
            Palette::Vivid => Palette::Pastel,
            Palette::Pastel => Palette::Standard,
        }
    }
}

/// Per-layer visibility filter set. All layers visible by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayerFilters {
    pub raw: bool,
    pub intermediate: bool,
    pub curated: bool,
    pub external: bool,
    pub cte: bool,
    pub other: bool,
}

impl Default for LayerFilters {
    fn default() -> Self {
        Self {
            raw: true,
            intermediate: true,
            curated: true,
            external: true,
            cte: true,
            other: true,
        }
    }
}

impl LayerFilters {
    pub fn is_visible(&self, layer: Layer) -> bool {
        match layer {
            Layer::Raw => self.raw,
            Layer::Intermediate => self.intermediate,
            Layer::Curated => self.curated,
            Layer::External => self.external,
            Layer::Cte => self.cte,
            Layer::Other => self.other,
        }
    }

    /// Flip one layer, returning the new filter set.
    pub fn toggled(mut self, layer: Layer) -> Self {
        let slot = match layer {
            Layer::Raw => &mut self.raw,
            Layer::Intermediate => &mut self.intermediate,
            Layer::Curated => &mut self.curated,
            Layer::External => &mut self.external,
            Layer::Cte => &mut self.cte,
            Layer::Other => &mut self.other,
        };
        *slot = !*slot;
        self
    }

    /// Set one layer explicitly, returning the new filter set.
    pub fn with(mut self, layer: Layer, visible: bool) -> Self {
        let slot = match layer {
            Layer::Raw => &mut self.raw,
            Layer::Intermediate => &mut self.intermediate,
            Layer::Curated => &mut self.curated,
            Layer::External => &mut self.external,
            Layer::Cte => &mut self.cte,
            Layer::Other => &mut self.other,
        };
        *slot = visible;
        self
    }
}

/// The full view state: toggles, filters, hidden set, selection, titles.
///
/// Mutations go through the `with_*` / `toggle_*` transitions so every
/// change produces a complete new record.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub theme: Theme,
    pub node_style: NodeStyle,
    pub palette: Palette,
    pub dialect: Dialect,
    pub discovery_mode: bool,
    pub show_counts: bool,
    pub filters: LayerFilters,

    /// Flat set of hidden node ids: manual hides and cascade hides are not
    /// distinguished once the traversal has run.
    pub hidden_nodes: BTreeSet<String>,

    /// Node whose edges are highlighted. At most one.
    pub selected: Option<String>,

    /// Node shown in the inspector panel; independent of `selected`.
    pub details: Option<String>,

    pub title: String,
    pub subtitle: String,

    /// Active project root path.
    pub path: String,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            node_style: NodeStyle::Full,
            palette: Palette::Standard,
            dialect: Dialect::BigQuery,
            discovery_mode: false,
            show_counts: true,
            filters: LayerFilters::default(),
            hidden_nodes: BTreeSet::new(),
            selected: None,
            details: None,
            title: "SQL Lineage".to_string(),
            subtitle: "Data Pipeline Visualizer".to_string(),
            path: String::new(),
        }
    }
}

impl ViewState {
    pub fn toggle_theme(mut self) -> Self {
        self.theme = self.theme.toggled();
        self
    }

    pub fn toggle_node_style(mut self) -> Self {
        self.node_style = self.node_style.toggled();
        self
    }

    pub fn cycle_palette(mut self) -> Self {
        self.palette = self.palette.next();
        self
    }

    pub fn toggle_counts(mut self) -> Self {
        self.show_counts = !self.show_counts;
        self
    }

    pub fn toggle_discovery(mut self) -> Self {
        self.discovery_mode = !self.discovery_mode;
        self
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn toggle_layer(mut self, layer: Layer) -> Self {
        self.filters = self.filters.toggled(layer);
        self
    }

    pub fn with_layer(mut self, layer: Layer, visible: bool) -> Self {
        self.filters = self.filters.with(layer, visible);
        self
    }

    pub fn hide(mut self, id: impl Into<String>) -> Self {
        self.hidden_nodes.insert(id.into());
        self
    }

    pub fn hide_all<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hidden_nodes.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn show(mut self, id: &str) -> Self {
        self.hidden_nodes.remove(id);
        self
    }

    pub fn show_everything(mut self) -> Self {
        self.hidden_nodes.clear();
        self
    }

    pub fn is_manually_hidden(&self, id: &str) -> bool {
        self.hidden_nodes.contains(id)
    }

    pub fn select(mut self, id: impl Into<String>) -> Self {
        self.selected = Some(id.into());
        self
    }

    pub fn clear_selection(mut self) -> Self {
        self.selected = None;
        self
    }

    pub fn open_details(mut self, id: impl Into<String>) -> Self {
        self.details = Some(id.into());
        self
    }

    pub fn close_details(mut self) -> Self {
        self.details = None;
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_titles(mut self, title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        self.title = title.into();
        self.subtitle = subtitle.into();
        self
    }
}
