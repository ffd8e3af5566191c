//! Selection-driven edge highlighting.
//!
//! With no selection every edge renders in a neutral ambient style. With a
//! selected node, its incoming dependency edges and outgoing impact edges
//! get distinct accent hues, wider strokes, animation, and a raised draw
//! order; unrelated edges are dimmed and pushed behind. The hue semantics
//! (incoming vs outgoing) are fixed; the concrete colors follow the theme.

use serde::Serialize;

use super::Theme;
use crate::graph::types::Edge;

/// Semantic emphasis class of a styled edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Emphasis {
    /// No selection active: uniform reduced-emphasis rendering.
    Ambient,
    /// Edge feeding the selected node (edge.target == selected).
    Incoming,
    /// Edge consuming the selected node (edge.source == selected).
    Outgoing,
    /// Selection active but this edge touches neither endpoint.
    Dimmed,
}

/// Render attributes derived for one edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStyle {
    pub edge_id: String,
    pub emphasis: Emphasis,
    pub stroke: &'static str,
    pub width: f32,
    pub opacity: f32,
    pub animated: bool,
    pub z_index: i32,
}

const AMBIENT_DARK: &str = "#52525b";
const AMBIENT_LIGHT: &str = "#b1b1b7";
const INCOMING_DARK: &str = "#38bdf8";
const INCOMING_LIGHT: &str = "#0284c7";
const OUTGOING_DARK: &str = "#fb923c";
const OUTGOING_LIGHT: &str = "#ea580c";

fn ambient(theme: Theme) -> &'static str {
    match theme {
        Theme::Dark => AMBIENT_DARK,
        Theme::Light => AMBIENT_LIGHT,
    }
}

fn incoming(theme: Theme) -> &'static str {
    match theme {
        Theme::Dark => INCOMING_DARK,
        Theme::Light => INCOMING_LIGHT,
    }
}

fn outgoing(theme: Theme) -> &'static str {
    match theme {
        Theme::Dark => OUTGOING_DARK,
        Theme::Light => OUTGOING_LIGHT,
    }
}

/// Derive render attributes for every edge.
///
/// Priority order per edge: incoming match, then outgoing match, then
/// dimmed; a self-referencing edge on the selected node therefore styles as
/// incoming only, never both. Pure: identical inputs produce an equal
/// vector, so callers can compare against the previous result and skip
/// unchanged edges.
pub fn style_edges(edges: &[Edge], selected: Option<&str>, theme: Theme) -> Vec<EdgeStyle> {
    edges
        .iter()
        .map(|edge| {
            let emphasis = match selected {
                None => Emphasis::Ambient,
                Some(id) if edge.target == id => Emphasis::Incoming,
                Some(id) if edge.source == id => Emphasis::Outgoing,
                Some(_) => Emphasis::Dimmed,
            };
            match emphasis {
                Emphasis::Ambient => EdgeStyle {
                    edge_id: edge.id.clone(),
                    emphasis,
                    stroke: ambient(theme),
                    width: 1.5,
                    opacity: 0.8,
                    animated: false,
                    z_index: 0,
                },
                Emphasis::Incoming => EdgeStyle {
                    edge_id: edge.id.clone(),
                    emphasis,
                    stroke: incoming(theme),
                    width: 2.5,
                    opacity: 1.0,
                    animated: true,
                    z_index: 10,
                },
                Emphasis::Outgoing => EdgeStyle {
                    edge_id: edge.id.clone(),
                    emphasis,
                    stroke: outgoing(theme),
                    width: 2.5,
                    opacity: 1.0,
                    animated: true,
                    z_index: 10,
                },
                Emphasis::Dimmed => EdgeStyle {
                    edge_id: edge.id.clone(),
                    emphasis,
                    stroke: ambient(theme),
                    width: 1.0,
                    opacity: 0.15,
                    animated: false,
                    z_index: -1,
                },
            }
        })
        .collect()
}

/// Replace only the entries of `styles` whose computed style changed.
///
/// Returns the number of replaced entries; 0 when selection and theme are
/// unchanged, which lets the session avoid touching the render layer at all.
pub fn apply_styles(
    styles: &mut Vec<EdgeStyle>,
    edges: &[Edge],
    selected: Option<&str>,
    theme: Theme,
) -> usize {
    let next = style_edges(edges, selected, theme);
    if styles.len() != next.len() {
        let changed = next.len().max(styles.len());
        *styles = next;
        return changed;
    }

    let mut changed = 0;
    for (slot, fresh) in styles.iter_mut().zip(next) {
        if *slot != fresh {
            *slot = fresh;
            changed += 1;
        }
    }
    changed
}
