use sqldag::graph::{Edge, GraphStore, Layer, Node, Position};
use sqldag::view::{visibility, ViewState};

fn store() -> GraphStore {
    let mut store = GraphStore::new();
    store.replace_all(
        vec![
            Node::asset("raw.orders", "orders", Layer::Raw),
            Node::asset("curated.orders_clean", "orders_clean", Layer::Curated),
            Node::asset("mart.revenue", "revenue", Layer::Curated),
            Node::note("remember to backfill", Position::default()),
        ],
        vec![
            Edge::new("raw.orders", "curated.orders_clean"),
            Edge::new("curated.orders_clean", "mart.revenue"),
        ],
    );
    store
}

#[test]
fn test_layer_filter_hides_assets() {
    let mut store = store();
    let view = ViewState::default().with_layer(Layer::Curated, false);

    visibility::apply(&mut store, &view);

    assert!(!store.node("raw.orders").unwrap().hidden);
    assert!(store.node("curated.orders_clean").unwrap().hidden);
    assert!(store.node("mart.revenue").unwrap().hidden);
}

#[test]
fn test_layer_filters_do_not_affect_annotations() {
    let mut store = store();
    let note_id = store.nodes()[3].id.clone();
    let mut view = ViewState::default();
    for layer in Layer::ALL {
        view = view.with_layer(layer, false);
    }

    visibility::apply(&mut store, &view);

    assert!(!store.node(&note_id).unwrap().hidden);
    assert!(store.node("raw.orders").unwrap().hidden);
}

#[test]
fn test_manual_hide_applies_to_any_kind() {
    let mut store = store();
    let note_id = store.nodes()[3].id.clone();
    let view = ViewState::default().hide("raw.orders").hide(note_id.clone());

    visibility::apply(&mut store, &view);

    assert!(store.node("raw.orders").unwrap().hidden);
    assert!(store.node(&note_id).unwrap().hidden);
}

#[test]
fn test_layer_filter_wins_regardless_of_manual_state() {
    // A node stays hidden by its layer filter even when it was never
    // manually hidden, and un-hiding manually does not override a filter.
    let mut store = store();
    let view = ViewState::default()
        .with_layer(Layer::Curated, false)
        .show("curated.orders_clean");

    visibility::apply(&mut store, &view);
    assert!(store.node("curated.orders_clean").unwrap().hidden);
}

#[test]
fn test_edge_hidden_iff_either_endpoint_hidden() {
    let mut store = store();
    let view = ViewState::default().hide("curated.orders_clean");

    visibility::apply(&mut store, &view);

    for edge in store.edges() {
        assert!(edge.hidden, "edge {} should be hidden", edge.id);
    }

    let view = ViewState::default();
    visibility::apply(&mut store, &view);
    for edge in store.edges() {
        assert!(!edge.hidden);
    }
}

#[test]
fn test_apply_is_idempotent() {
    let mut store = store();
    let view = ViewState::default()
        .with_layer(Layer::Raw, false)
        .hide("mart.revenue");

    let first = visibility::apply(&mut store, &view);
    assert!(first > 0);

    let snapshot: Vec<bool> = store.nodes().iter().map(|n| n.hidden).collect();
    let second = visibility::apply(&mut store, &view);
    assert_eq!(second, 0);
    let after: Vec<bool> = store.nodes().iter().map(|n| n.hidden).collect();
    assert_eq!(snapshot, after);
}

#[test]
fn test_unhide_restores_visibility() {
    let mut store = store();
    visibility::apply(&mut store, &ViewState::default().hide("raw.orders"));
    assert!(store.node("raw.orders").unwrap().hidden);

    visibility::apply(&mut store, &ViewState::default());
    assert!(!store.node("raw.orders").unwrap().hidden);
    assert!(store.edges().iter().all(|e| !e.hidden));
}
