use sqldag::dialect::Dialect;
use sqldag::graph::{Edge, GraphStore, Layer, Node, NodeDetails, Position};
use sqldag::persist::{
    deserialize, list_documents, read_document, serialize, write_document, ConfigDocument,
    Viewport,
};
use sqldag::view::{NodeStyle, Palette, Theme, ViewState};

fn populated() -> (GraphStore, ViewState, Viewport) {
    let mut store = GraphStore::new();
    store.replace_all(
        vec![
            Node::asset("raw.orders", "orders", Layer::Raw)
                .at(10.0, 20.0)
                .with_details(NodeDetails {
                    source_type: Some("table".to_string()),
                    dataset: Some("raw".to_string()),
                    ..Default::default()
                }),
            Node::asset("curated.orders_clean", "orders_clean", Layer::Curated).at(300.0, 20.0),
            Node::asset("mart.revenue", "revenue", Layer::Curated).at(600.0, 20.0),
        ],
        vec![
            Edge::new("raw.orders", "curated.orders_clean"),
            Edge::new("curated.orders_clean", "mart.revenue"),
        ],
    );

    let view = ViewState::default()
        .toggle_theme()
        .cycle_palette()
        .with_dialect(Dialect::Snowflake)
        .with_layer(Layer::External, false)
        .hide("mart.revenue")
        .with_titles("Warehouse", "Orders pipeline")
        .with_path("/data/sql");

    let viewport = Viewport {
        x: -120.0,
        y: 35.5,
        zoom: 0.75,
    };

    (store, view, viewport)
}

#[test]
fn test_round_trip_preserves_data_and_metadata() {
    let (store, view, viewport) = populated();
    let doc = serialize(&store, &view, viewport);

    let (store2, view2, viewport2) = deserialize(doc);

    assert_eq!(store.nodes(), store2.nodes());
    assert_eq!(store.edges(), store2.edges());
    assert_eq!(viewport, viewport2);

    assert_eq!(view2.theme, Theme::Light);
    assert_eq!(view2.palette, Palette::Vivid);
    assert_eq!(view2.node_style, NodeStyle::Full);
    assert_eq!(view2.dialect, Dialect::Snowflake);
    assert!(!view2.filters.external);
    assert!(view2.filters.raw);
    assert!(view2.is_manually_hidden("mart.revenue"));
    assert_eq!(view2.title, "Warehouse");
    assert_eq!(view2.subtitle, "Orders pipeline");
    assert_eq!(view2.path, "/data/sql");
}

#[test]
fn test_transient_state_is_not_serialized() {
    let (store, view, viewport) = populated();
    let view = view.select("raw.orders").open_details("raw.orders");

    let doc = serialize(&store, &view, viewport);
    let (_, view2, _) = deserialize(doc);

    assert!(view2.selected.is_none());
    assert!(view2.details.is_none());
}

#[test]
fn test_json_round_trip_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let (store, view, viewport) = populated();
    let doc = serialize(&store, &view, viewport);

    write_document(dir.path(), "my_view.json", &doc).unwrap();
    let loaded = read_document(dir.path(), "my_view.json").unwrap();
    assert_eq!(doc, loaded);

    // No temporary file left behind.
    assert_eq!(list_documents(dir.path()).unwrap(), vec!["my_view.json"]);
}

#[test]
fn test_missing_document_loads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let doc = read_document(dir.path(), "absent.json").unwrap();
    assert_eq!(doc, ConfigDocument::empty());
}

#[test]
fn test_dangling_edges_dropped_on_load() {
    let (store, view, viewport) = populated();
    let mut doc = serialize(&store, &view, viewport);
    doc.edges.push(Edge::new("ghost.a", "ghost.b"));

    let (store2, _, _) = deserialize(doc);
    assert_eq!(store2.edges().len(), 2);
}

#[test]
fn test_load_tolerates_foreign_document_fields() {
    // Documents written by other versions may carry extra detail fields;
    // they must survive a round trip via the extension map.
    let json = r#"{
        "nodes": [{
            "id": "raw.orders",
            "label": "orders",
            "layer": "raw",
            "details": {"type": "table", "rowCount": 42}
        }],
        "edges": [],
        "metadata": {"theme": "light"}
    }"#;

    let doc: ConfigDocument = serde_json::from_str(json).unwrap();
    let details = doc.nodes[0].details.clone().unwrap();
    assert_eq!(details.source_type.as_deref(), Some("table"));
    assert_eq!(details.extra["rowCount"], 42);

    let out = serde_json::to_string(&doc).unwrap();
    assert!(out.contains("rowCount"));
}

#[test]
fn test_positions_survive_round_trip() {
    let (store, view, viewport) = populated();
    let doc = serialize(&store, &view, viewport);
    let (store2, _, _) = deserialize(doc);
    assert_eq!(
        store2.node("curated.orders_clean").unwrap().position,
        Position::new(300.0, 20.0)
    );
}
