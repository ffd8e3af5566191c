use sqldag::graph::{Edge, GraphStore, Layer, Node, Position};
use sqldag::layout::{carry_positions, layout, merge_positions, Direction};

fn nodes(ids: &[&str]) -> Vec<Node> {
    ids.iter()
        .map(|id| Node::asset(*id, *id, Layer::Other))
        .collect()
}

#[test]
fn test_dependencies_precede_consumers() {
    let nodes = nodes(&["a", "b", "c"]);
    let edges = vec![Edge::new("a", "b"), Edge::new("b", "c")];

    let positions = layout(&nodes, &edges, Direction::LeftRight);
    assert!(positions["a"].x < positions["b"].x);
    assert!(positions["b"].x < positions["c"].x);

    let positions = layout(&nodes, &edges, Direction::TopBottom);
    assert!(positions["a"].y < positions["b"].y);
    assert!(positions["b"].y < positions["c"].y);
}

#[test]
fn test_longest_path_sets_rank() {
    // a -> b -> d and a -> d: d must sit after b, not beside it.
    let nodes = nodes(&["a", "b", "d"]);
    let edges = vec![Edge::new("a", "b"), Edge::new("b", "d"), Edge::new("a", "d")];

    let positions = layout(&nodes, &edges, Direction::LeftRight);
    assert!(positions["b"].x < positions["d"].x);
}

#[test]
fn test_siblings_do_not_overlap() {
    let nodes = nodes(&["root", "x", "y", "z"]);
    let edges = vec![
        Edge::new("root", "x"),
        Edge::new("root", "y"),
        Edge::new("root", "z"),
    ];

    let positions = layout(&nodes, &edges, Direction::LeftRight);
    let mut ys: Vec<i64> = ["x", "y", "z"].iter().map(|id| positions[*id].y as i64).collect();
    ys.sort();
    ys.dedup();
    assert_eq!(ys.len(), 3);
}

#[test]
fn test_cyclic_graph_still_positions_every_node() {
    let nodes = nodes(&["a", "b", "c"]);
    let edges = vec![Edge::new("a", "b"), Edge::new("b", "c"), Edge::new("c", "a")];

    let positions = layout(&nodes, &edges, Direction::LeftRight);
    assert_eq!(positions.len(), 3);
}

#[test]
fn test_layout_is_deterministic() {
    let nodes = nodes(&["a", "b", "c", "d"]);
    let edges = vec![Edge::new("a", "b"), Edge::new("a", "c"), Edge::new("c", "d")];

    let first = layout(&nodes, &edges, Direction::LeftRight);
    let second = layout(&nodes, &edges, Direction::LeftRight);
    assert_eq!(first, second);
}

#[test]
fn test_carry_preserves_unchanged_node_set() {
    // Refresh with an identical node set must not move anything.
    let mut store = GraphStore::new();
    store.replace_all(
        vec![
            Node::asset("a", "a", Layer::Raw).at(100.0, 50.0),
            Node::asset("b", "b", Layer::Curated).at(400.0, 50.0),
        ],
        vec![Edge::new("a", "b")],
    );

    let mut incoming = vec![
        Node::asset("a", "a", Layer::Raw),
        Node::asset("b", "b", Layer::Curated),
    ];
    carry_positions(&store, &mut incoming);

    assert_eq!(incoming[0].position, Position::new(100.0, 50.0));
    assert_eq!(incoming[1].position, Position::new(400.0, 50.0));
}

#[test]
fn test_carry_leaves_new_nodes_at_payload_position() {
    let mut store = GraphStore::new();
    store.replace_all(vec![Node::asset("a", "a", Layer::Raw).at(5.0, 5.0)], vec![]);

    let mut incoming = vec![Node::asset("brand.new", "new", Layer::Other)];
    carry_positions(&store, &mut incoming);
    assert_eq!(incoming[0].position, Position::default());
}

#[test]
fn test_merge_only_touches_listed_ids() {
    let mut store = GraphStore::new();
    store.replace_all(
        vec![
            Node::asset("a", "a", Layer::Raw).at(1.0, 1.0),
            Node::asset("b", "b", Layer::Raw).at(2.0, 2.0),
        ],
        vec![],
    );

    let mut positions = std::collections::HashMap::new();
    positions.insert("a".to_string(), Position::new(9.0, 9.0));
    merge_positions(&mut store, &positions);

    assert_eq!(store.node("a").unwrap().position, Position::new(9.0, 9.0));
    assert_eq!(store.node("b").unwrap().position, Position::new(2.0, 2.0));
}
