use sqldag::graph::{ancestor_count, collect_ancestors, Edge};
use std::collections::BTreeSet;

fn edges(pairs: &[(&str, &str)]) -> Vec<Edge> {
    pairs.iter().map(|(s, t)| Edge::new(*s, *t)).collect()
}

fn set(ids: &[&str]) -> BTreeSet<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_ancestors_include_start() {
    let edges = edges(&[("a", "b"), ("b", "c")]);
    assert_eq!(collect_ancestors("c", &edges), set(&["a", "b", "c"]));
    assert_eq!(collect_ancestors("b", &edges), set(&["a", "b"]));
    assert_eq!(collect_ancestors("a", &edges), set(&["a"]));
}

#[test]
fn test_diamond_counts_shared_ancestor_once() {
    // a feeds b and c, both feed d.
    let edges = edges(&[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")]);
    assert_eq!(collect_ancestors("d", &edges), set(&["a", "b", "c", "d"]));
    assert_eq!(ancestor_count("d", &edges), 3);
}

#[test]
fn test_only_upstream_direction_is_followed() {
    let edges = edges(&[("a", "b"), ("b", "c"), ("c", "d")]);
    let ancestors = collect_ancestors("b", &edges);
    assert!(!ancestors.contains("c"));
    assert!(!ancestors.contains("d"));
}

#[test]
fn test_cycle_terminates() {
    let edges = edges(&[("a", "b"), ("b", "c"), ("c", "a")]);
    assert_eq!(collect_ancestors("a", &edges), set(&["a", "b", "c"]));
}

#[test]
fn test_self_loop_terminates() {
    let edges = edges(&[("a", "a")]);
    assert_eq!(collect_ancestors("a", &edges), set(&["a"]));
    assert_eq!(ancestor_count("a", &edges), 0);
}

#[test]
fn test_unknown_node_yields_only_itself() {
    let edges = edges(&[("a", "b")]);
    assert_eq!(collect_ancestors("ghost", &edges), set(&["ghost"]));
}
