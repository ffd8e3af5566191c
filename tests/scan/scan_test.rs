use sqldag::dialect::Dialect;
use sqldag::graph::Layer;
use sqldag::scan::{list_sql_folders, scan_project, ScanError, ScanOptions};
use std::fs;
use std::path::Path;

fn write(root: &Path, rel: &str, sql: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, sql).unwrap();
}

fn pipeline_project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(
        root,
        "raw/orders.sql",
        "CREATE TABLE raw.orders (id INT, customer_id INT)",
    );
    write(
        root,
        "curated/orders_clean.sql",
        "CREATE VIEW curated.orders_clean AS SELECT * FROM raw.orders WHERE id IS NOT NULL",
    );
    write(
        root,
        "marts/revenue.sql",
        "CREATE TABLE mart.revenue AS \
         WITH recent AS (SELECT * FROM curated.orders_clean) \
         SELECT * FROM recent",
    );
    dir
}

fn options() -> ScanOptions {
    ScanOptions {
        dialect: Dialect::BigQuery,
        discovery: false,
        subfolders: None,
    }
}

#[test]
fn test_scan_builds_dependency_edges() {
    let project = pipeline_project();
    let (nodes, edges) = scan_project(project.path(), &options()).unwrap();

    assert_eq!(nodes.len(), 3);
    let ids: Vec<&str> = edges
        .iter()
        .map(|e| e.id.as_str())
        .collect();
    assert!(ids.contains(&"raw.orders-curated.orders_clean"));
    assert!(ids.contains(&"curated.orders_clean-mart.revenue"));
    assert_eq!(edges.len(), 2);
}

#[test]
fn test_layers_follow_folder_names() {
    let project = pipeline_project();
    let (nodes, _) = scan_project(project.path(), &options()).unwrap();

    let layer_of = |id: &str| nodes.iter().find(|n| n.id == id).unwrap().layer;
    assert_eq!(layer_of("raw.orders"), Layer::Raw);
    assert_eq!(layer_of("curated.orders_clean"), Layer::Curated);
    assert_eq!(layer_of("mart.revenue"), Layer::Curated);
}

#[test]
fn test_counts_are_precomputed() {
    let project = pipeline_project();
    let (nodes, _) = scan_project(project.path(), &options()).unwrap();

    let node = |id: &str| nodes.iter().find(|n| n.id == id).unwrap();
    assert_eq!(node("raw.orders").incoming_count, 0);
    assert_eq!(node("mart.revenue").incoming_count, 1);
    // Full upstream closure of mart.revenue is {raw.orders, curated.orders_clean}.
    assert_eq!(node("mart.revenue").nested_count, 2);
}

#[test]
fn test_unresolved_dependency_dropped_without_discovery() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "curated/summary.sql",
        "CREATE VIEW curated.summary AS SELECT * FROM warehouse.missing_table",
    );

    let (nodes, edges) = scan_project(dir.path(), &options()).unwrap();
    assert_eq!(nodes.len(), 1);
    assert!(edges.is_empty());
}

#[test]
fn test_discovery_mode_emits_ghost_nodes() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "curated/summary.sql",
        "CREATE VIEW curated.summary AS SELECT * FROM warehouse.missing_table",
    );

    let opts = ScanOptions {
        discovery: true,
        ..options()
    };
    let (nodes, edges) = scan_project(dir.path(), &opts).unwrap();

    assert_eq!(nodes.len(), 2);
    let ghost = nodes
        .iter()
        .find(|n| n.id == "warehouse.missing_table")
        .unwrap();
    assert_eq!(ghost.layer, Layer::External);
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].target, "curated.summary");
}

#[test]
fn test_fuzzy_lookup_matches_shorter_references() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "raw/orders.sql",
        "CREATE TABLE analytics.raw.orders (id INT)",
    );
    write(
        dir.path(),
        "curated/clean.sql",
        "CREATE VIEW curated.clean AS SELECT * FROM raw.orders",
    );

    let (_, edges) = scan_project(dir.path(), &options()).unwrap();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].source, "analytics.raw.orders");
}

#[test]
fn test_subfolder_scoping() {
    let project = pipeline_project();
    let opts = ScanOptions {
        subfolders: Some(vec!["raw".to_string(), "curated".to_string()]),
        ..options()
    };

    let (nodes, edges) = scan_project(project.path(), &opts).unwrap();
    assert_eq!(nodes.len(), 2);
    assert!(nodes.iter().all(|n| n.id != "mart.revenue"));
    assert_eq!(edges.len(), 1);
}

#[test]
fn test_hidden_directories_are_skipped() {
    let project = pipeline_project();
    write(
        project.path(),
        ".backup/old.sql",
        "CREATE TABLE old.stuff AS SELECT * FROM raw.orders",
    );

    let (nodes, _) = scan_project(project.path(), &options()).unwrap();
    assert!(nodes.iter().all(|n| n.id != "old.stuff"));
}

#[test]
fn test_broken_file_does_not_sink_the_scan() {
    let project = pipeline_project();
    write(project.path(), "raw/broken.sql", "this is not sql at all");

    let (nodes, edges) = scan_project(project.path(), &options()).unwrap();
    assert_eq!(nodes.len(), 3);
    assert_eq!(edges.len(), 2);
}

#[test]
fn test_missing_directory_is_an_error() {
    let err = scan_project(Path::new("/definitely/not/here"), &options()).unwrap_err();
    assert!(matches!(err, ScanError::NotADirectory(_)));
}

#[test]
fn test_list_sql_folders() {
    let project = pipeline_project();
    fs::create_dir_all(project.path().join("docs")).unwrap();
    write(project.path(), ".hidden/x.sql", "CREATE TABLE h.x (id INT)");

    let folders = list_sql_folders(project.path()).unwrap();
    assert_eq!(folders, vec!["curated", "marts", "raw"]);
}
