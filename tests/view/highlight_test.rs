use sqldag::graph::Edge;
use sqldag::view::highlight::{apply_styles, style_edges, Emphasis};
use sqldag::view::Theme;

fn chain() -> Vec<Edge> {
    vec![
        Edge::new("raw.orders", "curated.orders_clean"),
        Edge::new("curated.orders_clean", "mart.revenue"),
    ]
}

#[test]
fn test_no_selection_is_uniform_ambient() {
    let styles = style_edges(&chain(), None, Theme::Dark);
    assert!(styles.iter().all(|s| s.emphasis == Emphasis::Ambient));
    assert!(styles.iter().all(|s| !s.animated));
}

#[test]
fn test_selection_splits_incoming_and_outgoing() {
    // Selecting the middle node of A -> B -> C.
    let styles = style_edges(&chain(), Some("curated.orders_clean"), Theme::Dark);

    assert_eq!(styles[0].emphasis, Emphasis::Incoming);
    assert_eq!(styles[1].emphasis, Emphasis::Outgoing);
    assert!(styles[0].animated);
    assert!(styles[1].animated);
    assert!(styles[0].z_index > 0);
    assert_ne!(styles[0].stroke, styles[1].stroke);
}

#[test]
fn test_unrelated_edges_are_dimmed() {
    let mut edges = chain();
    edges.push(Edge::new("raw.customers", "curated.customers_clean"));

    let styles = style_edges(&edges, Some("curated.orders_clean"), Theme::Dark);
    assert_eq!(styles[2].emphasis, Emphasis::Dimmed);
    assert!(styles[2].opacity < 0.5);
    assert!(styles[2].z_index < 0);
}

#[test]
fn test_no_edge_is_both_incoming_and_outgoing() {
    // A self loop on the selected node must resolve to exactly one class.
    let edges = vec![Edge::new("n", "n")];
    let styles = style_edges(&edges, Some("n"), Theme::Dark);
    assert_eq!(styles.len(), 1);
    assert_eq!(styles[0].emphasis, Emphasis::Incoming);
}

#[test]
fn test_theme_changes_colors_not_classes() {
    let dark = style_edges(&chain(), Some("mart.revenue"), Theme::Dark);
    let light = style_edges(&chain(), Some("mart.revenue"), Theme::Light);

    for (d, l) in dark.iter().zip(&light) {
        assert_eq!(d.emphasis, l.emphasis);
        assert_ne!(d.stroke, l.stroke);
    }
}

#[test]
fn test_apply_styles_reports_zero_when_unchanged() {
    let edges = chain();
    let mut styles = Vec::new();

    let first = apply_styles(&mut styles, &edges, Some("mart.revenue"), Theme::Dark);
    assert_eq!(first, 2);

    let second = apply_styles(&mut styles, &edges, Some("mart.revenue"), Theme::Dark);
    assert_eq!(second, 0);

    // Clearing selection changes every edge back to ambient.
    let third = apply_styles(&mut styles, &edges, None, Theme::Dark);
    assert_eq!(third, 2);
}
