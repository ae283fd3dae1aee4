use strata::{
    Attrs, Cluster, CoordinateStrategy, DeterministicTextMeasurer, Error, Font, Graph,
    LayoutOptions, MAX_MINLEN, NodeAttrs, RankDir, ShapeKind, Splines, layout,
    layout_with_options, merge_defaults,
};

fn measurer() -> DeterministicTextMeasurer {
    DeterministicTextMeasurer::default()
}

#[test]
fn merge_defaults_prefers_the_element_then_the_template() {
    let element = NodeAttrs {
        label: Some("own".to_string()),
        ..Default::default()
    };
    let template = NodeAttrs {
        label: Some("template".to_string()),
        shape: Some(ShapeKind::Rect),
        ..Default::default()
    };
    let merged = merge_defaults(&element, &template, &NodeAttrs::builtin());
    assert_eq!(merged.label.as_deref(), Some("own"));
    assert_eq!(merged.shape, Some(ShapeKind::Rect));
    assert_eq!(merged.font, Some(Font::default()));
    assert_eq!(merged.fixed_size, Some(false));
    assert_eq!(merged.width, None);
}

#[test]
fn cluster_templates_reach_their_members() {
    let mut g = Graph::new();
    g.add_node("i");
    g.add_node("o");
    let mut c = Cluster::new("c").with_nodes(["i"]);
    c.node_defaults.shape = Some(ShapeKind::Rect);
    c.node_defaults.width = Some(100.0);
    g.add_cluster(c);
    let l = layout(&g, &measurer()).unwrap();
    assert!((l.node("i").unwrap().rect.width() - 100.0).abs() < 1e-9);
    assert!((l.node("o").unwrap().rect.width() - 54.0).abs() < 1e-9);
}

#[test]
fn an_empty_graph_is_rejected() {
    assert!(matches!(
        layout(&Graph::new(), &measurer()),
        Err(Error::EmptyGraph)
    ));
}

#[test]
fn duplicate_ids_are_rejected() {
    let mut g = Graph::new();
    g.add_node("a");
    g.add_node("a");
    assert!(matches!(g.validate(), Err(Error::DuplicateNode { node_id }) if node_id == "a"));

    let mut g = Graph::new();
    g.add_node("a");
    g.add_edge("e", "a", "a");
    g.add_edge("e", "a", "a");
    assert!(matches!(g.validate(), Err(Error::DuplicateEdge { .. })));

    let mut g = Graph::new();
    g.add_node("a");
    g.add_cluster(Cluster::new("c").with_cluster(Cluster::new("c")));
    assert!(matches!(g.validate(), Err(Error::DuplicateCluster { .. })));
}

#[test]
fn dangling_references_are_rejected() {
    let mut g = Graph::new();
    g.add_node("a");
    g.add_edge("e", "a", "ghost");
    assert!(matches!(
        g.validate(),
        Err(Error::MissingEndpoint { node_id, .. }) if node_id == "ghost"
    ));

    let mut g = Graph::new();
    g.add_node("a");
    g.add_cluster(Cluster::new("c").with_nodes(["ghost"]));
    assert!(matches!(
        g.validate(),
        Err(Error::UnknownClusterMember { .. })
    ));
}

#[test]
fn sibling_clusters_cannot_share_a_node() {
    let mut g = Graph::new();
    g.add_node("a");
    g.add_cluster(Cluster::new("one").with_nodes(["a"]));
    g.add_cluster(Cluster::new("two").with_nodes(["a"]));
    assert!(matches!(
        g.validate(),
        Err(Error::ConflictingMembership { .. })
    ));

    // Listing a node in a cluster and in one nested inside it is fine.
    let mut g = Graph::new();
    g.add_node("a");
    g.add_cluster(
        Cluster::new("outer")
            .with_nodes(["a"])
            .with_cluster(Cluster::new("inner").with_nodes(["a"])),
    );
    assert!(g.validate().is_ok());
}

#[test]
fn negative_lengths_are_rejected() {
    let mut g = Graph::new();
    g.add_node("a");
    g.attrs.nodesep = -1.0;
    assert!(matches!(
        g.validate(),
        Err(Error::InvalidOption { name: "nodesep", .. })
    ));

    let mut g = Graph::new();
    g.add_node("a");
    g.add_node("b");
    g.add_edge("e", "a", "b").with_weight(f64::NAN);
    assert!(matches!(
        g.validate(),
        Err(Error::InvalidOption { name: "weight", .. })
    ));
}

#[test]
fn oversized_minimum_lengths_are_rejected() {
    let mut g = Graph::new();
    for id in ["a", "b", "c"] {
        g.add_node(id);
    }
    g.add_edge("ab", "a", "b").with_minlen(1_500_000_000);
    g.add_edge("bc", "b", "c").with_label("labeled");
    assert!(matches!(
        g.validate(),
        Err(Error::InvalidOption { name: "minlen", .. })
    ));
    assert!(matches!(
        layout(&g, &measurer()),
        Err(Error::InvalidOption { name: "minlen", .. })
    ));

    // Inherited from a template, the length is checked as well.
    let mut g = Graph::new();
    g.add_node("a");
    g.add_node("b");
    g.add_edge("ab", "a", "b");
    g.edge_defaults.minlen = Some(MAX_MINLEN + 1);
    assert!(matches!(
        layout(&g, &measurer()),
        Err(Error::InvalidOption { name: "minlen", .. })
    ));

    let mut g = Graph::new();
    g.add_node("a");
    g.add_node("b");
    g.add_edge("ab", "a", "b").with_minlen(MAX_MINLEN).with_label("far");
    let l = layout(&g, &measurer()).unwrap();
    let gap = l.node("b").unwrap().rank - l.node("a").unwrap().rank;
    assert!(gap >= 2 * MAX_MINLEN as i32);
}

#[test]
fn options_load_from_json() {
    let options =
        LayoutOptions::from_json(r#"{ "coordinate": "priority", "restarts": 5 }"#).unwrap();
    assert_eq!(options.coordinate, Some(CoordinateStrategy::Priority));
    assert_eq!(options.restarts, 5);
    assert_eq!(options.nslimit, LayoutOptions::default().nslimit);

    assert!(matches!(
        LayoutOptions::from_json("{ not json"),
        Err(Error::Config(_))
    ));
    assert!(matches!(
        LayoutOptions::from_json(r#"{ "restarts": 0 }"#),
        Err(Error::InvalidOption {
            name: "restarts",
            ..
        })
    ));
}

#[test]
fn invalid_options_fail_the_layout() {
    let mut g = Graph::new();
    g.add_node("a");
    let options = LayoutOptions {
        nslimit: 0,
        ..Default::default()
    };
    assert!(matches!(
        layout_with_options(&g, &measurer(), &options),
        Err(Error::InvalidOption { name: "nslimit", .. })
    ));
}

#[test]
fn graphs_load_from_json() {
    let g = Graph::from_json(
        r#"{
            "attrs": { "rankdir": "LR", "splines": "ortho", "nodesep": 30 },
            "nodes": [
                { "id": "a", "attrs": { "shape": "rect", "label": "Alpha" } },
                { "id": "b" }
            ],
            "edges": [
                { "id": "ab", "tail": "a", "head": "b", "tailPort": "e", "attrs": { "minlen": 2 } }
            ],
            "clusters": [ { "id": "c", "nodes": ["b"], "attrs": { "label": "C" } } ]
        }"#,
    )
    .unwrap();
    assert_eq!(g.attrs.rankdir, RankDir::LR);
    assert_eq!(g.attrs.splines, Splines::Ortho);
    assert_eq!(g.attrs.nodesep, 30.0);
    assert_eq!(g.attrs.ranksep, 36.0);
    assert_eq!(g.nodes[0].attrs.shape, Some(ShapeKind::Rect));
    assert_eq!(g.edges[0].tail_port, Some(strata::Port::E));
    assert_eq!(g.edges[0].attrs.minlen, Some(2));
    assert_eq!(g.clusters[0].nodes, vec!["b".to_string()]);

    assert!(matches!(Graph::from_json(r#""not a graph""#), Err(Error::Config(_))));
}

#[test]
fn degenerate_label_sizes_are_rejected() {
    let mut g = Graph::new();
    g.add_node("a").with_label("x");
    let broken = DeterministicTextMeasurer {
        char_width_factor: f64::INFINITY,
        line_height_factor: 1.2,
    };
    assert!(matches!(
        layout(&g, &broken),
        Err(Error::DegenerateSize { .. })
    ));
}
