use strata_graph::{EdgeKey, Graph, GraphOptions};

#[test]
fn nodes_and_edges_keep_insertion_order() {
    let mut g: Graph<(), i32> = Graph::new(GraphOptions::default());
    g.set_edge("c", "a", 1);
    g.set_edge("b", "c", 2);
    g.set_edge("c", "b", 3);

    assert_eq!(g.node_ids(), vec!["c", "a", "b"]);
    let keys: Vec<String> = g.edges().map(|k| k.to_string()).collect();
    assert_eq!(keys, vec!["c -> a", "b -> c", "c -> b"]);
    assert_eq!(g.successors("c"), vec!["a", "b"]);
    assert_eq!(g.predecessors("c"), vec!["b"]);
    assert_eq!(g.neighbors("c"), vec!["a", "b"]);
}

#[test]
fn set_node_replaces_label_in_place() {
    let mut g: Graph<i32, ()> = Graph::new(GraphOptions::default());
    g.set_node("a", 1);
    g.set_node("b", 2);
    g.set_node("a", 3);

    assert_eq!(g.node("a"), Some(&3));
    assert_eq!(g.node_ids(), vec!["a", "b"]);
    assert_eq!(g.node_count(), 2);
}

#[test]
fn simple_graphs_ignore_edge_names() {
    let mut g: Graph<(), i32> = Graph::new(GraphOptions::default());
    g.set_edge_named("a", "b", Some("x"), 1);
    g.set_edge_named("a", "b", Some("y"), 2);

    assert_eq!(g.edge_count(), 1);
    assert_eq!(g.edge("a", "b", None), Some(&2));
}

#[test]
fn multigraph_edges_are_told_apart_by_name() {
    let mut g: Graph<(), i32> = Graph::new(GraphOptions::multigraph());
    g.set_edge_named("a", "b", Some("x"), 1);
    g.set_edge_named("a", "b", Some("y"), 2);
    g.set_edge("a", "b", 3);

    assert_eq!(g.edge_count(), 3);
    assert_eq!(g.edge("a", "b", Some("x")), Some(&1));
    assert_eq!(g.edge("a", "b", Some("y")), Some(&2));
    assert_eq!(g.edge("a", "b", None), Some(&3));
    assert_eq!(g.out_edges("a").len(), 3);
    assert_eq!(g.in_degree("b"), 3);
}

#[test]
fn insert_edge_requires_both_endpoints() {
    let mut g: Graph<(), ()> = Graph::new(GraphOptions::default());
    g.set_node("a", ());

    assert!(!g.insert_edge(EdgeKey::new("a", "b", None::<String>), ()));
    assert_eq!(g.edge_count(), 0);
    g.set_node("b", ());
    assert!(g.insert_edge(EdgeKey::new("a", "b", None::<String>), ()));
    assert!(g.has_edge("a", "b", None));
}

#[test]
fn remove_node_drops_incident_edges_and_keeps_indices() {
    let mut g: Graph<(), ()> = Graph::new(GraphOptions::default());
    g.set_path(&["a", "b", "c"]);
    g.set_edge("a", "c", ());
    let c_ix = g.node_ix("c");

    assert!(g.remove_node("b").is_some());

    assert_eq!(g.node_ids(), vec!["a", "c"]);
    assert_eq!(g.edge_count(), 1);
    assert!(g.has_edge("a", "c", None));
    assert_eq!(g.node_ix("c"), c_ix);
    assert_eq!(g.node_bound(), 3);
    assert!(g.in_edges("c").iter().all(|k| k.v == "a"));
}

#[test]
fn remove_edge_returns_label() {
    let mut g: Graph<(), &'static str> = Graph::new(GraphOptions::default());
    g.set_edge("a", "b", "ab");
    g.set_edge("b", "a", "ba");

    let key = EdgeKey::new("a", "b", None::<String>);
    assert_eq!(g.remove_edge(&key), Some("ab"));
    assert_eq!(g.remove_edge(&key), None);
    assert!(g.out_edges("a").is_empty());
    assert_eq!(g.edge("b", "a", None), Some(&"ba"));
}

#[test]
fn self_loops_are_both_in_and_out_edges() {
    let mut g: Graph<(), ()> = Graph::new(GraphOptions::default());
    g.set_edge("a", "a", ());

    assert_eq!(g.out_edges("a").len(), 1);
    assert_eq!(g.in_edges("a").len(), 1);
    assert!(g.edges().all(EdgeKey::is_self_loop));
    assert!(g.sources().is_empty());
}

#[test]
fn sources_and_sinks_follow_insertion_order() {
    let mut g: Graph<(), ()> = Graph::new(GraphOptions::default());
    g.set_edge("x", "m", ());
    g.set_edge("y", "m", ());
    g.set_edge("m", "z", ());

    assert_eq!(g.sources(), vec!["x", "y"]);
    assert_eq!(g.sinks(), vec!["z"]);
}
