use strata::acyclic;
use strata::context::{LayoutEdge, LayoutGraph, LayoutNode};
use strata::graphlib::{EdgeKey, GraphOptions, alg};

fn graph_with_path(ids: &[&str]) -> LayoutGraph {
    let mut g = LayoutGraph::new(GraphOptions::multigraph());
    for id in ids {
        g.set_node(*id, LayoutNode::default());
    }
    for pair in ids.windows(2) {
        g.insert_edge(
            EdgeKey::new(pair[0], pair[1], Some(format!("{}{}", pair[0], pair[1]))),
            LayoutEdge::default(),
        );
    }
    g
}

#[test]
fn acyclic_graphs_are_left_alone() {
    let mut g = graph_with_path(&["a", "b", "c"]);
    assert_eq!(acyclic::run(&mut g).unwrap(), 0);
    assert!(g.has_edge("a", "b", Some("ab")));
    assert!(g.has_edge("b", "c", Some("bc")));
}

#[test]
fn back_edges_are_flipped_and_marked() {
    let mut g = graph_with_path(&["a", "b", "c", "d", "a"]);
    assert_eq!(acyclic::run(&mut g).unwrap(), 1);
    assert!(alg::is_acyclic(&g));
    let flipped = g.edge("a", "d", Some("da")).unwrap();
    assert!(flipped.reversed);
    assert!(!g.edge("a", "b", Some("ab")).unwrap().reversed);
}

#[test]
fn reversing_twice_restores_the_edge() {
    let mut g = graph_with_path(&["a", "b"]);
    let key = EdgeKey::new("a", "b", Some("ab"));
    let flipped = acyclic::reverse_edge(&mut g, &key).unwrap();
    assert_eq!((flipped.v.as_str(), flipped.w.as_str()), ("b", "a"));
    let back = acyclic::reverse_edge(&mut g, &flipped).unwrap();
    assert_eq!(back, key);
    assert!(!g.edge_by_key(&back).unwrap().reversed);
}

#[test]
fn two_cycles_between_the_same_nodes_keep_both_edges() {
    let mut g = graph_with_path(&["a", "b"]);
    g.insert_edge(EdgeKey::new("b", "a", Some("ba")), LayoutEdge::default());
    acyclic::run(&mut g).unwrap();
    assert_eq!(g.edge_count(), 2);
    assert!(g.has_edge("a", "b", Some("ab")));
    assert!(g.has_edge("a", "b", Some("ba")));
}
