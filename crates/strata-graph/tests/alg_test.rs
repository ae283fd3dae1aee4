use strata_graph::alg::{components, is_acyclic, preorder, topsort};
use strata_graph::{Graph, GraphOptions};

fn graph(edges: &[(&str, &str)]) -> Graph<(), ()> {
    let mut g: Graph<(), ()> = Graph::new(GraphOptions::default());
    for (v, w) in edges {
        g.set_edge(*v, *w, ());
    }
    g
}

#[test]
fn components_are_weak_and_ordered() {
    let mut g = graph(&[("a", "b"), ("c", "b"), ("d", "e")]);
    g.set_node("f", ());

    assert_eq!(
        components(&g),
        vec![
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec!["d".to_string(), "e".to_string()],
            vec!["f".to_string()],
        ]
    );
}

#[test]
fn topsort_orders_a_dag() {
    let g = graph(&[("b", "c"), ("a", "b"), ("a", "c")]);
    let order = topsort(&g).unwrap();
    assert_eq!(order, vec!["a", "b", "c"]);
}

#[test]
fn topsort_reports_a_cycle() {
    let g = graph(&[("a", "b"), ("b", "c"), ("c", "b")]);
    let err = topsort(&g).unwrap_err();
    assert!(err.node == "b" || err.node == "c");
    assert!(!is_acyclic(&g));
}

#[test]
fn self_loops_make_a_graph_cyclic() {
    let g = graph(&[("a", "a")]);
    assert!(!is_acyclic(&g));
}

#[test]
fn preorder_visits_depth_first_in_edge_order() {
    let g = graph(&[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d"), ("e", "c")]);
    assert_eq!(preorder(&g, &["a", "e"]), vec!["a", "b", "d", "c", "e"]);
}
