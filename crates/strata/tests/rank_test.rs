use strata::Error;
use strata::rank::{RankProblem, network_simplex};

fn gansner_problem() -> RankProblem {
    // a b c d e f g h
    let mut p = RankProblem::new(8);
    for (t, h) in [
        (0, 1),
        (1, 2),
        (2, 3),
        (3, 7),
        (0, 4),
        (4, 6),
        (6, 7),
        (0, 5),
        (5, 6),
    ] {
        p.add_edge(t, h, 1.0, 1);
    }
    p
}

#[test]
fn network_simplex_respects_minlen() {
    let mut p = RankProblem::new(3);
    p.add_edge(0, 1, 1.0, 2).add_edge(1, 2, 1.0, 1);
    let s = network_simplex(&p, 100).unwrap();
    assert_eq!(s.ranks, vec![0, 2, 3]);
    assert!(p.is_feasible(&s.ranks));
}

#[test]
fn network_simplex_finds_the_optimum_of_the_gansner_graph() {
    let p = gansner_problem();
    let s = network_simplex(&p, 1_000).unwrap();
    assert!(p.is_feasible(&s.ranks));
    assert_eq!(p.cost(&s.ranks), 10.0);
    assert_eq!(s.ranks[0], 0);
    assert_eq!(s.ranks[7], 4);
}

#[test]
fn pivots_never_increase_cost() {
    let p = gansner_problem();
    let mut last = f64::INFINITY;
    for limit in 0..6 {
        let s = network_simplex(&p, limit).unwrap();
        assert!(p.is_feasible(&s.ranks), "limit {limit}");
        let cost = p.cost(&s.ranks);
        assert!(cost <= last, "cost rose from {last} to {cost} at limit {limit}");
        last = cost;
    }
}

#[test]
fn heavier_edges_are_kept_shorter() {
    // Node 1 is only held by its heavy edge to 2, so it sits right above 2.
    let mut p = RankProblem::new(3);
    p.add_edge(0, 2, 1.0, 3).add_edge(1, 2, 10.0, 1);
    let s = network_simplex(&p, 100).unwrap();
    assert_eq!(s.ranks, vec![0, 2, 3]);
}

#[test]
fn every_component_starts_at_rank_zero() {
    let mut p = RankProblem::new(5);
    p.add_edge(0, 1, 1.0, 3).add_edge(2, 3, 1.0, 1);
    let s = network_simplex(&p, 100).unwrap();
    assert_eq!(s.ranks, vec![0, 3, 0, 1, 0]);
}

#[test]
fn cyclic_constraints_are_unsolvable() {
    let mut p = RankProblem::new(2);
    p.add_edge(0, 1, 1.0, 1).add_edge(1, 0, 1.0, 1);
    assert!(matches!(
        network_simplex(&p, 100),
        Err(Error::Unsolvable { .. })
    ));
}

#[test]
fn out_of_range_edges_are_rejected() {
    let mut p = RankProblem::new(2);
    p.add_edge(0, 5, 1.0, 1);
    assert!(matches!(
        network_simplex(&p, 100),
        Err(Error::Unsolvable { stage: "rank", .. })
    ));
}

#[test]
fn add_node_extends_the_problem() {
    let mut p = RankProblem::new(2);
    let aux = p.add_node();
    assert_eq!(aux, 2);
    p.add_edge(aux, 0, 1.0, 0).add_edge(aux, 1, 1.0, 0);
    let s = network_simplex(&p, 100).unwrap();
    assert_eq!(s.ranks.len(), 3);
    assert!(p.is_feasible(&s.ranks));
}
