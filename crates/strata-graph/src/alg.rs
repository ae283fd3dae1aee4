//! Traversal helpers over [`Graph`].

use crate::Graph;
use std::collections::VecDeque;

/// A directed cycle was found; `node` lies on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleError {
    pub node: String,
}

impl std::fmt::Display for CycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "graph has a cycle through {}", self.node)
    }
}

impl std::error::Error for CycleError {}

/// Weakly connected components, each listed in discovery order.
pub fn components<N, E>(g: &Graph<N, E>) -> Vec<Vec<String>> {
    let mut seen = vec![false; g.node_bound()];
    let mut out: Vec<Vec<String>> = Vec::new();

    for start in g.nodes() {
        let Some(start_ix) = g.node_ix(start) else {
            continue;
        };
        if seen[start_ix] {
            continue;
        }
        seen[start_ix] = true;
        let mut comp: Vec<String> = Vec::new();
        let mut queue: VecDeque<&str> = VecDeque::from([start]);
        while let Some(v) = queue.pop_front() {
            comp.push(v.to_string());
            for n in g.successors(v).into_iter().chain(g.predecessors(v)) {
                if let Some(ix) = g.node_ix(n) {
                    if !seen[ix] {
                        seen[ix] = true;
                        queue.push_back(n);
                    }
                }
            }
        }
        out.push(comp);
    }
    out
}

/// Kahn topological sort. Ties are broken by insertion order.
pub fn topsort<N, E>(g: &Graph<N, E>) -> Result<Vec<String>, CycleError> {
    let mut indegree = vec![0usize; g.node_bound()];
    g.for_each_edge_ix(|_, w, _, _| indegree[w] += 1);

    let mut queue: VecDeque<&str> = g
        .nodes()
        .filter(|v| g.node_ix(v).is_some_and(|ix| indegree[ix] == 0))
        .collect();
    let mut out: Vec<String> = Vec::with_capacity(g.node_count());
    while let Some(v) = queue.pop_front() {
        out.push(v.to_string());
        for w in g.successors(v) {
            let Some(ix) = g.node_ix(w) else {
                continue;
            };
            indegree[ix] -= 1;
            if indegree[ix] == 0 {
                queue.push_back(w);
            }
        }
    }

    if out.len() == g.node_count() {
        return Ok(out);
    }
    let node = g
        .nodes()
        .find(|v| g.node_ix(v).is_some_and(|ix| indegree[ix] > 0))
        .unwrap_or_default()
        .to_string();
    Err(CycleError { node })
}

pub fn is_acyclic<N, E>(g: &Graph<N, E>) -> bool {
    topsort(g).is_ok()
}

/// Depth-first preorder from each root in turn, following out-edges in insertion order.
pub fn preorder<N, E>(g: &Graph<N, E>, roots: &[&str]) -> Vec<String> {
    let mut seen = vec![false; g.node_bound()];
    let mut out: Vec<String> = Vec::new();
    for &root in roots {
        let mut stack: Vec<&str> = vec![root];
        while let Some(v) = stack.pop() {
            let Some(ix) = g.node_ix(v) else {
                continue;
            };
            if seen[ix] {
                continue;
            }
            seen[ix] = true;
            out.push(v.to_string());
            for w in g.successors(v).into_iter().rev() {
                if g.node_ix(w).is_some_and(|wx| !seen[wx]) {
                    stack.push(w);
                }
            }
        }
    }
    out
}
