//! Rank assignment.
//!
//! Ranks minimize `Σ weight × (rank(head) − rank(tail))` subject to
//! `rank(head) − rank(tail) ≥ minlen` on an acyclic constraint graph. The same solver balances
//! x coordinates, which is why it works on plain indices instead of a layout graph.

mod network_simplex;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankEdge {
    pub tail: usize,
    pub head: usize,
    pub weight: f64,
    pub minlen: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankProblem {
    pub node_count: usize,
    pub edges: Vec<RankEdge>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankSolution {
    pub ranks: Vec<i64>,
    pub pivots: usize,
}

impl RankProblem {
    pub fn new(node_count: usize) -> Self {
        Self {
            node_count,
            edges: Vec::new(),
        }
    }

    pub fn add_node(&mut self) -> usize {
        self.node_count += 1;
        self.node_count - 1
    }

    pub fn add_edge(&mut self, tail: usize, head: usize, weight: f64, minlen: i64) -> &mut Self {
        self.edges.push(RankEdge {
            tail,
            head,
            weight,
            minlen,
        });
        self
    }

    /// Objective value of a ranking.
    pub fn cost(&self, ranks: &[i64]) -> f64 {
        self.edges
            .iter()
            .map(|e| e.weight * (ranks[e.head] - ranks[e.tail]) as f64)
            .sum()
    }

    pub fn is_feasible(&self, ranks: &[i64]) -> bool {
        ranks.len() == self.node_count
            && self
                .edges
                .iter()
                .all(|e| ranks[e.head] - ranks[e.tail] >= e.minlen)
    }

    /// Weakly connected components as sorted node lists, ordered by their smallest node.
    fn components(&self) -> Vec<Vec<usize>> {
        let mut parent: Vec<usize> = (0..self.node_count).collect();
        fn find(parent: &mut [usize], mut x: usize) -> usize {
            while parent[x] != x {
                parent[x] = parent[parent[x]];
                x = parent[x];
            }
            x
        }
        for e in &self.edges {
            let a = find(&mut parent, e.tail);
            let b = find(&mut parent, e.head);
            if a != b {
                parent[a.max(b)] = a.min(b);
            }
        }
        let mut slot: Vec<Option<usize>> = vec![None; self.node_count];
        let mut out: Vec<Vec<usize>> = Vec::new();
        for v in 0..self.node_count {
            let root = find(&mut parent, v);
            let ix = *slot[root].get_or_insert_with(|| {
                out.push(Vec::new());
                out.len() - 1
            });
            out[ix].push(v);
        }
        out
    }
}

/// Solves a ranking problem with network simplex.
///
/// Each weakly connected component is solved on its own and shifted so its minimum rank is 0.
/// `limit` caps the number of pivots per component; the ranking is feasible either way.
pub fn network_simplex(problem: &RankProblem, limit: usize) -> Result<RankSolution> {
    for e in &problem.edges {
        if e.tail >= problem.node_count || e.head >= problem.node_count {
            return Err(Error::Unsolvable {
                stage: "rank",
                reason: format!("edge {} -> {} is out of range", e.tail, e.head),
            });
        }
    }

    let mut ranks = vec![0i64; problem.node_count];
    let mut pivots = 0usize;
    let components = problem.components();
    if components.len() == 1 {
        let solved = network_simplex::solve(problem, limit)?;
        pivots += solved.pivots;
        ranks = solved.ranks;
    } else {
        let mut local_ix = vec![0usize; problem.node_count];
        let mut component_of = vec![0usize; problem.node_count];
        for (c, nodes) in components.iter().enumerate() {
            for (i, &v) in nodes.iter().enumerate() {
                local_ix[v] = i;
                component_of[v] = c;
            }
        }
        let mut locals: Vec<RankProblem> = components
            .iter()
            .map(|nodes| RankProblem::new(nodes.len()))
            .collect();
        for e in &problem.edges {
            locals[component_of[e.tail]].add_edge(
                local_ix[e.tail],
                local_ix[e.head],
                e.weight,
                e.minlen,
            );
        }
        for (nodes, local) in components.iter().zip(&locals) {
            let solved = network_simplex::solve(local, limit)?;
            pivots += solved.pivots;
            for (i, &v) in nodes.iter().enumerate() {
                ranks[v] = solved.ranks[i];
            }
        }
    }

    Ok(RankSolution { ranks, pivots })
}
