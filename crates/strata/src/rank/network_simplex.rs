//! Network simplex on a single connected constraint graph.
//!
//! Longest-path start, a tight spanning tree grown from node 0, postorder `low`/`lim` numbering
//! for subtree tests, then pivots until no tree edge has a negative cut value. Ties on both the
//! leaving and the entering edge go to the lowest edge index.

use super::{RankProblem, RankSolution};
use crate::error::{Error, Result};

const EPS: f64 = 1e-9;

pub(super) fn solve(problem: &RankProblem, limit: usize) -> Result<RankSolution> {
    let n = problem.node_count;
    if n == 0 {
        return Ok(RankSolution {
            ranks: Vec::new(),
            pivots: 0,
        });
    }
    let mut s = Simplex::new(problem)?;
    s.feasible_tree();
    s.rebuild_tree();
    s.compute_cut_values();

    let mut pivots = 0usize;
    while pivots < limit {
        let Some(leave) = s.leave_edge() else {
            break;
        };
        let Some(enter) = s.enter_edge(leave) else {
            break;
        };
        s.exchange(leave, enter);
        pivots += 1;
    }
    if pivots == limit && s.leave_edge().is_some() {
        tracing::debug!(limit, "network simplex stopped at its pivot limit");
    }

    let min = s.ranks.iter().copied().min().unwrap_or(0);
    for r in &mut s.ranks {
        *r -= min;
    }
    Ok(RankSolution {
        ranks: s.ranks,
        pivots,
    })
}

struct Simplex<'a> {
    p: &'a RankProblem,
    ranks: Vec<i64>,
    /// Incident edge indices per node, in edge order.
    adj: Vec<Vec<usize>>,
    in_tree: Vec<bool>,

    parent: Vec<Option<usize>>,
    parent_edge: Vec<usize>,
    low: Vec<usize>,
    lim: Vec<usize>,
    /// Nodes in postorder; the root comes last.
    postorder: Vec<usize>,
    /// Cut value of the edge between a node and its parent.
    cut: Vec<f64>,
}

impl<'a> Simplex<'a> {
    fn new(p: &'a RankProblem) -> Result<Self> {
        let n = p.node_count;
        let mut adj: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (i, e) in p.edges.iter().enumerate() {
            if e.tail == e.head {
                continue;
            }
            adj[e.tail].push(i);
            adj[e.head].push(i);
        }
        let ranks = longest_path(p)?;
        Ok(Self {
            p,
            ranks,
            adj,
            in_tree: vec![false; p.edges.len()],
            parent: vec![None; n],
            parent_edge: vec![usize::MAX; n],
            low: vec![0; n],
            lim: vec![0; n],
            postorder: Vec::with_capacity(n),
            cut: vec![0.0; n],
        })
    }

    fn slack(&self, e: usize) -> i64 {
        let e = &self.p.edges[e];
        self.ranks[e.head] - self.ranks[e.tail] - e.minlen
    }

    fn other(&self, e: usize, v: usize) -> usize {
        let e = &self.p.edges[e];
        if e.tail == v { e.head } else { e.tail }
    }

    /// Grows a spanning tree of tight edges, shifting the tree as a block when it gets stuck.
    fn feasible_tree(&mut self) {
        let n = self.p.node_count;
        let mut member = vec![false; n];
        member[0] = true;
        let mut size = 1usize;
        loop {
            let mut stack: Vec<usize> = (0..n).filter(|&v| member[v]).collect();
            while let Some(v) = stack.pop() {
                for i in 0..self.adj[v].len() {
                    let e = self.adj[v][i];
                    let w = self.other(e, v);
                    if !member[w] && self.slack(e) == 0 {
                        member[w] = true;
                        self.in_tree[e] = true;
                        size += 1;
                        stack.push(w);
                    }
                }
            }
            if size >= n {
                return;
            }

            let mut best: Option<(i64, usize)> = None;
            for (i, e) in self.p.edges.iter().enumerate() {
                if e.tail == e.head || member[e.tail] == member[e.head] {
                    continue;
                }
                let slack = self.slack(i);
                if best.is_none_or(|(s, _)| slack < s) {
                    best = Some((slack, i));
                }
            }
            let Some((slack, e)) = best else {
                // Disconnected input; components are split off before we get here.
                return;
            };
            let delta = if member[self.p.edges[e].tail] {
                slack
            } else {
                -slack
            };
            for v in 0..n {
                if member[v] {
                    self.ranks[v] += delta;
                }
            }
        }
    }

    /// Recomputes parents and `low`/`lim` numbering from the current tree edges.
    fn rebuild_tree(&mut self) {
        let n = self.p.node_count;
        self.parent.fill(None);
        self.parent_edge.fill(usize::MAX);
        self.postorder.clear();
        let mut visited = vec![false; n];
        let mut next_lim = 1usize;

        // (node, next adjacency slot)
        let mut stack: Vec<(usize, usize)> = vec![(0, 0)];
        visited[0] = true;
        self.low[0] = next_lim;
        while let Some(&mut (v, ref mut slot)) = stack.last_mut() {
            if *slot < self.adj[v].len() {
                let e = self.adj[v][*slot];
                *slot += 1;
                if !self.in_tree[e] {
                    continue;
                }
                let w = self.other(e, v);
                if visited[w] {
                    continue;
                }
                visited[w] = true;
                self.parent[w] = Some(v);
                self.parent_edge[w] = e;
                self.low[w] = next_lim;
                stack.push((w, 0));
            } else {
                self.lim[v] = next_lim;
                next_lim += 1;
                self.postorder.push(v);
                stack.pop();
            }
        }
    }

    fn compute_cut_values(&mut self) {
        let mut out_sub = vec![0.0f64; self.p.node_count];
        for i in 0..self.postorder.len() {
            let v = self.postorder[i];
            let mut sum = out_sub[v];
            for &e in &self.adj[v] {
                let edge = &self.p.edges[e];
                sum += if edge.tail == v {
                    edge.weight
                } else {
                    -edge.weight
                };
            }
            out_sub[v] = sum;
            if let Some(p) = self.parent[v] {
                out_sub[p] += sum;
                self.cut[v] = if self.p.edges[self.parent_edge[v]].tail == v {
                    sum
                } else {
                    -sum
                };
            }
        }
    }

    fn leave_edge(&self) -> Option<usize> {
        (0..self.p.node_count)
            .filter(|&v| self.parent[v].is_some() && self.cut[v] < -EPS)
            .map(|v| self.parent_edge[v])
            .min()
    }

    fn in_subtree(&self, root: usize, v: usize) -> bool {
        self.low[root] <= self.lim[v] && self.lim[v] <= self.lim[root]
    }

    fn enter_edge(&self, leave: usize) -> Option<usize> {
        let edge = &self.p.edges[leave];
        let child_is_tail = self.parent[edge.tail] == Some(edge.head)
            && self.parent_edge[edge.tail] == leave;
        let child = if child_is_tail { edge.tail } else { edge.head };

        let mut best: Option<(i64, usize)> = None;
        for (i, e) in self.p.edges.iter().enumerate() {
            if i == leave || e.tail == e.head {
                continue;
            }
            let tail_in = self.in_subtree(child, e.tail);
            let head_in = self.in_subtree(child, e.head);
            let crosses = if child_is_tail {
                !tail_in && head_in
            } else {
                tail_in && !head_in
            };
            if !crosses {
                continue;
            }
            let slack = self.slack(i);
            if best.is_none_or(|(s, _)| slack < s) {
                best = Some((slack, i));
            }
        }
        best.map(|(_, i)| i)
    }

    fn exchange(&mut self, leave: usize, enter: usize) {
        self.in_tree[leave] = false;
        self.in_tree[enter] = true;
        self.rebuild_tree();

        // Tree edges are tight, so ranks follow from the root downward.
        for i in (0..self.postorder.len()).rev() {
            let v = self.postorder[i];
            let Some(p) = self.parent[v] else {
                continue;
            };
            let e = &self.p.edges[self.parent_edge[v]];
            self.ranks[v] = if e.tail == p {
                self.ranks[p] + e.minlen
            } else {
                self.ranks[p] - e.minlen
            };
        }
        self.compute_cut_values();
    }
}

/// Initial feasible ranking: every node sits at the longest-path distance from the sources.
fn longest_path(p: &RankProblem) -> Result<Vec<i64>> {
    let n = p.node_count;
    let mut indegree = vec![0usize; n];
    let mut out: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (i, e) in p.edges.iter().enumerate() {
        if e.tail == e.head {
            continue;
        }
        indegree[e.head] += 1;
        out[e.tail].push(i);
    }

    let mut ranks = vec![0i64; n];
    let mut queue: std::collections::VecDeque<usize> =
        (0..n).filter(|&v| indegree[v] == 0).collect();
    let mut seen = 0usize;
    while let Some(v) = queue.pop_front() {
        seen += 1;
        for &i in &out[v] {
            let e = &p.edges[i];
            ranks[e.head] = ranks[e.head].max(ranks[v] + e.minlen);
            indegree[e.head] -= 1;
            if indegree[e.head] == 0 {
                queue.push_back(e.head);
            }
        }
    }
    if seen < n {
        return Err(Error::Unsolvable {
            stage: "rank",
            reason: "constraint graph has a cycle".to_string(),
        });
    }
    Ok(ranks)
}
