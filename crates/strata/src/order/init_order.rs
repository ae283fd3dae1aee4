use super::OrderGraph;
use crate::context::LayoutGraph;
use std::collections::VecDeque;
use strata_graph::alg;

/// Initial layering for a restart.
///
/// `0`: depth-first from every node in rank order, following out-edges.
/// `1`: breadth-first in the same root order.
/// `2`: depth-first from the last rank upward, following in-edges.
pub(super) fn init_order(g: &LayoutGraph, og: &OrderGraph, variant: usize) -> Vec<Vec<usize>> {
    let mut layers: Vec<Vec<usize>> = vec![Vec::new(); og.rank_count];
    let mut by_rank: Vec<usize> = (0..og.len()).collect();
    // Stable: insertion order breaks ties within a rank.
    by_rank.sort_by_key(|&v| og.rank[v]);

    let visit: Vec<usize> = match variant {
        0 => {
            let roots: Vec<&str> = by_rank.iter().map(|&v| og.ids[v].as_str()).collect();
            alg::preorder(g, &roots)
                .iter()
                .filter_map(|id| og.index.get(id).copied())
                .collect()
        }
        1 => breadth_first(og, &by_rank),
        _ => {
            let mut roots = by_rank.clone();
            roots.sort_by_key(|&v| std::cmp::Reverse(og.rank[v]));
            depth_first_up(og, &roots)
        }
    };
    for v in visit {
        layers[og.rank[v]].push(v);
    }
    layers
}

fn breadth_first(og: &OrderGraph, roots: &[usize]) -> Vec<usize> {
    let mut seen = vec![false; og.len()];
    let mut out = Vec::with_capacity(og.len());
    for &root in roots {
        if seen[root] {
            continue;
        }
        seen[root] = true;
        let mut queue = VecDeque::from([root]);
        while let Some(v) = queue.pop_front() {
            out.push(v);
            for &(w, _) in &og.down[v] {
                if !seen[w] {
                    seen[w] = true;
                    queue.push_back(w);
                }
            }
        }
    }
    out
}

fn depth_first_up(og: &OrderGraph, roots: &[usize]) -> Vec<usize> {
    let mut seen = vec![false; og.len()];
    let mut out = Vec::with_capacity(og.len());
    for &root in roots {
        let mut stack = vec![root];
        while let Some(v) = stack.pop() {
            if seen[v] {
                continue;
            }
            seen[v] = true;
            out.push(v);
            for &(w, _) in og.up[v].iter().rev() {
                if !seen[w] {
                    stack.push(w);
                }
            }
        }
    }
    out
}
