//! Break cycles by reversing DFS back edges.
//!
//! Nodes are visited in insertion order and out-edges are followed in insertion order, so the set
//! of reversed edges is a deterministic function of the input.

use crate::context::{LayoutEdge, LayoutGraph};
use crate::error::{Error, Result};
use strata_graph::{EdgeKey, alg};

/// Reverses every back edge found by a depth-first search and returns how many were flipped.
pub fn run(g: &mut LayoutGraph) -> Result<usize> {
    let fas = dfs_fas(g);
    for key in &fas {
        reverse_edge(g, key);
    }
    if !alg::is_acyclic(g) {
        return Err(Error::Unsolvable {
            stage: "acyclic",
            reason: "cycles remain after reversing back edges".to_string(),
        });
    }
    tracing::debug!(reversed = fas.len(), "broke cycles");
    Ok(fas.len())
}

/// Flips an edge in place, keeping its name and toggling its `reversed` flag.
pub fn reverse_edge(g: &mut LayoutGraph, key: &EdgeKey) -> Option<EdgeKey> {
    let label: LayoutEdge = g.remove_edge(key)?;
    let flipped = EdgeKey {
        v: key.w.clone(),
        w: key.v.clone(),
        name: key.name.clone(),
    };
    g.insert_edge(
        flipped.clone(),
        LayoutEdge {
            reversed: !label.reversed,
            ..label
        },
    );
    Some(flipped)
}

fn dfs_fas(g: &LayoutGraph) -> Vec<EdgeKey> {
    let mut fas: Vec<EdgeKey> = Vec::new();
    let mut visited = vec![false; g.node_bound()];
    let mut on_stack = vec![false; g.node_bound()];

    for root in g.nodes() {
        let Some(root_ix) = g.node_ix(root) else {
            continue;
        };
        if visited[root_ix] {
            continue;
        }
        visited[root_ix] = true;
        on_stack[root_ix] = true;
        // (node slot, its out-edges, next edge to follow)
        let mut stack: Vec<(usize, Vec<EdgeKey>, usize)> = vec![(root_ix, g.out_edges(root), 0)];
        while let Some((v_ix, out, next)) = stack.last_mut() {
            let Some(e) = out.get(*next).cloned() else {
                on_stack[*v_ix] = false;
                stack.pop();
                continue;
            };
            *next += 1;
            if e.is_self_loop() {
                continue;
            }
            let Some(w_ix) = g.node_ix(&e.w) else {
                continue;
            };
            if on_stack[w_ix] {
                fas.push(e);
            } else if !visited[w_ix] {
                visited[w_ix] = true;
                on_stack[w_ix] = true;
                let w_out = g.out_edges(&e.w);
                stack.push((w_ix, w_out, 0));
            }
        }
    }
    fas
}
