//! X coordinates from an auxiliary constraint graph.
//!
//! Every node and every cluster border is a variable. Separation and containment become minimum
//! length constraints, and each edge gets an auxiliary variable that sits left of both endpoints,
//! so minimizing the weighted lengths of the auxiliary edges pulls the endpoints into line. The
//! problem is solved with the same network simplex used for ranking.

use super::clusters::{LabelBand, label_run};
use crate::context::{ClusterIx, LayoutContext, NodeKind};
use crate::error::Result;
use crate::order::OrderGraph;
use crate::rank::{RankProblem, network_simplex};

/// Straightening weight of an edge by the kinds of its endpoints.
fn omega(tail_virtual: bool, head_virtual: bool) -> f64 {
    match (tail_virtual, head_virtual) {
        (false, false) => 1.0,
        (true, true) => 8.0,
        _ => 2.0,
    }
}

fn len(d: f64) -> i64 {
    d.max(0.0).ceil() as i64
}

pub(super) fn assign_x(ctx: &mut LayoutContext) -> Result<()> {
    let og = OrderGraph::build(&ctx.g);
    let n = og.len();
    let tree = &ctx.clusters;
    let left_var = |c: ClusterIx| n + 2 * c;
    let right_var = |c: ClusterIx| n + 2 * c + 1;

    let mut left_ext = vec![0.0f64; n];
    let mut right_ext = vec![0.0f64; n];
    let mut is_virtual = vec![false; n];
    let mut lane = vec![0.0f64; n];
    for (v, id) in og.ids.iter().enumerate() {
        if let Some(node) = ctx.g.node(id) {
            left_ext[v] = node.left_extent();
            right_ext[v] = node.right_extent();
            is_virtual[v] = node.kind.is_virtual();
            if node.kind == NodeKind::Label {
                lane[v] = node.lane_offset;
            }
        }
    }

    let nodesep = ctx.attrs.nodesep;
    let mut problem = RankProblem::new(n + 2 * tree.len());

    for layer in &ctx.layering {
        for pair in layer.windows(2) {
            let (Some(&a), Some(&b)) = (og.index.get(&pair[0]), og.index.get(&pair[1])) else {
                continue;
            };
            let (ca, cb) = (og.container[a], og.container[b]);
            let common = tree.lca(ca, cb);
            match (tree.child_toward(common, ca), tree.child_toward(common, cb)) {
                (None, None) => {
                    problem.add_edge(a, b, 0.0, len(right_ext[a] + nodesep + left_ext[b]));
                }
                (Some(ka), None) => {
                    problem.add_edge(right_var(ka), b, 0.0, len(nodesep + left_ext[b]));
                }
                (None, Some(kb)) => {
                    problem.add_edge(a, left_var(kb), 0.0, len(right_ext[a] + nodesep));
                }
                (Some(ka), Some(kb)) => {
                    problem.add_edge(right_var(ka), left_var(kb), 0.0, len(nodesep));
                }
            }
        }
    }

    // Inner room on the left and right of each cluster: margin plus any label band.
    let insets: Vec<(f64, f64)> = tree
        .clusters
        .iter()
        .map(|c| {
            let band = LabelBand::of(c, ctx.orientation);
            (c.margin + band.left, c.margin + band.right)
        })
        .collect();
    for v in 0..n {
        if let Some(c) = og.container[v] {
            problem.add_edge(left_var(c), v, 0.0, len(insets[c].0 + left_ext[v]));
            problem.add_edge(v, right_var(c), 0.0, len(insets[c].1 + right_ext[v]));
        }
    }
    for (c, cluster) in tree.clusters.iter().enumerate() {
        if let Some(p) = cluster.parent {
            problem.add_edge(left_var(p), left_var(c), 0.0, len(insets[p].0));
            problem.add_edge(right_var(c), right_var(p), 0.0, len(insets[p].1));
        }
        let run = if ctx.orientation.label_side(cluster.labelloc).is_horizontal() {
            label_run(
                ctx.orientation,
                cluster.labelloc,
                cluster.label_size,
                cluster.margin,
            )
        } else {
            insets[c].0 + insets[c].1
        };
        // Keeps the box as narrow as its contents and label allow.
        problem.add_edge(left_var(c), right_var(c), 1.0, len(run));
    }

    let mut aux_edges = 0usize;
    for u in 0..n {
        for &(v, weight) in &og.down[u] {
            let w = weight * omega(is_virtual[u], is_virtual[v]);
            let aux = problem.add_node();
            // Aligns `x + lane` of both ends, which is where the edge passes.
            problem.add_edge(aux, u, w, len(lane[v] - lane[u]));
            problem.add_edge(aux, v, w, len(lane[u] - lane[v]));
            aux_edges += 1;
        }
    }

    let solution = network_simplex(&problem, ctx.options.nslimit)?;
    tracing::debug!(
        variables = problem.node_count,
        aux_edges,
        pivots = solution.pivots,
        "balanced x coordinates"
    );

    for (v, id) in og.ids.iter().enumerate() {
        if let Some(node) = ctx.g.node_mut(id) {
            node.x = solution.ranks[v] as f64;
        }
    }
    for (c, cluster) in ctx.clusters.clusters.iter_mut().enumerate() {
        cluster.rect.left = solution.ranks[left_var(c)] as f64;
        cluster.rect.right = solution.ranks[right_var(c)] as f64;
    }
    Ok(())
}
