//! Rank-adjacent edges.
//!
//! Every edge spanning more than one rank is replaced by a chain of virtual nodes, one per
//! interior rank. A labeled edge carries its label on the virtual node at its middle rank. Each
//! cluster also gets a border placeholder on every rank of its range where it would otherwise be
//! empty, so the cluster stays present (and separated from its siblings) on all of its ranks.

use crate::context::{LayoutContext, LayoutEdge, LayoutNode, NodeKind};
use crate::error::{Error, Result};
use crate::geom::Size;
use strata_graph::EdgeKey;

/// Reserves a rank for every edge label.
///
/// When any edge is labeled, all minimum lengths are doubled and the rank separation is halved,
/// so labels get a rank of their own without stretching the drawing.
pub fn prepare_label_ranks(ctx: &mut LayoutContext) -> Result<()> {
    if !ctx.has_edge_labels {
        return Ok(());
    }
    let mut overflow = None;
    ctx.g.for_each_edge_mut(|_, e| match e.minlen.checked_mul(2) {
        Some(doubled) => e.minlen = doubled,
        None => {
            overflow.get_or_insert_with(|| e.id.clone());
        }
    });
    if let Some(edge_id) = overflow {
        return Err(Error::InvalidOption {
            name: "minlen",
            reason: format!("edge {edge_id} is too long to reserve label ranks"),
        });
    }
    ctx.attrs.ranksep /= 2.0;
    tracing::debug!(ranksep = ctx.attrs.ranksep, "reserved label ranks");
    Ok(())
}

pub fn run(ctx: &mut LayoutContext) {
    let mut chain_nodes = 0usize;
    let mut label_nodes = 0usize;

    let ids: Vec<String> = ctx.chains.keys().cloned().collect();
    for id in ids {
        let Some(chain) = ctx.chains.get(&id) else {
            continue;
        };
        let top = chain.top().to_string();
        let bottom = chain.bottom().to_string();
        let label_size = chain.label_size;
        let key = EdgeKey::new(top.clone(), bottom.clone(), Some(id.clone()));

        let (Some(top_node), Some(bottom_node)) = (ctx.g.node(&top), ctx.g.node(&bottom)) else {
            continue;
        };
        let (top_rank, bottom_rank) = (top_node.rank, bottom_node.rank);
        let container = ctx
            .clusters
            .lca(top_node.container, bottom_node.container);

        if bottom_rank - top_rank <= 1 {
            if let Some(chain) = ctx.chains.get_mut(&id) {
                chain.nodes = vec![top, bottom];
            }
            continue;
        }
        let Some(edge) = ctx.g.remove_edge(&key) else {
            continue;
        };

        let label_rank = label_size.map(|_| top_rank + (bottom_rank - top_rank) / 2);
        let mut nodes: Vec<String> = vec![top.clone()];
        let mut label_node: Option<String> = None;
        for rank in top_rank + 1..bottom_rank {
            let is_label = label_rank == Some(rank);
            let kind = if is_label {
                NodeKind::Label
            } else {
                NodeKind::Chain
            };
            let v = ctx.virtual_id(if is_label { "label" } else { "chain" });
            let mut node = LayoutNode::virtual_node(kind, Some(id.clone()), rank);
            node.container = container;
            if let (true, Some(label)) = (is_label, label_size) {
                // The label sits right of a lane `edgesep` wide that the edge runs through.
                node.label_size = label;
                node.size = Size::new(label.width + ctx.attrs.edgesep, label.height);
                node.lane_offset = -label.width / 2.0;
                label_node = Some(v.clone());
                label_nodes += 1;
            } else {
                chain_nodes += 1;
            }
            ctx.g.set_node(v.clone(), node);
            nodes.push(v);
        }
        nodes.push(bottom);

        for pair in nodes.windows(2) {
            ctx.g.insert_edge(
                EdgeKey::new(pair[0].clone(), pair[1].clone(), Some(id.clone())),
                LayoutEdge {
                    minlen: 1,
                    ..edge.clone()
                },
            );
        }
        if let Some(chain) = ctx.chains.get_mut(&id) {
            chain.nodes = nodes;
            chain.label_node = label_node;
        }
    }

    let borders = add_border_nodes(ctx);
    tracing::debug!(
        chain_nodes,
        label_nodes,
        border_nodes = borders,
        "normalized long edges"
    );
}

/// Fills every rank of each cluster's range that has no node inside the cluster.
fn add_border_nodes(ctx: &mut LayoutContext) -> usize {
    if ctx.clusters.is_empty() {
        return 0;
    }
    let mut present: Vec<Vec<bool>> = ctx
        .clusters
        .clusters
        .iter()
        .map(|c| vec![false; (c.max_rank - c.min_rank + 1).max(0) as usize])
        .collect();
    let tree = &ctx.clusters;
    ctx.g.for_each_node(|_, n| {
        let mut cur = n.container;
        while let Some(c) = cur {
            let cluster = tree.get(c);
            if let Some(slot) = present[c].get_mut((n.rank - cluster.min_rank).max(0) as usize) {
                *slot = true;
            }
            cur = cluster.parent;
        }
    });

    let mut added = 0usize;
    // Innermost clusters first, so one placeholder serves all of its ancestors.
    for c in ctx.clusters.postorder() {
        let min_rank = ctx.clusters.get(c).min_rank;
        for (i, seen) in present[c].clone().into_iter().enumerate() {
            if seen {
                continue;
            }
            let rank = min_rank + i as i32;
            let v = ctx.virtual_id("border");
            let mut node = LayoutNode::virtual_node(NodeKind::Border, None, rank);
            node.container = Some(c);
            ctx.g.set_node(v, node);
            // Ancestors are present on this rank now as well.
            let mut cur = ctx.clusters.parent(c);
            while let Some(p) = cur {
                let pc = ctx.clusters.get(p);
                if let Some(slot) = present[p].get_mut((rank - pc.min_rank).max(0) as usize) {
                    *slot = true;
                }
                cur = pc.parent;
            }
            added += 1;
        }
    }
    added
}
