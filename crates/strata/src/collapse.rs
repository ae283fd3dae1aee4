//! Rank assignment across nested clusters.
//!
//! Clusters are ranked bottom-up. At every level the direct member nodes and the contracted child
//! clusters form one small constraint graph, solved with [`network_simplex`]. A node's final rank
//! is the rank of its outermost item plus the offsets along its nesting chain, so each cluster
//! occupies a contiguous block of ranks that contains the blocks of its children.

use crate::acyclic;
use crate::context::{ClusterIx, LayoutContext};
use crate::error::{Error, Result};
use crate::rank::{RankProblem, network_simplex};
use rustc_hash::FxHashMap;
use strata_graph::EdgeKey;

struct FlatEdge {
    tail: usize,
    head: usize,
    weight: f64,
    minlen: i64,
}

/// Ranks every real node, then turns each edge so it points down the layering.
pub fn run(ctx: &mut LayoutContext) -> Result<()> {
    let ids: Vec<String> = ctx.g.node_ids();
    let index: FxHashMap<&str, usize> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_str(), i))
        .collect();
    let mut edges: Vec<FlatEdge> = Vec::with_capacity(ctx.g.edge_count());
    ctx.g.for_each_edge(|key, e| {
        if let (Some(&tail), Some(&head)) = (index.get(key.v.as_str()), index.get(key.w.as_str())) {
            edges.push(FlatEdge {
                tail,
                head,
                weight: e.weight,
                minlen: i64::from(e.minlen),
            });
        }
    });

    let ranks = if ctx.clusters.is_empty() {
        rank_flat(ids.len(), &edges, ctx.options.nslimit)?
    } else {
        rank_nested(ctx, &ids, &edges)?
    };

    for (id, &rank) in ids.iter().zip(&ranks) {
        let rank = i32::try_from(rank).map_err(|_| Error::Unsolvable {
            stage: "rank",
            reason: format!("rank {rank} of node {id} does not fit the layering"),
        })?;
        if let Some(n) = ctx.g.node_mut(id) {
            n.rank = rank;
        }
    }

    let reversed = orient_edges(ctx)?;
    record_cluster_ranges(ctx);
    tracing::debug!(
        ranks = ranks.iter().copied().max().map_or(0, |r| r + 1),
        reversed,
        clusters = ctx.clusters.len(),
        "assigned ranks"
    );
    Ok(())
}

fn rank_flat(node_count: usize, edges: &[FlatEdge], limit: usize) -> Result<Vec<i64>> {
    let mut problem = RankProblem::new(node_count);
    for e in edges {
        problem.add_edge(e.tail, e.head, e.weight, e.minlen);
    }
    let solution = network_simplex(&problem, limit)?;
    tracing::debug!(pivots = solution.pivots, "ranked flat graph");
    Ok(solution.ranks)
}

fn rank_nested(ctx: &LayoutContext, ids: &[String], edges: &[FlatEdge]) -> Result<Vec<i64>> {
    let tree = &ctx.clusters;
    let paths: Vec<Vec<ClusterIx>> = ids
        .iter()
        .map(|id| tree.path(ctx.g.node(id).and_then(|n| n.container)))
        .collect();
    // Offset of each node from the top of the innermost cluster ranked so far.
    let mut offset = vec![0i64; ids.len()];

    let mut levels: Vec<Option<ClusterIx>> = tree.postorder().into_iter().map(Some).collect();
    levels.push(None);

    for level in levels {
        let children = tree.children_of(level);
        let child_item: FxHashMap<ClusterIx, usize> = children
            .iter()
            .enumerate()
            .map(|(i, &c)| (c, i))
            .collect();

        // Item of every node inside this level: child clusters first, then direct members.
        let mut item_of: Vec<Option<usize>> = vec![None; ids.len()];
        let mut item_count = children.len();
        for (u, path) in paths.iter().enumerate() {
            let pos = match level {
                None => Some(0),
                Some(l) => path.iter().position(|&c| c == l).map(|p| p + 1),
            };
            let Some(pos) = pos else {
                continue;
            };
            item_of[u] = Some(match path.get(pos) {
                Some(child) => {
                    let Some(&item) = child_item.get(child) else {
                        return Err(Error::Unsolvable {
                            stage: "cluster ranking",
                            reason: format!(
                                "node {} sits in a cluster missing from its parent",
                                ids[u]
                            ),
                        });
                    };
                    item
                }
                None => {
                    item_count += 1;
                    item_count - 1
                }
            });
        }

        let mut contracted: Vec<FlatEdge> = Vec::new();
        for e in edges {
            let (Some(a), Some(b)) = (item_of[e.tail], item_of[e.head]) else {
                continue;
            };
            if a == b {
                continue;
            }
            contracted.push(FlatEdge {
                tail: a,
                head: b,
                weight: e.weight,
                minlen: e.minlen + offset[e.tail] - offset[e.head],
            });
        }

        let flip = back_edges(item_count, &contracted);
        let mut problem = RankProblem::new(item_count);
        for (e, (c, flipped)) in edges
            .iter()
            .filter(|e| matches!((item_of[e.tail], item_of[e.head]), (Some(a), Some(b)) if a != b))
            .zip(contracted.iter().zip(&flip))
        {
            if *flipped {
                // The edge will point upward in the end: keep `minlen` between the nodes the
                // other way round.
                problem.add_edge(
                    c.head,
                    c.tail,
                    c.weight,
                    e.minlen + offset[e.head] - offset[e.tail],
                );
            } else {
                problem.add_edge(c.tail, c.head, c.weight, c.minlen);
            }
        }
        let solution = network_simplex(&problem, ctx.options.nslimit)?;

        for (u, item) in item_of.iter().enumerate() {
            if let Some(item) = item {
                offset[u] += solution.ranks[*item];
            }
        }
        tracing::debug!(
            cluster = level.map(|c| tree.get(c).id.as_str()).unwrap_or("<root>"),
            items = item_count,
            pivots = solution.pivots,
            flipped = flip.iter().filter(|f| **f).count(),
            "ranked cluster level"
        );
    }
    Ok(offset)
}

/// Back edges of a depth-first search over the item graph, in edge order.
fn back_edges(count: usize, edges: &[FlatEdge]) -> Vec<bool> {
    let mut out: Vec<Vec<usize>> = vec![Vec::new(); count];
    for (i, e) in edges.iter().enumerate() {
        out[e.tail].push(i);
    }
    let mut flip = vec![false; edges.len()];
    let mut visited = vec![false; count];
    let mut on_stack = vec![false; count];
    for root in 0..count {
        if visited[root] {
            continue;
        }
        visited[root] = true;
        on_stack[root] = true;
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        while let Some((v, next)) = stack.last_mut() {
            let v = *v;
            let Some(&e) = out[v].get(*next) else {
                on_stack[v] = false;
                stack.pop();
                continue;
            };
            *next += 1;
            let w = edges[e].head;
            if on_stack[w] {
                flip[e] = true;
            } else if !visited[w] {
                visited[w] = true;
                on_stack[w] = true;
                stack.push((w, 0));
            }
        }
    }
    flip
}

/// Reverses edges whose head ended up above their tail. Returns how many were turned.
fn orient_edges(ctx: &mut LayoutContext) -> Result<usize> {
    fn rank(g: &crate::context::LayoutGraph, id: &str) -> i32 {
        g.node(id).map_or(0, |n| n.rank)
    }

    let upward: Vec<EdgeKey> = ctx
        .g
        .edges()
        .filter(|k| rank(&ctx.g, &k.w) < rank(&ctx.g, &k.v))
        .cloned()
        .collect();
    for key in &upward {
        acyclic::reverse_edge(&mut ctx.g, key);
    }

    for key in ctx.g.edges() {
        let (tail_rank, head_rank) = (rank(&ctx.g, &key.v), rank(&ctx.g, &key.w));
        if head_rank <= tail_rank {
            let edge_id = ctx
                .g
                .edge_by_key(key)
                .map(|e| e.id.clone())
                .unwrap_or_default();
            return Err(Error::RankInversion {
                edge_id,
                tail_rank,
                head_rank,
            });
        }
    }
    for chain in ctx.chains.values_mut() {
        chain.reversed = rank(&ctx.g, &chain.head) < rank(&ctx.g, &chain.tail);
    }
    Ok(upward.len())
}

fn record_cluster_ranges(ctx: &mut LayoutContext) {
    for c in ctx.clusters.postorder() {
        let mut lo = i32::MAX;
        let mut hi = i32::MIN;
        for id in &ctx.clusters.clusters[c].members {
            if let Some(n) = ctx.g.node(id) {
                lo = lo.min(n.rank);
                hi = hi.max(n.rank);
            }
        }
        for &child in &ctx.clusters.clusters[c].children {
            let child = &ctx.clusters.clusters[child];
            lo = lo.min(child.min_rank);
            hi = hi.max(child.max_rank);
        }
        let cluster = &mut ctx.clusters.clusters[c];
        cluster.min_rank = lo;
        cluster.max_rank = hi;
    }
}
