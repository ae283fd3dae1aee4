//! Node ordering / crossing minimization.
//!
//! Each restart starts from a different deterministic initial order and runs a fixed number of
//! alternating down/up median sweeps with adjacent transpositions. Cluster members are kept
//! contiguous by sorting every rank hierarchically, and sibling clusters keep one left-to-right
//! order on all ranks. The layering with the fewest weighted crossings wins.

mod cross_count;
mod init_order;
mod sort;
mod transpose;

pub use cross_count::cross_count;

use crate::context::{ClusterIx, LayoutContext, LayoutGraph};
use rustc_hash::FxHashMap;
use sort::Hierarchy;

/// Best layering seen so far. Ties keep the earlier layering.
#[derive(Debug, Clone, PartialEq)]
pub struct BestOrder {
    pub layering: Vec<Vec<String>>,
    pub crossings: f64,
}

const TRANSPOSE_PASSES: usize = 8;

/// Dense, index-based view of the layered graph. Every edge joins adjacent ranks.
pub(crate) struct OrderGraph {
    pub(crate) ids: Vec<String>,
    pub(crate) index: FxHashMap<String, usize>,
    pub(crate) rank: Vec<usize>,
    pub(crate) container: Vec<Option<ClusterIx>>,
    /// Neighbors on the next rank, with edge weights.
    pub(crate) down: Vec<Vec<(usize, f64)>>,
    /// Neighbors on the previous rank, with edge weights.
    pub(crate) up: Vec<Vec<(usize, f64)>>,
    pub(crate) rank_count: usize,
}

impl OrderGraph {
    pub(crate) fn build(g: &LayoutGraph) -> Self {
        let mut dense: Vec<Option<usize>> = vec![None; g.node_bound()];
        let mut ids = Vec::with_capacity(g.node_count());
        let mut rank = Vec::with_capacity(g.node_count());
        let mut container = Vec::with_capacity(g.node_count());
        g.for_each_node_ix(|ix, id, n| {
            dense[ix] = Some(ids.len());
            ids.push(id.to_string());
            rank.push(n.rank.max(0) as usize);
            container.push(n.container);
        });
        let mut down = vec![Vec::new(); ids.len()];
        let mut up = vec![Vec::new(); ids.len()];
        g.for_each_edge_ix(|v_ix, w_ix, _, e| {
            if let (Some(v), Some(w)) = (dense[v_ix], dense[w_ix]) {
                down[v].push((w, e.weight));
                up[w].push((v, e.weight));
            }
        });
        let rank_count = rank.iter().map(|r| r + 1).max().unwrap_or(0);
        let index = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();
        Self {
            ids,
            index,
            rank,
            container,
            down,
            up,
            rank_count,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.ids.len()
    }
}

/// Finds a low-crossing order for every rank of the normalized graph.
pub fn order(ctx: &LayoutContext) -> BestOrder {
    let og = OrderGraph::build(&ctx.g);
    if og.len() == 0 {
        return BestOrder {
            layering: Vec::new(),
            crossings: 0.0,
        };
    }
    let mut hierarchy = Hierarchy::new(&og, &ctx.clusters);
    let mut pos = vec![0usize; og.len()];

    let mut best: Option<(Vec<Vec<usize>>, f64)> = None;
    for restart in 0..ctx.options.restarts.max(1) {
        let mut layering = init_order::init_order(&ctx.g, &og, restart % 3);
        positions(&layering, &mut pos);
        hierarchy.update_sibling_order(&layering, &pos);
        hierarchy.reconcile(&mut layering, &mut pos);

        let mut crossings = cross_count::layered(&og, &layering, &pos);
        let mut restart_best = crossings;
        consider(&mut best, &layering, crossings);

        for iteration in 0..ctx.options.max_iterations {
            if crossings == 0.0 {
                break;
            }
            let downward = iteration % 2 == 0;
            sweep(&og, &hierarchy, &mut layering, &mut pos, downward);
            transpose::transpose(&og, &mut layering, &mut pos, TRANSPOSE_PASSES);
            hierarchy.update_sibling_order(&layering, &pos);
            hierarchy.reconcile(&mut layering, &mut pos);

            crossings = cross_count::layered(&og, &layering, &pos);
            restart_best = restart_best.min(crossings);
            consider(&mut best, &layering, crossings);
        }
        tracing::debug!(restart, crossings = restart_best, "ordering restart finished");
    }

    let (layering, crossings) = best.unwrap_or_default();
    BestOrder {
        layering: layering
            .into_iter()
            .map(|layer| layer.into_iter().map(|v| og.ids[v].clone()).collect())
            .collect(),
        crossings,
    }
}

/// Orders the normalized graph and writes `order` onto every node.
pub fn run(ctx: &mut LayoutContext) -> BestOrder {
    let best = order(ctx);
    ctx.apply_layering(best.layering.clone());
    tracing::debug!(
        ranks = ctx.layering.len(),
        crossings = best.crossings,
        "ordered ranks"
    );
    best
}

fn consider(best: &mut Option<(Vec<Vec<usize>>, f64)>, layering: &[Vec<usize>], crossings: f64) {
    if best.as_ref().is_none_or(|(_, c)| crossings < *c) {
        *best = Some((layering.to_vec(), crossings));
    }
}

pub(crate) fn positions(layering: &[Vec<usize>], pos: &mut [usize]) {
    for layer in layering {
        for (i, &v) in layer.iter().enumerate() {
            pos[v] = i;
        }
    }
}

fn sweep(
    og: &OrderGraph,
    hierarchy: &Hierarchy,
    layering: &mut [Vec<usize>],
    pos: &mut [usize],
    downward: bool,
) {
    let n = layering.len();
    if n < 2 {
        return;
    }
    let ranks: Vec<usize> = if downward {
        (1..n).collect()
    } else {
        (0..n - 1).rev().collect()
    };
    let mut values: Vec<Option<f64>> = vec![None; og.len()];
    for r in ranks {
        for &v in &layering[r] {
            let fixed = if downward { &og.up[v] } else { &og.down[v] };
            values[v] = sort::weighted_median(fixed.iter().map(|&(w, _)| pos[w]));
        }
        let arranged = hierarchy.arrange_rank(&layering[r], &values);
        layering[r] = arranged;
        for (i, &v) in layering[r].iter().enumerate() {
            pos[v] = i;
        }
    }
}
