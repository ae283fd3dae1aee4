//! Priority layout.
//!
//! Ranks start left-packed. Each pass visits the ranks in one direction and moves every node
//! toward the median of its neighbors on the previous rank, most important nodes first: virtual
//! nodes, then nodes with more neighbors. A moving node pushes less important nodes aside and
//! stops at more important (or already placed) ones, so the separation between neighbors always
//! holds.

use crate::context::LayoutContext;
use crate::order::OrderGraph;

pub(super) fn assign_x(ctx: &mut LayoutContext) {
    let og = OrderGraph::build(&ctx.g);
    let n = og.len();
    let layering: Vec<Vec<usize>> = ctx
        .layering
        .iter()
        .map(|layer| {
            layer
                .iter()
                .filter_map(|id| og.index.get(id).copied())
                .collect()
        })
        .collect();

    let mut left_ext = vec![0.0f64; n];
    let mut right_ext = vec![0.0f64; n];
    let mut is_virtual = vec![false; n];
    for (v, id) in og.ids.iter().enumerate() {
        if let Some(node) = ctx.g.node(id) {
            left_ext[v] = node.left_extent();
            right_ext[v] = node.right_extent();
            is_virtual[v] = node.kind.is_virtual();
        }
    }
    let layout = Placement {
        left_ext,
        right_ext,
        is_virtual,
        nodesep: ctx.attrs.nodesep,
    };

    let mut x = vec![0.0f64; n];
    for layer in &layering {
        let mut cursor = 0.0;
        for (i, &v) in layer.iter().enumerate() {
            cursor += if i == 0 {
                layout.left_ext[v]
            } else {
                layout.sep(layer[i - 1], v)
            };
            x[v] = cursor;
        }
    }

    let passes = ctx.options.priority_passes;
    for _ in 0..passes {
        for downward in [true, false, true] {
            let ranks: Vec<usize> = if downward {
                (1..layering.len()).collect()
            } else {
                (0..layering.len().saturating_sub(1)).rev().collect()
            };
            for r in ranks {
                let fixed = if downward { &og.up } else { &og.down };
                layout.place_rank(&layering[r], fixed, &mut x);
            }
        }
    }

    for (v, id) in og.ids.iter().enumerate() {
        if let Some(node) = ctx.g.node_mut(id) {
            node.x = x[v];
        }
    }
    tracing::debug!(passes, "placed nodes by priority");
}

struct Placement {
    left_ext: Vec<f64>,
    right_ext: Vec<f64>,
    is_virtual: Vec<bool>,
    nodesep: f64,
}

impl Placement {
    /// Minimum center distance of `a` followed by `b`.
    fn sep(&self, a: usize, b: usize) -> f64 {
        self.right_ext[a] + self.nodesep + self.left_ext[b]
    }

    fn place_rank(&self, layer: &[usize], fixed: &[Vec<(usize, f64)>], x: &mut [f64]) {
        let priority: Vec<usize> = layer
            .iter()
            .map(|&v| {
                if self.is_virtual[v] {
                    usize::MAX
                } else {
                    fixed[v].len()
                }
            })
            .collect();
        let mut visit: Vec<usize> = (0..layer.len()).collect();
        visit.sort_by_key(|&i| std::cmp::Reverse(priority[i]));

        let mut placed = vec![false; layer.len()];
        for i in visit {
            let v = layer[i];
            let mut xs: Vec<f64> = fixed[v].iter().map(|&(w, _)| x[w]).collect();
            if xs.is_empty() {
                placed[i] = true;
                continue;
            }
            xs.sort_by(f64::total_cmp);
            let m = xs.len() / 2;
            let target = if xs.len() % 2 == 1 {
                xs[m]
            } else {
                (xs[m - 1] + xs[m]) / 2.0
            };
            let blocks = |j: usize| placed[j] || priority[j] >= priority[i];

            if target < x[v] {
                let mut limit = f64::NEG_INFINITY;
                let mut span = 0.0;
                for j in (0..i).rev() {
                    span += self.sep(layer[j], layer[j + 1]);
                    if blocks(j) {
                        limit = x[layer[j]] + span;
                        break;
                    }
                }
                x[v] = target.max(limit);
                for j in (0..i).rev() {
                    let bound = x[layer[j + 1]] - self.sep(layer[j], layer[j + 1]);
                    if x[layer[j]] <= bound {
                        break;
                    }
                    x[layer[j]] = bound;
                }
            } else if target > x[v] {
                let mut limit = f64::INFINITY;
                let mut span = 0.0;
                for j in i + 1..layer.len() {
                    span += self.sep(layer[j - 1], layer[j]);
                    if blocks(j) {
                        limit = x[layer[j]] - span;
                        break;
                    }
                }
                x[v] = target.min(limit);
                for j in i + 1..layer.len() {
                    let bound = x[layer[j - 1]] + self.sep(layer[j - 1], layer[j]);
                    if x[layer[j]] >= bound {
                        break;
                    }
                    x[layer[j]] = bound;
                }
            }
            placed[i] = true;
        }
    }
}
