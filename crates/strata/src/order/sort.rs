use super::OrderGraph;
use crate::context::{ClusterIx, ClusterTree};
use rustc_hash::FxHashMap;

/// Median of neighbor positions, interpolated toward the denser side for even counts.
///
/// `None` for nodes without neighbors; they keep their slot.
pub(crate) fn weighted_median(positions: impl Iterator<Item = usize>) -> Option<f64> {
    let mut p: Vec<f64> = positions.map(|x| x as f64).collect();
    if p.is_empty() {
        return None;
    }
    p.sort_by(f64::total_cmp);
    let m = p.len() / 2;
    if p.len() % 2 == 1 {
        return Some(p[m]);
    }
    if p.len() == 2 {
        return Some((p[0] + p[1]) / 2.0);
    }
    let left = p[m - 1] - p[0];
    let right = p[p.len() - 1] - p[m];
    if left + right == 0.0 {
        return Some((p[m - 1] + p[m]) / 2.0);
    }
    Some((p[m - 1] * right + p[m] * left) / (left + right))
}

enum Entry {
    Node(usize),
    Block(ClusterIx, Vec<usize>),
}

/// Cluster nesting as seen by the rank sorter.
pub(crate) struct Hierarchy {
    /// Cluster path (outermost first) of every node.
    paths: Vec<Vec<ClusterIx>>,
    depth: Vec<usize>,
    children: Vec<Vec<ClusterIx>>,
    roots: Vec<ClusterIx>,
    /// Position of each cluster among its siblings, shared by every rank.
    sibling_rank: Vec<usize>,
}

impl Hierarchy {
    pub(crate) fn new(og: &OrderGraph, tree: &ClusterTree) -> Self {
        let mut sibling_rank = vec![0usize; tree.len()];
        for level in std::iter::once(None).chain((0..tree.len()).map(Some)) {
            for (i, &c) in tree.children_of(level).iter().enumerate() {
                sibling_rank[c] = i;
            }
        }
        Self {
            paths: og.container.iter().map(|&c| tree.path(c)).collect(),
            depth: tree.clusters.iter().map(|c| c.depth).collect(),
            children: tree.clusters.iter().map(|c| c.children.clone()).collect(),
            roots: tree.roots.clone(),
            sibling_rank,
        }
    }

    fn level_index(&self, level: Option<ClusterIx>) -> usize {
        level.map_or(0, |c| self.depth[c] + 1)
    }

    /// Sorts one rank by `values`, keeping cluster blocks contiguous and sibling blocks in their
    /// shared order.
    pub(crate) fn arrange_rank(&self, nodes: &[usize], values: &[Option<f64>]) -> Vec<usize> {
        let mut out = Vec::with_capacity(nodes.len());
        self.arrange(None, nodes, values, &mut out);
        out
    }

    fn arrange(
        &self,
        level: Option<ClusterIx>,
        nodes: &[usize],
        values: &[Option<f64>],
        out: &mut Vec<usize>,
    ) {
        let idx = self.level_index(level);
        let mut entries: Vec<Entry> = Vec::new();
        let mut block_at: FxHashMap<ClusterIx, usize> = FxHashMap::default();
        for &v in nodes {
            match self.paths[v].get(idx) {
                None => entries.push(Entry::Node(v)),
                Some(&k) => match block_at.get(&k) {
                    Some(&i) => {
                        if let Entry::Block(_, members) = &mut entries[i] {
                            members.push(v);
                        }
                    }
                    None => {
                        block_at.insert(k, entries.len());
                        entries.push(Entry::Block(k, vec![v]));
                    }
                },
            }
        }

        let vals: Vec<Option<f64>> = entries
            .iter()
            .map(|e| match e {
                Entry::Node(v) => values[*v],
                Entry::Block(_, members) => {
                    let known: Vec<f64> = members.iter().filter_map(|&m| values[m]).collect();
                    (!known.is_empty()).then(|| known.iter().sum::<f64>() / known.len() as f64)
                }
            })
            .collect();

        // slot -> entry
        let mut perm: Vec<usize> = (0..entries.len()).collect();
        let valued: Vec<usize> = (0..entries.len()).filter(|&i| vals[i].is_some()).collect();
        let mut sorted = valued.clone();
        sorted.sort_by(|&a, &b| {
            vals[a]
                .unwrap_or_default()
                .total_cmp(&vals[b].unwrap_or_default())
        });
        for (&slot, ix) in valued.iter().zip(sorted) {
            perm[slot] = ix;
        }

        let block_slots: Vec<usize> = (0..perm.len())
            .filter(|&s| matches!(entries[perm[s]], Entry::Block(..)))
            .collect();
        let mut blocks: Vec<usize> = block_slots.iter().map(|&s| perm[s]).collect();
        blocks.sort_by_key(|&ix| match &entries[ix] {
            Entry::Block(k, _) => self.sibling_rank[*k],
            Entry::Node(_) => usize::MAX,
        });
        for (&slot, ix) in block_slots.iter().zip(blocks) {
            perm[slot] = ix;
        }

        let mut entries: Vec<Option<Entry>> = entries.into_iter().map(Some).collect();
        for ix in perm {
            match entries[ix].take() {
                Some(Entry::Node(v)) => out.push(v),
                Some(Entry::Block(k, members)) => self.arrange(Some(k), &members, values, out),
                None => {}
            }
        }
    }

    /// Re-derives the sibling order of every container from mean normalized member positions.
    pub(crate) fn update_sibling_order(&mut self, layering: &[Vec<usize>], pos: &[usize]) {
        if self.depth.is_empty() {
            return;
        }
        let mut sum = vec![0.0f64; self.depth.len()];
        let mut count = vec![0usize; self.depth.len()];
        for layer in layering {
            let span = layer.len().saturating_sub(1).max(1) as f64;
            for &v in layer {
                let x = pos[v] as f64 / span;
                for &c in &self.paths[v] {
                    sum[c] += x;
                    count[c] += 1;
                }
            }
        }
        let mean = |c: ClusterIx| {
            if count[c] == 0 {
                0.0
            } else {
                sum[c] / count[c] as f64
            }
        };

        let mut groups: Vec<Vec<ClusterIx>> = vec![self.roots.clone()];
        groups.extend(self.children.iter().cloned());
        for mut group in groups {
            group.sort_by(|&a, &b| {
                mean(a)
                    .total_cmp(&mean(b))
                    .then(self.sibling_rank[a].cmp(&self.sibling_rank[b]))
            });
            for (i, c) in group.into_iter().enumerate() {
                self.sibling_rank[c] = i;
            }
        }
    }

    /// Re-sorts every rank by its current positions so blocks follow the sibling order.
    pub(crate) fn reconcile(&self, layering: &mut [Vec<usize>], pos: &mut [usize]) {
        if self.depth.is_empty() {
            return;
        }
        let mut values: Vec<Option<f64>> = vec![None; pos.len()];
        for layer in layering.iter_mut() {
            for &v in layer.iter() {
                values[v] = Some(pos[v] as f64);
            }
            *layer = self.arrange_rank(layer, &values);
            for (i, &v) in layer.iter().enumerate() {
                pos[v] = i;
            }
        }
    }
}
