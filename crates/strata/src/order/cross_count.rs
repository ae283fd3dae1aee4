use super::OrderGraph;
use crate::context::LayoutGraph;
use rustc_hash::FxHashMap;

/// Weighted crossings of a layering of the layout graph.
///
/// Only edges between consecutive layers are counted. Two crossing edges contribute the product
/// of their weights.
pub fn cross_count(g: &LayoutGraph, layering: &[Vec<String>]) -> f64 {
    let mut cc: f64 = 0.0;
    for i in 1..layering.len() {
        cc += two_layer_cross_count(g, &layering[i - 1], &layering[i]);
    }
    cc
}

fn two_layer_cross_count(g: &LayoutGraph, north: &[String], south: &[String]) -> f64 {
    if south.is_empty() {
        return 0.0;
    }
    let south_pos: FxHashMap<&str, usize> = south
        .iter()
        .enumerate()
        .map(|(i, v)| (v.as_str(), i))
        .collect();

    let mut south_entries: Vec<(usize, f64)> = Vec::new();
    for v in north {
        let mut entries: Vec<(usize, f64)> = g
            .out_edges(v)
            .into_iter()
            .filter_map(|e| {
                let pos = *south_pos.get(e.w.as_str())?;
                let weight = g.edge_by_key(&e).map_or(0.0, |e| e.weight);
                Some((pos, weight))
            })
            .collect();
        entries.sort_by_key(|e| e.0);
        south_entries.extend(entries);
    }
    accumulate(south.len(), &south_entries)
}

/// Index-based variant used inside the sweeps.
pub(super) fn layered(og: &OrderGraph, layering: &[Vec<usize>], pos: &[usize]) -> f64 {
    let mut cc: f64 = 0.0;
    let mut south_entries: Vec<(usize, f64)> = Vec::new();
    for i in 1..layering.len() {
        south_entries.clear();
        for &v in &layering[i - 1] {
            let start = south_entries.len();
            south_entries.extend(og.down[v].iter().map(|&(w, weight)| (pos[w], weight)));
            south_entries[start..].sort_by_key(|e| e.0);
        }
        cc += accumulate(layering[i].len(), &south_entries);
    }
    cc
}

/// Bilayer accumulator tree over south positions.
fn accumulate(south_len: usize, south_entries: &[(usize, f64)]) -> f64 {
    if south_len == 0 {
        return 0.0;
    }
    let mut first_index: usize = 1;
    while first_index < south_len {
        first_index <<= 1;
    }
    let tree_size = 2 * first_index - 1;
    first_index -= 1;
    let mut tree: Vec<f64> = vec![0.0; tree_size];

    let mut cc: f64 = 0.0;
    for &(pos, weight) in south_entries {
        let mut index = pos + first_index;
        tree[index] += weight;
        let mut weight_sum: f64 = 0.0;
        while index > 0 {
            if index % 2 == 1 {
                weight_sum += tree[index + 1];
            }
            index = (index - 1) >> 1;
            tree[index] += weight;
        }
        cc += weight * weight_sum;
    }
    cc
}
