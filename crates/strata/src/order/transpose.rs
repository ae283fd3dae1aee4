use super::OrderGraph;

/// Swaps adjacent nodes of the same container while that strictly lowers crossings.
pub(super) fn transpose(
    og: &OrderGraph,
    layering: &mut [Vec<usize>],
    pos: &mut [usize],
    max_passes: usize,
) {
    for _ in 0..max_passes {
        let mut improved = false;
        for layer in layering.iter_mut() {
            for i in 0..layer.len().saturating_sub(1) {
                let (u, v) = (layer[i], layer[i + 1]);
                if og.container[u] != og.container[v] {
                    continue;
                }
                let (keep, swap) = pair_crossings(og, pos, u, v);
                if swap < keep {
                    layer.swap(i, i + 1);
                    pos[u] = i + 1;
                    pos[v] = i;
                    improved = true;
                }
            }
        }
        if !improved {
            break;
        }
    }
}

/// Crossings among the edges of `u` and `v` with `u` left of `v`, and with the two swapped.
fn pair_crossings(og: &OrderGraph, pos: &[usize], u: usize, v: usize) -> (f64, f64) {
    let mut keep = 0.0;
    let mut swap = 0.0;
    for adj in [&og.up, &og.down] {
        for &(p, wp) in &adj[u] {
            for &(q, wq) in &adj[v] {
                if pos[p] > pos[q] {
                    keep += wp * wq;
                } else if pos[p] < pos[q] {
                    swap += wp * wq;
                }
            }
        }
    }
    (keep, swap)
}
