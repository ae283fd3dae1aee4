//! Orthogonal routing.
//!
//! An edge runs vertically through each rank it crosses and switches columns on a horizontal
//! channel inside an inter-rank gap. Edges that switch columns in the same gap get distinct
//! channels, ordered by where they come from and where they go. Edges leaving (or entering) a
//! node on the same side without a port are fanned out along that side.

use super::Prepared;
use super::port::{self, End};
use crate::context::LayoutContext;
use crate::geom::Point;
use crate::model::Port;
use indexmap::IndexMap;

const EPS: f64 = 1e-9;

/// Resolved end of an orthogonal path.
#[derive(Debug, Clone, Copy)]
struct Anchor {
    point: Point,
    /// Column the path takes next to the anchor; differs from `point.x` for side ports.
    column: f64,
}

/// Axis-aligned polylines for `edges`, in the same order, top to bottom.
pub(super) fn route(ctx: &LayoutContext, edges: &[Prepared]) -> Vec<Vec<Point>> {
    let edgesep = ctx.attrs.edgesep;
    let fanned = fan_out(ctx, edges);

    let anchors: Vec<(Anchor, Anchor)> = edges
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let start = anchor(&e.start, fanned[i].0, edgesep);
            let end = anchor(&e.end, fanned[i].1, edgesep);
            (start, end)
        })
        .collect();

    let columns: Vec<Vec<f64>> = edges
        .iter()
        .zip(&anchors)
        .map(|(e, (start, end))| {
            let mut cols = Vec::with_capacity(e.columns.len() + 2);
            cols.push(start.column);
            cols.extend_from_slice(&e.columns);
            cols.push(end.column);
            cols
        })
        .collect();

    let channels = assign_channels(ctx, edges, &columns);

    let mut paths = Vec::with_capacity(edges.len());
    for (i, (start, end)) in anchors.iter().enumerate() {
        let cols = &columns[i];
        let mut pts = vec![start.point];
        pts.push(Point::new(start.column, start.point.y));
        for k in 0..cols.len() - 1 {
            if let Some(y) = channels[i][k] {
                pts.push(Point::new(cols[k], y));
                pts.push(Point::new(cols[k + 1], y));
            }
        }
        pts.push(Point::new(end.column, end.point.y));
        pts.push(end.point);
        paths.push(simplify(pts));
    }
    tracing::debug!(edges = edges.len(), "routed orthogonal edges");
    paths
}

/// Start and end points of ends that are clipped to the outline: they leave through the bottom
/// of the upper node and enter through the top of the lower one, spread along that side.
fn fan_out(ctx: &LayoutContext, edges: &[Prepared]) -> Vec<(Point, Point)> {
    let mut points = vec![(Point::default(), Point::default()); edges.len()];
    let mut groups: IndexMap<(&str, Port), Vec<(usize, f64)>> = IndexMap::new();
    for (i, e) in edges.iter().enumerate() {
        let far_below = e
            .columns
            .first()
            .copied()
            .or_else(|| ctx.g.node(&e.bottom).map(|n| n.x))
            .unwrap_or_default();
        let far_above = e
            .columns
            .last()
            .copied()
            .or_else(|| ctx.g.node(&e.top).map(|n| n.x))
            .unwrap_or_default();
        if e.start == End::Clip {
            groups
                .entry((e.top.as_str(), Port::S))
                .or_default()
                .push((i, far_below));
        }
        if e.end == End::Clip {
            groups
                .entry((e.bottom.as_str(), Port::N))
                .or_default()
                .push((i, far_above));
        }
    }

    for ((node_id, side), mut members) in groups {
        let Some(node) = ctx.g.node(node_id) else {
            continue;
        };
        members.sort_by(|a, b| a.1.total_cmp(&b.1));
        let k = members.len() as f64;
        let spacing = ctx.attrs.edgesep.min(node.size.width / (k + 1.0));
        let (dy, slot) = if side == Port::S {
            (node.size.height, 0)
        } else {
            (-node.size.height, 1)
        };
        for (rank, (i, _)) in members.into_iter().enumerate() {
            let x = node.x + (rank as f64 - (k - 1.0) / 2.0) * spacing;
            let p = port::clip(
                ctx.orientation,
                node,
                Point::new(x, node.y),
                Point::new(x, node.y + dy),
            );
            if slot == 0 {
                points[i].0 = p;
            } else {
                points[i].1 = p;
            }
        }
    }
    points
}

fn anchor(end: &End, fanned: Point, edgesep: f64) -> Anchor {
    match end {
        End::Clip => Anchor {
            point: fanned,
            column: fanned.x,
        },
        End::Fixed(f) => {
            let column = match f.side {
                Port::E => f.point.x + edgesep,
                Port::W => f.point.x - edgesep,
                _ => f.point.x,
            };
            Anchor {
                point: f.point,
                column,
            }
        }
    }
}

/// Channel y for every column switch: `result[edge][k]` is set when the edge moves from
/// `columns[k]` to `columns[k + 1]`.
fn assign_channels(
    ctx: &LayoutContext,
    edges: &[Prepared],
    columns: &[Vec<f64>],
) -> Vec<Vec<Option<f64>>> {
    let mut result: Vec<Vec<Option<f64>>> = columns
        .iter()
        .map(|c| vec![None; c.len().saturating_sub(1)])
        .collect();

    let mut gaps: IndexMap<usize, Vec<(usize, usize, f64, f64)>> = IndexMap::new();
    for (i, e) in edges.iter().enumerate() {
        for (k, pair) in columns[i].windows(2).enumerate() {
            if (pair[0] - pair[1]).abs() > EPS {
                gaps.entry(e.top_rank + k)
                    .or_default()
                    .push((i, k, pair[0], pair[1]));
            }
        }
    }

    let edgesep = ctx.attrs.edgesep;
    for (gap, mut runs) in gaps {
        let (Some(above), Some(below)) = (ctx.ranks.get(gap), ctx.ranks.get(gap + 1)) else {
            continue;
        };
        let (lo, hi) = (above.lower(), below.upper());
        runs.sort_by(|a, b| a.2.total_cmp(&b.2).then(a.3.total_cmp(&b.3)));
        let n = runs.len() as f64;
        let spacing = edgesep.min((hi - lo) / (n + 1.0));
        let mid = (lo + hi) / 2.0;
        for (slot, (i, k, _, _)) in runs.into_iter().enumerate() {
            result[i][k] = Some(mid + (slot as f64 - (n - 1.0) / 2.0) * spacing);
        }
    }
    result
}

/// Drops repeated points and the middle point of straight runs.
fn simplify(points: Vec<Point>) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        if out.last().is_some_and(|q| q.distance(p) < EPS) {
            continue;
        }
        if out.len() >= 2 {
            let a = out[out.len() - 2];
            let b = out[out.len() - 1];
            let vertical = (a.x - b.x).abs() < EPS && (b.x - p.x).abs() < EPS;
            let horizontal = (a.y - b.y).abs() < EPS && (b.y - p.y).abs() < EPS;
            if vertical || horizontal {
                out.pop();
            }
        }
        out.push(p);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simplify_merges_collinear_runs() {
        let pts = vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 5.0),
            Point::new(0.0, 5.0),
            Point::new(0.0, 10.0),
            Point::new(20.0, 10.0),
            Point::new(20.0, 30.0),
        ];
        assert_eq!(
            simplify(pts),
            vec![
                Point::new(0.0, 0.0),
                Point::new(0.0, 10.0),
                Point::new(20.0, 10.0),
                Point::new(20.0, 30.0),
            ]
        );
    }
}
