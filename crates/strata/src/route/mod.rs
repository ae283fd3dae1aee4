//! Edge routing.
//!
//! Every input edge is traced through its virtual chain from the top endpoint to the bottom one,
//! attached to ports, cells or the node outline, and turned into a path of the requested kind.
//! Paths are produced in the canonical frame and handed back in the input edge's direction.

pub mod ortho;
pub mod port;
pub mod self_loop;
pub mod spline;

use crate::context::{EdgeChain, LayoutContext, NodeKind};
use crate::geom::{Point, Rect};
use crate::model::{Port, Splines};
use crate::output::PathKind;
use indexmap::IndexMap;
use port::{Attacher, End};
use rustc_hash::{FxHashMap, FxHashSet};

/// A routed edge in the canonical frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedEdge {
    pub id: String,
    pub tail: String,
    pub head: String,
    pub reversed: bool,
    pub kind: PathKind,
    /// Runs from the tail to the head.
    pub points: Vec<Point>,
    pub label_rect: Option<Rect>,
}

/// An edge between ranks, ready for path construction. Runs top to bottom.
#[derive(Debug, Clone)]
struct Prepared {
    id: String,
    top: String,
    bottom: String,
    top_rank: usize,
    start: End,
    end: End,
    /// Interior points of the path, two per label node (above and below the label).
    waypoints: Vec<Point>,
    /// Indices into `waypoints` where a straight lane beside a label begins.
    lanes: Vec<usize>,
    /// One x per interior rank, where the edge crosses that rank.
    columns: Vec<f64>,
    label_rect: Option<Rect>,
    /// Sideways shift of clipped ends, set for parallel edges.
    offset: f64,
}

/// Routes every edge, self-loops included, in input order.
pub fn run(ctx: &LayoutContext) -> Vec<RoutedEdge> {
    let splines = ctx.attrs.splines;
    let mut attacher = Attacher::new(ctx);
    let mut prepared: Vec<Prepared> = ctx
        .chains
        .values()
        .filter_map(|chain| prepare(ctx, &mut attacher, chain))
        .collect();
    spread_shared(ctx, &mut prepared);
    fan_parallel(ctx, &mut prepared);

    let paths: Vec<(PathKind, Vec<Point>)> = match splines {
        Splines::Ortho => ortho::route(ctx, &prepared)
            .into_iter()
            .map(|pts| (PathKind::Polyline, pts))
            .collect(),
        Splines::Rounded => ortho::route(ctx, &prepared)
            .into_iter()
            .map(|pts| {
                (
                    PathKind::Bezier,
                    spline::rounded_corners(&pts, ctx.attrs.edgesep),
                )
            })
            .collect(),
        _ => prepared.iter().map(|p| free_path(ctx, p, splines)).collect(),
    };

    let mut routed: FxHashMap<String, RoutedEdge> = FxHashMap::default();
    for (p, (kind, mut points)) in prepared.into_iter().zip(paths) {
        let Some(chain) = ctx.chains.get(&p.id) else {
            continue;
        };
        if chain.reversed {
            points.reverse();
        }
        routed.insert(
            p.id.clone(),
            RoutedEdge {
                id: p.id,
                tail: chain.tail.clone(),
                head: chain.head.clone(),
                reversed: chain.reversed,
                kind,
                points,
                label_rect: p.label_rect,
            },
        );
    }

    let mut loop_owners: FxHashSet<&str> = FxHashSet::default();
    for (_, owner) in &ctx.loop_edges {
        if !loop_owners.insert(owner.as_str()) {
            continue;
        }
        let Some(node) = ctx.g.node(owner) else {
            continue;
        };
        for edge in self_loop::route_loops(
            node,
            owner,
            ctx.orientation,
            ctx.attrs.loopsep,
            splines,
        ) {
            routed.insert(edge.id.clone(), edge);
        }
    }

    let edges: Vec<RoutedEdge> = ctx
        .edge_order
        .iter()
        .filter_map(|id| routed.remove(id))
        .collect();
    tracing::debug!(edges = edges.len(), ?splines, "routed edges");
    edges
}

fn prepare(
    ctx: &LayoutContext,
    attacher: &mut Attacher<'_>,
    chain: &EdgeChain,
) -> Option<Prepared> {
    let top = ctx.g.node(chain.top())?;
    let bottom = ctx.g.node(chain.bottom())?;
    let ep = &chain.endpoints;
    let ((top_port, top_cell), (bottom_port, bottom_cell)) = if chain.reversed {
        ((ep.head_port, &ep.head_cell), (ep.tail_port, &ep.tail_cell))
    } else {
        ((ep.tail_port, &ep.tail_cell), (ep.head_port, &ep.head_cell))
    };

    let mut waypoints = Vec::new();
    let mut lanes = Vec::new();
    let mut columns = Vec::new();
    let mut label_rect = None;
    let interior = chain
        .nodes
        .get(1..chain.nodes.len().saturating_sub(1))
        .unwrap_or(&[]);
    for id in interior {
        let Some(v) = ctx.g.node(id) else {
            continue;
        };
        if v.kind == NodeKind::Label {
            let x = v.x + v.lane_offset;
            let half = v.size.height / 2.0;
            lanes.push(waypoints.len());
            waypoints.push(Point::new(x, v.y - half));
            waypoints.push(Point::new(x, v.y + half));
            columns.push(x);
            label_rect = Some(Rect::from_center(
                Point::new(v.x + ctx.attrs.edgesep / 2.0, v.y),
                v.label_size,
            ));
        } else {
            waypoints.push(v.center());
            columns.push(v.x);
        }
    }

    let start = attacher.resolve(
        chain.top(),
        top_port,
        top_cell.as_deref(),
        waypoints.first().copied().unwrap_or(bottom.center()),
    );
    let end = attacher.resolve(
        chain.bottom(),
        bottom_port,
        bottom_cell.as_deref(),
        waypoints.last().copied().unwrap_or(top.center()),
    );

    Some(Prepared {
        id: chain.id.clone(),
        top: chain.top().to_string(),
        bottom: chain.bottom().to_string(),
        top_rank: usize::try_from(top.rank).unwrap_or(0),
        start,
        end,
        waypoints,
        lanes,
        columns,
        label_rect,
        offset: 0.0,
    })
}

/// Point the path leaves (or reaches) next, seen from one end.
fn next_point(ctx: &LayoutContext, p: &Prepared, from_start: bool) -> Point {
    let (wp, other, other_id) = if from_start {
        (p.waypoints.first(), &p.end, &p.bottom)
    } else {
        (p.waypoints.last(), &p.start, &p.top)
    };
    if let Some(&w) = wp {
        return w;
    }
    match other {
        End::Fixed(f) => f.point,
        End::Clip => ctx
            .g
            .node(other_id)
            .map(|n| Point::new(n.x + p.offset, n.y))
            .unwrap_or_default(),
    }
}

/// Spreads edges that share a port (or cell side) along that side, `edgesep` apart.
fn spread_shared(ctx: &LayoutContext, prepared: &mut [Prepared]) {
    let mut groups: IndexMap<(String, Port, Option<String>), Vec<(usize, bool, f64)>> =
        IndexMap::new();
    for (i, p) in prepared.iter().enumerate() {
        for from_start in [true, false] {
            let (end, node) = if from_start {
                (&p.start, &p.top)
            } else {
                (&p.end, &p.bottom)
            };
            let End::Fixed(f) = end else {
                continue;
            };
            if !matches!(f.side, Port::N | Port::S | Port::E | Port::W) {
                continue;
            }
            let far = next_point(ctx, p, from_start);
            let key = if along_x(f.side) { far.x } else { far.y };
            groups
                .entry((node.clone(), f.side, f.cell.clone()))
                .or_default()
                .push((i, from_start, key));
        }
    }

    let edgesep = ctx.attrs.edgesep;
    for ((node_id, side, _), mut members) in groups {
        if members.len() < 2 {
            continue;
        }
        members.sort_by(|a, b| a.2.total_cmp(&b.2));
        let k = members.len() as f64;
        for (rank, (i, from_start, _)) in members.into_iter().enumerate() {
            let p = &mut prepared[i];
            let End::Fixed(f) = (if from_start { &mut p.start } else { &mut p.end }) else {
                continue;
            };
            let half = 0.9
                * if along_x(side) {
                    f.rect.width() / 2.0
                } else {
                    f.rect.height() / 2.0
                };
            let shift = fan_offset(rank, k, edgesep, half);
            let c = f.rect.center();
            let (on_side, inward) = if along_x(side) {
                (
                    Point::new(f.point.x + shift, f.point.y),
                    Point::new(f.point.x + shift, c.y),
                )
            } else {
                (
                    Point::new(f.point.x, f.point.y + shift),
                    Point::new(c.x, f.point.y + shift),
                )
            };
            f.point = match (f.on_outline(), ctx.g.node(&node_id)) {
                (true, Some(node)) => {
                    let (dx, dy) = side.direction();
                    let beyond = Point::new(
                        on_side.x + f64::from(dx) * f.rect.width(),
                        on_side.y + f64::from(dy) * f.rect.height(),
                    );
                    port::clip(ctx.orientation, node, inward, beyond)
                }
                _ => on_side,
            };
        }
    }
}

/// Offset of member `rank` out of `k` spread symmetrically within `[-half, half]`.
///
/// Members are `edgesep` apart when that fits, otherwise the spacing shrinks so every member keeps
/// its own offset.
fn fan_offset(rank: usize, k: f64, edgesep: f64, half: f64) -> f64 {
    if k < 2.0 {
        return 0.0;
    }
    let spacing = edgesep.min(2.0 * half / (k - 1.0));
    (rank as f64 - (k - 1.0) / 2.0) * spacing
}

fn along_x(side: Port) -> bool {
    matches!(side, Port::N | Port::S)
}

/// Offsets rank-adjacent edges between the same two nodes so they run side by side.
fn fan_parallel(ctx: &LayoutContext, prepared: &mut [Prepared]) {
    let mut groups: IndexMap<(&str, &str), Vec<usize>> = IndexMap::new();
    for (i, p) in prepared.iter().enumerate() {
        if p.waypoints.is_empty() && p.start == End::Clip && p.end == End::Clip {
            groups
                .entry((p.top.as_str(), p.bottom.as_str()))
                .or_default()
                .push(i);
        }
    }
    let mut shifts = Vec::new();
    for ((top, bottom), members) in &groups {
        if members.len() < 2 {
            continue;
        }
        let (Some(t), Some(b)) = (ctx.g.node(top), ctx.g.node(bottom)) else {
            continue;
        };
        let half = 0.9 * t.size.width.min(b.size.width) / 2.0;
        let k = members.len() as f64;
        for (rank, &i) in members.iter().enumerate() {
            shifts.push((i, fan_offset(rank, k, ctx.attrs.edgesep, half)));
        }
    }
    for (i, shift) in shifts {
        prepared[i].offset = shift;
    }
}

/// Line, polyline and spline paths through the waypoints.
fn free_path(ctx: &LayoutContext, p: &Prepared, splines: Splines) -> (PathKind, Vec<Point>) {
    if splines == Splines::None {
        return (PathKind::Polyline, Vec::new());
    }
    let (Some(top), Some(bottom)) = (ctx.g.node(&p.top), ctx.g.node(&p.bottom)) else {
        return (PathKind::Polyline, Vec::new());
    };
    // Straight lines still detour through the lane beside a label.
    let through = !(splines == Splines::Line && p.label_rect.is_none());
    let mids: &[Point] = if through { &p.waypoints } else { &[] };

    let top_inside = Point::new(top.x + p.offset, top.y);
    let bottom_inside = Point::new(bottom.x + p.offset, bottom.y);
    let end_anchor = match &p.end {
        End::Fixed(f) => f.point,
        End::Clip => bottom_inside,
    };
    let start = match &p.start {
        End::Fixed(f) => f.point,
        End::Clip => port::clip(
            ctx.orientation,
            top,
            top_inside,
            mids.first().copied().unwrap_or(end_anchor),
        ),
    };
    let end = match &p.end {
        End::Fixed(f) => f.point,
        End::Clip => port::clip(
            ctx.orientation,
            bottom,
            bottom_inside,
            mids.last().copied().unwrap_or(start),
        ),
    };

    let mut points = Vec::with_capacity(mids.len() + 2);
    points.push(start);
    points.extend_from_slice(mids);
    points.push(end);

    match splines {
        Splines::Spline => {
            let mut straight = vec![false; points.len() - 1];
            if through {
                for &lane in &p.lanes {
                    straight[lane + 1] = true;
                }
            }
            (PathKind::Bezier, spline::catmull_rom(&points, &straight))
        }
        _ => (PathKind::Polyline, points),
    }
}
