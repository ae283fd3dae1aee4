//! Self-loop placement.
//!
//! Loops of a node are grouped by their attachment ([`GroupKey`]) in first-seen order. Each group
//! goes on one side of the node, and loops stack outward on that side: loop `i` bulges out to
//! `d_i`, its label sits just beyond the bulge, and the next loop starts `loopsep` further out.
//! The space is reserved on the node before positioning so neighbors keep clear of it.

use super::spline::rounded_corners;
use super::{PathKind, RoutedEdge};
use crate::context::{Endpoints, LayoutContext, LayoutNode, Pad};
use crate::coordinate_system::Orientation;
use crate::geom::{Point, Rect, Size};
use crate::model::{Port, Splines};
use indexmap::IndexMap;

/// Attachment of a loop, equal for both directions of the same endpoint pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    first: (Option<Port>, Option<String>),
    second: (Option<Port>, Option<String>),
}

impl GroupKey {
    pub fn new(endpoints: &Endpoints) -> Self {
        let tail = (endpoints.tail_port, endpoints.tail_cell.clone());
        let head = (endpoints.head_port, endpoints.head_cell.clone());
        if tail <= head {
            Self {
                first: tail,
                second: head,
            }
        } else {
            Self {
                first: head,
                second: tail,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopSide {
    Top,
    Bottom,
    Left,
    Right,
}

impl LoopSide {
    /// Side for a port given in the canonical frame. Loops without a port go right.
    pub fn from_port(port: Option<Port>) -> Self {
        match port {
            Some(Port::N) => LoopSide::Top,
            Some(Port::S) => LoopSide::Bottom,
            Some(Port::W | Port::NW | Port::SW) => LoopSide::Left,
            _ => LoopSide::Right,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Where one loop goes. Distances are measured outward from the node border.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopPlan {
    pub id: String,
    pub side: LoopSide,
    /// Distance from the border to the outermost point of the curve.
    pub offset: f64,
    /// Outward interval `(start, end]` occupied by the loop and its label.
    pub band: (f64, f64),
    pub label_size: Option<Size>,
    pub cell: Option<String>,
}

/// Lays out the loops of `node` side by side. Sizes are canonical.
pub fn plan_loops(node: &LayoutNode, orientation: Orientation, loopsep: f64) -> Vec<LoopPlan> {
    let mut groups: IndexMap<GroupKey, Vec<usize>> = IndexMap::new();
    for (i, l) in node.self_loops.iter().enumerate() {
        groups.entry(GroupKey::new(&l.endpoints)).or_default().push(i);
    }

    let mut outer = [0.0f64; 4];
    let mut plans = Vec::with_capacity(node.self_loops.len());
    for members in groups.values() {
        let Some(first) = members.first().map(|&i| &node.self_loops[i]) else {
            continue;
        };
        let port = first
            .endpoints
            .tail_port
            .filter(|p| *p != Port::C)
            .or(first.endpoints.head_port.filter(|p| *p != Port::C))
            .map(|p| orientation.canonical_port(p));
        let side = LoopSide::from_port(port);
        let cell = first
            .endpoints
            .tail_cell
            .clone()
            .or_else(|| first.endpoints.head_cell.clone());

        for &i in members {
            let l = &node.self_loops[i];
            let extent = match (side, l.label_size) {
                (LoopSide::Left | LoopSide::Right, Some(s)) => s.width,
                (LoopSide::Top | LoopSide::Bottom, Some(s)) => s.height,
                (_, None) => 0.0,
            };
            let start = outer[side.index()];
            let offset = start + loopsep;
            outer[side.index()] = offset + extent;
            plans.push(LoopPlan {
                id: l.id.clone(),
                side,
                offset,
                band: (start, offset + extent),
                label_size: l.label_size,
                cell: cell.clone(),
            });
        }
    }
    plans
}

/// Space the loops of `node` need around its outline.
pub fn loop_pad(node: &LayoutNode, plans: &[LoopPlan]) -> Pad {
    let mut pad = Pad::default();
    let half = Size::new(node.size.width / 2.0, node.size.height / 2.0);
    for p in plans {
        let label = p.label_size.unwrap_or(Size::ZERO);
        match p.side {
            LoopSide::Left | LoopSide::Right => {
                let across = (label.height / 2.0 - half.height).max(0.0);
                pad.top = pad.top.max(across);
                pad.bottom = pad.bottom.max(across);
                if p.side == LoopSide::Left {
                    pad.left = pad.left.max(p.band.1);
                } else {
                    pad.right = pad.right.max(p.band.1);
                }
            }
            LoopSide::Top | LoopSide::Bottom => {
                let across = (label.width / 2.0 - half.width).max(0.0);
                pad.left = pad.left.max(across);
                pad.right = pad.right.max(across);
                if p.side == LoopSide::Top {
                    pad.top = pad.top.max(p.band.1);
                } else {
                    pad.bottom = pad.bottom.max(p.band.1);
                }
            }
        }
    }
    pad
}

/// Reserves loop space on every node that has self-loops.
pub fn reserve(ctx: &mut LayoutContext) {
    let orientation = ctx.orientation;
    let loopsep = ctx.attrs.loopsep;
    let mut reserved = 0usize;
    ctx.g.for_each_node_mut(|_, n| {
        if n.self_loops.is_empty() {
            return;
        }
        let plans = plan_loops(n, orientation, loopsep);
        n.loop_pad = loop_pad(n, &plans);
        reserved += 1;
    });
    if reserved > 0 {
        tracing::debug!(nodes = reserved, "reserved self-loop space");
    }
}

/// Center along the attachment side and half the attachment span.
fn span(node: &LayoutNode, side: LoopSide, cell: Option<&str>) -> (f64, f64) {
    let rect = match cell.map(|c| (c, node.cell(c))) {
        Some((_, Some(cell))) => cell.rect.translate(node.x, node.y),
        Some((id, None)) => {
            tracing::warn!(cell = id, "unknown cell on self-loop; attaching to the whole node");
            node.rect()
        }
        None => node.rect(),
    };
    let c = rect.center();
    match side {
        LoopSide::Left | LoopSide::Right => (c.y, (rect.height() / 4.0).max(1.0)),
        LoopSide::Top | LoopSide::Bottom => (c.x, (rect.width() / 4.0).max(1.0)),
    }
}

/// Routes every self-loop of `node`. Geometry is canonical.
pub fn route_loops(
    node: &LayoutNode,
    node_id: &str,
    orientation: Orientation,
    loopsep: f64,
    splines: Splines,
) -> Vec<RoutedEdge> {
    let r = node.rect();
    plan_loops(node, orientation, loopsep)
        .into_iter()
        .map(|plan| {
            let (mid, a) = span(node, plan.side, plan.cell.as_deref());
            let d = plan.offset;
            // Attachment points and the outward unit normal.
            let (p0, p1, out) = match plan.side {
                LoopSide::Right => (
                    Point::new(r.right, mid - a),
                    Point::new(r.right, mid + a),
                    Point::new(1.0, 0.0),
                ),
                LoopSide::Left => (
                    Point::new(r.left, mid + a),
                    Point::new(r.left, mid - a),
                    Point::new(-1.0, 0.0),
                ),
                LoopSide::Top => (
                    Point::new(mid - a, r.top),
                    Point::new(mid + a, r.top),
                    Point::new(0.0, -1.0),
                ),
                LoopSide::Bottom => (
                    Point::new(mid + a, r.bottom),
                    Point::new(mid - a, r.bottom),
                    Point::new(0.0, 1.0),
                ),
            };
            let push = |p: Point, k: f64| Point::new(p.x + out.x * k, p.y + out.y * k);

            let (kind, points) = match splines {
                Splines::None => (PathKind::Polyline, Vec::new()),
                Splines::Spline => (
                    PathKind::Bezier,
                    // Controls at 4d/3 put the apex of the curve at d.
                    vec![p0, push(p0, 4.0 * d / 3.0), push(p1, 4.0 * d / 3.0), p1],
                ),
                Splines::Rounded => {
                    let corners = [p0, push(p0, d), push(p1, d), p1];
                    (PathKind::Bezier, rounded_corners(&corners, d / 2.0))
                }
                Splines::Line | Splines::Polyline | Splines::Ortho => {
                    (PathKind::Polyline, vec![p0, push(p0, d), push(p1, d), p1])
                }
            };

            let label_rect = plan.label_size.map(|s| {
                let apex = push(p0.lerp(p1, 0.5), d);
                match plan.side {
                    LoopSide::Right => Rect::new(
                        apex.x,
                        apex.x + s.width,
                        apex.y - s.height / 2.0,
                        apex.y + s.height / 2.0,
                    ),
                    LoopSide::Left => Rect::new(
                        apex.x - s.width,
                        apex.x,
                        apex.y - s.height / 2.0,
                        apex.y + s.height / 2.0,
                    ),
                    LoopSide::Top => Rect::new(
                        apex.x - s.width / 2.0,
                        apex.x + s.width / 2.0,
                        apex.y - s.height,
                        apex.y,
                    ),
                    LoopSide::Bottom => Rect::new(
                        apex.x - s.width / 2.0,
                        apex.x + s.width / 2.0,
                        apex.y,
                        apex.y + s.height,
                    ),
                }
            });

            RoutedEdge {
                id: plan.id,
                tail: node_id.to_string(),
                head: node_id.to_string(),
                reversed: false,
                kind,
                points,
                label_rect,
            }
        })
        .collect()
}
