//! Layout result.
//!
//! Everything here is in the drawing's frame: the orientation has been applied and the graph box
//! starts at `(0, 0)`. [`Layout::transform`] maps canonical coordinates to this frame.

use crate::context::LayoutContext;
use crate::coordinate_system::{Side, Transform};
use crate::geom::{Point, Rect, bounds_of};
use crate::options::CoordinateStrategy;
use crate::position::{label_run, place_label};
use crate::route::RoutedEdge;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PathKind {
    /// Straight segments between consecutive points.
    #[default]
    Polyline,
    /// Cubic Bézier segments: `p0 c1 c2 p1 c1 c2 p2 ...`.
    Bezier,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EdgePath {
    pub kind: PathKind,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeLayout {
    pub id: String,
    pub rank: i32,
    pub order: usize,
    pub rect: Rect,
    pub label_rect: Option<Rect>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeLayout {
    pub id: String,
    pub tail: String,
    pub head: String,
    /// The edge was drawn against the rank direction to break a cycle.
    pub reversed: bool,
    pub path: EdgePath,
    pub label_rect: Option<Rect>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterLayout {
    pub id: String,
    pub parent: Option<String>,
    pub rect: Rect,
    pub label_rect: Option<Rect>,
    pub min_rank: i32,
    pub max_rank: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphLayout {
    pub rect: Rect,
    pub label_rect: Option<Rect>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    /// Real nodes in input order.
    pub nodes: Vec<NodeLayout>,
    /// Edges in input order, self-loops included.
    pub edges: Vec<EdgeLayout>,
    /// Clusters in preorder.
    pub clusters: Vec<ClusterLayout>,
    pub graph: GraphLayout,
    pub transform: Transform,
    /// Strategy the x coordinates were computed with.
    pub coordinate_strategy: CoordinateStrategy,
}

impl Layout {
    pub fn node(&self, id: &str) -> Option<&NodeLayout> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&EdgeLayout> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn cluster(&self, id: &str) -> Option<&ClusterLayout> {
        self.clusters.iter().find(|c| c.id == id)
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Canonical box around everything drawn.
fn content_bounds(ctx: &LayoutContext, edges: &[RoutedEdge]) -> Rect {
    let mut rects: Vec<Rect> = Vec::new();
    for id in &ctx.node_order {
        if let Some(n) = ctx.g.node(id) {
            rects.push(n.rect());
        }
    }
    for c in &ctx.clusters.clusters {
        rects.push(c.rect);
        rects.extend(c.label_rect);
    }
    for e in edges {
        rects.extend(bounds_of(&e.points));
        rects.extend(e.label_rect);
    }
    rects
        .into_iter()
        .reduce(|a, b| a.union(&b))
        .unwrap_or_default()
}

/// Graph box and label box, canonical. The label gets a band of its own along the edge that
/// becomes the drawing's top or bottom, and the box grows to fit it.
fn graph_box(ctx: &LayoutContext, content: Rect) -> (Rect, Option<Rect>) {
    let margin = ctx.attrs.margin;
    let mut rect = content.inflate(margin, margin);
    if ctx.graph_label.is_none() {
        return (rect, None);
    }
    let (orientation, loc) = (ctx.orientation, ctx.attrs.labelloc);
    let s = ctx.graph_label_size;
    let side = orientation.label_side(loc);
    let run = label_run(orientation, loc, s, margin);
    if side.is_horizontal() && rect.width() < run {
        let grow = (run - rect.width()) / 2.0;
        rect.left -= grow;
        rect.right += grow;
    } else if !side.is_horizontal() && rect.height() < run {
        let grow = (run - rect.height()) / 2.0;
        rect.top -= grow;
        rect.bottom += grow;
    }
    match side {
        Side::Top => rect.top -= s.height,
        Side::Bottom => rect.bottom += s.height,
        Side::Left => rect.left -= s.width,
        Side::Right => rect.right += s.width,
    }
    let label = place_label(orientation, &rect, s, loc, ctx.attrs.labeljust, margin);
    (rect, Some(label))
}

/// Maps the routed, positioned context into the drawing's frame.
pub fn build(ctx: &LayoutContext, edges: Vec<RoutedEdge>, strategy: CoordinateStrategy) -> Layout {
    let (graph_rect, graph_label) = graph_box(ctx, content_bounds(ctx, &edges));
    let drawn = ctx.orientation.apply_rect(&graph_rect);
    let transform = Transform {
        orientation: ctx.orientation,
        dx: -drawn.left,
        dy: -drawn.top,
    };
    let map_rect = |r: &Rect| transform.apply_rect(r);

    let nodes = ctx
        .node_order
        .iter()
        .filter_map(|id| {
            let n = ctx.g.node(id)?;
            let label_rect = (n.shape.has_label() && !n.label_size.is_empty())
                .then(|| map_rect(&Rect::from_center(n.center(), n.label_size)));
            Some(NodeLayout {
                id: id.clone(),
                rank: n.rank,
                order: n.order,
                rect: map_rect(&n.rect()),
                label_rect,
            })
        })
        .collect();

    let edges = edges
        .into_iter()
        .map(|e| EdgeLayout {
            id: e.id,
            tail: e.tail,
            head: e.head,
            reversed: e.reversed,
            path: EdgePath {
                kind: e.kind,
                points: e.points.iter().map(|&p| transform.apply(p)).collect(),
            },
            label_rect: e.label_rect.as_ref().map(map_rect),
        })
        .collect();

    let clusters = ctx
        .clusters
        .clusters
        .iter()
        .map(|c| ClusterLayout {
            id: c.id.clone(),
            parent: c.parent.map(|p| ctx.clusters.get(p).id.clone()),
            rect: map_rect(&c.rect),
            label_rect: c.label_rect.as_ref().map(map_rect),
            min_rank: c.min_rank,
            max_rank: c.max_rank,
        })
        .collect();

    Layout {
        nodes,
        edges,
        clusters,
        graph: GraphLayout {
            rect: map_rect(&graph_rect),
            label_rect: graph_label.as_ref().map(map_rect),
        },
        transform,
        coordinate_strategy: strategy,
    }
}
