//! Scratch state threaded through the layout stages.
//!
//! Everything here is derived from the input graph and rebuilt on every layout call. Geometry is
//! kept in the canonical top-to-bottom frame until the orientation stage maps it out.

use crate::coordinate_system::Orientation;
use crate::geom::{Point, Rect, Size};
use crate::model::{GraphAttrs, LabelJust, LabelLoc, Port};
use crate::options::LayoutOptions;
use crate::shape::ShapeKind;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;

pub type LayoutGraph = strata_graph::Graph<LayoutNode, LayoutEdge>;

pub type ClusterIx = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeKind {
    #[default]
    Real,
    /// Interior point of a long edge.
    Chain,
    /// Interior point of a labeled edge carrying the label box.
    Label,
    /// Placeholder keeping a cluster present on a rank where it has no other node.
    Border,
}

impl NodeKind {
    pub fn is_virtual(self) -> bool {
        self != NodeKind::Real
    }
}

/// Extra space reserved on each side of a node, currently for self-loops.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pad {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

#[derive(Debug, Clone, Default)]
pub struct LayoutNode {
    pub kind: NodeKind,
    pub shape: ShapeKind,
    /// Outline size in the canonical frame.
    pub size: Size,
    /// Outline size in the drawing's frame, used for clipping.
    pub drawn_size: Size,
    pub label_size: Size,
    /// Record cells relative to the node center, canonical frame.
    pub cells: Vec<CellBox>,
    pub rank: i32,
    pub order: usize,
    pub x: f64,
    pub y: f64,
    pub container: Option<ClusterIx>,
    pub self_loops: Vec<SelfLoop>,
    pub loop_pad: Pad,
    /// Input edge a virtual chain or label node belongs to.
    pub edge_id: Option<String>,
    /// Horizontal offset of the edge lane from the node center (label nodes only).
    pub lane_offset: f64,
}

impl LayoutNode {
    pub fn virtual_node(kind: NodeKind, edge_id: Option<String>, rank: i32) -> Self {
        Self {
            kind,
            shape: ShapeKind::Point,
            edge_id,
            rank,
            ..Default::default()
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.center(), self.size)
    }

    /// Extent left of the center, including reserved loop space.
    pub fn left_extent(&self) -> f64 {
        self.size.width / 2.0 + self.loop_pad.left
    }

    pub fn right_extent(&self) -> f64 {
        self.size.width / 2.0 + self.loop_pad.right
    }

    pub fn top_extent(&self) -> f64 {
        self.size.height / 2.0 + self.loop_pad.top
    }

    pub fn bottom_extent(&self) -> f64 {
        self.size.height / 2.0 + self.loop_pad.bottom
    }

    pub fn cell(&self, id: &str) -> Option<&CellBox> {
        self.cells.iter().find(|c| c.id == id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellBox {
    pub id: String,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEdge {
    /// Input edge id. It doubles as the multigraph edge name.
    pub id: String,
    pub weight: f64,
    pub minlen: i32,
    /// Set while the edge points against its input direction.
    pub reversed: bool,
}

impl Default for LayoutEdge {
    fn default() -> Self {
        Self {
            id: String::new(),
            weight: 1.0,
            minlen: 1,
            reversed: false,
        }
    }
}

/// Both ends of an input edge as given by the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Endpoints {
    pub tail_port: Option<Port>,
    pub head_port: Option<Port>,
    pub tail_cell: Option<String>,
    pub head_cell: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelfLoop {
    pub id: String,
    pub endpoints: Endpoints,
    pub label_size: Option<Size>,
}

/// One input edge traced through the layered graph.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeChain {
    pub id: String,
    pub tail: String,
    pub head: String,
    pub endpoints: Endpoints,
    pub label_size: Option<Size>,
    /// Node ids from the top endpoint to the bottom endpoint, virtual nodes in between.
    pub nodes: Vec<String>,
    pub reversed: bool,
    pub label_node: Option<String>,
}

impl EdgeChain {
    pub fn top(&self) -> &str {
        if self.reversed { &self.head } else { &self.tail }
    }

    pub fn bottom(&self) -> &str {
        if self.reversed { &self.tail } else { &self.head }
    }
}

/// Vertical placement of one rank: its center line and the extents of its tallest nodes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RankBand {
    pub y: f64,
    pub top: f64,
    pub bottom: f64,
}

impl RankBand {
    pub fn upper(&self) -> f64 {
        self.y - self.top
    }

    pub fn lower(&self) -> f64 {
        self.y + self.bottom
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClusterNode {
    pub id: String,
    pub parent: Option<ClusterIx>,
    pub children: Vec<ClusterIx>,
    /// Real nodes whose innermost cluster is this one.
    pub members: Vec<String>,
    pub depth: usize,
    pub margin: f64,
    pub label: Option<String>,
    pub label_size: Size,
    pub labelloc: LabelLoc,
    pub labeljust: LabelJust,
    pub min_rank: i32,
    pub max_rank: i32,
    /// Room between the outermost ranks and the top and bottom borders.
    pub pads: (f64, f64),
    pub rect: Rect,
    pub label_rect: Option<Rect>,
}

/// Arena of clusters. Indices are assigned in preorder, so parents precede children.
#[derive(Debug, Clone, Default)]
pub struct ClusterTree {
    pub clusters: Vec<ClusterNode>,
    pub roots: Vec<ClusterIx>,
    pub index: FxHashMap<String, ClusterIx>,
}

impl ClusterTree {
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn get(&self, ix: ClusterIx) -> &ClusterNode {
        &self.clusters[ix]
    }

    pub fn parent(&self, ix: ClusterIx) -> Option<ClusterIx> {
        self.clusters[ix].parent
    }

    pub fn children_of(&self, c: Option<ClusterIx>) -> &[ClusterIx] {
        match c {
            Some(ix) => &self.clusters[ix].children,
            None => &self.roots,
        }
    }

    /// Clusters from the outermost down to `c` itself.
    pub fn path(&self, c: Option<ClusterIx>) -> Vec<ClusterIx> {
        let mut out = Vec::new();
        let mut cur = c;
        while let Some(ix) = cur {
            out.push(ix);
            cur = self.clusters[ix].parent;
        }
        out.reverse();
        out
    }

    pub fn is_within(&self, c: Option<ClusterIx>, ancestor: ClusterIx) -> bool {
        let mut cur = c;
        while let Some(ix) = cur {
            if ix == ancestor {
                return true;
            }
            cur = self.clusters[ix].parent;
        }
        false
    }

    pub fn lca(&self, a: Option<ClusterIx>, b: Option<ClusterIx>) -> Option<ClusterIx> {
        let pa = self.path(a);
        let pb = self.path(b);
        pa.iter()
            .zip(pb.iter())
            .take_while(|(x, y)| x == y)
            .last()
            .map(|(x, _)| *x)
    }

    /// The child of `level` on the way down to `c`, or `None` when `c` is `level` itself.
    ///
    /// `c` must lie within `level` (or anywhere when `level` is the root).
    pub fn child_toward(
        &self,
        level: Option<ClusterIx>,
        c: Option<ClusterIx>,
    ) -> Option<ClusterIx> {
        let path = self.path(c);
        match level {
            None => path.first().copied(),
            Some(l) => {
                let pos = path.iter().position(|&x| x == l)?;
                path.get(pos + 1).copied()
            }
        }
    }

    /// Children before parents.
    pub fn postorder(&self) -> Vec<ClusterIx> {
        let mut out: Vec<ClusterIx> = (0..self.clusters.len()).collect();
        out.sort_by_key(|&c| std::cmp::Reverse(self.clusters[c].depth));
        out
    }
}

pub struct LayoutContext {
    pub g: LayoutGraph,
    pub clusters: ClusterTree,
    /// Canonical-frame copy of the graph attributes, rank separation already adjusted.
    pub attrs: GraphAttrs,
    pub options: LayoutOptions,
    pub orientation: Orientation,
    /// Input edges other than self-loops, in input order.
    pub chains: IndexMap<String, EdgeChain>,
    /// Real node ids in input order.
    pub node_order: Vec<String>,
    /// Self-loop owners in input edge order.
    pub loop_edges: Vec<(String, String)>,
    /// Every input edge id, self-loops included, in input order.
    pub edge_order: Vec<String>,
    pub layering: Vec<Vec<String>>,
    pub ranks: Vec<RankBand>,
    pub graph_label: Option<String>,
    pub graph_label_size: Size,
    pub has_edge_labels: bool,
    next_virtual: usize,
}

impl LayoutContext {
    pub fn new(attrs: GraphAttrs, options: LayoutOptions) -> Self {
        let orientation = Orientation::from(attrs.rankdir);
        Self {
            g: LayoutGraph::new(strata_graph::GraphOptions::multigraph()),
            clusters: ClusterTree::default(),
            attrs,
            options,
            orientation,
            chains: IndexMap::new(),
            node_order: Vec::new(),
            loop_edges: Vec::new(),
            edge_order: Vec::new(),
            layering: Vec::new(),
            ranks: Vec::new(),
            graph_label: None,
            graph_label_size: Size::ZERO,
            has_edge_labels: false,
            next_virtual: 0,
        }
    }

    /// Fresh id for a virtual node. The NUL prefix keeps it apart from caller ids.
    pub fn virtual_id(&mut self, tag: &str) -> String {
        self.next_virtual += 1;
        format!("\u{0}{tag}{}", self.next_virtual)
    }

    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.g.node(id)
    }

    pub fn rank_count(&self) -> usize {
        self.layering.len()
    }

    /// Rebuilds `layering` from node ranks and orders.
    pub fn rebuild_layering(&mut self) {
        let mut max_rank: i32 = -1;
        self.g.for_each_node(|_, n| max_rank = max_rank.max(n.rank));
        let mut layering: Vec<Vec<(usize, String)>> = vec![Vec::new(); (max_rank + 1) as usize];
        self.g.for_each_node(|id, n| {
            if n.rank >= 0 {
                layering[n.rank as usize].push((n.order, id.to_string()));
            }
        });
        self.layering = layering
            .into_iter()
            .map(|mut layer| {
                layer.sort_by_key(|(order, _)| *order);
                layer.into_iter().map(|(_, id)| id).collect()
            })
            .collect();
    }

    /// Writes `order` back onto the nodes of `layering`.
    pub fn apply_layering(&mut self, layering: Vec<Vec<String>>) {
        for layer in &layering {
            for (i, id) in layer.iter().enumerate() {
                if let Some(n) = self.g.node_mut(id) {
                    n.order = i;
                }
            }
        }
        self.layering = layering;
    }
}
