//! Attributed input graph.
//!
//! The caller owns this model; layout reads it and never writes back. Attributes that may be
//! inherited are `Option`s and are resolved with [`merge_defaults`]: node attributes fall back to
//! the innermost enclosing cluster's template, then outer cluster templates, then the graph
//! template, then the built-in defaults.

use crate::geom::{Rect, Size};
use crate::shape::ShapeKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RankDir {
    #[default]
    TB,
    BT,
    LR,
    RL,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Splines {
    None,
    Line,
    Polyline,
    #[default]
    Spline,
    Ortho,
    Rounded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelLoc {
    #[default]
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelJust {
    Left,
    #[default]
    Center,
    Right,
}

/// Compass attachment point on a node or cell box.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Port {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
    #[default]
    C,
}

impl Port {
    /// Clockwise from north; the center port is last.
    pub const ALL: [Port; 9] = [
        Port::N,
        Port::NE,
        Port::E,
        Port::SE,
        Port::S,
        Port::SW,
        Port::W,
        Port::NW,
        Port::C,
    ];

    /// Direction as `(dx, dy)` with components in `{-1, 0, 1}`; `y` grows downward.
    pub fn direction(self) -> (i8, i8) {
        match self {
            Port::N => (0, -1),
            Port::NE => (1, -1),
            Port::E => (1, 0),
            Port::SE => (1, 1),
            Port::S => (0, 1),
            Port::SW => (-1, 1),
            Port::W => (-1, 0),
            Port::NW => (-1, -1),
            Port::C => (0, 0),
        }
    }

    pub fn from_direction(dx: i8, dy: i8) -> Port {
        Port::ALL
            .into_iter()
            .find(|p| p.direction() == (dx.signum(), dy.signum()))
            .unwrap_or(Port::C)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub name: String,
    pub size: f64,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            name: "Times-Roman".to_string(),
            size: 14.0,
        }
    }
}

/// A record sub-rectangle of a node, relative to the node center in the drawing's orientation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub id: String,
    pub rect: Rect,
}

/// Per-field inheritance for attribute sets.
pub trait Attrs: Clone {
    /// Values used when neither the element nor any template sets a field.
    fn builtin() -> Self;

    /// Fills every unset field of `self` from `fallback`.
    fn or(self, fallback: &Self) -> Self;
}

/// Resolves `attrs` against the enclosing template, then the global defaults.
pub fn merge_defaults<A: Attrs>(attrs: &A, parent_template: &A, global_defaults: &A) -> A {
    attrs.clone().or(parent_template).or(global_defaults)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeAttrs {
    pub label: Option<String>,
    pub shape: Option<ShapeKind>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub fixed_size: Option<bool>,
    /// Space between the label and the outline, per axis.
    pub margin: Option<Size>,
    pub font: Option<Font>,
}

impl Attrs for NodeAttrs {
    fn builtin() -> Self {
        Self {
            label: None,
            shape: Some(ShapeKind::Ellipse),
            width: None,
            height: None,
            fixed_size: Some(false),
            margin: Some(Size::new(8.0, 4.0)),
            font: Some(Font::default()),
        }
    }

    fn or(self, fallback: &Self) -> Self {
        Self {
            label: self.label.or_else(|| fallback.label.clone()),
            shape: self.shape.or(fallback.shape),
            width: self.width.or(fallback.width),
            height: self.height.or(fallback.height),
            fixed_size: self.fixed_size.or(fallback.fixed_size),
            margin: self.margin.or(fallback.margin),
            font: self.font.or_else(|| fallback.font.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EdgeAttrs {
    pub label: Option<String>,
    pub font: Option<Font>,
    pub weight: Option<f64>,
    pub minlen: Option<u32>,
}

impl Attrs for EdgeAttrs {
    fn builtin() -> Self {
        Self {
            label: None,
            font: Some(Font::default()),
            weight: Some(1.0),
            minlen: Some(1),
        }
    }

    fn or(self, fallback: &Self) -> Self {
        Self {
            label: self.label.or_else(|| fallback.label.clone()),
            font: self.font.or_else(|| fallback.font.clone()),
            weight: self.weight.or(fallback.weight),
            minlen: self.minlen.or(fallback.minlen),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClusterAttrs {
    pub label: Option<String>,
    pub font: Option<Font>,
    pub margin: Option<f64>,
    pub labelloc: Option<LabelLoc>,
    pub labeljust: Option<LabelJust>,
}

impl Attrs for ClusterAttrs {
    fn builtin() -> Self {
        Self {
            label: None,
            font: Some(Font::default()),
            margin: Some(8.0),
            labelloc: Some(LabelLoc::Top),
            labeljust: Some(LabelJust::Center),
        }
    }

    fn or(self, fallback: &Self) -> Self {
        Self {
            label: self.label.or_else(|| fallback.label.clone()),
            font: self.font.or_else(|| fallback.font.clone()),
            margin: self.margin.or(fallback.margin),
            labelloc: self.labelloc.or(fallback.labelloc),
            labeljust: self.labeljust.or(fallback.labeljust),
        }
    }
}

/// Graph-wide layout settings. Lengths are in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GraphAttrs {
    pub rankdir: RankDir,
    pub splines: Splines,
    /// Minimum gap between neighbors in a rank.
    pub nodesep: f64,
    /// Gap between consecutive ranks.
    pub ranksep: f64,
    /// Gap between parallel or fanned-out edges.
    pub edgesep: f64,
    /// Base outward step between stacked self-loops.
    pub loopsep: f64,
    /// Space around the whole drawing.
    pub margin: f64,
    pub label: Option<String>,
    pub font: Font,
    pub labelloc: LabelLoc,
    pub labeljust: LabelJust,
}

impl Default for GraphAttrs {
    fn default() -> Self {
        Self {
            rankdir: RankDir::TB,
            splines: Splines::Spline,
            nodesep: 18.0,
            ranksep: 36.0,
            edgesep: 10.0,
            loopsep: 12.0,
            margin: 8.0,
            label: None,
            font: Font::default(),
            labelloc: LabelLoc::Bottom,
            labeljust: LabelJust::Center,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub cells: Vec<Cell>,
    pub attrs: NodeAttrs,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_label(&mut self, label: impl Into<String>) -> &mut Self {
        self.attrs.label = Some(label.into());
        self
    }

    pub fn with_shape(&mut self, shape: ShapeKind) -> &mut Self {
        self.attrs.shape = Some(shape);
        self
    }

    pub fn with_size(&mut self, width: f64, height: f64) -> &mut Self {
        self.attrs.width = Some(width);
        self.attrs.height = Some(height);
        self
    }

    pub fn with_cell(&mut self, id: impl Into<String>, rect: Rect) -> &mut Self {
        self.cells.push(Cell {
            id: id.into(),
            rect,
        });
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub tail: String,
    pub head: String,
    pub tail_port: Option<Port>,
    pub head_port: Option<Port>,
    pub tail_cell: Option<String>,
    pub head_cell: Option<String>,
    pub attrs: EdgeAttrs,
}

impl Edge {
    pub fn new(id: impl Into<String>, tail: impl Into<String>, head: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tail: tail.into(),
            head: head.into(),
            ..Default::default()
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.tail == self.head
    }

    pub fn with_label(&mut self, label: impl Into<String>) -> &mut Self {
        self.attrs.label = Some(label.into());
        self
    }

    pub fn with_ports(&mut self, tail: Option<Port>, head: Option<Port>) -> &mut Self {
        self.tail_port = tail;
        self.head_port = head;
        self
    }

    pub fn with_cells(
        &mut self,
        tail: Option<impl Into<String>>,
        head: Option<impl Into<String>>,
    ) -> &mut Self {
        self.tail_cell = tail.map(Into::into);
        self.head_cell = head.map(Into::into);
        self
    }

    pub fn with_weight(&mut self, weight: f64) -> &mut Self {
        self.attrs.weight = Some(weight);
        self
    }

    pub fn with_minlen(&mut self, minlen: u32) -> &mut Self {
        self.attrs.minlen = Some(minlen);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Cluster {
    pub id: String,
    /// Direct members. A node listed here and in a nested cluster belongs to the nested one.
    pub nodes: Vec<String>,
    pub clusters: Vec<Cluster>,
    pub attrs: ClusterAttrs,
    pub node_defaults: NodeAttrs,
    pub edge_defaults: EdgeAttrs,
}

impl Cluster {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_nodes<I, S>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nodes.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn with_cluster(mut self, cluster: Cluster) -> Self {
        self.clusters.push(cluster);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.attrs.label = Some(label.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Graph {
    pub attrs: GraphAttrs,
    pub node_defaults: NodeAttrs,
    pub edge_defaults: EdgeAttrs,
    pub cluster_defaults: ClusterAttrs,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub clusters: Vec<Cluster>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn add_node(&mut self, id: impl Into<String>) -> &mut Node {
        self.nodes.push(Node::new(id));
        let last = self.nodes.len() - 1;
        &mut self.nodes[last]
    }

    pub fn add_edge(
        &mut self,
        id: impl Into<String>,
        tail: impl Into<String>,
        head: impl Into<String>,
    ) -> &mut Edge {
        self.edges.push(Edge::new(id, tail, head));
        let last = self.edges.len() - 1;
        &mut self.edges[last]
    }

    pub fn add_cluster(&mut self, cluster: Cluster) -> &mut Self {
        self.clusters.push(cluster);
        self
    }

    /// Rejects inputs the layout cannot accept. See [`crate::Error`] for the cases.
    pub fn validate(&self) -> crate::Result<()> {
        crate::adapter::validate(self)
    }
}
