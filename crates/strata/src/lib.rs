//! Layered (Sugiyama-style) graph layout.
//!
//! Ranks, orders, positions and routes the nodes, edges and clusters of an attributed directed
//! graph. See [`layout`] for the entry point.
#![forbid(unsafe_code)]

pub use strata_graph as graphlib;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod acyclic;
pub mod adapter;
pub mod collapse;
pub mod context;
pub mod coordinate_system;
pub mod error;
pub mod geom;
pub mod model;
pub mod normalize;
pub mod options;
pub mod order;
pub mod output;
pub mod pipeline;
pub mod position;
pub mod rank;
pub mod route;
pub mod shape;
pub mod text;

pub use adapter::MAX_MINLEN;
pub use coordinate_system::{Orientation, Transform};
pub use error::{Error, Result};
pub use geom::{Point, Rect, Size};
pub use model::{
    Attrs, Cell, Cluster, ClusterAttrs, Edge, EdgeAttrs, Font, Graph, GraphAttrs, LabelJust,
    LabelLoc, Node, NodeAttrs, Port, RankDir, Splines, merge_defaults,
};
pub use options::{
    CoordinateStrategy, LayoutOptions, default_coordinate_strategy,
    set_default_coordinate_strategy,
};
pub use output::{ClusterLayout, EdgeLayout, EdgePath, GraphLayout, Layout, NodeLayout, PathKind};
pub use pipeline::{layout, layout_with_options};
pub use shape::ShapeKind;
pub use text::{DeterministicTextMeasurer, TextMeasurer};
