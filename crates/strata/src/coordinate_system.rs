//! Orientation handling.
//!
//! The pipeline always lays out top-to-bottom. Before positioning, sizes and port directions are
//! brought into that canonical frame; after routing, every piece of geometry is mapped to the
//! requested orientation exactly once.

use crate::context::LayoutContext;
use crate::geom::{Point, Rect, Size};
use crate::model::{LabelLoc, Port, RankDir};
use serde::Serialize;

/// Linear map from the canonical frame to the drawing's frame.
///
/// `TB: (x, y)`, `BT: (x, -y)`, `LR: (y, x)`, `RL: (-y, x)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Orientation {
    #[default]
    TB,
    BT,
    LR,
    RL,
}

impl From<RankDir> for Orientation {
    fn from(dir: RankDir) -> Self {
        match dir {
            RankDir::TB => Orientation::TB,
            RankDir::BT => Orientation::BT,
            RankDir::LR => Orientation::LR,
            RankDir::RL => Orientation::RL,
        }
    }
}

impl Orientation {
    pub fn swaps_axes(self) -> bool {
        matches!(self, Orientation::LR | Orientation::RL)
    }

    pub fn apply(self, p: Point) -> Point {
        match self {
            Orientation::TB => p,
            Orientation::BT => Point::new(p.x, -p.y),
            Orientation::LR => Point::new(p.y, p.x),
            Orientation::RL => Point::new(-p.y, p.x),
        }
    }

    pub fn invert(self, p: Point) -> Point {
        match self {
            Orientation::TB => p,
            Orientation::BT => Point::new(p.x, -p.y),
            Orientation::LR => Point::new(p.y, p.x),
            Orientation::RL => Point::new(p.y, -p.x),
        }
    }

    pub fn apply_rect(self, r: &Rect) -> Rect {
        Rect::from_corners(
            self.apply(Point::new(r.left, r.top)),
            self.apply(Point::new(r.right, r.bottom)),
        )
    }

    pub fn invert_rect(self, r: &Rect) -> Rect {
        Rect::from_corners(
            self.invert(Point::new(r.left, r.top)),
            self.invert(Point::new(r.right, r.bottom)),
        )
    }

    /// Canonical size of a box given in the drawing's frame.
    pub fn canonical_size(self, s: Size) -> Size {
        if self.swaps_axes() { s.transposed() } else { s }
    }

    /// Canonical side that ends up at `loc` (the drawing's top or bottom edge) once mapped out.
    pub fn label_side(self, loc: LabelLoc) -> Side {
        let drawn_top = match self {
            Orientation::TB => Side::Top,
            Orientation::BT => Side::Bottom,
            Orientation::LR | Orientation::RL => Side::Left,
        };
        match loc {
            LabelLoc::Top => drawn_top,
            LabelLoc::Bottom => drawn_top.opposite(),
        }
    }

    /// Canonical direction of a compass port given in the drawing's frame.
    pub fn canonical_port(self, port: Port) -> Port {
        let (dx, dy) = port.direction();
        let p = self.invert(Point::new(f64::from(dx), f64::from(dy)));
        Port::from_direction(p.x as i8, p.y as i8)
    }
}

/// Side of a box in the canonical frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Top and bottom sides run along the x axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::Top | Side::Bottom)
    }
}

/// Full output transform: orientation followed by a translation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Transform {
    pub orientation: Orientation,
    pub dx: f64,
    pub dy: f64,
}

impl Transform {
    pub fn apply(&self, p: Point) -> Point {
        let q = self.orientation.apply(p);
        Point::new(q.x + self.dx, q.y + self.dy)
    }

    pub fn invert(&self, p: Point) -> Point {
        self.orientation
            .invert(Point::new(p.x - self.dx, p.y - self.dy))
    }

    pub fn apply_rect(&self, r: &Rect) -> Rect {
        self.orientation.apply_rect(r).translate(self.dx, self.dy)
    }
}

/// Brings node, cell and label geometry into the canonical frame.
pub fn adjust(ctx: &mut LayoutContext) {
    let orientation = ctx.orientation;
    let size = |s: Size| orientation.canonical_size(s);
    ctx.g.for_each_node_mut(|_, n| {
        n.size = size(n.size);
        n.label_size = size(n.label_size);
        for cell in &mut n.cells {
            cell.rect = orientation.invert_rect(&cell.rect);
        }
        for loop_edge in &mut n.self_loops {
            loop_edge.label_size = loop_edge.label_size.map(size);
        }
    });
    for chain in ctx.chains.values_mut() {
        chain.label_size = chain.label_size.map(size);
    }
    for c in &mut ctx.clusters.clusters {
        c.label_size = size(c.label_size);
    }
    ctx.graph_label_size = size(ctx.graph_label_size);
}
