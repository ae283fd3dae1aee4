//! Edge attachment: compass ports, record cells and outline clipping.

use crate::context::{LayoutContext, LayoutNode};
use crate::coordinate_system::Orientation;
use crate::geom::{Point, Rect};
use crate::model::Port;
use crate::shape;
use indexmap::IndexMap;

/// Borders closer than this count as touching.
const TOUCH_EPS: f64 = 0.01;

/// Ports a cell offers to edges that name the cell but no port.
///
/// The pool holds the sides of the cell that lie on the node border, in the order west, east,
/// north, south. A cell inside the node touches no border and offers all four sides. Picks cycle
/// through the pool, so consecutive edges on one cell spread over its sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortPool {
    ports: Vec<Port>,
    pos: usize,
}

impl PortPool {
    pub fn new(cell: &Rect, node: &Rect) -> Self {
        let touches = |a: f64, b: f64| (a - b).abs() <= TOUCH_EPS;
        let mut ports = Vec::with_capacity(4);
        if touches(cell.left, node.left) {
            ports.push(Port::W);
        }
        if touches(cell.right, node.right) {
            ports.push(Port::E);
        }
        if touches(cell.top, node.top) {
            ports.push(Port::N);
        }
        if touches(cell.bottom, node.bottom) {
            ports.push(Port::S);
        }
        if ports.is_empty() {
            ports = vec![Port::W, Port::E, Port::N, Port::S];
        }
        Self { ports, pos: 0 }
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// Ports in cycle order, starting at the next one to be handed out.
    pub fn iter(&self) -> impl Iterator<Item = Port> + '_ {
        let n = self.ports.len();
        (0..n).map(move |i| self.ports[(self.pos + i) % n])
    }

    pub fn next_port(&mut self) -> Port {
        let port = self.ports[self.pos];
        self.pos = (self.pos + 1) % self.ports.len();
        port
    }

    /// `facing` when the pool offers it, otherwise the next port in the cycle.
    pub fn pick(&mut self, facing: Port) -> Port {
        match self.ports.iter().position(|&p| p == facing) {
            Some(i) => {
                self.pos = (i + 1) % self.ports.len();
                facing
            }
            None => self.next_port(),
        }
    }
}

/// Compass point on the border of `rect`.
pub fn port_point(rect: &Rect, port: Port) -> Point {
    let (dx, dy) = port.direction();
    let c = rect.center();
    Point::new(
        c.x + f64::from(dx) * rect.width() / 2.0,
        c.y + f64::from(dy) * rect.height() / 2.0,
    )
}

/// Side of a box at `from` that faces `toward`.
pub fn facing_side(from: Point, toward: Point) -> Port {
    let (dx, dy) = (toward.x - from.x, toward.y - from.y);
    if dy.abs() >= dx.abs() {
        if dy >= 0.0 { Port::S } else { Port::N }
    } else if dx > 0.0 {
        Port::E
    } else {
        Port::W
    }
}

/// Point where the segment from `inside` toward `target` leaves the outline of `node`.
///
/// Outlines are tested in the drawing's frame, where the shape has its declared proportions.
pub fn clip(orientation: Orientation, node: &LayoutNode, inside: Point, target: Point) -> Point {
    let o = orientation;
    let p = shape::clip_segment(
        node.shape,
        o.apply(node.center()),
        node.drawn_size,
        o.apply(inside),
        o.apply(target),
    );
    o.invert(p)
}

/// How one end of an edge meets its node.
#[derive(Debug, Clone, PartialEq)]
pub enum End {
    /// No port or cell: the end is clipped to the outline once the path is known.
    Clip,
    Fixed(Fixed),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fixed {
    pub point: Point,
    pub side: Port,
    /// Box the port point lies on: the cell, or the node itself.
    pub rect: Rect,
    pub cell: Option<String>,
}

impl Fixed {
    /// Whether the port sits on the node outline rather than on a cell.
    pub fn on_outline(&self) -> bool {
        self.cell.is_none()
    }
}

/// Resolves ports and cells, keeping one [`PortPool`] per cell across all edges.
pub struct Attacher<'a> {
    ctx: &'a LayoutContext,
    pools: IndexMap<(String, String), PortPool>,
}

impl<'a> Attacher<'a> {
    pub fn new(ctx: &'a LayoutContext) -> Self {
        Self {
            ctx,
            pools: IndexMap::new(),
        }
    }

    /// Attachment of an edge end on `node_id`. `port` is given in the drawing's frame and
    /// `toward` is the next point of the path.
    pub fn resolve(
        &mut self,
        node_id: &str,
        port: Option<Port>,
        cell: Option<&str>,
        toward: Point,
    ) -> End {
        let Some(node) = self.ctx.g.node(node_id) else {
            return End::Clip;
        };
        let port = port
            .filter(|p| *p != Port::C)
            .map(|p| self.ctx.orientation.canonical_port(p));
        let cell_rect = cell.and_then(|id| match node.cell(id) {
            Some(c) => Some((id, c.rect.translate(node.x, node.y))),
            None => {
                tracing::warn!(
                    node = node_id,
                    cell = id,
                    "unknown cell; attaching to the whole node"
                );
                None
            }
        });

        match (port, cell_rect) {
            (Some(side), Some((id, rect))) => End::Fixed(Fixed {
                point: port_point(&rect, side),
                side,
                rect,
                cell: Some(id.to_string()),
            }),
            (Some(side), None) => {
                let rect = node.rect();
                let on_box = port_point(&rect, side);
                End::Fixed(Fixed {
                    point: clip(self.ctx.orientation, node, node.center(), on_box),
                    side,
                    rect,
                    cell: None,
                })
            }
            (None, Some((id, rect))) => {
                let node_rect = node.rect();
                let pool = self
                    .pools
                    .entry((node_id.to_string(), id.to_string()))
                    .or_insert_with(|| PortPool::new(&rect, &node_rect));
                let side = pool.pick(facing_side(rect.center(), toward));
                End::Fixed(Fixed {
                    point: port_point(&rect, side),
                    side,
                    rect,
                    cell: Some(id.to_string()),
                })
            }
            (None, None) => End::Clip,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_of_a_full_cell_cycles_through_all_sides() {
        let node = Rect::new(-1.0, 1.0, -1.0, 1.0);
        let mut pool = PortPool::new(&node, &node);
        assert_eq!(pool.len(), 4);
        assert_eq!(pool.next_port(), Port::W);
        assert_eq!(
            pool.iter().collect::<Vec<_>>(),
            vec![Port::E, Port::N, Port::S, Port::W]
        );
        assert_eq!(pool.next_port(), Port::E);
        assert_eq!(pool.next_port(), Port::N);
        assert_eq!(
            pool.iter().collect::<Vec<_>>(),
            vec![Port::S, Port::W, Port::E, Port::N]
        );
    }

    #[test]
    fn pick_prefers_the_facing_side() {
        let node = Rect::new(-10.0, 10.0, -5.0, 5.0);
        let bottom_row = Rect::new(-10.0, 10.0, 0.0, 5.0);
        let mut pool = PortPool::new(&bottom_row, &node);
        assert_eq!(
            pool.iter().collect::<Vec<_>>(),
            vec![Port::W, Port::E, Port::S]
        );
        assert_eq!(pool.pick(Port::S), Port::S);
        assert_eq!(pool.pick(Port::S), Port::S);
        // North is not on the node border, so the cycle continues after south.
        assert_eq!(pool.pick(Port::N), Port::W);
    }

    #[test]
    fn facing_side_follows_the_dominant_axis() {
        let o = Point::new(0.0, 0.0);
        assert_eq!(facing_side(o, Point::new(3.0, 10.0)), Port::S);
        assert_eq!(facing_side(o, Point::new(3.0, -10.0)), Port::N);
        assert_eq!(facing_side(o, Point::new(10.0, 3.0)), Port::E);
        assert_eq!(facing_side(o, Point::new(-10.0, 3.0)), Port::W);
    }

    #[test]
    fn port_points_lie_on_the_box() {
        let r = Rect::new(0.0, 20.0, 0.0, 10.0);
        assert_eq!(port_point(&r, Port::N), Point::new(10.0, 0.0));
        assert_eq!(port_point(&r, Port::SE), Point::new(20.0, 10.0));
        assert_eq!(port_point(&r, Port::C), Point::new(10.0, 5.0));
    }
}
