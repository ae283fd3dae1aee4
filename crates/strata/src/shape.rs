//! Node outline geometry.
//!
//! Every shape answers two questions: how large must the outline be to enclose a centered
//! content box, and does a point (relative to the node center) fall inside the outline. Edge
//! endpoints are clipped against the latter.

use crate::geom::{Point, Size};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, SQRT_2};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rect,
    #[default]
    Ellipse,
    Circle,
    Diamond,
    Trapezium,
    Parallelogram,
    /// Regular polygon with the given number of sides, first vertex on top.
    Polygon(u32),
    Point,
    Plaintext,
}

impl ShapeKind {
    /// Size used when neither the node nor any template sets one.
    pub fn default_size(self) -> Size {
        match self {
            ShapeKind::Point => Size::new(6.0, 6.0),
            ShapeKind::Circle => Size::new(36.0, 36.0),
            _ => Size::new(54.0, 36.0),
        }
    }

    /// Whether the node label is drawn inside the outline.
    pub fn has_label(self) -> bool {
        !matches!(self, ShapeKind::Point)
    }

    /// Smallest outline of this shape that encloses a centered box of size `inner`.
    pub fn min_container_size(self, inner: Size) -> Size {
        let Size { width: w, height: h } = inner;
        match self {
            ShapeKind::Rect | ShapeKind::Plaintext => inner,
            ShapeKind::Ellipse => Size::new(w * SQRT_2, h * SQRT_2),
            ShapeKind::Circle => {
                let d = w.hypot(h);
                Size::new(d, d)
            }
            ShapeKind::Diamond => Size::new(w * 2.0, h * 2.0),
            ShapeKind::Trapezium | ShapeKind::Parallelogram => Size::new(w + h * 2.0 / 3.0, h),
            ShapeKind::Polygon(sides) => {
                let k = SQRT_2 / (PI / f64::from(sides.max(3))).cos();
                Size::new(w * k, h * k)
            }
            ShapeKind::Point => Size::ZERO,
        }
    }

    /// `p` is relative to the node center; `size` is the full outline size.
    pub fn contains(self, size: Size, p: Point) -> bool {
        let a = size.width / 2.0;
        let b = size.height / 2.0;
        if a <= 0.0 || b <= 0.0 {
            return p.x == 0.0 && p.y == 0.0;
        }
        match self {
            ShapeKind::Rect | ShapeKind::Plaintext => p.x.abs() <= a && p.y.abs() <= b,
            ShapeKind::Ellipse | ShapeKind::Point => (p.x / a).powi(2) + (p.y / b).powi(2) <= 1.0,
            ShapeKind::Circle => {
                let r = a.min(b);
                p.x.hypot(p.y) <= r
            }
            ShapeKind::Diamond => p.x.abs() / a + p.y.abs() / b <= 1.0,
            ShapeKind::Trapezium => {
                if p.y.abs() > b {
                    return false;
                }
                // 0 on the top edge, 1 on the bottom edge.
                let t = (p.y + b) / size.height;
                let half = a - size.height / 3.0 * (1.0 - t);
                p.x.abs() <= half
            }
            ShapeKind::Parallelogram => {
                if p.y.abs() > b {
                    return false;
                }
                let skew = size.height / 3.0;
                let t = (p.y + b) / size.height;
                let left = -a + skew * (1.0 - t);
                let right = a - skew * t;
                p.x >= left && p.x <= right
            }
            ShapeKind::Polygon(sides) => point_in_convex(&polygon_vertices(sides, size), p),
        }
    }
}

/// Vertices of a regular polygon inscribed in the ellipse of `size`, clockwise from the top.
pub fn polygon_vertices(sides: u32, size: Size) -> Vec<Point> {
    let n = sides.max(3);
    (0..n)
        .map(|k| {
            let theta = -PI / 2.0 + 2.0 * PI * f64::from(k) / f64::from(n);
            Point::new(
                size.width / 2.0 * theta.cos(),
                size.height / 2.0 * theta.sin(),
            )
        })
        .collect()
}

fn point_in_convex(vertices: &[Point], p: Point) -> bool {
    let mut sign = 0.0f64;
    for (i, a) in vertices.iter().enumerate() {
        let b = vertices[(i + 1) % vertices.len()];
        let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
        if cross.abs() < 1e-9 {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    true
}

/// Point where the segment from the node center toward `target` leaves the outline.
///
/// Coordinates are absolute. When `target` lies inside the outline it is returned unchanged.
pub fn clip_to_outline(shape: ShapeKind, center: Point, size: Size, target: Point) -> Point {
    clip_segment(shape, center, size, center, target)
}

/// Point where the segment from `inside` toward `target` leaves the outline centered at `center`.
pub fn clip_segment(
    shape: ShapeKind,
    center: Point,
    size: Size,
    inside: Point,
    target: Point,
) -> Point {
    let rel = |p: Point| Point::new(p.x - center.x, p.y - center.y);
    if shape.contains(size, rel(target)) {
        return target;
    }
    let (mut lo, mut hi) = (0.0f64, 1.0f64);
    for _ in 0..40 {
        let mid = (lo + hi) / 2.0;
        if shape.contains(size, rel(inside.lerp(target, mid))) {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo < 1e-6 {
            break;
        }
    }
    inside.lerp(target, lo)
}
