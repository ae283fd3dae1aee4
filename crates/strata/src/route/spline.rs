//! Cubic curve builders.
//!
//! Paths are emitted as Bézier control sequences `p0 c1 c2 p1 c1 c2 p2 ...`.

use crate::geom::Point;

/// Control distance ratio of a cubic quarter circle.
const KAPPA: f64 = 0.552_284_749_8;

fn sub(a: Point, b: Point) -> Point {
    Point::new(a.x - b.x, a.y - b.y)
}

fn add_scaled(p: Point, d: Point, k: f64) -> Point {
    Point::new(p.x + d.x * k, p.y + d.y * k)
}

fn unit(d: Point) -> Point {
    let len = d.x.hypot(d.y);
    if len == 0.0 {
        Point::default()
    } else {
        Point::new(d.x / len, d.y / len)
    }
}

/// Straight cubic from `a` to `b`, without the start point.
fn push_line(out: &mut Vec<Point>, a: Point, b: Point) {
    out.push(a.lerp(b, 1.0 / 3.0));
    out.push(a.lerp(b, 2.0 / 3.0));
    out.push(b);
}

/// Catmull-Rom curve through `points`, converted to cubic Bézier segments.
///
/// `straight[i]` keeps the segment from `points[i]` to `points[i + 1]` a straight line; the curve
/// meets such a segment tangentially on both ends.
pub fn catmull_rom(points: &[Point], straight: &[bool]) -> Vec<Point> {
    let n = points.len();
    if n < 2 {
        return points.to_vec();
    }
    let is_straight = |i: usize| straight.get(i).copied().unwrap_or(false);

    let tangents: Vec<Point> = (0..n)
        .map(|i| {
            let prev = points[i.saturating_sub(1)];
            let next = points[(i + 1).min(n - 1)];
            let spread = if i == 0 || i == n - 1 {
                sub(next, prev)
            } else {
                Point::new((next.x - prev.x) / 2.0, (next.y - prev.y) / 2.0)
            };
            let along = if i > 0 && is_straight(i - 1) {
                Some(sub(points[i], points[i - 1]))
            } else if i + 1 < n && is_straight(i) {
                Some(sub(points[i + 1], points[i]))
            } else {
                None
            };
            match along {
                Some(d) => {
                    let len = spread.x.hypot(spread.y);
                    let u = unit(d);
                    Point::new(u.x * len, u.y * len)
                }
                None => spread,
            }
        })
        .collect();

    let mut out = Vec::with_capacity(3 * n - 2);
    out.push(points[0]);
    for i in 0..n - 1 {
        let (a, b) = (points[i], points[i + 1]);
        if is_straight(i) {
            push_line(&mut out, a, b);
        } else {
            out.push(add_scaled(a, tangents[i], 1.0 / 3.0));
            out.push(add_scaled(b, tangents[i + 1], -1.0 / 3.0));
            out.push(b);
        }
    }
    out
}

/// Polyline with every corner replaced by a quarter-circle arc of at most `radius`.
///
/// The radius is clamped to half of each adjacent segment, so neighboring arcs never overlap.
pub fn rounded_corners(points: &[Point], radius: f64) -> Vec<Point> {
    let Some(&first) = points.first() else {
        return Vec::new();
    };
    let mut out = vec![first];
    if points.len() == 1 {
        return out;
    }
    let mut cur = first;
    for w in points.windows(3) {
        let (a, p, b) = (w[0], w[1], w[2]);
        let (la, lb) = (a.distance(p), p.distance(b));
        if la == 0.0 || lb == 0.0 {
            continue;
        }
        let r = radius.min(la / 2.0).min(lb / 2.0);
        let start = p.lerp(a, r / la);
        let end = p.lerp(b, r / lb);
        push_line(&mut out, cur, start);
        out.push(start.lerp(p, KAPPA));
        out.push(end.lerp(p, KAPPA));
        out.push(end);
        cur = end;
    }
    if let Some(&last) = points.last() {
        push_line(&mut out, cur, last);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_points_give_one_straight_segment() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(0.0, 30.0);
        let curve = catmull_rom(&[a, b], &[false]);
        assert_eq!(curve.len(), 4);
        assert_eq!(curve[0], a);
        assert_eq!(curve[3], b);
        assert!(curve.iter().all(|p| p.x == 0.0));
    }

    #[test]
    fn curve_passes_through_every_point() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(20.0, 40.0),
            Point::new(0.0, 80.0),
        ];
        let curve = catmull_rom(&pts, &[false, false]);
        assert_eq!(curve.len(), 7);
        assert_eq!(curve[3], pts[1]);
        assert_eq!(curve[6], pts[2]);
    }

    #[test]
    fn straight_segment_keeps_its_controls_on_the_line() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 40.0),
            Point::new(10.0, 60.0),
            Point::new(0.0, 100.0),
        ];
        let curve = catmull_rom(&pts, &[false, true, false]);
        // Segment 1 spans curve[3..=6].
        assert!(curve[4].x == 10.0 && curve[5].x == 10.0);
        // Neighbors meet it vertically.
        assert!((curve[2].x - 10.0).abs() < 1e-9);
        assert!((curve[7].x - 10.0).abs() < 1e-9);
    }

    #[test]
    fn rounded_corner_stays_within_half_segments() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(40.0, 10.0),
        ];
        let curve = rounded_corners(&pts, 100.0);
        assert_eq!(curve.len(), 10);
        assert_eq!(curve[3], Point::new(0.0, 5.0));
        assert_eq!(curve[6], Point::new(5.0, 10.0));
        assert_eq!(curve[9], Point::new(40.0, 10.0));
    }
}
