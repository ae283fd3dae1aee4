use strata::shape::{clip_to_outline, polygon_vertices};
use strata::{Point, ShapeKind, Size};

#[test]
fn containers_enclose_their_content() {
    let inner = Size::new(40.0, 20.0);
    for shape in [
        ShapeKind::Rect,
        ShapeKind::Ellipse,
        ShapeKind::Circle,
        ShapeKind::Diamond,
        ShapeKind::Trapezium,
        ShapeKind::Parallelogram,
        ShapeKind::Polygon(6),
    ] {
        let outer = shape.min_container_size(inner);
        for corner in [
            Point::new(20.0, 10.0),
            Point::new(-20.0, 10.0),
            Point::new(20.0, -10.0),
            Point::new(-20.0, -10.0),
        ] {
            let eased = Point::new(corner.x * 0.999, corner.y * 0.999);
            assert!(shape.contains(outer, eased), "{shape:?} misses {corner:?}");
        }
    }
}

#[test]
fn clipping_stops_on_the_outline() {
    let c = Point::new(100.0, 100.0);
    let size = Size::new(60.0, 40.0);

    let p = clip_to_outline(ShapeKind::Rect, c, size, Point::new(100.0, 300.0));
    assert!((p.x - 100.0).abs() < 1e-6 && (p.y - 120.0).abs() < 1e-3);

    let p = clip_to_outline(ShapeKind::Ellipse, c, size, Point::new(400.0, 100.0));
    assert!((p.x - 130.0).abs() < 1e-3 && (p.y - 100.0).abs() < 1e-6);

    let p = clip_to_outline(ShapeKind::Diamond, c, size, Point::new(200.0, 200.0));
    let rel = Point::new(p.x - c.x, p.y - c.y);
    assert!((rel.x / 30.0 + rel.y / 20.0 - 1.0).abs() < 1e-3);
}

#[test]
fn targets_inside_the_outline_are_kept() {
    let c = Point::new(0.0, 0.0);
    let target = Point::new(5.0, 5.0);
    let p = clip_to_outline(ShapeKind::Rect, c, Size::new(60.0, 40.0), target);
    assert_eq!(p, target);
}

#[test]
fn polygons_start_at_the_top() {
    let v = polygon_vertices(4, Size::new(20.0, 20.0));
    assert_eq!(v.len(), 4);
    assert!((v[0].x).abs() < 1e-9 && (v[0].y + 10.0).abs() < 1e-9);
    assert_eq!(polygon_vertices(1, Size::new(2.0, 2.0)).len(), 3);
}

#[test]
fn points_have_no_label() {
    assert!(!ShapeKind::Point.has_label());
    assert!(ShapeKind::Plaintext.has_label());
    assert_eq!(ShapeKind::Point.default_size(), Size::new(6.0, 6.0));
}
