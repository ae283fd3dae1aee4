use strata::context::{Endpoints, LayoutNode, SelfLoop};
use strata::route::self_loop::{GroupKey, LoopSide, loop_pad, plan_loops, route_loops};
use strata::{Orientation, PathKind, Port, Size, Splines};

fn node_with_loops(loops: Vec<SelfLoop>) -> LayoutNode {
    LayoutNode {
        size: Size::new(54.0, 36.0),
        x: 100.0,
        y: 50.0,
        self_loops: loops,
        ..Default::default()
    }
}

fn self_loop(id: &str, label: Option<Size>) -> SelfLoop {
    SelfLoop {
        id: id.to_string(),
        endpoints: Endpoints::default(),
        label_size: label,
    }
}

fn with_ports(id: &str, tail: Option<Port>, head: Option<Port>) -> SelfLoop {
    SelfLoop {
        id: id.to_string(),
        endpoints: Endpoints {
            tail_port: tail,
            head_port: head,
            ..Default::default()
        },
        label_size: None,
    }
}

#[test]
fn stacked_loops_occupy_disjoint_increasing_bands() {
    let node = node_with_loops(vec![
        self_loop("a", Some(Size::new(20.0, 10.0))),
        self_loop("b", None),
        self_loop("c", Some(Size::new(5.0, 10.0))),
    ]);
    let plans = plan_loops(&node, Orientation::TB, 12.0);
    assert_eq!(plans.len(), 3);
    assert!(plans.iter().all(|p| p.side == LoopSide::Right));

    assert_eq!(plans[0].band, (0.0, 32.0));
    assert_eq!(plans[0].offset, 12.0);
    assert_eq!(plans[1].offset, 44.0);
    for pair in plans.windows(2) {
        assert!(pair[0].band.1 <= pair[1].band.0);
        assert!(pair[0].offset < pair[1].offset);
    }
    for p in &plans {
        assert!(p.band.0 < p.offset && p.offset <= p.band.1);
    }
}

#[test]
fn loop_space_is_reserved_on_the_loop_side() {
    let node = node_with_loops(vec![
        self_loop("a", Some(Size::new(20.0, 60.0))),
        self_loop("b", None),
    ]);
    let plans = plan_loops(&node, Orientation::TB, 12.0);
    let pad = loop_pad(&node, &plans);
    assert_eq!(pad.right, plans[1].band.1);
    assert_eq!(pad.left, 0.0);
    // The 60pt label overhangs the 36pt node by 12 above and below.
    assert_eq!(pad.top, 12.0);
    assert_eq!(pad.bottom, 12.0);
}

#[test]
fn group_key_ignores_direction() {
    let forward = Endpoints {
        tail_port: Some(Port::N),
        head_port: Some(Port::E),
        ..Default::default()
    };
    let backward = Endpoints {
        tail_port: Some(Port::E),
        head_port: Some(Port::N),
        ..Default::default()
    };
    assert_eq!(GroupKey::new(&forward), GroupKey::new(&backward));
    assert_ne!(GroupKey::new(&forward), GroupKey::new(&Endpoints::default()));
}

#[test]
fn ports_choose_the_loop_side() {
    assert_eq!(LoopSide::from_port(Some(Port::N)), LoopSide::Top);
    assert_eq!(LoopSide::from_port(Some(Port::S)), LoopSide::Bottom);
    assert_eq!(LoopSide::from_port(Some(Port::NW)), LoopSide::Left);
    assert_eq!(LoopSide::from_port(None), LoopSide::Right);

    let node = node_with_loops(vec![
        with_ports("top", Some(Port::N), Some(Port::N)),
        with_ports("right", None, None),
    ]);
    let plans = plan_loops(&node, Orientation::TB, 12.0);
    assert_eq!(plans[0].side, LoopSide::Top);
    assert_eq!(plans[1].side, LoopSide::Right);
    // Separate groups on separate sides each start at the border.
    assert_eq!(plans[0].band.0, 0.0);
    assert_eq!(plans[1].band.0, 0.0);
}

#[test]
fn ports_are_read_in_the_drawing_frame() {
    // East in a left-to-right drawing faces the next rank, which is canonical south.
    let node = node_with_loops(vec![with_ports("l", Some(Port::E), None)]);
    let plans = plan_loops(&node, Orientation::LR, 12.0);
    assert_eq!(plans[0].side, LoopSide::Bottom);
}

#[test]
fn spline_loops_start_and_end_on_the_border() {
    let node = node_with_loops(vec![
        self_loop("a", Some(Size::new(20.0, 10.0))),
        self_loop("b", None),
    ]);
    let routed = route_loops(&node, "n", Orientation::TB, 12.0, Splines::Spline);
    assert_eq!(routed.len(), 2);
    let right = node.rect().right;
    for r in &routed {
        assert_eq!(r.kind, PathKind::Bezier);
        assert_eq!(r.points.len(), 4);
        assert_eq!(r.points[0].x, right);
        assert_eq!(r.points[3].x, right);
        assert!(r.points[1].x > right);
        assert_eq!((r.tail.as_str(), r.head.as_str()), ("n", "n"));
    }
    let label = routed[0].label_rect.unwrap();
    assert!(label.left >= right);
    // The second loop clears the first loop's label.
    assert!(routed[1].points[1].x > routed[0].points[1].x);
}

#[test]
fn loops_follow_the_spline_mode() {
    let node = node_with_loops(vec![self_loop("a", None)]);
    let none = route_loops(&node, "n", Orientation::TB, 12.0, Splines::None);
    assert!(none[0].points.is_empty());
    let ortho = route_loops(&node, "n", Orientation::TB, 12.0, Splines::Ortho);
    assert_eq!(ortho[0].kind, PathKind::Polyline);
    let pts = &ortho[0].points;
    assert_eq!(pts.len(), 4);
    for pair in pts.windows(2) {
        assert!(pair[0].x == pair[1].x || pair[0].y == pair[1].y);
    }
    let rounded = route_loops(&node, "n", Orientation::TB, 12.0, Splines::Rounded);
    assert_eq!(rounded[0].kind, PathKind::Bezier);
}
