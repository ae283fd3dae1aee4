use strata::{Orientation, Point, Port, Rect, Size, Transform};

const ALL: [Orientation; 4] = [
    Orientation::TB,
    Orientation::BT,
    Orientation::LR,
    Orientation::RL,
];

#[test]
fn invert_undoes_apply() {
    let p = Point::new(3.5, -7.25);
    for o in ALL {
        assert_eq!(o.invert(o.apply(p)), p, "{o:?}");
        assert_eq!(o.apply(o.invert(p)), p, "{o:?}");
    }
}

#[test]
fn canonical_downward_maps_to_the_rank_direction() {
    let down = Point::new(0.0, 1.0);
    assert_eq!(Orientation::TB.apply(down), Point::new(0.0, 1.0));
    assert_eq!(Orientation::BT.apply(down), Point::new(0.0, -1.0));
    assert_eq!(Orientation::LR.apply(down), Point::new(1.0, 0.0));
    assert_eq!(Orientation::RL.apply(down), Point::new(-1.0, 0.0));
}

#[test]
fn ports_facing_the_next_rank_become_south() {
    assert_eq!(Orientation::TB.canonical_port(Port::S), Port::S);
    assert_eq!(Orientation::BT.canonical_port(Port::N), Port::S);
    assert_eq!(Orientation::LR.canonical_port(Port::E), Port::S);
    assert_eq!(Orientation::RL.canonical_port(Port::W), Port::S);
    assert_eq!(Orientation::LR.canonical_port(Port::N), Port::W);
    for o in ALL {
        assert_eq!(o.canonical_port(Port::C), Port::C);
    }
}

#[test]
fn sizes_swap_only_when_ranks_run_sideways() {
    let s = Size::new(40.0, 10.0);
    assert_eq!(Orientation::TB.canonical_size(s), s);
    assert_eq!(Orientation::BT.canonical_size(s), s);
    assert_eq!(Orientation::LR.canonical_size(s), Size::new(10.0, 40.0));
    assert_eq!(Orientation::RL.canonical_size(s), Size::new(10.0, 40.0));
}

#[test]
fn rects_stay_normalized_after_mapping() {
    let r = Rect::new(1.0, 5.0, 2.0, 10.0);
    for o in ALL {
        let m = o.apply_rect(&r);
        assert!(m.left <= m.right && m.top <= m.bottom, "{o:?}");
        assert_eq!(o.invert_rect(&m), r, "{o:?}");
    }
    assert_eq!(
        Orientation::RL.apply_rect(&r),
        Rect::new(-10.0, -2.0, 1.0, 5.0)
    );
}

#[test]
fn transform_translates_after_orienting() {
    let t = Transform {
        orientation: Orientation::LR,
        dx: 10.0,
        dy: 20.0,
    };
    let p = Point::new(1.0, 2.0);
    assert_eq!(t.apply(p), Point::new(12.0, 21.0));
    assert_eq!(t.invert(t.apply(p)), p);
    assert_eq!(
        t.apply_rect(&Rect::new(0.0, 1.0, 0.0, 2.0)),
        Rect::new(10.0, 12.0, 20.0, 21.0)
    );
}
