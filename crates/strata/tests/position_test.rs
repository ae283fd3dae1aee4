use strata::context::LayoutContext;
use strata::{
    Cluster, CoordinateStrategy, DeterministicTextMeasurer, Graph, LayoutOptions, acyclic,
    adapter, collapse, coordinate_system, normalize, order, position,
};

fn positioned(graph: &Graph, strategy: CoordinateStrategy) -> (LayoutContext, CoordinateStrategy) {
    let measurer = DeterministicTextMeasurer::default();
    let options = LayoutOptions {
        coordinate: Some(strategy),
        ..Default::default()
    };
    let mut ctx = adapter::build(graph, &measurer, &options).unwrap();
    coordinate_system::adjust(&mut ctx);
    acyclic::run(&mut ctx.g).unwrap();
    normalize::prepare_label_ranks(&mut ctx).unwrap();
    collapse::run(&mut ctx).unwrap();
    normalize::run(&mut ctx);
    order::run(&mut ctx);
    let used = position::run(&mut ctx).unwrap();
    (ctx, used)
}

fn sample_graph() -> Graph {
    let mut g = Graph::new();
    g.add_node("root").with_label("a fairly wide root label");
    for id in ["a", "b", "c", "d", "e"] {
        g.add_node(id);
    }
    for (id, t, h) in [
        ("ra", "root", "a"),
        ("rb", "root", "b"),
        ("rc", "root", "c"),
        ("ad", "a", "d"),
        ("bd", "b", "d"),
        ("ce", "c", "e"),
        ("re", "root", "e"),
    ] {
        g.add_edge(id, t, h);
    }
    g.add_edge("loop", "b", "b");
    g
}

fn assert_separated(ctx: &LayoutContext) {
    let nodesep = ctx.attrs.nodesep;
    for layer in &ctx.layering {
        for pair in layer.windows(2) {
            let a = ctx.g.node(&pair[0]).unwrap();
            let b = ctx.g.node(&pair[1]).unwrap();
            let needed = a.right_extent() + nodesep + b.left_extent();
            assert!(
                b.x - a.x >= needed - 1e-6,
                "{:?} and {:?} are {} apart, need {needed}",
                pair[0],
                pair[1],
                b.x - a.x
            );
        }
    }
}

fn assert_ranks_share_y(ctx: &LayoutContext) {
    for (r, layer) in ctx.layering.iter().enumerate() {
        for id in layer {
            assert_eq!(ctx.g.node(id).unwrap().y, ctx.ranks[r].y);
        }
    }
    for pair in ctx.ranks.windows(2) {
        assert!(pair[0].lower() < pair[1].upper());
    }
}

#[test]
fn network_simplex_keeps_neighbors_apart() {
    let (ctx, used) = positioned(&sample_graph(), CoordinateStrategy::NetworkSimplex);
    assert_eq!(used, CoordinateStrategy::NetworkSimplex);
    assert_separated(&ctx);
    assert_ranks_share_y(&ctx);
}

#[test]
fn priority_keeps_neighbors_apart() {
    let (ctx, used) = positioned(&sample_graph(), CoordinateStrategy::Priority);
    assert_eq!(used, CoordinateStrategy::Priority);
    assert_separated(&ctx);
    assert_ranks_share_y(&ctx);
}

#[test]
fn a_single_child_is_centered_under_its_parent() {
    let mut g = Graph::new();
    g.add_node("a");
    g.add_node("b");
    g.add_edge("ab", "a", "b");
    for strategy in [CoordinateStrategy::NetworkSimplex, CoordinateStrategy::Priority] {
        let (ctx, _) = positioned(&g, strategy);
        let (a, b) = (ctx.g.node("a").unwrap(), ctx.g.node("b").unwrap());
        assert!((a.x - b.x).abs() < 1e-6, "{strategy:?}: {} vs {}", a.x, b.x);
        assert!(b.y > a.y);
    }
}

#[test]
fn clusters_fall_back_to_network_simplex() {
    let mut g = sample_graph();
    g.add_cluster(Cluster::new("c").with_nodes(["a", "b"]));
    let (ctx, used) = positioned(&g, CoordinateStrategy::Priority);
    assert_eq!(used, CoordinateStrategy::NetworkSimplex);
    assert_separated(&ctx);
}

#[test]
fn cluster_boxes_hold_their_members_with_margin() {
    let mut g = sample_graph();
    g.add_cluster(
        Cluster::new("outer")
            .with_nodes(["c"])
            .with_cluster(Cluster::new("inner").with_nodes(["a", "d"])),
    );
    let (ctx, _) = positioned(&g, CoordinateStrategy::NetworkSimplex);
    for cluster in &ctx.clusters.clusters {
        for id in &cluster.members {
            let r = ctx.g.node(id).unwrap().rect();
            let inner = cluster.rect.inflate(-cluster.margin + 1e-6, -cluster.margin + 1e-6);
            assert!(inner.contains_rect(&r), "{id} escapes {}", cluster.id);
        }
        if let Some(p) = cluster.parent {
            assert!(ctx.clusters.get(p).rect.contains_rect(&cluster.rect));
        }
    }
}
