use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;
use strata::{
    Cluster, CoordinateStrategy, DeterministicTextMeasurer, Graph, LayoutOptions, Splines,
    layout_with_options,
};

/// Layered DAG with cross edges between neighboring columns and one cluster per ten nodes.
fn build_graph(node_count: usize, with_clusters: bool) -> Graph {
    let mut g = Graph::new();
    for i in 0..node_count {
        g.add_node(format!("n{i}"));
    }
    for i in 0..node_count {
        for step in [3, 4, 7] {
            let to = i + step;
            if to < node_count {
                g.add_edge(format!("e{i}_{to}"), format!("n{i}"), format!("n{to}"));
            }
        }
    }
    if with_clusters {
        for c in 0..node_count / 10 {
            let members: Vec<String> = (c * 10..c * 10 + 4).map(|i| format!("n{i}")).collect();
            g.add_cluster(Cluster::new(format!("c{c}")).with_nodes(members));
        }
    }
    g
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    group.measurement_time(Duration::from_secs(10));
    let measurer = DeterministicTextMeasurer::default();

    let cases = [
        ("flat_60", 60usize, false, Splines::Spline),
        ("flat_60_ortho", 60usize, false, Splines::Ortho),
        ("clusters_60", 60usize, true, Splines::Spline),
        ("flat_200", 200usize, false, Splines::Spline),
    ];

    for (name, nodes, clusters, splines) in cases {
        let mut g = build_graph(nodes, clusters);
        g.attrs.splines = splines;
        for strategy in [CoordinateStrategy::NetworkSimplex, CoordinateStrategy::Priority] {
            let options = LayoutOptions {
                coordinate: Some(strategy),
                ..Default::default()
            };
            let id = BenchmarkId::new(format!("{strategy:?}"), name);
            group.bench_with_input(id, &g, |b, g| {
                b.iter(|| {
                    let l = layout_with_options(black_box(g), &measurer, &options).unwrap();
                    black_box(l.edges.len());
                })
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_layout);
criterion_main!(benches);
