use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;
use strata::rank::{RankProblem, network_simplex};

fn build_dag_problem(node_count: usize, fanout: usize) -> RankProblem {
    let mut p = RankProblem::new(node_count);

    // A spine to guarantee connectivity.
    for i in 0..node_count.saturating_sub(1) {
        p.add_edge(i, i + 1, 2.0, 1);
    }

    for i in 0..node_count {
        // Extra forward edges to create slack.
        for k in 2..=(fanout + 1) {
            let to = i + k;
            if to >= node_count {
                break;
            }
            p.add_edge(i, to, 1.0, 1);
        }

        // A longer edge that increases slack variation.
        let to = i + 10;
        if to < node_count {
            p.add_edge(i, to, 0.5, 2);
        }
    }
    p
}

fn bench_network_simplex(c: &mut Criterion) {
    let mut group = c.benchmark_group("network_simplex");
    group.measurement_time(Duration::from_secs(10));

    let cases = [
        ("dag_50_f3", 50usize, 3usize),
        ("dag_200_f4", 200usize, 4usize),
        ("dag_400_f4", 400usize, 4usize),
    ];

    for (name, nodes, fanout) in cases {
        let problem = build_dag_problem(nodes, fanout);
        group.bench_with_input(BenchmarkId::new("rank", name), &problem, |b, p| {
            b.iter(|| {
                let solved = network_simplex(black_box(p), 10_000).unwrap();
                black_box(solved.pivots);
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_network_simplex);
criterion_main!(benches);
