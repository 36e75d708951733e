//! Propagation throughput benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use vecta_core::graph::{Graph, NodeId, NodeKind};
use vecta_core::value::Point;
use vecta_core::{SceneConfig, UnitCircle};

/// A chain of `n` scalar nodes, each adding one to its predecessor.
fn chain(n: usize) -> (Graph, NodeId) {
    let mut graph = Graph::new();
    let root = graph.add_node(NodeKind::Source, 0.0);
    let mut prev = root;
    for _ in 0..n {
        let node = graph.add_node(NodeKind::Derived, 0.0);
        graph.add_dependency(node, prev).unwrap();
        let input = prev;
        graph
            .set_update(node, move |value, inputs| {
                *value = (inputs.scalar(input)? + 1.0).into();
                Ok(())
            })
            .unwrap();
        prev = node;
    }
    (graph, root)
}

fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain");

    for n in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("set_value", n), &n, |b, &n| {
            let (mut graph, root) = chain(n);
            let mut x = 0.0;
            b.iter(|| {
                x += 1.0;
                graph.set_value(root, black_box(x)).unwrap();
            });
        });
    }

    group.finish();
}

fn bench_unit_circle(c: &mut Criterion) {
    let mut group = c.benchmark_group("unit_circle");

    group.bench_function("set_angle", |b| {
        let mut scene = UnitCircle::new(SceneConfig::default()).unwrap();
        let mut theta = 0.0;
        b.iter(|| {
            theta = (theta + 0.01) % std::f64::consts::TAU;
            scene.set_angle(black_box(theta)).unwrap();
        });
    });

    group.bench_function("drag_control", |b| {
        let mut scene = UnitCircle::new(SceneConfig::default()).unwrap();
        let r = scene.radius();
        let mut theta: f64 = 0.0;
        b.iter(|| {
            theta += 0.01;
            let p = Point::new(r * theta.cos(), -r * theta.sin());
            scene.drag_control(black_box(p)).unwrap();
        });
    });

    group.bench_function("build", |b| {
        b.iter(|| UnitCircle::new(black_box(SceneConfig::default())).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_chain, bench_unit_circle);
criterion_main!(benches);
