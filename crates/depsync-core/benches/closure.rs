use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use depsync_core::graph::{ReverseDependencyMap, TransitiveDependencyMap};
use depsync_core::model::{Label, TargetInfo, TargetMap};

const SIZES: [usize; 3] = [100, 1_000, 10_000];

/// A layered graph: every target depends on up to three targets in the next
/// layer, so closures grow with depth and share most of their members.
fn layered(size: usize) -> TargetMap {
    const WIDTH: usize = 50;
    let mut map = TargetMap::new();
    for i in 0..size {
        let next = (i / WIDTH + 1) * WIDTH;
        let deps: Vec<Label> = (0..3)
            .map(|k| next + (i + k * 7) % WIDTH)
            .filter(|&j| j < size)
            .map(|j| Label::new(format!("//t{j}")))
            .collect();
        map.insert(format!("//t{i}"), TargetInfo::with_deps(deps));
    }
    map
}

fn bench_reverse_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph.reverse_build");
    for size in SIZES {
        let map = layered(size);
        group.throughput(Throughput::Elements(map.edge_count() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &map, |b, map| {
            b.iter(|| black_box(ReverseDependencyMap::build(map).len()));
        });
    }
    group.finish();
}

fn bench_closure_cold(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph.closure_cold");
    for size in SIZES {
        let map = layered(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &map, |b, map| {
            b.iter(|| {
                let tdm = TransitiveDependencyMap::new(map.clone());
                black_box(tdm.transitive_dependencies("//t0").len())
            });
        });
    }
    group.finish();
}

fn bench_closure_cached(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph.closure_cached");
    for size in SIZES {
        let tdm = TransitiveDependencyMap::new(layered(size));
        let _ = tdm.transitive_dependencies("//t0");
        group.bench_with_input(BenchmarkId::from_parameter(size), &tdm, |b, tdm| {
            b.iter(|| black_box(tdm.transitive_dependencies("//t0").len()));
        });
    }
    group.finish();
}

fn bench_has_transitive_dependency(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph.has_transitive_dependency");
    for size in SIZES {
        let tdm = TransitiveDependencyMap::new(layered(size));
        let target = format!("//t{}", size - 1);
        group.bench_with_input(BenchmarkId::from_parameter(size), &tdm, |b, tdm| {
            b.iter(|| black_box(tdm.has_transitive_dependency("//t0", &target)));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_reverse_build,
    bench_closure_cold,
    bench_closure_cached,
    bench_has_transitive_dependency
);
criterion_main!(benches);
