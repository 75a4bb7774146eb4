use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use territory_analyzer::{gather_effective_permissions, Hierarchy};
use territory_core::PermissionKind;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn regions(node: usize, n: usize) -> Vec<String> {
    // Half the regions are shared across every node, half are unique.
    (0..n)
        .map(|j| {
            if j % 2 == 0 {
                format!("SHARED-{j}")
            } else {
                format!("R{node}-{j}")
            }
        })
        .collect()
}

/// `depth` distributors linked in a single chain.
fn chain(depth: usize, rules_per_node: usize) -> Hierarchy {
    let mut h = Hierarchy::new();
    for i in 0..depth {
        let name = format!("d{i}");
        h.create_distributor(&name).unwrap();
        // Link before adding rules so overlapping includes are not refused.
        if i > 0 {
            h.link_distributors(&format!("d{}", i - 1), &name).unwrap();
        }
        let kind = if i % 3 == 0 {
            PermissionKind::Exclude
        } else {
            PermissionKind::Include
        };
        h.add_permissions(&name, kind, regions(i, rules_per_node))
            .unwrap();
    }
    h
}

/// One root with `width` direct children.
fn fan_out(width: usize, rules_per_node: usize) -> Hierarchy {
    let mut h = Hierarchy::new();
    h.create_distributor("root").unwrap();
    for i in 0..width {
        let name = format!("c{i}");
        h.create_distributor(&name).unwrap();
        h.add_permissions(&name, PermissionKind::Include, regions(i, rules_per_node))
            .unwrap();
        h.link_distributors("root", &name).unwrap();
    }
    h
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_chain");
    for depth in [10, 100, 1_000] {
        let h = chain(depth, 16);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &h, |b, h| {
            b.iter(|| gather_effective_permissions(black_box(h), "d0").unwrap())
        });
    }
    group.finish();
}

fn bench_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_fan_out");
    for width in [10, 100, 1_000] {
        let h = fan_out(width, 16);
        group.bench_with_input(BenchmarkId::from_parameter(width), &h, |b, h| {
            b.iter(|| gather_effective_permissions(black_box(h), "root").unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_chain, bench_fan_out);
criterion_main!(benches);
