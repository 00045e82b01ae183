//! Benchmarks for patch tessellation and mesh refinement.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use patchwork::algo::subdivide::compute_refinement_points;
use patchwork::patch::{control, tessellate};
use patchwork::prelude::*;

fn bench_tessellation(c: &mut Criterion) {
    let grid = control::bump(0.75);
    let mut group = c.benchmark_group("tessellate_64");

    for strategy in [EvalStrategy::Bernstein, EvalStrategy::DeCasteljau] {
        let options = TessellateOptions::new(64).with_strategy(strategy);
        group.bench_with_input(BenchmarkId::from_parameter(strategy), &options, |b, options| {
            b.iter(|| tessellate(&grid, options).unwrap());
        });
    }

    group.finish();
}

fn bench_refinement(c: &mut Criterion) {
    c.bench_function("refinement_points_cube_x3", |b| {
        let mut mesh: HalfEdgeMesh = patchwork::mesh::primitives::cube().unwrap();
        catmull_clark_subdivide(&mut mesh, &SubdivideOptions::new(3)).unwrap();

        b.iter(|| compute_refinement_points(&mesh).unwrap());
    });

    c.bench_function("catmull_clark_cube_x3", |b| {
        let base: HalfEdgeMesh = patchwork::mesh::primitives::cube().unwrap();
        let options = SubdivideOptions::new(3).with_verify(false);

        b.iter(|| {
            let mut mesh = base.clone();
            catmull_clark_subdivide(&mut mesh, &options).unwrap();
            mesh
        });
    });

    c.bench_function("catmull_clark_grid_20", |b| {
        let base: HalfEdgeMesh = patchwork::mesh::primitives::quad_grid(20).unwrap();

        b.iter(|| {
            let mut mesh = base.clone();
            catmull_clark_refine(&mut mesh).unwrap();
            mesh
        });
    });
}

criterion_group!(benches, bench_tessellation, bench_refinement);
criterion_main!(benches);
