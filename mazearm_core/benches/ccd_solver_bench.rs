// Benchmark for CCD solver performance
// Run with: cargo bench --bench ccd_solver_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mazearm_core::{CcdSolver, KinematicChain};
use nalgebra::Point3;

fn benchmark_ccd_two_link(c: &mut Criterion) {
    let solver = CcdSolver::default();
    let target = Point3::new(1.0, 0.0, 0.5);

    c.bench_function("ccd_solver_two_link", |b| {
        b.iter(|| {
            let mut chain = KinematicChain::planar(&[1.0, 0.8]);
            black_box(solver.solve(&mut chain, black_box(&target)))
        });
    });
}

fn benchmark_ccd_six_axis(c: &mut Criterion) {
    let solver = CcdSolver::default();
    let target = Point3::new(0.2, 0.025, 0.2);

    c.bench_function("ccd_solver_six_axis", |b| {
        b.iter(|| {
            let mut arm = KinematicChain::six_axis_arm();
            black_box(solver.solve_detailed(&mut arm, black_box(&target)))
        });
    });
}

fn benchmark_ccd_varying_links(c: &mut Criterion) {
    let mut group = c.benchmark_group("ccd_solver_link_comparison");
    let solver = CcdSolver::default();

    for links in [2usize, 3, 4, 6, 8].iter() {
        let lengths = vec![1.0 / *links as f64; *links];
        let target = Point3::new(0.5, 0.0, 0.4);

        group.bench_with_input(BenchmarkId::from_parameter(links), &lengths, |b, lengths| {
            b.iter(|| {
                let mut chain = KinematicChain::planar(lengths);
                black_box(solver.solve(&mut chain, &target))
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_ccd_two_link,
    benchmark_ccd_six_axis,
    benchmark_ccd_varying_links
);
criterion_main!(benches);
