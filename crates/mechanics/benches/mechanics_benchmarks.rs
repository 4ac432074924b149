#![forbid(unsafe_code)]
#![allow(clippy::cast_precision_loss)]

//! Benchmarks for the mechanics integrators.

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use mechanics::chaos::{SeparationConfig, separation_run};
use mechanics::{
    AngularState, ArmParams, DoublePendulum, DoublePendulumParams, GRAVITY, Point, Projectile,
    ProjectileParams, Simulation, SimplePendulum, SimplePendulumParams, TrajectoryTrace,
    angular_accelerations, fps,
};

fn bench_simple(c: &mut Criterion) {
    let mut group = c.benchmark_group("mechanics/simple");

    for steps in [60_u64, 600, 6000] {
        group.throughput(Throughput::Elements(steps));
        group.bench_with_input(BenchmarkId::new("step", steps), &steps, |b, &steps| {
            b.iter_batched(
                || {
                    let mut p = SimplePendulum::new(SimplePendulumParams::default());
                    p.start().ok();
                    p
                },
                |mut p| {
                    for _ in 0..steps {
                        p.step(fps(60));
                    }
                    black_box(p.snapshot())
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_double(c: &mut Criterion) {
    let mut group = c.benchmark_group("mechanics/double");

    let upper = AngularState::at_rest(90.0);
    let lower = AngularState::at_rest(10.0);
    let arm = ArmParams::new(2.0, 1.0);
    group.bench_function("angular_accelerations", |b| {
        b.iter(|| {
            black_box(angular_accelerations(
                black_box(&upper),
                black_box(&lower),
                &arm,
                &arm,
                GRAVITY,
            ))
        });
    });

    for steps in [60_u64, 600, 6000] {
        group.throughput(Throughput::Elements(steps));
        group.bench_with_input(BenchmarkId::new("step", steps), &steps, |b, &steps| {
            b.iter_batched(
                || {
                    let mut p = DoublePendulum::new(DoublePendulumParams::default());
                    p.start().ok();
                    p
                },
                |mut p| {
                    for _ in 0..steps {
                        p.step(fps(60));
                    }
                    black_box(p.snapshot())
                },
                BatchSize::SmallInput,
            );
        });
    }

    let config = SeparationConfig::new(fps(60), 600);
    group.bench_function("separation_run_600", |b| {
        b.iter(|| black_box(separation_run(&DoublePendulumParams::default(), &config)));
    });

    group.finish();
}

fn bench_projectile(c: &mut Criterion) {
    let mut group = c.benchmark_group("mechanics/projectile");

    group.bench_function("flight_to_landing", |b| {
        b.iter_batched(
            || {
                let mut p = Projectile::new(ProjectileParams::default());
                p.start().ok();
                p
            },
            |mut p| {
                while p.is_running() {
                    p.step(fps(240));
                }
                black_box(p.range())
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_trace(c: &mut Criterion) {
    let mut group = c.benchmark_group("mechanics/trace");

    for capacity in [100_usize, 1000, 2000] {
        group.bench_with_input(
            BenchmarkId::new("push_full", capacity),
            &capacity,
            |b, &capacity| {
                let mut trace = TrajectoryTrace::new(capacity);
                for i in 0..capacity {
                    trace.push(Point::new(i as f64, 0.0));
                }
                b.iter(|| trace.push(black_box(Point::new(1.0, 2.0))));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_simple,
    bench_double,
    bench_projectile,
    bench_trace,
);
criterion_main!(benches);
