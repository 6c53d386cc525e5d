//! Criterion benchmarks for the consciousness store and simulation engine.
//!
//! Run with:
//!   cargo bench
//!
//! Results are saved to target/criterion/

use std::time::{Duration, Instant};

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use cathedral::sim::{ConfigCatalog, SimulationRun, TickFlow};
use cathedral::store::{ConsciousnessStore, MetricField};

/// Benchmark the autonomous store tick (phase derivation + drift).
fn bench_auto_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("store");

    group.bench_function("auto_tick", |b| {
        let mut store = ConsciousnessStore::new(42);
        b.iter(|| {
            store.auto_tick();
            black_box(store.aggregate())
        });
    });

    group.bench_function("aggregate", |b| {
        let store = ConsciousnessStore::new(42);
        b.iter(|| black_box(store.aggregate()));
    });

    group.bench_function("set_field", |b| {
        let mut store = ConsciousnessStore::new(42);
        let mut v = 0.1;
        b.iter(|| {
            v = (v + 0.001) % 1.0;
            store.set(MetricField::WilsonLoopStability, v);
            black_box(store.get(MetricField::WilsonLoopStability))
        });
    });

    group.finish();
}

/// Benchmark a full poll pass of registered subsystems and warm-ups.
fn bench_register_and_poll(c: &mut Criterion) {
    let mut group = c.benchmark_group("registration");

    for count in [4, 16, 64].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::new("register", count), count, |b, &count| {
            let t0 = Instant::now();
            let names: Vec<String> = (0..count).map(|i| format!("subsystem-{i}")).collect();

            b.iter(|| {
                let mut store = ConsciousnessStore::new_at(42, t0);
                for name in &names {
                    store.register_system_at(name, t0);
                }
                store.poll_at(t0 + Duration::from_secs(1));
                black_box(store.metrics().active_systems.len())
            });
        });
    }

    group.finish();
}

/// Benchmark simulation ticks at the history capacities the panels use.
fn bench_sim_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("sim");

    for capacity in [20, 30, 50].iter() {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::new("tick", capacity),
            capacity,
            |b, &capacity| {
                let t0 = Instant::now();
                let mut run: SimulationRun<f64, (u64, f64)> = SimulationRun::new(
                    Duration::from_millis(100),
                    capacity,
                    ConfigCatalog::new(vec![("base", 0.9)]),
                );
                run.start_at(t0);

                b.iter(|| {
                    run.tick_at(t0, |ctx| {
                        let v = ctx.config * (ctx.iteration as f64).sin();
                        ((ctx.iteration, v), TickFlow::Continue)
                    });
                    black_box(run.latest().copied())
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_auto_tick, bench_register_and_poll, bench_sim_tick);

criterion_main!(benches);
