//! Sweep Benchmarks
//!
//! Single-point evaluation cost and full altitude sweeps of increasing size.
//! With the `parallel` feature the sweep path runs on Rayon.
//!
//! Run with: cargo bench -p satlink-core --bench sweep_bench
//!      or:  cargo bench -p satlink-core --features parallel --bench sweep_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use satlink_core::engine::evaluate_altitude;
use satlink_core::prelude::*;

/// One altitude through geometry, FSPL and SNR
fn bench_single_altitude(c: &mut Criterion) {
    let config = LinkConfiguration::downlink().expect("downlink preset");

    c.bench_function("evaluate_altitude", |b| {
        b.iter(|| evaluate_altitude(&config, black_box(20_000.0)))
    });
}

/// Configuration construction (composite loss and noise budget)
fn bench_configuration(c: &mut Criterion) {
    c.bench_function("link_configuration_new", |b| {
        b.iter(|| LinkConfiguration::new(black_box(LinkParams::uplink())))
    });
}

/// Full sweeps of increasing size
fn bench_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("altitude_sweep");
    group.measurement_time(Duration::from_secs(5));

    let engine = LinkBudgetEngine::new(LinkConfiguration::downlink().expect("downlink preset"));

    for count in [500usize, 10_000, 100_000].iter() {
        let sampling = AltitudeSampling::linspace(400.0, 60_000.0, *count).expect("sampling");
        group.throughput(Throughput::Elements(*count as u64));

        group.bench_with_input(BenchmarkId::new("sweep", count), &sampling, |b, sampling| {
            b.iter(|| engine.sweep(black_box(sampling)))
        });
    }

    group.finish();
}

/// Sequential baseline against the Rayon sweep
#[cfg(feature = "parallel")]
fn bench_sequential_vs_parallel(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequential_vs_parallel");
    let config = LinkConfiguration::downlink().expect("downlink preset");
    let altitudes = AltitudeSampling::linspace(400.0, 60_000.0, 100_000)
        .and_then(|s| s.altitudes())
        .expect("sampling");

    group.throughput(Throughput::Elements(altitudes.len() as u64));

    group.bench_function("sequential", |b| {
        b.iter(|| {
            black_box(&altitudes)
                .iter()
                .map(|&h| evaluate_altitude(&config, h))
                .collect::<Vec<_>>()
        })
    });

    group.bench_function("parallel", |b| {
        b.iter(|| satlink_core::sweep::sweep_altitudes(&config, black_box(&altitudes)))
    });

    group.finish();
}

#[cfg(not(feature = "parallel"))]
fn bench_sequential_vs_parallel(_c: &mut Criterion) {}

criterion_group!(
    benches,
    bench_single_altitude,
    bench_configuration,
    bench_sweep,
    bench_sequential_vs_parallel,
);
criterion_main!(benches);
