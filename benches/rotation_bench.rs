//! Simulator throughput benchmarks: full-fight runs per second.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use darkside::drk::{DrkSim, DrkSimSettings};
use darkside::gear::GearSet;
use darkside::parallel::WorkerPool;
use darkside::solver::simulate_sets_and_return_best_parallel;

fn bench_single_fight(c: &mut Criterion) {
    let sim = DrkSim::new(None);
    let set = GearSet::baseline();

    let mut group = c.benchmark_group("simulate");
    group.throughput(Throughput::Elements(1));
    group.bench_function("full_510s_fight", |b| {
        b.iter(|| black_box(sim.simulate(black_box(&set))))
    });
    group.finish();
}

fn bench_solver_sweep(c: &mut Criterion) {
    let sim = DrkSim::new(Some(DrkSimSettings {
        fight_time: 120.0,
        ..DrkSimSettings::default()
    }));
    let sets: Vec<GearSet> = (0..16)
        .map(|index| {
            let mut set = GearSet::baseline();
            set.name = format!("candidate {index}");
            set.critical_hit += index * 20;
            set
        })
        .collect();
    let pool = WorkerPool::default();

    let mut group = c.benchmark_group("solver");
    group.throughput(Throughput::Elements(sets.len() as u64));
    group.bench_function("sweep_16_sets", |b| {
        b.iter(|| black_box(simulate_sets_and_return_best_parallel(&sim, &sets, &pool)))
    });
    group.finish();
}

criterion_group!(benches, bench_single_fight, bench_solver_sweep);
criterion_main!(benches);
