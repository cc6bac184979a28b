//! Benchmarks for scoring and the local search.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use seating_optimizer::optimizer::{score_schedule, OptimizeOpponents, OptimizerConfig, SearchRun};
use seating_optimizer::participants::Participants;
use seating_optimizer::schedule::{Configuration, Schedule, ScheduleFactory};

fn initial_schedule(configuration: &Configuration) -> Schedule {
    let participants = Participants::create(configuration.num_players);
    let mut rng = StdRng::seed_from_u64(42);
    ScheduleFactory::create_initial_schedule(configuration, &participants, &mut rng)
        .expect("valid configuration")
}

fn full_score_benchmark(c: &mut Criterion) {
    let schedule = initial_schedule(&Configuration::new(35, 3, 12, 35, 10));
    let config = OptimizerConfig::default();

    c.bench_function("score_full_recompute", |b| {
        b.iter(|| black_box(score_schedule(black_box(&schedule), &config)))
    });
}

fn search_step_benchmark(c: &mut Criterion) {
    let schedule = initial_schedule(&Configuration::new(35, 3, 12, 35, 10));
    let config = OptimizerConfig::default();
    let mut search = SearchRun::new(schedule, &config, StdRng::seed_from_u64(42), 0);

    c.bench_function("search_single_step", |b| {
        b.iter(|| black_box(search.random_opponent_change()))
    });
}

fn optimize_benchmark(c: &mut Criterion) {
    let configuration = Configuration::new(20, 2, 10, 20, 10);
    let participants = Participants::create(20);

    c.bench_function("optimize_1000_iterations", |b| {
        b.iter(|| {
            let mut optimizer = OptimizeOpponents::new(OptimizerConfig::default().with_seed(42));
            optimizer
                .optimize(&configuration, &participants, 1, black_box(1000))
                .expect("valid configuration")
        })
    });
}

criterion_group!(
    benches,
    full_score_benchmark,
    search_step_benchmark,
    optimize_benchmark
);
criterion_main!(benches);
