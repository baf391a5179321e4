//! Engine benchmarks for garden_core.
//!
//! Run with: `cargo bench -p garden_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use garden_core::engine::Action;
use garden_core::growth::Timestamp;
use garden_test_utils::fixtures::demo_engine;

/// Plant-and-harvest throughput, the hottest action pair in play.
pub fn plant_harvest_benchmark(c: &mut Criterion) {
    c.bench_function("plant_then_harvest", |b| {
        let mut engine = demo_engine(1);
        let mut now = Timestamp::from_secs(0);
        b.iter(|| {
            // Keep the garden stocked so planting never rejects.
            engine
                .apply(
                    Action::UpdateResource {
                        resource: "Seeds".into(),
                        delta: 1.0,
                    },
                    now,
                )
                .unwrap();
            engine
                .apply(
                    Action::UpdateResource {
                        resource: "Water".into(),
                        delta: 5.0,
                    },
                    now,
                )
                .unwrap();
            engine
                .apply(
                    Action::PlantCrop {
                        crop: "tomato".into(),
                        era: "Present".into(),
                    },
                    now,
                )
                .unwrap();
            let plant = engine.state().planted[0].id;
            now = now.plus_secs(60);
            black_box(engine.apply(Action::HarvestCrop { plant }, now).unwrap());
        })
    });
}

/// Cost of the goal-evaluation pass that runs after every action.
pub fn goal_evaluation_benchmark(c: &mut Criterion) {
    c.bench_function("energy_tick_with_goal_pass", |b| {
        let mut engine = demo_engine(1);
        let now = Timestamp::from_secs(0);
        b.iter(|| {
            black_box(
                engine
                    .apply(Action::AddEnergy { amount: 0.1 }, now)
                    .unwrap(),
            );
        })
    });
}

criterion_group!(benches, plant_harvest_benchmark, goal_evaluation_benchmark);
criterion_main!(benches);
