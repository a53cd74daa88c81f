//! Latency benchmarks for coffee price inference.
//!
//! # Benchmarks
//!
//! - `encode_record`: attribute record to feature vector
//! - `predict_single`: one record through 10- and 100-tree pipelines
//! - `predict_batch`: 64 records through the same pipeline
//!
//! ```bash
//! cargo bench -p crema
//! ```

#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use crema::data::schema::PRICE;
use crema::data::{CoffeeAttributes, Record, Schema};
use crema::model::ForestConfig;
use crema::{FittedPipeline, Pipeline};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const ORIGINS: [&str; 3] = ["Ethiopia", "Colombia", "Brazil"];

fn records(n: usize, seed: u64) -> Vec<Record> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let attrs = CoffeeAttributes {
                bean_origin: ORIGINS[rng.gen_range(0..ORIGINS.len())].to_string(),
                bean_cost: rng.gen_range(50.0..300.0),
                competitor_price: rng.gen_range(100.0..600.0),
                month: rng.gen_range(1..=12),
                ..Default::default()
            };
            let price = 80.0 + 1.6 * attrs.bean_cost + 0.2 * attrs.competitor_price;
            attrs.to_record().with_numeric(PRICE, price)
        })
        .collect()
}

fn fitted(num_trees: usize) -> FittedPipeline {
    let config = ForestConfig {
        num_trees,
        ..Default::default()
    };
    Pipeline::new(Schema::coffee(), config)
        .fit(&records(500, 42))
        .expect("benchmark pipeline fits")
}

fn benchmark_encode(c: &mut Criterion) {
    let pipeline = fitted(10);
    let record = CoffeeAttributes::default().to_record();

    c.bench_function("encode_record", |b| {
        b.iter(|| pipeline.encoder().transform_one(black_box(&record)));
    });
}

fn benchmark_predict(c: &mut Criterion) {
    let record = CoffeeAttributes::default().to_record();
    let mut group = c.benchmark_group("predict_single");

    for num_trees in [10, 100] {
        let pipeline = fitted(num_trees);
        group.bench_with_input(BenchmarkId::from_parameter(num_trees), &record, |b, r| {
            b.iter(|| pipeline.predict(black_box(r)));
        });
    }
    group.finish();
}

fn benchmark_batch(c: &mut Criterion) {
    let pipeline = fitted(100);
    let batch = records(64, 7);

    c.bench_function("predict_batch", |b| {
        b.iter(|| pipeline.predict_batch(black_box(&batch)));
    });
}

criterion_group!(benches, benchmark_encode, benchmark_predict, benchmark_batch);
criterion_main!(benches);
