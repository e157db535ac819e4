//! Benchmarks for profiling operations.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::explicit_iter_loop,
    missing_docs
)]

use std::sync::Arc;

use arrow::{
    array::{Float64Array, Int32Array, StringArray},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use perfilar::{
    compute_quality_flags, correlation_matrix, missing_table, summarize_dataset, top_categories,
    ArrowDataset,
};

fn create_dataset(rows: usize) -> ArrowDataset {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int32, false),
        Field::new("name", DataType::Utf8, false),
        Field::new("score", DataType::Float64, false),
    ]));

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let ids: Vec<i32> = (0..rows as i32).collect();
    let names: Vec<String> = ids.iter().map(|i| format!("group_{}", i % 20)).collect();
    #[allow(clippy::cast_lossless)]
    let scores: Vec<f64> = ids.iter().map(|i| *i as f64 * 1.5).collect();

    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int32Array::from(ids)),
            Arc::new(StringArray::from(names)),
            Arc::new(Float64Array::from(scores)),
        ],
    )
    .expect("Failed to create batch");

    ArrowDataset::from_batch(batch).expect("Failed to create dataset")
}

fn bench_summarize(c: &mut Criterion) {
    let mut group = c.benchmark_group("summarize_dataset");

    for size in [100, 1_000, 10_000].iter() {
        let dataset = create_dataset(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &dataset, |b, dataset| {
            b.iter(|| summarize_dataset(black_box(dataset)).expect("summary"));
        });
    }

    group.finish();
}

fn bench_quality_flags(c: &mut Criterion) {
    let mut group = c.benchmark_group("quality_flags");

    for size in [100, 1_000, 10_000].iter() {
        let dataset = create_dataset(*size);
        let summary = summarize_dataset(&dataset).expect("summary");
        let missing = missing_table(&dataset);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &dataset, |b, dataset| {
            b.iter(|| {
                compute_quality_flags(black_box(&summary), black_box(&missing), black_box(dataset))
                    .expect("flags")
            });
        });
    }

    group.finish();
}

fn bench_correlation(c: &mut Criterion) {
    let mut group = c.benchmark_group("correlation_matrix");

    for size in [100, 1_000, 10_000].iter() {
        let dataset = create_dataset(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &dataset, |b, dataset| {
            b.iter(|| correlation_matrix(black_box(dataset)).expect("matrix"));
        });
    }

    group.finish();
}

fn bench_top_categories(c: &mut Criterion) {
    let mut group = c.benchmark_group("top_categories");

    for size in [100, 1_000, 10_000].iter() {
        let dataset = create_dataset(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &dataset, |b, dataset| {
            b.iter(|| top_categories(black_box(dataset), 5, 10).expect("report"));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_summarize,
    bench_quality_flags,
    bench_correlation,
    bench_top_categories
);
criterion_main!(benches);
