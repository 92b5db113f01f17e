//! Benchmarks for the full pipeline and its hot stages.

#![allow(missing_docs, clippy::unwrap_used)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use fm_core::{ClassifyConfig, Config};
use fm_tree::{Classifier, Pipeline};

const NAMES: [&str; 8] = [
    "index.php",
    "Config.php",
    "backup.tar.gz",
    "users.sql",
    "readme.txt",
    ".env",
    "admin.html",
    "app.js",
];

/// Synthetic scanner output over a few directory levels with case duplicates.
fn synthetic_lines(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let dir = format!("d{}/s{}", i % 37, i % 11);
            let name = NAMES[i % NAMES.len()];
            let name = if i % 13 == 0 { name.to_uppercase() } else { name.to_owned() };
            let status = if i % 9 == 0 { 404 } else { 200 };
            format!("{status}      GET      {i}l      {i}w     {i}c http://target.local/{dir}/{name}")
        })
        .collect()
}

fn bench_pipeline(c: &mut Criterion) {
    let pipeline = Pipeline::new(&Config::default()).unwrap();
    let lines = synthetic_lines(10_000);

    c.bench_function("pipeline_10k_lines", |b| {
        b.iter(|| black_box(pipeline.run(black_box(&lines)).unwrap()));
    });
}

fn bench_classifier(c: &mut Criterion) {
    let classifier = Classifier::new(&ClassifyConfig::default()).unwrap();

    c.bench_function("classify_names", |b| {
        b.iter(|| {
            for name in NAMES {
                black_box(classifier.classify_name(black_box(name)));
            }
        });
    });
}

criterion_group!(benches, bench_pipeline, bench_classifier);
criterion_main!(benches);
