//! Passage matching benchmarks
//!
//! Measures performance of:
//! - Keyword extraction
//! - Boilerplate classification
//! - Line scanning over documents of growing size

use docquery_core::{extract_keywords, HeadingClassifier, PassageMatcher};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const SAMPLE_LINES: &[&str] = &[
    "CUSTOMER HANDBOOK",
    "Page 1 of 40",
    "Our refund policy allows returns within 30 days of purchase for any reason.",
    "Gift cards never expire and can be used online or in any store.",
    "Warranty repairs usually take five to seven business days.",
    "Shipping is free on orders over fifty dollars within the country.",
    "Copyright 2024 Example Retail, all rights reserved worldwide.",
    "",
];

fn build_document(lines: usize) -> String {
    SAMPLE_LINES
        .iter()
        .cycle()
        .take(lines)
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
}

fn bench_keywords(c: &mut Criterion) {
    c.bench_function("extract_keywords", |b| {
        b.iter(|| extract_keywords(black_box("What is the refund policy for gift cards bought online?")))
    });
}

fn bench_classifier(c: &mut Criterion) {
    let classifier = HeadingClassifier::default();
    c.bench_function("is_boilerplate", |b| {
        b.iter(|| {
            for line in SAMPLE_LINES {
                black_box(classifier.is_boilerplate(black_box(line)));
            }
        })
    });
}

fn bench_match_passages(c: &mut Criterion) {
    let matcher = PassageMatcher::default();
    let keywords = extract_keywords("refund warranty shipping");
    let mut group = c.benchmark_group("match_passages");

    for lines in [100, 1_000, 10_000] {
        let doc = build_document(lines);
        group.bench_with_input(BenchmarkId::from_parameter(lines), &doc, |b, doc| {
            b.iter(|| matcher.match_passages(black_box(doc), &keywords))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_keywords, bench_classifier, bench_match_passages);
criterion_main!(benches);
