// Copyright 2026 The Vowl Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Benchmarks for loading VOWL JSON documents.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use serde_json::{Value, json};

/// Classes with attribute records, equivalences and inverse properties so
/// every parser stage has work to do.
fn create_document(classes: usize) -> String {
    let class: Vec<Value> = (0..classes)
        .map(|i| json!({"id": format!("c{i}"), "type": "owl:Class"}))
        .collect();
    let class_attribute: Vec<Value> = (0..classes)
        .map(|i| {
            let mut attr = json!({
                "id": format!("c{i}"),
                "iri": format!("http://example.org/onto#Class{i}"),
                "label": {"en": format!("Class {i}"), "de": format!("Klasse {i}")},
            });
            if i % 10 == 9 {
                attr["equivalent"] = json!([format!("c{}", i - 1)]);
            }
            attr
        })
        .collect();
    let property: Vec<Value> = (1..classes)
        .map(|i| {
            json!({
                "id": format!("p{i}"),
                "type": "owl:ObjectProperty",
                "domain": format!("c{i}"),
                "range": format!("c{}", i / 2),
                "inverse": format!("inv{i}"),
            })
        })
        .collect();
    json!({
        "class": class,
        "classAttribute": class_attribute,
        "property": property,
    })
    .to_string()
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for size in [100, 1000, 5000] {
        let doc = create_document(size);
        group.throughput(Throughput::Bytes(doc.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &doc, |b, doc| {
            b.iter(|| vowl_engine::parse(black_box(doc)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
