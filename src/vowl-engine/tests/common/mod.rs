// Copyright 2026 The Vowl Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

#![allow(dead_code)]

use proptest::prelude::*;
use serde_json::{Value, json};

use vowl_engine::Graph;

pub const NODE_TAGS: [&str; 5] = [
    "owl:Class",
    "owl:Class",
    "owl:Thing",
    "rdfs:Datatype",
    "owl:unionOf",
];

pub const EDGE_TAGS: [&str; 5] = [
    "owl:ObjectProperty",
    "owl:ObjectProperty",
    "rdfs:subClassOf",
    "owl:disjointWith",
    "owl:DatatypeProperty",
];

pub fn class(id: &str, label: &str) -> Value {
    json!({"id": id, "type": "owl:Class", "label": {"en": label}})
}

pub fn property(id: &str, type_tag: &str, domain: &str, range: &str) -> Value {
    json!({"id": id, "type": type_tag, "domain": domain, "range": range})
}

pub fn ontology(classes: Vec<Value>, properties: Vec<Value>) -> Value {
    json!({
        "header": {"iri": "http://example.org/test", "title": {"en": "Test"}},
        "namespace": [],
        "class": classes,
        "property": properties,
    })
}

pub fn parse(value: Value) -> Graph {
    vowl_engine::parse_value(value).unwrap_or_else(|e| panic!("fixture failed to parse: {e}"))
}

/// Random small ontologies: node types drawn from `NODE_TAGS`, edges between
/// arbitrary node pairs (self-loops included) drawn from `EDGE_TAGS`.
pub fn arb_ontology() -> impl Strategy<Value = Value> {
    (1usize..12)
        .prop_flat_map(|n| {
            (
                prop::collection::vec(0..NODE_TAGS.len(), n),
                prop::collection::vec((0..n, 0..n, 0..EDGE_TAGS.len()), 0..(n * 2)),
            )
        })
        .prop_map(|(node_tags, edges)| {
            let classes = node_tags
                .iter()
                .enumerate()
                .map(|(i, &tag)| {
                    json!({"id": format!("n{i}"), "type": NODE_TAGS[tag], "label": format!("Node {i}")})
                })
                .collect();
            let properties = edges
                .iter()
                .enumerate()
                .map(|(i, &(s, t, tag))| {
                    property(&format!("e{i}"), EDGE_TAGS[tag], &format!("n{s}"), &format!("n{t}"))
                })
                .collect();
            ontology(classes, properties)
        })
}

/// Like [`arb_ontology`], plus `equivalent` lists on nodes and properties
/// and `owl:equivalentClass` edges, so loading merges some of them.
pub fn arb_ontology_with_equivalences() -> impl Strategy<Value = Value> {
    (
        arb_ontology(),
        prop::collection::vec((0usize..12, 0usize..12), 0..4),
        prop::collection::vec((0usize..24, 0usize..24), 0..3),
        prop::collection::vec((0usize..12, 0usize..12), 0..3),
    )
        .prop_map(|(mut doc, node_pairs, edge_pairs, class_edges)| {
            let n = doc["class"].as_array().map_or(0, Vec::len);
            let m = doc["property"].as_array().map_or(0, Vec::len);
            for (a, b) in node_pairs {
                let other = format!("n{}", b % n);
                if let Some(list) = doc["class"][a % n]
                    .as_object_mut()
                    .map(|record| record.entry("equivalent").or_insert_with(|| json!([])))
                    .and_then(Value::as_array_mut)
                {
                    list.push(json!(other));
                }
            }
            if m > 0 {
                for (a, b) in edge_pairs {
                    let other = format!("e{}", b % m);
                    if let Some(list) = doc["property"][a % m]
                        .as_object_mut()
                        .map(|record| record.entry("equivalent").or_insert_with(|| json!([])))
                        .and_then(Value::as_array_mut)
                    {
                        list.push(json!(other));
                    }
                }
            }
            if let Some(properties) = doc["property"].as_array_mut() {
                for (i, (a, b)) in class_edges.into_iter().enumerate() {
                    properties.push(property(
                        &format!("eq{i}"),
                        "owl:equivalentClass",
                        &format!("n{}", a % n),
                        &format!("n{}", b % n),
                    ));
                }
            }
            doc
        })
}
