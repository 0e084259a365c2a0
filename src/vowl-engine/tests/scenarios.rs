// Copyright 2026 The Vowl Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

mod common;

use serde_json::json;

use vowl_engine::{
    Filter, FilterPipeline, ForceLayout, LayoutConfig, MatchKind, NodeType, ParseError,
    SearchFilter, Snapshot, SubclassCollapseFilter, compute_statistics,
};

use common::{class, ontology, parse, property};

#[test]
fn two_classes_one_property() {
    let graph = parse(ontology(
        vec![class("A", "A"), class("B", "B")],
        vec![property("p", "owl:ObjectProperty", "A", "B")],
    ));
    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.degree("A"), 1);
    assert_eq!(graph.degree("B"), 1);
}

#[test]
fn subclass_chain_collapses_to_root() {
    let mut graph = parse(ontology(
        vec![class("A", "A"), class("B", "B"), class("C", "C")],
        vec![
            property("ab", "rdfs:subClassOf", "A", "B"),
            property("bc", "rdfs:subClassOf", "B", "C"),
        ],
    ));
    let mut pipeline = FilterPipeline::new();
    pipeline.enable(Filter::SubclassCollapse(SubclassCollapseFilter::new(true)));
    pipeline.apply(&mut graph);

    let visible: Vec<&str> = graph.visible_nodes().map(|n| n.id.as_str()).collect();
    assert_eq!(visible, vec!["C"]);
    assert!(!graph.node("A").unwrap().is_visible());
    assert!(!graph.node("B").unwrap().is_visible());

    let mut collapsed = pipeline.subclass_collapse().unwrap().collapsed("C").to_vec();
    collapsed.sort();
    assert_eq!(collapsed, vec!["A", "B"]);
}

#[test]
fn equivalent_classes_share_one_node() {
    let graph = parse(json!({
        "class": [
            {"id": "X", "type": "owl:Class", "equivalent": ["Y"],
             "individuals": [{"iri": "http://example.org/x1"}]},
            {"id": "Y", "type": "owl:Class",
             "individuals": [{"iri": "http://example.org/y1"}, {"iri": "http://example.org/y2"}]}
        ]
    }));

    let visible: Vec<_> = graph.visible_nodes().collect();
    assert_eq!(visible.len(), 1);
    let rep = visible[0];
    let mut iris: Vec<&str> = rep.individuals.iter().map(|i| i.iri.as_str()).collect();
    iris.sort();
    assert_eq!(
        iris,
        vec![
            "http://example.org/x1",
            "http://example.org/y1",
            "http://example.org/y2"
        ]
    );

    let hidden = graph.nodes().iter().find(|n| !n.is_visible()).unwrap();
    assert_eq!(hidden.equivalent_group.as_deref(), Some(rep.id.as_str()));
}

#[test]
fn exact_label_outranks_prefix() {
    let graph = parse(ontology(
        vec![class("c1", "Personnel"), class("c2", "Person")],
        vec![],
    ));
    let hits = SearchFilter::new("Person").rank(&graph);
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].node_id, "c2");
    assert_eq!(hits[0].kind, MatchKind::Exact);
    assert_eq!(hits[1].node_id, "c1");
}

#[test]
fn parse_errors() {
    let dangling = vowl_engine::parse_value(ontology(
        vec![class("A", "A")],
        vec![property("p", "owl:ObjectProperty", "A", "Z")],
    ));
    assert_eq!(
        dangling.unwrap_err(),
        ParseError::DanglingReference("Z".to_string())
    );

    let unknown = vowl_engine::parse_value(json!({
        "class": [{"id": "A", "type": "owl:Mystery"}]
    }));
    assert_eq!(
        unknown.unwrap_err(),
        ParseError::UnknownType("owl:Mystery".to_string())
    );

    let missing = vowl_engine::parse_value(json!({"property": []}));
    assert!(matches!(missing, Err(ParseError::Malformed(_))));
}

#[test]
fn host_frame_loop() {
    let mut graph = parse(ontology(
        vec![
            class("animal", "Animal"),
            class("dog", "Dog"),
            class("cat", "Cat"),
            json!({"id": "str", "type": "rdfs:Datatype", "label": "string"}),
        ],
        vec![
            property("s1", "rdfs:subClassOf", "dog", "animal"),
            property("s2", "rdfs:subClassOf", "cat", "animal"),
            property("chases", "owl:ObjectProperty", "dog", "cat"),
            property("name", "owl:DatatypeProperty", "animal", "str"),
        ],
    ));

    let mut pipeline = FilterPipeline::new();
    let mut layout = ForceLayout::new(LayoutConfig::default());
    for _ in 0..20 {
        layout.tick(&mut graph);
    }

    pipeline.enable(Filter::SubclassCollapse(SubclassCollapseFilter::new(true)));
    let summary = pipeline.apply(&mut graph);
    assert_eq!(summary.visible_nodes, 2);
    layout.reheat();
    let ticks = layout.run(&mut graph, 1_000);
    assert!(layout.is_converged());
    assert!(ticks > 0);

    let snapshot = Snapshot::capture(&graph, Some("en"));
    let ids: Vec<&str> = snapshot.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["animal", "str"]);
    assert_eq!(snapshot.edges.len(), 1);
    assert_eq!(snapshot.nodes[0].label, "Animal");
    assert!(snapshot.nodes.iter().all(|n| n.x.is_finite() && n.y.is_finite()));

    let stats = compute_statistics(&graph);
    assert_eq!(stats.nodes_by_type.get(&NodeType::Datatype), Some(&1));
    assert_eq!(stats.components, 1);
}
