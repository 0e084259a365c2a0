// Copyright 2026 The Vowl Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

mod common;

use std::collections::BTreeSet;

use float_cmp::approx_eq;
use proptest::prelude::*;

use vowl_engine::{
    DegreeFilter, EdgeType, EdgeTypeFilter, Filter, FilterPipeline, ForceLayout, Graph,
    LayoutConfig, NodeType, NodeTypeFilter, Position,
};

use common::{arb_ontology, arb_ontology_with_equivalences, parse};

fn topology(graph: &Graph) -> Vec<String> {
    let nodes = graph
        .nodes()
        .iter()
        .map(|n| format!("{} {} {}", n.id, n.node_type, n.is_visible()));
    let edges = graph
        .edges()
        .iter()
        .map(|e| format!("{} {} {}->{}", e.id, e.edge_type, e.source, e.target));
    nodes.chain(edges).collect()
}

fn visible_node_ids(graph: &Graph) -> BTreeSet<String> {
    graph.visible_nodes().map(|n| n.id.clone()).collect()
}

fn visible_edge_ids(graph: &Graph) -> BTreeSet<String> {
    graph.visible_edges().map(|e| e.id.clone()).collect()
}

fn positions(graph: &Graph) -> Vec<Position> {
    graph.nodes().iter().map(|n| n.position()).collect()
}

fn arb_filter() -> impl Strategy<Value = Filter> {
    prop_oneof![
        prop::collection::btree_set(prop::sample::select(NodeType::ALL.to_vec()), 0..4)
            .prop_map(|types| Filter::NodeType(NodeTypeFilter::new(types))),
        (0usize..4, 0usize..6).prop_map(|(min, extra)| Filter::Degree(DegreeFilter::new(min, min + extra))),
        prop::collection::btree_set(prop::sample::select(EdgeType::ALL.to_vec()), 0..4)
            .prop_map(|types| Filter::EdgeType(EdgeTypeFilter::new(types))),
    ]
}

fn apply(graph: &mut Graph, filters: &[Filter]) {
    let mut pipeline = FilterPipeline::new();
    for filter in filters {
        pipeline.enable(filter.clone());
    }
    pipeline.apply(graph);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn parse_is_idempotent(doc in arb_ontology()) {
        let first = parse(doc.clone());
        let second = parse(doc);
        prop_assert_eq!(topology(&first), topology(&second));
    }

    #[test]
    fn visible_degree_matches_visible_edges(doc in arb_ontology(), filter in arb_filter()) {
        let mut graph = parse(doc);
        apply(&mut graph, &[filter]);
        for node in graph.visible_nodes() {
            let incident = graph
                .visible_edges()
                .filter(|e| e.source == node.id || e.target == node.id)
                .count();
            prop_assert_eq!(graph.visible_degree(&node.id), incident);
        }
        for edge in graph.visible_edges() {
            prop_assert!(graph.node(&edge.source).unwrap().is_visible());
            prop_assert!(graph.node(&edge.target).unwrap().is_visible());
        }
    }

    #[test]
    fn degree_counts_visible_incident_edges(doc in arb_ontology_with_equivalences()) {
        let graph = parse(doc);
        for node in graph.nodes() {
            let incident = graph
                .visible_edges()
                .filter(|e| e.source == node.id || e.target == node.id)
                .count();
            prop_assert_eq!(graph.degree(&node.id), incident, "node {}", node.id);
        }
    }

    #[test]
    fn filters_compose_as_intersection(doc in arb_ontology(), f1 in arb_filter(), f2 in arb_filter()) {
        prop_assume!(f1.kind() != f2.kind());

        let mut only_first = parse(doc.clone());
        apply(&mut only_first, &[f1.clone()]);
        let mut only_second = parse(doc.clone());
        apply(&mut only_second, &[f2.clone()]);
        let mut both = parse(doc.clone());
        apply(&mut both, &[f1.clone(), f2.clone()]);
        let mut reversed = parse(doc);
        apply(&mut reversed, &[f2, f1]);

        let expected_nodes: BTreeSet<String> = visible_node_ids(&only_first)
            .intersection(&visible_node_ids(&only_second))
            .cloned()
            .collect();
        let expected_edges: BTreeSet<String> = visible_edge_ids(&only_first)
            .intersection(&visible_edge_ids(&only_second))
            .cloned()
            .collect();
        prop_assert_eq!(&visible_node_ids(&both), &expected_nodes);
        prop_assert_eq!(&visible_edge_ids(&both), &expected_edges);
        prop_assert_eq!(visible_node_ids(&reversed), expected_nodes);
    }

    #[test]
    fn apply_twice_changes_nothing(doc in arb_ontology(), filter in arb_filter()) {
        let mut graph = parse(doc);
        apply(&mut graph, &[filter.clone()]);
        let nodes = visible_node_ids(&graph);
        let edges = visible_edge_ids(&graph);
        apply(&mut graph, &[filter]);
        prop_assert_eq!(visible_node_ids(&graph), nodes);
        prop_assert_eq!(visible_edge_ids(&graph), edges);
    }

    #[test]
    fn unbounded_degree_filter_keeps_everything(doc in arb_ontology()) {
        let mut graph = parse(doc);
        let before = visible_node_ids(&graph);
        apply(&mut graph, &[Filter::Degree(DegreeFilter::at_least(0))]);
        prop_assert_eq!(visible_node_ids(&graph), before);
    }

    #[test]
    fn absent_degree_hides_everything(doc in arb_ontology()) {
        let graph = parse(doc.clone());
        let degrees: BTreeSet<usize> = graph.nodes().iter().map(|n| graph.degree(&n.id)).collect();
        let k = (0..).find(|k| !degrees.contains(k)).unwrap();
        let mut graph = parse(doc);
        apply(&mut graph, &[Filter::Degree(DegreeFilter::new(k, k))]);
        prop_assert_eq!(graph.visible_nodes().count(), 0);
    }

    #[test]
    fn layout_is_deterministic(doc in arb_ontology(), ticks in 1usize..40) {
        let mut a = parse(doc.clone());
        let mut b = parse(doc);
        ForceLayout::new(LayoutConfig::default()).run(&mut a, ticks);
        ForceLayout::new(LayoutConfig::default()).run(&mut b, ticks);
        for (pa, pb) in positions(&a).iter().zip(positions(&b)) {
            prop_assert!(approx_eq!(f64, pa.x, pb.x, epsilon = 1e-9));
            prop_assert!(approx_eq!(f64, pa.y, pb.y, epsilon = 1e-9));
        }
    }

    #[test]
    fn pinned_nodes_never_move(doc in arb_ontology(), x in -500.0f64..500.0, y in -500.0f64..500.0) {
        let mut graph = parse(doc);
        let id = graph.nodes()[0].id.clone();
        let mut layout = ForceLayout::new(LayoutConfig::default());
        layout.pin(&mut graph, &id, Position::new(x, y));
        layout.run(&mut graph, 25);
        let node = graph.node(&id).unwrap();
        prop_assert_eq!(node.position(), Position::new(x, y));
        prop_assert_eq!(node.velocity(), Position::ZERO);
    }
}

#[test]
fn converged_tick_is_a_no_op() {
    let mut graph = parse(common::ontology(
        vec![common::class("a", "A"), common::class("b", "B")],
        vec![common::property("p", "owl:ObjectProperty", "a", "b")],
    ));
    let mut layout = ForceLayout::new(LayoutConfig::default());
    layout.run(&mut graph, 10_000);
    assert!(layout.is_converged());

    let before = positions(&graph);
    let alpha = layout.alpha();
    layout.tick(&mut graph);
    assert_eq!(positions(&graph), before);
    assert!(approx_eq!(f64, layout.alpha(), alpha, ulps = 0));
}
