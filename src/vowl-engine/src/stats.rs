// Copyright 2026 The Vowl Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::common::DisjointSet;
use crate::graph::{EdgeType, Graph, NodeType};

/// Read-only summary of the currently visible subgraph.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Statistics {
    pub node_count: usize,
    pub edge_count: usize,
    pub nodes_by_type: BTreeMap<NodeType, usize>,
    pub edges_by_type: BTreeMap<EdgeType, usize>,
    pub min_degree: usize,
    pub max_degree: usize,
    pub avg_degree: f64,
    pub components: usize,
    /// `edges / (n * (n - 1) / 2)`, or 0 below two nodes.
    pub density: f64,
    pub individuals: usize,
}

pub fn compute_statistics(graph: &Graph) -> Statistics {
    let mut stats = Statistics::default();
    let nodes = graph.nodes();
    let degrees = graph.degree_table(true);

    let mut sets = DisjointSet::new(nodes.len());
    for (edge, &(source, target)) in graph.edges().iter().zip(graph.endpoints()) {
        if !edge.is_visible() {
            continue;
        }
        stats.edge_count += 1;
        *stats.edges_by_type.entry(edge.edge_type).or_default() += 1;
        sets.union(source, target);
    }

    let mut degree_sum = 0;
    let mut min_degree = usize::MAX;
    for (index, node) in nodes.iter().enumerate() {
        if !node.is_visible() {
            continue;
        }
        stats.node_count += 1;
        *stats.nodes_by_type.entry(node.node_type).or_default() += 1;
        stats.individuals += node.individual_count();

        let degree = degrees[index];
        degree_sum += degree;
        min_degree = min_degree.min(degree);
        stats.max_degree = stats.max_degree.max(degree);
        if sets.find(index) == index {
            stats.components += 1;
        }
    }

    let n = stats.node_count;
    if n > 0 {
        stats.min_degree = min_degree;
        stats.avg_degree = degree_sum as f64 / n as f64;
    }
    if n >= 2 {
        let pairs = (n * (n - 1)) as f64 / 2.0;
        stats.density = stats.edge_count as f64 / pairs;
    }
    stats
}
