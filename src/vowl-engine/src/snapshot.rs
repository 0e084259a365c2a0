// Copyright 2026 The Vowl Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Per-frame export of the visible subgraph for renderers.

use serde::Serialize;

use crate::graph::{EdgeType, Graph, NodeType};
use crate::stats::{Statistics, compute_statistics};

fn is_false(val: &bool) -> bool {
    !*val
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeView {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    #[serde(skip_serializing_if = "is_false")]
    pub pinned: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EdgeView {
    pub id: String,
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
    pub source: String,
    pub target: String,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
    pub statistics: Statistics,
}

impl Snapshot {
    /// Capture visible nodes and edges, with labels in `language` where the
    /// ontology provides one.
    pub fn capture(graph: &Graph, language: Option<&str>) -> Self {
        let nodes = graph
            .visible_nodes()
            .map(|node| {
                let position = node.position();
                NodeView {
                    id: node.id.clone(),
                    node_type: node.node_type,
                    label: node.label(language).to_string(),
                    x: position.x,
                    y: position.y,
                    radius: node.radius,
                    pinned: node.is_pinned(),
                }
            })
            .collect();
        let edges = graph
            .visible_edges()
            .map(|edge| EdgeView {
                id: edge.id.clone(),
                edge_type: edge.edge_type,
                source: edge.source.clone(),
                target: edge.target.clone(),
                label: edge.label(language).to_string(),
            })
            .collect();
        Self {
            nodes,
            edges,
            statistics: compute_statistics(graph),
        }
    }
}
