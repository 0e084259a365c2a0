// Copyright 2026 The Vowl Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Visibility filters.
//!
//! Every enabled filter votes on each node and edge against the full
//! topology, never against what another filter left visible. A node is shown
//! only if all node votes agree (and it is not a merged-away equivalent); an
//! edge only if both endpoints are shown and all edge votes agree. This makes
//! [`FilterPipeline::apply`] idempotent and independent of enable order.

mod search;

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::graph::{Edge, EdgeType, Graph, NodeType};

pub use self::search::{FUZZY_THRESHOLD, MatchKind, SearchFilter, SearchHit};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterKind {
    NodeType,
    Degree,
    EdgeType,
    SubclassCollapse,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeTypeFilter {
    allowed: BTreeSet<NodeType>,
}

impl NodeTypeFilter {
    pub fn new(allowed: impl IntoIterator<Item = NodeType>) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
        }
    }

    pub fn allows(&self, node_type: NodeType) -> bool {
        self.allowed.contains(&node_type)
    }
}

/// Keeps nodes whose full-topology degree lies in `min..=max`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DegreeFilter {
    pub min: usize,
    pub max: usize,
}

impl DegreeFilter {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn at_least(min: usize) -> Self {
        Self::new(min, usize::MAX)
    }

    pub fn allows(&self, degree: usize) -> bool {
        self.min <= degree && degree <= self.max
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeTypeFilter {
    allowed: BTreeSet<EdgeType>,
}

impl EdgeTypeFilter {
    pub fn new(allowed: impl IntoIterator<Item = EdgeType>) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
        }
    }

    pub fn allows(&self, edge_type: EdgeType) -> bool {
        self.allowed.contains(&edge_type)
    }
}

/// Folds class hierarchies into their roots.
///
/// A root is a node with no superclass and at least one subclass. When
/// enabled, every subclass edge is hidden and every descendant of a
/// collapsed root is hidden and recorded on that root. Roots passed to
/// [`SubclassCollapseFilter::expand`] keep their descendants visible.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubclassCollapseFilter {
    enabled: bool,
    expanded: BTreeSet<String>,
    collapsed: BTreeMap<String, Vec<String>>,
    hidden: Vec<bool>,
}

impl SubclassCollapseFilter {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Default::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Show the descendants of `root` on the next apply.
    pub fn expand(&mut self, root: &str) {
        self.expanded.insert(root.to_string());
    }

    /// Undo [`SubclassCollapseFilter::expand`].
    pub fn collapse(&mut self, root: &str) {
        self.expanded.remove(root);
    }

    /// Descendant ids folded into `root` by the last apply, in discovery
    /// order.
    pub fn collapsed(&self, root: &str) -> &[String] {
        self.collapsed.get(root).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Multi-source BFS from every collapsed root, in node order. A node
    /// reachable from several roots belongs to the first root that reaches it.
    fn prepare(&mut self, graph: &Graph) {
        let nodes = graph.nodes();
        self.collapsed.clear();
        self.hidden.clear();
        self.hidden.resize(nodes.len(), false);
        if !self.enabled {
            return;
        }

        let mut has_superclass = vec![false; nodes.len()];
        let mut subclasses: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
        for (edge, &(sub, sup)) in graph.edges().iter().zip(graph.endpoints()) {
            if edge.edge_type != EdgeType::SubclassOf || edge.is_merged() || sub == sup {
                continue;
            }
            has_superclass[sub] = true;
            subclasses[sup].push(sub);
        }

        let mut owner: Vec<Option<usize>> = vec![None; nodes.len()];
        let mut queue = VecDeque::new();
        for root in 0..nodes.len() {
            let is_root = !has_superclass[root] && !subclasses[root].is_empty();
            if is_root && !nodes[root].is_merged() && !self.expanded.contains(&nodes[root].id) {
                owner[root] = Some(root);
                queue.push_back(root);
            }
        }

        while let Some(current) = queue.pop_front() {
            let Some(root) = owner[current] else {
                continue;
            };
            for &sub in &subclasses[current] {
                if owner[sub].is_some() {
                    continue;
                }
                owner[sub] = Some(root);
                self.hidden[sub] = true;
                self.collapsed
                    .entry(nodes[root].id.clone())
                    .or_default()
                    .push(nodes[sub].id.clone());
                queue.push_back(sub);
            }
        }
    }

    fn allows_node(&self, index: usize) -> bool {
        !self.hidden.get(index).copied().unwrap_or(false)
    }

    fn allows_edge(&self, edge: &Edge) -> bool {
        !(self.enabled && edge.edge_type == EdgeType::SubclassOf)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    NodeType(NodeTypeFilter),
    Degree(DegreeFilter),
    EdgeType(EdgeTypeFilter),
    SubclassCollapse(SubclassCollapseFilter),
}

impl Filter {
    pub fn kind(&self) -> FilterKind {
        match self {
            Filter::NodeType(_) => FilterKind::NodeType,
            Filter::Degree(_) => FilterKind::Degree,
            Filter::EdgeType(_) => FilterKind::EdgeType,
            Filter::SubclassCollapse(_) => FilterKind::SubclassCollapse,
        }
    }
}

/// Serializable description of a pipeline, as read from a config file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_types: Option<Vec<NodeType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_types: Option<Vec<EdgeType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_degree: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_degree: Option<usize>,
    pub collapse_subclasses: bool,
}

/// Visible counts after an apply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FilterSummary {
    pub visible_nodes: usize,
    pub hidden_nodes: usize,
    pub visible_edges: usize,
    pub hidden_edges: usize,
}

/// The set of enabled filters, at most one per [`FilterKind`].
#[derive(Clone, Debug, Default)]
pub struct FilterPipeline {
    filters: BTreeMap<FilterKind, Filter>,
}

impl FilterPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &FilterConfig) -> Self {
        let mut pipeline = Self::new();
        if let Some(types) = &config.node_types {
            pipeline.enable(Filter::NodeType(NodeTypeFilter::new(types.iter().copied())));
        }
        if let Some(types) = &config.edge_types {
            pipeline.enable(Filter::EdgeType(EdgeTypeFilter::new(types.iter().copied())));
        }
        if config.min_degree.is_some() || config.max_degree.is_some() {
            pipeline.enable(Filter::Degree(DegreeFilter::new(
                config.min_degree.unwrap_or(0),
                config.max_degree.unwrap_or(usize::MAX),
            )));
        }
        if config.collapse_subclasses {
            pipeline.enable(Filter::SubclassCollapse(SubclassCollapseFilter::new(true)));
        }
        pipeline
    }

    /// Enable `filter`, replacing any filter of the same kind.
    pub fn enable(&mut self, filter: Filter) -> Option<Filter> {
        self.filters.insert(filter.kind(), filter)
    }

    pub fn disable(&mut self, kind: FilterKind) -> Option<Filter> {
        self.filters.remove(&kind)
    }

    pub fn is_enabled(&self, kind: FilterKind) -> bool {
        self.filters.contains_key(&kind)
    }

    pub fn get(&self, kind: FilterKind) -> Option<&Filter> {
        self.filters.get(&kind)
    }

    pub fn subclass_collapse(&self) -> Option<&SubclassCollapseFilter> {
        match self.filters.get(&FilterKind::SubclassCollapse) {
            Some(Filter::SubclassCollapse(filter)) => Some(filter),
            _ => None,
        }
    }

    /// Mutable access for expanding and collapsing individual roots.
    pub fn subclass_collapse_mut(&mut self) -> Option<&mut SubclassCollapseFilter> {
        match self.filters.get_mut(&FilterKind::SubclassCollapse) {
            Some(Filter::SubclassCollapse(filter)) => Some(filter),
            _ => None,
        }
    }

    /// Recompute every visibility flag from scratch.
    pub fn apply(&mut self, graph: &mut Graph) -> FilterSummary {
        let degrees = if self.is_enabled(FilterKind::Degree) {
            graph.degree_table(false)
        } else {
            Vec::new()
        };
        for filter in self.filters.values_mut() {
            if let Filter::SubclassCollapse(collapse) = filter {
                collapse.prepare(graph);
            }
        }

        for index in 0..graph.node_count() {
            let node = &graph.nodes()[index];
            let visible = self.filters.values().all(|filter| match filter {
                Filter::NodeType(f) => f.allows(node.node_type),
                Filter::Degree(f) => f.allows(degrees[index]),
                Filter::EdgeType(_) => true,
                Filter::SubclassCollapse(f) => f.allows_node(index),
            });
            graph.set_node_visible(index, visible);
        }

        for index in 0..graph.edge_count() {
            let edge = &graph.edges()[index];
            let visible = self.filters.values().all(|filter| match filter {
                Filter::EdgeType(f) => f.allows(edge.edge_type),
                Filter::SubclassCollapse(f) => f.allows_edge(edge),
                Filter::NodeType(_) | Filter::Degree(_) => true,
            });
            graph.set_edge_visible(index, visible);
        }

        let visible_nodes = graph.visible_nodes().count();
        let visible_edges = graph.visible_edges().count();
        let summary = FilterSummary {
            visible_nodes,
            hidden_nodes: graph.node_count() - visible_nodes,
            visible_edges,
            hidden_edges: graph.edge_count() - visible_edges,
        };
        debug!(
            filters = self.filters.len(),
            visible_nodes, visible_edges, "applied filters"
        );
        summary
    }
}
