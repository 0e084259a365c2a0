// Copyright 2026 The Vowl Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Validation and normalization of VOWL JSON into a [`Graph`].
//!
//! Loading runs in fixed stages: nodes (base + attribute records), edges
//! (property + attribute records), inverse pairing, equivalence merging for
//! nodes and then properties, and finally synthesis of set-operator operand
//! links. Any failure aborts the whole load.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::common::{DisjointSet, ParseError, Result, iri_local_name, malformed};
use crate::graph::{
    Cardinality, Characteristics, Edge, EdgeType, Graph, IRI_BASED_LANGUAGE, Individual,
    LanguageMap, Namespace, Node, NodeType, OntologyMetadata, SetOperator,
};
use crate::json;

/// Limits and strictness applied while loading.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Load only the first `max_classes` class records; 0 loads all of them.
    pub max_classes: usize,
    /// When false, a node whose labels are all blank is malformed. A node
    /// without any label falls back to its IRI and is never blank.
    pub allow_empty_labels: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            max_classes: 0,
            allow_empty_labels: true,
        }
    }
}

/// Parse and validate a VOWL JSON document.
pub fn parse(raw: &str) -> Result<Graph> {
    parse_with(raw, &ParserConfig::default())
}

pub fn parse_with(raw: &str, config: &ParserConfig) -> Result<Graph> {
    let ontology: json::Ontology = raw.parse()?;
    build_with(ontology, config)
}

/// Parse an already-decoded JSON value.
pub fn parse_value(value: serde_json::Value) -> Result<Graph> {
    build(json::Ontology::try_from(value)?)
}

/// Turn raw records into a validated graph.
pub fn build(ontology: json::Ontology) -> Result<Graph> {
    build_with(ontology, &ParserConfig::default())
}

pub fn build_with(ontology: json::Ontology, config: &ParserConfig) -> Result<Graph> {
    let json::Ontology {
        header,
        namespace,
        mut class,
        class_attribute,
        datatype,
        datatype_attribute,
        property,
        property_attribute,
    } = ontology;

    if config.max_classes > 0 && class.len() > config.max_classes {
        debug!(
            dropped = class.len() - config.max_classes,
            max_classes = config.max_classes,
            "truncating class records"
        );
        class.truncate(config.max_classes);
    }

    let mut builder = Builder {
        allow_empty_labels: config.allow_empty_labels,
        ..Builder::default()
    };

    let mut class_attributes = attribute_map(class_attribute.into_iter().chain(datatype_attribute));
    builder.add_nodes(class.into_iter().chain(datatype), &mut class_attributes)?;
    for id in class_attributes.keys() {
        warn!(id = %id, "ignoring attribute record without a base record");
    }

    let mut property_attributes: BTreeMap<String, json::PropertyDetails> = BTreeMap::new();
    for record in property_attribute {
        match property_attributes.get_mut(&record.id) {
            Some(details) => details.fill_from(record.details),
            None => {
                property_attributes.insert(record.id, record.details);
            }
        }
    }
    builder.add_edges(property, &mut property_attributes)?;
    for id in property_attributes.keys() {
        warn!(id = %id, "ignoring property attribute without a base record");
    }

    builder.resolve_inverses()?;
    builder.merge_equivalent_nodes()?;
    builder.merge_equivalent_edges()?;
    builder.link_set_operators()?;

    let metadata = header.map(metadata_from).unwrap_or_default();
    let namespaces = namespace
        .into_records()
        .into_iter()
        .map(|ns| Namespace {
            prefix: ns.prefix,
            iri: ns.iri,
        })
        .collect();

    let graph = Graph::new(metadata, namespaces, builder.nodes, builder.edges)?;
    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built ontology graph"
    );
    Ok(graph)
}

fn attribute_map(
    records: impl Iterator<Item = json::ClassAttribute>,
) -> BTreeMap<String, json::ClassDetails> {
    let mut map: BTreeMap<String, json::ClassDetails> = BTreeMap::new();
    for record in records {
        match map.get_mut(&record.id) {
            Some(details) => details.fill_from(record.details),
            None => {
                map.insert(record.id, record.details);
            }
        }
    }
    map
}

fn metadata_from(header: json::Header) -> OntologyMetadata {
    OntologyMetadata {
        iri: header.iri,
        version: header.version,
        title: header.title.map(json::Localized::into_map).unwrap_or_default(),
        description: header
            .description
            .map(json::Localized::into_map)
            .unwrap_or_default(),
        languages: header.languages,
    }
}

/// Labels from the record, else the IRI's local name, else empty.
fn labels_or_local_name(label: Option<json::Localized>, iri: &str) -> LanguageMap {
    let labels = label.map(json::Localized::into_map).unwrap_or_default();
    if !labels.is_empty() {
        return labels;
    }
    let local = iri_local_name(iri);
    if local.is_empty() {
        LanguageMap::new()
    } else {
        LanguageMap::from([(IRI_BASED_LANGUAGE.to_string(), local.to_string())])
    }
}

fn merge_labels(into: &mut LanguageMap, from: &LanguageMap) {
    for (lang, text) in from {
        into.entry(lang.clone()).or_insert_with(|| text.clone());
    }
}

fn characteristics_for(edge_type: EdgeType, details: &json::PropertyDetails) -> Characteristics {
    let mut c = Characteristics {
        functional: details.functional,
        inverse_functional: details.inverse_functional,
        transitive: details.transitive,
        symmetric: details.symmetric,
    };
    for attr in &details.attributes {
        match attr.as_str() {
            "functional" => c.functional = true,
            "inverse functional" | "inverseFunctional" => c.inverse_functional = true,
            "transitive" => c.transitive = true,
            "symmetric" => c.symmetric = true,
            _ => {}
        }
    }
    match edge_type {
        EdgeType::Functional => c.functional = true,
        EdgeType::InverseFunctional => c.inverse_functional = true,
        EdgeType::Transitive => c.transitive = true,
        EdgeType::Symmetric => c.symmetric = true,
        _ => {}
    }
    c
}

fn cardinality_for(details: &json::PropertyDetails) -> Result<Option<Cardinality>> {
    let value = |count: &Option<json::Count>| count.as_ref().map(json::Count::value).transpose();
    let cardinality = Cardinality {
        exact: value(&details.cardinality)?,
        min: value(&details.min_cardinality)?,
        max: value(&details.max_cardinality)?,
    };
    if cardinality == Cardinality::default() {
        Ok(None)
    } else {
        Ok(Some(cardinality))
    }
}

#[derive(Default)]
struct Builder {
    nodes: Vec<Node>,
    node_index: HashMap<String, usize>,
    edges: Vec<Edge>,
    edge_index: HashMap<String, usize>,
    /// merged-away node id -> representative id
    node_redirects: HashMap<String, String>,
    allow_empty_labels: bool,
}

impl Builder {
    fn add_nodes(
        &mut self,
        records: impl Iterator<Item = json::Class>,
        attributes: &mut BTreeMap<String, json::ClassDetails>,
    ) -> Result<()> {
        for record in records {
            let json::Class {
                id,
                type_tag,
                mut details,
            } = record;
            if id.is_empty() {
                return malformed!("class record with empty id");
            }
            if self.node_index.contains_key(&id) {
                return malformed!("duplicate node id '{id}'");
            }
            if let Some(extra) = attributes.remove(&id) {
                details.fill_from(extra);
            }

            let mut node_type: NodeType = type_tag.parse()?;
            if node_type == NodeType::Class {
                if details.attributes.iter().any(|a| a == "deprecated") {
                    node_type = NodeType::Deprecated;
                } else if details.external || details.attributes.iter().any(|a| a == "external") {
                    node_type = NodeType::External;
                }
            }

            let mut node = Node::new(id.clone(), node_type);
            if let Some(iri) = details.iri {
                node.iri = iri;
            }
            node.labels = labels_or_local_name(details.label, &node.iri);
            if !self.allow_empty_labels && node.labels.values().all(|text| text.trim().is_empty()) {
                return malformed!("node '{id}' has an empty label");
            }
            node.comment = details
                .comment
                .as_ref()
                .and_then(json::Localized::preferred)
                .map(str::to_string);
            node.attributes = details.attributes.into_iter().collect();
            let counted = match details.individuals {
                json::Individuals::Count(n) => n,
                json::Individuals::List(_) => 0,
            };
            node.individuals = details
                .individuals
                .into_records()
                .into_iter()
                .map(|ind| Individual {
                    labels: labels_or_local_name(ind.labels, &ind.iri),
                    iri: ind.iri,
                })
                .collect();
            node.instances = details.instances.unwrap_or(0).max(counted);
            node.equivalents = details.equivalent;
            for (op, operands) in [
                (SetOperator::Union, details.union),
                (SetOperator::Intersection, details.intersection),
                (SetOperator::Complement, details.complement),
                (SetOperator::DisjointUnion, details.disjoint_union),
            ] {
                if !operands.is_empty() {
                    node.operands.insert(op, operands);
                }
            }
            node.refresh_radius();

            self.node_index.insert(id, self.nodes.len());
            self.nodes.push(node);
        }
        Ok(())
    }

    fn require_node(&self, id: &str) -> Result<()> {
        if self.node_index.contains_key(id) {
            Ok(())
        } else {
            Err(ParseError::DanglingReference(id.to_string()))
        }
    }

    fn push_edge(&mut self, edge: Edge) -> Result<()> {
        if self.edge_index.contains_key(&edge.id) {
            return malformed!("duplicate property id '{}'", edge.id);
        }
        self.edge_index.insert(edge.id.clone(), self.edges.len());
        self.edges.push(edge);
        Ok(())
    }

    fn add_edges(
        &mut self,
        records: Vec<json::Property>,
        attributes: &mut BTreeMap<String, json::PropertyDetails>,
    ) -> Result<()> {
        for record in records {
            let json::Property {
                id,
                type_tag,
                mut details,
            } = record;
            if id.is_empty() {
                return malformed!("property record with empty id");
            }
            if let Some(extra) = attributes.remove(&id) {
                details.fill_from(extra);
            }
            let edge_type: EdgeType = type_tag.parse()?;

            let Some(domain) = details.domain.take() else {
                return malformed!("property '{id}' has no domain");
            };
            let Some(range) = details.range.take() else {
                return malformed!("property '{id}' has no range");
            };
            self.require_node(&domain)?;
            self.require_node(&range)?;

            let mut edge = Edge::new(id, edge_type, domain, range);
            if let Some(iri) = details.iri.take() {
                edge.iri = iri;
                edge.labels = labels_or_local_name(details.label.take(), &edge.iri);
            } else {
                edge.labels = details
                    .label
                    .take()
                    .map(json::Localized::into_map)
                    .unwrap_or_default();
            }
            edge.cardinality = cardinality_for(&details)?;
            edge.characteristics = characteristics_for(edge_type, &details);
            edge.inverse = details.inverse.filter(|inv| !inv.is_empty());
            edge.equivalents = details.equivalent;
            self.push_edge(edge)?;
        }
        Ok(())
    }

    /// Make inverse links symmetric. A declared partner that is missing
    /// gets synthesized with swapped endpoints.
    fn resolve_inverses(&mut self) -> Result<()> {
        let declared = self.edges.len();
        for i in 0..declared {
            let Some(partner) = self.edges[i].inverse.clone() else {
                continue;
            };
            if partner == self.edges[i].id {
                continue;
            }
            match self.edge_index.get(&partner).copied() {
                Some(j) => {
                    let own = self.edges[i].id.clone();
                    match self.edges[j].inverse.clone() {
                        None => self.edges[j].inverse = Some(own),
                        Some(existing) if existing != own => {
                            debug!(
                                property = %own,
                                partner = %partner,
                                partner_inverse = %existing,
                                "inverse partner already paired elsewhere"
                            );
                        }
                        Some(_) => {}
                    }
                }
                None => {
                    let original = &self.edges[i];
                    let mut synthesized = Edge::new(
                        partner.clone(),
                        original.edge_type,
                        original.target.clone(),
                        original.source.clone(),
                    );
                    synthesized.inverse = Some(original.id.clone());
                    synthesized.labels = original.labels.clone();
                    synthesized.characteristics = original.characteristics.inverted();
                    synthesized.synthesized = true;
                    debug!(property = %original.id, inverse = %partner, "synthesized inverse");
                    self.push_edge(synthesized)?;
                }
            }
        }
        Ok(())
    }

    fn representative(&self, id: &str) -> String {
        self.node_redirects
            .get(id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }

    /// Collapse each equivalence cluster onto its lexicographically lowest
    /// id and re-point every edge at the representative.
    fn merge_equivalent_nodes(&mut self) -> Result<()> {
        let mut sets = DisjointSet::new(self.nodes.len());
        for (i, node) in self.nodes.iter().enumerate() {
            for other in &node.equivalents {
                let j = *self
                    .node_index
                    .get(other)
                    .ok_or_else(|| ParseError::DanglingReference(other.clone()))?;
                sets.union(i, j);
            }
        }
        for edge in &self.edges {
            if edge.edge_type == EdgeType::EquivalentClass {
                if let (Some(&i), Some(&j)) = (
                    self.node_index.get(&edge.source),
                    self.node_index.get(&edge.target),
                ) {
                    sets.union(i, j);
                }
            }
        }

        for mut group in sets.groups() {
            group.sort_by(|&a, &b| self.nodes[a].id.cmp(&self.nodes[b].id));
            let rep = group[0];
            let rep_id = self.nodes[rep].id.clone();
            let members: Vec<String> = group.iter().map(|&i| self.nodes[i].id.clone()).collect();

            for &other in &group[1..] {
                let merged = self.nodes[other].clone();
                let target = &mut self.nodes[rep];
                merge_labels(&mut target.labels, &merged.labels);
                if target.comment.is_none() {
                    target.comment = merged.comment;
                }
                target.attributes.extend(merged.attributes);
                for individual in merged.individuals {
                    if !target.individuals.iter().any(|i| i.iri == individual.iri) {
                        target.individuals.push(individual);
                    }
                }
                target.instances = target.instances.max(merged.instances);
                for (op, operands) in merged.operands {
                    let list = target.operands.entry(op).or_default();
                    for operand in operands {
                        if !list.contains(&operand) {
                            list.push(operand);
                        }
                    }
                }

                let node = &mut self.nodes[other];
                node.visible = false;
                node.equivalent_group = Some(rep_id.clone());
                self.node_redirects.insert(node.id.clone(), rep_id.clone());
            }

            let target = &mut self.nodes[rep];
            target.equivalents = members.into_iter().filter(|id| *id != rep_id).collect();
            target.refresh_radius();
            debug!(representative = %rep_id, members = group.len(), "merged equivalent classes");
        }

        if self.node_redirects.is_empty() {
            return Ok(());
        }

        let redirects = &self.node_redirects;
        let resolve = |id: &str| redirects.get(id).cloned();
        self.edges.retain_mut(|edge| {
            let collapsed_source = resolve(&edge.source);
            let collapsed_target = resolve(&edge.target);
            let was_self_loop = edge.source == edge.target;
            if let Some(source) = collapsed_source {
                edge.source = source;
            }
            if let Some(target) = collapsed_target {
                edge.target = target;
            }
            !(edge.edge_type == EdgeType::EquivalentClass && edge.is_self_loop() && !was_self_loop)
        });
        self.reindex_edges();
        Ok(())
    }

    fn reindex_edges(&mut self) {
        self.edge_index = self
            .edges
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id.clone(), i))
            .collect();
    }

    /// Same clustering for `equivalent` property lists. Merged-away
    /// properties stay in the graph as hidden aliases.
    fn merge_equivalent_edges(&mut self) -> Result<()> {
        let mut sets = DisjointSet::new(self.edges.len());
        let mut any = false;
        for (i, edge) in self.edges.iter().enumerate() {
            for other in &edge.equivalents {
                let j = *self
                    .edge_index
                    .get(other)
                    .ok_or_else(|| ParseError::DanglingReference(other.clone()))?;
                sets.union(i, j);
                any = true;
            }
        }
        if !any {
            return Ok(());
        }

        for mut group in sets.groups() {
            group.sort_by(|&a, &b| self.edges[a].id.cmp(&self.edges[b].id));
            let rep = group[0];
            let rep_id = self.edges[rep].id.clone();
            let members: Vec<String> = group.iter().map(|&i| self.edges[i].id.clone()).collect();

            for &other in &group[1..] {
                let merged = self.edges[other].clone();
                let target = &mut self.edges[rep];
                merge_labels(&mut target.labels, &merged.labels);
                target.characteristics = target.characteristics.union(merged.characteristics);
                if target.cardinality.is_none() {
                    target.cardinality = merged.cardinality;
                }

                let edge = &mut self.edges[other];
                edge.visible = false;
                edge.equivalent_group = Some(rep_id.clone());
            }
            self.edges[rep].equivalents = members.into_iter().filter(|id| *id != rep_id).collect();
            debug!(representative = %rep_id, members = group.len(), "merged equivalent properties");
        }
        Ok(())
    }

    /// Emit one link per operand of every visible set-operator owner.
    fn link_set_operators(&mut self) -> Result<()> {
        let mut links = Vec::new();
        for node in self.nodes.iter().filter(|n| !n.is_merged()) {
            for (op, operands) in &node.operands {
                for (index, operand) in operands.iter().enumerate() {
                    self.require_node(operand)?;
                    let target = self.representative(operand);
                    let id = format!("{}-{}-{}-{}", op.key(), node.id, target, index);
                    links.push(Edge::new(id, EdgeType::SetOperatorLink, node.id.clone(), target));
                }
            }
        }
        for mut link in links {
            link.synthesized = true;
            self.push_edge(link)?;
        }
        Ok(())
    }
}
