// Copyright 2026 The Vowl Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Typed node/edge storage for a parsed ontology.
//!
//! Topology (which nodes and edges exist, and what they connect) is fixed
//! when the parser hands over a [`Graph`]. Afterwards only layout state
//! (position, velocity, pinned) and visibility change, and only through the
//! crate-private setters used by the layout engine and the filter pipeline.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::common::{ParseError, Result, malformed};

/// Language tag to text. Plain (untagged) strings in the input are stored
/// under [`UNDEFINED_LANGUAGE`].
pub type LanguageMap = BTreeMap<String, String>;

pub const UNDEFINED_LANGUAGE: &str = "undefined";
pub const IRI_BASED_LANGUAGE: &str = "IRI-based";
pub const DEFAULT_LANGUAGE: &str = "en";

/// Radius of a plain class node; other node kinds and individual scaling
/// are expressed relative to it.
pub const DEFAULT_RADIUS: f64 = 50.0;

/// 2D position/vector used for node coordinates, velocities and forces.
#[derive(Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

impl Position {
    pub const ZERO: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    pub fn distance(self, other: Self) -> f64 {
        (other - self).length()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Position {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl AddAssign for Position {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Position {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Mul<f64> for Position {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

/// OWL set operators that get their own node and operand links.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SetOperator {
    Union,
    Intersection,
    Complement,
    DisjointUnion,
}

impl SetOperator {
    /// Key used in attribute records and generated edge ids.
    pub fn key(self) -> &'static str {
        match self {
            SetOperator::Union => "union",
            SetOperator::Intersection => "intersection",
            SetOperator::Complement => "complement",
            SetOperator::DisjointUnion => "disjointUnion",
        }
    }
}

macro_rules! string_tagged {
    ($ty:ident) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let tag = String::deserialize(deserializer)?;
                tag.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

/// Closed set of node kinds. Every behavior that differs per kind matches
/// on this exhaustively.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeType {
    Class,
    Thing,
    Nothing,
    Datatype,
    SetOperator(SetOperator),
    External,
    Deprecated,
}

impl NodeType {
    pub const ALL: [NodeType; 10] = [
        NodeType::Class,
        NodeType::Thing,
        NodeType::Nothing,
        NodeType::Datatype,
        NodeType::SetOperator(SetOperator::Union),
        NodeType::SetOperator(SetOperator::Intersection),
        NodeType::SetOperator(SetOperator::Complement),
        NodeType::SetOperator(SetOperator::DisjointUnion),
        NodeType::External,
        NodeType::Deprecated,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Class => "owl:Class",
            NodeType::Thing => "owl:Thing",
            NodeType::Nothing => "owl:Nothing",
            NodeType::Datatype => "rdfs:Datatype",
            NodeType::SetOperator(SetOperator::Union) => "owl:unionOf",
            NodeType::SetOperator(SetOperator::Intersection) => "owl:intersectionOf",
            NodeType::SetOperator(SetOperator::Complement) => "owl:complementOf",
            NodeType::SetOperator(SetOperator::DisjointUnion) => "owl:disjointUnionOf",
            NodeType::External => "owl:externalClass",
            NodeType::Deprecated => "owl:deprecatedClass",
        }
    }

    /// Radius before any individual-count scaling.
    pub fn default_radius(self) -> f64 {
        match self {
            NodeType::Class | NodeType::External | NodeType::Deprecated => DEFAULT_RADIUS,
            NodeType::SetOperator(_) => 40.0,
            NodeType::Thing | NodeType::Nothing => 30.0,
            NodeType::Datatype => 25.0,
        }
    }
}

impl FromStr for NodeType {
    type Err = ParseError;

    fn from_str(tag: &str) -> Result<Self> {
        let ty = match tag {
            "owl:Class" | "rdfs:Class" | "owl:equivalentClass" => NodeType::Class,
            "owl:Thing" | "rdfs:Resource" => NodeType::Thing,
            "owl:Nothing" => NodeType::Nothing,
            "rdfs:Datatype" | "rdfs:Literal" => NodeType::Datatype,
            "owl:unionOf" => NodeType::SetOperator(SetOperator::Union),
            "owl:intersectionOf" => NodeType::SetOperator(SetOperator::Intersection),
            "owl:complementOf" => NodeType::SetOperator(SetOperator::Complement),
            "owl:disjointUnionOf" => NodeType::SetOperator(SetOperator::DisjointUnion),
            "owl:externalClass" => NodeType::External,
            "owl:deprecatedClass" => NodeType::Deprecated,
            other => return Err(ParseError::UnknownType(other.to_string())),
        };
        Ok(ty)
    }
}

string_tagged!(NodeType);

/// Closed set of edge (property instance) kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeType {
    ObjectProperty,
    DatatypeProperty,
    SubclassOf,
    DisjointWith,
    EquivalentClass,
    Inverse,
    Transitive,
    Symmetric,
    Functional,
    InverseFunctional,
    AllValuesFrom,
    SomeValuesFrom,
    SetOperatorLink,
}

impl EdgeType {
    pub const ALL: [EdgeType; 13] = [
        EdgeType::ObjectProperty,
        EdgeType::DatatypeProperty,
        EdgeType::SubclassOf,
        EdgeType::DisjointWith,
        EdgeType::EquivalentClass,
        EdgeType::Inverse,
        EdgeType::Transitive,
        EdgeType::Symmetric,
        EdgeType::Functional,
        EdgeType::InverseFunctional,
        EdgeType::AllValuesFrom,
        EdgeType::SomeValuesFrom,
        EdgeType::SetOperatorLink,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EdgeType::ObjectProperty => "owl:ObjectProperty",
            EdgeType::DatatypeProperty => "owl:DatatypeProperty",
            EdgeType::SubclassOf => "rdfs:subClassOf",
            EdgeType::DisjointWith => "owl:disjointWith",
            EdgeType::EquivalentClass => "owl:equivalentClass",
            EdgeType::Inverse => "owl:inverseOf",
            EdgeType::Transitive => "owl:TransitiveProperty",
            EdgeType::Symmetric => "owl:SymmetricProperty",
            EdgeType::Functional => "owl:FunctionalProperty",
            EdgeType::InverseFunctional => "owl:InverseFunctionalProperty",
            EdgeType::AllValuesFrom => "owl:allValuesFrom",
            EdgeType::SomeValuesFrom => "owl:someValuesFrom",
            EdgeType::SetOperatorLink => "setOperatorProperty",
        }
    }

    /// Spring rest length used by the layout when no override is configured.
    /// Links into datatypes are kept short so literals hug their class.
    pub fn default_rest_length(self) -> f64 {
        match self {
            EdgeType::ObjectProperty
            | EdgeType::EquivalentClass
            | EdgeType::Inverse
            | EdgeType::Transitive
            | EdgeType::Symmetric
            | EdgeType::Functional
            | EdgeType::InverseFunctional
            | EdgeType::AllValuesFrom
            | EdgeType::SomeValuesFrom => 200.0,
            EdgeType::DisjointWith => 250.0,
            EdgeType::SubclassOf => 160.0,
            EdgeType::DatatypeProperty | EdgeType::SetOperatorLink => 120.0,
        }
    }
}

impl FromStr for EdgeType {
    type Err = ParseError;

    fn from_str(tag: &str) -> Result<Self> {
        let ty = match tag {
            "owl:ObjectProperty" | "rdf:Property" => EdgeType::ObjectProperty,
            "owl:DatatypeProperty" => EdgeType::DatatypeProperty,
            "rdfs:subClassOf" => EdgeType::SubclassOf,
            "owl:disjointWith" => EdgeType::DisjointWith,
            "owl:equivalentClass" => EdgeType::EquivalentClass,
            "owl:inverseOf" => EdgeType::Inverse,
            "owl:TransitiveProperty" => EdgeType::Transitive,
            "owl:SymmetricProperty" => EdgeType::Symmetric,
            "owl:FunctionalProperty" => EdgeType::Functional,
            "owl:InverseFunctionalProperty" => EdgeType::InverseFunctional,
            "owl:allValuesFrom" => EdgeType::AllValuesFrom,
            "owl:someValuesFrom" => EdgeType::SomeValuesFrom,
            "setOperatorProperty" => EdgeType::SetOperatorLink,
            other => return Err(ParseError::UnknownType(other.to_string())),
        };
        Ok(ty)
    }
}

string_tagged!(EdgeType);

/// Property characteristics, collected from the attribute list and from
/// characteristic-typed properties.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Characteristics {
    pub functional: bool,
    pub inverse_functional: bool,
    pub transitive: bool,
    pub symmetric: bool,
}

impl Characteristics {
    pub fn union(self, other: Self) -> Self {
        Self {
            functional: self.functional || other.functional,
            inverse_functional: self.inverse_functional || other.inverse_functional,
            transitive: self.transitive || other.transitive,
            symmetric: self.symmetric || other.symmetric,
        }
    }

    /// Characteristics of the inverse property: functional and
    /// inverse-functional swap roles.
    pub fn inverted(self) -> Self {
        Self {
            functional: self.inverse_functional,
            inverse_functional: self.functional,
            ..self
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Cardinality {
    pub exact: Option<u32>,
    pub min: Option<u32>,
    pub max: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Individual {
    pub iri: String,
    pub labels: LanguageMap,
}

/// Pick the best entry of a language map: the requested language, then
/// English, then untagged, then IRI-derived, then whatever comes first.
pub fn preferred_text<'a>(map: &'a LanguageMap, lang: Option<&str>) -> Option<&'a str> {
    lang.into_iter()
        .chain([DEFAULT_LANGUAGE, UNDEFINED_LANGUAGE, IRI_BASED_LANGUAGE])
        .find_map(|key| map.get(key))
        .or_else(|| map.values().next())
        .map(String::as_str)
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: String,
    pub node_type: NodeType,
    pub iri: String,
    pub labels: LanguageMap,
    pub comment: Option<String>,
    /// Raw attribute tags from the input (`external`, `deprecated`, ...).
    pub attributes: BTreeSet<String>,
    pub individuals: Vec<Individual>,
    /// Declared instance count; may exceed the listed individuals.
    pub instances: usize,
    /// Equivalent node ids. After merging, the representative lists the
    /// whole group.
    pub equivalents: Vec<String>,
    pub operands: BTreeMap<SetOperator, Vec<String>>,
    pub radius: f64,
    /// Set on merged-away members of an equivalence group; names the
    /// visible representative.
    pub equivalent_group: Option<String>,
    pub(crate) position: Position,
    pub(crate) velocity: Position,
    pub(crate) pinned: bool,
    pub(crate) visible: bool,
    pub(crate) has_position: bool,
}

impl Node {
    pub fn new(id: impl Into<String>, node_type: NodeType) -> Self {
        let id = id.into();
        Self {
            iri: id.clone(),
            id,
            node_type,
            labels: LanguageMap::new(),
            comment: None,
            attributes: BTreeSet::new(),
            individuals: Vec::new(),
            instances: 0,
            equivalents: Vec::new(),
            operands: BTreeMap::new(),
            radius: node_type.default_radius(),
            equivalent_group: None,
            position: Position::ZERO,
            velocity: Position::ZERO,
            pinned: false,
            visible: true,
            has_position: false,
        }
    }

    pub fn label(&self, lang: Option<&str>) -> &str {
        preferred_text(&self.labels, lang).unwrap_or(&self.id)
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn velocity(&self) -> Position {
        self.velocity
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn has_position(&self) -> bool {
        self.has_position
    }

    /// True for members of an equivalence group other than the
    /// representative. These stay hidden whatever the filters say.
    pub fn is_merged(&self) -> bool {
        self.equivalent_group.is_some()
    }

    pub fn individual_count(&self) -> usize {
        self.individuals.len().max(self.instances)
    }

    /// Integration mass: heavier for bigger nodes so large classes move less.
    pub fn mass(&self) -> f64 {
        (self.radius / DEFAULT_RADIUS).max(f64::MIN_POSITIVE)
    }

    /// Square-root scaling of the base radius by individual count.
    pub fn scaled_radius(node_type: NodeType, individuals: usize) -> f64 {
        let base = node_type.default_radius();
        if individuals == 0 {
            base
        } else {
            base + (individuals as f64).sqrt() * 3.0
        }
    }

    pub(crate) fn refresh_radius(&mut self) {
        self.radius = Self::scaled_radius(self.node_type, self.individual_count());
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub id: String,
    pub edge_type: EdgeType,
    pub iri: String,
    pub source: String,
    pub target: String,
    pub inverse: Option<String>,
    pub labels: LanguageMap,
    pub characteristics: Characteristics,
    pub cardinality: Option<Cardinality>,
    pub equivalents: Vec<String>,
    /// Set on merged-away equivalent properties. Such edges are aliases of
    /// the representative and take no part in degree or visibility.
    pub equivalent_group: Option<String>,
    /// Generated by the parser (missing inverse direction, set operator
    /// operand link) rather than declared in the input.
    pub synthesized: bool,
    pub(crate) visible: bool,
}

impl Edge {
    pub fn new(
        id: impl Into<String>,
        edge_type: EdgeType,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        let id = id.into();
        Self {
            iri: id.clone(),
            id,
            edge_type,
            source: source.into(),
            target: target.into(),
            inverse: None,
            labels: LanguageMap::new(),
            characteristics: Characteristics::default(),
            cardinality: None,
            equivalents: Vec::new(),
            equivalent_group: None,
            synthesized: false,
            visible: true,
        }
    }

    pub fn label(&self, lang: Option<&str>) -> &str {
        preferred_text(&self.labels, lang).unwrap_or("")
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_merged(&self) -> bool {
        self.equivalent_group.is_some()
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }

    /// The endpoint opposite `node_id`, if the edge touches it.
    pub fn opposite(&self, node_id: &str) -> Option<&str> {
        if self.source == node_id {
            Some(&self.target)
        } else if self.target == node_id {
            Some(&self.source)
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct OntologyMetadata {
    pub iri: Option<String>,
    pub version: Option<String>,
    pub title: LanguageMap,
    pub description: LanguageMap,
    pub languages: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Namespace {
    pub prefix: Option<String>,
    pub iri: String,
}

/// Parsed ontology graph. Built once by the parser; see the module docs for
/// what may change afterwards.
#[derive(Clone, Debug)]
pub struct Graph {
    metadata: OntologyMetadata,
    namespaces: Vec<Namespace>,
    nodes: Vec<Node>,
    node_index: HashMap<String, usize>,
    edges: Vec<Edge>,
    edge_index: HashMap<String, usize>,
    /// (source, target) node indices, parallel to `edges`.
    endpoints: Vec<(usize, usize)>,
}

impl Graph {
    /// Assemble a graph, enforcing unique ids and resolvable endpoints.
    /// Edges touching an invisible node start out invisible.
    pub(crate) fn new(
        metadata: OntologyMetadata,
        namespaces: Vec<Namespace>,
        nodes: Vec<Node>,
        mut edges: Vec<Edge>,
    ) -> Result<Self> {
        let mut node_index = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if node_index.insert(node.id.clone(), i).is_some() {
                return malformed!("duplicate node id '{}'", node.id);
            }
        }

        let mut edge_index = HashMap::with_capacity(edges.len());
        let mut endpoints = Vec::with_capacity(edges.len());
        for (i, edge) in edges.iter_mut().enumerate() {
            if edge_index.insert(edge.id.clone(), i).is_some() {
                return malformed!("duplicate property id '{}'", edge.id);
            }
            let source = *node_index
                .get(&edge.source)
                .ok_or_else(|| ParseError::DanglingReference(edge.source.clone()))?;
            let target = *node_index
                .get(&edge.target)
                .ok_or_else(|| ParseError::DanglingReference(edge.target.clone()))?;
            edge.visible =
                edge.visible && !edge.is_merged() && nodes[source].visible && nodes[target].visible;
            endpoints.push((source, target));
        }

        Ok(Self {
            metadata,
            namespaces,
            nodes,
            node_index,
            edges,
            edge_index,
            endpoints,
        })
    }

    pub fn metadata(&self) -> &OntologyMetadata {
        &self.metadata
    }

    pub fn namespaces(&self) -> &[Namespace] {
        &self.namespaces
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.node_index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edge_index.get(id).map(|&i| &self.edges[i])
    }

    /// All nodes in topology order, including hidden ones.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edges in topology order, including hidden ones.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of edges incident to `node_id` in the full topology, counting
    /// both directions and ignoring visibility. Merged-away property aliases
    /// are not counted; a self-loop counts once.
    pub fn degree(&self, node_id: &str) -> usize {
        self.edges
            .iter()
            .filter(|e| !e.is_merged() && e.touches(node_id))
            .count()
    }

    /// Like [`Graph::degree`], restricted to currently visible edges.
    pub fn visible_degree(&self, node_id: &str) -> usize {
        self.visible_edges().filter(|e| e.touches(node_id)).count()
    }

    /// Adjacent node ids over the full topology, each reported once, in edge
    /// order.
    pub fn neighbors<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        let mut seen = BTreeSet::new();
        self.edges
            .iter()
            .filter(|e| !e.is_merged())
            .filter_map(move |e| e.opposite(node_id))
            .filter(move |&other| seen.insert(other))
    }

    pub fn visible_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.visible)
    }

    pub fn visible_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(|e| e.visible)
    }

    /// Degree of every node in one pass over the edges, indexed like
    /// [`Graph::nodes`]. Agrees with [`Graph::degree`] (or
    /// [`Graph::visible_degree`] when `visible_only`).
    pub(crate) fn degree_table(&self, visible_only: bool) -> Vec<usize> {
        let mut degrees = vec![0; self.nodes.len()];
        for (edge, &(source, target)) in self.edges.iter().zip(&self.endpoints) {
            if edge.is_merged() || (visible_only && !edge.visible) {
                continue;
            }
            degrees[source] += 1;
            if target != source {
                degrees[target] += 1;
            }
        }
        degrees
    }

    pub(crate) fn index_of(&self, node_id: &str) -> Option<usize> {
        self.node_index.get(node_id).copied()
    }

    /// Node indices of each edge's (source, target), parallel to [`Graph::edges`].
    pub(crate) fn endpoints(&self) -> &[(usize, usize)] {
        &self.endpoints
    }

    pub(crate) fn set_node_visible(&mut self, index: usize, visible: bool) {
        let node = &mut self.nodes[index];
        node.visible = visible && !node.is_merged();
    }

    pub(crate) fn set_edge_visible(&mut self, index: usize, visible: bool) {
        let (source, target) = self.endpoints[index];
        let endpoints_visible = self.nodes[source].visible && self.nodes[target].visible;
        let edge = &mut self.edges[index];
        edge.visible = visible && endpoints_visible && !edge.is_merged();
    }

    pub(crate) fn set_position(&mut self, index: usize, position: Position) {
        let node = &mut self.nodes[index];
        node.position = position;
        node.has_position = true;
    }

    pub(crate) fn set_velocity(&mut self, index: usize, velocity: Position) {
        self.nodes[index].velocity = velocity;
    }

    pub(crate) fn set_pinned(&mut self, index: usize, pinned: bool) {
        let node = &mut self.nodes[index];
        node.pinned = pinned;
        if pinned {
            node.velocity = Position::ZERO;
        }
    }
}
