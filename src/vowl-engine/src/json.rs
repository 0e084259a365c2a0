// Copyright 2026 The Vowl Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Raw records of the VOWL JSON ontology format.
//!
//! These types mirror the document as written: type tags stay strings,
//! attribute records stay separate from their base records, and references
//! are unresolved ids. [`crate::parser`] turns an [`Ontology`] into a
//! validated [`crate::Graph`].
//!
//! # Example
//! ```
//! use vowl_engine::json;
//!
//! let raw = r#"{"class": [{"id": "c1", "type": "owl:Class"}]}"#;
//! let ontology: json::Ontology = raw.parse()?;
//! assert_eq!(ontology.class.len(), 1);
//! # Ok::<(), vowl_engine::ParseError>(())
//! ```

use std::collections::BTreeMap;
use std::str::FromStr;

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::common::{ParseError, Result};
use crate::graph::{LanguageMap, UNDEFINED_LANGUAGE, preferred_text};

fn is_empty_vec<T>(val: &[T]) -> bool {
    val.is_empty()
}

fn is_false(val: &bool) -> bool {
    !*val
}

fn deserialize_null_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    T: Default + serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    let opt = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

/// Text that is either a plain string or a language-tagged map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(untagged)]
pub enum Localized {
    Plain(String),
    Languages(LanguageMap),
}

impl Localized {
    pub fn into_map(self) -> LanguageMap {
        match self {
            Localized::Plain(text) => LanguageMap::from([(UNDEFINED_LANGUAGE.to_string(), text)]),
            Localized::Languages(map) => map,
        }
    }

    /// Preferred single string, used for comments and descriptions.
    pub fn preferred(&self) -> Option<&str> {
        match self {
            Localized::Plain(text) => Some(text),
            Localized::Languages(map) => preferred_text(map, None),
        }
    }
}

/// Cardinality values appear both as numbers and as numeric strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(untagged)]
pub enum Count {
    Number(u32),
    Text(String),
}

impl Count {
    pub fn value(&self) -> Result<u32> {
        match self {
            Count::Number(n) => Ok(*n),
            Count::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| ParseError::Malformed(format!("invalid cardinality '{text}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(default)]
pub struct Header {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Localized>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Localized>,
    #[serde(skip_serializing_if = "is_empty_vec")]
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct NamespaceRecord {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub prefix: Option<String>,
    pub iri: String,
}

/// The `namespace` section: usually a list of records, occasionally a
/// prefix-to-IRI object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(untagged)]
pub enum Namespaces {
    List(Vec<NamespaceRecord>),
    Map(BTreeMap<String, String>),
}

impl Default for Namespaces {
    fn default() -> Self {
        Namespaces::List(Vec::new())
    }
}

impl Namespaces {
    pub fn is_empty(&self) -> bool {
        match self {
            Namespaces::List(list) => list.is_empty(),
            Namespaces::Map(map) => map.is_empty(),
        }
    }

    pub fn into_records(self) -> Vec<NamespaceRecord> {
        match self {
            Namespaces::List(list) => list,
            Namespaces::Map(map) => map
                .into_iter()
                .map(|(prefix, iri)| NamespaceRecord {
                    prefix: Some(prefix),
                    iri,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct IndividualRecord {
    pub iri: String,
    #[serde(alias = "label", skip_serializing_if = "Option::is_none", default)]
    pub labels: Option<Localized>,
}

/// The `individuals` field: either the individuals themselves or only how
/// many there are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(untagged)]
pub enum Individuals {
    Count(usize),
    List(Vec<IndividualRecord>),
}

impl Default for Individuals {
    fn default() -> Self {
        Individuals::List(Vec::new())
    }
}

impl Individuals {
    pub fn is_empty(&self) -> bool {
        match self {
            Individuals::Count(n) => *n == 0,
            Individuals::List(list) => list.is_empty(),
        }
    }

    pub fn count(&self) -> usize {
        match self {
            Individuals::Count(n) => *n,
            Individuals::List(list) => list.len(),
        }
    }

    pub fn into_records(self) -> Vec<IndividualRecord> {
        match self {
            Individuals::Count(_) => Vec::new(),
            Individuals::List(list) => list,
        }
    }

    fn fill_from(&mut self, other: Individuals) {
        if self.is_empty() {
            *self = other;
        } else if let (Individuals::List(list), Individuals::List(more)) = (self, other) {
            extend_missing(list, more);
        }
    }
}

/// Fields shared by class and datatype records and their attribute records.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct ClassDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Localized>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<Localized>,
    #[serde(skip_serializing_if = "is_empty_vec")]
    pub attributes: Vec<String>,
    #[serde(skip_serializing_if = "is_empty_vec")]
    pub equivalent: Vec<String>,
    #[serde(skip_serializing_if = "Individuals::is_empty")]
    pub individuals: Individuals,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instances: Option<usize>,
    #[serde(skip_serializing_if = "is_empty_vec")]
    pub union: Vec<String>,
    #[serde(skip_serializing_if = "is_empty_vec")]
    pub intersection: Vec<String>,
    #[serde(skip_serializing_if = "is_empty_vec")]
    pub complement: Vec<String>,
    #[serde(skip_serializing_if = "is_empty_vec")]
    pub disjoint_union: Vec<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub external: bool,
}

fn extend_missing<T: PartialEq>(into: &mut Vec<T>, from: Vec<T>) {
    for item in from {
        if !into.contains(&item) {
            into.push(item);
        }
    }
}

impl ClassDetails {
    /// Fill fields this record leaves empty from `other`. List fields take
    /// the union, keeping this record's order first.
    pub fn fill_from(&mut self, other: ClassDetails) {
        self.iri = self.iri.take().or(other.iri);
        self.label = self.label.take().or(other.label);
        self.comment = self.comment.take().or(other.comment);
        self.instances = self.instances.or(other.instances);
        extend_missing(&mut self.attributes, other.attributes);
        extend_missing(&mut self.equivalent, other.equivalent);
        self.individuals.fill_from(other.individuals);
        self.external |= other.external;
        extend_missing(&mut self.union, other.union);
        extend_missing(&mut self.intersection, other.intersection);
        extend_missing(&mut self.complement, other.complement);
        extend_missing(&mut self.disjoint_union, other.disjoint_union);
    }
}

/// A `class` or `datatype` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Class {
    pub id: String,
    #[serde(rename = "type")]
    pub type_tag: String,
    #[serde(flatten)]
    pub details: ClassDetails,
}

/// A `classAttribute` or `datatypeAttribute` entry, matched to its base
/// record by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ClassAttribute {
    pub id: String,
    #[serde(flatten)]
    pub details: ClassDetails,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Localized>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<Localized>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inverse: Option<String>,
    #[serde(skip_serializing_if = "is_empty_vec")]
    pub attributes: Vec<String>,
    #[serde(skip_serializing_if = "is_empty_vec")]
    pub equivalent: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cardinality: Option<Count>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_cardinality: Option<Count>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_cardinality: Option<Count>,
    #[serde(skip_serializing_if = "is_false")]
    pub functional: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub inverse_functional: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub transitive: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub symmetric: bool,
}

impl PropertyDetails {
    pub fn fill_from(&mut self, other: PropertyDetails) {
        self.iri = self.iri.take().or(other.iri);
        self.label = self.label.take().or(other.label);
        self.comment = self.comment.take().or(other.comment);
        self.domain = self.domain.take().or(other.domain);
        self.range = self.range.take().or(other.range);
        self.inverse = self.inverse.take().or(other.inverse);
        self.cardinality = self.cardinality.take().or(other.cardinality);
        self.min_cardinality = self.min_cardinality.take().or(other.min_cardinality);
        self.max_cardinality = self.max_cardinality.take().or(other.max_cardinality);
        extend_missing(&mut self.attributes, other.attributes);
        extend_missing(&mut self.equivalent, other.equivalent);
        self.functional |= other.functional;
        self.inverse_functional |= other.inverse_functional;
        self.transitive |= other.transitive;
        self.symmetric |= other.symmetric;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Property {
    pub id: String,
    #[serde(rename = "type")]
    pub type_tag: String,
    #[serde(flatten)]
    pub details: PropertyDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct PropertyAttribute {
    pub id: String,
    #[serde(flatten)]
    pub details: PropertyDetails,
}

/// A whole VOWL JSON document. Only `class` (or its alias `classes`) is
/// required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct Ontology {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub header: Option<Header>,
    #[serde(
        skip_serializing_if = "Namespaces::is_empty",
        default,
        deserialize_with = "deserialize_null_default"
    )]
    pub namespace: Namespaces,
    #[serde(alias = "classes")]
    pub class: Vec<Class>,
    #[serde(skip_serializing_if = "is_empty_vec", default)]
    pub class_attribute: Vec<ClassAttribute>,
    #[serde(skip_serializing_if = "is_empty_vec", default)]
    pub datatype: Vec<Class>,
    #[serde(skip_serializing_if = "is_empty_vec", default)]
    pub datatype_attribute: Vec<ClassAttribute>,
    #[serde(skip_serializing_if = "is_empty_vec", default, alias = "properties")]
    pub property: Vec<Property>,
    #[serde(skip_serializing_if = "is_empty_vec", default)]
    pub property_attribute: Vec<PropertyAttribute>,
}

impl FromStr for Ontology {
    type Err = ParseError;

    fn from_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

impl TryFrom<serde_json::Value> for Ontology {
    type Error = ParseError;

    fn try_from(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}
