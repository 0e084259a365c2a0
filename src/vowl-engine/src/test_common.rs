// Copyright 2026 The Vowl Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Common test infrastructure for building test ontologies
//!
//! This module provides a builder-based API over the raw JSON records so
//! unit tests can describe small ontologies without writing JSON by hand.

use crate::common::Result;
use crate::graph::{Graph, SetOperator};
use crate::json::{self, Class, ClassDetails, Localized, Ontology, Property, PropertyDetails};
use crate::parser;

/// Builder for raw ontology documents
pub struct TestOntology {
    pub ontology: Ontology,
}

impl TestOntology {
    pub fn new() -> Self {
        Self {
            ontology: Ontology {
                header: None,
                namespace: json::Namespaces::default(),
                class: Vec::new(),
                class_attribute: Vec::new(),
                datatype: Vec::new(),
                datatype_attribute: Vec::new(),
                property: Vec::new(),
                property_attribute: Vec::new(),
            },
        }
    }

    /// Add a node with an arbitrary type tag and no label
    pub fn node(mut self, id: &str, type_tag: &str) -> Self {
        self.ontology.class.push(Class {
            id: id.to_string(),
            type_tag: type_tag.to_string(),
            details: ClassDetails::default(),
        });
        self
    }

    /// Add an `owl:Class` with a plain label
    pub fn class(self, id: &str, label: &str) -> Self {
        self.node(id, "owl:Class").label(id, label)
    }

    /// Add an `rdfs:Datatype` with a plain label
    pub fn datatype(mut self, id: &str, label: &str) -> Self {
        self.ontology.datatype.push(Class {
            id: id.to_string(),
            type_tag: "rdfs:Datatype".to_string(),
            details: ClassDetails {
                label: Some(Localized::Plain(label.to_string())),
                ..Default::default()
            },
        });
        self
    }

    pub fn property(mut self, id: &str, type_tag: &str, domain: &str, range: &str) -> Self {
        self.ontology.property.push(Property {
            id: id.to_string(),
            type_tag: type_tag.to_string(),
            details: PropertyDetails {
                domain: Some(domain.to_string()),
                range: Some(range.to_string()),
                ..Default::default()
            },
        });
        self
    }

    pub fn object_property(self, id: &str, domain: &str, range: &str) -> Self {
        self.property(id, "owl:ObjectProperty", domain, range)
    }

    pub fn datatype_property(self, id: &str, domain: &str, range: &str) -> Self {
        self.property(id, "owl:DatatypeProperty", domain, range)
    }

    /// `sub rdfs:subClassOf sup`, drawn from the subclass to the superclass
    pub fn subclass(self, id: &str, sub: &str, sup: &str) -> Self {
        self.property(id, "rdfs:subClassOf", sub, sup)
    }

    pub fn label(mut self, id: &str, label: &str) -> Self {
        self.class_details(id).label = Some(Localized::Plain(label.to_string()));
        self
    }

    pub fn comment(mut self, id: &str, comment: &str) -> Self {
        self.class_details(id).comment = Some(Localized::Plain(comment.to_string()));
        self
    }

    pub fn iri(mut self, id: &str, iri: &str) -> Self {
        self.class_details(id).iri = Some(iri.to_string());
        self
    }

    pub fn equivalent(mut self, id: &str, others: &[&str]) -> Self {
        self.class_details(id)
            .equivalent
            .extend(others.iter().map(|o| o.to_string()));
        self
    }

    pub fn operands(mut self, id: &str, op: SetOperator, operands: &[&str]) -> Self {
        let details = self.class_details(id);
        let list = match op {
            SetOperator::Union => &mut details.union,
            SetOperator::Intersection => &mut details.intersection,
            SetOperator::Complement => &mut details.complement,
            SetOperator::DisjointUnion => &mut details.disjoint_union,
        };
        list.extend(operands.iter().map(|o| o.to_string()));
        self
    }

    /// Attach `count` individuals with generated IRIs
    pub fn individuals(mut self, id: &str, count: usize) -> Self {
        let records = (0..count)
            .map(|i| json::IndividualRecord {
                iri: format!("http://example.org/{id}/i{i}"),
                labels: None,
            })
            .collect();
        self.class_details(id).individuals = json::Individuals::List(records);
        self
    }

    pub fn inverse(mut self, id: &str, inverse: &str) -> Self {
        self.property_details(id).inverse = Some(inverse.to_string());
        self
    }

    fn class_details(&mut self, id: &str) -> &mut ClassDetails {
        let record = self
            .ontology
            .class
            .iter_mut()
            .chain(self.ontology.datatype.iter_mut())
            .rev()
            .find(|c| c.id == id)
            .unwrap_or_else(|| panic!("no class record '{id}'"));
        &mut record.details
    }

    fn property_details(&mut self, id: &str) -> &mut PropertyDetails {
        let record = self
            .ontology
            .property
            .iter_mut()
            .rev()
            .find(|p| p.id == id)
            .unwrap_or_else(|| panic!("no property record '{id}'"));
        &mut record.details
    }

    pub fn build(&self) -> Result<Graph> {
        parser::build(self.ontology.clone())
    }
}
