// Copyright 2026 The Vowl Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

#![forbid(unsafe_code)]

//! Graph model, force-directed layout and filtering for OWL ontology
//! diagrams in the VOWL JSON format.
//!
//! ```
//! use vowl_engine::{FilterPipeline, ForceLayout, LayoutConfig, Snapshot};
//!
//! let mut graph = vowl_engine::parse(
//!     r#"{"class": [{"id": "a", "type": "owl:Class"}, {"id": "b", "type": "owl:Class"}],
//!         "property": [{"id": "p", "type": "owl:ObjectProperty", "domain": "a", "range": "b"}]}"#,
//! )?;
//! FilterPipeline::new().apply(&mut graph);
//! let mut layout = ForceLayout::new(LayoutConfig::default());
//! layout.run(&mut graph, 100);
//! let snapshot = Snapshot::capture(&graph, None);
//! assert_eq!(snapshot.nodes.len(), 2);
//! # Ok::<(), vowl_engine::ParseError>(())
//! ```

pub mod common;
pub mod filter;
pub mod graph;
pub mod json;
pub mod layout;
pub mod parser;
mod snapshot;
mod stats;

#[cfg(test)]
mod test_common;

pub use self::common::{ParseError, Result};
pub use self::filter::{
    DegreeFilter, EdgeTypeFilter, Filter, FilterConfig, FilterKind, FilterPipeline,
    FilterSummary, MatchKind, NodeTypeFilter, SearchFilter, SearchHit, SubclassCollapseFilter,
};
pub use self::graph::{
    Cardinality, Characteristics, Edge, EdgeType, Graph, Individual, LanguageMap, Namespace,
    Node, NodeType, OntologyMetadata, Position, SetOperator,
};
pub use self::layout::{ForceLayout, LayoutConfig, LayoutState, RestLengths};
pub use self::parser::{ParserConfig, parse, parse_value, parse_with};
pub use self::snapshot::{EdgeView, NodeView, Snapshot};
pub use self::stats::{Statistics, compute_statistics};
