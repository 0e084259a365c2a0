// Copyright 2026 The Vowl Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use serde::Serialize;
use strsim::normalized_levenshtein;

use crate::graph::{Graph, Node};

/// Minimum normalized Levenshtein similarity for a fuzzy label match.
pub const FUZZY_THRESHOLD: f64 = 0.8;

/// How a node matched the query, best first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Prefix,
    Substring,
    Fuzzy,
    Iri,
    Comment,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchHit {
    pub node_id: String,
    pub label: String,
    pub kind: MatchKind,
    /// Similarity in `0.0..=1.0`; orders hits of the same kind.
    pub score: f64,
}

/// Ranks nodes against a text query. Never changes visibility; hosts use
/// the ranking to highlight or focus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchFilter {
    query: String,
    language: Option<String>,
}

impl SearchFilter {
    pub fn new(query: &str) -> Self {
        Self {
            query: query.trim().to_lowercase(),
            language: None,
        }
    }

    /// Report labels in `language` where available.
    pub fn with_language(mut self, language: &str) -> Self {
        self.language = Some(language.to_string());
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    fn score_text(&self, text: &str) -> Option<(MatchKind, f64)> {
        let text = text.to_lowercase();
        if text.is_empty() {
            return None;
        }
        let coverage = self.query.chars().count() as f64 / text.chars().count() as f64;
        if text == self.query {
            Some((MatchKind::Exact, 1.0))
        } else if text.starts_with(&self.query) {
            Some((MatchKind::Prefix, coverage))
        } else if text.contains(&self.query) {
            Some((MatchKind::Substring, coverage))
        } else {
            let similarity = normalized_levenshtein(&self.query, &text);
            (similarity >= FUZZY_THRESHOLD).then_some((MatchKind::Fuzzy, similarity))
        }
    }

    fn match_node(&self, node: &Node) -> Option<(MatchKind, f64)> {
        let best_label = node
            .labels
            .values()
            .filter_map(|label| self.score_text(label))
            .min_by_key(|&(kind, score)| (kind, Reverse(OrderedFloat(score))));
        if best_label.is_some() {
            return best_label;
        }

        let iri = node.iri.to_lowercase();
        if iri.contains(&self.query) {
            let coverage = self.query.len() as f64 / iri.len() as f64;
            return Some((MatchKind::Iri, coverage));
        }
        let comment = node.comment.as_deref().unwrap_or("").to_lowercase();
        if comment.contains(&self.query) {
            let coverage = self.query.len() as f64 / comment.len() as f64;
            return Some((MatchKind::Comment, coverage));
        }
        None
    }

    /// All matching nodes except merged-away equivalents, best first. Ties
    /// fall back to score, then label, then id.
    pub fn rank(&self, graph: &Graph) -> Vec<SearchHit> {
        if self.query.is_empty() {
            return Vec::new();
        }
        let mut hits: Vec<SearchHit> = graph
            .nodes()
            .iter()
            .filter(|node| !node.is_merged())
            .filter_map(|node| {
                let (kind, score) = self.match_node(node)?;
                Some(SearchHit {
                    node_id: node.id.clone(),
                    label: node.label(self.language.as_deref()).to_string(),
                    kind,
                    score,
                })
            })
            .collect();
        hits.sort_by(|a, b| {
            (a.kind, Reverse(OrderedFloat(a.score)), &a.label, &a.node_id).cmp(&(
                b.kind,
                Reverse(OrderedFloat(b.score)),
                &b.label,
                &b.node_id,
            ))
        });
        hits
    }
}
