// Copyright 2026 The Vowl Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::collections::BTreeMap;
use std::result;

use thiserror::Error;

/// Reasons an ontology description can be rejected. Every variant aborts the
/// load; a partially built graph is never returned.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Structurally invalid input: bad JSON, missing required fields,
    /// duplicate ids and similar.
    #[error("malformed ontology: {0}")]
    Malformed(String),
    /// A property, inverse or set operator refers to a node id that does not
    /// exist.
    #[error("dangling reference to unknown node '{0}'")]
    DanglingReference(String),
    /// A `type` tag outside the supported OWL/VOWL vocabulary.
    #[error("unknown type tag '{0}'")]
    UnknownType(String),
}

pub type Result<T> = result::Result<T, ParseError>;

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        ParseError::Malformed(err.to_string())
    }
}

macro_rules! malformed {
    ($($arg:tt)*) => {
        Err($crate::common::ParseError::Malformed(format!($($arg)*)))
    };
}

pub(crate) use malformed;

/// FNV-1a over a byte stream. Used wherever a stable, seed-free hash of ids
/// is needed; `std`'s hasher makes no cross-version stability promise.
pub(crate) fn fnv1a(parts: &[&str]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut hash = OFFSET;
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            // separator so ("ab", "c") and ("a", "bc") differ
            hash ^= 0xff;
            hash = hash.wrapping_mul(PRIME);
        }
        for byte in part.bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(PRIME);
        }
    }
    hash
}

/// Classic union-find with path halving. Roots are always the smallest
/// index in their set so iteration order stays deterministic.
pub(crate) struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    pub(crate) fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    pub(crate) fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[hi] = lo;
        }
    }

    /// Groups with more than one member, members in index order.
    pub(crate) fn groups(&mut self) -> Vec<Vec<usize>> {
        let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for i in 0..self.parent.len() {
            let root = self.find(i);
            groups.entry(root).or_default().push(i);
        }
        groups.into_values().filter(|g| g.len() > 1).collect()
    }
}

/// Local name of an IRI: the segment after the last `#` or `/`.
pub fn iri_local_name(iri: &str) -> &str {
    let trimmed = iri.trim_end_matches(['/', '#']);
    match trimmed.rfind(['#', '/']) {
        Some(pos) => &trimmed[pos + 1..],
        None => trimmed,
    }
}
