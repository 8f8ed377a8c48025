//! Curated target classification of search terms.

use std::{
    cmp::Ordering,
    hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};


/// Whether one search term names a curated target.
///
/// Identity is the term alone: a set of results holds each term once, no
/// matter how many candidate records matched it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetResult {
    pub term: String,
    pub resource: Option<String>,
    pub is_target: bool,
}

impl TargetResult {
    pub fn new(term: impl Into<String>, resource: Option<String>, is_target: bool) -> Self {
        Self { term: term.into(), resource, is_target }
    }
}

impl PartialEq for TargetResult {
    fn eq(&self, other: &Self) -> bool {
        self.term == other.term
    }
}

impl Eq for TargetResult {}

impl Hash for TargetResult {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.term.hash(state);
    }
}

impl PartialOrd for TargetResult {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TargetResult {
    fn cmp(&self, other: &Self) -> Ordering {
        self.term.cmp(&other.term)
    }
}

/// A record of the curated targets index.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetEntry {
    pub identifier: String,
    pub accessions: Vec<String>,
    pub gene_names: Vec<String>,
    pub synonyms: Vec<String>,
    pub resource: Option<String>,
}

impl TargetEntry {
    /// Case-insensitive match on identifier, accessions, gene names or synonyms.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        std::iter::once(&self.identifier)
            .chain(&self.accessions)
            .chain(&self.gene_names)
            .chain(&self.synonyms)
            .any(|value| value.to_lowercase() == term)
    }
}
