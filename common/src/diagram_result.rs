//! Result models for the diagram and fireworks (pathway overview) views.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    search_result::{Entry, FacetContainer},
    target_result::TargetResult,
};


/// How one entity relates to one diagram.
///
/// `occurrences` and `interacts_with` are `None` when the index recorded no
/// values, which is not the same as an empty set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramOccurrencesResult {
    pub diagram_entity: Option<String>,
    /// The entity is drawn in the diagram itself, not only inside a sub-pathway.
    pub in_diagram: bool,
    pub occurrences: Option<BTreeSet<String>>,
    pub interacts_with: Option<BTreeSet<String>>,
}

impl DiagramOccurrencesResult {
    pub fn is_empty(&self) -> bool {
        self.occurrences.as_ref().is_none_or(BTreeSet::is_empty)
            && self.interacts_with.as_ref().is_none_or(BTreeSet::is_empty)
    }
}

/// Pathways to flag in the fireworks overview for a searched term.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FireworksOccurrencesResult {
    /// Lower-level pathways holding a phase-separation participant.
    #[serde(skip_serializing_if = "BTreeSet::is_empty", default)]
    pub llps: BTreeSet<String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty", default)]
    pub interacts_with: BTreeSet<String>,
}

impl FireworksOccurrencesResult {
    pub fn add_llps<I: IntoIterator<Item = String>>(&mut self, llps: I) {
        self.llps.extend(llps);
    }

    pub fn add_interacts_with(&mut self, pathway: impl Into<String>) {
        self.interacts_with.insert(pathway.into());
    }

    /// Drops every interaction flag already covered by an llps pathway. Call
    /// once all documents have been accumulated.
    pub fn finish(mut self) -> Self {
        let llps = &self.llps;
        self.interacts_with.retain(|pathway| !llps.contains(pathway));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.llps.is_empty() && self.interacts_with.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DiagramResult {
    pub entries: Vec<Entry>,
    pub facets: Vec<FacetContainer>,
    pub found: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FireworksResult {
    pub entries: Vec<Entry>,
    pub facets: Vec<FacetContainer>,
    pub found: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_results: Option<BTreeSet<TargetResult>>,
}

/// Hit counts and type facets inside the current diagram and across all of them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramSearchSummary {
    pub diagram_result: DiagramResult,
    pub fireworks_result: FireworksResult,
}
