use std::{
    cmp::Ordering,
    collections::{BTreeMap, BTreeSet},
};

use serde::{Deserialize, Serialize};

use crate::{search_query::FacetGroup, target_result::TargetResult};


/// One facet value and the number of matched documents carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetContainer {
    pub name: String,
    pub count: u64,
}

impl FacetContainer {
    pub fn new(name: impl Into<String>, count: u64) -> Self {
        Self { name: name.into(), count }
    }
}

/// Facet values split into the ones the query selected and the rest.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FacetList {
    pub selected: Vec<FacetContainer>,
    pub available: Vec<FacetContainer>,
}

impl FacetList {
    pub fn available_only(available: Vec<FacetContainer>) -> Self {
        Self { selected: Vec::new(), available }
    }

    /// Partitions `values` on membership in `selected_values`, keeping engine order.
    pub fn partition(values: Vec<FacetContainer>, selected_values: Option<&[String]>) -> Self {
        let mut list = FacetList::default();
        for value in values {
            let is_selected = selected_values
                .map(|selected| selected.iter().any(|s| *s == value.name))
                .unwrap_or(false);
            if is_selected {
                list.selected.push(value);
            } else {
                list.available.push(value);
            }
        }
        list
    }

    pub fn selected_names(&self) -> Vec<String> {
        self.selected.iter().map(|container| container.name.clone()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetMapping {
    pub total_found: u64,
    pub facets: BTreeMap<FacetGroup, FacetList>,
}

impl FacetMapping {
    pub fn facet(&self, group: FacetGroup) -> Option<&FacetList> {
        self.facets.get(&group)
    }

    pub fn selected_count(&self, group: FacetGroup) -> usize {
        self.facet(group).map(|list| list.selected.len()).unwrap_or(0)
    }

    pub fn available_count(&self, group: FacetGroup) -> usize {
        self.facet(group).map(|list| list.available.len()).unwrap_or(0)
    }
}

/// A physical entity drawn by an icon, packed in the index as
/// `stId#type#name#compartments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconPhysicalEntity {
    pub st_id: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub name: String,
    pub compartments: String,
}

impl IconPhysicalEntity {
    /// `None` unless all four parts are present.
    pub fn parse(packed: &str) -> Option<Self> {
        let mut parts = packed.splitn(4, '#');
        Some(Self {
            st_id: parts.next()?.to_string(),
            entity_type: parts.next()?.to_string(),
            name: parts.next()?.to_string(),
            compartments: parts.next()?.to_string(),
        })
    }

    pub fn display_name(&self) -> String {
        if self.compartments.trim().is_empty() {
            self.name.clone()
        } else {
            format!("{} [{}]", self.name, self.compartments)
        }
    }
}

impl PartialOrd for IconPhysicalEntity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Display order, case-insensitive; the remaining fields break ties.
impl Ord for IconPhysicalEntity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.display_name()
            .to_lowercase()
            .cmp(&other.display_name().to_lowercase())
            .then_with(|| self.st_id.cmp(&other.st_id))
            .then_with(|| self.entity_type.cmp(&other.entity_type))
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.compartments.cmp(&other.compartments))
    }
}

/// A display-ready index record. Text fields may carry highlight markup.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub db_id: Option<String>,
    pub st_id: Option<String>,
    pub id: Option<String>,
    pub name: Option<String>,
    pub exact_type: Option<String>,
    pub species: Vec<String>,
    pub summation: Option<String>,
    pub reference_name: Option<String>,
    pub reference_identifier: Option<String>,
    pub compartment_names: Vec<String>,
    pub compartment_accession: Vec<String>,
    pub is_disease: Option<bool>,
    pub has_reference_entity: Option<bool>,
    #[serde(rename = "hasEHLD")]
    pub has_ehld: Option<bool>,
    pub database_name: Option<String>,
    #[serde(rename = "referenceURL")]
    pub reference_url: Option<String>,
    pub regulator: Option<String>,
    pub regulator_id: Option<String>,
    pub regulated_entity: Option<String>,
    pub regulated_entity_id: Option<String>,
    pub authored_pathways: Option<String>,
    pub authored_reactions: Option<String>,
    pub reviewed_pathways: Option<String>,
    pub reviewed_reactions: Option<String>,
    pub orcid_id: Option<String>,
    pub fireworks_species: Vec<String>,
    pub deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub icon_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub icon_categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub icon_curator_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub icon_curator_orcid_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub icon_curator_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub icon_designer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub icon_designer_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub icon_designer_orcid_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub icon_references: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub icon_ehlds: Vec<String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty", default)]
    pub icon_physical_entities: BTreeSet<IconPhysicalEntity>,
}

/// Entries sharing one group label (an entity type, or "Results" when flat).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultGroup {
    pub entries: Vec<Entry>,
    pub type_name: String,
    pub entries_count: u64,
    pub rows_count: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedResult {
    pub results: Vec<ResultGroup>,
    pub row_count: usize,
    pub number_of_groups: u64,
    pub number_of_matches: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_results: Option<BTreeSet<TargetResult>>,
}

impl GroupedResult {
    /// Largest per-group match count.
    pub fn highest_result_count(&self) -> u64 {
        self.results.iter().map(|group| group.entries_count).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub facet_mapping: FacetMapping,
    pub grouped_result: GroupedResult,
    pub result_count: u64,
    pub rows: Option<u32>,
}

/// What a search resolved to after every relaxation step was tried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "result", rename_all = "camelCase")]
pub enum SearchOutcome {
    Found(SearchResult),
    /// Nothing matched; the terms were classified against the curated targets.
    Targets(BTreeSet<TargetResult>),
    NotFound,
}
