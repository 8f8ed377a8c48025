//! Shared search query models and helpers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::search_const::{OCCURRENCES_FIELD, OCCURRENCES_WITH_INTERACTOR_FIELD};


/// Facet groups known to the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FacetGroup {
    Species,
    Type,
    Keyword,
    Compartment,
    IconCategory,
}

struct FacetGroupSpec {
    group: FacetGroup,
    field: &'static str,
    tag: Option<&'static str>,
}

// Indexed by discriminant.
const FACET_GROUPS: [FacetGroupSpec; 5] = [
    FacetGroupSpec { group: FacetGroup::Species, field: "species_facet", tag: Some("sf") },
    FacetGroupSpec { group: FacetGroup::Type, field: "type_facet", tag: Some("tf") },
    FacetGroupSpec { group: FacetGroup::Keyword, field: "keywords_facet", tag: Some("kf") },
    FacetGroupSpec { group: FacetGroup::Compartment, field: "compartment_facet", tag: Some("cf") },
    FacetGroupSpec { group: FacetGroup::IconCategory, field: "iconCategories_facet", tag: None },
];

impl FacetGroup {
    /// Groups a caller can filter on, in the order they are reconciled.
    pub const FILTERABLE: [FacetGroup; 4] = [
        FacetGroup::Species,
        FacetGroup::Type,
        FacetGroup::Keyword,
        FacetGroup::Compartment,
    ];

    fn spec(self) -> &'static FacetGroupSpec {
        &FACET_GROUPS[self as usize]
    }

    /// Index field the group is faceted and filtered on.
    pub fn field_name(self) -> &'static str {
        self.spec().field
    }

    /// Tag attached to this group's filter so its own facet can ignore it.
    pub fn exclusion_tag(self) -> Option<&'static str> {
        self.spec().tag
    }

    pub fn from_field_name(name: &str) -> Option<FacetGroup> {
        FACET_GROUPS.iter().find(|spec| spec.field == name).map(|spec| spec.group)
    }
}

/// Which representation of an entity a search looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Scope {
    #[default]
    ReferenceEntity,
    PhysicalEntity,
    Both,
}

/// Query parser used by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParserType {
    /// Strict conjunction of the query terms.
    #[default]
    Std,
    /// Disjunction over the query terms.
    Dismax,
    Edismax,
}

impl ParserType {
    /// Value of the engine's `defType` parameter, `None` for the default parser.
    pub fn def_type(self) -> Option<&'static str> {
        match self {
            ParserType::Std => None,
            ParserType::Dismax => Some("dismax"),
            ParserType::Edismax => Some("edismax"),
        }
    }
}

/// An immutable search request. Build it with [`Query::builder`]; derive a
/// changed copy with [`Query::rebuild`].
///
/// `original_query` keeps the text exactly as the caller typed it, so reports
/// stay truthful when the search text is rewritten along the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    query: String,
    original_query: String,
    filter_query: Option<String>,
    facet_filters: BTreeMap<FacetGroup, Vec<String>>,
    include_interactors: bool,
    scope: Scope,
    deleted: bool,
    start: Option<u32>,
    rows: Option<u32>,
    parser_type: ParserType,
    #[serde(skip)]
    report_info: Option<BTreeMap<String, String>>,
}

impl Query {
    pub fn builder(query: impl Into<String>) -> QueryBuilder {
        QueryBuilder::new(query)
    }

    /// A builder holding every field of `self`.
    pub fn rebuild(&self) -> QueryBuilder {
        QueryBuilder { inner: self.clone() }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn original_query(&self) -> &str {
        &self.original_query
    }

    pub fn has_text(&self) -> bool {
        !self.query.trim().is_empty()
    }

    pub fn filter_query(&self) -> Option<&str> {
        self.filter_query.as_deref()
    }

    /// Values selected for `group`, `None` when the caller did not filter on it.
    pub fn selected(&self, group: FacetGroup) -> Option<&[String]> {
        self.facet_filters.get(&group).map(Vec::as_slice)
    }

    pub fn facet_filters(&self) -> &BTreeMap<FacetGroup, Vec<String>> {
        &self.facet_filters
    }

    pub fn species(&self) -> Option<&[String]> {
        self.selected(FacetGroup::Species)
    }

    pub fn types(&self) -> Option<&[String]> {
        self.selected(FacetGroup::Type)
    }

    pub fn keywords(&self) -> Option<&[String]> {
        self.selected(FacetGroup::Keyword)
    }

    pub fn compartments(&self) -> Option<&[String]> {
        self.selected(FacetGroup::Compartment)
    }

    pub fn include_interactors(&self) -> bool {
        self.include_interactors
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn deleted(&self) -> bool {
        self.deleted
    }

    pub fn start(&self) -> Option<u32> {
        self.start
    }

    pub fn rows(&self) -> Option<u32> {
        self.rows
    }

    pub fn parser_type(&self) -> ParserType {
        self.parser_type
    }

    pub fn report_info(&self) -> Option<&BTreeMap<String, String>> {
        self.report_info.as_ref()
    }

    /// Multi-valued field holding this query's occurrence records.
    pub fn occurrences_field(&self) -> &'static str {
        if self.include_interactors { OCCURRENCES_WITH_INTERACTOR_FIELD } else { OCCURRENCES_FIELD }
    }
}

#[derive(Debug, Clone)]
pub struct QueryBuilder {
    inner: Query,
}

impl QueryBuilder {
    /// Starts a query; the original query is a copy of `query` unless
    /// [`QueryBuilder::keep_original_query`] says otherwise.
    pub fn new(query: impl Into<String>) -> Self {
        let query = query.into();
        Self {
            inner: Query {
                original_query: query.clone(),
                query,
                filter_query: None,
                facet_filters: BTreeMap::new(),
                include_interactors: false,
                scope: Scope::default(),
                deleted: false,
                start: None,
                rows: None,
                parser_type: ParserType::default(),
                report_info: None,
            },
        }
    }

    pub fn keep_original_query(mut self, original_query: impl Into<String>) -> Self {
        self.inner.original_query = original_query.into();
        self
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.inner.query = query.into();
        self
    }

    pub fn filter_query(mut self, filter_query: Option<String>) -> Self {
        self.inner.filter_query = filter_query;
        self
    }

    /// Sets or clears the selected values of one facet group.
    pub fn facet_filter(mut self, group: FacetGroup, values: Option<Vec<String>>) -> Self {
        match values {
            Some(values) => {
                self.inner.facet_filters.insert(group, values);
            }
            None => {
                self.inner.facet_filters.remove(&group);
            }
        }
        self
    }

    pub fn species(self, species: Option<Vec<String>>) -> Self {
        self.facet_filter(FacetGroup::Species, species)
    }

    pub fn types(self, types: Option<Vec<String>>) -> Self {
        self.facet_filter(FacetGroup::Type, types)
    }

    pub fn keywords(self, keywords: Option<Vec<String>>) -> Self {
        self.facet_filter(FacetGroup::Keyword, keywords)
    }

    pub fn compartments(self, compartments: Option<Vec<String>>) -> Self {
        self.facet_filter(FacetGroup::Compartment, compartments)
    }

    pub fn include_interactors(mut self, include_interactors: bool) -> Self {
        self.inner.include_interactors = include_interactors;
        self
    }

    pub fn scope(mut self, scope: Scope) -> Self {
        self.inner.scope = scope;
        self
    }

    pub fn deleted(mut self, deleted: bool) -> Self {
        self.inner.deleted = deleted;
        self
    }

    pub fn start(mut self, start: Option<u32>) -> Self {
        self.inner.start = start;
        self
    }

    pub fn rows(mut self, rows: Option<u32>) -> Self {
        self.inner.rows = rows;
        self
    }

    pub fn parser_type(mut self, parser_type: ParserType) -> Self {
        self.inner.parser_type = parser_type;
        self
    }

    pub fn report_info(mut self, report_info: Option<BTreeMap<String, String>>) -> Self {
        self.inner.report_info = report_info;
        self
    }

    pub fn build(self) -> Query {
        self.inner
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facet_table_follows_discriminants() {
        for group in [
            FacetGroup::Species,
            FacetGroup::Type,
            FacetGroup::Keyword,
            FacetGroup::Compartment,
            FacetGroup::IconCategory,
        ] {
            assert_eq!(FacetGroup::from_field_name(group.field_name()), Some(group));
        }
        assert_eq!(FacetGroup::Type.exclusion_tag(), Some("tf"));
        assert_eq!(FacetGroup::IconCategory.exclusion_tag(), None);
        assert_eq!(FacetGroup::from_field_name("unknown"), None);
    }

    #[test]
    fn rebuild_leaves_the_source_untouched() {
        let query = Query::builder("apoptosis")
            .species(Some(vec!["Homo sapiens".to_string()]))
            .build();
        let relaxed = query.rebuild().query("apoptosis OR apoptotic").parser_type(ParserType::Dismax).build();

        assert_eq!(query.parser_type(), ParserType::Std);
        assert_eq!(query.query(), "apoptosis");
        assert_eq!(relaxed.parser_type(), ParserType::Dismax);
        assert_eq!(relaxed.original_query(), "apoptosis");
        assert_eq!(relaxed.species(), Some(&["Homo sapiens".to_string()][..]));
    }

    #[test]
    fn empty_selection_differs_from_no_selection() {
        let query = Query::builder("PTEN").types(Some(vec![])).build();
        assert_eq!(query.types(), Some(&[][..]));
        assert_eq!(query.species(), None);

        let cleared = query.rebuild().types(None).build();
        assert_eq!(cleared.types(), None);
    }

    #[test]
    fn occurrences_field_follows_interactor_flag() {
        assert_eq!(Query::builder("x").build().occurrences_field(), "occurrences");
        assert_eq!(
            Query::builder("x").include_interactors(true).build().occurrences_field(),
            "occurrencesWithInteractor"
        );
    }
}
