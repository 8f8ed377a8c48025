//! Boundary between the search logic and the index engine.
//!
//! Callers describe what they want with an [`EngineRequest`]; the engine
//! adapter turns it into its own wire format and hands back an
//! [`EngineResponse`] already stripped of transport details.

use std::collections::{BTreeMap, HashMap};

use common::{
    search_query::{ParserType, Scope},
    search_result::FacetContainer,
};
use futures::future::BoxFuture;
use serde_json::{Map, Value};

use crate::error::Result;

/// Named request handlers exposed by the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestHandler {
    Search,
    Browse,
    Facet,
    FacetAll,
    IconFacet,
    Fireworks,
    FireworksFlagging,
    Diagrams,
    DiagramOccurrences,
    DiagramFlagging,
    Suggest,
    Spellcheck,
    Exists,
    Select,
}

impl RequestHandler {
    pub fn path(self) -> &'static str {
        match self {
            RequestHandler::Search => "/search",
            RequestHandler::Browse => "/browse",
            RequestHandler::Facet => "/facet",
            RequestHandler::FacetAll => "/facetall",
            RequestHandler::IconFacet => "/iconFacet",
            RequestHandler::Fireworks => "/fireworks",
            RequestHandler::FireworksFlagging => "/fireworksFlagging",
            RequestHandler::Diagrams => "/diagrams",
            RequestHandler::DiagramOccurrences => "/diagramOccurrences",
            RequestHandler::DiagramFlagging => "/diagramFlagging",
            RequestHandler::Suggest => "/suggest",
            RequestHandler::Spellcheck => "/spellcheck",
            RequestHandler::Exists => "/exists",
            RequestHandler::Select => "/select",
        }
    }

    /// Handlers that read their text from the spellcheck parameter.
    pub fn is_spellcheck(self) -> bool {
        matches!(self, RequestHandler::Suggest | RequestHandler::Spellcheck)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Collection {
    #[default]
    Pathways,
    Targets,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterClause {
    /// Matches documents whose `field` holds any of `values`. A tag lets one
    /// facet ignore the filter placed on its own field.
    AnyOf { field: String, values: Vec<String>, tag: Option<&'static str> },
    Raw(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacetRequest {
    pub field: &'static str,
    pub exclude_tag: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupDirective {
    pub field: &'static str,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineRequest {
    pub collection: Collection,
    pub handler: RequestHandler,
    pub query: String,
    pub parser_type: ParserType,
    /// `None` leaves the representation filter to the handler's defaults.
    pub scope: Option<Scope>,
    pub filters: Vec<FilterClause>,
    pub facets: Vec<FacetRequest>,
    pub start: Option<u32>,
    pub rows: Option<u32>,
    pub fields: Vec<String>,
    pub group: Option<GroupDirective>,
    /// Engine sort clause, e.g. `iconName_sort asc`.
    pub sort: Option<String>,
    /// Share of optional clauses that must match.
    pub min_match: Option<&'static str>,
}

impl EngineRequest {
    pub fn new(handler: RequestHandler, query: impl Into<String>) -> Self {
        Self {
            collection: Collection::default(),
            handler,
            query: query.into(),
            parser_type: ParserType::default(),
            scope: None,
            filters: Vec::new(),
            facets: Vec::new(),
            start: None,
            rows: None,
            fields: Vec::new(),
            group: None,
            sort: None,
            min_match: None,
        }
    }
}

/// One stored document, with lenient accessors over its JSON fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document(pub Map<String, Value>);

impl Document {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// A single string; numbers are rendered, lists give their first element.
    pub fn str(&self, field: &str) -> Option<String> {
        match self.0.get(field)? {
            Value::Array(values) => values.first().and_then(scalar_to_string),
            value => scalar_to_string(value),
        }
    }

    /// Every value of a field, a scalar counting as a list of one.
    pub fn strings(&self, field: &str) -> Vec<String> {
        match self.0.get(field) {
            Some(Value::Array(values)) => values.iter().filter_map(scalar_to_string).collect(),
            Some(value) => scalar_to_string(value).into_iter().collect(),
            None => Vec::new(),
        }
    }

    pub fn bool(&self, field: &str) -> Option<bool> {
        match self.0.get(field)? {
            Value::Bool(value) => Some(*value),
            Value::String(value) => Some(value.eq_ignore_ascii_case("true")),
            _ => None,
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(value) => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        Value::Bool(value) => Some(value.to_string()),
        _ => None,
    }
}

/// Highlight snippets, keyed by document database id and then by field.
pub type Highlighting = HashMap<String, HashMap<String, Vec<String>>>;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EngineGroup {
    pub group_value: Option<String>,
    pub num_found: u64,
    pub documents: Vec<Document>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupedDocuments {
    pub matches: u64,
    pub ngroups: u64,
    pub groups: Vec<EngineGroup>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EngineResponse {
    pub num_found: u64,
    pub documents: Vec<Document>,
    /// Facet values per field, in engine order.
    pub facet_fields: BTreeMap<String, Vec<FacetContainer>>,
    pub grouped: Option<GroupedDocuments>,
    pub highlighting: Option<Highlighting>,
    pub collations: Vec<String>,
}

impl EngineResponse {
    pub fn facet_values(&self, field: &str) -> Vec<FacetContainer> {
        self.facet_fields.get(field).cloned().unwrap_or_default()
    }
}

pub trait SearchEngine: Send + Sync {
    fn execute<'a>(&'a self, request: &'a EngineRequest) -> BoxFuture<'a, Result<EngineResponse>>;

    /// Whether the engine answers at all.
    fn ping(&self) -> BoxFuture<'_, bool>;
}
