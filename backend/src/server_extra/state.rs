//! Shared handler state and request payloads.

use std::{collections::BTreeMap, sync::Arc};

use axum::http::HeaderMap;
use common::{
    search_const::{REPORT_IP_ADDRESS, REPORT_RELEASE_VERSION, REPORT_USER_AGENT},
    search_query::{ParserType, Query, Scope},
};
use serde::Deserialize;

use crate::{
    api::{
        entities::IndexEntityStore,
        search::{
            SearchOptions,
            search_report::{DisabledReporter, HttpReporter, OutcomeReporter},
        },
    },
    config::{self, Config},
    db_utils::{search_engine::SearchEngine, solr_utils::SolrEngine},
    error::Result,
};

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<dyn SearchEngine>,
    pub reporter: Arc<dyn OutcomeReporter>,
    pub entities: Arc<IndexEntityStore>,
    pub search: config::Search,
    pub release_version: Option<String>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let engine: Arc<dyn SearchEngine> = Arc::new(SolrEngine::new(&config.solr)?);
        let reporter: Arc<dyn OutcomeReporter> = if config.report.enabled {
            Arc::new(HttpReporter::new(&config.report))
        } else {
            Arc::new(DisabledReporter)
        };
        Ok(Self::from_parts(engine, reporter, config.search.clone(), config.service.release_version.clone()))
    }

    pub fn from_parts(
        engine: Arc<dyn SearchEngine>,
        reporter: Arc<dyn OutcomeReporter>,
        search: config::Search,
        release_version: Option<String>,
    ) -> Self {
        Self {
            entities: Arc::new(IndexEntityStore::new(engine.clone())),
            engine,
            reporter,
            search,
            release_version,
        }
    }

    /// Report metadata for a request: data release, caller address and agent.
    pub fn report_info(&self, headers: &HeaderMap) -> BTreeMap<String, String> {
        let header = |name: &str| headers.get(name).and_then(|value| value.to_str().ok()).map(str::trim);
        let ip_address = header("x-forwarded-for")
            .and_then(|forwarded| forwarded.split(',').next())
            .or_else(|| header("x-real-ip"))
            .unwrap_or_default();

        BTreeMap::from([
            (REPORT_RELEASE_VERSION.to_string(), self.release_version.clone().unwrap_or_default()),
            (REPORT_IP_ADDRESS.to_string(), ip_address.trim().to_string()),
            (REPORT_USER_AGENT.to_string(), header("user-agent").unwrap_or_default().to_string()),
        ])
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchRequest {
    pub query: String,
    /// Diagram the request is scoped to, for the diagram routes.
    pub filter_query: Option<String>,
    pub species: Option<Vec<String>>,
    pub types: Option<Vec<String>>,
    pub keywords: Option<Vec<String>>,
    pub compartments: Option<Vec<String>>,
    pub include_interactors: bool,
    pub scope: Option<Scope>,
    pub parser_type: Option<ParserType>,
    pub start: Option<u32>,
    pub rows: Option<u32>,
    pub page: Option<u32>,
    pub rows_count: Option<u32>,
    pub group: Option<bool>,
    pub force_filters: bool,
}

impl SearchRequest {
    pub fn to_query(&self, report_info: Option<BTreeMap<String, String>>) -> Query {
        Query::builder(self.query.trim())
            .keep_original_query(self.query.as_str())
            .filter_query(self.filter_query.clone())
            .species(self.species.clone())
            .types(self.types.clone())
            .keywords(self.keywords.clone())
            .compartments(self.compartments.clone())
            .include_interactors(self.include_interactors)
            .scope(self.scope.unwrap_or_default())
            .parser_type(self.parser_type.unwrap_or_default())
            .start(self.start)
            .rows(self.rows)
            .report_info(report_info)
            .build()
    }

    pub fn options(&self, search: &config::Search) -> SearchOptions {
        SearchOptions {
            row_count: self.rows_count.unwrap_or(search.page_size),
            page: self.page.unwrap_or(1).max(1),
            grouped: self.group.unwrap_or(search.grouped),
            force_filters: self.force_filters,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextParams {
    pub query: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntityParams {
    pub include_interactors: bool,
    pub directly_in_diagram: bool,
    /// Comma-separated stored fields to return.
    pub fields: Option<String>,
}

impl EntityParams {
    pub fn fields(&self) -> Vec<String> {
        self.fields
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchRequest {
    pub st_ids: Vec<String>,
    pub db_ids: Vec<u64>,
    pub fields: Vec<String>,
}
