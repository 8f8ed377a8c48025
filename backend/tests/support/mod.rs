#![allow(dead_code)]

use std::{collections::BTreeMap, sync::Mutex};

use backend::{
    Result,
    api::search::search_report::OutcomeReporter,
    db_utils::search_engine::{Document, EngineRequest, EngineResponse, RequestHandler, SearchEngine},
};
use common::{
    search_const::{REPORT_IP_ADDRESS, REPORT_RELEASE_VERSION, REPORT_USER_AGENT},
    search_query::Query,
    search_result::FacetContainer,
    target_result::TargetResult,
};
use futures::future::BoxFuture;
use serde_json::Value;

type Responder = Box<dyn Fn(&EngineRequest) -> Result<EngineResponse> + Send + Sync>;

/// Answers every request with `responder` and keeps a copy of it.
pub struct MockEngine {
    requests: Mutex<Vec<EngineRequest>>,
    responder: Responder,
}

impl MockEngine {
    pub fn new(responder: impl Fn(&EngineRequest) -> Result<EngineResponse> + Send + Sync + 'static) -> Self {
        Self { requests: Mutex::new(Vec::new()), responder: Box::new(responder) }
    }

    pub fn requests(&self) -> Vec<EngineRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn handlers(&self) -> Vec<RequestHandler> {
        self.requests().iter().map(|request| request.handler).collect()
    }
}

impl SearchEngine for MockEngine {
    fn execute<'a>(&'a self, request: &'a EngineRequest) -> BoxFuture<'a, Result<EngineResponse>> {
        self.requests.lock().unwrap().push(request.clone());
        let response = (self.responder)(request);
        Box::pin(async move { response })
    }

    fn ping(&self) -> BoxFuture<'_, bool> {
        Box::pin(async { true })
    }
}

#[derive(Default)]
pub struct RecordingReporter {
    pub not_found: Mutex<Vec<String>>,
    pub targets: Mutex<Vec<Vec<TargetResult>>>,
}

impl OutcomeReporter for RecordingReporter {
    fn report_not_found(&self, query: &Query) {
        self.not_found.lock().unwrap().push(query.original_query().to_string());
    }

    fn report_targets(&self, _query: &Query, targets: Vec<TargetResult>) {
        self.targets.lock().unwrap().push(targets);
    }
}

pub fn document(value: Value) -> Document {
    match value {
        Value::Object(map) => Document(map),
        other => panic!("documents are objects, got {other}"),
    }
}

pub fn facet_response(total: u64, fields: &[(&str, &[(&str, u64)])]) -> EngineResponse {
    let mut response = EngineResponse { num_found: total, ..Default::default() };
    for (field, values) in fields {
        response.facet_fields.insert(
            field.to_string(),
            values.iter().map(|(name, count)| FacetContainer::new(*name, *count)).collect(),
        );
    }
    response
}

pub fn documents_response(documents: Vec<Value>) -> EngineResponse {
    EngineResponse {
        num_found: documents.len() as u64,
        documents: documents.into_iter().map(document).collect(),
        ..Default::default()
    }
}

pub fn report_info() -> BTreeMap<String, String> {
    BTreeMap::from([
        (REPORT_RELEASE_VERSION.to_string(), "94".to_string()),
        (REPORT_IP_ADDRESS.to_string(), "127.0.0.1".to_string()),
        (REPORT_USER_AGENT.to_string(), "tests".to_string()),
    ])
}
