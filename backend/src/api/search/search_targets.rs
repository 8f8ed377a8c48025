//! Classifies search terms against the curated targets index.

use std::collections::BTreeSet;

use common::{
    search_query::Query,
    target_result::{TargetEntry, TargetResult},
};
use tracing::warn;

use crate::db_utils::{
    index_fields::{TARGET_ACCESSIONS, TARGET_GENE_NAMES, TARGET_IDENTIFIER, TARGET_RESOURCE, TARGET_SYNONYMS},
    search_engine::{Collection, Document, EngineRequest, RequestHandler, SearchEngine},
};

pub fn target_entry_from(document: &Document) -> Option<TargetEntry> {
    Some(TargetEntry {
        identifier: document.str(TARGET_IDENTIFIER)?,
        accessions: document.strings(TARGET_ACCESSIONS),
        gene_names: document.strings(TARGET_GENE_NAMES),
        synonyms: document.strings(TARGET_SYNONYMS),
        resource: document.str(TARGET_RESOURCE),
    })
}

/// One result per whitespace-separated term of `text`. A term is a target
/// when any candidate matches it; the resource is the last match's.
pub fn match_targets(text: &str, candidates: &[TargetEntry]) -> BTreeSet<TargetResult> {
    let mut results = BTreeSet::new();
    if candidates.is_empty() {
        return results;
    }
    for term in text.split_whitespace() {
        let matched = candidates.iter().rev().find(|candidate| candidate.matches(term));
        let resource = matched.and_then(|candidate| candidate.resource.clone());
        results.insert(TargetResult::new(term, resource, matched.is_some()));
    }
    results
}

/// Never fails: a targets index that cannot be reached classifies nothing.
pub async fn search_targets(engine: &dyn SearchEngine, query: &Query) -> BTreeSet<TargetResult> {
    let mut request = EngineRequest::new(RequestHandler::Search, query.query());
    request.collection = Collection::Targets;

    let response = match engine.execute(&request).await {
        Ok(response) => response,
        Err(err) => {
            warn!(query = query.query(), "Targets search failed: {err}");
            return BTreeSet::new();
        }
    };
    let candidates = response.documents.iter().filter_map(target_entry_from).collect::<Vec<_>>();
    match_targets(query.query(), &candidates)
}
