//! Facet counts for a query, kept consistent with the filters it selects.

use std::collections::BTreeMap;

use common::{
    search_query::{FacetGroup, Query},
    search_result::{FacetList, FacetMapping},
};
use tracing::info;

use crate::{
    api::search::search_filters::{base_request, facet_filters, facet_requests},
    db_utils::search_engine::{EngineRequest, EngineResponse, RequestHandler, SearchEngine},
    error::{Error, Result},
};

#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledFacets {
    pub facet_mapping: FacetMapping,
    /// The query the mapping belongs to, corrected when it drifted.
    pub query: Query,
}

pub fn facet_request(query: &Query) -> EngineRequest {
    let mut request = base_request(query, RequestHandler::Facet);
    request.filters = facet_filters(query, true);
    request.facets = facet_requests(&FacetGroup::FILTERABLE);
    request.start = None;
    request.rows = Some(0);
    request
}

pub fn facet_mapping_from(response: &EngineResponse, query: &Query) -> FacetMapping {
    let facets = FacetGroup::FILTERABLE
        .into_iter()
        .map(|group| {
            let values = response.facet_values(group.field_name());
            (group, FacetList::partition(values, query.selected(group)))
        })
        .collect();
    FacetMapping { total_found: response.num_found, facets }
}

pub async fn search_facets(engine: &dyn SearchEngine, query: &Query) -> Result<FacetMapping> {
    if !query.has_text() {
        return Err(Error::empty_query());
    }
    let response = engine.execute(&facet_request(query)).await?;
    Ok(facet_mapping_from(&response, query))
}

/// The query with every group's selection narrowed to the values the facets
/// actually report as selected, or `None` when nothing drifted.
pub fn detect_drift(facet_mapping: &FacetMapping, query: &Query) -> Option<Query> {
    let mut corrected = query.rebuild();
    let mut drifted = false;
    for group in FacetGroup::FILTERABLE {
        let Some(selected) = query.selected(group) else {
            continue;
        };
        if facet_mapping.selected_count(group) != selected.len() {
            drifted = true;
            let reported = facet_mapping.facet(group).map(FacetList::selected_names).unwrap_or_default();
            corrected = corrected.facet_filter(group, Some(reported));
        }
    }
    drifted.then(|| corrected.build())
}

/// Facets for `query`. A selection naming values the engine does not know is
/// corrected once and searched again, unless `force_filters` keeps it as given.
pub async fn reconcile_facets(
    engine: &dyn SearchEngine,
    query: &Query,
    force_filters: bool,
) -> Result<ReconciledFacets> {
    let facet_mapping = search_facets(engine, query).await?;
    if force_filters {
        return Ok(ReconciledFacets { facet_mapping, query: query.clone() });
    }
    let Some(corrected) = detect_drift(&facet_mapping, query) else {
        return Ok(ReconciledFacets { facet_mapping, query: query.clone() });
    };

    info!(query = query.query(), "Facet selection drifted, searching again with the corrected filters");
    let facet_mapping = search_facets(engine, &corrected).await?;
    Ok(ReconciledFacets { facet_mapping, query: corrected })
}

/// Every facet value in the index, nothing selected.
pub async fn total_facets(engine: &dyn SearchEngine) -> Result<FacetMapping> {
    let mut request = EngineRequest::new(RequestHandler::FacetAll, "*:*");
    request.rows = Some(0);
    let response = engine.execute(&request).await?;
    Ok(available_facets(&response))
}

/// Every facet field of `response` a group is known for, nothing selected.
pub fn available_facets(response: &EngineResponse) -> FacetMapping {
    let mut facets = BTreeMap::new();
    for (field, values) in &response.facet_fields {
        if let Some(group) = FacetGroup::from_field_name(field) {
            facets.insert(group, FacetList::available_only(values.clone()));
        }
    }
    FacetMapping { total_found: response.num_found, facets }
}
