//! Hits inside one diagram and across the fireworks overview.

use common::{
    diagram_result::{DiagramResult, DiagramSearchSummary, FireworksResult},
    search_const::ENTRIES_WITHOUT_SPECIES,
    search_query::{FacetGroup, Query, Scope},
    search_result::Entry,
};

use crate::{
    api::{
        diagrams::required_diagram,
        search::{
            build_entry,
            search_filters::{any_of, base_request, facet_requests},
            search_report::{OutcomeReporter, dispatch_report},
            search_targets,
        },
    },
    db_utils::{
        index_fields::{DIAGRAMS, FIREWORKS_SPECIES},
        search_engine::{EngineRequest, EngineResponse, FilterClause, RequestHandler, SearchEngine},
        solr_utils::quote_phrase,
    },
    error::{Error, Result},
};

/// Species selection widened to documents without a species.
fn with_speciesless_entries(query: &Query) -> Query {
    let Some(species) = query.species() else {
        return query.clone();
    };
    let mut species = species.to_vec();
    if !species.iter().any(|name| name == ENTRIES_WITHOUT_SPECIES) {
        species.push(ENTRIES_WITHOUT_SPECIES.to_string());
    }
    query.rebuild().species(Some(species)).build()
}

fn type_filter(query: &Query) -> Option<FilterClause> {
    let types = query.types().filter(|types| !types.is_empty())?;
    Some(FilterClause::AnyOf {
        field: FacetGroup::Type.field_name().to_string(),
        values: types.to_vec(),
        tag: FacetGroup::Type.exclusion_tag(),
    })
}

fn diagrams_request(query: &Query, diagram: &str) -> EngineRequest {
    let mut request = base_request(query, RequestHandler::Diagrams);
    if let Some(species) = query.species().filter(|species| !species.is_empty()) {
        request.filters.push(any_of(FacetGroup::Species.field_name(), species));
    }
    request.filters.extend(type_filter(query));
    request.filters.push(FilterClause::Raw(format!("{DIAGRAMS}:{}", quote_phrase(diagram))));
    request.facets = facet_requests(&[FacetGroup::Type]);
    request
}

fn fireworks_request(query: &Query) -> EngineRequest {
    let mut request = base_request(query, RequestHandler::Fireworks);
    if let Some(species) = query.species() {
        request.filters.push(any_of(FIREWORKS_SPECIES, species));
    }
    request.filters.extend(type_filter(query));
    request.facets = facet_requests(&[FacetGroup::Type]);
    request
}

fn entries_of(response: &EngineResponse) -> Vec<Entry> {
    let highlighting = response.highlighting.as_ref();
    response.documents.iter().filter_map(|document| build_entry(document, highlighting)).collect()
}

async fn diagram_result(engine: &dyn SearchEngine, query: &Query) -> Result<DiagramResult> {
    let diagram = required_diagram(query)?;
    let response = engine.execute(&diagrams_request(query, diagram)).await?;
    Ok(DiagramResult {
        entries: entries_of(&response),
        facets: response.facet_values(FacetGroup::Type.field_name()),
        found: response.num_found,
    })
}

async fn fireworks_result(engine: &dyn SearchEngine, query: &Query) -> Result<FireworksResult> {
    if !query.has_text() {
        return Err(Error::empty_query());
    }
    let response = engine.execute(&fireworks_request(query)).await?;
    Ok(FireworksResult {
        entries: entries_of(&response),
        facets: response.facet_values(FacetGroup::Type.field_name()),
        found: response.num_found,
        target_results: None,
    })
}

/// Hits of `query` inside the diagram it filters on, tried again over both
/// entity representations when nothing is found.
pub async fn get_diagrams(engine: &dyn SearchEngine, query: &Query) -> Result<DiagramResult> {
    let result = diagram_result(engine, query).await?;
    if result.found > 0 {
        return Ok(result);
    }
    diagram_result(engine, &query.rebuild().scope(Scope::Both).build()).await
}

/// Hits across the fireworks overview. When nothing matches, the terms are
/// classified against the curated targets.
pub async fn get_fireworks(
    engine: &dyn SearchEngine,
    reporter: &dyn OutcomeReporter,
    query: &Query,
) -> Result<FireworksResult> {
    let query = with_speciesless_entries(query);
    let mut result = fireworks_result(engine, &query).await?;
    if result.found == 0 {
        let targets = search_targets(engine, &query).await;
        dispatch_report(reporter, &query, &targets);
        if !targets.is_empty() {
            result.target_results = Some(targets);
        }
    }
    Ok(result)
}

/// Counts only: how many hits fall in the diagram and in the overview.
pub async fn get_diagram_search_summary(engine: &dyn SearchEngine, query: &Query) -> Result<DiagramSearchSummary> {
    let query = with_speciesless_entries(&query.rebuild().start(Some(0)).rows(Some(0)).build());

    let diagrams = diagram_result(engine, &query).await?;
    let fireworks = fireworks_result(engine, &query).await?;
    if fireworks.found > 0 {
        return Ok(DiagramSearchSummary { diagram_result: diagrams, fireworks_result: fireworks });
    }

    let query = query.rebuild().scope(Scope::Both).build();
    Ok(DiagramSearchSummary {
        diagram_result: diagram_result(engine, &query).await?,
        fireworks_result: fireworks_result(engine, &query).await?,
    })
}
