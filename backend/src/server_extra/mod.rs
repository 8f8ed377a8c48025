//! HTTP routes over the search service.

mod api_error;
pub use api_error::ApiError;

pub mod state;

use std::collections::BTreeSet;

use axum::{
    Json, Router,
    extract::{Path, Query as UrlQuery, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use common::{
    diagram_result::{DiagramOccurrencesResult, DiagramResult, DiagramSearchSummary, FireworksOccurrencesResult, FireworksResult},
    search_query::Query,
    search_result::{Entry, FacetMapping, GroupedResult, ResultGroup, SearchOutcome},
    target_result::TargetResult,
};
use tracing::info;

use crate::{
    api::{
        diagrams::{fireworks_flagging, get_diagram_flagging, get_diagram_occurrences, get_diagram_search_summary, get_diagrams, get_fireworks},
        entities::EntityStore,
        icons::{get_all_icons, get_icon, get_icons_result, icon_facets},
        search::{autocomplete, get_entries, reconcile_facets, search_for_results, search_targets, spellcheck, total_facets},
    },
    error::Error,
};
use state::{AppState, BatchRequest, EntityParams, SearchRequest, TextParams};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/search/query", post(search))
        .route("/search/facet", post(facet))
        .route("/search/facet/all", get(facet_all))
        .route("/search/entries", post(entries))
        .route("/search/fireworks", post(fireworks))
        .route("/search/fireworks/flag", post(fireworks_flag))
        .route("/search/diagram/{diagram}", post(diagram))
        .route("/search/diagram/{diagram}/summary", post(diagram_summary))
        .route("/search/diagram/{diagram}/flag", post(diagram_flag))
        .route("/search/diagram/{diagram}/occurrences/{instance}", get(diagram_occurrences))
        .route("/search/suggest", get(suggest))
        .route("/search/spellcheck", get(spellcheck_route))
        .route("/search/targets", get(targets))
        .route("/icons", get(all_icons))
        .route("/icons/facet", get(icons_facet))
        .route("/icons/search", post(icons_search))
        .route("/icons/{st_id}", get(icon))
        .route("/entities/batch", post(entity_batch))
        .route("/entities/{db_id}", get(entity))
        .route("/entities/{db_id}/pathways", get(containing_pathways))
        .route("/entities/reference/{st_id}/physical-entities", get(physical_entities))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> StatusCode {
    if state.engine.ping().await { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE }
}

async fn search(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<SearchRequest>,
) -> Result<Json<SearchOutcome>, ApiError> {
    let query = payload.to_query(Some(state.report_info(&headers)));
    info!(query = query.query(), "search");
    let outcome = search_for_results(
        state.engine.as_ref(),
        state.reporter.as_ref(),
        query,
        payload.options(&state.search),
    )
    .await?;
    Ok(Json(outcome))
}

async fn facet(State(state): State<AppState>, Json(payload): Json<SearchRequest>) -> Result<Json<FacetMapping>, ApiError> {
    let query = payload.to_query(None);
    let reconciled = reconcile_facets(state.engine.as_ref(), &query, payload.force_filters).await?;
    Ok(Json(reconciled.facet_mapping))
}

async fn facet_all(State(state): State<AppState>) -> Result<Json<FacetMapping>, ApiError> {
    Ok(Json(total_facets(state.engine.as_ref()).await?))
}

async fn entries(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<SearchRequest>,
) -> Result<Json<GroupedResult>, ApiError> {
    let query = payload.to_query(Some(state.report_info(&headers)));
    let grouped = payload.group.unwrap_or(state.search.grouped);
    let result = get_entries(state.engine.as_ref(), state.reporter.as_ref(), &query, grouped).await?;
    Ok(Json(result))
}

async fn fireworks(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<SearchRequest>,
) -> Result<Json<FireworksResult>, ApiError> {
    let query = payload.to_query(Some(state.report_info(&headers)));
    Ok(Json(get_fireworks(state.engine.as_ref(), state.reporter.as_ref(), &query).await?))
}

async fn fireworks_flag(
    State(state): State<AppState>,
    Json(payload): Json<SearchRequest>,
) -> Result<Json<FireworksOccurrencesResult>, ApiError> {
    Ok(Json(fireworks_flagging(state.engine.as_ref(), &payload.to_query(None)).await?))
}

fn diagram_query(diagram: String, payload: &SearchRequest) -> Query {
    payload.to_query(None).rebuild().filter_query(Some(diagram)).build()
}

async fn diagram(
    State(state): State<AppState>,
    Path(diagram): Path<String>,
    Json(payload): Json<SearchRequest>,
) -> Result<Json<DiagramResult>, ApiError> {
    Ok(Json(get_diagrams(state.engine.as_ref(), &diagram_query(diagram, &payload)).await?))
}

async fn diagram_summary(
    State(state): State<AppState>,
    Path(diagram): Path<String>,
    Json(payload): Json<SearchRequest>,
) -> Result<Json<DiagramSearchSummary>, ApiError> {
    Ok(Json(get_diagram_search_summary(state.engine.as_ref(), &diagram_query(diagram, &payload)).await?))
}

async fn diagram_flag(
    State(state): State<AppState>,
    Path(diagram): Path<String>,
    Json(payload): Json<SearchRequest>,
) -> Result<Json<Vec<DiagramOccurrencesResult>>, ApiError> {
    Ok(Json(get_diagram_flagging(state.engine.as_ref(), &diagram_query(diagram, &payload)).await?))
}

async fn diagram_occurrences(
    State(state): State<AppState>,
    Path((diagram, instance)): Path<(String, String)>,
    UrlQuery(params): UrlQuery<EntityParams>,
) -> Result<Json<DiagramOccurrencesResult>, ApiError> {
    let payload = SearchRequest { query: instance, include_interactors: params.include_interactors, ..Default::default() };
    match get_diagram_occurrences(state.engine.as_ref(), &diagram_query(diagram, &payload)).await? {
        Some(result) => Ok(Json(result)),
        None => Err(ApiError::not_found("the entity does not occur in this diagram.")),
    }
}

async fn suggest(State(state): State<AppState>, UrlQuery(params): UrlQuery<TextParams>) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(autocomplete(state.engine.as_ref(), &params.query).await?))
}

async fn spellcheck_route(
    State(state): State<AppState>,
    UrlQuery(params): UrlQuery<TextParams>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(spellcheck(state.engine.as_ref(), &params.query).await?))
}

async fn targets(
    State(state): State<AppState>,
    UrlQuery(params): UrlQuery<TextParams>,
) -> Result<Json<BTreeSet<TargetResult>>, ApiError> {
    let query = SearchRequest { query: params.query, ..Default::default() }.to_query(None);
    if !query.has_text() {
        return Err(Error::empty_query().into());
    }
    Ok(Json(search_targets(state.engine.as_ref(), &query).await))
}

async fn all_icons(State(state): State<AppState>) -> Result<Json<Vec<Entry>>, ApiError> {
    Ok(Json(get_all_icons(state.engine.as_ref()).await?))
}

async fn icons_facet(State(state): State<AppState>) -> Result<Json<FacetMapping>, ApiError> {
    Ok(Json(icon_facets(state.engine.as_ref()).await?))
}

async fn icons_search(State(state): State<AppState>, Json(payload): Json<SearchRequest>) -> Result<Json<ResultGroup>, ApiError> {
    let options = payload.options(&state.search);
    let query = payload.to_query(None);
    Ok(Json(get_icons_result(state.engine.as_ref(), &query, options.row_count, options.page).await?))
}

async fn icon(State(state): State<AppState>, Path(st_id): Path<String>) -> Result<Json<Entry>, ApiError> {
    match get_icon(state.engine.as_ref(), &st_id).await? {
        Some(entry) => Ok(Json(entry)),
        None => Err(ApiError::not_found(format!("no icon with identifier {st_id}."))),
    }
}

async fn entity(
    State(state): State<AppState>,
    Path(db_id): Path<u64>,
    UrlQuery(params): UrlQuery<EntityParams>,
) -> Result<Json<Entry>, ApiError> {
    match state.entities.fetch_by_db_id(db_id, &params.fields()).await? {
        Some(entry) => Ok(Json(entry)),
        None => Err(ApiError::not_found(format!("no entity with database id {db_id}."))),
    }
}

async fn entity_batch(State(state): State<AppState>, Json(payload): Json<BatchRequest>) -> Result<Json<Vec<Entry>>, ApiError> {
    let mut entries = state.entities.fetch_many_by_st_ids(&payload.st_ids, &payload.fields).await?;
    entries.extend(state.entities.fetch_many_by_db_ids(&payload.db_ids, &payload.fields).await?);
    Ok(Json(entries))
}

async fn containing_pathways(
    State(state): State<AppState>,
    Path(db_id): Path<u64>,
    UrlQuery(params): UrlQuery<EntityParams>,
) -> Result<Json<Vec<Entry>>, ApiError> {
    let entries = state
        .entities
        .containing_pathways_of(db_id, params.include_interactors, params.directly_in_diagram, &params.fields())
        .await?;
    Ok(Json(entries))
}

async fn physical_entities(
    State(state): State<AppState>,
    Path(st_id): Path<String>,
    UrlQuery(params): UrlQuery<EntityParams>,
) -> Result<Json<Vec<Entry>>, ApiError> {
    Ok(Json(state.entities.physical_entities_of_reference(&st_id, &params.fields()).await?))
}
