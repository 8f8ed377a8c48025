//! Icon library: category facets, paged icon search and single icons.

use common::{
    search_query::Query,
    search_result::{Entry, FacetMapping, ResultGroup},
};
use tracing::debug;

use crate::{
    api::search::{available_facets, build_entry, flat_group, search_entries},
    db_utils::{
        index_fields::{ICON_NAME_SORT, ST_ID},
        search_engine::{EngineRequest, FilterClause, RequestHandler, SearchEngine},
        solr_utils::quote_phrase,
    },
    error::{Error, Result},
};

/// Restricts a search to icon documents.
const ICON_TYPE_FILTER: &str = "{!term f=type}icon";
const ICON_TYPE: &str = "Icon";

/// Icon categories over the whole library.
pub async fn icon_facets(engine: &dyn SearchEngine) -> Result<FacetMapping> {
    let mut request = EngineRequest::new(RequestHandler::IconFacet, ICON_TYPE_FILTER);
    request.rows = Some(0);
    let response = engine.execute(&request).await?;
    Ok(available_facets(&response))
}

/// One page of icons matching the query text, sorted by icon name.
pub async fn get_icons_result(engine: &dyn SearchEngine, query: &Query, rows: u32, page: u32) -> Result<ResultGroup> {
    if !query.has_text() {
        return Err(Error::empty_query());
    }
    let mut request = EngineRequest::new(RequestHandler::Search, query.query());
    request.sort = Some(format!("{ICON_NAME_SORT} asc"));
    request.start = Some(rows.saturating_mul(page.max(1) - 1));
    request.rows = Some(rows);
    let response = engine.execute(&request).await?;
    Ok(flat_group(&response))
}

/// The icon with stable identifier `st_id`.
pub async fn get_icon(engine: &dyn SearchEngine, st_id: &str) -> Result<Option<Entry>> {
    let st_id = st_id.trim();
    if st_id.is_empty() {
        return Err(Error::empty_query());
    }
    let mut request = EngineRequest::new(RequestHandler::Search, format!("{ST_ID}:{}", quote_phrase(st_id)));
    request.filters.push(FilterClause::Raw(ICON_TYPE_FILTER.to_string()));
    request.min_match = Some("100%");
    let response = engine.execute(&request).await?;
    let highlighting = response.highlighting.as_ref();
    Ok(response.documents.iter().find_map(|document| build_entry(document, highlighting)))
}

/// Every icon in the library: counted first, then fetched in one page.
pub async fn get_all_icons(engine: &dyn SearchEngine) -> Result<Vec<Entry>> {
    let query = Query::builder("*:*")
        .types(Some(vec![ICON_TYPE.to_string()]))
        .start(Some(0))
        .rows(Some(0))
        .build();
    let count = search_entries(engine, &query, false).await?.number_of_matches;
    if count == 0 {
        debug!("The icon library is empty");
        return Ok(Vec::new());
    }

    let query = query.rebuild().rows(Some(u32::try_from(count).unwrap_or(u32::MAX))).build();
    let result = search_entries(engine, &query, false).await?;
    Ok(result.results.into_iter().next().map(|group| group.entries).unwrap_or_default())
}
