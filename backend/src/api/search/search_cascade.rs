//! The search entry point: relaxes a query until something matches.

use common::{
    search_const::DEFAULT_PAGE_SIZE,
    search_query::{FacetGroup, ParserType, Query, Scope},
    search_result::{FacetMapping, SearchOutcome, SearchResult},
};
use tracing::info;

use crate::{
    api::search::{
        search_facets::{ReconciledFacets, reconcile_facets},
        search_for_results::search_entries,
        search_report::{OutcomeReporter, dispatch_report},
        search_targets::search_targets,
    },
    db_utils::search_engine::SearchEngine,
    error::{Error, Result},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub row_count: u32,
    /// One-based.
    pub page: u32,
    pub grouped: bool,
    /// Use the filters as given: no facet correction and no relaxation.
    pub force_filters: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { row_count: DEFAULT_PAGE_SIZE, page: 1, grouped: true, force_filters: false }
    }
}

type Relaxation = fn(&Query) -> Query;

// Tried in order while the previous attempt found nothing.
const RELAXATIONS: [(&str, Relaxation); 3] = [
    ("text only", |query: &Query| {
        Query::builder(query.query())
            .keep_original_query(query.original_query())
            .report_info(query.report_info().cloned())
            .build()
    }),
    ("disjunctive parser", |query: &Query| query.rebuild().parser_type(ParserType::Dismax).build()),
    ("both scopes", |query: &Query| query.rebuild().scope(Scope::Both).build()),
];

/// Start and rows for a page of `row_count` entries, shared between the
/// entity types when grouped. An explicit start and rows on the query win.
pub fn paging_parameters(
    query: &Query,
    facet_mapping: &FacetMapping,
    row_count: u32,
    page: u32,
    grouped: bool,
) -> Option<(u32, u32)> {
    if let (Some(start), Some(rows)) = (query.start(), query.rows()) {
        return Some((start, rows));
    }
    let type_count = match query.types() {
        Some(types) if !types.is_empty() => types.len(),
        _ => facet_mapping.available_count(FacetGroup::Type),
    };
    if type_count == 0 {
        return None;
    }
    let rows = if grouped { row_count / type_count as u32 } else { row_count };
    Some((rows.saturating_mul(page.saturating_sub(1)), rows))
}

pub async fn search_for_results(
    engine: &dyn SearchEngine,
    reporter: &dyn OutcomeReporter,
    query: Query,
    options: SearchOptions,
) -> Result<SearchOutcome> {
    if !query.has_text() {
        return Err(Error::empty_query());
    }

    let mut reconciled = reconcile_facets(engine, &query, options.force_filters).await?;
    if !options.force_filters {
        for (step, relax) in RELAXATIONS {
            if reconciled.facet_mapping.total_found > 0 {
                break;
            }
            info!(query = query.query(), step, "Nothing found, relaxing the search");
            reconciled = reconcile_facets(engine, &relax(&reconciled.query), false).await?;
        }
    }

    let ReconciledFacets { facet_mapping, query } = reconciled;
    if facet_mapping.total_found > 0 {
        let query = match paging_parameters(&query, &facet_mapping, options.row_count, options.page, options.grouped) {
            Some((start, rows)) => query.rebuild().start(Some(start)).rows(Some(rows)).build(),
            None => query,
        };
        let grouped_result = search_entries(engine, &query, options.grouped).await?;
        return Ok(SearchOutcome::Found(SearchResult {
            result_count: grouped_result.highest_result_count(),
            rows: query.rows(),
            facet_mapping,
            grouped_result,
        }));
    }

    let targets = search_targets(engine, &query).await;
    dispatch_report(reporter, &query, &targets);
    if targets.is_empty() {
        Ok(SearchOutcome::NotFound)
    } else {
        Ok(SearchOutcome::Targets(targets))
    }
}


#[cfg(test)]
mod tests {
    use common::search_result::{FacetContainer, FacetList};

    use super::*;

    fn mapping_with_types(available: usize) -> FacetMapping {
        let mut mapping = FacetMapping { total_found: 10, ..Default::default() };
        let values = (0..available).map(|i| FacetContainer::new(format!("type {i}"), 1)).collect();
        mapping.facets.insert(FacetGroup::Type, FacetList::available_only(values));
        mapping
    }

    #[test]
    fn grouped_rows_are_shared_between_types() {
        let query = Query::builder("apoptosis").build();
        assert_eq!(paging_parameters(&query, &mapping_with_types(4), 30, 3, true), Some((14, 7)));
        assert_eq!(paging_parameters(&query, &mapping_with_types(4), 30, 3, false), Some((60, 30)));
    }

    #[test]
    fn more_types_than_rows_pages_nothing() {
        let query = Query::builder("apoptosis").build();
        assert_eq!(paging_parameters(&query, &mapping_with_types(4), 3, 1, true), Some((0, 0)));
        assert_eq!(paging_parameters(&query, &mapping_with_types(4), 3, 2, true), Some((0, 0)));
    }

    #[test]
    fn selected_types_drive_the_split() {
        let query = Query::builder("apoptosis")
            .types(Some(vec!["Protein".to_string(), "Complex".to_string()]))
            .build();
        assert_eq!(paging_parameters(&query, &mapping_with_types(9), 30, 1, true), Some((0, 15)));
    }

    #[test]
    fn explicit_paging_is_kept_and_no_types_means_no_paging() {
        let query = Query::builder("apoptosis").start(Some(5)).rows(Some(2)).build();
        assert_eq!(paging_parameters(&query, &mapping_with_types(0), 30, 1, true), Some((5, 2)));

        let query = Query::builder("apoptosis").build();
        assert_eq!(paging_parameters(&query, &mapping_with_types(0), 30, 1, true), None);
    }

    #[test]
    fn text_only_relaxation_keeps_the_original_text() {
        let query = Query::builder("apoptosis")
            .keep_original_query("Apoptosis!")
            .species(Some(vec!["Homo sapiens".to_string()]))
            .build();
        let (_, relax) = RELAXATIONS[0];
        let relaxed = relax(&query);
        assert_eq!(relaxed.species(), None);
        assert_eq!(relaxed.original_query(), "Apoptosis!");
    }
}
