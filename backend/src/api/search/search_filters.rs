//! Request builders shared by the search handlers.

use common::search_query::{FacetGroup, Query};

use crate::db_utils::search_engine::{EngineRequest, FacetRequest, FilterClause, RequestHandler};

/// One clause per facet group the query filters on. Tagged clauses can be
/// ignored by the facet of their own group.
pub fn facet_filters(query: &Query, tagged: bool) -> Vec<FilterClause> {
    query
        .facet_filters()
        .iter()
        .map(|(group, values)| FilterClause::AnyOf {
            field: group.field_name().to_string(),
            values: values.clone(),
            tag: if tagged { group.exclusion_tag() } else { None },
        })
        .collect()
}

/// Facet counts for `groups`, each ignoring its own group's filter.
pub fn facet_requests(groups: &[FacetGroup]) -> Vec<FacetRequest> {
    groups
        .iter()
        .map(|group| FacetRequest { field: group.field_name(), exclude_tag: group.exclusion_tag() })
        .collect()
}

/// The text, parser, scope and paging of `query` sent to `handler`.
pub fn base_request(query: &Query, handler: RequestHandler) -> EngineRequest {
    let mut request = EngineRequest::new(handler, query.query());
    request.parser_type = query.parser_type();
    request.scope = Some(query.scope());
    request.start = query.start();
    request.rows = query.rows();
    request
}

pub fn any_of(field: &str, values: &[String]) -> FilterClause {
    FilterClause::AnyOf { field: field.to_string(), values: values.to_vec(), tag: None }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_follow_selected_groups() {
        let query = Query::builder("PTEN")
            .species(Some(vec!["Homo sapiens".to_string()]))
            .types(Some(vec!["Protein".to_string(), "".to_string()]))
            .build();

        let tagged = facet_filters(&query, true);
        assert_eq!(tagged.len(), 2);
        assert_eq!(
            tagged[0],
            FilterClause::AnyOf {
                field: "species_facet".to_string(),
                values: vec!["Homo sapiens".to_string()],
                tag: Some("sf"),
            }
        );
        assert!(matches!(&facet_filters(&query, false)[1], FilterClause::AnyOf { tag: None, .. }));
    }
}
