mod support;

use backend::{
    api::search::{reconcile_facets, total_facets},
    db_utils::search_engine::{FilterClause, RequestHandler},
};
use common::search_query::{FacetGroup, Query};

use support::{MockEngine, facet_response};

#[tokio::test]
async fn drift_is_corrected_exactly_once() {
    // Never reports any selected value, however the filters change.
    let engine = MockEngine::new(|_| Ok(facet_response(3, &[("species_facet", &[("Mus musculus", 3)])])));
    let query = Query::builder("PTEN")
        .species(Some(vec!["Homo sapiens".to_string(), "Gallus gallus".to_string()]))
        .build();

    let reconciled = reconcile_facets(&engine, &query, false).await.unwrap();

    let requests = engine.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|request| request.handler == RequestHandler::Facet));
    assert!(matches!(
        &requests[1].filters[0],
        FilterClause::AnyOf { values, .. } if values.is_empty()
    ));
    assert_eq!(reconciled.query.species(), Some(&[][..]));
    assert_eq!(reconciled.facet_mapping.available_count(FacetGroup::Species), 1);
}

#[tokio::test]
async fn known_selection_needs_a_single_call() {
    let engine = MockEngine::new(|_| {
        Ok(facet_response(5, &[("type_facet", &[("Protein", 4), ("Complex", 1)])]))
    });
    let query = Query::builder("PTEN").types(Some(vec!["Protein".to_string()])).build();

    let reconciled = reconcile_facets(&engine, &query, false).await.unwrap();

    assert_eq!(engine.requests().len(), 1);
    assert_eq!(reconciled.query, query);
    let types = reconciled.facet_mapping.facet(FacetGroup::Type).unwrap();
    assert_eq!(types.selected_names(), vec!["Protein"]);
    assert_eq!(types.available[0].name, "Complex");
}

#[tokio::test]
async fn facet_requests_exclude_each_groups_own_filter() {
    let engine = MockEngine::new(|_| Ok(facet_response(1, &[])));
    let query = Query::builder("PTEN").build();

    reconcile_facets(&engine, &query, false).await.unwrap();

    let request = &engine.requests()[0];
    let excluded = request.facets.iter().map(|facet| (facet.field, facet.exclude_tag)).collect::<Vec<_>>();
    assert_eq!(
        excluded,
        vec![
            ("species_facet", Some("sf")),
            ("type_facet", Some("tf")),
            ("keywords_facet", Some("kf")),
            ("compartment_facet", Some("cf")),
        ]
    );
}

#[tokio::test]
async fn total_facets_lists_everything_as_available() {
    let engine = MockEngine::new(|_| {
        Ok(facet_response(
            100,
            &[("species_facet", &[("Homo sapiens", 90)]), ("iconCategories_facet", &[("arrow", 2)]), ("other", &[("x", 1)])],
        ))
    });

    let mapping = total_facets(&engine).await.unwrap();

    assert_eq!(engine.handlers(), vec![RequestHandler::FacetAll]);
    assert_eq!(mapping.total_found, 100);
    assert_eq!(mapping.facets.len(), 2);
    assert_eq!(mapping.available_count(FacetGroup::IconCategory), 1);
    assert_eq!(mapping.selected_count(FacetGroup::Species), 0);
}
