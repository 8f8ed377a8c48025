mod support;

use backend::{
    Error,
    api::icons::{get_all_icons, get_icon, get_icons_result, icon_facets},
    db_utils::search_engine::{EngineResponse, FilterClause, RequestHandler},
};
use common::{
    search_query::{FacetGroup, Query},
    search_result::FacetContainer,
};
use serde_json::json;

use support::{MockEngine, documents_response, facet_response};

fn icon_document(st_id: &str, name: &str) -> serde_json::Value {
    json!({
        "dbId": st_id.trim_start_matches("R-ICO-"),
        "stId": st_id,
        "type": "Icon",
        "iconName": name,
        "iconCategories": ["protein"],
        "iconPhysicalEntities": ["R-HSA-199420#Protein#PTEN#cytosol", "broken#record"],
    })
}

#[tokio::test]
async fn icon_categories_come_from_the_icon_facet() {
    let engine = MockEngine::new(|_| {
        Ok(facet_response(42, &[("iconCategories_facet", &[("protein", 30), ("compound", 12)])]))
    });

    let mapping = icon_facets(&engine).await.unwrap();

    assert_eq!(mapping.total_found, 42);
    let categories = mapping.facet(FacetGroup::IconCategory).unwrap();
    assert_eq!(categories.available[0], FacetContainer::new("protein", 30));
    assert!(categories.selected.is_empty());
    let request = &engine.requests()[0];
    assert_eq!(request.handler, RequestHandler::IconFacet);
    assert_eq!(request.query, "{!term f=type}icon");
}

#[tokio::test]
async fn icon_pages_are_sorted_by_name() {
    let engine = MockEngine::new(|_| {
        let mut response = documents_response(vec![icon_document("R-ICO-012345", "PTEN")]);
        response.num_found = 25;
        Ok(response)
    });

    let group = get_icons_result(&engine, &Query::builder("PTEN").build(), 10, 3).await.unwrap();

    assert_eq!(group.entries_count, 25);
    assert_eq!(group.rows_count, 1);
    let entry = &group.entries[0];
    assert_eq!(entry.icon_name.as_deref(), Some("PTEN"));
    assert_eq!(entry.icon_categories, vec!["protein".to_string()]);
    assert_eq!(entry.icon_physical_entities.len(), 1);
    assert_eq!(entry.icon_physical_entities.first().unwrap().display_name(), "PTEN [cytosol]");

    let request = &engine.requests()[0];
    assert_eq!(request.sort.as_deref(), Some("iconName_sort asc"));
    assert_eq!((request.start, request.rows), (Some(20), Some(10)));
}

#[tokio::test]
async fn icon_lookup_is_restricted_to_icons() {
    let engine = MockEngine::new(|_| Ok(documents_response(vec![icon_document("R-ICO-012345", "PTEN")])));

    let entry = get_icon(&engine, "R-ICO-012345").await.unwrap().unwrap();

    assert_eq!(entry.st_id.as_deref(), Some("R-ICO-012345"));
    let request = &engine.requests()[0];
    assert_eq!(request.query, "stId:\"R-ICO-012345\"");
    assert_eq!(request.filters, vec![FilterClause::Raw("{!term f=type}icon".to_string())]);
    assert_eq!(request.min_match, Some("100%"));

    let missing = MockEngine::new(|_| Ok(EngineResponse::default()));
    assert_eq!(get_icon(&missing, "R-ICO-000000").await.unwrap(), None);
    assert!(matches!(get_icon(&missing, " ").await, Err(Error::InvalidQuery { .. })));
}

#[tokio::test]
async fn all_icons_are_counted_then_fetched() {
    let engine = MockEngine::new(|request| {
        if request.rows == Some(0) {
            return Ok(EngineResponse { num_found: 2, ..Default::default() });
        }
        Ok(documents_response(vec![icon_document("R-ICO-1", "ATP"), icon_document("R-ICO-2", "PTEN")]))
    });

    let icons = get_all_icons(&engine).await.unwrap();

    assert_eq!(icons.len(), 2);
    let requests = engine.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].rows, Some(2));
    assert_eq!(
        requests[1].filters,
        vec![FilterClause::AnyOf { field: "type_facet".to_string(), values: vec!["Icon".to_string()], tag: None }]
    );
}

#[tokio::test]
async fn empty_icon_library_needs_one_call() {
    let engine = MockEngine::new(|_| Ok(EngineResponse::default()));

    assert!(get_all_icons(&engine).await.unwrap().is_empty());
    assert_eq!(engine.requests().len(), 1);
}
