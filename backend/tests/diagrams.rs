mod support;

use backend::{
    Error,
    api::diagrams::{fireworks_flagging, get_diagram_flagging, get_diagram_occurrences, get_diagram_search_summary, get_diagrams},
    db_utils::search_engine::{EngineResponse, FilterClause, RequestHandler},
};
use common::search_query::{Query, Scope};
use serde_json::json;

use support::{MockEngine, documents_response};

fn diagram_query(text: &str) -> Query {
    Query::builder(text).filter_query(Some("R-HSA-69278".to_string())).build()
}

#[tokio::test]
async fn fireworks_flags_keep_llps_and_interactions_apart() {
    let engine = MockEngine::new(|_| {
        Ok(documents_response(vec![
            json!({
                "llps": ["R-HSA-1"],
                "occurrences": ["R-HSA-1:true:#:R-HSA-77", "R-HSA-2:false:R-HSA-3:R-HSA-78", "R-HSA-4:true:#:#"],
            }),
            json!({ "occurrences": ["R-HSA-5:true::", "R-HSA-6:false:#:R-HSA-79"] }),
        ]))
    });

    let result = fireworks_flagging(&engine, &Query::builder("PTEN").build()).await.unwrap();

    assert_eq!(result.llps.iter().collect::<Vec<_>>(), vec!["R-HSA-1"]);
    assert_eq!(result.interacts_with.iter().collect::<Vec<_>>(), vec!["R-HSA-2", "R-HSA-6"]);
    assert!(result.llps.is_disjoint(&result.interacts_with));

    let request = &engine.requests()[0];
    assert_eq!(request.handler, RequestHandler::FireworksFlagging);
    assert_eq!(request.scope, Some(Scope::Both));
    assert_eq!(request.rows, Some(100));
    assert_eq!(
        request.filters,
        vec![FilterClause::AnyOf {
            field: "species_facet".to_string(),
            values: vec!["Homo sapiens".to_string(), "Entries without species".to_string()],
            tag: None,
        }]
    );
}

#[tokio::test]
async fn diagram_flagging_reads_records_of_the_diagram() {
    let engine = MockEngine::new(|_| {
        Ok(documents_response(vec![
            json!({ "stId": "R-HSA-199420", "occurrences": ["R-HSA-69278:true:#:#", "R-HSA-1:true:#:#"] }),
            json!({ "stId": "R-HSA-5", "occurrences": ["R-HSA-69278:false:R-HSA-9:#"] }),
        ]))
    });

    let flagged = get_diagram_flagging(&engine, &diagram_query("PTEN")).await.unwrap();

    assert_eq!(flagged.len(), 2);
    assert_eq!(flagged[0].diagram_entity.as_deref(), Some("R-HSA-199420"));
    assert!(flagged[0].in_diagram);
    assert_eq!(flagged[1].diagram_entity, None);
    assert!(flagged[1].occurrences.as_ref().unwrap().contains("R-HSA-9"));

    let request = &engine.requests()[0];
    assert_eq!(request.query, "PTEN AND occurrences:R-HSA-69278*");
    assert_eq!(request.scope, Some(Scope::Both));
}

#[tokio::test]
async fn occurrences_retry_over_both_scopes() {
    let engine = MockEngine::new(|request| {
        Ok(match request.scope {
            Some(Scope::Both) => documents_response(vec![json!({
                "occurrencesWithInteractor": ["R-HSA-1:true:#:#", "R-HSA-69278:false:R-HSA-2,R-HSA-3:#"],
            })]),
            _ => EngineResponse::default(),
        })
    });
    let query = diagram_query("R-HSA-199420").rebuild().include_interactors(true).build();

    let result = get_diagram_occurrences(&engine, &query).await.unwrap().unwrap();

    assert_eq!(result.diagram_entity.as_deref(), Some("R-HSA-69278"));
    assert!(!result.in_diagram);
    assert_eq!(result.occurrences.unwrap().len(), 2);
    assert_eq!(engine.requests().len(), 2);
    assert_eq!(engine.requests()[0].fields, vec!["occurrencesWithInteractor"]);
}

#[tokio::test]
async fn malformed_records_are_reported() {
    let engine = MockEngine::new(|_| Ok(documents_response(vec![json!({ "occurrences": ["R-HSA-69278:true:#"] })])));

    let err = get_diagram_occurrences(&engine, &diagram_query("R-HSA-199420")).await.unwrap_err();

    assert!(matches!(err, Error::MalformedOccurrenceRecord { .. }));
}

#[tokio::test]
async fn diagram_requests_need_a_diagram() {
    let engine = MockEngine::new(|_| Ok(EngineResponse::default()));

    let err = get_diagrams(&engine, &Query::builder("PTEN").build()).await.unwrap_err();

    assert!(matches!(err, Error::InvalidQuery { .. }));
    assert!(engine.requests().is_empty());
}

#[tokio::test]
async fn summary_retries_both_counts_when_the_overview_is_empty() {
    let engine = MockEngine::new(|request| {
        Ok(match (request.handler, request.scope) {
            (RequestHandler::Fireworks, Some(Scope::Both)) => EngineResponse { num_found: 3, ..Default::default() },
            (RequestHandler::Diagrams, Some(Scope::Both)) => EngineResponse { num_found: 1, ..Default::default() },
            _ => EngineResponse::default(),
        })
    });
    let query = diagram_query("PTEN").rebuild().species(Some(vec!["Homo sapiens".to_string()])).build();

    let summary = get_diagram_search_summary(&engine, &query).await.unwrap();

    assert_eq!(summary.fireworks_result.found, 3);
    assert_eq!(summary.diagram_result.found, 1);
    assert_eq!(
        engine.handlers(),
        vec![RequestHandler::Diagrams, RequestHandler::Fireworks, RequestHandler::Diagrams, RequestHandler::Fireworks]
    );
    let first = &engine.requests()[1];
    assert_eq!(first.rows, Some(0));
    assert!(first.filters.contains(&FilterClause::AnyOf {
        field: "fireworksSpecies".to_string(),
        values: vec!["Homo sapiens".to_string(), "Entries without species".to_string()],
        tag: None,
    }));
}
