//! Where an entity occurs in a diagram, and which pathways to flag for a term.

use common::{
    diagram_result::{DiagramOccurrencesResult, FireworksOccurrencesResult},
    search_const::{DEFAULT_FLAGGING_SPECIES, ENTRIES_WITHOUT_SPECIES, FLAGGING_ROWS},
    search_query::{FacetGroup, Query, Scope},
};
use tracing::debug;

use crate::{
    api::{
        diagrams::required_diagram,
        search::search_filters::{any_of, base_request},
    },
    db_utils::{
        index_fields::{LLPS, ST_ID},
        occurrence_codec::{decode, decode_for_flagging, is_record_of},
        search_engine::{RequestHandler, SearchEngine},
    },
    error::Result,
};

async fn find_occurrences(
    engine: &dyn SearchEngine,
    query: &Query,
    diagram: &str,
) -> Result<Option<DiagramOccurrencesResult>> {
    let field = query.occurrences_field();
    let mut request = base_request(query, RequestHandler::DiagramOccurrences);
    request.fields = vec![field.to_string()];

    let response = engine.execute(&request).await?;
    for document in &response.documents {
        if let Some(record) = document.strings(field).into_iter().find(|record| is_record_of(record, diagram)) {
            return decode(&record).map(Some);
        }
    }
    Ok(None)
}

/// Occurrences of the entity named by the query text in the diagram the
/// query filters on. `None` when the entity is not part of that diagram.
pub async fn get_diagram_occurrences(
    engine: &dyn SearchEngine,
    query: &Query,
) -> Result<Option<DiagramOccurrencesResult>> {
    let diagram = required_diagram(query)?;
    if let Some(result) = find_occurrences(engine, query, diagram).await? {
        return Ok(Some(result));
    }
    debug!(diagram, "No occurrences found, retrying over both scopes");
    find_occurrences(engine, &query.rebuild().scope(Scope::Both).build(), diagram).await
}

/// Entities of the diagram to flag for the query text.
pub async fn get_diagram_flagging(engine: &dyn SearchEngine, query: &Query) -> Result<Vec<DiagramOccurrencesResult>> {
    let diagram = required_diagram(query)?;
    let query = query.rebuild().scope(Scope::Both).build();
    let field = query.occurrences_field();

    let mut request = base_request(&query, RequestHandler::DiagramFlagging);
    request.query = format!("{} AND {field}:{diagram}*", query.query());
    request.fields = vec![field.to_string(), ST_ID.to_string()];
    request.start = None;
    request.rows = Some(FLAGGING_ROWS);

    let response = engine.execute(&request).await?;
    let mut flagged = Vec::new();
    for document in &response.documents {
        let st_id = document.str(ST_ID);
        for record in document.strings(field).iter().filter(|record| is_record_of(record, diagram)) {
            flagged.push(decode_for_flagging(record, st_id.as_deref())?);
        }
    }
    Ok(flagged)
}

/// Pathways of the fireworks overview to flag for the query text.
pub async fn fireworks_flagging(engine: &dyn SearchEngine, query: &Query) -> Result<FireworksOccurrencesResult> {
    let mut species = match query.species() {
        Some(species) if !species.is_empty() => species.to_vec(),
        _ => vec![DEFAULT_FLAGGING_SPECIES.to_string()],
    };
    if !species.iter().any(|name| name == ENTRIES_WITHOUT_SPECIES) {
        species.push(ENTRIES_WITHOUT_SPECIES.to_string());
    }
    let query = query.rebuild().scope(Scope::Both).species(Some(species)).build();
    let field = query.occurrences_field();

    let mut request = base_request(&query, RequestHandler::FireworksFlagging);
    if let Some(species) = query.species() {
        request.filters.push(any_of(FacetGroup::Species.field_name(), species));
    }
    request.fields = vec![LLPS.to_string(), field.to_string()];
    request.start = None;
    request.rows = Some(FLAGGING_ROWS);

    let response = engine.execute(&request).await?;
    let mut result = FireworksOccurrencesResult::default();
    for document in &response.documents {
        result.add_llps(document.strings(LLPS));
        for record in document.strings(field) {
            let occurrence = decode(&record)?;
            if occurrence.interacts_with.as_ref().is_some_and(|interactors| !interactors.is_empty())
                && let Some(pathway) = occurrence.diagram_entity
            {
                result.add_interacts_with(pathway);
            }
        }
    }
    Ok(result.finish())
}
