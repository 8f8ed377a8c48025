//! Turns engine documents into display-ready result groups.

use std::collections::HashMap;

use common::{
    search_const::HIGHLIGHT_MARKER,
    search_query::{FacetGroup, Query},
    search_result::{Entry, GroupedResult, IconPhysicalEntity, ResultGroup},
};

use crate::{
    api::search::{
        search_filters::{base_request, facet_filters},
        search_report::{OutcomeReporter, dispatch_report},
        search_targets::search_targets,
    },
    db_utils::{
        index_fields::*,
        search_engine::{Document, EngineRequest, EngineResponse, GroupDirective, Highlighting, RequestHandler, SearchEngine},
    },
    error::{Error, Result},
};

const FLAT_GROUP_NAME: &str = "Results";

type FieldSetter = fn(&mut Entry, String);

// Plain values are set first; a non-empty snippet replaces them.
const HIGHLIGHTED_FIELDS: [(&str, FieldSetter); 6] = [
    (NAME, |entry: &mut Entry, value: String| entry.name = Some(value)),
    (SUMMATION, |entry: &mut Entry, value: String| entry.summation = Some(value)),
    (REFERENCE_NAME, |entry: &mut Entry, value: String| entry.reference_name = Some(value)),
    (ST_ID, |entry: &mut Entry, value: String| entry.st_id = Some(value)),
    (REGULATOR, |entry: &mut Entry, value: String| entry.regulator = Some(value)),
    (REGULATED_ENTITY, |entry: &mut Entry, value: String| entry.regulated_entity = Some(value)),
];

/// The stored identifier shown for an entity: the first one without a
/// namespace prefix, else the first one.
pub fn select_reference_identifier(identifiers: &[String]) -> Option<String> {
    identifiers
        .iter()
        .find(|identifier| !identifier.contains(':'))
        .or_else(|| identifiers.first())
        .cloned()
}

/// The snippet of the identifier that matched, else the first snippet.
fn select_highlighted_identifier(snippets: &[String]) -> Option<String> {
    snippets
        .iter()
        .find(|snippet| snippet.contains(HIGHLIGHT_MARKER))
        .or_else(|| snippets.first())
        .cloned()
}

fn first_snippet(snippets: Option<&Vec<String>>) -> Option<String> {
    snippets?.iter().find(|snippet| !snippet.is_empty()).cloned()
}

/// `None` for an empty document.
pub fn build_entry(document: &Document, highlighting: Option<&Highlighting>) -> Option<Entry> {
    if document.is_empty() {
        return None;
    }

    let db_id = document.str(DB_ID);
    let st_id = document.str(ST_ID);
    let mut entry = Entry {
        id: st_id.clone().or_else(|| db_id.clone()),
        db_id,
        st_id,
        name: document.str(NAME),
        exact_type: document.str(EXACT_TYPE),
        species: document.strings(SPECIES),
        summation: document.str(SUMMATION).or_else(|| document.str(INFERRED_SUMMATION)),
        reference_name: document.str(REFERENCE_NAME),
        reference_identifier: select_reference_identifier(&document.strings(REFERENCE_IDENTIFIERS)),
        compartment_names: document.strings(COMPARTMENT_NAME),
        compartment_accession: document.strings(COMPARTMENT_ACCESSION),
        is_disease: document.bool(IS_DISEASE),
        has_reference_entity: document.bool(HAS_REFERENCE_ENTITY),
        has_ehld: document.bool(HAS_EHLD),
        database_name: document.str(DATABASE_NAME),
        reference_url: document.str(REFERENCE_URL),
        regulator: document.str(REGULATOR),
        regulator_id: document.str(REGULATOR_ID),
        regulated_entity: document.str(REGULATED_ENTITY),
        regulated_entity_id: document.str(REGULATED_ENTITY_ID),
        authored_pathways: document.str(AUTHORED_PATHWAYS),
        authored_reactions: document.str(AUTHORED_REACTIONS),
        reviewed_pathways: document.str(REVIEWED_PATHWAYS),
        reviewed_reactions: document.str(REVIEWED_REACTIONS),
        orcid_id: document.str(ORCID_ID),
        fireworks_species: document.strings(FIREWORKS_SPECIES),
        deleted: document.bool(DELETED).unwrap_or(false),
        icon_name: document.str(ICON_NAME),
        icon_categories: document.strings(ICON_CATEGORIES),
        icon_curator_name: document.str(ICON_CURATOR_NAME),
        icon_curator_orcid_id: document.str(ICON_CURATOR_ORCID_ID),
        icon_curator_url: document.str(ICON_CURATOR_URL),
        icon_designer_name: document.str(ICON_DESIGNER_NAME),
        icon_designer_url: document.str(ICON_DESIGNER_URL),
        icon_designer_orcid_id: document.str(ICON_DESIGNER_ORCID_ID),
        icon_references: document.strings(ICON_REFERENCES),
        icon_ehlds: document.strings(ICON_EHLDS),
        icon_physical_entities: document
            .strings(ICON_PHYSICAL_ENTITIES)
            .iter()
            .filter_map(|packed| IconPhysicalEntity::parse(packed))
            .collect(),
    };

    let snippets = match (highlighting, entry.db_id.as_ref()) {
        (Some(highlighting), Some(db_id)) => highlighting.get(db_id),
        _ => None,
    };
    if let Some(snippets) = snippets {
        apply_highlighting(&mut entry, snippets);
    }
    Some(entry)
}

fn apply_highlighting(entry: &mut Entry, snippets: &HashMap<String, Vec<String>>) {
    for (field, set) in HIGHLIGHTED_FIELDS {
        if let Some(snippet) = first_snippet(snippets.get(field)) {
            set(entry, snippet);
        }
    }
    if let Some(identifier) = snippets
        .get(REFERENCE_IDENTIFIERS)
        .and_then(|snippets| select_highlighted_identifier(snippets))
    {
        entry.reference_identifier = Some(identifier);
    }
}

/// One group per engine group that still has entries once empty documents
/// are dropped. Group and match totals are the engine's.
pub fn assemble_grouped_entries(response: &EngineResponse) -> GroupedResult {
    let Some(grouped) = &response.grouped else {
        return GroupedResult::default();
    };

    let highlighting = response.highlighting.as_ref();
    let mut results = Vec::new();
    let mut row_count = 0;
    for group in &grouped.groups {
        let entries = group
            .documents
            .iter()
            .filter_map(|document| build_entry(document, highlighting))
            .collect::<Vec<_>>();
        if entries.is_empty() {
            continue;
        }
        row_count += entries.len();
        results.push(ResultGroup {
            rows_count: entries.len(),
            entries,
            type_name: group.group_value.clone().unwrap_or_default(),
            entries_count: group.num_found,
        });
    }

    GroupedResult {
        results,
        row_count,
        number_of_groups: grouped.ngroups,
        number_of_matches: grouped.matches,
        target_results: None,
    }
}

/// Every entry of an ungrouped response under one "Results" group.
pub fn flat_group(response: &EngineResponse) -> ResultGroup {
    let highlighting = response.highlighting.as_ref();
    let entries = response
        .documents
        .iter()
        .filter_map(|document| build_entry(document, highlighting))
        .collect::<Vec<_>>();
    ResultGroup {
        rows_count: entries.len(),
        entries,
        type_name: FLAT_GROUP_NAME.to_string(),
        entries_count: response.num_found,
    }
}

/// A single flat group, absent when no document produced an entry.
pub fn assemble_entries(response: &EngineResponse) -> GroupedResult {
    let group = flat_group(response);
    let row_count = group.rows_count;
    let results = if group.entries.is_empty() { Vec::new() } else { vec![group] };
    GroupedResult {
        number_of_groups: results.len() as u64,
        number_of_matches: response.num_found,
        results,
        row_count,
        target_results: None,
    }
}

pub fn entries_request(query: &Query, grouped: bool) -> EngineRequest {
    if grouped {
        let mut request = base_request(query, RequestHandler::Browse);
        request.filters = facet_filters(query, false);
        request.group = Some(GroupDirective {
            field: FacetGroup::Type.field_name(),
            offset: query.start(),
            limit: query.rows(),
        });
        request.start = None;
        request.rows = None;
        request
    } else {
        let mut request = base_request(query, RequestHandler::Search);
        request.filters = facet_filters(query, false);
        request
    }
}

pub async fn search_entries(engine: &dyn SearchEngine, query: &Query, grouped: bool) -> Result<GroupedResult> {
    if !query.has_text() {
        return Err(Error::empty_query());
    }
    let response = engine.execute(&entries_request(query, grouped)).await?;
    Ok(if grouped { assemble_grouped_entries(&response) } else { assemble_entries(&response) })
}

/// Entries for `query`. When nothing matched, the terms are checked against
/// the curated targets and the outcome is reported.
pub async fn get_entries(
    engine: &dyn SearchEngine,
    reporter: &dyn OutcomeReporter,
    query: &Query,
    grouped: bool,
) -> Result<GroupedResult> {
    let mut result = search_entries(engine, query, grouped).await?;
    if result.row_count == 0 {
        let targets = search_targets(engine, query).await;
        dispatch_report(reporter, query, &targets);
        if !targets.is_empty() {
            result.target_results = Some(targets);
        }
    }
    Ok(result)
}
