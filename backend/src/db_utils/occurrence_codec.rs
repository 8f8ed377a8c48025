//! Packed occurrence records stored on entity documents.
//!
//! A record reads `diagram:inDiagram:occurrences:interactsWith`, where the
//! two sets are comma-separated identifiers and `#` stands for "no set".
//! An empty field is an empty set, which is not the same thing.

use std::collections::BTreeSet;

use common::{diagram_result::DiagramOccurrencesResult, search_const::OCCURRENCE_EMPTY_SENTINEL};

use crate::error::{Error, Result};

const FIELD_SEPARATOR: char = ':';
const SET_SEPARATOR: char = ',';

/// Whether `record` belongs to `diagram`.
pub fn is_record_of(record: &str, diagram: &str) -> bool {
    record.starts_with(diagram)
}

pub fn decode(record: &str) -> Result<DiagramOccurrencesResult> {
    let fields = split_record(record)?;
    Ok(DiagramOccurrencesResult {
        diagram_entity: Some(fields[0].to_string()),
        in_diagram: fields[1].eq_ignore_ascii_case("true"),
        occurrences: decode_set(fields[2]),
        interacts_with: decode_set(fields[3]),
    })
}

/// Decodes a record for diagram flagging, where the entity to flag is the
/// document itself and only when it is drawn in the diagram.
pub fn decode_for_flagging(record: &str, st_id: Option<&str>) -> Result<DiagramOccurrencesResult> {
    let mut result = decode(record)?;
    result.diagram_entity = match (result.in_diagram, st_id) {
        (true, Some(st_id)) => Some(st_id.to_string()),
        _ => None,
    };
    result.in_diagram = result.diagram_entity.is_some();
    Ok(result)
}

pub fn encode(result: &DiagramOccurrencesResult) -> Result<String> {
    let diagram = result.diagram_entity.as_deref().unwrap_or_default();
    check_identifier(diagram, diagram)?;
    let in_diagram = if result.in_diagram { "true" } else { "false" };
    Ok(format!(
        "{diagram}{FIELD_SEPARATOR}{in_diagram}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{}",
        encode_set(diagram, result.occurrences.as_ref())?,
        encode_set(diagram, result.interacts_with.as_ref())?,
    ))
}

fn split_record(record: &str) -> Result<Vec<&str>> {
    let fields = record.split(FIELD_SEPARATOR).collect::<Vec<_>>();
    if fields.len() != 4 {
        return Err(Error::MalformedOccurrenceRecord {
            record: record.to_string(),
            message: format!("expected 4 fields, found {}", fields.len()),
        });
    }
    Ok(fields)
}

fn decode_set(field: &str) -> Option<BTreeSet<String>> {
    if field == OCCURRENCE_EMPTY_SENTINEL {
        return None;
    }
    Some(field.split(SET_SEPARATOR).filter(|id| !id.is_empty()).map(str::to_string).collect())
}

fn encode_set(diagram: &str, set: Option<&BTreeSet<String>>) -> Result<String> {
    let Some(set) = set else {
        return Ok(OCCURRENCE_EMPTY_SENTINEL.to_string());
    };
    for id in set {
        check_identifier(diagram, id)?;
    }
    Ok(set.iter().map(String::as_str).collect::<Vec<_>>().join(","))
}

fn check_identifier(diagram: &str, id: &str) -> Result<()> {
    if id.is_empty() || id == OCCURRENCE_EMPTY_SENTINEL || id.contains([FIELD_SEPARATOR, SET_SEPARATOR]) {
        return Err(Error::MalformedOccurrenceRecord {
            record: diagram.to_string(),
            message: format!("identifier {id:?} cannot be encoded"),
        });
    }
    Ok(())
}
