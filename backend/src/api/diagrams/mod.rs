//! Diagram and fireworks views: per-diagram hits, occurrences and flagging.

mod diagram_results;
pub use diagram_results::{get_diagram_search_summary, get_diagrams, get_fireworks};

mod diagram_occurrences;
pub use diagram_occurrences::{fireworks_flagging, get_diagram_flagging, get_diagram_occurrences};

use common::search_query::Query;

use crate::error::{Error, Result};

/// The diagram a query is scoped to, carried as its filter query.
fn required_diagram(query: &Query) -> Result<&str> {
    match query.filter_query() {
        Some(diagram) if !diagram.trim().is_empty() => Ok(diagram.trim()),
        _ => Err(Error::InvalidQuery { message: "a diagram identifier is required.".to_string() }),
    }
}
