//! Autocomplete and spellcheck suggestions that lead somewhere.

use tracing::debug;

use crate::{
    db_utils::search_engine::{EngineRequest, RequestHandler, SearchEngine},
    error::Result,
};

pub async fn autocomplete(engine: &dyn SearchEngine, text: &str) -> Result<Vec<String>> {
    suggestions(engine, RequestHandler::Suggest, text).await
}

pub async fn spellcheck(engine: &dyn SearchEngine, text: &str) -> Result<Vec<String>> {
    suggestions(engine, RequestHandler::Spellcheck, text).await
}

/// Collations for `text`, keeping only those the index has hits for.
async fn suggestions(engine: &dyn SearchEngine, handler: RequestHandler, text: &str) -> Result<Vec<String>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let response = engine.execute(&EngineRequest::new(handler, text)).await?;

    let mut suggestions = Vec::new();
    for collation in response.collations {
        if suggestions.contains(&collation) {
            continue;
        }
        let mut exists = EngineRequest::new(RequestHandler::Exists, collation.as_str());
        exists.rows = Some(0);
        if engine.execute(&exists).await?.num_found > 0 {
            suggestions.push(collation);
        } else {
            debug!(%collation, "Dropping suggestion without hits");
        }
    }
    Ok(suggestions)
}
