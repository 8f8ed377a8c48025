//! Lookups of single entities and the pathways they belong to.

use std::sync::Arc;

use common::search_result::Entry;
use futures::future::BoxFuture;

use crate::{
    api::search::build_entry,
    db_utils::{
        index_fields::{DB_ID, OCCURRENCES, OCCURRENCES_WITH_INTERACTOR, PHYSICAL_ENTITIES_DB_ID, ST_ID},
        occurrence_codec::decode,
        search_engine::{Document, EngineRequest, RequestHandler, SearchEngine},
        solr_utils::any_of_clause,
    },
    error::Result,
};

/// Fetches entries by identifier. `fields` limits the stored fields read;
/// an empty slice reads them all.
pub trait EntityStore: Send + Sync {
    fn fetch_by_db_id<'a>(&'a self, db_id: u64, fields: &'a [String]) -> BoxFuture<'a, Result<Option<Entry>>>;

    fn fetch_many_by_st_ids<'a>(&'a self, st_ids: &'a [String], fields: &'a [String]) -> BoxFuture<'a, Result<Vec<Entry>>>;

    fn fetch_many_by_db_ids<'a>(&'a self, db_ids: &'a [u64], fields: &'a [String]) -> BoxFuture<'a, Result<Vec<Entry>>>;
}

/// An [`EntityStore`] reading straight from the search index.
#[derive(Clone)]
pub struct IndexEntityStore {
    engine: Arc<dyn SearchEngine>,
}

impl IndexEntityStore {
    pub fn new(engine: Arc<dyn SearchEngine>) -> Self {
        Self { engine }
    }

    async fn retrieve<S: AsRef<str>>(&self, field: &str, ids: &[S], fields: &[String]) -> Result<Vec<Document>> {
        let Some(query) = any_of_clause(field, ids) else {
            return Ok(Vec::new());
        };
        let mut request = EngineRequest::new(RequestHandler::Select, query);
        request.rows = Some(u32::try_from(ids.len()).unwrap_or(u32::MAX));
        request.fields = fields.to_vec();
        Ok(self.engine.execute(&request).await?.documents)
    }

    async fn retrieve_entries<S: AsRef<str>>(&self, field: &str, ids: &[S], fields: &[String]) -> Result<Vec<Entry>> {
        let documents = self.retrieve(field, ids, fields).await?;
        Ok(documents.iter().filter_map(|document| build_entry(document, None)).collect())
    }

    /// Pathways whose diagrams hold the entity, read from its occurrence
    /// records. `directly_in_diagram` skips pathways where the entity only
    /// appears inside a sub-pathway.
    pub async fn containing_pathways_of(
        &self,
        db_id: u64,
        include_interactors: bool,
        directly_in_diagram: bool,
        fields: &[String],
    ) -> Result<Vec<Entry>> {
        let field = if include_interactors { OCCURRENCES_WITH_INTERACTOR } else { OCCURRENCES };
        let documents = self.retrieve(DB_ID, &[db_id.to_string()], &[field.to_string()]).await?;
        let Some(document) = documents.first() else {
            return Ok(Vec::new());
        };

        let mut pathways = Vec::new();
        for record in document.strings(field) {
            let occurrence = decode(&record)?;
            if directly_in_diagram && !occurrence.in_diagram {
                continue;
            }
            pathways.extend(occurrence.diagram_entity);
        }
        self.retrieve_entries(ST_ID, &pathways, fields).await
    }

    /// Physical entities sharing the reference entity `st_id`.
    pub async fn physical_entities_of_reference(&self, st_id: &str, fields: &[String]) -> Result<Vec<Entry>> {
        let documents = self.retrieve(ST_ID, &[st_id], &[PHYSICAL_ENTITIES_DB_ID.to_string()]).await?;
        let Some(document) = documents.first() else {
            return Ok(Vec::new());
        };
        let db_ids = document.strings(PHYSICAL_ENTITIES_DB_ID);

        // Only identifiers asked for: no second lookup needed.
        if matches!(fields, [only] if only == DB_ID) {
            return Ok(db_ids
                .into_iter()
                .map(|db_id| Entry { db_id: Some(db_id.clone()), id: Some(db_id), ..Default::default() })
                .collect());
        }
        self.retrieve_entries(DB_ID, &db_ids, fields).await
    }
}

impl EntityStore for IndexEntityStore {
    fn fetch_by_db_id<'a>(&'a self, db_id: u64, fields: &'a [String]) -> BoxFuture<'a, Result<Option<Entry>>> {
        Box::pin(async move {
            let entries = self.retrieve_entries(DB_ID, &[db_id.to_string()], fields).await?;
            Ok(entries.into_iter().next())
        })
    }

    fn fetch_many_by_st_ids<'a>(&'a self, st_ids: &'a [String], fields: &'a [String]) -> BoxFuture<'a, Result<Vec<Entry>>> {
        Box::pin(self.retrieve_entries(ST_ID, st_ids, fields))
    }

    fn fetch_many_by_db_ids<'a>(&'a self, db_ids: &'a [u64], fields: &'a [String]) -> BoxFuture<'a, Result<Vec<Entry>>> {
        Box::pin(async move {
            let db_ids = db_ids.iter().map(u64::to_string).collect::<Vec<_>>();
            self.retrieve_entries(DB_ID, &db_ids, fields).await
        })
    }
}
