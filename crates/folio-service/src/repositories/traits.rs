use crate::errors::StoreError;
use crate::models::Document;
use async_trait::async_trait;
use chrono::NaiveDateTime;

/// Position just after a document in `created_at` descending order.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentCursor {
    pub created_at: NaiveDateTime,
    pub id: String,
}

impl From<&Document> for DocumentCursor {
    fn from(doc: &Document) -> Self {
        Self {
            created_at: doc.created_at,
            id: doc.id.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DocumentQuery {
    pub start_after: Option<DocumentCursor>,
    pub limit: u32,
}

/// A collection-per-resource document store.
///
/// `query` always orders newest first, breaking ties by id descending.
/// The store has no offset support; callers page with cursors.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    async fn count(&self, collection: &str) -> Result<u64, StoreError>;
    async fn query(
        &self,
        collection: &str,
        query: &DocumentQuery,
    ) -> Result<Vec<Document>, StoreError>;
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;
}
