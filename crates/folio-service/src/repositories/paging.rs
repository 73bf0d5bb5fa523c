use super::traits::{DocumentCursor, DocumentQuery, DocumentStore};
use crate::errors::StoreError;
use crate::models::Document;
use crate::pagination::{Page, clamp_page, page_offset, total_pages};
use tracing::debug;

/// Walks a collection to `page` using cursors.
///
/// The full collection is counted first so the page can be clamped. The
/// cursor is found by replaying every document that precedes the page, which
/// costs `O(page * limit)` reads.
pub async fn paginate_documents(
    store: &dyn DocumentStore,
    collection: &str,
    page: u32,
    limit: u32,
) -> Result<Page<Document>, StoreError> {
    let limit = limit.max(1);
    let total_items = store.count(collection).await?;
    let page = clamp_page(page, total_pages(total_items, limit));

    let skip = page_offset(page, limit);
    let start_after = if skip == 0 {
        None
    } else {
        let preceding = store
            .query(
                collection,
                &DocumentQuery {
                    start_after: None,
                    limit: u32::try_from(skip).unwrap_or(u32::MAX),
                },
            )
            .await?;
        preceding.last().map(DocumentCursor::from)
    };

    debug!(collection, page, limit, total_items, cursor = ?start_after, "Querying page");

    let items = store
        .query(collection, &DocumentQuery { start_after, limit })
        .await?;

    Ok(Page::new(items, page, limit, total_items))
}
