use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::get,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use crate::AppState;
use crate::errors::ApiError;
use crate::models::Document;
use crate::pagination::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use crate::repositories::{DocumentStore, paginate_documents};
use crate::resources::COLLECTIONS;

#[derive(Debug, Deserialize)]
struct ListDocumentsQuery {
    page: Option<u32>,
    limit: Option<u32>,
}

fn ensure_known(collection: &str) -> Result<(), ApiError> {
    if COLLECTIONS.contains(&collection) {
        Ok(())
    } else {
        debug!(collection, "Unknown collection");
        Err(ApiError::NotFound)
    }
}

/// `{ <collection>: [...], totalPages, currentPage, totalItems }`
#[instrument(skip_all, fields(collection = %collection, page = query.page, limit = query.limit))]
async fn list_documents<S: AppState>(
    State(state): State<S>,
    Path(collection): Path<String>,
    Query(query): Query<ListDocumentsQuery>,
) -> Result<ResponseJson<Value>, ApiError> {
    ensure_known(&collection)?;

    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);
    if limit == 0 {
        return Err(ApiError::BadRequest(
            "Limit must be greater than 0".to_string(),
        ));
    }
    let page = query.page.unwrap_or(DEFAULT_PAGE).max(1);

    let result = paginate_documents(state.document_store(), &collection, page, limit).await?;

    info!(
        returned_count = result.items.len(),
        total = result.total_items,
        current_page = result.current_page,
        "Successfully retrieved document page"
    );

    let items = result.items.into_iter().map(Document::into_raw).collect();

    let mut body = Map::new();
    body.insert(collection, Value::Array(items));
    body.insert("totalPages".to_string(), result.total_pages.into());
    body.insert("currentPage".to_string(), result.current_page.into());
    body.insert("totalItems".to_string(), result.total_items.into());

    Ok(ResponseJson(Value::Object(body)))
}

#[instrument(skip_all, fields(collection = %collection, id = %id))]
async fn get_document<S: AppState>(
    State(state): State<S>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<ResponseJson<Value>, ApiError> {
    ensure_known(&collection)?;

    match state.document_store().get(&collection, &id).await? {
        Some(doc) => {
            info!("Successfully retrieved document");
            Ok(ResponseJson(doc.into_raw()))
        }
        None => {
            debug!("Document not found");
            Err(ApiError::NotFound)
        }
    }
}

pub fn create_api_v1_router<S: AppState>() -> Router<S> {
    Router::new()
        .route("/{collection}", get(list_documents::<S>))
        .route("/{collection}/{id}", get(get_document::<S>))
}
