use axum::Router;
use std::sync::Arc;

pub mod backend;
pub mod config;
pub mod errors;
pub mod fetch;
pub mod fixtures;
pub mod models;
pub mod pagination;
pub mod repositories;
pub mod resources;
pub mod routes;
pub mod schema;
pub mod service;
pub mod validation;

pub use backend::Backend;
pub use config::{FallbackPolicy, SiteConfig, SourceKind};
pub use errors::{ServiceError, StoreError};
pub use pagination::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, Page};
pub use service::{PaginatedService, ResourceConfig, create_paginated_service};

use repositories::DocumentStore;

/// State shared by the content API handlers.
pub trait AppState: Clone + Send + Sync + 'static {
    fn document_store(&self) -> &dyn DocumentStore;
}

#[derive(Clone)]
pub struct DefaultAppState {
    store: Arc<dyn DocumentStore>,
}

impl DefaultAppState {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

impl AppState for DefaultAppState {
    fn document_store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }
}

pub fn create_app(state: DefaultAppState) -> Router {
    routes::create_router().with_state(state)
}
