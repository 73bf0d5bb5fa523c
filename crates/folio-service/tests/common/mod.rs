#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use chrono::{NaiveDate, NaiveDateTime};
use folio_service::{
    DefaultAppState, StoreError,
    fetch::RestClient,
    models::{BlogPost, Document},
    repositories::{DocumentQuery, DocumentStore, SqliteDocumentStore},
    resources::seed_fixtures,
};
use std::{sync::Arc, time::Duration};

pub fn newest() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

pub fn empty_store() -> SqliteDocumentStore {
    SqliteDocumentStore::connect(":memory:").expect("Failed to open in-memory store")
}

pub fn seeded_store() -> SqliteDocumentStore {
    let store = empty_store();
    seed_fixtures(&store, newest()).expect("Failed to seed fixtures");
    store
}

pub fn numbered_posts(count: usize) -> Vec<BlogPost> {
    (0..count)
        .map(|n| BlogPost {
            id: format!("post-{n:02}"),
            title: format!("Post {n}"),
            excerpt: format!("Excerpt {n}"),
            content: format!("Content {n}"),
            image: None,
            category: Some(if n % 2 == 0 { "even" } else { "odd" }.to_string()),
            date: None,
            author: Some("Test Author".to_string()),
            tags: vec![],
        })
        .collect()
}

/// A store whose every call fails, like an unreachable remote database.
pub struct UnavailableStore;

#[async_trait]
impl DocumentStore for UnavailableStore {
    async fn count(&self, _collection: &str) -> Result<u64, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn query(
        &self,
        _collection: &str,
        _query: &DocumentQuery,
    ) -> Result<Vec<Document>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn get(&self, _collection: &str, _id: &str) -> Result<Option<Document>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

pub mod server_utils {
    use super::*;
    use axum_test::TestServer;
    use folio_service::routes;

    pub fn create_test_server() -> TestServer {
        let state = DefaultAppState::new(Arc::new(seeded_store()));
        let app = routes::create_router().with_state(state);
        TestServer::new(app).unwrap()
    }

    /// Serves `app` on an ephemeral port and returns its API base URL.
    pub async fn spawn_server(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server failed");
        });

        format!("http://{addr}/api/v1")
    }

    /// The real content API over a seeded store.
    pub async fn spawn_content_api() -> String {
        let state = DefaultAppState::new(Arc::new(seeded_store()));
        spawn_server(folio_service::create_app(state)).await
    }

    /// An address nothing is listening on.
    pub async fn unreachable_base_url() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");
        drop(listener);
        format!("http://{addr}/api/v1")
    }

    pub fn rest_client(base_url: &str) -> RestClient {
        RestClient::new(base_url, Duration::from_secs(5)).expect("Invalid test base URL")
    }
}
