use std::fmt;
use std::sync::Arc;

use tracing::info;

use crate::config::{SiteConfig, SourceKind};
use crate::errors::ServiceError;
use crate::fetch::RestClient;
use crate::repositories::{DocumentStore, SqliteDocumentStore};

/// The live source behind every service built from it. Cloning shares the
/// underlying store connection and HTTP client.
#[derive(Clone)]
pub enum Backend {
    Mock,
    DocumentStore(Arc<dyn DocumentStore>),
    Rest(RestClient),
}

impl Backend {
    /// Builds the backend selected by `config`, opening the store or the HTTP
    /// client as needed.
    pub fn connect(config: &SiteConfig) -> Result<Self, ServiceError> {
        let backend = match config.source {
            SourceKind::Mock => Backend::Mock,
            SourceKind::DocumentStore => {
                let store = SqliteDocumentStore::connect(&config.database_url)?;
                Backend::DocumentStore(Arc::new(store))
            }
            SourceKind::Rest => {
                Backend::Rest(RestClient::new(&config.api_base_url, config.request_timeout)?)
            }
        };

        info!(source = %backend.kind(), "Content backend ready");
        Ok(backend)
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            Backend::Mock => SourceKind::Mock,
            Backend::DocumentStore(_) => SourceKind::DocumentStore,
            Backend::Rest(_) => SourceKind::Rest,
        }
    }
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Mock => f.write_str("Mock"),
            Backend::DocumentStore(_) => f.write_str("DocumentStore"),
            Backend::Rest(client) => f.debug_tuple("Rest").field(&client.base_url()).finish(),
        }
    }
}
