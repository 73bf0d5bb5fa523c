use std::collections::HashSet;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use crate::backend::Backend;
use crate::config::FallbackPolicy;
use crate::errors::{ConfigError, ServiceError};
use crate::fetch::RestClient;
use crate::models::ContentRecord;
use crate::pagination::{Page, slice_page};
use crate::repositories::{DocumentStore, paginate_documents};
use crate::validation::Schema;

/// Everything a service needs to know about one resource.
pub struct ResourceConfig<S: Schema> {
    /// REST path appended to the API base, e.g. `/posts`
    pub route: String,
    /// Document store collection
    pub collection: String,
    /// Key of the items array in REST list responses
    pub items_key: String,
    /// Fallback records, already in display order
    pub mock: Vec<S::Record>,
    pub schema: S,
}

impl<S: Schema> ResourceConfig<S> {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.route.trim().is_empty() {
            return Err(ConfigError::EmptyField("route"));
        }
        if !self.route.starts_with('/') || self.route.contains('?') {
            return Err(ConfigError::InvalidRoute(self.route.clone()));
        }
        if self.collection.trim().is_empty() {
            return Err(ConfigError::EmptyField("collection"));
        }
        if self.items_key.trim().is_empty() {
            return Err(ConfigError::EmptyField("items_key"));
        }

        let mut seen = HashSet::new();
        for record in &self.mock {
            if !seen.insert(record.id()) {
                return Err(ConfigError::DuplicateMockId(record.id().to_string()));
            }
        }
        Ok(())
    }
}

/// `{ <items_key>: [...], totalPages, currentPage, totalItems }`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListEnvelope {
    total_pages: u32,
    current_page: u32,
    total_items: u64,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

/// `list`/`by_id` over one resource, answered by whichever backend it was
/// built with.
pub struct PaginatedService<S: Schema> {
    resource: Arc<ResourceConfig<S>>,
    backend: Backend,
    policy: FallbackPolicy,
}

impl<S: Schema> Clone for PaginatedService<S> {
    fn clone(&self) -> Self {
        Self {
            resource: Arc::clone(&self.resource),
            backend: self.backend.clone(),
            policy: self.policy,
        }
    }
}

pub fn create_paginated_service<S: Schema>(
    resource: ResourceConfig<S>,
    backend: Backend,
    policy: FallbackPolicy,
) -> Result<PaginatedService<S>, ConfigError> {
    resource.validate()?;
    Ok(PaginatedService {
        resource: Arc::new(resource),
        backend,
        policy,
    })
}

impl<S: Schema> PaginatedService<S> {
    /// One page of records, newest first. `page` and `limit` below 1 are
    /// raised to 1 and `page` past the end is clamped to the last page.
    ///
    /// Never fails under [`FallbackPolicy::Degrade`]: backend errors are
    /// answered with the same page of mock data.
    #[instrument(skip(self), fields(collection = %self.resource.collection, source = %self.backend.kind()))]
    pub async fn list(&self, page: u32, limit: u32) -> Result<Page<S::Record>, ServiceError> {
        let page = page.max(1);
        let limit = limit.max(1);

        let result = match &self.backend {
            Backend::Mock => return Ok(self.mock_page(page, limit)),
            Backend::DocumentStore(store) => self.list_from_store(store.as_ref(), page, limit).await,
            Backend::Rest(client) => self.list_from_rest(client, page, limit).await,
        };

        match (result, self.policy) {
            (Ok(found), _) => {
                debug!(
                    returned = found.items.len(),
                    current_page = found.current_page,
                    total_items = found.total_items,
                    "Listed records"
                );
                Ok(found)
            }
            (Err(err), FallbackPolicy::FailFast) => Err(err),
            (Err(err), FallbackPolicy::Degrade) => {
                warn!(error = %err, "Backend list failed, serving mock page");
                Ok(self.mock_page(page, limit))
            }
        }
    }

    /// The record with `id`.
    ///
    /// Under [`FallbackPolicy::Degrade`] any failure, including not-found,
    /// is answered from mock data; an id missing from the mock too gets a
    /// copy of the first mock record carrying the requested id. Only an
    /// empty mock lets the error through.
    #[instrument(skip(self), fields(collection = %self.resource.collection, source = %self.backend.kind()))]
    pub async fn by_id(&self, id: &str) -> Result<S::Record, ServiceError> {
        if id.trim().is_empty() {
            return Err(ServiceError::InvalidInput("id cannot be empty".to_string()));
        }

        let result = match &self.backend {
            Backend::Mock => self.mock_by_id(id),
            Backend::DocumentStore(store) => self.by_id_from_store(store.as_ref(), id).await,
            Backend::Rest(client) => self.by_id_from_rest(client, id).await,
        };

        match (result, self.policy) {
            (Ok(record), _) => Ok(record),
            (Err(err), FallbackPolicy::FailFast) => Err(err),
            (Err(err), FallbackPolicy::Degrade) => self.substitute(id, err),
        }
    }

    fn mock_page(&self, page: u32, limit: u32) -> Page<S::Record> {
        slice_page(&self.resource.mock, page, limit)
    }

    fn mock_by_id(&self, id: &str) -> Result<S::Record, ServiceError> {
        self.resource
            .mock
            .iter()
            .find(|record| record.id() == id)
            .cloned()
            .ok_or_else(|| self.not_found(id))
    }

    fn substitute(&self, id: &str, err: ServiceError) -> Result<S::Record, ServiceError> {
        if let Ok(record) = self.mock_by_id(id) {
            warn!(id, error = %err, "Backend lookup failed, serving mock record");
            return Ok(record);
        }

        let Some(template) = self.resource.mock.first() else {
            warn!(id, error = %err, "Backend lookup failed and no mock data to fall back on");
            return Err(err);
        };

        warn!(
            id,
            template_id = template.id(),
            error = %err,
            "No record with this id anywhere, fabricating one from the first mock record"
        );
        Ok(template.clone().with_id(id.to_string()))
    }

    async fn list_from_store(
        &self,
        store: &dyn DocumentStore,
        page: u32,
        limit: u32,
    ) -> Result<Page<S::Record>, ServiceError> {
        let docs = paginate_documents(store, &self.resource.collection, page, limit).await?;

        let items = docs
            .items
            .into_iter()
            .filter_map(|doc| self.parse_lenient(doc.into_raw()))
            .collect();

        Ok(Page::new(items, docs.current_page, limit, docs.total_items))
    }

    async fn by_id_from_store(
        &self,
        store: &dyn DocumentStore,
        id: &str,
    ) -> Result<S::Record, ServiceError> {
        let doc = store
            .get(&self.resource.collection, id)
            .await?
            .ok_or_else(|| self.not_found(id))?;

        self.parse_single(doc.into_raw())
    }

    async fn list_from_rest(
        &self,
        client: &RestClient,
        page: u32,
        limit: u32,
    ) -> Result<Page<S::Record>, ServiceError> {
        let endpoint = client.endpoint(&self.resource.route, None)?;
        let query = [("page", page.to_string()), ("limit", limit.to_string())];
        let mut envelope: ListEnvelope = client.get_json(endpoint, &query).await?;

        let raw_items = envelope
            .rest
            .remove(&self.resource.items_key)
            .ok_or_else(|| ServiceError::MissingField(self.resource.items_key.clone()))?;
        let raw_items: Vec<Value> =
            serde_json::from_value(raw_items).map_err(|source| ServiceError::Decode {
                context: format!("`{}` array", self.resource.items_key),
                source,
            })?;

        if raw_items.len() > limit as usize {
            debug!(
                returned = raw_items.len(),
                limit, "Server returned more records than requested, truncating"
            );
        }
        let items = raw_items
            .into_iter()
            .take(limit as usize)
            .filter_map(|raw| self.parse_lenient(raw))
            .collect();

        let normalized = Page::new(items, page, limit, envelope.total_items);
        if normalized.total_pages != envelope.total_pages
            || normalized.current_page != envelope.current_page
        {
            debug!(
                reported_total_pages = envelope.total_pages,
                reported_current_page = envelope.current_page,
                total_pages = normalized.total_pages,
                current_page = normalized.current_page,
                "Normalized inconsistent page metadata"
            );
        }

        Ok(normalized)
    }

    async fn by_id_from_rest(&self, client: &RestClient, id: &str) -> Result<S::Record, ServiceError> {
        let endpoint = client.endpoint(&self.resource.route, Some(id))?;
        let raw: Value = client.get_json(endpoint, &[]).await.map_err(|err| {
            if err.is_not_found() {
                self.not_found(id)
            } else {
                err
            }
        })?;

        self.parse_single(raw)
    }

    /// Records that decode but fail semantic checks are kept; records that
    /// do not decode at all are dropped.
    fn parse_lenient(&self, raw: Value) -> Option<S::Record> {
        let schema = &self.resource.schema;
        match schema.decode(raw) {
            Ok(record) => {
                if let Err(err) = schema.check(&record) {
                    warn!(id = record.id(), error = %err, "Keeping record that failed validation");
                }
                Some(record)
            }
            Err(err) => {
                warn!(error = %err, "Dropping record that could not be decoded");
                None
            }
        }
    }

    /// Same rules as [`Self::parse_lenient`], but an undecodable record is an
    /// error rather than a gap in a page.
    fn parse_single(&self, raw: Value) -> Result<S::Record, ServiceError> {
        let schema = &self.resource.schema;
        let record = schema.decode(raw)?;
        if let Err(err) = schema.check(&record) {
            warn!(id = record.id(), error = %err, "Keeping record that failed validation");
        }
        Ok(record)
    }

    fn not_found(&self, id: &str) -> ServiceError {
        ServiceError::NotFound(format!("{}/{id}", self.resource.collection))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::validation::BlogPostSchema;

    fn blog_config(mock: Vec<crate::models::BlogPost>) -> ResourceConfig<BlogPostSchema> {
        ResourceConfig {
            route: "/posts".to_string(),
            collection: "posts".to_string(),
            items_key: "posts".to_string(),
            mock,
            schema: BlogPostSchema,
        }
    }

    #[test]
    fn test_route_must_be_absolute_path() {
        let mut config = blog_config(fixtures::blog_posts());
        config.route = "posts".to_string();
        assert!(matches!(
            create_paginated_service(config, Backend::Mock, FallbackPolicy::Degrade),
            Err(ConfigError::InvalidRoute(_))
        ));
    }

    #[test]
    fn test_empty_collection_is_rejected() {
        let mut config = blog_config(fixtures::blog_posts());
        config.collection = " ".to_string();
        assert!(matches!(
            create_paginated_service(config, Backend::Mock, FallbackPolicy::Degrade),
            Err(ConfigError::EmptyField("collection"))
        ));
    }

    #[test]
    fn test_duplicate_mock_ids_are_rejected() {
        let mut posts = fixtures::blog_posts();
        posts.push(posts[0].clone());
        let duplicate = posts[0].id.clone();
        assert!(matches!(
            create_paginated_service(blog_config(posts), Backend::Mock, FallbackPolicy::Degrade),
            Err(ConfigError::DuplicateMockId(id)) if id == duplicate
        ));
    }

    #[tokio::test]
    async fn test_mock_list_and_lookup() {
        let posts = fixtures::blog_posts();
        let service =
            create_paginated_service(blog_config(posts.clone()), Backend::Mock, FallbackPolicy::FailFast)
                .unwrap();

        let page = service.list(1, 2).await.unwrap();
        assert_eq!(page.items, posts[..2].to_vec());

        let found = service.by_id(&posts[1].id).await.unwrap();
        assert_eq!(found, posts[1]);
    }

    #[tokio::test]
    async fn test_blank_id_is_rejected_even_when_degrading() {
        let service = create_paginated_service(
            blog_config(fixtures::blog_posts()),
            Backend::Mock,
            FallbackPolicy::Degrade,
        )
        .unwrap();

        assert!(matches!(
            service.by_id("  ").await,
            Err(ServiceError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_id_with_empty_mock_is_not_found() {
        let service =
            create_paginated_service(blog_config(vec![]), Backend::Mock, FallbackPolicy::Degrade)
                .unwrap();

        assert!(matches!(
            service.by_id("anything").await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
