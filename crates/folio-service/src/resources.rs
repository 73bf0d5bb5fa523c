//! The site's resources, wired to their routes, collections and fixtures.

use chrono::NaiveDateTime;

use crate::backend::Backend;
use crate::config::FallbackPolicy;
use crate::errors::{ConfigError, StoreError};
use crate::fixtures;
use crate::repositories::SqliteDocumentStore;
use crate::service::{PaginatedService, ResourceConfig, create_paginated_service};
use crate::validation::{BlogPostSchema, ProjectSchema};

pub const POSTS: &str = "posts";
pub const PROJECTS: &str = "projects";

/// Collections the content API serves.
pub const COLLECTIONS: [&str; 2] = [POSTS, PROJECTS];

pub type BlogService = PaginatedService<BlogPostSchema>;
pub type ProjectService = PaginatedService<ProjectSchema>;

pub fn blog_posts(backend: Backend, policy: FallbackPolicy) -> Result<BlogService, ConfigError> {
    create_paginated_service(
        ResourceConfig {
            route: format!("/{POSTS}"),
            collection: POSTS.to_string(),
            items_key: POSTS.to_string(),
            mock: fixtures::blog_posts(),
            schema: BlogPostSchema,
        },
        backend,
        policy,
    )
}

pub fn projects(backend: Backend, policy: FallbackPolicy) -> Result<ProjectService, ConfigError> {
    create_paginated_service(
        ResourceConfig {
            route: format!("/{PROJECTS}"),
            collection: PROJECTS.to_string(),
            items_key: PROJECTS.to_string(),
            mock: fixtures::projects(),
            schema: ProjectSchema,
        },
        backend,
        policy,
    )
}

/// Writes every fixture into `store`, newest record at `newest`.
pub fn seed_fixtures(
    store: &SqliteDocumentStore,
    newest: NaiveDateTime,
) -> Result<usize, StoreError> {
    let posts = store.seed_collection(POSTS, &fixtures::blog_posts(), newest)?;
    let projects = store.seed_collection(PROJECTS, &fixtures::projects(), newest)?;
    Ok(posts + projects)
}
