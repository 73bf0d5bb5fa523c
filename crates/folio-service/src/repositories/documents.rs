use super::traits::{DocumentQuery, DocumentStore};
use crate::errors::StoreError;
use crate::models::{ContentRecord, Document, DocumentRow, NewDocumentRow};
use crate::schema::documents;
use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

#[derive(Clone)]
pub struct SqliteDocumentStore {
    db: Arc<Mutex<SqliteConnection>>,
}

impl SqliteDocumentStore {
    pub fn new(db: Arc<Mutex<SqliteConnection>>) -> Self {
        Self { db }
    }

    /// Opens `database_url` (`:memory:` works) and applies pending migrations.
    pub fn connect(database_url: &str) -> Result<Self, StoreError> {
        let mut connection = SqliteConnection::establish(database_url)?;
        connection
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| StoreError::Migration(err.to_string()))?;
        Ok(Self::new(Arc::new(Mutex::new(connection))))
    }

    fn conn(&self) -> Result<MutexGuard<'_, SqliteConnection>, StoreError> {
        self.db.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Writes a document, replacing any existing one with the same id.
    pub fn insert<R: ContentRecord>(
        &self,
        collection: &str,
        record: &R,
        created_at: NaiveDateTime,
    ) -> Result<(), StoreError> {
        let data = serde_json::to_value(record).map_err(|source| {
            StoreError::MalformedDocument {
                collection: collection.to_string(),
                id: record.id().to_string(),
                source,
            }
        })?;

        self.insert_raw(collection, record.id(), &data, created_at)
    }

    /// Writes an arbitrary JSON body under `id`. Nothing checks that it
    /// matches the collection's record shape.
    pub fn insert_raw(
        &self,
        collection: &str,
        id: &str,
        data: &Value,
        created_at: NaiveDateTime,
    ) -> Result<(), StoreError> {
        let row = NewDocumentRow {
            collection,
            id,
            created_at,
            data: data.to_string(),
        };

        let mut conn = self.conn()?;
        diesel::replace_into(documents::table)
            .values(&row)
            .execute(&mut *conn)?;
        Ok(())
    }

    /// Seeds `records` so that reading the collection back yields them in
    /// the same order: the first record is the newest.
    pub fn seed_collection<R: ContentRecord>(
        &self,
        collection: &str,
        records: &[R],
        newest: NaiveDateTime,
    ) -> Result<usize, StoreError> {
        for (position, record) in records.iter().enumerate() {
            let created_at = newest - Duration::minutes(position as i64);
            self.insert(collection, record, created_at)?;
        }

        info!(collection, count = records.len(), "Seeded collection");
        Ok(records.len())
    }
}

fn into_document(row: DocumentRow) -> Result<Document, StoreError> {
    let data = serde_json::from_str(&row.data).map_err(|source| StoreError::MalformedDocument {
        collection: row.collection,
        id: row.id.clone(),
        source,
    })?;

    Ok(Document {
        id: row.id,
        created_at: row.created_at,
        data,
    })
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn count(&self, collection: &str) -> Result<u64, StoreError> {
        let mut conn = self.conn()?;
        let total = documents::table
            .filter(documents::collection.eq(collection))
            .count()
            .get_result::<i64>(&mut *conn)?;
        Ok(u64::try_from(total).unwrap_or(0))
    }

    async fn query(
        &self,
        collection: &str,
        query: &DocumentQuery,
    ) -> Result<Vec<Document>, StoreError> {
        let mut statement = documents::table
            .filter(documents::collection.eq(collection))
            .into_boxed();

        if let Some(cursor) = &query.start_after {
            statement = statement.filter(
                documents::created_at.lt(cursor.created_at).or(documents::created_at
                    .eq(cursor.created_at)
                    .and(documents::id.lt(cursor.id.as_str()))),
            );
        }

        let rows = {
            let mut conn = self.conn()?;
            statement
                .order((documents::created_at.desc(), documents::id.desc()))
                .limit(i64::from(query.limit))
                .load::<DocumentRow>(&mut *conn)?
        };

        rows.into_iter().map(into_document).collect()
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let row = {
            let mut conn = self.conn()?;
            documents::table
                .filter(documents::collection.eq(collection))
                .filter(documents::id.eq(id))
                .first::<DocumentRow>(&mut *conn)
                .optional()?
        };

        row.map(into_document).transpose()
    }
}
