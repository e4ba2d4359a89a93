//! Document collections persisted in SQLite.
//!
//! Each document is stored as a JSON body keyed by `(collection, id)`. The
//! `_id` field is not part of the stored body; it is attached when a document
//! is read back.

use std::{fmt, str::FromStr};

use chrono::Utc;
use jlearn_common::{DeleteResult, DocumentPatch, InsertResult, UpdateResult};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::db::{DbConnectOptions, DbPool, DbPoolOptions};
use crate::error::AppError;

/// A stored document: a JSON object that carries its `_id`.
pub type Document = Map<String, Value>;

pub const ID_FIELD: &str = "_id";

/// Store-assigned document identity: 12 bytes rendered as 24 lowercase hex
/// characters. The leading 4 bytes are the creation time in seconds.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn generate() -> Self {
        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&(Utc::now().timestamp() as u32).to_be_bytes());
        bytes[4..].copy_from_slice(&Uuid::new_v4().as_bytes()[..8]);
        Self(hex::encode(bytes))
    }

    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let mut bytes = [0u8; 12];
        hex::decode_to_slice(raw, &mut bytes).map_err(|_| AppError::InvalidId(raw.to_string()))?;
        Ok(Self(hex::encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collection {
    Lessons,
    Users,
    Vocabularies,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Lessons => "lessons",
            Collection::Users => "users",
            Collection::Vocabularies => "vocabularies",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(sqlx::FromRow)]
struct DocumentRow {
    id: String,
    body: String,
}

impl DocumentRow {
    fn into_document(self) -> Result<Document, AppError> {
        let mut document: Document = serde_json::from_str(&self.body)?;
        document.insert(ID_FIELD.to_string(), Value::String(self.id));
        Ok(document)
    }

    fn decode<T: DeserializeOwned>(self) -> Result<T, AppError> {
        Ok(serde_json::from_value(Value::Object(self.into_document()?))?)
    }
}

/// Overwrites `target` field by field with `patch`. `_id` is never touched.
/// Returns whether any stored value changed.
fn merge_fields(target: &mut Document, patch: &Document) -> bool {
    let mut modified = false;
    for (key, value) in patch {
        if key == ID_FIELD {
            continue;
        }
        if target.get(key) != Some(value) {
            target.insert(key.clone(), value.clone());
            modified = true;
        }
    }
    modified
}

/// Handle to every collection. Cheap to clone; all clones share one pool.
#[derive(Clone, Debug)]
pub struct DocumentStore {
    pool: DbPool,
}

impl DocumentStore {
    /// Opens the pool described by `config` and brings the schema up to date.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        let options = DbConnectOptions::from_str(&config.url)?.create_if_missing(true);
        let pool = DbPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), AppError> {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::InternalServerError(format!("Migration failed: {e}")))?;
        tracing::info!("Migrations complete.");
        Ok(())
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Every document of `collection` in insertion order.
    pub async fn find_all<T: DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> Result<Vec<T>, AppError> {
        let rows: Vec<DocumentRow> =
            sqlx::query_as("SELECT id, body FROM documents WHERE collection = ? ORDER BY seq")
                .bind(collection.as_str())
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(DocumentRow::decode).collect()
    }

    /// First document whose top-level string `field` equals `value`.
    pub async fn find_one_by_field<T: DeserializeOwned>(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Option<T>, AppError> {
        let row: Option<DocumentRow> = sqlx::query_as(
            "SELECT id, body FROM documents
             WHERE collection = ? AND json_extract(body, ?) = ?
             ORDER BY seq LIMIT 1",
        )
        .bind(collection.as_str())
        .bind(format!("$.{field}"))
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;

        row.map(DocumentRow::decode).transpose()
    }

    /// Inserts `document`, honouring a well-formed `_id` if it carries one.
    pub async fn insert_one<T: Serialize>(
        &self,
        collection: Collection,
        document: &T,
    ) -> Result<InsertResult, AppError> {
        let mut body = match serde_json::to_value(document)? {
            Value::Object(map) => map,
            _ => return Err(AppError::BadRequest("Document must be a JSON object".to_string())),
        };

        let id = match body.remove(ID_FIELD) {
            Some(Value::String(raw)) => DocumentId::parse(&raw)?,
            Some(Value::Null) | None => DocumentId::generate(),
            Some(other) => return Err(AppError::InvalidId(other.to_string())),
        };

        sqlx::query("INSERT INTO documents (collection, id, body) VALUES (?, ?, ?)")
            .bind(collection.as_str())
            .bind(id.as_str())
            .bind(serde_json::to_string(&body)?)
            .execute(&self.pool)
            .await?;

        tracing::debug!(%collection, %id, "Inserted document");

        Ok(InsertResult {
            acknowledged: true,
            inserted_id: id.to_string(),
        })
    }

    pub async fn delete_by_id(
        &self,
        collection: Collection,
        id: &DocumentId,
    ) -> Result<DeleteResult, AppError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ?")
            .bind(collection.as_str())
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        Ok(DeleteResult {
            acknowledged: true,
            deleted_count: result.rows_affected(),
        })
    }

    /// Merges `patch` into the document with `id`. On a miss, `upsert` creates
    /// the document under that id from the patch fields; otherwise nothing
    /// happens and zero matches are reported.
    pub async fn update_by_id(
        &self,
        collection: Collection,
        id: &DocumentId,
        patch: &DocumentPatch,
        upsert: bool,
    ) -> Result<UpdateResult, AppError> {
        // Take the write lock up front; a deferred transaction that reads first
        // fails with SQLITE_BUSY when another connection upgrades before it.
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let existing: Option<(String,)> =
            sqlx::query_as("SELECT body FROM documents WHERE collection = ? AND id = ?")
                .bind(collection.as_str())
                .bind(id.as_str())
                .fetch_optional(&mut *tx)
                .await?;

        let result = match existing {
            Some((body,)) => {
                let mut current: Document = serde_json::from_str(&body)?;
                let modified = merge_fields(&mut current, &patch.0);
                if modified {
                    sqlx::query("UPDATE documents SET body = ? WHERE collection = ? AND id = ?")
                        .bind(serde_json::to_string(&current)?)
                        .bind(collection.as_str())
                        .bind(id.as_str())
                        .execute(&mut *tx)
                        .await?;
                }
                UpdateResult {
                    acknowledged: true,
                    matched_count: 1,
                    modified_count: u64::from(modified),
                    upserted_count: 0,
                    upserted_id: None,
                }
            }
            None if upsert => {
                let mut created = Document::new();
                merge_fields(&mut created, &patch.0);
                sqlx::query("INSERT INTO documents (collection, id, body) VALUES (?, ?, ?)")
                    .bind(collection.as_str())
                    .bind(id.as_str())
                    .bind(serde_json::to_string(&created)?)
                    .execute(&mut *tx)
                    .await?;
                UpdateResult {
                    acknowledged: true,
                    matched_count: 0,
                    modified_count: 0,
                    upserted_count: 1,
                    upserted_id: Some(id.to_string()),
                }
            }
            None => UpdateResult {
                acknowledged: true,
                matched_count: 0,
                modified_count: 0,
                upserted_count: 0,
                upserted_id: None,
            },
        };

        tx.commit().await?;
        Ok(result)
    }
}
