//! libSQL-backed record store, optionally an embedded replica of a Turso database.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::Mutex;

use super::document::{document_id, merge_document, Document};
use super::RecordStore;
use crate::db::{Database, SyncConfig};
use crate::error::{Error, Result};

/// Thread-safe record store over a single libSQL connection.
#[derive(Clone)]
pub struct LibSqlStore {
    db: Arc<Mutex<Database>>,
    db_path: Option<PathBuf>,
}

impl LibSqlStore {
    /// Open the store at `db_path`, as a replica when `sync_config` is given.
    pub async fn open_path(
        db_path: impl Into<PathBuf>,
        sync_config: Option<SyncConfig>,
    ) -> Result<Self> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = match sync_config {
            Some(config) => {
                tracing::info!(
                    "Record store syncing with {}",
                    config.url.as_deref().unwrap_or("unknown")
                );
                open_replica_on_large_stack(db_path.clone(), config)?
            }
            None => {
                tracing::debug!("Record store running local-only at {}", db_path.display());
                Database::open(&db_path).await?
            }
        };

        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            db_path: Some(db_path),
        })
    }

    /// Open an in-memory store (primarily for tests).
    pub async fn open_in_memory() -> Result<Self> {
        let db = Database::open_in_memory().await?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            db_path: None,
        })
    }

    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    pub async fn is_sync_enabled(&self) -> bool {
        self.db.lock().await.is_sync_enabled()
    }

    /// Pull remote changes into the local replica.
    pub async fn sync(&self) -> Result<()> {
        self.db.lock().await.sync().await
    }

    async fn fetch(db: &Database, collection: &str, id: &str) -> Result<Option<Document>> {
        let mut rows = db
            .connection()
            .query(
                "SELECT data FROM records WHERE collection = ?1 AND id = ?2",
                libsql::params![collection, id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(parse_data(&row.get::<String>(0)?)?)),
            None => Ok(None),
        }
    }
}

/// Replica bootstrap overflows the default worker stack, so it runs on its own thread.
fn open_replica_on_large_stack(db_path: PathBuf, config: SyncConfig) -> Result<Database> {
    std::thread::Builder::new()
        .stack_size(8 * 1024 * 1024)
        .spawn(move || {
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .map_err(|error| Error::Database(error.to_string()))?
                .block_on(Database::open_with_sync(&db_path, config))
        })
        .map_err(|error| Error::Database(error.to_string()))?
        .join()
        .map_err(|_| Error::Database("replica open thread panicked".to_string()))?
}

fn parse_data(raw: &str) -> Result<Document> {
    match serde_json::from_str(raw)? {
        Value::Object(document) => Ok(document),
        _ => Err(Error::Database("stored record is not a JSON object".into())),
    }
}

fn millis_to_rfc3339(millis: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(millis).map(|at| at.to_rfc3339())
}

#[async_trait]
impl RecordStore for LibSqlStore {
    async fn list_all(&self, collection: &str) -> Result<Vec<Document>> {
        let db = self.db.lock().await;
        let mut rows = db
            .connection()
            .query(
                "SELECT data, created_at, updated_at FROM records
                 WHERE collection = ?1 ORDER BY seq",
                libsql::params![collection],
            )
            .await?;

        let mut documents = Vec::new();
        while let Some(row) = rows.next().await? {
            let mut document = parse_data(&row.get::<String>(0)?)?;
            if let Some(created) = millis_to_rfc3339(row.get::<i64>(1)?) {
                document.insert("_createdDate".into(), Value::String(created));
            }
            if let Some(updated) = millis_to_rfc3339(row.get::<i64>(2)?) {
                document.insert("_updatedDate".into(), Value::String(updated));
            }
            documents.push(document);
        }
        tracing::debug!("Listed {} records from {collection}", documents.len());
        Ok(documents)
    }

    async fn create(&self, collection: &str, document: Document) -> Result<Document> {
        let id = document_id(&document)?.to_string();
        let data = serde_json::to_string(&document)?;
        let now = Utc::now().timestamp_millis();

        let db = self.db.lock().await;
        db.connection()
            .execute(
                "INSERT INTO records (collection, id, data, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
                libsql::params![collection, id, data, now],
            )
            .await?;
        Ok(document)
    }

    async fn update(&self, collection: &str, partial: Document) -> Result<Document> {
        let id = document_id(&partial)?.to_string();
        let db = self.db.lock().await;
        let mut document = Self::fetch(&db, collection, &id)
            .await?
            .ok_or_else(|| Error::not_found(collection, &id))?;
        merge_document(&mut document, partial);

        let data = serde_json::to_string(&document)?;
        db.connection()
            .execute(
                "UPDATE records SET data = ?1, updated_at = ?2 WHERE collection = ?3 AND id = ?4",
                libsql::params![data, Utc::now().timestamp_millis(), collection, id],
            )
            .await?;
        Ok(document)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let db = self.db.lock().await;
        let affected = db
            .connection()
            .execute(
                "DELETE FROM records WHERE collection = ?1 AND id = ?2",
                libsql::params![collection, id],
            )
            .await?;
        if affected == 0 {
            return Err(Error::not_found(collection, id));
        }
        Ok(())
    }
}
