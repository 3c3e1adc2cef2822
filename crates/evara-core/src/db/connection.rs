//! libSQL connection management

use std::path::Path;
use std::time::Duration;

use libsql::{Builder, Connection, Database as LibSqlDatabase};

use super::migrations;
use crate::error::{Error, Result};

/// Default pull interval for embedded replicas
const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(60);

/// Remote replica settings for a Turso-hosted database
#[derive(Debug, Clone, Default)]
pub struct SyncConfig {
    /// Remote database URL (e.g., `libsql://planner.turso.io`)
    pub url: Option<String>,
    pub auth_token: Option<String>,
    /// `None` means sync only happens on explicit request
    pub sync_interval: Option<Duration>,
}

impl SyncConfig {
    pub fn new(url: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            auth_token: Some(auth_token.into()),
            sync_interval: Some(DEFAULT_SYNC_INTERVAL),
        }
    }

    /// Disable background sync
    #[must_use]
    pub const fn without_auto_sync(mut self) -> Self {
        self.sync_interval = None;
        self
    }

    pub const fn is_configured(&self) -> bool {
        self.url.is_some() && self.auth_token.is_some()
    }
}

/// An open, migrated libSQL database
pub struct Database {
    db: LibSqlDatabase,
    conn: Connection,
    sync_config: Option<SyncConfig>,
}

impl Database {
    /// Open (or create) a local database file and migrate it.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_string_lossy().to_string();
        Self::open_local(&path).await
    }

    /// Open a throwaway in-memory database.
    pub async fn open_in_memory() -> Result<Self> {
        Self::open_local(":memory:").await
    }

    async fn open_local(path: &str) -> Result<Self> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;
        let database = Self {
            db,
            conn,
            sync_config: None,
        };
        database.configure().await?;
        migrations::run(&database.conn).await?;
        Ok(database)
    }

    /// Open an embedded replica of a remote database.
    ///
    /// Reads are served locally; writes go to the remote and sync back.
    pub async fn open_with_sync(
        local_path: impl AsRef<Path>,
        sync_config: SyncConfig,
    ) -> Result<Self> {
        let path = local_path.as_ref().to_string_lossy().to_string();
        let (Some(url), Some(token)) = (sync_config.url.clone(), sync_config.auth_token.clone())
        else {
            return Err(Error::Config(
                "remote sync needs both a database URL and an auth token".into(),
            ));
        };

        let mut builder = Builder::new_remote_replica(&path, url, token);
        if let Some(interval) = sync_config.sync_interval {
            builder = builder.sync_interval(interval);
            tracing::debug!("Replica sync interval set to {:?}", interval);
        }

        let db = builder.build().await?;
        let conn = db.connect()?;
        let database = Self {
            db,
            conn,
            sync_config: Some(sync_config),
        };

        // Pull the remote schema before migrating so an existing remote is not re-created
        database.sync().await?;
        database.configure().await?;
        migrations::run(&database.conn).await?;
        Ok(database)
    }

    async fn configure(&self) -> Result<()> {
        // Replicas reject some pragmas; those failures are ignored
        self.conn
            .execute("PRAGMA journal_mode = WAL;", ())
            .await
            .ok();
        self.conn
            .execute("PRAGMA synchronous = NORMAL;", ())
            .await
            .ok();
        Ok(())
    }

    /// Pull remote changes. No-op for local databases.
    pub async fn sync(&self) -> Result<()> {
        if self.sync_config.is_some() {
            self.db.sync().await?;
            tracing::debug!("Record store synced with remote");
        }
        Ok(())
    }

    pub const fn is_sync_enabled(&self) -> bool {
        self.sync_config.is_some()
    }

    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}
