//! Schema migrations for the record store

use crate::error::Result;
use libsql::Connection;

/// Current schema version
const CURRENT_VERSION: i32 = 1;

/// Run all pending migrations
pub async fn run(conn: &Connection) -> Result<()> {
    let version = get_version(conn).await?;

    if version < 1 {
        apply(conn, 1, &V1_RECORDS).await?;
    }

    Ok(())
}

/// Version 1: one table holding every collection as JSON documents.
///
/// `seq` preserves insertion order, which is the order collections are listed in.
const V1_RECORDS: [&str; 4] = [
    "CREATE TABLE IF NOT EXISTS schema_version (
        version INTEGER PRIMARY KEY
    )",
    "CREATE TABLE IF NOT EXISTS records (
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        collection TEXT NOT NULL,
        id TEXT NOT NULL,
        data TEXT NOT NULL,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    )",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_records_collection_id ON records(collection, id)",
    "CREATE INDEX IF NOT EXISTS idx_records_collection_seq ON records(collection, seq)",
];

async fn get_version(conn: &Connection) -> Result<i32> {
    let mut rows = conn
        .query(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            (),
        )
        .await?;

    let exists = match rows.next().await? {
        Some(row) => row.get::<i32>(0)? != 0,
        None => false,
    };
    if !exists {
        return Ok(0);
    }

    let mut rows = conn
        .query("SELECT COALESCE(MAX(version), 0) FROM schema_version", ())
        .await?;
    match rows.next().await? {
        Some(row) => Ok(row.get(0)?),
        None => Ok(0),
    }
}

/// Run `statements` and record `version` in a single transaction.
async fn apply(conn: &Connection, version: i32, statements: &[&str]) -> Result<()> {
    // libsql has no execute_batch; statements run one at a time
    conn.execute("BEGIN TRANSACTION", ()).await?;

    for stmt in statements {
        if let Err(e) = conn.execute(stmt, ()).await {
            conn.execute("ROLLBACK", ()).await.ok();
            return Err(e.into());
        }
    }

    let recorded = conn
        .execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            libsql::params![version],
        )
        .await;
    if let Err(e) = recorded {
        conn.execute("ROLLBACK", ()).await.ok();
        return Err(e.into());
    }

    if let Err(e) = conn.execute("COMMIT", ()).await {
        conn.execute("ROLLBACK", ()).await.ok();
        return Err(e.into());
    }

    tracing::info!("Migrated record store to schema version {version}");
    Ok(())
}
