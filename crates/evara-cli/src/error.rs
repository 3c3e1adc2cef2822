use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] evara_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("Record ID cannot be empty")]
    EmptyRecordId,
    #[error("No {collection} record found for id/prefix: {query}")]
    RecordNotFound {
        collection: &'static str,
        query: String,
    },
    #[error("{0}")]
    AmbiguousRecordId(String),
    #[error("Could not parse date/time '{0}'; use e.g. 2026-06-20T15:30 or 2026-06-20")]
    InvalidDateTime(String),
    #[error("Could not load {0} from the record store")]
    LoadFailed(&'static str),
    #[error("The record store rejected the change to {0}; the list was reloaded")]
    WriteReverted(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(
        "Sync is not configured. Set TURSO_DATABASE_URL (or sync_url in the config file) and TURSO_AUTH_TOKEN to enable `evara sync`."
    )]
    SyncNotConfigured,
}
