use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use evara_core::db::SyncConfig;
use evara_core::{
    Entity, LibSqlStore, ListSync, LoadOutcome, PendingWrite, PlannerConfig, WriteOutcome,
};
use serde::Serialize;

use crate::error::CliError;

const CONFIG_FILE_NAME: &str = "config.json";
const SHORT_ID_LEN: usize = 8;

/// Resolved paths and settings for one CLI invocation
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: PlannerConfig,
    pub config_path: PathBuf,
    pub db_path: PathBuf,
    pub sync: Option<SyncConfig>,
}

impl AppContext {
    /// Resolve config and database locations from flags, environment and config file.
    pub fn resolve(
        cli_db_path: Option<PathBuf>,
        cli_config_path: Option<PathBuf>,
    ) -> Result<Self, CliError> {
        let config_path = resolve_config_path(cli_config_path)?;
        let config = PlannerConfig::load_from_path(&config_path)?;
        let db_path = resolve_db_path(cli_db_path, &config)?;
        let sync = sync_config_from_env(&config);
        Ok(Self {
            config,
            config_path,
            db_path,
            sync,
        })
    }

    /// Local-only context with explicit paths
    #[cfg(test)]
    pub fn local(config: PlannerConfig, config_path: PathBuf, db_path: PathBuf) -> Self {
        Self {
            config,
            config_path,
            db_path,
            sync: None,
        }
    }

    pub async fn open_store(&self) -> Result<Arc<LibSqlStore>, CliError> {
        let store = LibSqlStore::open_path(self.db_path.clone(), self.sync.clone()).await?;
        Ok(Arc::new(store))
    }

    /// Open the store and load one collection into a synchronizer.
    pub async fn load_list<E: Entity>(&self) -> Result<ListSync<E, LibSqlStore>, CliError> {
        let store = self.open_store().await?;
        let list = ListSync::with_defaults(store, self.config.record_defaults());
        match list.load().await {
            LoadOutcome::Loaded(count) => {
                tracing::debug!(collection = E::COLLECTION, count, "Loaded list");
                Ok(list)
            }
            LoadOutcome::Failed => Err(CliError::LoadFailed(E::COLLECTION)),
        }
    }
}

pub fn resolve_config_path(cli_config_path: Option<PathBuf>) -> Result<PathBuf, CliError> {
    if let Some(path) = cli_config_path.or_else(|| env::var_os("EVARA_CONFIG").map(PathBuf::from))
    {
        return Ok(path);
    }
    dirs::config_dir()
        .map(|dir| dir.join("evara").join(CONFIG_FILE_NAME))
        .ok_or_else(|| CliError::Config("Failed to resolve config directory".into()))
}

pub fn resolve_db_path(
    cli_db_path: Option<PathBuf>,
    config: &PlannerConfig,
) -> Result<PathBuf, CliError> {
    if let Some(path) = cli_db_path
        .or_else(|| env::var_os("EVARA_DB_PATH").map(PathBuf::from))
        .or_else(|| config.db_path.clone())
    {
        return Ok(path);
    }
    default_db_path()
}

pub fn default_db_path() -> Result<PathBuf, CliError> {
    dirs::data_dir()
        .map(|dir| dir.join("evara").join("evara.db"))
        .ok_or_else(|| CliError::Config("Failed to resolve data directory".into()))
}

/// Remote replica settings; the URL may come from the config, the token only from the environment.
fn sync_config_from_env(config: &PlannerConfig) -> Option<SyncConfig> {
    let url = env::var("TURSO_DATABASE_URL")
        .ok()
        .filter(|url| !url.trim().is_empty())
        .or_else(|| config.sync_url.clone())?;
    let Some(auth_token) = env::var("TURSO_AUTH_TOKEN")
        .ok()
        .filter(|token| !token.trim().is_empty())
    else {
        tracing::warn!("Sync URL is set but TURSO_AUTH_TOKEN is missing; running local-only");
        return None;
    };
    Some(SyncConfig::new(url, auth_token).without_auto_sync())
}

pub fn normalize_record_query(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyRecordId)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Find a record by full id, falling back to a unique id prefix.
pub fn resolve_record<E: Entity>(items: &[E], query: &str) -> Result<E, CliError> {
    let query = normalize_record_query(query)?;
    if let Some(exact) = items.iter().find(|item| item.id().as_str() == query) {
        return Ok(exact.clone());
    }

    let matches: Vec<&E> = items
        .iter()
        .filter(|item| item.id().as_str().starts_with(&query))
        .collect();
    match matches.as_slice() {
        [] => Err(not_found::<E>(&query)),
        [only] => Ok((*only).clone()),
        several => {
            let options = several
                .iter()
                .take(3)
                .map(|item| short_id(item.id().as_str()))
                .collect::<Vec<_>>()
                .join(", ");
            Err(CliError::AmbiguousRecordId(format!(
                "ID prefix '{query}' is ambiguous; matches: {options}"
            )))
        }
    }
}

pub fn not_found<E: Entity>(query: &str) -> CliError {
    CliError::RecordNotFound {
        collection: E::COLLECTION,
        query: query.trim().to_string(),
    }
}

/// Wait for an optimistic write and turn a revert into an error.
pub async fn settle(write: PendingWrite) -> Result<String, CliError> {
    let id = write.id().to_string();
    match write.settle().await {
        WriteOutcome::Persisted => Ok(id),
        WriteOutcome::Reverted => Err(CliError::WriteReverted(id)),
    }
}

pub fn short_id(id: &str) -> String {
    id.chars().take(SHORT_ID_LEN).collect()
}

/// Join positional words into a single value, `None` when blank
pub fn join_words(words: &[String]) -> Option<String> {
    let joined = words.join(" ");
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Render `text` padded to `width`, cut with an ellipsis when longer
pub fn fit(text: &str, width: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= width {
        format!("{collapsed:<width$}")
    } else {
        let mut truncated = collapsed
            .chars()
            .take(width.saturating_sub(3))
            .collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn display_path(path: &Path) -> String {
    path.display().to_string()
}
