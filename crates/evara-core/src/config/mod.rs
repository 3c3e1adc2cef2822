//! Planner configuration.
//!
//! A small JSON document shared by every Evara front end. Secrets such as the
//! remote auth token are never stored here; they come from the environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::RecordDefaults;
use crate::util::{is_http_url, normalize_text_option};

const CONFIG_SCHEMA_VERSION: u32 = 1;

/// How long the assistant "types" before answering
pub const DEFAULT_REPLY_DELAY_MS: u64 = 1000;

/// Placeholder portfolio image for vendors added without one
pub const DEFAULT_VENDOR_IMAGE: &str = "https://static.wixstatic.com/media/8c86f3_f5478d379af44c09aa769027cb45f364~mv2.png?originWidth=384&originHeight=320";

/// Placeholder image for events added without one
pub const DEFAULT_EVENT_IMAGE: &str = "https://static.wixstatic.com/media/8c86f3_10747dc4a49d4b309219edbba5939868~mv2.png?originWidth=576&originHeight=448";

/// Persisted planner settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PlannerConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "default_reply_delay_ms")]
    pub reply_delay_ms: u64,
    #[serde(default = "default_vendor_image")]
    pub default_vendor_image: Option<String>,
    #[serde(default = "default_event_image")]
    pub default_event_image: Option<String>,
    /// Local database file; the platform data dir is used when unset
    #[serde(default)]
    pub db_path: Option<PathBuf>,
    /// Remote libSQL URL for embedded-replica sync
    #[serde(default)]
    pub sync_url: Option<String>,
}

const fn default_version() -> u32 {
    CONFIG_SCHEMA_VERSION
}

const fn default_reply_delay_ms() -> u64 {
    DEFAULT_REPLY_DELAY_MS
}

#[allow(clippy::unnecessary_wraps)]
fn default_vendor_image() -> Option<String> {
    Some(DEFAULT_VENDOR_IMAGE.to_string())
}

#[allow(clippy::unnecessary_wraps)]
fn default_event_image() -> Option<String> {
    Some(DEFAULT_EVENT_IMAGE.to_string())
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_SCHEMA_VERSION,
            reply_delay_ms: DEFAULT_REPLY_DELAY_MS,
            default_vendor_image: default_vendor_image(),
            default_event_image: default_event_image(),
            db_path: None,
            sync_url: None,
        }
    }
}

impl PlannerConfig {
    /// Load from `path`, falling back to defaults when the file does not exist.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|error| {
            Error::Config(format!("failed to read {}: {error}", path.display()))
        })?;
        let mut config = serde_json::from_str::<Self>(&raw).map_err(|error| {
            Error::Config(format!("failed to parse {}: {error}", path.display()))
        })?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Write the normalized config as pretty JSON, creating parent directories.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        normalized.validate()?;
        std::fs::write(path, serde_json::to_string_pretty(&normalized)?)?;
        Ok(())
    }

    /// Image fallbacks applied when creating vendors and events
    pub fn record_defaults(&self) -> RecordDefaults {
        RecordDefaults {
            vendor_image: self.default_vendor_image.clone(),
            event_image: self.default_event_image.clone(),
        }
    }

    pub const fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }

    fn normalize(&mut self) {
        self.default_vendor_image = normalize_text_option(self.default_vendor_image.take());
        self.default_event_image = normalize_text_option(self.default_event_image.take());
        self.sync_url = normalize_text_option(self.sync_url.take());
        self.db_path = self
            .db_path
            .take()
            .filter(|path| !path.as_os_str().is_empty());
    }

    fn validate(&self) -> Result<()> {
        if self.version != CONFIG_SCHEMA_VERSION {
            return Err(Error::Config(format!(
                "unsupported config version {} (expected {CONFIG_SCHEMA_VERSION})",
                self.version
            )));
        }
        for (field, value) in [
            ("default_vendor_image", &self.default_vendor_image),
            ("default_event_image", &self.default_event_image),
        ] {
            if let Some(url) = value {
                if !is_http_url(url) {
                    return Err(Error::Config(format!("{field} must be an http(s) URL")));
                }
            }
        }
        if let Some(url) = &self.sync_url {
            if !(url.starts_with("libsql://") || is_http_url(url)) {
                return Err(Error::Config(
                    "sync_url must be a libsql:// or http(s) URL".to_string(),
                ));
            }
        }
        Ok(())
    }
}
