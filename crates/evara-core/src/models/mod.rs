//! Data models for Evara
//!
//! Every entity is a flat record stored as a JSON document in one collection
//! of the record store. Field names on the wire are camelCase and the identity
//! lives under `_id`.

mod checklist;
mod event;
mod guest;
mod lenient;
mod vendor;

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::util::normalize_text;

pub use checklist::{ChecklistDraft, ChecklistItem, ChecklistPatch, CompletionStatus};
pub use event::{parse_event_time, Event, EventDraft, EventPatch};
pub use guest::{Guest, GuestDraft, GuestPatch, RsvpStatus};
pub use vendor::{Vendor, VendorDraft, VendorPatch};

/// Category assigned to checklist tasks created without one.
pub const DEFAULT_CATEGORY: &str = "General";

/// Identifier of a record inside a collection.
///
/// Generated client-side as a random UUID when a record is created, but
/// records loaded from the store may carry any non-empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Create a fresh random identifier
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RecordId {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(crate::Error::InvalidInput(
                "record id cannot be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }
}

/// Values filled in when a draft leaves an optional image blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordDefaults {
    pub vendor_image: Option<String>,
    pub event_image: Option<String>,
}

/// A record type mirrored by a [`crate::ListSync`].
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection identifier in the record store
    const COLLECTION: &'static str;

    /// Whether the collection is kept in a canonical sort order.
    ///
    /// Unordered collections receive optimistic inserts at the front.
    const SORTED: bool = false;

    /// User input for creating a record
    type Draft: Send;

    /// User input for editing a record
    type Patch: Send;

    /// Unique identifier of this record
    fn id(&self) -> &RecordId;

    /// Build a complete record from a draft.
    ///
    /// Returns `None` when a required field is blank, which callers treat as
    /// a silently rejected submission.
    fn from_draft(id: RecordId, draft: Self::Draft, defaults: &RecordDefaults) -> Option<Self>;

    /// Apply an edit in place, re-establishing any write-time invariants.
    fn apply_patch(&mut self, patch: Self::Patch);

    /// Sort a collection into its canonical order (stable).
    fn canonical_order(_items: &mut [Self]) {}
}

/// Replace an optional field when the patch carries a value; blank clears it.
fn patch_optional(target: &mut Option<String>, value: Option<String>) {
    if let Some(value) = value {
        *target = normalize_text(&value);
    }
}

/// Replace a required field only with a non-blank value.
fn patch_required(target: &mut Option<String>, value: Option<String>) {
    if let Some(value) = value.as_deref().and_then(normalize_text) {
        *target = Some(value);
    }
}
