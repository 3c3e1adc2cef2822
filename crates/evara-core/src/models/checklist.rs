//! Wedding checklist model
//!
//! The store carries both a `status` label and an `isCompleted` flag. Here a
//! single boolean is the source of truth and both wire fields are produced
//! from it, so the two can never disagree once a record passes through Evara.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{patch_optional, patch_required, Entity, RecordDefaults, RecordId, DEFAULT_CATEGORY};
use crate::util::{normalize_text, normalize_text_option};

/// Label form of a task's completion state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompletionStatus {
    Pending,
    Completed,
}

impl CompletionStatus {
    #[must_use]
    pub const fn from_completed(completed: bool) -> Self {
        if completed {
            Self::Completed
        } else {
            Self::Pending
        }
    }

    #[must_use]
    pub const fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for CompletionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CompletionStatus {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            other => Err(crate::Error::InvalidInput(format!(
                "unknown task status: {other}"
            ))),
        }
    }
}

/// A task on the wedding checklist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ChecklistWire", into = "ChecklistWire")]
pub struct ChecklistItem {
    pub id: RecordId,
    pub created_date: Option<String>,
    pub updated_date: Option<String>,
    pub task_name: Option<String>,
    pub category: Option<String>,
    pub due_date: Option<String>,
    pub description: Option<String>,
    pub assigned_to: Option<String>,
    completed: bool,
}

impl ChecklistItem {
    #[must_use]
    pub fn name(&self) -> &str {
        self.task_name.as_deref().unwrap_or("")
    }

    /// Category used for grouping; blank categories fall back to "General"
    #[must_use]
    pub fn category_or_default(&self) -> &str {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|category| !category.is_empty())
            .unwrap_or(DEFAULT_CATEGORY)
    }

    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub const fn status(&self) -> CompletionStatus {
        CompletionStatus::from_completed(self.completed)
    }

    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }

    /// Flip completion; status follows automatically
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}

/// Form input for adding a task
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecklistDraft {
    pub task_name: String,
    pub category: Option<String>,
    pub due_date: Option<String>,
    pub description: Option<String>,
    pub assigned_to: Option<String>,
}

/// Edits to an existing task; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecklistPatch {
    pub task_name: Option<String>,
    pub category: Option<String>,
    pub due_date: Option<String>,
    pub description: Option<String>,
    pub assigned_to: Option<String>,
    pub status: Option<CompletionStatus>,
}

impl Entity for ChecklistItem {
    const COLLECTION: &'static str = "weddingchecklist";

    type Draft = ChecklistDraft;
    type Patch = ChecklistPatch;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn from_draft(id: RecordId, draft: ChecklistDraft, _defaults: &RecordDefaults) -> Option<Self> {
        let task_name = normalize_text(&draft.task_name)?;
        Some(Self {
            id,
            created_date: None,
            updated_date: None,
            task_name: Some(task_name),
            category: Some(
                normalize_text_option(draft.category)
                    .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            ),
            due_date: normalize_text_option(draft.due_date),
            description: normalize_text_option(draft.description),
            assigned_to: normalize_text_option(draft.assigned_to),
            completed: false,
        })
    }

    fn apply_patch(&mut self, patch: ChecklistPatch) {
        patch_required(&mut self.task_name, patch.task_name);
        if let Some(category) = patch.category {
            self.category = Some(
                normalize_text(&category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            );
        }
        patch_optional(&mut self.due_date, patch.due_date);
        patch_optional(&mut self.description, patch.description);
        patch_optional(&mut self.assigned_to, patch.assigned_to);
        if let Some(status) = patch.status {
            self.completed = status.is_completed();
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChecklistWire {
    #[serde(rename = "_id")]
    id: RecordId,
    #[serde(
        rename = "_createdDate",
        default,
        deserialize_with = "super::lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    created_date: Option<String>,
    #[serde(
        rename = "_updatedDate",
        default,
        deserialize_with = "super::lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    updated_date: Option<String>,
    #[serde(
        default,
        deserialize_with = "super::lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    task_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "super::lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    category: Option<String>,
    #[serde(
        default,
        deserialize_with = "super::lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    due_date: Option<String>,
    #[serde(
        default,
        deserialize_with = "super::lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    status: Option<String>,
    #[serde(
        default,
        deserialize_with = "super::lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    description: Option<String>,
    #[serde(
        default,
        deserialize_with = "super::lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    assigned_to: Option<String>,
    #[serde(
        default,
        deserialize_with = "super::lenient::optional_flag",
        skip_serializing_if = "Option::is_none"
    )]
    is_completed: Option<bool>,
}

impl From<ChecklistWire> for ChecklistItem {
    // `isCompleted` wins when both fields are present; otherwise the label decides.
    fn from(wire: ChecklistWire) -> Self {
        let completed = wire.is_completed.unwrap_or_else(|| {
            wire.status
                .as_deref()
                .and_then(|status| status.parse::<CompletionStatus>().ok())
                .is_some_and(CompletionStatus::is_completed)
        });
        Self {
            id: wire.id,
            created_date: wire.created_date,
            updated_date: wire.updated_date,
            task_name: wire.task_name,
            category: wire.category,
            due_date: wire.due_date,
            description: wire.description,
            assigned_to: wire.assigned_to,
            completed,
        }
    }
}

impl From<ChecklistItem> for ChecklistWire {
    fn from(item: ChecklistItem) -> Self {
        Self {
            status: Some(item.status().label().to_string()),
            is_completed: Some(item.completed),
            id: item.id,
            created_date: item.created_date,
            updated_date: item.updated_date,
            task_name: item.task_name,
            category: item.category,
            due_date: item.due_date,
            description: item.description,
            assigned_to: item.assigned_to,
        }
    }
}
