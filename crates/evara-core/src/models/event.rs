//! Wedding calendar event model

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{patch_optional, patch_required, Entity, RecordDefaults, RecordId};
use crate::util::{normalize_text, normalize_text_option};

/// Layouts accepted for naive (zone-less) event times, read as UTC.
const NAIVE_LAYOUTS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// An event on the wedding calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(
        rename = "_createdDate",
        default,
        deserialize_with = "super::lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_date: Option<String>,
    #[serde(
        rename = "_updatedDate",
        default,
        deserialize_with = "super::lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_date: Option<String>,
    #[serde(
        default,
        deserialize_with = "super::lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub event_title: Option<String>,
    /// Start time as sent by the store; see [`parse_event_time`]
    #[serde(
        default,
        deserialize_with = "super::lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub event_date_time: Option<String>,
    #[serde(
        default,
        deserialize_with = "super::lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub location: Option<String>,
    #[serde(
        default,
        deserialize_with = "super::lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "super::lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub event_image: Option<String>,
    #[serde(
        default,
        deserialize_with = "super::lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub event_url: Option<String>,
}

impl Event {
    #[must_use]
    pub fn title(&self) -> &str {
        self.event_title.as_deref().unwrap_or("")
    }

    /// Parsed start time, `None` when missing or unparseable
    #[must_use]
    pub fn starts_at(&self) -> Option<DateTime<Utc>> {
        self.event_date_time.as_deref().and_then(parse_event_time)
    }

    /// Sort key in Unix milliseconds; missing or bad dates sort as the epoch
    #[must_use]
    pub fn sort_millis(&self) -> i64 {
        self.starts_at().map_or(0, |at| at.timestamp_millis())
    }
}

/// Parse an event time as RFC 3339, a `datetime-local` style value, or a bare date.
///
/// Values without an offset are interpreted as UTC.
///
/// # Examples
///
/// ```
/// use evara_core::models::parse_event_time;
///
/// let at = parse_event_time("2099-01-01T10:00").unwrap();
/// assert_eq!(at.to_rfc3339(), "2099-01-01T10:00:00+00:00");
/// assert!(parse_event_time("next tuesday").is_none());
/// ```
#[must_use]
pub fn parse_event_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    for layout in NAIVE_LAYOUTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, layout) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Form input for adding an event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    pub event_title: String,
    pub event_date_time: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub event_image: Option<String>,
    pub event_url: Option<String>,
}

/// Edits to an existing event; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    pub event_title: Option<String>,
    pub event_date_time: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub event_image: Option<String>,
    pub event_url: Option<String>,
}

impl Entity for Event {
    const COLLECTION: &'static str = "weddingevents";
    const SORTED: bool = true;

    type Draft = EventDraft;
    type Patch = EventPatch;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn from_draft(id: RecordId, draft: EventDraft, defaults: &RecordDefaults) -> Option<Self> {
        let event_title = normalize_text(&draft.event_title)?;
        let event_date_time = normalize_text(&draft.event_date_time)?;
        Some(Self {
            id,
            created_date: None,
            updated_date: None,
            event_title: Some(event_title),
            event_date_time: Some(event_date_time),
            location: normalize_text_option(draft.location),
            description: normalize_text_option(draft.description),
            event_image: normalize_text_option(draft.event_image)
                .or_else(|| defaults.event_image.clone()),
            event_url: normalize_text_option(draft.event_url),
        })
    }

    fn apply_patch(&mut self, patch: EventPatch) {
        patch_required(&mut self.event_title, patch.event_title);
        patch_required(&mut self.event_date_time, patch.event_date_time);
        patch_optional(&mut self.location, patch.location);
        patch_optional(&mut self.description, patch.description);
        patch_optional(&mut self.event_image, patch.event_image);
        patch_optional(&mut self.event_url, patch.event_url);
    }

    fn canonical_order(items: &mut [Self]) {
        items.sort_by_key(Self::sort_millis);
    }
}
