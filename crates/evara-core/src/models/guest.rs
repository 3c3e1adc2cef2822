//! Guest list model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use super::{patch_optional, patch_required, Entity, RecordDefaults, RecordId};
use crate::util::{normalize_text, normalize_text_option};

/// RSVP state of a guest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RsvpStatus {
    #[default]
    Pending,
    Confirmed,
    Declined,
}

impl RsvpStatus {
    pub const ALL: [Self; 3] = [Self::Pending, Self::Confirmed, Self::Declined];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Declined => "Declined",
        }
    }
}

impl fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RsvpStatus {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(value))
            .ok_or_else(|| crate::Error::InvalidInput(format!("unknown RSVP status: {value}")))
    }
}

/// A guest on the wedding guest list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
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
    pub guest_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_rsvp",
        skip_serializing_if = "Option::is_none"
    )]
    pub rsvp_status: Option<RsvpStatus>,
    #[serde(
        default,
        deserialize_with = "super::lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub dietary_restrictions: Option<String>,
    #[serde(default, deserialize_with = "super::lenient::flag_or_false")]
    pub has_plus_one: bool,
    #[serde(
        default,
        deserialize_with = "super::lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub plus_one_name: Option<String>,
}

impl Guest {
    /// Display name, empty when the stored record has none
    #[must_use]
    pub fn name(&self) -> &str {
        self.guest_name.as_deref().unwrap_or("")
    }

    /// Whether the guest has answered with `status`
    #[must_use]
    pub fn has_rsvp(&self, status: RsvpStatus) -> bool {
        self.rsvp_status == Some(status)
    }

    fn sync_plus_one_flag(&mut self) {
        self.has_plus_one = self.plus_one_name.is_some();
    }
}

/// Form input for adding a guest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuestDraft {
    pub guest_name: String,
    pub rsvp_status: RsvpStatus,
    pub dietary_restrictions: Option<String>,
    pub plus_one_name: Option<String>,
}

/// Edits to an existing guest; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuestPatch {
    pub guest_name: Option<String>,
    pub rsvp_status: Option<RsvpStatus>,
    pub dietary_restrictions: Option<String>,
    pub plus_one_name: Option<String>,
}

impl Entity for Guest {
    const COLLECTION: &'static str = "guestlist";

    type Draft = GuestDraft;
    type Patch = GuestPatch;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn from_draft(id: RecordId, draft: GuestDraft, _defaults: &RecordDefaults) -> Option<Self> {
        let guest_name = normalize_text(&draft.guest_name)?;
        let mut guest = Self {
            id,
            created_date: None,
            updated_date: None,
            guest_name: Some(guest_name),
            rsvp_status: Some(draft.rsvp_status),
            dietary_restrictions: normalize_text_option(draft.dietary_restrictions),
            has_plus_one: false,
            plus_one_name: normalize_text_option(draft.plus_one_name),
        };
        guest.sync_plus_one_flag();
        Some(guest)
    }

    fn apply_patch(&mut self, patch: GuestPatch) {
        patch_required(&mut self.guest_name, patch.guest_name);
        if let Some(status) = patch.rsvp_status {
            self.rsvp_status = Some(status);
        }
        patch_optional(&mut self.dietary_restrictions, patch.dietary_restrictions);
        patch_optional(&mut self.plus_one_name, patch.plus_one_name);
        self.sync_plus_one_flag();
    }
}

/// Unknown RSVP labels from the store load as `None` instead of failing the list.
fn deserialize_rsvp<'de, D>(deserializer: D) -> Result<Option<RsvpStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = super::lenient::optional_text(deserializer)?;
    Ok(raw.and_then(|value| value.parse().ok()))
}
