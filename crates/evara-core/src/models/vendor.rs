//! Vendor directory model

use serde::{Deserialize, Serialize};

use super::{patch_optional, patch_required, Entity, RecordDefaults, RecordId};
use crate::util::{normalize_text, normalize_text_option};

/// A vendor contact in the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
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
    pub vendor_name: Option<String>,
    /// Service category, e.g. "Photography"; drives the directory filter
    #[serde(
        default,
        deserialize_with = "super::lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub service_type: Option<String>,
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
    pub phone_number: Option<String>,
    #[serde(
        default,
        deserialize_with = "super::lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub email: Option<String>,
    /// Image URL
    #[serde(
        default,
        deserialize_with = "super::lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub portfolio_image: Option<String>,
}

impl Vendor {
    #[must_use]
    pub fn name(&self) -> &str {
        self.vendor_name.as_deref().unwrap_or("")
    }

    #[must_use]
    pub fn service(&self) -> &str {
        self.service_type.as_deref().unwrap_or("")
    }
}

/// Form input for adding a vendor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VendorDraft {
    pub vendor_name: String,
    pub service_type: String,
    pub description: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub portfolio_image: Option<String>,
}

/// Edits to an existing vendor; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VendorPatch {
    pub vendor_name: Option<String>,
    pub service_type: Option<String>,
    pub description: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub portfolio_image: Option<String>,
}

impl Entity for Vendor {
    const COLLECTION: &'static str = "vendordirectory";

    type Draft = VendorDraft;
    type Patch = VendorPatch;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn from_draft(id: RecordId, draft: VendorDraft, defaults: &RecordDefaults) -> Option<Self> {
        let vendor_name = normalize_text(&draft.vendor_name)?;
        let service_type = normalize_text(&draft.service_type)?;
        Some(Self {
            id,
            created_date: None,
            updated_date: None,
            vendor_name: Some(vendor_name),
            service_type: Some(service_type),
            description: normalize_text_option(draft.description),
            phone_number: normalize_text_option(draft.phone_number),
            email: normalize_text_option(draft.email),
            portfolio_image: normalize_text_option(draft.portfolio_image)
                .or_else(|| defaults.vendor_image.clone()),
        })
    }

    fn apply_patch(&mut self, patch: VendorPatch) {
        patch_required(&mut self.vendor_name, patch.vendor_name);
        patch_required(&mut self.service_type, patch.service_type);
        patch_optional(&mut self.description, patch.description);
        patch_optional(&mut self.phone_number, patch.phone_number);
        patch_optional(&mut self.email, patch.email);
        patch_optional(&mut self.portfolio_image, patch.portfolio_image);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, service: &str) -> VendorDraft {
        VendorDraft {
            vendor_name: name.to_string(),
            service_type: service.to_string(),
            ..VendorDraft::default()
        }
    }

    #[test]
    fn test_from_draft_requires_name_and_service() {
        let defaults = RecordDefaults::default();
        assert!(Vendor::from_draft(RecordId::generate(), draft("Bloom", " "), &defaults).is_none());
        assert!(Vendor::from_draft(RecordId::generate(), draft("", "Florist"), &defaults).is_none());
        assert!(Vendor::from_draft(RecordId::generate(), draft("Bloom", "Florist"), &defaults).is_some());
    }

    #[test]
    fn test_blank_image_takes_default() {
        let defaults = RecordDefaults {
            vendor_image: Some("https://img.example.com/vendor.png".to_string()),
            event_image: None,
        };
        let vendor =
            Vendor::from_draft(RecordId::generate(), draft("Bloom", "Florist"), &defaults).unwrap();
        assert_eq!(
            vendor.portfolio_image.as_deref(),
            Some("https://img.example.com/vendor.png")
        );

        let mut custom = draft("Lens & Light", "Photography");
        custom.portfolio_image = Some("https://img.example.com/lens.png".to_string());
        let vendor = Vendor::from_draft(RecordId::generate(), custom, &defaults).unwrap();
        assert_eq!(
            vendor.portfolio_image.as_deref(),
            Some("https://img.example.com/lens.png")
        );
    }

    #[test]
    fn test_patch_keeps_required_fields_on_blank() {
        let mut vendor = Vendor::from_draft(
            RecordId::generate(),
            draft("Bloom", "Florist"),
            &RecordDefaults::default(),
        )
        .unwrap();
        vendor.apply_patch(VendorPatch {
            service_type: Some("  ".to_string()),
            email: Some("hello@bloom.test".to_string()),
            ..VendorPatch::default()
        });
        assert_eq!(vendor.service(), "Florist");
        assert_eq!(vendor.email.as_deref(), Some("hello@bloom.test"));
    }
}
