//! JSON document helpers shared by the store backends and the synchronizer.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// A stored record: a JSON object with a string `_id`
pub type Document = Map<String, Value>;

/// Identity field present on every document
pub const ID_FIELD: &str = "_id";

/// Timestamps owned by the store; never sent by clients
const SYSTEM_FIELDS: [&str; 2] = ["_createdDate", "_updatedDate"];

/// Serialize a record into a document, dropping store-owned metadata.
pub fn to_document<T: Serialize>(record: &T) -> Result<Document> {
    match serde_json::to_value(record)? {
        Value::Object(mut document) => {
            for field in SYSTEM_FIELDS {
                document.remove(field);
            }
            document_id(&document)?;
            Ok(document)
        }
        other => Err(Error::InvalidInput(format!(
            "record must serialize to a JSON object, got {other}"
        ))),
    }
}

/// The non-empty `_id` of a document.
pub fn document_id(document: &Document) -> Result<&str> {
    document
        .get(ID_FIELD)
        .and_then(Value::as_str)
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| Error::InvalidInput("document is missing a string _id".to_string()))
}

/// Partial update turning `before` into `after`.
///
/// Carries `_id`, every changed or added field, and `null` for removed fields.
pub fn diff_documents(before: &Document, after: &Document) -> Document {
    let mut partial = Document::new();
    if let Some(id) = after.get(ID_FIELD) {
        partial.insert(ID_FIELD.to_string(), id.clone());
    }
    for (key, value) in after {
        if key != ID_FIELD && before.get(key) != Some(value) {
            partial.insert(key.clone(), value.clone());
        }
    }
    for key in before.keys() {
        if !after.contains_key(key) {
            partial.insert(key.clone(), Value::Null);
        }
    }
    partial
}

/// Apply a partial update in place; `null` removes a field.
pub(crate) fn merge_document(target: &mut Document, partial: Document) {
    for (key, value) in partial {
        if key == ID_FIELD {
            continue;
        }
        if value.is_null() {
            target.remove(&key);
        } else {
            target.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn to_document_strips_system_fields() {
        let document = to_document(&json!({
            "_id": "a",
            "_createdDate": "2026-01-01T00:00:00Z",
            "_updatedDate": "2026-01-02T00:00:00Z",
            "guestName": "Alex"
        }))
        .unwrap();
        assert_eq!(document, doc(json!({"_id": "a", "guestName": "Alex"})));
    }

    #[test]
    fn to_document_requires_id() {
        assert!(to_document(&json!({"guestName": "Alex"})).is_err());
        assert!(to_document(&json!({"_id": "  "})).is_err());
        assert!(to_document(&json!(["not", "an", "object"])).is_err());
    }

    #[test]
    fn diff_reports_changes_and_removals() {
        let before = doc(json!({"_id": "t", "status": "Pending", "isCompleted": false, "assignedTo": "Sam"}));
        let after = doc(json!({"_id": "t", "status": "Completed", "isCompleted": true}));
        assert_eq!(
            diff_documents(&before, &after),
            doc(json!({"_id": "t", "status": "Completed", "isCompleted": true, "assignedTo": null}))
        );
    }

    #[test]
    fn merge_applies_nulls_as_removals() {
        let mut target = doc(json!({"_id": "g", "guestName": "Alex", "plusOneName": "Sam"}));
        merge_document(
            &mut target,
            doc(json!({"_id": "ignored", "plusOneName": null, "rsvpStatus": "Confirmed"})),
        );
        assert_eq!(
            target,
            doc(json!({"_id": "g", "guestName": "Alex", "rsvpStatus": "Confirmed"}))
        );
    }
}
