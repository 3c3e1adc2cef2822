//! Record store abstraction
//!
//! A record store holds named collections of JSON documents, each carrying a
//! caller-generated `_id`. It is the authoritative copy that every
//! [`crate::ListSync`] reconciles against.

mod document;
mod memory;
mod sql;

use async_trait::async_trait;

use crate::error::Result;

pub use document::{diff_documents, document_id, to_document, Document};
pub use memory::{FailureMode, MemoryStore};
pub use sql::LibSqlStore;

/// Remote persistence used by the list synchronizer.
///
/// Calls are independent request/response operations with no ordering
/// guarantee between them. Any error is treated the same way by callers.
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    /// Every document in the collection, in store order
    async fn list_all(&self, collection: &str) -> Result<Vec<Document>>;

    /// Insert a document; `_id` must already be set
    async fn create(&self, collection: &str, document: Document) -> Result<Document>;

    /// Merge `partial` into the document with the same `_id`.
    ///
    /// Fields absent from `partial` are left unchanged; fields set to `null`
    /// are removed.
    async fn update(&self, collection: &str, partial: Document) -> Result<Document>;

    /// Remove the document with `id`
    async fn delete(&self, collection: &str, id: &str) -> Result<()>;
}
