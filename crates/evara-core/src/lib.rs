//! evara-core - Core library for Evara
//!
//! This crate contains the wedding-planning entities, the record store
//! abstraction with its in-memory and libSQL backends, the optimistic list
//! synchronizer, derived view helpers, and the canned planning assistant used
//! by every Evara interface.

pub mod assistant;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod store;
pub mod sync;
pub mod util;
pub mod views;

pub use assistant::AssistantSession;
pub use config::PlannerConfig;
pub use error::{Error, Result};
pub use models::{ChecklistItem, Entity, Event, Guest, RecordId, Vendor};
pub use store::{Document, LibSqlStore, MemoryStore, RecordStore};
pub use sync::{ListSync, LoadOutcome, PendingWrite, SyncPhase, WriteOutcome};
