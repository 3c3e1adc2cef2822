//! libSQL database layer backing [`crate::store::LibSqlStore`]

mod connection;
mod migrations;

pub use connection::{Database, SyncConfig};
