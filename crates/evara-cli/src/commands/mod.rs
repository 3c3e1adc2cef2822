pub mod ask;
pub mod common;
pub mod completions;
pub mod config;
pub mod events;
pub mod guests;
pub mod sync;
pub mod tasks;
pub mod vendors;
