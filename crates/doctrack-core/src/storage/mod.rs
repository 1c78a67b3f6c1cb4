//! Storage layer
//!
//! Keeps the in-memory store and the login session on disk between runs.
//!
//! ## Architecture
//!
//! - **Store**: source of truth while the process runs
//! - **Snapshot file**: pretty-printed JSON image of the store, rewritten
//!   atomically after every mutation

pub mod error;
pub mod persistence;

pub use error::{StorageError, StorageResult};
pub use persistence::SnapshotPersistence;
