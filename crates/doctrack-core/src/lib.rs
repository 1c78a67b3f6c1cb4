//! doctrack core library
//!
//! This crate provides the core functionality for doctrack, a small document
//! tracker: a categorized, tagged catalogue of personal, company and director
//! documents with sharing by email or WhatsApp.
//!
//! # Architecture
//!
//! - **Store**: in-memory source of truth, insertion ordered
//! - **Aggregates**: statistics and derived views computed from the store
//!   against an injected clock
//! - **ShareCoordinator**: validates share requests, hands them to pluggable
//!   delivery capabilities and records sharing metadata on success
//! - **Storage**: JSON snapshot persistence kept outside the store
//!
//! # Quick Start
//!
//! ```text
//! let mut store = Store::new();
//! let doc = store.add(DocumentInput::new("Lease.pdf", DocumentType::Company, "Acme"))?;
//!
//! let coordinator = ShareCoordinator::new(email, messaging);
//! coordinator
//!     .share_by_email(&mut store, vec![doc.id], EmailPayload::new("a@b.c", "Lease", "Attached"))
//!     .await?;
//!
//! assert_eq!(store.stats().shared, 1);
//! ```
//!
//! # Modules
//!
//! - `store`: document collection (main entry point)
//! - `models`: documents, categories and share metadata
//! - `stats`: statistics and derived listings
//! - `share`: share requests, delivery capabilities and the coordinator
//! - `session`: login session and access gate
//! - `storage`: snapshot persistence
//! - `config`: application configuration

pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod sample;
pub mod session;
pub mod share;
pub mod stats;
pub mod storage;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AuthConfig, Config, DeliveryConfig, DeliveryMode};
pub use error::{Error, ErrorKind, Result, ValidationError};
pub use models::{
    Document, DocumentId, DocumentInput, DocumentSummary, DocumentType, Share, ShareMethod,
};
pub use sample::sample_snapshot;
pub use session::{hash_password, AuthGate, Credentials, Session, SessionUser};
pub use share::{
    EmailDelivery, EmailPayload, MessagingDelivery, ShareCoordinator, SharePayload, ShareReceipt,
    ShareRequest, ShareState, WhatsappPayload,
};
pub use stats::{Aggregates, Stats};
pub use storage::{SnapshotPersistence, StorageError};
pub use store::{Snapshot, Store};
