//! Sharing workflow
//!
//! - `request`: share payloads (email / WhatsApp) and validation
//! - `delivery`: capability traits the coordinator calls out to
//! - `coordinator`: the per-attempt state machine

pub mod coordinator;
pub mod delivery;
pub mod request;

pub use coordinator::{ShareCoordinator, ShareReceipt, ShareState};
pub use delivery::{EmailDelivery, MessagingDelivery};
pub use request::{normalize_phone, EmailPayload, SharePayload, ShareRequest, WhatsappPayload};
