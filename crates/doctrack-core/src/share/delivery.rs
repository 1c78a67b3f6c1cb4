//! Delivery capabilities
//!
//! The coordinator never talks to a mail server or messaging gateway itself.
//! It calls one of these traits and treats any `Err` (or panic) as a failed
//! delivery. Timeouts are the implementation's business.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::DocumentSummary;

/// Sends an email notification
#[async_trait]
pub trait EmailDelivery: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()>;
}

/// Sends a messaging (WhatsApp) notification
#[async_trait]
pub trait MessagingDelivery: Send + Sync {
    /// `phone` is already normalized to digits only
    async fn send(&self, phone: &str, documents: &[DocumentSummary]) -> Result<()>;
}

#[async_trait]
impl<T: EmailDelivery + ?Sized> EmailDelivery for Arc<T> {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        (**self).send(to, subject, body).await
    }
}

#[async_trait]
impl<T: MessagingDelivery + ?Sized> MessagingDelivery for Arc<T> {
    async fn send(&self, phone: &str, documents: &[DocumentSummary]) -> Result<()> {
        (**self).send(phone, documents).await
    }
}
