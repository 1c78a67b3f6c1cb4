//! Share coordinator
//!
//! Drives one share attempt through `Idle -> Validating -> Sending ->
//! {Succeeded, Failed}`. Documents are only touched after the delivery
//! capability confirms success, so dropping the future mid-send (or a failed
//! send) leaves the store exactly as it was.
//!
//! The coordinator holds `&mut Store` across the delivery await, which
//! serializes shares against a single store. Callers that want overlapping
//! shares must put the store behind their own lock; the last writer wins on
//! the sharing fields.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::delivery::{EmailDelivery, MessagingDelivery};
use super::request::{EmailPayload, SharePayload, ShareRequest, WhatsappPayload};
use crate::error::{Error, Result, ValidationError};
use crate::models::{DocumentId, DocumentSummary, Share, ShareMethod};
use crate::store::Store;

/// Lifecycle of a single share attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareState {
    Idle,
    Validating,
    Sending,
    Succeeded,
    Failed,
}

impl ShareState {
    pub fn can_transition_to(self, next: ShareState) -> bool {
        use ShareState::*;
        matches!(
            (self, next),
            (Idle, Validating)
                | (Validating, Sending)
                | (Validating, Failed)
                | (Sending, Succeeded)
                | (Sending, Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ShareState::Succeeded | ShareState::Failed)
    }
}

/// Result of a successful share
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareReceipt {
    pub method: ShareMethod,
    /// Email address or normalized phone number recorded on the documents
    pub recipient: String,
    pub documents: Vec<DocumentId>,
    pub state: ShareState,
}

/// Tracks the state of one attempt
struct ShareAttempt {
    method: ShareMethod,
    state: ShareState,
}

impl ShareAttempt {
    fn start(method: ShareMethod) -> Self {
        let mut attempt = Self {
            method,
            state: ShareState::Idle,
        };
        attempt.advance(ShareState::Validating);
        attempt
    }

    fn advance(&mut self, next: ShareState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid share transition {:?} -> {:?}",
            self.state,
            next
        );
        debug!(method = %self.method, from = ?self.state, to = ?next, "Share state change");
        self.state = next;
    }

    fn fail(&mut self, error: Error) -> Error {
        self.advance(ShareState::Failed);
        error
    }
}

/// Validates share requests, dispatches them, and records the result
pub struct ShareCoordinator {
    email: Arc<dyn EmailDelivery>,
    messaging: Arc<dyn MessagingDelivery>,
}

impl ShareCoordinator {
    pub fn new(
        email: impl EmailDelivery + 'static,
        messaging: impl MessagingDelivery + 'static,
    ) -> Self {
        Self {
            email: Arc::new(email),
            messaging: Arc::new(messaging),
        }
    }

    /// Dispatch a request to the channel its payload names
    pub async fn share(&self, store: &mut Store, request: ShareRequest) -> Result<ShareReceipt> {
        match request.payload {
            SharePayload::Email(payload) => {
                self.share_by_email(store, request.documents, payload).await
            }
            SharePayload::Whatsapp(payload) => {
                self.share_by_whatsapp(store, request.documents, payload)
                    .await
            }
        }
    }

    /// Email the documents and mark them shared with the recipient
    pub async fn share_by_email(
        &self,
        store: &mut Store,
        documents: Vec<DocumentId>,
        payload: EmailPayload,
    ) -> Result<ShareReceipt> {
        let mut attempt = ShareAttempt::start(ShareMethod::Email);

        if let Err(e) = payload.validate() {
            return Err(attempt.fail(e.into()));
        }
        if let Err(e) = check_targets(store, &documents) {
            return Err(attempt.fail(e));
        }

        attempt.advance(ShareState::Sending);
        let recipient = payload.to.trim();
        let outcome = deliver(
            ShareMethod::Email,
            self.email.send(recipient, &payload.subject, &payload.message),
        )
        .await;

        complete(attempt, store, documents, recipient.to_string(), outcome)
    }

    /// Send the documents over WhatsApp and mark them shared with the number
    pub async fn share_by_whatsapp(
        &self,
        store: &mut Store,
        documents: Vec<DocumentId>,
        payload: WhatsappPayload,
    ) -> Result<ShareReceipt> {
        let mut attempt = ShareAttempt::start(ShareMethod::Whatsapp);

        let phone = match payload.normalized_phone() {
            Ok(phone) => phone,
            Err(e) => return Err(attempt.fail(e.into())),
        };
        if let Err(e) = check_targets(store, &documents) {
            return Err(attempt.fail(e));
        }

        let summaries: Vec<DocumentSummary> = documents
            .iter()
            .filter_map(|id| store.get(*id))
            .map(|doc| doc.summary())
            .collect();

        attempt.advance(ShareState::Sending);
        let outcome = deliver(
            ShareMethod::Whatsapp,
            self.messaging.send(&phone, &summaries),
        )
        .await;

        complete(attempt, store, documents, phone, outcome)
    }
}

fn check_targets(store: &Store, documents: &[DocumentId]) -> Result<()> {
    if documents.is_empty() {
        return Err(ValidationError::NoDocuments.into());
    }
    store.ensure_exists(documents)
}

/// Await a delivery, turning errors and panics into `Error::Delivery`
async fn deliver<F>(method: ShareMethod, send: F) -> Result<()>
where
    F: Future<Output = anyhow::Result<()>>,
{
    match AssertUnwindSafe(send).catch_unwind().await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(Error::Delivery {
            method,
            reason: format!("{:#}", e),
        }),
        Err(panic) => Err(Error::Delivery {
            method,
            reason: format!("delivery panicked: {}", panic_message(&*panic)),
        }),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}

fn complete(
    mut attempt: ShareAttempt,
    store: &mut Store,
    documents: Vec<DocumentId>,
    recipient: String,
    outcome: Result<()>,
) -> Result<ShareReceipt> {
    if let Err(e) = outcome {
        warn!(method = %attempt.method, error = %e, "Share delivery failed");
        return Err(attempt.fail(e));
    }

    let share = Share {
        with: recipient,
        method: attempt.method,
    };
    if let Err(e) = store.record_share(&documents, &share) {
        return Err(attempt.fail(e));
    }
    attempt.advance(ShareState::Succeeded);

    info!(
        method = %share.method,
        documents = documents.len(),
        "Shared documents"
    );

    Ok(ShareReceipt {
        method: share.method,
        recipient: share.with,
        documents,
        state: attempt.state,
    })
}
