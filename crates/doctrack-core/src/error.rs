//! Error types for `doctrack-core`.
//!
//! Every failure the core can produce is surfaced as a typed [`Error`]; the
//! core never logs an error and carries on by itself.

use thiserror::Error;

use crate::models::{DocumentId, ShareMethod};

/// A share request field that failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("recipient email address is required")]
    MissingRecipient,

    #[error("email subject is required")]
    MissingSubject,

    #[error("email message is required")]
    MissingMessage,

    #[error("phone number must contain at least one digit")]
    MissingPhoneNumber,

    #[error("at least one document must be selected")]
    NoDocuments,
}

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or missing share request fields; no delivery was attempted
    #[error("invalid share request: {0}")]
    Validation(#[from] ValidationError),

    /// The delivery capability reported failure; no document was changed
    #[error("{method} delivery failed: {reason}")]
    Delivery { method: ShareMethod, reason: String },

    #[error("document not found: {0}")]
    NotFound(DocumentId),

    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("not logged in. Run `doctrack login <username>` first.")]
    NotAuthenticated,

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("authentication is not configured (set auth.username and auth.password_hash)")]
    AuthNotConfigured,

    #[error("password hashing failed: {0}")]
    PasswordHash(String),
}

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Delivery,
    NotFound,
    InvalidDocument,
    Auth,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::Delivery { .. } => ErrorKind::Delivery,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::InvalidDocument(_) => ErrorKind::InvalidDocument,
            Error::NotAuthenticated
            | Error::InvalidCredentials
            | Error::AuthNotConfigured
            | Error::PasswordHash(_) => ErrorKind::Auth,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
