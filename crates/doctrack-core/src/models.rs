//! Data models for doctrack
//!
//! Defines the core data structures: Document, its owning-entity category,
//! and the sharing metadata attached after a successful share.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Store-assigned numeric document identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub u64);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DocumentId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .trim_start_matches('#')
            .parse()
            .map(DocumentId)
            .map_err(|_| Error::InvalidDocument(format!("not a document id: {:?}", s)))
    }
}

/// The kind of entity that owns a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    Personal,
    Company,
    Director,
}

impl DocumentType {
    pub const ALL: [DocumentType; 3] = [
        DocumentType::Personal,
        DocumentType::Company,
        DocumentType::Director,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Personal => "Personal",
            DocumentType::Company => "Company",
            DocumentType::Director => "Director",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::InvalidDocument(format!(
                    "unknown document type {:?} (expected Personal, Company or Director)",
                    s
                ))
            })
    }
}

/// Channel a document was shared through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareMethod {
    Email,
    Whatsapp,
}

impl ShareMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShareMethod::Email => "email",
            ShareMethod::Whatsapp => "whatsapp",
        }
    }
}

impl fmt::Display for ShareMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who a document was last shared with, and how
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    /// Recipient email address or normalized phone number
    pub with: String,
    pub method: ShareMethod,
}

/// A tracked document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    /// Display name, usually the file name
    pub name: String,
    /// Free-form type label ("Invoice", "Contract", ...)
    pub type_label: String,
    pub document_type: DocumentType,
    /// Person, company or director the document belongs to
    pub owner_name: String,
    /// Creation date, assigned by the store
    pub date: NaiveDate,
    pub tags: Vec<String>,
    /// Human-readable size ("1.2 MB")
    pub size: String,
    /// Date by which the document must be renewed, if it needs renewal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renewal_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared: Option<Share>,
}

impl Document {
    pub fn needs_renewal(&self) -> bool {
        self.renewal_date.is_some()
    }

    pub fn is_shared(&self) -> bool {
        self.shared.is_some()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            id: self.id,
            name: self.name.clone(),
            type_label: self.type_label.clone(),
            document_type: self.document_type,
        }
    }

    /// Check the renewal invariant against the creation date
    pub(crate) fn check_invariants(&self) -> Result<(), Error> {
        match self.renewal_date {
            Some(renewal) if renewal < self.date => Err(Error::InvalidDocument(format!(
                "renewal date {} precedes creation date {} for '{}'",
                renewal, self.date, self.name
            ))),
            _ => Ok(()),
        }
    }
}

/// Fields supplied by the caller when adding a document
///
/// The id and creation date are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentInput {
    pub name: String,
    pub type_label: String,
    pub document_type: DocumentType,
    pub owner_name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub renewal_date: Option<NaiveDate>,
}

impl DocumentInput {
    pub fn new(
        name: impl Into<String>,
        document_type: DocumentType,
        owner_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            type_label: String::new(),
            document_type,
            owner_name: owner_name.into(),
            tags: Vec::new(),
            size: String::new(),
            renewal_date: None,
        }
    }

    pub fn with_type_label(mut self, label: impl Into<String>) -> Self {
        self.type_label = label.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = size.into();
        self
    }

    pub fn with_renewal(mut self, date: NaiveDate) -> Self {
        self.renewal_date = Some(date);
        self
    }

    pub(crate) fn into_document(self, id: DocumentId, date: NaiveDate) -> Document {
        Document {
            id,
            name: self.name,
            type_label: self.type_label,
            document_type: self.document_type,
            owner_name: self.owner_name,
            date,
            tags: self.tags,
            size: self.size,
            renewal_date: self.renewal_date,
            shared: None,
        }
    }
}

/// Document metadata handed to the messaging capability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: DocumentId,
    pub name: String,
    pub type_label: String,
    pub document_type: DocumentType,
}
