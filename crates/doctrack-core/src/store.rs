//! Document store
//!
//! The `Store` owns the canonical, insertion-ordered collection of documents.
//! Documents enter only through [`Store::add`] (or a restored [`Snapshot`])
//! and afterwards change only when the share coordinator attaches sharing
//! metadata.
//!
//! ## Usage
//!
//! ```
//! use doctrack_core::{DocumentInput, DocumentType, Store};
//!
//! let mut store = Store::new();
//! let doc = store
//!     .add(DocumentInput::new("Lease.pdf", DocumentType::Company, "Acme Inc"))
//!     .unwrap();
//!
//! assert_eq!(store.by_type(DocumentType::Company).len(), 1);
//! assert_eq!(store.stats().total, 1);
//! # let _ = doc;
//! ```

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::models::{Document, DocumentId, DocumentInput, DocumentType, Share};
use crate::stats::{Aggregates, Stats};

/// Serializable image of a store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Next id the store will hand out
    pub next_id: u64,
    pub documents: Vec<Document>,
}

/// In-memory document store
pub struct Store {
    documents: Vec<Document>,
    next_id: u64,
    clock: Arc<dyn Clock>,
}

impl Store {
    /// Create an empty store dated by the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty store with a specific clock
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            documents: Vec::new(),
            next_id: 1,
            clock,
        }
    }

    /// Rebuild a store from a snapshot
    ///
    /// Rejects duplicate ids and documents whose renewal date precedes their
    /// creation date. The id counter always ends up above every restored id.
    pub fn from_snapshot(snapshot: Snapshot, clock: Arc<dyn Clock>) -> Result<Self> {
        let mut seen = HashSet::new();
        for doc in &snapshot.documents {
            if !seen.insert(doc.id) {
                return Err(Error::InvalidDocument(format!(
                    "duplicate document id {} in snapshot",
                    doc.id
                )));
            }
            doc.check_invariants()?;
        }

        let max_id = snapshot.documents.iter().map(|d| d.id.0).max().unwrap_or(0);
        let after_max = max_id.checked_add(1).ok_or_else(|| {
            Error::InvalidDocument(format!("document id {} leaves no room for new ids", max_id))
        })?;
        let next_id = snapshot.next_id.max(after_max);

        debug!(
            documents = snapshot.documents.len(),
            next_id, "Restored document store"
        );

        Ok(Self {
            documents: snapshot.documents,
            next_id,
            clock,
        })
    }

    /// Capture the current contents
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            next_id: self.next_id,
            documents: self.documents.clone(),
        }
    }

    /// Today's date according to the store's clock
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    // ==================== Document Operations ====================

    /// Add a new document, assigning a fresh id and today's date
    pub fn add(&mut self, input: DocumentInput) -> Result<Document> {
        let id = DocumentId(self.next_id);
        let next_id = self
            .next_id
            .checked_add(1)
            .ok_or_else(|| Error::InvalidDocument("document ids exhausted".to_string()))?;
        let doc = input.into_document(id, self.today());
        doc.check_invariants()?;

        self.next_id = next_id;
        self.documents.push(doc.clone());
        debug!(id = %doc.id, name = %doc.name, "Added document");
        Ok(doc)
    }

    /// Get a document by id
    pub fn get(&self, id: DocumentId) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    /// All documents in insertion order
    pub fn all(&self) -> &[Document] {
        &self.documents
    }

    /// Documents of one owning-entity category
    pub fn by_type(&self, document_type: DocumentType) -> Vec<&Document> {
        self.documents
            .iter()
            .filter(|d| d.document_type == document_type)
            .collect()
    }

    /// Documents carrying a tag
    pub fn by_tag(&self, tag: &str) -> Vec<&Document> {
        self.documents.iter().filter(|d| d.has_tag(tag)).collect()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    // ==================== Tag Operations ====================

    /// Every distinct tag with the number of documents carrying it, alphabetical
    pub fn tags_with_counts(&self) -> Vec<(String, usize)> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for doc in &self.documents {
            let unique: HashSet<&str> = doc.tags.iter().map(String::as_str).collect();
            for tag in unique {
                *counts.entry(tag).or_default() += 1;
            }
        }
        counts
            .into_iter()
            .map(|(tag, count)| (tag.to_string(), count))
            .collect()
    }

    // ==================== Aggregation ====================

    /// Read-only aggregation view over the current contents
    pub fn aggregates(&self) -> Aggregates<'_> {
        Aggregates::new(&self.documents, self.today())
    }

    pub fn stats(&self) -> Stats {
        self.aggregates().stats()
    }

    pub fn recent_documents(&self, limit: usize) -> Vec<&Document> {
        self.aggregates().recent_documents(limit)
    }

    pub fn shared_documents(&self) -> Vec<&Document> {
        self.aggregates().shared_documents()
    }

    pub fn documents_needing_renewal(&self) -> Vec<&Document> {
        self.aggregates().documents_needing_renewal()
    }

    // ==================== Sharing ====================

    /// Fail with `NotFound` for the first id the store does not hold
    pub(crate) fn ensure_exists(&self, ids: &[DocumentId]) -> Result<()> {
        match ids.iter().find(|id| self.get(**id).is_none()) {
            Some(missing) => Err(Error::NotFound(*missing)),
            None => Ok(()),
        }
    }

    /// Attach sharing metadata to every listed document
    ///
    /// Callers check existence first; the update is all-or-nothing.
    pub(crate) fn record_share(&mut self, ids: &[DocumentId], share: &Share) -> Result<()> {
        self.ensure_exists(ids)?;
        for doc in self.documents.iter_mut().filter(|d| ids.contains(&d.id)) {
            doc.shared = Some(share.clone());
        }
        Ok(())
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("documents", &self.documents.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}
