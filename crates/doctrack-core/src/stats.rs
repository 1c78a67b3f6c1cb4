//! Aggregation over the document store
//!
//! Every query re-derives its answer from the live collection, so results
//! always reflect the latest mutation.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{Document, DocumentType};

/// Days covered by the recent-documents window
pub const RECENT_WINDOW_DAYS: i64 = 7;

/// Default length of the recent-documents list
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Document counts for the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: usize,
    pub personal: usize,
    pub company: usize,
    pub director: usize,
    /// Created within the last [`RECENT_WINDOW_DAYS`] days
    pub recent: usize,
    pub shared: usize,
    pub needs_renewal: usize,
}

/// Borrowed query view over a slice of documents
#[derive(Debug, Clone, Copy)]
pub struct Aggregates<'a> {
    documents: &'a [Document],
    today: NaiveDate,
}

impl<'a> Aggregates<'a> {
    pub fn new(documents: &'a [Document], today: NaiveDate) -> Self {
        Self { documents, today }
    }

    /// Earliest creation date that still counts as recent
    ///
    /// A document dated exactly `RECENT_WINDOW_DAYS` ago has fallen out of
    /// the window; today and the six days before it are inside.
    pub fn recent_cutoff(&self) -> NaiveDate {
        self.today - Duration::days(RECENT_WINDOW_DAYS - 1)
    }

    pub fn stats(&self) -> Stats {
        let cutoff = self.recent_cutoff();
        let mut stats = Stats {
            total: self.documents.len(),
            ..Stats::default()
        };

        for doc in self.documents {
            match doc.document_type {
                DocumentType::Personal => stats.personal += 1,
                DocumentType::Company => stats.company += 1,
                DocumentType::Director => stats.director += 1,
            }
            if doc.date >= cutoff {
                stats.recent += 1;
            }
            if doc.is_shared() {
                stats.shared += 1;
            }
            if doc.needs_renewal() {
                stats.needs_renewal += 1;
            }
        }

        stats
    }

    /// Newest documents first, at most `limit` of them
    ///
    /// Documents created on the same day keep their insertion order.
    pub fn recent_documents(&self, limit: usize) -> Vec<&'a Document> {
        let mut docs: Vec<&Document> = self.documents.iter().collect();
        // sort_by is stable
        docs.sort_by(|a, b| b.date.cmp(&a.date));
        docs.truncate(limit);
        docs
    }

    pub fn shared_documents(&self) -> Vec<&'a Document> {
        self.documents.iter().filter(|d| d.is_shared()).collect()
    }

    pub fn documents_needing_renewal(&self) -> Vec<&'a Document> {
        self.documents.iter().filter(|d| d.needs_renewal()).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::clock::FixedClock;
    use crate::models::{DocumentId, DocumentInput, Share, ShareMethod};
    use crate::store::{Snapshot, Store};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2026, 10, 16)
    }

    fn doc(id: u64, name: &str, document_type: DocumentType, created: NaiveDate) -> Document {
        DocumentInput::new(name, document_type, "Owner").into_document(DocumentId(id), created)
    }

    fn store_with(documents: Vec<Document>) -> Store {
        Store::from_snapshot(
            Snapshot {
                next_id: 1,
                documents,
            },
            Arc::new(FixedClock(today())),
        )
        .unwrap()
    }

    #[test]
    fn test_empty_store_stats() {
        let store = store_with(Vec::new());
        assert_eq!(store.stats(), Stats::default());
        assert!(store.recent_documents(5).is_empty());
        assert!(store.shared_documents().is_empty());
        assert!(store.documents_needing_renewal().is_empty());
    }

    #[test]
    fn test_added_today_is_recent() {
        let mut store = Store::with_clock(Arc::new(FixedClock(today())));
        store
            .add(DocumentInput::new("id.pdf", DocumentType::Personal, "Jo"))
            .unwrap();

        let stats = store.stats();
        assert_eq!(stats.recent, 1);
        assert_eq!(stats.personal, 1);
        assert_eq!(stats.total, 1);
    }

    #[test]
    fn test_recent_window_boundary() {
        let store = store_with(vec![
            doc(1, "inside", DocumentType::Company, date(2026, 10, 10)),
            doc(2, "seven-days-ago", DocumentType::Company, date(2026, 10, 9)),
            doc(3, "future", DocumentType::Company, date(2026, 12, 1)),
        ]);

        assert_eq!(store.aggregates().recent_cutoff(), date(2026, 10, 10));
        assert_eq!(store.stats().recent, 2);

        let only_old = store_with(vec![doc(1, "old", DocumentType::Company, date(2026, 10, 9))]);
        assert_eq!(only_old.stats().recent, 0);
    }

    #[test]
    fn test_categories_partition_total() {
        let store = store_with(vec![
            doc(1, "a", DocumentType::Personal, today()),
            doc(2, "b", DocumentType::Company, today()),
            doc(3, "c", DocumentType::Company, today()),
            doc(4, "d", DocumentType::Director, today()),
        ]);

        let stats = store.stats();
        assert_eq!(stats.total, store.all().len());
        assert_eq!(stats.personal + stats.company + stats.director, stats.total);
        assert_eq!(stats.company, 2);
    }

    #[test]
    fn test_shared_and_renewal_counts() {
        let mut shared = doc(1, "shared", DocumentType::Company, date(2026, 1, 1));
        shared.shared = Some(Share {
            with: "a@example.com".to_string(),
            method: ShareMethod::Email,
        });
        let mut renew = doc(2, "renew", DocumentType::Director, date(2026, 1, 1));
        renew.renewal_date = Some(date(2027, 1, 1));
        let plain = doc(3, "plain", DocumentType::Personal, date(2026, 1, 1));

        let store = store_with(vec![shared, renew, plain]);
        let stats = store.stats();
        assert_eq!(stats.shared, 1);
        assert_eq!(stats.needs_renewal, 1);
        assert_eq!(store.shared_documents()[0].name, "shared");
        assert_eq!(store.documents_needing_renewal()[0].name, "renew");
    }

    #[test]
    fn test_recent_documents_ordering_and_ties() {
        let store = store_with(vec![
            doc(1, "old", DocumentType::Company, date(2026, 1, 1)),
            doc(2, "tie-first", DocumentType::Company, date(2026, 5, 1)),
            doc(3, "newest", DocumentType::Company, date(2026, 9, 1)),
            doc(4, "tie-second", DocumentType::Company, date(2026, 5, 1)),
        ]);

        let names: Vec<_> = store
            .recent_documents(10)
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["newest", "tie-first", "tie-second", "old"]);
    }

    #[test]
    fn test_recent_documents_limit() {
        let store = store_with(
            (1..=4)
                .map(|i| doc(i, &format!("d{i}"), DocumentType::Personal, today()))
                .collect(),
        );

        for n in 0..8 {
            assert_eq!(store.recent_documents(n).len(), n.min(4));
        }
        assert!(store.recent_documents(0).is_empty());
    }

    #[test]
    fn test_stats_serialize_camel_case() {
        let json = serde_json::to_value(Stats::default()).unwrap();
        assert!(json.get("needsRenewal").is_some());
        assert!(json.get("total").is_some());
    }
}
