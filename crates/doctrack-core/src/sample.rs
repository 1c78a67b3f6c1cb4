//! Demonstration documents for `doctrack init --sample`.

use chrono::NaiveDate;

use crate::models::{Document, DocumentId, DocumentType, Share, ShareMethod};
use crate::store::Snapshot;

struct Seed {
    name: &'static str,
    type_label: &'static str,
    document_type: DocumentType,
    owner_name: &'static str,
    date: (i32, u32, u32),
    tags: &'static [&'static str],
    size: &'static str,
    renewal: Option<(i32, u32, u32)>,
    shared: Option<(&'static str, ShareMethod)>,
}

const SEEDS: &[Seed] = &[
    Seed {
        name: "Invoice-May2023.pdf",
        type_label: "Invoice",
        document_type: DocumentType::Company,
        owner_name: "Acme Corporation",
        date: (2023, 5, 15),
        tags: &["invoice", "important"],
        size: "1.2 MB",
        renewal: Some((2024, 5, 15)),
        shared: Some(("john@example.com", ShareMethod::Email)),
    },
    Seed {
        name: "Contract-2023.docx",
        type_label: "Contract",
        document_type: DocumentType::Company,
        owner_name: "XYZ Corporation",
        date: (2023, 4, 20),
        tags: &["contract", "legal"],
        size: "2.5 MB",
        renewal: Some((2024, 4, 20)),
        shared: Some(("1234567890", ShareMethod::Whatsapp)),
    },
    Seed {
        name: "Presentation.pptx",
        type_label: "Presentation",
        document_type: DocumentType::Director,
        owner_name: "Sarah Johnson",
        date: (2023, 3, 10),
        tags: &["presentation", "marketing"],
        size: "4.8 MB",
        renewal: None,
        shared: Some(("sarah@example.com", ShareMethod::Email)),
    },
    Seed {
        name: "Financial-Report.xlsx",
        type_label: "Report",
        document_type: DocumentType::Director,
        owner_name: "Michael Chen",
        date: (2023, 2, 28),
        tags: &["finance", "report"],
        size: "3.1 MB",
        renewal: None,
        shared: Some(("9876543210", ShareMethod::Whatsapp)),
    },
    Seed {
        name: "Project-Proposal.pdf",
        type_label: "Proposal",
        document_type: DocumentType::Personal,
        owner_name: "John Smith",
        date: (2023, 1, 15),
        tags: &["proposal", "project"],
        size: "1.8 MB",
        renewal: None,
        shared: None,
    },
    Seed {
        name: "Meeting-Minutes.docx",
        type_label: "Document",
        document_type: DocumentType::Company,
        owner_name: "Team Alpha",
        date: (2023, 6, 5),
        tags: &["meeting", "notes"],
        size: "0.9 MB",
        renewal: None,
        shared: None,
    },
    Seed {
        name: "Product-Catalog.pdf",
        type_label: "Catalog",
        document_type: DocumentType::Company,
        owner_name: "Sales Division",
        date: (2023, 5, 22),
        tags: &["catalog", "products"],
        size: "5.2 MB",
        renewal: None,
        shared: None,
    },
    Seed {
        name: "Employee-Handbook.pdf",
        type_label: "Manual",
        document_type: DocumentType::Director,
        owner_name: "Emma Wilson",
        date: (2023, 4, 10),
        tags: &["hr", "policy"],
        size: "2.7 MB",
        renewal: Some((2024, 4, 10)),
        shared: None,
    },
    Seed {
        name: "Tax-Return-2023.pdf",
        type_label: "Tax",
        document_type: DocumentType::Personal,
        owner_name: "David Brown",
        date: (2023, 3, 15),
        tags: &["tax", "finance", "personal"],
        size: "3.4 MB",
        renewal: Some((2024, 3, 15)),
        shared: None,
    },
    Seed {
        name: "Resume-2023.pdf",
        type_label: "Resume",
        document_type: DocumentType::Personal,
        owner_name: "Lisa Garcia",
        date: (2023, 2, 10),
        tags: &["resume", "personal"],
        size: "0.8 MB",
        renewal: None,
        shared: None,
    },
    Seed {
        name: "Board-Meeting-Minutes.docx",
        type_label: "Minutes",
        document_type: DocumentType::Director,
        owner_name: "Robert Taylor",
        date: (2023, 6, 10),
        tags: &["board", "minutes", "meeting"],
        size: "1.1 MB",
        renewal: None,
        shared: Some(("board@example.com", ShareMethod::Email)),
    },
    Seed {
        name: "Strategic-Plan-2023.pptx",
        type_label: "Plan",
        document_type: DocumentType::Director,
        owner_name: "Jennifer Lee",
        date: (2023, 5, 28),
        tags: &["strategy", "plan", "executive"],
        size: "6.3 MB",
        renewal: Some((2024, 5, 28)),
        shared: None,
    },
];

fn ymd((y, m, d): (i32, u32, u32)) -> NaiveDate {
    // Seed dates are literals checked by the tests below
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

/// Snapshot holding the demonstration documents, ids 1 through 12
pub fn sample_snapshot() -> Snapshot {
    let documents: Vec<Document> = SEEDS
        .iter()
        .zip(1u64..)
        .map(|(seed, id)| Document {
            id: DocumentId(id),
            name: seed.name.to_string(),
            type_label: seed.type_label.to_string(),
            document_type: seed.document_type,
            owner_name: seed.owner_name.to_string(),
            date: ymd(seed.date),
            tags: seed.tags.iter().map(|t| t.to_string()).collect(),
            size: seed.size.to_string(),
            renewal_date: seed.renewal.map(ymd),
            shared: seed.shared.map(|(with, method)| Share {
                with: with.to_string(),
                method,
            }),
        })
        .collect();

    Snapshot {
        next_id: documents.len() as u64 + 1,
        documents,
    }
}
