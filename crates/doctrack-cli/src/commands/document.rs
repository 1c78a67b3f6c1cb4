//! Document command handlers

use anyhow::{Context, Result};

use doctrack_core::{DocumentId, DocumentInput, DocumentType, SnapshotPersistence, Store};

use crate::output::Output;

/// Add a document and save the store
pub fn add(
    store: &mut Store,
    persistence: &SnapshotPersistence,
    input: DocumentInput,
    output: &Output,
) -> Result<()> {
    let doc = store.add(input).context("Failed to add document")?;
    persistence.save(store)?;

    output.success(&format!("Added document #{}", doc.id));
    output.print_document(&doc);
    Ok(())
}

/// List documents, optionally narrowed by category and tag
pub fn list(
    store: &Store,
    category: Option<DocumentType>,
    tag: Option<String>,
    output: &Output,
) -> Result<()> {
    let docs: Vec<_> = match category {
        Some(document_type) => store.by_type(document_type),
        None => store.all().iter().collect::<Vec<_>>(),
    }
    .into_iter()
    .filter(|doc| tag.as_deref().map_or(true, |t| doc.has_tag(t)))
    .collect();

    output.print_documents(&docs);
    Ok(())
}

/// Show a single document
pub fn show(store: &Store, id: DocumentId, output: &Output) -> Result<()> {
    let doc = store
        .get(id)
        .ok_or_else(|| anyhow::anyhow!("Document not found: {}", id))?;

    output.print_document(doc);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use doctrack_core::Config;
    use tempfile::TempDir;

    #[test]
    fn test_add_saves_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = SnapshotPersistence::new(Config {
            data_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        });
        let output = Output::new(OutputFormat::Quiet);
        let mut store = Store::new();

        add(
            &mut store,
            &persistence,
            DocumentInput::new("Lease.pdf", DocumentType::Company, "Acme"),
            &output,
        )
        .unwrap();

        assert!(persistence.exists());
        assert_eq!(persistence.load().unwrap().unwrap().documents.len(), 1);
    }

    #[test]
    fn test_show_unknown_id() {
        let output = Output::new(OutputFormat::Quiet);
        let err = show(&Store::new(), DocumentId(9), &output).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
