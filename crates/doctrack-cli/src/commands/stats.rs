//! Statistics and derived listing handlers

use anyhow::Result;

use doctrack_core::Store;

use crate::output::Output;

/// Show collection statistics
pub fn show(store: &Store, output: &Output) -> Result<()> {
    output.print_stats(&store.stats());
    Ok(())
}

/// Most recently created documents, newest first
pub fn recent(store: &Store, limit: usize, output: &Output) -> Result<()> {
    output.print_documents(&store.recent_documents(limit));
    Ok(())
}

/// Documents that have been shared
pub fn shared(store: &Store, output: &Output) -> Result<()> {
    output.print_documents(&store.shared_documents());
    Ok(())
}

/// Documents with a renewal date
pub fn renewals(store: &Store, output: &Output) -> Result<()> {
    output.print_documents(&store.documents_needing_renewal());
    Ok(())
}
