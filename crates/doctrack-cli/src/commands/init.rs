//! Init command handler

use std::sync::Arc;

use anyhow::Result;

use doctrack_core::{sample_snapshot, AuthGate, Clock, SnapshotPersistence, Store, SystemClock};

use crate::output::Output;

/// Create the document store, empty or seeded with sample documents
///
/// A first-time init needs no login. Replacing an existing store with
/// `--force` goes through the auth gate.
pub fn run(
    persistence: &SnapshotPersistence,
    gate: &AuthGate,
    sample: bool,
    force: bool,
    output: &Output,
) -> Result<()> {
    let documents_path = persistence.config().documents_path();

    if persistence.exists() {
        if !force {
            output.message(&format!(
                "Already initialized: {}\nUse --force to start over.",
                documents_path.display()
            ));
            return Ok(());
        }
        gate.require(&persistence.load_session()?)?;
    }

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store = if sample {
        Store::from_snapshot(sample_snapshot(), clock)?
    } else {
        Store::with_clock(clock)
    };
    persistence.save(&store)?;

    output.success(&format!(
        "Initialized {} with {} document(s)",
        documents_path.display(),
        store.len()
    ));
    Ok(())
}
