//! Share command handlers

use anyhow::Result;

use doctrack_core::{
    DocumentId, EmailPayload, ShareCoordinator, ShareRequest, SnapshotPersistence, Store,
    WhatsappPayload,
};

use crate::output::Output;

/// Email documents to a recipient
pub async fn email(
    store: &mut Store,
    persistence: &SnapshotPersistence,
    coordinator: &ShareCoordinator,
    ids: Vec<DocumentId>,
    payload: EmailPayload,
    output: &Output,
) -> Result<()> {
    run(
        store,
        persistence,
        coordinator,
        ShareRequest::email(ids, payload),
        output,
    )
    .await
}

/// Send documents to a WhatsApp number
pub async fn whatsapp(
    store: &mut Store,
    persistence: &SnapshotPersistence,
    coordinator: &ShareCoordinator,
    ids: Vec<DocumentId>,
    payload: WhatsappPayload,
    output: &Output,
) -> Result<()> {
    run(
        store,
        persistence,
        coordinator,
        ShareRequest::whatsapp(ids, payload),
        output,
    )
    .await
}

async fn run(
    store: &mut Store,
    persistence: &SnapshotPersistence,
    coordinator: &ShareCoordinator,
    request: ShareRequest,
    output: &Output,
) -> Result<()> {
    let receipt = coordinator.share(store, request).await?;
    persistence.save(store)?;
    output.print_receipt(&receipt);
    Ok(())
}
