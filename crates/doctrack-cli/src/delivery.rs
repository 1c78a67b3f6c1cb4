//! Delivery capabilities used by the CLI
//!
//! Neither implementation talks to a mail server or messaging gateway:
//! - `OutboxDelivery` appends each message to a JSON-lines file for another
//!   tool to pick up
//! - `LinkDelivery` opens a `mailto:` or `wa.me` link with the desktop handler

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use doctrack_core::{
    Config, DeliveryMode, DocumentSummary, EmailDelivery, MessagingDelivery, ShareCoordinator,
};

/// Build a share coordinator wired to the configured delivery mode
pub fn coordinator_for(config: &Config) -> ShareCoordinator {
    match config.delivery.mode {
        DeliveryMode::Outbox => {
            let outbox = OutboxDelivery::new(config.outbox_path());
            ShareCoordinator::new(outbox.clone(), outbox)
        }
        DeliveryMode::Link => ShareCoordinator::new(LinkDelivery, LinkDelivery),
    }
}

/// Message body as written to the outbox
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "channel", rename_all = "lowercase")]
pub enum OutboxMessage {
    Email {
        to: String,
        subject: String,
        body: String,
    },
    Whatsapp {
        phone: String,
        text: String,
        documents: Vec<DocumentSummary>,
    },
}

/// One line of the outbox file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboxEntry {
    pub queued_at: DateTime<Utc>,
    #[serde(flatten)]
    pub message: OutboxMessage,
}

/// Appends deliveries to a JSON-lines file
#[derive(Debug, Clone)]
pub struct OutboxDelivery {
    path: PathBuf,
}

impl OutboxDelivery {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn append(&self, message: OutboxMessage) -> Result<()> {
        let entry = OutboxEntry {
            queued_at: Utc::now(),
            message,
        };
        let mut line = serde_json::to_string(&entry).context("Failed to encode outbox entry")?;
        line.push('\n');

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create outbox directory: {:?}", parent))?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("Failed to open outbox: {:?}", self.path))?;
        file.write_all(line.as_bytes())
            .await
            .with_context(|| format!("Failed to write outbox: {:?}", self.path))?;
        file.flush().await?;

        info!(path = ?self.path, "Queued delivery in outbox");
        Ok(())
    }
}

#[async_trait]
impl EmailDelivery for OutboxDelivery {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        self.append(OutboxMessage::Email {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        })
        .await
    }
}

#[async_trait]
impl MessagingDelivery for OutboxDelivery {
    async fn send(&self, phone: &str, documents: &[DocumentSummary]) -> Result<()> {
        self.append(OutboxMessage::Whatsapp {
            phone: phone.to_string(),
            text: whatsapp_text(documents),
            documents: documents.to_vec(),
        })
        .await
    }
}

/// Opens share links with the system handler
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkDelivery;

impl LinkDelivery {
    async fn open(url: Url) -> Result<()> {
        debug!(scheme = url.scheme(), "Opening share link");
        let target = url.to_string();
        tokio::task::spawn_blocking(move || open::that(&target))
            .await
            .context("Link opener task failed")?
            .with_context(|| format!("Failed to open {} link", url.scheme()))?;
        Ok(())
    }
}

#[async_trait]
impl EmailDelivery for LinkDelivery {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        Self::open(mailto_url(to, subject, body)?).await
    }
}

#[async_trait]
impl MessagingDelivery for LinkDelivery {
    async fn send(&self, phone: &str, documents: &[DocumentSummary]) -> Result<()> {
        Self::open(whatsapp_url(phone, &whatsapp_text(documents))?).await
    }
}

/// `mailto:` link with subject and body prefilled
pub fn mailto_url(to: &str, subject: &str, body: &str) -> Result<Url> {
    let mut url = Url::parse(&format!("mailto:{}", to.trim()))
        .with_context(|| format!("Invalid email address: {}", to))?;
    url.query_pairs_mut()
        .append_pair("subject", subject)
        .append_pair("body", body);
    Ok(url)
}

/// `https://wa.me/<phone>?text=...` click-to-chat link
pub fn whatsapp_url(phone: &str, text: &str) -> Result<Url> {
    let mut url = Url::parse(&format!("https://wa.me/{}", phone))
        .with_context(|| format!("Invalid phone number: {}", phone))?;
    url.query_pairs_mut().append_pair("text", text);
    Ok(url)
}

/// Message text listing the shared documents
pub fn whatsapp_text(documents: &[DocumentSummary]) -> String {
    let mut text = String::from("Shared documents:");
    for doc in documents {
        text.push_str(&format!("\n- {} ({})", doc.name, doc.type_label));
    }
    text
}
