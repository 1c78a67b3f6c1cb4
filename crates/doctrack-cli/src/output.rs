//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use serde::Serialize;

use doctrack_core::{Document, ShareReceipt, Stats};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a single document with all its metadata
    pub fn print_document(&self, doc: &Document) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:       {}", doc.id);
                println!("Name:     {}", doc.name);
                println!("Type:     {}", doc.type_label);
                println!("Category: {}", doc.document_type);
                println!("Owner:    {}", doc.owner_name);
                println!("Date:     {}", doc.date.format("%Y-%m-%d"));
                if !doc.size.is_empty() {
                    println!("Size:     {}", doc.size);
                }
                if !doc.tags.is_empty() {
                    println!("Tags:     {}", doc.tags.join(", "));
                }
                if let Some(renewal) = doc.renewal_date {
                    println!("Renewal:  {}", renewal.format("%Y-%m-%d"));
                }
                if let Some(ref share) = doc.shared {
                    println!("Shared:   {} via {}", share.with, share.method);
                }
            }
            OutputFormat::Json => print_json(doc),
            OutputFormat::Quiet => println!("{}", doc.id),
        }
    }

    /// Print a list of documents, one per line
    pub fn print_documents(&self, docs: &[&Document]) {
        match self.format {
            OutputFormat::Human => {
                if docs.is_empty() {
                    println!("No documents found.");
                    return;
                }
                for doc in docs {
                    let flags = format!(
                        "{}{}",
                        if doc.is_shared() { "S" } else { " " },
                        if doc.needs_renewal() { "R" } else { " " }
                    );
                    println!(
                        "{:>4} {} | {:<30} | {:<8} | {:<20} | {}",
                        doc.id,
                        flags,
                        truncate(&doc.name, 30),
                        doc.document_type,
                        truncate(&doc.owner_name, 20),
                        doc.date.format("%Y-%m-%d")
                    );
                }
                println!("\n{} document(s)", docs.len());
            }
            OutputFormat::Json => print_json(&docs),
            OutputFormat::Quiet => {
                for doc in docs {
                    println!("{}", doc.id);
                }
            }
        }
    }

    /// Print collection statistics
    pub fn print_stats(&self, stats: &Stats) {
        match self.format {
            OutputFormat::Human => {
                println!("Total documents:  {}", stats.total);
                println!("  Personal:       {}", stats.personal);
                println!("  Company:        {}", stats.company);
                println!("  Director:       {}", stats.director);
                println!("Recent (7 days):  {}", stats.recent);
                println!("Shared:           {}", stats.shared);
                println!("Needs renewal:    {}", stats.needs_renewal);
            }
            OutputFormat::Json => print_json(stats),
            OutputFormat::Quiet => println!("{}", stats.total),
        }
    }

    /// Print a list of tags
    pub fn print_tags(&self, tags: &[(String, usize)]) {
        match self.format {
            OutputFormat::Human => {
                if tags.is_empty() {
                    println!("No tags found.");
                    return;
                }
                for (name, count) in tags {
                    println!("{} ({})", name, count);
                }
                println!("\n{} tag(s)", tags.len());
            }
            OutputFormat::Json => {
                let json_tags: Vec<_> = tags
                    .iter()
                    .map(|(name, count)| serde_json::json!({"name": name, "count": count}))
                    .collect();
                print_json(&json_tags);
            }
            OutputFormat::Quiet => {
                for (name, _) in tags {
                    println!("{}", name);
                }
            }
        }
    }

    /// Print the outcome of a completed share
    pub fn print_receipt(&self, receipt: &ShareReceipt) {
        match self.format {
            OutputFormat::Human => {
                let ids: Vec<String> = receipt.documents.iter().map(|id| id.to_string()).collect();
                println!(
                    "✓ Shared {} document(s) with {} via {}: {}",
                    receipt.documents.len(),
                    receipt.recipient,
                    receipt.method,
                    ids.join(", ")
                );
            }
            OutputFormat::Json => print_json(receipt),
            OutputFormat::Quiet => {}
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: failed to encode JSON output: {}", e),
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("Überweisung-März.pdf", 10), "Überwei...");
    }
}
