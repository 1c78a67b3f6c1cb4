//! doctrack CLI
//!
//! Command-line interface for doctrack - categorized document tracking
//! with email and WhatsApp sharing.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use doctrack_core::{
    AuthGate, Clock, Config, DocumentId, DocumentInput, DocumentType, EmailPayload,
    SnapshotPersistence, StorageError, Store, SystemClock, WhatsappPayload,
};

mod commands;
mod delivery;
mod output;

use output::{Output, OutputFormat};

/// Type label used when `add` is not given one
const DEFAULT_TYPE_LABEL: &str = "Document";

#[derive(Parser)]
#[command(name = "doctrack")]
#[command(about = "doctrack - Track personal, company and director documents")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and an empty (or sample) document store
    Init {
        /// Seed the store with demonstration documents
        #[arg(long)]
        sample: bool,
        /// Replace an existing store
        #[arg(long)]
        force: bool,
    },
    /// Log in as the configured user
    Login {
        username: String,
        /// Password (prompted on stdin if omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// End the current session
    Logout,
    /// Print an argon2 hash for the auth.password_hash setting
    HashPassword {
        /// Password (prompted on stdin if omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Add a document
    Add {
        /// File name, e.g. Invoice-May2023.pdf
        name: String,
        /// personal, company or director
        #[arg(short, long)]
        category: DocumentType,
        /// Person or company the document belongs to
        #[arg(short, long)]
        owner: String,
        /// Free-form type label, e.g. Invoice
        #[arg(long = "type", value_name = "LABEL")]
        type_label: Option<String>,
        /// Tags to add
        #[arg(short, long)]
        tag: Vec<String>,
        /// Human-readable size, e.g. "1.2 MB"
        #[arg(long)]
        size: Option<String>,
        /// Renewal date (YYYY-MM-DD)
        #[arg(long)]
        renewal: Option<NaiveDate>,
    },
    /// List documents
    #[command(alias = "ls")]
    List {
        /// Filter by category
        #[arg(short, long)]
        category: Option<DocumentType>,
        /// Filter by tag
        #[arg(short, long)]
        tag: Option<String>,
    },
    /// Show document details
    Show { id: DocumentId },
    /// Show collection statistics
    Stats,
    /// List the most recently added documents
    Recent {
        /// How many to show (defaults to recent_limit)
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// List shared documents
    Shared,
    /// List documents with a renewal date
    Renewals,
    /// List all tags
    Tags,
    /// Share documents by email or WhatsApp
    Share {
        #[command(subcommand)]
        command: ShareCommands,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum ShareCommands {
    /// Email documents to a recipient
    Email {
        /// Document IDs
        #[arg(required = true)]
        ids: Vec<DocumentId>,
        #[arg(long)]
        to: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        message: String,
    },
    /// Send documents to a WhatsApp number
    Whatsapp {
        /// Document IDs
        #[arg(required = true)]
        ids: Vec<DocumentId>,
        /// Phone number with country code
        #[arg(long)]
        phone: String,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, log_file, recent_limit, delivery.mode, ...)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {:#}", e);
        if let Some(hint) = storage_hint(&e) {
            eprintln!("Hint: {}", hint);
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config and password hashing work without a loaded configuration
    match cli.command {
        Commands::Config { command } => {
            return handle_config_command(command, config_path, &output);
        }
        Commands::HashPassword { password } => return commands::session::hash(password),
        _ => {}
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    init_logging(&config);
    debug!(data_dir = ?config.data_dir, "Loaded configuration");

    let persistence = SnapshotPersistence::new(config.clone());

    // Commands that don't pass the auth gate up front
    match cli.command {
        Commands::Init { sample, force } => {
            let gate = AuthGate::new(config.auth.clone());
            return commands::init::run(&persistence, &gate, sample, force, &output);
        }
        Commands::Login { username, password } => {
            return commands::session::login(&config, &persistence, username, password, &output);
        }
        Commands::Logout => return commands::session::logout(&persistence, &output),
        _ => {}
    }

    let gate = AuthGate::new(config.auth.clone());
    gate.require(&persistence.load_session()?)?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let mut store = persistence.load_store(clock)?;

    match cli.command {
        Commands::Add {
            name,
            category,
            owner,
            type_label,
            tag,
            size,
            renewal,
        } => {
            let mut input = DocumentInput::new(name, category, owner)
                .with_type_label(type_label.unwrap_or_else(|| DEFAULT_TYPE_LABEL.to_string()))
                .with_tags(tag)
                .with_size(size.unwrap_or_default());
            if let Some(date) = renewal {
                input = input.with_renewal(date);
            }
            commands::document::add(&mut store, &persistence, input, &output)
        }
        Commands::List { category, tag } => {
            commands::document::list(&store, category, tag, &output)
        }
        Commands::Show { id } => commands::document::show(&store, id, &output),
        Commands::Stats => commands::stats::show(&store, &output),
        Commands::Recent { limit } => {
            commands::stats::recent(&store, limit.unwrap_or(config.recent_limit), &output)
        }
        Commands::Shared => commands::stats::shared(&store, &output),
        Commands::Renewals => commands::stats::renewals(&store, &output),
        Commands::Tags => commands::tag::list(&store, &output),
        Commands::Share { command } => {
            handle_share_command(command, &config, &mut store, &persistence, &output).await
        }
        Commands::Init { .. }
        | Commands::Login { .. }
        | Commands::Logout
        | Commands::HashPassword { .. }
        | Commands::Config { .. } => unreachable!(), // Handled above
    }
}

async fn handle_share_command(
    command: ShareCommands,
    config: &Config,
    store: &mut Store,
    persistence: &SnapshotPersistence,
    output: &Output,
) -> Result<()> {
    let coordinator = delivery::coordinator_for(config);

    match command {
        ShareCommands::Email {
            ids,
            to,
            subject,
            message,
        } => {
            let payload = EmailPayload::new(to, subject, message);
            commands::share::email(store, persistence, &coordinator, ids, payload, output).await
        }
        ShareCommands::Whatsapp { ids, phone } => {
            let payload = WhatsappPayload::new(phone);
            commands::share::whatsapp(store, persistence, &coordinator, ids, payload, output).await
        }
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Recovery advice for storage failures, wherever they sit in the chain
fn storage_hint(error: &anyhow::Error) -> Option<&'static str> {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<StorageError>())
        .and_then(StorageError::recovery_suggestion)
}

/// Initialize logging
///
/// Level comes from DOCTRACK_LOG (default: warn). Logs go to
/// config.log_file when set, stderr otherwise.
fn init_logging(config: &Config) {
    let log_level = std::env::var("DOCTRACK_LOG").unwrap_or_else(|_| "warn".to_string());
    let env_filter = EnvFilter::new(format!(
        "doctrack_core={},doctrack_cli={}",
        log_level, log_level
    ));

    let log_file = config.log_file.as_ref().and_then(|path| {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(file),
            Err(e) => {
                eprintln!("Warning: Could not open log file {:?}: {}", path, e);
                None
            }
        }
    });

    // Ignore the error if a subscriber is already installed
    let _ = match log_file {
        Some(file) => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init(),
        None => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init(),
    };

    info!(level = %log_level, "Logging initialized");
}
