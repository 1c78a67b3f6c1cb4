//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use doctrack_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "log_file": config.log_file,
                    "recent_limit": config.recent_limit,
                    "delivery": {
                        "mode": config.delivery.mode.to_string(),
                        "outbox": config.outbox_path(),
                    },
                    "auth": {
                        "username": config.auth.username,
                        "password_hash_set": config.auth.password_hash.is_some(),
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:           {}", config.data_dir.display());
            println!(
                "  log_file:           {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!("  recent_limit:       {}", config.recent_limit);
            println!("  delivery.mode:      {}", config.delivery.mode);
            println!("  delivery.outbox:    {}", config.outbox_path().display());
            println!(
                "  auth.username:      {}",
                config.auth.username.as_deref().unwrap_or("(not set, login disabled)")
            );
            println!(
                "  auth.password_hash: {}",
                if config.auth.password_hash.is_some() {
                    "(set)"
                } else {
                    "(not set)"
                }
            );
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply(&mut config, &key, &value)?;

    // Save to the CLI-specified path or default
    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    let shown = if key == "auth.password_hash" {
        "(hidden)"
    } else {
        value.as_str()
    };
    output.success(&format!("Set {} = {}", key, shown));

    Ok(())
}

fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => {
            config.data_dir = value.into();
        }
        "log_file" => {
            config.log_file = optional(value).map(PathBuf::from);
        }
        "recent_limit" => {
            config.recent_limit = value
                .parse()
                .context("Invalid value for recent_limit. Use a positive number.")?;
        }
        "delivery.mode" => {
            config.delivery.mode = value.parse()?;
        }
        "delivery.outbox" => {
            config.delivery.outbox = optional(value).map(PathBuf::from);
        }
        "auth.username" => {
            config.auth.username = optional(value).map(str::to_string);
        }
        "auth.password_hash" => {
            config.auth.password_hash = optional(value).map(str::to_string);
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, log_file, recent_limit, delivery.mode, \
                 delivery.outbox, auth.username, auth.password_hash",
                key
            );
        }
    }
    Ok(())
}

/// Empty or "none" clears an optional setting
fn optional(value: &str) -> Option<&str> {
    if value.is_empty() || value == "none" {
        None
    } else {
        Some(value)
    }
}
