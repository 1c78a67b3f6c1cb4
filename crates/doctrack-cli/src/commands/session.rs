//! Login, logout and password hashing

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use doctrack_core::{hash_password, Config, Credentials, SnapshotPersistence};

use crate::output::Output;

/// Check credentials and keep the session for later commands
pub fn login(
    config: &Config,
    persistence: &SnapshotPersistence,
    username: String,
    password: Option<String>,
    output: &Output,
) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => prompt_password("Password: ")?,
    };

    let mut session = persistence.load_session()?;
    session.login(&Credentials::new(username.clone(), password), &config.auth)?;
    persistence.save_session(&session)?;

    output.success(&format!("Logged in as {}", username));
    Ok(())
}

/// End the saved session
pub fn logout(persistence: &SnapshotPersistence, output: &Output) -> Result<()> {
    let mut session = persistence.load_session()?;
    let was_logged_in = session.is_logged_in();
    session.logout();
    persistence.clear_session()?;

    if was_logged_in {
        output.success("Logged out");
    } else {
        output.message("Not logged in.");
    }
    Ok(())
}

/// Print an argon2 hash for the `auth.password_hash` setting
pub fn hash(password: Option<String>) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => prompt_password("Password to hash: ")?,
    };
    let hash = hash_password(&password)?;
    println!("{}", hash);
    Ok(())
}

/// Read one line from stdin, prompting on stderr
fn prompt_password(prompt: &str) -> Result<String> {
    eprint!("{}", prompt);
    io::stderr().flush()?;

    let mut input = String::new();
    io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read password")?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}
