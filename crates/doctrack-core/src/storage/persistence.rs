//! Snapshot persistence
//!
//! Saves and loads the document store and login session as JSON files.
//! Uses atomic writes (write to temp file, then rename) to prevent corruption.
//!
//! Storage location: `~/.local/share/doctrack/` (configurable via `Config`)
//!
//! Files:
//! - `documents.json` - The store snapshot
//! - `session.json` - The current login session, removed at logout

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use super::error::{StorageError, StorageResult};
use crate::clock::Clock;
use crate::config::Config;
use crate::session::Session;
use crate::store::{Snapshot, Store};

/// Persistence layer for the document store
///
/// Sits outside the store: the store itself stays purely in-memory.
pub struct SnapshotPersistence {
    config: Config,
}

impl SnapshotPersistence {
    /// Create a new persistence handler with the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check if a snapshot exists on disk
    pub fn exists(&self) -> bool {
        self.config.documents_path().exists()
    }

    /// Load the snapshot from disk
    ///
    /// Returns `None` if the file doesn't exist. An unparseable file is
    /// copied aside to `documents.json.corrupt.backup` before failing.
    pub fn load(&self) -> StorageResult<Option<Snapshot>> {
        read_json(&self.config.documents_path())
    }

    /// Load the store, starting empty when nothing has been saved yet
    pub fn load_store(&self, clock: Arc<dyn Clock>) -> StorageResult<Store> {
        match self.load()? {
            Some(snapshot) => Store::from_snapshot(snapshot, clock).map_err(|source| {
                StorageError::InvalidSnapshot {
                    path: self.config.documents_path(),
                    source,
                }
            }),
            None => Ok(Store::with_clock(clock)),
        }
    }

    /// Save the store using atomic write
    pub fn save(&self, store: &Store) -> StorageResult<()> {
        let path = self.config.documents_path();
        let bytes = serde_json::to_vec_pretty(&store.snapshot())?;
        atomic_write(&path, &bytes)?;
        info!(documents = store.len(), path = ?path, "Saved document snapshot");
        Ok(())
    }

    /// Load the saved session, or an anonymous one
    pub fn load_session(&self) -> StorageResult<Session> {
        Ok(read_json(&self.config.session_path())?.unwrap_or_default())
    }

    /// Persist the session
    pub fn save_session(&self, session: &Session) -> StorageResult<()> {
        let bytes = serde_json::to_vec_pretty(session)?;
        atomic_write(&self.config.session_path(), &bytes)
    }

    /// Remove the saved session
    pub fn clear_session(&self) -> StorageResult<()> {
        let path = self.config.session_path();
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::from_io(e, path)),
        }
    }
}

/// Read and parse a JSON file, `None` if it doesn't exist
fn read_json<T: DeserializeOwned>(path: &Path) -> StorageResult<Option<T>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(StorageError::Read {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            let backup_path = backup_path(path);
            warn!(path = ?path, backup = ?backup_path, error = %e, "Unreadable file, backing up");
            fs::copy(path, &backup_path)
                .map_err(|source| StorageError::from_io(source, backup_path.clone()))?;
            Err(StorageError::CorruptSnapshot {
                path: path.to_path_buf(),
                backup_path,
                details: e.to_string(),
            })
        }
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".corrupt.backup");
    PathBuf::from(name)
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// This ensures the target file is never left in a partially-written state.
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    // Temp file in the same directory so the rename stays on one filesystem
    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_io(e, temp_path.clone()))?;
    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;
    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|source| StorageError::Rename {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::config::AuthConfig;
    use crate::models::{DocumentInput, DocumentType};
    use crate::session::{hash_password, Credentials};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> Config {
        Config {
            data_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        }
    }

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()))
    }

    #[test]
    fn test_missing_snapshot_gives_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = SnapshotPersistence::new(test_config(&temp_dir));

        assert!(!persistence.exists());
        let store = persistence.load_store(clock()).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_and_load_store() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = SnapshotPersistence::new(test_config(&temp_dir));

        let mut store = Store::with_clock(clock());
        store
            .add(
                DocumentInput::new("Tax-Return.pdf", DocumentType::Personal, "David")
                    .with_tags(["tax", "finance"]),
            )
            .unwrap();
        persistence.save(&store).unwrap();
        assert!(persistence.exists());
        assert!(!temp_dir.path().join("documents.tmp").exists());

        let mut loaded = persistence.load_store(clock()).unwrap();
        assert_eq!(loaded.all(), store.all());

        let next = loaded
            .add(DocumentInput::new("Next.pdf", DocumentType::Company, "Acme"))
            .unwrap();
        assert_eq!(next.id.0, 2);
    }

    #[test]
    fn test_corrupt_snapshot_is_backed_up() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        fs::write(config.documents_path(), b"{ not json").unwrap();

        let persistence = SnapshotPersistence::new(config.clone());
        let err = persistence.load_store(clock()).unwrap_err();

        match err {
            StorageError::CorruptSnapshot { backup_path, .. } => {
                assert!(backup_path.exists());
                assert!(backup_path.to_string_lossy().ends_with("documents.json.corrupt.backup"));
            }
            other => panic!("expected CorruptSnapshot, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_snapshot_contents() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let mut store = Store::with_clock(clock());
        store
            .add(DocumentInput::new("a", DocumentType::Company, "Acme"))
            .unwrap();
        let mut snapshot = store.snapshot();
        snapshot.documents.push(snapshot.documents[0].clone());
        fs::write(
            config.documents_path(),
            serde_json::to_vec(&snapshot).unwrap(),
        )
        .unwrap();

        let err = SnapshotPersistence::new(config)
            .load_store(clock())
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidSnapshot { .. }));
    }

    #[test]
    fn test_snapshot_with_max_id_is_invalid() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let mut store = Store::with_clock(clock());
        store
            .add(DocumentInput::new("a", DocumentType::Company, "Acme"))
            .unwrap();
        let mut snapshot = store.snapshot();
        snapshot.documents[0].id = crate::models::DocumentId(u64::MAX);
        fs::write(
            config.documents_path(),
            serde_json::to_vec(&snapshot).unwrap(),
        )
        .unwrap();

        let err = SnapshotPersistence::new(config)
            .load_store(clock())
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidSnapshot { .. }));
    }

    #[test]
    fn test_session_lifecycle() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = SnapshotPersistence::new(test_config(&temp_dir));

        assert!(!persistence.load_session().unwrap().is_logged_in());

        let auth = AuthConfig {
            username: Some("admin".to_string()),
            password_hash: Some(hash_password("pw").unwrap()),
        };
        let mut session = Session::anonymous();
        session.login(&Credentials::new("admin", "pw"), &auth).unwrap();
        persistence.save_session(&session).unwrap();

        assert_eq!(persistence.load_session().unwrap(), session);

        persistence.clear_session().unwrap();
        assert!(!persistence.load_session().unwrap().is_logged_in());

        // Clearing twice is fine
        persistence.clear_session().unwrap();
    }
}
