//! Errors from reading and writing the snapshot and session files.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to create data directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Permission denied on '{path}'")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No space left while writing '{path}'")]
    DiskFull {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not valid JSON for its type; a copy sits at `backup_path`
    #[error("'{path}' is unreadable ({details}); copied to '{backup_path}'")]
    CorruptSnapshot {
        path: PathBuf,
        backup_path: PathBuf,
        details: String,
    },

    /// Parsed fine, but the documents break a store invariant
    #[error("Snapshot '{path}' holds invalid documents: {source}")]
    InvalidSnapshot {
        path: PathBuf,
        #[source]
        source: crate::error::Error,
    },

    #[error("Failed to encode JSON: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to move '{from}' into place at '{to}': {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    /// Wrap an I/O failure on `path`, picking out permission and disk-full cases
    pub fn from_io(error: io::Error, path: PathBuf) -> Self {
        if error.kind() == io::ErrorKind::PermissionDenied {
            StorageError::PermissionDenied {
                path,
                source: error,
            }
        } else if is_disk_full(&error) {
            StorageError::DiskFull {
                path,
                source: error,
            }
        } else {
            StorageError::Write {
                path,
                source: error,
            }
        }
    }

    /// What the user can do about it, when there is something to do
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            StorageError::DiskFull { .. } => Some("Free up disk space and run the command again."),
            StorageError::PermissionDenied { .. } | StorageError::CreateDirectory { .. } => {
                Some("Check permissions on the doctrack data directory (see `doctrack config show`).")
            }
            StorageError::CorruptSnapshot { .. } => Some(
                "The unreadable file was backed up. Repair it, or run `doctrack init --force` to start over.",
            ),
            StorageError::InvalidSnapshot { .. } => {
                Some("Fix the listed document in documents.json, or run `doctrack init --force`.")
            }
            _ => None,
        }
    }
}

// ENOSPC (28) and EDQUOT (122) on Unix; ERROR_DISK_FULL (112) on Windows
fn is_disk_full(error: &io::Error) -> bool {
    match error.raw_os_error() {
        Some(code) if cfg!(windows) => code == 112,
        Some(code) => code == 28 || code == 122,
        None => error.to_string().to_lowercase().contains("no space left"),
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_classification() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err = StorageError::from_io(io_err, PathBuf::from("/data/documents.json"));

        assert!(matches!(err, StorageError::PermissionDenied { .. }));
        assert!(err.recovery_suggestion().is_some());
    }

    #[test]
    fn test_disk_full_detection() {
        let errno = if cfg!(windows) { 112 } else { 28 };
        let err = StorageError::from_io(
            io::Error::from_raw_os_error(errno),
            PathBuf::from("/full/disk"),
        );
        assert!(matches!(err, StorageError::DiskFull { .. }));

        let err = StorageError::from_io(
            io::Error::new(io::ErrorKind::Other, "No space left on device"),
            PathBuf::from("/full/disk"),
        );
        assert!(matches!(err, StorageError::DiskFull { .. }));
    }

    #[test]
    fn test_other_io_is_write_error() {
        let io_err = io::Error::new(io::ErrorKind::Other, "device busy");
        let err = StorageError::from_io(io_err, PathBuf::from("/busy"));

        assert!(matches!(err, StorageError::Write { .. }));
        assert!(err.recovery_suggestion().is_none());
    }

    #[test]
    fn test_corrupt_snapshot_message() {
        let err = StorageError::CorruptSnapshot {
            path: PathBuf::from("/data/documents.json"),
            backup_path: PathBuf::from("/data/documents.json.corrupt.backup"),
            details: "expected value at line 1".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("unreadable"));
        assert!(msg.contains("corrupt.backup"));
        assert!(err.recovery_suggestion().unwrap().contains("backed up"));
    }
}
