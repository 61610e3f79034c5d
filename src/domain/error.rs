use std::io;

use thiserror::Error;

/// Library-wide error type for cleaner operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration or environment issue.
    #[error("{0}")]
    Configuration(String),

    /// Configuration file could not be found.
    #[error("Config file not found: {0}")]
    ConfigMissing(String),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    /// Storage backend is recognized but has no implementation.
    #[error("Unsupported storage backend '{0}'")]
    UnsupportedBackend(String),

    /// A storage operation failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The protected-path source could not be reached or decoded.
    #[error("Protected path source failed: {message}")]
    ProtectedSource { message: String, status: Option<u16> },

    /// Deletion list file is missing.
    #[error("Deletion list not found: {0}")]
    DeletionListMissing(String),

    /// A run-level safety check failed. Nothing was deleted.
    #[error("Suspicious conditions: {0}")]
    SuspiciousConditions(#[from] SuspiciousConditions),
}

impl AppError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }

    /// Provide an `io::ErrorKind`-like view for callers expecting legacy behavior.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            AppError::Io(err) => err.kind(),
            AppError::Configuration(_)
            | AppError::TomlParseError(_)
            | AppError::UnsupportedBackend(_)
            | AppError::SuspiciousConditions(_) => io::ErrorKind::InvalidInput,
            AppError::ConfigMissing(_) | AppError::DeletionListMissing(_) => {
                io::ErrorKind::NotFound
            }
            AppError::Storage(err) => err.kind(),
            AppError::ProtectedSource { .. } => io::ErrorKind::Other,
        }
    }
}

/// Fatal safety conditions detected by the sanity gate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SuspiciousConditions {
    /// The protected list is empty, most likely because it failed to load.
    #[error("protected path list is empty")]
    EmptyProtectedList,

    /// The cleanup root does not look like an unmerged area.
    #[error("cleanup root '{pfn}' (LFN '{lfn}') does not end with the unmerged area marker")]
    UnexpectedRoot { lfn: String, pfn: String },

    /// A deletion entry is not below the cleanup root.
    #[error("'{path}' is outside of cleanup root '{root}'")]
    OutsideCleanupRoot { path: String, root: String },

    /// A deletion entry would not read back from the list file unchanged.
    #[error("deletion list entry {path:?} does not survive a write and read unchanged")]
    UnfaithfulEntry { path: String },

    /// A deletion entry is protected or holds protected data.
    #[error("'{path}' (LFN '{lfn}') is protected or contains protected paths")]
    ProtectedEntry { path: String, lfn: String },
}

/// Errors reported by a storage backend for a single path.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{path}: no such file or directory")]
    NotFound { path: String },

    #[error("{path}: permission denied")]
    PermissionDenied { path: String },

    #[error("{path}: {details}")]
    Backend { path: String, details: String },
}

impl StorageError {
    /// Classify an I/O failure on `path`.
    pub fn from_io(path: &str, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => StorageError::NotFound { path: path.to_string() },
            io::ErrorKind::PermissionDenied => {
                StorageError::PermissionDenied { path: path.to_string() }
            }
            _ => StorageError::Backend { path: path.to_string(), details: err.to_string() },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }

    pub fn kind(&self) -> io::ErrorKind {
        match self {
            StorageError::NotFound { .. } => io::ErrorKind::NotFound,
            StorageError::PermissionDenied { .. } => io::ErrorKind::PermissionDenied,
            StorageError::Backend { .. } => io::ErrorKind::Other,
        }
    }
}
