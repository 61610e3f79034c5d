//! Storage backend port definition.

use crate::domain::{EntryKind, EntryStat, StorageError};

/// Primitive operations the cleaner needs from a storage system.
///
/// All paths are absolute namespace paths as understood by the backend.
pub trait StorageBackend {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Names of the direct children of a directory, in no particular order.
    fn list_children(&self, path: &str) -> Result<Vec<String>, StorageError>;

    /// Kind, size and modification time of `path` in one call.
    ///
    /// Symbolic links count as files.
    fn stat(&self, path: &str) -> Result<EntryStat, StorageError>;

    /// Whether `path` is a directory or a file.
    fn entry_kind(&self, path: &str) -> Result<EntryKind, StorageError> {
        Ok(self.stat(path)?.kind)
    }

    /// Size of a file in bytes.
    fn size(&self, path: &str) -> Result<u64, StorageError> {
        Ok(self.stat(path)?.size)
    }

    /// Modification time in unix seconds.
    fn mtime(&self, path: &str) -> Result<i64, StorageError> {
        Ok(self.stat(path)?.mtime)
    }

    /// Delete a file or a whole directory tree.
    ///
    /// Deleting a path that does not exist succeeds.
    fn delete(&self, path: &str) -> Result<(), StorageError>;

    /// Remove a directory only if it is empty.
    ///
    /// Returns `Ok(false)` when the directory is not empty or does not exist.
    fn remove_empty_dir(&self, path: &str) -> Result<bool, StorageError>;
}

impl<T: StorageBackend + ?Sized> StorageBackend for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn list_children(&self, path: &str) -> Result<Vec<String>, StorageError> {
        (**self).list_children(path)
    }

    fn stat(&self, path: &str) -> Result<EntryStat, StorageError> {
        (**self).stat(path)
    }

    fn delete(&self, path: &str) -> Result<(), StorageError> {
        (**self).delete(path)
    }

    fn remove_empty_dir(&self, path: &str) -> Result<bool, StorageError> {
        (**self).remove_empty_dir(path)
    }
}
