use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};

use crate::domain::{EntryKind, EntryStat, StorageError, namespace};
use crate::ports::StorageBackend;

#[derive(Debug, Clone, Copy)]
struct MemoryEntry {
    kind: EntryKind,
    mtime: i64,
    size: u64,
}

/// In-memory storage backend for testing.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RefCell<BTreeMap<String, MemoryEntry>>,
    failing: RefCell<HashSet<String>>,
    pub deleted: RefCell<Vec<String>>,
    pub removed_dirs: RefCell<Vec<String>>,
    /// Every path passed to `stat`, in call order.
    pub stats: RefCell<Vec<String>>,
}

#[allow(dead_code)]
impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory and any missing ancestors.
    pub fn dir(self, path: &str, mtime: i64) -> Self {
        self.ensure_parents(path, mtime);
        self.entries
            .borrow_mut()
            .insert(path.to_string(), MemoryEntry { kind: EntryKind::Directory, mtime, size: 0 });
        self
    }

    /// Add a file and any missing ancestor directories.
    pub fn file(self, path: &str, mtime: i64, size: u64) -> Self {
        self.ensure_parents(path, mtime);
        self.entries
            .borrow_mut()
            .insert(path.to_string(), MemoryEntry { kind: EntryKind::File, mtime, size });
        self
    }

    /// Make every operation on `path` fail.
    pub fn failing(self, path: &str) -> Self {
        self.failing.borrow_mut().insert(path.to_string());
        self
    }

    pub fn exists(&self, path: &str) -> bool {
        self.entries.borrow().contains_key(path)
    }

    fn ensure_parents(&self, path: &str, mtime: i64) {
        let mut entries = self.entries.borrow_mut();
        let mut current = namespace::parent(path);
        while let Some(dir) = current {
            entries.entry(dir.to_string()).or_insert(MemoryEntry {
                kind: EntryKind::Directory,
                mtime,
                size: 0,
            });
            current = namespace::parent(dir);
        }
    }

    fn lookup(&self, path: &str) -> Result<MemoryEntry, StorageError> {
        if self.failing.borrow().contains(path) {
            return Err(StorageError::Backend {
                path: path.to_string(),
                details: "injected failure".to_string(),
            });
        }
        self.entries
            .borrow()
            .get(path)
            .copied()
            .ok_or_else(|| StorageError::NotFound { path: path.to_string() })
    }
}

impl StorageBackend for MemoryStorage {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn list_children(&self, path: &str) -> Result<Vec<String>, StorageError> {
        self.lookup(path)?;
        // Reverse order so callers cannot rely on listing order.
        let mut names: Vec<String> = self
            .entries
            .borrow()
            .keys()
            .filter(|key| namespace::parent(key) == Some(path))
            .filter_map(|key| key.rsplit('/').next().map(str::to_string))
            .collect();
        names.reverse();
        Ok(names)
    }

    fn stat(&self, path: &str) -> Result<EntryStat, StorageError> {
        let entry = self.lookup(path)?;
        self.stats.borrow_mut().push(path.to_string());
        Ok(EntryStat { kind: entry.kind, size: entry.size, mtime: entry.mtime })
    }

    fn delete(&self, path: &str) -> Result<(), StorageError> {
        if self.failing.borrow().contains(path) {
            return Err(StorageError::PermissionDenied { path: path.to_string() });
        }
        self.entries.borrow_mut().retain(|key, _| !namespace::is_at_or_below(key, path));
        self.deleted.borrow_mut().push(path.to_string());
        Ok(())
    }

    fn remove_empty_dir(&self, path: &str) -> Result<bool, StorageError> {
        if !self.exists(path) {
            return Ok(false);
        }
        if !self.list_children(path)?.is_empty() {
            return Ok(false);
        }
        self.entries.borrow_mut().remove(path);
        self.removed_dirs.borrow_mut().push(path.to_string());
        Ok(true)
    }
}
