//! Storage backend for locally mounted POSIX filesystems.

use std::fs;
use std::io;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::{EntryKind, EntryStat, StorageError};
use crate::ports::StorageBackend;

/// POSIX filesystem storage. Symbolic links are never followed.
#[derive(Debug, Clone, Copy, Default)]
pub struct PosixStorage;

impl PosixStorage {
    pub fn new() -> Self {
        Self
    }

    fn metadata(&self, path: &str) -> Result<fs::Metadata, StorageError> {
        fs::symlink_metadata(path).map_err(|e| StorageError::from_io(path, e))
    }
}

fn unix_seconds(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(since) => i64::try_from(since.as_secs()).unwrap_or(i64::MAX),
        Err(before) => -i64::try_from(before.duration().as_secs()).unwrap_or(i64::MAX),
    }
}

impl StorageBackend for PosixStorage {
    fn name(&self) -> &'static str {
        "posix"
    }

    fn list_children(&self, path: &str) -> Result<Vec<String>, StorageError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(path).map_err(|e| StorageError::from_io(path, e))? {
            let entry = entry.map_err(|e| StorageError::from_io(path, e))?;
            let name = entry.file_name().into_string().map_err(|raw| StorageError::Backend {
                path: path.to_string(),
                details: format!("entry name is not valid UTF-8: {:?}", raw),
            })?;
            names.push(name);
        }
        Ok(names)
    }

    fn stat(&self, path: &str) -> Result<EntryStat, StorageError> {
        let metadata = self.metadata(path)?;
        let modified = metadata.modified().map_err(|e| StorageError::from_io(path, e))?;
        Ok(EntryStat {
            kind: if metadata.is_dir() { EntryKind::Directory } else { EntryKind::File },
            size: metadata.len(),
            mtime: unix_seconds(modified),
        })
    }

    fn delete(&self, path: &str) -> Result<(), StorageError> {
        let metadata = match fs::symlink_metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(StorageError::from_io(path, e)),
        };

        let result =
            if metadata.is_dir() { fs::remove_dir_all(path) } else { fs::remove_file(path) };
        match result {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::from_io(path, e)),
        }
    }

    fn remove_empty_dir(&self, path: &str) -> Result<bool, StorageError> {
        match fs::remove_dir(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) if e.kind() == io::ErrorKind::DirectoryNotEmpty => Ok(false),
            Err(e) => {
                // Some platforms report a non-empty directory with other codes.
                let occupied = fs::read_dir(path).is_ok_and(|mut entries| entries.next().is_some());
                if occupied { Ok(false) } else { Err(StorageError::from_io(path, e)) }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::FileTime;
    use std::path::Path;

    fn path_str(path: &Path) -> String {
        path.to_string_lossy().to_string()
    }

    #[test]
    fn size_reports_file_length() {
        let dir = tempfile::tempdir().unwrap();
        let storage = PosixStorage::new();

        for exponent in 1..=6 {
            let size = 10usize.pow(exponent);
            let file = dir.path().join(format!("file_{size}"));
            fs::write(&file, vec![0u8; size]).unwrap();

            assert_eq!(storage.size(&path_str(&file)).unwrap(), size as u64);
        }
    }

    #[test]
    fn mtime_reports_modification_time() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, b"testing time").unwrap();
        filetime::set_file_mtime(&file, FileTime::from_unix_time(1_500_000_000, 0)).unwrap();

        assert_eq!(PosixStorage::new().mtime(&path_str(&file)).unwrap(), 1_500_000_000);
    }

    #[test]
    fn list_and_kind_describe_directory_contents() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("file.root"), b"x").unwrap();
        let storage = PosixStorage::new();

        let mut names = storage.list_children(&path_str(dir.path())).unwrap();
        names.sort();

        assert_eq!(names, vec!["file.root", "sub"]);
        assert_eq!(
            storage.entry_kind(&path_str(&dir.path().join("sub"))).unwrap(),
            EntryKind::Directory
        );
        assert_eq!(
            storage.entry_kind(&path_str(&dir.path().join("file.root"))).unwrap(),
            EntryKind::File
        );
    }

    #[test]
    fn missing_path_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = path_str(&dir.path().join("missing"));

        assert!(PosixStorage::new().mtime(&missing).unwrap_err().is_not_found());
    }

    #[test]
    fn delete_removes_trees_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let tree = dir.path().join("a");
        fs::create_dir_all(tree.join("b/c")).unwrap();
        fs::write(tree.join("b/c/file.root"), b"x").unwrap();
        let storage = PosixStorage::new();

        storage.delete(&path_str(&tree)).unwrap();
        assert!(!tree.exists());
        storage.delete(&path_str(&tree)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn delete_does_not_follow_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("target");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep.root"), b"x").unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();
        let storage = PosixStorage::new();

        assert_eq!(storage.entry_kind(&path_str(&link)).unwrap(), EntryKind::File);
        storage.delete(&path_str(&link)).unwrap();

        assert!(!link.exists());
        assert!(target.join("keep.root").exists());
    }

    #[test]
    fn remove_empty_dir_keeps_occupied_directories() {
        let dir = tempfile::tempdir().unwrap();
        let full = dir.path().join("full");
        let empty = dir.path().join("empty");
        fs::create_dir(&full).unwrap();
        fs::create_dir(&empty).unwrap();
        fs::write(full.join("file"), b"x").unwrap();
        let storage = PosixStorage::new();

        assert!(!storage.remove_empty_dir(&path_str(&full)).unwrap());
        assert!(storage.remove_empty_dir(&path_str(&empty)).unwrap());
        assert!(!storage.remove_empty_dir(&path_str(&empty)).unwrap());
        assert!(full.exists());
    }
}
