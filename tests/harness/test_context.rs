//! Shared testing harness for `unmerged-cleaner` integration tests.

use assert_cmd::Command;
use filetime::{FileTime, set_file_mtime};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Modification time of entries that are old enough to delete.
pub(crate) const OLD: i64 = 1_000_000_000;
/// Reference time passed to every CLI invocation.
pub(crate) const NOW: i64 = OLD + 60 * 24 * 3600;
/// Modification time of entries that must be kept for their age.
pub(crate) const YOUNG: i64 = NOW - 60;

/// Isolated site with an unmerged area, a protected list and a config file.
pub(crate) struct TestContext {
    root: TempDir,
    store: PathBuf,
}

impl TestContext {
    pub(crate) fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let store = root.path().join("site/store/unmerged");
        fs::create_dir_all(&store).expect("Failed to create unmerged area");

        let ctx = Self { root, store };
        ctx.protect(&["/store/unmerged/placeholder/never/present"]);
        ctx.write_config("");
        ctx
    }

    /// Physical path of the cleanup root.
    pub(crate) fn store(&self) -> &Path {
        &self.store
    }

    /// Physical path of an entry below the cleanup root.
    pub(crate) fn path(&self, rel: &str) -> PathBuf {
        self.store.join(rel)
    }

    /// Physical path as it appears in the deletion list.
    pub(crate) fn pfn(&self, rel: &str) -> String {
        self.path(rel).to_string_lossy().into_owned()
    }

    pub(crate) fn exists(&self, rel: &str) -> bool {
        self.path(rel).exists()
    }

    pub(crate) fn config_path(&self) -> PathBuf {
        self.root.path().join("config.toml")
    }

    pub(crate) fn deletion_file(&self) -> PathBuf {
        self.root.path().join("to_delete.txt")
    }

    pub(crate) fn protected_file(&self) -> PathBuf {
        self.root.path().join("protected.json")
    }

    /// Create a file with the given mtime. Directories created on the way are made old.
    pub(crate) fn file(&self, rel: &str, mtime: i64) -> &Self {
        let path = self.path(rel);
        let parent = path.parent().expect("file must have a parent");
        fs::create_dir_all(parent).expect("Failed to create parent directories");
        fs::write(&path, rel).expect("Failed to write test file");
        set_mtime(&path, mtime);

        let mut dir = Some(parent);
        while let Some(current) = dir {
            if !current.starts_with(&self.store) {
                break;
            }
            set_mtime(current, OLD);
            dir = current.parent();
        }
        self
    }

    /// Override the mtime of an existing entry.
    pub(crate) fn touch(&self, rel: &str, mtime: i64) -> &Self {
        set_mtime(&self.path(rel), mtime);
        self
    }

    /// Replace the protected list with the given LFNs.
    pub(crate) fn protect(&self, lfns: &[&str]) {
        let body = serde_json::json!({ "protected": lfns, "time": OLD });
        fs::write(self.protected_file(), body.to_string()).expect("Failed to write protected list");
    }

    /// Write the config file. `extra` holds additional top-level keys.
    pub(crate) fn write_config(&self, extra: &str) {
        let content = format!(
            r#"lfn_to_clean = "/store/unmerged"
unmerged_dir_location = "{}"
deletion_file = "{}"
pause_ms = 0
{}

[protected]
path = "{}"
"#,
            self.store.display(),
            self.deletion_file().display(),
            extra,
            self.protected_file().display()
        );
        fs::write(self.config_path(), content).expect("Failed to write config");
    }

    /// Entries of the deletion list, comments excluded.
    pub(crate) fn listed(&self) -> Vec<String> {
        fs::read_to_string(self.deletion_file())
            .expect("Failed to read deletion list")
            .lines()
            .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect()
    }

    /// Overwrite the deletion list by hand.
    pub(crate) fn write_list(&self, entries: &[String]) {
        let mut content = String::from("# edited by hand\n");
        for entry in entries {
            content.push_str(entry);
            content.push('\n');
        }
        fs::write(self.deletion_file(), content).expect("Failed to write deletion list");
    }

    /// Build a command for the compiled binary, pinned to this site's config and `NOW`.
    pub(crate) fn cli(&self) -> Command {
        let mut cmd =
            Command::cargo_bin("unmerged-cleaner").expect("Failed to locate unmerged-cleaner binary");
        cmd.current_dir(self.root.path())
            .env("RUST_LOG", "warn")
            .arg("--config")
            .arg(self.config_path())
            .args(["--now", &NOW.to_string()]);
        cmd
    }
}

fn set_mtime(path: &Path, mtime: i64) {
    set_file_mtime(path, FileTime::from_unix_time(mtime, 0)).expect("Failed to set mtime");
}
