//! Storage backend driving the `hdfs dfs` command line.

use std::process::Command;

use tracing::trace;

use crate::domain::{EntryKind, EntryStat, StorageError};
use crate::ports::StorageBackend;

const STAT_FORMAT: &str = "%F|%b|%Y";

/// Hadoop storage accessed through the `hdfs` client binary.
#[derive(Debug, Clone)]
pub struct HadoopStorage {
    program: String,
}

impl HadoopStorage {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }

    fn run(&self, path: &str, args: &[&str]) -> Result<String, StorageError> {
        let mut command = Command::new(&self.program);
        command.arg("dfs").args(args).arg(path);
        trace!(program = %self.program, ?args, path, "running hdfs command");

        let output = command.output().map_err(|e| StorageError::Backend {
            path: path.to_string(),
            details: format!("failed to run {} dfs {}: {}", self.program, args.join(" "), e),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(classify_failure(path, &stderr));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

}

fn classify_failure(path: &str, stderr: &str) -> StorageError {
    if stderr.contains("No such file or directory") {
        StorageError::NotFound { path: path.to_string() }
    } else if stderr.contains("Permission denied") {
        StorageError::PermissionDenied { path: path.to_string() }
    } else {
        StorageError::Backend {
            path: path.to_string(),
            details: if stderr.is_empty() { "Unknown error".to_string() } else { stderr.to_string() },
        }
    }
}

fn parse_stat(path: &str, output: &str) -> Result<EntryStat, StorageError> {
    let malformed = || StorageError::Backend {
        path: path.to_string(),
        details: format!("unexpected stat output: {:?}", output.trim()),
    };

    let line = output.lines().find(|line| !line.trim().is_empty()).ok_or_else(malformed)?;
    let mut fields = line.trim().split('|');
    let (Some(kind), Some(size), Some(mtime_ms), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(malformed());
    };

    let kind = if kind == "directory" { EntryKind::Directory } else { EntryKind::File };
    let size = size.parse::<u64>().map_err(|_| malformed())?;
    let mtime_ms = mtime_ms.parse::<i64>().map_err(|_| malformed())?;

    Ok(EntryStat { kind, size, mtime: mtime_ms.div_euclid(1000) })
}

fn child_names(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| line.trim_end_matches('/').rsplit('/').next())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

impl StorageBackend for HadoopStorage {
    fn name(&self) -> &'static str {
        "hadoop"
    }

    fn list_children(&self, path: &str) -> Result<Vec<String>, StorageError> {
        let output = self.run(path, &["-ls", "-C"])?;
        Ok(child_names(&output))
    }

    fn stat(&self, path: &str) -> Result<EntryStat, StorageError> {
        let output = self.run(path, &["-stat", STAT_FORMAT])?;
        parse_stat(path, &output)
    }

    fn delete(&self, path: &str) -> Result<(), StorageError> {
        self.run(path, &["-rm", "-r", "-f", "-skipTrash"]).map(|_| ())
    }

    fn remove_empty_dir(&self, path: &str) -> Result<bool, StorageError> {
        match self.run(path, &["-rmdir"]) {
            Ok(_) => Ok(true),
            Err(StorageError::NotFound { .. }) => Ok(false),
            Err(StorageError::Backend { details, .. })
                if details.to_ascii_lowercase().contains("not empty") =>
            {
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}
