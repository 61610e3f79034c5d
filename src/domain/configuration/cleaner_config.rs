//! Cleaner configuration domain models.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::{AppError, namespace};

/// Marker every cleanup root LFN must end with.
pub const UNMERGED_MARKER: &str = "/unmerged";

/// Configuration for a cleaner run, loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CleanerConfig {
    /// LFN of the directory to clean.
    #[serde(default = "default_lfn_to_clean")]
    pub lfn_to_clean: String,
    /// PFN of the directory to clean. Falls back to `lfn_to_clean`.
    #[serde(default)]
    pub unmerged_dir_location: Option<String>,
    /// Whether directories or individual files are listed.
    #[serde(default)]
    pub which_list: ListGranularity,
    /// Where the deletion list is written.
    #[serde(default)]
    pub deletion_file: Option<PathBuf>,
    /// Pause after each deletion in milliseconds.
    #[serde(default = "default_pause_ms")]
    pub pause_ms: u64,
    /// Top-level directory names that are never touched.
    #[serde(default = "default_dirs_to_avoid")]
    pub dirs_to_avoid: Vec<String>,
    /// Entries younger than this many seconds are kept.
    #[serde(default = "default_min_age_secs")]
    pub min_age_secs: u64,
    /// Storage backend of the site.
    #[serde(default)]
    pub storage_type: StorageType,
    /// Command used by the Hadoop backend.
    #[serde(default = "default_hadoop_command")]
    pub hadoop_command: String,
    /// Where the protected path list comes from.
    #[serde(default)]
    pub protected: ProtectedSourceConfig,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            lfn_to_clean: default_lfn_to_clean(),
            unmerged_dir_location: None,
            which_list: ListGranularity::default(),
            deletion_file: None,
            pause_ms: default_pause_ms(),
            dirs_to_avoid: default_dirs_to_avoid(),
            min_age_secs: default_min_age_secs(),
            storage_type: StorageType::default(),
            hadoop_command: default_hadoop_command(),
            protected: ProtectedSourceConfig::default(),
        }
    }
}

impl CleanerConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.lfn_to_clean.trim().starts_with('/') {
            return Err(AppError::config_error(format!(
                "lfn_to_clean must be an absolute path, got '{}'",
                self.lfn_to_clean
            )));
        }
        if let Some(location) = &self.unmerged_dir_location
            && location.trim().is_empty()
        {
            return Err(AppError::config_error("unmerged_dir_location must not be empty"));
        }
        if self.min_age_secs == 0 {
            return Err(AppError::config_error("min_age_secs must be greater than 0"));
        }
        for name in &self.dirs_to_avoid {
            if name.trim().is_empty() || name.contains('/') {
                return Err(AppError::config_error(format!(
                    "dirs_to_avoid entries must be plain directory names, got '{}'",
                    name
                )));
            }
        }
        if self.hadoop_command.trim().is_empty() {
            return Err(AppError::config_error("hadoop_command must not be empty"));
        }
        self.protected.validate()?;
        Ok(())
    }

    /// Normalized LFN of the cleanup root.
    pub fn lfn_root(&self) -> String {
        namespace::normalize(&self.lfn_to_clean)
    }

    /// Normalized PFN of the cleanup root.
    pub fn pfn_root(&self) -> String {
        namespace::normalize(self.unmerged_dir_location.as_deref().unwrap_or(&self.lfn_to_clean))
    }

    /// Deletion list location, derived from the granularity when unset.
    pub fn deletion_file(&self) -> PathBuf {
        self.deletion_file.clone().unwrap_or_else(|| {
            PathBuf::from(format!("/tmp/{}_to_delete.txt", self.which_list.as_str()))
        })
    }

    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }

    /// Latest modification time that still counts as old enough at `now`.
    pub fn cutoff(&self, now: i64) -> i64 {
        now.saturating_sub(i64::try_from(self.min_age_secs).unwrap_or(i64::MAX))
    }

    /// Translate a PFN below the cleanup root into its LFN.
    pub fn lfn_for(&self, pfn: &str) -> Option<String> {
        let pfn_root = self.pfn_root();
        let lfn_root = self.lfn_root();
        if pfn == pfn_root {
            return Some(lfn_root);
        }
        if !namespace::is_strictly_below(pfn, &pfn_root) {
            return None;
        }
        let rest = if pfn_root == "/" { pfn } else { &pfn[pfn_root.len()..] };
        Some(format!("{}{}", lfn_root.trim_end_matches('/'), rest))
    }
}

fn default_lfn_to_clean() -> String {
    "/store/unmerged".to_string()
}

fn default_pause_ms() -> u64 {
    500
}

fn default_dirs_to_avoid() -> Vec<String> {
    vec!["SAM".to_string(), "logs".to_string()]
}

fn default_min_age_secs() -> u64 {
    // Four weeks.
    1_209_600 * 2
}

fn default_hadoop_command() -> String {
    "hdfs".to_string()
}

/// Granularity of the deletion list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListGranularity {
    /// Whole directories are listed when everything inside is old.
    #[default]
    Directories,
    /// Every old file is listed individually.
    Files,
}

impl ListGranularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListGranularity::Directories => "directories",
            ListGranularity::Files => "files",
        }
    }
}

impl fmt::Display for ListGranularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage system holding the unmerged area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    #[default]
    Posix,
    Hadoop,
    Dcache,
}

impl StorageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageType::Posix => "posix",
            StorageType::Hadoop => "hadoop",
            StorageType::Dcache => "dcache",
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Protected path source configuration.
///
/// A local `path` takes precedence over `url`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProtectedSourceConfig {
    /// Endpoint serving the protected LFN list.
    #[serde(default = "default_protected_url")]
    pub url: Url,
    /// Local file with the protected LFN list.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Maximum fetch attempts.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Delay between retries in milliseconds.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for ProtectedSourceConfig {
    fn default() -> Self {
        Self {
            url: default_protected_url(),
            path: None,
            timeout_secs: default_timeout(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl ProtectedSourceConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.timeout_secs == 0 {
            return Err(AppError::config_error("protected.timeout_secs must be greater than 0"));
        }
        if self.max_retries == 0 {
            return Err(AppError::config_error("protected.max_retries must be greater than 0"));
        }
        if self.retry_delay_ms == 0 {
            return Err(AppError::config_error(
                "protected.retry_delay_ms must be greater than 0",
            ));
        }
        Ok(())
    }
}

fn default_protected_url() -> Url {
    Url::parse("https://cmst2.web.cern.ch/cmst2/unified/listProtectedLFN.txt")
        .expect("Default protected list URL must be valid")
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}
