//! API Facade for the application.
//!
//! This module exposes high-level functions that glue together context creation
//! and command execution.

use std::path::PathBuf;

use tracing::{error, info, warn};

use crate::adapters::{open_protected_source, open_storage};
use crate::app::AppContext;
use crate::app::commands::{execute, scan};
use crate::domain::configuration::load_config;
use crate::domain::ProtectedIndex;
use crate::ports::{ProtectedPathSource, StorageBackend};

pub use crate::app::commands::execute::ExecutionReport;
pub use crate::app::commands::scan::ScanOutcome;
pub use crate::domain::{AppError, CleanerConfig, SuspiciousConditions};

/// Which phases a run performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Scan, write the deletion list, then delete.
    #[default]
    Full,
    /// Only produce the deletion list for review.
    ScanOnly,
    /// Only consume an existing deletion list.
    ExecuteOnly,
}

/// Options for a cleaner run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub mode: RunMode,
    /// Reference time for age comparisons, unix seconds.
    pub now: i64,
    /// Configuration file. Defaults apply when unset.
    pub config_path: Option<PathBuf>,
    /// Overrides the configured deletion list location.
    pub deletion_file: Option<PathBuf>,
}

/// What a run did.
#[derive(Debug, Default)]
pub struct RunResult {
    pub scan: Option<ScanOutcome>,
    pub execution: Option<ExecutionReport>,
}

impl RunResult {
    /// Whether every attempted deletion succeeded.
    pub fn is_clean(&self) -> bool {
        self.execution.as_ref().is_none_or(ExecutionReport::is_clean)
    }
}

/// Load configuration, connect to storage and the protected list, and run.
pub fn run(options: RunOptions) -> Result<RunResult, AppError> {
    let mut config = load_config(options.config_path.as_deref())?;
    if let Some(path) = &options.deletion_file {
        config.deletion_file = Some(path.clone());
    }

    let storage = open_storage(&config)?;
    let source = open_protected_source(&config)?;
    let index = load_protected_index(source.as_ref());

    let ctx = AppContext::new(config, storage, index);
    run_with_context(&ctx, options.mode, options.now)
}

/// Run the requested phases against an already assembled context.
pub fn run_with_context<S: StorageBackend>(
    ctx: &AppContext<S>,
    mode: RunMode,
    now: i64,
) -> Result<RunResult, AppError> {
    let mut result = RunResult::default();

    if mode != RunMode::ExecuteOnly {
        result.scan = Some(scan::execute(ctx, now)?);
    }
    if mode != RunMode::ScanOnly {
        let list_path = ctx.config().deletion_file();
        result.execution = Some(execute::execute(ctx, &list_path)?);
    }

    Ok(result)
}

/// Fetch the protected list and index it.
///
/// A source failure is not fatal here. It yields an empty index, which the sanity
/// gate refuses to run with.
pub fn load_protected_index(source: &dyn ProtectedPathSource) -> ProtectedIndex {
    match source.fetch() {
        Ok(paths) if paths.is_empty() => {
            warn!(source = %source.describe(), "protected list is empty");
            ProtectedIndex::default()
        }
        Ok(paths) => {
            let index = ProtectedIndex::build(&paths);
            info!(source = %source.describe(), protected = index.len(), "loaded protected list");
            index
        }
        Err(err) => {
            error!(source = %source.describe(), "could not load protected list: {}", err);
            ProtectedIndex::default()
        }
    }
}
