//! Execute phase: delete everything on the deletion list.

use std::path::Path;
use std::thread;

use tracing::{debug, info, warn};

use crate::adapters::deletion_list_file::read_deletion_list;
use crate::app::AppContext;
use crate::domain::{AppError, SanityGate, StorageError, namespace};
use crate::ports::StorageBackend;

/// Summary of an execute run.
#[derive(Debug, Default)]
pub struct ExecutionReport {
    /// Entries of the list that were removed (or already gone).
    pub deleted: Vec<String>,
    /// Parent directories removed because they became empty.
    pub pruned: Vec<String>,
    /// Paths that could not be removed.
    pub failures: Vec<StorageError>,
}

impl ExecutionReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Delete every entry of the list at `list_path`, pausing between deletions.
///
/// The list is always re-read from disk so that edits made after the scan are honored.
pub fn execute<S: StorageBackend>(
    ctx: &AppContext<S>,
    list_path: &Path,
) -> Result<ExecutionReport, AppError> {
    let list = read_deletion_list(list_path)?;
    SanityGate::new(ctx.config(), ctx.index()).before_execute(&list)?;

    let pause = ctx.config().pause();
    let total = list.len();
    info!(entries = total, list = %list_path.display(), "deleting listed entries");

    let mut report = ExecutionReport::default();
    for (position, entry) in list.entries().iter().enumerate() {
        info!(path = %entry, "deleting {}/{}", position + 1, total);
        match ctx.storage().delete(entry) {
            Ok(()) => {
                report.deleted.push(entry.clone());
                prune_empty_parents(ctx, entry, &mut report);
            }
            Err(err) => {
                warn!("deletion failed: {}", err);
                report.failures.push(err);
            }
        }

        if !pause.is_zero() {
            thread::sleep(pause);
        }
    }

    info!(
        deleted = report.deleted.len(),
        pruned = report.pruned.len(),
        failed = report.failures.len(),
        "deletion finished"
    );
    Ok(report)
}

/// Walk up from `entry` removing parents that are now empty.
///
/// Stops at the cleanup root, at a directory holding protected paths, and at the
/// first directory that is not empty.
fn prune_empty_parents<S: StorageBackend>(
    ctx: &AppContext<S>,
    entry: &str,
    report: &mut ExecutionReport,
) {
    let config = ctx.config();
    let root = config.pfn_root();

    let mut current = namespace::parent(entry);
    while let Some(dir) = current {
        if !namespace::is_strictly_below(dir, &root) {
            break;
        }
        let Some(lfn) = config.lfn_for(dir) else { break };
        if ctx.index().is_protected_or_ancestor(&lfn) || ctx.index().is_covered(&lfn) {
            debug!(path = dir, "parent holds protected paths; stop pruning");
            break;
        }

        match ctx.storage().remove_empty_dir(dir) {
            Ok(true) => {
                debug!(path = dir, "removed empty parent");
                report.pruned.push(dir.to_string());
                current = namespace::parent(dir);
            }
            Ok(false) => break,
            Err(err) => {
                warn!("could not prune parent directory: {}", err);
                report.failures.push(err);
                break;
            }
        }
    }
}
