//! Scan phase: walk the cleanup root and write the deletion list.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::adapters::deletion_list_file::write_deletion_list;
use crate::app::AppContext;
use crate::domain::deletion_list::format_timestamp;
use crate::domain::{
    AppError, Candidate, DeletionList, EntryKind, EntryStat, ListGranularity, ListHeader,
    SanityGate, StorageError, namespace,
};
use crate::ports::StorageBackend;

/// Result of a scan.
#[derive(Debug)]
pub struct ScanOutcome {
    /// Selected entries in traversal order.
    pub candidates: Vec<Candidate>,
    /// Entries that could not be inspected. Their ancestors were kept.
    pub errors: Vec<StorageError>,
    /// Where the deletion list was written.
    pub list_path: PathBuf,
}

impl ScanOutcome {
    pub fn total_size(&self) -> u64 {
        self.candidates.iter().map(|candidate| candidate.size).sum()
    }
}

/// Scan the cleanup root as of `now` (unix seconds) and persist the deletion list.
pub fn execute<S: StorageBackend>(ctx: &AppContext<S>, now: i64) -> Result<ScanOutcome, AppError> {
    let config = ctx.config();
    let gate = SanityGate::new(config, ctx.index());
    gate.before_scan()?;

    let cutoff = config.cutoff(now);
    let root = config.pfn_root();
    info!(
        root = %root,
        granularity = %config.which_list,
        backend = ctx.storage().name(),
        cutoff = %format_timestamp(cutoff),
        "scanning for entries older than cutoff"
    );

    let mut scanner = Scanner { ctx, cutoff, errors: Vec::new() };
    let candidates = scanner.scan_root(&root)?;
    let list = DeletionList::from_candidates(&candidates);

    let list_path = config.deletion_file();
    let header = ListHeader { root, granularity: config.which_list, cutoff };
    if let Err(violation) = gate.after_scan(&list) {
        // Leave no stale list behind for a later execute-only run.
        write_deletion_list(&list_path, &DeletionList::default(), Some(&header))?;
        return Err(violation.into());
    }
    write_deletion_list(&list_path, &list, Some(&header))?;

    let outcome = ScanOutcome { candidates, errors: scanner.errors, list_path };
    info!(
        entries = outcome.candidates.len(),
        bytes = outcome.total_size(),
        unreadable = outcome.errors.len(),
        list = %outcome.list_path.display(),
        "deletion list written"
    );
    Ok(outcome)
}

#[derive(Debug, Clone, Copy)]
struct Subtree {
    newest: i64,
    size: u64,
    /// Everything in the subtree may be deleted.
    whole: bool,
}

impl Subtree {
    fn kept() -> Self {
        Self { newest: i64::MAX, size: 0, whole: false }
    }

    fn absorb(&mut self, child: Subtree) {
        self.newest = self.newest.max(child.newest);
        self.size = self.size.saturating_add(child.size);
        self.whole &= child.whole;
    }
}

struct Scanner<'a, S: StorageBackend> {
    ctx: &'a AppContext<S>,
    cutoff: i64,
    errors: Vec<StorageError>,
}

impl<S: StorageBackend> Scanner<'_, S> {
    fn scan_root(&mut self, root: &str) -> Result<Vec<Candidate>, AppError> {
        let ctx = self.ctx;
        let config = ctx.config();
        let mut names = ctx.storage().list_children(root)?;
        names.sort();

        let mut candidates = Vec::new();
        for name in names {
            if config.dirs_to_avoid.iter().any(|avoid| *avoid == name) {
                debug!(name = %name, "skipping avoided directory");
                continue;
            }
            self.visit(&namespace::join(root, &name), &mut candidates);
        }
        Ok(candidates)
    }

    fn visit(&mut self, pfn: &str, out: &mut Vec<Candidate>) -> Subtree {
        let ctx = self.ctx;
        let config = ctx.config();
        let index = ctx.index();
        let storage = ctx.storage();

        let Some(lfn) = config.lfn_for(pfn) else {
            warn!(path = pfn, "entry outside of cleanup root; keeping");
            return Subtree::kept();
        };
        if index.is_covered(&lfn) {
            debug!(path = pfn, "protected; not descending");
            return Subtree::kept();
        }

        if let Some(name) = pfn.rsplit('/').next()
            && !DeletionList::is_listable_name(name)
        {
            return self.unreadable(StorageError::Backend {
                path: pfn.to_string(),
                details: "name cannot be written to the deletion list unchanged".to_string(),
            });
        }

        let EntryStat { kind, size, mtime } = match storage.stat(pfn) {
            Ok(stat) => stat,
            Err(err) => return self.unreadable(err),
        };

        match kind {
            EntryKind::File => {
                let old = mtime < self.cutoff;
                if old {
                    out.push(Candidate { pfn: pfn.to_string(), kind, mtime, size });
                }
                Subtree { newest: mtime, size, whole: old }
            }
            EntryKind::Directory => {
                let mut names = match storage.list_children(pfn) {
                    Ok(names) => names,
                    Err(err) => return self.unreadable(err),
                };
                names.sort();

                let holds_protected = index.is_protected_or_ancestor(&lfn);
                let mut subtree =
                    Subtree { newest: mtime, size: 0, whole: mtime < self.cutoff && !holds_protected };
                let mut inner = Vec::new();
                for name in names {
                    let child = self.visit(&namespace::join(pfn, &name), &mut inner);
                    subtree.absorb(child);
                }

                if config.which_list == ListGranularity::Directories && subtree.whole {
                    out.push(Candidate {
                        pfn: pfn.to_string(),
                        kind,
                        mtime: subtree.newest,
                        size: subtree.size,
                    });
                } else {
                    out.extend(inner);
                }
                subtree
            }
        }
    }

    fn unreadable(&mut self, err: StorageError) -> Subtree {
        warn!("cannot inspect entry, keeping it and its parents: {}", err);
        self.errors.push(err);
        Subtree::kept()
    }
}
