//! Run-level safety checks.
//!
//! Every check fails closed: a single violation rejects the whole run before
//! anything on the storage is touched.

use crate::domain::configuration::{CleanerConfig, UNMERGED_MARKER};
use crate::domain::{DeletionList, ProtectedIndex, SuspiciousConditions, namespace};

pub struct SanityGate<'a> {
    config: &'a CleanerConfig,
    index: &'a ProtectedIndex,
}

impl<'a> SanityGate<'a> {
    pub fn new(config: &'a CleanerConfig, index: &'a ProtectedIndex) -> Self {
        Self { config, index }
    }

    /// Checks that must hold before the namespace is scanned.
    pub fn before_scan(&self) -> Result<(), SuspiciousConditions> {
        self.check_protected_index()?;
        self.check_root()
    }

    /// Checks on a freshly produced deletion list.
    ///
    /// The list is checked as the execute phase will read it back from disk.
    pub fn after_scan(&self, list: &DeletionList) -> Result<(), SuspiciousConditions> {
        self.before_scan()?;
        self.check_reads_back(list)?;
        self.check_within_root(&DeletionList::parse(&list.render(None)))
    }

    /// Checks on a deletion list read back from disk, right before deleting.
    pub fn before_execute(&self, list: &DeletionList) -> Result<(), SuspiciousConditions> {
        self.after_scan(list)?;
        self.check_unprotected(list)
    }

    pub fn check_protected_index(&self) -> Result<(), SuspiciousConditions> {
        if self.index.is_empty() {
            return Err(SuspiciousConditions::EmptyProtectedList);
        }
        Ok(())
    }

    pub fn check_root(&self) -> Result<(), SuspiciousConditions> {
        let lfn = self.config.lfn_root();
        let pfn = self.config.pfn_root();

        let lfn_ok = lfn.len() > UNMERGED_MARKER.len() && lfn.ends_with(UNMERGED_MARKER);
        if !lfn_ok || !pfn.ends_with(&lfn) {
            return Err(SuspiciousConditions::UnexpectedRoot { lfn, pfn });
        }
        Ok(())
    }

    pub fn check_reads_back(&self, list: &DeletionList) -> Result<(), SuspiciousConditions> {
        let reread = DeletionList::parse(&list.render(None));
        if reread == *list {
            return Ok(());
        }

        let written = list.entries();
        let position = (0..written.len().max(reread.len()))
            .find(|&i| written.get(i) != reread.entries().get(i))
            .unwrap_or(0);
        let path = written.get(position).or(written.last()).cloned().unwrap_or_default();
        Err(SuspiciousConditions::UnfaithfulEntry { path })
    }

    pub fn check_within_root(&self, list: &DeletionList) -> Result<(), SuspiciousConditions> {
        let root = self.config.pfn_root();
        match list.entries().iter().find(|entry| !namespace::is_strictly_below(entry, &root)) {
            Some(entry) => {
                Err(SuspiciousConditions::OutsideCleanupRoot { path: entry.clone(), root })
            }
            None => Ok(()),
        }
    }

    pub fn check_unprotected(&self, list: &DeletionList) -> Result<(), SuspiciousConditions> {
        for entry in list.entries() {
            let Some(lfn) = self.config.lfn_for(entry) else {
                return Err(SuspiciousConditions::OutsideCleanupRoot {
                    path: entry.clone(),
                    root: self.config.pfn_root(),
                });
            };
            if self.index.is_protected_or_ancestor(&lfn) || self.index.is_covered(&lfn) {
                return Err(SuspiciousConditions::ProtectedEntry { path: entry.clone(), lfn });
            }
        }
        Ok(())
    }
}
