//! Index over the protected LFN list.

use std::borrow::Borrow;
use std::collections::BTreeMap;

use crate::domain::namespace;

/// Membership test on a sorted slice.
pub fn bi_search<T, Q>(sorted: &[T], value: &Q) -> bool
where
    T: Borrow<Q>,
    Q: Ord + ?Sized,
{
    sorted.binary_search_by(|entry| entry.borrow().cmp(value)).is_ok()
}

/// Sorted, deduplicated set of protected paths.
///
/// Paths are additionally grouped by their length so that a candidate can be
/// checked for being an ancestor of any protected path: every protected path
/// longer than the candidate is truncated to the candidate's length plus the
/// separator and compared at that depth. Truncation keeps each group sorted, so
/// each depth costs one binary search.
#[derive(Debug, Clone, Default)]
pub struct ProtectedIndex {
    paths: Vec<String>,
    by_length: BTreeMap<usize, Vec<String>>,
}

impl ProtectedIndex {
    pub fn build<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut paths: Vec<String> = raw
            .into_iter()
            .map(|path| namespace::normalize(path.as_ref()))
            .filter(|path| !path.is_empty())
            .collect();
        paths.sort();
        paths.dedup();

        let mut by_length: BTreeMap<usize, Vec<String>> = BTreeMap::new();
        for path in &paths {
            by_length.entry(path.len()).or_default().push(path.clone());
        }

        Self { paths, by_length }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    /// Distinct lengths among protected paths, ascending.
    pub fn lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.by_length.keys().copied()
    }

    /// Exact membership.
    pub fn contains(&self, path: &str) -> bool {
        bi_search(&self.paths, namespace::normalize(path).as_str())
    }

    /// Whether `path` is protected itself or is a directory holding protected paths.
    pub fn is_protected_or_ancestor(&self, path: &str) -> bool {
        let path = namespace::normalize(path);
        if path.is_empty() {
            return false;
        }
        if bi_search(&self.paths, path.as_str()) {
            return true;
        }
        if path == "/" {
            return !self.is_empty();
        }

        let depth = path.len();
        let needle = format!("{path}/");
        let needle = needle.as_bytes();

        self.by_length.range(depth + 1..).any(|(_, group)| {
            let idx = group.partition_point(|candidate| &candidate.as_bytes()[..=depth] < needle);
            group.get(idx).is_some_and(|candidate| &candidate.as_bytes()[..=depth] == needle)
        })
    }

    /// Whether `path` or one of its ancestors is protected.
    pub fn is_covered(&self, path: &str) -> bool {
        let path = namespace::normalize(path);
        let mut current = Some(path.as_str());
        while let Some(candidate) = current {
            if self.by_length.contains_key(&candidate.len()) && bi_search(&self.paths, candidate) {
                return true;
            }
            current = namespace::parent(candidate);
        }
        false
    }
}
