//! The deletion list handed from the scan phase to the execute phase.
//!
//! On disk it is plain text with one absolute path per line so that an operator
//! can diff and edit it. Lines starting with `#` and blank lines are ignored.

use chrono::DateTime;

use crate::domain::configuration::ListGranularity;
use crate::domain::Candidate;

/// Context written as comments at the top of a deletion list.
#[derive(Debug, Clone)]
pub struct ListHeader {
    pub root: String,
    pub granularity: ListGranularity,
    pub cutoff: i64,
}

impl ListHeader {
    fn render(&self) -> String {
        format!(
            "# cleanup root: {}\n# granularity: {}\n# modified before: {} ({})\n",
            self.root,
            self.granularity,
            format_timestamp(self.cutoff),
            self.cutoff
        )
    }
}

/// RFC 3339 rendering of a unix timestamp.
pub fn format_timestamp(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0)
        .map(|time| time.to_rfc3339())
        .unwrap_or_else(|| "out of range".to_string())
}

/// Ordered list of paths to delete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionList {
    entries: Vec<String>,
}

impl DeletionList {
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }

    pub fn from_candidates(candidates: &[Candidate]) -> Self {
        Self::new(candidates.iter().map(|candidate| candidate.pfn.clone()).collect())
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read a list back. Entry lines are taken verbatim; only empty lines and
    /// `#` comments are skipped.
    pub fn parse(content: &str) -> Self {
        let entries = content
            .lines()
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect();
        Self { entries }
    }

    /// Whether an entry name survives a write and read of the list unchanged.
    pub fn is_listable_name(name: &str) -> bool {
        !name.is_empty() && !name.contains(['\n', '\r']) && name.trim() == name
    }

    pub fn render(&self, header: Option<&ListHeader>) -> String {
        let mut out = header.map(ListHeader::render).unwrap_or_default();
        for entry in &self.entries {
            out.push_str(entry);
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_skips_comments_and_blank_lines() {
        let list = DeletionList::parse(
            "# cleanup root: /store/unmerged\n\n/store/unmerged/a\n#/store/unmerged/c\n/store/unmerged/b\n",
        );

        assert_eq!(list.entries(), ["/store/unmerged/a", "/store/unmerged/b"]);
    }

    #[test]
    fn parse_keeps_entry_lines_verbatim() {
        let list = DeletionList::parse("/store/unmerged/d/keep \n /store/unmerged/e\n");

        assert_eq!(list.entries(), ["/store/unmerged/d/keep ", " /store/unmerged/e"]);
    }

    #[test]
    fn names_that_would_change_on_read_back_are_not_listable() {
        assert!(DeletionList::is_listable_name("file.root"));
        assert!(DeletionList::is_listable_name("with inner space"));
        assert!(!DeletionList::is_listable_name("keep "));
        assert!(!DeletionList::is_listable_name(" keep"));
        assert!(!DeletionList::is_listable_name("young\n"));
        assert!(!DeletionList::is_listable_name("a\rb"));
        assert!(!DeletionList::is_listable_name(""));
    }

    #[test]
    fn render_writes_header_then_one_path_per_line() {
        let list = DeletionList::new(vec!["/store/unmerged/a".into(), "/store/unmerged/b".into()]);
        let header = ListHeader {
            root: "/store/unmerged".into(),
            granularity: ListGranularity::Files,
            cutoff: 0,
        };

        let text = list.render(Some(&header));

        assert!(text.starts_with("# cleanup root: /store/unmerged\n# granularity: files\n"));
        assert!(text.contains("1970-01-01T00:00:00+00:00 (0)"));
        assert!(text.ends_with("/store/unmerged/a\n/store/unmerged/b\n"));
        assert_eq!(DeletionList::parse(&text), list);
    }

    #[test]
    fn empty_list_renders_nothing_without_header() {
        assert_eq!(DeletionList::default().render(None), "");
    }
}
