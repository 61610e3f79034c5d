use std::fmt;

/// Kind of a namespace entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Directory => f.write_str("directory"),
            EntryKind::File => f.write_str("file"),
        }
    }
}

/// Metadata of one namespace entry, read in a single backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryStat {
    pub kind: EntryKind,
    /// File size in bytes. Backends may report 0 for directories.
    pub size: u64,
    /// Modification time in unix seconds.
    pub mtime: i64,
}

/// An entry selected for deletion by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Physical path of the entry.
    pub pfn: String,
    pub kind: EntryKind,
    /// Newest modification time in the entry's subtree, unix seconds.
    pub mtime: i64,
    /// Bytes reclaimed by deleting the entry.
    pub size: u64,
}
