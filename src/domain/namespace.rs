//! Helpers for slash-separated storage namespace paths.
//!
//! Namespace paths are plain strings rather than `Path`s because the Hadoop
//! backend addresses paths that do not exist on the local filesystem.

/// Strip surrounding whitespace and trailing separators.
///
/// The bare root `/` is kept as is.
pub fn normalize(path: &str) -> String {
    let trimmed = path.trim();
    let stripped = trimmed.trim_end_matches('/');
    if stripped.is_empty() && trimmed.starts_with('/') {
        "/".to_string()
    } else {
        stripped.to_string()
    }
}

/// Join a child name onto a directory path.
pub fn join(parent: &str, name: &str) -> String {
    if parent.ends_with('/') { format!("{parent}{name}") } else { format!("{parent}/{name}") }
}

/// Parent of `path`, or `None` for the root or a bare name.
pub fn parent(path: &str) -> Option<&str> {
    let idx = path.rfind('/')?;
    if idx == 0 {
        if path.len() > 1 { Some("/") } else { None }
    } else {
        Some(&path[..idx])
    }
}

/// Whether `path` lies strictly below `root` at a separator boundary.
pub fn is_strictly_below(path: &str, root: &str) -> bool {
    if root == "/" {
        return path.len() > 1 && path.starts_with('/');
    }
    path.strip_prefix(root).is_some_and(|rest| rest.len() > 1 && rest.starts_with('/'))
}

/// Whether `path` is `root` or lies below it.
pub fn is_at_or_below(path: &str, root: &str) -> bool {
    path == root || is_strictly_below(path, root)
}
