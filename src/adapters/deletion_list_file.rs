//! Deletion list persistence on the local filesystem.

use std::fs;
use std::io;
use std::path::Path;

use crate::domain::{AppError, DeletionList, ListHeader};

/// Overwrite `path` with the rendered list.
pub fn write_deletion_list(
    path: &Path,
    list: &DeletionList,
    header: Option<&ListHeader>,
) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, list.render(header))?;
    Ok(())
}

pub fn read_deletion_list(path: &Path) -> Result<DeletionList, AppError> {
    let content = fs::read_to_string(path).map_err(|err| {
        if err.kind() == io::ErrorKind::NotFound {
            AppError::DeletionListMissing(path.display().to_string())
        } else {
            AppError::Io(err)
        }
    })?;
    Ok(DeletionList::parse(&content))
}
