//! Protected path source backed by a local file.

use std::fs;
use std::path::PathBuf;

use crate::adapters::protected_list_format::parse_protected_list;
use crate::domain::AppError;
use crate::ports::ProtectedPathSource;

#[derive(Debug, Clone)]
pub struct FileProtectedSource {
    path: PathBuf,
}

impl FileProtectedSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ProtectedPathSource for FileProtectedSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<Vec<String>, AppError> {
        let content = fs::read_to_string(&self.path).map_err(|e| AppError::ProtectedSource {
            message: format!("failed to read {}: {}", self.path.display(), e),
            status: None,
        })?;
        parse_protected_list(&content)
            .map_err(|message| AppError::ProtectedSource { message, status: None })
    }
}
