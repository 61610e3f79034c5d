use crate::domain::{CleanerConfig, ProtectedIndex};
use crate::ports::StorageBackend;

/// Application context holding the dependencies of a cleaner run.
pub struct AppContext<S: StorageBackend> {
    config: CleanerConfig,
    storage: S,
    index: ProtectedIndex,
}

impl<S: StorageBackend> AppContext<S> {
    /// Create a new application context.
    pub fn new(config: CleanerConfig, storage: S, index: ProtectedIndex) -> Self {
        Self { config, storage, index }
    }

    pub fn config(&self) -> &CleanerConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn index(&self) -> &ProtectedIndex {
        &self.index
    }
}
